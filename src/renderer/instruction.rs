//! Render Instructions
//!
//! The already-resolved output of an upstream renderer: text runs with an
//! optional style, and batches of control directives.

use serde::{Deserialize, Serialize};

use crate::core::Style;

/// One unit of renderer output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    /// Text written at the cursor
    Text {
        text: String,
        #[serde(default)]
        style: Option<Style>,
    },

    /// Control directives applied in order
    Control(Vec<ControlCode>),
}

impl Instruction {
    /// Unstyled text
    pub fn text(text: impl Into<String>) -> Self {
        Instruction::Text {
            text: text.into(),
            style: None,
        }
    }

    /// Text in `style`
    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Instruction::Text {
            text: text.into(),
            style: Some(style),
        }
    }

    /// A batch of control directives
    pub fn control(codes: impl IntoIterator<Item = ControlCode>) -> Self {
        Instruction::Control(codes.into_iter().collect())
    }
}

/// Control directives (the VT operations a renderer may emit)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlCode {
    /// BEL - not supported by the legacy console
    Bell,
    /// CR - Carriage Return
    CarriageReturn,
    /// CUP to (1, 1)
    Home,
    /// ED 2 - not supported by the legacy console
    Clear,
    /// DECTCEM set
    ShowCursor,
    /// DECTCEM reset
    HideCursor,
    /// Alternate screen on - not supported by the legacy console
    EnableAltScreen,
    /// Alternate screen off - not supported by the legacy console
    DisableAltScreen,
    /// CUU by one row
    CursorUp,
    /// CUD by one row
    CursorDown,
    /// CUF by one column, wrapping at the right edge
    CursorForward,
    /// CUB by one column, wrapping at the left edge
    CursorBackward,
    /// CHA - column is 1-based
    MoveToColumn { x: i32 },
    /// CUP - column `x` and row `y` are 1-based
    MoveTo { x: i32, y: i32 },
    /// EL
    EraseInLine(EraseMode),
    /// OSC 2
    SetWindowTitle(String),
}

/// Portion of the line cleared by [`ControlCode::EraseInLine`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EraseMode {
    /// EL 0: cursor to end of line
    ToEnd,
    /// EL 1: start of line to cursor
    ToStart,
    /// EL 2: whole line
    WholeLine,
}
