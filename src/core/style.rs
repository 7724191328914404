//! Text style carried by a render instruction

use serde::{Deserialize, Serialize};

use super::Color;

/// Colors and attributes applied to one text run
///
/// An absent color means "keep the console default" for that channel; a
/// present one, including [`Color::BLACK`], is always applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    /// Foreground color
    pub fg: Option<Color>,
    /// Background color
    pub bg: Option<Color>,
    /// Bold (rendered as foreground intensity)
    pub bold: bool,
    /// Dim (clears foreground intensity)
    pub dim: bool,
    /// Swap foreground and background
    pub reverse: bool,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    pub fn bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn dim(mut self) -> Self {
        self.dim = true;
        self
    }

    pub fn reverse(mut self) -> Self {
        self.reverse = true;
        self
    }

    /// Foreground and background after applying `reverse`
    pub fn effective_colors(&self) -> (Option<Color>, Option<Color>) {
        if self.reverse {
            (self.bg, self.fg)
        } else {
            (self.fg, self.bg)
        }
    }
}
