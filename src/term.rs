//! Legacy Terminal Adapter
//!
//! [`LegacyTerm`] emulates the VT operations an upstream renderer emits
//! (styled writes, cursor motion, line erase, cursor visibility, title) with
//! the call-based console API.
//!
//! The console has no notion of a style that belongs to one write: attributes
//! set with `SetConsoleTextAttribute` stick to everything written afterward.
//! Every styled write therefore sets its attributes, writes, and restores the
//! attribute word captured when the adapter was created.
//!
//! Native failures never abort rendering. They are logged, counted and the
//! adapter moves on to the next operation.

use tracing::{debug, trace, warn};

use crate::app::TermConfig;
use crate::console::{ConsoleApi, ScreenBufferInfo};
use crate::core::{legacy_index, AttributeWord, Coordinate, Style};
use crate::error::{Error, Result};

/// Titles must be shorter than this many UTF-16 code units, the unit
/// `SetConsoleTitleW` receives
pub const MAX_TITLE_LEN: usize = 255;

/// ANSI index substituted for a foreground color that names no specific color
const FALLBACK_FOREGROUND: u8 = 7;
/// ANSI index substituted for a background color that names no specific color
const FALLBACK_BACKGROUND: u8 = 0;
/// ANSI intensity bit
const BRIGHT_BIT: u8 = 8;

/// Adapter that drives a legacy console through its native API
///
/// Single-writer: every operation takes `&mut self`, and the adapter assumes
/// nothing else changes the console's attributes while it is alive.
#[derive(Debug)]
pub struct LegacyTerm<C: ConsoleApi> {
    console: C,
    /// Attribute word observed at construction, restored after styled writes
    default_attributes: AttributeWord,
    cursor_size: u32,
    erase_attributes: bool,
    failed_calls: u64,
    last_error: Option<Error>,
}

impl<C: ConsoleApi> LegacyTerm<C> {
    /// Create an adapter with default settings
    pub fn new(console: C) -> Result<Self> {
        Self::with_config(console, &TermConfig::default())
    }

    /// Create an adapter, capturing the console's current attributes as the
    /// defaults to restore after every styled write.
    ///
    /// Fails if the console cannot report its screen buffer, which means the
    /// handle is not a usable console.
    pub fn with_config(mut console: C, config: &TermConfig) -> Result<Self> {
        let info = console.screen_buffer_info()?;
        debug!(
            attributes = %info.attributes,
            columns = info.size.col,
            rows = info.size.row,
            "Captured console defaults"
        );
        Ok(Self {
            console,
            default_attributes: info.attributes,
            cursor_size: config.cursor_size.clamp(1, 100),
            erase_attributes: config.erase_attributes,
            failed_calls: 0,
            last_error: None,
        })
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    pub fn into_inner(self) -> C {
        self.console
    }

    /// Attribute word captured at construction
    pub fn default_attributes(&self) -> AttributeWord {
        self.default_attributes
    }

    /// Number of native calls that have failed so far
    pub fn failed_calls(&self) -> u64 {
        self.failed_calls
    }

    /// The most recent native failure, if any
    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    /// Current cursor position (0-based), queried from the console
    pub fn cursor_position(&mut self) -> Result<Coordinate> {
        Ok(self.console.screen_buffer_info()?.cursor_position)
    }

    /// Screen buffer size in rows and columns, queried from the console
    pub fn screen_size(&mut self) -> Result<Coordinate> {
        Ok(self.console.screen_buffer_info()?.size)
    }

    /// Resolve a style to the attribute word it is written with.
    ///
    /// Absent channels keep the default nibble. Present colors are reduced to
    /// a standard ANSI index, falling back to white (foreground) or black
    /// (background) when the color names no specific value, then permuted
    /// into the console's palette order.
    pub fn attributes_for(&self, style: &Style) -> AttributeWord {
        let defaults = self.default_attributes;
        let (fg, bg) = style.effective_colors();
        let (default_fg, default_bg) = if style.reverse {
            (defaults.background(), defaults.foreground())
        } else {
            (defaults.foreground(), defaults.background())
        };

        let fore = match fg {
            Some(color) => {
                let mut ansi = color.to_standard().unwrap_or(FALLBACK_FOREGROUND);
                if style.bold {
                    ansi |= BRIGHT_BIT;
                }
                if style.dim {
                    ansi &= !BRIGHT_BIT;
                }
                legacy_index(ansi)
            }
            None => default_fg,
        };
        let back = match bg {
            Some(color) => legacy_index(color.to_standard().unwrap_or(FALLBACK_BACKGROUND)),
            None => default_bg,
        };

        AttributeWord::from_colors(fore, back)
    }

    /// Write text with whatever attributes are current
    pub fn write_text(&mut self, text: &str) {
        let result = self.console.write_text(text);
        self.settle(result);
    }

    /// Write text in `style`, then restore the default attributes.
    ///
    /// The restore is issued even when the write fails.
    pub fn write_styled(&mut self, text: &str, style: &Style) {
        let attributes = self.attributes_for(style);
        trace!(%attributes, len = text.len(), "Styled write");

        let result = self.console.set_text_attribute(attributes);
        self.settle(result);
        let result = self.console.write_text(text);
        self.settle(result);
        let result = self.console.set_text_attribute(self.default_attributes);
        self.settle(result);
    }

    /// Move the cursor to an absolute position. Negative coordinates are
    /// ignored.
    pub fn move_cursor_to(&mut self, position: Coordinate) {
        if !position.is_addressable() {
            trace!(%position, "Ignoring cursor move to negative position");
            return;
        }
        let result = self.console.set_cursor_position(position);
        self.settle(result);
    }

    /// Move the cursor to `col` (0-based) on the current row
    pub fn move_cursor_to_column(&mut self, col: i32) {
        if let Some(info) = self.query() {
            self.move_cursor_to(Coordinate::new(info.cursor_position.row, col));
        }
    }

    pub fn move_cursor_up(&mut self) {
        if let Some(info) = self.query() {
            let Coordinate { row, col } = info.cursor_position;
            self.move_cursor_to(Coordinate::new(row - 1, col));
        }
    }

    pub fn move_cursor_down(&mut self) {
        if let Some(info) = self.query() {
            let Coordinate { row, col } = info.cursor_position;
            self.move_cursor_to(Coordinate::new(row + 1, col));
        }
    }

    /// Move one cell right, wrapping to the start of the next row from the
    /// last column
    pub fn move_cursor_forward(&mut self) {
        if let Some(info) = self.query() {
            let Coordinate { row, col } = info.cursor_position;
            let target = if col >= info.size.col - 1 {
                Coordinate::new(row + 1, 0)
            } else {
                Coordinate::new(row, col + 1)
            };
            self.move_cursor_to(target);
        }
    }

    /// Move one cell left, wrapping to the end of the previous row from
    /// column 0
    pub fn move_cursor_backward(&mut self) {
        if let Some(info) = self.query() {
            let Coordinate { row, col } = info.cursor_position;
            let target = if col == 0 {
                Coordinate::new(row - 1, info.size.col - 1)
            } else {
                Coordinate::new(row, col - 1)
            };
            self.move_cursor_to(target);
        }
    }

    /// Blank the whole row under the cursor. The cursor does not move.
    pub fn erase_line(&mut self) {
        if let Some(info) = self.query() {
            let start = Coordinate::new(info.cursor_position.row, 0);
            self.blank(start, info.size.col);
        }
    }

    /// Blank from the cursor to the end of its row
    pub fn erase_end_of_line(&mut self) {
        if let Some(info) = self.query() {
            let cursor = info.cursor_position;
            self.blank(cursor, info.size.col - cursor.col);
        }
    }

    /// Blank from the start of the row up to, not including, the cursor
    pub fn erase_start_of_line(&mut self) {
        if let Some(info) = self.query() {
            let cursor = info.cursor_position;
            self.blank(Coordinate::new(cursor.row, 0), cursor.col);
        }
    }

    pub fn hide_cursor(&mut self) {
        let result = self.console.set_cursor_info(self.cursor_size, false);
        self.settle(result);
    }

    pub fn show_cursor(&mut self) {
        let result = self.console.set_cursor_info(self.cursor_size, true);
        self.settle(result);
    }

    /// Set the console window title.
    ///
    /// Titles of [`MAX_TITLE_LEN`] UTF-16 units or more are rejected before
    /// the console is touched.
    pub fn set_title(&mut self, title: &str) -> Result<()> {
        let len = title.encode_utf16().count();
        if len >= MAX_TITLE_LEN {
            return Err(Error::TitleTooLong { len });
        }
        let result = self.console.set_title(title);
        self.settle(result);
        Ok(())
    }

    /// Fill `len` cells from `start` with spaces (and default attributes)
    fn blank(&mut self, start: Coordinate, len: i32) {
        let Ok(len) = u32::try_from(len) else {
            return;
        };
        if len == 0 {
            return;
        }
        let result = self.console.fill_output_character(' ', len, start);
        self.settle(result);
        if self.erase_attributes {
            let result = self
                .console
                .fill_output_attribute(self.default_attributes, len, start);
            self.settle(result);
        }
    }

    fn query(&mut self) -> Option<ScreenBufferInfo> {
        let result = self.console.screen_buffer_info();
        self.settle(result)
    }

    /// Record a failed native call and carry on
    fn settle<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Console call failed: {}", e);
                self.failed_calls += 1;
                self.last_error = Some(e);
                None
            }
        }
    }
}
