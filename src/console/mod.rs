//! Native Console Boundary
//!
//! [`ConsoleApi`] is the set of primitive calls the legacy console offers.
//! Each method corresponds to one native call and reports its status as a
//! [`Result`]; callers decide whether a failure matters.
//!
//! - `windows`: the real Win32 console (Windows only)
//! - `headless`: an in-memory screen buffer that records every call

mod headless;
#[cfg(windows)]
mod windows;

pub use headless::{ConsoleSnapshot, HeadlessCell, HeadlessConsole, NativeCall};
#[cfg(windows)]
pub use windows::WindowsConsole;

use crate::core::{AttributeWord, Coordinate};
use crate::error::Result;

/// Screen buffer state as reported by the console
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenBufferInfo {
    /// Buffer extent: `row` is the number of rows, `col` the number of columns
    pub size: Coordinate,
    /// Cursor position (0-indexed)
    pub cursor_position: Coordinate,
    /// Attribute word applied to newly written text
    pub attributes: AttributeWord,
}

/// Primitive operations of a console that has no escape-sequence support
pub trait ConsoleApi {
    /// Current console mode flags
    fn console_mode(&mut self) -> Result<u32>;

    /// Size, cursor position and current attributes
    fn screen_buffer_info(&mut self) -> Result<ScreenBufferInfo>;

    /// Set the attribute word used for subsequently written text
    fn set_text_attribute(&mut self, attributes: AttributeWord) -> Result<()>;

    /// Move the cursor to an absolute position
    fn set_cursor_position(&mut self, position: Coordinate) -> Result<()>;

    /// Write `ch` into `len` consecutive cells starting at `start`, wrapping
    /// across rows. Returns the number of cells written.
    fn fill_output_character(&mut self, ch: char, len: u32, start: Coordinate) -> Result<u32>;

    /// Set the attribute word of `len` consecutive cells starting at `start`.
    /// Returns the number of cells written.
    fn fill_output_attribute(
        &mut self,
        attributes: AttributeWord,
        len: u32,
        start: Coordinate,
    ) -> Result<u32>;

    /// Set cursor size (percentage of the cell, 1-100) and visibility
    fn set_cursor_info(&mut self, size: u32, visible: bool) -> Result<()>;

    /// Set the console window title
    fn set_title(&mut self, title: &str) -> Result<()>;

    /// Write text at the cursor with the current attributes and flush it
    fn write_text(&mut self, text: &str) -> Result<()>;
}
