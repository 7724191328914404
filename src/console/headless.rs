//! Headless Console
//!
//! An in-memory screen buffer implementing [`ConsoleApi`]. Every call is
//! appended to a log before it is applied, so tests can assert on the exact
//! sequence of native operations as well as on the resulting screen.
//! Individual calls can be made to fail to exercise error paths.

use std::collections::HashSet;

use serde::Serialize;
use unicode_width::UnicodeWidthChar;

use super::{ConsoleApi, ScreenBufferInfo};
use crate::core::{AttributeWord, Coordinate};
use crate::error::{Error, Result};

/// ENABLE_PROCESSED_OUTPUT | ENABLE_WRAP_AT_EOL_OUTPUT
const DEFAULT_MODE: u32 = 0x0003;

/// Win32 error codes reported by the headless console
const ERROR_INVALID_HANDLE: u32 = 6;
const ERROR_GEN_FAILURE: u32 = 31;
const ERROR_INVALID_PARAMETER: u32 = 87;

/// Placeholder stored in the second cell of a double-width character
const WIDE_CONTINUATION: char = '\0';

/// One native call, as observed by the headless console
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeCall {
    GetConsoleMode,
    GetScreenBufferInfo,
    SetTextAttribute(AttributeWord),
    SetCursorPosition(Coordinate),
    FillOutputCharacter {
        ch: char,
        len: u32,
        start: Coordinate,
    },
    FillOutputAttribute {
        attributes: AttributeWord,
        len: u32,
        start: Coordinate,
    },
    SetCursorInfo {
        size: u32,
        visible: bool,
    },
    SetTitle(String),
    WriteText(String),
}

impl NativeCall {
    /// Name of the Win32 function this call stands for
    pub fn name(&self) -> &'static str {
        match self {
            NativeCall::GetConsoleMode => "GetConsoleMode",
            NativeCall::GetScreenBufferInfo => "GetConsoleScreenBufferInfo",
            NativeCall::SetTextAttribute(_) => "SetConsoleTextAttribute",
            NativeCall::SetCursorPosition(_) => "SetConsoleCursorPosition",
            NativeCall::FillOutputCharacter { .. } => "FillConsoleOutputCharacterW",
            NativeCall::FillOutputAttribute { .. } => "FillConsoleOutputAttribute",
            NativeCall::SetCursorInfo { .. } => "SetConsoleCursorInfo",
            NativeCall::SetTitle(_) => "SetConsoleTitleW",
            NativeCall::WriteText(_) => "WriteConsoleW",
        }
    }
}

/// A single cell of the headless screen buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadlessCell {
    pub ch: char,
    pub attributes: AttributeWord,
}

impl HeadlessCell {
    fn blank(attributes: AttributeWord) -> Self {
        Self {
            ch: ' ',
            attributes,
        }
    }
}

/// Serializable view of the headless screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsoleSnapshot {
    pub columns: usize,
    pub rows: usize,
    /// Screen text, one entry per row, trailing blanks removed
    pub lines: Vec<String>,
    pub cursor: Coordinate,
    pub cursor_visible: bool,
    pub title: String,
    pub attributes: AttributeWord,
}

impl ConsoleSnapshot {
    /// Screen text with trailing empty rows dropped
    pub fn to_text(&self) -> String {
        let last = self
            .lines
            .iter()
            .rposition(|line| !line.is_empty())
            .map_or(0, |idx| idx + 1);
        let mut out = self.lines[..last].join("\n");
        out.push('\n');
        out
    }
}

/// In-memory console screen buffer
#[derive(Debug, Clone)]
pub struct HeadlessConsole {
    columns: usize,
    rows: usize,
    cells: Vec<Vec<HeadlessCell>>,
    cursor: Coordinate,
    attributes: AttributeWord,
    cursor_visible: bool,
    cursor_size: u32,
    title: String,
    mode: u32,
    attached: bool,
    calls: Vec<NativeCall>,
    failing: HashSet<&'static str>,
}

impl HeadlessConsole {
    /// Create a blank console with the stock light-grey-on-black attributes
    pub fn new(columns: usize, rows: usize) -> Self {
        Self::with_attributes(columns, rows, AttributeWord::CONSOLE_DEFAULT)
    }

    /// Create a blank console whose current attributes are `attributes`
    pub fn with_attributes(columns: usize, rows: usize, attributes: AttributeWord) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);
        Self {
            columns,
            rows,
            cells: vec![vec![HeadlessCell::blank(attributes); columns]; rows],
            cursor: Coordinate::ORIGIN,
            attributes,
            cursor_visible: true,
            cursor_size: 25,
            title: String::new(),
            mode: DEFAULT_MODE,
            attached: true,
            calls: Vec::new(),
            failing: HashSet::new(),
        }
    }

    /// A console whose handle is invalid: every call fails
    pub fn detached(columns: usize, rows: usize) -> Self {
        Self {
            attached: false,
            ..Self::new(columns, rows)
        }
    }

    /// Make every subsequent call to the named native function fail
    pub fn fail_on(&mut self, name: &'static str) {
        self.failing.insert(name);
    }

    /// All calls made so far, oldest first
    pub fn calls(&self) -> &[NativeCall] {
        &self.calls
    }

    /// Drain the call log
    pub fn take_calls(&mut self) -> Vec<NativeCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cursor(&self) -> Coordinate {
        self.cursor
    }

    pub fn attributes(&self) -> AttributeWord {
        self.attributes
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn cursor_size(&self) -> u32 {
        self.cursor_size
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Move the cursor without recording a call (test setup)
    pub fn place_cursor(&mut self, position: Coordinate) {
        if self.contains(position) {
            self.cursor = position;
        }
    }

    /// Resize the buffer, keeping the top-left content
    pub fn resize(&mut self, columns: usize, rows: usize) {
        let columns = columns.max(1);
        let rows = rows.max(1);
        let blank = HeadlessCell::blank(self.attributes);
        self.cells.resize(rows, vec![blank; columns]);
        for line in &mut self.cells {
            line.resize(columns, blank);
        }
        self.columns = columns;
        self.rows = rows;
        self.cursor.row = self.cursor.row.min(rows as i32 - 1);
        self.cursor.col = self.cursor.col.min(columns as i32 - 1);
    }

    pub fn cell(&self, position: Coordinate) -> Option<&HeadlessCell> {
        if !self.contains(position) {
            return None;
        }
        Some(&self.cells[position.row as usize][position.col as usize])
    }

    /// Text of one row, trailing blanks removed
    pub fn row_text(&self, row: usize) -> String {
        self.cells
            .get(row)
            .map(|line| {
                line.iter()
                    .map(|cell| cell.ch)
                    .filter(|ch| *ch != WIDE_CONTINUATION)
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> ConsoleSnapshot {
        ConsoleSnapshot {
            columns: self.columns,
            rows: self.rows,
            lines: (0..self.rows).map(|row| self.row_text(row)).collect(),
            cursor: self.cursor,
            cursor_visible: self.cursor_visible,
            title: self.title.clone(),
            attributes: self.attributes,
        }
    }

    fn contains(&self, position: Coordinate) -> bool {
        position.is_addressable()
            && (position.row as usize) < self.rows
            && (position.col as usize) < self.columns
    }

    /// Log a call and decide whether it goes through
    fn record(&mut self, call: NativeCall) -> Result<()> {
        let name = call.name();
        self.calls.push(call);
        if !self.attached {
            return Err(Error::Native {
                call: name,
                code: ERROR_INVALID_HANDLE,
            });
        }
        if self.failing.contains(name) {
            return Err(Error::Native {
                call: name,
                code: ERROR_GEN_FAILURE,
            });
        }
        Ok(())
    }

    fn invalid_parameter(call: &'static str) -> Error {
        Error::Native {
            call,
            code: ERROR_INVALID_PARAMETER,
        }
    }

    /// Apply `f` to `len` cells starting at `start`, row-major, stopping at
    /// the end of the buffer
    fn fill_cells(&mut self, start: Coordinate, len: u32, mut f: impl FnMut(&mut HeadlessCell)) -> u32 {
        let total = self.columns * self.rows;
        let first = start.row as usize * self.columns + start.col as usize;
        let last = total.min(first.saturating_add(len as usize));
        for idx in first..last {
            f(&mut self.cells[idx / self.columns][idx % self.columns]);
        }
        (last - first) as u32
    }

    fn line_feed(&mut self) {
        self.cursor.col = 0;
        if (self.cursor.row as usize) + 1 < self.rows {
            self.cursor.row += 1;
        } else {
            self.cells.remove(0);
            self.cells
                .push(vec![HeadlessCell::blank(self.attributes); self.columns]);
        }
    }

    fn put_char(&mut self, ch: char) {
        match ch {
            '\r' => self.cursor.col = 0,
            '\n' => self.line_feed(),
            '\x08' => self.cursor.col = (self.cursor.col - 1).max(0),
            '\t' => {
                let next = (self.cursor.col / 8 + 1) * 8;
                self.cursor.col = next.min(self.columns as i32 - 1);
            }
            '\x07' => {}
            _ => {
                let width = ch.width().unwrap_or(0);
                if width == 0 || width > self.columns {
                    return;
                }
                if self.cursor.col as usize + width > self.columns {
                    self.line_feed();
                }
                let (row, col) = (self.cursor.row as usize, self.cursor.col as usize);
                let attributes = self.attributes;
                self.cells[row][col] = HeadlessCell { ch, attributes };
                if width == 2 {
                    self.cells[row][col + 1] = HeadlessCell {
                        ch: WIDE_CONTINUATION,
                        attributes,
                    };
                }
                self.cursor.col += width as i32;
                if self.cursor.col as usize >= self.columns {
                    self.line_feed();
                }
            }
        }
    }
}

impl ConsoleApi for HeadlessConsole {
    fn console_mode(&mut self) -> Result<u32> {
        self.record(NativeCall::GetConsoleMode)?;
        Ok(self.mode)
    }

    fn screen_buffer_info(&mut self) -> Result<ScreenBufferInfo> {
        self.record(NativeCall::GetScreenBufferInfo)?;
        Ok(ScreenBufferInfo {
            size: Coordinate::new(self.rows as i32, self.columns as i32),
            cursor_position: self.cursor,
            attributes: self.attributes,
        })
    }

    fn set_text_attribute(&mut self, attributes: AttributeWord) -> Result<()> {
        self.record(NativeCall::SetTextAttribute(attributes))?;
        self.attributes = attributes;
        Ok(())
    }

    fn set_cursor_position(&mut self, position: Coordinate) -> Result<()> {
        let call = NativeCall::SetCursorPosition(position);
        let name = call.name();
        self.record(call)?;
        if !self.contains(position) {
            return Err(Self::invalid_parameter(name));
        }
        self.cursor = position;
        Ok(())
    }

    fn fill_output_character(&mut self, ch: char, len: u32, start: Coordinate) -> Result<u32> {
        let call = NativeCall::FillOutputCharacter { ch, len, start };
        let name = call.name();
        self.record(call)?;
        if !self.contains(start) {
            return Err(Self::invalid_parameter(name));
        }
        Ok(self.fill_cells(start, len, |cell| cell.ch = ch))
    }

    fn fill_output_attribute(
        &mut self,
        attributes: AttributeWord,
        len: u32,
        start: Coordinate,
    ) -> Result<u32> {
        let call = NativeCall::FillOutputAttribute {
            attributes,
            len,
            start,
        };
        let name = call.name();
        self.record(call)?;
        if !self.contains(start) {
            return Err(Self::invalid_parameter(name));
        }
        Ok(self.fill_cells(start, len, |cell| cell.attributes = attributes))
    }

    fn set_cursor_info(&mut self, size: u32, visible: bool) -> Result<()> {
        let call = NativeCall::SetCursorInfo { size, visible };
        let name = call.name();
        self.record(call)?;
        if !(1..=100).contains(&size) {
            return Err(Self::invalid_parameter(name));
        }
        self.cursor_size = size;
        self.cursor_visible = visible;
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        self.record(NativeCall::SetTitle(title.to_string()))?;
        self.title = title.to_string();
        Ok(())
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        self.record(NativeCall::WriteText(text.to_string()))?;
        for ch in text.chars() {
            self.put_char(ch);
        }
        Ok(())
    }
}
