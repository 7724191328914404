//! Win32 console implementation of [`ConsoleApi`]
//!
//! Thin wrappers over the kernel32 console functions. Every wrapper turns a
//! zero `BOOL` into [`Error::Native`] carrying `GetLastError()`, and converts
//! between [`Coordinate`] (row, col) and `COORD` (X = column, Y = row).

use std::io::Write;

use windows_sys::Win32::Foundation::{GetLastError, HANDLE, INVALID_HANDLE_VALUE};
use windows_sys::Win32::System::Console::{
    FillConsoleOutputAttribute, FillConsoleOutputCharacterW, GetConsoleMode,
    GetConsoleScreenBufferInfo, GetStdHandle, SetConsoleCursorInfo, SetConsoleCursorPosition,
    SetConsoleTextAttribute, SetConsoleTitleW, CONSOLE_CURSOR_INFO, CONSOLE_SCREEN_BUFFER_INFO,
    COORD, STD_OUTPUT_HANDLE,
};

use super::{ConsoleApi, ScreenBufferInfo};
use crate::core::{AttributeWord, Coordinate};
use crate::error::{Error, Result};

/// The console attached to the process's standard output
#[derive(Debug)]
pub struct WindowsConsole {
    handle: HANDLE,
    out: std::io::Stdout,
}

impl WindowsConsole {
    /// Acquire the standard output handle and verify that it is a console.
    ///
    /// Fails with [`Error::NoConsole`] when output is redirected to a file or
    /// pipe, or when the process has no console at all.
    pub fn stdout() -> Result<Self> {
        // SAFETY: GetStdHandle has no preconditions.
        let handle = unsafe { GetStdHandle(STD_OUTPUT_HANDLE) };
        if handle.is_null() || handle == INVALID_HANDLE_VALUE {
            return Err(Error::NoConsole);
        }

        let mut console = Self {
            handle,
            out: std::io::stdout(),
        };
        if console.console_mode().is_err() {
            return Err(Error::NoConsole);
        }
        tracing::debug!("Attached to console output handle");
        Ok(console)
    }

    fn check(call: &'static str, ok: i32) -> Result<()> {
        if ok != 0 {
            return Ok(());
        }
        // SAFETY: GetLastError only reads thread-local state.
        let code = unsafe { GetLastError() };
        Err(Error::Native { call, code })
    }

    fn coord(position: Coordinate) -> Result<COORD> {
        let (x, y) = position
            .to_native()
            .ok_or(Error::CoordinateOutOfRange {
                row: position.row,
                col: position.col,
            })?;
        Ok(COORD { X: x, Y: y })
    }
}

impl ConsoleApi for WindowsConsole {
    fn console_mode(&mut self) -> Result<u32> {
        let mut mode = 0u32;
        // SAFETY: `mode` is a valid out-pointer for the duration of the call.
        let ok = unsafe { GetConsoleMode(self.handle, &mut mode) };
        Self::check("GetConsoleMode", ok)?;
        Ok(mode)
    }

    fn screen_buffer_info(&mut self) -> Result<ScreenBufferInfo> {
        // SAFETY: CONSOLE_SCREEN_BUFFER_INFO is plain data; all-zero is valid.
        let mut info: CONSOLE_SCREEN_BUFFER_INFO = unsafe { std::mem::zeroed() };
        // SAFETY: `info` is a valid out-pointer for the duration of the call.
        let ok = unsafe { GetConsoleScreenBufferInfo(self.handle, &mut info) };
        Self::check("GetConsoleScreenBufferInfo", ok)?;
        Ok(ScreenBufferInfo {
            size: Coordinate::from_native(info.dwSize.X, info.dwSize.Y),
            cursor_position: Coordinate::from_native(
                info.dwCursorPosition.X,
                info.dwCursorPosition.Y,
            ),
            attributes: AttributeWord(info.wAttributes),
        })
    }

    fn set_text_attribute(&mut self, attributes: AttributeWord) -> Result<()> {
        // Text already queued in the stdout buffer must land with the old
        // attributes.
        self.out.flush()?;
        // SAFETY: plain value arguments on a handle owned by this process.
        let ok = unsafe { SetConsoleTextAttribute(self.handle, attributes.bits()) };
        Self::check("SetConsoleTextAttribute", ok)
    }

    fn set_cursor_position(&mut self, position: Coordinate) -> Result<()> {
        let coord = Self::coord(position)?;
        self.out.flush()?;
        // SAFETY: plain value arguments on a handle owned by this process.
        let ok = unsafe { SetConsoleCursorPosition(self.handle, coord) };
        Self::check("SetConsoleCursorPosition", ok)
    }

    fn fill_output_character(&mut self, ch: char, len: u32, start: Coordinate) -> Result<u32> {
        let coord = Self::coord(start)?;
        let mut units = [0u16; 2];
        let unit = ch.encode_utf16(&mut units)[0];
        let mut written = 0u32;
        // SAFETY: `written` is a valid out-pointer for the duration of the call.
        let ok = unsafe { FillConsoleOutputCharacterW(self.handle, unit, len, coord, &mut written) };
        Self::check("FillConsoleOutputCharacterW", ok)?;
        Ok(written)
    }

    fn fill_output_attribute(
        &mut self,
        attributes: AttributeWord,
        len: u32,
        start: Coordinate,
    ) -> Result<u32> {
        let coord = Self::coord(start)?;
        let mut written = 0u32;
        // SAFETY: `written` is a valid out-pointer for the duration of the call.
        let ok = unsafe {
            FillConsoleOutputAttribute(self.handle, attributes.bits(), len, coord, &mut written)
        };
        Self::check("FillConsoleOutputAttribute", ok)?;
        Ok(written)
    }

    fn set_cursor_info(&mut self, size: u32, visible: bool) -> Result<()> {
        let info = CONSOLE_CURSOR_INFO {
            dwSize: size,
            bVisible: i32::from(visible),
        };
        // SAFETY: `info` outlives the call and is only read.
        let ok = unsafe { SetConsoleCursorInfo(self.handle, &info) };
        Self::check("SetConsoleCursorInfo", ok)
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        let wide: Vec<u16> = title.encode_utf16().chain(std::iter::once(0)).collect();
        // SAFETY: `wide` is NUL-terminated and outlives the call.
        let ok = unsafe { SetConsoleTitleW(wide.as_ptr()) };
        Self::check("SetConsoleTitleW", ok)
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        let mut out = self.out.lock();
        out.write_all(text.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}
