//! Error types for console operations

use std::io;
use thiserror::Error;

use crate::term::MAX_TITLE_LEN;

/// Console error type
#[derive(Error, Debug)]
pub enum Error {
    /// Standard output is not attached to a console
    #[error("No console attached to standard output")]
    NoConsole,

    /// A native console call reported failure
    #[error("{call} failed with error code {code}")]
    Native {
        /// Name of the native function
        call: &'static str,
        /// Last-error code reported by the platform
        code: u32,
    },

    /// Window title exceeds the console limit
    #[error("Window title is {len} UTF-16 units, the limit is {}", MAX_TITLE_LEN - 1)]
    TitleTooLong { len: usize },

    /// Coordinate does not fit the native 16-bit coordinate range
    #[error("Coordinate (row {row}, col {col}) is outside the console range")]
    CoordinateOutOfRange { row: i32, col: i32 },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for console operations
pub type Result<T> = std::result::Result<T, Error>;
