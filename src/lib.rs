//! Mochi Legacy Console Renderer
//!
//! Renders styled terminal output onto consoles that do not interpret ANSI
//! escape sequences, by translating each operation into native console calls.
//!
//! - `core`: colors, styles, attribute words, coordinates
//! - `console`: the native console boundary (Win32 and headless)
//! - `term`: the adapter emulating VT operations with native calls
//! - `renderer`: the dispatcher that walks an instruction stream
//! - `app`: configuration

pub mod app;
pub mod console;
pub mod core;
pub mod error;
pub mod renderer;
pub mod term;

pub use error::{Error, Result};
pub use renderer::{render, ControlCode, EraseMode, Instruction};
pub use term::LegacyTerm;
