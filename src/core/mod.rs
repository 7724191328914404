//! Console Core Module
//!
//! Platform-independent value types shared by the adapter and the
//! dispatcher:
//! - Colors and their reduction to the 16-color console palette
//! - Styles attached to text runs
//! - Packed attribute words
//! - Row/column coordinates

mod attr;
mod color;
mod coord;
mod style;

pub use attr::AttributeWord;
pub use color::{legacy_index, Color, ColorParseError, ANSI_TO_LEGACY, CONSOLE_PALETTE};
pub use coord::Coordinate;
pub use style::Style;
