//! Console coordinates
//!
//! The native console API addresses cells as (x, y), column first. Everything
//! in this crate uses (row, col) instead; the swap happens only where a
//! coordinate is handed to a console implementation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell position or a screen extent, 0-indexed, rows growing downward
///
/// Components are signed so that relative moves past the top or left edge
/// produce a value the adapter can recognize and refuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coordinate {
    /// Row (0-indexed)
    pub row: i32,
    /// Column (0-indexed)
    pub col: i32,
}

impl Coordinate {
    /// The top-left cell
    pub const ORIGIN: Coordinate = Coordinate { row: 0, col: 0 };

    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Build from the 1-based (x, y) pair used by VT cursor addressing
    pub const fn from_one_based(x: i32, y: i32) -> Self {
        Self {
            row: y.saturating_sub(1),
            col: x.saturating_sub(1),
        }
    }

    /// Whether both components are non-negative
    pub const fn is_addressable(&self) -> bool {
        self.row >= 0 && self.col >= 0
    }

    /// Native (x, y) pair, or `None` if a component does not fit in 16 bits
    pub fn to_native(self) -> Option<(i16, i16)> {
        let x = i16::try_from(self.col).ok()?;
        let y = i16::try_from(self.row).ok()?;
        Some((x, y))
    }

    /// Build from a native (x, y) pair
    pub fn from_native(x: i16, y: i16) -> Self {
        Self {
            row: i32::from(y),
            col: i32::from(x),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(row {}, col {})", self.row, self.col)
    }
}
