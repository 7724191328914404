//! Color representation and reduction to the legacy console palette
//!
//! Supports:
//! - Default foreground/background
//! - 16 standard ANSI colors (0-15)
//! - 256-color palette (0-255)
//! - 24-bit true color (RGB)
//!
//! Legacy consoles only know 16 colors, so every color is first reduced to a
//! standard ANSI index and then permuted into the console's own bit layout.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Color representation supporting all terminal color modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Color {
    /// Default terminal color (foreground or background)
    #[default]
    Default,
    /// Indexed color (0-255)
    /// 0-7: standard colors
    /// 8-15: bright colors
    /// 16-231: 6x6x6 color cube
    /// 232-255: grayscale
    Indexed(u8),
    /// 24-bit RGB color
    Rgb(u8, u8, u8),
}

impl Color {
    /// Standard ANSI color indices
    pub const BLACK: Color = Color::Indexed(0);
    pub const RED: Color = Color::Indexed(1);
    pub const GREEN: Color = Color::Indexed(2);
    pub const YELLOW: Color = Color::Indexed(3);
    pub const BLUE: Color = Color::Indexed(4);
    pub const MAGENTA: Color = Color::Indexed(5);
    pub const CYAN: Color = Color::Indexed(6);
    pub const WHITE: Color = Color::Indexed(7);

    /// Bright ANSI color indices
    pub const BRIGHT_BLACK: Color = Color::Indexed(8);
    pub const BRIGHT_RED: Color = Color::Indexed(9);
    pub const BRIGHT_GREEN: Color = Color::Indexed(10);
    pub const BRIGHT_YELLOW: Color = Color::Indexed(11);
    pub const BRIGHT_BLUE: Color = Color::Indexed(12);
    pub const BRIGHT_MAGENTA: Color = Color::Indexed(13);
    pub const BRIGHT_CYAN: Color = Color::Indexed(14);
    pub const BRIGHT_WHITE: Color = Color::Indexed(15);

    /// Reduce this color to a standard ANSI index (0-15).
    ///
    /// Returns `None` for [`Color::Default`], which names no specific color.
    /// Extended palette entries and RGB values are matched against
    /// [`CONSOLE_PALETTE`].
    pub fn to_standard(&self) -> Option<u8> {
        match *self {
            Color::Default => None,
            Color::Indexed(idx @ 0..=15) => Some(idx),
            Color::Indexed(idx) => {
                let (r, g, b) = index_to_rgb(idx);
                Some(nearest_standard(r, g, b))
            }
            Color::Rgb(r, g, b) => Some(nearest_standard(r, g, b)),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Color::Default => f.write_str("default"),
            Color::Indexed(idx) => match STANDARD_NAMES.get(usize::from(idx)) {
                Some(name) => f.write_str(name),
                None => write!(f, "color({idx})"),
            },
            Color::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
        }
    }
}

/// Names of the 16 standard colors, in ANSI order
const STANDARD_NAMES: [&str; 16] = [
    "black",
    "red",
    "green",
    "yellow",
    "blue",
    "magenta",
    "cyan",
    "white",
    "bright_black",
    "bright_red",
    "bright_green",
    "bright_yellow",
    "bright_blue",
    "bright_magenta",
    "bright_cyan",
    "bright_white",
];

/// Error returned when a color definition cannot be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid color definition: {0:?}")]
pub struct ColorParseError(pub String);

impl FromStr for Color {
    type Err = ColorParseError;

    /// Parse `default`, a standard name (`red`, `bright_blue`, `grey` for
    /// `bright_black`), `#rrggbb` or `color(N)`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let original = s;
        let s = s.trim().to_ascii_lowercase();
        let err = || ColorParseError(original.to_string());

        if s == "default" {
            return Ok(Color::Default);
        }
        if s == "grey" || s == "gray" {
            return Ok(Color::BRIGHT_BLACK);
        }
        if let Some(idx) = STANDARD_NAMES.iter().position(|name| *name == s) {
            return Ok(Color::Indexed(idx as u8));
        }
        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(err());
            }
            let channel = |range: std::ops::Range<usize>| {
                u8::from_str_radix(&hex[range], 16).map_err(|_| err())
            };
            return Ok(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?));
        }
        if let Some(number) = s.strip_prefix("color(").and_then(|rest| rest.strip_suffix(')')) {
            return number.trim().parse::<u8>().map(Color::Indexed).map_err(|_| err());
        }
        Err(err())
    }
}

/// The 16-color palette of the Windows console (Campbell scheme), in ANSI order
pub const CONSOLE_PALETTE: [(u8, u8, u8); 16] = [
    (12, 12, 12),    // 0: Black
    (197, 15, 31),   // 1: Red
    (19, 161, 14),   // 2: Green
    (193, 156, 0),   // 3: Yellow
    (0, 55, 218),    // 4: Blue
    (136, 23, 152),  // 5: Magenta
    (58, 150, 221),  // 6: Cyan
    (204, 204, 204), // 7: White
    (118, 118, 118), // 8: Bright Black
    (231, 72, 86),   // 9: Bright Red
    (22, 198, 12),   // 10: Bright Green
    (249, 241, 165), // 11: Bright Yellow
    (59, 120, 255),  // 12: Bright Blue
    (180, 0, 158),   // 13: Bright Magenta
    (97, 214, 214),  // 14: Bright Cyan
    (242, 242, 242), // 15: Bright White
];

/// ANSI color number to console color number.
///
/// The console packs colors as bit0=blue, bit1=green, bit2=red, bit3=intensity,
/// while ANSI numbers them bit0=red, bit1=green, bit2=blue. Red and blue swap,
/// intensity stays.
pub const ANSI_TO_LEGACY: [u8; 16] = [0, 4, 2, 6, 1, 5, 3, 7, 8, 12, 10, 14, 9, 13, 11, 15];

/// Permute a standard ANSI index (0-15) into the console's palette order
pub fn legacy_index(ansi: u8) -> u8 {
    debug_assert!(ansi < 16, "ANSI index {ansi} is outside the standard palette");
    ANSI_TO_LEGACY[usize::from(ansi & 0x0F)]
}

/// Index of the [`CONSOLE_PALETTE`] entry perceptually closest to an RGB value
fn nearest_standard(r: u8, g: u8, b: u8) -> u8 {
    let mut best = 0u8;
    let mut best_distance = u32::MAX;
    for (idx, &(pr, pg, pb)) in CONSOLE_PALETTE.iter().enumerate() {
        let distance = redmean_distance((r, g, b), (pr, pg, pb));
        if distance < best_distance {
            best_distance = distance;
            best = idx as u8;
        }
    }
    best
}

/// Squared "redmean" color distance, weighting channels by the mean red level
fn redmean_distance(a: (u8, u8, u8), b: (u8, u8, u8)) -> u32 {
    let red_mean = (u32::from(a.0) + u32::from(b.0)) / 2;
    let dr = i32::from(a.0) - i32::from(b.0);
    let dg = i32::from(a.1) - i32::from(b.1);
    let db = i32::from(a.2) - i32::from(b.2);
    let (dr2, dg2, db2) = ((dr * dr) as u32, (dg * dg) as u32, (db * db) as u32);
    (((512 + red_mean) * dr2) >> 8) + 4 * dg2 + (((767 - red_mean) * db2) >> 8)
}

/// Convert a 256-color index to RGB values using xterm palette
fn index_to_rgb(index: u8) -> (u8, u8, u8) {
    match index {
        0..=15 => CONSOLE_PALETTE[usize::from(index)],

        // 6x6x6 color cube (16-231)
        16..=231 => {
            let idx = index - 16;
            let r = idx / 36;
            let g = (idx % 36) / 6;
            let b = idx % 6;
            let to_val = |v: u8| if v == 0 { 0 } else { 55 + v * 40 };
            (to_val(r), to_val(g), to_val(b))
        }

        // Grayscale (232-255)
        232..=255 => {
            let gray = 8 + (index - 232) * 10;
            (gray, gray, gray)
        }
    }
}
