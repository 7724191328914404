//! Packed console attribute word
//!
//! The bit layout follows wincon.h:
//!
//! ```text
//! FOREGROUND_BLUE       0x0001
//! FOREGROUND_GREEN      0x0002
//! FOREGROUND_RED        0x0004
//! FOREGROUND_INTENSITY  0x0008
//! BACKGROUND_BLUE       0x0010
//! BACKGROUND_GREEN      0x0020
//! BACKGROUND_RED        0x0040
//! BACKGROUND_INTENSITY  0x0080
//! ```
//!
//! Bits above 0x00FF (DBCS and grid-line flags) are carried through untouched.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Console attribute word: foreground nibble, background nibble, extra flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AttributeWord(pub u16);

impl AttributeWord {
    pub const FOREGROUND_BLUE: u16 = 0x0001;
    pub const FOREGROUND_GREEN: u16 = 0x0002;
    pub const FOREGROUND_RED: u16 = 0x0004;
    pub const FOREGROUND_INTENSITY: u16 = 0x0008;
    pub const BACKGROUND_BLUE: u16 = 0x0010;
    pub const BACKGROUND_GREEN: u16 = 0x0020;
    pub const BACKGROUND_RED: u16 = 0x0040;
    pub const BACKGROUND_INTENSITY: u16 = 0x0080;

    /// Light grey on black, what a fresh console starts with
    pub const CONSOLE_DEFAULT: AttributeWord = AttributeWord(0x0007);

    /// Pack two legacy color indices (0-15)
    pub fn from_colors(fg: u8, bg: u8) -> Self {
        AttributeWord(u16::from(fg & 0x0F) | (u16::from(bg & 0x0F) << 4))
    }

    /// Legacy foreground index (0-15)
    pub fn foreground(self) -> u8 {
        (self.0 & 0x000F) as u8
    }

    /// Legacy background index (0-15)
    pub fn background(self) -> u8 {
        ((self.0 >> 4) & 0x000F) as u8
    }

    pub fn bits(self) -> u16 {
        self.0
    }
}

impl fmt::Display for AttributeWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_and_unpack() {
        let attr = AttributeWord::from_colors(12, 4);
        assert_eq!(attr.bits(), 0x004C);
        assert_eq!(attr.foreground(), 12);
        assert_eq!(attr.background(), 4);
    }

    #[test]
    fn test_flag_layout() {
        // console 12 is bright blue, console 4 is red
        let attr = AttributeWord::from_colors(12, 4);
        assert_eq!(
            attr.bits(),
            AttributeWord::FOREGROUND_BLUE
                | AttributeWord::FOREGROUND_INTENSITY
                | AttributeWord::BACKGROUND_RED
        );
        let white_on_grey = AttributeWord::from_colors(7, 8);
        assert_eq!(
            white_on_grey.bits(),
            AttributeWord::FOREGROUND_RED
                | AttributeWord::FOREGROUND_GREEN
                | AttributeWord::FOREGROUND_BLUE
                | AttributeWord::BACKGROUND_INTENSITY
        );
        assert_eq!(AttributeWord::BACKGROUND_BLUE | AttributeWord::BACKGROUND_GREEN, 0x30);
    }

    #[test]
    fn test_console_default() {
        let attr = AttributeWord::CONSOLE_DEFAULT;
        assert_eq!(attr.foreground(), 7);
        assert_eq!(attr.background(), 0);
    }

    #[test]
    fn test_unpack_ignores_high_flags() {
        // COMMON_LVB_UNDERSCORE set alongside bright white on blue
        let attr = AttributeWord(0x8000 | 0x001F);
        assert_eq!(attr.foreground(), 15);
        assert_eq!(attr.background(), 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(AttributeWord(0x1F).to_string(), "0x001f");
    }
}
