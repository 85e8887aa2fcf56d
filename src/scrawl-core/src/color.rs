//! RGBA color representation.
//!
//! Colors are stored as 8-bit components, which is what both the terminal
//! backend and the draw journal consume. Configuration files spell colors as
//! hex strings (`#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ColorParseError;

/// An RGBA color with 8-bit components.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red component.
    pub r: u8,
    /// Green component.
    pub g: u8,
    /// Blue component.
    pub b: u8,
    /// Alpha component (0 = transparent, 255 = opaque).
    pub a: u8,
}

impl Color {
    /// Opaque black (#000000).
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Opaque white (#FFFFFF).
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Editor background (#212121).
    pub const CHARCOAL: Self = Self::rgb(33, 33, 33);

    /// Creates an opaque color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Creates a color with an explicit alpha component.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Returns true if the color is fully transparent.
    #[inline]
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Parses a color from a hex string.
    ///
    /// ```
    /// use scrawl_core::Color;
    ///
    /// assert_eq!(Color::from_hex("#212121").unwrap(), Color::CHARCOAL);
    /// assert_eq!(Color::from_hex("fff").unwrap(), Color::WHITE);
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);

        if hex.is_empty() {
            return Err(ColorParseError::EmptyInput);
        }
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidHexChar);
        }

        // Expand shorthand notation
        let expanded: String = match hex.len() {
            3 | 4 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => hex.to_string(),
            len => return Err(ColorParseError::InvalidLength(len)),
        };

        let component = |range: std::ops::Range<usize>| -> Result<u8, ColorParseError> {
            u8::from_str_radix(&expanded[range], 16).map_err(|_| ColorParseError::InvalidHexChar)
        };

        let r = component(0..2)?;
        let g = component(2..4)?;
        let b = component(4..6)?;
        let a = if expanded.len() == 8 {
            component(6..8)?
        } else {
            255
        };

        Ok(Self::rgba(r, g, b, a))
    }

    /// Formats the color as `#RRGGBB`, or `#RRGGBBAA` when not opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color({})", self.to_hex())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}
