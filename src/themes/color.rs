use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CodefenceResult, Error};

/// RGBA color with 8-bit components
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub struct Color {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

fn parse_hex_component(hex: &str, original: &str) -> CodefenceResult<u8> {
    u8::from_str_radix(hex, 16).map_err(|_| Error::InvalidHexColor {
        value: original.to_string(),
        reason: format!("invalid hex component '{}'", hex),
    })
}

impl Color {
    pub(crate) const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };
    pub(crate) const BLACK: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Outputs the hex value for that colour.
    #[inline]
    pub fn as_hex(&self) -> String {
        self.to_string()
    }

    /// Creates a Color from a string (in theory a hex but it can also be black/white).
    ///
    /// Errors if the string is not a valid hex colour.
    pub fn from_hex(hex: &str) -> CodefenceResult<Self> {
        let original = hex;
        let hex = hex.trim_start_matches('#');

        if hex.eq_ignore_ascii_case("white") {
            return Ok(Color::WHITE);
        } else if hex.eq_ignore_ascii_case("black") {
            return Ok(Color::BLACK);
        }
        if !hex.is_ascii() {
            return Err(Error::InvalidHexColor {
                value: original.to_string(),
                reason: "non-ASCII characters".to_string(),
            });
        }
        // Parse based on length
        match hex.len() {
            // #RGB format (e.g., #F00 for red)
            3 => {
                let r = parse_hex_component(&hex[0..1], original)?;
                let g = parse_hex_component(&hex[1..2], original)?;
                let b = parse_hex_component(&hex[2..3], original)?;
                Ok(Color::new(r * 17, g * 17, b * 17, 255))
            }
            // #RGBA format (e.g., #F00F for red with full opacity)
            4 => {
                let r = parse_hex_component(&hex[0..1], original)?;
                let g = parse_hex_component(&hex[1..2], original)?;
                let b = parse_hex_component(&hex[2..3], original)?;
                let a = parse_hex_component(&hex[3..4], original)?;
                Ok(Color::new(r * 17, g * 17, b * 17, a * 17))
            }
            // #RRGGBB format (e.g., #FF0000 for red)
            6 => {
                let r = parse_hex_component(&hex[0..2], original)?;
                let g = parse_hex_component(&hex[2..4], original)?;
                let b = parse_hex_component(&hex[4..6], original)?;
                Ok(Color::new(r, g, b, 255))
            }
            // #RRGGBBAA format (e.g., #FF0000FF for red with full opacity)
            8 => {
                let r = parse_hex_component(&hex[0..2], original)?;
                let g = parse_hex_component(&hex[2..4], original)?;
                let b = parse_hex_component(&hex[4..6], original)?;
                let a = parse_hex_component(&hex[6..8], original)?;
                Ok(Color::new(r, g, b, a))
            }
            _ => Err(Error::InvalidHexColor {
                value: original.to_string(),
                reason: format!("invalid length {}", hex.len()),
            }),
        }
    }
}

/// Writes the uppercase hex form, only including the alpha if the color isn't opaque.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a < 255 {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_parse_hex_colors() {
        let inputs = vec![
            // 3-digit RGB
            ("#F00", Color::new(255, 0, 0, 255)),
            ("#369", Color::new(51, 102, 153, 255)),
            // 4-digit RGBA
            ("#0008", Color::new(0, 0, 0, 136)),
            // 6-digit RGB
            ("#123456", Color::new(0x12, 0x34, 0x56, 255)),
            ("abcdef", Color::new(0xAB, 0xCD, 0xEF, 255)),
            // 8-digit RGBA
            ("#FF00FF80", Color::new(255, 0, 255, 128)),
            // Named
            ("white", Color::WHITE),
            ("#black", Color::BLACK),
        ];

        for (input, expected) in inputs {
            assert_eq!(Color::from_hex(input).unwrap(), expected, "Mismatch for {input}");
        }
    }

    #[test]
    fn rejects_invalid_hex_colors() {
        for input in ["", "#", "#12", "#12345", "#GGGGGG", "#1234567", "#ééé"] {
            assert!(
                matches!(Color::from_hex(input), Err(Error::InvalidHexColor { .. })),
                "Expected an error for {input:?}"
            );
        }
    }

    #[test]
    fn outputs_uppercase_hex() {
        assert_eq!(Color::from_hex("#a1b2c3").unwrap().as_hex(), "#A1B2C3");
        assert_eq!(Color::from_hex("#a1b2c380").unwrap().as_hex(), "#A1B2C380");
        assert_eq!(Color::from_hex("#fff").unwrap().as_hex(), "#FFFFFF");
    }
}
