use std::fmt::{self, Write};

use serde::{Deserialize, Serialize};

#[derive(
    Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Debug,
)]
pub struct FontStyle {
    bits: u8,
}

impl FontStyle {
    /// Bold font style
    pub const BOLD: Self = Self { bits: 1 };
    /// Underline font style
    pub const UNDERLINE: Self = Self { bits: 2 };
    /// Italic font style
    pub const ITALIC: Self = Self { bits: 4 };
    /// Strikethrough font style
    pub const STRIKETHROUGH: Self = Self { bits: 8 };

    /// Returns an empty set of flags
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Returns `true` if no flags are currently stored
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Returns `true` if all of the flags in `other` are contained within `self`
    pub const fn contains(&self, other: Self) -> bool {
        (self.bits & other.bits) == other.bits
    }

    /// Returns the font style from a theme font style string.
    /// An empty string gives an empty font style, which is still a value.
    pub fn from_str(font_style_str: &str) -> Self {
        let mut font_style = Self::empty();
        if font_style_str.contains("bold") {
            font_style.insert(FontStyle::BOLD);
        }
        if font_style_str.contains("italic") {
            font_style.insert(FontStyle::ITALIC);
        }
        if font_style_str.contains("underline") {
            font_style.insert(FontStyle::UNDERLINE);
        }
        if font_style_str.contains("strikethrough") {
            font_style.insert(FontStyle::STRIKETHROUGH);
        }
        font_style
    }

    /// Inserts the specified flags in-place
    pub fn insert(&mut self, other: Self) {
        self.bits |= other.bits;
    }

    /// Writes the inline CSS declarations for that font style, nothing if empty.
    pub fn write_css(&self, out: &mut impl Write) -> fmt::Result {
        if self.contains(FontStyle::ITALIC) {
            out.write_str("font-style:italic;")?;
        }
        if self.contains(FontStyle::BOLD) {
            out.write_str("font-weight:700;")?;
        }
        if self.contains(FontStyle::UNDERLINE) || self.contains(FontStyle::STRIKETHROUGH) {
            out.write_str("text-decoration-line:")?;
            if self.contains(FontStyle::UNDERLINE) {
                out.write_str(" underline")?;
            }
            if self.contains(FontStyle::STRIKETHROUGH) {
                out.write_str(" line-through")?;
            }
            out.write_char(';')?;
        }
        Ok(())
    }
}
