use std::collections::HashMap;
use std::fmt::{self, Write};

use crate::themes::{FontStyle, StyleModifier, Stylist, ThemeMatcher};

/// The style of a token in both the light and dark themes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct StyleResolution {
    pub light: StyleModifier,
    pub dark: StyleModifier,
}

impl StyleResolution {
    /// The font style is only rendered when both themes agree on it.
    pub fn font_style(&self) -> Option<FontStyle> {
        if self.light.font_style == self.dark.font_style {
            self.light.font_style
        } else {
            None
        }
    }

    /// Writes the inline style declarations: the colors as CSS custom properties, swapped by
    /// the stylesheet depending on the color scheme, and the font style as-is.
    pub fn write_css(&self, out: &mut impl Write) -> fmt::Result {
        for (variant, style) in [("light", &self.light), ("dark", &self.dark)] {
            if let Some(fg) = style.foreground {
                write!(out, "--color-{variant}:{fg};")?;
            }
            if let Some(bg) = style.background {
                write!(out, "--bg-{variant}:{bg};")?;
            }
        }
        if let Some(font_style) = self.font_style() {
            font_style.write_css(out)?;
        }
        Ok(())
    }
}

/// Goes through the matching rules, most specific first, and keeps the first value found for
/// each attribute.
pub fn resolve_theme<M: ThemeMatcher + ?Sized>(theme: &M, scopes: &[String]) -> StyleModifier {
    let mut resolved = StyleModifier::default();

    for rule in theme.match_scopes(scopes) {
        if resolved.foreground.is_none() {
            resolved.foreground = rule.foreground;
        }
        if resolved.background.is_none() {
            resolved.background = rule.background;
        }
        if resolved.font_style.is_none() {
            resolved.font_style = rule.font_style;
        }
        if resolved.foreground.is_some()
            && resolved.background.is_some()
            && resolved.font_style.is_some()
        {
            break;
        }
    }

    resolved
}

pub fn resolve_style<M: ThemeMatcher + ?Sized>(
    light: &M,
    dark: &M,
    scopes: &[String],
) -> StyleResolution {
    StyleResolution {
        light: resolve_theme(light, scopes),
        dark: resolve_theme(dark, scopes),
    }
}

/// Memoizes style resolutions by scope stack.
///
/// Only valid as long as the themes don't change, which is why it lives next to the stylist.
#[derive(Debug, Clone, Default)]
pub struct StyleCache {
    cache: HashMap<Vec<String>, StyleResolution>,
}

impl StyleCache {
    pub fn resolve<S: Stylist>(&mut self, stylist: &S, scopes: &[String]) -> StyleResolution {
        if let Some(&cached) = self.cache.get(scopes) {
            return cached;
        }

        let style = resolve_style(stylist.light_theme(), stylist.dark_theme(), scopes);
        self.cache.insert(scopes.to_vec(), style);
        style
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
