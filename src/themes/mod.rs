mod color;
mod compiled;
mod font_style;
mod raw;
mod resolve;
mod selector;

pub use color::Color;
pub use compiled::{StyleModifier, Theme, ThemeRule, ThemeType};
pub use font_style::FontStyle;
pub use raw::{RawTheme, TokenColorRule, TokenColorSettings};
pub use resolve::{StyleCache, StyleResolution, resolve_style, resolve_theme};
pub use selector::{Parent, ThemeSelector, parse_selector, scope_matches};

/// The boundary with a theme engine.
pub trait ThemeMatcher {
    /// Returns the style rules matching a scope stack (outermost scope first),
    /// ordered from the most specific to the least specific.
    fn match_scopes(&self, scopes: &[String]) -> Vec<StyleModifier>;
}

/// Provides the light and dark themes code blocks are rendered with.
pub trait Stylist {
    type Theme: ThemeMatcher;

    fn light_theme(&self) -> &Self::Theme;
    fn dark_theme(&self) -> &Self::Theme;
}

/// The simplest stylist: two themes known upfront.
#[derive(Debug, Clone)]
pub struct DualTheme<T> {
    pub light: T,
    pub dark: T,
}

impl<T: ThemeMatcher> Stylist for DualTheme<T> {
    type Theme = T;

    fn light_theme(&self) -> &T {
        &self.light
    }

    fn dark_theme(&self) -> &T {
        &self.dark
    }
}
