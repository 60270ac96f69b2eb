use serde::{Deserialize, Serialize};

use crate::error::CodefenceResult;
use crate::themes::raw::{RawTheme, TokenColorSettings};
use crate::themes::selector::{ThemeSelector, parse_selector};
use crate::themes::{Color, FontStyle, ThemeMatcher};

/// A style modifier with optional values: a theme rule doesn't have to set everything.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash, Serialize, Deserialize)]
pub struct StyleModifier {
    pub foreground: Option<Color>,
    pub background: Option<Color>,
    pub font_style: Option<FontStyle>,
}

impl TryFrom<&TokenColorSettings> for StyleModifier {
    type Error = crate::Error;

    fn try_from(settings: &TokenColorSettings) -> Result<Self, Self::Error> {
        let foreground = settings.foreground().map(Color::from_hex).transpose()?;
        let background = settings.background().map(Color::from_hex).transpose()?;
        let font_style = settings.font_style.as_deref().map(FontStyle::from_str);

        Ok(Self {
            foreground,
            background,
            font_style,
        })
    }
}

/// Theme type, only informative for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ThemeType {
    Light,
    #[default]
    Dark,
}

impl ThemeType {
    pub fn from_str(s: &str) -> ThemeType {
        if s.eq_ignore_ascii_case("light") {
            ThemeType::Light
        } else {
            ThemeType::Dark
        }
    }
}

#[derive(Debug, Clone)]
pub struct ThemeRule {
    pub selector: ThemeSelector,
    pub style_modifier: StyleModifier,
}

/// A theme ready to be matched against scope stacks.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub theme_type: ThemeType,
    /// In theme order: later rules win over earlier ones of the same specificity
    pub rules: Vec<ThemeRule>,
}

impl Theme {
    /// Builds a theme from the content of a VSCode theme JSON file.
    pub fn from_json(json: &str) -> CodefenceResult<Self> {
        RawTheme::from_json(json)?.compile()
    }

    pub fn from_raw_theme(raw_theme: RawTheme) -> CodefenceResult<Self> {
        let theme_type = raw_theme
            .type_
            .as_deref()
            .map(ThemeType::from_str)
            .unwrap_or_default();

        let mut rules = Vec::new();
        for token_rule in &raw_theme.token_colors {
            // Rules without scope are the global settings, we only care about tokens
            if token_rule.scope.is_empty() {
                continue;
            }
            let style_modifier = StyleModifier::try_from(&token_rule.settings)?;
            for selector in token_rule.selectors().filter_map(parse_selector) {
                rules.push(ThemeRule {
                    selector,
                    style_modifier,
                });
            }
        }

        Ok(Theme {
            name: raw_theme.name,
            theme_type,
            rules,
        })
    }
}

impl ThemeMatcher for Theme {
    /// Rules matching the innermost scope come first, then the ones matching its parents.
    /// At the same depth, more specific selectors come first and then later rules.
    fn match_scopes(&self, scopes: &[String]) -> Vec<StyleModifier> {
        // (depth, specificity, rule index)
        let mut matched: Vec<(usize, (usize, usize), usize)> = Vec::new();

        for depth in (1..=scopes.len()).rev() {
            let stack = &scopes[..depth];
            for (idx, rule) in self.rules.iter().enumerate() {
                if rule.selector.matches(stack) {
                    matched.push((depth, rule.selector.specificity(), idx));
                }
            }
        }

        matched.sort_by(|a, b| b.cmp(a));
        matched
            .into_iter()
            .map(|(_, _, idx)| self.rules[idx].style_modifier)
            .collect()
    }
}
