use serde::{Deserialize, Deserializer};

use crate::error::CodefenceResult;
use crate::themes::compiled::Theme;

/// Token color settings from VSCode theme JSON
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TokenColorSettings {
    foreground: Option<String>,
    background: Option<String>,
    #[serde(rename = "fontStyle")]
    pub font_style: Option<String>,
}

fn color_value(value: &Option<String>) -> Option<&str> {
    match value.as_deref().map(str::trim) {
        Some("") | Some("inherit") | None => None,
        Some(s) => Some(s),
    }
}

impl TokenColorSettings {
    pub fn foreground(&self) -> Option<&str> {
        color_value(&self.foreground)
    }

    pub fn background(&self) -> Option<&str> {
        color_value(&self.background)
    }
}

/// Custom deserializer for scope field that can be string or array
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct ScopeVisitor;

    impl<'de> Visitor<'de> for ScopeVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("string or array of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_owned()])
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(ScopeVisitor)
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenColorRule {
    #[serde(deserialize_with = "deserialize_string_or_vec", default)]
    pub scope: Vec<String>,
    #[serde(default)]
    pub settings: TokenColorSettings,
}

impl TokenColorRule {
    /// Every selector of that rule: a scope string can itself hold several comma-separated
    /// selectors.
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.scope
            .iter()
            .flat_map(|s| s.split(','))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Raw theme as found in a VSCode theme JSON
#[derive(Debug, Clone, Deserialize)]
pub struct RawTheme {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub type_: Option<String>,
    /// Token color rules for syntax highlighting
    #[serde(rename = "tokenColors", default)]
    pub token_colors: Vec<TokenColorRule>,
}

impl RawTheme {
    pub fn from_json(json: &str) -> CodefenceResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Compile this raw theme into a theme we can match scopes against
    pub fn compile(self) -> CodefenceResult<Theme> {
        Theme::from_raw_theme(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_deserialize_scope_variants() {
        let raw = RawTheme::from_json(
            r##"{
                "name": "test",
                "type": "dark",
                "tokenColors": [
                    {"settings": {"foreground": "#FFFFFF"}},
                    {"scope": "comment", "settings": {"foreground": "#888", "fontStyle": "italic"}},
                    {"scope": "string, constant.numeric", "settings": {"background": "inherit"}},
                    {"scope": ["keyword", "storage.type"], "settings": {"foreground": ""}}
                ]
            }"##,
        )
        .unwrap();

        assert_eq!(raw.name, "test");
        assert_eq!(raw.type_.as_deref(), Some("dark"));
        let selectors: Vec<Vec<&str>> = raw
            .token_colors
            .iter()
            .map(|rule| rule.selectors().collect())
            .collect();
        assert_eq!(
            selectors,
            vec![
                vec![],
                vec!["comment"],
                vec!["string", "constant.numeric"],
                vec!["keyword", "storage.type"],
            ]
        );

        let settings = &raw.token_colors[1].settings;
        assert_eq!(settings.foreground(), Some("#888"));
        assert_eq!(settings.font_style.as_deref(), Some("italic"));
        assert_eq!(raw.token_colors[2].settings.background(), None);
        assert_eq!(raw.token_colors[3].settings.foreground(), None);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(matches!(
            RawTheme::from_json("{\"tokenColors\": 1}"),
            Err(crate::Error::Json(_))
        ));
    }
}
