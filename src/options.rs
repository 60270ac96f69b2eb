use serde::{Deserialize, Serialize};

/// Configuration shared by every block rendered by a [`crate::SyntaxHighlighter`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Whether blocks without a `:line-numbers`/`:no-line-numbers` option get line numbers
    pub line_numbers_by_default: bool,
    /// Prefix the document parser puts in front of the info string, eg `language-`.
    /// It is removed before parsing.
    pub info_prefix: Option<String>,
}

impl HighlightConfig {
    pub fn line_numbers_by_default(mut self, value: bool) -> Self {
        self.line_numbers_by_default = value;
        self
    }

    pub fn info_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.info_prefix = Some(prefix.into());
        self
    }
}
