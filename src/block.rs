use std::collections::BTreeMap;
use std::fmt::Write;

use crate::error::Error;
use crate::renderers::html::HtmlEscaped;

/// The data key under which the parsed code group name is stored on a block.
pub const CODE_GROUP_DATA_KEY: &str = "code-group-block-name";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Delimited by ``` or ~~~, can have an info string
    Fenced,
    /// Indented by 4 spaces, never highlighted
    Indented,
}

/// A code block as handed over by the markdown parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    pub kind: BlockKind,
    /// The first word after the fence
    pub info: Option<String>,
    /// Whatever comes after the first word
    pub arguments: Option<String>,
    pub lines: Vec<String>,
    /// Metadata attached by renderers for the ones coming after them
    pub data: BTreeMap<String, String>,
}

fn split_lines(content: &str) -> Vec<String> {
    let normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    let normalized = normalized.strip_suffix('\n').unwrap_or(&normalized);
    if normalized.is_empty() {
        return Vec::new();
    }
    normalized.split('\n').map(|l| l.to_string()).collect()
}

impl CodeBlock {
    pub fn fenced(info_line: &str, content: &str) -> Self {
        let info_line = info_line.trim();
        let (info, arguments) = match info_line.split_once(char::is_whitespace) {
            Some((info, arguments)) => (info, arguments.trim()),
            None => (info_line, ""),
        };
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());

        Self {
            kind: BlockKind::Fenced,
            info: non_empty(info),
            arguments: non_empty(arguments),
            lines: split_lines(content),
            data: BTreeMap::new(),
        }
    }

    pub fn indented(content: &str) -> Self {
        Self {
            kind: BlockKind::Indented,
            info: None,
            arguments: None,
            lines: split_lines(content),
            data: BTreeMap::new(),
        }
    }

    /// The info string as the fence info parser expects it: info and arguments glued together
    /// without any space, with every occurrence of the optional prefix removed.
    pub fn info_string(&self, prefix: Option<&str>) -> String {
        let info: String = self
            .info
            .iter()
            .chain(self.arguments.iter())
            .flat_map(|s| s.chars())
            .filter(|c| *c != ' ')
            .collect();

        match prefix.filter(|p| !p.is_empty()) {
            Some(prefix) => info.replace(prefix, ""),
            None => info,
        }
    }

    pub fn set_data(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.data.insert(key.into(), value.into());
    }

    pub fn data(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(|s| s.as_str())
    }

    /// The code group this block belongs to, if any.
    pub fn group(&self) -> Option<&str> {
        self.data(CODE_GROUP_DATA_KEY)
    }
}

/// Renders the blocks that cannot be highlighted.
pub trait FallbackRenderer {
    fn render_plain(&self, block: &CodeBlock, out: &mut String) -> Result<(), Error>;
}

/// Renders the code as-is in a `<pre><code>`, the way markdown renderers do for code blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainFallback;

impl FallbackRenderer for PlainFallback {
    fn render_plain(&self, block: &CodeBlock, out: &mut String) -> Result<(), Error> {
        out.push_str("<pre><code");
        if let Some(info) = &block.info {
            write!(out, " class=\"language-{}\"", HtmlEscaped(info))?;
        }
        out.push('>');
        for (idx, line) in block.lines.iter().enumerate() {
            if idx > 0 {
                out.push('\n');
            }
            write!(out, "{}", HtmlEscaped(line))?;
        }
        out.push_str("</code></pre>");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_build_fenced_block() {
        let block = CodeBlock::fenced("rust:line-numbers {1,3} [cargo]", "fn main() {\r\n}\r\n");
        assert_eq!(block.kind, BlockKind::Fenced);
        assert_eq!(block.info.as_deref(), Some("rust:line-numbers"));
        assert_eq!(block.arguments.as_deref(), Some("{1,3} [cargo]"));
        assert_eq!(block.lines, vec!["fn main() {", "}"]);
        assert_eq!(block.info_string(None), "rust:line-numbers{1,3}[cargo]");
    }

    #[test]
    fn only_one_trailing_newline_is_dropped() {
        let block = CodeBlock::fenced("c", "a\n\n");
        assert_eq!(block.lines, vec!["a", ""]);
        let block = CodeBlock::fenced("c", "a\rb");
        assert_eq!(block.lines, vec!["a", "b"]);
        assert!(CodeBlock::fenced("c", "").lines.is_empty());
    }

    #[test]
    fn info_string_prefix_is_removed() {
        let block = CodeBlock::fenced("language-rust", "");
        assert_eq!(block.info_string(Some("language-")), "rust");
        assert_eq!(block.info_string(Some("")), "language-rust");
        assert_eq!(block.info_string(Some("lang:")), "language-rust");
        assert_eq!(CodeBlock::indented("x").info_string(None), "");

        let block = CodeBlock::fenced("language-c:line-numbers {1} language-[tab]", "");
        assert_eq!(block.info_string(Some("language-")), "c:line-numbers{1}[tab]");
    }

    #[test]
    fn can_store_group() {
        let mut block = CodeBlock::fenced("", "x");
        assert_eq!(block.info, None);
        assert_eq!(block.group(), None);
        block.set_data(CODE_GROUP_DATA_KEY, "npm");
        assert_eq!(block.group(), Some("npm"));
        assert_eq!(block.data("other"), None);
    }

    #[test]
    fn plain_fallback_escapes_code() {
        let mut out = String::new();
        PlainFallback
            .render_plain(&CodeBlock::fenced("html", "<b>\n&"), &mut out)
            .unwrap();
        insta::assert_snapshot!(out, @r#"<pre><code class="language-html">&lt;b&gt;
&amp;</code></pre>"#);

        let mut out = String::new();
        PlainFallback
            .render_plain(&CodeBlock::indented("    x"), &mut out)
            .unwrap();
        assert_eq!(out, "<pre><code>    x</code></pre>");
    }
}
