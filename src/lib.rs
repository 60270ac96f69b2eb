mod block;
mod directives;
mod error;
mod highlight;
mod markdown_fence;
mod options;
mod renderers;
mod themes;
mod tokenizer;
mod writer;

pub use block::{BlockKind, CODE_GROUP_DATA_KEY, CodeBlock, FallbackRenderer, PlainFallback};
pub use directives::{BlockState, Directive, LineOutcome, LineState, LineStatus};
pub use error::Error;
pub use highlight::{FallbackReason, Rendered, SyntaxHighlighter};
pub use markdown_fence::{
    FenceInfo, LineDirectives, LineNumbering, parse_and_remove_directives, parse_fence_info,
};
pub use options::HighlightConfig;
pub use renderers::html::GutterEntry;
pub use themes::{
    Color, DualTheme, FontStyle, Parent, RawTheme, StyleCache, StyleModifier, StyleResolution,
    Stylist, Theme, ThemeMatcher, ThemeRule, ThemeSelector, ThemeType, TokenColorRule,
    TokenColorSettings, parse_selector, resolve_style, resolve_theme, scope_matches,
};
pub use tokenizer::{LineTokenizer, PLAIN_SCOPE, PlainTokenizer, Token, Tokenizer};
pub use writer::OutputBuffer;

/// The stylesheet matching the generated HTML.
///
/// Colors are set as custom properties for both themes: the light ones are used by default and
/// the dark ones when the user prefers a dark color scheme.
pub const CODEFENCE_CSS: &str = r#".codefence {
  position: relative;
  display: flex;
}
.codefence code {
  flex: 1;
  order: 2;
}
.codefence .line {
  display: block;
}
.codefence .line:empty::after {
  content: "\200b";
}
.codefence span {
  color: var(--color-light, inherit);
  background-color: var(--bg-light, transparent);
}
@media (prefers-color-scheme: dark) {
  .codefence span {
    color: var(--color-dark, inherit);
    background-color: var(--bg-dark, transparent);
  }
}
.codefence .line.highlighted {
  background-color: rgba(142, 150, 170, 0.14);
}
.codefence .line.highlighted.warning {
  background-color: rgba(234, 179, 8, 0.16);
}
.codefence .line.highlighted.error {
  background-color: rgba(244, 63, 94, 0.16);
}
.codefence .line.diff.add {
  background-color: rgba(16, 185, 129, 0.16);
}
.codefence .line.diff.remove {
  background-color: rgba(244, 63, 94, 0.16);
  opacity: 0.7;
}
.codefence.has-focused-lines .line:not(.has-focus) {
  filter: blur(0.095rem);
  opacity: 0.7;
  transition: filter 0.35s, opacity 0.35s;
}
.codefence.has-focused-lines:hover .line:not(.has-focus) {
  filter: blur(0);
  opacity: 1;
}
.codefence .line.skipped-lines {
  font-style: italic;
  opacity: 0.8;
  user-select: none;
}
.codefence .line-numbers {
  order: 1;
  user-select: none;
  white-space: pre;
  margin-right: 0.4em;
  padding-right: 0.4em;
  min-width: 3ch;
  text-align: right;
  opacity: 0.8;
}
.codefence .line-numbers > span {
  display: block;
}
"#;
