use std::fmt;
use std::ops::RangeInclusive;
use std::sync::OnceLock;

use onig::Regex;

use crate::options::HighlightConfig;

/// `<language>[:(no-)line-numbers(=N)][{ranges}][[group]]`, spaces already removed.
const INFO_PATTERN: &str = r"(?i)([a-z]+)(?::((?:no-)?line-numbers(?:=(\d+))?))?(?:\{(\d+(?:-\d+)?(?:,\d+(?:-\d+)?)*)\})?(?:\[(\w+)\])?";
/// `// [!code d1 d2 ...]` at the very end of a line.
const DIRECTIVE_COMMENT_PATTERN: &str = r"(?i)//\s+\[!code((?:\s+[^\s\]]+)+)\s*\]\s*$";

const LANGUAGE_GROUP: usize = 1;
const LINE_NUMBERS_GROUP: usize = 2;
const STARTING_LINE_GROUP: usize = 3;
const HIGHLIGHTS_GROUP: usize = 4;
const CODE_GROUP_GROUP: usize = 5;
const DIRECTIVES_GROUP: usize = 1;

fn compiled(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

fn info_regex() -> Option<&'static Regex> {
    static INFO_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    compiled(&INFO_REGEX, INFO_PATTERN)
}

fn directive_comment_regex() -> Option<&'static Regex> {
    static DIRECTIVE_COMMENT_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    compiled(&DIRECTIVE_COMMENT_REGEX, DIRECTIVE_COMMENT_PATTERN)
}

/// Whether a block shows line numbers, and where they start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineNumbering {
    #[default]
    Disabled,
    Enabled { start: usize },
}

/// Everything we extracted from the info string of a fence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceInfo {
    pub language: String,
    pub line_numbering: LineNumbering,
    /// 0-based line indices, inclusive on both ends. They can overlap.
    pub highlight_ranges: Vec<RangeInclusive<usize>>,
    /// The code group this block belongs to, used for tabbed snippets
    pub group: Option<String>,
}

impl FenceInfo {
    /// Whether the fence asked for the given line to be highlighted.
    /// Ranges going past the end of the block simply never match.
    pub fn is_highlighted(&self, line_index: usize) -> bool {
        self.highlight_ranges
            .iter()
            .any(|r| r.contains(&line_index))
    }
}

/// Writes the info string back in its normalized form, which parses to the same `FenceInfo`
/// whatever the configuration.
impl fmt::Display for FenceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.language)?;
        match self.line_numbering {
            LineNumbering::Disabled => f.write_str(":no-line-numbers")?,
            LineNumbering::Enabled { start } => write!(f, ":line-numbers={start}")?,
        }
        if !self.highlight_ranges.is_empty() {
            f.write_str("{")?;
            for (i, range) in self.highlight_ranges.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                if range.start() == range.end() {
                    write!(f, "{}", range.start())?;
                } else {
                    write!(f, "{}-{}", range.start(), range.end())?;
                }
            }
            f.write_str("}")?;
        }
        if let Some(group) = &self.group {
            write!(f, "[{group}]")?;
        }
        Ok(())
    }
}

fn parse_range(s: &str) -> Option<RangeInclusive<usize>> {
    match s.find('-') {
        Some(dash) => {
            let mut from = s[..dash].parse().ok()?;
            let mut to = s[dash + 1..].parse().ok()?;
            if to < from {
                std::mem::swap(&mut from, &mut to);
            }
            Some(from..=to)
        }
        None => {
            let val = s.parse().ok()?;
            Some(val..=val)
        }
    }
}

/// Parses an info string, eg `rust:line-numbers=5{1-3,7}[example]`.
///
/// The info string needs to have its whitespace removed already.
/// Returns `None` only if no language could be found: every other part is optional and is
/// ignored if malformed.
pub fn parse_fence_info(info: &str, config: &HighlightConfig) -> Option<FenceInfo> {
    let captures = info_regex()?.captures(info)?;
    let group_text = |idx: usize| captures.pos(idx).map(|(start, end)| &info[start..end]);

    let language = group_text(LANGUAGE_GROUP)?.to_string();

    let line_numbering = match group_text(LINE_NUMBERS_GROUP) {
        Some(option) if option[..3].eq_ignore_ascii_case("no-") => LineNumbering::Disabled,
        Some(_) => LineNumbering::Enabled {
            start: group_text(STARTING_LINE_GROUP)
                .and_then(|s| s.parse().ok())
                .unwrap_or(0),
        },
        None if config.line_numbers_by_default => LineNumbering::Enabled { start: 0 },
        None => LineNumbering::Disabled,
    };

    let highlight_ranges = group_text(HIGHLIGHTS_GROUP)
        .map(|ranges| ranges.split(',').filter_map(parse_range).collect())
        .unwrap_or_default();

    let group = group_text(CODE_GROUP_GROUP).map(|s| s.to_string());

    Some(FenceInfo {
        language,
        line_numbering,
        highlight_ranges,
        group,
    })
}

/// A source line split between the code to highlight and its trailing directives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDirectives<'l> {
    /// The line without the directive comment, everything before it is kept as is
    pub code: &'l str,
    /// Directive tokens, in source order
    pub directives: Vec<&'l str>,
}

/// Finds a trailing `// [!code ...]` comment, case-insensitive, and removes it from the line.
pub fn parse_and_remove_directives(line: &str) -> LineDirectives<'_> {
    let no_directives = LineDirectives {
        code: line,
        directives: Vec::new(),
    };
    let Some(regex) = directive_comment_regex() else {
        return no_directives;
    };
    let Some(captures) = regex.captures(line) else {
        return no_directives;
    };

    match (captures.pos(0), captures.pos(DIRECTIVES_GROUP)) {
        (Some((comment_start, _)), Some((start, end))) => LineDirectives {
            code: &line[..comment_start],
            directives: line[start..end].split_whitespace().collect(),
        },
        _ => no_directives,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(info: &str) -> Option<FenceInfo> {
        parse_fence_info(info, &HighlightConfig::default())
    }

    #[test]
    fn patterns_compile() {
        assert!(info_regex().is_some());
        assert!(directive_comment_regex().is_some());
    }

    #[test]
    fn test_language_only() {
        let result = parse("rust").unwrap();
        assert_eq!(result.language, "rust");
        assert_eq!(result.line_numbering, LineNumbering::Disabled);
        assert!(result.highlight_ranges.is_empty());
        assert_eq!(result.group, None);
    }

    #[test]
    fn test_not_recognized() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("123"), None);
        assert_eq!(parse("{1-2}"), None);
    }

    #[test]
    fn test_line_numbers() {
        let result = parse("python:line-numbers").unwrap();
        assert_eq!(result.language, "python");
        assert_eq!(result.line_numbering, LineNumbering::Enabled { start: 0 });

        let result = parse("python:line-numbers=12").unwrap();
        assert_eq!(result.line_numbering, LineNumbering::Enabled { start: 12 });
    }

    #[test]
    fn test_line_numbers_default_from_config() {
        let config = HighlightConfig::default().line_numbers_by_default(true);
        let result = parse_fence_info("js", &config).unwrap();
        assert_eq!(result.line_numbering, LineNumbering::Enabled { start: 0 });

        let result = parse_fence_info("js:no-line-numbers", &config).unwrap();
        assert_eq!(result.line_numbering, LineNumbering::Disabled);

        let result = parse_fence_info("js:line-numbers=3", &config).unwrap();
        assert_eq!(result.line_numbering, LineNumbering::Enabled { start: 3 });
    }

    #[test]
    fn test_highlight_ranges() {
        let result = parse("rust{1-3,5,9-7}").unwrap();
        assert_eq!(result.highlight_ranges, vec![1..=3, 5..=5, 7..=9]);
        assert!(!result.is_highlighted(0));
        assert!(result.is_highlighted(1));
        assert!(result.is_highlighted(3));
        assert!(!result.is_highlighted(4));
        assert!(result.is_highlighted(8));
        assert!(!result.is_highlighted(100));
    }

    #[test]
    fn test_malformed_parts_are_ignored() {
        let result = parse("rust{1-3").unwrap();
        assert_eq!(result.language, "rust");
        assert!(result.highlight_ranges.is_empty());

        let result = parse("rust:line-numbers=").unwrap();
        assert_eq!(result.line_numbering, LineNumbering::Enabled { start: 0 });

        let result = parse("rust[]").unwrap();
        assert_eq!(result.group, None);
    }

    #[test]
    fn test_case_insensitive() {
        let result = parse("Rust:LINE-NUMBERS=4").unwrap();
        assert_eq!(result.language, "Rust");
        assert_eq!(result.line_numbering, LineNumbering::Enabled { start: 4 });

        let config = HighlightConfig::default().line_numbers_by_default(true);
        let result = parse_fence_info("rust:No-Line-Numbers", &config).unwrap();
        assert_eq!(result.line_numbering, LineNumbering::Disabled);
    }

    #[test]
    fn test_complex_combination() {
        let result = parse("ts:line-numbers=10{0-2,4}[npm]").unwrap();
        assert_eq!(
            result,
            FenceInfo {
                language: "ts".to_string(),
                line_numbering: LineNumbering::Enabled { start: 10 },
                highlight_ranges: vec![0..=2, 4..=4],
                group: Some("npm".to_string()),
            }
        );
    }

    #[test]
    fn normalized_info_reparses_to_same_value() {
        let inputs = [
            "rust",
            "rust:line-numbers",
            "rust:no-line-numbers{3}",
            "c:line-numbers=7{1-4,2,10-12}",
            "ts{0-1}[pnpm]",
            "shell:line-numbers=1[install]",
        ];
        for config in [
            HighlightConfig::default(),
            HighlightConfig::default().line_numbers_by_default(true),
        ] {
            for input in inputs {
                let parsed = parse_fence_info(input, &config).unwrap();
                let normalized = parsed.to_string();
                let reparsed = parse_fence_info(&normalized, &config).unwrap();
                assert_eq!(parsed, reparsed, "Mismatch for input: '{input}'");
                // and reparsing is stable when the configuration changes
                assert_eq!(
                    reparsed,
                    parse_fence_info(&normalized, &HighlightConfig::default()).unwrap()
                );
            }
        }
    }

    #[test]
    fn test_directives_are_extracted() {
        let base = "some text blah blah ";
        let line = format!("{base}// [!code focus -- error]");
        let result = parse_and_remove_directives(&line);
        assert_eq!(result.code, base);
        assert_eq!(result.directives, vec!["focus", "--", "error"]);
    }

    #[test]
    fn test_no_directives() {
        for line in [
            "let a = 1; // a regular comment",
            "let a = 1; // [!code focus] but not at the end",
            "let a = 1; //[!code focus]",
            "let a = 1; // [!code]",
            "",
        ] {
            let result = parse_and_remove_directives(line);
            assert_eq!(result.code, line);
            assert!(result.directives.is_empty(), "Unexpected directives in {line:?}");
        }
    }

    #[test]
    fn test_directive_comment_variants() {
        let result = parse_and_remove_directives("x = 1  // [!CODE Highlight  ++ ]   ");
        assert_eq!(result.code, "x = 1  ");
        assert_eq!(result.directives, vec!["Highlight", "++"]);

        let result = parse_and_remove_directives("// [!code line-numbers=100]");
        assert_eq!(result.code, "");
        assert_eq!(result.directives, vec!["line-numbers=100"]);

        // only the comment at the end of the line is taken
        let result = parse_and_remove_directives("a // [!code warning] // [!code error]");
        assert_eq!(result.code, "a // [!code warning] ");
        assert_eq!(result.directives, vec!["error"]);
    }
}
