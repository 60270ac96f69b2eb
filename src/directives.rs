//! The per-line state machine driven by `// [!code ...]` directives.
//!
//! Directives are applied in order and every guard looks at the status as it is at that point,
//! so `highlight error` ends up as an error line while `-- ++` stays a removed line.

use std::ops::RangeInclusive;

use crate::error::{CodefenceResult, Error};
use crate::markdown_fence::LineNumbering;

/// How a line is decorated, from lowest to highest priority except for the two diff statuses
/// which are exclusive: whichever comes first sticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum LineStatus {
    #[default]
    None,
    Simple,
    Warning,
    Error,
    DiffAdd,
    DiffRemove,
}

impl LineStatus {
    /// Returns the status after applying a directive.
    /// Directives that don't touch the status leave it as is.
    pub fn with_directive(self, directive: Directive) -> LineStatus {
        match directive {
            Directive::Error if !matches!(self, LineStatus::DiffAdd | LineStatus::DiffRemove) => {
                LineStatus::Error
            }
            Directive::Warning if matches!(self, LineStatus::None | LineStatus::Simple) => {
                LineStatus::Warning
            }
            Directive::DiffRemove if self != LineStatus::DiffAdd => LineStatus::DiffRemove,
            Directive::DiffAdd if self != LineStatus::DiffRemove => LineStatus::DiffAdd,
            Directive::Highlight if self == LineStatus::None => LineStatus::Simple,
            _ => self,
        }
    }

    /// The CSS classes added to the line wrapper, after `line`.
    pub fn css_classes(self) -> &'static str {
        match self {
            LineStatus::None => "",
            LineStatus::Simple => " highlighted",
            LineStatus::Warning => " highlighted warning",
            LineStatus::Error => " highlighted error",
            LineStatus::DiffAdd => " highlighted diff add",
            LineStatus::DiffRemove => " highlighted diff remove",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Error,
    Warning,
    /// `--`
    DiffRemove,
    /// `++`
    DiffAdd,
    Highlight,
    Focus,
    NoLineNumbers,
    /// `line-numbers` or `line-numbers=N`
    LineNumbers(Option<usize>),
}

const LINE_NUMBERS: &str = "line-numbers";

impl Directive {
    /// Parses a single directive token, ignoring ASCII case.
    pub fn parse(token: &str) -> Option<Directive> {
        let directive = match token {
            "--" => Directive::DiffRemove,
            "++" => Directive::DiffAdd,
            t if t.eq_ignore_ascii_case("error") => Directive::Error,
            t if t.eq_ignore_ascii_case("warning") => Directive::Warning,
            t if t.eq_ignore_ascii_case("highlight") => Directive::Highlight,
            t if t.eq_ignore_ascii_case("focus") => Directive::Focus,
            t if t.eq_ignore_ascii_case("no-line-numbers") => Directive::NoLineNumbers,
            t => {
                let rest = t
                    .get(..LINE_NUMBERS.len())
                    .filter(|prefix| prefix.eq_ignore_ascii_case(LINE_NUMBERS))
                    .map(|_| &t[LINE_NUMBERS.len()..])?;
                if rest.is_empty() {
                    Directive::LineNumbers(None)
                } else {
                    let number = rest.strip_prefix('=')?;
                    if !number.bytes().all(|b| b.is_ascii_digit()) {
                        return None;
                    }
                    Directive::LineNumbers(Some(number.parse().ok()?))
                }
            }
        };
        Some(directive)
    }
}

/// The render state of a single line, built fresh for every line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineState {
    pub status: LineStatus,
    pub focus: bool,
    pub line_number: Option<usize>,
}

/// What the directives of a line produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineOutcome {
    pub state: LineState,
    /// Line numbers jumped over by `line-numbers=N` directives, rendered before the line
    pub skipped: Vec<RangeInclusive<usize>>,
}

/// State carried from one line to the next within a block.
///
/// Line numbering and its offset are sticky: a directive changing them affects every following
/// line until another directive changes them again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockState {
    pub numbering_enabled: bool,
    /// The number the current line gets if numbering is enabled. It advances on every line,
    /// numbered or not, so numbers keep following the source.
    /// `None` once numbers went past `usize::MAX`: lines are left unnumbered until a
    /// `line-numbers=N` directive sets a new number.
    pub next_line_number: Option<usize>,
    pub any_focused: bool,
    pub any_numbered: bool,
}

impl BlockState {
    pub fn new(numbering: LineNumbering) -> Self {
        match numbering {
            LineNumbering::Disabled => Self {
                numbering_enabled: false,
                next_line_number: Some(0),
                any_focused: false,
                any_numbered: false,
            },
            LineNumbering::Enabled { start } => Self {
                numbering_enabled: true,
                next_line_number: Some(start),
                any_focused: false,
                any_numbered: true,
            },
        }
    }

    /// Applies the directive tokens of the line at `line_index`, in order, starting from
    /// `initial` (the status coming from the fence highlight ranges).
    ///
    /// Errors on the first token that isn't a known directive.
    pub fn apply_directives(
        &mut self,
        line_index: usize,
        initial: LineStatus,
        tokens: &[&str],
    ) -> CodefenceResult<LineOutcome> {
        let mut state = LineState {
            status: initial,
            ..Default::default()
        };
        let mut skipped = Vec::new();

        for token in tokens {
            let directive = Directive::parse(token).ok_or_else(|| Error::UnknownDirective {
                directive: (*token).to_string(),
                line: line_index,
            })?;
            state.status = state.status.with_directive(directive);

            match directive {
                Directive::Focus => {
                    state.focus = true;
                    self.any_focused = true;
                }
                Directive::NoLineNumbers => self.numbering_enabled = false,
                Directive::LineNumbers(jump) => {
                    self.numbering_enabled = true;
                    self.any_numbered = true;
                    if let Some(target) = jump {
                        if let Some(next) = self.next_line_number
                            && target > next
                        {
                            skipped.push(next..=target - 1);
                        }
                        self.next_line_number = Some(target);
                    }
                }
                _ => {}
            }
        }

        if self.numbering_enabled {
            state.line_number = self.next_line_number;
        }
        self.next_line_number = self.next_line_number.and_then(|n| n.checked_add(1));

        Ok(LineOutcome { state, skipped })
    }
}
