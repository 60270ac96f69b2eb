/// Whether `selector` matches `scope` on a dot boundary: `string` matches `string.quoted`
/// but not `strings`.
pub fn scope_matches(selector: &str, scope: &str) -> bool {
    match scope.strip_prefix(selector) {
        Some(rest) => rest.is_empty() || rest.starts_with('.'),
        None => false,
    }
}

/// Represents a parent scope requirement in a theme selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parent {
    /// Parent scope that can appear anywhere up the scope stack
    /// `Anywhere(source.js)` from "source.js meta.function" - can have scopes between
    Anywhere(String),
    /// Parent scope that must be the immediate parent (child combinator `>`)
    /// `Direct(meta.function)` from "meta.function > string" - must be immediate parent
    Direct(String),
}

/// A parsed theme selector that is used to match against scope stacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeSelector {
    /// The target scope to match (rightmost in the selector string)
    pub target_scope: String,
    /// Required parent scopes from right to left of the selector
    pub parent_scopes: Vec<Parent>,
}

impl ThemeSelector {
    pub fn new(target_scope: String, parent_scopes: Vec<Parent>) -> Self {
        Self {
            target_scope,
            parent_scopes,
        }
    }

    /// Used to order matching rules: more atoms in the target then more parents win.
    pub fn specificity(&self) -> (usize, usize) {
        (
            self.target_scope.split('.').count(),
            self.parent_scopes.len(),
        )
    }

    /// Checks if this selector matches the given scope stack.
    ///
    /// 1. The target scope must match the last scope in the stack
    /// 2. All parent scope requirements must be satisfied walking up the stack
    /// 3. `Parent::Anywhere` can skip intermediate scopes
    /// 4. `Parent::Direct` requires immediate parent relationship
    pub fn matches<S: AsRef<str>>(&self, scope_stack: &[S]) -> bool {
        let Some((last, mut rest)) = scope_stack.split_last() else {
            return false;
        };
        if !scope_matches(&self.target_scope, last.as_ref()) {
            return false;
        }

        for parent in &self.parent_scopes {
            match parent {
                Parent::Direct(parent_scope) => match rest.split_last() {
                    Some((last, r)) if scope_matches(parent_scope, last.as_ref()) => rest = r,
                    _ => return false,
                },
                Parent::Anywhere(parent_scope) => {
                    match rest
                        .iter()
                        .rposition(|scope| scope_matches(parent_scope, scope.as_ref()))
                    {
                        Some(pos) => rest = &rest[..pos],
                        None => return false,
                    }
                }
            }
        }

        true
    }
}

/// Parses a theme selector string into a structured ThemeSelector.
///
/// # Selector Format
/// - Scopes are separated by whitespace: `"source.js meta.function string"`
/// - Child combinator `>` creates direct parent requirement: `"parent > child"`
/// - Target scope is always the rightmost non-`>` token
///
/// Returns `None` if the selector string is invalid or empty
pub fn parse_selector(input: &str) -> Option<ThemeSelector> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    let (last, rest) = parts.split_last()?;
    if *last == ">" {
        return None;
    }

    let mut parents = Vec::new();
    let mut is_direct = false;
    for part in rest.iter().rev() {
        if *part == ">" {
            is_direct = true;
            continue;
        }
        parents.push(if is_direct {
            Parent::Direct(part.to_string())
        } else {
            Parent::Anywhere(part.to_string())
        });
        is_direct = false;
    }

    Some(ThemeSelector::new(last.to_string(), parents))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selector() {
        let test_cases = vec![
            (
                "comment",
                ThemeSelector::new("comment".to_string(), vec![]),
            ),
            (
                "source.js meta.function string",
                ThemeSelector::new(
                    "string".to_string(),
                    vec![
                        Parent::Anywhere("meta.function".to_string()),
                        Parent::Anywhere("source.js".to_string()),
                    ],
                ),
            ),
            (
                "  source.js   meta.function  >   string  ",
                ThemeSelector::new(
                    "string".to_string(),
                    vec![
                        Parent::Direct("meta.function".to_string()),
                        Parent::Anywhere("source.js".to_string()),
                    ],
                ),
            ),
        ];

        for (input, expected) in test_cases {
            let result = parse_selector(input).unwrap();
            assert_eq!(result, expected, "Mismatch for input: '{}'", input);
        }

        assert_eq!(parse_selector(""), None);
        assert_eq!(parse_selector("string >"), None);
    }

    #[test]
    fn test_selector_matches() {
        let test_cases = vec![
            // (selector_string, scope_stack, expected_match)
            ("comment", vec!["source.js", "comment.line"], true),
            ("comment", vec!["source.js", "string.quoted"], false),
            ("comment", vec!["source.js", "comments"], false),
            ("source.js string", vec!["source.js", "string.quoted"], true),
            ("source.js string", vec!["source.py", "string.quoted"], false),
            (
                "meta.function > string",
                vec!["source.js", "meta.function", "string.quoted"],
                true,
            ),
            (
                "meta.function > string",
                vec!["source.js", "meta.function", "punctuation", "string.quoted"],
                false,
            ),
            (
                "source > meta > string",
                vec!["source.js", "punctuation", "meta.function", "string.quoted"],
                false,
            ),
            ("comment", vec![], false),
            ("meta.function > string", vec!["meta.function"], false),
        ];

        for (selector_str, scope_stack, expected) in test_cases {
            let selector = parse_selector(selector_str).unwrap();
            assert_eq!(
                selector.matches(&scope_stack),
                expected,
                "Selector '{}' matching scope stack {:?}",
                selector_str,
                scope_stack
            );
        }
    }

    #[test]
    fn test_specificity() {
        assert_eq!(parse_selector("string").unwrap().specificity(), (1, 0));
        assert_eq!(
            parse_selector("source.js string.quoted.double").unwrap().specificity(),
            (3, 1)
        );
    }
}
