//! The boundary with the grammar engine.
//!
//! The engine itself (grammar loading, regex matching...) lives outside of this crate: we only
//! need something that can turn a line into tokens given the state left by the previous line.

use std::collections::HashSet;
use std::ops::Range;

use crate::error::{CodefenceResult, Error};

/// The scope given to every token by the [`PlainTokenizer`]
pub const PLAIN_SCOPE: &str = "text.plain";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Byte span within the line (start inclusive, end exclusive, 0-based)
    pub span: Range<usize>,
    /// Hierarchical scope names, ordered from outermost to innermost
    /// (e.g., source.js -> string.quoted.double -> punctuation.definition.string).
    pub scopes: Vec<String>,
}

/// A grammar engine able to tokenize a line at a time.
pub trait Tokenizer {
    /// A handle on a loaded grammar
    type Grammar;
    /// Whatever the engine needs to carry from one line to the next (eg a rule stack)
    type State;

    /// Finds the grammar for a language name or alias.
    fn grammar(&self, language: &str) -> Option<Self::Grammar>;

    /// Tokenizes a single line (without its line ending).
    ///
    /// `state` is `None` for the first line of a block and the state returned for the previous
    /// line afterwards.
    fn tokenize_line(
        &self,
        grammar: &Self::Grammar,
        line: &str,
        state: Option<Self::State>,
    ) -> Result<(Vec<Token>, Self::State), String>;
}

/// Drives a [`Tokenizer`] over the lines of a single block.
///
/// A new one is created for every block so the lexer state can never leak from one block into
/// the next.
pub struct LineTokenizer<'t, T: Tokenizer> {
    tokenizer: &'t T,
    grammar: T::Grammar,
    state: Option<T::State>,
}

impl<'t, T: Tokenizer> LineTokenizer<'t, T> {
    pub fn new(tokenizer: &'t T, grammar: T::Grammar) -> Self {
        Self {
            tokenizer,
            grammar,
            state: None,
        }
    }

    /// Tokenizes the next line of the block.
    /// There is no timeout: a tokenizer hanging on a line stalls the whole render.
    pub fn tokenize_line(&mut self, line: &str) -> CodefenceResult<Vec<Token>> {
        let (tokens, state) = self
            .tokenizer
            .tokenize_line(&self.grammar, line, self.state.take())
            .map_err(Error::Tokenize)?;
        self.state = Some(state);
        Ok(tokens)
    }
}

/// A grammar that doesn't highlight anything: each line is a single `text.plain` token.
#[derive(Debug, Clone, Default)]
pub struct PlainTokenizer {
    /// `None` means every language is accepted
    languages: Option<HashSet<String>>,
}

impl PlainTokenizer {
    /// A tokenizer accepting any language.
    pub fn new() -> Self {
        Self { languages: None }
    }

    /// A tokenizer only accepting the given language names, compared ignoring ASCII case.
    pub fn with_aliases(aliases: &[&str]) -> Self {
        Self {
            languages: Some(aliases.iter().map(|a| a.to_ascii_lowercase()).collect()),
        }
    }
}

impl Tokenizer for PlainTokenizer {
    type Grammar = ();
    type State = ();

    fn grammar(&self, language: &str) -> Option<Self::Grammar> {
        match &self.languages {
            None => Some(()),
            Some(languages) if languages.contains(&language.to_ascii_lowercase()) => Some(()),
            Some(_) => None,
        }
    }

    fn tokenize_line(
        &self,
        _grammar: &Self::Grammar,
        line: &str,
        _state: Option<Self::State>,
    ) -> Result<(Vec<Token>, Self::State), String> {
        // Like the other grammars, we don't produce tokens for empty lines
        if line.is_empty() {
            return Ok((Vec::new(), ()));
        }
        let token = Token {
            span: 0..line.len(),
            scopes: vec![PLAIN_SCOPE.to_string()],
        };
        Ok((vec![token], ()))
    }
}


#[cfg(test)]
mod tests {
    use super::test_utils::*;
    use super::*;

    fn scope_of(tokens: &[Token]) -> Vec<Option<&str>> {
        tokens
            .iter()
            .map(|t| t.scopes.get(1).map(|s| s.as_str()))
            .collect()
    }

    #[test]
    fn carries_state_between_lines() {
        let tokenizer = CommentTokenizer::default();
        let mut lines = LineTokenizer::new(&tokenizer, ());

        let first = lines.tokenize_line("x /* start").unwrap();
        assert_eq!(first[0].span, 0..2);
        assert_eq!(scope_of(&first), vec![None, Some(COMMENT)]);

        let second = lines.tokenize_line("still */ return").unwrap();
        assert_eq!(scope_of(&second), vec![Some(COMMENT), None, Some(KEYWORD)]);
        assert_eq!(second[0].span, 0..8);

        assert_eq!(tokenizer.fresh_states.get(), 1);
    }

    #[test]
    fn new_block_starts_without_state() {
        let tokenizer = CommentTokenizer::default();
        let mut lines = LineTokenizer::new(&tokenizer, ());
        lines.tokenize_line("/* unterminated").unwrap();

        let mut lines = LineTokenizer::new(&tokenizer, ());
        let tokens = lines.tokenize_line("plain").unwrap();
        assert_eq!(scope_of(&tokens), vec![None]);
        assert_eq!(tokenizer.fresh_states.get(), 2);
    }

    #[test]
    fn tokenizer_errors_are_propagated() {
        let tokenizer = CommentTokenizer::default();
        let mut lines = LineTokenizer::new(&tokenizer, ());
        assert!(matches!(
            lines.tokenize_line("PANIC"),
            Err(Error::Tokenize(msg)) if msg == "tokenizer blew up"
        ));
    }

    #[test]
    fn plain_tokenizer_covers_whole_line() {
        let tokenizer = PlainTokenizer::new();
        assert!(tokenizer.grammar("anything").is_some());
        let mut lines = LineTokenizer::new(&tokenizer, ());
        let tokens = lines.tokenize_line("let a = 1;").unwrap();
        assert_eq!(
            tokens,
            vec![Token {
                span: 0..10,
                scopes: vec![PLAIN_SCOPE.to_string()]
            }]
        );
        assert!(lines.tokenize_line("").unwrap().is_empty());
    }

    #[test]
    fn plain_tokenizer_with_aliases() {
        let tokenizer = PlainTokenizer::with_aliases(&["txt", "Text"]);
        assert!(tokenizer.grammar("TXT").is_some());
        assert!(tokenizer.grammar("text").is_some());
        assert!(tokenizer.grammar("rust").is_none());
    }
}
