use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::block::{BlockKind, CODE_GROUP_DATA_KEY, CodeBlock, FallbackRenderer, PlainFallback};
use crate::directives::{BlockState, LineStatus};
use crate::error::{CodefenceResult, Error};
use crate::markdown_fence::{
    FenceInfo, LineDirectives, parse_and_remove_directives, parse_fence_info,
};
use crate::options::HighlightConfig;
use crate::renderers::html::{self, GutterEntry};
use crate::themes::{StyleCache, Stylist};
use crate::tokenizer::{LineTokenizer, Tokenizer};
use crate::writer::OutputBuffer;

/// Why a block was handed to the fallback renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// Indented code blocks are never highlighted
    NotFenced,
    /// No language could be found in the info string
    UnrecognizedInfo,
    /// The tokenizer doesn't know that language
    GrammarNotFound(String),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::NotFenced => write!(f, "not a fenced code block"),
            FallbackReason::UnrecognizedInfo => write!(f, "unrecognized info string"),
            FallbackReason::GrammarNotFound(language) => {
                write!(f, "no grammar found for language `{language}`")
            }
        }
    }
}

/// What [`SyntaxHighlighter::render`] did with a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Highlighted {
        any_focused: bool,
        any_numbered: bool,
    },
    Fallback(FallbackReason),
}

/// Buffers reused from one block to the next.
#[derive(Debug, Default)]
struct Scratch {
    writer: OutputBuffer,
    style: String,
    gutter: Vec<GutterEntry>,
    /// The writer destination, kept around between blocks
    spare: String,
}

impl Scratch {
    fn reset(&mut self) {
        if let Some(mut destination) = self.writer.disassociate() {
            destination.clear();
            self.spare = destination;
        }
        self.spare.clear();
        self.style.clear();
        self.gutter.clear();
    }

    /// Gets the scratch ready for a new block. It is reset again when the guard is dropped,
    /// whether the block rendered or not.
    fn acquire(&mut self) -> ScratchGuard<'_> {
        self.reset();
        let destination = std::mem::take(&mut self.spare);
        self.writer.associate(destination);
        ScratchGuard { scratch: self }
    }
}

struct ScratchGuard<'s> {
    scratch: &'s mut Scratch,
}

impl Deref for ScratchGuard<'_> {
    type Target = Scratch;

    fn deref(&self) -> &Scratch {
        &*self.scratch
    }
}

impl DerefMut for ScratchGuard<'_> {
    fn deref_mut(&mut self) -> &mut Scratch {
        &mut *self.scratch
    }
}

impl Drop for ScratchGuard<'_> {
    fn drop(&mut self) {
        self.scratch.reset();
    }
}

/// Turns code blocks into highlighted HTML.
///
/// Meant to be reused for all the code blocks of a render pass: buffers and resolved styles are
/// kept from one block to the next. It is not meant to be shared between threads, create one
/// per thread instead.
pub struct SyntaxHighlighter<'a, T: Tokenizer, S: Stylist, F: FallbackRenderer = PlainFallback> {
    tokenizer: &'a T,
    stylist: &'a S,
    fallback: F,
    config: HighlightConfig,
    styles: StyleCache,
    scratch: Scratch,
}

impl<'a, T: Tokenizer, S: Stylist> SyntaxHighlighter<'a, T, S> {
    pub fn new(tokenizer: &'a T, stylist: &'a S, config: HighlightConfig) -> Self {
        Self::with_fallback(tokenizer, stylist, PlainFallback, config)
    }
}

impl<'a, T: Tokenizer, S: Stylist, F: FallbackRenderer> SyntaxHighlighter<'a, T, S, F> {
    pub fn with_fallback(
        tokenizer: &'a T,
        stylist: &'a S,
        fallback: F,
        config: HighlightConfig,
    ) -> Self {
        Self {
            tokenizer,
            stylist,
            fallback,
            config,
            styles: StyleCache::default(),
            scratch: Scratch::default(),
        }
    }

    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    /// Renders a code block, appending the HTML to `out`.
    ///
    /// Blocks that can't be highlighted are given to the fallback renderer. An unknown
    /// directive or a tokenizer failure is an error and nothing is written to `out`.
    /// The parsed code group, if any, is stored in the block data under
    /// [`CODE_GROUP_DATA_KEY`].
    pub fn render(&mut self, block: &mut CodeBlock, out: &mut String) -> Result<Rendered, Error> {
        if block.kind != BlockKind::Fenced {
            return self.fall_back(block, out, FallbackReason::NotFenced);
        }

        let info_string = block.info_string(self.config.info_prefix.as_deref());
        let Some(info) = parse_fence_info(&info_string, &self.config) else {
            log::debug!("Could not find a language in info string `{info_string}`");
            return self.fall_back(block, out, FallbackReason::UnrecognizedInfo);
        };
        if let Some(group) = &info.group {
            block.set_data(CODE_GROUP_DATA_KEY, group.as_str());
        }

        let Some(grammar) = self.tokenizer.grammar(&info.language) else {
            let reason = FallbackReason::GrammarNotFound(info.language);
            return self.fall_back(block, out, reason);
        };

        let Self {
            tokenizer,
            stylist,
            styles,
            scratch,
            ..
        } = self;
        let mut scratch = scratch.acquire();
        let block_state = render_lines(
            *tokenizer,
            *stylist,
            styles,
            &mut scratch,
            &info,
            grammar,
            &block.lines,
        )?;

        let body = scratch.writer.as_str()?;
        html::write_block_open(
            out,
            &info.language,
            info.group.as_deref(),
            block_state.any_focused,
        )?;
        out.push_str(body);

        Ok(Rendered::Highlighted {
            any_focused: block_state.any_focused,
            any_numbered: block_state.any_numbered,
        })
    }

    fn fall_back(
        &self,
        block: &CodeBlock,
        out: &mut String,
        reason: FallbackReason,
    ) -> Result<Rendered, Error> {
        log::debug!("Rendering code block as plain text: {reason}");
        self.fallback.render_plain(block, out)?;
        Ok(Rendered::Fallback(reason))
    }
}

/// Renders every line of a block in the scratch writer, followed by the gutter if needed.
fn render_lines<T: Tokenizer, S: Stylist>(
    tokenizer: &T,
    stylist: &S,
    styles: &mut StyleCache,
    scratch: &mut Scratch,
    info: &FenceInfo,
    grammar: T::Grammar,
    lines: &[String],
) -> CodefenceResult<BlockState> {
    let Scratch {
        writer,
        style,
        gutter,
        ..
    } = scratch;
    let mut block_state = BlockState::new(info.line_numbering);
    let mut line_tokenizer = LineTokenizer::new(tokenizer, grammar);

    for (idx, line) in lines.iter().enumerate() {
        let LineDirectives { code, directives } = parse_and_remove_directives(line);
        let initial = if info.is_highlighted(idx) {
            LineStatus::Simple
        } else {
            LineStatus::None
        };
        let outcome = block_state.apply_directives(idx, initial, &directives)?;

        for skipped in outcome.skipped {
            html::write_skip_marker(writer, &skipped)?;
            gutter.push(GutterEntry::Skipped(skipped));
        }

        html::write_line_start(writer, &outcome.state)?;
        for token in line_tokenizer.tokenize_line(code)? {
            let Some(text) = code.get(token.span.clone()) else {
                log::debug!(
                    "Skipping token {:?} not matching line {idx} of length {}",
                    token.span,
                    code.len()
                );
                continue;
            };
            let resolution = styles.resolve(stylist, &token.scopes);
            html::write_token(writer, &resolution, style, text)?;
        }
        html::write_line_end(writer)?;

        if let Some(number) = outcome.state.line_number {
            gutter.push(GutterEntry::Number(number));
        }
    }

    let gutter = block_state.any_numbered.then_some(gutter.as_slice());
    html::write_block_close(writer, gutter)?;
    writer.flush()?;

    Ok(block_state)
}
