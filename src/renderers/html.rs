use std::fmt;
use std::ops::RangeInclusive;

use crate::directives::LineState;
use crate::error::CodefenceResult;
use crate::themes::StyleResolution;
use crate::writer::OutputBuffer;

/// An entry of the line numbers gutter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GutterEntry {
    Number(usize),
    /// Stands in for the synthetic line telling which line numbers were jumped over
    Skipped(RangeInclusive<usize>),
}

/// Writes the opening `<pre>` of a highlighted block.
/// It's written last, once we know whether any line has the focus.
pub(crate) fn write_block_open(
    out: &mut impl fmt::Write,
    language: &str,
    group: Option<&str>,
    any_focused: bool,
) -> fmt::Result {
    out.write_str("<pre class=\"codefence")?;
    if any_focused {
        out.write_str(" has-focused-lines")?;
    }
    write!(out, "\" data-lang=\"{}\"", HtmlEscaped(language))?;
    if let Some(group) = group {
        write!(out, " data-group=\"{}\"", HtmlEscaped(group))?;
    }
    out.write_str("><code>")
}

pub(crate) fn write_line_start(writer: &mut OutputBuffer, state: &LineState) -> CodefenceResult<()> {
    writer.write_span("<span class=\"line")?;
    writer.write_span(state.status.css_classes())?;
    if state.focus {
        writer.write_span(" has-focus")?;
    }
    writer.write_span("\">")
}

pub(crate) fn write_line_end(writer: &mut OutputBuffer) -> CodefenceResult<()> {
    writer.write_span("</span>")
}

/// Writes a token as a span, only adding a `style` attribute if the themes gave it a style.
/// `style_builder` is scratch space, its content is irrelevant.
pub(crate) fn write_token(
    writer: &mut OutputBuffer,
    style: &StyleResolution,
    style_builder: &mut String,
    text: &str,
) -> CodefenceResult<()> {
    style_builder.clear();
    style.write_css(style_builder)?;

    writer.write_span("<span")?;
    if !style_builder.is_empty() {
        writer.write_span(" style=\"")?;
        writer.write_span(style_builder)?;
        writer.write_char('"')?;
    }
    writer.write_char('>')?;
    writer.write_escaped(text)?;
    writer.write_span("</span>")?;

    style_builder.clear();
    Ok(())
}

/// The synthetic line rendered where a `line-numbers=N` directive jumps over some numbers.
pub(crate) fn write_skip_marker(
    writer: &mut OutputBuffer,
    skipped: &RangeInclusive<usize>,
) -> CodefenceResult<()> {
    writer.write_span("<span class=\"line highlighted skipped-lines\">Skipped lines ")?;
    writer.write_formatted_integer(*skipped.start())?;
    writer.write_span(" through ")?;
    writer.write_formatted_integer(*skipped.end())?;
    writer.write_span(" <span class=\"skipped-lines-icon\"></span></span>")
}

/// Closes the code and writes the line numbers gutter if there is one.
pub(crate) fn write_block_close(
    writer: &mut OutputBuffer,
    gutter: Option<&[GutterEntry]>,
) -> CodefenceResult<()> {
    writer.write_span("</code>")?;
    if let Some(entries) = gutter {
        write_gutter(writer, entries)?;
    }
    writer.write_span("</pre>")
}

fn write_gutter(writer: &mut OutputBuffer, entries: &[GutterEntry]) -> CodefenceResult<()> {
    writer.write_span("<div class=\"line-numbers\" aria-hidden=\"true\">")?;
    for entry in entries {
        match entry {
            GutterEntry::Number(n) => {
                writer.write_span("<span>")?;
                writer.write_formatted_integer(*n)?;
            }
            GutterEntry::Skipped(range) => {
                writer.write_span("<span class=\"skipped-lines\">")?;
                writer.write_formatted_integer(*range.start())?;
                writer.write_char('-')?;
                writer.write_formatted_integer(*range.end())?;
            }
        }
        writer.write_span("</span>")?;
    }
    writer.write_span("</div>")
}

// From syntect
pub(crate) struct HtmlEscaped<'a>(pub &'a str);
impl fmt::Display for HtmlEscaped<'_> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Because the internet is always right, turns out there's not that many
        // characters to escape: http://stackoverflow.com/questions/7381974
        let Self(s) = *self;
        let mut last = 0;
        for (i, ch) in s.bytes().enumerate() {
            let escaped = match ch {
                b'>' => "&gt;",
                b'<' => "&lt;",
                b'&' => "&amp;",
                b'\'' => "&#39;",
                b'"' => "&quot;",
                _ => continue,
            };
            fmt.write_str(&s[last..i])?;
            fmt.write_str(escaped)?;
            last = i + 1;
        }

        if last < s.len() {
            fmt.write_str(&s[last..])?;
        }
        Ok(())
    }
}
