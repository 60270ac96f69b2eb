//! A character sink that can be pointed at a different destination between uses.
//!
//! The highlighter keeps a single `OutputBuffer` for its whole lifetime and associates it with
//! a recycled `String` at the start of every block, so rendering many blocks doesn't allocate
//! a fresh buffer each time.

use std::fmt;

use crate::error::{CodefenceResult, Error};
use crate::renderers::html::HtmlEscaped;

/// Line numbers wider than this fall back to an allocating `to_string`.
const SCRATCH_DIGITS: usize = 6;

#[derive(Debug, Default)]
pub struct OutputBuffer {
    destination: Option<String>,
}

impl OutputBuffer {
    /// Creates a writer without a destination: call [`OutputBuffer::associate`] before writing.
    pub fn new() -> Self {
        Self { destination: None }
    }

    /// Binds the writer to `destination`, returning the previously associated one if any.
    pub fn associate(&mut self, destination: String) -> Option<String> {
        self.destination.replace(destination)
    }

    /// Detaches the writer from its destination and hands it back.
    pub fn disassociate(&mut self) -> Option<String> {
        self.destination.take()
    }

    pub fn is_associated(&self) -> bool {
        self.destination.is_some()
    }

    /// Nothing is buffered on our side, so this only checks that a destination is bound.
    pub fn flush(&self) -> CodefenceResult<()> {
        self.destination
            .as_ref()
            .map(|_| ())
            .ok_or(Error::UninitializedWriter)
    }

    /// What has been written so far into the current destination.
    pub fn as_str(&self) -> CodefenceResult<&str> {
        self.destination
            .as_deref()
            .ok_or(Error::UninitializedWriter)
    }

    #[inline]
    fn destination_mut(&mut self) -> CodefenceResult<&mut String> {
        self.destination.as_mut().ok_or(Error::UninitializedWriter)
    }

    #[inline]
    pub fn write_char(&mut self, c: char) -> CodefenceResult<()> {
        self.destination_mut()?.push(c);
        Ok(())
    }

    #[inline]
    pub fn write_span(&mut self, s: &str) -> CodefenceResult<()> {
        self.destination_mut()?.push_str(s);
        Ok(())
    }

    /// Writes `s` with the HTML special characters escaped.
    pub fn write_escaped(&mut self, s: &str) -> CodefenceResult<()> {
        let destination = self.destination_mut()?;
        fmt::Write::write_fmt(destination, format_args!("{}", HtmlEscaped(s)))?;
        Ok(())
    }

    /// Writes the decimal representation of `n` going through a small stack buffer.
    pub fn write_formatted_integer(&mut self, n: usize) -> CodefenceResult<()> {
        let destination = self.destination_mut()?;
        let mut scratch = [0u8; SCRATCH_DIGITS];
        match format_digits(n, &mut scratch) {
            Some(digits) => destination.push_str(digits),
            None => destination.push_str(&n.to_string()),
        }
        Ok(())
    }
}

/// Writes the digits of `n` right-aligned into `scratch`.
/// Returns `None` if they don't fit.
fn format_digits(mut n: usize, scratch: &mut [u8]) -> Option<&str> {
    let mut pos = scratch.len();
    loop {
        if pos == 0 {
            return None;
        }
        pos -= 1;
        scratch[pos] = b'0' + (n % 10) as u8;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    std::str::from_utf8(&scratch[pos..]).ok()
}

impl fmt::Write for OutputBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_span(s).map_err(|_| fmt::Error)
    }

    fn write_char(&mut self, c: char) -> fmt::Result {
        OutputBuffer::write_char(self, c).map_err(|_| fmt::Error)
    }
}
