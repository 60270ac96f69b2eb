use std::fmt;
use std::io;

pub(crate) type CodefenceResult<T> = Result<T, Error>;

/// Errors that can occur while rendering code blocks
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred, only when the CLI reads themes or stdin.
    Io(io::Error),

    /// JSON parsing failed when building a theme.
    Json(serde_json::Error),

    /// Writing into a `fmt::Write` destination failed.
    Fmt(fmt::Error),

    /// An invalid hex color was encountered.
    /// Can only happen when building a theme.
    InvalidHexColor { value: String, reason: String },

    /// A `// [!code ...]` comment contained a directive we don't know about.
    /// This aborts the rendering of the whole block: no partial markup is produced.
    UnknownDirective { directive: String, line: usize },

    /// Something tried to write into an `OutputBuffer` that has no destination.
    /// This is a programming error.
    UninitializedWriter,

    /// The external tokenizer failed on a line.
    Tokenize(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Json(err) => write!(f, "JSON parsing error: {}", err),
            Error::Fmt(err) => write!(f, "formatting error: {}", err),
            Error::InvalidHexColor { value, reason } => {
                write!(f, "invalid hex color '{}': {}", value, reason)
            }
            Error::UnknownDirective { directive, line } => {
                write!(f, "unknown code line directive '{}' on line {}", directive, line)
            }
            Error::UninitializedWriter => {
                write!(f, "output buffer used before being associated with a destination")
            }
            Error::Tokenize(message) => write!(f, "tokenizer error: {}", message),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Json(err) => Some(err),
            Error::Fmt(err) => Some(err),
            Error::InvalidHexColor { .. }
            | Error::UnknownDirective { .. }
            | Error::UninitializedWriter
            | Error::Tokenize(_) => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<fmt::Error> for Error {
    fn from(err: fmt::Error) -> Self {
        Error::Fmt(err)
    }
}
