//! Error type shared by parsing, settings resolution and rendering.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed song text. `line` is 1-based, 0 when the input was a
    /// single line handed to the parser directly.
    #[error("format error on line {line}: {message}")]
    Format { line: usize, message: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("cannot access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("font error: {0}")]
    Font(String),

    #[error("render error: {0}")]
    Render(String),
}

impl Error {
    pub(crate) fn format(message: impl Into<String>) -> Self {
        Error::Format { line: 0, message: message.into() }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }

    /// Attach a source line number to a format error; other kinds pass through.
    pub(crate) fn at_line(self, line: usize) -> Self {
        match self {
            Error::Format { message, .. } => Error::Format { line, message },
            other => other,
        }
    }
}
