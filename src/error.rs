//! Error types for the tailing reader.

use thiserror::Error;

/// The main error type for tailing operations.
///
/// Reaching the end of the stream is not an error: `read` returns `Ok(0)` and
/// the stream adapters end.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors when opening, reading or inspecting the tracked file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors from the optional notify wake-up source.
    #[error("File watcher error: {0}")]
    Watcher(#[from] notify::Error),

    /// The caller's timeout elapsed or cancellation fired while waiting.
    #[error("tail: timed out")]
    TimedOut,

    /// The reader has been closed.
    #[error("Reader closed")]
    Closed,
}

impl Error {
    /// Returns true if this is a timeout or cancellation, after which the
    /// reader may be used again.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::TimedOut)
    }
}

impl From<Error> for std::io::Error {
    fn from(err: Error) -> Self {
        use std::io::ErrorKind;

        match err {
            Error::Io(inner) => inner,
            Error::TimedOut => std::io::Error::new(ErrorKind::TimedOut, err),
            Error::Closed => std::io::Error::new(ErrorKind::BrokenPipe, err),
            Error::Watcher(_) => std::io::Error::other(err),
        }
    }
}

/// A convenient Result type for tailing operations.
pub type Result<T> = std::result::Result<T, Error>;
