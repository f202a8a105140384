//! Transition events emitted by the reader.

use std::fmt;
use std::path::Path;

/// A state transition observed while following a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailEvent {
    /// The path was opened for the first time.
    Opened,
    /// A new file appeared at the path after it went missing or was replaced.
    NewFile,
    /// The file was truncated or rewritten; reading restarts at offset 0.
    Truncated,
    /// The path no longer names the file being read.
    Moved,
    /// The path stayed missing for longer than the wait budget.
    GaveUp,
    /// The caller's timeout or cancellation interrupted a wait.
    TimedOut,
}

impl fmt::Display for TailEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TailEvent::Opened => "file opened",
            TailEvent::NewFile => "new file found",
            TailEvent::Truncated => "file truncated",
            TailEvent::Moved => "file moved",
            TailEvent::GaveUp => "eof timed out",
            TailEvent::TimedOut => "timed out",
        };
        f.write_str(text)
    }
}

/// Receives transition events from a reader.
///
/// Closures taking `(&Path, TailEvent)` implement this trait, so callers can
/// capture or suppress events without defining a type.
pub trait EventSink: Send + Sync {
    fn emit(&self, path: &Path, event: TailEvent);
}

impl<F> EventSink for F
where
    F: Fn(&Path, TailEvent) + Send + Sync,
{
    fn emit(&self, path: &Path, event: TailEvent) {
        self(path, event)
    }
}

/// Default sink: forwards every event to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, path: &Path, event: TailEvent) {
        match event {
            TailEvent::Opened => tracing::debug!(path = %path.display(), "{}", event),
            TailEvent::GaveUp | TailEvent::TimedOut => {
                tracing::warn!(path = %path.display(), "{}", event)
            }
            _ => tracing::info!(path = %path.display(), "{}", event),
        }
    }
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _path: &Path, _event: TailEvent) {}
}
