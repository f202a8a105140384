//! Caller-supplied configuration for a tailing reader.

use crate::events::{EventSink, TracingSink};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Default delay between metadata polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Default time to wait for a vanished path to reappear.
pub const DEFAULT_EOF_WAIT: Duration = Duration::from_secs(10);

/// How the reader wakes up between metadata polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Wakeup {
    /// Sleep for the full poll interval.
    #[default]
    Poll,
    /// Also wake early on filesystem events for the tracked file name.
    /// Polling remains the source of truth.
    Notify,
}

/// Options controlling how a file is followed.
#[derive(Clone)]
pub struct TailOptions {
    pub(crate) poll_interval: Duration,
    pub(crate) eof_wait: Duration,
    pub(crate) timeout: Option<Duration>,
    pub(crate) cancel: Option<CancellationToken>,
    pub(crate) wakeup: Wakeup,
    pub(crate) events: Arc<dyn EventSink>,
}

impl TailOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay between metadata polls while waiting for data.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// How long a missing path is tolerated before the stream ends.
    pub fn eof_wait(mut self, budget: Duration) -> Self {
        self.eof_wait = budget;
        self
    }

    /// Bounds the total time a single read may spend waiting.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Interrupts any wait once the token is cancelled.
    pub fn cancel_on(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn wakeup(mut self, wakeup: Wakeup) -> Self {
        self.wakeup = wakeup;
        self
    }

    /// Where transition events are delivered.
    pub fn events<S: EventSink + 'static>(mut self, sink: S) -> Self {
        self.events = Arc::new(sink);
        self
    }
}

impl Default for TailOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            eof_wait: DEFAULT_EOF_WAIT,
            timeout: None,
            cancel: None,
            wakeup: Wakeup::Poll,
            events: Arc::new(TracingSink),
        }
    }
}

impl fmt::Debug for TailOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TailOptions")
            .field("poll_interval", &self.poll_interval)
            .field("eof_wait", &self.eof_wait)
            .field("timeout", &self.timeout)
            .field("cancel", &self.cancel.is_some())
            .field("wakeup", &self.wakeup)
            .finish_non_exhaustive()
    }
}
