//! The single wait primitive used between polls.
//!
//! Every suspension goes through [`pause`], which sleeps for at most one poll
//! interval and can be cut short by the caller's deadline, a cancellation
//! token, or a filesystem event.

use crate::error::{Error, Result};
use crate::watcher::FileWatcher;
use std::future;
use std::time::Duration;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;

/// Sleeps for `interval`, or less if woken.
///
/// Returns `Error::TimedOut` when `deadline` has passed (checked before and
/// after sleeping) or when `cancel` fires. A watcher event ends the sleep
/// early with `Ok(())`.
pub(crate) async fn pause(
    interval: Duration,
    deadline: Option<Instant>,
    cancel: Option<&CancellationToken>,
    watcher: Option<&mut FileWatcher>,
) -> Result<()> {
    let now = Instant::now();
    let mut until = now + interval;
    if let Some(deadline) = deadline {
        if now >= deadline {
            return Err(Error::TimedOut);
        }
        until = until.min(deadline);
    }
    if cancel.is_some_and(|token| token.is_cancelled()) {
        return Err(Error::TimedOut);
    }

    let cancelled = async {
        match cancel {
            Some(token) => token.cancelled().await,
            None => future::pending().await,
        }
    };
    let woken = async {
        match watcher {
            Some(watcher) => watcher.changed().await,
            None => future::pending().await,
        }
    };

    tokio::select! {
        _ = cancelled => return Err(Error::TimedOut),
        _ = sleep_until(until) => {}
        event = woken => match event {
            Some(Ok(_)) => {}
            Some(Err(e)) => return Err(e.into()),
            // The watcher is gone; fall back to the plain sleep.
            None => sleep_until(until).await,
        },
    }

    match deadline {
        Some(deadline) if Instant::now() >= deadline => Err(Error::TimedOut),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::TempLogFile;

    #[tokio::test]
    async fn test_pause_sleeps_for_interval() {
        let start = Instant::now();
        pause(Duration::from_millis(30), None, None, None).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test]
    async fn test_pause_fails_when_deadline_passed() {
        let deadline = Instant::now();
        let result = pause(Duration::from_millis(10), Some(deadline), None, None).await;
        assert!(matches!(result, Err(Error::TimedOut)));
    }

    #[tokio::test]
    async fn test_pause_is_bounded_by_deadline() {
        let start = Instant::now();
        let deadline = start + Duration::from_millis(20);
        let result = pause(Duration::from_secs(10), Some(deadline), None, None).await;

        assert!(matches!(result, Err(Error::TimedOut)));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_pause_within_deadline_is_ok() {
        let deadline = Instant::now() + Duration::from_secs(10);
        let result = pause(Duration::from_millis(10), Some(deadline), None, None).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_pause_observes_cancelled_token() {
        let token = CancellationToken::new();
        token.cancel();
        let result = pause(Duration::from_secs(10), None, Some(&token), None).await;
        assert!(matches!(result, Err(Error::TimedOut)));
    }

    #[tokio::test]
    async fn test_pause_wakes_on_cancellation() {
        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let start = Instant::now();
        let result = pause(Duration::from_secs(10), None, Some(&token), None).await;

        assert!(matches!(result, Err(Error::TimedOut)));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_pause_wakes_on_file_event() {
        let temp_file = TempLogFile::new().unwrap();
        let mut watcher = FileWatcher::new(temp_file.path()).unwrap();
        let path = temp_file.path().to_path_buf();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            tokio::fs::write(path, b"wake").await.unwrap();
        });

        let start = Instant::now();
        pause(Duration::from_secs(30), None, None, Some(&mut watcher))
            .await
            .unwrap();
        assert!(start.elapsed() < Duration::from_secs(10));
    }
}
