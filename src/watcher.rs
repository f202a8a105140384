//! Optional early wake-up from filesystem events, using the notify crate.
//!
//! The watcher never decides anything on its own: an event only cuts a poll
//! sleep short so the status check runs sooner.

use crate::error::Result;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

/// Watches the directory holding the tracked path and forwards events that
/// mention its file name.
pub(crate) struct FileWatcher {
    _watcher: RecommendedWatcher,
    receiver: mpsc::UnboundedReceiver<notify::Result<Event>>,
}

impl FileWatcher {
    /// Starts watching the parent directory of `path`, so creation of a
    /// replacement file is seen as well as writes to the current one.
    pub(crate) fn new(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let (tx, rx) = mpsc::unbounded_channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let relevant = match &res {
                    Ok(event) => is_event_relevant_to_file(event, &file_name),
                    Err(_) => true,
                };
                if relevant {
                    let _ = tx.send(res);
                }
            },
            Config::default(),
        )?;
        watcher.watch(&watch_dir(path), RecursiveMode::NonRecursive)?;

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
        })
    }

    /// Waits for the next relevant event, discarding any backlog so one burst
    /// of writes wakes the reader once.
    pub(crate) async fn changed(&mut self) -> Option<notify::Result<Event>> {
        let event = self.receiver.recv().await?;
        while let Ok(next) = self.receiver.try_recv() {
            if next.is_err() {
                return Some(next);
            }
        }
        Some(event)
    }
}

/// Directory to watch for `path`; a bare file name lives in the current
/// directory.
fn watch_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Check if a notify event is relevant to a specific file
pub(crate) fn is_event_relevant_to_file(event: &Event, target_file_name: &str) -> bool {
    event.paths.iter().any(|path| {
        path.file_name()
            .map(|name| name.to_string_lossy() == target_file_name)
            .unwrap_or(false)
    })
}
