//! The tailing reader: a sequential byte source bound to a path.
//!
//! Reads come from the currently open handle. Only when that handle reports
//! end-of-file does the reader look at the path again, in one of two regimes:
//!
//! * attached: poll the path until the file grows, is truncated, or no longer
//!   names the file we hold open;
//! * missing: retry opening the path until it reappears or the wait budget
//!   runs out, which ends the stream.
//!
//! After the path is found to name a different file, the old handle is still
//! drained first. Each end-of-file on it triggers one reopen attempt, and any
//! bytes that show up on it in between are delivered before the new file's.
//! Bytes written to the old file after its final end-of-file are not seen.

use crate::error::{Error, Result};
use crate::events::TailEvent;
use crate::options::{TailOptions, Wakeup};
use crate::status::{FileStatus, Observed, Snapshot, classify, stat_path};
use crate::wait;
use crate::watcher::FileWatcher;
use std::fs::Metadata;
use std::io::{ErrorKind, SeekFrom};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio::time::Instant;

/// Result of one attempt to reopen a missing path.
enum Reappearance {
    Reopened,
    StillMissing,
    GaveUp,
}

/// Follows a file by name, surviving truncation, renames and rotation.
///
/// One reader tracks one path. Calls must not overlap; every method takes
/// `&mut self`.
pub struct TailReader {
    path: PathBuf,
    file: Option<File>,
    metadata: Metadata,
    snapshot: Snapshot,
    offset: u64,
    missing_since: Option<Instant>,
    watcher: Option<FileWatcher>,
    options: TailOptions,
}

impl TailReader {
    /// Opens `path` for following.
    ///
    /// Fails with the underlying I/O error, including `NotFound`, if the path
    /// cannot be opened now.
    pub async fn open<P: AsRef<Path>>(path: P, options: TailOptions) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let (file, metadata) = open_file(&path).await?;
        let watcher = match options.wakeup {
            Wakeup::Notify => Some(FileWatcher::new(&path)?),
            Wakeup::Poll => None,
        };

        tracing::debug!(path = %path.display(), len = metadata.len(), "following file");
        options.events.emit(&path, TailEvent::Opened);

        Ok(Self {
            snapshot: Snapshot::capture(&metadata),
            path,
            file: Some(file),
            metadata,
            offset: 0,
            missing_since: None,
            watcher,
            options,
        })
    }

    /// Reads newly available bytes into `buf`.
    ///
    /// Waits while no data is available. `Ok(0)` means end-of-stream: the
    /// path stayed missing for longer than the wait budget. A timeout or
    /// cancellation yields `Error::TimedOut` and leaves the reader usable.
    pub async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let deadline = self.options.timeout.map(|timeout| Instant::now() + timeout);

        loop {
            let file = self.file.as_mut().ok_or(Error::Closed)?;
            let n = file.read(buf).await?;
            if n > 0 {
                self.offset += n as u64;
                if self.missing_since.is_some() {
                    // Still draining the old file; the budget restarts.
                    self.missing_since = Some(Instant::now());
                } else {
                    self.rebase_if_caught_up().await;
                }
                return Ok(n);
            }

            match self.missing_since {
                Some(since) => match self.try_reappear(since, deadline).await? {
                    Reappearance::Reopened | Reappearance::StillMissing => continue,
                    Reappearance::GaveUp => return Ok(0),
                },
                None => self.wait_for_change(deadline).await?,
            }
        }
    }

    /// Repositions the current handle and makes `offset` match.
    pub async fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let file = self.file.as_mut().ok_or(Error::Closed)?;
        let offset = file.seek(pos).await?;
        self.offset = offset;
        self.rebase_if_caught_up().await;
        Ok(offset)
    }

    /// Bytes delivered from the current handle since it was opened or last
    /// truncated, adjusted by any seek.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Metadata captured when the current handle was opened.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// The tracked path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True while waiting for the path to reappear.
    pub fn is_missing(&self) -> bool {
        self.missing_since.is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.file.is_none()
    }

    /// Releases the handle and the optional watcher. Closing twice is a no-op.
    pub fn close(&mut self) {
        if self.file.take().is_some() {
            tracing::debug!(path = %self.path.display(), offset = self.offset, "closed");
        }
        self.watcher = None;
    }

    /// Missing regime: one reopen attempt, then a pause if the path is
    /// still absent.
    async fn try_reappear(
        &mut self,
        since: Instant,
        deadline: Option<Instant>,
    ) -> Result<Reappearance> {
        match self.reopen().await {
            Ok(()) => {
                self.emit(TailEvent::NewFile);
                Ok(Reappearance::Reopened)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if since.elapsed() >= self.options.eof_wait {
                    self.emit(TailEvent::GaveUp);
                    return Ok(Reappearance::GaveUp);
                }
                tracing::trace!(path = %self.path.display(), "still missing");
                self.pause(deadline).await?;
                Ok(Reappearance::StillMissing)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Attached regime: poll until something happens to the file.
    ///
    /// Nothing is committed before the last await of a transition, so a read
    /// dropped mid-way leaves the reader as it was.
    async fn wait_for_change(&mut self, deadline: Option<Instant>) -> Result<()> {
        loop {
            let observed = stat_path(&self.path).await?;
            let mut snapshot = self.snapshot;
            let status = classify(&mut snapshot, self.offset, observed);
            tracing::trace!(path = %self.path.display(), offset = self.offset, ?status, "polled");

            match status {
                FileStatus::NoChange => self.pause(deadline).await?,
                FileStatus::Appended => {
                    self.snapshot = snapshot;
                    return Ok(());
                }
                FileStatus::Truncated => {
                    let file = self.file.as_mut().ok_or(Error::Closed)?;
                    file.seek(SeekFrom::Start(0)).await?;
                    self.snapshot = snapshot;
                    self.offset = 0;
                    self.emit(TailEvent::Truncated);
                    return Ok(());
                }
                FileStatus::Moved => {
                    self.emit(TailEvent::Moved);
                    self.missing_since = Some(Instant::now());
                    return Ok(());
                }
            }
        }
    }

    /// Moves the modification-time baseline up to the handle's when the
    /// offset has caught up with its size, so growth that was read without
    /// a poll noticing it is not later taken for an in-place rewrite.
    ///
    /// The bytes are already delivered at this point, so a failed stat only
    /// leaves the old baseline in place.
    async fn rebase_if_caught_up(&mut self) {
        let Some(file) = self.file.as_ref() else {
            return;
        };
        match file.metadata().await {
            Ok(metadata) => {
                let observed = Observed::from_metadata(&metadata);
                if observed.len == self.offset && observed.modified > self.snapshot.modified {
                    self.snapshot.modified = observed.modified;
                }
            }
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "stat of open handle failed");
            }
        }
    }

    /// Opens the path again. The old handle is released only once the new
    /// one is open.
    async fn reopen(&mut self) -> std::io::Result<()> {
        let (file, metadata) = open_file(&self.path).await?;
        self.snapshot = Snapshot::capture(&metadata);
        self.metadata = metadata;
        self.file = Some(file);
        self.offset = 0;
        self.missing_since = None;
        Ok(())
    }

    async fn pause(&mut self, deadline: Option<Instant>) -> Result<()> {
        let result = wait::pause(
            self.options.poll_interval,
            deadline,
            self.options.cancel.as_ref(),
            self.watcher.as_mut(),
        )
        .await;
        if let Err(Error::TimedOut) = result {
            self.emit(TailEvent::TimedOut);
        }
        result
    }

    fn emit(&self, event: TailEvent) {
        self.options.events.emit(&self.path, event);
    }
}

impl std::fmt::Debug for TailReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TailReader")
            .field("path", &self.path)
            .field("offset", &self.offset)
            .field("missing", &self.missing_since.is_some())
            .field("closed", &self.file.is_none())
            .field("options", &self.options)
            .finish()
    }
}

async fn open_file(path: &Path) -> std::io::Result<(File, Metadata)> {
    let file = File::open(path).await?;
    let metadata = file.metadata().await?;
    Ok((file, metadata))
}
