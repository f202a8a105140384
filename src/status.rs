//! Classification of changes to the tracked path.
//!
//! Every poll compares what the reader captured when it opened its handle
//! against fresh metadata for the path. The comparison uses file identity
//! rather than the path string, so a file that is deleted and recreated
//! between two polls is seen as a new file and never as a truncation of the
//! old one.

use std::fs::Metadata;
use std::io::ErrorKind;
use std::path::Path;
use std::time::SystemTime;

/// Token naming the underlying file object, independent of its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileIdentity {
    #[cfg(unix)]
    dev: u64,
    #[cfg(unix)]
    ino: u64,
    #[cfg(not(unix))]
    created: Option<SystemTime>,
}

impl FileIdentity {
    /// Extracts the identity of the file described by `metadata`.
    #[cfg(unix)]
    pub fn of(metadata: &Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;
        Self {
            dev: metadata.dev(),
            ino: metadata.ino(),
        }
    }

    /// Best effort on platforms without stable inode numbers: the creation
    /// time changes when a file is recreated under the same name.
    #[cfg(not(unix))]
    pub fn of(metadata: &Metadata) -> Self {
        Self {
            created: metadata.created().ok(),
        }
    }
}

/// Outcome of a single classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Same file, nothing new to read.
    NoChange,
    /// Same file, grown past the read offset.
    Appended,
    /// Same file, shrunk or rewritten in place.
    Truncated,
    /// The path is gone or now names a different file.
    Moved,
}

/// What the reader captured about its open handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Snapshot {
    pub(crate) identity: FileIdentity,
    pub(crate) modified: SystemTime,
}

impl Snapshot {
    pub(crate) fn capture(metadata: &Metadata) -> Self {
        Self {
            identity: FileIdentity::of(metadata),
            modified: modified_time(metadata),
        }
    }
}

/// Fresh observation of the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Observed {
    pub(crate) identity: FileIdentity,
    pub(crate) len: u64,
    pub(crate) modified: SystemTime,
}

impl Observed {
    pub(crate) fn from_metadata(metadata: &Metadata) -> Self {
        Self {
            identity: FileIdentity::of(metadata),
            len: metadata.len(),
            modified: modified_time(metadata),
        }
    }
}

/// Classifies `observed` against the reader's snapshot and offset.
///
/// `None` means the path does not exist. The snapshot's modification time is
/// advanced on `Appended` and `Truncated`.
pub(crate) fn classify(
    snapshot: &mut Snapshot,
    offset: u64,
    observed: Option<Observed>,
) -> FileStatus {
    let Some(observed) = observed else {
        return FileStatus::Moved;
    };
    if observed.identity != snapshot.identity {
        return FileStatus::Moved;
    }

    if observed.len == offset {
        if observed.modified > snapshot.modified {
            snapshot.modified = observed.modified;
            return FileStatus::Truncated;
        }
        return FileStatus::NoChange;
    }

    snapshot.modified = observed.modified;
    if observed.len > offset {
        FileStatus::Appended
    } else {
        FileStatus::Truncated
    }
}

/// Stats `path`, mapping a missing path to `None`. Any other failure is
/// returned verbatim.
pub(crate) async fn stat_path(path: &Path) -> std::io::Result<Option<Observed>> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => Ok(Some(Observed::from_metadata(&metadata))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

fn modified_time(metadata: &Metadata) -> SystemTime {
    metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH)
}
