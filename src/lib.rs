//! Follow a file by name, the way `tail -F` does.
//!
//! A [`TailReader`] streams bytes appended to a path and keeps going when the
//! file is truncated, renamed away, or replaced by a new file under the same
//! name. Changes are detected by polling file metadata; the identity of the
//! open file (device and inode on unix) tells a rotation apart from a
//! truncation.
//!
//! # Example
//!
//! ```rust,no_run
//! use log_tail::follow;
//! use tokio_stream::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut stream = follow("app.log").await?;
//!
//!     while let Some(chunk) = stream.next().await {
//!         print!("{}", String::from_utf8_lossy(&chunk?));
//!     }
//!
//!     Ok(())
//! }
//! ```

mod error;
mod events;
mod options;
mod reader;
mod status;
mod stream;
mod wait;
mod watcher;

#[cfg(test)]
mod test_helpers;

pub use error::{Error, Result};
pub use events::{EventSink, NullSink, TailEvent, TracingSink};
pub use options::{DEFAULT_EOF_WAIT, DEFAULT_POLL_INTERVAL, TailOptions, Wakeup};
pub use reader::TailReader;
pub use status::{FileIdentity, FileStatus};
pub use stream::{DEFAULT_CHUNK_SIZE, LineStream, TailStream};
pub use tokio_util::sync::CancellationToken;

use std::path::Path;

/// Follows `path` with default options, yielding raw chunks.
pub async fn follow<P: AsRef<Path>>(path: P) -> Result<TailStream> {
    follow_with(path, TailOptions::default()).await
}

/// Follows `path` with the given options, yielding raw chunks.
pub async fn follow_with<P: AsRef<Path>>(path: P, options: TailOptions) -> Result<TailStream> {
    let reader = TailReader::open(path, options).await?;
    Ok(TailStream::new(reader))
}

/// Follows `path`, yielding batches of complete records.
///
/// # Arguments
///
/// * `path` - File path to follow
/// * `separator` - Record separator (defaults to newline)
///
/// # Example
///
/// ```rust,no_run
/// use log_tail::follow_lines;
/// use tokio_stream::StreamExt;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut lines = follow_lines("app.log", None).await?;
///
///     while let Some(batch) = lines.next().await {
///         for line in batch? {
///             println!("{}", line);
///         }
///     }
///
///     Ok(())
/// }
/// ```
pub async fn follow_lines<P: AsRef<Path>>(path: P, separator: Option<String>) -> Result<LineStream> {
    let reader = TailReader::open(path, TailOptions::default()).await?;
    Ok(LineStream::new(reader, separator))
}
