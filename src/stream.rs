//! Stream adapters over a [`TailReader`].

use crate::error::Result;
use crate::reader::TailReader;
use bytes::Bytes;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio_util::io::StreamReader;

/// Default number of bytes requested per read.
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// A stream of raw chunks read from a followed file.
///
/// Ends when the reader reaches end-of-stream. The first error, including a
/// timeout, is yielded and then the stream ends.
pub struct TailStream {
    inner: BoxStream<'static, Result<Bytes>>,
}

impl TailStream {
    pub fn new(reader: TailReader) -> Self {
        Self::with_chunk_size(reader, DEFAULT_CHUNK_SIZE)
    }

    pub fn with_chunk_size(reader: TailReader, chunk_size: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        let inner = stream::unfold(Some(reader), move |state| async move {
            let mut reader = state?;
            let mut buf = vec![0u8; chunk_size];
            match reader.read(&mut buf).await {
                Ok(0) => None,
                Ok(n) => {
                    buf.truncate(n);
                    Some((Ok(Bytes::from(buf)), Some(reader)))
                }
                Err(e) => Some((Err(e), None)),
            }
        })
        .boxed();

        Self { inner }
    }

    /// Adapts the stream into an [`AsyncRead`](tokio::io::AsyncRead).
    ///
    /// End-of-stream reads as EOF and errors convert into `std::io::Error`,
    /// so the result works with `tokio::io::copy` and friends.
    pub fn into_async_read(self) -> StreamReader<TailStream, Bytes> {
        StreamReader::new(self)
    }
}

impl Stream for TailStream {
    type Item = Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

struct LineState {
    chunks: TailStream,
    separator: Vec<u8>,
    pending: Vec<u8>,
    done: bool,
}

/// A stream of complete records, batched per read.
///
/// Records are split on a separator (newline by default). A trailing record
/// without its separator is held back until the separator arrives, or
/// flushed when the stream ends. Blank records are dropped and bytes are
/// decoded as lossy UTF-8.
pub struct LineStream {
    inner: BoxStream<'static, Result<Vec<String>>>,
}

impl LineStream {
    /// Splits on `separator`, or on `"\n"` when it is `None` or empty.
    pub fn new(reader: TailReader, separator: Option<String>) -> Self {
        let separator = separator
            .filter(|sep| !sep.is_empty())
            .unwrap_or_else(|| "\n".to_string());

        let state = LineState {
            chunks: TailStream::new(reader),
            separator: separator.into_bytes(),
            pending: Vec::new(),
            done: false,
        };

        let inner = stream::unfold(state, |mut state| async move {
            while !state.done {
                match state.chunks.next().await {
                    Some(Ok(chunk)) => {
                        state.pending.extend_from_slice(&chunk);
                        let records = take_complete_records(&mut state.pending, &state.separator);
                        if !records.is_empty() {
                            return Some((Ok(records), state));
                        }
                    }
                    Some(Err(e)) => {
                        state.done = true;
                        return Some((Err(e), state));
                    }
                    None => {
                        state.done = true;
                        let rest = std::mem::take(&mut state.pending);
                        let records = split_and_filter_content(&rest, &state.separator);
                        if !records.is_empty() {
                            return Some((Ok(records), state));
                        }
                    }
                }
            }
            None
        })
        .boxed();

        Self { inner }
    }
}

impl Stream for LineStream {
    type Item = Result<Vec<String>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

/// Removes every complete record from the front of `pending` and returns the
/// non-blank ones. The unfinished tail stays in `pending`.
fn take_complete_records(pending: &mut Vec<u8>, separator: &[u8]) -> Vec<String> {
    let Some(last) = rfind(pending, separator) else {
        return Vec::new();
    };
    let complete: Vec<u8> = pending.drain(..last + separator.len()).collect();
    split_and_filter_content(&complete, separator)
}

/// Split content by separator and filter out empty/whitespace-only parts
fn split_and_filter_content(content: &[u8], separator: &[u8]) -> Vec<String> {
    let mut parts = Vec::new();
    let mut rest = content;
    loop {
        let (part, next) = match find(rest, separator) {
            Some(at) => (&rest[..at], Some(&rest[at + separator.len()..])),
            None => (rest, None),
        };
        let text = String::from_utf8_lossy(part);
        if !text.trim().is_empty() {
            parts.push(text.into_owned());
        }
        match next {
            Some(next) => rest = next,
            None => break,
        }
    }
    parts
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).rposition(|window| window == needle)
}
