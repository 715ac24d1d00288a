//! Chunked, bounded file bodies.
//!
//! [`ChunkedBody`] owns the open file for exactly one response. It seeks to
//! the start of the requested range and yields chunks of at most
//! `chunk_size` bytes until the range is covered or the file runs out. The
//! file is closed when the body is dropped, whether the stream finished,
//! failed, or the client went away mid-transfer.
//!
//! A read failure ends the stream with an I/O error. Bytes already sent stay
//! sent; the transport aborts the response.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_core::Stream;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, Take};
use tokio_util::io::ReaderStream;

use sv_core::ByteRange;

/// A lazy, finite, non-restartable stream of file chunks covering one
/// [`ByteRange`].
#[derive(Debug)]
pub struct ChunkedBody {
    inner: ReaderStream<Take<File>>,
    path: PathBuf,
    expected: u64,
    emitted: u64,
    finished: bool,
}

impl ChunkedBody {
    /// Open `path` and position it at `range.start()`.
    pub async fn open(path: &Path, range: ByteRange, chunk_size: usize) -> std::io::Result<Self> {
        let mut file = File::open(path).await?;
        file.seek(SeekFrom::Start(range.start())).await?;

        // Take caps reads at the range length even if the file has grown.
        let limited = file.take(range.len());
        Ok(Self {
            inner: ReaderStream::with_capacity(limited, chunk_size.max(1)),
            path: path.to_path_buf(),
            expected: range.len(),
            emitted: 0,
            finished: false,
        })
    }

    /// Number of bytes the body is expected to produce.
    pub fn expected_len(&self) -> u64 {
        self.expected
    }

    /// Bytes produced so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

impl Stream for ChunkedBody {
    type Item = std::io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(None);
        }

        match Pin::new(&mut this.inner).poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                this.emitted += chunk.len() as u64;
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(e))) => {
                this.finished = true;
                tracing::warn!(
                    path = %this.path.display(),
                    emitted = this.emitted,
                    expected = this.expected,
                    "Media read failed mid-stream: {e}"
                );
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                this.finished = true;
                if this.emitted < this.expected {
                    tracing::warn!(
                        path = %this.path.display(),
                        emitted = this.emitted,
                        expected = this.expected,
                        "Media file shrank while streaming"
                    );
                }
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for ChunkedBody {
    fn drop(&mut self) {
        if !self.finished {
            tracing::trace!(
                path = %self.path.display(),
                emitted = self.emitted,
                expected = self.expected,
                "Media body released before completion"
            );
        }
    }
}
