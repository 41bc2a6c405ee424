//! Fixed-capacity buffered reader.

use std::io::ErrorKind;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::stream::error::Error;

/// Default capacity of the internal buffer, also the longest request line we accept.
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// A buffered reader over a raw byte stream.
///
/// The reader owns a fixed-capacity byte arena together with a cursor and a
/// count of unread bytes. `cursor + unread` never exceeds the capacity, and the
/// arena is only refilled once every buffered byte has been handed out.
pub struct BufferedReader<R> {
    inner: R,
    buf: Box<[u8]>,
    cursor: usize,
    unread: usize,
}

impl<R: AsyncRead + Unpin> BufferedReader<R> {
    /// Create a reader with the default buffer capacity.
    pub fn new(inner: R) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE, inner)
    }

    /// Create a reader with the given buffer capacity (at least one byte).
    pub fn with_capacity(capacity: usize, inner: R) -> Self {
        Self {
            inner,
            buf: vec![0; capacity.max(1)].into_boxed_slice(),
            cursor: 0,
            unread: 0,
        }
    }

    /// Read one line of at most `max_len` bytes.
    ///
    /// The returned bytes include the `\n` terminator when one was found within
    /// `max_len` bytes. A line cut short by `max_len` or by end-of-stream is
    /// returned without a terminator; the remainder stays buffered for the next
    /// call.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if the stream ended before any byte of the line was read,
    /// otherwise the line bytes. A `max_len` of zero yields an empty line.
    pub async fn read_line(&mut self, max_len: usize) -> Result<Option<Vec<u8>>, Error> {
        let mut line = Vec::new();

        while line.len() < max_len {
            if !self.fill().await? {
                if line.is_empty() {
                    return Ok(None);
                }
                break;
            }

            let want = max_len - line.len();
            let available = &self.buf[self.cursor..self.cursor + self.unread];
            let window = &available[..available.len().min(want)];

            if let Some(pos) = window.iter().position(|&b| b == b'\n') {
                line.extend_from_slice(&window[..=pos]);
                self.consume(pos + 1);
                return Ok(Some(line));
            }

            let taken = window.len();
            line.extend_from_slice(window);
            self.consume(taken);
        }

        Ok(Some(line))
    }

    /// Read exactly `n` bytes.
    ///
    /// Fails with [`Error::ShortRead`] if the peer closes the stream first.
    pub async fn read_full(&mut self, n: usize) -> Result<Vec<u8>, Error> {
        let mut out = Vec::with_capacity(n);

        while out.len() < n {
            if !self.fill().await? {
                return Err(Error::ShortRead {
                    expected: n as u64,
                    received: out.len() as u64,
                });
            }

            let take = self.unread.min(n - out.len());
            out.extend_from_slice(&self.buf[self.cursor..self.cursor + take]);
            self.consume(take);
        }

        Ok(out)
    }

    /// Refill the arena if it is empty. Returns `false` on end-of-stream.
    async fn fill(&mut self) -> Result<bool, Error> {
        while self.unread == 0 {
            match self.inner.read(&mut self.buf[..]).await {
                Ok(0) => return Ok(false),
                Ok(n) => {
                    self.cursor = 0;
                    self.unread = n;
                }
                // interrupted by a signal, retry
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::Io(e)),
            }
        }
        Ok(true)
    }

    fn consume(&mut self, n: usize) {
        debug_assert!(n <= self.unread);
        self.cursor += n;
        self.unread -= n;
    }
}
