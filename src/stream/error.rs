//! Error types for buffered stream I/O.

use thiserror::Error;

/// Errors raised by the buffered reader and the write helpers.
///
/// Every variant is a connection-level fault: once one of these surfaces the
/// peer is presumed gone and no HTTP response should be attempted.
#[derive(Debug, Error)]
pub enum Error {
    /// The underlying read or write failed with a non-retryable error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The source reached end-of-stream before the requested byte count.
    #[error("Short read: expected {expected} bytes, received {received}")]
    ShortRead { expected: u64, received: u64 },

    /// The sink stopped accepting bytes before the whole buffer was written.
    #[error("Short write: expected {expected} bytes, wrote {written}")]
    ShortWrite { expected: usize, written: usize },
}
