//! Error types for the HTTP parser.

use thiserror::Error;

/// Errors that can occur during HTTP request parsing.
#[derive(Debug, Error)]
pub enum Error {
    /// The connection closed before a request line arrived.
    #[error("Empty request")]
    EmptyRequest,

    /// The request line is malformed (wrong format or missing components).
    #[error("Malformed request line: {0}")]
    MalformedRequestLine(String),

    /// The HTTP method in the request is not supported.
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// The HTTP version in the request is not supported.
    #[error("Invalid HTTP version: {0}")]
    InvalidVersion(String),

    /// The request target is not an absolute path, or decodes to bytes that
    /// cannot name a file.
    #[error("Invalid HTTP path: {0}")]
    InvalidPath(String),

    /// A `%` escape is not followed by two hex digits.
    #[error("Malformed percent-encoding in: {0}")]
    InvalidPercentEncoding(String),

    /// The decoded path exceeds the configured maximum.
    #[error("Decoded path exceeds {0} bytes")]
    PathTooLong(usize),

    /// A `..` segment would climb above the document root.
    #[error("Path escapes the document root: {0}")]
    PathTraversal(String),

    /// A request or header line does not end within the line limit.
    #[error("Line exceeds {0} bytes")]
    LineTooLong(usize),

    /// The header block has more lines than we are willing to read.
    #[error("Too many header lines (limit {0})")]
    TooManyHeaders(usize),

    /// Reading from the connection failed.
    #[error("Stream error: {0}")]
    Stream(#[from] crate::stream::Error),
}

impl Error {
    /// Whether this error describes a bad request rather than a broken connection.
    ///
    /// Bad requests are answered with `400 Bad Request`; connection faults are
    /// not answered at all.
    pub fn is_bad_request(&self) -> bool {
        !matches!(self, Error::EmptyRequest | Error::Stream(_))
    }
}
