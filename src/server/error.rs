//! Error types for the HTTP server.

use std::io;
use thiserror::Error;

use crate::parser::Error as ParserError;
use crate::server::response::StatusCode;
use crate::stream::Error as StreamError;

/// Errors that can occur during HTTP server operation.
#[derive(Debug, Error)]
pub enum Error {
    /// Error parsing an HTTP request.
    #[error("Parse error: {0}")]
    ParseError(#[from] ParserError),

    /// Requested resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Requested resource exists but may not be served.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The requested byte range lies outside the resource.
    #[error("Requested range not satisfiable for a {size}-byte resource")]
    RangeNotSatisfiable { size: u64 },

    /// Internal server error.
    #[error("Internal server error: {0}")]
    InternalError(String),

    /// The connection failed while reading or writing.
    #[error("Stream error: {0}")]
    StreamError(#[from] StreamError),

    /// I/O error outside a connection (binding, accepting, reading config).
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// The server configuration is invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl Error {
    /// Map a filesystem error on `path` to the matching HTTP failure.
    pub fn from_fs(err: io::Error, path: &str) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Error::NotFound(path.to_string()),
            io::ErrorKind::PermissionDenied => Error::Forbidden(path.to_string()),
            _ => Error::InternalError(format!("{path}: {err}")),
        }
    }

    /// Message shown to the client on the error page.
    ///
    /// Internal failures get a fixed text so filesystem details stay in the log.
    pub fn client_message(&self) -> String {
        match self.status() {
            Some(StatusCode::InternalServerError) => {
                "The server could not complete the request".to_string()
            }
            _ => self.to_string(),
        }
    }

    /// The status to answer this error with.
    ///
    /// `None` means the connection itself is broken and no response should be
    /// attempted.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::ParseError(e) if e.is_bad_request() => Some(StatusCode::BadRequest),
            Error::ParseError(_) => None,
            Error::NotFound(_) => Some(StatusCode::NotFound),
            Error::Forbidden(_) => Some(StatusCode::Forbidden),
            Error::RangeNotSatisfiable { .. } => Some(StatusCode::RangeNotSatisfiable),
            Error::InternalError(_) | Error::ConfigError(_) | Error::JsonError(_) => {
                Some(StatusCode::InternalServerError)
            }
            Error::StreamError(_) | Error::IoError(_) => None,
        }
    }
}
