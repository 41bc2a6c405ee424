//! HTTP response types and utilities.

use std::fmt;
use std::time::SystemTime;

/// Value of the `Server` header.
pub const SERVER_NAME: &str = "statichttp-rs";

/// HTTP status codes with their standard reason phrases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok = 200,
    PartialContent = 206,
    BadRequest = 400,
    Forbidden = 403,
    NotFound = 404,
    RangeNotSatisfiable = 416,
    InternalServerError = 500,
    ServiceUnavailable = 503,
}

impl StatusCode {
    /// Get the numeric code.
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Get the reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::PartialContent => "Partial Content",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::RangeNotSatisfiable => "Range Not Satisfiable",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::ServiceUnavailable => "Service Unavailable",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

/// Status line and headers of a response, written before any body bytes.
#[derive(Debug, Clone)]
pub struct ResponseHead {
    /// The HTTP status code
    pub status: StatusCode,
    /// The `Content-Type` value
    pub content_type: &'static str,
    /// Exact number of body bytes that follow the head
    pub content_length: u64,
    /// The `Content-Range` value for partial responses
    pub content_range: Option<String>,
    /// Modification time of the served file
    pub last_modified: Option<SystemTime>,
    /// Whether to advertise `Accept-Ranges: bytes`
    pub accept_ranges: bool,
}

impl ResponseHead {
    /// Create a response head with the mandatory fields.
    pub fn new(status: StatusCode, content_type: &'static str, content_length: u64) -> Self {
        Self {
            status,
            content_type,
            content_length,
            content_range: None,
            last_modified: None,
            accept_ranges: false,
        }
    }

    /// Set the `Content-Range` header.
    pub fn with_content_range(mut self, value: impl Into<String>) -> Self {
        self.content_range = Some(value.into());
        self
    }

    /// Set the `Last-Modified` header, if the time is known.
    pub fn with_last_modified(mut self, modified: Option<SystemTime>) -> Self {
        self.last_modified = modified;
        self
    }

    /// Advertise byte-range support.
    pub fn with_accept_ranges(mut self) -> Self {
        self.accept_ranges = true;
        self
    }

    /// Convert the head to bytes, including the blank line that ends it.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!(
            "HTTP/1.1 {code} {reason}\r\n",
            code = self.status.as_u16(),
            reason = self.status.reason_phrase()
        );

        head.push_str(&format!("Server: {SERVER_NAME}\r\n"));
        head.push_str(&format!("Content-Length: {}\r\n", self.content_length));
        head.push_str(&format!("Content-Type: {}\r\n", self.content_type));
        if let Some(range) = &self.content_range {
            head.push_str(&format!("Content-Range: {range}\r\n"));
        }
        if self.accept_ranges {
            head.push_str("Accept-Ranges: bytes\r\n");
        }
        if let Some(modified) = self.last_modified {
            head.push_str(&format!("Last-Modified: {}\r\n", httpdate::fmt_http_date(modified)));
        }
        head.push_str("Connection: close\r\n");

        // Add the empty line that separates headers from body
        head.push_str("\r\n");

        head.into_bytes()
    }
}
