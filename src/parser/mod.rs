//! HTTP parser module.
//!
//! This module turns the bytes of a buffered connection into a [`HttpRequest`]:
//! the request line, a percent-decoded and normalised path, and the optional
//! `Range` header. Every other header is read and discarded.

mod request;
mod method;
mod version;
mod url;
mod error;
mod tests;

// Re-export public items
pub use request::{ByteRange, HttpRequest, ResolvedRange, MAX_HEADER_LINES, MAX_LINE_LEN};
pub use method::Method;
pub use version::HttpVersion;
pub use url::{decode_path, encode_path, url_decode, MAX_PATH_LEN};
pub use error::Error;

// Re-export the parse_request function
pub use request::parse_request;
