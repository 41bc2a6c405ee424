//! A minimal static file HTTP server.
//!
//! This library serves files and generated directory listings from a document
//! root over plain HTTP/1.1, one request per connection. Requests are read
//! through a hand-rolled buffered reader and parsed manually; responses carry
//! exact `Content-Length` accounting and honour single `Range: bytes=` requests.
//!
//! # Features
//!
//! - Buffered, line-oriented socket reading with exact-length reads
//! - `GET` request parsing with percent-decoding and path normalisation
//! - Whole-file (`200`) and byte-range (`206`) responses
//! - Generated HTML directory listings
//! - Minimal HTML error pages for `400`, `403`, `404`, `416`, `500` and `503`
//! - One access log record per connection through the `log` facade
//!
//! # Examples
//!
//! ## Parsing a request
//!
//! ```
//! use statichttp_rs::{parse_request, BufferedReader, ByteRange};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let raw: &[u8] = b"GET /movies/clip%201.mp4 HTTP/1.1\r\nRange: bytes=0-1023\r\n\r\n";
//! let mut reader = BufferedReader::new(raw);
//!
//! let request = parse_request(&mut reader).await.unwrap();
//! assert_eq!(request.path, "/movies/clip 1.mp4");
//! assert_eq!(request.range, Some(ByteRange { start: 0, end: Some(1023) }));
//! # }
//! ```
//!
//! ## Running a server
//!
//! ```no_run
//! use statichttp_rs::{HttpServer, ServerConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), statichttp_rs::ServerError> {
//! let config = ServerConfig {
//!     root: "./public".into(),
//!     ..ServerConfig::default()
//! };
//!
//! HttpServer::new(config).start().await
//! # }
//! ```

// Export the buffered stream module
pub mod stream;

// Export the MIME resolver
pub mod mime;

// Export the parser module
pub mod parser;

// Export the server module
pub mod server;

// Re-export commonly used items for convenience
pub use stream::{BufferedReader, Error as StreamError};
pub use parser::{parse_request, ByteRange, Error as ParserError, HttpRequest, HttpVersion, Method};
pub use server::{
    process_connection, Error as ServerError, HttpServer, ServerConfig, StatusCode,
};
