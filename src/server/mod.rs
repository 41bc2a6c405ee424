//! HTTP server implementation for statichttp-rs.
//!
//! This module answers parsed requests from a document root: whole files,
//! byte ranges of files, generated directory listings and HTML error pages.
//! Each accepted connection carries exactly one request and is then closed.

mod access_log;
mod config;
mod connection;
mod content;
mod error;
mod error_page;
mod html;
mod http_server;
mod listing;
mod response;

// Re-export public items
pub use access_log::{log_access, ACCESS_LOG_TARGET};
pub use config::ServerConfig;
pub use connection::{process_connection, Connection};
pub use content::{resolve_target, serve_content, FileInfo, TRANSFER_CHUNK_SIZE};
pub use error::Error;
pub use error_page::{error_page, respond_error};
pub use http_server::HttpServer;
pub use listing::{format_size, render_listing};
pub use response::{ResponseHead, StatusCode, SERVER_NAME};
