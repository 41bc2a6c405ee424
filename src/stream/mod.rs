//! Buffered socket I/O.
//!
//! This module provides the byte-accounting layer underneath the parser and
//! the responders: a fixed-capacity buffered reader with line-oriented and
//! exact-length reads, plus write helpers that either move every byte or fail.

mod error;
mod reader;
mod writer;
mod tests;

// Re-export public items
pub use error::Error;
pub use reader::{BufferedReader, DEFAULT_BUFFER_SIZE};
pub use writer::{copy_exact, write_full};
