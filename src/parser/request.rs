//! HTTP request parsing and representation.

use std::str::FromStr;
use log::debug;
use tokio::io::AsyncRead;

use crate::parser::error::Error;
use crate::parser::method::Method;
use crate::parser::url::decode_path;
use crate::parser::version::HttpVersion;
use crate::stream::BufferedReader;

/// Longest request or header line read in one piece.
pub const MAX_LINE_LEN: usize = 1024;

/// Most header lines accepted before the request is rejected.
pub const MAX_HEADER_LINES: usize = 100;

/// A byte range as sent in `Range: bytes=<start>-<end>`.
///
/// `end` is inclusive; `None` means "through the end of the file" and is only
/// resolved once the file size is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: Option<u64>,
}

/// A byte range checked against a concrete file size.
///
/// Always satisfies `start <= end < size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Parse a `Range` header value.
    ///
    /// Returns `None` for anything other than a single `bytes=<start>-[<end>]`
    /// range with decimal bounds.
    pub fn parse(value: &str) -> Option<Self> {
        let spec = value.trim().strip_prefix("bytes=")?;
        let (start, end) = spec.split_once('-')?;

        let start = start.trim().parse::<u64>().ok()?;
        let end = match end.trim() {
            "" => None,
            end => Some(end.parse::<u64>().ok()?),
        };

        Some(Self { start, end })
    }

    /// Resolve this range against a file of `size` bytes.
    ///
    /// An open or overlong end is clamped to the last byte. Returns `None` when
    /// the range is inverted or starts at or beyond the end of the file.
    pub fn resolve(&self, size: u64) -> Option<ResolvedRange> {
        if self.start >= size {
            return None;
        }
        let last = size - 1;
        let end = match self.end {
            Some(end) if end < self.start => return None,
            Some(end) => end.min(last),
            None => last,
        };

        Some(ResolvedRange { start: self.start, end })
    }
}

impl ResolvedRange {
    /// Number of bytes covered by the range.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Always `false`; a resolved range covers at least one byte.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Value for the `Content-Range` response header.
    pub fn content_range(&self, size: u64) -> String {
        format!("bytes {}-{}/{size}", self.start, self.end)
    }
}

/// Represents an HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// The HTTP method
    pub method: Method,
    /// The decoded, normalised request path (always starts with `/`)
    pub path: String,
    /// The HTTP version
    pub version: HttpVersion,
    /// The requested byte range, if the client sent a usable `Range` header
    pub range: Option<ByteRange>,
}

impl HttpRequest {
    /// Create a new HTTP request.
    ///
    /// # Arguments
    ///
    /// * `method` - The HTTP method
    /// * `path` - The decoded request path
    /// * `version` - The HTTP version
    /// * `range` - The optional byte range
    pub fn new(method: Method, path: String, version: HttpVersion, range: Option<ByteRange>) -> Self {
        Self {
            method,
            path,
            version,
            range,
        }
    }
}

/// Parse an HTTP request from a buffered connection.
///
/// Reads the request line and then header lines up to and including the empty
/// line that ends the header block. A malformed `Range` header is ignored
/// rather than failing the request.
///
/// # Arguments
///
/// * `reader` - The buffered connection to read from
///
/// # Returns
///
/// The parsed HTTP request, or an error if the request is invalid
pub async fn parse_request<R>(reader: &mut BufferedReader<R>) -> Result<HttpRequest, Error>
where
    R: AsyncRead + Unpin,
{
    // Parse the request line
    let line = match read_bounded_line(reader).await? {
        Some(line) => line,
        None => return Err(Error::EmptyRequest),
    };
    let line = String::from_utf8_lossy(&line);
    let request_line = line.trim_end_matches(|c: char| c == '\r' || c == '\n');

    // Split the request line into method, target, and version
    let parts: Vec<&str> = request_line.split_ascii_whitespace().collect();
    if parts.len() != 3 {
        return Err(Error::MalformedRequestLine(request_line.to_string()));
    }

    let method = Method::from_str(parts[0])?;
    let path = decode_path(parts[1])?;
    let version = HttpVersion::from_str(parts[2])?;

    // Read the header block, keeping only Range
    let mut range = None;
    let mut header_lines = 0;
    while let Some(line) = read_bounded_line(reader).await? {
        if line == b"\r\n" || line == b"\n" {
            break;
        }

        header_lines += 1;
        if header_lines > MAX_HEADER_LINES {
            return Err(Error::TooManyHeaders(MAX_HEADER_LINES));
        }

        let line = String::from_utf8_lossy(&line);
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("Range") {
                range = ByteRange::parse(value);
                if range.is_none() {
                    debug!("Ignoring malformed Range header: {value}", value = value.trim());
                }
            }
        }
    }

    Ok(HttpRequest::new(method, path, version, range))
}

/// Read one line, failing if it runs past [`MAX_LINE_LEN`] without a `\n`.
///
/// A cut-off line would otherwise leave its tail to be read as the next line.
async fn read_bounded_line<R>(reader: &mut BufferedReader<R>) -> Result<Option<Vec<u8>>, Error>
where
    R: AsyncRead + Unpin,
{
    match reader.read_line(MAX_LINE_LEN).await? {
        Some(line) if line.len() >= MAX_LINE_LEN && !line.ends_with(b"\n") => {
            Err(Error::LineTooLong(MAX_LINE_LEN))
        }
        line => Ok(line),
    }
}
