//! File-extension to content-type resolution.

/// A single extension to content-type mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MimeEntry {
    /// Extension suffix, including the leading dot.
    pub extension: &'static str,
    /// Content-type sent for files with this extension.
    pub content_type: &'static str,
}

/// Content-type used when no table entry matches.
pub const DEFAULT_MIME_TYPE: &str = "text/plain";

/// Ordered, read-only extension table shared by every connection.
pub static MIME_TYPES: &[MimeEntry] = &[
    MimeEntry { extension: ".css", content_type: "text/css" },
    MimeEntry { extension: ".gif", content_type: "image/gif" },
    MimeEntry { extension: ".htm", content_type: "text/html" },
    MimeEntry { extension: ".html", content_type: "text/html" },
    MimeEntry { extension: ".jpeg", content_type: "image/jpeg" },
    MimeEntry { extension: ".jpg", content_type: "image/jpeg" },
    MimeEntry { extension: ".ico", content_type: "image/x-icon" },
    MimeEntry { extension: ".js", content_type: "application/javascript" },
    MimeEntry { extension: ".pdf", content_type: "application/pdf" },
    MimeEntry { extension: ".mp4", content_type: "video/mp4" },
    MimeEntry { extension: ".png", content_type: "image/png" },
    MimeEntry { extension: ".svg", content_type: "image/svg+xml" },
    MimeEntry { extension: ".xml", content_type: "text/xml" },
];

/// Resolve the content-type for `filename`.
///
/// The extension is everything from the last `.` onwards and is matched
/// case-sensitively against [`MIME_TYPES`] in table order. Names without a dot,
/// or with an unknown extension, resolve to [`DEFAULT_MIME_TYPE`].
///
/// # Examples
///
/// ```
/// use statichttp_rs::mime::resolve;
///
/// assert_eq!(resolve("index.html"), "text/html");
/// assert_eq!(resolve("archive.tar.gz"), "text/plain");
/// assert_eq!(resolve("README"), "text/plain");
/// ```
pub fn resolve(filename: &str) -> &'static str {
    let Some(dot) = filename.rfind('.') else {
        return DEFAULT_MIME_TYPE;
    };
    let extension = &filename[dot..];

    MIME_TYPES
        .iter()
        .find(|entry| entry.extension == extension)
        .map(|entry| entry.content_type)
        .unwrap_or(DEFAULT_MIME_TYPE)
}
