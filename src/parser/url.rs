//! Request-target decoding and normalisation.

use crate::parser::error::Error;

/// Longest decoded path we accept, in bytes.
pub const MAX_PATH_LEN: usize = 512;

/// Percent-decode `src`.
///
/// Each `%XX` escape becomes the byte it encodes; every other byte, `+`
/// included, is copied as is. Fails on a `%` not followed by two hex digits,
/// when the output would exceed `max_len` bytes, or when the decoded bytes are
/// not UTF-8.
pub fn url_decode(src: &str, max_len: usize) -> Result<String, Error> {
    let bytes = src.as_bytes();
    let mut out = Vec::with_capacity(bytes.len().min(max_len));
    let mut i = 0;

    while i < bytes.len() {
        let byte = if bytes[i] == b'%' {
            let hi = bytes.get(i + 1).copied().and_then(hex_value);
            let lo = bytes.get(i + 2).copied().and_then(hex_value);
            match (hi, lo) {
                (Some(hi), Some(lo)) => {
                    i += 3;
                    (hi << 4) | lo
                }
                _ => return Err(Error::InvalidPercentEncoding(src.to_string())),
            }
        } else {
            i += 1;
            bytes[i - 1]
        };

        if out.len() == max_len {
            return Err(Error::PathTooLong(max_len));
        }
        out.push(byte);
    }

    String::from_utf8(out).map_err(|_| Error::InvalidPath(src.to_string()))
}

/// Turn a raw request target into a normalised, slash-rooted path.
///
/// The query string and fragment are dropped before decoding. Empty and `.`
/// segments are removed and `..` removes the preceding segment; a `..` at the
/// root is rejected rather than clamped.
pub fn decode_path(target: &str) -> Result<String, Error> {
    let raw = target.split(|c: char| c == '?' || c == '#').next().unwrap_or_default();
    if !raw.starts_with('/') {
        return Err(Error::InvalidPath(target.to_string()));
    }

    let decoded = url_decode(raw, MAX_PATH_LEN)?;
    if decoded.contains('\0') {
        return Err(Error::InvalidPath(target.to_string()));
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(Error::PathTraversal(target.to_string()));
                }
            }
            name => segments.push(name),
        }
    }

    Ok(format!("/{}", segments.join("/")))
}

/// Percent-encode a path for use in an `href`.
///
/// Unreserved characters and `/` are kept; every other byte becomes `%XX`.
pub fn encode_path(path: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    let mut out = String::with_capacity(path.len());
    for &byte in path.as_bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                out.push(byte as char)
            }
            _ => {
                out.push('%');
                out.push(HEX[(byte >> 4) as usize] as char);
                out.push(HEX[(byte & 0x0f) as usize] as char);
            }
        }
    }
    out
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
