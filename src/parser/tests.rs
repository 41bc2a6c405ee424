//! Tests for the HTTP parser.

#[cfg(test)]
mod tests {
    use crate::parser::{
        decode_path, encode_path, parse_request, url_decode, ByteRange, Error, HttpRequest, HttpVersion, Method,
        ResolvedRange, MAX_HEADER_LINES, MAX_LINE_LEN, MAX_PATH_LEN,
    };
    use crate::stream::BufferedReader;

    async fn parse(input: &[u8]) -> Result<HttpRequest, Error> {
        let mut reader = BufferedReader::new(input);
        parse_request(&mut reader).await
    }

    #[tokio::test]
    async fn test_parse_simple_get_request() {
        let result = parse(b"GET /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n").await.unwrap();
        assert_eq!(result.method, Method::GET);
        assert_eq!(result.path, "/index.html");
        assert_eq!(result.version, HttpVersion::Http11);
        assert_eq!(result.range, None);
    }

    #[tokio::test]
    async fn test_parse_request_with_range() {
        let request = b"GET /video.mp4 HTTP/1.1\r\nHost: example.com\r\nRange: bytes=100-199\r\nAccept: */*\r\n\r\n";
        let result = parse(request).await.unwrap();
        assert_eq!(result.range, Some(ByteRange { start: 100, end: Some(199) }));
    }

    #[tokio::test]
    async fn test_parse_open_ended_range_case_insensitive_header() {
        let result = parse(b"GET /a HTTP/1.0\r\nrange: bytes=42-\r\n\r\n").await.unwrap();
        assert_eq!(result.range, Some(ByteRange { start: 42, end: None }));
        assert_eq!(result.version, HttpVersion::Http10);
    }

    #[tokio::test]
    async fn test_malformed_range_is_ignored() {
        for value in ["bytes=abc-", "bytes=-500", "items=0-1", "bytes=0-1,5-9", "bytes=7"] {
            let request = format!("GET /file.txt HTTP/1.1\r\nRange: {value}\r\n\r\n");
            let result = parse(request.as_bytes()).await.unwrap();
            assert_eq!(result.range, None, "value {value:?}");
            assert_eq!(result.path, "/file.txt");
        }
    }

    #[tokio::test]
    async fn test_request_without_headers_or_blank_line() {
        let result = parse(b"GET / HTTP/1.0\r\n").await.unwrap();
        assert_eq!(result.path, "/");
    }

    #[tokio::test]
    async fn test_bare_newline_terminators() {
        let result = parse(b"GET /x HTTP/1.1\nRange: bytes=1-2\n\n").await.unwrap();
        assert_eq!(result.path, "/x");
        assert_eq!(result.range, Some(ByteRange { start: 1, end: Some(2) }));
    }

    #[tokio::test]
    async fn test_invalid_method() {
        let result = parse(b"POST /index.html HTTP/1.1\r\n\r\n").await;
        assert!(matches!(result, Err(Error::InvalidMethod(ref m)) if m == "POST"));
    }

    #[tokio::test]
    async fn test_invalid_http_version() {
        let result = parse(b"GET /index.html HTTP/9.9\r\n\r\n").await;
        assert!(matches!(result, Err(Error::InvalidVersion(ref v)) if v == "HTTP/9.9"));
    }

    #[tokio::test]
    async fn test_incomplete_request_line() {
        let result = parse(b"GET /index.html\r\n\r\n").await;
        assert!(matches!(result, Err(Error::MalformedRequestLine(_))));

        let result = parse(b"GET\r\n").await;
        assert!(matches!(result, Err(Error::MalformedRequestLine(_))));
    }

    #[tokio::test]
    async fn test_empty_request() {
        let result = parse(b"").await;
        assert!(matches!(result, Err(Error::EmptyRequest)));
        assert!(!result.unwrap_err().is_bad_request());
    }

    #[tokio::test]
    async fn test_bad_percent_escape_in_target() {
        let result = parse(b"GET /a%ZZb HTTP/1.1\r\n\r\n").await;
        assert!(matches!(result, Err(Error::InvalidPercentEncoding(_))));
        assert!(result.unwrap_err().is_bad_request());
    }

    #[tokio::test]
    async fn test_too_many_headers() {
        let mut request = String::from("GET / HTTP/1.1\r\n");
        for i in 0..=MAX_HEADER_LINES {
            request.push_str(&format!("X-Header-{i}: value\r\n"));
        }
        request.push_str("\r\n");

        let result = parse(request.as_bytes()).await;
        assert!(matches!(result, Err(Error::TooManyHeaders(_))));
    }

    #[tokio::test]
    async fn test_overlong_header_line_is_rejected() {
        // the tail of the cut-off line is a bare CRLF
        let cookie = "a".repeat(MAX_LINE_LEN - "Cookie: ".len());
        let request = format!("GET /x.txt HTTP/1.1\r\nCookie: {cookie}\r\nRange: bytes=0-3\r\n\r\n");
        let result = parse(request.as_bytes()).await;
        assert!(matches!(result, Err(Error::LineTooLong(MAX_LINE_LEN))));
        assert!(result.unwrap_err().is_bad_request());
    }

    #[tokio::test]
    async fn test_header_line_at_limit_is_accepted() {
        let cookie = "a".repeat(MAX_LINE_LEN - "Cookie: \r\n".len());
        let request = format!("GET /x.txt HTTP/1.1\r\nCookie: {cookie}\r\nRange: bytes=0-3\r\n\r\n");
        let result = parse(request.as_bytes()).await.unwrap();
        assert_eq!(result.range, Some(ByteRange { start: 0, end: Some(3) }));
    }

    #[tokio::test]
    async fn test_overlong_request_line_is_rejected() {
        let request = format!("GET /{} HTTP/1.1\r\n\r\n", "a".repeat(MAX_LINE_LEN));
        let result = parse(request.as_bytes()).await;
        assert!(matches!(result, Err(Error::LineTooLong(_))));
    }

    #[tokio::test]
    async fn test_reader_is_left_after_header_block() {
        let input: &[u8] = b"GET / HTTP/1.1\r\nHost: a\r\n\r\ntrailing";
        let mut reader = BufferedReader::with_capacity(8, input);
        parse_request(&mut reader).await.unwrap();
        assert_eq!(reader.read_full(8).await.unwrap(), b"trailing");
    }

    #[test]
    fn test_url_decode() {
        assert_eq!(url_decode("%2Fa%20b", MAX_PATH_LEN).unwrap(), "/a b");
        assert_eq!(url_decode("a+b", MAX_PATH_LEN).unwrap(), "a+b");
        assert_eq!(url_decode("%e2%82%ac", MAX_PATH_LEN).unwrap(), "\u{20ac}");
    }

    #[test]
    fn test_url_decode_rejects_malformed_escapes() {
        assert!(matches!(url_decode("%ZZ", MAX_PATH_LEN), Err(Error::InvalidPercentEncoding(_))));
        assert!(matches!(url_decode("abc%", MAX_PATH_LEN), Err(Error::InvalidPercentEncoding(_))));
        assert!(matches!(url_decode("abc%4", MAX_PATH_LEN), Err(Error::InvalidPercentEncoding(_))));
        assert!(matches!(url_decode("%ff", MAX_PATH_LEN), Err(Error::InvalidPath(_))));
    }

    #[test]
    fn test_url_decode_length_limit() {
        assert_eq!(url_decode("abcd", 4).unwrap(), "abcd");
        assert!(matches!(url_decode("abcde", 4), Err(Error::PathTooLong(4))));
        // escapes count as one decoded byte
        assert_eq!(url_decode("%41%42%43%44", 4).unwrap(), "ABCD");
    }

    #[test]
    fn test_decode_path_normalises() {
        assert_eq!(decode_path("/").unwrap(), "/");
        assert_eq!(decode_path("/a//b/./c/").unwrap(), "/a/b/c");
        assert_eq!(decode_path("/a/b/../c").unwrap(), "/a/c");
        assert_eq!(decode_path("/docs/page.html?lang=en#top").unwrap(), "/docs/page.html");
        assert_eq!(decode_path("/my%20file.txt").unwrap(), "/my file.txt");
    }

    #[test]
    fn test_decode_path_rejects_escapes_from_root() {
        assert!(matches!(decode_path("/../etc/passwd"), Err(Error::PathTraversal(_))));
        assert!(matches!(decode_path("/a/../../x"), Err(Error::PathTraversal(_))));
        assert!(matches!(decode_path("/%2E%2E/secret"), Err(Error::PathTraversal(_))));
        assert!(matches!(decode_path("/a%2F..%2F..%2Fx"), Err(Error::PathTraversal(_))));
    }

    #[test]
    fn test_decode_path_rejects_bad_targets() {
        assert!(matches!(decode_path("index.html"), Err(Error::InvalidPath(_))));
        assert!(matches!(decode_path("http://host/x"), Err(Error::InvalidPath(_))));
        assert!(matches!(decode_path("/a%00b"), Err(Error::InvalidPath(_))));
        let long = format!("/{}", "a".repeat(MAX_PATH_LEN));
        assert!(matches!(decode_path(&long), Err(Error::PathTooLong(_))));
    }

    #[test]
    fn test_encode_path_round_trips_through_decode() {
        let encoded = encode_path("/my docs/r\u{e9}sum\u{e9} #1.txt");
        assert_eq!(encoded, "/my%20docs/r%C3%A9sum%C3%A9%20%231.txt");
        assert_eq!(decode_path(&encoded).unwrap(), "/my docs/r\u{e9}sum\u{e9} #1.txt");
    }

    #[test]
    fn test_range_resolution() {
        let size = 1000;
        let range = ByteRange { start: 0, end: Some(99) };
        assert_eq!(range.resolve(size), Some(ResolvedRange { start: 0, end: 99 }));

        let open = ByteRange { start: 900, end: None };
        let resolved = open.resolve(size).unwrap();
        assert_eq!(resolved, ResolvedRange { start: 900, end: 999 });
        assert_eq!(resolved.len(), 100);
        assert_eq!(resolved.content_range(size), "bytes 900-999/1000");

        let overlong = ByteRange { start: 10, end: Some(5000) };
        assert_eq!(overlong.resolve(size), Some(ResolvedRange { start: 10, end: 999 }));

        let single = ByteRange { start: 999, end: Some(999) };
        assert_eq!(single.resolve(size).unwrap().len(), 1);
    }

    #[test]
    fn test_unsatisfiable_ranges() {
        assert_eq!(ByteRange { start: 1000, end: None }.resolve(1000), None);
        assert_eq!(ByteRange { start: 5, end: Some(2) }.resolve(1000), None);
        assert_eq!(ByteRange { start: 0, end: None }.resolve(0), None);
    }
}
