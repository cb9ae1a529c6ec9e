//! Request-line decoding.
//!
//! Grammar: `METHOD SP PATH SP VERSION CRLF`. Method and version tokens
//! are matched case-sensitively against fixed sets; the path is captured
//! into a caller-provided bounded store. A token that matches nothing, a
//! missing separator, or a path that does not fit all fail the parse with
//! zero recovery.

use http::{Method, Version};
use tracing::trace;

use crate::buffer::Store;
use crate::io::{Reader, Source};
use crate::protocol::{ParseError, RequestLine};
use crate::utils::is_whitespace;

use super::{expect_char, require_crlf};

// Long enough for OPTIONS/CONNECT and for HTTP/x.y. A longer token fills
// the buffer, fails the table match, and the parse dies with it.
const TOKEN_LENGTH: usize = 8;

/// Reads and validates one request line, leaving the stream at the first
/// header byte.
///
/// The path bytes land in `path`; the returned [`RequestLine`] carries the
/// method and version. Path overflow is an error here, not a silent
/// truncation: a handler routing on a half path would be worse than a
/// dropped connection.
pub async fn read_request_line<S: Source>(
    reader: &mut Reader<S>,
    path: &mut impl Store,
) -> Result<RequestLine, ParseError> {
    let mut token = [0u8; TOKEN_LENGTH];

    let n = reader.read_into_while(&mut token, |b| !is_whitespace(b)).await?;
    let method = match &token[..n] {
        b"GET" => Method::GET,
        b"POST" => Method::POST,
        b"PUT" => Method::PUT,
        b"DELETE" => Method::DELETE,
        b"HEAD" => Method::HEAD,
        b"OPTIONS" => Method::OPTIONS,
        b"TRACE" => Method::TRACE,
        b"CONNECT" => Method::CONNECT,
        b"PATCH" => Method::PATCH,
        _ => return Err(ParseError::UnknownMethod),
    };
    expect_char(reader, b' ').await?;

    if !reader.read_into_store_while(path, |b| !is_whitespace(b)).await? {
        return Err(ParseError::PathOverflow);
    }
    expect_char(reader, b' ').await?;

    let n = reader.read_into_while(&mut token, |b| !is_whitespace(b)).await?;
    let version = match &token[..n] {
        b"HTTP/1.0" => Version::HTTP_10,
        b"HTTP/1.1" => Version::HTTP_11,
        b"HTTP/2.0" => Version::HTTP_2,
        _ => return Err(ParseError::UnknownVersion),
    };
    require_crlf(reader).await?;

    trace!(%method, ?version, "request line parsed");

    Ok(RequestLine { method, version })
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use crate::buffer::FixedBuffer;
    use crate::io::mem::Trickle;
    use crate::task::block_on;

    use super::*;

    fn parse(input: &'static [u8]) -> (Result<RequestLine, ParseError>, FixedBuffer<64>) {
        let mut reader = Reader::new(Bytes::from_static(input));
        let mut path = FixedBuffer::<64>::new();
        let line = block_on(read_request_line(&mut reader, &mut path));
        (line, path)
    }

    #[test]
    fn parses_a_simple_get() {
        let (line, path) = parse(b"GET /x HTTP/1.1\r\n");
        let line = line.unwrap();
        assert_eq!(line.method, Method::GET);
        assert_eq!(line.version, Version::HTTP_11);
        assert_eq!(path.as_slice(), b"/x");
    }

    #[test]
    fn parses_every_supported_method() {
        for (token, method) in [
            (&b"GET"[..], Method::GET),
            (b"POST", Method::POST),
            (b"PUT", Method::PUT),
            (b"DELETE", Method::DELETE),
            (b"HEAD", Method::HEAD),
            (b"OPTIONS", Method::OPTIONS),
            (b"TRACE", Method::TRACE),
            (b"CONNECT", Method::CONNECT),
            (b"PATCH", Method::PATCH),
        ] {
            let mut request = token.to_vec();
            request.extend_from_slice(b" / HTTP/1.0\r\n");
            let mut reader = Reader::new(Bytes::from(request));
            let mut path = FixedBuffer::<16>::new();
            let line = block_on(read_request_line(&mut reader, &mut path)).unwrap();
            assert_eq!(line.method, method);
            assert_eq!(line.version, Version::HTTP_10);
        }
    }

    #[test]
    fn method_matching_is_case_sensitive() {
        let (line, _) = parse(b"get /x HTTP/1.1\r\n");
        assert!(matches!(line, Err(ParseError::UnknownMethod)));
    }

    #[test]
    fn rejects_unknown_version() {
        let (line, _) = parse(b"GET /x HTTP/9.9\r\n");
        assert!(matches!(line, Err(ParseError::UnknownVersion)));
    }

    #[test]
    fn demands_a_space_after_the_path() {
        let (line, _) = parse(b"GET /x\r\n");
        assert!(matches!(line, Err(ParseError::Unexpected { expected: ' ' })));
    }

    #[test]
    fn demands_the_line_terminator() {
        let (line, _) = parse(b"GET /x HTTP/1.1 extra\r\n");
        assert!(matches!(line, Err(ParseError::BadLineEnding)));
    }

    #[test]
    fn truncated_line_is_eof() {
        let (line, _) = parse(b"GET");
        assert!(matches!(line, Err(ParseError::UnexpectedEof)));
    }

    #[test]
    fn oversized_path_is_an_error() {
        let mut reader = Reader::new(Bytes::from_static(b"GET /abc HTTP/1.1\r\n"));
        let mut path = FixedBuffer::<2>::new();
        let line = block_on(read_request_line(&mut reader, &mut path));
        assert!(matches!(line, Err(ParseError::PathOverflow)));
    }

    #[test]
    fn survives_byte_at_a_time_delivery() {
        let mut reader = Reader::new(Trickle::new(&b"POST /items HTTP/1.1\r\n"[..], 1));
        let mut path = FixedBuffer::<64>::new();
        let line = block_on(read_request_line(&mut reader, &mut path)).unwrap();
        assert_eq!(line.method, Method::POST);
        assert_eq!(path.as_slice(), b"/items");
    }
}
