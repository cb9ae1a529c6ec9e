//! HTTP wire-level types.
//!
//! The request line carries only the method and version; the path lands in
//! whatever bounded store the caller hands to the decoder, so this module
//! stays free of any buffering policy. Method and version reuse the
//! [`http`] crate's types rather than home-grown enums.
//!
//! Supported versions are `HTTP/1.0`, `HTTP/1.1` and `HTTP/2.0` in its
//! textual form; anything else fails the parse.

use http::{Method, StatusCode, Version};

mod error;
pub use error::ParseError;

/// The parsed `METHOD SP PATH SP VERSION CRLF` line, minus the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: Method,
    pub version: Version,
}

/// The `VERSION SP CODE SP REASON CRLF` line of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseLine {
    pub version: Version,
    pub status: StatusCode,
}

impl ResponseLine {
    pub fn new(version: Version, status: StatusCode) -> Self {
        Self { version, status }
    }
}

/// The wire token for a version. Unsupported versions fall back to
/// `HTTP/1.0`, mirroring the decoder's floor.
#[must_use]
pub fn version_token(version: Version) -> &'static [u8] {
    match version {
        Version::HTTP_11 => b"HTTP/1.1",
        Version::HTTP_2 => b"HTTP/2.0",
        _ => b"HTTP/1.0",
    }
}
