//! Streaming codecs for the request head and the response head.
//!
//! Decoders are plain async functions composed from the [`Reader`]
//! combinators, so they inherit the combinators' suspension behavior: a
//! call completes only once its grammar is satisfied, violated, or the
//! stream ends. There is no intermediate buffering layer; bytes come
//! straight off the connection.
//!
//! Grammar failures are terminal: callers drop the connection instead of
//! resynchronizing.

mod header_decoder;
mod request_decoder;
mod response_encoder;

pub use header_decoder::{HeaderVisitor, read_headers};
pub use request_decoder::read_request_line;
pub use response_encoder::{write_content_length, write_header, write_response_line};

use crate::io::{Reader, Source};
use crate::protocol::ParseError;

/// Consumes one byte and demands it be `expected`.
pub(crate) async fn expect_char<S: Source>(
    reader: &mut Reader<S>,
    expected: u8,
) -> Result<(), ParseError> {
    match reader.next_byte().await? {
        None => Err(ParseError::UnexpectedEof),
        Some(byte) if byte == expected => Ok(()),
        Some(_) => Err(ParseError::expected(expected)),
    }
}

/// Demands a CRLF right here.
pub(crate) async fn require_crlf<S: Source>(reader: &mut Reader<S>) -> Result<(), ParseError> {
    match reader.read_crlf().await? {
        Some(true) => Ok(()),
        Some(false) | None => Err(ParseError::BadLineEnding),
    }
}
