use std::io;

use thiserror::Error;

/// Failures while reading a request head off the wire.
///
/// No variant is recoverable. The parsers never backtrack, so the first
/// unexpected byte is terminal for the whole request and the caller should
/// drop the connection.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("stream ended inside the request head")]
    UnexpectedEof,

    #[error("expected {expected:?}")]
    Unexpected { expected: char },

    #[error("unknown http method")]
    UnknownMethod,

    #[error("unknown http version")]
    UnknownVersion,

    #[error("malformed line ending")]
    BadLineEnding,

    #[error("request path does not fit the path store")]
    PathOverflow,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn expected(byte: u8) -> Self {
        Self::Unexpected { expected: char::from(byte) }
    }
}
