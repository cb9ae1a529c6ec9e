//! Failure taxonomy of the codec.
//!
//! Decoding distinguishes byte-level trouble (unexpected byte, early end of
//! stream) from value-level trouble (a literal that is not `true`/`false`/
//! `null`, a string that does not fit its store) and from struct-level
//! trouble (a member missing or seen twice). All of them are terminal: no
//! parser in this crate recovers or backtracks.

use std::io;

use thiserror::Error;

/// Why deserializing a value failed.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The stream ended in the middle of a value.
    #[error("json input ended inside a value")]
    UnexpectedEof,

    /// A byte that no value can start with, or a misplaced separator.
    #[error("unexpected byte 0x{found:02x} in json input")]
    Unexpected { found: u8 },

    /// A literal passed the character prefilter but is not `null`, `true`
    /// or `false`.
    #[error("malformed json literal")]
    InvalidLiteral,

    /// A number was expected and no digits were found.
    #[error("malformed json number")]
    InvalidNumber,

    /// A string value was longer than the store receiving it.
    #[error("json string does not fit its store")]
    StringOverflow,

    /// The object closed before this member was seen.
    #[error("missing member {name:?}")]
    MissingMember { name: &'static str },

    /// The same member appeared twice in one object.
    #[error("duplicate member {name:?}")]
    DuplicateMember { name: &'static str },

    /// The underlying reader failed.
    #[error("read failed below the json codec")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl DecodeError {
    pub(crate) fn unexpected(found: u8) -> Self {
        Self::Unexpected { found }
    }
}

/// Why serializing a value failed.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// NaN and infinities have no JSON representation.
    #[error("non-finite numbers cannot be written as json")]
    NonFinite,

    /// The underlying writer failed or stopped accepting bytes.
    #[error("write failed below the json codec")]
    Io {
        #[from]
        source: io::Error,
    },
}
