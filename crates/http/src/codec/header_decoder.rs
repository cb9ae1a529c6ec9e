//! Header-block decoding.
//!
//! The block is a loop of `Name: Value CRLF` lines closed by a blank line.
//! Names and values land in caller-provided bounded stores that are reused
//! across lines; a header that does not fit is consumed but never visited,
//! so one oversized header cannot kill an otherwise healthy request.

use tracing::trace;

use crate::buffer::Store;
use crate::io::{Reader, Source};
use crate::protocol::ParseError;
use crate::utils::{is_space_or_tab, is_whitespace};

use super::{expect_char, require_crlf};

/// Receives each well-formed header as it is parsed.
///
/// Visits happen in wire order, at most once per header line, and only
/// when both the name and the value fit their stores. The slices borrow
/// the decoder's stores and are only valid for the duration of the call.
#[expect(
    async_fn_in_trait,
    reason = "visit futures are driven on one thread and promise no auto traits"
)]
pub trait HeaderVisitor {
    async fn visit(&mut self, name: &[u8], value: &[u8]);
}

impl<V: HeaderVisitor> HeaderVisitor for &mut V {
    async fn visit(&mut self, name: &[u8], value: &[u8]) {
        (**self).visit(name, value).await;
    }
}

/// Parses the whole header block, forwarding each header to `visitor`.
///
/// Line grammar: name until whitespace-or-colon, skip to and consume the
/// `:`, skip spaces and tabs, value until whitespace, then skip to the CR
/// and require CRLF. The blank-line check runs before each line, so an
/// immediate CRLF is a valid zero-header block.
///
/// Leading value whitespace never includes CR or LF; an empty value line
/// (`Name:`) therefore stays framed and is visited with an empty value.
pub async fn read_headers<S: Source>(
    reader: &mut Reader<S>,
    name_store: &mut impl Store,
    value_store: &mut impl Store,
    mut visitor: impl HeaderVisitor,
) -> Result<(), ParseError> {
    loop {
        match reader.read_crlf().await? {
            Some(true) => return Ok(()),
            Some(false) => {}
            None => return Err(ParseError::BadLineEnding),
        }

        name_store.clear();
        value_store.clear();

        let name_fit = reader
            .read_into_store_while(name_store, |b| !is_whitespace(b) && b != b':')
            .await?;
        reader.read_while(|b| b != b':').await?;
        expect_char(reader, b':').await?;
        reader.read_while(is_space_or_tab).await?;
        let value_fit = reader
            .read_into_store_while(value_store, |b| !is_whitespace(b))
            .await?;

        if name_fit && value_fit {
            visitor.visit(name_store.as_slice(), value_store.as_slice()).await;
        } else {
            trace!(
                name_len = name_store.len(),
                value_len = value_store.len(),
                "skipping header that does not fit its stores"
            );
        }

        reader.read_while(|b| b != b'\r').await?;
        require_crlf(reader).await?;
    }
}
