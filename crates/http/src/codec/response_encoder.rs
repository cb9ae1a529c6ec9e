//! Response-head encoding.
//!
//! Every helper writes through [`Writer::write_all`], so a sink that stops
//! accepting bytes turns into a `WriteZero` error mid-segment instead of a
//! silently short response.

use std::io;

use crate::io::{Sink, Writer};
use crate::protocol::{ResponseLine, version_token};

/// Writes `VERSION SP CODE SP REASON CRLF`.
///
/// The reason phrase is the status code's canonical one, or `Unknown` for
/// codes outside the registered set.
pub async fn write_response_line<W: Sink>(
    writer: &mut Writer<W>,
    line: ResponseLine,
) -> io::Result<()> {
    writer.write_all(version_token(line.version)).await?;
    writer.write_char(b' ').await?;
    writer.write_decimal(f64::from(line.status.as_u16())).await?;
    writer.write_char(b' ').await?;
    let reason = line.status.canonical_reason().unwrap_or("Unknown");
    writer.write_all(reason.as_bytes()).await?;
    writer.write_crlf().await
}

/// Writes one `Name: Value CRLF` header line.
pub async fn write_header<W: Sink>(
    writer: &mut Writer<W>,
    name: &[u8],
    value: &[u8],
) -> io::Result<()> {
    writer.write_all(name).await?;
    writer.write_all(b": ").await?;
    writer.write_all(value).await?;
    writer.write_crlf().await
}

/// Writes the `Content-Length` header for a body of `length` bytes.
#[expect(
    clippy::cast_precision_loss,
    reason = "body lengths sit far below the 2^53 exact-integer range of f64"
)]
pub async fn write_content_length<W: Sink>(
    writer: &mut Writer<W>,
    length: usize,
) -> io::Result<()> {
    writer.write_all(b"Content-Length: ").await?;
    writer.write_decimal(length as f64).await?;
    writer.write_crlf().await
}
