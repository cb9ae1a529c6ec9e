//! Response rendering.
//!
//! A handler returns any [`Respond`] value and the pipeline renders it
//! after the handler completes. Everything that declares a body length
//! knows that length before the first body byte goes out: borrowed bodies
//! measure themselves, json bodies are staged into a growable buffer
//! first.

use std::io;

use http::{StatusCode, Version};
use nano_http::buffer::{GrowableBuffer, Store};
use nano_http::codec::{write_content_length, write_header, write_response_line};
use nano_http::io::{Sink, Writer};
use nano_http::protocol::ResponseLine;
use nano_json::json::{self, JsonSerializer};
use nano_json::{EncodeError, Serialize};

use crate::extract::JsonBody;

/// A value that renders itself as the complete response.
#[expect(
    async_fn_in_trait,
    reason = "respond futures are driven on one thread and promise no auto traits"
)]
pub trait Respond<W: Sink>: Sized {
    async fn respond(self, writer: &mut Writer<W>) -> io::Result<()>;
}

/// Pre-rendered responses pass through byte for byte; the caller owns the
/// entire head, version and all.
impl<W: Sink> Respond<W> for &'static str {
    async fn respond(self, writer: &mut Writer<W>) -> io::Result<()> {
        writer.write_all(self.as_bytes()).await
    }
}

/// A bare status line, no headers and no body.
#[derive(Debug, Clone, Copy)]
pub struct Status(pub StatusCode);

impl<W: Sink> Respond<W> for Status {
    async fn respond(self, writer: &mut Writer<W>) -> io::Result<()> {
        write_response_line(writer, ResponseLine::new(Version::HTTP_11, self.0)).await
    }
}

/// A `200 OK` carrying `body` with its length declared.
#[derive(Debug, Clone, Copy)]
pub struct BodyResponse<'a> {
    pub body: &'a [u8],
}

impl<W: Sink> Respond<W> for BodyResponse<'_> {
    async fn respond(self, writer: &mut Writer<W>) -> io::Result<()> {
        write_response_line(writer, ResponseLine::new(Version::HTTP_11, StatusCode::OK)).await?;
        write_content_length(writer, self.body.len()).await?;
        writer.write_crlf().await?;
        writer.write_all(self.body).await
    }
}

/// Renders the wrapped value as a json `200 OK`.
///
/// The body is staged into a [`GrowableBuffer`] so `Content-Length` is
/// exact before the head is written.
impl<W, T> Respond<W> for JsonBody<T>
where
    W: Sink,
    T: for<'w> Serialize<JsonSerializer<'w, GrowableBuffer>>,
{
    async fn respond(self, writer: &mut Writer<W>) -> io::Result<()> {
        let mut staged = Writer::new(GrowableBuffer::new());
        match json::to_writer(&mut staged, &self.0).await {
            Ok(()) => {}
            Err(EncodeError::Io { source }) => return Err(source),
            Err(error @ EncodeError::NonFinite) => {
                return Err(io::Error::new(io::ErrorKind::InvalidData, error));
            }
        }
        let staged = staged.into_inner();

        write_response_line(writer, ResponseLine::new(Version::HTTP_11, StatusCode::OK)).await?;
        write_header(writer, b"Content-Type", b"application/json").await?;
        write_content_length(writer, staged.len()).await?;
        writer.write_crlf().await?;
        writer.write_all(staged.as_slice()).await
    }
}
