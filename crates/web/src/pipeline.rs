//! The request pipeline.
//!
//! One request flows through four stages: the head hooks of every
//! extractor observe the request line and headers while the parser still
//! owns the reader, extraction turns the accumulated state and the body
//! into the handler's arguments, the handler runs, and its response is
//! rendered.
//!
//! Failures follow one rule: whatever was written before the failure is
//! all the peer sees. A request head that does not parse terminates the
//! exchange with nothing written; an extractor that fails writes its own
//! complete error response and stops the pipeline before the handler.

use nano_http::buffer::FixedBuffer;
use nano_http::codec::{HeaderVisitor, read_headers, read_request_line};
use nano_http::io::{Reader, Sink, Source, Writer};
use nano_http::protocol::RequestLine;
use tracing::{debug, warn};

use crate::extract::ExtractSet;
use crate::handler::Handler;
use crate::request::HttpRequest;
use crate::respond::Respond;

/// Longest request path [`serve_connection`] accepts.
pub const MAX_PATH_LENGTH: usize = 256;

/// Longest header name buffered for the extractor hooks.
pub const MAX_HEADER_NAME_LENGTH: usize = 32;

/// Longest header value buffered for the extractor hooks.
pub const MAX_HEADER_VALUE_LENGTH: usize = 64;

/// Adapts a closure over the extractor builders to the header visitor.
struct HeaderHook<F> {
    hook: F,
}

impl<F: FnMut(&[u8], &[u8])> HeaderVisitor for HeaderHook<F> {
    async fn visit(&mut self, name: &[u8], value: &[u8]) {
        (self.hook)(name, value);
    }
}

/// Drives one parsed request to completion.
///
/// The reader must be positioned at the first header byte; `line` is the
/// request line that preceded it. Always completes: the outcome of the
/// exchange is whatever was written to `writer`.
pub async fn handle_request<'c, S, W, Args, H>(
    line: &RequestLine,
    reader: &'c mut Reader<S>,
    writer: &'c mut Writer<W>,
    handler: &H,
) where
    S: Source,
    W: Sink,
    Args: ExtractSet<'c, S, W>,
    H: Handler<Args>,
    H::Response: Respond<W>,
{
    let mut builders = Args::builders();
    Args::status_line(&mut builders, line);

    let mut names = FixedBuffer::<MAX_HEADER_NAME_LENGTH>::new();
    let mut values = FixedBuffer::<MAX_HEADER_VALUE_LENGTH>::new();
    let visitor = HeaderHook {
        hook: |name: &[u8], value: &[u8]| Args::header(&mut builders, name, value),
    };
    if let Err(error) = read_headers(&mut *reader, &mut names, &mut values, visitor).await {
        debug!(%error, "header block failed to parse");
        return;
    }

    let mut request = HttpRequest::new(reader, writer);
    let Some(args) = Args::extract(builders, &mut request).await else {
        return;
    };
    let writer = request.into_writer();

    let response = handler.call(args).await;
    if let Err(error) = response.respond(writer).await {
        warn!(%error, "failed to write the response");
    }
}

/// Reads one request off the wire and hands it to [`handle_request`].
///
/// A request line that does not parse terminates the exchange silently,
/// mirroring the header-block behavior.
pub async fn serve_connection<'c, S, W, Args, H>(
    reader: &'c mut Reader<S>,
    writer: &'c mut Writer<W>,
    handler: &H,
) where
    S: Source,
    W: Sink,
    Args: ExtractSet<'c, S, W>,
    H: Handler<Args>,
    H::Response: Respond<W>,
{
    let mut path = FixedBuffer::<MAX_PATH_LENGTH>::new();
    let line = match read_request_line(&mut *reader, &mut path).await {
        Ok(line) => line,
        Err(error) => {
            debug!(%error, "request line failed to parse");
            return;
        }
    };
    handle_request::<S, W, Args, H>(&line, reader, writer, handler).await;
}
