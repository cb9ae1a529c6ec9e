//! The per-request capability handle.
//!
//! During extraction every extractor sees the same [`HttpRequest`]. It
//! guards the two things only one party may use: the body reader, which
//! exists once and is handed out exactly once, and the response writer,
//! which records that it was touched so the pipeline can tell a finished
//! request from one that still expects a handler response.

use nano_http::io::{Reader, Sink, Source, Writer};

/// One request's body and response capabilities.
///
/// Built by the pipeline after the request head is parsed; the reader is
/// positioned at the first body byte.
#[derive(Debug)]
pub struct HttpRequest<'c, S: Source, W: Sink> {
    body: Option<&'c mut Reader<S>>,
    writer: &'c mut Writer<W>,
    response_written: bool,
}

impl<'c, S: Source, W: Sink> HttpRequest<'c, S, W> {
    pub fn new(body: &'c mut Reader<S>, writer: &'c mut Writer<W>) -> Self {
        Self { body: Some(body), writer, response_written: false }
    }

    /// Claims the body reader. The first caller gets it, everyone after
    /// gets `None`.
    pub fn try_take_body(&mut self) -> Option<&'c mut Reader<S>> {
        self.body.take()
    }

    pub fn is_body_taken(&self) -> bool {
        self.body.is_none()
    }

    /// The response writer, for extractors that answer the request
    /// themselves. Taking it marks the response as written, which makes
    /// the pipeline skip every later extractor and the handler.
    pub fn response_writer(&mut self) -> &mut Writer<W> {
        self.response_written = true;
        &mut *self.writer
    }

    pub fn is_response_written(&self) -> bool {
        self.response_written
    }

    /// Releases the writer once extraction is over.
    pub fn into_writer(self) -> &'c mut Writer<W> {
        self.writer
    }
}
