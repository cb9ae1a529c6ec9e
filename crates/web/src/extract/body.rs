//! Body-consuming extractors.
//!
//! The request body exists once. Both extractors here claim it through
//! [`HttpRequest::try_take_body`], so combining them in one handler makes
//! the second claim fail the request with a `500` and a fixed diagnostic
//! body. Error responses go through the regular response encoders, which
//! keeps their `Content-Length` exact.

use std::io;
use std::str;

use http::{StatusCode, Version};
use nano_http::codec::{write_content_length, write_response_line};
use nano_http::io::{Reader, Sink, Source, Writer};
use nano_http::protocol::ResponseLine;
use nano_json::Deserialize;
use nano_json::json::{self, JsonDeserializer};
use tracing::{debug, warn};

use crate::request::HttpRequest;

use super::FromRequest;

const BODY_TAKEN: &str = "Another extractor already extracted body!";
const INVALID_JSON: &str = "Invalid Json!";

/// Answers the request with a plain error response.
///
/// A failure while writing the error has nowhere left to go; it is logged
/// and the request aborts either way.
async fn reject<S: Source, W: Sink>(
    request: &mut HttpRequest<'_, S, W>,
    status: StatusCode,
    body: &str,
) {
    let writer = request.response_writer();
    if let Err(error) = write_rejection(writer, status, body).await {
        warn!(%error, "failed to write the error response");
    }
}

async fn write_rejection<W: Sink>(
    writer: &mut Writer<W>,
    status: StatusCode,
    body: &str,
) -> io::Result<()> {
    write_response_line(writer, ResponseLine::new(Version::HTTP_11, status)).await?;
    write_content_length(writer, body.len()).await?;
    writer.write_crlf().await?;
    writer.write_all(body.as_bytes()).await
}

/// Hands the handler the raw body reader, positioned at the first body
/// byte.
#[derive(Debug)]
pub struct BodyReader<'c, S: Source> {
    pub reader: &'c mut Reader<S>,
}

impl<'c, S: Source, W: Sink> FromRequest<'c, S, W> for BodyReader<'c, S> {
    type Builder = ();

    fn builder() {}

    async fn extract(builder: (), request: &mut HttpRequest<'c, S, W>) -> Option<Self> {
        let () = builder;
        match request.try_take_body() {
            Some(reader) => Some(BodyReader { reader }),
            None => {
                debug!("request body was already claimed");
                reject(request, StatusCode::INTERNAL_SERVER_ERROR, BODY_TAKEN).await;
                None
            }
        }
    }
}

/// Deserializes the json request body into `T`.
///
/// Requires a `Content-Length` header to be present; a request without one
/// is answered with `400` before the body is touched. The wrapper also
/// renders as a response, see the impl in [`crate::respond`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsonBody<T>(pub T);

/// Head state for [`JsonBody`]: the advertised content length, if any.
#[derive(Debug, Default)]
pub struct JsonBodyBuilder {
    content_length: Option<usize>,
}

impl<'c, S, W, T> FromRequest<'c, S, W> for JsonBody<T>
where
    S: Source + 'c,
    W: Sink,
    T: Deserialize<JsonDeserializer<'c, S>>,
{
    type Builder = JsonBodyBuilder;

    fn builder() -> JsonBodyBuilder {
        JsonBodyBuilder::default()
    }

    fn header(builder: &mut JsonBodyBuilder, name: &[u8], value: &[u8]) {
        if name.eq_ignore_ascii_case(b"Content-Length") {
            builder.content_length = str::from_utf8(value).ok().and_then(|text| text.parse().ok());
        }
    }

    async fn extract(
        builder: JsonBodyBuilder,
        request: &mut HttpRequest<'c, S, W>,
    ) -> Option<Self> {
        if builder.content_length.is_none() {
            debug!("json body without a content length");
            reject(request, StatusCode::BAD_REQUEST, INVALID_JSON).await;
            return None;
        }
        let Some(reader) = request.try_take_body() else {
            debug!("request body was already claimed");
            reject(request, StatusCode::INTERNAL_SERVER_ERROR, BODY_TAKEN).await;
            return None;
        };
        match json::from_reader(reader).await {
            Ok(value) => Some(JsonBody(value)),
            Err(error) => {
                debug!(%error, "json body failed to deserialize");
                reject(request, StatusCode::BAD_REQUEST, INVALID_JSON).await;
                None
            }
        }
    }
}
