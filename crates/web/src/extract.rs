//! Typed request extraction.
//!
//! Handler arguments are produced by extractors. Each one runs in three
//! phases that line up with how a request arrives on the wire:
//!
//! 1. [`FromRequest::status_line`] observes the parsed request line,
//! 2. [`FromRequest::header`] observes every well-formed header,
//! 3. [`FromRequest::extract`] turns the accumulated state and the request
//!    body into the final value.
//!
//! The head hooks are synchronous and run while the parser still owns the
//! reader; only `extract` may touch the body. An extractor that cannot
//! produce its value writes a complete error response through the request
//! and yields `None`, which aborts the rest of the pipeline.
//!
//! [`ExtractSet`] lifts this contract onto tuples so a handler can take
//! several extracted arguments at once.

use http::Method;
use nano_http::io::{Sink, Source};
use nano_http::protocol::RequestLine;

use crate::request::HttpRequest;

mod body;

pub use body::{BodyReader, JsonBody, JsonBodyBuilder};

/// A value extracted from one request.
///
/// `'c` is the request borrow: extractors like [`BodyReader`] keep the
/// body reader alive inside the produced value.
#[expect(
    async_fn_in_trait,
    reason = "extraction futures are driven on one thread and promise no auto traits"
)]
pub trait FromRequest<'c, S: Source, W: Sink>: Sized {
    /// State accumulated by the head hooks before the body is reachable.
    type Builder;

    fn builder() -> Self::Builder;

    /// Observes the request line. The default keeps nothing.
    fn status_line(builder: &mut Self::Builder, line: &RequestLine) {
        let _ = (builder, line);
    }

    /// Observes one header line. Every extractor in a set sees every
    /// header. The default keeps nothing.
    fn header(builder: &mut Self::Builder, name: &[u8], value: &[u8]) {
        let _ = (builder, name, value);
    }

    /// Produces the value, or answers the request with an error response
    /// and yields `None`.
    async fn extract(builder: Self::Builder, request: &mut HttpRequest<'c, S, W>) -> Option<Self>;
}

/// Extracts the request [`Method`].
impl<'c, S: Source, W: Sink> FromRequest<'c, S, W> for Method {
    type Builder = Option<Method>;

    fn builder() -> Option<Method> {
        None
    }

    fn status_line(builder: &mut Option<Method>, line: &RequestLine) {
        *builder = Some(line.method.clone());
    }

    async fn extract(builder: Option<Method>, request: &mut HttpRequest<'c, S, W>) -> Option<Self> {
        let _ = request;
        builder
    }
}

/// A handler's extractors, driven as one unit.
///
/// Implemented for tuples of [`FromRequest`] types up to arity four. The
/// head hooks broadcast to every member; extraction runs in declaration
/// order and stops at the first member that aborts or that answers the
/// request itself.
#[expect(
    async_fn_in_trait,
    reason = "extraction futures are driven on one thread and promise no auto traits"
)]
pub trait ExtractSet<'c, S: Source, W: Sink>: Sized {
    /// The builders of every member, in declaration order.
    type Builders;

    fn builders() -> Self::Builders;

    fn status_line(builders: &mut Self::Builders, line: &RequestLine);

    fn header(builders: &mut Self::Builders, name: &[u8], value: &[u8]);

    /// Runs every member's extraction. `None` means the request is over:
    /// some member either failed or already wrote the response.
    async fn extract(
        builders: Self::Builders,
        request: &mut HttpRequest<'c, S, W>,
    ) -> Option<Self>;
}

impl<'c, S: Source, W: Sink> ExtractSet<'c, S, W> for () {
    type Builders = ();

    fn builders() -> Self::Builders {}

    fn status_line(builders: &mut Self::Builders, line: &RequestLine) {
        let _ = (builders, line);
    }

    fn header(builders: &mut Self::Builders, name: &[u8], value: &[u8]) {
        let _ = (builders, name, value);
    }

    async fn extract(
        builders: Self::Builders,
        request: &mut HttpRequest<'c, S, W>,
    ) -> Option<Self> {
        let _ = (builders, request);
        Some(())
    }
}

macro_rules! impl_extract_set_for_tuple {
    ($($member:ident)+) => {
        impl<'c, S, W, $($member),+> ExtractSet<'c, S, W> for ($($member,)+)
        where
            S: Source,
            W: Sink,
            $($member: FromRequest<'c, S, W>,)+
        {
            type Builders = ($($member::Builder,)+);

            fn builders() -> Self::Builders {
                ($($member::builder(),)+)
            }

            #[expect(non_snake_case, reason = "tuple members reuse their type parameter names")]
            fn status_line(builders: &mut Self::Builders, line: &RequestLine) {
                let ($($member,)+) = builders;
                $($member::status_line($member, line);)+
            }

            #[expect(non_snake_case, reason = "tuple members reuse their type parameter names")]
            fn header(builders: &mut Self::Builders, name: &[u8], value: &[u8]) {
                let ($($member,)+) = builders;
                $($member::header($member, name, value);)+
            }

            #[expect(non_snake_case, reason = "tuple members reuse their type parameter names")]
            async fn extract(
                builders: Self::Builders,
                request: &mut HttpRequest<'c, S, W>,
            ) -> Option<Self> {
                let ($($member,)+) = builders;
                $(
                    let $member = $member::extract($member, request).await?;
                    if request.is_response_written() {
                        return None;
                    }
                )+
                Some(($($member,)+))
            }
        }
    };
}

impl_extract_set_for_tuple! { A }
impl_extract_set_for_tuple! { A B }
impl_extract_set_for_tuple! { A B C }
impl_extract_set_for_tuple! { A B C D }

#[cfg(test)]
mod tests {
    use bytes::{Bytes, BytesMut};
    use http::Version;
    use nano_http::io::{Reader, Writer};
    use nano_http::task::block_on;

    use super::*;

    fn request_line(method: Method) -> RequestLine {
        RequestLine { method, version: Version::HTTP_11 }
    }

    #[test]
    fn method_extractor_reads_the_request_line() {
        let mut builder = <Method as FromRequest<'_, Bytes, BytesMut>>::builder();
        <Method as FromRequest<'_, Bytes, BytesMut>>::status_line(
            &mut builder,
            &request_line(Method::PUT),
        );

        let mut reader = Reader::new(Bytes::new());
        let mut writer = Writer::new(BytesMut::new());
        let mut request = HttpRequest::new(&mut reader, &mut writer);
        let method = block_on(Method::extract(builder, &mut request));
        assert_eq!(method, Some(Method::PUT));
    }

    #[test]
    fn method_extractor_aborts_without_a_request_line() {
        let builder = <Method as FromRequest<'_, Bytes, BytesMut>>::builder();

        let mut reader = Reader::new(Bytes::new());
        let mut writer = Writer::new(BytesMut::new());
        let mut request = HttpRequest::new(&mut reader, &mut writer);
        assert_eq!(block_on(Method::extract(builder, &mut request)), None);
    }

    #[test]
    fn tuple_hooks_reach_every_member() {
        type Pair = (Method, Method);
        let mut builders = <Pair as ExtractSet<'_, Bytes, BytesMut>>::builders();
        <Pair as ExtractSet<'_, Bytes, BytesMut>>::status_line(
            &mut builders,
            &request_line(Method::DELETE),
        );

        let mut reader = Reader::new(Bytes::new());
        let mut writer = Writer::new(BytesMut::new());
        let mut request = HttpRequest::new(&mut reader, &mut writer);
        let extracted = block_on(Pair::extract(builders, &mut request));
        assert_eq!(extracted, Some((Method::DELETE, Method::DELETE)));
    }

    #[test]
    fn empty_tuple_always_extracts() {
        let mut reader = Reader::new(Bytes::new());
        let mut writer = Writer::new(BytesMut::new());
        let mut request = HttpRequest::new(&mut reader, &mut writer);
        let extracted = block_on(<() as ExtractSet<'_, Bytes, BytesMut>>::extract(
            (),
            &mut request,
        ));
        assert!(extracted.is_some());
    }
}
