//! A poll-driven HTTP/1.x toolkit for allocation-averse servers.
//!
//! This crate is the byte-level half of a small embedded-friendly web
//! stack: cooperative futures with no runtime underneath, bounded buffers,
//! a peeking reader with grammar combinators, and streaming codecs for the
//! HTTP request and response heads. Everything advances by `poll()`; the
//! caller owns the retry cadence and may embed it in any readiness loop.
//!
//! # Features
//!
//! - Cooperative tasks driven by [`task::block_on`], with no executor,
//!   threads, or wakers required of the embedder
//! - Non-blocking [`io::Source`]/[`io::Sink`] capabilities with a
//!   one-byte-lookahead [`io::Reader`] and a combinator family that never
//!   backtracks
//! - Fixed-capacity and growable byte stores ([`buffer`]) so parsing fits
//!   in a known memory budget
//! - Request-line and header-block decoders, response-head encoders
//!   ([`codec`]), all built from the same combinators
//! - Connection capabilities and a scripted loopback server ([`net`]) for
//!   driving whole request cycles in tests
//!
//! # Example
//!
//! ```
//! use bytes::{Bytes, BytesMut};
//! use http::{Method, StatusCode, Version};
//! use nano_http::buffer::{FixedBuffer, Store};
//! use nano_http::codec::{HeaderVisitor, read_headers, read_request_line, write_response_line};
//! use nano_http::io::{Reader, Writer};
//! use nano_http::protocol::ResponseLine;
//! use nano_http::task::block_on;
//!
//! struct ContentLength(Option<usize>);
//!
//! impl HeaderVisitor for ContentLength {
//!     async fn visit(&mut self, name: &[u8], value: &[u8]) {
//!         if name.eq_ignore_ascii_case(b"content-length") {
//!             self.0 = std::str::from_utf8(value).ok().and_then(|v| v.parse().ok());
//!         }
//!     }
//! }
//!
//! let request = Bytes::from_static(b"GET /hello HTTP/1.1\r\nContent-Length: 0\r\n\r\n");
//! let mut reader = Reader::new(request);
//! let mut path = FixedBuffer::<128>::new();
//!
//! block_on(async {
//!     let line = read_request_line(&mut reader, &mut path).await.unwrap();
//!     assert_eq!(line.method, Method::GET);
//!     assert_eq!(path.as_slice(), b"/hello");
//!
//!     let mut names = FixedBuffer::<64>::new();
//!     let mut values = FixedBuffer::<256>::new();
//!     let mut content_length = ContentLength(None);
//!     read_headers(&mut reader, &mut names, &mut values, &mut content_length)
//!         .await
//!         .unwrap();
//!     assert_eq!(content_length.0, Some(0));
//!
//!     let mut writer = Writer::new(BytesMut::new());
//!     let line = ResponseLine::new(Version::HTTP_11, StatusCode::OK);
//!     write_response_line(&mut writer, line).await.unwrap();
//!     assert_eq!(writer.get_ref().as_ref(), b"HTTP/1.1 200 OK\r\n");
//! });
//! ```
//!
//! # Architecture
//!
//! - [`task`]: driving loop primitives (`block_on`, `poll_once`)
//! - [`buffer`]: the [`buffer::Store`] trait plus fixed and growable stores
//! - [`io`]: source/sink capabilities, the peeking reader, combinators
//! - [`protocol`]: request/response line types and [`protocol::ParseError`]
//! - [`codec`]: the request-head decoders and response-head encoders
//! - [`net`]: client/server capability traits and in-memory endpoints
//!
//! # Limitations
//!
//! - Request heads only: body framing is the embedder's business (read the
//!   `Content-Length` header and take that many bytes off the reader)
//! - No chunked transfer encoding and no TLS
//! - Header names and values are bounded by caller-chosen store sizes;
//!   anything oversized is skipped, not buffered
//! - Single-threaded by design; concurrency across connections belongs to
//!   the embedding loop

pub mod buffer;
pub mod codec;
pub mod io;
pub mod net;
pub mod protocol;
pub mod task;
pub mod utils;
