//! Typed request handling over the poll-driven http toolkit.
//!
//! This crate turns the wire-level pieces of `nano-http` into a request
//! pipeline: extractors observe the request head and claim the body,
//! handlers are plain async functions over the extracted values, and
//! their return values render themselves as responses. Struct bodies go
//! through the descriptor-driven json codec of `nano-json`.
//!
//! ```
//! use bytes::{Bytes, BytesMut};
//! use nano_http::io::{Reader, Writer};
//! use nano_http::task::block_on;
//! use nano_web::pipeline::serve_connection;
//! use nano_web::respond::BodyResponse;
//!
//! async fn hello() -> BodyResponse<'static> {
//!     BodyResponse { body: b"Hello World!" }
//! }
//!
//! let mut reader = Reader::new(Bytes::from_static(b"GET / HTTP/1.1\r\n\r\n"));
//! let mut writer = Writer::new(BytesMut::new());
//! block_on(serve_connection(&mut reader, &mut writer, &hello));
//!
//! assert_eq!(
//!     writer.get_ref().as_ref(),
//!     b"HTTP/1.1 200 OK\r\nContent-Length: 12\r\n\r\nHello World!"
//! );
//! ```
//!
//! # Architecture
//!
//! * [`request`] guards the two per-request capabilities: the one-shot
//!   body reader and the response writer.
//! * [`extract`] defines [`FromRequest`] with its head hooks, the tuple
//!   [`ExtractSet`], and the stock extractors.
//! * [`handler`] lifts async functions of arity zero to four into one
//!   [`Handler`] shape.
//! * [`respond`] renders handler return values, staging json bodies so
//!   `Content-Length` is always exact.
//! * [`pipeline`] wires the stages together; [`server`] supplies a plain
//!   tcp transport behind the same server contract as the in-memory one.
//!
//! # Limitations
//!
//! There is no routing: one handler serves every request, which fits the
//! single-purpose services this stack targets. Responses always declare
//! `HTTP/1.1` and connections close after one exchange.

pub mod extract;
pub mod handler;
pub mod pipeline;
pub mod request;
pub mod respond;
pub mod server;

pub use extract::{BodyReader, ExtractSet, FromRequest, JsonBody};
pub use handler::Handler;
pub use pipeline::{handle_request, serve_connection};
pub use request::HttpRequest;
pub use respond::{BodyResponse, Respond, Status};
pub use server::{TcpConnection, TcpServer};
