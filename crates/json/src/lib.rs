//! Descriptor-driven JSON for poll-driven streams.
//!
//! This crate is the typed half of a small embedded-friendly web stack: a
//! serialization framework whose only container shape is the struct, and a
//! JSON rendition of it that runs over `nano-http` readers and writers.
//! Structs declared through [`describe_struct!`] carry a field table in
//! declaration order; serializing walks that table, deserializing accepts
//! members in any order and tracks presence in a single [`FieldSet`] word,
//! so decoding a struct costs one name store and one bitset, not a tree.
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use nano_http::buffer::Store;
//! use nano_http::io::{Reader, Writer};
//! use nano_http::task::block_on;
//! use nano_json::{FixedBuffer, describe_struct, json};
//!
//! describe_struct! {
//!     #[derive(Debug)]
//!     struct Person {
//!         name: FixedBuffer<20>,
//!         id: i32,
//!     }
//! }
//!
//! let person = Person { name: FixedBuffer::from_slice(b"Radiant"), id: 10 };
//!
//! block_on(async {
//!     let mut writer = Writer::new(BytesMut::new());
//!     json::to_writer(&mut writer, &person).await.unwrap();
//!     assert_eq!(writer.get_ref().as_ref(), br#"{"name":"Radiant","id":10}"#);
//!
//!     let mut reader = Reader::new(writer.into_inner().freeze());
//!     let echoed: Person = json::from_reader(&mut reader).await.unwrap();
//!     assert_eq!(echoed.name.as_slice(), b"Radiant");
//!     assert_eq!(echoed.id, 10);
//! });
//! ```
//!
//! # Architecture
//!
//! - [`ser`]: the format-agnostic [`Serialize`]/[`Serializer`] traits with
//!   struct scopes that own separator policy
//! - [`de`]: the [`Deserialize`]/[`Deserializer`] traits, the member
//!   visitor protocol, and the [`FieldSet`] presence bitset
//! - [`descriptor`]: the [`Described`] field table and the
//!   [`describe_struct!`] macro that derives the whole protocol
//! - [`json`]: the JSON serializer and deserializer plus the
//!   [`json::from_reader`]/[`json::to_writer`] entry points
//!
//! # Limitations
//!
//! - Strings are raw bytes: output is never escaped, and input escape
//!   sequences are consumed but dropped rather than decoded
//! - Numbers travel through an `f64` accumulator, so integers beyond 2^53
//!   lose precision and casts to narrower targets truncate toward zero
//! - A described struct holds at most [`FieldSet::MAX_FIELDS`] fields
//! - Arrays have no typed representation; they parse only inside values
//!   that are skipped

pub mod de;
pub mod descriptor;
pub mod error;
pub mod json;
pub mod ser;

pub use de::{Deserialize, Deserializer, FieldSet, Member, MemberVisitor};
pub use descriptor::{Described, longest_name};
pub use error::{DecodeError, EncodeError};
pub use nano_http::buffer::FixedBuffer;
pub use ser::{Serialize, SerializeStruct, Serializer};
