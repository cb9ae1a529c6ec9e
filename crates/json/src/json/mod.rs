//! The JSON rendition of the [`Serializer`]/[`Deserializer`] pair.
//!
//! Output is compact: no insignificant whitespace, members in descriptor
//! order, strings written verbatim. Input is the object subset of JSON
//! with whitespace tolerated around every token; values of unknown
//! members may be of any shape, including arrays, which otherwise have
//! no typed representation here.

pub mod de;
pub mod ser;

pub use de::JsonDeserializer;
pub use ser::{JsonScope, JsonSerializer};

use nano_http::io::{Reader, Sink, Source, Writer};

use crate::de::Deserialize;
use crate::error::{DecodeError, EncodeError};
use crate::ser::Serialize;

/// Deserializes a `T` from the reader's current position.
///
/// Exactly one value is consumed. Bytes past it stay in the stream, so a
/// caller may keep reading whatever follows, a framing protocol included.
pub async fn from_reader<'r, T, S>(reader: &'r mut Reader<S>) -> Result<T, DecodeError>
where
    S: Source,
    T: Deserialize<JsonDeserializer<'r, S>>,
{
    let mut deserializer = JsonDeserializer::new(reader);
    T::deserialize(&mut deserializer).await
}

/// Serializes `value` as compact JSON onto the writer.
pub async fn to_writer<'w, T, W>(writer: &'w mut Writer<W>, value: &T) -> Result<(), EncodeError>
where
    W: Sink,
    T: Serialize<JsonSerializer<'w, W>>,
{
    let mut serializer = JsonSerializer::new(writer);
    value.serialize(&mut serializer).await
}

#[cfg(test)]
mod tests {
    use bytes::{Bytes, BytesMut};
    use nano_http::buffer::{FixedBuffer, Store};
    use nano_http::task::block_on;

    use super::*;
    use crate::describe_struct;

    describe_struct! {
        #[derive(Debug)]
        struct Person {
            name: FixedBuffer<20>,
            age: i32,
        }
    }

    describe_struct! {
        #[derive(Debug)]
        struct Badge {
            owner: Person,
            active: bool,
        }
    }

    #[test]
    fn values_survive_a_round_trip() {
        let badge = Badge {
            owner: Person { name: FixedBuffer::from_slice(b"Radiant"), age: 16 },
            active: true,
        };

        let mut writer = Writer::new(BytesMut::new());
        block_on(to_writer(&mut writer, &badge)).unwrap();

        let mut reader = Reader::new(writer.into_inner().freeze());
        let decoded: Badge = block_on(from_reader(&mut reader)).unwrap();
        assert_eq!(decoded.owner.name.as_slice(), b"Radiant");
        assert_eq!(decoded.owner.age, 16);
        assert!(decoded.active);
    }

    #[test]
    fn output_parses_as_standard_json() {
        let badge = Badge {
            owner: Person { name: FixedBuffer::from_slice(b"Test"), age: 10 },
            active: false,
        };

        let mut writer = Writer::new(BytesMut::new());
        block_on(to_writer(&mut writer, &badge)).unwrap();

        let value: serde_json::Value = serde_json::from_slice(writer.get_ref()).unwrap();
        assert_eq!(value["owner"]["name"], "Test");
        assert_eq!(value["owner"]["age"], 10);
        assert_eq!(value["active"], false);
    }

    #[test]
    fn standard_pretty_printed_json_parses_here() {
        let text = serde_json::to_string_pretty(&serde_json::json!({
            "name": "Radiant",
            "age": 16,
        }))
        .unwrap();

        let mut reader = Reader::new(Bytes::from(text));
        let person: Person = block_on(from_reader(&mut reader)).unwrap();
        assert_eq!(person.name.as_slice(), b"Radiant");
        assert_eq!(person.age, 16);
    }
}
