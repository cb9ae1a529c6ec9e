//! Parses a whitespace-heavy JSON object with an unknown member, then
//! serializes it back in compact form.
//!
//! Run with `TRACE` logging to watch the deserializer skip the member it
//! has no field for: `cargo run -p nano-json --example roundtrip`.

use bytes::{Bytes, BytesMut};
use nano_http::buffer::Store;
use nano_http::io::{Reader, Writer};
use nano_http::task::block_on;
use nano_json::{FixedBuffer, describe_struct, json};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

describe_struct! {
    #[derive(Debug)]
    struct PersonId {
        name: FixedBuffer<20>,
        id: i32,
    }
}

const INPUT: &str = r#"{
    "name": "Radiant",
    "id": 10,
    "mood": ["competitive", true]
}"#;

fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::TRACE).finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    block_on(async {
        let mut reader = Reader::new(Bytes::from_static(INPUT.as_bytes()));
        let person: PersonId = json::from_reader(&mut reader).await.expect("input parses");
        info!(
            name = %String::from_utf8_lossy(person.name.as_slice()),
            id = person.id,
            "deserialized"
        );

        let mut writer = Writer::new(BytesMut::new());
        json::to_writer(&mut writer, &person).await.expect("serialization succeeds");
        let encoded = writer.into_inner().freeze();
        info!(json = %String::from_utf8_lossy(&encoded), "serialized compact");
    });
}
