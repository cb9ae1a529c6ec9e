//! Drives one canned request through the whole pipeline in memory.
//!
//! A scripted connection carries a json `Person`; the handler echoes it
//! back and the example prints both sides of the exchange.

use nano_http::net::{Client, InMemoryClient, LoopbackServer, Server};
use nano_http::task::block_on;
use nano_json::{FixedBuffer, describe_struct};
use nano_web::extract::JsonBody;
use nano_web::pipeline::serve_connection;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

describe_struct! {
    #[derive(Debug)]
    struct Person {
        name: FixedBuffer<20>,
        id: i32,
    }
}

const REQUEST: &str =
    "POST /person HTTP/1.1\r\nContent-Length: 26\r\n\r\n{\"name\":\"Radiant\",\"id\":10}";

async fn echo(person: JsonBody<Person>) -> JsonBody<Person> {
    info!(name = %String::from_utf8_lossy(person.0.name.as_ref()), id = person.0.id, "handling");
    person
}

fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::TRACE).finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    info!(request = %REQUEST.escape_default(), "sending");

    let mut server = LoopbackServer::<1>::new([InMemoryClient::new(REQUEST)]);
    block_on(async {
        while let Some(id) = server.accept().await {
            let Some(client) = server.client_mut(id) else {
                continue;
            };
            let Some((reader, writer)) = client.split() else {
                continue;
            };
            serve_connection(reader, writer, &echo).await;

            let Some(client) = server.client_mut(id) else {
                continue;
            };
            info!(response = %String::from_utf8_lossy(client.output()), "exchange complete");
            server.free_client(id);
        }
    });
}
