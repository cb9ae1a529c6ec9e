//! A tcp json echo server.
//!
//! ```text
//! cargo run --example json_server -- 8080
//! curl -v -d '{"name":"Radiant","id":10}' http://127.0.0.1:8080/person
//! ```
//!
//! Connections are served one exchange at a time and closed afterwards.

use std::env;

use nano_http::net::{Client, Server};
use nano_http::task::block_on;
use nano_json::{FixedBuffer, describe_struct};
use nano_web::extract::JsonBody;
use nano_web::pipeline::serve_connection;
use nano_web::server::TcpServer;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

describe_struct! {
    #[derive(Debug)]
    struct Person {
        name: FixedBuffer<20>,
        id: i32,
    }
}

async fn echo(person: JsonBody<Person>) -> JsonBody<Person> {
    info!(name = %String::from_utf8_lossy(person.0.name.as_ref()), id = person.0.id, "echoing");
    person
}

fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let port = env::args().nth(1).and_then(|raw| raw.parse().ok()).unwrap_or(8080u16);
    let mut server = TcpServer::<4>::bind(("127.0.0.1", port)).expect("bind failed");

    block_on(async {
        loop {
            let Some(id) = server.accept().await else {
                continue;
            };
            let Some(client) = server.client_mut(id) else {
                continue;
            };
            if let Some((reader, writer)) = client.split() {
                serve_connection(reader, writer, &echo).await;
            }
            server.free_client(id);
        }
    });
}
