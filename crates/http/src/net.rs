//! Connection capabilities.
//!
//! [`Client`] is the pair of byte capabilities one connection offers;
//! [`Server`] hands out clients from a fixed slot pool. Accepting is the
//! only asynchronous operation. A pending accept means no connection has
//! arrived yet; a `None` means the pool is full or the server is closed,
//! which the embedding loop must treat as "try again later" and "stop"
//! respectively.
//!
//! Scheduling across accepted connections is deliberately out of scope:
//! whoever owns the server decides which connection's task to poll next.

use std::collections::VecDeque;

use bytes::{Bytes, BytesMut};
use tracing::{debug, trace};

use crate::io::{Reader, Sink, Source, Writer};

/// Index of a pooled connection, valid until [`Server::free_client`].
pub type ConnectionId = usize;

/// One connection's capabilities.
///
/// The reader and writer accessors return `None` once the client is
/// closed, so a task holding a stale id cannot keep touching the wire.
pub trait Client {
    type Source: Source;
    type Sink: Sink;

    fn reader(&mut self) -> Option<&mut Reader<Self::Source>>;
    fn writer(&mut self) -> Option<&mut Writer<Self::Sink>>;

    /// Both capabilities at once, for driving a whole request/response
    /// exchange without giving up either side.
    fn split(&mut self) -> Option<(&mut Reader<Self::Source>, &mut Writer<Self::Sink>)>;

    fn close(&mut self);
    fn is_closed(&self) -> bool;
}

/// A slot-pooled connection acceptor.
#[expect(
    async_fn_in_trait,
    reason = "accept futures are driven on one thread and promise no auto traits"
)]
pub trait Server {
    type Client: Client;

    /// Admits the next connection into a free slot.
    ///
    /// Suspends while no connection is waiting. Returns `None` when every
    /// slot is taken or the server is closed.
    async fn accept(&mut self) -> Option<ConnectionId>;

    fn client_mut(&mut self, id: ConnectionId) -> Option<&mut Self::Client>;

    /// Releases the slot, closing the client held in it.
    fn free_client(&mut self, id: ConnectionId);

    fn close(&mut self);
    fn is_closed(&self) -> bool;
}

/// An in-memory [`Client`]: reads from a fixed script, collects writes.
#[derive(Debug)]
pub struct InMemoryClient {
    reader: Reader<Bytes>,
    writer: Writer<BytesMut>,
    closed: bool,
}

impl InMemoryClient {
    pub fn new(input: impl Into<Bytes>) -> Self {
        Self {
            reader: Reader::new(input.into()),
            writer: Writer::new(BytesMut::new()),
            closed: false,
        }
    }

    /// Everything written to this client so far.
    pub fn output(&self) -> &[u8] {
        self.writer.get_ref().as_ref()
    }
}

impl Client for InMemoryClient {
    type Source = Bytes;
    type Sink = BytesMut;

    fn reader(&mut self) -> Option<&mut Reader<Bytes>> {
        if self.closed {
            None
        } else {
            Some(&mut self.reader)
        }
    }

    fn writer(&mut self) -> Option<&mut Writer<BytesMut>> {
        if self.closed {
            None
        } else {
            Some(&mut self.writer)
        }
    }

    fn split(&mut self) -> Option<(&mut Reader<Bytes>, &mut Writer<BytesMut>)> {
        if self.closed {
            None
        } else {
            Some((&mut self.reader, &mut self.writer))
        }
    }

    fn close(&mut self) {
        self.closed = true;
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

/// A [`Server`] over a scripted backlog of in-memory connections.
///
/// Once the backlog runs dry the server reports `None` from accept, which
/// reads as "closed" to the embedding loop; that makes it a natural
/// harness for running a server loop to completion over canned traffic.
#[derive(Debug)]
pub struct LoopbackServer<const MAX_CONNECTIONS: usize> {
    slots: [Option<InMemoryClient>; MAX_CONNECTIONS],
    backlog: VecDeque<InMemoryClient>,
    closed: bool,
}

impl<const MAX_CONNECTIONS: usize> LoopbackServer<MAX_CONNECTIONS> {
    pub fn new(backlog: impl IntoIterator<Item = InMemoryClient>) -> Self {
        Self {
            slots: [const { None }; MAX_CONNECTIONS],
            backlog: backlog.into_iter().collect(),
            closed: false,
        }
    }
}

impl<const MAX_CONNECTIONS: usize> Server for LoopbackServer<MAX_CONNECTIONS> {
    type Client = InMemoryClient;

    async fn accept(&mut self) -> Option<ConnectionId> {
        if self.closed || self.backlog.is_empty() {
            return None;
        }
        let slot = self.slots.iter().position(Option::is_none)?;
        let client = self.backlog.pop_front()?;
        self.slots[slot] = Some(client);
        debug!(slot, "connection admitted");
        Some(slot)
    }

    fn client_mut(&mut self, id: ConnectionId) -> Option<&mut InMemoryClient> {
        self.slots.get_mut(id)?.as_mut()
    }

    fn free_client(&mut self, id: ConnectionId) {
        if let Some(mut client) = self.slots.get_mut(id).and_then(Option::take) {
            client.close();
            trace!(slot = id, "connection freed");
        }
    }

    fn close(&mut self) {
        self.closed = true;
        for slot in &mut self.slots {
            if let Some(mut client) = slot.take() {
                client.close();
            }
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use crate::task::block_on;

    use super::*;

    #[test]
    fn in_memory_client_round_trip() {
        let mut client = InMemoryClient::new(&b"ping"[..]);
        block_on(async {
            let mut buf = [0u8; 8];
            let reader = client.reader().unwrap();
            let n = reader.read(&mut buf).await.unwrap();
            assert_eq!(&buf[..n], b"ping");

            client.writer().unwrap().write_all(b"pong").await.unwrap();
        });
        assert_eq!(client.output(), b"pong");
    }

    #[test]
    fn closed_client_offers_no_capabilities() {
        let mut client = InMemoryClient::new(&b"x"[..]);
        assert!(client.split().is_some());
        client.close();
        assert!(client.is_closed());
        assert!(client.reader().is_none());
        assert!(client.writer().is_none());
        assert!(client.split().is_none());
    }

    #[test]
    fn split_hands_out_both_sides_at_once() {
        let mut client = InMemoryClient::new(&b"in"[..]);
        block_on(async {
            let (reader, writer) = client.split().unwrap();
            let mut buf = [0u8; 4];
            let n = reader.read(&mut buf).await.unwrap();
            writer.write_all(&buf[..n]).await.unwrap();
        });
        assert_eq!(client.output(), b"in");
    }

    #[test]
    fn accept_fills_slots_until_the_pool_is_full() {
        let backlog = (0..3).map(|_| InMemoryClient::new(&b""[..]));
        let mut server = LoopbackServer::<2>::new(backlog);
        block_on(async {
            assert_eq!(server.accept().await, Some(0));
            assert_eq!(server.accept().await, Some(1));
            // Pool is full; the third connection stays in the backlog.
            assert_eq!(server.accept().await, None);

            server.free_client(0);
            assert_eq!(server.accept().await, Some(0));
        });
    }

    #[test]
    fn exhausted_backlog_reads_as_closed() {
        let mut server = LoopbackServer::<4>::new([InMemoryClient::new(&b""[..])]);
        block_on(async {
            assert_eq!(server.accept().await, Some(0));
            assert_eq!(server.accept().await, None);
        });
    }

    #[test]
    fn freeing_a_slot_closes_its_client() {
        let mut server = LoopbackServer::<1>::new([InMemoryClient::new(&b""[..])]);
        let id = block_on(server.accept()).unwrap();
        assert!(server.client_mut(id).is_some());
        server.free_client(id);
        assert!(server.client_mut(id).is_none());
    }

    #[test]
    fn close_drops_every_client() {
        let mut server = LoopbackServer::<2>::new([
            InMemoryClient::new(&b""[..]),
            InMemoryClient::new(&b""[..]),
        ]);
        block_on(async {
            server.accept().await;
            server.accept().await;
        });
        server.close();
        assert!(server.is_closed());
        assert!(server.client_mut(0).is_none());
        assert!(server.client_mut(1).is_none());
        assert_eq!(block_on(server.accept()), None);
    }
}
