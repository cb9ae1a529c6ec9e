//! Plain tcp transport for the pipeline.
//!
//! [`TcpServer`] adapts `std::net` sockets to the slot-pool server
//! contract from `nano_http::net`. The listener and every accepted stream
//! run in non-blocking mode, so every wait surfaces as `Pending` and the
//! embedding loop keeps ownership of scheduling, exactly as with the
//! in-memory transports. One accepted connection serves one exchange at a
//! time; driving several connections concurrently is the embedder's call.

use std::future::poll_fn;
use std::io::{self, Read as _, Write as _};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::task::Poll;

use nano_http::io::{Reader, Sink, Source, Writer};
use nano_http::net::{Client, ConnectionId, Server};
use tracing::{debug, info, trace, warn};

/// Maps one non-blocking socket operation onto the poll contract:
/// `WouldBlock` is `Pending`, `Interrupted` is retried on the spot.
fn poll_socket<T>(mut operation: impl FnMut() -> io::Result<T>) -> Poll<io::Result<T>> {
    loop {
        return match operation() {
            Ok(value) => Poll::Ready(Ok(value)),
            Err(error) if error.kind() == io::ErrorKind::WouldBlock => Poll::Pending,
            Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => Poll::Ready(Err(error)),
        };
    }
}

/// Read half of a non-blocking stream.
#[derive(Debug)]
pub struct TcpSource {
    stream: TcpStream,
}

impl Source for TcpSource {
    fn poll_read(&mut self, buf: &mut [u8]) -> Poll<io::Result<usize>> {
        poll_socket(|| self.stream.read(buf))
    }
}

/// Write half of a non-blocking stream.
#[derive(Debug)]
pub struct TcpSink {
    stream: TcpStream,
}

impl Sink for TcpSink {
    fn poll_write(&mut self, buf: &[u8]) -> Poll<io::Result<usize>> {
        poll_socket(|| self.stream.write(buf))
    }
}

/// One accepted connection, its socket halves wrapped for the pipeline.
#[derive(Debug)]
pub struct TcpConnection {
    reader: Reader<TcpSource>,
    writer: Writer<TcpSink>,
    peer: SocketAddr,
    closed: bool,
}

impl TcpConnection {
    fn open(stream: TcpStream, peer: SocketAddr) -> io::Result<Self> {
        stream.set_nonblocking(true)?;
        let write_half = stream.try_clone()?;
        Ok(Self {
            reader: Reader::new(TcpSource { stream }),
            writer: Writer::new(TcpSink { stream: write_half }),
            peer,
            closed: false,
        })
    }

    /// Address of the connected peer.
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }
}

impl Client for TcpConnection {
    type Source = TcpSource;
    type Sink = TcpSink;

    fn reader(&mut self) -> Option<&mut Reader<TcpSource>> {
        if self.closed {
            None
        } else {
            Some(&mut self.reader)
        }
    }

    fn writer(&mut self) -> Option<&mut Writer<TcpSink>> {
        if self.closed {
            None
        } else {
            Some(&mut self.writer)
        }
    }

    fn split(&mut self) -> Option<(&mut Reader<TcpSource>, &mut Writer<TcpSink>)> {
        if self.closed {
            None
        } else {
            Some((&mut self.reader, &mut self.writer))
        }
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            let _ = self.reader.get_ref().stream.shutdown(Shutdown::Both);
            trace!(peer = %self.peer, "connection shut down");
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

/// A slot-pooled server over a non-blocking tcp listener.
///
/// Accepting suspends while no connection is waiting and reports `None`
/// once the pool is full or the server is closed, matching the in-memory
/// loopback server byte for byte. A failed accept is logged and also
/// reported as `None`; the embedding loop decides whether to call accept
/// again.
#[derive(Debug)]
pub struct TcpServer<const MAX_CONNECTIONS: usize> {
    listener: TcpListener,
    slots: [Option<TcpConnection>; MAX_CONNECTIONS],
    closed: bool,
}

impl<const MAX_CONNECTIONS: usize> TcpServer<MAX_CONNECTIONS> {
    /// Binds the listener and switches it to non-blocking mode.
    pub fn bind(address: impl ToSocketAddrs) -> io::Result<Self> {
        let listener = TcpListener::bind(address)?;
        listener.set_nonblocking(true)?;
        info!(address = %listener.local_addr()?, "listening");
        Ok(Self {
            listener,
            slots: [const { None }; MAX_CONNECTIONS],
            closed: false,
        })
    }

    /// Local address of the listener, useful after binding port zero.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

impl<const MAX_CONNECTIONS: usize> Server for TcpServer<MAX_CONNECTIONS> {
    type Client = TcpConnection;

    async fn accept(&mut self) -> Option<ConnectionId> {
        if self.closed {
            return None;
        }
        let slot = self.slots.iter().position(Option::is_none)?;

        let accepted = poll_fn(|cx| {
            let poll = poll_socket(|| self.listener.accept());
            if poll.is_pending() {
                cx.waker().wake_by_ref();
            }
            poll
        })
        .await;
        let (stream, peer) = match accepted {
            Ok(pair) => pair,
            Err(error) => {
                warn!(%error, "accept failed");
                return None;
            }
        };
        let connection = match TcpConnection::open(stream, peer) {
            Ok(connection) => connection,
            Err(error) => {
                warn!(%error, %peer, "failed to prepare the connection");
                return None;
            }
        };
        debug!(slot, %peer, "connection admitted");
        self.slots[slot] = Some(connection);
        Some(slot)
    }

    fn client_mut(&mut self, id: ConnectionId) -> Option<&mut TcpConnection> {
        self.slots.get_mut(id)?.as_mut()
    }

    fn free_client(&mut self, id: ConnectionId) {
        if let Some(mut connection) = self.slots.get_mut(id).and_then(Option::take) {
            connection.close();
            trace!(slot = id, "connection freed");
        }
    }

    fn close(&mut self) {
        self.closed = true;
        for slot in &mut self.slots {
            if let Some(mut connection) = slot.take() {
                connection.close();
            }
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpStream;

    use nano_http::task::block_on;

    use crate::pipeline::serve_connection;
    use crate::respond::BodyResponse;

    use super::*;

    async fn hello() -> BodyResponse<'static> {
        BodyResponse { body: b"Hello World!" }
    }

    #[test]
    fn serves_one_exchange_over_a_real_socket() {
        let mut server = TcpServer::<2>::bind("127.0.0.1:0").unwrap();
        let address = server.local_addr().unwrap();

        let mut peer = TcpStream::connect(address).unwrap();
        peer.write_all(b"GET / HTTP/1.1\r\n\r\n").unwrap();

        let id = block_on(server.accept()).unwrap();
        let connection = server.client_mut(id).unwrap();
        let (reader, writer) = connection.split().unwrap();
        block_on(serve_connection(reader, writer, &hello));
        server.free_client(id);

        let mut response = Vec::new();
        peer.read_to_end(&mut response).unwrap();
        assert_eq!(response, b"HTTP/1.1 200 OK\r\nContent-Length: 12\r\n\r\nHello World!");
    }

    #[test]
    fn a_full_pool_reports_none_without_blocking() {
        let mut server = TcpServer::<1>::bind("127.0.0.1:0").unwrap();
        let address = server.local_addr().unwrap();

        let _first = TcpStream::connect(address).unwrap();
        let _second = TcpStream::connect(address).unwrap();

        assert_eq!(block_on(server.accept()), Some(0));
        assert_eq!(block_on(server.accept()), None);

        server.free_client(0);
        assert_eq!(block_on(server.accept()), Some(0));
    }

    #[test]
    fn a_closed_server_accepts_nothing() {
        let mut server = TcpServer::<1>::bind("127.0.0.1:0").unwrap();
        server.close();
        assert!(server.is_closed());
        assert_eq!(block_on(server.accept()), None);
    }

    #[test]
    fn freeing_a_connection_closes_the_socket() {
        let mut server = TcpServer::<1>::bind("127.0.0.1:0").unwrap();
        let address = server.local_addr().unwrap();

        let mut peer = TcpStream::connect(address).unwrap();
        let id = block_on(server.accept()).unwrap();
        assert_eq!(server.client_mut(id).unwrap().peer().ip(), address.ip());

        server.free_client(id);
        assert!(server.client_mut(id).is_none());

        let mut buf = [0u8; 1];
        assert_eq!(peer.read(&mut buf).unwrap(), 0);
    }
}
