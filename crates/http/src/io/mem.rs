//! In-memory transports that misbehave on purpose.
//!
//! Real transports rarely deliver a whole message in one poll. [`Trickle`]
//! and [`BoundedSink`] recreate the awkward cases (suspension mid-token,
//! a peer that stops accepting) so parser and encoder tests exercise their
//! resumption and failure paths deterministically.

use std::io;
use std::task::Poll;

use bytes::{Buf, Bytes};

use super::{Sink, Source};

/// A [`Source`] that yields `Pending` before every chunk and caps how many
/// bytes a single poll may deliver.
#[derive(Debug)]
pub struct Trickle {
    data: Bytes,
    chunk: usize,
    ready: bool,
}

impl Trickle {
    /// # Panics
    ///
    /// Panics if `chunk` is zero.
    pub fn new(data: impl Into<Bytes>, chunk: usize) -> Self {
        assert!(chunk > 0, "chunk size must be at least one byte");
        Self { data: data.into(), chunk, ready: false }
    }
}

impl Source for Trickle {
    fn poll_read(&mut self, buf: &mut [u8]) -> Poll<io::Result<usize>> {
        if buf.is_empty() || self.data.is_empty() {
            return Poll::Ready(Ok(0));
        }
        if !self.ready {
            self.ready = true;
            return Poll::Pending;
        }
        self.ready = false;
        let n = buf.len().min(self.data.len()).min(self.chunk);
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data.advance(n);
        Poll::Ready(Ok(n))
    }
}

/// A [`Sink`] that accepts a fixed byte budget and then reports closure,
/// which a full write turns into a `WriteZero` failure.
#[derive(Debug)]
pub struct BoundedSink {
    written: Vec<u8>,
    budget: usize,
}

impl BoundedSink {
    pub fn with_budget(budget: usize) -> Self {
        Self { written: Vec::new(), budget }
    }

    /// The bytes accepted before the budget ran out.
    pub fn written(&self) -> &[u8] {
        &self.written
    }
}

impl Sink for BoundedSink {
    fn poll_write(&mut self, buf: &[u8]) -> Poll<io::Result<usize>> {
        let n = buf.len().min(self.budget);
        self.budget -= n;
        self.written.extend_from_slice(&buf[..n]);
        Poll::Ready(Ok(n))
    }
}

#[cfg(test)]
mod tests {
    use crate::io::Reader;
    use crate::task::block_on;

    use super::*;

    #[test]
    fn trickle_suspends_between_chunks() {
        let mut source = Trickle::new(&b"ab"[..], 1);
        let mut buf = [0u8; 4];
        assert!(source.poll_read(&mut buf).is_pending());
        assert!(matches!(source.poll_read(&mut buf), Poll::Ready(Ok(1))));
        assert_eq!(buf[0], b'a');
        assert!(source.poll_read(&mut buf).is_pending());
    }

    #[test]
    fn trickle_ends_cleanly() {
        let mut source = Trickle::new(&b"x"[..], 8);
        let mut buf = [0u8; 4];
        assert!(source.poll_read(&mut buf).is_pending());
        assert!(matches!(source.poll_read(&mut buf), Poll::Ready(Ok(1))));
        // End of stream is immediate, no trailing suspension.
        assert!(matches!(source.poll_read(&mut buf), Poll::Ready(Ok(0))));
    }

    #[test]
    fn combinators_resume_across_suspensions() {
        let mut reader = Reader::new(Trickle::new(&b"12.75,"[..], 1));
        let number = block_on(reader.read_number()).unwrap();
        assert!((number.unwrap() - 12.75).abs() < 1e-9);
        assert_eq!(block_on(reader.next_byte()).unwrap(), Some(b','));
    }

    #[test]
    fn bounded_sink_stops_at_budget() {
        let mut sink = BoundedSink::with_budget(2);
        assert!(matches!(sink.poll_write(b"abc"), Poll::Ready(Ok(2))));
        assert!(matches!(sink.poll_write(b"c"), Poll::Ready(Ok(0))));
        assert_eq!(sink.written(), b"ab");
    }
}
