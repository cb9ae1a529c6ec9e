//! Non-blocking byte source/sink capabilities and the peeking reader built
//! on them.
//!
//! The io model has exactly three outcomes per operation and they map onto
//! [`Poll`] without an extra enum:
//!
//! | outcome            | read                    | write                     |
//! |--------------------|-------------------------|---------------------------|
//! | no progress yet    | `Pending`               | `Pending`                 |
//! | progress           | `Ready(Ok(n))`, n ≥ 1   | `Ready(Ok(n))`, n ≥ 1     |
//! | stream over        | `Ready(Ok(0))` (eof)    | `Ready(Ok(0))` (broken)   |
//! | failure            | `Ready(Err(_))`         | `Ready(Err(_))`           |
//!
//! Implementations are *polled*: nothing registers wakers, the caller owns
//! the retry cadence (see [`crate::task`]). The async wrappers on
//! [`Reader`]/[`Writer`] wake their own waker before suspending so that
//! waker-driven executors keep polling them as well.
//!
//! [`Reader`] adds the single byte of lookahead the parsing combinators are
//! built on: a byte observed via [`Reader::peek`] is re-delivered by the next
//! read and consumed exactly once.

use std::future::poll_fn;
use std::io;
use std::task::{Context, Poll};

use bytes::{Buf, Bytes, BytesMut};

use crate::buffer::{GrowableBuffer, Store};

mod read;
mod write;

pub mod mem;

pub use write::FRACTION_DIGITS;

/// A non-blocking byte producer.
pub trait Source {
    /// Reads into `buf`, following the outcome table in the module docs.
    /// Reading into an empty `buf` completes trivially with `Ok(0)`.
    fn poll_read(&mut self, buf: &mut [u8]) -> Poll<io::Result<usize>>;
}

/// A non-blocking byte consumer.
pub trait Sink {
    /// Writes from `buf`, following the outcome table in the module docs.
    fn poll_write(&mut self, buf: &[u8]) -> Poll<io::Result<usize>>;
}

/// Requests an immediate re-poll before suspending.
///
/// Sources and sinks are polled rather than waker-driven, so a `Pending`
/// here carries no promise that anyone will call `wake` later. Waking our
/// own waker keeps the contract with executors that schedule by wakeups.
fn repoll<T>(cx: &mut Context<'_>, poll: Poll<T>) -> Poll<T> {
    if poll.is_pending() {
        cx.waker().wake_by_ref();
    }
    poll
}

/// A [`Source`] with one byte of lookahead.
#[derive(Debug)]
pub struct Reader<S> {
    source: S,
    peeked: Option<u8>,
}

impl<S: Source> Reader<S> {
    pub fn new(source: S) -> Self {
        Self { source, peeked: None }
    }

    pub fn get_ref(&self) -> &S {
        &self.source
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    /// Looks at the next byte without consuming it. `None` is end of stream.
    pub fn poll_peek(&mut self) -> Poll<io::Result<Option<u8>>> {
        if let Some(byte) = self.peeked {
            return Poll::Ready(Ok(Some(byte)));
        }
        let mut byte = [0u8; 1];
        match self.source.poll_read(&mut byte) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(0)) => Poll::Ready(Ok(None)),
            Poll::Ready(Ok(_)) => {
                self.peeked = Some(byte[0]);
                Poll::Ready(Ok(Some(byte[0])))
            }
            Poll::Ready(Err(error)) => Poll::Ready(Err(error)),
        }
    }

    /// Consumes and returns the next byte. `None` is end of stream.
    pub fn poll_next(&mut self) -> Poll<io::Result<Option<u8>>> {
        if let Some(byte) = self.peeked.take() {
            return Poll::Ready(Ok(Some(byte)));
        }
        let mut byte = [0u8; 1];
        match self.source.poll_read(&mut byte) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(0)) => Poll::Ready(Ok(None)),
            Poll::Ready(Ok(_)) => Poll::Ready(Ok(Some(byte[0]))),
            Poll::Ready(Err(error)) => Poll::Ready(Err(error)),
        }
    }

    /// Bulk read. A peeked byte is delivered first (alone, as a 1-byte
    /// read), so lookahead never reorders the stream.
    pub fn poll_read(&mut self, buf: &mut [u8]) -> Poll<io::Result<usize>> {
        if buf.is_empty() {
            return Poll::Ready(Ok(0));
        }
        if let Some(byte) = self.peeked.take() {
            buf[0] = byte;
            return Poll::Ready(Ok(1));
        }
        self.source.poll_read(buf)
    }

    /// Async form of [`Reader::poll_peek`].
    pub async fn peek(&mut self) -> io::Result<Option<u8>> {
        poll_fn(|cx| repoll(cx, self.poll_peek())).await
    }

    /// Async form of [`Reader::poll_next`].
    pub async fn next_byte(&mut self) -> io::Result<Option<u8>> {
        poll_fn(|cx| repoll(cx, self.poll_next())).await
    }

    /// Async form of [`Reader::poll_read`]. `Ok(0)` is end of stream.
    pub async fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        poll_fn(|cx| repoll(cx, self.poll_read(buf))).await
    }
}

/// A [`Sink`] wrapper owning the write-side combinators.
#[derive(Debug)]
pub struct Writer<W> {
    sink: W,
}

impl<W: Sink> Writer<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    pub fn poll_write(&mut self, buf: &[u8]) -> Poll<io::Result<usize>> {
        self.sink.poll_write(buf)
    }

    /// Writes all of `bytes`, suspending while the sink has no capacity.
    ///
    /// A sink that stops accepting bytes midway fails the whole write with
    /// [`io::ErrorKind::WriteZero`]; there is no partial-success reporting,
    /// matching the "byte count must match or the operation failed" rule of
    /// the wire encoders.
    pub async fn write_all(&mut self, mut bytes: &[u8]) -> io::Result<()> {
        while !bytes.is_empty() {
            let written = poll_fn(|cx| repoll(cx, self.sink.poll_write(bytes))).await?;
            if written == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "sink stopped accepting bytes",
                ));
            }
            bytes = &bytes[written..];
        }
        Ok(())
    }
}

/// `Bytes` is its own cursor: reading advances the view, an exhausted view
/// is end of stream.
impl Source for Bytes {
    fn poll_read(&mut self, buf: &mut [u8]) -> Poll<io::Result<usize>> {
        if buf.is_empty() || self.is_empty() {
            return Poll::Ready(Ok(0));
        }
        let n = buf.len().min(self.len());
        buf[..n].copy_from_slice(&self[..n]);
        self.advance(n);
        Poll::Ready(Ok(n))
    }
}

/// Unbounded in-memory sink; never suspends, never breaks.
impl Sink for BytesMut {
    fn poll_write(&mut self, buf: &[u8]) -> Poll<io::Result<usize>> {
        self.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }
}

/// Staging sink used to pre-render bodies whose length must be known before
/// the headers go out. Growth follows the buffer's ×1.5 policy.
impl Sink for GrowableBuffer {
    fn poll_write(&mut self, buf: &[u8]) -> Poll<io::Result<usize>> {
        for &byte in buf {
            self.push(byte);
        }
        Poll::Ready(Ok(buf.len()))
    }
}
