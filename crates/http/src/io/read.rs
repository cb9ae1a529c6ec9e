//! Grammar combinators on [`Reader`].
//!
//! Every combinator follows the same convention: it consumes exactly the
//! bytes that belong to its grammar and stops *without consuming* the first
//! byte that does not, so combinators compose by leaving the stream parked
//! on the next token. None of them backtracks.

use std::io;

use crate::buffer::Store;

use super::{Reader, Source};

impl<S: Source> Reader<S> {
    /// Consumes bytes while `predicate` holds, discarding them.
    ///
    /// Returns the number of bytes consumed. Stops at end of stream or at
    /// the first non-matching byte, which stays in the stream.
    pub async fn read_while(
        &mut self,
        mut predicate: impl FnMut(u8) -> bool,
    ) -> io::Result<usize> {
        let mut consumed = 0;
        while let Some(byte) = self.peek().await? {
            if !predicate(byte) {
                break;
            }
            self.next_byte().await?;
            consumed += 1;
        }
        Ok(consumed)
    }

    /// Like [`Reader::read_while`], but copies the consumed bytes into
    /// `buf`.
    ///
    /// Stops early, without error, once `buf` is full; the first byte that
    /// did not fit stays in the stream. Returns the number of bytes
    /// written into `buf`.
    pub async fn read_into_while(
        &mut self,
        buf: &mut [u8],
        mut predicate: impl FnMut(u8) -> bool,
    ) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.peek().await? {
                Some(byte) if predicate(byte) => {
                    self.next_byte().await?;
                    buf[filled] = byte;
                    filled += 1;
                }
                _ => break,
            }
        }
        Ok(filled)
    }

    /// Like [`Reader::read_into_while`], but pushes into a bounded
    /// [`Store`].
    ///
    /// Returns `true` when every consumed byte fit. When the store runs
    /// out of room the scan keeps consuming matching bytes, discarding the
    /// ones that no longer fit, and returns `false` once the grammar ends.
    /// The stream therefore stops at the same position either way; only
    /// the caller's view of the token is truncated.
    pub async fn read_into_store_while(
        &mut self,
        store: &mut impl Store,
        mut predicate: impl FnMut(u8) -> bool,
    ) -> io::Result<bool> {
        let mut fitted = true;
        loop {
            match self.peek().await? {
                Some(byte) if predicate(byte) => {
                    self.next_byte().await?;
                    if fitted && !store.push(byte) {
                        fitted = false;
                    }
                }
                _ => return Ok(fitted),
            }
        }
    }

    /// Consumes one CRLF line terminator.
    ///
    /// - `Some(true)`: a CRLF was present and has been consumed.
    /// - `Some(false)`: the next byte is not `\r`; nothing was consumed.
    /// - `None`: malformed. A `\r` without a following `\n`, or the stream
    ///   ended inside the terminator.
    pub async fn read_crlf(&mut self) -> io::Result<Option<bool>> {
        match self.peek().await? {
            None => return Ok(None),
            Some(b'\r') => {}
            Some(_) => return Ok(Some(false)),
        }
        self.next_byte().await?;
        match self.next_byte().await? {
            Some(b'\n') => Ok(Some(true)),
            _ => Ok(None),
        }
    }

    /// Parses an ASCII decimal number with an optional leading `-` and an
    /// optional fractional part.
    ///
    /// Integer digits accumulate as `value * 10 + digit`; after a `.` each
    /// digit contributes a tenth of the previous one's weight. The scan
    /// stops, without consuming, at the first byte outside the number
    /// grammar. A `-` is only significant as the very first character; a
    /// later one ends the scan like any foreign byte. Returns `None` when
    /// no digit was ever seen.
    ///
    /// ```
    /// use bytes::Bytes;
    /// use nano_http::io::Reader;
    /// use nano_http::task::block_on;
    ///
    /// let mut reader = Reader::new(Bytes::from_static(b"-12.5,"));
    /// assert_eq!(block_on(reader.read_number()).unwrap(), Some(-12.5));
    /// assert_eq!(block_on(reader.next_byte()).unwrap(), Some(b','));
    /// ```
    pub async fn read_number(&mut self) -> io::Result<Option<f64>> {
        let mut seen_digit = false;
        let mut negative = false;
        let mut number = 0.0f64;
        let mut first = true;

        loop {
            match self.peek().await? {
                Some(byte @ b'0'..=b'9') => {
                    self.next_byte().await?;
                    seen_digit = true;
                    number = number * 10.0 + f64::from(byte - b'0');
                }
                Some(b'-') if first => {
                    self.next_byte().await?;
                    negative = true;
                }
                Some(b'.') => {
                    self.next_byte().await?;
                    break;
                }
                _ => return Ok(number_value(seen_digit, negative, number)),
            }
            first = false;
        }

        let mut scale = 0.1f64;
        while let Some(byte @ b'0'..=b'9') = self.peek().await? {
            self.next_byte().await?;
            seen_digit = true;
            number += scale * f64::from(byte - b'0');
            scale /= 10.0;
        }
        Ok(number_value(seen_digit, negative, number))
    }
}

fn number_value(seen_digit: bool, negative: bool, number: f64) -> Option<f64> {
    if !seen_digit {
        return None;
    }
    Some(if negative { -number } else { number })
}
