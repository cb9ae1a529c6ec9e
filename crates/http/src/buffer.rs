//! Owned byte storage for the parsing layer.
//!
//! Grammars that capture tokens (a header name, a path, a JSON member name)
//! write them through the [`Store`] capability so the same combinator works
//! against a stack buffer or a heap buffer. A full [`FixedBuffer`] rejects
//! the push and lets the grammar decide whether "ran out of room" is fatal;
//! a [`GrowableBuffer`] never rejects.
//!
//! Non-owning views are plain `&[u8]` borrows, obtained via
//! [`Store::as_slice`].

/// A byte store with explicit overflow: `push` reports whether the byte was
/// kept, `clear` resets the length without touching capacity.
pub trait Store {
    /// Appends one byte, returning `false` if the store is out of room.
    fn push(&mut self, byte: u8) -> bool;

    /// Resets the length to zero. Capacity (and any heap allocation) is kept.
    fn clear(&mut self);

    /// The bytes pushed since the last `clear`.
    fn as_slice(&self) -> &[u8];

    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

/// Fixed-capacity inline storage: `N` bytes on the stack, no allocation.
///
/// `push` fails once `N` bytes are held. This is the bounded store behind
/// header-name/value capture and JSON member names, where the capacity bound
/// is part of the protocol budget.
#[derive(Debug, Clone)]
pub struct FixedBuffer<const N: usize> {
    data: [u8; N],
    len: usize,
}

impl<const N: usize> FixedBuffer<N> {
    #[must_use]
    pub const fn new() -> Self {
        Self { data: [0; N], len: 0 }
    }

    /// Capacity in bytes, i.e. `N`.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Builds a buffer pre-filled from `bytes`.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is longer than `N`.
    #[must_use]
    pub fn from_slice(bytes: &[u8]) -> Self {
        assert!(bytes.len() <= N, "slice longer than buffer capacity");
        let mut buffer = Self::new();
        buffer.data[..bytes.len()].copy_from_slice(bytes);
        buffer.len = bytes.len();
        buffer
    }
}

impl<const N: usize> Default for FixedBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Store for FixedBuffer<N> {
    fn push(&mut self, byte: u8) -> bool {
        if self.len == N {
            return false;
        }
        self.data[self.len] = byte;
        self.len += 1;
        true
    }

    fn clear(&mut self) {
        self.len = 0;
    }

    fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }
}

impl<const N: usize> PartialEq for FixedBuffer<N> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<const N: usize> Eq for FixedBuffer<N> {}

impl<const N: usize> AsRef<[u8]> for FixedBuffer<N> {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

/// Heap-backed storage whose `push` never fails.
///
/// When length reaches capacity the buffer reserves up to
/// `max(1, ceil(capacity * 3 / 2))` total bytes, a ×1.5 growth policy that
/// keeps appends amortized O(1) without the doubling overshoot. The allocator
/// may round the reservation up.
#[derive(Debug, Clone, Default)]
pub struct GrowableBuffer {
    data: Vec<u8>,
}

impl GrowableBuffer {
    #[must_use]
    pub const fn new() -> Self {
        Self { data: Vec::new() }
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Consumes the buffer, returning the underlying bytes.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

impl Store for GrowableBuffer {
    fn push(&mut self, byte: u8) -> bool {
        if self.data.len() == self.data.capacity() {
            let target = (self.data.capacity() * 3).div_ceil(2).max(1);
            self.data.reserve_exact(target - self.data.len());
        }
        self.data.push(byte);
        true
    }

    fn clear(&mut self) {
        self.data.clear();
    }

    fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

impl AsRef<[u8]> for GrowableBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_buffer_rejects_overflow() {
        let mut buffer = FixedBuffer::<3>::new();
        assert!(buffer.push(b'a'));
        assert!(buffer.push(b'b'));
        assert!(buffer.push(b'c'));
        assert!(!buffer.push(b'd'));
        assert_eq!(buffer.as_slice(), b"abc");
    }

    #[test]
    fn fixed_buffer_clear_resets_length_only() {
        let mut buffer = FixedBuffer::<4>::from_slice(b"abcd");
        assert!(!buffer.push(b'e'));
        buffer.clear();
        assert!(buffer.is_empty());
        assert!(buffer.push(b'x'));
        assert_eq!(buffer.as_slice(), b"x");
    }

    #[test]
    fn zero_capacity_buffer_rejects_everything() {
        let mut buffer = FixedBuffer::<0>::new();
        assert!(!buffer.push(b'a'));
        assert!(buffer.is_empty());
    }

    #[test]
    fn growable_buffer_accepts_everything() {
        let mut buffer = GrowableBuffer::new();
        for byte in 0..=255u8 {
            assert!(buffer.push(byte));
        }
        assert_eq!(buffer.len(), 256);
        assert_eq!(buffer.as_slice()[255], 255);
    }

    #[test]
    fn growable_buffer_growth_steps() {
        // From empty the first reservation is one byte, then ×1.5 rounded up:
        // 1, 2, 3, 5, 8, ... The allocator may hand back more, so only check
        // the lower bound holds and data survives growth.
        let mut buffer = GrowableBuffer::new();
        for byte in b'a'..=b'z' {
            buffer.push(byte);
            assert!(buffer.capacity() >= buffer.len());
        }
        assert_eq!(buffer.as_slice(), b"abcdefghijklmnopqrstuvwxyz");
    }

    #[test]
    fn growable_buffer_clear_keeps_capacity() {
        let mut buffer = GrowableBuffer::with_capacity(16);
        buffer.push(b'a');
        buffer.clear();
        assert!(buffer.is_empty());
        assert!(buffer.capacity() >= 16);
    }
}
