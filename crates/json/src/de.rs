//! The format-agnostic deserialization contract.
//!
//! A [`Deserializer`] owns the input grammar: it knows how a struct opens,
//! how members are framed and separated, and how to skip a value nobody
//! asked for. What it does *not* know is which members a target type wants,
//! so it reports each member name to a [`MemberVisitor`] and lets the
//! visitor either consume the value ([`Member::Known`]) or decline it
//! ([`Member::Unknown`]), in which case the deserializer discards the value
//! with [`Deserializer::skip_value`] to keep the byte stream aligned.
//!
//! Completeness is tracked outside the grammar: the generated code records
//! every consumed member in a [`FieldSet`] and promotes the partial value to
//! a finished one only when every declared field was seen exactly once.

use nano_http::buffer::Store;

use crate::error::DecodeError;

/// A value that can build itself from the deserializer `D`.
#[expect(
    async_fn_in_trait,
    reason = "deserialize futures are driven on one thread and promise no auto traits"
)]
pub trait Deserialize<D: Deserializer>: Sized {
    async fn deserialize(deserializer: &mut D) -> Result<Self, DecodeError>;
}

/// A byte-format front end for [`Deserialize`].
#[expect(
    async_fn_in_trait,
    reason = "deserialize futures are driven on one thread and promise no auto traits"
)]
pub trait Deserializer: Sized {
    /// Walks one struct value, reporting each member to `visitor`.
    ///
    /// Member names are captured into `name_store`, which is cleared
    /// between members; the slice handed to the visitor is only valid for
    /// that call. A name too long for the store cannot belong to any
    /// declared field, so the member is skipped without a visit.
    ///
    /// Returning `Ok(())` means the struct's framing was consumed in full.
    /// It says nothing about which members were present; callers own that
    /// bookkeeping.
    async fn struct_scope<N, V>(
        &mut self,
        name_store: &mut N,
        visitor: V,
    ) -> Result<(), DecodeError>
    where
        N: Store,
        V: MemberVisitor<Self>;

    /// Consumes one complete value of any shape without keeping it.
    async fn skip_value(&mut self) -> Result<(), DecodeError>;
}

/// What a visitor did with one reported member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Member {
    /// The member matched a declared field and its value was consumed.
    Known,
    /// No declared field matched; the value is still in the stream and the
    /// deserializer must skip it.
    Unknown,
}

/// Receives one callback per member the input grammar reports.
#[expect(
    async_fn_in_trait,
    reason = "deserialize futures are driven on one thread and promise no auto traits"
)]
pub trait MemberVisitor<D: Deserializer> {
    /// Decides what `name` maps to. When the visitor consumes the value it
    /// must consume exactly one value from `deserializer` and answer
    /// [`Member::Known`]; answering [`Member::Unknown`] without touching
    /// the deserializer leaves the skip to the caller.
    async fn member(&mut self, name: &[u8], deserializer: &mut D) -> Result<Member, DecodeError>;
}

/// Presence bits for up to [`FieldSet::MAX_FIELDS`] struct fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldSet {
    bits: u64,
}

impl FieldSet {
    /// One bit per field in a `u64`; structs beyond this limit are
    /// rejected at compile time by [`describe_struct!`](crate::describe_struct).
    pub const MAX_FIELDS: usize = 64;

    #[must_use]
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    /// Marks `index` present, returning `false` if it already was.
    pub fn insert(&mut self, index: usize) -> bool {
        debug_assert!(index < Self::MAX_FIELDS);
        let mask = 1_u64 << index;
        let fresh = self.bits & mask == 0;
        self.bits |= mask;
        fresh
    }

    #[must_use]
    pub const fn contains(&self, index: usize) -> bool {
        debug_assert!(index < Self::MAX_FIELDS);
        self.bits & (1_u64 << index) != 0
    }

    /// The lowest index below `count` never inserted, if any.
    #[must_use]
    pub fn missing(&self, count: usize) -> Option<usize> {
        (0..count).find(|&index| !self.contains(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_reports_duplicates() {
        let mut set = FieldSet::new();
        assert!(set.insert(3));
        assert!(!set.insert(3));
        assert!(set.contains(3));
        assert!(!set.contains(2));
    }

    #[test]
    fn missing_finds_the_lowest_gap() {
        let mut set = FieldSet::new();
        set.insert(0);
        set.insert(2);
        assert_eq!(set.missing(3), Some(1));
        set.insert(1);
        assert_eq!(set.missing(3), None);
    }

    #[test]
    fn empty_set_is_missing_its_first_field() {
        let set = FieldSet::new();
        assert_eq!(set.missing(1), Some(0));
        assert_eq!(set.missing(0), None);
    }

    #[test]
    fn the_highest_bit_is_usable() {
        let mut set = FieldSet::new();
        assert!(set.insert(FieldSet::MAX_FIELDS - 1));
        assert!(set.contains(63));
        assert_eq!(set.missing(64), Some(0));
    }
}
