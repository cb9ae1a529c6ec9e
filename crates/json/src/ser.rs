//! The format-agnostic serialization contract.
//!
//! A [`Serializer`] turns Rust values into bytes of some concrete format;
//! [`Serialize`] is implemented per value type *per serializer*, so leaf
//! types (numbers, bounded strings) can write themselves in whatever way
//! the format demands. Struct types get their implementation generated by
//! [`describe_struct!`](crate::describe_struct), which walks the fields in
//! declaration order through a [`SerializeStruct`] scope.
//!
//! Everything here is poll-driven: the futures returned by these methods
//! suspend whenever the underlying sink has no capacity and resume where
//! they left off.

use crate::error::EncodeError;

/// A value that can write itself to the serializer `S`.
#[expect(
    async_fn_in_trait,
    reason = "serialize futures are driven on one thread and promise no auto traits"
)]
pub trait Serialize<S: Serializer> {
    async fn serialize(&self, serializer: &mut S) -> Result<(), EncodeError>;
}

/// A byte-format backend for [`Serialize`].
///
/// The only composite shape this framework knows is the struct: opening one
/// yields a [`Serializer::Scope`] that borrows the serializer for the
/// duration of the struct's fields.
#[expect(
    async_fn_in_trait,
    reason = "serialize futures are driven on one thread and promise no auto traits"
)]
pub trait Serializer: Sized {
    /// The in-progress struct handle, exclusive over `self` while open.
    type Scope<'a>: SerializeStruct<Self>
    where
        Self: 'a;

    /// Begins a struct value, writing whatever opens one in this format.
    async fn struct_scope(&mut self) -> Result<Self::Scope<'_>, EncodeError>;
}

/// An open struct scope: fields go in one at a time, then [`end`] closes
/// the scope and gives the serializer back.
///
/// [`end`]: SerializeStruct::end
#[expect(
    async_fn_in_trait,
    reason = "serialize futures are driven on one thread and promise no auto traits"
)]
pub trait SerializeStruct<S: Serializer>: Sized {
    /// Writes one named field. Callers must pass fields in descriptor
    /// order; the scope owns the separator policy between them.
    async fn field<T: Serialize<S>>(&mut self, name: &str, value: &T) -> Result<(), EncodeError>;

    /// Closes the struct value.
    async fn end(self) -> Result<(), EncodeError>;
}
