//! JSON output over a [`Writer`].
//!
//! Output is compact: no insignificant whitespace, members separated by a
//! single comma. Strings go out as `"` + raw bytes + `"` with **no
//! escaping**, so string values must not contain `"` or `\`. This is the
//! same shortcut the reader takes by consuming escapes without decoding
//! them.

use std::io;

use nano_http::buffer::{FixedBuffer, Store};
use nano_http::io::{Sink, Writer};

use crate::error::EncodeError;
use crate::ser::{Serialize, SerializeStruct, Serializer};

/// Serializes values as compact JSON through a borrowed [`Writer`].
#[derive(Debug)]
pub struct JsonSerializer<'w, W: Sink> {
    writer: &'w mut Writer<W>,
}

impl<'w, W: Sink> JsonSerializer<'w, W> {
    pub fn new(writer: &'w mut Writer<W>) -> Self {
        Self { writer }
    }

    /// The underlying writer, for hand-written [`Serialize`] impls.
    pub fn writer(&mut self) -> &mut Writer<W> {
        self.writer
    }
}

/// An open JSON object: `{` has been written, `,` goes out before every
/// field but the first, [`end`](SerializeStruct::end) writes `}`.
#[derive(Debug)]
pub struct JsonScope<'a, 'w, W: Sink> {
    serializer: &'a mut JsonSerializer<'w, W>,
    first: bool,
}

impl<'w, W: Sink> Serializer for JsonSerializer<'w, W> {
    type Scope<'a>
        = JsonScope<'a, 'w, W>
    where
        Self: 'a;

    async fn struct_scope(&mut self) -> Result<Self::Scope<'_>, EncodeError> {
        self.writer.write_char(b'{').await?;
        Ok(JsonScope {
            serializer: self,
            first: true,
        })
    }
}

impl<'w, W: Sink> SerializeStruct<JsonSerializer<'w, W>> for JsonScope<'_, 'w, W> {
    async fn field<T: Serialize<JsonSerializer<'w, W>>>(
        &mut self,
        name: &str,
        value: &T,
    ) -> Result<(), EncodeError> {
        if self.first {
            self.first = false;
        } else {
            self.serializer.writer.write_char(b',').await?;
        }
        write_string(self.serializer.writer, name.as_bytes()).await?;
        self.serializer.writer.write_char(b':').await?;
        value.serialize(self.serializer).await
    }

    async fn end(self) -> Result<(), EncodeError> {
        Ok(self.serializer.writer.write_char(b'}').await?)
    }
}

/// Writes `"bytes"` without escaping anything.
pub async fn write_string<W: Sink>(writer: &mut Writer<W>, bytes: &[u8]) -> io::Result<()> {
    writer.write_char(b'"').await?;
    writer.write_all(bytes).await?;
    writer.write_char(b'"').await
}

async fn write_finite<W: Sink>(writer: &mut Writer<W>, value: f64) -> Result<(), EncodeError> {
    if !value.is_finite() {
        return Err(EncodeError::NonFinite);
    }
    Ok(writer.write_decimal(value).await?)
}

macro_rules! serialize_as_decimal {
    ($($ty:ty),+ $(,)?) => {$(
        impl<'w, W: Sink> Serialize<JsonSerializer<'w, W>> for $ty {
            async fn serialize(
                &self,
                serializer: &mut JsonSerializer<'w, W>,
            ) -> Result<(), EncodeError> {
                write_finite(serializer.writer, f64::from(*self)).await
            }
        }
    )+};
}

serialize_as_decimal! { i16, i32, u16, u32, f32 }

impl<'w, W: Sink> Serialize<JsonSerializer<'w, W>> for i64 {
    async fn serialize(&self, serializer: &mut JsonSerializer<'w, W>) -> Result<(), EncodeError> {
        #[expect(
            clippy::cast_precision_loss,
            reason = "json numbers are f64, magnitudes beyond 2^53 round"
        )]
        let value = *self as f64;
        write_finite(serializer.writer, value).await
    }
}

impl<'w, W: Sink> Serialize<JsonSerializer<'w, W>> for f64 {
    async fn serialize(&self, serializer: &mut JsonSerializer<'w, W>) -> Result<(), EncodeError> {
        write_finite(serializer.writer, *self).await
    }
}

impl<'w, W: Sink> Serialize<JsonSerializer<'w, W>> for bool {
    async fn serialize(&self, serializer: &mut JsonSerializer<'w, W>) -> Result<(), EncodeError> {
        let literal: &[u8] = if *self { b"true" } else { b"false" };
        Ok(serializer.writer.write_all(literal).await?)
    }
}

impl<'w, W: Sink, const N: usize> Serialize<JsonSerializer<'w, W>> for FixedBuffer<N> {
    async fn serialize(&self, serializer: &mut JsonSerializer<'w, W>) -> Result<(), EncodeError> {
        Ok(write_string(serializer.writer, self.as_slice()).await?)
    }
}
