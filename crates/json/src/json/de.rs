//! JSON input over a [`Reader`].
//!
//! The deserializer drives the object grammar: `{`, comma-separated
//! `"name" : value` members, `}`, with insignificant whitespace allowed
//! around every token. Values nobody asked for are discarded by
//! [`Deserializer::skip_value`], which balances brackets iteratively and
//! walks strings escape-aware, so unknown members of any shape keep the
//! stream aligned. Bracket kinds are not cross-checked while skipping; a
//! `[` closed by `}` inside discarded input is accepted.
//!
//! Failures are terminal. Nothing here recovers, resynchronizes or
//! backtracks past the first offending byte.

use nano_http::buffer::{FixedBuffer, Store};
use nano_http::io::{Reader, Source};
use nano_http::utils::is_whitespace;
use tracing::trace;

use crate::de::{Deserialize, Deserializer, Member, MemberVisitor};
use crate::error::DecodeError;

/// Deserializes JSON from a borrowed [`Reader`].
#[derive(Debug)]
pub struct JsonDeserializer<'r, S: Source> {
    reader: &'r mut Reader<S>,
}

impl<'r, S: Source> JsonDeserializer<'r, S> {
    pub fn new(reader: &'r mut Reader<S>) -> Self {
        Self { reader }
    }

    /// The underlying reader, for hand-written [`Deserialize`] impls.
    pub fn reader(&mut self) -> &mut Reader<S> {
        self.reader
    }

    /// Reads one number, rejecting input without any digits.
    pub async fn number(&mut self) -> Result<f64, DecodeError> {
        match self.reader.read_number().await? {
            Some(value) => Ok(value),
            None => Err(DecodeError::InvalidNumber),
        }
    }

    /// Reads the literal `true` or `false`.
    ///
    /// Bytes are captured while they belong to the literal character set,
    /// then compared whole, so near-misses like `tRue` fail without
    /// consuming past the first foreign byte.
    pub async fn boolean(&mut self) -> Result<bool, DecodeError> {
        let mut captured = [0_u8; 5];
        let length = self
            .reader
            .read_into_while(&mut captured, is_boolean_byte)
            .await?;
        match &captured[..length] {
            b"true" => Ok(true),
            b"false" => Ok(false),
            _ => Err(DecodeError::InvalidLiteral),
        }
    }

    /// Reads the literal `null`.
    pub async fn null(&mut self) -> Result<(), DecodeError> {
        let mut captured = [0_u8; 4];
        let length = self
            .reader
            .read_into_while(&mut captured, is_null_byte)
            .await?;
        if &captured[..length] == b"null" {
            Ok(())
        } else {
            Err(DecodeError::InvalidLiteral)
        }
    }

    /// Reads a string into `store`, returning whether it fit.
    ///
    /// The opening quote must be the next byte. Escape sequences are
    /// consumed for framing but not decoded: neither the backslash nor
    /// the byte after it reaches the store. On overflow the remainder is
    /// still consumed through the closing quote so the stream stays
    /// aligned and the caller can treat the value as skippable.
    pub async fn string_into(&mut self, store: &mut impl Store) -> Result<bool, DecodeError> {
        self.expect(b'"').await?;
        let mut fitted = true;
        loop {
            let Some(byte) = self.reader.next_byte().await? else {
                return Err(DecodeError::UnexpectedEof);
            };
            match byte {
                b'"' => return Ok(fitted),
                b'\\' => {
                    if self.reader.next_byte().await?.is_none() {
                        return Err(DecodeError::UnexpectedEof);
                    }
                }
                _ => {
                    if fitted && !store.push(byte) {
                        fitted = false;
                    }
                }
            }
        }
    }

    async fn expect(&mut self, expected: u8) -> Result<(), DecodeError> {
        match self.reader.next_byte().await? {
            None => Err(DecodeError::UnexpectedEof),
            Some(byte) if byte == expected => Ok(()),
            Some(byte) => Err(DecodeError::unexpected(byte)),
        }
    }

    /// Consumes string bytes after the opening quote, storing nothing.
    async fn skip_string_tail(&mut self) -> Result<(), DecodeError> {
        loop {
            match self.reader.next_byte().await? {
                None => return Err(DecodeError::UnexpectedEof),
                Some(b'"') => return Ok(()),
                Some(b'\\') => {
                    if self.reader.next_byte().await?.is_none() {
                        return Err(DecodeError::UnexpectedEof);
                    }
                }
                Some(_) => {}
            }
        }
    }

    /// Consumes a bracketed value by depth counting.
    async fn skip_nested(&mut self) -> Result<(), DecodeError> {
        let mut depth = 0_usize;
        loop {
            match self.reader.next_byte().await? {
                None => return Err(DecodeError::UnexpectedEof),
                Some(b'{' | b'[') => depth += 1,
                Some(b'}' | b']') => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Some(b'"') => self.skip_string_tail().await?,
                Some(_) => {}
            }
        }
    }
}

impl<S: Source> Deserializer for JsonDeserializer<'_, S> {
    async fn struct_scope<N, V>(
        &mut self,
        name_store: &mut N,
        mut visitor: V,
    ) -> Result<(), DecodeError>
    where
        N: Store,
        V: MemberVisitor<Self>,
    {
        self.reader.read_while(is_whitespace).await?;
        self.expect(b'{').await?;
        self.reader.read_while(is_whitespace).await?;
        if self.reader.peek().await? == Some(b'}') {
            let _ = self.reader.next_byte().await?;
            return Ok(());
        }
        loop {
            self.reader.read_while(is_whitespace).await?;
            let fitted = self.string_into(name_store).await?;
            self.reader.read_while(is_whitespace).await?;
            self.expect(b':').await?;
            self.reader.read_while(is_whitespace).await?;
            if fitted {
                match visitor.member(name_store.as_slice(), self).await? {
                    Member::Known => {}
                    Member::Unknown => {
                        trace!(name_length = name_store.len(), "skipping unknown member");
                        self.skip_value().await?;
                    }
                }
            } else {
                // An overflowed name cannot match any declared field, and
                // its store holds only a prefix, so the visitor never sees it.
                trace!("skipping member whose name does not fit the name store");
                self.skip_value().await?;
            }
            name_store.clear();
            self.reader.read_while(is_whitespace).await?;
            match self.reader.next_byte().await? {
                Some(b',') => {}
                Some(b'}') => return Ok(()),
                Some(byte) => return Err(DecodeError::unexpected(byte)),
                None => return Err(DecodeError::UnexpectedEof),
            }
        }
    }

    async fn skip_value(&mut self) -> Result<(), DecodeError> {
        self.reader.read_while(is_whitespace).await?;
        match self.reader.peek().await? {
            None => Err(DecodeError::UnexpectedEof),
            Some(b'"') => {
                let _ = self.reader.next_byte().await?;
                self.skip_string_tail().await
            }
            Some(b'{' | b'[') => self.skip_nested().await,
            Some(b't' | b'f') => {
                self.boolean().await?;
                Ok(())
            }
            Some(b'n') => self.null().await,
            Some(_) => {
                self.number().await?;
                Ok(())
            }
        }
    }
}

const fn is_boolean_byte(byte: u8) -> bool {
    matches!(
        byte,
        b't' | b'r' | b'u' | b'e' | b'f' | b'a' | b'l' | b's'
    )
}

const fn is_null_byte(byte: u8) -> bool {
    matches!(byte, b'n' | b'u' | b'l')
}

macro_rules! deserialize_as_truncated {
    ($($ty:ty),+ $(,)?) => {$(
        impl<'r, S: Source> Deserialize<JsonDeserializer<'r, S>> for $ty {
            async fn deserialize(
                deserializer: &mut JsonDeserializer<'r, S>,
            ) -> Result<Self, DecodeError> {
                let number = deserializer.number().await?;
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "json numbers are f64, narrower targets truncate toward zero"
                )]
                let value = number as $ty;
                Ok(value)
            }
        }
    )+};
}

deserialize_as_truncated! { i16, i32, i64, f32 }

macro_rules! deserialize_as_truncated_unsigned {
    ($($ty:ty),+ $(,)?) => {$(
        impl<'r, S: Source> Deserialize<JsonDeserializer<'r, S>> for $ty {
            async fn deserialize(
                deserializer: &mut JsonDeserializer<'r, S>,
            ) -> Result<Self, DecodeError> {
                let number = deserializer.number().await?;
                #[expect(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    reason = "json numbers are f64, unsigned targets truncate toward zero"
                )]
                let value = number as $ty;
                Ok(value)
            }
        }
    )+};
}

deserialize_as_truncated_unsigned! { u16, u32 }

impl<'r, S: Source> Deserialize<JsonDeserializer<'r, S>> for f64 {
    async fn deserialize(deserializer: &mut JsonDeserializer<'r, S>) -> Result<Self, DecodeError> {
        deserializer.number().await
    }
}

impl<'r, S: Source> Deserialize<JsonDeserializer<'r, S>> for bool {
    async fn deserialize(deserializer: &mut JsonDeserializer<'r, S>) -> Result<Self, DecodeError> {
        deserializer.boolean().await
    }
}

impl<'r, S: Source, const N: usize> Deserialize<JsonDeserializer<'r, S>> for FixedBuffer<N> {
    async fn deserialize(deserializer: &mut JsonDeserializer<'r, S>) -> Result<Self, DecodeError> {
        let mut buffer = Self::new();
        if deserializer.string_into(&mut buffer).await? {
            Ok(buffer)
        } else {
            Err(DecodeError::StringOverflow)
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use indoc::indoc;
    use nano_http::io::mem::Trickle;
    use nano_http::task::block_on;

    use super::*;
    use crate::describe_struct;

    describe_struct! {
        #[derive(Debug)]
        struct Person {
            name: FixedBuffer<20>,
            age: i32,
        }
    }

    describe_struct! {
        #[derive(Debug)]
        struct Badge {
            owner: Person,
            active: bool,
        }
    }

    describe_struct! {
        #[derive(Debug)]
        struct Tag {
            name: FixedBuffer<4>,
        }
    }

    describe_struct! {
        #[derive(Debug)]
        struct Reading {
            value: f64,
        }
    }

    fn reader_over(input: &str) -> Reader<Bytes> {
        Reader::new(Bytes::copy_from_slice(input.as_bytes()))
    }

    fn parse<T>(input: &str) -> Result<T, DecodeError>
    where
        T: for<'r> Deserialize<JsonDeserializer<'r, Bytes>>,
    {
        let mut reader = reader_over(input);
        let mut deserializer = JsonDeserializer::new(&mut reader);
        block_on(T::deserialize(&mut deserializer))
    }

    #[test]
    fn parses_a_flat_struct() {
        let person: Person = parse(r#"{"name":"Radiant","age":16}"#).unwrap();
        assert_eq!(person.name.as_slice(), b"Radiant");
        assert_eq!(person.age, 16);
    }

    #[test]
    fn whitespace_is_tolerated_around_every_token() {
        let person: Person = parse(indoc! {r#"
            {
                "name" : "Test" ,
                "age" : 10
            }
        "#})
        .unwrap();
        assert_eq!(person.name.as_slice(), b"Test");
        assert_eq!(person.age, 10);
    }

    #[test]
    fn member_order_does_not_matter() {
        let person: Person = parse(r#"{"age":16,"name":"Radiant"}"#).unwrap();
        assert_eq!(person.age, 16);
    }

    #[test]
    fn nested_structs_parse_recursively() {
        let badge: Badge = parse(r#"{"owner":{"name":"Test","age":10},"active":false}"#).unwrap();
        assert_eq!(badge.owner.age, 10);
        assert!(!badge.active);
    }

    #[test]
    fn missing_member_fails_even_when_the_rest_parses() {
        let error = parse::<Person>(r#"{"age":10}"#).unwrap_err();
        assert!(matches!(error, DecodeError::MissingMember { name: "name" }));
    }

    #[test]
    fn duplicate_member_fails() {
        let error = parse::<Person>(r#"{"name":"a","age":1,"age":2}"#).unwrap_err();
        assert!(matches!(error, DecodeError::DuplicateMember { name: "age" }));
    }

    #[test]
    fn unknown_members_of_any_shape_are_skipped() {
        let person: Person = parse(
            r#"{"name":"A","hobby":{"indoor":["chess",true],"outdoor":null},"score":-1.5,"age":5}"#,
        )
        .unwrap();
        assert_eq!(person.name.as_slice(), b"A");
        assert_eq!(person.age, 5);
    }

    #[test]
    fn oversized_member_names_are_skipped() {
        // The name store holds the longest declared name ("name", 4 bytes),
        // so a longer member name overflows it and is discarded unmatched.
        let person: Person = parse(r#"{"nameplate":"x","name":"B","age":3}"#).unwrap();
        assert_eq!(person.name.as_slice(), b"B");
    }

    #[test]
    fn near_miss_literals_are_rejected() {
        let error = parse::<Badge>(r#"{"owner":{"name":"T","age":1},"active":tRue}"#).unwrap_err();
        assert!(matches!(error, DecodeError::InvalidLiteral));
    }

    #[test]
    fn trailing_comma_is_rejected() {
        let error = parse::<Person>(r#"{"name":"a","age":1,}"#).unwrap_err();
        assert!(matches!(error, DecodeError::Unexpected { found: b'}' }));
    }

    #[test]
    fn missing_separator_is_rejected() {
        let error = parse::<Person>(r#"{"name":"a" "age":1}"#).unwrap_err();
        assert!(matches!(error, DecodeError::Unexpected { found: b'"' }));
    }

    #[test]
    fn semicolon_separator_is_rejected() {
        let error = parse::<Person>(r#"{"name":"a";"age":1}"#).unwrap_err();
        assert!(matches!(error, DecodeError::Unexpected { found: b';' }));
    }

    #[test]
    fn string_overflow_fails_the_value() {
        let error = parse::<Tag>(r#"{"name":"abcde"}"#).unwrap_err();
        assert!(matches!(error, DecodeError::StringOverflow));
    }

    #[test]
    fn escapes_are_consumed_but_not_decoded() {
        let person: Person = parse(r#"{"name":"a\"b","age":1}"#).unwrap();
        assert_eq!(person.name.as_slice(), b"ab");
    }

    #[test]
    fn known_member_null_is_rejected() {
        let error = parse::<Person>(r#"{"name":null,"age":1}"#).unwrap_err();
        assert!(matches!(error, DecodeError::Unexpected { found: b'n' }));
    }

    #[test]
    fn numbers_truncate_toward_zero() {
        let person: Person = parse(r#"{"name":"a","age":10.9}"#).unwrap();
        assert_eq!(person.age, 10);
    }

    #[test]
    fn negative_fractions_parse() {
        let reading: Reading = parse(r#"{"value":-12.5}"#).unwrap();
        assert!((reading.value + 12.5).abs() < 1e-9);
    }

    #[test]
    fn eof_inside_a_value_fails() {
        let error = parse::<Person>(r#"{"name":"a","age":"#).unwrap_err();
        assert!(matches!(error, DecodeError::InvalidNumber));
        let error = parse::<Person>(r#"{"name""#).unwrap_err();
        assert!(matches!(error, DecodeError::UnexpectedEof));
    }

    #[test]
    fn non_object_input_fails_up_front() {
        let error = parse::<Person>("[1]").unwrap_err();
        assert!(matches!(error, DecodeError::Unexpected { found: b'[' }));
    }

    #[test]
    fn skip_value_leaves_the_stream_aligned() {
        let mut reader = reader_over(r#"[1,{"a":"}"},null,true]X"#);
        let mut deserializer = JsonDeserializer::new(&mut reader);
        block_on(deserializer.skip_value()).unwrap();
        assert_eq!(block_on(reader.next_byte()).unwrap(), Some(b'X'));
    }

    #[test]
    fn scopes_report_each_member_name_once() {
        struct Echo<'a> {
            names: &'a mut Vec<Vec<u8>>,
        }

        impl<D: Deserializer> MemberVisitor<D> for Echo<'_> {
            async fn member(
                &mut self,
                name: &[u8],
                deserializer: &mut D,
            ) -> Result<Member, DecodeError> {
                self.names.push(name.to_vec());
                deserializer.skip_value().await?;
                Ok(Member::Known)
            }
        }

        let mut names = Vec::new();
        let mut store = FixedBuffer::<8>::new();

        let mut reader = reader_over("{}");
        let mut deserializer = JsonDeserializer::new(&mut reader);
        block_on(deserializer.struct_scope(&mut store, Echo { names: &mut names })).unwrap();
        assert!(names.is_empty());

        let mut reader = reader_over(r#"{ "a" : 1 , "b" : [2] }"#);
        let mut deserializer = JsonDeserializer::new(&mut reader);
        block_on(deserializer.struct_scope(&mut store, Echo { names: &mut names })).unwrap();
        assert_eq!(names, [b"a".to_vec(), b"b".to_vec()]);
    }

    #[test]
    fn byte_at_a_time_input_resumes_cleanly() {
        let mut reader = Reader::new(Trickle::new(r#"{"name":"Radiant","age":16}"#, 1));
        let mut deserializer = JsonDeserializer::new(&mut reader);
        let person = block_on(Person::deserialize(&mut deserializer)).unwrap();
        assert_eq!(person.age, 16);
    }
}
