//! Struct descriptors and the code generator behind them.
//!
//! Generic (de)serialization needs three things per struct: the ordered
//! field-name table, a name-store capacity covering the longest name, and a
//! way to build a value before its members arrive. [`Described`] carries
//! those, and [`describe_struct!`] derives it together with [`Serialize`]
//! and [`Deserialize`] implementations from an ordinary struct definition.
//!
//! [`Serialize`]: crate::Serialize
//! [`Deserialize`]: crate::Deserialize

/// Descriptor contract for struct types with generated codecs.
pub trait Described {
    /// Field names in declaration order. A field's position here is its
    /// index in the presence [`FieldSet`](crate::FieldSet).
    const FIELDS: &'static [&'static str];

    /// The capacity a name store needs to hold any declared field name.
    const NAME_CAPACITY: usize = longest_name(Self::FIELDS);

    /// A value with every field defaulted, awaiting member assignment.
    fn empty() -> Self;
}

/// Length of the longest name in `names`, zero when empty.
#[must_use]
pub const fn longest_name(names: &[&str]) -> usize {
    let mut longest = 0;
    let mut index = 0;
    while index < names.len() {
        if names[index].len() > longest {
            longest = names[index].len();
        }
        index += 1;
    }
    longest
}

/// Defines a struct and generates its [`Described`], [`Serialize`] and
/// [`Deserialize`] implementations.
///
/// The JSON member name of each field is the field's identifier, compared
/// byte-for-byte and case-sensitively. Every field type must implement
/// `Default` (for [`Described::empty`]) plus `Serialize`/`Deserialize` for
/// the formats the struct is used with; nested described structs qualify
/// automatically. At most [`FieldSet::MAX_FIELDS`](crate::FieldSet::MAX_FIELDS)
/// fields are supported, checked at compile time.
///
/// ```
/// use nano_json::{Described, FixedBuffer, describe_struct};
///
/// describe_struct! {
///     #[derive(Debug, PartialEq)]
///     pub struct Person {
///         pub name: FixedBuffer<20>,
///         pub age: i32,
///     }
/// }
///
/// assert_eq!(Person::FIELDS, &["name", "age"]);
/// assert_eq!(Person::NAME_CAPACITY, 4);
/// assert_eq!(Person::empty().age, 0);
/// ```
///
/// [`Serialize`]: crate::Serialize
/// [`Deserialize`]: crate::Deserialize
#[macro_export]
macro_rules! describe_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$field_meta:meta])* $field_vis:vis $field:ident : $field_ty:ty ),+ $(,)?
        }
    ) => {
        #[derive(::core::default::Default)]
        $(#[$meta])*
        $vis struct $name {
            $( $(#[$field_meta])* $field_vis $field: $field_ty, )+
        }

        const _: () = {
            /// Discriminants double as field indices.
            #[repr(usize)]
            #[allow(non_camel_case_types, reason = "variants mirror the field names they index")]
            enum __Field {
                $( $field, )+
            }

            const _: () = assert!(
                <$name as $crate::Described>::FIELDS.len() <= $crate::FieldSet::MAX_FIELDS,
                "describe_struct! supports at most 64 fields",
            );

            impl $crate::Described for $name {
                const FIELDS: &'static [&'static str] = &[ $( stringify!($field) ),+ ];

                fn empty() -> Self {
                    Self {
                        $( $field: ::core::default::Default::default(), )+
                    }
                }
            }

            impl<S> $crate::Serialize<S> for $name
            where
                S: $crate::Serializer,
                $( $field_ty: $crate::Serialize<S>, )+
            {
                async fn serialize(
                    &self,
                    serializer: &mut S,
                ) -> ::core::result::Result<(), $crate::EncodeError> {
                    let mut scope = $crate::Serializer::struct_scope(serializer).await?;
                    $(
                        $crate::SerializeStruct::field(
                            &mut scope,
                            stringify!($field),
                            &self.$field,
                        )
                        .await?;
                    )+
                    $crate::SerializeStruct::end(scope).await
                }
            }

            struct __Visitor<'a> {
                value: &'a mut $name,
                seen: &'a mut $crate::FieldSet,
            }

            impl<'a, D> $crate::MemberVisitor<D> for __Visitor<'a>
            where
                D: $crate::Deserializer,
                $( $field_ty: $crate::Deserialize<D>, )+
            {
                async fn member(
                    &mut self,
                    name: &[u8],
                    deserializer: &mut D,
                ) -> ::core::result::Result<$crate::Member, $crate::DecodeError> {
                    $(
                        if name == stringify!($field).as_bytes() {
                            if !$crate::FieldSet::insert(self.seen, __Field::$field as usize) {
                                return ::core::result::Result::Err(
                                    $crate::DecodeError::DuplicateMember { name: stringify!($field) },
                                );
                            }
                            self.value.$field =
                                <$field_ty as $crate::Deserialize<D>>::deserialize(deserializer)
                                    .await?;
                            return ::core::result::Result::Ok($crate::Member::Known);
                        }
                    )+
                    ::core::result::Result::Ok($crate::Member::Unknown)
                }
            }

            impl<D> $crate::Deserialize<D> for $name
            where
                D: $crate::Deserializer,
                $( $field_ty: $crate::Deserialize<D>, )+
            {
                async fn deserialize(
                    deserializer: &mut D,
                ) -> ::core::result::Result<Self, $crate::DecodeError> {
                    let mut value = <$name as $crate::Described>::empty();
                    let mut seen = $crate::FieldSet::new();
                    let mut names =
                        $crate::FixedBuffer::<{ <$name as $crate::Described>::NAME_CAPACITY }>::new();
                    $crate::Deserializer::struct_scope(
                        deserializer,
                        &mut names,
                        __Visitor { value: &mut value, seen: &mut seen },
                    )
                    .await?;
                    match $crate::FieldSet::missing(&seen, <$name as $crate::Described>::FIELDS.len()) {
                        ::core::option::Option::Some(index) => ::core::result::Result::Err(
                            $crate::DecodeError::MissingMember {
                                name: <$name as $crate::Described>::FIELDS[index],
                            },
                        ),
                        ::core::option::Option::None => ::core::result::Result::Ok(value),
                    }
                }
            }
        };
    };
}
