//! Conversions between field types and native values
//!
//! [`FieldValue`] is implemented for the primitive Rust types a model field
//! may have, for `Option<T>`, [`Required<T>`], primitive `Vec<T>`, and
//! [`DateValue`]. Nested models and author-defined types are registered with
//! their own builder methods instead.
//!
//! Copyright (c) 2025 Modelmap Team
//! Licensed under the Apache-2.0 license

use super::descriptor::{Scalar, TypeTag};
use super::required::Required;
use crate::error::CoerceError;
use crate::native::Native;
use chrono::NaiveDateTime;

/// A Rust type usable as a model field
pub trait FieldValue: Sized + 'static {
    fn type_tag() -> TypeTag;

    /// Whether null and absence are acceptable for this type
    fn is_optional() -> bool {
        false
    }

    /// Whether the field currently holds a value
    fn has_value(&self) -> bool {
        true
    }

    fn to_native(&self) -> Native;

    fn from_native(native: Native) -> Result<Self, CoerceError>;
}

/// A primitive field type that can also be a sequence element
pub trait ScalarValue: FieldValue {
    const SCALAR: Scalar;
}

/// A date that may have been kept as its raw string
///
/// A `NaiveDateTime` field rejects a date string matching no accepted format;
/// a `DateValue` field keeps the string so that nothing is lost on a round
/// trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DateValue {
    Parsed(NaiveDateTime),
    Raw(String),
}

impl DateValue {
    pub fn parsed(&self) -> Option<&NaiveDateTime> {
        match self {
            DateValue::Parsed(date) => Some(date),
            DateValue::Raw(_) => None,
        }
    }
}

impl Default for DateValue {
    fn default() -> Self {
        DateValue::Raw(String::new())
    }
}

impl From<NaiveDateTime> for DateValue {
    fn from(date: NaiveDateTime) -> Self {
        DateValue::Parsed(date)
    }
}

impl FieldValue for bool {
    fn type_tag() -> TypeTag {
        TypeTag::Bool
    }

    fn to_native(&self) -> Native {
        Native::Bool(*self)
    }

    fn from_native(native: Native) -> Result<Self, CoerceError> {
        native
            .as_bool()
            .ok_or_else(|| CoerceError::mismatch(Scalar::Bool, native.kind()))
    }
}

impl ScalarValue for bool {
    const SCALAR: Scalar = Scalar::Bool;
}

macro_rules! impl_integer_field {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                fn type_tag() -> TypeTag {
                    TypeTag::Int
                }

                fn to_native(&self) -> Native {
                    Native::Int(i64::from(*self))
                }

                fn from_native(native: Native) -> Result<Self, CoerceError> {
                    let value = native
                        .as_i64()
                        .ok_or_else(|| CoerceError::mismatch(Scalar::Int, native.kind()))?;
                    <$ty>::try_from(value).map_err(|_| CoerceError::OutOfRange {
                        value: value.to_string(),
                        target: stringify!($ty),
                    })
                }
            }

            impl ScalarValue for $ty {
                const SCALAR: Scalar = Scalar::Int;
            }
        )*
    };
}

impl_integer_field!(i8, i16, i32, i64, u8, u16, u32);

impl FieldValue for f64 {
    fn type_tag() -> TypeTag {
        TypeTag::Float
    }

    fn to_native(&self) -> Native {
        Native::Float(*self)
    }

    fn from_native(native: Native) -> Result<Self, CoerceError> {
        native
            .as_f64()
            .ok_or_else(|| CoerceError::mismatch(Scalar::Float, native.kind()))
    }
}

impl ScalarValue for f64 {
    const SCALAR: Scalar = Scalar::Float;
}

impl FieldValue for f32 {
    fn type_tag() -> TypeTag {
        TypeTag::Float
    }

    fn to_native(&self) -> Native {
        Native::Float(f64::from(*self))
    }

    fn from_native(native: Native) -> Result<Self, CoerceError> {
        native
            .as_f64()
            .map(|value| value as f32)
            .ok_or_else(|| CoerceError::mismatch(Scalar::Float, native.kind()))
    }
}

impl ScalarValue for f32 {
    const SCALAR: Scalar = Scalar::Float;
}

impl FieldValue for String {
    fn type_tag() -> TypeTag {
        TypeTag::Text
    }

    fn to_native(&self) -> Native {
        Native::Text(self.clone())
    }

    fn from_native(native: Native) -> Result<Self, CoerceError> {
        match native {
            Native::Text(text) => Ok(text),
            other => Err(CoerceError::mismatch(Scalar::Text, other.kind())),
        }
    }
}

impl ScalarValue for String {
    const SCALAR: Scalar = Scalar::Text;
}

impl FieldValue for NaiveDateTime {
    fn type_tag() -> TypeTag {
        TypeTag::Date
    }

    fn to_native(&self) -> Native {
        Native::Date(*self)
    }

    fn from_native(native: Native) -> Result<Self, CoerceError> {
        match native {
            Native::Date(date) => Ok(date),
            Native::RawDate(raw) => Err(CoerceError::UnparsedDate { raw }),
            other => Err(CoerceError::mismatch(Scalar::Date, other.kind())),
        }
    }
}

impl ScalarValue for NaiveDateTime {
    const SCALAR: Scalar = Scalar::Date;
}

impl FieldValue for DateValue {
    fn type_tag() -> TypeTag {
        TypeTag::Date
    }

    fn to_native(&self) -> Native {
        match self {
            DateValue::Parsed(date) => Native::Date(*date),
            DateValue::Raw(raw) => Native::RawDate(raw.clone()),
        }
    }

    fn from_native(native: Native) -> Result<Self, CoerceError> {
        match native {
            Native::Date(date) => Ok(DateValue::Parsed(date)),
            Native::RawDate(raw) => Ok(DateValue::Raw(raw)),
            other => Err(CoerceError::mismatch(Scalar::Date, other.kind())),
        }
    }
}

impl ScalarValue for DateValue {
    const SCALAR: Scalar = Scalar::Date;
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn type_tag() -> TypeTag {
        T::type_tag()
    }

    fn is_optional() -> bool {
        true
    }

    fn has_value(&self) -> bool {
        self.is_some()
    }

    fn to_native(&self) -> Native {
        match self {
            Some(value) => value.to_native(),
            None => Native::Null,
        }
    }

    fn from_native(native: Native) -> Result<Self, CoerceError> {
        match native {
            Native::Null => Ok(None),
            other => T::from_native(other).map(Some),
        }
    }
}

impl<T: FieldValue> FieldValue for Required<T> {
    fn type_tag() -> TypeTag {
        T::type_tag()
    }

    fn has_value(&self) -> bool {
        self.is_set()
    }

    fn to_native(&self) -> Native {
        match self.get() {
            Some(value) => value.to_native(),
            None => Native::Null,
        }
    }

    fn from_native(native: Native) -> Result<Self, CoerceError> {
        match native {
            Native::Null => Err(CoerceError::UnexpectedNull),
            other => T::from_native(other).map(Required::new),
        }
    }
}

impl<T: ScalarValue> FieldValue for Vec<T> {
    fn type_tag() -> TypeTag {
        TypeTag::List(T::SCALAR)
    }

    fn to_native(&self) -> Native {
        Native::List(self.iter().map(FieldValue::to_native).collect())
    }

    fn from_native(native: Native) -> Result<Self, CoerceError> {
        match native {
            Native::List(items) => items.into_iter().map(T::from_native).collect(),
            other => Err(CoerceError::mismatch(Self::type_tag(), other.kind())),
        }
    }
}
