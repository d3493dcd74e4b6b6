//! Built-in converters for common field representations
//!
//! This module provides pre-configured converters for dates stored in a
//! non-default format and booleans stored as words.
//!
//! Copyright (c) 2025 Modelmap Team
//! Licensed under the Apache-2.0 license

use super::{ConvertContext, Converter, ConverterKey};
use crate::dates::{self, DateZone};
use crate::native::Native;
use crate::registry::TypeTag;
use anyhow::{anyhow, bail};
use serde_json::Value;

/// Create a date converter using `format` in both directions
///
/// Strings are read and written in the model's zone. A time-only format such
/// as `%H:%M` resolves on the mapper's time-only date. Null passes through so
/// the converter also serves optional fields.
pub fn date(key: impl Into<ConverterKey>, format: impl Into<String>) -> Converter {
    date_converter(key.into(), format.into(), None)
}

/// Like [`date`], but always in `zone` whatever the model's zone is
pub fn date_in_zone(key: impl Into<ConverterKey>, format: impl Into<String>, zone: DateZone) -> Converter {
    date_converter(key.into(), format.into(), Some(zone))
}

fn date_converter(key: ConverterKey, format: String, zone: Option<DateZone>) -> Converter {
    let read_format = format.clone();
    let zone_of = move |context: &ConvertContext| zone.unwrap_or(context.zone);

    Converter::with_context(
        key,
        move |value: &Value, context: &ConvertContext| match value {
            Value::Null => Ok(Native::Null),
            Value::String(raw) => dates::parse(raw, &read_format, context.time_only_date, zone_of(context))
                .map(Native::Date)
                .ok_or_else(|| anyhow!("'{}' does not match date format '{}'", raw, read_format)),
            other => bail!("expected a date string, found {}", crate::coercer::value_kind(other)),
        },
        move |native: &Native, context: &ConvertContext| match native {
            Native::Null => Ok(Value::Null),
            Native::Date(date) => dates::format(date, &format, zone_of(context))
                .map(Value::String)
                .ok_or_else(|| anyhow!("cannot render a date with format '{}'", format)),
            Native::RawDate(raw) => Ok(Value::String(raw.clone())),
            other => bail!("expected a date, found {}", other.kind()),
        },
    )
}

/// Create a date converter for one field
pub fn date_for_field(field: impl Into<String>, format: impl Into<String>) -> Converter {
    date(ConverterKey::Field(field.into()), format)
}

/// Create a date converter for every field of a declared type
pub fn date_for_type(tag: TypeTag, format: impl Into<String>) -> Converter {
    date(ConverterKey::Type(tag), format)
}

/// Create a boolean converter storing `when_true` / `when_false` words
///
/// Words are matched case-insensitively; a JSON boolean is also accepted.
pub fn bool_strings(
    field: impl Into<String>,
    when_true: impl Into<String>,
    when_false: impl Into<String>,
) -> Converter {
    bool_words(field.into(), when_true.into(), when_false.into(), false)
}

/// Like [`bool_strings`], but words must match exactly
pub fn bool_strings_exact(
    field: impl Into<String>,
    when_true: impl Into<String>,
    when_false: impl Into<String>,
) -> Converter {
    bool_words(field.into(), when_true.into(), when_false.into(), true)
}

fn bool_words(field: String, when_true: String, when_false: String, case_sensitive: bool) -> Converter {
    let words = (when_true.clone(), when_false.clone());
    let matches = move |given: &str, word: &str| {
        if case_sensitive {
            given == word
        } else {
            given.eq_ignore_ascii_case(word)
        }
    };

    Converter::for_field(
        field,
        move |value: &Value| match value {
            Value::Null => Ok(Native::Null),
            Value::Bool(flag) => Ok(Native::Bool(*flag)),
            Value::String(word) if matches(word.as_str(), &words.0) => Ok(Native::Bool(true)),
            Value::String(word) if matches(word.as_str(), &words.1) => Ok(Native::Bool(false)),
            Value::String(word) => bail!(
                "'{}' is neither '{}' nor '{}'",
                word,
                words.0,
                words.1
            ),
            other => bail!("expected a string, found {}", crate::coercer::value_kind(other)),
        },
        move |native: &Native| match native {
            Native::Null => Ok(Value::Null),
            Native::Bool(true) => Ok(Value::String(when_true.clone())),
            Native::Bool(false) => Ok(Value::String(when_false.clone())),
            other => bail!("expected a bool, found {}", other.kind()),
        },
    )
}
