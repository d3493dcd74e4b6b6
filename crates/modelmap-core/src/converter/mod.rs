//! Converters: author-supplied overrides of the default coercion
//!
//! A converter is a pair of functions, `to_model` (tree to native) and
//! `to_tree` (native to tree), selected either by an exact field name or by a
//! declared type. The mapper never looks inside a converter; it only matches
//! its selector and hands it the [`ConvertContext`] of the pass.
//!
//! # Examples
//!
//! ## Field converter
//!
//! ```
//! use modelmap_core::{Converter, Native};
//! use serde_json::{json, Value};
//!
//! let upper = Converter::for_field(
//!     "code",
//!     |value: &Value| Ok(Native::Text(value.as_str().unwrap_or_default().to_uppercase())),
//!     |native: &Native| Ok(json!(native.as_str().unwrap_or_default().to_lowercase())),
//! );
//! assert_eq!(upper.to_tree(&Native::from("ABC")).unwrap(), json!("abc"));
//! ```
//!
//! ## Built-in converters
//!
//! ```
//! use modelmap_core::converter::built_in;
//! use modelmap_core::TypeTag;
//!
//! let time = built_in::date_for_field("time", "%H:%M");
//! let dates = built_in::date_for_type(TypeTag::Date, "%m/%d/%y");
//! let valid = built_in::bool_strings("isValid", "Yes", "No");
//! ```
//!
//! Copyright (c) 2025 Modelmap Team
//! Licensed under the Apache-2.0 license

pub mod built_in;

use crate::dates::{default_time_only_date, DateZone};
use crate::native::Native;
use crate::options::ModelOptions;
use crate::registry::TypeTag;
use chrono::NaiveDate;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Tree-to-native half of a converter
pub type ToModelFn = dyn Fn(&Value, &ConvertContext) -> anyhow::Result<Native> + Send + Sync;

/// Native-to-tree half of a converter
pub type ToTreeFn = dyn Fn(&Native, &ConvertContext) -> anyhow::Result<Value> + Send + Sync;

/// Settings of the pass a converter runs in
///
/// The mapper builds one per model from its [`crate::MapperConfig`] and the
/// model's [`ModelOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertContext {
    /// The model's date zone
    pub zone: DateZone,
    /// Date part given to time-only values
    pub time_only_date: NaiveDate,
}

impl Default for ConvertContext {
    fn default() -> Self {
        Self {
            zone: DateZone::Utc,
            time_only_date: default_time_only_date(),
        }
    }
}

/// What a converter applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConverterKey {
    /// Exactly one field, by registered name
    Field(String),
    /// Every field with this declared type
    Type(TypeTag),
}

impl From<&str> for ConverterKey {
    fn from(field: &str) -> Self {
        ConverterKey::Field(field.to_string())
    }
}

impl From<TypeTag> for ConverterKey {
    fn from(tag: TypeTag) -> Self {
        ConverterKey::Type(tag)
    }
}

/// A pair of conversion functions with a selector
#[derive(Clone)]
pub struct Converter {
    key: ConverterKey,
    to_model: Arc<ToModelFn>,
    to_tree: Arc<ToTreeFn>,
}

impl Converter {
    pub fn new<F, G>(key: impl Into<ConverterKey>, to_model: F, to_tree: G) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<Native> + Send + Sync + 'static,
        G: Fn(&Native) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self::with_context(
            key,
            move |value: &Value, _: &ConvertContext| to_model(value),
            move |native: &Native, _: &ConvertContext| to_tree(native),
        )
    }

    /// Converter whose functions also see the pass settings
    pub fn with_context<F, G>(key: impl Into<ConverterKey>, to_model: F, to_tree: G) -> Self
    where
        F: Fn(&Value, &ConvertContext) -> anyhow::Result<Native> + Send + Sync + 'static,
        G: Fn(&Native, &ConvertContext) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self {
            key: key.into(),
            to_model: Arc::new(to_model),
            to_tree: Arc::new(to_tree),
        }
    }

    /// Converter for one field
    pub fn for_field<F, G>(field: impl Into<String>, to_model: F, to_tree: G) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<Native> + Send + Sync + 'static,
        G: Fn(&Native) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self::new(ConverterKey::Field(field.into()), to_model, to_tree)
    }

    /// Converter for every field of a declared type
    pub fn for_type<F, G>(tag: TypeTag, to_model: F, to_tree: G) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<Native> + Send + Sync + 'static,
        G: Fn(&Native) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self::new(ConverterKey::Type(tag), to_model, to_tree)
    }

    pub fn key(&self) -> &ConverterKey {
        &self.key
    }

    /// Tree to native with the default context
    pub fn to_model(&self, value: &Value) -> anyhow::Result<Native> {
        self.to_model_in(value, &ConvertContext::default())
    }

    /// Native to tree with the default context
    pub fn to_tree(&self, native: &Native) -> anyhow::Result<Value> {
        self.to_tree_in(native, &ConvertContext::default())
    }

    pub fn to_model_in(&self, value: &Value, context: &ConvertContext) -> anyhow::Result<Native> {
        (self.to_model)(value, context)
    }

    pub fn to_tree_in(&self, native: &Native, context: &ConvertContext) -> anyhow::Result<Value> {
        (self.to_tree)(native, context)
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter").field("key", &self.key).finish_non_exhaustive()
    }
}

/// Find the converter for a field
///
/// A converter selected by the exact field name wins over one selected by the
/// declared type.
pub fn find<'a>(field: &str, tag: TypeTag, options: &'a ModelOptions) -> Option<&'a Converter> {
    options
        .converters
        .iter()
        .find(|converter| matches!(converter.key(), ConverterKey::Field(name) if name == field))
        .or_else(|| {
            options
                .converters
                .iter()
                .find(|converter| matches!(converter.key(), ConverterKey::Type(t) if *t == tag))
        })
}
