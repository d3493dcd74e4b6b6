//! Field registry: what fields a model has and how to reach them
//!
//! Models describe themselves once through [`crate::Model::describe`]; the
//! resulting [`Schema`] lists every field, inherited ones included, in a
//! stable order, each with a [`FieldDescriptor`] and a typed accessor.
//!
//! - [`descriptor`] - Field metadata and type tags
//! - [`value`] - Field types and their native conversions
//! - [`required`] - Non-optional fields that start out unset
//! - [`schema`] - The registration builder and the ordered schema
//!
//! Copyright (c) 2025 Modelmap Team
//! Licensed under the Apache-2.0 license

pub mod descriptor;
pub mod required;
pub mod schema;
pub(crate) mod slot;
pub mod value;

pub use descriptor::{FieldDescriptor, NestedType, Scalar, TypeTag};
pub use required::Required;
pub use schema::{Schema, SchemaBuilder};
pub use value::{DateValue, FieldValue, ScalarValue};
