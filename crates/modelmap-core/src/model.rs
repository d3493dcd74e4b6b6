//! The model abstraction
//!
//! A model is a plain Rust struct that registers its fields once through
//! [`Model::describe`]. Registration replaces runtime reflection: each entry is
//! a name plus a typed accessor pair, which is everything the mapper needs to
//! read and write the field.

use crate::error::FieldError;
use crate::mapper::Mapper;
use crate::options::ModelOptions;
use crate::registry::SchemaBuilder;
use serde_json::{Map, Value};
use std::any::Any;

/// A typed record mapped to and from a JSON object
///
/// Declare a field `Required<T>` when its key must be present on the first
/// fill. Plain `T` fields are never reported missing; an absent key keeps
/// their default.
///
/// # Example
///
/// ```
/// use modelmap_core::{Model, SchemaBuilder};
///
/// #[derive(Debug, Default, Clone)]
/// struct Address {
///     city: Option<String>,
/// }
///
/// impl Model for Address {
///     fn describe(schema: &mut SchemaBuilder<Self>) {
///         schema.field("city", |m| &m.city, |m| &mut m.city);
///     }
/// }
/// ```
pub trait Model: Default + 'static {
    /// Register the fields of this model, in declaration order
    fn describe(schema: &mut SchemaBuilder<Self>);

    /// Mapping options of this instance
    ///
    /// Options are read once per fill or serialize pass.
    fn options(&self) -> ModelOptions {
        ModelOptions::default()
    }
}

/// Object-safe view of a model, used for nested values
pub trait DynModel: Any {
    /// Short type name of the model
    fn type_name(&self) -> &'static str;

    /// Fill this instance from a JSON object
    fn fill_map(&mut self, mapper: &Mapper, map: &Map<String, Value>) -> Result<(), Vec<FieldError>>;

    /// Flatten this instance into a JSON object
    fn serialize_map(&self, mapper: &Mapper) -> Result<Map<String, Value>, Vec<FieldError>>;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<M: Model> DynModel for M {
    fn type_name(&self) -> &'static str {
        short_type_name::<M>()
    }

    fn fill_map(&mut self, mapper: &Mapper, map: &Map<String, Value>) -> Result<(), Vec<FieldError>> {
        mapper.fill_fields(self, map)
    }

    fn serialize_map(&self, mapper: &Mapper) -> Result<Map<String, Value>, Vec<FieldError>> {
        mapper.serialize_fields(self)
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Type name without its module path
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
