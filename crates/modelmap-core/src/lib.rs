//! Modelmap Core - Bidirectional mapping between typed models and JSON trees
//!
//! This crate fills typed model structs from `serde_json::Value` trees and
//! flattens filled models back into equivalent trees, with a policy layer in
//! between: per-field key renaming, snake_case key translation, per-field or
//! per-type converters, nested models and nested-model lists, and
//! optionality-aware validation.
//!
//! # Main Components
//!
//! - **Field Registry**: Ordered field metadata and typed accessors per model type
//! - **Key Policy**: Tree key of each field, or hidden
//! - **Converters**: Author-supplied conversions selected by field name or type
//! - **Value Coercer**: Default conversions, date fallback chain, nested models
//! - **Mapper**: The fill and serialize passes
//! - **Error Handling**: Field-scoped errors using `thiserror` and `anyhow`
//!
//! # Example
//!
//! ```
//! use modelmap_core::{Model, ModelOptions, Required, Result, SchemaBuilder};
//! use serde_json::json;
//!
//! #[derive(Debug, Default, Clone)]
//! struct Student {
//!     id: Required<i64>,
//!     grade_average: Option<f64>,
//! }
//!
//! impl Model for Student {
//!     fn describe(schema: &mut SchemaBuilder<Self>) {
//!         schema
//!             .field("id", |m| &m.id, |m| &mut m.id)
//!             .field("gradeAverage", |m| &m.grade_average, |m| &mut m.grade_average);
//!     }
//!
//!     fn options(&self) -> ModelOptions {
//!         ModelOptions::new().snake_cased(true)
//!     }
//! }
//!
//! fn example() -> Result<()> {
//!     let student: Student = modelmap_core::from_json_str(r#"{"id": 1, "grade_average": 3.5}"#)?;
//!     assert_eq!(student.grade_average, Some(3.5));
//!     assert_eq!(modelmap_core::to_value(&student)?, json!({"id": 1, "grade_average": 3.5}));
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod coercer;
pub mod converter;
pub mod dates;
pub mod error;
pub mod keys;
pub mod mapper;
pub mod model;
pub mod native;
pub mod options;
pub mod registry;

// Re-export main types for convenience
pub use coercer::ValueCoercer;
pub use converter::{ConvertContext, Converter, ConverterKey};
pub use dates::DateZone;
pub use error::{CoerceError, Error, FieldError, Result};
pub use keys::KeyDecision;
pub use mapper::{Mapper, MapperConfig};
pub use model::{DynModel, Model};
pub use native::Native;
pub use options::{KeyMapEntry, ModelOptions};
pub use registry::{
    DateValue, FieldDescriptor, FieldValue, NestedType, Required, Scalar, ScalarValue, Schema,
    SchemaBuilder, TypeTag,
};

use serde_json::Value;
use std::sync::OnceLock;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Process-wide mapper with the default configuration
pub fn shared() -> &'static Mapper {
    static SHARED: OnceLock<Mapper> = OnceLock::new();
    SHARED.get_or_init(Mapper::new)
}

/// Construct a default `M` and fill it from `tree`
pub fn from_value<M: Model>(tree: &Value) -> Result<M> {
    let mut model = M::default();
    shared().fill(&mut model, tree)?;
    Ok(model)
}

/// Decode `json`, construct a default `M` and fill it
pub fn from_json_str<M: Model>(json: &str) -> Result<M> {
    let mut model = M::default();
    shared().fill_json(&mut model, json)?;
    Ok(model)
}

/// Flatten `model` into a JSON tree
pub fn to_value<M: Model>(model: &M) -> Result<Value> {
    shared().serialize(model)
}

/// Flatten `model` into JSON text
pub fn to_json_string<M: Model>(model: &M) -> Result<String> {
    shared().to_json_string(model)
}
