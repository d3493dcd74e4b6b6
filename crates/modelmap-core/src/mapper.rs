//! The mapper: fills models from JSON trees and flattens them back
//!
//! Every pass walks the model's schema in order. For each field the key
//! policy picks the tree key, a converter or the default coercer translates
//! the value, and the field slot stages the write. Field errors are collected
//! across the whole pass; writes are committed only when the pass produced no
//! error, so a failed fill leaves the model as it was.
//!
//! # Examples
//!
//! ```
//! use modelmap_core::{Mapper, Model, Required, SchemaBuilder};
//! use serde_json::json;
//!
//! #[derive(Debug, Default, Clone)]
//! struct User {
//!     id: Required<i64>,
//!     first_name: Option<String>,
//! }
//!
//! impl Model for User {
//!     fn describe(schema: &mut SchemaBuilder<Self>) {
//!         schema
//!             .field("id", |m| &m.id, |m| &mut m.id)
//!             .field("firstName", |m| &m.first_name, |m| &mut m.first_name);
//!     }
//! }
//!
//! let mapper = Mapper::new();
//! let mut user = User::default();
//! mapper.fill(&mut user, &json!({"id": 7, "firstName": "Ada"})).unwrap();
//! assert_eq!(user.id.get(), Some(&7));
//! assert_eq!(mapper.serialize(&user).unwrap(), json!({"id": 7, "firstName": "Ada"}));
//! ```
//!
//! Copyright (c) 2025 Modelmap Team
//! Licensed under the Apache-2.0 license

use crate::coercer::{value_kind, ValueCoercer};
use crate::converter::{self, ConvertContext};
use crate::dates::{default_time_only_date, DEFAULT_TIME_FORMAT};
use crate::error::{Error, FieldError, Result};
use crate::keys::{self, KeyDecision};
use crate::model::{short_type_name, Model};
use crate::options::ModelOptions;
use crate::registry::slot::Staged;
use crate::registry::Schema;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Mapper-wide settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Tried after a model's primary date format fails
    pub time_fallback_format: String,
    /// Date part given to values carrying only a time of day
    pub time_only_date: NaiveDate,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            time_fallback_format: DEFAULT_TIME_FORMAT.to_string(),
            time_only_date: default_time_only_date(),
        }
    }
}

type SchemaCache = HashMap<TypeId, Arc<dyn Any + Send + Sync>>;

/// Fills and serializes models
pub struct Mapper {
    config: MapperConfig,
    schemas: Mutex<SchemaCache>,
}

impl Mapper {
    pub fn new() -> Self {
        Self::with_config(MapperConfig::default())
    }

    pub fn with_config(config: MapperConfig) -> Self {
        Self {
            config,
            schemas: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Ordered schema of `M`, built once per mapper
    pub fn schema<M: Model>(&self) -> Arc<Schema<M>> {
        let type_id = TypeId::of::<M>();
        if let Some(cached) = self.lock_schemas().get(&type_id).cloned() {
            if let Ok(schema) = cached.downcast::<Schema<M>>() {
                return schema;
            }
        }

        let schema = Arc::new(Schema::<M>::build());
        self.lock_schemas()
            .insert(type_id, schema.clone() as Arc<dyn Any + Send + Sync>);
        schema
    }

    /// Fill `model` from a tree whose root must be an object
    pub fn fill<M: Model>(&self, model: &mut M, tree: &Value) -> Result<()> {
        match tree {
            Value::Object(map) => self.fill_map(model, map),
            other => Err(Error::InvalidRoot {
                found: value_kind(other),
            }),
        }
    }

    /// Fill `model` from a JSON object
    pub fn fill_map<M: Model>(&self, model: &mut M, map: &Map<String, Value>) -> Result<()> {
        self.fill_fields(model, map).map_err(|errors| Error::Mapping {
            model: short_type_name::<M>(),
            errors,
        })
    }

    /// Decode `json` and fill `model` from it
    pub fn fill_json<M: Model>(&self, model: &mut M, json: &str) -> Result<()> {
        let tree: Value = serde_json::from_str(json)?;
        self.fill(model, &tree)
    }

    /// Flatten `model` into a JSON object
    pub fn serialize<M: Model>(&self, model: &M) -> Result<Value> {
        self.serialize_fields(model)
            .map(Value::Object)
            .map_err(|errors| Error::Mapping {
                model: short_type_name::<M>(),
                errors,
            })
    }

    pub fn to_json_string<M: Model>(&self, model: &M) -> Result<String> {
        let tree = self.serialize(model)?;
        serde_json::to_string(&tree).map_err(encode_error)
    }

    pub fn to_json_string_pretty<M: Model>(&self, model: &M) -> Result<String> {
        let tree = self.serialize(model)?;
        serde_json::to_string_pretty(&tree).map_err(encode_error)
    }

    pub(crate) fn fill_fields<M: Model>(
        &self,
        model: &mut M,
        map: &Map<String, Value>,
    ) -> std::result::Result<(), Vec<FieldError>> {
        let schema = self.schema::<M>();
        let options = model.options();
        let coercer = ValueCoercer::new(self, &options);
        let context = self.convert_context(&options);

        let mut staged: Vec<Staged<M>> = Vec::with_capacity(schema.len());
        let mut errors = Vec::new();

        for entry in schema.entries() {
            let descriptor = &entry.descriptor;
            let name = descriptor.name.as_str();

            let key = match keys::resolve(name, &options) {
                KeyDecision::Hidden => {
                    log::trace!("skipping hidden field '{}'", name);
                    continue;
                }
                KeyDecision::Use(key) => key,
            };

            let value = match map.get(&key) {
                Some(value) => value,
                None => {
                    if !descriptor.is_optional && !entry.slot.has_value(model) {
                        errors.push(FieldError::MissingRequiredField {
                            field: name.to_string(),
                        });
                    }
                    continue;
                }
            };

            if value.is_null() && !descriptor.is_optional {
                errors.push(FieldError::NonOptionalNull {
                    field: name.to_string(),
                });
                continue;
            }

            let native = match converter::find(name, descriptor.declared_type, &options) {
                Some(converter) => converter
                    .to_model_in(value, &context)
                    .map_err(|e| vec![FieldError::conversion(name, format!("{:#}", e))]),
                None => coercer
                    .to_model(descriptor, value)
                    .map_err(|e| FieldError::from_coerce(name, e)),
            };

            match native.and_then(|native| {
                entry
                    .slot
                    .stage(native)
                    .map_err(|e| FieldError::from_coerce(name, e))
            }) {
                Ok(write) => staged.push(write),
                Err(field_errors) => errors.extend(field_errors),
            }
        }

        if !errors.is_empty() {
            log::debug!(
                "fill of {} rejected with {} field error(s)",
                short_type_name::<M>(),
                errors.len()
            );
            return Err(errors);
        }

        log::debug!(
            "filled {} field(s) of {}",
            staged.len(),
            short_type_name::<M>()
        );
        for write in staged {
            write(&mut *model);
        }
        Ok(())
    }

    pub(crate) fn serialize_fields<M: Model>(
        &self,
        model: &M,
    ) -> std::result::Result<Map<String, Value>, Vec<FieldError>> {
        let schema = self.schema::<M>();
        let options = model.options();
        let coercer = ValueCoercer::new(self, &options);
        let context = self.convert_context(&options);

        let mut tree = Map::new();
        let mut errors = Vec::new();

        for entry in schema.entries() {
            let descriptor = &entry.descriptor;
            let name = descriptor.name.as_str();

            let key = match keys::resolve(name, &options) {
                KeyDecision::Hidden => {
                    log::trace!("skipping hidden field '{}'", name);
                    continue;
                }
                KeyDecision::Use(key) => key,
            };

            let native = entry.slot.read(model);
            let value = match converter::find(name, descriptor.declared_type, &options) {
                Some(converter) => converter
                    .to_tree_in(&native, &context)
                    .map_err(|e| vec![FieldError::conversion(name, format!("{:#}", e))]),
                None => coercer
                    .to_tree(descriptor, native)
                    .map_err(|e| FieldError::from_coerce(name, e)),
            };

            match value {
                Ok(value) => {
                    tree.insert(key, value);
                }
                Err(field_errors) => errors.extend(field_errors),
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        log::debug!(
            "serialized {} key(s) from {}",
            tree.len(),
            short_type_name::<M>()
        );
        Ok(tree)
    }

    fn convert_context(&self, options: &ModelOptions) -> ConvertContext {
        ConvertContext {
            zone: options.time_zone,
            time_only_date: self.config.time_only_date,
        }
    }

    fn lock_schemas(&self) -> MutexGuard<'_, SchemaCache> {
        self.schemas.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Mapper {
    fn default() -> Self {
        Self::new()
    }
}

fn encode_error(err: serde_json::Error) -> Error {
    Error::Encode {
        message: err.to_string(),
        source: err,
    }
}
