//! Default translation between tree values and native values
//!
//! The coercer runs for every field without a converter. It checks the tree
//! value against the field's declared type, parses dates through the format
//! fallback chain, and fills nested models recursively through the mapper.

use crate::dates;
use crate::error::{CoerceError, FieldError};
use crate::mapper::Mapper;
use crate::native::Native;
use crate::options::ModelOptions;
use crate::registry::{FieldDescriptor, NestedType, Scalar, TypeTag};
use serde_json::{Map, Number, Value};

/// Short name of a tree value's shape, used in error messages
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Default coercion for the fields of one model
pub struct ValueCoercer<'a> {
    mapper: &'a Mapper,
    options: &'a ModelOptions,
}

impl<'a> ValueCoercer<'a> {
    pub fn new(mapper: &'a Mapper, options: &'a ModelOptions) -> Self {
        Self { mapper, options }
    }

    /// Translate a tree value into the native value of `descriptor`'s field
    pub fn to_model(&self, descriptor: &FieldDescriptor, value: &Value) -> Result<Native, CoerceError> {
        if value.is_null() {
            return if descriptor.is_optional {
                Ok(Native::Null)
            } else {
                Err(CoerceError::UnexpectedNull)
            };
        }

        match descriptor.declared_type {
            TypeTag::Bool => self.scalar(Scalar::Bool, value),
            TypeTag::Int => self.scalar(Scalar::Int, value),
            TypeTag::Float => self.scalar(Scalar::Float, value),
            TypeTag::Text => self.scalar(Scalar::Text, value),
            TypeTag::Date => self.scalar(Scalar::Date, value),
            TypeTag::List(scalar) => self.list(scalar, value),
            TypeTag::Model(type_name) => {
                let nested = resolve_nested(descriptor.nested, type_name)?;
                match value {
                    Value::Object(map) => self.fill_nested(nested, map),
                    other => Err(CoerceError::mismatch(descriptor.declared_type, value_kind(other))),
                }
            }
            TypeTag::ModelList(type_name) => {
                let nested = resolve_nested(descriptor.nested, type_name)?;
                match value {
                    Value::Array(items) => self.fill_nested_list(nested, items),
                    other => Err(CoerceError::mismatch(descriptor.declared_type, value_kind(other))),
                }
            }
            TypeTag::Custom(type_name) => Err(CoerceError::NoConverter { type_name }),
        }
    }

    /// Translate the native value of `descriptor`'s field into a tree value
    pub fn to_tree(&self, descriptor: &FieldDescriptor, native: Native) -> Result<Value, CoerceError> {
        match native {
            Native::Null => Ok(Value::Null),
            Native::Bool(flag) => Ok(Value::Bool(flag)),
            Native::Int(number) => Ok(Value::Number(number.into())),
            Native::Float(number) => match Number::from_f64(number) {
                Some(number) => Ok(Value::Number(number)),
                None => {
                    log::warn!(
                        "field '{}' holds {}, which has no JSON form, writing null",
                        descriptor.name,
                        number
                    );
                    Ok(Value::Null)
                }
            },
            Native::Text(text) => Ok(Value::String(text)),
            Native::Date(date) => dates::format(&date, &self.options.date_format, self.options.time_zone)
                .map(Value::String)
                .ok_or_else(|| CoerceError::InvalidDateFormat {
                    format: self.options.date_format.clone(),
                }),
            Native::RawDate(raw) => Ok(Value::String(raw)),
            Native::List(items) => items
                .into_iter()
                .map(|item| self.to_tree(descriptor, item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Native::Model(model) => model
                .serialize_map(self.mapper)
                .map(Value::Object)
                .map_err(CoerceError::Nested),
            Native::Models(models) => {
                let mut items = Vec::with_capacity(models.len());
                let mut errors = Vec::new();
                for (index, model) in models.iter().enumerate() {
                    match model.serialize_map(self.mapper) {
                        Ok(map) => items.push(Value::Object(map)),
                        Err(nested) => errors.extend(scope_index(index, nested)),
                    }
                }
                if errors.is_empty() {
                    Ok(Value::Array(items))
                } else {
                    Err(CoerceError::Nested(errors))
                }
            }
            Native::Custom(_) => {
                log::warn!(
                    "no converter for field '{}' of {}, writing null",
                    descriptor.name,
                    descriptor.declared_type
                );
                Ok(Value::Null)
            }
        }
    }

    fn scalar(&self, scalar: Scalar, value: &Value) -> Result<Native, CoerceError> {
        match (scalar, value) {
            (Scalar::Bool, Value::Bool(flag)) => Ok(Native::Bool(*flag)),
            (Scalar::Int, Value::Number(number)) => {
                if let Some(int) = number.as_i64() {
                    Ok(Native::Int(int))
                } else if number.is_u64() {
                    Err(CoerceError::OutOfRange {
                        value: number.to_string(),
                        target: "i64",
                    })
                } else {
                    Err(CoerceError::mismatch(scalar, "fractional number"))
                }
            }
            (Scalar::Float, Value::Number(number)) => number
                .as_f64()
                .map(Native::Float)
                .ok_or_else(|| CoerceError::mismatch(scalar, "number")),
            (Scalar::Text, Value::String(text)) => Ok(Native::Text(text.clone())),
            (Scalar::Date, Value::String(raw)) => Ok(self.parse_date(raw)),
            (_, other) => Err(CoerceError::mismatch(scalar, value_kind(other))),
        }
    }

    fn list(&self, scalar: Scalar, value: &Value) -> Result<Native, CoerceError> {
        let items = match value {
            Value::Array(items) => items,
            other => return Err(CoerceError::mismatch(TypeTag::List(scalar), value_kind(other))),
        };

        let mut natives = Vec::with_capacity(items.len());
        let mut errors = Vec::new();
        for (index, item) in items.iter().enumerate() {
            match self.scalar(scalar, item) {
                Ok(native) => natives.push(native),
                Err(err) => errors.extend(FieldError::from_coerce(&format!("[{}]", index), err)),
            }
        }
        if errors.is_empty() {
            Ok(Native::List(natives))
        } else {
            Err(CoerceError::Nested(errors))
        }
    }

    /// Primary format, then the time-of-day fallback, then the raw string
    fn parse_date(&self, raw: &str) -> Native {
        let config = self.mapper.config();
        let zone = self.options.time_zone;
        let parsed = dates::parse(raw, &self.options.date_format, config.time_only_date, zone)
            .or_else(|| dates::parse(raw, &config.time_fallback_format, config.time_only_date, zone));

        match parsed {
            Some(date) => Native::Date(date),
            None => {
                log::warn!(
                    "'{}' matches neither '{}' nor '{}', keeping the raw string",
                    raw,
                    self.options.date_format,
                    config.time_fallback_format
                );
                Native::RawDate(raw.to_string())
            }
        }
    }

    fn fill_nested(&self, nested: NestedType, map: &Map<String, Value>) -> Result<Native, CoerceError> {
        let mut instance = nested.construct();
        instance
            .fill_map(self.mapper, map)
            .map_err(CoerceError::Nested)?;
        Ok(Native::Model(instance))
    }

    fn fill_nested_list(&self, nested: NestedType, items: &[Value]) -> Result<Native, CoerceError> {
        let mut models = Vec::with_capacity(items.len());
        let mut errors = Vec::new();
        for (index, item) in items.iter().enumerate() {
            let result = match item {
                Value::Object(map) => self.fill_nested(nested, map),
                other => Err(CoerceError::mismatch(
                    TypeTag::Model(nested.type_name()),
                    value_kind(other),
                )),
            };
            match result {
                Ok(Native::Model(model)) => models.push(model),
                Ok(_) => {}
                Err(err) => errors.extend(FieldError::from_coerce(&format!("[{}]", index), err)),
            }
        }
        if errors.is_empty() {
            Ok(Native::Models(models))
        } else {
            Err(CoerceError::Nested(errors))
        }
    }
}

fn resolve_nested(nested: Option<NestedType>, type_name: &'static str) -> Result<NestedType, CoerceError> {
    nested.ok_or(CoerceError::UnresolvedNestedType { type_name })
}

fn scope_index(index: usize, errors: Vec<FieldError>) -> Vec<FieldError> {
    let prefix = format!("[{}]", index);
    errors.into_iter().map(|e| e.scoped(&prefix)).collect()
}
