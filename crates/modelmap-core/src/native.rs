//! Native values exchanged between converters, the coercer and field slots
//!
//! A [`Native`] is the model-side counterpart of a `serde_json::Value`: it is
//! what a converter's `to_model` produces and what its `to_tree` receives.
//! Field slots turn it into the concrete Rust type of the field.

use crate::model::DynModel;
use chrono::NaiveDateTime;
use std::any::Any;
use std::fmt;

/// A model-side value
pub enum Native {
    /// Absent value of an optional field
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// A UTC instant
    Date(NaiveDateTime),
    /// A date string that matched no accepted format, kept verbatim
    RawDate(String),
    /// Sequence of primitive values
    List(Vec<Native>),
    /// A filled nested model
    Model(Box<dyn DynModel>),
    /// A sequence of filled nested models, in input order
    Models(Vec<Box<dyn DynModel>>),
    /// An author-defined value only converters know how to build
    Custom(Box<dyn Any>),
}

impl Native {
    /// Wrap an author-defined value
    pub fn custom<T: Any>(value: T) -> Self {
        Native::Custom(Box::new(value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Native::Null)
    }

    /// Short name of the variant, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Native::Null => "null",
            Native::Bool(_) => "bool",
            Native::Int(_) => "integer",
            Native::Float(_) => "float",
            Native::Text(_) => "string",
            Native::Date(_) => "date",
            Native::RawDate(_) => "unparsed date",
            Native::List(_) => "list",
            Native::Model(_) => "model",
            Native::Models(_) => "model list",
            Native::Custom(_) => "custom value",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Native::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Native::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Floats and integers both read as `f64`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Native::Float(f) => Some(*f),
            Native::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Native::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&NaiveDateTime> {
        match self {
            Native::Date(d) => Some(d),
            _ => None,
        }
    }

    /// Borrow an author-defined value of type `T`
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Native::Custom(value) => value.downcast_ref(),
            _ => None,
        }
    }
}

impl fmt::Debug for Native {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Native::Null => write!(f, "Null"),
            Native::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Native::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Native::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Native::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Native::Date(d) => f.debug_tuple("Date").field(d).finish(),
            Native::RawDate(s) => f.debug_tuple("RawDate").field(s).finish(),
            Native::List(items) => f.debug_tuple("List").field(items).finish(),
            Native::Model(model) => write!(f, "Model({})", model.type_name()),
            Native::Models(models) => write!(f, "Models({} item(s))", models.len()),
            Native::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl From<bool> for Native {
    fn from(value: bool) -> Self {
        Native::Bool(value)
    }
}

impl From<i64> for Native {
    fn from(value: i64) -> Self {
        Native::Int(value)
    }
}

impl From<f64> for Native {
    fn from(value: f64) -> Self {
        Native::Float(value)
    }
}

impl From<String> for Native {
    fn from(value: String) -> Self {
        Native::Text(value)
    }
}

impl From<&str> for Native {
    fn from(value: &str) -> Self {
        Native::Text(value.to_string())
    }
}

impl From<NaiveDateTime> for Native {
    fn from(value: NaiveDateTime) -> Self {
        Native::Date(value)
    }
}
