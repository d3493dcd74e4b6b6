//! Field metadata
//!
//! Copyright (c) 2025 Modelmap Team
//! Licensed under the Apache-2.0 license

use crate::model::{short_type_name, DynModel, Model};
use std::fmt;

/// Primitive kinds, used as elements of primitive sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scalar {
    Bool,
    Int,
    Float,
    Text,
    Date,
}

/// Semantic tag of a field's declared type
///
/// Optionality is not part of the tag, so `Option<T>` and `T` share one tag
/// and a type converter registered for it serves both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Bool,
    Int,
    Float,
    Text,
    Date,
    /// Sequence of primitives
    List(Scalar),
    /// Nested model, by type name
    Model(&'static str),
    /// Sequence of nested models, by element type name
    ModelList(&'static str),
    /// Author-defined type, only mappable through a converter
    Custom(&'static str),
}

impl From<Scalar> for TypeTag {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Bool => TypeTag::Bool,
            Scalar::Int => TypeTag::Int,
            Scalar::Float => TypeTag::Float,
            Scalar::Text => TypeTag::Text,
            Scalar::Date => TypeTag::Date,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool => write!(f, "bool"),
            Scalar::Int => write!(f, "integer"),
            Scalar::Float => write!(f, "number"),
            Scalar::Text => write!(f, "string"),
            Scalar::Date => write!(f, "date"),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Bool => write!(f, "bool"),
            TypeTag::Int => write!(f, "integer"),
            TypeTag::Float => write!(f, "number"),
            TypeTag::Text => write!(f, "string"),
            TypeTag::Date => write!(f, "date"),
            TypeTag::List(scalar) => write!(f, "list of {}", scalar),
            TypeTag::Model(name) => write!(f, "model {}", name),
            TypeTag::ModelList(name) => write!(f, "list of model {}", name),
            TypeTag::Custom(name) => write!(f, "custom type {}", name),
        }
    }
}

/// Handle able to construct a default instance of a nested model
#[derive(Clone, Copy)]
pub struct NestedType {
    type_name: &'static str,
    construct: fn() -> Box<dyn DynModel>,
}

impl NestedType {
    pub fn of<N: Model>() -> Self {
        Self {
            type_name: short_type_name::<N>(),
            construct: construct_default::<N>,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Fresh default instance
    pub fn construct(&self) -> Box<dyn DynModel> {
        (self.construct)()
    }
}

fn construct_default<N: Model>() -> Box<dyn DynModel> {
    Box::new(N::default())
}

impl fmt::Debug for NestedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NestedType").field(&self.type_name).finish()
    }
}

/// Metadata about one model field
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Field name as registered, the input of the key policy
    pub name: String,
    pub declared_type: TypeTag,
    pub is_optional: bool,
    /// 0 for fields of the concrete type, n for fields inherited n levels up
    pub owner_depth: usize,
    /// Constructor for nested model fields
    pub nested: Option<NestedType>,
}

impl FieldDescriptor {
    pub(crate) fn new(name: impl Into<String>, declared_type: TypeTag, is_optional: bool) -> Self {
        Self {
            name: name.into(),
            declared_type,
            is_optional,
            owner_depth: 0,
            nested: None,
        }
    }

    pub(crate) fn with_nested(mut self, nested: NestedType) -> Self {
        self.nested = Some(nested);
        self
    }

    pub fn is_inherited(&self) -> bool {
        self.owner_depth > 0
    }
}
