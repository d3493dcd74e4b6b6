//! Error types for the Modelmap core library
//!
//! This module defines the error handling system for Modelmap, using thiserror
//! for the library's own errors and anyhow at the converter boundary, where
//! model authors supply their own fallible functions.
//!
//! Errors come in two layers:
//! - [`FieldError`]: one offending field of a model, always carrying its path
//! - [`Error`]: the crate-level error returned by the public entry points
//!
//! [`CoerceError`] is the detail produced by field slots and the default
//! coercer; the mapper turns it into field errors.

use thiserror::Error;

/// Main error type for Modelmap operations
#[derive(Error, Debug)]
pub enum Error {
    /// One or more fields of a model could not be mapped
    #[error("Mapping {model} failed: {}", summarize(.errors))]
    Mapping {
        model: &'static str,
        errors: Vec<FieldError>,
    },

    /// The raw payload is not valid JSON
    #[error("JSON decode error: {message}")]
    Decode {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// The decoded payload is valid JSON but not an object
    #[error("Expected a JSON object at the root, found {found}")]
    InvalidRoot { found: &'static str },

    /// Rendering a tree back to text failed
    #[error("JSON encode error: {message}")]
    Encode {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Field errors carried by a mapping failure, empty for other kinds
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Error::Mapping { errors, .. } => errors,
            _ => &[],
        }
    }
}

/// A field-scoped mapping failure
///
/// `field` is the field name for top-level fields and a dotted path for
/// fields of nested models (`address.city`, `students[1].id`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// A non-optional field is absent from the tree and holds no value
    #[error("{field}: required field is missing")]
    MissingRequiredField { field: String },

    /// A non-optional field is explicitly null in the tree
    #[error("{field}: null given for a non-optional field")]
    NonOptionalNull { field: String },

    /// A converter or the default coercer could not produce a value
    #[error("{field}: conversion failed: {detail}")]
    ConversionFailed { field: String, detail: String },

    /// A nested model field could not be constructed
    #[error("{field}: cannot construct nested type {type_name}")]
    UnresolvedNestedType {
        field: String,
        type_name: &'static str,
    },
}

impl FieldError {
    /// Path of the offending field
    pub fn field(&self) -> &str {
        match self {
            FieldError::MissingRequiredField { field }
            | FieldError::NonOptionalNull { field }
            | FieldError::ConversionFailed { field, .. }
            | FieldError::UnresolvedNestedType { field, .. } => field,
        }
    }

    pub(crate) fn conversion(field: &str, detail: impl Into<String>) -> Self {
        FieldError::ConversionFailed {
            field: field.to_string(),
            detail: detail.into(),
        }
    }

    /// Re-root this error under a parent field
    pub(crate) fn scoped(self, parent: &str) -> Self {
        let join = |child: String| {
            if child.starts_with('[') {
                format!("{parent}{child}")
            } else {
                format!("{parent}.{child}")
            }
        };
        match self {
            FieldError::MissingRequiredField { field } => {
                FieldError::MissingRequiredField { field: join(field) }
            }
            FieldError::NonOptionalNull { field } => FieldError::NonOptionalNull { field: join(field) },
            FieldError::ConversionFailed { field, detail } => FieldError::ConversionFailed {
                field: join(field),
                detail,
            },
            FieldError::UnresolvedNestedType { field, type_name } => {
                FieldError::UnresolvedNestedType {
                    field: join(field),
                    type_name,
                }
            }
        }
    }

    /// Attribute a coercion failure to `field`
    pub(crate) fn from_coerce(field: &str, err: CoerceError) -> Vec<Self> {
        match err {
            CoerceError::Nested(errors) => errors.into_iter().map(|e| e.scoped(field)).collect(),
            CoerceError::UnresolvedNestedType { type_name } => vec![FieldError::UnresolvedNestedType {
                field: field.to_string(),
                type_name,
            }],
            CoerceError::UnexpectedNull => vec![FieldError::NonOptionalNull {
                field: field.to_string(),
            }],
            other => vec![FieldError::conversion(field, other.to_string())],
        }
    }
}

/// Failure to translate one value between its tree and native forms
#[derive(Error, Debug)]
pub enum CoerceError {
    /// The value has the wrong shape for the declared type
    #[error("expected {expected}, found {found}")]
    Mismatch {
        expected: String,
        found: &'static str,
    },

    /// A number does not fit the declared integer type
    #[error("value {value} does not fit in {target}")]
    OutOfRange { value: String, target: &'static str },

    /// Null reached a non-optional value
    #[error("null given for a non-optional value")]
    UnexpectedNull,

    /// A date string matched none of the accepted formats
    #[error("'{raw}' is not a date in any accepted format")]
    UnparsedDate { raw: String },

    /// A date could not be rendered with the configured format
    #[error("invalid date format '{format}'")]
    InvalidDateFormat { format: String },

    /// A custom type reached the default coercer
    #[error("no converter registered for custom type {type_name}")]
    NoConverter { type_name: &'static str },

    /// A nested value is not of the field's model type
    #[error("cannot construct nested type {type_name}")]
    UnresolvedNestedType { type_name: &'static str },

    /// Errors raised while filling or serializing a nested model
    #[error("{} nested field error(s)", .0.len())]
    Nested(Vec<FieldError>),
}

impl CoerceError {
    pub(crate) fn mismatch(expected: impl ToString, found: &'static str) -> Self {
        CoerceError::Mismatch {
            expected: expected.to_string(),
            found,
        }
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// Conversion implementations
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}
