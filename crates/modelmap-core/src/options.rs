//! Per-model mapping options
//!
//! Options are a value handed out by [`crate::Model::options`], never a field
//! of the model itself. The data-only part (case convention, key maps, date
//! format and zone) can be loaded from a JSON document; converters are functions and
//! are attached in code.
//!
//! Copyright (c) 2025 Modelmap Team
//! Licensed under the Apache-2.0 license

use crate::converter::Converter;
use crate::dates::{DateZone, DEFAULT_DATE_FORMAT};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tree key of one field, or `None` to hide the field in both directions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMapEntry {
    pub field: String,
    #[serde(default)]
    pub key: Option<String>,
}

impl KeyMapEntry {
    /// Map `field` to the tree key `key`
    pub fn rename(field: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            key: Some(key.into()),
        }
    }

    /// Never read nor write `field`
    pub fn hidden(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            key: None,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.key.is_none()
    }
}

/// Options used while filling or serializing one model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelOptions {
    /// Tree keys are the snake_case form of field names
    pub snake_cased: bool,
    /// Explicit key maps, consulted before the case convention
    pub key_maps: Vec<KeyMapEntry>,
    /// Primary `chrono` format for date fields
    pub date_format: String,
    /// Zone date strings are read and written in
    pub time_zone: DateZone,
    #[serde(skip)]
    pub converters: Vec<Converter>,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            snake_cased: false,
            key_maps: Vec::new(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            time_zone: DateZone::Utc,
            converters: Vec::new(),
        }
    }
}

impl ModelOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the data-only options from a JSON document
    ///
    /// ```
    /// use modelmap_core::ModelOptions;
    ///
    /// let options = ModelOptions::from_json_str(
    ///     r#"{"snake_cased": true, "key_maps": [{"field": "secret"}]}"#,
    /// ).unwrap();
    /// assert!(options.snake_cased);
    /// assert!(options.key_map("secret").unwrap().is_hidden());
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Configuration {
            message: format!("Invalid model options: {}", e),
            source: Some(e.into()),
        })
    }

    /// Load the data-only options from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content).map_err(|e| match e {
            Error::Configuration { message, source } => Error::Configuration {
                message: format!("{} ({})", message, path.display()),
                source,
            },
            other => other,
        })
    }

    pub fn snake_cased(mut self, snake_cased: bool) -> Self {
        self.snake_cased = snake_cased;
        self
    }

    pub fn with_key_map(mut self, entry: KeyMapEntry) -> Self {
        self.key_maps.push(entry);
        self
    }

    /// Shorthand for a renaming key map
    pub fn rename(self, field: impl Into<String>, key: impl Into<String>) -> Self {
        self.with_key_map(KeyMapEntry::rename(field, key))
    }

    /// Shorthand for a hiding key map
    pub fn hide(self, field: impl Into<String>) -> Self {
        self.with_key_map(KeyMapEntry::hidden(field))
    }

    pub fn with_converter(mut self, converter: Converter) -> Self {
        self.converters.push(converter);
        self
    }

    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    pub fn time_zone(mut self, zone: DateZone) -> Self {
        self.time_zone = zone;
        self
    }

    /// The key map of `field`; the first entry wins if several were given
    pub fn key_map(&self, field: &str) -> Option<&KeyMapEntry> {
        self.key_maps.iter().find(|entry| entry.field == field)
    }
}
