//! Key policy: which tree key belongs to which field
//!
//! Fill and serialize both resolve keys through [`resolve`], so a field maps
//! to the same key in both directions.

use crate::options::ModelOptions;

/// Outcome of resolving a field's tree key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyDecision {
    /// The field is never read nor written
    Hidden,
    /// The field lives under this key
    Use(String),
}

impl KeyDecision {
    pub fn key(&self) -> Option<&str> {
        match self {
            KeyDecision::Hidden => None,
            KeyDecision::Use(key) => Some(key),
        }
    }
}

/// Resolve the tree key of `field`
///
/// Key maps come first, then the snake_case convention, then the field name
/// itself.
pub fn resolve(field: &str, options: &ModelOptions) -> KeyDecision {
    if let Some(entry) = options.key_map(field) {
        return match &entry.key {
            Some(key) => KeyDecision::Use(key.clone()),
            None => KeyDecision::Hidden,
        };
    }

    if options.snake_cased {
        KeyDecision::Use(to_snake_case(field))
    } else {
        KeyDecision::Use(field.to_string())
    }
}

/// `firstName` -> `first_name`
///
/// An underscore goes before every uppercase letter except a leading one, and
/// the whole name is lower-cased.
pub fn to_snake_case(name: &str) -> String {
    let mut snake = String::with_capacity(name.len() + 4);
    for (index, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if index > 0 {
                snake.push('_');
            }
            snake.extend(ch.to_lowercase());
        } else {
            snake.push(ch);
        }
    }
    snake
}
