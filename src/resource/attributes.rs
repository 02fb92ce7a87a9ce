//! Typed extraction of values from an attribute map.
//!
//! Identifiers may be written as strings or bare numbers (`sensor_pin: 40`);
//! both end up as the same string. A `null` value counts as absent.
//! Booleans, lists and objects are rejected as identifiers instead of being
//! stringified, so `board_name: true` is a configuration error.

use serde_json::{Map, Value};

use crate::error::{Result, WateringError};

fn present<'a>(attrs: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    attrs.get(key).filter(|v| !v.is_null())
}

fn as_identifier(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(WateringError::configuration(format!(
            "{} must be a string or number, got {}",
            key, other
        ))),
    }
}

/// A string attribute that must be present
pub fn required_string(attrs: &Map<String, Value>, key: &str) -> Result<String> {
    match present(attrs, key) {
        Some(value) => as_identifier(key, value),
        None => Err(WateringError::configuration(format!(
            "Missing required {} attribute.",
            key
        ))),
    }
}

/// A string attribute with a default
pub fn optional_string(attrs: &Map<String, Value>, key: &str, default: &str) -> Result<String> {
    match present(attrs, key) {
        Some(value) => as_identifier(key, value),
        None => Ok(default.to_string()),
    }
}

/// A boolean attribute with a default
pub fn optional_bool(attrs: &Map<String, Value>, key: &str, default: bool) -> Result<bool> {
    match present(attrs, key) {
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(WateringError::configuration(format!(
            "{} must be a boolean, got {}",
            key, other
        ))),
        None => Ok(default),
    }
}
