//! Key casing conversion for job definition documents
//!
//! Templates are written with camelCase keys (the service's wire format) and
//! compared in PascalCase. Values under user-defined maps keep their keys.

use serde_json::{Map, Value};

/// Keys whose children are user-defined names and must not be converted
pub const PRESERVED_CHILD_KEYS: [&str; 3] = ["options", "parameters", "tags"];

/// Upper-case the first character, leaving the rest untouched
pub fn to_pascal_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower-case the first character, leaving the rest untouched
pub fn to_camel_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Recursively rename object keys with `convert`.
///
/// The preserved keys are matched before conversion, so `tags` and `Tags`
/// behave differently: only the former shields its children.
pub fn walk_keys(value: &Value, convert: fn(&str) -> String) -> Value {
    match value {
        Value::Object(map) => {
            let mut result = Map::with_capacity(map.len());
            for (key, child) in map {
                let converted = if PRESERVED_CHILD_KEYS.contains(&key.as_str()) {
                    child.clone()
                } else {
                    walk_keys(child, convert)
                };
                result.insert(convert(key), converted);
            }
            Value::Object(result)
        }
        Value::Array(items) => Value::Array(items.iter().map(|v| walk_keys(v, convert)).collect()),
        other => other.clone(),
    }
}
