//! Attribute codec between JSON values and the wide-column wire model.
//!
//! The underlying store is dynamically typed with no native recursive JSON
//! support, so every payload passes through a closed tagged-variant type
//! (`AttrValue`) with total, exhaustive conversions in both directions.
//! Numbers travel stringified; booleans, maps, and lists are structural.
//!
//! Write-side omission rules, which callers must tolerate on round trips:
//!
//! - empty strings, maps, and lists are never written; the key vanishes
//! - JSON `null` is never written
//! - list elements may be strings, numbers, booleans, or non-empty maps;
//!   nested lists are unsupported and dropped element-wise
//!
//! Read-side, numeric attributes parse as `i64` first and fall back to
//! `f64`; anything unparseable is silently dropped.

use std::collections::HashMap;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, Result};

/// Closed attribute value variant mirroring the store's wire types.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// String attribute.
    S(String),
    /// Numeric attribute, carried stringified.
    N(String),
    /// Boolean attribute.
    Bool(bool),
    /// Nested map attribute.
    M(HashMap<String, AttrValue>),
    /// List attribute with independently typed elements.
    L(Vec<AttrValue>),
}

/// One stored item: a flat mapping from attribute name to typed value.
pub type Item = HashMap<String, AttrValue>;

/// Encodes a JSON object into an item, applying the omission rules.
pub fn encode_object(map: &Map<String, Value>) -> Item {
    map.iter().filter_map(|(k, v)| encode_value(v).map(|attr| (k.clone(), attr))).collect()
}

/// Decodes an item back into a JSON object, dropping unparseable values.
pub fn decode_object(item: &Item) -> Map<String, Value> {
    item.iter().filter_map(|(k, v)| decode_value(v).map(|val| (k.clone(), val))).collect()
}

/// Converts one JSON value to an attribute, or `None` when the omission
/// rules say the key should not be written at all.
fn encode_value(value: &Value) -> Option<AttrValue> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(AttrValue::S(s.clone())),
        Value::Number(n) => Some(AttrValue::N(n.to_string())),
        Value::Bool(b) => Some(AttrValue::Bool(*b)),
        Value::Object(map) => {
            let encoded = encode_object(map);
            if encoded.is_empty() {
                None
            } else {
                Some(AttrValue::M(encoded))
            }
        },
        Value::Array(items) => {
            let elements: Vec<AttrValue> = items.iter().filter_map(encode_element).collect();
            if elements.is_empty() {
                None
            } else {
                Some(AttrValue::L(elements))
            }
        },
    }
}

/// Converts one list element. Elements are typed independently of the map
/// path: empty strings survive here, while nested lists and nulls do not.
fn encode_element(value: &Value) -> Option<AttrValue> {
    match value {
        Value::String(s) => Some(AttrValue::S(s.clone())),
        Value::Number(n) => Some(AttrValue::N(n.to_string())),
        Value::Bool(b) => Some(AttrValue::Bool(*b)),
        Value::Object(map) => {
            let encoded = encode_object(map);
            if encoded.is_empty() {
                None
            } else {
                Some(AttrValue::M(encoded))
            }
        },
        Value::Array(_) | Value::Null => None,
    }
}

/// Decodes one attribute back to a JSON value.
fn decode_value(attr: &AttrValue) -> Option<Value> {
    match attr {
        AttrValue::S(s) => Some(Value::String(s.clone())),
        AttrValue::N(n) => {
            if let Ok(i) = n.parse::<i64>() {
                Some(Value::Number(i.into()))
            } else if let Ok(f) = n.parse::<f64>() {
                serde_json::Number::from_f64(f).map(Value::Number)
            } else {
                None
            }
        },
        AttrValue::Bool(b) => Some(Value::Bool(*b)),
        AttrValue::M(map) => {
            let obj: Map<String, Value> = map
                .iter()
                .filter_map(|(k, v)| decode_value(v).map(|val| (k.clone(), val)))
                .collect();
            Some(Value::Object(obj))
        },
        AttrValue::L(list) => {
            Some(Value::Array(list.iter().filter_map(decode_value).collect()))
        },
    }
}

/// Serializes a typed shape into an item through the JSON representation.
///
/// # Errors
///
/// Returns `CoreError::Deserialization` when the shape does not serialize
/// to a JSON object.
pub fn to_item<T: Serialize>(value: &T) -> Result<Item> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(encode_object(&map)),
        other => Err(CoreError::Deserialization(format!(
            "expected an object-shaped item, got {other}"
        ))),
    }
}

/// Decodes an item into a caller-requested typed shape.
///
/// This is the single typed deserialization boundary: the item decodes to
/// a JSON object and then into `T` in one checked step.
///
/// # Errors
///
/// Returns `CoreError::Deserialization` when the stored shape does not
/// match `T`.
pub fn from_item<T: DeserializeOwned>(item: &Item) -> Result<T> {
    Ok(serde_json::from_value(Value::Object(decode_object(item)))?)
}
