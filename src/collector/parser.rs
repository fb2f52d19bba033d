//! JSON body decoder
//!
//! The body is read one byte per character (ISO-8859-1) before parsing, so
//! every byte maps to exactly one character of the flattened output.

use serde_json::{Map, Value};

use crate::error::DecodeError;

/// Decode a raw response body into a JSON value.
///
/// Object key order is kept as it appears in the body.
pub fn decode(body: &[u8]) -> Result<Value, DecodeError> {
    let text: String = body.iter().copied().map(char::from).collect();
    let value = serde_json::from_str(&text)?;
    Ok(value)
}

/// Split a decoded root into the documents evaluated independently.
///
/// A root array yields one document per element. An empty root array yields
/// a single empty document so it still produces one report.
pub fn documents(root: Value) -> Vec<Value> {
    match root {
        Value::Array(items) if items.is_empty() => vec![Value::Object(Map::new())],
        Value::Array(items) => items,
        other => vec![other],
    }
}
