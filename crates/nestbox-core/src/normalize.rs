//! Request normalization: raw method, headers, and body bytes into the
//! canonical stored triple.
//!
//! Normalization is total. A body that fails strict JSON parsing is
//! wrapped as `{"rawData": <original text>}` instead of erroring, so the
//! captured request is never silently dropped. `Content-Type` plays no
//! role in the parse decision; only the body's parseability matters, and
//! no size limit or schema validation is applied.

use std::collections::HashMap;

use http::HeaderMap;
use serde_json::{json, Value};

/// Attribute key wrapping unparseable bodies.
pub const RAW_DATA_KEY: &str = "rawData";

/// Separator joining multi-value headers, the HTTP list separator.
const HEADER_JOIN: &str = ", ";

/// Normalized form of one inbound request, ready for storage.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedRequest {
    /// HTTP method string, case as received.
    pub method: String,
    /// Header map flattened to one string per name.
    pub headers: HashMap<String, String>,
    /// Parsed body, raw-text fallback, or `None` for an empty body.
    pub data: Option<Value>,
}

/// Converts an inbound request into its stored form.
pub fn normalize(method: &str, headers: &HeaderMap, body: &[u8]) -> CapturedRequest {
    CapturedRequest {
        method: method.to_string(),
        headers: flatten_headers(headers),
        data: parse_body(body),
    }
}

/// Flattens multi-value headers to a single joined string per name.
///
/// Values that are not valid UTF-8 are decoded lossily; capture must not
/// fail on encoding.
fn flatten_headers(headers: &HeaderMap) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for name in headers.keys() {
        let joined = headers
            .get_all(name)
            .iter()
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .collect::<Vec<_>>()
            .join(HEADER_JOIN);
        map.insert(name.as_str().to_string(), joined);
    }
    map
}

/// Parses the body as strict JSON, falling back to the raw-text wrapper.
fn parse_body(body: &[u8]) -> Option<Value> {
    if body.is_empty() {
        return None;
    }

    match serde_json::from_slice(body) {
        Ok(value) => Some(value),
        Err(_) => Some(json!({ RAW_DATA_KEY: String::from_utf8_lossy(body).into_owned() })),
    }
}
