//! Response envelope shared by fresh transport calls and cache hits

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response headers keyed by lower-cased name.
pub type HeaderMap = BTreeMap<String, String>;

/// Immutable wrapper around a completed HTTP exchange.
///
/// A cache hit and a fresh transport call produce indistinguishable
/// envelopes; nothing here records where the value came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    status_code: u16,
    data: Value,
    headers: HeaderMap,
}

impl ApiResponse {
    /// Build an envelope; header names are normalised to lower case.
    pub fn new(status_code: u16, data: Value, headers: HeaderMap) -> Self {
        let headers =
            headers.into_iter().map(|(name, value)| (name.to_ascii_lowercase(), value)).collect();
        let data = if data.is_null() { Value::Object(Map::new()) } else { data };
        Self { status_code, data, headers }
    }

    /// Build an envelope from a raw body. Empty or non-JSON bodies decode to
    /// an empty object.
    pub fn from_body(status_code: u16, body: &[u8], headers: HeaderMap) -> Self {
        let data = if body.iter().all(u8::is_ascii_whitespace) {
            Value::Object(Map::new())
        } else {
            serde_json::from_slice(body).unwrap_or_else(|_| Value::Object(Map::new()))
        };
        Self::new(status_code, data, headers)
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn into_data(self) -> Value {
        self.data
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn is_successful(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn has_data(&self) -> bool {
        match &self.data {
            Value::Object(map) => !map.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::String(text) => !text.is_empty(),
            Value::Null => false,
            Value::Bool(_) | Value::Number(_) => true,
        }
    }
}
