//! Outgoing request value and its cache key

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::constants::CACHE_KEY_PREFIX;
use crate::impl_wire_name_conversions;

/// HTTP verbs the remote REST API is called with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl_wire_name_conversions!(HttpMethod {
    Get => "GET",
    Post => "POST",
    Put => "PUT",
    Delete => "DELETE",
});

/// Scalar value of a query-string parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Query parameters, ordered by name.
pub type QueryParams = BTreeMap<String, QueryValue>;

/// An immutable request against the remote REST API.
///
/// Built with one of the per-verb constructors and refined with the
/// `with_*` builders. The cache key is recomputed by every builder so it
/// always reflects the final shape of the request.
///
/// ```rust
/// use jiralink_domain::types::ApiRequest;
///
/// let a = ApiRequest::get("/rest/api/3/issue/ABC-1").with_param("expand", "changelog");
/// let b = ApiRequest::get("/rest/api/3/issue/ABC-1").with_param("expand", "changelog");
/// assert_eq!(a.cache_key(), b.cache_key());
/// assert!(a.should_cache());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRequest {
    method: HttpMethod,
    endpoint: String,
    params: QueryParams,
    body: Map<String, Value>,
    cache_key: String,
    #[serde(default)]
    refresh: bool,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        let mut request = Self {
            method,
            endpoint: endpoint.into(),
            params: QueryParams::new(),
            body: Map::new(),
            cache_key: String::new(),
            refresh: false,
        };
        request.cache_key = request.compute_cache_key();
        request
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, endpoint)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, endpoint)
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.params.insert(name.into(), value.into());
        self.cache_key = self.compute_cache_key();
        self
    }

    pub fn with_params(mut self, params: QueryParams) -> Self {
        self.params.extend(params);
        self.cache_key = self.compute_cache_key();
        self
    }

    pub fn with_body(mut self, body: Map<String, Value>) -> Self {
        self.body = body;
        self.cache_key = self.compute_cache_key();
        self
    }

    /// Skip the cache lookup but still store the fresh response, replacing
    /// whatever was cached under the same key. Used for read-after-write.
    pub fn with_refresh(mut self) -> Self {
        self.refresh = true;
        self
    }

    pub fn is_refresh(&self) -> bool {
        self.refresh
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    pub fn has_body(&self) -> bool {
        !self.body.is_empty()
    }

    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }

    /// Only reads participate in response caching.
    pub fn should_cache(&self) -> bool {
        self.method == HttpMethod::Get
    }

    fn compute_cache_key(&self) -> String {
        let params = serde_json::to_value(&self.params).unwrap_or(Value::Null);
        let body = Value::Object(self.body.clone());

        let mut hasher = Sha256::new();
        hasher.update(self.method.as_str().as_bytes());
        hasher.update([0x1f]);
        hasher.update(self.endpoint.as_bytes());
        hasher.update([0x1f]);
        hasher.update(canonical_json(&params).as_bytes());
        hasher.update([0x1f]);
        hasher.update(canonical_json(&body).as_bytes());

        format!("{CACHE_KEY_PREFIX}{}", hex::encode(hasher.finalize()))
    }
}

/// Serialize a JSON value with object keys sorted at every depth.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (index, key) in keys.into_iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                if let Some(inner) = map.get(key) {
                    write_canonical(inner, out);
                }
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn body(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test body must be an object"),
        }
    }

    #[test]
    fn identical_requests_share_a_cache_key() {
        let a = ApiRequest::post("/rest/api/3/search")
            .with_param("validateQuery", true)
            .with_body(body(json!({"jql": "project = ABC", "maxResults": 50})));
        let b = ApiRequest::post("/rest/api/3/search")
            .with_param("validateQuery", true)
            .with_body(body(json!({"maxResults": 50, "jql": "project = ABC"})));

        assert_eq!(a.cache_key(), b.cache_key());
        assert!(a.cache_key().starts_with(CACHE_KEY_PREFIX));
    }

    #[test]
    fn any_difference_changes_the_cache_key() {
        let base = ApiRequest::get("/rest/api/3/issue/ABC-1").with_param("expand", "names");

        let other_method = ApiRequest::delete("/rest/api/3/issue/ABC-1").with_param("expand", "names");
        let other_endpoint = ApiRequest::get("/rest/api/3/issue/ABC-2").with_param("expand", "names");
        let other_params = ApiRequest::get("/rest/api/3/issue/ABC-1").with_param("expand", "schema");
        let other_body = ApiRequest::get("/rest/api/3/issue/ABC-1")
            .with_param("expand", "names")
            .with_body(body(json!({"fields": ["summary"]})));

        for other in [other_method, other_endpoint, other_params, other_body] {
            assert_ne!(base.cache_key(), other.cache_key());
        }
    }

    #[test]
    fn param_type_is_part_of_the_key() {
        let text = ApiRequest::get("/x").with_param("n", "1");
        let number = ApiRequest::get("/x").with_param("n", 1_i64);
        assert_ne!(text.cache_key(), number.cache_key());
    }

    #[test]
    fn only_get_requests_are_cacheable() {
        assert!(ApiRequest::get("/a").should_cache());
        assert!(!ApiRequest::post("/a").should_cache());
        assert!(!ApiRequest::put("/a").should_cache());
        assert!(!ApiRequest::delete("/a").should_cache());
    }

    #[test]
    fn canonical_json_sorts_nested_keys() {
        let value = json!({"b": {"z": 1, "a": [ {"y": true, "x": null} ]}, "a": "s"});
        assert_eq!(canonical_json(&value), r#"{"a":"s","b":{"a":[{"x":null,"y":true}],"z":1}}"#);
    }

    #[test]
    fn query_values_render_as_plain_strings() {
        assert_eq!(QueryValue::from("abc").to_string(), "abc");
        assert_eq!(QueryValue::from(50_u32).to_string(), "50");
        assert_eq!(QueryValue::from(false).to_string(), "false");
    }

    #[test]
    fn http_method_parses_case_insensitively() {
        assert_eq!("put".parse::<HttpMethod>().unwrap(), HttpMethod::Put);
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }
}
