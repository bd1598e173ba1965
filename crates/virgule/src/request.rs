// File: src/request.rs
// Purpose: Transport-level request facts and query-string parsing

use axum::http::request::Parts;
use axum::http::HeaderMap;
use serde_json::{Map, Value};

/// Snapshot of the transport-level request facts.
///
/// This is the boundary handed to user resolvers and reflected into the
/// `$request` parameter; the underlying transport stays opaque to
/// handlers.
#[derive(Debug, Clone)]
pub struct RequestMeta {
    pub method: String,
    pub path: String,
    /// Decoded query pairs in wire order (duplicates preserved)
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
}

impl RequestMeta {
    pub fn from_parts(parts: &Parts) -> Self {
        Self {
            method: parts.method.to_string(),
            path: parts.uri.path().to_string(),
            query: parse_query(parts.uri.query().unwrap_or("")),
            headers: parts.headers.clone(),
        }
    }

    /// Get a header value as text.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// Structured view of the request, as handlers receive it via
    /// `$request`: `{method, path, query}`.
    pub fn to_value(&self) -> Value {
        let mut query = Map::new();
        for (key, value) in &self.query {
            // First occurrence wins, matching the parameter-bag merge rule
            if !query.contains_key(key) {
                query.insert(key.clone(), Value::String(value.clone()));
            }
        }
        let mut out = Map::new();
        out.insert("method".to_string(), Value::String(self.method.clone()));
        out.insert("path".to_string(), Value::String(self.path.clone()));
        out.insert("query".to_string(), Value::Object(query));
        Value::Object(out)
    }
}

/// Parses a raw query string into decoded key/value pairs.
///
/// A pair without `=` yields an empty value. Keys and values are
/// percent-decoded; `+` decodes to space.
pub fn parse_query(raw: &str) -> Vec<(String, String)> {
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

/// Percent-decodes one query/path component; `+` becomes a space.
/// Undecodable input is kept as-is rather than dropped.
pub fn decode_component(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    match urlencoding::decode(&raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw,
    }
}
