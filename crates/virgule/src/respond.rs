// File: src/respond.rs
// Purpose: Handler payloads and response rendering

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::Error;

/// What a handler returns.
///
/// `Http` is a fully-formed response and passes through unmodified;
/// everything else goes through the content-type decision table in
/// [`render`].
pub enum Payload {
    Http(Response),
    Json(Value),
    Text(String),
    Bytes(Vec<u8>),
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Json(value)
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Bytes(bytes)
    }
}

impl From<Response> for Payload {
    fn from(response: Response) -> Self {
        Payload::Http(response)
    }
}

/// Renders a handler payload into a 200 response.
///
/// Content type priority: a known file-extension suffix on the final
/// path segment wins; otherwise strings are sniffed for an HTML tag
/// (else plain text), binary bodies become octet-stream, and anything
/// else is JSON-serialized.
pub fn render(path: &str, payload: Payload) -> Result<Response, Error> {
    let payload = match payload {
        Payload::Http(response) => return Ok(response),
        other => other,
    };

    let mime = match extension_mime(path) {
        Some(mime) => mime,
        None => match &payload {
            Payload::Text(text) => {
                if looks_like_html(text) {
                    "text/html; charset=utf-8"
                } else {
                    "text/plain; charset=utf-8"
                }
            }
            Payload::Bytes(_) => "application/octet-stream",
            Payload::Json(_) => "application/json; charset=utf-8",
            Payload::Http(_) => unreachable!(),
        },
    };

    let body = match payload {
        Payload::Text(text) => text.into_bytes(),
        Payload::Bytes(bytes) => bytes,
        Payload::Json(value) => {
            serde_json::to_vec(&value).map_err(|e| Error::Internal(anyhow::Error::new(e)))?
        }
        Payload::Http(_) => unreachable!(),
    };

    Ok(with_content_type(mime, body))
}

fn with_content_type(mime: &'static str, body: Vec<u8>) -> Response {
    (StatusCode::OK, [(header::CONTENT_TYPE, mime)], body).into_response()
}

/// True when the text starts with something tag-shaped.
pub fn looks_like_html(text: &str) -> bool {
    static HTML_TAG: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^\s*<[a-zA-Z!/][^>]*>").unwrap());
    HTML_TAG.is_match(text)
}

/// Known-extension lookup over the final path segment.
///
/// Only a known extension takes priority; a dotted segment like `/v1.2`
/// falls through to body-based detection.
pub fn extension_mime(path: &str) -> Option<&'static str> {
    let last = path.rsplit('/').next().unwrap_or("");
    let (stem, ext) = last.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    mime_for(ext)
}

fn mime_for(ext: &str) -> Option<&'static str> {
    let mime = match ext.to_ascii_lowercase().as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" => "application/javascript; charset=utf-8",
        "json" => "application/json; charset=utf-8",
        "xml" => "application/xml; charset=utf-8",
        "txt" => "text/plain; charset=utf-8",
        "csv" => "text/csv; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "wasm" => "application/wasm",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        _ => return None,
    };
    Some(mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content_type(response: &Response) -> &str {
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
    }

    #[test]
    fn test_json_default() {
        let response = render("/users", Payload::Json(serde_json::json!({"id": 1}))).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(content_type(&response), "application/json; charset=utf-8");
    }

    #[test]
    fn test_plain_text() {
        let response = render("/ping", Payload::Text("pong".to_string())).unwrap();
        assert_eq!(content_type(&response), "text/plain; charset=utf-8");
    }

    #[test]
    fn test_html_sniffing() {
        let response =
            render("/page", Payload::Text("<html><body>hi</body></html>".into())).unwrap();
        assert_eq!(content_type(&response), "text/html; charset=utf-8");

        let response = render("/page", Payload::Text("  <!DOCTYPE html>".into())).unwrap();
        assert_eq!(content_type(&response), "text/html; charset=utf-8");

        let response = render("/page", Payload::Text("a < b > c".into())).unwrap();
        assert_eq!(content_type(&response), "text/plain; charset=utf-8");
    }

    #[test]
    fn test_bytes_octet_stream() {
        let response = render("/blob", Payload::Bytes(vec![0, 1, 2])).unwrap();
        assert_eq!(content_type(&response), "application/octet-stream");
    }

    #[test]
    fn test_extension_takes_priority() {
        let response = render("/report.csv", Payload::Text("a,b\n1,2".into())).unwrap();
        assert_eq!(content_type(&response), "text/csv; charset=utf-8");
    }

    #[test]
    fn test_unknown_extension_falls_through() {
        let response = render("/v1.2", Payload::Text("ok".into())).unwrap();
        assert_eq!(content_type(&response), "text/plain; charset=utf-8");
    }

    #[test]
    fn test_http_passes_through() {
        let original = (StatusCode::CREATED, "made").into_response();
        let response = render("/x", Payload::Http(original)).unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[test]
    fn test_extension_mime_table() {
        assert_eq!(extension_mime("/a/b.html"), Some("text/html; charset=utf-8"));
        assert_eq!(extension_mime("/a/b.png"), Some("image/png"));
        assert_eq!(extension_mime("/a/b"), None);
        assert_eq!(extension_mime("/a/.txt"), None);
        assert_eq!(extension_mime("/a/b.weird"), None);
    }
}
