// File: src/dispatch.rs
// Purpose: The per-request state machine: lookup, extract, validate, invoke, render

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Map, Value};
use tracing::{debug, error};

use virgule_router::HttpMethod;

use crate::config::{Config, DispatchConfig};
use crate::controller::{BoundRoute, Controller};
use crate::error::Error;
use crate::infer;
use crate::registry::RouteRegistry;
use crate::request::{decode_component, parse_query, RequestMeta};
use crate::respond::render;
use crate::schema::{self, kebab_case, Property};
use crate::user::{NoUser, UserResolver};

/// What came out of a dispatch attempt.
///
/// `NotHandled` hands the request back untouched so a caller can fall
/// through to another handler; it is a sentinel, not an error.
pub enum DispatchOutcome {
    Handled(Response),
    NotHandled(Request<Body>),
}

/// Routes requests to mounted controllers.
///
/// Per request the flow is: route lookup, parameter extraction, body
/// decoding (`$body`), user resolution (`$user`), validation, positional
/// invocation, response rendering. Failures from any step after lookup
/// are converted centrally into one error response.
pub struct Dispatcher {
    registry: RouteRegistry,
    user_resolver: Arc<dyn UserResolver>,
    config: DispatchConfig,
    base_path: String,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::with_config(DispatchConfig::default())
    }

    pub fn with_config(config: DispatchConfig) -> Self {
        Self {
            registry: RouteRegistry::new(),
            user_resolver: Arc::new(NoUser),
            config,
            base_path: String::new(),
        }
    }

    /// Builds a dispatcher from a full [`Config`], applying the
    /// configured base path to every mount.
    pub fn from_config(config: &Config) -> Self {
        let mut dispatcher = Self::with_config(config.dispatch.clone());
        dispatcher.base_path = config.routing.base_path.clone().unwrap_or_default();
        dispatcher
    }

    /// Mounts a controller under a prefix. Routes are extracted and
    /// schemas validated here, once; configuration problems never reach
    /// request handling.
    pub fn mount(
        &mut self,
        prefix: &str,
        controller: Arc<dyn Controller>,
    ) -> Result<(), Error> {
        let full = format!("{}{}", self.base_path, prefix);
        self.registry.mount(full, controller).map(|_| ())
    }

    pub fn set_user_resolver(&mut self, resolver: Arc<dyn UserResolver>) {
        self.user_resolver = resolver;
    }

    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    /// Handles one request.
    pub async fn dispatch(&self, req: Request<Body>) -> DispatchOutcome {
        let path = req.uri().path().to_string();
        let method = req.method().clone();

        // ROUTE_LOOKUP
        let Some(mounted) = self.registry.resolve(&path) else {
            return DispatchOutcome::NotHandled(req);
        };
        let (bound, captures) = match find_route(&mounted.routes, &method, &path) {
            RouteLookup::Found(bound, captures) => (bound, captures),
            RouteLookup::MethodMismatch => {
                return DispatchOutcome::Handled(self.method_not_allowed(&method, &path));
            }
            RouteLookup::NoMatch => return DispatchOutcome::NotHandled(req),
        };

        let open = mounted.controller.open();
        match self.run(req, bound, captures, open).await {
            Ok(response) => DispatchOutcome::Handled(response),
            Err(err) => DispatchOutcome::Handled(self.error_response(err)),
        }
    }

    async fn run(
        &self,
        req: Request<Body>,
        bound: &BoundRoute,
        captures: Vec<(String, String)>,
        open: bool,
    ) -> Result<Response, Error> {
        let (parts, body) = req.into_parts();
        let meta = RequestMeta::from_parts(&parts);

        // PARAM_EXTRACT: path captures first, then query entries that
        // are not already present
        let mut bag: Map<String, Value> = Map::new();
        for (name, raw) in captures {
            bag.insert(name, Value::String(decode_component(&raw)));
        }
        for (key, value) in &meta.query {
            if !bag.contains_key(key) {
                bag.insert(key.clone(), Value::String(value.clone()));
            }
        }

        // BODY_EXTRACT
        let body_value = if bound.schema.declares(schema::BODY) {
            let bytes = to_bytes(body, self.config.max_body_bytes)
                .await
                .map_err(|e| Error::InvalidData(format!("unreadable request body: {e}")))?;
            Some(decode_body(&parts.headers, &bytes)?)
        } else {
            None
        };

        // USER_EXTRACT
        let user_value = if bound.schema.declares(schema::USER) {
            Some(self.resolve_user(&meta, open).await?)
        } else {
            None
        };

        // VALIDATE: schema property order is the positional order
        let mut args: Vec<Value> = Vec::with_capacity(bound.schema.len());
        for prop in bound.schema.props() {
            let value = if prop.name == schema::BODY {
                body_value.clone().unwrap_or(Value::Null)
            } else if prop.name == schema::REQUEST {
                meta.to_value()
            } else if prop.name == schema::USER {
                user_value.clone().unwrap_or(Value::Null)
            } else {
                validate_param(prop, &bag)?
            };
            args.push(value);
        }

        // INVOKE
        let payload = (bound.func)(args).await?;

        // RESPONSE_BUILD
        render(&meta.path, payload)
    }

    async fn resolve_user(&self, meta: &RequestMeta, open: bool) -> Result<Value, Error> {
        let resolved = self
            .user_resolver
            .resolve(meta)
            .await
            .unwrap_or(Value::Null);
        if is_falsy(&resolved) {
            if open {
                Ok(Value::Null)
            } else {
                Err(Error::permission_denied("no current user"))
            }
        } else {
            Ok(resolved)
        }
    }

    fn method_not_allowed(&self, method: &Method, path: &str) -> Response {
        if !self.config.quiet {
            debug!(method = %method, path = %path, "method not allowed");
        }
        let body = Json(json!({
            "error": format!("{method} is not allowed for {path}"),
        }));
        (StatusCode::METHOD_NOT_ALLOWED, body).into_response()
    }

    fn error_response(&self, err: Error) -> Response {
        let status = err.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = ?err, "request failed");
        } else if !self.config.quiet {
            debug!(error = %err, status = %status, "request rejected");
        }
        err.into_response()
    }
}

enum RouteLookup<'a> {
    Found(&'a BoundRoute, Vec<(String, String)>),
    MethodMismatch,
    NoMatch,
}

/// First route in specificity order whose method and pattern both match.
/// A pattern hit under the wrong method is remembered so the caller can
/// answer 405 instead of falling through.
fn find_route<'a>(routes: &'a [BoundRoute], method: &Method, path: &str) -> RouteLookup<'a> {
    let mut pattern_matched = false;
    for bound in routes.iter() {
        if let Some(captures) = bound.route.pattern.matches(path) {
            if method_matches(bound.route.method, method) {
                return RouteLookup::Found(bound, captures);
            }
            pattern_matched = true;
        }
    }
    if pattern_matched {
        RouteLookup::MethodMismatch
    } else {
        RouteLookup::NoMatch
    }
}

fn method_matches(route_method: HttpMethod, method: &Method) -> bool {
    route_method.as_str() == method.as_str()
}

/// Decodes a request body by content type: JSON to a structured value,
/// form-encoded to a flat string map, anything else to raw text.
fn decode_body(headers: &HeaderMap, bytes: &[u8]) -> Result<Value, Error> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if content_type.contains("json") {
        serde_json::from_slice(bytes)
            .map_err(|e| Error::InvalidData(format!("malformed JSON body: {e}")))
    } else if content_type.contains("application/x-www-form-urlencoded") {
        let text = String::from_utf8_lossy(bytes);
        let mut map = Map::new();
        for (key, value) in parse_query(&text) {
            map.insert(key, Value::String(value));
        }
        Ok(Value::Object(map))
    } else {
        Ok(Value::String(String::from_utf8_lossy(bytes).into_owned()))
    }
}

/// Resolves and coerces one declared parameter from the bag.
fn validate_param(prop: &Property, bag: &Map<String, Value>) -> Result<Value, Error> {
    let raw = bag
        .get(&prop.name)
        .or_else(|| bag.get(&kebab_case(&prop.name)));

    let Some(raw) = raw else {
        if prop.required {
            return Err(Error::InvalidData(format!(
                "missing required parameter '{}'",
                prop.name
            )));
        }
        return Ok(prop.default.clone().unwrap_or(Value::Null));
    };

    // Already-structured values pass through unchanged
    let Value::String(text) = raw else {
        return Ok(raw.clone());
    };

    if prop.kind == "string" {
        return Ok(Value::String(strip_quotes(text).to_string()));
    }

    match serde_json::from_str::<Value>(text) {
        Ok(parsed) => Ok(parsed),
        Err(_) if prop.kind == infer::UNKNOWN => Ok(Value::String(text.clone())),
        Err(_) => Err(Error::InvalidData(format!(
            "invalid value '{}' for parameter '{}': expected {}",
            text, prop.name, prop.kind
        ))),
    }
}

/// Strips at most one layer of surrounding quote characters.
fn strip_quotes(text: &str) -> &str {
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}
