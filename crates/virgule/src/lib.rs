// Virgule - convention-driven HTTP dispatch
// Handler names become routes; explicit schemas validate and coerce request data.

pub mod config;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod infer;
pub mod registry;
pub mod request;
pub mod respond;
pub mod schema;
pub mod user;

// Re-export routing primitives from virgule-router
pub use virgule_router as router;
pub use virgule_router::{HttpMethod, PathPattern, Route};

// Re-export core types
pub use config::{Config, DispatchConfig, RoutingConfig};
pub use controller::{
    extract_routes, BoundRoute, BoxHandler, Controller, HandlerSpec, Loader, Mount,
};
pub use dispatch::{DispatchOutcome, Dispatcher};
pub use error::{Error, Result};
pub use infer::{type_of, type_of_opt};
pub use registry::RouteRegistry;
pub use request::RequestMeta;
pub use respond::Payload;
pub use schema::{kebab_case, Property, Schema, SchemaBuilder};
pub use user::{NoUser, UserResolver};

// Re-export commonly used types from dependencies
pub use axum;
pub use axum::http::StatusCode;
pub use serde_json::{json, Value};
