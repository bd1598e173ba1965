// File: src/controller.rs
// Purpose: Controller trait, handler registration, route extraction

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;
use virgule_router::{specificity, Route};

use crate::error::Error;
use crate::respond::Payload;
use crate::schema::Schema;

pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Payload, Error>> + Send>>;

/// A registered handler function.
///
/// The invocation contract is positional: arguments arrive as a `Vec`
/// ordered exactly by the schema's property order.
pub type BoxHandler = Arc<dyn Fn(Vec<Value>) -> HandlerFuture + Send + Sync>;

/// One handler declared by a controller: the route-encoding name, the
/// parameter schema, and the function itself.
pub struct HandlerSpec {
    pub name: &'static str,
    pub schema: Schema,
    pub func: BoxHandler,
}

impl HandlerSpec {
    pub fn new<F, Fut>(name: &'static str, schema: Schema, func: F) -> Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Payload, Error>> + Send + 'static,
    {
        let func: BoxHandler = Arc::new(move |args| Box::pin(func(args)));
        Self { name, schema, func }
    }
}

/// An object exposing named handlers.
///
/// `handlers()` is the compile-time-visible handler list; building it
/// may fail with `Error::Configuration` when a schema is invalid, which
/// surfaces at mount time, never per request.
pub trait Controller: Send + Sync {
    fn handlers(&self) -> Result<Vec<HandlerSpec>, Error>;

    /// An open controller serves requests without a resolved user:
    /// `$user` degrades to null instead of failing the request.
    fn open(&self) -> bool {
        false
    }
}

/// A route bound to its schema and handler.
#[derive(Clone)]
pub struct BoundRoute {
    pub route: Route,
    pub schema: Schema,
    pub func: BoxHandler,
}

impl std::fmt::Debug for BoundRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundRoute")
            .field("route", &self.route)
            .field("schema", &self.schema)
            .field("func", &"<handler>")
            .finish()
    }
}

/// Decodes a controller's handler names into routes under a base path,
/// sorted by specificity. Names that do not start with an HTTP method
/// are skipped silently; they are plain members, not routes.
pub fn extract_routes(
    controller: &dyn Controller,
    base: &str,
) -> Result<Vec<BoundRoute>, Error> {
    let mut routes: Vec<BoundRoute> = controller
        .handlers()?
        .into_iter()
        .filter_map(|spec| {
            Route::from_name(spec.name, base).map(|route| BoundRoute {
                route,
                schema: spec.schema,
                func: spec.func,
            })
        })
        .collect();
    routes.sort_by(|a, b| specificity(&a.route, &b.route));
    Ok(routes)
}

/// A controller attached to a mount prefix.
pub struct Mount {
    pub prefix: String,
    pub controller: Arc<dyn Controller>,
}

/// Boundary for controller discovery.
///
/// Directory scanning (load controllers from a path with a file-suffix
/// filter) lives outside this core; implementations yield named
/// controller instances ready to mount.
pub trait Loader {
    fn load(&self) -> anyhow::Result<Vec<Mount>>;
}
