// File: src/registry.rs
// Purpose: Explicit route registry owned by the dispatcher

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::controller::{extract_routes, BoundRoute, Controller};
use crate::error::Error;

/// A controller mounted at a prefix, with its extracted routes.
pub struct Mounted {
    pub controller: Arc<dyn Controller>,
    pub routes: Arc<[BoundRoute]>,
}

/// Routes keyed by mount prefix, built once at startup.
///
/// Extraction happens at mount time and is idempotent per controller
/// instance: re-mounting the same instance (pointer identity) at the
/// same prefix returns the cached list without re-scanning.
#[derive(Default)]
pub struct RouteRegistry {
    mounts: BTreeMap<String, Mounted>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mounts a controller, extracting and caching its routes.
    ///
    /// Schema problems surface here as `Error::Configuration` — a setup
    /// failure, never a per-request one.
    pub fn mount(
        &mut self,
        prefix: impl AsRef<str>,
        controller: Arc<dyn Controller>,
    ) -> Result<Arc<[BoundRoute]>, Error> {
        let prefix = normalize_prefix(prefix.as_ref());
        if let Some(existing) = self.mounts.get(&prefix) {
            if Arc::ptr_eq(&existing.controller, &controller) {
                return Ok(existing.routes.clone());
            }
        }
        let routes: Arc<[BoundRoute]> = extract_routes(controller.as_ref(), &prefix)?.into();
        debug!(prefix = %prefix, routes = routes.len(), "mounted controller");
        self.mounts.insert(
            prefix,
            Mounted {
                controller,
                routes: routes.clone(),
            },
        );
        Ok(routes)
    }

    /// Longest-matching-prefix lookup for a request path.
    pub fn resolve(&self, path: &str) -> Option<&Mounted> {
        self.mounts
            .iter()
            .filter(|(prefix, _)| covers(prefix, path))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, mounted)| mounted)
    }

    pub fn routes_for(&self, prefix: &str) -> Option<&Arc<[BoundRoute]>> {
        self.mounts
            .get(&normalize_prefix(prefix))
            .map(|m| &m.routes)
    }

    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.mounts.len()
    }
}

/// `""` and `"/"` mean root; everything else gets a leading slash and
/// loses any trailing one.
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return String::new();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

fn covers(prefix: &str, path: &str) -> bool {
    if prefix.is_empty() {
        return true;
    }
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}
