//! # Virgule Router
//!
//! Name-convention routing: a handler *name* like `get_$id` decodes into
//! an HTTP method plus a path pattern (`GET /:id`). No annotations, no
//! registration macros — the name is the route.
//!
//! The pieces:
//! - [`name`]: the tokenizer (`METHOD('_' token)*` grammar, `$` capture
//!   marker, `__` dot-join marker)
//! - [`pattern`]: compiled path patterns with literal and capture
//!   segments
//! - [`Route`] + [`sort_by_specificity`]: route values ordered so the
//!   most specific pattern is tried first
//!
//! Specificity is deterministic: fewer captures win, then the longer
//! pathname. For the same method, `/users/admins` always beats
//! `/users/:id`.
//!
//! ## Example
//!
//! ```
//! use virgule_router::{Route, HttpMethod};
//!
//! let route = Route::from_name("get_$id", "/users").unwrap();
//! assert_eq!(route.method, HttpMethod::Get);
//! assert_eq!(route.pathname(), "/users/:id");
//!
//! let captures = route.pattern.matches("/users/7").unwrap();
//! assert_eq!(captures, vec![("id".to_string(), "7".to_string())]);
//! ```

use std::cmp::Ordering;

pub mod name;
pub mod pattern;

pub use name::{parse_route_name, HttpMethod, NameToken};
pub use pattern::{PathPattern, Segment};

/// A single route decoded from a handler name. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// The handler name the route was decoded from, e.g. `get_$id`
    pub name: String,
    /// HTTP method encoded by the first name token
    pub method: HttpMethod,
    /// Compiled path pattern, base path included
    pub pattern: PathPattern,
}

impl Route {
    /// Decodes a handler name into a route under the given base path.
    ///
    /// Returns `None` when the name does not start with an HTTP method;
    /// such members are not routes and are skipped silently.
    pub fn from_name(name: &str, base: &str) -> Option<Self> {
        let (method, tokens) = parse_route_name(name)?;
        let pattern = PathPattern::compile(base, &tokens);
        Some(Self {
            name: name.to_string(),
            method,
            pattern,
        })
    }

    /// The rendered pathname, e.g. `/users/:id`.
    pub fn pathname(&self) -> &str {
        self.pattern.pathname()
    }
}

/// Specificity ordering between two routes.
///
/// Primary key: capture count ascending (fewer captures is more
/// specific). Tie-break: pathname length descending (longer literal
/// match first).
pub fn specificity(a: &Route, b: &Route) -> Ordering {
    a.pattern
        .capture_count()
        .cmp(&b.pattern.capture_count())
        .then_with(|| b.pathname().len().cmp(&a.pathname().len()))
}

/// Sorts routes so the most specific pattern is reached first.
pub fn sort_by_specificity(routes: &mut [Route]) {
    routes.sort_by(specificity);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_skips_non_routes() {
        assert!(Route::from_name("get_$id", "/users").is_some());
        assert!(Route::from_name("validate", "/users").is_none());
    }

    #[test]
    fn test_literal_before_capture() {
        let mut routes = vec![
            Route::from_name("get_$id", "/users").unwrap(),
            Route::from_name("get_admins", "/users").unwrap(),
        ];
        sort_by_specificity(&mut routes);
        assert_eq!(routes[0].pathname(), "/users/admins");
        assert_eq!(routes[1].pathname(), "/users/:id");
    }

    #[test]
    fn test_longer_pathname_wins_ties() {
        let mut routes = vec![
            Route::from_name("get", "/users").unwrap(),
            Route::from_name("get_admins_active", "/users").unwrap(),
            Route::from_name("get_admins", "/users").unwrap(),
        ];
        sort_by_specificity(&mut routes);
        assert_eq!(routes[0].pathname(), "/users/admins/active");
        assert_eq!(routes[1].pathname(), "/users/admins");
        assert_eq!(routes[2].pathname(), "/users");
    }

    #[test]
    fn test_fewer_captures_beat_length() {
        let mut routes = vec![
            Route::from_name("get_$group_$id", "/u").unwrap(),
            Route::from_name("get_members_of_staff", "/u").unwrap(),
        ];
        sort_by_specificity(&mut routes);
        assert_eq!(routes[0].pathname(), "/u/members/of/staff");
    }

    #[test]
    fn test_first_specific_match() {
        let mut routes = vec![
            Route::from_name("get_$id", "/users").unwrap(),
            Route::from_name("get_admins", "/users").unwrap(),
        ];
        sort_by_specificity(&mut routes);
        // Walking in order, /users/admins hits the literal route first
        let hit = routes
            .iter()
            .find(|r| r.pattern.matches("/users/admins").is_some())
            .unwrap();
        assert_eq!(hit.pathname(), "/users/admins");
    }
}
