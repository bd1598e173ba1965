//! Naming-convention tokenizer
//!
//! Handler names encode routes. The grammar is `METHOD('_' token)*`:
//! the first token must be an HTTP method (case-insensitive), every
//! following token becomes a path segment. A leading `$` marks a named
//! capture; a `__` (double underscore) immediately before a token joins
//! it to the previous segment with a literal `.` instead of `/`.
//!
//! All functions here are pure: same input, same output, no side effects.
//!
//! # Examples
//!
//! ```
//! use virgule_router::name::{parse_route_name, HttpMethod, NameToken};
//!
//! let (method, tokens) = parse_route_name("get_$id").unwrap();
//! assert_eq!(method, HttpMethod::Get);
//! assert_eq!(tokens, vec![NameToken::Capture("id".to_string())]);
//!
//! // Not a route: first token is not an HTTP method
//! assert!(parse_route_name("helper").is_none());
//! ```

/// The HTTP methods a handler name may start with.
///
/// Anything else makes the name a non-route (a plain helper member).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Delete,
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
}

impl HttpMethod {
    /// Parses a name token into a method, comparing uppercased.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_uppercase().as_str() {
            "DELETE" => Some(Self::Delete),
            "GET" => Some(Self::Get),
            "HEAD" => Some(Self::Head),
            "OPTIONS" => Some(Self::Options),
            "PATCH" => Some(Self::Patch),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            _ => None,
        }
    }

    /// Canonical uppercase form, as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delete => "DELETE",
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Patch => "PATCH",
            Self::Post => "POST",
            Self::Put => "PUT",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified token from a handler name (everything after the method).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameToken {
    /// Plain text, becomes a literal path segment
    Literal(String),
    /// `$name`, becomes a named path capture
    Capture(String),
    /// `__ext`, joined to the previous segment with a literal `.`
    ///
    /// Extension tokens are always literal; a capture marker after a
    /// dot-join is not part of the grammar.
    Extension(String),
}

/// Decodes a handler name into an HTTP method plus classified tokens.
///
/// Returns `None` when the first token is not one of the seven HTTP
/// methods; callers skip such members silently, they are not routes.
///
/// Splitting on `_` turns the `__` marker into an empty token, which
/// flags the *next* token as an `Extension` (dot-joined).
pub fn parse_route_name(name: &str) -> Option<(HttpMethod, Vec<NameToken>)> {
    let mut parts = name.split('_');
    let method = HttpMethod::from_token(parts.next()?)?;

    let mut tokens = Vec::new();
    let mut dot_pending = false;
    for part in parts {
        if part.is_empty() {
            dot_pending = true;
            continue;
        }
        let token = if dot_pending {
            NameToken::Extension(part.to_string())
        } else if let Some(capture) = part.strip_prefix('$') {
            NameToken::Capture(capture.to_string())
        } else {
            NameToken::Literal(part.to_string())
        };
        dot_pending = false;
        tokens.push(token);
    }

    Some((method, tokens))
}
