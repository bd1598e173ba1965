//! Compiled path patterns
//!
//! A [`PathPattern`] is built once from a base path plus the classified
//! tokens of a handler name, then matched against request paths. Matching
//! walks segments pairwise; leading, trailing and doubled slashes in the
//! request path are tolerated.

use crate::name::NameToken;

/// One compiled pattern segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Exact text match (may contain a `.` from a dot-join)
    Literal(String),
    /// Named capture, optionally with a literal `.ext` tail
    Capture {
        name: String,
        suffix: Option<String>,
    },
}

/// A compiled route pattern: ordered segments plus the rendered pathname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<Segment>,
    pathname: String,
    capture_count: usize,
}

impl PathPattern {
    /// Compiles a pattern from a base path and name tokens.
    ///
    /// The base contributes literal segments; tokens are appended after
    /// it. An [`NameToken::Extension`] does not open a new segment, it
    /// rewrites the previous one (`report` + `csv` → `report.csv`, and
    /// `:name` + `txt` → `:name.txt`).
    pub fn compile(base: &str, tokens: &[NameToken]) -> Self {
        let mut segments: Vec<Segment> = base
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| Segment::Literal(s.to_string()))
            .collect();

        for token in tokens {
            match token {
                NameToken::Literal(text) => segments.push(Segment::Literal(text.clone())),
                NameToken::Capture(name) => segments.push(Segment::Capture {
                    name: name.clone(),
                    suffix: None,
                }),
                NameToken::Extension(ext) => match segments.last_mut() {
                    Some(Segment::Literal(text)) => {
                        text.push('.');
                        text.push_str(ext);
                    }
                    Some(Segment::Capture { suffix, .. }) => {
                        *suffix = Some(format!(".{ext}"));
                    }
                    // Extension with nothing before it: a dotted literal
                    None => segments.push(Segment::Literal(format!(".{ext}"))),
                },
            }
        }

        let rendered: Vec<String> = segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.clone(),
                Segment::Capture { name, suffix } => match suffix {
                    Some(tail) => format!(":{name}{tail}"),
                    None => format!(":{name}"),
                },
            })
            .collect();
        let pathname = if rendered.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", rendered.join("/"))
        };
        let capture_count = segments
            .iter()
            .filter(|s| matches!(s, Segment::Capture { .. }))
            .count();

        Self {
            segments,
            pathname,
            capture_count,
        }
    }

    /// Matches a request path, returning captures in declaration order.
    ///
    /// Capture values are the raw path text; percent-decoding is the
    /// caller's concern. An empty capture never matches.
    pub fn matches(&self, path: &str) -> Option<Vec<(String, String)>> {
        let given: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if given.len() != self.segments.len() {
            return None;
        }

        let mut captures = Vec::with_capacity(self.capture_count);
        for (segment, part) in self.segments.iter().zip(given) {
            match segment {
                Segment::Literal(text) => {
                    if text != part {
                        return None;
                    }
                }
                Segment::Capture { name, suffix } => {
                    let value = match suffix {
                        Some(tail) => part.strip_suffix(tail.as_str())?,
                        None => part,
                    };
                    if value.is_empty() {
                        return None;
                    }
                    captures.push((name.clone(), value.to_string()));
                }
            }
        }
        Some(captures)
    }

    /// The rendered pathname, e.g. `/users/:id`.
    pub fn pathname(&self) -> &str {
        &self.pathname
    }

    /// Number of named captures in this pattern.
    pub fn capture_count(&self) -> usize {
        self.capture_count
    }

    /// The compiled segments, in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::parse_route_name;

    fn compile(base: &str, name: &str) -> PathPattern {
        let (_, tokens) = parse_route_name(name).unwrap();
        PathPattern::compile(base, &tokens)
    }

    #[test]
    fn test_pathname_rendering() {
        assert_eq!(compile("/users", "get").pathname(), "/users");
        assert_eq!(compile("/users", "get_$id").pathname(), "/users/:id");
        assert_eq!(compile("/users", "get_admins").pathname(), "/users/admins");
        assert_eq!(compile("", "get").pathname(), "/");
    }

    #[test]
    fn test_pathname_with_extension() {
        assert_eq!(
            compile("/files", "get_report__csv").pathname(),
            "/files/report.csv"
        );
        assert_eq!(
            compile("/files", "get_$name__txt").pathname(),
            "/files/:name.txt"
        );
    }

    #[test]
    fn test_literal_match() {
        let pattern = compile("/users", "get_admins");
        assert_eq!(pattern.matches("/users/admins"), Some(vec![]));
        assert_eq!(pattern.matches("/users/other"), None);
        assert_eq!(pattern.matches("/users"), None);
    }

    #[test]
    fn test_capture_match() {
        let pattern = compile("/users", "get_$id");
        assert_eq!(
            pattern.matches("/users/42"),
            Some(vec![("id".to_string(), "42".to_string())])
        );
        assert_eq!(pattern.matches("/users/42/extra"), None);
    }

    #[test]
    fn test_trailing_slash_tolerated() {
        let pattern = compile("/users", "get_$id");
        assert!(pattern.matches("/users/42/").is_some());
        assert!(pattern.matches("//users//42").is_some());
    }

    #[test]
    fn test_extension_suffix_match() {
        let pattern = compile("/files", "get_$name__txt");
        assert_eq!(
            pattern.matches("/files/readme.txt"),
            Some(vec![("name".to_string(), "readme".to_string())])
        );
        assert_eq!(pattern.matches("/files/readme.csv"), None);
        // A bare ".txt" has no capture text left
        assert_eq!(pattern.matches("/files/.txt"), None);
    }

    #[test]
    fn test_root_pattern() {
        let pattern = compile("", "get");
        assert_eq!(pattern.matches("/"), Some(vec![]));
        assert_eq!(pattern.matches("/anything"), None);
    }

    #[test]
    fn test_capture_counts() {
        assert_eq!(compile("/users", "get").capture_count(), 0);
        assert_eq!(compile("/users", "get_$id").capture_count(), 1);
        assert_eq!(compile("/a", "get_$x_$y").capture_count(), 2);
    }
}
