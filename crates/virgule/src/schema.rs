// File: src/schema.rs
// Purpose: Explicit parameter descriptors declared alongside each handler

use serde_json::Value;

use crate::error::Error;
use crate::infer;

/// Reserved parameter names, excluded from path/query resolution and
/// populated by dedicated extraction steps.
pub const BODY: &str = "$body";
pub const REQUEST: &str = "$request";
pub const USER: &str = "$user";

pub fn is_reserved(name: &str) -> bool {
    name == BODY || name == REQUEST || name == USER
}

/// One declared handler parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    /// Type descriptor, e.g. `number`, `string`, `unknown`, `{a:number}`
    pub kind: String,
    pub default: Option<Value>,
    pub required: bool,
}

/// An ordered parameter schema for one handler.
///
/// Property order is the positional invocation order: validated values
/// are handed to the handler as a `Vec` in exactly this order.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    id: String,
    props: Vec<Property>,
}

impl Schema {
    pub fn builder(id: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            id: id.into(),
            props: Vec::new(),
        }
    }

    /// An empty schema for handlers that take no parameters.
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            props: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn props(&self) -> &[Property] {
        &self.props
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Property> {
        self.props.iter().find(|p| p.name == name)
    }

    pub fn declares(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// Converts a declared parameter name to its request-side alias:
/// `user_name` and `userName` both answer to `user-name`.
pub fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, ch) in name.chars().enumerate() {
        if ch == '_' {
            out.push('-');
        } else if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Builds a [`Schema`], validated once at registration.
///
/// Two idioms cover the two historical declaration styles: give a
/// parameter an explicit type text, or give it a default value and let
/// [`infer::type_of`] derive the type. A parameter with neither a
/// default nor an `optional` declaration is required.
#[derive(Debug)]
pub struct SchemaBuilder {
    id: String,
    props: Vec<Property>,
}

impl SchemaBuilder {
    /// Required parameter with an explicit type.
    pub fn param(mut self, name: impl Into<String>, kind: impl Into<String>) -> Self {
        self.props.push(Property {
            name: name.into(),
            kind: kind.into(),
            default: None,
            required: true,
        });
        self
    }

    /// Parameter with a default value; the type is inferred from it.
    pub fn param_default(mut self, name: impl Into<String>, default: Value) -> Self {
        let kind = infer::type_of(&default, true);
        self.props.push(Property {
            name: name.into(),
            kind,
            default: Some(default),
            required: false,
        });
        self
    }

    /// Parameter with both an explicit type and a default value.
    pub fn param_default_as(
        mut self,
        name: impl Into<String>,
        kind: impl Into<String>,
        default: Value,
    ) -> Self {
        self.props.push(Property {
            name: name.into(),
            kind: kind.into(),
            default: Some(default),
            required: false,
        });
        self
    }

    /// Optional parameter without a default: absent resolves to null.
    pub fn optional(mut self, name: impl Into<String>, kind: impl Into<String>) -> Self {
        self.props.push(Property {
            name: name.into(),
            kind: kind.into(),
            default: None,
            required: false,
        });
        self
    }

    /// Declares the `$body` parameter (decoded request body).
    pub fn body(self) -> Self {
        self.reserved(BODY)
    }

    /// Declares the `$request` parameter (structured request facts).
    pub fn request(self) -> Self {
        self.reserved(REQUEST)
    }

    /// Declares the `$user` parameter (resolved current user).
    pub fn user(self) -> Self {
        self.reserved(USER)
    }

    fn reserved(mut self, name: &str) -> Self {
        self.props.push(Property {
            name: name.to_string(),
            kind: infer::UNKNOWN.to_string(),
            default: None,
            required: false,
        });
        self
    }

    pub fn build(self) -> Result<Schema, Error> {
        if self.id.is_empty() {
            return Err(Error::Configuration("schema id must not be empty".into()));
        }
        for (i, prop) in self.props.iter().enumerate() {
            if self.props[..i].iter().any(|p| p.name == prop.name) {
                return Err(Error::Configuration(format!(
                    "schema '{}': duplicate parameter '{}'",
                    self.id, prop.name
                )));
            }
            if is_reserved(&prop.name) && prop.default.is_some() {
                return Err(Error::Configuration(format!(
                    "schema '{}': reserved parameter '{}' cannot carry a default",
                    self.id, prop.name
                )));
            }
        }
        Ok(Schema {
            id: self.id,
            props: self.props,
        })
    }
}
