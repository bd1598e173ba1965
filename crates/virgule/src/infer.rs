// File: src/infer.rs
// Purpose: Runtime type inference over JSON values

use serde_json::Value;

/// Type descriptor for an absent value, and the fallback everywhere a
/// more precise descriptor cannot be produced.
pub const UNKNOWN: &str = "unknown";

/// Maps a runtime value to a normalized type-descriptor string.
///
/// Rules, in order: null → `"null"`, scalars → their primitive name,
/// arrays → the element type set (`number[]`, `(number|string)[]`,
/// `unknown[]` when empty), objects → `{key:type,...}` with keys sorted.
///
/// With `full_types` off, a heterogeneous array collapses to
/// `"unknown[]"` and an object degrades to the literal `"object"`.
pub fn type_of(value: &Value, full_types: bool) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::String(_) => "string".to_string(),
        Value::Array(items) => array_type(items, full_types),
        Value::Object(map) => {
            if !full_types {
                return "object".to_string();
            }
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let fields: Vec<String> = entries
                .iter()
                .map(|(key, value)| format!("{}:{}", key, type_of(value, full_types)))
                .collect();
            format!("{{{}}}", fields.join(","))
        }
    }
}

/// Like [`type_of`], treating an absent value as `"unknown"`.
pub fn type_of_opt(value: Option<&Value>, full_types: bool) -> String {
    match value {
        Some(value) => type_of(value, full_types),
        None => UNKNOWN.to_string(),
    }
}

fn array_type(items: &[Value], full_types: bool) -> String {
    let mut distinct: Vec<String> = Vec::new();
    for item in items {
        let ty = type_of(item, full_types);
        if !distinct.contains(&ty) {
            distinct.push(ty);
        }
    }
    match distinct.len() {
        0 => format!("{UNKNOWN}[]"),
        1 => format!("{}[]", distinct[0]),
        _ if !full_types => format!("{UNKNOWN}[]"),
        _ => {
            distinct.sort();
            format!("({})[]", distinct.join("|"))
        }
    }
}
