//! JSON utility functions
//!
//! Helpers for reading loosely-typed record values. Records are plain
//! `serde_json::Value` documents, so every comparison goes through these
//! coercions instead of assuming a concrete shape.

use serde_json::Value as JsonValue;

/// Resolve a dot-separated attribute path on a record.
///
/// Returns `None` when any segment is missing or an intermediate value is
/// not an object (`assigned_to.first_name` on a record without
/// `assigned_to`). A present-but-null leaf resolves to `Some(Null)`.
pub fn resolve_path<'a>(record: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let mut current = record;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Whether a value counts as "not provided".
///
/// Missing, null, the empty string, and the empty array are blank.
pub fn is_blank(value: Option<&JsonValue>) -> bool {
    match value {
        None | Some(JsonValue::Null) => true,
        Some(JsonValue::String(s)) => s.is_empty(),
        Some(JsonValue::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Whether a record value is absent: missing, null, or the empty string.
///
/// Narrower than [`is_blank`]: an empty array is a present value.
pub fn is_missing(value: Option<&JsonValue>) -> bool {
    match value {
        None | Some(JsonValue::Null) => true,
        Some(JsonValue::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Whether a value is falsy: blank, `false`, or numeric zero.
pub fn is_falsy(value: Option<&JsonValue>) -> bool {
    match value {
        Some(JsonValue::Bool(b)) => !b,
        Some(JsonValue::Number(n)) => n.as_f64() == Some(0.0),
        other => is_blank(other),
    }
}

/// Render a value as text for string comparisons.
///
/// Missing and null values render as the empty string; strings are used
/// verbatim (no surrounding quotes).
pub fn value_as_text(value: Option<&JsonValue>) -> String {
    match value {
        None | Some(JsonValue::Null) => String::new(),
        Some(JsonValue::String(s)) => s.clone(),
        Some(JsonValue::Number(n)) => n.to_string(),
        Some(JsonValue::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Coerce a value to a number. Numeric strings are accepted.
pub fn value_as_f64(value: &JsonValue) -> Option<f64> {
    match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Coerce a value to a boolean. Accepts `true`/`false`, their string
/// spellings, and `1`/`0`.
pub fn value_as_bool(value: &JsonValue) -> Option<bool> {
    match value {
        JsonValue::Bool(b) => Some(*b),
        JsonValue::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        JsonValue::Number(n) => match n.as_f64() {
            Some(v) if v == 1.0 => Some(true),
            Some(v) if v == 0.0 => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// View a value as a list, wrapping a bare scalar into a single-item slice.
pub fn value_as_list(value: &JsonValue) -> Vec<&JsonValue> {
    match value {
        JsonValue::Array(items) => items.iter().collect(),
        JsonValue::Null => Vec::new(),
        scalar => vec![scalar],
    }
}
