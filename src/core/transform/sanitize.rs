//! Cell sanitization for the tabular report

use serde_json::Value;

/// Normalize a string cell
///
/// The exact literals `"None"` and `"null"` become `""`. Anything else has
/// carriage returns and newlines replaced by single spaces and is trimmed,
/// so a padded `" None "` keeps its text.
pub fn sanitize_str(raw: &str) -> String {
    if matches!(raw, "None" | "null") {
        return String::new();
    }
    raw.replace(['\n', '\r'], " ").trim().to_string()
}

/// Normalize an arbitrary JSON value into a cell
///
/// `null`, empty lists and empty mappings become `""`. Non-empty structures
/// are rendered as compact JSON before string normalization.
pub fn sanitize_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => sanitize_str(s),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) if items.is_empty() => String::new(),
        Value::Object(map) if map.is_empty() => String::new(),
        Value::Array(_) | Value::Object(_) => {
            sanitize_str(&serde_json::to_string(value).unwrap_or_default())
        }
    }
}
