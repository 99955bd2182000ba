//! Dotted/indexed path resolution against nested records
//!
//! Paths use `.` for nesting and `name[idx]` for list indexing, e.g.
//! `cluster.k8s.pod.controller[0].name`. Resolution is total: anything that
//! doesn't resolve cleanly yields an empty string instead of an error, since a
//! single malformed field in third-party data must not abort extraction.

use serde_json::Value;

/// Resolve `path` against `record` and render the result as a string
///
/// - absent keys, out-of-range indices, non-list targets of an index and
///   malformed segments all yield `""`
/// - `null` (or the literal string `"null"`) at any step yields `""`
/// - a structured leaf (list or mapping) is rendered as compact JSON
///
/// # Examples
///
/// ```
/// use weekly_inventory::core::transform::resolve_path;
/// use serde_json::json;
///
/// let record = json!({"cluster": {"k8s": {"pod": {"controller": [{"name": "web"}]}}}});
/// assert_eq!(resolve_path(&record, "cluster.k8s.pod.controller[0].name"), "web");
/// assert_eq!(resolve_path(&record, "cluster.k8s.pod.controller[3].name"), "");
/// ```
pub fn resolve_path(record: &Value, path: &str) -> String {
    lookup(record, path).map(render).unwrap_or_default()
}

/// Walk `path` segment by segment, short-circuiting on the first miss
pub(crate) fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = record;

    for segment in path.split('.') {
        let (key, indices) = parse_segment(segment)?;

        current = current.as_object()?.get(key)?;
        for index in indices {
            current = current.as_array()?.get(index)?;
        }

        if is_null_like(current) {
            return None;
        }
    }

    Some(current)
}

/// Split `name[0][1]` into `("name", [0, 1])`
fn parse_segment(segment: &str) -> Option<(&str, Vec<usize>)> {
    let Some(open) = segment.find('[') else {
        return Some((segment, Vec::new()));
    };

    let key = &segment[..open];
    let mut indices = Vec::new();
    let mut rest = &segment[open..];

    while !rest.is_empty() {
        let inner = rest.strip_prefix('[')?;
        let close = inner.find(']')?;
        indices.push(inner[..close].trim().parse().ok()?);
        rest = &inner[close + 1..];
    }

    Some((key, indices))
}

fn is_null_like(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s == "null",
        _ => false,
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
