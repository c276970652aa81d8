//! Dotted-key access into nested dictionary values.

use serde_json::Value;

/// Resolve a dot-delimited `path` against `value`.
///
/// A segment made only of ASCII digits indexes a sequence; any other
/// segment indexes a mapping by key. Numeric segments applied to a mapping
/// look up the stringified key, which is where integer YAML keys end up.
/// Resolution stops with `None` as soon as a segment is absent, hits a
/// scalar, or reaches an explicit null.
///
/// ```ignore
/// access(&json!({"a": {"b": 5}}), "a.b")  -> Some(5)
/// access(&json!({"a": [10, 20]}), "a.1")  -> Some(20)
/// access(&json!({"a": 1}), "a.b")         -> None
/// ```
pub fn access<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;

    for segment in path.split('.') {
        let next = match (as_index(segment), current) {
            (Some(index), Value::Array(items)) => items.get(index),
            (_, Value::Object(map)) => map.get(segment),
            _ => None,
        }?;

        if next.is_null() {
            return None;
        }
        current = next;
    }

    Some(current)
}

/// Parse a segment as a non-negative base-10 index with no extra characters.
fn as_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}
