//! Dot-path resolution into JSON values.

use serde_json::Value;

use crate::constants::PATH_SEPARATOR;

/// Resolves a dot-path such as `searchParams.query` against a value.
///
/// Object segments are looked up by key and array segments by index.
/// Returns `None` as soon as a segment cannot be resolved. An empty path
/// resolves to the value itself.
#[must_use]
pub fn resolve_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }

    path.split(PATH_SEPARATOR).try_fold(value, |current, segment| match current {
        Value::Object(object) => object.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}
