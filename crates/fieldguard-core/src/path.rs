use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::value::is_empty;

static BRACKET_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\w+)\]").expect("bracket segment pattern is valid"));

/// Rewrite `a.b[2].c` into `a.b.2.c` and drop a leading dot.
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    let dotted = BRACKET_SEGMENT.replace_all(path, ".$1");
    match dotted {
        Cow::Borrowed(s) => Cow::Borrowed(s.strip_prefix('.').unwrap_or(s)),
        Cow::Owned(s) => match s.strip_prefix('.') {
            Some(rest) => Cow::Owned(rest.to_string()),
            None => Cow::Owned(s),
        },
    }
}

/// Resolve a dot/bracket path against a record.
///
/// Returns `None` as soon as a segment is missing or the current node is
/// `null` or a scalar. Array nodes are indexed by numeric segments.
pub fn resolve_path<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let normalized = normalize_path(path);
    let mut current = record;
    for segment in normalized.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Like [`resolve_path`], falling back to `default` when the path is absent.
pub fn resolve_path_or<'a>(record: &'a Value, path: &str, default: &'a Value) -> &'a Value {
    resolve_path(record, path).unwrap_or(default)
}

/// Whether the value at `path` is present and non-empty.
pub fn is_present(record: &Value, path: &str) -> bool {
    !is_empty(resolve_path(record, path))
}
