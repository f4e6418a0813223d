//! Path-based accessors over `serde_json::Value`.
//!
//! Every lookup returns an `Option` so call sites handle the absent case
//! explicitly instead of chaining index operators.

use serde_json::{Map, Value};

/// Follow `path` from `root`, one object key per segment.
pub fn get_path<'a, S: AsRef<str>>(root: &'a Value, path: &[S]) -> Option<&'a Value> {
    path.iter()
        .try_fold(root, |node, segment| node.as_object()?.get(segment.as_ref()))
}

pub fn get_str<'a, S: AsRef<str>>(root: &'a Value, path: &[S]) -> Option<&'a str> {
    get_path(root, path).and_then(Value::as_str)
}

pub fn get_object<'a, S: AsRef<str>>(
    root: &'a Value,
    path: &[S],
) -> Option<&'a Map<String, Value>> {
    get_path(root, path).and_then(Value::as_object)
}

/// Write `value` at `path`, creating intermediate objects.
///
/// Returns `false` (and writes nothing) when an intermediate segment
/// already holds a non-object value.
pub fn set_path<S: AsRef<str>>(root: &mut Value, path: &[S], value: Value) -> bool {
    let Some((last, parents)) = path.split_last() else {
        *root = value;
        return true;
    };
    let mut node = root;
    for segment in parents {
        if node.is_null() {
            *node = Value::Object(Map::new());
        }
        let Some(object) = node.as_object_mut() else {
            return false;
        };
        node = object
            .entry(segment.as_ref().to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    if node.is_null() {
        *node = Value::Object(Map::new());
    }
    match node.as_object_mut() {
        Some(object) => {
            object.insert(last.as_ref().to_string(), value);
            true
        }
        None => false,
    }
}

/// The `$value` of a token leaf, or the node itself when it is a bare scalar.
pub fn leaf_value(node: &Value) -> Option<&Value> {
    match node {
        Value::Object(map) => map.get("$value"),
        Value::Array(_) => None,
        other => Some(other),
    }
}

/// Whether `node` is a token leaf (`{$value: ...}` or a bare scalar).
pub fn is_leaf(node: &Value) -> bool {
    match node {
        Value::Object(map) => map.contains_key("$value"),
        Value::Array(_) => false,
        _ => true,
    }
}

/// CSS-ready text for a scalar leaf value.
///
/// `{value, unit}` dimensions are joined (`16px`), string arrays become a
/// comma-separated list, `null` has no display.
pub fn display_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Object(map) => {
            let number = map.get("value")?;
            let unit = map.get("unit").and_then(Value::as_str).unwrap_or("");
            Some(format!("{}{unit}", display_scalar(number)?))
        }
        Value::Array(items) => {
            let parts: Option<Vec<String>> = items.iter().map(display_scalar).collect();
            parts.filter(|parts| !parts.is_empty()).map(|parts| parts.join(", "))
        }
        Value::Null => None,
    }
}

/// Visit every leaf beneath `root` with its path, in key order.
///
/// Keys starting with `$` on non-leaf objects (`$metadata`, `$schema`) are
/// not descended into.
pub fn walk_leaves<'a>(root: &'a Value, mut visit: impl FnMut(&[String], &'a Value)) {
    fn walk<'a>(
        node: &'a Value,
        path: &mut Vec<String>,
        visit: &mut dyn FnMut(&[String], &'a Value),
    ) {
        if is_leaf(node) {
            if !path.is_empty() {
                visit(path, node);
            }
            return;
        }
        let Some(map) = node.as_object() else {
            return;
        };
        for (key, child) in map {
            if key.starts_with('$') {
                continue;
            }
            path.push(key.clone());
            walk(child, path, visit);
            path.pop();
        }
    }
    let mut path = Vec::new();
    walk(root, &mut path, &mut visit);
}

/// Apply `f` to every string beneath `root`, in place.
pub fn map_strings(root: &mut Value, f: &impl Fn(&str) -> String) {
    match root {
        Value::String(s) => *s = f(s),
        Value::Array(items) => items.iter_mut().for_each(|item| map_strings(item, f)),
        Value::Object(map) => map.values_mut().for_each(|item| map_strings(item, f)),
        _ => {}
    }
}

/// Collect `(path, string)` for every string beneath `root` matching `pred`.
pub fn find_strings(root: &Value, pred: &impl Fn(&str) -> bool) -> Vec<(String, String)> {
    fn walk(
        node: &Value,
        path: &mut Vec<String>,
        pred: &dyn Fn(&str) -> bool,
        out: &mut Vec<(String, String)>,
    ) {
        match node {
            Value::String(s) if pred(s) => out.push((path.join("."), s.clone())),
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    path.push(index.to_string());
                    walk(item, path, pred, out);
                    path.pop();
                }
            }
            Value::Object(map) => {
                for (key, item) in map {
                    path.push(key.clone());
                    walk(item, path, pred, out);
                    path.pop();
                }
            }
            _ => {}
        }
    }
    let mut out = Vec::new();
    walk(root, &mut Vec::new(), pred, &mut out);
    out
}

/// Remove objects left empty after pruning, bottom-up.
///
/// Returns `true` when `node` itself ended up empty.
pub fn prune_empty(node: &mut Value) -> bool {
    let Some(map) = node.as_object_mut() else {
        return false;
    };
    map.retain(|_, child| !(child.is_object() && prune_empty(child)));
    map.is_empty()
}
