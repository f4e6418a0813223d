//! Legacy-shape normalization.
//!
//! Two historical token layouts exist (singular `color`/`size`/`opacity`
//! and the current plural keys) and two brand layouts (`brand.<mode>` and
//! `brand.themes.<mode>`). Both are accepted here, once, and rewritten to
//! the current layout. Nothing downstream reads the legacy spelling.

use crate::codec::plural_category;
use serde_json::{Map, Value, json};

pub const MODES: [&str; 2] = ["light", "dark"];

/// The object under `key` if present, else `doc` itself when it is an object.
fn rooted<'a>(doc: &'a Value, key: &str) -> Option<&'a Map<String, Value>> {
    doc.get(key)
        .and_then(Value::as_object)
        .or_else(|| doc.as_object().filter(|map| !map.contains_key(key)))
}

/// Merge `incoming` into `target` without overwriting existing keys.
fn merge_missing(target: &mut Map<String, Value>, incoming: &Map<String, Value>) {
    for (key, value) in incoming {
        if !target.contains_key(key) {
            target.insert(key.clone(), value.clone());
            continue;
        }
        if let (Some(Value::Object(existing)), Value::Object(nested)) = (target.get_mut(key), value)
        {
            merge_missing(existing, nested);
        }
    }
}

fn pluralize_keys(map: &Map<String, Value>) -> Map<String, Value> {
    let mut plural: Map<String, Value> = Map::new();
    // Plural spellings first so they take precedence over legacy entries.
    let (current, legacy): (Vec<_>, Vec<_>) = map
        .iter()
        .partition(|(key, _)| plural_category(key) == **key);
    for (key, value) in current.into_iter().chain(legacy) {
        let target = plural_category(key);
        if !plural.contains_key(&target) {
            plural.insert(target, value.clone());
            continue;
        }
        if let (Some(Value::Object(existing)), Value::Object(incoming)) =
            (plural.get_mut(&target), value)
        {
            merge_missing(existing, incoming);
        }
    }
    plural
}

/// Rewrite a token document into the current plural layout rooted at `tokens`.
pub fn normalize_tokens(doc: &Value) -> Value {
    let Some(root) = rooted(doc, "tokens") else {
        return json!({ "tokens": {} });
    };
    let mut tokens = pluralize_keys(root);
    if let Some(Value::Object(font)) = tokens.get("font") {
        let font = pluralize_keys(font);
        tokens.insert("font".into(), Value::Object(font));
    }
    json!({ "tokens": Value::Object(tokens) })
}

fn normalize_layers(theme: &mut Map<String, Value>) {
    let layers = theme
        .remove("layers")
        .or_else(|| theme.remove("layer"));
    let Some(Value::Object(layers)) = layers else {
        return;
    };
    let mut normalized = Map::new();
    for (key, value) in layers {
        let index = key.strip_prefix("layer-").unwrap_or(&key).to_string();
        normalized.entry(index).or_insert(value);
    }
    theme.insert("layers".into(), Value::Object(normalized));
}

/// Rewrite a brand document into `brand.themes.<mode>` with numeric layer keys.
pub fn normalize_brand(doc: &Value) -> Value {
    let Some(root) = rooted(doc, "brand") else {
        return json!({ "brand": { "themes": {} } });
    };
    let mut brand = root.clone();
    let mut themes = match brand.remove("themes") {
        Some(Value::Object(themes)) => themes,
        _ => Map::new(),
    };
    for mode in MODES {
        if let Some(legacy) = brand.remove(mode) {
            themes.entry(mode.to_string()).or_insert(legacy);
        }
    }
    for theme in themes.values_mut() {
        if let Some(theme) = theme.as_object_mut() {
            normalize_layers(theme);
        }
    }
    brand.insert("themes".into(), Value::Object(themes));
    json!({ "brand": Value::Object(brand) })
}

/// Wrap a UIKit document so it is rooted at `ui-kit`.
pub fn normalize_uikit(doc: &Value) -> Value {
    match rooted(doc, "ui-kit") {
        Some(root) => json!({ "ui-kit": Value::Object(root.clone()) }),
        None => json!({ "ui-kit": {} }),
    }
}
