//! Rebuild nested token, brand, and UIKit documents for export.
//!
//! ```text
//! store tokens ──┐
//!                ├─ reconstruct_tokens ─→ { tokens: … }        (store wins, CSS fills gaps)
//! active vars ───┘
//! store theme ───── reconstruct_brand ──→ { brand: … }         (theme qualifiers stripped)
//! store uikit ───── reconstruct_uikit ──→ { ui-kit: … }        (theme qualifiers stripped)
//! ```
//!
//! A token value that cannot be coerced is skipped and reported in
//! [`TokenReconstruction::skipped`]; its siblings are still exported.

use recursica_kernel::codec::{Category, internal_name_to_path, path_to_reference};
use recursica_kernel::json_path::{
    find_strings, get_path, map_strings, prune_empty, set_path, walk_leaves,
};
use recursica_kernel::projection::project_value;
use recursica_kernel::resolver::var_reference;
use recursica_kernel::{
    Hex, normalize_brand, normalize_tokens, normalize_uikit, path_to_internal_name,
};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Number, Value, json};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static DIMENSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-?\d+(?:\.\d+)?)(px|rem|em|%)?$").expect("dimension pattern")
});

static ALPHA_HEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#?([0-9a-fA-F]{8})$").expect("alpha hex pattern"));

static RGB_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^rgba?\(\s*[0-9.%\s,/]+\)$").expect("rgb function pattern")
});

/// Any brand reference still carrying a mode, current or legacy spelling.
static THEME_QUALIFIED_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{brand\.(?:themes\.)?(?:light|dark)\.").expect("theme reference pattern")
});

/// The post-normalization leak pattern.
static THEME_LEAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{brand\.themes\.(?:light|dark)\.").expect("theme leak pattern")
});

/// Sentinel entries every token export carries, with a `null` value.
pub const TOKEN_SENTINELS: [[&str; 3]; 2] = [
    ["font", "cases", "original"],
    ["font", "decorations", "none"],
];

/// The `$metadata` block attached to exported documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub exported_at: String,
    pub version: String,
}

pub fn attach_metadata(doc: &mut Value, metadata: &ExportMetadata) {
    if let Some(root) = doc.as_object_mut() {
        root.insert(
            "$metadata".to_string(),
            json!({ "exportedAt": metadata.exported_at, "version": metadata.version }),
        );
    }
}

/// How a token value is coerced, by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Color,
    Dimension,
    Opacity,
    Number,
    Text,
}

impl ValueKind {
    /// Kind for a path relative to `tokens`.
    pub fn for_path<S: AsRef<str>>(path: &[S]) -> Self {
        let segments: Vec<&str> = path.iter().map(AsRef::as_ref).collect();
        match segments.as_slice() {
            ["colors", ..] => ValueKind::Color,
            ["sizes", ..] => ValueKind::Dimension,
            ["opacities", ..] => ValueKind::Opacity,
            ["font", "sizes" | "letter-spacings", ..] => ValueKind::Dimension,
            ["font", "weights" | "line-heights", ..] => ValueKind::Number,
            _ => ValueKind::Text,
        }
    }

    fn for_type(type_name: &str) -> Option<Self> {
        match type_name {
            "color" => Some(ValueKind::Color),
            "dimension" => Some(ValueKind::Dimension),
            "number" | "fontWeight" => Some(ValueKind::Number),
            _ => None,
        }
    }

    /// `$type` written on entries that lack one; `path` is relative to `tokens`.
    fn type_name(self, path: &[String]) -> &'static str {
        let font_category = match path {
            [font, category, ..] if font == "font" => Some(category.as_str()),
            _ => None,
        };
        match (self, font_category) {
            (ValueKind::Color, _) => "color",
            (ValueKind::Dimension, _) => "dimension",
            (ValueKind::Opacity, _) => "number",
            (ValueKind::Number, Some("weights")) => "fontWeight",
            (ValueKind::Number, _) => "number",
            (ValueKind::Text, Some("typefaces")) => "fontFamily",
            (ValueKind::Text, _) => "string",
        }
    }
}

/// A token entry left out of the export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedToken {
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenReconstruction {
    pub document: Value,
    pub skipped: Vec<SkippedToken>,
}

fn number_value(n: f64) -> Result<Value, String> {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        return Ok(Value::from(n as i64));
    }
    Number::from_f64(n)
        .map(Value::Number)
        .ok_or_else(|| format!("not a finite number: {n}"))
}

/// `var(--recursica-…)` → `{path.to.token}`.
fn var_to_reference(text: &str) -> Option<String> {
    let name = var_reference(text)?;
    let path = internal_name_to_path(name);
    (!path.is_empty()).then(|| path_to_reference(&path))
}

fn is_reference(text: &str) -> bool {
    text.starts_with('{') && text.ends_with('}')
}

/// Shared handling for reference-shaped strings; `None` when `text` is not one.
fn coerce_reference(text: &str) -> Option<Result<Value, String>> {
    if is_reference(text) {
        return Some(Ok(Value::String(text.to_string())));
    }
    if text.starts_with("var(") {
        return Some(
            var_to_reference(text)
                .map(Value::String)
                .ok_or_else(|| format!("unrecognized variable reference: {text}")),
        );
    }
    None
}

/// A color literal in export form: `#rrggbb` or `#rrggbbaa` lowercased,
/// `rgb()`/`rgba()` kept as written.
pub fn color_literal(text: &str) -> Option<String> {
    let text = text.trim();
    if let Some(hex) = Hex::parse(text) {
        return Some(hex.to_string());
    }
    if let Some(caps) = ALPHA_HEX.captures(text) {
        return Some(format!("#{}", caps[1].to_ascii_lowercase()));
    }
    RGB_FUNCTION.is_match(text).then(|| text.to_string())
}

fn coerce_color(value: &Value) -> Result<Value, String> {
    let text = value
        .as_str()
        .ok_or_else(|| format!("expected a color string, got {value}"))?
        .trim();
    if let Some(color) = color_literal(text) {
        return Ok(Value::String(color));
    }
    coerce_reference(text).unwrap_or_else(|| Err(format!("not a color: {text}")))
}

fn coerce_dimension(value: &Value) -> Result<Value, String> {
    match value {
        Value::Object(map) if map.contains_key("value") => Ok(value.clone()),
        Value::Number(_) => Ok(json!({ "value": value, "unit": "px" })),
        Value::String(text) => {
            let text = text.trim();
            if let Some(reference) = coerce_reference(text) {
                return reference;
            }
            let caps = DIMENSION
                .captures(text)
                .ok_or_else(|| format!("not a dimension: {text}"))?;
            let number: f64 = caps[1]
                .parse()
                .map_err(|_| format!("not a dimension: {text}"))?;
            let unit = caps.get(2).map_or("px", |m| m.as_str());
            Ok(json!({ "value": number_value(number)?, "unit": unit }))
        }
        other => Err(format!("not a dimension: {other}")),
    }
}

/// Opacities at or below 1 are taken as normalized; above 1 as percent.
fn coerce_opacity(value: &Value) -> Result<Value, String> {
    let (number, explicit_percent) = match value {
        Value::Number(n) => (n.as_f64().unwrap_or(f64::NAN), false),
        Value::String(text) => {
            let text = text.trim();
            if let Some(reference) = coerce_reference(text) {
                return reference;
            }
            match text.strip_suffix('%') {
                Some(percent) => (percent.trim().parse().unwrap_or(f64::NAN), true),
                None => (text.parse().unwrap_or(f64::NAN), false),
            }
        }
        other => return Err(format!("not an opacity: {other}")),
    };
    if !number.is_finite() || number < 0.0 {
        return Err(format!("not an opacity: {value}"));
    }
    let normalized = if explicit_percent || number > 1.0 {
        number / 100.0
    } else {
        number
    };
    number_value(normalized)
}

fn coerce_number(value: &Value) -> Result<Value, String> {
    match value {
        Value::Number(_) => Ok(value.clone()),
        Value::String(text) => {
            let text = text.trim();
            if let Some(reference) = coerce_reference(text) {
                return reference;
            }
            let number: f64 = text
                .parse()
                .map_err(|_| format!("not a number: {text}"))?;
            number_value(number)
        }
        other => Err(format!("not a number: {other}")),
    }
}

fn coerce_text(value: &Value) -> Result<Value, String> {
    match value {
        Value::String(text) => match coerce_reference(text.trim()) {
            Some(reference) => reference,
            None => Ok(value.clone()),
        },
        _ => Ok(value.clone()),
    }
}

/// Coerce a raw `$value` (from the store or a CSS string) to its export form.
pub fn coerce_value(kind: ValueKind, value: &Value) -> Result<Value, String> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    match kind {
        ValueKind::Color => coerce_color(value),
        ValueKind::Dimension => coerce_dimension(value),
        ValueKind::Opacity => coerce_opacity(value),
        ValueKind::Number => coerce_number(value),
        ValueKind::Text => coerce_text(value),
    }
}

fn dotted(path: &[String]) -> String {
    format!("tokens.{}", path.join("."))
}

fn full_token_path(path: &[String]) -> Vec<String> {
    let mut full = Vec::with_capacity(path.len() + 1);
    full.push("tokens".to_string());
    full.extend(path.iter().cloned());
    full
}

/// Rebuild `{ tokens: … }` from the store, filling gaps from CSS variables.
///
/// Store leaves keep every original key (`$type`, `$extensions`, …) with
/// only `$value` replaced by its coerced form.
pub fn reconstruct_tokens(
    store_tokens: &Value,
    vars: &BTreeMap<String, String>,
) -> TokenReconstruction {
    let normalized = normalize_tokens(store_tokens);
    let root = normalized.get("tokens").cloned().unwrap_or_else(|| json!({}));
    let mut out = json!({});
    let mut skipped = Vec::new();
    let mut skip = |path: &[String], reason: String| {
        tracing::warn!(path = %dotted(path), %reason, "skipping token entry");
        skipped.push(SkippedToken {
            path: dotted(path),
            reason,
        });
    };

    walk_leaves(&root, |path, node| {
        if path.first().map(String::as_str) == Some("colors")
            && path.last().map(String::as_str) == Some("alias")
        {
            set_path(&mut out, path, node.clone());
            return;
        }
        let (mut entry, raw) = match node {
            Value::Object(map) => (map.clone(), map.get("$value").cloned().unwrap_or(Value::Null)),
            scalar => (Map::new(), scalar.clone()),
        };
        let typed = entry
            .get("$type")
            .and_then(Value::as_str)
            .and_then(ValueKind::for_type);
        // Opacities are typed `number` but still need percent normalization.
        let kind = match ValueKind::for_path(path) {
            ValueKind::Opacity => ValueKind::Opacity,
            by_path => typed.unwrap_or(by_path),
        };
        match coerce_value(kind, &raw) {
            Ok(value) => {
                cross_check(path, &raw, vars);
                if !entry.contains_key("$type") {
                    entry.insert("$type".into(), Value::from(kind.type_name(path)));
                }
                entry.insert("$value".into(), value);
                set_path(&mut out, path, Value::Object(entry));
            }
            Err(reason) => skip(path, reason),
        }
    });

    for (name, css) in vars {
        if Category::of(name) != Some(Category::Tokens) {
            continue;
        }
        let full = internal_name_to_path(name);
        let Some((_, path)) = full.split_first() else {
            skip(&[name.clone()], "unrecognized token variable name".to_string());
            continue;
        };
        if get_path(&out, path).is_some() {
            continue;
        }
        let kind = ValueKind::for_path(path);
        match coerce_value(kind, &Value::String(css.clone())) {
            Ok(value) => {
                let entry = json!({ "$type": kind.type_name(path), "$value": value });
                set_path(&mut out, path, entry);
            }
            Err(reason) => skip(path, reason),
        }
    }

    for sentinel in TOKEN_SENTINELS {
        if get_path(&out, &sentinel).is_none() {
            set_path(&mut out, &sentinel, json!({ "$value": null }));
        }
    }
    prune_empty(&mut out);

    TokenReconstruction {
        document: json!({ "tokens": out }),
        skipped,
    }
}

/// Log when the live CSS value disagrees with the store.
fn cross_check(path: &[String], raw: &Value, vars: &BTreeMap<String, String>) {
    let Some(name) = path_to_internal_name(&full_token_path(path)) else {
        return;
    };
    let (Some(css), Some(expected)) = (vars.get(&name), project_value(raw, "light")) else {
        return;
    };
    if css.trim() != expected {
        tracing::debug!(%name, css = %css.trim(), store = %expected, "store and css disagree; using store");
    }
}

/// Rewrite every mode-qualified brand reference to its mode-agnostic form.
///
/// `{brand.themes.<mode>.x}` and legacy `{brand.<mode>.x}` both become
/// `{brand.x}`, which covers `palettes.core-colors.<key>` references.
pub fn strip_theme_references(text: &str) -> String {
    THEME_QUALIFIED_REF.replace_all(text, "{brand.").into_owned()
}

/// `{ brand: … }` from the store theme, references made mode-agnostic.
pub fn reconstruct_brand(theme: &Value) -> Value {
    let mut doc = normalize_brand(theme);
    map_strings(&mut doc, &strip_theme_references);
    doc
}

/// `{ ui-kit: … }` from the store UIKit, references made mode-agnostic.
pub fn reconstruct_uikit(uikit: &Value) -> Value {
    let mut doc = normalize_uikit(uikit);
    map_strings(&mut doc, &strip_theme_references);
    doc
}

/// Every string in `doc` that still names a theme, as `(dotted path, value)`.
pub fn find_theme_leaks(doc: &Value) -> Vec<(String, String)> {
    find_strings(doc, &|text| THEME_LEAK.is_match(text))
}
