//! Color scales and the flat token index.
//!
//! ```text
//! tokens JSON (current or legacy shape)
//!     │  TokenSet::from_json   (dual-shape read happens here only)
//! TokenSet      ordered color scales: current first, then legacy
//!     │  TokenSet::index
//! TokenIndex    "colors/<scale>/<level>" → "#rrggbb", "sizes/<key>" → "16px", …
//! ```

use crate::codec::reference_to_path;
use crate::color::Hex;
use crate::json_path::{display_scalar, leaf_value, walk_leaves};
use crate::level::Level;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Family skipped by color lookups (its values are not opaque hex).
pub const TRANSLUCENT_FAMILY: &str = "translucent";

const MAX_REFERENCE_DEPTH: usize = 10;

/// Which historical layout a scale was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// `tokens.colors.<scale>.<level>`
    Current,
    /// `tokens.color.<family>.<level>`
    Legacy,
}

impl Shape {
    /// Index key prefix for this layout.
    pub fn index_prefix(self) -> &'static str {
        match self {
            Shape::Current => "colors",
            Shape::Legacy => "color",
        }
    }
}

/// One ordered color scale.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    pub key: String,
    pub alias: Option<String>,
    pub shape: Shape,
    pub levels: BTreeMap<Level, Hex>,
}

impl ColorScale {
    /// Hex at `level`, falling back from `000` to `050`.
    pub fn get(&self, level: Level) -> Option<&Hex> {
        match self.levels.get(&level) {
            None if level == Level::L000 => self.levels.get(&Level::L050),
            found => found,
        }
    }
}

/// A family/level address within a [`TokenSet`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorAddress {
    pub family: String,
    pub level: Level,
}

/// The canonical in-memory view of a token document's colors and scalars.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenSet {
    scales: Vec<ColorScale>,
    scalars: BTreeMap<String, String>,
}

fn tokens_root(doc: &Value) -> Option<&Map<String, Value>> {
    doc.get("tokens")
        .and_then(Value::as_object)
        .or_else(|| doc.as_object())
}

/// Raw level entries of one scale: level → `$value` string.
fn raw_levels(scale: &Map<String, Value>) -> (Option<String>, Vec<(Level, String)>) {
    let mut alias = None;
    let mut levels = Vec::new();
    for (key, node) in scale {
        if key == "alias" {
            alias = leaf_value(node).and_then(Value::as_str).map(str::to_string);
            continue;
        }
        let Ok(level) = key.parse::<Level>() else {
            continue;
        };
        if let Some(value) = leaf_value(node).and_then(Value::as_str) {
            levels.push((level, value.to_string()));
        }
    }
    (alias, levels)
}

impl TokenSet {
    /// Read color scales and scalar tokens from either document shape.
    ///
    /// Legacy scales are kept only when no current scale has the same key.
    /// Level values that are `{tokens.colors.<f>.<l>}` references are
    /// resolved against the set itself, depth-bounded.
    pub fn from_json(doc: &Value) -> Self {
        let Some(root) = tokens_root(doc) else {
            return Self::default();
        };

        let mut pending: Vec<(usize, Level, String)> = Vec::new();
        let mut scales: Vec<ColorScale> = Vec::new();
        for shape in [Shape::Current, Shape::Legacy] {
            let Some(families) = root.get(shape.index_prefix()).and_then(Value::as_object) else {
                continue;
            };
            for (key, scale) in families {
                let Some(scale) = scale.as_object() else {
                    continue;
                };
                if scales.iter().any(|existing| existing.key == *key) {
                    continue;
                }
                let (alias, raw) = raw_levels(scale);
                let mut levels = BTreeMap::new();
                for (level, value) in raw {
                    match Hex::parse(&value) {
                        Some(hex) => {
                            levels.insert(level, hex);
                        }
                        None => pending.push((scales.len(), level, value)),
                    }
                }
                scales.push(ColorScale {
                    key: key.clone(),
                    alias,
                    shape,
                    levels,
                });
            }
        }

        let mut set = Self {
            scales,
            scalars: BTreeMap::new(),
        };
        set.resolve_pending(pending);
        set.collect_scalars(root);
        set
    }

    /// Resolve reference-valued levels, one chain link per pass.
    fn resolve_pending(&mut self, mut pending: Vec<(usize, Level, String)>) {
        for _ in 0..MAX_REFERENCE_DEPTH {
            if pending.is_empty() {
                break;
            }
            let mut resolved = Vec::new();
            pending.retain(|(scale, level, value)| match self.follow_reference(value) {
                Some(hex) => {
                    resolved.push((*scale, *level, hex));
                    false
                }
                None => true,
            });
            if resolved.is_empty() {
                break;
            }
            for (scale, level, hex) in resolved {
                if let Some(target) = self.scales.get_mut(scale) {
                    target.levels.insert(level, hex);
                }
            }
        }
    }

    fn follow_reference(&self, value: &str) -> Option<Hex> {
        let path = reference_to_path(value)?;
        let [root, category, family, level] = path.as_slice() else {
            return None;
        };
        if root != "tokens" || !matches!(category.as_str(), "colors" | "color") {
            return None;
        }
        let level = level.parse::<Level>().ok()?;
        self.scale(family)?.get(level).cloned()
    }

    fn collect_scalars(&mut self, root: &Map<String, Value>) {
        for (category, subtree) in root {
            if matches!(category.as_str(), "colors" | "color") {
                continue;
            }
            walk_leaves(subtree, |path, node| {
                let Some(display) = leaf_value(node).and_then(display_scalar) else {
                    return;
                };
                let key = format!("{category}/{}", path.join("/"));
                self.scalars.insert(key, display);
            });
        }
    }

    /// Scales in traversal order: current shape first, each shape by key.
    pub fn scales(&self) -> impl Iterator<Item = &ColorScale> {
        self.scales.iter()
    }

    /// Lookup a scale by key or alias.
    pub fn scale(&self, family: &str) -> Option<&ColorScale> {
        self.scales
            .iter()
            .find(|scale| scale.key == family)
            .or_else(|| {
                self.scales
                    .iter()
                    .find(|scale| scale.alias.as_deref() == Some(family))
            })
    }

    pub fn color(&self, family: &str, level: Level) -> Option<&Hex> {
        self.scale(family)?.get(level)
    }

    /// Flatten into the string-keyed index.
    pub fn index(&self) -> TokenIndex {
        let mut entries: BTreeMap<String, String> = BTreeMap::new();
        let current = || self.scales.iter().filter(|s| s.shape == Shape::Current);
        let legacy = || self.scales.iter().filter(|s| s.shape == Shape::Legacy);

        for scale in current() {
            for (level, hex) in &scale.levels {
                entries.insert(format!("colors/{}/{level}", scale.key), hex.to_string());
            }
        }
        for scale in current() {
            let Some(alias) = &scale.alias else {
                continue;
            };
            for (level, hex) in &scale.levels {
                entries
                    .entry(format!("colors/{alias}/{level}"))
                    .or_insert_with(|| hex.to_string());
            }
        }
        for scale in legacy() {
            for (level, hex) in &scale.levels {
                entries.insert(format!("color/{}/{level}", scale.key), hex.to_string());
                entries
                    .entry(format!("colors/{}/{level}", scale.key))
                    .or_insert_with(|| hex.to_string());
            }
        }
        for (key, value) in &self.scalars {
            entries.entry(key.clone()).or_insert_with(|| value.clone());
        }
        TokenIndex { entries }
    }
}

/// Flat `"<category>/<key>/<subkey>"` → value lookup table.
///
/// Color values are normalized `#rrggbb`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenIndex {
    entries: BTreeMap<String, String>,
}

impl TokenIndex {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Color lookup: current key, then legacy key, then `000` → `050`.
    pub fn color(&self, family: &str, level: &str) -> Option<Hex> {
        let lookup = |level: &str| {
            self.get(&format!("colors/{family}/{level}"))
                .or_else(|| self.get(&format!("color/{family}/{level}")))
                .and_then(Hex::parse)
        };
        match lookup(level) {
            None if level == "000" => lookup("050"),
            found => found,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Build the flat index straight from a token document.
pub fn build_token_index(tokens: &Value) -> TokenIndex {
    TokenSet::from_json(tokens).index()
}
