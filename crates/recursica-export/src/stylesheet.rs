//! Specific and scoped stylesheet emission.
//!
//! The specific sheet is one `:root` block holding every variable under its
//! specific name. The scoped sheet strips theme and layer qualifiers out of
//! brand and UIKit names and moves each declaration into the attribute
//! selector those qualifiers described:
//!
//! ```text
//! --recursica-brand-themes-dark-layer-2-properties-surface
//!   → [data-recursica-theme="dark"][data-recursica-layer="2"] { --recursica-brand-layer-properties-surface }
//! ```
//!
//! Combined selectors come last and are more specific, so they override
//! single-qualifier blocks through the ordinary cascade.

use recursica_kernel::codec::{Category, INTERNAL_PREFIX, specific_name};
use recursica_kernel::Level;
use regex::{Captures, Regex};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::LazyLock;

static THEME_QUALIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-themes-(light|dark)-").expect("theme qualifier pattern"));
static LAYER_QUALIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-layer-(\d+)-").expect("layer qualifier pattern"));
static BRAND_LEVEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-(000|050|[1-9]00|1000)-").expect("brand level pattern"));
static TOKEN_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^--recursica-tokens-colors?-(.+)-(000|050|[1-9]00|1000)$")
        .expect("token color pattern")
});
static COMPONENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^--recursica-ui-kit-components-(.+?)-(?:variants|properties)-")
        .expect("component pattern")
});
static VAR_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"var\(\s*(--recursica-[A-Za-z0-9_-]+)").expect("var reference pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

/// Where a declaration lands in the scoped sheet. Variant order is block order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Scope {
    Root,
    Theme(ThemeMode),
    Layer(u32),
    ThemeLayer(ThemeMode, u32),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Root => f.write_str(":root"),
            Scope::Theme(mode) => write!(f, "[data-recursica-theme=\"{}\"]", mode.as_str()),
            Scope::Layer(layer) => write!(f, "[data-recursica-layer=\"{layer}\"]"),
            Scope::ThemeLayer(mode, layer) => write!(
                f,
                "[data-recursica-theme=\"{}\"][data-recursica-layer=\"{layer}\"]",
                mode.as_str()
            ),
        }
    }
}

/// Split a specific name into its scope and qualifier-free base name.
///
/// Token names are never qualified and always land in `:root`.
pub fn scope_of(specific: &str) -> (Scope, String) {
    if matches!(Category::of(specific), None | Some(Category::Tokens)) {
        return (Scope::Root, specific.to_string());
    }
    let mut base = specific.to_string();
    let theme = THEME_QUALIFIER
        .captures(&base)
        .and_then(|caps| ThemeMode::parse(&caps[1]));
    if theme.is_some() {
        base = THEME_QUALIFIER.replace(&base, "-").into_owned();
    }
    let layer = LAYER_QUALIFIER
        .captures(&base)
        .and_then(|caps| caps[1].parse::<u32>().ok());
    if layer.is_some() {
        base = LAYER_QUALIFIER.replace(&base, "-layer-").into_owned();
    }
    let scope = match (theme, layer) {
        (None, None) => Scope::Root,
        (Some(mode), None) => Scope::Theme(mode),
        (None, Some(layer)) => Scope::Layer(layer),
        (Some(mode), Some(layer)) => Scope::ThemeLayer(mode, layer),
    };
    (scope, base)
}

/// Rename every `var(--recursica-…)` reference inside a CSS value.
pub fn rewrite_refs(value: &str, rename: impl Fn(&str) -> String) -> String {
    VAR_NAME
        .replace_all(value, |caps: &Captures| format!("var({})", rename(&caps[1])))
        .into_owned()
}

fn scoped_name(internal: &str) -> String {
    scope_of(&specific_name(internal)).1
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    TokenColor(String, usize, String),
    Token(String),
    Brand(String, u8, usize, String),
    UiKit(String),
    Unknown(String),
}

fn level_index(level: &str) -> usize {
    level.parse::<Level>().map(Level::index).unwrap_or_default()
}

fn sort_key(name: &str) -> SortKey {
    match Category::of(name) {
        Some(Category::Tokens) => match TOKEN_COLOR.captures(name) {
            Some(caps) => SortKey::TokenColor(
                caps[1].to_string(),
                level_index(&caps[2]),
                name.to_string(),
            ),
            None => SortKey::Token(name.to_string()),
        },
        Some(Category::Brand) => {
            let mode = match THEME_QUALIFIER.captures(name).map(|caps| caps[1].to_string()) {
                Some(mode) if mode == "light" => 1,
                Some(_) => 2,
                None => 0,
            };
            let level = BRAND_LEVEL
                .captures(name)
                .map(|caps| level_index(&caps[1]))
                .unwrap_or_default();
            let themeless = THEME_QUALIFIER.replace(name, "-");
            let group = BRAND_LEVEL.replace(&themeless, "-*-").into_owned();
            SortKey::Brand(group, mode, level, name.to_string())
        }
        Some(Category::UiKit) => SortKey::UiKit(name.to_string()),
        None => SortKey::Unknown(name.to_string()),
    }
}

/// `--recursica-*` declarations in emission order, values trimmed.
fn ordered(vars: &BTreeMap<String, String>) -> Vec<(&str, &str)> {
    let mut entries: Vec<(SortKey, &str, &str)> = vars
        .iter()
        .filter(|(name, _)| name.trim().starts_with(INTERNAL_PREFIX))
        .map(|(name, value)| (sort_key(name.trim()), name.trim(), value.trim()))
        .collect();
    entries.sort();
    entries
        .into_iter()
        .map(|(_, name, value)| (name, value))
        .collect()
}

fn title_case(text: &str) -> String {
    text.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn listing(names: BTreeSet<String>) -> String {
    if names.is_empty() {
        return "none".to_string();
    }
    names
        .iter()
        .map(|name| title_case(name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn header(flavor: &str, declarations: &[(&str, &str)]) -> String {
    let mut components = BTreeSet::new();
    let mut families = BTreeSet::new();
    for (name, _) in declarations {
        if let Some(caps) = COMPONENT.captures(name) {
            components.insert(caps[1].to_string());
        }
        if let Some(caps) = TOKEN_COLOR.captures(name) {
            families.insert(caps[1].to_string());
        }
    }
    format!(
        "/*\n * Recursica design tokens ({flavor})\n * Variables: {}\n * Components: {}\n * Color families: {}\n */\n",
        declarations.len(),
        listing(components),
        listing(families),
    )
}

fn render(mut css: String, blocks: &[(Scope, Vec<(String, String)>)]) -> String {
    for (scope, declarations) in blocks {
        css.push('\n');
        css.push_str(&format!("{scope} {{\n"));
        for (name, value) in declarations {
            css.push_str(&format!("  {name}: {value};\n"));
        }
        css.push_str("}\n");
    }
    css
}

/// One `:root` block with every variable under its specific name.
pub fn emit_specific(vars: &BTreeMap<String, String>) -> String {
    let declarations = ordered(vars);
    let body: Vec<(String, String)> = declarations
        .iter()
        .map(|(name, value)| (specific_name(name), rewrite_refs(value, specific_name)))
        .collect();
    render(
        header("specific", &declarations),
        &[(Scope::Root, body)],
    )
}

/// `:root`, theme, layer, then combined theme+layer blocks.
pub fn emit_scoped(vars: &BTreeMap<String, String>) -> String {
    let declarations = ordered(vars);
    let mut blocks: BTreeMap<Scope, Vec<(String, String)>> = BTreeMap::new();
    for (name, value) in &declarations {
        let (scope, base) = scope_of(&specific_name(name));
        blocks
            .entry(scope)
            .or_default()
            .push((base, rewrite_refs(value, scoped_name)));
    }
    let blocks: Vec<_> = blocks.into_iter().collect();
    render(header("scoped", &declarations), &blocks)
}
