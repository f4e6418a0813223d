//! Bidirectional name/path codec.
//!
//! Three representations of the same token address:
//!
//! ```text
//! JSON path         ["brand","themes","light","layers","0","properties","surface"]
//!     ↕  path_to_internal_name / internal_name_to_path
//! internal name     --recursica-brand-themes-light-layer-0-properties-surface
//!     ↕  specific_name
//! specific name     --recursica-brand-themes-light-layer-0-properties-surface   (key `-` → `_`)
//!
//! JSON path  ↔  exported name   --recursica_brand_themes_light_layers_0_properties_surface
//! ```
//!
//! Internal names are parsed by an ordered rule table; the first matching
//! rule wins and a name no rule matches maps to an empty path.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Prefix of every internal (hyphenated) custom property.
pub const INTERNAL_PREFIX: &str = "--recursica-";

/// Prefix of every exported (underscore-joined) name.
pub const EXPORT_PREFIX: &str = "--recursica_";

const LEVEL_PATTERN: &str = "(000|050|[1-9]00|1000)";

/// Top-level category of an internal name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Tokens,
    Brand,
    UiKit,
}

impl Category {
    pub fn of(internal_name: &str) -> Option<Self> {
        let body = strip_internal_prefix(internal_name)?;
        if body.starts_with("tokens-") {
            Some(Category::Tokens)
        } else if body.starts_with("brand-") {
            Some(Category::Brand)
        } else if body.starts_with("ui-kit-") {
            Some(Category::UiKit)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Tokens => "tokens",
            Category::Brand => "brand",
            Category::UiKit => "ui-kit",
        }
    }
}

// ---------------------------------------------------------------------------
// Exported names
// ---------------------------------------------------------------------------

/// Join `path` into an exported name.
///
/// Each literal `_` in a segment is escaped as `__` before segments are
/// joined with `_`. Well-formed segments are non-empty and do not begin or
/// end with `_`; other segments still encode, but may not decode uniquely.
pub fn path_to_exported_name<S: AsRef<str>>(path: &[S]) -> String {
    let body = path
        .iter()
        .map(|segment| segment.as_ref().replace('_', "__"))
        .collect::<Vec<_>>()
        .join("_");
    format!("{EXPORT_PREFIX}{body}")
}

/// Split an exported name back into its path.
///
/// Returns an empty path when `name` lacks [`EXPORT_PREFIX`]. Within a run
/// of underscores, pairs decode to one literal `_` and an unpaired trailing
/// `_` is the separator.
pub fn exported_name_to_path(name: &str) -> Vec<String> {
    let Some(body) = name.strip_prefix(EXPORT_PREFIX) else {
        return Vec::new();
    };
    if body.is_empty() {
        return Vec::new();
    }

    let mut path = Vec::new();
    let mut current = String::new();
    let mut chars = body.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '_' {
            current.push(ch);
            continue;
        }
        if chars.peek() == Some(&'_') {
            chars.next();
            current.push('_');
        } else {
            path.push(std::mem::take(&mut current));
        }
    }
    path.push(current);
    path
}

// ---------------------------------------------------------------------------
// Internal names
// ---------------------------------------------------------------------------

type Build = fn(&Captures<'_>) -> Vec<String>;

struct NameRule {
    pattern: Regex,
    build: Build,
}

impl NameRule {
    fn new(pattern: &str, build: Build) -> Self {
        let pattern = pattern.replace("{LEVEL}", LEVEL_PATTERN);
        Self {
            pattern: Regex::new(&pattern).expect("codec rule pattern"),
            build,
        }
    }
}

fn cap(caps: &Captures<'_>, index: usize) -> String {
    caps.get(index)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn owned(segments: &[&str]) -> Vec<String> {
    segments.iter().map(|s| (*s).to_string()).collect()
}

/// Plural spelling of a token category or font sub-category.
pub fn plural_category(key: &str) -> String {
    match key {
        "color" => "colors".into(),
        "size" => "sizes".into(),
        "opacity" => "opacities".into(),
        "weight" => "weights".into(),
        "typeface" => "typefaces".into(),
        "case" => "cases".into(),
        "decoration" => "decorations".into(),
        "letter-spacing" => "letter-spacings".into(),
        "line-height" => "line-heights".into(),
        "style" => "styles".into(),
        other => other.to_string(),
    }
}

/// Split the remainder after `properties-` into property path segments.
fn property_segments(rest: &str) -> Vec<String> {
    static LAYERED_COLOR: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^colors-(layer-\d+)-(.+)$").expect("layered color"));
    static COLOR: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^colors-(.+)$").expect("color property"));

    if let Some(caps) = LAYERED_COLOR.captures(rest) {
        return vec!["colors".into(), cap(&caps, 1), cap(&caps, 2)];
    }
    if let Some(caps) = COLOR.captures(rest) {
        return vec!["colors".into(), cap(&caps, 1)];
    }
    vec![rest.to_string()]
}

static NAME_RULES: LazyLock<Vec<NameRule>> = LazyLock::new(|| {
    vec![
        // tokens
        NameRule::new(r"^tokens-colors?-(.+)-{LEVEL}$", |c| {
            vec!["tokens".into(), "colors".into(), cap(c, 1), cap(c, 2)]
        }),
        NameRule::new(
            r"^tokens-font-(letter-spacings?|line-heights?|sizes?|weights?|typefaces?|cases?|decorations?|styles?)-(.+)$",
            |c| {
                vec![
                    "tokens".into(),
                    "font".into(),
                    plural_category(&cap(c, 1)),
                    cap(c, 2),
                ]
            },
        ),
        NameRule::new(r"^tokens-(sizes?|opacity|opacities)-(.+)$", |c| {
            vec!["tokens".into(), plural_category(&cap(c, 1)), cap(c, 2)]
        }),
        // brand
        NameRule::new(
            r"^brand-themes-(light|dark)-palettes-core-colors-(.+?)-(on-tone|tone)$",
            |c| {
                let mut path = owned(&["brand", "themes"]);
                path.extend([cap(c, 1), "palettes".into(), "core-colors".into()]);
                path.extend([cap(c, 2), cap(c, 3)]);
                path
            },
        ),
        NameRule::new(r"^brand-themes-(light|dark)-palettes-core-colors-(.+)$", |c| {
            let mut path = owned(&["brand", "themes"]);
            path.extend([cap(c, 1), "palettes".into(), "core-colors".into(), cap(c, 2)]);
            path
        }),
        NameRule::new(
            r"^brand-themes-(light|dark)-palettes-(.+)-{LEVEL}-color-(on-tone|tone)$",
            |c| {
                let mut path = owned(&["brand", "themes"]);
                path.extend([cap(c, 1), "palettes".into(), cap(c, 2), cap(c, 3)]);
                path.extend(["color".into(), cap(c, 4)]);
                path
            },
        ),
        NameRule::new(r"^brand-themes-(light|dark)-palettes-(.+)-default$", |c| {
            let mut path = owned(&["brand", "themes"]);
            path.extend([cap(c, 1), "palettes".into(), cap(c, 2), "default".into()]);
            path
        }),
        NameRule::new(r"^brand-themes-(light|dark)-layer-(\d+)-properties-(.+)$", |c| {
            let mut path = owned(&["brand", "themes"]);
            path.extend([cap(c, 1), "layers".into(), cap(c, 2)]);
            path.extend(["properties".into(), cap(c, 3)]);
            path
        }),
        NameRule::new(r"^brand-dimensions-(.+)$", |c| {
            vec!["brand".into(), "dimensions".into(), cap(c, 1)]
        }),
        NameRule::new(
            r"^brand-typography-(.+)-(font-family|font-size|font-weight|font-style|letter-spacing|line-height|text-transform|text-decoration)$",
            |c| vec!["brand".into(), "typography".into(), cap(c, 1), cap(c, 2)],
        ),
        // ui-kit
        NameRule::new(r"^ui-kit-globals-(.+)$", |c| {
            vec!["ui-kit".into(), "globals".into(), cap(c, 1)]
        }),
        NameRule::new(
            r"^ui-kit-components-(.+?)-variants-(styles|sizes)-(.+?)-properties-(.+)$",
            |c| {
                let mut path = owned(&["ui-kit", "components"]);
                path.extend([cap(c, 1), "variants".into(), cap(c, 2), cap(c, 3)]);
                path.push("properties".into());
                path.extend(property_segments(&cap(c, 4)));
                path
            },
        ),
        NameRule::new(r"^ui-kit-components-(.+?)-properties-(.+)$", |c| {
            let mut path = owned(&["ui-kit", "components"]);
            path.extend([cap(c, 1), "properties".into()]);
            path.extend(property_segments(&cap(c, 2)));
            path
        }),
    ]
});

fn strip_internal_prefix(name: &str) -> Option<&str> {
    let name = name.trim();
    name.strip_prefix(INTERNAL_PREFIX)
        .or_else(|| name.strip_prefix("recursica-"))
}

/// Rewrite the legacy `brand-<mode>-` spelling to `brand-themes-<mode>-`.
fn normalize_legacy_body(body: &str) -> String {
    for mode in ["light", "dark"] {
        if let Some(rest) = body.strip_prefix(&format!("brand-{mode}-")) {
            return format!("brand-themes-{mode}-{rest}");
        }
    }
    body.to_string()
}

/// Map an internal CSS variable name to its JSON path.
///
/// Foreign or malformed names map to an empty path.
pub fn internal_name_to_path(internal_name: &str) -> Vec<String> {
    let Some(body) = strip_internal_prefix(internal_name) else {
        return Vec::new();
    };
    let body = normalize_legacy_body(body);
    NAME_RULES
        .iter()
        .find_map(|rule| rule.pattern.captures(&body).map(|caps| (rule.build)(&caps)))
        .unwrap_or_default()
}

/// Map a canonical JSON path to its internal CSS variable name.
///
/// Returns `None` for an empty path.
pub fn path_to_internal_name<S: AsRef<str>>(path: &[S]) -> Option<String> {
    let segments = internal_segments(path)?;
    Some(format!("{INTERNAL_PREFIX}{}", segments.join("-")))
}

fn internal_segments<S: AsRef<str>>(path: &[S]) -> Option<Vec<String>> {
    if path.is_empty() {
        return None;
    }
    let path: Vec<&str> = path.iter().map(AsRef::as_ref).collect();
    let mut segments = Vec::with_capacity(path.len());
    let mut index = 0;
    while index < path.len() {
        let segment = path[index];
        let is_brand_layer = path[0] == "brand"
            && segment == "layers"
            && index == 3
            && path.get(1) == Some(&"themes");
        if is_brand_layer && let Some(layer) = path.get(index + 1) {
            let layer = layer.strip_prefix("layer-").unwrap_or(layer);
            segments.push(format!("layer-{layer}"));
            index += 2;
            continue;
        }
        segments.push(segment.to_string());
        index += 1;
    }
    Some(segments)
}

/// The specific-stylesheet spelling of an internal name.
///
/// Path-separator hyphens are kept; hyphens inside the final key segment
/// become underscores. Names the codec cannot parse are returned unchanged.
pub fn specific_name(internal_name: &str) -> String {
    let path = internal_name_to_path(internal_name);
    let Some((key, parents)) = path.split_last() else {
        tracing::warn!(name = internal_name, "unrecognized variable name; exporting as-is");
        return internal_name.trim().to_string();
    };
    let mut segments = if parents.is_empty() {
        Vec::new()
    } else {
        internal_segments(parents).unwrap_or_default()
    };
    segments.push(key.replace('-', "_"));
    format!("{INTERNAL_PREFIX}{}", segments.join("-"))
}

/// Exported name for an internal name, or `None` when it cannot be parsed.
pub fn internal_to_exported_name(internal_name: &str) -> Option<String> {
    let path = internal_name_to_path(internal_name);
    (!path.is_empty()).then(|| path_to_exported_name(&path))
}

/// JSON reference string (`{a.b.c}`) for a path.
pub fn path_to_reference<S: AsRef<str>>(path: &[S]) -> String {
    let joined = path
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(".");
    format!("{{{joined}}}")
}

/// Path segments of a JSON reference string, or `None` if `value` is not one.
pub fn reference_to_path(value: &str) -> Option<Vec<String>> {
    let inner = value.trim().strip_prefix('{')?.strip_suffix('}')?;
    if inner.is_empty() || inner.contains(['{', '}', ' ']) {
        return None;
    }
    Some(inner.split('.').map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(segments: &[&str]) -> Vec<String> {
        owned(segments)
    }

    #[test]
    fn exported_name_round_trips_underscores() {
        let p = path(&["tokens", "colors", "scale-01", "500"]);
        let name = path_to_exported_name(&p);
        assert_eq!(name, "--recursica_tokens_colors_scale-01_500");
        assert_eq!(exported_name_to_path(&name), p);

        let p = path(&["a_b", "c"]);
        let name = path_to_exported_name(&p);
        assert_eq!(name, "--recursica_a__b_c");
        assert_eq!(exported_name_to_path(&name), p);

        let p = path(&["x", "a___b", "c"]);
        assert_eq!(exported_name_to_path(&path_to_exported_name(&p)), p);
    }

    #[test]
    fn exported_name_without_prefix_is_empty() {
        assert!(exported_name_to_path("--other_tokens_colors").is_empty());
        assert!(exported_name_to_path("--recursica_").is_empty());
        assert!(exported_name_to_path("").is_empty());
    }

    #[test]
    fn token_color_names_prefer_rightmost_level() {
        assert_eq!(
            internal_name_to_path("--recursica-tokens-colors-scale-01-500"),
            path(&["tokens", "colors", "scale-01", "500"])
        );
        assert_eq!(
            internal_name_to_path("--recursica-tokens-colors-gray-100-900"),
            path(&["tokens", "colors", "gray-100", "900"])
        );
        assert_eq!(
            internal_name_to_path("--recursica-tokens-color-gray-000"),
            path(&["tokens", "colors", "gray", "000"])
        );
    }

    #[test]
    fn token_scalar_names_normalize_to_plural() {
        assert_eq!(
            internal_name_to_path("--recursica-tokens-size-gutter-sm"),
            path(&["tokens", "sizes", "gutter-sm"])
        );
        assert_eq!(
            internal_name_to_path("--recursica-tokens-opacity-veiled"),
            path(&["tokens", "opacities", "veiled"])
        );
        assert_eq!(
            internal_name_to_path("--recursica-tokens-font-letter-spacings-tight"),
            path(&["tokens", "font", "letter-spacings", "tight"])
        );
        assert_eq!(
            internal_name_to_path("--recursica-tokens-font-weight-bold"),
            path(&["tokens", "font", "weights", "bold"])
        );
    }

    #[test]
    fn brand_names_map_to_theme_paths() {
        assert_eq!(
            internal_name_to_path("--recursica-brand-themes-dark-palettes-palette-1-200-color-on-tone"),
            path(&["brand", "themes", "dark", "palettes", "palette-1", "200", "color", "on-tone"])
        );
        assert_eq!(
            internal_name_to_path("--recursica-brand-themes-light-palettes-core-colors-black-on-tone"),
            path(&["brand", "themes", "light", "palettes", "core-colors", "black", "on-tone"])
        );
        assert_eq!(
            internal_name_to_path("--recursica-brand-light-layer-2-properties-element-text-color"),
            path(&["brand", "themes", "light", "layers", "2", "properties", "element-text-color"])
        );
    }

    #[test]
    fn ui_kit_names_split_component_variant_and_property() {
        assert_eq!(
            internal_name_to_path(
                "--recursica-ui-kit-components-text-field-variants-styles-outline-properties-colors-layer-1-border"
            ),
            path(&[
                "ui-kit", "components", "text-field", "variants", "styles", "outline",
                "properties", "colors", "layer-1", "border",
            ])
        );
        assert_eq!(
            internal_name_to_path("--recursica-ui-kit-components-button-properties-border-radius"),
            path(&["ui-kit", "components", "button", "properties", "border-radius"])
        );
    }

    #[test]
    fn foreign_names_map_to_empty_path() {
        assert!(internal_name_to_path("--other-tokens-colors-gray-500").is_empty());
        assert!(internal_name_to_path("--recursica-widgets-x").is_empty());
        assert!(internal_name_to_path("").is_empty());
    }

    #[test]
    fn internal_names_round_trip_through_paths() {
        for name in [
            "--recursica-tokens-colors-scale-01-500",
            "--recursica-tokens-font-line-heights-loose",
            "--recursica-brand-themes-light-palettes-neutral-050-color-tone",
            "--recursica-brand-themes-dark-palettes-core-colors-alert-tone",
            "--recursica-brand-themes-dark-layer-3-properties-surface",
            "--recursica-brand-dimensions-border-radius",
            "--recursica-ui-kit-globals-icon-size",
            "--recursica-ui-kit-components-chip-variants-sizes-small-properties-height",
        ] {
            let p = internal_name_to_path(name);
            assert!(!p.is_empty(), "{name} should parse");
            assert_eq!(path_to_internal_name(&p).as_deref(), Some(name));
        }
    }

    #[test]
    fn specific_name_underscores_only_the_key() {
        assert_eq!(
            specific_name("--recursica-brand-themes-light-layer-0-properties-element-text-color"),
            "--recursica-brand-themes-light-layer-0-properties-element_text_color"
        );
        assert_eq!(
            specific_name("--recursica-brand-themes-dark-palettes-neutral-500-color-on-tone"),
            "--recursica-brand-themes-dark-palettes-neutral-500-color-on_tone"
        );
        assert_eq!(
            specific_name("--recursica-tokens-colors-scale-01-500"),
            "--recursica-tokens-colors-scale-01-500"
        );
        assert_eq!(specific_name("--not-ours"), "--not-ours");
    }

    #[test]
    fn references_parse_and_render() {
        assert_eq!(
            reference_to_path("{tokens.colors.scale-01.500}"),
            Some(path(&["tokens", "colors", "scale-01", "500"]))
        );
        assert_eq!(reference_to_path("#ffffff"), None);
        assert_eq!(reference_to_path("{}"), None);
        assert_eq!(
            path_to_reference(&["brand", "palettes", "core-colors", "black"]),
            "{brand.palettes.core-colors.black}"
        );
    }
}
