//! Projection of token, brand, and UIKit documents into the CSS namespace.
//!
//! This is what a live store does after every mutation: flatten the three
//! documents into `--recursica-*` custom properties. Literal values pass
//! through (dimensions as `16px`, colors as lowercase hex) and JSON
//! references become `var(--recursica-…)` so chains stay live.

use crate::codec::{path_to_internal_name, reference_to_path};
use crate::color::Hex;
use crate::css_vars::CssVarMap;
use crate::json_path::{display_scalar, leaf_value, walk_leaves};
use crate::normalize::{normalize_brand, normalize_tokens, normalize_uikit};
use crate::resolver::bind_brand_path;
use serde_json::Value;

/// CSS text for one leaf value.
///
/// `mode` binds theme-agnostic `{brand.…}` references.
pub fn project_value(value: &Value, mode: &str) -> Option<String> {
    if let Value::String(text) = value {
        if let Some(hex) = Hex::parse(text) {
            return Some(hex.to_string());
        }
        if let Some(path) = reference_to_path(text) {
            let bound = bind_brand_path(&path, mode);
            return match path_to_internal_name(&bound) {
                Some(name) => Some(format!("var({name})")),
                None => Some(text.clone()),
            };
        }
    }
    display_scalar(value)
}

fn project_leaves(
    root: &Value,
    prefix: &[&str],
    mode_of: impl Fn(&[String]) -> String,
) -> CssVarMap {
    let mut vars = CssVarMap::new();
    walk_leaves(root, |path, node| {
        if path.last().is_some_and(|key| key == "alias") {
            return;
        }
        let mut full: Vec<String> = prefix.iter().map(|s| (*s).to_string()).collect();
        full.extend(path.iter().cloned());
        let Some(value) = leaf_value(node).and_then(|value| project_value(value, &mode_of(&full)))
        else {
            return;
        };
        if let Some(name) = path_to_internal_name(&full) {
            vars.set(name, value);
        }
    });
    vars
}

/// Token leaves as custom properties.
pub fn project_tokens(tokens: &Value) -> CssVarMap {
    let normalized = normalize_tokens(tokens);
    match normalized.get("tokens") {
        Some(root) => project_leaves(root, &["tokens"], |_| "light".to_string()),
        None => CssVarMap::new(),
    }
}

/// Brand leaves as custom properties.
///
/// References inside `brand.themes.<mode>` bind to that theme's mode.
pub fn project_brand(brand: &Value, mode: &str) -> CssVarMap {
    let normalized = normalize_brand(brand);
    let Some(root) = normalized.get("brand") else {
        return CssVarMap::new();
    };
    project_leaves(root, &["brand"], |path| match path {
        [_, themes, theme, ..] if themes == "themes" => theme.clone(),
        _ => mode.to_string(),
    })
}

/// UIKit leaves as custom properties, brand references bound to `mode`.
pub fn project_uikit(uikit: &Value, mode: &str) -> CssVarMap {
    let normalized = normalize_uikit(uikit);
    match normalized.get("ui-kit") {
        Some(root) => project_leaves(root, &["ui-kit"], |_| mode.to_string()),
        None => CssVarMap::new(),
    }
}

/// All three documents flattened into one namespace snapshot.
pub fn project_documents(tokens: &Value, brand: &Value, uikit: &Value, mode: &str) -> CssVarMap {
    let mut vars = project_tokens(tokens);
    vars.extend(project_brand(brand, mode));
    vars.extend(project_uikit(uikit, mode));
    vars
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::internal_name_to_path;
    use crate::css_vars::CssVarSource;
    use serde_json::json;

    #[test]
    fn tokens_project_to_literal_values() {
        let vars = project_tokens(&json!({
            "tokens": {
                "colors": {"scale-01": {"alias": "gray", "500": {"$type": "color", "$value": "#ABCDEF"}}},
                "sizes": {"gutter": {"$type": "dimension", "$value": {"value": 16, "unit": "px"}}},
                "font": {"typefaces": {"primary": {"$value": ["Inter", "sans-serif"]}}}
            }
        }));
        assert_eq!(
            vars.read_css_var("--recursica-tokens-colors-scale-01-500").as_deref(),
            Some("#abcdef")
        );
        assert_eq!(
            vars.read_css_var("--recursica-tokens-sizes-gutter").as_deref(),
            Some("16px")
        );
        assert_eq!(
            vars.read_css_var("--recursica-tokens-font-typefaces-primary").as_deref(),
            Some("Inter, sans-serif")
        );
        assert_eq!(vars.len(), 3);
    }

    #[test]
    fn brand_references_bind_to_their_theme() {
        let vars = project_brand(
            &json!({
                "brand": {
                    "themes": {
                        "dark": {
                            "palettes": {
                                "neutral": {"500": {"color": {"tone": {"$value": "{brand.palettes.core-colors.black}"}}}}
                            },
                            "layers": {"layer-1": {"properties": {"surface": {"$value": "{tokens.colors.scale-01.900}"}}}}
                        }
                    }
                }
            }),
            "light",
        );
        assert_eq!(
            vars.read_css_var("--recursica-brand-themes-dark-palettes-neutral-500-color-tone")
                .as_deref(),
            Some("var(--recursica-brand-themes-dark-palettes-core-colors-black)")
        );
        let surface = "--recursica-brand-themes-dark-layer-1-properties-surface";
        assert_eq!(
            vars.read_css_var(surface).as_deref(),
            Some("var(--recursica-tokens-colors-scale-01-900)")
        );
        assert_eq!(
            internal_name_to_path(surface),
            ["brand", "themes", "dark", "layers", "1", "properties", "surface"]
        );
    }

    #[test]
    fn uikit_references_bind_to_active_mode() {
        let vars = project_uikit(
            &json!({
                "ui-kit": {
                    "components": {
                        "button": {
                            "variants": {
                                "styles": {
                                    "solid": {"properties": {"colors": {"layer-0": {"background": {"$value": "{brand.palettes.primary.500.color.tone}"}}}}}
                                }
                            }
                        }
                    }
                }
            }),
            "dark",
        );
        assert_eq!(
            vars.read_css_var(
                "--recursica-ui-kit-components-button-variants-styles-solid-properties-colors-layer-0-background"
            )
            .as_deref(),
            Some("var(--recursica-brand-themes-dark-palettes-primary-500-color-tone)")
        );
    }
}
