//! Contrast audit over every tone/on-tone and surface/text pair a theme defines.
//!
//! Pairs are enumerated from the brand document structure and read from the
//! live namespace. A pair whose variable is unset, or whose value does not
//! resolve to a hex, is skipped: missing data is not a violation.

use recursica_kernel::normalize::{MODES, normalize_brand};
use recursica_kernel::{
    AA_CONTRAST, CANONICAL_LEVELS, ColorResolver, CssVarSource, Hex, TokenIndex, contrast_ratio,
    path_to_internal_name,
};
use serde::Serialize;
use serde_json::Value;

pub const CORE_COLOR_KEYS: [&str; 5] = ["alert", "warning", "success", "black", "white"];

pub const LAYER_COUNT: usize = 4;

/// Layer properties checked against the layer surface.
pub const LAYER_FOREGROUND_PROPERTIES: [&str; 8] = [
    "element-text-color",
    "element-text-high-emphasis",
    "element-text-low-emphasis",
    "element-text-alert",
    "element-text-success",
    "element-text-warning",
    "element-interactive-tone",
    "element-interactive-color",
];

const SKIPPED_PALETTES: [&str; 2] = ["core", "core-colors"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationKind {
    PaletteOnTone,
    CoreColor,
    LayerText,
    LayerInteractive,
    InteractiveOnTone,
}

impl ViolationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ViolationKind::PaletteOnTone => "palette-on-tone",
            ViolationKind::CoreColor => "core-color",
            ViolationKind::LayerText => "layer-text",
            ViolationKind::LayerInteractive => "layer-interactive",
            ViolationKind::InteractiveOnTone => "interactive-on-tone",
        }
    }
}

/// One failing pair. `tone` is the background, `on_tone` the foreground.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    #[serde(rename = "type")]
    pub kind: ViolationKind,
    pub mode: String,
    pub location: String,
    pub tone_hex: Hex,
    pub on_tone_hex: Hex,
    pub contrast_ratio: f64,
    pub message: String,
    pub tone_var: String,
    pub on_tone_var: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    /// Pairs that resolved on both sides and were measured.
    pub checked: usize,
    pub violations: Vec<Violation>,
}

impl AuditReport {
    pub fn is_compliant(&self) -> bool {
        self.violations.is_empty()
    }
}

struct PairCheck {
    kind: ViolationKind,
    location: String,
    tone_var: String,
    on_tone_var: String,
}

fn var_name(segments: &[&str]) -> String {
    path_to_internal_name(segments).unwrap_or_default()
}

fn palette_checks(theme: &Value, mode: &str) -> Vec<PairCheck> {
    let Some(palettes) = theme.get("palettes").and_then(Value::as_object) else {
        return Vec::new();
    };
    let mut checks = Vec::new();
    for palette in palettes.keys() {
        if SKIPPED_PALETTES.contains(&palette.as_str()) {
            continue;
        }
        for level in CANONICAL_LEVELS {
            let level = level.as_str();
            let base = ["brand", "themes", mode, "palettes", palette.as_str(), level, "color"];
            let var = |suffix: &str| {
                let mut path = base.to_vec();
                path.push(suffix);
                var_name(&path)
            };
            checks.push(PairCheck {
                kind: ViolationKind::PaletteOnTone,
                location: format!("palettes.{palette}.{level}"),
                tone_var: var("tone"),
                on_tone_var: var("on-tone"),
            });
        }
    }
    checks
}

fn core_color_checks(mode: &str) -> Vec<PairCheck> {
    CORE_COLOR_KEYS
        .iter()
        .map(|&key| {
            let base = ["brand", "themes", mode, "palettes", "core-colors", key];
            let var = |suffix: &str| {
                let mut path = base.to_vec();
                path.push(suffix);
                var_name(&path)
            };
            PairCheck {
                kind: ViolationKind::CoreColor,
                location: format!("palettes.core-colors.{key}"),
                tone_var: var("tone"),
                on_tone_var: var("on-tone"),
            }
        })
        .collect()
}

fn layer_checks(mode: &str) -> Vec<PairCheck> {
    let mut checks = Vec::new();
    for layer in 0..LAYER_COUNT {
        let layer = layer.to_string();
        let property = |name: &str| {
            var_name(&["brand", "themes", mode, "layers", layer.as_str(), "properties", name])
        };
        let surface = property("surface");
        for name in LAYER_FOREGROUND_PROPERTIES {
            let kind = if name.starts_with("element-interactive") {
                ViolationKind::LayerInteractive
            } else {
                ViolationKind::LayerText
            };
            checks.push(PairCheck {
                kind,
                location: format!("layers.{layer}.{name}"),
                tone_var: surface.clone(),
                on_tone_var: property(name),
            });
        }
        checks.push(PairCheck {
            kind: ViolationKind::InteractiveOnTone,
            location: format!("layers.{layer}.element-interactive-on-tone"),
            tone_var: property("element-interactive-tone"),
            on_tone_var: property("element-interactive-on-tone"),
        });
    }
    checks
}

/// Every pair the theme structure defines for `mode`, in audit order.
fn pair_checks(brand: &Value, mode: &str) -> Vec<PairCheck> {
    let theme = brand
        .get("brand")
        .and_then(|b| b.get("themes"))
        .and_then(|t| t.get(mode))
        .cloned()
        .unwrap_or(Value::Null);
    let mut checks = palette_checks(&theme, mode);
    checks.extend(core_color_checks(mode));
    checks.extend(layer_checks(mode));
    checks
}

/// Audit both modes of `brand` against the live namespace.
pub fn audit<E: CssVarSource + ?Sized>(brand: &Value, env: &E, index: &TokenIndex) -> AuditReport {
    let brand = normalize_brand(brand);
    let mut report = AuditReport::default();
    for mode in MODES {
        let resolver = ColorResolver::new(index, env).with_mode(mode);
        let resolve = |var: &str| {
            let raw = env.read_css_var(var)?;
            resolver.resolve(&raw)
        };
        for check in pair_checks(&brand, mode) {
            let (Some(tone), Some(on_tone)) = (resolve(&check.tone_var), resolve(&check.on_tone_var))
            else {
                continue;
            };
            report.checked += 1;
            let ratio = contrast_ratio(&tone, &on_tone);
            if ratio >= AA_CONTRAST {
                continue;
            }
            tracing::debug!(mode, location = %check.location, ratio, "contrast below AA");
            report.violations.push(Violation {
                kind: check.kind,
                mode: mode.to_string(),
                message: format!(
                    "{mode} {}: {on_tone} on {tone} has contrast {ratio:.2}:1, below {AA_CONTRAST}:1",
                    check.location
                ),
                location: check.location,
                tone_hex: tone,
                on_tone_hex: on_tone,
                contrast_ratio: ratio,
                tone_var: check.tone_var,
                on_tone_var: check.on_tone_var,
            });
        }
    }
    report
}
