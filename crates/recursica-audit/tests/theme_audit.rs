//! Audit a projected theme end to end and turn violations into fixes.

use recursica_audit::{ViolationKind, audit, suggest_fixes};
use recursica_kernel::{MemoryStore, TokenSet, TokenStore};
use serde_json::{Value, json};

fn tokens() -> Value {
    json!({
        "tokens": {"colors": {"scale-02": {
            "alias": "slate",
            "050": {"$type": "color", "$value": "#f8fafc"},
            "100": {"$type": "color", "$value": "#f1f5f9"},
            "200": {"$type": "color", "$value": "#e2e8f0"},
            "300": {"$type": "color", "$value": "#cbd5e1"},
            "400": {"$type": "color", "$value": "#94a3b8"},
            "500": {"$type": "color", "$value": "#64748b"},
            "600": {"$type": "color", "$value": "#475569"},
            "700": {"$type": "color", "$value": "#334155"},
            "800": {"$type": "color", "$value": "#1e293b"},
            "900": {"$type": "color", "$value": "#0f172a"},
            "1000": {"$type": "color", "$value": "#020617"}
        }}}
    })
}

fn brand() -> Value {
    json!({
        "brand": {
            "themes": {
                "light": {
                    "palettes": {
                        "core-colors": {"white": {"tone": "#ffffff", "on-tone": "#000000"}},
                        "slate": {
                            "100": {"color": {
                                "tone": "{tokens.colors.scale-02.100}",
                                "on-tone": "{tokens.colors.scale-02.300}"
                            }},
                            "900": {"color": {
                                "tone": "{tokens.colors.scale-02.900}",
                                "on-tone": "{brand.palettes.core-colors.white.tone}"
                            }}
                        }
                    },
                    "layers": {"layer-0": {"properties": {
                        "surface": "{brand.palettes.core-colors.white.tone}",
                        "element-text-color": "{tokens.colors.scale-02.900}"
                    }}}
                },
                "dark": {
                    "layers": {"layer-1": {"properties": {
                        "surface": "{tokens.colors.scale-02.900}",
                        "element-text-color": "{tokens.colors.scale-02.700}"
                    }}}
                }
            }
        }
    })
}

#[test]
fn audit_reports_failing_pairs_in_both_modes() {
    let store = MemoryStore::new(&tokens(), &brand(), &json!({}));
    let index = TokenSet::from_json(&store.state().tokens).index();
    let report = audit(&store.state().theme, &store, &index);

    // light: slate 100, slate 900, core white, layer 0 text; dark: layer 1 text.
    assert_eq!(report.checked, 5);
    let failing: Vec<_> = report
        .violations
        .iter()
        .map(|v| (v.mode.as_str(), v.location.as_str(), v.kind))
        .collect();
    assert_eq!(
        failing,
        [
            ("light", "palettes.slate.100", ViolationKind::PaletteOnTone),
            ("dark", "layers.1.element-text-color", ViolationKind::LayerText),
        ]
    );
}

#[test]
fn fixes_point_at_scale_variables() {
    let store = MemoryStore::new(&tokens(), &brand(), &json!({}));
    let set = TokenSet::from_json(&store.state().tokens);
    let report = audit(&store.state().theme, &store, &set.index());
    let fixes = suggest_fixes(&report, &set);

    assert_eq!(fixes.len(), report.violations.len());
    for fix in &fixes {
        assert!(fix.compliant, "{} should have a compliant fix", fix.location);
        assert!(fix.suggested_ref.starts_with("var(--recursica-tokens-colors-scale-02-"));
    }
    assert_eq!(
        fixes[0].variable,
        "--recursica-brand-themes-light-palettes-slate-100-color-on-tone"
    );
}
