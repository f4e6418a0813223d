//! Color stepping along discrete token scales, and AA-driven stepping.
//!
//! Results here are advisory. [`step_until_aa_compliant`] returns the best
//! color it reached, which is not guaranteed to meet the contrast threshold.

use crate::codec::path_to_internal_name;
use crate::color::{Hex, adjust_value, meets_aa};
use crate::level::{Direction, Level};
use crate::token_index::{ColorAddress, ColorScale, TRANSLUCENT_FAMILY, TokenSet};

/// HSV value shift used when a color is not on any scale.
pub const HSV_FALLBACK_DELTA: f64 = 0.1;

/// Default iteration bound for [`step_until_aa_compliant`].
pub const DEFAULT_MAX_STEPS: usize = 10;

/// Reference emitted when no scale color can be matched at all.
pub const FALLBACK_COLOR_REF: &str = "var(--recursica-tokens-colors-gray-500)";

fn searchable_scales(tokens: &TokenSet) -> impl Iterator<Item = &ColorScale> {
    tokens
        .scales()
        .filter(|scale| scale.key != TRANSLUCENT_FAMILY)
}

/// Exact (case-insensitive) match of `hex` against every scale.
///
/// Returns the scale key, never its alias. A match at `000` that shares its
/// hex with `050` reports `050`.
pub fn find_color_family_and_level(hex: &Hex, tokens: &TokenSet) -> Option<ColorAddress> {
    searchable_scales(tokens).find_map(|scale| {
        let (level, _) = scale.levels.iter().find(|(_, value)| *value == hex)?;
        let level = match *level {
            Level::L000 if scale.levels.get(&Level::L050) == Some(hex) => Level::L050,
            other => other,
        };
        Some(ColorAddress {
            family: scale.key.clone(),
            level,
        })
    })
}

/// Nearest scale color by Euclidean RGB distance.
///
/// Ties go to the first candidate in traversal order: current-shape scales
/// before legacy ones, scale keys ascending, levels lightest first.
pub fn find_closest_color_token(hex: &Hex, tokens: &TokenSet) -> Option<ColorAddress> {
    let target = hex.rgb();
    let mut best: Option<(f64, ColorAddress)> = None;
    for scale in searchable_scales(tokens) {
        for (level, value) in &scale.levels {
            let distance = target.distance(value.rgb());
            if best.as_ref().is_none_or(|(current, _)| distance < *current) {
                best = Some((
                    distance,
                    ColorAddress {
                        family: scale.key.clone(),
                        level: *level,
                    },
                ));
            }
        }
    }
    best.map(|(_, address)| address)
}

fn hsv_fallback(hex: &Hex, direction: Direction) -> Hex {
    let delta = match direction {
        Direction::Darker => -HSV_FALLBACK_DELTA,
        Direction::Lighter => HSV_FALLBACK_DELTA,
    };
    adjust_value(hex, delta)
}

/// The next color one level in `direction`.
///
/// Off-scale colors, and steps that land on a level with no token, degrade
/// to an HSV value shift. At a scale boundary the same hex comes back.
/// `None` only when `hex` is not a hex literal.
pub fn get_stepped_color(hex: &str, direction: Direction, tokens: &TokenSet) -> Option<Hex> {
    let hex = Hex::parse(hex)?;
    let Some(address) = find_color_family_and_level(&hex, tokens) else {
        tracing::warn!(%hex, direction = direction.as_str(), "color not on any scale; shifting HSV value");
        return Some(hsv_fallback(&hex, direction));
    };
    let target = address.level.step(direction);
    match tokens.color(&address.family, target) {
        Some(stepped) => Some(stepped.clone()),
        None => {
            tracing::warn!(
                family = %address.family,
                level = %target,
                "no token at stepped level; shifting HSV value"
            );
            Some(hsv_fallback(&hex, direction))
        }
    }
}

/// Step from `start` in `direction` until `surface` contrast reaches AA.
///
/// Stops early on a stall (scale boundary). If `direction` fails, the
/// opposite direction is tried once from `start`; when both fail the last
/// color reached in `direction` is returned.
pub fn step_until_aa_compliant(
    start: &Hex,
    surface: &Hex,
    direction: Direction,
    tokens: &TokenSet,
    max_steps: usize,
) -> Hex {
    step_until(start, surface, direction, tokens, max_steps, false)
}

fn step_until(
    start: &Hex,
    surface: &Hex,
    direction: Direction,
    tokens: &TokenSet,
    max_steps: usize,
    tried_opposite: bool,
) -> Hex {
    let mut current = start.clone();
    for _ in 0..max_steps {
        let Some(next) = get_stepped_color(current.as_str(), direction, tokens) else {
            break;
        };
        if next == current {
            break;
        }
        current = next;
        if meets_aa(&current, surface) {
            return current;
        }
    }

    if !tried_opposite {
        let other = step_until(start, surface, direction.opposite(), tokens, max_steps, true);
        if meets_aa(&other, surface) {
            return other;
        }
    }
    current
}

fn token_var_ref(address: &ColorAddress) -> String {
    let level = address.level.to_string();
    let name = path_to_internal_name(&["tokens", "colors", address.family.as_str(), level.as_str()])
        .unwrap_or_default();
    format!("var({name})")
}

/// A `var(--recursica-tokens-colors-…)` reference for `hex`.
///
/// Exact match first, nearest match second, [`FALLBACK_COLOR_REF`] last.
pub fn hex_to_css_var_ref(hex: &Hex, tokens: &TokenSet) -> String {
    if let Some(address) = find_color_family_and_level(hex, tokens) {
        return token_var_ref(&address);
    }
    if let Some(address) = find_closest_color_token(hex, tokens) {
        return token_var_ref(&address);
    }
    tracing::warn!(%hex, "no scale colors available; using fallback reference");
    FALLBACK_COLOR_REF.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::contrast_ratio;
    use serde_json::json;

    fn hex(value: &str) -> Hex {
        Hex::parse(value).expect("fixture hex should parse")
    }

    fn gray_scale() -> TokenSet {
        TokenSet::from_json(&json!({
            "tokens": {
                "colors": {
                    "scale-01": {
                        "alias": "gray",
                        "000": {"$value": "#ffffff"},
                        "050": {"$value": "#f5f5f5"},
                        "100": {"$value": "#e5e5e5"},
                        "200": {"$value": "#d4d4d4"},
                        "300": {"$value": "#a3a3a3"},
                        "400": {"$value": "#8a8a8a"},
                        "500": {"$value": "#737373"},
                        "600": {"$value": "#525252"},
                        "700": {"$value": "#404040"},
                        "800": {"$value": "#262626"},
                        "900": {"$value": "#171717"},
                        "1000": {"$value": "#0a0a0a"}
                    },
                    "translucent": {"500": {"$value": "#777777"}}
                }
            }
        }))
    }

    fn pale_scale() -> TokenSet {
        TokenSet::from_json(&json!({
            "tokens": {
                "colors": {
                    "scale-02": {
                        "050": {"$value": "#fefefe"},
                        "100": {"$value": "#fdfdfd"},
                        "200": {"$value": "#fcfcfc"},
                        "300": {"$value": "#fbfbfb"},
                        "400": {"$value": "#fafafa"},
                        "500": {"$value": "#f5f5f5"},
                        "600": {"$value": "#f4f4f4"},
                        "700": {"$value": "#f3f3f3"},
                        "800": {"$value": "#f2f2f2"},
                        "900": {"$value": "#f0f0f0"},
                        "1000": {"$value": "#eeeeee"}
                    }
                }
            }
        }))
    }

    #[test]
    fn exact_lookup_returns_scale_key_and_skips_translucent() {
        let tokens = gray_scale();
        let address = find_color_family_and_level(&hex("#737373"), &tokens)
            .expect("500 should match");
        assert_eq!(address.family, "scale-01");
        assert_eq!(address.level, Level::L500);
        assert!(find_color_family_and_level(&hex("#777777"), &tokens).is_none());
    }

    #[test]
    fn closest_lookup_minimizes_rgb_distance() {
        let tokens = gray_scale();
        // #abcdef is nearest to #d4d4d4 (distance ≈ 49.6) among the grays.
        let address =
            find_closest_color_token(&hex("#abcdef"), &tokens).expect("some scale color");
        assert_eq!(address.level, Level::L200);
        let exact =
            find_closest_color_token(&hex("#404040"), &tokens).expect("exact is also closest");
        assert_eq!(exact.level, Level::L700);
    }

    #[test]
    fn stepping_darker_reaches_and_holds_the_boundary() {
        let tokens = gray_scale();
        let stepped = get_stepped_color("#171717", Direction::Darker, &tokens);
        assert_eq!(stepped, Some(hex("#0a0a0a")));
        let again = get_stepped_color("#0a0a0a", Direction::Darker, &tokens);
        assert_eq!(again, Some(hex("#0a0a0a")));
        let lighter = get_stepped_color("#f5f5f5", Direction::Lighter, &tokens);
        assert_eq!(lighter, Some(hex("#ffffff")));
    }

    #[test]
    fn off_scale_colors_degrade_to_hsv_shift() {
        let tokens = gray_scale();
        assert_eq!(
            get_stepped_color("#ffffff", Direction::Darker, &TokenSet::default()),
            Some(hex("#e6e6e6"))
        );
        assert_eq!(get_stepped_color("not-a-color", Direction::Darker, &tokens), None);
    }

    #[test]
    fn aa_stepping_finds_first_compliant_tone() {
        let tokens = gray_scale();
        let surface = hex("#ffffff");
        let result = step_until_aa_compliant(
            &hex("#f5f5f5"),
            &surface,
            Direction::Darker,
            &tokens,
            DEFAULT_MAX_STEPS,
        );
        assert!(contrast_ratio(&result, &surface) >= 4.5);
        assert_eq!(result, hex("#737373"));
    }

    #[test]
    fn aa_stepping_returns_darkest_when_nothing_complies() {
        let tokens = pale_scale();
        let result = step_until_aa_compliant(
            &hex("#f5f5f5"),
            &hex("#ffffff"),
            Direction::Darker,
            &tokens,
            DEFAULT_MAX_STEPS,
        );
        assert_eq!(result, hex("#eeeeee"));
    }

    #[test]
    fn aa_stepping_tries_opposite_direction() {
        let tokens = gray_scale();
        let surface = hex("#000000");
        let result = step_until_aa_compliant(
            &hex("#262626"),
            &surface,
            Direction::Darker,
            &tokens,
            DEFAULT_MAX_STEPS,
        );
        assert!(contrast_ratio(&result, &surface) >= 4.5);
    }

    #[test]
    fn css_var_ref_prefers_exact_then_nearest() {
        let tokens = gray_scale();
        assert_eq!(
            hex_to_css_var_ref(&hex("#525252"), &tokens),
            "var(--recursica-tokens-colors-scale-01-600)"
        );
        assert_eq!(
            hex_to_css_var_ref(&hex("#535353"), &tokens),
            "var(--recursica-tokens-colors-scale-01-600)"
        );
        assert_eq!(
            hex_to_css_var_ref(&hex("#535353"), &TokenSet::default()),
            FALLBACK_COLOR_REF
        );
    }
}
