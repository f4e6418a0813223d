//! Suggested replacements for failing foregrounds.
//!
//! Each suggestion steps the foreground along its token scale, away from
//! the background, and names the result as a token variable reference.
//! Suggestions are advisory; `compliant` says whether the stepped color
//! actually reaches AA.

use crate::compliance::{AuditReport, Violation};
use recursica_kernel::stepping::DEFAULT_MAX_STEPS;
use recursica_kernel::{
    Direction, Hex, TokenSet, contrast_ratio, hex_to_css_var_ref, meets_aa,
    step_until_aa_compliant,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixSuggestion {
    pub mode: String,
    pub location: String,
    /// Variable whose value should change.
    pub variable: String,
    pub current_hex: Hex,
    pub suggested_hex: Hex,
    /// `var(--recursica-tokens-colors-…)` for `suggested_hex`.
    pub suggested_ref: String,
    pub contrast_ratio: f64,
    pub compliant: bool,
}

/// Step darker on light backgrounds, lighter on dark ones.
pub fn direction_away_from(background: &Hex, foreground: &Hex) -> Direction {
    let bg = background.rgb().relative_luminance();
    let fg = foreground.rgb().relative_luminance();
    if fg <= bg {
        Direction::Darker
    } else {
        Direction::Lighter
    }
}

pub fn suggest_fix(violation: &Violation, tokens: &TokenSet) -> FixSuggestion {
    let direction = direction_away_from(&violation.tone_hex, &violation.on_tone_hex);
    let suggested = step_until_aa_compliant(
        &violation.on_tone_hex,
        &violation.tone_hex,
        direction,
        tokens,
        DEFAULT_MAX_STEPS,
    );
    let ratio = contrast_ratio(&suggested, &violation.tone_hex);
    if !meets_aa(&suggested, &violation.tone_hex) {
        tracing::warn!(
            mode = %violation.mode,
            location = %violation.location,
            ratio,
            "no compliant scale color found"
        );
    }
    FixSuggestion {
        mode: violation.mode.clone(),
        location: violation.location.clone(),
        variable: violation.on_tone_var.clone(),
        current_hex: violation.on_tone_hex.clone(),
        suggested_ref: hex_to_css_var_ref(&suggested, tokens),
        compliant: meets_aa(&suggested, &violation.tone_hex),
        suggested_hex: suggested,
        contrast_ratio: ratio,
    }
}

/// One suggestion per violation, in report order.
pub fn suggest_fixes(report: &AuditReport, tokens: &TokenSet) -> Vec<FixSuggestion> {
    report
        .violations
        .iter()
        .map(|violation| suggest_fix(violation, tokens))
        .collect()
}
