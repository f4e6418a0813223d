//! Color reference resolution.
//!
//! Resolves a raw CSS value down to a literal hex by following `var()`
//! indirection, token-color variable names, brand palette variables, and
//! JSON `{…}` references. Reference chains are not guaranteed acyclic, so
//! every recursion step increments `depth` and resolution fails closed past
//! [`MAX_RESOLVE_DEPTH`].

use crate::codec::{INTERNAL_PREFIX, path_to_internal_name, reference_to_path};
use crate::color::Hex;
use crate::css_vars::CssVarSource;
use crate::token_index::TokenIndex;
use regex::Regex;
use std::sync::LazyLock;

pub const MAX_RESOLVE_DEPTH: usize = 10;

static VAR_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^var\(\s*(--[A-Za-z0-9_-]+)\s*(?:,\s*(.*))?\)$").expect("var() pattern")
});
static TOKEN_COLOR_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^--recursica-tokens-colors?-(.+)-(000|050|[1-9]00|1000)$")
        .expect("token color variable pattern")
});
static PALETTE_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^--recursica-brand-(?:themes-)?(light|dark)-palettes-.+-(on-tone|tone)$")
        .expect("palette variable pattern")
});

/// The custom-property name inside `var(--name[, fallback])`.
pub fn var_reference(value: &str) -> Option<&str> {
    VAR_REF
        .captures(value.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn var_fallback(value: &str) -> Option<&str> {
    VAR_REF
        .captures(value.trim())
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str().trim())
        .filter(|fallback| !fallback.is_empty())
}

/// Bind a theme-agnostic `{brand.…}` path to `mode`.
///
/// `brand.palettes.x` → `brand.themes.<mode>.palettes.x`; legacy
/// `brand.<mode>.x` → `brand.themes.<mode>.x`. Already-qualified and
/// non-brand paths are returned unchanged.
pub fn bind_brand_path(path: &[String], mode: &str) -> Vec<String> {
    match path {
        [brand, themes, ..] if brand == "brand" && themes == "themes" => path.to_vec(),
        [brand, qualifier, rest @ ..]
            if brand == "brand" && (qualifier == "light" || qualifier == "dark") =>
        {
            let mut bound = vec!["brand".to_string(), "themes".to_string(), qualifier.clone()];
            bound.extend(rest.iter().cloned());
            bound
        }
        [brand, rest @ ..] if brand == "brand" => {
            let mut bound = vec!["brand".to_string(), "themes".to_string(), mode.to_string()];
            bound.extend(rest.iter().cloned());
            bound
        }
        _ => path.to_vec(),
    }
}

/// Resolves CSS values to hex against a token index and a style environment.
pub struct ColorResolver<'a, E: CssVarSource + ?Sized> {
    index: &'a TokenIndex,
    env: &'a E,
    mode: String,
}

impl<'a, E: CssVarSource + ?Sized> ColorResolver<'a, E> {
    pub fn new(index: &'a TokenIndex, env: &'a E) -> Self {
        Self {
            index,
            env,
            mode: "light".to_string(),
        }
    }

    /// Mode used to bind theme-agnostic `{brand.…}` references.
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    pub fn resolve(&self, value: &str) -> Option<Hex> {
        self.resolve_at(value, 0)
    }

    fn resolve_at(&self, value: &str, depth: usize) -> Option<Hex> {
        if depth > MAX_RESOLVE_DEPTH {
            tracing::debug!(value, "reference chain exceeded depth bound");
            return None;
        }
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        if let Some(hex) = Hex::parse(value) {
            return Some(hex);
        }

        if let Some(var_name) = var_reference(value) {
            if let Some(next) = self.env.read_css_var(var_name) {
                return self.resolve_at(&next, depth + 1);
            }
            if let Some(hex) = self.resolve_unset(var_name) {
                return Some(hex);
            }
            return var_fallback(value).and_then(|fallback| self.resolve_at(fallback, depth + 1));
        }

        if let Some(path) = reference_to_path(value) {
            let bound = bind_brand_path(&path, &self.mode);
            if bound.first().map(String::as_str) == Some("tokens")
                && let [_, category, family, level] = bound.as_slice()
                && matches!(category.as_str(), "colors" | "color")
            {
                return self.index.color(family, level);
            }
            let name = path_to_internal_name(&bound)?;
            if let Some(next) = self.env.read_css_var(&name) {
                return self.resolve_at(&next, depth + 1);
            }
            return self.resolve_unset(&name);
        }

        // Bare palette names are the only input not yet read live.
        if PALETTE_VAR.is_match(value)
            && let Some(next) = self.env.read_css_var(value)
        {
            return self.resolve_at(&next, depth + 1);
        }
        self.resolve_unset(value)
    }

    /// Token color names resolve through the index even with no live value.
    fn resolve_unset(&self, name: &str) -> Option<Hex> {
        if !name.starts_with(INTERNAL_PREFIX) {
            return None;
        }
        let caps = TOKEN_COLOR_VAR.captures(name)?;
        let family = caps.get(1)?.as_str();
        let level = match caps.get(2)?.as_str() {
            "000" => "050",
            other => other,
        };
        self.index.color(family, level)
    }
}

/// Resolve `value` to hex; `None` when the chain is unresolvable or too deep.
pub fn resolve_css_var_to_hex<E: CssVarSource + ?Sized>(
    value: &str,
    index: &TokenIndex,
    env: &E,
) -> Option<Hex> {
    ColorResolver::new(index, env).resolve(value)
}
