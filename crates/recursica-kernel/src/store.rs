//! The token/brand/UIKit store collaborator.
//!
//! The core only ever reads [`TokenStore::state`]. [`MemoryStore`] is the
//! in-process implementation: it owns the three documents plus the CSS
//! namespace they project to, and mirrors token edits into that namespace.

use crate::codec::path_to_internal_name;
use crate::css_vars::{CssVarMap, CssVarSource};
use crate::error::TokenError;
use crate::json_path::{get_path, set_path};
use crate::normalize::{MODES, normalize_brand, normalize_tokens, normalize_uikit};
use crate::projection::{project_documents, project_value};
use serde_json::{Value, json};
use std::collections::BTreeMap;

/// Current documents held by a store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot {
    pub tokens: Value,
    pub theme: Value,
    pub uikit: Value,
}

impl Default for StoreSnapshot {
    fn default() -> Self {
        Self {
            tokens: json!({ "tokens": {} }),
            theme: json!({ "brand": { "themes": {} } }),
            uikit: json!({ "ui-kit": {} }),
        }
    }
}

/// Read access to authoritative document state.
pub trait TokenStore {
    fn state(&self) -> &StoreSnapshot;
}

/// Split a token address into path segments rooted at `tokens`.
///
/// Accepts `colors/scale-01/500`, `tokens/colors/scale-01/500`, and the
/// dotted `tokens.colors.scale-01.500` spelling.
pub fn token_path(name: &str) -> Result<Vec<String>, TokenError> {
    let trimmed = name.trim().trim_start_matches('{').trim_end_matches('}');
    let separator = if trimmed.contains('/') { '/' } else { '.' };
    let mut segments: Vec<String> = trimmed
        .split(separator)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect();
    if segments.first().map(String::as_str) != Some("tokens") {
        segments.insert(0, "tokens".to_string());
    }
    if segments.len() < 3 {
        return Err(TokenError::InvalidPath {
            path: name.to_string(),
            reason: "expected <category>/<key>[/<subkey>]".to_string(),
        });
    }
    Ok(segments)
}

/// In-memory store with a live CSS namespace.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    snapshot: StoreSnapshot,
    vars: CssVarMap,
    mode: String,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            snapshot: StoreSnapshot::default(),
            vars: CssVarMap::new(),
            mode: MODES[0].to_string(),
        }
    }
}

impl MemoryStore {
    /// Load documents (either historical shape) and project them.
    pub fn new(tokens: &Value, theme: &Value, uikit: &Value) -> Self {
        let mut store = Self {
            snapshot: StoreSnapshot {
                tokens: normalize_tokens(tokens),
                theme: normalize_brand(theme),
                uikit: normalize_uikit(uikit),
            },
            ..Self::default()
        };
        store.recompute_and_apply_all();
        store
    }

    /// Active mode used to bind theme-agnostic references.
    pub fn mode(&self) -> &str {
        &self.mode
    }

    pub fn set_mode(&mut self, mode: &str) -> Result<(), TokenError> {
        if !MODES.contains(&mode) {
            return Err(TokenError::InvalidMode(mode.to_string()));
        }
        self.mode = mode.to_string();
        Ok(())
    }

    /// The live namespace.
    pub fn vars(&self) -> &CssVarMap {
        &self.vars
    }

    /// Write a token `$value` and mirror it into the namespace.
    ///
    /// Existing leaf metadata (`$type`, `$extensions`) is kept.
    pub fn update_token(&mut self, name: &str, value: Value) -> Result<(), TokenError> {
        let path = token_path(name)?;
        let mut value_path = path.clone();
        value_path.push("$value".to_string());

        let scalar_leaf = get_path(&self.snapshot.tokens, &path).is_some_and(|node| !node.is_object());
        let written = if scalar_leaf {
            set_path(&mut self.snapshot.tokens, &path, json!({ "$value": value.clone() }))
        } else {
            set_path(&mut self.snapshot.tokens, &value_path, value.clone())
        };
        if !written {
            return Err(TokenError::InvalidPath {
                path: name.to_string(),
                reason: "an intermediate segment is not an object".to_string(),
            });
        }

        if let Some(var) = path_to_internal_name(&path) {
            match project_value(&value, &self.mode) {
                Some(css) => self.vars.set(var, css),
                None => self.vars.remove(&var),
            };
        }
        Ok(())
    }

    /// Replace the brand document. Call [`Self::recompute_and_apply_all`] to project it.
    pub fn set_theme(&mut self, theme: &Value) {
        self.snapshot.theme = normalize_brand(theme);
    }

    /// Replace the UIKit document. Call [`Self::recompute_and_apply_all`] to project it.
    pub fn set_uikit(&mut self, uikit: &Value) {
        self.snapshot.uikit = normalize_uikit(uikit);
    }

    /// Rebuild the namespace from the current documents.
    pub fn recompute_and_apply_all(&mut self) {
        self.vars = project_documents(
            &self.snapshot.tokens,
            &self.snapshot.theme,
            &self.snapshot.uikit,
            &self.mode,
        );
        tracing::debug!(vars = self.vars.len(), mode = %self.mode, "recomputed css namespace");
    }
}

impl TokenStore for MemoryStore {
    fn state(&self) -> &StoreSnapshot {
        &self.snapshot
    }
}

impl CssVarSource for MemoryStore {
    fn raw_css_var(&self, name: &str) -> Option<&str> {
        self.vars.raw_css_var(name)
    }

    fn active_vars(&self) -> BTreeMap<String, String> {
        self.vars.active_vars()
    }
}
