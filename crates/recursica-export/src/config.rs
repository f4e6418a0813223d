//! `recursica.toml`: export and audit settings.
//!
//! Every field has a default; an empty or absent file is a valid config.

use crate::error::ExportError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecursicaConfig {
    pub export: ExportConfig,
    pub audit: AuditConfig,
}

impl RecursicaConfig {
    /// Parse TOML text; `path` names the source in errors.
    pub fn parse(text: &str, path: &str) -> Result<Self, ExportError> {
        toml::from_str(text).map_err(|source| ExportError::Config {
            path: path.to_string(),
            source,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundleMode {
    /// Bundle when more than one artifact is produced.
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Written to `$metadata.version`.
    pub version: String,
    pub file_stem: String,
    pub specific_css: bool,
    pub scoped_css: bool,
    /// `variables.json` keyed by exported names.
    pub manifest: bool,
    pub bundle: BundleMode,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            file_stem: "recursica".to_string(),
            specific_css: true,
            scoped_css: true,
            manifest: false,
            bundle: BundleMode::Auto,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Refuse to export while AA violations exist.
    pub gate_export: bool,
    /// Mode used to bind theme-agnostic brand references when projecting.
    pub mode: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            gate_export: false,
            mode: "light".to_string(),
        }
    }
}
