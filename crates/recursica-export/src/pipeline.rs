//! One export run over a store snapshot.
//!
//! JSON artifacts fail independently: a schema failure or theme leak in
//! `brand.json` is reported in [`ExportOutcome::failures`] while
//! `tokens.json` and `uikit.json` are still produced. Only the optional
//! compliance gate aborts the whole run.

use crate::bundle::bundle;
use crate::config::{BundleMode, RecursicaConfig};
use crate::error::ExportError;
use crate::reconstruct::{
    ExportMetadata, SkippedToken, attach_metadata, find_theme_leaks, reconstruct_brand,
    reconstruct_tokens, reconstruct_uikit,
};
use crate::schema::{SchemaKind, SchemaValidator, validate_artifact};
use crate::stylesheet::{emit_scoped, emit_specific};
use chrono::{DateTime, SecondsFormat, Utc};
use recursica_audit::audit;
use recursica_kernel::{CssVarSource, TokenStore, build_token_index, internal_to_exported_name};
use serde::Serialize;
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

pub const MANIFEST_FILE: &str = "variables.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub version: String,
    pub file_stem: String,
    pub specific_css: bool,
    pub scoped_css: bool,
    pub manifest: bool,
    pub bundle: BundleMode,
    pub gate_on_compliance: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::from(&RecursicaConfig::default())
    }
}

impl From<&RecursicaConfig> for ExportOptions {
    fn from(config: &RecursicaConfig) -> Self {
        Self {
            version: config.export.version.clone(),
            file_stem: config.export.file_stem.clone(),
            specific_css: config.export.specific_css,
            scoped_css: config.export.scoped_css,
            manifest: config.export.manifest,
            bundle: config.export.bundle,
            gate_on_compliance: config.audit.gate_export,
        }
    }
}

impl ExportOptions {
    pub fn specific_file(&self) -> String {
        format!("{}-specific.css", self.file_stem)
    }

    pub fn scoped_file(&self) -> String {
        format!("{}-scoped.css", self.file_stem)
    }

    pub fn bundle_file(&self) -> String {
        format!("{}-export.tar.gz", self.file_stem)
    }
}

/// A produced file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub file_name: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub size: usize,
    pub sha256: String,
}

impl Artifact {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Self {
            file_name: file_name.into(),
            size: bytes.len(),
            sha256: format!("{:x}", hasher.finalize()),
            bytes,
        }
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// A JSON artifact that was blocked.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactFailure {
    pub kind: SchemaKind,
    pub file_name: String,
    pub message: String,
    #[serde(skip)]
    pub error: ExportError,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOutcome {
    pub exported_at: String,
    pub artifacts: Vec<Artifact>,
    pub failures: Vec<ArtifactFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle: Option<Artifact>,
    pub skipped_tokens: Vec<SkippedToken>,
}

impl ExportOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn artifact(&self, file_name: &str) -> Option<&Artifact> {
        self.artifacts
            .iter()
            .find(|artifact| artifact.file_name == file_name)
    }
}

fn json_bytes(artifact: &str, doc: &Value) -> Result<Vec<u8>, ExportError> {
    let mut bytes = serde_json::to_vec_pretty(doc).map_err(|source| ExportError::Serialize {
        artifact: artifact.to_string(),
        source,
    })?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Leak scan for brand and UIKit, then the schema adapter.
fn check_document(
    validator: &dyn SchemaValidator,
    kind: SchemaKind,
    doc: &Value,
) -> Result<(), ExportError> {
    if kind != SchemaKind::Tokens {
        let leaks = find_theme_leaks(doc);
        if let Some((path, value)) = leaks.first() {
            return Err(ExportError::ThemeLeak {
                kind,
                count: leaks.len(),
                path: path.clone(),
                value: value.clone(),
            });
        }
    }
    validate_artifact(validator, kind, doc)
}

fn manifest(vars: &BTreeMap<String, String>, metadata: &ExportMetadata) -> Value {
    let variables: BTreeMap<String, String> = vars
        .iter()
        .filter_map(|(name, value)| {
            let exported = internal_to_exported_name(name);
            if exported.is_none() {
                tracing::warn!(%name, "variable left out of manifest; name not recognized");
            }
            Some((exported?, value.trim().to_string()))
        })
        .collect();
    json!({
        "$metadata": { "exportedAt": metadata.exported_at, "version": metadata.version },
        "variables": variables,
    })
}

/// Reconstruct, validate, emit, digest, and optionally bundle.
pub fn export<S>(
    store: &S,
    validator: &dyn SchemaValidator,
    options: &ExportOptions,
    exported_at: DateTime<Utc>,
) -> Result<ExportOutcome, ExportError>
where
    S: TokenStore + CssVarSource + ?Sized,
{
    let state = store.state();
    if options.gate_on_compliance {
        let index = build_token_index(&state.tokens);
        let report = audit(&state.theme, store, &index);
        if !report.is_compliant() {
            return Err(ExportError::ComplianceGate(report.violations.len()));
        }
    }

    let vars = store.active_vars();
    let metadata = ExportMetadata {
        exported_at: exported_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        version: options.version.clone(),
    };
    let mut outcome = ExportOutcome {
        exported_at: metadata.exported_at.clone(),
        ..ExportOutcome::default()
    };

    let tokens = reconstruct_tokens(&state.tokens, &vars);
    outcome.skipped_tokens = tokens.skipped;
    let documents = [
        (SchemaKind::Tokens, tokens.document),
        (SchemaKind::Brand, reconstruct_brand(&state.theme)),
        (SchemaKind::Uikit, reconstruct_uikit(&state.uikit)),
    ];
    for (kind, mut doc) in documents {
        attach_metadata(&mut doc, &metadata);
        let file_name = kind.file_name();
        let produced =
            check_document(validator, kind, &doc).and_then(|()| json_bytes(&file_name, &doc));
        match produced {
            Ok(bytes) => outcome.artifacts.push(Artifact::new(file_name, bytes)),
            Err(error) => {
                tracing::warn!(%kind, %error, "artifact blocked");
                outcome.failures.push(ArtifactFailure {
                    kind,
                    file_name,
                    message: error.to_string(),
                    error,
                });
            }
        }
    }

    if options.specific_css {
        let css = emit_specific(&vars);
        outcome
            .artifacts
            .push(Artifact::new(options.specific_file(), css.into_bytes()));
    }
    if options.scoped_css {
        let css = emit_scoped(&vars);
        outcome
            .artifacts
            .push(Artifact::new(options.scoped_file(), css.into_bytes()));
    }
    if options.manifest {
        let bytes = json_bytes(MANIFEST_FILE, &manifest(&vars, &metadata))?;
        outcome.artifacts.push(Artifact::new(MANIFEST_FILE, bytes));
    }

    let wants_bundle = match options.bundle {
        BundleMode::Always => !outcome.artifacts.is_empty(),
        BundleMode::Auto => outcome.artifacts.len() > 1,
        BundleMode::Never => false,
    };
    if wants_bundle {
        let mtime = u64::try_from(exported_at.timestamp()).unwrap_or_default();
        let bytes = bundle(
            outcome
                .artifacts
                .iter()
                .map(|artifact| (artifact.file_name.as_str(), artifact.bytes.as_slice())),
            mtime,
        )?;
        outcome.bundle = Some(Artifact::new(options.bundle_file(), bytes));
    }

    tracing::info!(
        artifacts = outcome.artifacts.len(),
        failures = outcome.failures.len(),
        skipped = outcome.skipped_tokens.len(),
        "export finished"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::StructuralValidator;
    use chrono::TimeZone;
    use recursica_kernel::MemoryStore;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn store() -> MemoryStore {
        MemoryStore::new(
            &json!({"tokens": {"colors": {"gray": {"500": {"$type": "color", "$value": "#737373"}}}}}),
            &json!({"brand": {"themes": {"light": {"palettes": {}}}}}),
            &json!({"ui-kit": {"globals": {}}}),
        )
    }

    #[test]
    fn artifacts_carry_digests_and_metadata() {
        let outcome = export(&store(), &StructuralValidator, &ExportOptions::default(), at())
            .expect("export runs");
        assert!(outcome.is_complete());
        let names: Vec<&str> = outcome.artifacts.iter().map(|a| a.file_name.as_str()).collect();
        assert_eq!(
            names,
            [
                "tokens.json",
                "brand.json",
                "uikit.json",
                "recursica-specific.css",
                "recursica-scoped.css"
            ]
        );
        let tokens: Value =
            serde_json::from_slice(&outcome.artifacts[0].bytes).expect("tokens json");
        assert_eq!(tokens["$metadata"]["exportedAt"], json!("2026-03-01T12:00:00Z"));
        assert_eq!(tokens["$metadata"]["version"], json!("1.0.0"));
        assert!(outcome.artifacts.iter().all(|a| a.sha256.len() == 64));
        assert_eq!(
            outcome.bundle.as_ref().map(|b| b.file_name.as_str()),
            Some("recursica-export.tar.gz")
        );
    }

    #[test]
    fn single_artifact_is_not_bundled_in_auto_mode() {
        let options = ExportOptions {
            specific_css: false,
            scoped_css: false,
            ..ExportOptions::default()
        };
        struct OnlyTokens;
        impl SchemaValidator for OnlyTokens {
            fn validate(&self, _: &Value, kind: SchemaKind) -> Vec<crate::schema::SchemaIssue> {
                if kind == SchemaKind::Tokens {
                    Vec::new()
                } else {
                    vec![crate::schema::SchemaIssue::new("required", "", "rejected")]
                }
            }
        }
        let outcome = export(&store(), &OnlyTokens, &options, at()).expect("export runs");
        assert_eq!(outcome.artifacts.len(), 1);
        assert_eq!(outcome.failures.len(), 2);
        assert!(outcome.bundle.is_none());
    }

    #[test]
    fn manifest_uses_exported_names() {
        let options = ExportOptions {
            manifest: true,
            bundle: BundleMode::Never,
            ..ExportOptions::default()
        };
        let outcome =
            export(&store(), &StructuralValidator, &options, at()).expect("export runs");
        let manifest = outcome.artifact(MANIFEST_FILE).expect("manifest produced");
        let doc: Value = serde_json::from_slice(&manifest.bytes).expect("manifest json");
        assert_eq!(
            doc["variables"]["--recursica_tokens_colors_gray_500"],
            json!("#737373")
        );
        assert!(outcome.bundle.is_none());
    }
}
