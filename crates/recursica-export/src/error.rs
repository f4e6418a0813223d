//! Export failures.
//!
//! Only conditions that must block an artifact are errors. Unresolved
//! colors and unrecognized variable names degrade with a log line instead.

use crate::schema::SchemaKind;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Critical schema issues remained after benign ones were filtered.
    #[error("{kind} failed schema validation with {count} critical error(s); first: {first}")]
    SchemaValidation {
        kind: SchemaKind,
        count: usize,
        first: String,
    },

    /// A theme-qualified brand reference survived normalization.
    #[error("{kind} contains {count} theme-qualified reference(s); first at {path}: {value}")]
    ThemeLeak {
        kind: SchemaKind,
        count: usize,
        path: String,
        value: String,
    },

    /// Export was gated on AA compliance and the audit found violations.
    #[error("export blocked by {0} AA contrast violation(s)")]
    ComplianceGate(usize),

    #[error("failed to serialize {artifact}: {source}")]
    Serialize {
        artifact: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write bundle: {0}")]
    Bundle(#[from] std::io::Error),

    #[error("invalid config at {path}: {source}")]
    Config {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
