//! # Recursica Export
//!
//! Turns a store snapshot and its live `--recursica-*` namespace back into
//! shippable artifacts.
//!
//! ```text
//! reconstruct  ← tokens.json / brand.json / uikit.json, theme references stripped
//! schema       ← validator seam + benign-issue filter + structural checks
//! stylesheet   ← <stem>-specific.css / <stem>-scoped.css
//! bundle       ← deterministic <stem>-export.tar.gz
//! pipeline     ← export(): all of the above, per-artifact failure isolation
//! ```

pub mod bundle;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod reconstruct;
pub mod schema;
pub mod stylesheet;

pub use config::{AuditConfig, BundleMode, ExportConfig, RecursicaConfig};
pub use error::ExportError;
pub use pipeline::{Artifact, ArtifactFailure, ExportOptions, ExportOutcome, export};
pub use reconstruct::{
    ExportMetadata, SkippedToken, TokenReconstruction, reconstruct_brand, reconstruct_tokens,
    reconstruct_uikit,
};
pub use schema::{SchemaIssue, SchemaKind, SchemaValidator, StructuralValidator};
pub use stylesheet::{emit_scoped, emit_specific};
