//! Error types for kernel operations.
//!
//! Unresolvable references and scale-boundary stalls are not errors; they
//! surface as `None` or as a best-effort value. These variants cover input
//! that cannot be interpreted at all.

/// Errors arising from malformed kernel input.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// A level string outside the `000..1000` vocabulary.
    #[error("invalid color level: {0}")]
    InvalidLevel(String),

    /// A stepping direction other than `darker` / `lighter`.
    #[error("invalid direction: {0} (expected darker or lighter)")]
    InvalidDirection(String),

    /// A color string that is not a 6-digit hex literal.
    #[error("invalid hex color: {0}")]
    InvalidHex(String),

    /// A color mode other than `light` / `dark`.
    #[error("invalid mode: {0} (expected light or dark)")]
    InvalidMode(String),

    /// A store path that cannot address a token leaf.
    #[error("invalid token path `{path}`: {reason}")]
    InvalidPath { path: String, reason: String },
}
