//! AA contrast auditing for Recursica themes.
//!
//! [`audit`] is read-only: it enumerates tone/on-tone and surface/text
//! pairs for both modes, resolves them through the kernel, and returns the
//! failing pairs. [`suggest_fixes`] turns a report into advisory scale
//! replacements.

pub mod compliance;
pub mod fixes;

pub use compliance::{AuditReport, Violation, ViolationKind, audit};
pub use fixes::{FixSuggestion, suggest_fix, suggest_fixes};
