//! # Recursica Kernel
//!
//! Token/reference resolution over a snapshot of design-token JSON and the
//! live `--recursica-*` custom-property namespace.
//!
//! ## Architecture
//!
//! ```text
//! codec            ← JSON path ↔ internal name ↔ exported name
//!     │
//! css_vars         ← CssVarSource: the only seam to the style environment
//!     │
//! token_index      ← TokenSet (canonical scales) → TokenIndex (flat lookup)
//!     │
//! resolver         ← value → hex, through var()/token/palette/JSON references
//!     │
//! stepping         ← next lighter/darker scale color, AA-driven stepping
//! ```
//!
//! `normalize` is the single place historical document shapes are read.
//! `projection` and `store` stand in for the live store that feeds the
//! namespace.
//!
//! Everything here is synchronous and pure over its inputs. Unresolvable
//! references and scale-boundary stalls are ordinary `None`/best-effort
//! results, not errors.

pub mod codec;
pub mod color;
pub mod css_vars;
pub mod error;
pub mod json_path;
pub mod level;
pub mod normalize;
pub mod projection;
pub mod resolver;
pub mod stepping;
pub mod store;
pub mod token_index;

pub use codec::{
    Category, EXPORT_PREFIX, INTERNAL_PREFIX, exported_name_to_path, internal_name_to_path,
    internal_to_exported_name, path_to_exported_name, path_to_internal_name, specific_name,
};
pub use color::{AA_CONTRAST, Hex, contrast_ratio, meets_aa};
pub use css_vars::{CssVarMap, CssVarSource};
pub use error::TokenError;
pub use level::{CANONICAL_LEVELS, Direction, Level};
pub use normalize::{MODES, normalize_brand, normalize_tokens, normalize_uikit};
pub use projection::project_documents;
pub use resolver::{ColorResolver, resolve_css_var_to_hex};
pub use stepping::{
    find_closest_color_token, find_color_family_and_level, get_stepped_color,
    hex_to_css_var_ref, step_until_aa_compliant,
};
pub use store::{MemoryStore, StoreSnapshot, TokenStore};
pub use token_index::{ColorAddress, TokenIndex, TokenSet, build_token_index};
