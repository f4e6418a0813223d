//! Schema validation seam and the benign-issue filter.
//!
//! Any engine that reports issues with a keyword and a JSON-pointer
//! instance path can back [`SchemaValidator`]. Some deviations are accepted
//! by contract (flexible sections) and never block an export; everything
//! else does.

use crate::error::ExportError;
use crate::reconstruct::color_literal;
use recursica_kernel::codec::reference_to_path;
use recursica_kernel::json_path::walk_leaves;
use recursica_kernel::normalize::MODES;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;

static PALETTE_DEFAULT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/palettes/[^/]+/default(?:/|$)").expect("palette default pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    Tokens,
    Brand,
    Uikit,
}

impl SchemaKind {
    pub const ALL: [SchemaKind; 3] = [SchemaKind::Tokens, SchemaKind::Brand, SchemaKind::Uikit];

    pub fn as_str(self) -> &'static str {
        match self {
            SchemaKind::Tokens => "tokens",
            SchemaKind::Brand => "brand",
            SchemaKind::Uikit => "uikit",
        }
    }

    /// Document root key.
    pub fn root_key(self) -> &'static str {
        match self {
            SchemaKind::Tokens => "tokens",
            SchemaKind::Brand => "brand",
            SchemaKind::Uikit => "ui-kit",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.json", self.as_str())
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaIssue {
    /// Schema keyword that failed (`required`, `additionalProperties`, …).
    pub keyword: String,
    /// JSON pointer into the validated document.
    pub instance_path: String,
    pub message: String,
}

impl SchemaIssue {
    pub fn new(
        keyword: impl Into<String>,
        instance_path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            instance_path: instance_path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.instance_path.is_empty() {
            "/"
        } else {
            &self.instance_path
        };
        write!(f, "{path} ({}): {}", self.keyword, self.message)
    }
}

/// The validation collaborator.
pub trait SchemaValidator {
    fn validate(&self, doc: &Value, kind: SchemaKind) -> Vec<SchemaIssue>;
}

/// Deviations accepted by contract.
pub fn is_benign(issue: &SchemaIssue) -> bool {
    let path = issue.instance_path.as_str();
    match issue.keyword.as_str() {
        "additionalProperties" => true,
        _ if path.contains("/typography") || path.contains("/grid") => true,
        "enum" if path.ends_with("/$type") => true,
        "oneOf" | "required" if PALETTE_DEFAULT.is_match(path) => true,
        _ => false,
    }
}

/// Validate one artifact; critical issues become [`ExportError::SchemaValidation`].
pub fn validate_artifact(
    validator: &dyn SchemaValidator,
    kind: SchemaKind,
    doc: &Value,
) -> Result<(), ExportError> {
    let issues = validator.validate(doc, kind);
    let total = issues.len();
    let critical: Vec<SchemaIssue> = issues.into_iter().filter(|i| !is_benign(i)).collect();
    if total > critical.len() {
        tracing::debug!(%kind, benign = total - critical.len(), "ignoring benign schema issues");
    }
    match critical.first() {
        None => Ok(()),
        Some(first) => Err(ExportError::SchemaValidation {
            kind,
            count: critical.len(),
            first: first.to_string(),
        }),
    }
}

/// Built-in shape checks for the three export documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralValidator;

const TOKEN_SECTIONS: [&str; 4] = ["colors", "sizes", "opacities", "font"];
const UIKIT_SECTIONS: [&str; 2] = ["globals", "components"];

fn pointer(path: &[&str]) -> String {
    path.iter()
        .map(|segment| format!("/{}", segment.replace('~', "~0").replace('/', "~1")))
        .collect()
}

fn check_root<'a>(
    doc: &'a Value,
    kind: SchemaKind,
    issues: &mut Vec<SchemaIssue>,
) -> Option<&'a serde_json::Map<String, Value>> {
    let Some(root) = doc.as_object() else {
        issues.push(SchemaIssue::new("type", "", "document must be an object"));
        return None;
    };
    for key in root.keys() {
        if key != kind.root_key() && !key.starts_with('$') {
            issues.push(SchemaIssue::new(
                "additionalProperties",
                pointer(&[key]),
                format!("unexpected top-level key `{key}`"),
            ));
        }
    }
    let body = root.get(kind.root_key()).and_then(Value::as_object);
    if body.is_none() {
        issues.push(SchemaIssue::new(
            "required",
            "",
            format!("missing object `{}`", kind.root_key()),
        ));
    }
    body
}

fn check_reference(text: &str, at: &str, issues: &mut Vec<SchemaIssue>) {
    if text.starts_with('{') && reference_to_path(text).is_none() {
        issues.push(SchemaIssue::new(
            "pattern",
            at,
            format!("malformed reference `{text}`"),
        ));
    }
}

impl StructuralValidator {
    fn tokens(body: &serde_json::Map<String, Value>, issues: &mut Vec<SchemaIssue>) {
        for (section, subtree) in body {
            if !TOKEN_SECTIONS.contains(&section.as_str()) {
                issues.push(SchemaIssue::new(
                    "additionalProperties",
                    pointer(&["tokens", section]),
                    format!("unknown token section `{section}`"),
                ));
            }
            walk_leaves(subtree, |path, node| {
                let mut segments = vec!["tokens", section.as_str()];
                segments.extend(path.iter().map(String::as_str));
                let at = pointer(&segments);
                if section == "colors" && path.last().map(String::as_str) == Some("alias") {
                    return;
                }
                let Some(entry) = node.as_object() else {
                    issues.push(SchemaIssue::new(
                        "type",
                        at,
                        "token must be a {$type, $value} object",
                    ));
                    return;
                };
                let value = entry.get("$value").unwrap_or(&Value::Null);
                let is_color = entry.get("$type").and_then(Value::as_str) == Some("color");
                match value.as_str() {
                    Some(text) if is_color && !text.starts_with('{') && color_literal(text).is_none() => {
                        issues.push(SchemaIssue::new(
                            "pattern",
                            format!("{at}/$value"),
                            format!("`{text}` is not a hex or rgb() color"),
                        ));
                    }
                    Some(text) => check_reference(text, &format!("{at}/$value"), issues),
                    None => {}
                }
            });
        }
    }

    fn brand(body: &serde_json::Map<String, Value>, issues: &mut Vec<SchemaIssue>) {
        let Some(themes) = body.get("themes").and_then(Value::as_object) else {
            issues.push(SchemaIssue::new(
                "required",
                "/brand",
                "missing object `themes`",
            ));
            return;
        };
        for mode in themes.keys() {
            if !MODES.contains(&mode.as_str()) {
                issues.push(SchemaIssue::new(
                    "additionalProperties",
                    pointer(&["brand", "themes", mode]),
                    format!("unknown theme `{mode}`"),
                ));
            }
        }
        Self::references(&Value::Object(body.clone()), "brand", issues);
    }

    fn uikit(body: &serde_json::Map<String, Value>, issues: &mut Vec<SchemaIssue>) {
        for key in body.keys() {
            if !UIKIT_SECTIONS.contains(&key.as_str()) {
                issues.push(SchemaIssue::new(
                    "additionalProperties",
                    pointer(&["ui-kit", key]),
                    format!("unknown ui-kit section `{key}`"),
                ));
            }
        }
        Self::references(&Value::Object(body.clone()), "ui-kit", issues);
    }

    fn references(body: &Value, root: &str, issues: &mut Vec<SchemaIssue>) {
        walk_leaves(body, |path, node| {
            let value = match node {
                Value::Object(entry) => entry.get("$value"),
                other => Some(other),
            };
            if let Some(text) = value.and_then(Value::as_str) {
                let mut segments = vec![root];
                segments.extend(path.iter().map(String::as_str));
                check_reference(text, &pointer(&segments), issues);
            }
        });
    }
}

impl SchemaValidator for StructuralValidator {
    fn validate(&self, doc: &Value, kind: SchemaKind) -> Vec<SchemaIssue> {
        let mut issues = Vec::new();
        let Some(body) = check_root(doc, kind, &mut issues) else {
            return issues;
        };
        match kind {
            SchemaKind::Tokens => Self::tokens(body, &mut issues),
            SchemaKind::Brand => Self::brand(body, &mut issues),
            SchemaKind::Uikit => Self::uikit(body, &mut issues),
        }
        issues
    }
}
