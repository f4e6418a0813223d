//! The active style environment.
//!
//! The kernel never touches a rendering surface. Everything that reads a
//! custom property goes through [`CssVarSource`]; [`CssVarMap`] is the
//! in-memory snapshot used outside a browser.

use crate::codec::INTERNAL_PREFIX;
use std::collections::BTreeMap;

/// Read access to currently applied custom properties.
pub trait CssVarSource {
    /// Raw value of one custom property, if set.
    fn raw_css_var(&self, name: &str) -> Option<&str>;

    /// Every currently set `--recursica-*` property and its value.
    fn active_vars(&self) -> BTreeMap<String, String>;

    /// Trimmed value of `name`, or `None` when unset or blank.
    fn read_css_var(&self, name: &str) -> Option<String> {
        let name = normalize_var_name(name);
        let value = self.raw_css_var(&name)?.trim();
        (!value.is_empty()).then(|| value.to_string())
    }
}

/// Add the leading `--` if a caller omitted it.
pub fn normalize_var_name(name: &str) -> String {
    let name = name.trim();
    if name.starts_with("--") {
        name.to_string()
    } else {
        format!("--{name}")
    }
}

/// A materialized snapshot of the custom-property namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssVarMap {
    vars: BTreeMap<String, String>,
}

impl CssVarMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, returning the previous value.
    pub fn set(&mut self, name: impl AsRef<str>, value: impl Into<String>) -> Option<String> {
        self.vars
            .insert(normalize_var_name(name.as_ref()), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.vars.remove(&normalize_var_name(name))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Overlay `other` onto this map; `other` wins on collisions.
    pub fn extend(&mut self, other: CssVarMap) {
        self.vars.extend(other.vars);
    }
}

impl CssVarSource for CssVarMap {
    fn raw_css_var(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    fn active_vars(&self) -> BTreeMap<String, String> {
        self.vars
            .iter()
            .filter(|(name, _)| name.starts_with(INTERNAL_PREFIX))
            .map(|(name, value)| (name.clone(), value.trim().to_string()))
            .collect()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for CssVarMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = CssVarMap::new();
        for (name, value) in iter {
            map.set(name, value);
        }
        map
    }
}
