//! Template sets: one raw template per client kind
//!
//! The original tool required one template per generated client type; a
//! `TemplateSet` is that mapping, loadable from a TOML file so templates live
//! alongside the function manifest instead of in source comments.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading a template set
#[derive(Error, Debug)]
pub enum TemplateSetError {
    #[error("failed to read template file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse template TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Mapping from client-kind name to raw template text.
///
/// Backed by a BTreeMap so iteration order (and therefore generated output
/// that concatenates kinds) is deterministic.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    templates: BTreeMap<String, String>,
}

/// TOML structure for deserializing template sets
#[derive(Deserialize)]
struct TomlTemplates {
    #[serde(default)]
    templates: BTreeMap<String, String>,
}

impl TemplateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template, replacing any previous one for the same kind.
    pub fn insert(&mut self, kind: impl Into<String>, source: impl Into<String>) {
        self.templates.insert(kind.into(), source.into());
    }

    pub fn get(&self, kind: &str) -> Option<&str> {
        self.templates.get(kind).map(|s| s.as_str())
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.templates.contains_key(kind)
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Kind names in sorted order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(|s| s.as_str())
    }

    /// Load a template set from a TOML string.
    ///
    /// ```toml
    /// [templates]
    /// jsonrpc = 'resp, err := call({{lowername}}, {{args.ident}})'
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, TemplateSetError> {
        let parsed: TomlTemplates = toml::from_str(content)?;
        Ok(TemplateSet {
            templates: parsed.templates,
        })
    }

    /// Load a template set from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, TemplateSetError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

impl<K, V> FromIterator<(K, V)> for TemplateSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = TemplateSet::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}
