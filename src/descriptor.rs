//! Function descriptors: the name/parameters/returns triple a template is
//! rendered against
//!
//! Descriptors are produced by an external source-analysis step; this crate
//! consumes them read-only and treats every type as an opaque string. A TOML
//! manifest loader is provided for callers that extract signatures offline.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading a function manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("failed to read manifest file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse manifest TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// One named, typed parameter of a function
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Parameter {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// String-level description of one function to generate code for
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FunctionDescriptor {
    pub name: String,
    #[serde(default)]
    pub params: Vec<Parameter>,
    #[serde(default)]
    pub returns: Vec<String>,
}

impl FunctionDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        FunctionDescriptor {
            name: name.into(),
            params: Vec::new(),
            returns: Vec::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.params.push(Parameter::new(name, ty));
        self
    }

    pub fn with_return(mut self, ty: impl Into<String>) -> Self {
        self.returns.push(ty.into());
        self
    }
}

/// TOML structure for deserializing a function manifest
#[derive(Deserialize)]
struct TomlManifest {
    #[serde(default)]
    functions: Vec<FunctionDescriptor>,
}

/// Load function descriptors from a TOML manifest string.
///
/// ```toml
/// [[functions]]
/// name = "BlockchainInfo"
/// returns = ["*ResultBlockchainInfo", "error"]
///
/// [[functions.params]]
/// name = "minHeight"
/// type = "int"
/// ```
pub fn manifest_from_str(content: &str) -> Result<Vec<FunctionDescriptor>, ManifestError> {
    let parsed: TomlManifest = toml::from_str(content)?;
    Ok(parsed.functions)
}

/// Load function descriptors from a TOML manifest file.
pub fn manifest_from_file(path: &Path) -> Result<Vec<FunctionDescriptor>, ManifestError> {
    let content = std::fs::read_to_string(path)?;
    manifest_from_str(&content)
}
