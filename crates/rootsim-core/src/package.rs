use serde::{Deserialize, Serialize};

use crate::{InstallMethod, SimError, SimResult};

/// One installable unit in the synthetic catalog, regardless of how it is installed.
///
/// `method` keeps the tag exactly as it was declared so that unrecognized tags survive
/// loading and are rejected at dispatch time instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackageMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub architecture: String,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub maintainer: String,
    #[serde(default, alias = "depends")]
    pub dependencies: Vec<String>,
    #[serde(default = "available_default")]
    pub available: bool,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub source: String,
}

impl PackageMetadata {
    pub fn new(
        name: impl Into<String>,
        method: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            method: method.into(),
            source: source.into(),
            available: true,
            ..Self::default()
        }
    }

    pub fn install_method(&self) -> SimResult<InstallMethod> {
        InstallMethod::parse(&self.method).ok_or_else(|| SimError::Unsupported(self.method.clone()))
    }

    pub fn is_method(&self, method: InstallMethod) -> bool {
        InstallMethod::parse(&self.method) == Some(method)
    }
}

/// A package source: an apt-style repository or a bundle remote.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepositoryInfo {
    #[serde(default)]
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub components: Vec<String>,
    #[serde(default = "available_default")]
    pub enabled: bool,
    #[serde(default, alias = "gpg_check")]
    pub verify_signatures: bool,
}

fn available_default() -> bool {
    true
}
