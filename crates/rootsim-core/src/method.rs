use std::fmt;

use serde::{Deserialize, Serialize};

/// The four installation methods the simulation understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallMethod {
    Repository,
    Bundle,
    Release,
    Script,
}

impl InstallMethod {
    pub const ALL: [InstallMethod; 4] = [
        InstallMethod::Repository,
        InstallMethod::Bundle,
        InstallMethod::Release,
        InstallMethod::Script,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Repository => "repository",
            Self::Bundle => "bundle",
            Self::Release => "release",
            Self::Script => "script",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "repository" => Some(Self::Repository),
            "bundle" => Some(Self::Bundle),
            "release" => Some(Self::Release),
            "script" => Some(Self::Script),
            _ => None,
        }
    }
}

impl fmt::Display for InstallMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
