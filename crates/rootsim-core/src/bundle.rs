use serde::{Deserialize, Serialize};

/// A sandboxed application bundle, flatpak style.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BundleInfo {
    pub name: String,
    #[serde(default)]
    pub id: String,
    /// Package name the bundle is installable under; derived from `id` when absent.
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub runtime: String,
    #[serde(default)]
    pub runtime_version: String,
    #[serde(default)]
    pub sdk: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub remote: String,
    #[serde(default = "branch_default")]
    pub branch: String,
    #[serde(default = "available_default")]
    pub available: bool,
}

impl BundleInfo {
    pub fn package_name(&self) -> String {
        if let Some(package) = self.package.as_deref().filter(|value| !value.trim().is_empty()) {
            return package.to_string();
        }
        self.id
            .rsplit('.')
            .next()
            .unwrap_or(self.id.as_str())
            .to_ascii_lowercase()
    }

    /// Desktop entry file name: the bundle ID with `.` replaced by `_`.
    pub fn desktop_file_name(&self) -> String {
        format!("{}.desktop", self.id.replace('.', "_"))
    }

    pub fn runtime_ref(&self) -> String {
        if self.runtime_version.is_empty() {
            return self.runtime.clone();
        }
        format!("{}/x86_64/{}", self.runtime, self.runtime_version)
    }
}

fn branch_default() -> String {
    "stable".to_string()
}

fn available_default() -> bool {
    true
}
