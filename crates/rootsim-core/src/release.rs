use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReleaseAsset {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub download_count: u64,
    #[serde(default, alias = "url")]
    pub browser_download_url: String,
}

/// A release record in the shape a code-hosting release API returns it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReleaseInfo {
    pub tag_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

impl ReleaseInfo {
    /// Version string derived from the tag, without a leading `v`.
    pub fn version(&self) -> &str {
        self.tag_name
            .strip_prefix('v')
            .unwrap_or(self.tag_name.as_str())
    }

    /// Assets whose name contains `platform`, compared case-insensitively.
    pub fn platform_assets<'a>(
        &'a self,
        platform: &'a str,
    ) -> impl Iterator<Item = &'a ReleaseAsset> + 'a {
        let needle = platform.to_ascii_lowercase();
        self.assets
            .iter()
            .filter(move |asset| asset.name.to_ascii_lowercase().contains(&needle))
    }

    pub fn has_platform_asset(&self, platform: &str) -> bool {
        self.platform_assets(platform).next().is_some()
    }
}
