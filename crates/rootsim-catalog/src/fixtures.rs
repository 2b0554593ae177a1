use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use rootsim_core::{BundleInfo, PackageMetadata, ReleaseInfo, RepositoryInfo, SimError, SimResult};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

pub const REPOSITORY_CATALOG_FILE: &str = "packages.toml";
pub const BUNDLE_CATALOG_FILE: &str = "flatpaks.toml";
pub const RELEASES_DIR: &str = "releases";
const RELEASE_FILE_SUFFIX: &str = "_latest.json";

#[derive(Debug, Deserialize)]
pub(crate) struct RepositoryCatalogFile {
    pub packages: BTreeMap<String, PackageMetadata>,
    #[serde(default)]
    pub repositories: BTreeMap<String, RepositoryInfo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BundleCatalogFile {
    pub flatpaks: BTreeMap<String, BundleInfo>,
    #[serde(default)]
    pub remotes: BTreeMap<String, RepositoryInfo>,
}

pub(crate) fn read_repository_catalog(fixture_root: &Path) -> SimResult<RepositoryCatalogFile> {
    let path = fixture_root.join(REPOSITORY_CATALOG_FILE);
    let mut catalog: RepositoryCatalogFile = read_toml(&path)?;
    for (name, package) in catalog.packages.iter_mut() {
        if name.trim().is_empty() {
            return Err(SimError::load(&path, "package name must not be empty"));
        }
        package.name = name.clone();
    }
    fill_repository_names(&mut catalog.repositories);
    Ok(catalog)
}

pub(crate) fn read_bundle_catalog(fixture_root: &Path) -> SimResult<BundleCatalogFile> {
    let path = fixture_root.join(BUNDLE_CATALOG_FILE);
    let mut catalog: BundleCatalogFile = read_toml(&path)?;
    for (id, bundle) in catalog.flatpaks.iter_mut() {
        if id.trim().is_empty() {
            return Err(SimError::load(&path, "bundle id must not be empty"));
        }
        bundle.id = id.clone();
    }
    fill_repository_names(&mut catalog.remotes);
    Ok(catalog)
}

/// Reads every `<owner>_<repo>_latest.json` file, keyed by `owner/repo`.
///
/// A missing releases directory yields an empty map.
pub(crate) fn read_releases(fixture_root: &Path) -> SimResult<BTreeMap<String, ReleaseInfo>> {
    let dir = fixture_root.join(RELEASES_DIR);
    if !dir.is_dir() {
        return Ok(BTreeMap::new());
    }

    let mut releases = BTreeMap::new();
    let entries = fs::read_dir(&dir).map_err(|err| SimError::load(&dir, err))?;
    for entry in entries {
        let entry = entry.map_err(|err| SimError::load(&dir, err))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|value| value.to_str()) else {
            continue;
        };
        let Some(repo) = release_repo_from_file_name(file_name) else {
            debug!(path = %path.display(), "skipping non-release fixture file");
            continue;
        };

        let raw = fs::read_to_string(&path).map_err(|err| SimError::load(&path, err))?;
        let release: ReleaseInfo =
            serde_json::from_str(&raw).map_err(|err| SimError::load(&path, err))?;
        releases.insert(repo, release);
    }
    Ok(releases)
}

/// `aristocratos_btop_latest.json` → `aristocratos/btop`.
///
/// Owners cannot contain `_`, so the first underscore separates owner from repository.
pub fn release_repo_from_file_name(file_name: &str) -> Option<String> {
    let stem = file_name.strip_suffix(RELEASE_FILE_SUFFIX)?;
    let (owner, repo) = stem.split_once('_')?;
    if owner.is_empty() || repo.is_empty() {
        return None;
    }
    Some(format!("{owner}/{repo}"))
}

pub fn release_file_name(repo: &str) -> Option<String> {
    let (owner, name) = repo.split_once('/')?;
    Some(format!("{owner}_{name}{RELEASE_FILE_SUFFIX}"))
}

fn read_toml<T: DeserializeOwned>(path: &Path) -> SimResult<T> {
    let raw = fs::read_to_string(path).map_err(|err| SimError::load(path, err))?;
    toml::from_str(&raw).map_err(|err| SimError::load(path, err))
}

fn fill_repository_names(repositories: &mut BTreeMap<String, RepositoryInfo>) {
    for (name, repository) in repositories.iter_mut() {
        if repository.name.is_empty() {
            repository.name = name.clone();
        }
    }
}
