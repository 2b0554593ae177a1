mod fixtures;
mod scripts;
mod validate;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rootsim_core::{
    BundleInfo, InstallMethod, PackageMetadata, ReleaseInfo, RepositoryInfo, ScriptInfo, SimError,
    SimResult,
};
use serde::Serialize;
use tracing::{info, warn};

pub use fixtures::{
    release_file_name, release_repo_from_file_name, BUNDLE_CATALOG_FILE, RELEASES_DIR,
    REPOSITORY_CATALOG_FILE,
};
pub use scripts::builtin_scripts;
pub use validate::DEFAULT_PLATFORM;

/// Per-index counts reported by [`Database::statistics`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DatabaseStatistics {
    pub packages: usize,
    pub repositories: usize,
    pub remotes: usize,
    pub releases: usize,
    pub bundles: usize,
    pub scripts: usize,
    pub by_method: BTreeMap<InstallMethod, usize>,
}

/// In-memory synthetic package catalog.
///
/// Every installable unit lands in one package index keyed by name, whatever its method;
/// method-specific records (releases, bundles, scripts) are kept alongside for the
/// simulators that need them.
#[derive(Debug, Clone, Default)]
pub struct Database {
    fixture_root: Option<PathBuf>,
    packages: BTreeMap<String, PackageMetadata>,
    repositories: BTreeMap<String, RepositoryInfo>,
    remotes: BTreeMap<String, RepositoryInfo>,
    releases: BTreeMap<String, ReleaseInfo>,
    bundles: BTreeMap<String, BundleInfo>,
    scripts: BTreeMap<String, ScriptInfo>,
    dependencies: BTreeMap<String, Vec<String>>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the repository catalog, bundle catalog, release files and the built-in
    /// script registry from `fixture_root`.
    pub fn load(fixture_root: impl AsRef<Path>) -> SimResult<Self> {
        let fixture_root = fixture_root.as_ref();
        let mut db = Self {
            fixture_root: Some(fixture_root.to_path_buf()),
            ..Self::default()
        };

        let repository_catalog = fixtures::read_repository_catalog(fixture_root)?;
        db.repositories = repository_catalog.repositories;
        for (name, mut package) in repository_catalog.packages {
            package.method = InstallMethod::Repository.as_str().to_string();
            package.source = name.clone();
            db.add_loaded_package(package);
        }

        let bundle_catalog = fixtures::read_bundle_catalog(fixture_root)?;
        db.remotes = bundle_catalog.remotes;
        for (id, bundle) in bundle_catalog.flatpaks {
            db.add_loaded_package(bundle_package(&bundle));
            db.bundles.insert(id, bundle);
        }

        for (repo, release) in fixtures::read_releases(fixture_root)? {
            db.add_loaded_package(release_package(&repo, &release));
            db.releases.insert(repo, release);
        }

        for (key, script) in builtin_scripts() {
            db.add_loaded_package(script_package(&key, &script));
            db.scripts.insert(key, script);
        }

        info!(
            fixtures = %fixture_root.display(),
            packages = db.packages.len(),
            releases = db.releases.len(),
            bundles = db.bundles.len(),
            "loaded package database"
        );
        Ok(db)
    }

    pub fn fixture_root(&self) -> Option<&Path> {
        self.fixture_root.as_deref()
    }

    pub fn get_package(&self, name: &str) -> Option<&PackageMetadata> {
        self.packages.get(name)
    }

    pub fn get_release(&self, repo: &str) -> Option<&ReleaseInfo> {
        self.releases.get(repo)
    }

    pub fn get_bundle(&self, id: &str) -> Option<&BundleInfo> {
        self.bundles.get(id)
    }

    pub fn get_script(&self, name: &str) -> Option<&ScriptInfo> {
        self.scripts.get(name)
    }

    pub fn get_repository(&self, name: &str) -> Option<&RepositoryInfo> {
        self.repositories.get(name)
    }

    pub fn get_remote(&self, name: &str) -> Option<&RepositoryInfo> {
        self.remotes.get(name)
    }

    pub fn packages(&self) -> impl Iterator<Item = &PackageMetadata> {
        self.packages.values()
    }

    pub fn bundles(&self) -> impl Iterator<Item = &BundleInfo> {
        self.bundles.values()
    }

    pub fn releases(&self) -> impl Iterator<Item = (&str, &ReleaseInfo)> {
        self.releases
            .iter()
            .map(|(repo, release)| (repo.as_str(), release))
    }

    /// Case-insensitive substring match against package name and description.
    pub fn search_packages(&self, query: &str) -> Vec<&PackageMetadata> {
        let needle = query.to_lowercase();
        self.packages
            .values()
            .filter(|package| {
                package.name.to_lowercase().contains(&needle)
                    || package.description.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn packages_by_method(&self, method: InstallMethod) -> Vec<&PackageMetadata> {
        self.packages
            .values()
            .filter(|package| package.is_method(method))
            .collect()
    }

    /// Declared dependency names of a repository-method package.
    pub fn dependencies(&self, name: &str) -> &[String] {
        self.dependencies
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn dependency_graph(&self) -> &BTreeMap<String, Vec<String>> {
        &self.dependencies
    }

    /// Adds a package outside of fixture loading. Names must be non-empty and unique.
    pub fn insert_package(&mut self, package: PackageMetadata) -> SimResult<()> {
        if package.name.trim().is_empty() {
            return Err(SimError::InvalidPackage(
                "package name must not be empty".to_string(),
            ));
        }
        if self.packages.contains_key(&package.name) {
            return Err(SimError::InvalidPackage(format!(
                "package '{}' already exists",
                package.name
            )));
        }
        self.index_package(package);
        Ok(())
    }

    pub fn insert_release(&mut self, repo: impl Into<String>, release: ReleaseInfo) {
        self.releases.insert(repo.into(), release);
    }

    pub fn insert_bundle(&mut self, bundle: BundleInfo) {
        self.bundles.insert(bundle.id.clone(), bundle);
    }

    pub fn insert_script(&mut self, key: impl Into<String>, script: ScriptInfo) {
        self.scripts.insert(key.into(), script);
    }

    pub fn statistics(&self) -> DatabaseStatistics {
        let mut by_method = BTreeMap::new();
        for method in InstallMethod::ALL {
            by_method.insert(method, 0);
        }
        for package in self.packages.values() {
            if let Ok(method) = package.install_method() {
                *by_method.entry(method).or_insert(0) += 1;
            }
        }

        DatabaseStatistics {
            packages: self.packages.len(),
            repositories: self.repositories.len(),
            remotes: self.remotes.len(),
            releases: self.releases.len(),
            bundles: self.bundles.len(),
            scripts: self.scripts.len(),
            by_method,
        }
    }

    fn add_loaded_package(&mut self, package: PackageMetadata) {
        if let Some(existing) = self.packages.get(&package.name) {
            warn!(
                package = %package.name,
                kept = %existing.method,
                skipped = %package.method,
                "duplicate package name in fixtures; keeping first definition"
            );
            return;
        }
        self.index_package(package);
    }

    fn index_package(&mut self, package: PackageMetadata) {
        if package.is_method(InstallMethod::Repository) {
            self.dependencies
                .insert(package.name.clone(), package.dependencies.clone());
        }
        self.packages.insert(package.name.clone(), package);
    }
}

fn bundle_package(bundle: &BundleInfo) -> PackageMetadata {
    PackageMetadata {
        version: bundle.version.clone(),
        description: bundle.description.clone(),
        size: bundle.size,
        architecture: "x86_64".to_string(),
        available: bundle.available,
        ..PackageMetadata::new(
            bundle.package_name(),
            InstallMethod::Bundle.as_str(),
            bundle.id.clone(),
        )
    }
}

fn release_package(repo: &str, release: &ReleaseInfo) -> PackageMetadata {
    let name = repo.rsplit('/').next().unwrap_or(repo).to_string();
    let size = release
        .platform_assets(DEFAULT_PLATFORM)
        .next()
        .map(|asset| asset.size)
        .unwrap_or_default();
    let description = if release.name.is_empty() {
        format!("{name} release {}", release.tag_name)
    } else {
        release.name.clone()
    };

    PackageMetadata {
        version: release.version().to_string(),
        description,
        size,
        architecture: "x86_64".to_string(),
        available: !release.draft,
        ..PackageMetadata::new(name, InstallMethod::Release.as_str(), repo)
    }
}

fn script_package(key: &str, script: &ScriptInfo) -> PackageMetadata {
    PackageMetadata {
        version: "latest".to_string(),
        description: script.description.clone(),
        dependencies: script.prerequisites.clone(),
        ..PackageMetadata::new(script.binary.clone(), InstallMethod::Script.as_str(), key)
    }
}
