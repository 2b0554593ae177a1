use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rootsim_catalog::{Database, DatabaseStatistics, DEFAULT_PLATFORM};
use rootsim_core::{InstallMethod, PackageMetadata, SimError};
use rootsim_vroot::{VirtualRoot, VirtualRootOptions};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct PackageRow {
    pub name: String,
    pub version: String,
    pub method: String,
    pub source: String,
    pub available: bool,
    pub description: String,
}

impl From<&PackageMetadata> for PackageRow {
    fn from(package: &PackageMetadata) -> Self {
        Self {
            name: package.name.clone(),
            version: package.version.clone(),
            method: package.method.clone(),
            source: package.source.clone(),
            available: package.available,
            description: package.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct InstalledPackage {
    pub name: String,
    pub method: InstallMethod,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct InstallReport {
    pub root: PathBuf,
    pub installed: Vec<InstalledPackage>,
    /// Everything the root reported as installed before teardown, duplicates included.
    pub packages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct CheckReport {
    pub platform: String,
    pub findings: Vec<String>,
}

pub(crate) fn load_database(fixtures: &Path) -> Result<Database> {
    Database::load(fixtures)
        .with_context(|| format!("failed to load fixtures from {}", fixtures.display()))
}

/// Installs `names` in order into a fresh virtual root, validates each of them, and
/// removes the root again whether or not the run succeeded.
pub(crate) fn run_install(
    fixtures: &Path,
    temp_dir: Option<&Path>,
    names: &[String],
) -> Result<InstallReport> {
    let database = load_database(fixtures)?;

    let mut builder = tempfile::Builder::new();
    builder.prefix("rootsim-");
    let temp = match temp_dir {
        Some(dir) => builder.tempdir_in(dir),
        None => builder.tempdir(),
    }
    .map_err(|err| SimError::io("failed to create temporary directory", err))?;

    let root_path = temp.path().join("root");
    let mut root = VirtualRoot::with_database(&root_path, VirtualRootOptions::default(), database)
        .context("failed to create virtual root")?;

    let outcome = install_and_validate(&mut root, names);
    let cleanup = root.cleanup();
    let (installed, packages) = outcome?;
    cleanup.context("failed to clean up virtual root")?;

    Ok(InstallReport {
        root: root_path,
        installed,
        packages,
    })
}

fn install_and_validate(
    root: &mut VirtualRoot,
    names: &[String],
) -> Result<(Vec<InstalledPackage>, Vec<String>)> {
    let mut installed = Vec::with_capacity(names.len());
    for name in names {
        let plan = root
            .simulate_install(name)
            .with_context(|| format!("failed to install {name}"))?;
        installed.push(InstalledPackage {
            name: name.clone(),
            method: plan.method(),
        });
    }

    for name in names {
        root.validate_installation(name)
            .with_context(|| format!("installation of {name} did not validate"))?;
    }

    let packages = root
        .installed_packages()
        .context("failed to list installed packages")?;
    info!(count = installed.len(), "installed and validated packages");
    Ok((installed, packages))
}

pub(crate) fn run_list(fixtures: &Path) -> Result<Vec<PackageRow>> {
    let database = load_database(fixtures)?;
    Ok(database.packages().map(PackageRow::from).collect())
}

pub(crate) fn run_search(fixtures: &Path, query: &str) -> Result<Vec<PackageRow>> {
    let database = load_database(fixtures)?;
    Ok(database
        .search_packages(query)
        .into_iter()
        .map(PackageRow::from)
        .collect())
}

pub(crate) fn run_check(fixtures: &Path, platform: Option<&str>) -> Result<CheckReport> {
    let database = load_database(fixtures)?;
    let platform = platform.unwrap_or(DEFAULT_PLATFORM);
    Ok(CheckReport {
        platform: platform.to_string(),
        findings: database.validate_for_platform(platform),
    })
}

pub(crate) fn run_stats(fixtures: &Path) -> Result<DatabaseStatistics> {
    Ok(load_database(fixtures)?.statistics())
}
