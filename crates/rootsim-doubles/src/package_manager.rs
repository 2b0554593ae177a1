use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rootsim_core::{InstallMethod, IoContext, ItemKind, SimError, SimResult};
use rootsim_fakebin::{BinaryProfile, FakeBinarySynthesizer};
use serde::Serialize;
use tracing::{debug, info};

/// First synthetic timestamp handed out; 2024-01-01T00:00:00Z.
const HISTORY_EPOCH_UNIX: u64 = 1_704_067_200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailablePackage {
    pub version: String,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledPackage {
    pub version: String,
    pub size: u64,
    pub method: InstallMethod,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub package: String,
    pub method: InstallMethod,
    pub version: Option<String>,
    pub timestamp_unix: u64,
    pub success: bool,
    pub error: Option<String>,
}

/// A simple installer with explicit available and installed sets.
///
/// Unlike the virtual root, installed state here is authoritative: the artifacts it writes
/// are only there so callers can observe them.
#[derive(Debug)]
pub struct PackageManagerDouble {
    root: PathBuf,
    synthesizer: FakeBinarySynthesizer,
    available: BTreeMap<String, AvailablePackage>,
    installed: BTreeMap<String, InstalledPackage>,
    forced_errors: HashMap<String, String>,
    history: Vec<HistoryEntry>,
}

impl PackageManagerDouble {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            synthesizer: FakeBinarySynthesizer::new(root.join("usr").join("local").join("bin")),
            root,
            available: BTreeMap::new(),
            installed: BTreeMap::new(),
            forced_errors: HashMap::new(),
            history: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn add_available(
        &mut self,
        name: impl Into<String>,
        version: impl Into<String>,
        size: u64,
    ) {
        self.available.insert(
            name.into(),
            AvailablePackage {
                version: version.into(),
                size,
            },
        );
    }

    /// Makes every later `install(name, _)` fail with `message`.
    pub fn force_error(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.forced_errors.insert(name.into(), message.into());
    }

    pub fn clear_forced_error(&mut self, name: &str) {
        self.forced_errors.remove(name);
    }

    pub fn binary_path(&self, name: &str) -> PathBuf {
        self.synthesizer.binary_path(name)
    }

    pub fn config_path(&self, name: &str) -> PathBuf {
        self.root
            .join("etc")
            .join(name)
            .join(format!("{name}.conf"))
    }

    pub fn install(&mut self, name: &str, method: InstallMethod) -> SimResult<()> {
        let Some(package) = self.available.get(name).cloned() else {
            self.record(name, method, None, Some(format!("package '{name}' not found")));
            return Err(SimError::not_found(ItemKind::Package, name));
        };

        if let Some(message) = self.forced_errors.get(name).cloned() {
            self.record(name, method, Some(&package.version), Some(message.clone()));
            return Err(SimError::Injected {
                package: name.to_string(),
                message,
            });
        }

        if let Err(err) = self.write_artifacts(name, method, &package) {
            self.record(name, method, Some(&package.version), Some(err.to_string()));
            return Err(err);
        }

        self.installed.insert(
            name.to_string(),
            InstalledPackage {
                version: package.version.clone(),
                size: package.size,
                method,
            },
        );
        self.record(name, method, Some(&package.version), None);
        info!(package = name, %method, version = %package.version, "installed package");
        Ok(())
    }

    pub fn uninstall(&mut self, name: &str) -> SimResult<()> {
        if !self.installed.contains_key(name) {
            return Err(SimError::NotInstalled(name.to_string()));
        }

        remove_if_exists(&self.binary_path(name))?;
        let config = self.config_path(name);
        remove_if_exists(&config)?;
        if let Some(parent) = config.parent() {
            let _ = fs::remove_dir(parent);
        }

        self.installed.remove(name);
        info!(package = name, "uninstalled package");
        Ok(())
    }

    pub fn is_installed(&self, name: &str) -> bool {
        self.installed.contains_key(name)
    }

    pub fn installed_version(&self, name: &str) -> Option<&str> {
        self.installed.get(name).map(|package| package.version.as_str())
    }

    pub fn installed(&self) -> &BTreeMap<String, InstalledPackage> {
        &self.installed
    }

    pub fn available(&self) -> &BTreeMap<String, AvailablePackage> {
        &self.available
    }

    /// Append-only log of every install attempt, failed ones included.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    fn write_artifacts(
        &self,
        name: &str,
        method: InstallMethod,
        package: &AvailablePackage,
    ) -> SimResult<()> {
        let profile =
            BinaryProfile::new(name, &package.version, format!("usage: {name} [options]"));
        self.synthesizer.create_binary(&profile)?;

        let config = self.config_path(name);
        if let Some(parent) = config.parent() {
            fs::create_dir_all(parent)
                .io_context(|| format!("failed to create config dir: {}", parent.display()))?;
        }
        let mut payload = String::new();
        payload.push_str(&format!("# {name} configuration\n"));
        payload.push_str(&format!("version={}\n", package.version));
        payload.push_str(&format!("method={}\n", method.as_str()));
        fs::write(&config, payload.as_bytes())
            .io_context(|| format!("failed writing config: {}", config.display()))?;
        debug!(package = name, path = %config.display(), "wrote package config");
        Ok(())
    }

    fn record(
        &mut self,
        name: &str,
        method: InstallMethod,
        version: Option<&str>,
        error: Option<String>,
    ) {
        let timestamp_unix = HISTORY_EPOCH_UNIX + self.history.len() as u64;
        self.history.push(HistoryEntry {
            package: name.to_string(),
            method,
            version: version.map(str::to_string),
            timestamp_unix,
            success: error.is_none(),
            error,
        });
    }
}

fn remove_if_exists(path: &Path) -> SimResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(SimError::io(
            format!("failed to remove {}", path.display()),
            err,
        )),
    }
}
