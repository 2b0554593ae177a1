mod interpreter;
mod layout;
mod records;
mod simulate;
mod status;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rootsim_catalog::{Database, DEFAULT_PLATFORM};
use rootsim_core::{InstallPlan, ItemKind, SimError, SimResult};
use rootsim_fakebin::FakeBinarySynthesizer;
use tracing::{debug, info};

pub use interpreter::{run_post_install, ScriptStep};
pub use layout::{RootLayout, STATUS_MANAGER};
pub use records::{read_install_record, write_install_record, InstallRecord, RECORD_TIMESTAMP};
pub use status::{
    append_status_entry, read_status_entries, read_status_packages, StatusEntry, INSTALLED_STATUS,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualRootOptions {
    /// Fixture directory to load a [`Database`] from.
    pub fixtures: Option<PathBuf>,
    /// Seed the bin dir with the common and application binary catalogs.
    pub populate_binaries: bool,
    /// Platform substring used to pick release assets.
    pub platform: String,
}

impl Default for VirtualRootOptions {
    fn default() -> Self {
        Self {
            fixtures: None,
            populate_binaries: true,
            platform: DEFAULT_PLATFORM.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RootState {
    Ready,
    CleanedUp,
}

/// A disposable directory tree standing in for `/`.
///
/// Instances are not synchronized; give every scenario its own root.
#[derive(Debug)]
pub struct VirtualRoot {
    layout: RootLayout,
    synthesizer: FakeBinarySynthesizer,
    database: Option<Database>,
    platform: String,
    state: RootState,
}

impl VirtualRoot {
    /// Creates the directory skeleton under `root`.
    ///
    /// Directories created before a failure are left in place.
    pub fn new(root: impl Into<PathBuf>, options: VirtualRootOptions) -> SimResult<Self> {
        let database = match &options.fixtures {
            Some(fixtures) => Some(Database::load(fixtures)?),
            None => None,
        };
        Self::build(root.into(), options, database)
    }

    /// Like [`VirtualRoot::new`], wired to an already built database.
    /// `options.fixtures` is ignored.
    pub fn with_database(
        root: impl Into<PathBuf>,
        options: VirtualRootOptions,
        database: Database,
    ) -> SimResult<Self> {
        Self::build(root.into(), options, Some(database))
    }

    fn build(
        root: PathBuf,
        options: VirtualRootOptions,
        database: Option<Database>,
    ) -> SimResult<Self> {
        let layout = RootLayout::new(root);
        layout.ensure_base_dirs()?;
        let synthesizer = FakeBinarySynthesizer::new(layout.bin_dir());

        if options.populate_binaries {
            synthesizer.create_common_binaries()?;
            synthesizer.create_application_binaries()?;
            synthesizer.create_desktop_entries(&layout.applications_dir())?;
        }

        info!(root = %layout.root().display(), "created virtual root");
        Ok(Self {
            layout,
            synthesizer,
            database,
            platform: options.platform,
            state: RootState::Ready,
        })
    }

    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    pub fn layout(&self) -> &RootLayout {
        &self.layout
    }

    pub fn synthesizer(&self) -> &FakeBinarySynthesizer {
        &self.synthesizer
    }

    pub fn database(&self) -> Option<&Database> {
        self.database.as_ref()
    }

    pub fn set_database(&mut self, database: Database) {
        self.database = Some(database);
    }

    pub fn is_cleaned_up(&self) -> bool {
        self.state == RootState::CleanedUp
    }

    /// Writes the artifacts installing `name` would leave behind.
    ///
    /// The plan is built before anything is written, so an unsupported method tag
    /// leaves the tree untouched.
    pub fn simulate_install(&mut self, name: &str) -> SimResult<InstallPlan> {
        self.ensure_ready()?;
        let database = self.database.as_ref().ok_or(SimError::NotLoaded)?;
        let package = database
            .get_package(name)
            .ok_or_else(|| SimError::not_found(ItemKind::Package, name))?;
        let plan = InstallPlan::for_package(package)?;

        match &plan {
            InstallPlan::Repository(repository) => {
                simulate::simulate_repository(&self.layout, &self.synthesizer, repository)?;
            }
            InstallPlan::Bundle { bundle_id, .. } => {
                let bundle = database
                    .get_bundle(bundle_id)
                    .ok_or_else(|| SimError::not_found(ItemKind::Bundle, bundle_id.as_str()))?;
                simulate::simulate_bundle(&self.layout, bundle)?;
            }
            InstallPlan::Release {
                name,
                version,
                repo,
            } => {
                simulate::simulate_release(
                    &self.layout,
                    &self.synthesizer,
                    name,
                    version,
                    repo,
                    database.get_release(repo),
                    &self.platform,
                )?;
            }
            InstallPlan::Script { script, .. } => {
                let info = database
                    .get_script(script)
                    .ok_or_else(|| SimError::not_found(ItemKind::Script, script.as_str()))?;
                simulate::simulate_script(&self.layout, &self.synthesizer, info)?;
            }
        }

        info!(package = %name, method = %plan.method(), "simulated install");
        Ok(plan)
    }

    /// True when any artifact probe hits: a binary in the bin dir, a status header,
    /// or a bundle directory.
    pub fn is_installed(&self, name: &str) -> bool {
        if self.is_cleaned_up() {
            return false;
        }
        self.synthesizer.binary_path(name).is_file()
            || self.status_lists(name)
            || self.bundle_installed(name)
    }

    /// Synthesized binaries followed by status headers. Repeated installs stay repeated.
    pub fn installed_packages(&self) -> SimResult<Vec<String>> {
        self.ensure_ready()?;
        let mut packages = self.synthesizer.list_created_binaries()?;
        packages.extend(read_status_packages(&self.layout)?);
        Ok(packages)
    }

    pub fn validate_installation(&self, name: &str) -> SimResult<()> {
        self.ensure_ready()?;
        if !self.is_installed(name) {
            return Err(SimError::NotInstalled(name.to_string()));
        }
        if self.synthesizer.binary_path(name).is_file() {
            self.synthesizer.validate_binary(name)?;
        }
        Ok(())
    }

    pub fn status_entries(&self) -> SimResult<Vec<StatusEntry>> {
        self.ensure_ready()?;
        read_status_entries(&self.layout)
    }

    pub fn read_install_record(&self, name: &str) -> SimResult<InstallRecord> {
        self.ensure_ready()?;
        read_install_record(&self.layout, name)
    }

    /// Removes synthesized binaries, then the whole root. Calling it again is a no-op.
    pub fn cleanup(&mut self) -> SimResult<()> {
        if self.is_cleaned_up() {
            return Ok(());
        }
        self.synthesizer.cleanup()?;
        match fs::remove_dir_all(self.layout.root()) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                return Err(SimError::io(
                    format!("failed to remove virtual root: {}", self.root().display()),
                    err,
                ))
            }
        }
        self.state = RootState::CleanedUp;
        debug!(root = %self.root().display(), "removed virtual root");
        Ok(())
    }

    fn ensure_ready(&self) -> SimResult<()> {
        match self.state {
            RootState::Ready => Ok(()),
            RootState::CleanedUp => Err(SimError::CleanedUp(self.root().to_path_buf())),
        }
    }

    fn status_lists(&self, name: &str) -> bool {
        read_status_packages(&self.layout)
            .map(|packages| packages.iter().any(|package| package == name))
            .unwrap_or(false)
    }

    fn bundle_installed(&self, name: &str) -> bool {
        if self.layout.bundle_dir(name).is_dir() {
            return true;
        }
        let Some(database) = &self.database else {
            return false;
        };
        database
            .bundles()
            .filter(|bundle| bundle.package_name() == name)
            .any(|bundle| self.layout.bundle_dir(&bundle.id).is_dir())
    }
}

#[cfg(test)]
mod tests;
