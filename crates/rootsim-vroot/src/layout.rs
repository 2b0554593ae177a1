use std::fs;
use std::path::{Component, Path, PathBuf};

use rootsim_core::{IoContext, SimResult};

/// Name of the repository manager whose status file is emulated.
pub const STATUS_MANAGER: &str = "dpkg";

/// Fixed directory layout of a virtual root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootLayout {
    root: PathBuf,
}

impl RootLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("usr").join("local").join("bin")
    }

    pub fn etc_dir(&self) -> PathBuf {
        self.root.join("etc")
    }

    pub fn share_dir(&self) -> PathBuf {
        self.root.join("usr").join("share")
    }

    pub fn applications_dir(&self) -> PathBuf {
        self.share_dir().join("applications")
    }

    pub fn tmp_dir(&self) -> PathBuf {
        self.root.join("tmp")
    }

    pub fn home_dir(&self) -> PathBuf {
        self.root.join("home").join("user")
    }

    pub fn status_dir(&self) -> PathBuf {
        self.etc_dir().join(STATUS_MANAGER)
    }

    pub fn status_path(&self) -> PathBuf {
        self.status_dir().join("status")
    }

    pub fn bundle_apps_dir(&self) -> PathBuf {
        self.root
            .join("var")
            .join("lib")
            .join("flatpak")
            .join("app")
    }

    pub fn bundle_dir(&self, bundle_id: &str) -> PathBuf {
        self.bundle_apps_dir().join(bundle_id)
    }

    pub fn bundle_metadata_path(&self, bundle_id: &str) -> PathBuf {
        self.bundle_dir(bundle_id)
            .join("current")
            .join("active")
            .join("metadata")
    }

    pub fn records_dir(&self) -> PathBuf {
        self.root
            .join("var")
            .join("lib")
            .join("rootsim")
            .join("installed")
    }

    pub fn record_path(&self, name: &str) -> PathBuf {
        self.records_dir().join(format!("{name}.json"))
    }

    pub fn ensure_base_dirs(&self) -> SimResult<()> {
        for dir in [
            self.bin_dir(),
            self.etc_dir(),
            self.share_dir(),
            self.applications_dir(),
            self.tmp_dir(),
            self.home_dir(),
            self.status_dir(),
            self.bundle_apps_dir(),
            self.records_dir(),
        ] {
            fs::create_dir_all(&dir)
                .io_context(|| format!("failed to create {}", dir.display()))?;
        }
        Ok(())
    }

    /// Maps a path as a script would write it onto the virtual root.
    ///
    /// `~` and `~/..` land in the virtual home, absolute paths are re-rooted, and
    /// relative paths resolve against the virtual home. Paths that climb with `..`
    /// are rejected.
    pub fn resolve_script_path(&self, raw: &str) -> Option<PathBuf> {
        let (base, rest) = if raw == "~" {
            (self.home_dir(), "")
        } else if let Some(rest) = raw.strip_prefix("~/") {
            (self.home_dir(), rest)
        } else if let Some(rest) = raw.strip_prefix('/') {
            (self.root.clone(), rest)
        } else {
            (self.home_dir(), raw)
        };

        let mut resolved = base;
        for component in Path::new(rest).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::RootDir | Component::ParentDir | Component::Prefix(_) => return None,
            }
        }
        Some(resolved)
    }
}
