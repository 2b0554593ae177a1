mod catalog;
mod desktop;
mod profile;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rootsim_core::{IoContext, ItemKind, SimError, SimResult};
use tracing::debug;

pub use catalog::{application_desktop_entries, application_profiles, common_profiles};
pub use desktop::DesktopEntry;
pub use profile::BinaryProfile;

/// Writes executable shell stubs that replay a [`BinaryProfile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeBinarySynthesizer {
    bin_dir: PathBuf,
}

impl FakeBinarySynthesizer {
    pub fn new(bin_dir: impl Into<PathBuf>) -> Self {
        Self {
            bin_dir: bin_dir.into(),
        }
    }

    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    pub fn binary_path(&self, name: &str) -> PathBuf {
        self.bin_dir.join(name)
    }

    pub fn create_binary(&self, profile: &BinaryProfile) -> SimResult<PathBuf> {
        fs::create_dir_all(&self.bin_dir)
            .io_context(|| format!("failed to create bin dir: {}", self.bin_dir.display()))?;

        let path = self.binary_path(&profile.name);
        fs::write(&path, profile.render_stub().as_bytes())
            .io_context(|| format!("failed writing fake binary: {}", path.display()))?;
        mark_executable(&path)?;

        debug!(binary = %profile.name, path = %path.display(), "synthesized fake binary");
        Ok(path)
    }

    pub fn create_common_binaries(&self) -> SimResult<Vec<PathBuf>> {
        common_profiles()
            .iter()
            .map(|profile| self.create_binary(profile))
            .collect()
    }

    pub fn create_application_binaries(&self) -> SimResult<Vec<PathBuf>> {
        application_profiles()
            .iter()
            .map(|profile| self.create_binary(profile))
            .collect()
    }

    pub fn create_desktop_entries(&self, dir: &Path) -> SimResult<Vec<PathBuf>> {
        fs::create_dir_all(dir)
            .io_context(|| format!("failed to create desktop entry dir: {}", dir.display()))?;

        let mut written = Vec::new();
        for (file_name, entry) in application_desktop_entries() {
            let path = dir.join(&file_name);
            fs::write(&path, entry.render().as_bytes())
                .io_context(|| format!("failed writing desktop entry: {}", path.display()))?;
            written.push(path);
        }
        Ok(written)
    }

    pub fn validate_binary(&self, name: &str) -> SimResult<()> {
        let path = self.binary_path(name);
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(SimError::not_found(ItemKind::Binary, name));
            }
            Err(err) => {
                return Err(SimError::io(
                    format!("failed to inspect binary: {}", path.display()),
                    err,
                ));
            }
        };
        if !metadata.is_file() {
            return Err(SimError::not_found(ItemKind::Binary, name));
        }
        if !is_executable(&metadata) {
            return Err(SimError::NotExecutable(path));
        }
        Ok(())
    }

    /// Executable regular files directly under the bin dir, sorted by name.
    pub fn list_created_binaries(&self) -> SimResult<Vec<String>> {
        if !self.bin_dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.bin_dir)
            .io_context(|| format!("failed to read bin dir: {}", self.bin_dir.display()))?
        {
            let entry = entry.io_context(|| "failed to read bin dir entry")?;
            let metadata = entry
                .metadata()
                .io_context(|| format!("failed to inspect {}", entry.path().display()))?;
            if !metadata.is_file() || !is_executable(&metadata) {
                continue;
            }
            names.push(entry.file_name().to_string_lossy().to_string());
        }

        names.sort();
        Ok(names)
    }

    pub fn cleanup(&self) -> SimResult<()> {
        match fs::remove_dir_all(&self.bin_dir) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(SimError::io(
                format!("failed to remove bin dir: {}", self.bin_dir.display()),
                err,
            )),
        }
    }
}

pub fn mark_executable(path: &Path) -> SimResult<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut permissions = fs::metadata(path)
            .io_context(|| format!("failed to inspect {}", path.display()))?
            .permissions();
        permissions.set_mode(0o755);
        fs::set_permissions(path, permissions)
            .io_context(|| format!("failed setting permissions: {}", path.display()))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

pub fn is_executable(metadata: &fs::Metadata) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        metadata.is_file()
    }
}

#[cfg(test)]
mod tests;
