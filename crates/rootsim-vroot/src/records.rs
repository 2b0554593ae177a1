use std::fs;
use std::io;

use rootsim_core::{InstallMethod, IoContext, SimError, SimResult};
use serde::{Deserialize, Serialize};

use crate::RootLayout;

/// Every install record carries the same timestamp so scenario output stays reproducible.
pub const RECORD_TIMESTAMP: &str = "2024-01-01T00:00:00Z";

/// JSON record left behind by a release-method install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallRecord {
    pub name: String,
    pub version: String,
    pub method: InstallMethod,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
    pub installed_at: String,
}

impl InstallRecord {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        method: InstallMethod,
        source: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            method,
            source: source.into(),
            asset: None,
            installed_at: RECORD_TIMESTAMP.to_string(),
        }
    }
}

pub fn write_install_record(layout: &RootLayout, record: &InstallRecord) -> SimResult<()> {
    let dir = layout.records_dir();
    fs::create_dir_all(&dir)
        .io_context(|| format!("failed to create record dir: {}", dir.display()))?;

    let path = layout.record_path(&record.name);
    let payload = serde_json::to_string_pretty(record).map_err(|err| {
        SimError::io(
            format!("failed to encode install record: {}", path.display()),
            err.into(),
        )
    })?;
    fs::write(&path, payload.as_bytes())
        .io_context(|| format!("failed to write install record: {}", path.display()))
}

pub fn read_install_record(layout: &RootLayout, name: &str) -> SimResult<InstallRecord> {
    let path = layout.record_path(name);
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(SimError::NotInstalled(name.to_string()));
        }
        Err(err) => {
            return Err(SimError::io(
                format!("failed to read install record: {}", path.display()),
                err,
            ))
        }
    };
    serde_json::from_str(&raw).map_err(|err| SimError::load(&path, err))
}
