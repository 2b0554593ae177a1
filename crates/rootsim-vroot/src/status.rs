use std::fs::{self, OpenOptions};
use std::io::{self, Write};

use rootsim_core::{IoContext, RepositoryPlan, SimError, SimResult};

use crate::RootLayout;

pub const INSTALLED_STATUS: &str = "install ok installed";

/// One stanza of the repository manager's status file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusEntry {
    pub package: String,
    pub status: String,
    pub priority: String,
    pub section: String,
    pub maintainer: String,
    pub architecture: String,
    pub version: String,
    pub description: String,
}

impl StatusEntry {
    pub fn installed(plan: &RepositoryPlan) -> Self {
        Self {
            package: plan.name.clone(),
            status: INSTALLED_STATUS.to_string(),
            priority: or_default(&plan.priority, "optional"),
            section: or_default(&plan.section, "misc"),
            maintainer: plan.maintainer.clone(),
            architecture: or_default(&plan.architecture, "amd64"),
            version: plan.version.clone(),
            description: plan.description.clone(),
        }
    }

    pub fn render(&self) -> String {
        let mut block = String::new();
        for (key, value) in self.fields() {
            if value.is_empty() && key != "Package" {
                continue;
            }
            block.push_str(&format!("{key}: {value}\n"));
        }
        block.push('\n');
        block
    }

    fn fields(&self) -> [(&'static str, &str); 8] {
        [
            ("Package", self.package.as_str()),
            ("Status", self.status.as_str()),
            ("Priority", self.priority.as_str()),
            ("Section", self.section.as_str()),
            ("Maintainer", self.maintainer.as_str()),
            ("Architecture", self.architecture.as_str()),
            ("Version", self.version.as_str()),
            ("Description", self.description.as_str()),
        ]
    }
}

/// Appends `entry` to the status file. Earlier stanzas for the same package are left in place.
pub fn append_status_entry(layout: &RootLayout, entry: &StatusEntry) -> SimResult<()> {
    let path = layout.status_path();
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .io_context(|| format!("failed to open status file: {}", path.display()))?;
    file.write_all(entry.render().as_bytes())
        .io_context(|| format!("failed to append status entry: {}", path.display()))
}

pub fn read_status_entries(layout: &RootLayout) -> SimResult<Vec<StatusEntry>> {
    let path = layout.status_path();
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => {
            return Err(SimError::io(
                format!("failed to read status file: {}", path.display()),
                err,
            ))
        }
    };
    Ok(parse_status(&raw))
}

/// Package names from every `Package:` header, in file order and with repeats.
pub fn read_status_packages(layout: &RootLayout) -> SimResult<Vec<String>> {
    Ok(read_status_entries(layout)?
        .into_iter()
        .map(|entry| entry.package)
        .collect())
}

pub(crate) fn parse_status(raw: &str) -> Vec<StatusEntry> {
    let mut entries = Vec::new();
    let mut current: Option<StatusEntry> = None;

    for line in raw.lines() {
        if line.trim().is_empty() {
            if let Some(entry) = current.take() {
                entries.push(entry);
            }
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim().to_string();
        let entry = current.get_or_insert_with(StatusEntry::default);
        match key.trim() {
            "Package" => entry.package = value,
            "Status" => entry.status = value,
            "Priority" => entry.priority = value,
            "Section" => entry.section = value,
            "Maintainer" => entry.maintainer = value,
            "Architecture" => entry.architecture = value,
            "Version" => entry.version = value,
            "Description" => entry.description = value,
            _ => {}
        }
    }
    if let Some(entry) = current {
        entries.push(entry);
    }

    entries.retain(|entry| !entry.package.is_empty());
    entries
}

fn or_default(value: &str, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}
