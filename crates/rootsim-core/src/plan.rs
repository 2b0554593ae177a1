use crate::{InstallMethod, PackageMetadata, SimResult};

/// Fields the repository simulator needs to write a status record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryPlan {
    pub name: String,
    pub version: String,
    pub description: String,
    pub architecture: String,
    pub section: String,
    pub priority: String,
    pub maintainer: String,
}

/// What installing one package entails, per installation method.
///
/// Each variant carries only what its simulator consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallPlan {
    Repository(RepositoryPlan),
    Bundle {
        package: String,
        bundle_id: String,
    },
    Release {
        name: String,
        version: String,
        repo: String,
    },
    Script {
        package: String,
        script: String,
    },
}

impl InstallPlan {
    /// Builds the plan for `package`, failing with `SimError::Unsupported` when its
    /// method tag is not one of the four recognized tags.
    pub fn for_package(package: &PackageMetadata) -> SimResult<Self> {
        let plan = match package.install_method()? {
            InstallMethod::Repository => Self::Repository(RepositoryPlan {
                name: package.name.clone(),
                version: package.version.clone(),
                description: package.description.clone(),
                architecture: package.architecture.clone(),
                section: package.section.clone(),
                priority: package.priority.clone(),
                maintainer: package.maintainer.clone(),
            }),
            InstallMethod::Bundle => Self::Bundle {
                package: package.name.clone(),
                bundle_id: package.source.clone(),
            },
            InstallMethod::Release => Self::Release {
                name: package.name.clone(),
                version: package.version.clone(),
                repo: package.source.clone(),
            },
            InstallMethod::Script => Self::Script {
                package: package.name.clone(),
                script: package.source.clone(),
            },
        };
        Ok(plan)
    }

    pub fn method(&self) -> InstallMethod {
        match self {
            Self::Repository(_) => InstallMethod::Repository,
            Self::Bundle { .. } => InstallMethod::Bundle,
            Self::Release { .. } => InstallMethod::Release,
            Self::Script { .. } => InstallMethod::Script,
        }
    }
}
