mod bundle;
mod error;
mod method;
mod package;
mod plan;
mod release;
mod script;

pub use bundle::BundleInfo;
pub use error::{IoContext, ItemKind, SimError, SimResult};
pub use method::InstallMethod;
pub use package::{PackageMetadata, RepositoryInfo};
pub use plan::{InstallPlan, RepositoryPlan};
pub use release::{ReleaseAsset, ReleaseInfo};
pub use script::ScriptInfo;
