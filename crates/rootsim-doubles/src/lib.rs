mod command;
mod package_manager;

pub use command::{CommandCall, CommandDouble, CommandOutput, CommandRunner};
pub use package_manager::{
    AvailablePackage, HistoryEntry, InstalledPackage, PackageManagerDouble,
};
