use crate::Database;

/// Platform release assets are matched against unless a caller asks for another.
pub const DEFAULT_PLATFORM: &str = "linux";

impl Database {
    /// Advisory consistency findings for the default platform.
    pub fn validate(&self) -> Vec<String> {
        self.validate_for_platform(DEFAULT_PLATFORM)
    }

    /// Reports every dependency edge whose target is missing or unavailable, and every
    /// release without an asset whose name contains `platform`.
    ///
    /// Findings never fail the load; callers pick their own tolerance.
    pub fn validate_for_platform(&self, platform: &str) -> Vec<String> {
        let mut findings = Vec::new();

        for (name, dependencies) in self.dependency_graph() {
            for dependency in dependencies {
                match self.get_package(dependency) {
                    None => findings.push(format!(
                        "package '{name}' depends on '{dependency}' which is missing from the catalog"
                    )),
                    Some(target) if !target.available => findings.push(format!(
                        "package '{name}' depends on '{dependency}' which is not available"
                    )),
                    Some(_) => {}
                }
            }
        }

        for (repo, release) in self.releases() {
            if !release.has_platform_asset(platform) {
                findings.push(format!(
                    "release '{repo}' ({}) has no asset for platform '{platform}'",
                    release.tag_name
                ));
            }
        }

        findings
    }
}
