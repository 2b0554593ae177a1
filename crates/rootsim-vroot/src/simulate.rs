use std::fs;
use std::path::PathBuf;

use rootsim_core::{
    BundleInfo, InstallMethod, IoContext, ReleaseInfo, RepositoryPlan, ScriptInfo, SimResult,
};
use rootsim_fakebin::{BinaryProfile, DesktopEntry, FakeBinarySynthesizer};
use tracing::debug;

use crate::interpreter::{run_post_install, ScriptStep};
use crate::records::{write_install_record, InstallRecord};
use crate::status::{append_status_entry, StatusEntry};
use crate::RootLayout;

pub(crate) fn simulate_repository(
    layout: &RootLayout,
    synthesizer: &FakeBinarySynthesizer,
    plan: &RepositoryPlan,
) -> SimResult<()> {
    synthesizer.create_binary(&BinaryProfile::new(
        &plan.name,
        &plan.version,
        &plan.description,
    ))?;
    append_status_entry(layout, &StatusEntry::installed(plan))?;
    debug!(package = %plan.name, status = %layout.status_path().display(), "appended status entry");
    Ok(())
}

pub(crate) fn simulate_bundle(layout: &RootLayout, bundle: &BundleInfo) -> SimResult<()> {
    let metadata_path = layout.bundle_metadata_path(&bundle.id);
    if let Some(parent) = metadata_path.parent() {
        fs::create_dir_all(parent)
            .io_context(|| format!("failed to create bundle dir: {}", parent.display()))?;
    }
    fs::write(&metadata_path, render_bundle_metadata(bundle).as_bytes())
        .io_context(|| format!("failed writing bundle metadata: {}", metadata_path.display()))?;

    let applications = layout.applications_dir();
    fs::create_dir_all(&applications)
        .io_context(|| format!("failed to create {}", applications.display()))?;
    let desktop_path = applications.join(bundle.desktop_file_name());
    fs::write(&desktop_path, bundle_desktop_entry(bundle).render().as_bytes())
        .io_context(|| format!("failed writing desktop entry: {}", desktop_path.display()))?;

    debug!(
        bundle = %bundle.id,
        metadata = %metadata_path.display(),
        desktop = %desktop_path.display(),
        "wrote bundle artifacts"
    );
    Ok(())
}

pub(crate) fn simulate_release(
    layout: &RootLayout,
    synthesizer: &FakeBinarySynthesizer,
    name: &str,
    version: &str,
    repo: &str,
    release: Option<&ReleaseInfo>,
    platform: &str,
) -> SimResult<InstallRecord> {
    let asset = release
        .and_then(|release| release.platform_assets(platform).next())
        .map(|asset| asset.name.clone());
    let help = match &asset {
        Some(asset) => format!("{name} {version} from {repo} ({asset})"),
        None => format!("{name} {version} from {repo}"),
    };
    synthesizer.create_binary(&BinaryProfile::new(name, version, help))?;

    let mut record = InstallRecord::new(name, version, InstallMethod::Release, repo);
    record.asset = asset;
    write_install_record(layout, &record)?;
    debug!(package = %name, record = %layout.record_path(name).display(), "wrote install record");
    Ok(record)
}

pub(crate) fn simulate_script(
    layout: &RootLayout,
    synthesizer: &FakeBinarySynthesizer,
    script: &ScriptInfo,
) -> SimResult<Vec<PathBuf>> {
    synthesizer.create_binary(&BinaryProfile::new(
        &script.binary,
        "latest",
        &script.description,
    ))?;

    let created = run_post_install(layout, script)?
        .into_iter()
        .filter_map(|step| match step {
            ScriptStep::CreatedDir(path) => Some(path),
            ScriptStep::Skipped(_) => None,
        })
        .collect();
    Ok(created)
}

/// Keyfile-style bundle metadata: the application section plus the sandbox context
/// derived from `--share=`, `--socket=`, `--device=` and `--filesystem=` permissions.
pub(crate) fn render_bundle_metadata(bundle: &BundleInfo) -> String {
    let mut shared = Vec::new();
    let mut sockets = Vec::new();
    let mut devices = Vec::new();
    let mut filesystems = Vec::new();
    for permission in &bundle.permissions {
        let Some((key, value)) = permission.trim_start_matches('-').split_once('=') else {
            continue;
        };
        match key {
            "share" => shared.push(value),
            "socket" => sockets.push(value),
            "device" => devices.push(value),
            "filesystem" => filesystems.push(value),
            _ => {}
        }
    }

    let mut content = String::from("[Application]\n");
    content.push_str(&format!("name={}\n", bundle.id));
    if !bundle.runtime.is_empty() {
        content.push_str(&format!("runtime={}\n", bundle.runtime_ref()));
    }
    if !bundle.sdk.is_empty() {
        let sdk = if bundle.runtime_version.is_empty() {
            bundle.sdk.clone()
        } else {
            format!("{}/x86_64/{}", bundle.sdk, bundle.runtime_version)
        };
        content.push_str(&format!("sdk={sdk}\n"));
    }
    content.push_str(&format!("command={}\n", bundle.package_name()));

    content.push_str("\n[Context]\n");
    for (key, values) in [
        ("shared", shared),
        ("sockets", sockets),
        ("devices", devices),
        ("filesystems", filesystems),
    ] {
        if !values.is_empty() {
            content.push_str(&format!("{key}={};\n", values.join(";")));
        }
    }
    content
}

fn bundle_desktop_entry(bundle: &BundleInfo) -> DesktopEntry {
    DesktopEntry {
        name: bundle.name.clone(),
        comment: bundle.description.clone(),
        exec: format!("flatpak run {}", bundle.id),
        icon: bundle.id.clone(),
        ..DesktopEntry::default()
    }
}
