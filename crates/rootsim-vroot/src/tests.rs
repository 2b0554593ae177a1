use std::fs;
use std::path::{Path, PathBuf};

use rootsim_catalog::Database;
use rootsim_core::{
    InstallMethod, InstallPlan, ItemKind, PackageMetadata, ScriptInfo, SimError,
};
use tempfile::TempDir;

use super::*;
use crate::interpreter::mkdir_targets;
use crate::status::parse_status;

fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../fixtures")
}

fn fixture_options() -> VirtualRootOptions {
    VirtualRootOptions {
        fixtures: Some(fixture_dir()),
        ..VirtualRootOptions::default()
    }
}

fn fixture_root() -> (TempDir, VirtualRoot) {
    let temp = TempDir::new().expect("must create temp dir");
    let root = VirtualRoot::new(temp.path().join("root"), fixture_options())
        .expect("must create virtual root");
    (temp, root)
}

fn tree_snapshot(dir: &Path) -> Vec<(PathBuf, u64)> {
    let mut entries = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in fs::read_dir(&current).expect("must read dir") {
            let entry = entry.expect("must read entry");
            let metadata = entry.metadata().expect("must stat entry");
            if metadata.is_dir() {
                pending.push(entry.path());
            }
            entries.push((entry.path(), metadata.len()));
        }
    }
    entries.sort();
    entries
}

#[test]
fn new_creates_skeleton_and_seeds_binaries() {
    let (_temp, root) = fixture_root();
    let layout = root.layout();
    for dir in [
        layout.bin_dir(),
        layout.etc_dir(),
        layout.share_dir(),
        layout.applications_dir(),
        layout.tmp_dir(),
        layout.home_dir(),
    ] {
        assert!(dir.is_dir(), "{} must exist", dir.display());
    }

    assert!(root.is_installed("git"));
    assert!(root.is_installed("code"));
    assert!(!root.is_installed("vim"));
    assert!(layout.applications_dir().join("code.desktop").is_file());
    assert!(root.database().is_some());
}

#[test]
fn new_without_population_leaves_bin_dir_empty() {
    let temp = TempDir::new().expect("must create temp dir");
    let root = VirtualRoot::new(
        temp.path().join("root"),
        VirtualRootOptions {
            populate_binaries: false,
            ..VirtualRootOptions::default()
        },
    )
    .expect("must create virtual root");

    assert!(root.layout().bin_dir().is_dir());
    assert!(root
        .installed_packages()
        .expect("must list packages")
        .is_empty());
    assert!(root.database().is_none());
}

#[test]
fn new_fails_when_fixtures_are_missing() {
    let temp = TempDir::new().expect("must create temp dir");
    let err = VirtualRoot::new(
        temp.path().join("root"),
        VirtualRootOptions {
            fixtures: Some(temp.path().join("no-fixtures")),
            ..VirtualRootOptions::default()
        },
    )
    .expect_err("missing fixtures must fail");
    assert!(matches!(err, SimError::Load { .. }));
}

#[test]
fn simulate_install_requires_database() {
    let temp = TempDir::new().expect("must create temp dir");
    let mut root = VirtualRoot::new(temp.path().join("root"), VirtualRootOptions::default())
        .expect("must create virtual root");
    let err = root
        .simulate_install("vim")
        .expect_err("install without database must fail");
    assert!(matches!(err, SimError::NotLoaded));
}

#[test]
fn simulate_install_rejects_unknown_package() {
    let (_temp, mut root) = fixture_root();
    let err = root
        .simulate_install("no-such-package")
        .expect_err("unknown package must fail");
    assert!(err.is_not_found(ItemKind::Package));
}

#[test]
fn unsupported_method_fails_without_writing() {
    let temp = TempDir::new().expect("must create temp dir");
    let mut database = Database::new();
    database
        .insert_package(PackageMetadata::new("mystery", "snap", "mystery"))
        .expect("must insert package");
    let mut root = VirtualRoot::with_database(
        temp.path().join("root"),
        VirtualRootOptions::default(),
        database,
    )
    .expect("must create virtual root");

    let before = tree_snapshot(root.root());
    let err = root
        .simulate_install("mystery")
        .expect_err("unsupported method must fail");
    assert!(matches!(err, SimError::Unsupported(ref tag) if tag == "snap"));
    assert_eq!(tree_snapshot(root.root()), before);
    assert!(!root.layout().status_path().exists());
}

#[test]
fn repository_install_writes_stub_and_status_entry() {
    let (_temp, mut root) = fixture_root();
    let plan = root.simulate_install("vim").expect("must install vim");
    assert_eq!(plan.method(), InstallMethod::Repository);

    assert!(root.synthesizer().binary_path("vim").is_file());
    let entries = root.status_entries().expect("must read status");
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.package, "vim");
    assert_eq!(entry.status, INSTALLED_STATUS);
    assert_eq!(entry.version, "2:9.0.1378-2");
    assert_eq!(entry.section, "editors");
    assert_eq!(entry.architecture, "amd64");
    assert!(entry.maintainer.contains("Debian Vim Maintainers"));
}

// Re-installing appends a second stanza instead of replacing the first one.
#[test]
fn repeated_repository_install_appends_duplicate_status_blocks() {
    let (_temp, mut root) = fixture_root();
    root.simulate_install("vim").expect("first install");
    root.simulate_install("vim").expect("second install");

    let raw = fs::read_to_string(root.layout().status_path()).expect("must read status");
    assert_eq!(raw.matches("Package: vim\n").count(), 2);
    assert_eq!(root.status_entries().expect("must read status").len(), 2);

    let installed = root.installed_packages().expect("must list packages");
    assert!(installed.iter().filter(|name| *name == "vim").count() >= 2);
}

#[test]
fn validate_installation_tracks_install_state() {
    let (_temp, mut root) = fixture_root();
    let package = root
        .database()
        .and_then(|db| db.get_package("vim"))
        .expect("fixture defines vim");
    assert!(package.is_method(InstallMethod::Repository));

    let err = root
        .validate_installation("vim")
        .expect_err("vim is not installed yet");
    assert!(matches!(err, SimError::NotInstalled(ref name) if name == "vim"));

    root.simulate_install("vim").expect("must install vim");
    root.validate_installation("vim")
        .expect("vim must validate after install");
}

#[cfg(unix)]
#[test]
fn validate_installation_reports_non_executable_binary() {
    use std::os::unix::fs::PermissionsExt;

    let (_temp, root) = fixture_root();
    let path = root.synthesizer().binary_path("broken");
    fs::write(&path, "#!/bin/sh\n").expect("must write file");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).expect("must chmod");

    assert!(root.is_installed("broken"));
    let err = root
        .validate_installation("broken")
        .expect_err("non-executable binary must fail");
    assert!(matches!(err, SimError::NotExecutable(ref failed) if failed == &path));
}

#[test]
fn release_install_writes_stub_and_record() {
    let (_temp, mut root) = fixture_root();
    let plan = root.simulate_install("btop").expect("must install btop");
    assert_eq!(
        plan,
        InstallPlan::Release {
            name: "btop".to_string(),
            version: "1.3.2".to_string(),
            repo: "aristocratos/btop".to_string(),
        }
    );

    assert!(root.is_installed("btop"));
    let package = root
        .database()
        .and_then(|db| db.get_package("btop"))
        .expect("fixture defines btop")
        .clone();
    let record = root.read_install_record("btop").expect("must read record");
    assert_eq!(record.name, package.name);
    assert_eq!(record.version, package.version);
    assert_eq!(record.source, package.source);
    assert_eq!(record.method, InstallMethod::Release);
    assert_eq!(record.installed_at, RECORD_TIMESTAMP);
    assert_eq!(record.asset.as_deref(), Some("btop-x86_64-linux-musl.tbz"));

    let raw = fs::read_to_string(root.layout().record_path("btop")).expect("must read raw record");
    let json: serde_json::Value = serde_json::from_str(&raw).expect("record must be json");
    assert_eq!(json["method"], "release");
    assert_eq!(json["installed_at"], "2024-01-01T00:00:00Z");
}

#[test]
fn release_asset_follows_platform_option() {
    let temp = TempDir::new().expect("must create temp dir");
    let mut root = VirtualRoot::new(
        temp.path().join("root"),
        VirtualRootOptions {
            platform: "darwin".to_string(),
            populate_binaries: false,
            ..fixture_options()
        },
    )
    .expect("must create virtual root");

    root.simulate_install("lazygit").expect("must install lazygit");
    let record = root.read_install_record("lazygit").expect("must read record");
    assert_eq!(record.asset.as_deref(), Some("lazygit_0.42.0_Darwin_arm64.tar.gz"));

    root.simulate_install("btop").expect("must install btop");
    let record = root.read_install_record("btop").expect("must read record");
    assert_eq!(record.asset, None);
}

#[test]
fn read_install_record_for_missing_package_is_not_installed() {
    let (_temp, root) = fixture_root();
    let err = root
        .read_install_record("btop")
        .expect_err("no record before install");
    assert!(matches!(err, SimError::NotInstalled(_)));
}

#[test]
fn bundle_install_writes_metadata_and_desktop_entry() {
    let (_temp, mut root) = fixture_root();
    assert!(!root.is_installed("gimp"));
    root.simulate_install("gimp").expect("must install gimp");

    let metadata = fs::read_to_string(root.layout().bundle_metadata_path("org.gimp.GIMP"))
        .expect("must read metadata");
    assert!(metadata.starts_with("[Application]\nname=org.gimp.GIMP\n"));
    assert!(metadata.contains("runtime=org.gnome.Platform/x86_64/46\n"));
    assert!(metadata.contains("sdk=org.gnome.Sdk/x86_64/46\n"));
    assert!(metadata.contains("[Context]\n"));
    assert!(metadata.contains("shared=ipc;\n"));
    assert!(metadata.contains("sockets=x11;wayland;\n"));
    assert!(metadata.contains("filesystems=host;\n"));

    let desktop = fs::read_to_string(
        root.layout()
            .applications_dir()
            .join("org_gimp_GIMP.desktop"),
    )
    .expect("must read desktop entry");
    assert!(desktop.contains("Name=GNU Image Manipulation Program\n"));
    assert!(desktop.contains("Exec=flatpak run org.gimp.GIMP\n"));

    assert!(root.is_installed("gimp"));
    assert!(root.is_installed("org.gimp.GIMP"));
    assert!(!root.synthesizer().binary_path("gimp").exists());
    root.validate_installation("gimp")
        .expect("bundle install must validate");
}

#[test]
fn bundle_with_explicit_package_name_is_probed_by_that_name() {
    let (_temp, mut root) = fixture_root();
    root.simulate_install("spotify").expect("must install spotify");
    assert!(root
        .layout()
        .bundle_dir("com.spotify.Client")
        .join("current/active/metadata")
        .is_file());
    assert!(root.is_installed("spotify"));
    assert!(!root.is_installed("client"));
}

#[test]
fn script_install_translates_mkdir_paths() {
    let (_temp, mut root) = fixture_root();
    let plan = root.simulate_install("zoxide").expect("must install zoxide");
    assert_eq!(plan.method(), InstallMethod::Script);

    assert!(root.synthesizer().binary_path("zoxide").is_file());
    assert!(root.root().join("usr/local/share/zoxide").is_dir());
    assert!(root.layout().home_dir().join(".local/share/zoxide").is_dir());
    root.validate_installation("zoxide")
        .expect("script install must validate");
}

#[test]
fn script_mkdir_options_do_not_become_directories() {
    let (_temp, root) = fixture_root();
    let script = ScriptInfo {
        name: "keys".to_string(),
        binary: "keys".to_string(),
        post_install: vec![
            "mkdir -m 700 ~/.ssh".to_string(),
            "mkdir --mode=755 -p /opt/tool".to_string(),
            "mkdir -pm 700 ~/.gnupg".to_string(),
        ],
        ..ScriptInfo::default()
    };

    let steps = run_post_install(root.layout(), &script).expect("must run post-install");
    let home = root.layout().home_dir();
    assert_eq!(
        steps,
        vec![
            ScriptStep::CreatedDir(home.join(".ssh")),
            ScriptStep::CreatedDir(root.root().join("opt/tool")),
            ScriptStep::CreatedDir(home.join(".gnupg")),
        ]
    );
    assert!(home.join(".ssh").is_dir());
    assert!(!home.join("700").exists());
    assert!(!home.join("755").exists());
}

#[test]
fn mkdir_targets_strip_options_and_values() {
    let args = |line: &'static str| mkdir_targets(line.split_whitespace());
    assert_eq!(args("-p ~/a ~/b"), vec!["~/a", "~/b"]);
    assert_eq!(args("-m 0755 /srv"), vec!["/srv"]);
    assert_eq!(args("--mode 0755 --parents /srv"), vec!["/srv"]);
    assert_eq!(args("-m0700 -v /srv"), vec!["/srv"]);
    assert_eq!(args("-- -odd"), vec!["-odd"]);
}

#[test]
fn script_install_substitutes_variables() {
    let (_temp, mut root) = fixture_root();
    root.simulate_install("rustup").expect("must install rustup");

    let cargo_home = root.layout().home_dir().join(".cargo");
    assert!(cargo_home.join("bin").is_dir());
    assert!(cargo_home.join("registry").is_dir());
    assert!(!root.root().join("${CARGO_HOME}").exists());
}

#[test]
fn script_missing_from_registry_is_not_found() {
    let temp = TempDir::new().expect("must create temp dir");
    let mut database = Database::new();
    database
        .insert_package(PackageMetadata::new("ghost", "script", "ghost_install"))
        .expect("must insert package");
    let mut root = VirtualRoot::with_database(
        temp.path().join("root"),
        VirtualRootOptions::default(),
        database,
    )
    .expect("must create virtual root");

    let err = root
        .simulate_install("ghost")
        .expect_err("missing script must fail");
    assert!(err.is_not_found(ItemKind::Script));
}

#[test]
fn scenario_installs_across_methods() {
    let (_temp, mut root) = fixture_root();
    for name in ["vim", "git", "btop", "neovim"] {
        root.simulate_install(name)
            .unwrap_or_else(|err| panic!("must install {name}: {err}"));
    }

    let installed = root.installed_packages().expect("must list packages");
    for name in ["vim", "git", "btop", "neovim"] {
        assert!(installed.iter().any(|entry| entry == name), "{name} missing");
    }
    assert!(installed.iter().any(|entry| entry == "curl"));
}

#[test]
fn cleanup_removes_root_and_is_idempotent() {
    let (_temp, mut root) = fixture_root();
    root.simulate_install("vim").expect("must install vim");
    let path = root.root().to_path_buf();

    root.cleanup().expect("first cleanup");
    assert!(!path.exists());
    root.cleanup().expect("second cleanup must not fail");
    assert!(root.is_cleaned_up());
    assert!(!root.is_installed("vim"));
}

#[test]
fn operations_after_cleanup_fail() {
    let (_temp, mut root) = fixture_root();
    root.cleanup().expect("must clean up");

    let err = root
        .simulate_install("vim")
        .expect_err("install after cleanup must fail");
    assert!(matches!(err, SimError::CleanedUp(_)));
    assert!(matches!(
        root.installed_packages(),
        Err(SimError::CleanedUp(_))
    ));
    assert!(matches!(
        root.validate_installation("git"),
        Err(SimError::CleanedUp(_))
    ));
}

#[test]
fn cleanup_tolerates_externally_removed_root() {
    let (_temp, mut root) = fixture_root();
    fs::remove_dir_all(root.root()).expect("must remove root");
    root.cleanup().expect("cleanup of missing root must succeed");
}

#[test]
fn status_parser_handles_repeats_and_missing_trailing_blank() {
    let raw = "Package: vim\nStatus: install ok installed\nVersion: 2:9.0\n\n\
               Package: git\nVersion: 1:2.39.2\n\nPackage: vim\nVersion: 2:9.1";
    let entries = parse_status(raw);
    let names: Vec<_> = entries.iter().map(|entry| entry.package.as_str()).collect();
    assert_eq!(names, vec!["vim", "git", "vim"]);
    assert_eq!(entries[0].version, "2:9.0");
    assert_eq!(entries[2].version, "2:9.1");
}

#[test]
fn script_paths_resolve_inside_root() {
    let layout = RootLayout::new("/tmp/vroot");
    assert_eq!(
        layout.resolve_script_path("~"),
        Some(PathBuf::from("/tmp/vroot/home/user"))
    );
    assert_eq!(
        layout.resolve_script_path("~/.config"),
        Some(PathBuf::from("/tmp/vroot/home/user/.config"))
    );
    assert_eq!(
        layout.resolve_script_path("/etc/app"),
        Some(PathBuf::from("/tmp/vroot/etc/app"))
    );
    assert_eq!(
        layout.resolve_script_path("cache/./app"),
        Some(PathBuf::from("/tmp/vroot/home/user/cache/app"))
    );
    assert_eq!(layout.resolve_script_path("../escape"), None);
    assert_eq!(layout.resolve_script_path("~/../../etc"), None);
}
