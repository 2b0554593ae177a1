use std::fs;
use std::process::Command;

use tempfile::TempDir;

use super::*;

fn test_synthesizer() -> (TempDir, FakeBinarySynthesizer) {
    let root = TempDir::new().expect("must create temp dir");
    let synth = FakeBinarySynthesizer::new(root.path().join("usr/local/bin"));
    (root, synth)
}

fn run(path: &Path, arg: Option<&str>) -> (i32, String, String) {
    let mut command = Command::new(path);
    if let Some(arg) = arg {
        command.arg(arg);
    }
    // A concurrent fork in another test can briefly hold the stub open for writing.
    let mut attempts = 0;
    let output = loop {
        match command.output() {
            Err(err) if err.raw_os_error() == Some(26) && attempts < 10 => {
                attempts += 1;
                std::thread::sleep(std::time::Duration::from_millis(20));
            }
            result => break result.expect("stub must run"),
        }
    };
    (
        output.status.code().expect("stub must exit normally"),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

fn tool_profile() -> BinaryProfile {
    BinaryProfile::new("tool", "1.2.3", "usage: tool [--version]")
        .flag("--list", "alpha\nbeta")
        .flag("--quote", "it's quoted")
        .flag("--broken", "partial output")
        .exit_code("--broken", 3)
        .exit_code("--missing", 2)
}

#[test]
fn create_binary_writes_executable_stub() {
    let (_root, synth) = test_synthesizer();
    let path = synth
        .create_binary(&tool_profile())
        .expect("must create binary");

    assert_eq!(path, synth.bin_dir().join("tool"));
    let metadata = fs::metadata(&path).expect("stub must exist");
    assert!(is_executable(&metadata));
    let content = fs::read_to_string(&path).expect("must read stub");
    assert!(content.starts_with("#!/bin/sh\n"));
    synth.validate_binary("tool").expect("stub must validate");
}

#[cfg(unix)]
#[test]
fn stub_replays_flag_table() {
    let (_root, synth) = test_synthesizer();
    let path = synth
        .create_binary(&tool_profile())
        .expect("must create binary");

    assert_eq!(run(&path, Some("--list")), (0, "alpha\nbeta\n".to_string(), String::new()));
    assert_eq!(run(&path, Some("--quote")).1, "it's quoted\n");
    assert_eq!(run(&path, Some("--version")).1, "tool 1.2.3\n");
}

#[cfg(unix)]
#[test]
fn stub_answers_short_version_flag_by_default() {
    let (_root, synth) = test_synthesizer();
    let path = synth
        .create_binary(&BinaryProfile::new("tool", "1.2.3", "usage: tool"))
        .expect("must create binary");

    assert_eq!(run(&path, Some("-V")), (0, "tool 1.2.3\n".to_string(), String::new()));
    assert_eq!(run(&path, Some("--version")).1, "tool 1.2.3\n");
}

#[cfg(unix)]
#[test]
fn stub_version_flags_follow_overrides() {
    let (_root, synth) = test_synthesizer();
    let profile = BinaryProfile::new("sudo", "1.9.15", "usage: sudo")
        .flag("-V", "Sudo version 1.9.15p5")
        .exit_code("--version", 4);
    let path = synth.create_binary(&profile).expect("must create binary");

    assert_eq!(run(&path, Some("-V")).1, "Sudo version 1.9.15p5\n");
    assert_eq!(run(&path, Some("--version")), (4, String::new(), String::new()));
}

#[cfg(unix)]
#[test]
fn stub_prints_help_for_help_flag_and_no_argument() {
    let (_root, synth) = test_synthesizer();
    let path = synth
        .create_binary(&tool_profile())
        .expect("must create binary");

    assert_eq!(run(&path, Some("--help")).1, "usage: tool [--version]\n");
    assert_eq!(run(&path, Some("-h")).1, "usage: tool [--version]\n");
    assert_eq!(run(&path, None).1, "usage: tool [--version]\n");
}

#[cfg(unix)]
#[test]
fn stub_rejects_unknown_option() {
    let (_root, synth) = test_synthesizer();
    let path = synth
        .create_binary(&tool_profile())
        .expect("must create binary");

    let (code, stdout, stderr) = run(&path, Some("--frobnicate"));
    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert_eq!(stderr, "tool: unknown option '--frobnicate'\n");
}

#[cfg(unix)]
#[test]
fn stub_exit_code_overrides_win_over_flag_table() {
    let (_root, synth) = test_synthesizer();
    let path = synth
        .create_binary(&tool_profile())
        .expect("must create binary");

    assert_eq!(run(&path, Some("--broken")), (3, "partial output\n".to_string(), String::new()));
    assert_eq!(run(&path, Some("--missing")), (2, String::new(), String::new()));
}

#[test]
fn validate_binary_reports_missing_and_non_executable() {
    let (_root, synth) = test_synthesizer();
    let err = synth
        .validate_binary("ghost")
        .expect_err("missing binary must fail");
    assert!(err.is_not_found(ItemKind::Binary));

    fs::create_dir_all(synth.bin_dir()).expect("must create bin dir");
    let plain = synth.binary_path("plain");
    fs::write(&plain, "#!/bin/sh\n").expect("must write plain file");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&plain, fs::Permissions::from_mode(0o644))
            .expect("must set permissions");
        let err = synth
            .validate_binary("plain")
            .expect_err("non-executable must fail");
        assert!(matches!(err, SimError::NotExecutable(ref path) if path == &plain));
    }
}

#[test]
fn list_created_binaries_skips_non_executables_and_dirs() {
    let (_root, synth) = test_synthesizer();
    assert!(synth
        .list_created_binaries()
        .expect("missing dir lists empty")
        .is_empty());

    synth
        .create_binary(&BinaryProfile::new("zeta", "1", "zeta help"))
        .expect("must create zeta");
    synth
        .create_binary(&BinaryProfile::new("alpha", "1", "alpha help"))
        .expect("must create alpha");
    fs::create_dir_all(synth.bin_dir().join("subdir")).expect("must create subdir");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let notes = synth.binary_path("notes.txt");
        fs::write(&notes, "notes").expect("must write notes");
        fs::set_permissions(&notes, fs::Permissions::from_mode(0o644))
            .expect("must set permissions");
    }

    assert_eq!(
        synth.list_created_binaries().expect("must list"),
        vec!["alpha", "zeta"]
    );
}

#[test]
fn common_and_application_catalogs_are_installed() {
    let (_root, synth) = test_synthesizer();
    let common = synth
        .create_common_binaries()
        .expect("must create common binaries");
    let apps = synth
        .create_application_binaries()
        .expect("must create application binaries");

    assert_eq!(common.len(), common_profiles().len());
    assert_eq!(apps.len(), application_profiles().len());
    let listed = synth.list_created_binaries().expect("must list");
    for name in ["git", "curl", "flatpak", "dpkg", "code", "firefox", "alacritty"] {
        assert!(listed.iter().any(|entry| entry == name), "missing {name}");
    }
}

#[test]
fn desktop_entries_carry_launcher_fields() {
    let (root, synth) = test_synthesizer();
    let dir = root.path().join("usr/share/applications");
    let written = synth
        .create_desktop_entries(&dir)
        .expect("must write desktop entries");
    assert_eq!(written.len(), application_desktop_entries().len());

    let firefox = fs::read_to_string(dir.join("firefox.desktop")).expect("must read entry");
    assert!(firefox.starts_with("[Desktop Entry]\n"));
    assert!(firefox.contains("Exec=/usr/local/bin/firefox %u\n"));
    assert!(firefox.contains("Icon=firefox\n"));
    assert!(firefox.contains("Categories=Network;WebBrowser;\n"));
    assert!(firefox.contains("MimeType=text/html;x-scheme-handler/http;x-scheme-handler/https;\n"));
}

#[test]
fn desktop_entry_omits_empty_optional_fields() {
    let entry = DesktopEntry {
        name: "Plain".to_string(),
        exec: "plain".to_string(),
        ..DesktopEntry::default()
    };
    let rendered = entry.render();
    assert!(!rendered.contains("Icon="));
    assert!(!rendered.contains("MimeType="));
    assert!(rendered.contains("Terminal=false\n"));
}

#[test]
fn cleanup_removes_bin_dir_and_tolerates_repeat() {
    let (_root, synth) = test_synthesizer();
    synth
        .create_common_binaries()
        .expect("must create common binaries");
    synth.cleanup().expect("first cleanup");
    assert!(!synth.bin_dir().exists());
    synth.cleanup().expect("second cleanup must not fail");
}
