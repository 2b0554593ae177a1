use crate::{BinaryProfile, DesktopEntry};

/// System tools every simulated host is expected to carry.
pub fn common_profiles() -> Vec<BinaryProfile> {
    vec![
        BinaryProfile::new("git", "2.43.0", "usage: git [--version] [--help] <command> [<args>]")
            .flag("--version", "git version 2.43.0")
            .exit_code("--fail", 128),
        BinaryProfile::new("curl", "8.5.0", "Usage: curl [options...] <url>")
            .flag("--version", "curl 8.5.0 (x86_64-pc-linux-gnu) libcurl/8.5.0"),
        BinaryProfile::new("wget", "1.21.4", "Usage: wget [OPTION]... [URL]...")
            .flag("--version", "GNU Wget 1.21.4 built on linux-gnu."),
        BinaryProfile::new("sudo", "1.9.15", "usage: sudo -h | -K | -k | -V")
            .flag("-V", "Sudo version 1.9.15p5"),
        BinaryProfile::new("apt", "2.7.14", "Usage: apt [options] command")
            .flag("--version", "apt 2.7.14 (amd64)"),
        BinaryProfile::new("dpkg", "1.22.6", "Usage: dpkg [<option>...] <command>")
            .flag(
                "--version",
                "Debian 'dpkg' package management program version 1.22.6 (amd64).",
            )
            .flag("--print-architecture", "amd64"),
        BinaryProfile::new("flatpak", "1.14.6", "Usage: flatpak [OPTION…] COMMAND")
            .flag("--version", "Flatpak 1.14.6")
            .flag("--installations", "/var/lib/flatpak"),
        BinaryProfile::new("systemctl", "255", "systemctl [OPTIONS...] COMMAND ...")
            .flag("--version", "systemd 255 (255.4-1ubuntu8)")
            .exit_code("is-system-running", 1),
        BinaryProfile::new("fc-cache", "2.15.0", "usage: fc-cache [-EfrsvVh] [DIRS]")
            .flag("-V", "fontconfig version 2.15.0"),
        BinaryProfile::new(
            "gsettings",
            "2.80.0",
            "Usage: gsettings --version | [--schemadir SCHEMADIR] COMMAND [ARGS…]",
        )
        .flag("--version", "2.80.0"),
        BinaryProfile::new("unzip", "6.00", "UnZip 6.00 of 20 April 2009, by Debian.")
            .flag("-v", "UnZip 6.00 of 20 April 2009, by Debian. Original by Info-ZIP."),
        BinaryProfile::new("tar", "1.35", "Usage: tar [OPTION...] [FILE]...")
            .flag("--version", "tar (GNU tar) 1.35"),
    ]
}

/// Desktop and editor applications the harness pre-seeds.
pub fn application_profiles() -> Vec<BinaryProfile> {
    vec![
        BinaryProfile::new(
            "code",
            "1.89.1",
            "Visual Studio Code 1.89.1\n\nUsage: code [options][paths...]",
        )
        .flag(
            "--version",
            "1.89.1\ndc96b837cf6bb4af9cd736aa3af08cf8279f7685\nx64",
        )
        .flag("--list-extensions", ""),
        BinaryProfile::new("firefox", "126.0", "Usage: firefox [ options ... ] [URL]")
            .flag("--version", "Mozilla Firefox 126.0"),
        BinaryProfile::new(
            "alacritty",
            "0.13.2",
            "A fast, cross-platform, OpenGL terminal emulator\n\nUsage: alacritty [OPTIONS] [COMMAND]",
        )
        .flag("--version", "alacritty 0.13.2"),
        BinaryProfile::new("kitty", "0.35.1", "Usage: kitty [options] [program-to-run ...]")
            .flag("--version", "kitty 0.35.1 created by Kovid Goyal"),
        BinaryProfile::new("emacs", "29.3", "Usage: emacs [OPTION-OR-FILENAME]...")
            .flag("--version", "GNU Emacs 29.3"),
    ]
}

/// Launcher entries for the subset of application profiles that ship one.
pub fn application_desktop_entries() -> Vec<(String, DesktopEntry)> {
    vec![
        (
            "code.desktop".to_string(),
            DesktopEntry {
                name: "Visual Studio Code".to_string(),
                comment: "Code Editing. Redefined.".to_string(),
                exec: "/usr/local/bin/code %F".to_string(),
                icon: "vscode".to_string(),
                categories: vec![
                    "Utility".into(),
                    "TextEditor".into(),
                    "Development".into(),
                    "IDE".into(),
                ],
                mime_types: vec!["text/plain".into(), "inode/directory".into()],
                terminal: false,
            },
        ),
        (
            "firefox.desktop".to_string(),
            DesktopEntry {
                name: "Firefox".to_string(),
                comment: "Browse the World Wide Web".to_string(),
                exec: "/usr/local/bin/firefox %u".to_string(),
                icon: "firefox".to_string(),
                categories: vec!["Network".into(), "WebBrowser".into()],
                mime_types: vec![
                    "text/html".into(),
                    "x-scheme-handler/http".into(),
                    "x-scheme-handler/https".into(),
                ],
                terminal: false,
            },
        ),
        (
            "Alacritty.desktop".to_string(),
            DesktopEntry {
                name: "Alacritty".to_string(),
                comment: "A fast, cross-platform, OpenGL terminal emulator".to_string(),
                exec: "/usr/local/bin/alacritty".to_string(),
                icon: "Alacritty".to_string(),
                categories: vec!["System".into(), "TerminalEmulator".into()],
                mime_types: Vec::new(),
                terminal: false,
            },
        ),
    ]
}
