use std::collections::BTreeMap;

use rootsim_core::ScriptInfo;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

/// The fixed registry of ad-hoc install procedures, keyed by registry name.
pub fn builtin_scripts() -> BTreeMap<String, ScriptInfo> {
    let mut scripts = BTreeMap::new();

    scripts.insert(
        "starship_install".to_string(),
        ScriptInfo {
            name: "Starship".to_string(),
            description: "Cross-shell prompt".to_string(),
            binary: "starship".to_string(),
            commands: strings(&["curl -sS https://starship.rs/install.sh | sh -s -- -y"]),
            prerequisites: strings(&["curl", "sh"]),
            post_install: strings(&[
                "mkdir -p ${CONFIG_DIR}",
                "starship preset nerd-font-symbols -o ${CONFIG_DIR}/starship.toml",
            ]),
            variables: BTreeMap::from([("CONFIG_DIR".to_string(), "~/.config".to_string())]),
        },
    );

    scripts.insert(
        "rustup_install".to_string(),
        ScriptInfo {
            name: "rustup".to_string(),
            description: "The Rust toolchain installer".to_string(),
            binary: "rustup".to_string(),
            commands: strings(&[
                "curl --proto '=https' --tlsv1.2 -sSf https://sh.rustup.rs | sh -s -- -y --no-modify-path",
            ]),
            prerequisites: strings(&["curl"]),
            post_install: strings(&[
                "mkdir -p ${CARGO_HOME}/bin",
                "mkdir -p ${CARGO_HOME}/registry",
                "rustup default stable",
            ]),
            variables: BTreeMap::from([("CARGO_HOME".to_string(), "~/.cargo".to_string())]),
        },
    );

    scripts.insert(
        "nvm_install".to_string(),
        ScriptInfo {
            name: "nvm".to_string(),
            description: "Node Version Manager".to_string(),
            binary: "nvm".to_string(),
            commands: strings(&[
                "curl -o- https://raw.githubusercontent.com/nvm-sh/nvm/v0.39.7/install.sh | bash",
            ]),
            prerequisites: strings(&["curl", "bash"]),
            post_install: strings(&["mkdir -p ${NVM_DIR}", "nvm install --lts"]),
            variables: BTreeMap::from([("NVM_DIR".to_string(), "~/.nvm".to_string())]),
        },
    );

    scripts.insert(
        "zoxide_install".to_string(),
        ScriptInfo {
            name: "zoxide".to_string(),
            description: "A smarter cd command".to_string(),
            binary: "zoxide".to_string(),
            commands: strings(&[
                "curl -sSfL https://raw.githubusercontent.com/ajeetdsouza/zoxide/main/install.sh | sh",
            ]),
            prerequisites: strings(&["curl"]),
            post_install: strings(&[
                "mkdir -p /usr/local/share/zoxide",
                "mkdir ~/.local/share/zoxide",
            ]),
            variables: BTreeMap::new(),
        },
    );

    scripts
}
