use std::collections::BTreeMap;

/// Declarative behavior of a fake executable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinaryProfile {
    pub name: String,
    pub version: String,
    pub help: String,
    /// Exact argument to the text printed for it.
    pub flags: BTreeMap<String, String>,
    /// Exact argument to a forced exit code, checked before `flags`.
    pub exit_codes: BTreeMap<String, i32>,
}

impl BinaryProfile {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        help: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            help: help.into(),
            ..Self::default()
        }
    }

    pub fn flag(mut self, arg: impl Into<String>, output: impl Into<String>) -> Self {
        self.flags.insert(arg.into(), output.into());
        self
    }

    pub fn exit_code(mut self, arg: impl Into<String>, code: i32) -> Self {
        self.exit_codes.insert(arg.into(), code);
        self
    }

    pub fn version_line(&self) -> String {
        format!("{} {}", self.name, self.version)
    }

    /// Renders the POSIX shell stub that replays this profile.
    pub fn render_stub(&self) -> String {
        let mut script = String::new();
        script.push_str("#!/bin/sh\n");
        script.push_str(&format!("# rootsim fake binary: {}\n", self.version_line()));
        script.push_str("arg=\"$1\"\n");

        if !self.exit_codes.is_empty() {
            script.push_str("case \"$arg\" in\n");
            for (arg, code) in &self.exit_codes {
                script.push_str(&format!("{})\n", shell_quote(arg)));
                if let Some(output) = self.flags.get(arg) {
                    script.push_str(&format!("    printf '%s\\n' {}\n", shell_quote(output)));
                }
                script.push_str(&format!("    exit {code}\n    ;;\n"));
            }
            script.push_str("esac\n");
        }

        script.push_str("case \"$arg\" in\n");
        for (arg, output) in &self.flags {
            script.push_str(&format!(
                "{})\n    printf '%s\\n' {}\n    exit 0\n    ;;\n",
                shell_quote(arg),
                shell_quote(output)
            ));
        }
        let version_args = ["--version", "-V"]
            .into_iter()
            .filter(|arg| !self.flags.contains_key(*arg) && !self.exit_codes.contains_key(*arg))
            .map(shell_quote)
            .collect::<Vec<_>>();
        if !version_args.is_empty() {
            script.push_str(&format!(
                "{})\n    printf '%s\\n' {}\n    exit 0\n    ;;\n",
                version_args.join("|"),
                shell_quote(&self.version_line())
            ));
        }
        script.push_str(&format!(
            "'--help'|'-h'|'')\n    printf '%s\\n' {}\n    exit 0\n    ;;\n",
            shell_quote(&self.help)
        ));
        script.push_str(&format!(
            "*)\n    printf '%s: unknown option '\\''%s'\\''\\n' {} \"$arg\" >&2\n    exit 1\n    ;;\n",
            shell_quote(&self.name)
        ));
        script.push_str("esac\n");
        script
    }
}

/// Wraps `value` in single quotes for `sh`, escaping embedded quotes.
pub(crate) fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}
