use std::fs;
use std::path::PathBuf;

use rootsim_core::{IoContext, ScriptInfo, SimResult};
use tracing::{debug, warn};

use crate::RootLayout;

/// Outcome of one post-install command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    CreatedDir(PathBuf),
    Skipped(String),
}

/// Replays a script's post-install commands against the virtual root.
///
/// Only `mkdir` has an effect. Parents are always created, and mode options are parsed
/// along with their value and then ignored. Every other command is logged and reported as
/// skipped.
pub fn run_post_install(layout: &RootLayout, script: &ScriptInfo) -> SimResult<Vec<ScriptStep>> {
    let mut steps = Vec::new();
    for raw in &script.post_install {
        let command = script.substitute(raw);
        let mut tokens = command.split_whitespace();
        match tokens.next() {
            Some("mkdir") => {
                for target in mkdir_targets(tokens) {
                    steps.push(make_dir(layout, target)?);
                }
            }
            Some(_) => {
                warn!(script = %script.name, command = %command, "skipping command not simulated");
                steps.push(ScriptStep::Skipped(command));
            }
            None => {}
        }
    }
    Ok(steps)
}

/// Directory operands of a `mkdir` invocation, with options and option values removed.
pub(crate) fn mkdir_targets<'a>(mut args: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut targets = Vec::new();
    let mut options_done = false;
    while let Some(arg) = args.next() {
        if options_done || !arg.starts_with('-') || arg == "-" {
            targets.push(arg);
            continue;
        }
        match arg {
            "--" => options_done = true,
            "-m" | "--mode" => {
                args.next();
            }
            "-p" | "--parents" | "-v" | "--verbose" => {}
            _ if arg.starts_with("--mode=") => {}
            // Bundled short flags, where `m` takes the rest of the token or the next one.
            _ if !arg.starts_with("--") => {
                let flags = &arg[1..];
                if let Some(index) = flags.find('m') {
                    if index + 1 == flags.len() {
                        args.next();
                    }
                } else if flags.chars().any(|flag| !matches!(flag, 'p' | 'v')) {
                    warn!(option = %arg, "ignoring unsupported mkdir option");
                }
            }
            _ => warn!(option = %arg, "ignoring unsupported mkdir option"),
        }
    }
    targets
}

fn make_dir(layout: &RootLayout, target: &str) -> SimResult<ScriptStep> {
    let Some(path) = layout.resolve_script_path(target) else {
        warn!(path = %target, "refusing to create directory outside the virtual root");
        return Ok(ScriptStep::Skipped(format!("mkdir {target}")));
    };
    fs::create_dir_all(&path)
        .io_context(|| format!("failed to create script directory: {}", path.display()))?;
    debug!(path = %path.display(), "created script directory");
    Ok(ScriptStep::CreatedDir(path))
}
