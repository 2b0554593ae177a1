mod flows;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rootsim_core::SimError;
use serde::Serialize;

use crate::flows::{run_check, run_install, run_list, run_search, run_stats};
use crate::render::{
    format_check_lines, format_install_lines, format_package_lines, format_stats_lines,
    render_status_line, resolve_output_style, OutputStyle,
};

pub(crate) const EXIT_FIXTURE_LOAD: u8 = 10;
pub(crate) const EXIT_INSTALL: u8 = 20;
pub(crate) const EXIT_VALIDATION: u8 = 21;
pub(crate) const EXIT_RESOURCE: u8 = 30;

#[derive(Parser, Debug)]
#[command(name = "rootsim")]
#[command(about = "Simulate package installs inside a disposable virtual root", long_about = None)]
struct Cli {
    /// Only log warnings and errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    /// Log every artifact written.
    #[arg(long, global = true)]
    verbose: bool,
    /// Print JSON documents instead of status lines.
    #[arg(short, long, global = true)]
    json: bool,
    #[arg(long, global = true, env = "ROOTSIM_FIXTURES", default_value = "fixtures")]
    fixtures: PathBuf,
    /// Directory the temporary virtual root is created in.
    #[arg(long, global = true)]
    temp_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Install packages into a fresh virtual root, validate them, then tear the root down.
    Install {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// List every package in the catalog.
    List,
    /// Report catalog consistency findings.
    Check {
        #[arg(long)]
        platform: Option<String>,
    },
    /// Show package counts per index and per installation method.
    Stats,
    /// Search package names and descriptions.
    Search {
        query: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run_cli(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}

fn init_tracing(cli: &Cli) {
    let level = if cli.quiet {
        tracing::Level::WARN
    } else if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_cli(cli: Cli) -> Result<ExitCode> {
    let style = if cli.json {
        OutputStyle::Plain
    } else {
        resolve_output_style(std::io::stdout().is_terminal())
    };

    match cli.command {
        Commands::Install { names } => {
            let report = run_install(&cli.fixtures, cli.temp_dir.as_deref(), &names)?;
            if cli.json {
                print_json(&report)?;
            } else {
                print_lines(&format_install_lines(&report, style));
            }
        }
        Commands::List => {
            let rows = run_list(&cli.fixtures)?;
            if cli.json {
                print_json(&rows)?;
            } else {
                print_lines(&format_package_lines(&rows));
            }
        }
        Commands::Check { platform } => {
            let report = run_check(&cli.fixtures, platform.as_deref())?;
            if cli.json {
                print_json(&report)?;
            } else {
                print_lines(&format_check_lines(&report, style));
            }
            if !report.findings.is_empty() {
                return Ok(ExitCode::from(EXIT_VALIDATION));
            }
        }
        Commands::Stats => {
            let stats = run_stats(&cli.fixtures)?;
            if cli.json {
                print_json(&stats)?;
            } else {
                print_lines(&format_stats_lines(&stats));
            }
        }
        Commands::Search { query } => {
            let rows = run_search(&cli.fixtures, &query)?;
            if cli.json {
                print_json(&rows)?;
            } else if rows.is_empty() {
                println!(
                    "{}",
                    render_status_line(style, "warn", &format!("No packages matched: {query}"))
                );
            } else {
                print_lines(&format_package_lines(&rows));
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

/// Maps a failure onto the documented process exit codes by its `SimError` variant.
pub(crate) fn exit_code_for(err: &anyhow::Error) -> u8 {
    let Some(sim) = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<SimError>())
    else {
        return 1;
    };

    match sim {
        SimError::Load { .. } => EXIT_FIXTURE_LOAD,
        SimError::NotFound { .. }
        | SimError::NotLoaded
        | SimError::Unsupported(_)
        | SimError::InvalidPackage(_)
        | SimError::Injected { .. } => EXIT_INSTALL,
        SimError::NotInstalled(_) | SimError::NotExecutable(_) => EXIT_VALIDATION,
        SimError::Io { .. } | SimError::CleanedUp(_) => EXIT_RESOURCE,
    }
}
