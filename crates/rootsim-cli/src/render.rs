use anstyle::{AnsiColor, Effects, Style};
use rootsim_catalog::DatabaseStatistics;

use crate::flows::{CheckReport, InstallReport, PackageRow};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum OutputStyle {
    Plain,
    Rich,
}

pub(crate) fn resolve_output_style(stdout_is_tty: bool) -> OutputStyle {
    if stdout_is_tty {
        OutputStyle::Rich
    } else {
        OutputStyle::Plain
    }
}

/// Plain output is the bare message; rich output prefixes a colored badge.
pub(crate) fn render_status_line(style: OutputStyle, status: &str, message: &str) -> String {
    match style {
        OutputStyle::Plain => message.to_string(),
        OutputStyle::Rich => {
            let (badge, badge_style) = status_badge(status);
            format!("{} {message}", colorize(badge_style, badge))
        }
    }
}

pub(crate) fn format_install_lines(report: &InstallReport, style: OutputStyle) -> Vec<String> {
    let mut lines = report
        .installed
        .iter()
        .map(|package| {
            render_status_line(
                style,
                "ok",
                &format!("installed {} ({})", package.name, package.method),
            )
        })
        .collect::<Vec<_>>();
    lines.push(render_status_line(
        style,
        "info",
        &format!(
            "virtual root reported {} installed entries before cleanup",
            report.packages.len()
        ),
    ));
    lines
}

pub(crate) fn format_package_lines(rows: &[PackageRow]) -> Vec<String> {
    rows.iter()
        .map(|row| {
            let mut line = format!("{} {} [{}]", row.name, row.version, row.method);
            if !row.available {
                line.push_str(" (unavailable)");
            }
            if !row.description.is_empty() {
                line.push_str(&format!(" - {}", row.description));
            }
            line
        })
        .collect()
}

pub(crate) fn format_check_lines(report: &CheckReport, style: OutputStyle) -> Vec<String> {
    if report.findings.is_empty() {
        return vec![render_status_line(
            style,
            "ok",
            &format!("catalog is consistent for platform '{}'", report.platform),
        )];
    }
    report
        .findings
        .iter()
        .map(|finding| render_status_line(style, "warn", finding))
        .collect()
}

pub(crate) fn format_stats_lines(stats: &DatabaseStatistics) -> Vec<String> {
    let mut lines = vec![
        format!("packages: {}", stats.packages),
        format!("repositories: {}", stats.repositories),
        format!("remotes: {}", stats.remotes),
        format!("releases: {}", stats.releases),
        format!("bundles: {}", stats.bundles),
        format!("scripts: {}", stats.scripts),
    ];
    for (method, count) in &stats.by_method {
        lines.push(format!("method {method}: {count}"));
    }
    lines
}

fn status_badge(status: &str) -> (&'static str, Style) {
    match status {
        "ok" => ("[OK]", color_style(AnsiColor::BrightGreen)),
        "warn" => ("[WARN]", color_style(AnsiColor::BrightYellow)),
        "err" => ("[ERR]", color_style(AnsiColor::BrightRed)),
        _ => ("[..]", color_style(AnsiColor::BrightBlue)),
    }
}

fn color_style(color: AnsiColor) -> Style {
    Style::new()
        .fg_color(Some(color.into()))
        .effects(Effects::BOLD)
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}
