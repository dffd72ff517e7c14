//! Terminal output for CLI commands.
//!
//! Findings are printed cargo-style with source context for `--format
//! pretty`. The plain and JSON formats go through [`crate::report`] so the
//! CLI and library emit identical text.

use std::io::{self, Write};

use colored::{ColoredString, Colorize};
use unicode_width::UnicodeWidthStr;

use super::{
    args::OutputFormat,
    commands::{CheckSummary, CommandResult, CommandSummary, InitSummary, RulesSummary},
};
use crate::{
    findings::{Finding, Severity},
    report::{OutputStyle, SeverityCounts, render_many_to},
};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

pub fn print(result: &CommandResult, verbose: bool) {
    let mut stdout = io::stdout().lock();
    match &result.summary {
        CommandSummary::Check(summary) => {
            match summary.format {
                OutputFormat::Pretty => print_check_to(summary, &mut stdout),
                // A closed stdout (piped into `head`) ends output early without an error.
                OutputFormat::Plain => {
                    let _ = render_many_to(&summary.reports, OutputStyle::Plain, &mut stdout);
                }
                OutputFormat::Json => {
                    let _ = render_many_to(&summary.reports, OutputStyle::Structured, &mut stdout);
                }
            }
            let mut stderr = io::stderr().lock();
            print_unreadable_warning_to(summary.unreadable_count, &mut stderr);
            print_skipped_warning_to(summary.skipped_count, verbose, &mut stderr);
        }
        CommandSummary::Init(summary) => print_init_to(summary, &mut stdout),
        CommandSummary::Rules(summary) => print_rules_to(summary, &mut stdout),
    }
}

/// Print every finding followed by the totals line.
pub fn print_check_to<W: Write>(summary: &CheckSummary, writer: &mut W) {
    let max_line_width = summary
        .reports
        .iter()
        .flat_map(|r| r.findings())
        .map(|f| f.line.to_string().len())
        .max()
        .unwrap_or(1);

    for report in &summary.reports {
        let lines = summary.sources.get(report.path());
        for finding in report.findings() {
            print_finding(report.path(), finding, lines, writer, max_line_width);
        }
    }

    print_summary_to(
        &summary.totals(),
        summary.reports.len(),
        summary.suppressed(),
        writer,
    );
}

fn print_finding<W: Write>(
    path: &str,
    finding: &Finding,
    lines: Option<&Vec<String>>,
    writer: &mut W,
    max_line_width: usize,
) {
    let _ = writeln!(
        writer,
        "{}: {}  {}",
        severity_label(finding.severity),
        finding.message,
        finding.rule_id.as_str().dimmed().cyan()
    );

    // Clickable location: --> path:line:col
    let _ = writeln!(
        writer,
        "  {} {}:{}:{}",
        "-->".blue(),
        path,
        finding.line,
        finding.column
    );

    let source_line = lines.and_then(|l| l.get(finding.line - 1));
    if let Some(source_line) = source_line {
        let shown = expand_tabs(source_line);
        let prefix: String = source_line.chars().take(finding.column - 1).collect();
        let caret_padding = UnicodeWidthStr::width(expand_tabs(&prefix).as_str());

        let _ = writeln!(
            writer,
            "{:>width$} {}",
            "",
            "|".blue(),
            width = max_line_width
        );
        let _ = writeln!(
            writer,
            "{:>width$} {} {}",
            finding.line.to_string().blue(),
            "|".blue(),
            shown,
            width = max_line_width
        );
        let _ = writeln!(
            writer,
            "{:>width$} {} {:>padding$}{}",
            "",
            "|".blue(),
            "",
            caret(finding.severity),
            width = max_line_width,
            padding = caret_padding
        );
    }

    let _ = writeln!(writer);
}

pub fn print_summary_to<W: Write>(
    totals: &SeverityCounts,
    file_count: usize,
    suppressed: usize,
    writer: &mut W,
) {
    let total = totals.total();
    if total > 0 {
        let _ = writeln!(
            writer,
            "{} {} {} ({} {}, {} {}, {} {})",
            FAILURE_MARK.red(),
            total,
            plural(total, "problem", "problems"),
            totals.error,
            plural(totals.error, "error", "errors").red(),
            totals.warning,
            plural(totals.warning, "warning", "warnings").yellow(),
            totals.info,
            plural(totals.info, "info", "infos").cyan()
        );
    } else {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "Checked {} {} - no problems found",
                file_count,
                plural(file_count, "file", "files")
            )
            .green()
        );
    }

    if suppressed > 0 {
        let _ = writeln!(
            writer,
            "{} {} {} suppressed by directives",
            "note:".bold(),
            suppressed,
            plural(suppressed, "finding", "findings")
        );
    }
}

/// Print a warning about files reported as `malformed-input`.
pub fn print_unreadable_warning_to<W: Write>(count: usize, writer: &mut W) {
    if count > 0 {
        let _ = writeln!(
            writer,
            "{} {} {} could not be read and {} not checked",
            "warning:".bold().yellow(),
            count,
            plural(count, "file", "files"),
            plural(count, "was", "were")
        );
    }
}

/// Print a warning about paths the scanner could not access.
pub fn print_skipped_warning_to<W: Write>(count: usize, verbose: bool, writer: &mut W) {
    if count > 0 && !verbose {
        let _ = writeln!(
            writer,
            "{} {} path(s) could not be scanned (use {} for details)",
            "warning:".bold().yellow(),
            count,
            "-v".cyan()
        );
    }
}

pub fn print_init_to<W: Write>(summary: &InitSummary, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!("Created {}", summary.path.display()).green()
    );
}

/// One row per rule: id, state, severity and description.
pub fn print_rules_to<W: Write>(summary: &RulesSummary, writer: &mut W) {
    match &summary.config_path {
        Some(path) => {
            let _ = writeln!(writer, "{}", format!("Using {}", path.display()).dimmed());
        }
        None => {
            let _ = writeln!(writer, "{}", "Using default configuration".dimmed());
        }
    }

    let id_width = summary.rules.iter().map(|r| r.id.len()).max().unwrap_or(0);
    for rule in &summary.rules {
        let state = if rule.enabled {
            "on ".green()
        } else {
            "off".dimmed()
        };
        let _ = writeln!(
            writer,
            "{:<id_width$}  {}  {:<7}  {}",
            rule.id,
            state,
            rule.severity.to_string(),
            rule.description,
            id_width = id_width
        );
    }
}

fn severity_label(severity: Severity) -> ColoredString {
    match severity {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
        Severity::Info => "info".bold().cyan(),
    }
}

fn caret(severity: Severity) -> ColoredString {
    match severity {
        Severity::Error => "^".red(),
        Severity::Warning => "^".yellow(),
        Severity::Info => "^".cyan(),
    }
}

fn expand_tabs(s: &str) -> String {
    s.replace('\t', "    ")
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 { one } else { many }
}
