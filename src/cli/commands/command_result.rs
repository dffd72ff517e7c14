use std::{collections::HashMap, path::PathBuf};

use crate::{
    cli::args::OutputFormat,
    findings::Severity,
    report::{Report, SeverityCounts},
};

#[derive(Debug)]
pub enum CommandSummary {
    Check(CheckSummary),
    Init(InitSummary),
    Rules(RulesSummary),
}

/// Source lines of files with findings, keyed by path.
pub type SourceLines = HashMap<String, Vec<String>>;

#[derive(Debug)]
pub struct CheckSummary {
    /// One report per checked file, sorted by path.
    pub reports: Vec<Report>,
    /// Lines of files with findings, for source context in pretty output.
    pub sources: SourceLines,
    pub format: OutputFormat,
    /// Number of files that could not be read or decoded.
    pub unreadable_count: usize,
    /// Paths skipped while walking directories.
    pub skipped_count: usize,
}

impl CheckSummary {
    pub fn totals(&self) -> SeverityCounts {
        let mut totals = SeverityCounts::default();
        for report in &self.reports {
            totals += report.summary();
        }
        totals
    }

    pub fn suppressed(&self) -> usize {
        self.reports.iter().map(Report::suppressed).sum()
    }
}

#[derive(Debug)]
pub struct InitSummary {
    pub path: PathBuf,
}

#[derive(Debug)]
pub struct RuleRow {
    pub id: String,
    pub enabled: bool,
    pub severity: Severity,
    pub description: String,
}

#[derive(Debug)]
pub struct RulesSummary {
    pub rules: Vec<RuleRow>,
    /// Config file the settings came from, if any.
    pub config_path: Option<PathBuf>,
}

/// Result of running stylecheck commands
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
    /// Error-severity findings across all reports.
    pub error_count: usize,
    /// If true, exit code 1 should be returned when error_count > 0.
    pub exit_on_errors: bool,
}

impl CommandResult {
    pub fn check(summary: CheckSummary) -> Self {
        let totals = summary.totals();
        Self {
            summary: CommandSummary::Check(summary),
            error_count: totals.error,
            exit_on_errors: true,
        }
    }

    pub fn init(summary: InitSummary) -> Self {
        Self::without_findings(CommandSummary::Init(summary))
    }

    pub fn rules(summary: RulesSummary) -> Self {
        Self::without_findings(CommandSummary::Rules(summary))
    }

    fn without_findings(summary: CommandSummary) -> Self {
        Self {
            summary,
            error_count: 0,
            exit_on_errors: false,
        }
    }
}
