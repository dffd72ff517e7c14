//! Per-file reports and their text renderings.
//!
//! Two styles are supported:
//!
//! - `Plain`: one line per finding, `path:line:col: severity: message [ruleId]`
//! - `Structured`: pretty-printed JSON that [`parse_structured`] reads back
//!
//! The colored, cargo-style terminal output lives in the CLI layer.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::findings::{Finding, Severity};

/// Number of findings per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub info: usize,
    pub warning: usize,
    pub error: usize,
}

impl SeverityCounts {
    fn count(findings: &[Finding]) -> Self {
        let mut counts = Self::default();
        for finding in findings {
            match finding.severity {
                Severity::Info => counts.info += 1,
                Severity::Warning => counts.warning += 1,
                Severity::Error => counts.error += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.info + self.warning + self.error
    }
}

impl std::ops::AddAssign for SeverityCounts {
    fn add_assign(&mut self, other: Self) {
        self.info += other.info;
        self.warning += other.warning;
        self.error += other.error;
    }
}

/// Findings for one file, sorted by (line, column, rule id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    path: String,
    findings: Vec<Finding>,
    summary: SeverityCounts,
    /// Findings removed by inline directives.
    suppressed: usize,
}

impl Report {
    pub fn new(path: &str, mut findings: Vec<Finding>, suppressed: usize) -> Self {
        findings.sort();
        Self {
            path: path.to_string(),
            summary: SeverityCounts::count(&findings),
            findings,
            suppressed,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn summary(&self) -> SeverityCounts {
        self.summary
    }

    pub fn suppressed(&self) -> usize {
        self.suppressed
    }

    pub fn has_errors(&self) -> bool {
        self.summary.error > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStyle {
    Plain,
    Structured,
}

#[derive(Debug, Error)]
pub enum ReportParseError {
    #[error("invalid report JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("report summary does not match its findings")]
    SummaryMismatch,
    #[error("report findings are not sorted")]
    Unsorted,
}

/// Render a report as text.
pub fn render(report: &Report, style: OutputStyle) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail, and report types always serialize.
    let _ = render_to(report, style, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Render a report to a writer.
pub fn render_to<W: Write>(report: &Report, style: OutputStyle, writer: &mut W) -> io::Result<()> {
    match style {
        OutputStyle::Plain => write_plain(report, writer),
        OutputStyle::Structured => {
            serde_json::to_writer_pretty(&mut *writer, report)?;
            writeln!(writer)
        }
    }
}

/// Render several reports: concatenated lines, or one JSON array.
pub fn render_many(reports: &[Report], style: OutputStyle) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail, and report types always serialize.
    let _ = render_many_to(reports, style, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

pub fn render_many_to<W: Write>(
    reports: &[Report],
    style: OutputStyle,
    writer: &mut W,
) -> io::Result<()> {
    match style {
        OutputStyle::Plain => reports.iter().try_for_each(|r| write_plain(r, writer)),
        OutputStyle::Structured => {
            serde_json::to_writer_pretty(&mut *writer, reports)?;
            writeln!(writer)
        }
    }
}

/// Read back a report rendered with [`OutputStyle::Structured`].
pub fn parse_structured(text: &str) -> Result<Report, ReportParseError> {
    let report: Report = serde_json::from_str(text)?;
    if report.summary != SeverityCounts::count(&report.findings) {
        return Err(ReportParseError::SummaryMismatch);
    }
    if !report.findings.is_sorted() {
        return Err(ReportParseError::Unsorted);
    }
    Ok(report)
}

fn write_plain<W: Write>(report: &Report, writer: &mut W) -> io::Result<()> {
    for f in &report.findings {
        writeln!(
            writer,
            "{}:{}:{}: {}: {} [{}]",
            report.path, f.line, f.column, f.severity, f.message, f.rule_id
        )?;
    }
    Ok(())
}
