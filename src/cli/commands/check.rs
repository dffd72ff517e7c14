use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Result;
use rayon::prelude::*;

use super::{
    CheckSummary, CommandResult, SourceLines,
    helper::{Settings, load_settings},
};
use crate::{
    cli::{
        args::CheckCommand,
        scan::{ScanFilter, ScanResult, resolve_includes, scan_files},
    },
    engine::{self, MALFORMED_INPUT_ID},
    registry::RuleRegistry,
    report::Report,
    source::SourceUnit,
};

pub fn check(cmd: CheckCommand) -> Result<CommandResult> {
    let settings = load_settings(&cmd.common)?;
    let scan = collect_files(&cmd.paths, &settings)?;
    log::debug!(
        "checking {} files with {} active rules",
        scan.files.len(),
        settings.registry.active_rules().len()
    );

    let files: Vec<&String> = scan.files.iter().collect();
    let checked: Vec<(Report, Option<Vec<String>>)> = files
        .par_iter()
        .map(|path| check_file(path, &settings.registry))
        .collect();

    let mut reports = Vec::with_capacity(checked.len());
    let mut sources = SourceLines::new();
    for (report, lines) in checked {
        if let Some(lines) = lines {
            sources.insert(report.path().to_string(), lines);
        }
        reports.push(report);
    }

    let unreadable_count = reports
        .iter()
        .filter(|r| r.findings().iter().any(|f| f.rule_id == MALFORMED_INPUT_ID))
        .count();

    let summary = CheckSummary {
        reports,
        sources,
        format: cmd.format,
        unreadable_count,
        skipped_count: scan.skipped_count,
    };
    Ok(CommandResult::check(summary))
}

/// Files named on the command line, or the configured includes.
fn collect_files(paths: &[PathBuf], settings: &Settings) -> Result<ScanResult> {
    let config = &settings.config;
    let filter = ScanFilter::new(&settings.base_dir, &config.ignores, &config.extensions);

    if paths.is_empty() {
        let roots = resolve_includes(&settings.base_dir, &config.includes);
        return Ok(scan_files(&roots, &filter));
    }

    let mut result = ScanResult::default();
    let mut dirs = Vec::new();
    for path in paths {
        if path.is_file() {
            // Explicit files are checked whatever their extension.
            result.files.insert(path.to_string_lossy().into_owned());
        } else if path.is_dir() {
            dirs.push(path.clone());
        } else {
            anyhow::bail!("Path does not exist: {}", path.display());
        }
    }

    let walked = scan_files(&dirs, &filter);
    result.files.extend(walked.files);
    result.skipped_count += walked.skipped_count;
    Ok(result)
}

/// Check one file. Lines are returned when the report has findings.
fn check_file(path: &str, registry: &RuleRegistry) -> (Report, Option<Vec<String>>) {
    let bytes = match fs::read(Path::new(path)) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("cannot read {}: {}", path, e);
            return (
                engine::input_error_report(path, format!("cannot read file: {}", e)),
                None,
            );
        }
    };

    match SourceUnit::load(path, &bytes) {
        Ok(unit) => {
            let report = engine::check(&unit, registry);
            let lines = (!report.findings().is_empty()).then(|| unit.lines().to_vec());
            (report, lines)
        }
        Err(e) => {
            log::warn!("{}", e);
            (engine::malformed_input_report(&e), None)
        }
    }
}
