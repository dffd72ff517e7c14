//! Check engine: runs the active rules of a registry over source units.
//!
//! The engine is stateless. Each call reads an immutable [`SourceUnit`] and a
//! frozen [`RuleRegistry`] and returns a fresh [`Report`]. Rules run in
//! parallel; their findings are re-joined in registration order before
//! sorting, so output never depends on scheduling.
//!
//! A rule that returns an error, panics, or reports a position outside the
//! unit is contained: its output is replaced by a single error finding at
//! 1:1 and the remaining rules are unaffected.

use std::{
    any::Any,
    panic::{AssertUnwindSafe, catch_unwind},
    time::Instant,
};

use rayon::prelude::*;

use crate::{
    directives::DisableContext,
    findings::{Finding, Severity},
    registry::RuleRegistry,
    report::Report,
    rules::{AnyRule, Rule},
    source::{SourceError, SourceUnit},
};

/// Rule id of the finding reported for a file that cannot be decoded.
pub const MALFORMED_INPUT_ID: &str = "malformed-input";

/// Findings of one rule, or the synthetic finding replacing them.
enum RuleOutcome {
    Findings(Vec<Finding>),
    Fault(Finding),
}

/// Check one unit against the registry's active rules.
pub fn check(unit: &SourceUnit, registry: &RuleRegistry) -> Report {
    let start = Instant::now();
    let rules = registry.active_rules();

    let outcomes: Vec<RuleOutcome> = rules.par_iter().map(|rule| run_rule(rule, unit)).collect();

    let directives = DisableContext::from_unit(unit);
    let mut findings = Vec::new();
    let mut suppressed = 0;

    for outcome in outcomes {
        match outcome {
            RuleOutcome::Findings(found) => {
                for finding in found {
                    if directives.should_ignore(finding.line, &finding.rule_id) {
                        suppressed += 1;
                    } else {
                        findings.push(finding);
                    }
                }
            }
            // Faults are never suppressed.
            RuleOutcome::Fault(finding) => findings.push(finding),
        }
    }

    log::debug!(
        "{}: {} rules, {} findings, {} suppressed in {:?}",
        unit.path(),
        rules.len(),
        findings.len(),
        suppressed,
        start.elapsed()
    );

    Report::new(unit.path(), findings, suppressed)
}

/// Load `bytes` as a unit and check it.
pub fn check_source(
    path: &str,
    bytes: &[u8],
    registry: &RuleRegistry,
) -> Result<Report, SourceError> {
    let unit = SourceUnit::load(path, bytes)?;
    Ok(check(&unit, registry))
}

/// Check many units in parallel. Reports come back in input order.
pub fn check_many(units: &[SourceUnit], registry: &RuleRegistry) -> Vec<Report> {
    units.par_iter().map(|unit| check(unit, registry)).collect()
}

/// Report for a file whose bytes could not be decoded.
pub fn malformed_input_report(err: &SourceError) -> Report {
    let SourceError::MalformedInput { path, .. } = err;
    input_error_report(path, err.to_string())
}

/// Report carrying a single error finding at 1:1 for input that could not
/// be checked at all.
pub fn input_error_report(path: &str, message: impl Into<String>) -> Report {
    Report::new(
        path,
        vec![Finding::new(
            MALFORMED_INPUT_ID,
            1,
            1,
            Severity::Error,
            message,
        )],
        0,
    )
}

fn run_rule(rule: &AnyRule, unit: &SourceUnit) -> RuleOutcome {
    let result = catch_unwind(AssertUnwindSafe(|| rule.evaluate(unit)));

    let message = match result {
        Ok(Ok(findings)) => match findings
            .iter()
            .find(|f| !unit.is_valid_position(f.line, f.column))
        {
            None => return RuleOutcome::Findings(findings),
            Some(bad) => format!(
                "reported a finding at {}:{}, outside the source",
                bad.line, bad.column
            ),
        },
        Ok(Err(fault)) => fault.to_string(),
        Err(payload) => format!("panicked: {}", panic_message(payload.as_ref())),
    };

    log::warn!("{}: rule `{}` failed: {}", unit.path(), rule.id(), message);
    RuleOutcome::Fault(Finding::new(
        rule.id(),
        1,
        1,
        Severity::Error,
        format!("rule `{}` failed: {}", rule.id(), message),
    ))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
