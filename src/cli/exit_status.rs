use std::process::ExitCode;

use super::commands::CommandResult;

/// Exit status for CLI commands, following common conventions for linter tools.
///
/// - `Success` (0): no error-severity findings
/// - `Failure` (1): at least one error-severity finding
/// - `Error` (2): internal or configuration error
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// No error-severity findings. Warnings and infos do not fail a run.
    Success,
    /// At least one error-severity finding, unreadable files included.
    Failure,
    /// Command failed (bad config, unknown rule id, I/O error).
    Error,
}

impl ExitStatus {
    /// `Failure` when the command fails on errors and reported any.
    pub fn from_result(result: &CommandResult) -> Self {
        if result.exit_on_errors && result.error_count > 0 {
            ExitStatus::Failure
        } else {
            ExitStatus::Success
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
