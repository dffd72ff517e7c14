//! Command-line interface: argument parsing, command handlers and terminal
//! output. The library modules never print; everything user-facing lives
//! here.

use anyhow::Result;

pub mod args;
pub mod commands;
mod exit_status;
mod report;
mod run;
pub mod scan;

pub use args::{Arguments, Command};
pub use exit_status::ExitStatus;

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let verbose = args.verbose();

    let Some(args) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };

    let result = run::run(args)?;
    report::print(&result, verbose);

    Ok(ExitStatus::from_result(&result))
}
