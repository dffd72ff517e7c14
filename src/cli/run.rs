//! Dispatch a parsed command line to its command handler.
//!
//! Handlers return a [`CommandResult`] and leave printing to
//! [`super::report`], so they can be driven from tests without a terminal.

use anyhow::Result;

use super::{
    args::{Arguments, Command},
    commands::{CommandResult, check::check, init::init, rules::rules},
};

pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Check(cmd)) => check(cmd),
        Some(Command::Init) => init(),
        Some(Command::Rules(cmd)) => rules(cmd),
        None => {
            anyhow::bail!("No command provided. Use --help to see available commands.")
        }
    }
}
