//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `check`: Check source files against the configured style rules
//! - `init`: Write a default `.stylecheckrc.json`
//! - `rules`: List every rule with its state and severity

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Check(cmd)) => cmd.common.verbose,
            Some(Command::Rules(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Arguments shared by commands that read the configuration.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Config file to use instead of searching for .stylecheckrc.json
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored cargo-style output with source context
    #[default]
    Pretty,
    /// One `path:line:col: severity: message [rule]` line per finding
    Plain,
    /// JSON array of reports
    Json,
}

#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Files or directories to check (default: the configured includes)
    pub paths: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct RulesCommand {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check source files for style violations
    Check(CheckCommand),
    /// Initialize a new .stylecheckrc.json configuration file
    Init,
    /// List available rules with their state, severity and description
    Rules(RulesCommand),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Arguments::command().debug_assert();
    }

    #[test]
    fn test_parse_check_with_options() {
        let args = Arguments::try_parse_from([
            "stylecheck",
            "check",
            "src",
            "Main.java",
            "--format",
            "json",
            "--config",
            "ci.json",
            "-v",
        ])
        .unwrap();
        let Some(Command::Check(cmd)) = &args.command else {
            panic!("expected check command");
        };
        assert_eq!(cmd.paths, vec![PathBuf::from("src"), PathBuf::from("Main.java")]);
        assert_eq!(cmd.format, OutputFormat::Json);
        assert_eq!(cmd.common.config, Some(PathBuf::from("ci.json")));
        assert!(args.verbose());
    }

    #[test]
    fn test_check_defaults_to_pretty() {
        let args = Arguments::try_parse_from(["stylecheck", "check"]).unwrap();
        let Some(Command::Check(cmd)) = args.command else {
            panic!("expected check command");
        };
        assert_eq!(cmd.format, OutputFormat::Pretty);
        assert!(cmd.paths.is_empty());
    }
}
