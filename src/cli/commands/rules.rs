use anyhow::Result;

use super::{CommandResult, RuleRow, RulesSummary, helper::load_settings};
use crate::{cli::args::RulesCommand, rules::Rule};

pub fn rules(cmd: RulesCommand) -> Result<CommandResult> {
    let settings = load_settings(&cmd.common)?;

    let rules = settings
        .registry
        .rules()
        .iter()
        .map(|entry| RuleRow {
            id: entry.rule.id().to_string(),
            enabled: entry.enabled,
            severity: entry.rule.severity(),
            description: entry.rule.description().to_string(),
        })
        .collect();

    Ok(CommandResult::rules(RulesSummary {
        rules,
        config_path: settings.config_path,
    }))
}
