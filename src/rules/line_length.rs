use serde::Deserialize;

use super::{Rule, RuleFault, rule_params, rule_severity};
use crate::{
    config::RuleConfig,
    findings::{Finding, Severity},
    registry::RegistryError,
    source::SourceUnit,
};

pub const RULE_ID: &str = "line-length";

const DEFAULT_MAX_CHARS: usize = 132;

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
struct LineLengthParams {
    max_chars: usize,
}

impl Default for LineLengthParams {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

/// Flags lines longer than `maxChars` characters.
///
/// The finding sits on the first character past the limit.
#[derive(Debug, Clone)]
pub struct LineLengthRule {
    max_chars: usize,
    severity: Severity,
}

impl LineLengthRule {
    pub fn new(max_chars: usize, severity: Severity) -> Self {
        Self {
            max_chars,
            severity,
        }
    }

    pub fn from_config(config: Option<&RuleConfig>) -> Result<Self, RegistryError> {
        let params: LineLengthParams = rule_params(RULE_ID, config)?;
        if params.max_chars == 0 {
            return Err(RegistryError::InvalidParams {
                rule_id: RULE_ID.to_string(),
                message: "maxChars must be at least 1".to_string(),
            });
        }
        Ok(Self::new(
            params.max_chars,
            rule_severity(config, Severity::Error),
        ))
    }
}

impl Rule for LineLengthRule {
    fn id(&self) -> &str {
        RULE_ID
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn description(&self) -> &str {
        "lines must not exceed the configured number of characters (default 132)"
    }

    fn evaluate(&self, unit: &SourceUnit) -> Result<Vec<Finding>, RuleFault> {
        Ok(unit
            .lines()
            .iter()
            .enumerate()
            .filter_map(|(idx, line)| {
                let len = line.chars().count();
                (len > self.max_chars).then(|| {
                    Finding::new(
                        RULE_ID,
                        idx + 1,
                        self.max_chars + 1,
                        self.severity,
                        format!(
                            "line is {} characters long, maximum is {}",
                            len, self.max_chars
                        ),
                    )
                })
            })
            .collect())
    }
}
