use serde::Deserialize;

use super::{Rule, RuleFault, rule_params, rule_severity};
use crate::{
    config::RuleConfig,
    findings::{Finding, Severity},
    registry::RegistryError,
    source::SourceUnit,
};

pub const RULE_ID: &str = "parameter-count";

const DEFAULT_MAX_PARAMS: usize = 7;

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
struct ParameterCountParams {
    max_params: usize,
}

impl Default for ParameterCountParams {
    fn default() -> Self {
        Self {
            max_params: DEFAULT_MAX_PARAMS,
        }
    }
}

/// Flags methods and constructors declaring more than `maxParams` parameters.
#[derive(Debug, Clone)]
pub struct ParameterCountRule {
    max_params: usize,
    severity: Severity,
}

impl ParameterCountRule {
    pub fn new(max_params: usize, severity: Severity) -> Self {
        Self {
            max_params,
            severity,
        }
    }

    pub fn from_config(config: Option<&RuleConfig>) -> Result<Self, RegistryError> {
        let params: ParameterCountParams = rule_params(RULE_ID, config)?;
        Ok(Self::new(
            params.max_params,
            rule_severity(config, Severity::Warning),
        ))
    }
}

impl Rule for ParameterCountRule {
    fn id(&self) -> &str {
        RULE_ID
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn description(&self) -> &str {
        "methods take at most the configured number of parameters (default 7)"
    }

    fn evaluate(&self, unit: &SourceUnit) -> Result<Vec<Finding>, RuleFault> {
        Ok(unit
            .outline()
            .methods
            .iter()
            .filter(|m| m.params.len() > self.max_params)
            .map(|m| {
                Finding::new(
                    RULE_ID,
                    m.line,
                    m.column,
                    self.severity,
                    format!(
                        "`{}` has {} parameters, maximum is {}",
                        m.name,
                        m.params.len(),
                        self.max_params
                    ),
                )
            })
            .collect())
    }
}
