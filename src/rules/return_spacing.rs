use super::{NoParams, Rule, RuleFault, rule_params, rule_severity};
use crate::{
    config::RuleConfig,
    findings::{Finding, Severity},
    registry::RegistryError,
    source::SourceUnit,
};

pub const RULE_ID: &str = "return-spacing";

const RETURN: &str = "return";

/// `return(value);` rather than `return value;`. A bare `return;` is fine.
#[derive(Debug, Clone)]
pub struct ReturnSpacingRule {
    severity: Severity,
}

impl ReturnSpacingRule {
    pub fn new(severity: Severity) -> Self {
        Self { severity }
    }

    pub fn from_config(config: Option<&RuleConfig>) -> Result<Self, RegistryError> {
        let NoParams {} = rule_params(RULE_ID, config)?;
        Ok(Self::new(rule_severity(config, Severity::Info)))
    }
}

impl Rule for ReturnSpacingRule {
    fn id(&self) -> &str {
        RULE_ID
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn description(&self) -> &str {
        "no whitespace between `return` and its expression: `return(x);`"
    }

    fn evaluate(&self, unit: &SourceUnit) -> Result<Vec<Finding>, RuleFault> {
        let mut findings = Vec::new();
        let mut tokens = unit.code_tokens().peekable();

        while let Some(tok) = tokens.next() {
            if !tok.is_ident(RETURN) {
                continue;
            }
            let Some(next) = tokens.peek() else {
                continue;
            };
            if next.is_punct(";") {
                continue;
            }
            let adjacent = next.line == tok.line && next.column == tok.column + RETURN.len();
            if !adjacent {
                findings.push(Finding::new(
                    RULE_ID,
                    tok.line,
                    tok.column,
                    self.severity,
                    format!("write `return({})` without a space", next.text),
                ));
            }
        }

        Ok(findings)
    }
}
