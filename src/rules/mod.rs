//! Rule implementations for stylecheck.
//!
//! Every convention is one variant of [`AnyRule`], a tagged union dispatched
//! through the [`Rule`] trait with `enum_dispatch`. Rules are pure: they read
//! an immutable [`SourceUnit`] and return findings, holding no state between
//! calls.
//!
//! ## Module Structure
//!
//! - `naming`: identifier naming patterns per scope (constant, class var, ...)
//! - `line_length`: maximum characters per line
//! - `brace_style`: empty-block and closing-brace placement
//! - `parameter_count`: maximum parameters per method
//! - `magic_number`: numeric literals outside an allowed set
//! - `task_tag`: TODO comments must reference a ticket
//! - `return_spacing`: no whitespace between `return` and its expression
//! - `external`: closure-backed rules supplied by library callers

pub mod brace_style;
pub mod external;
pub mod line_length;
pub mod magic_number;
pub mod naming;
pub mod parameter_count;
pub mod return_spacing;
pub mod task_tag;

use enum_dispatch::enum_dispatch;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

pub use brace_style::BraceStyleRule;
pub use external::ExternalRule;
pub use line_length::LineLengthRule;
pub use magic_number::MagicNumberRule;
pub use naming::{NamePattern, NamingPatternRule, NamingScope};
pub use parameter_count::ParameterCountRule;
pub use return_spacing::ReturnSpacingRule;
pub use task_tag::TaskTagRule;

use crate::{
    config::{RuleConfig, RulesConfig},
    findings::{Finding, Severity},
    registry::RegistryError,
    source::SourceUnit,
};

/// Internal failure of a rule. The engine turns it into a single error finding.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct RuleFault {
    pub message: String,
}

impl RuleFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A single style check.
///
/// `evaluate` must be deterministic and side-effect-free: the same unit
/// always yields the same findings in the same order.
#[enum_dispatch]
pub trait Rule {
    /// Stable identifier, unique within a registry.
    fn id(&self) -> &str;

    /// Severity attached to findings from this rule.
    fn severity(&self) -> Severity;

    /// One-line description for `stylecheck rules`.
    fn description(&self) -> &str;

    fn evaluate(&self, unit: &SourceUnit) -> Result<Vec<Finding>, RuleFault>;
}

/// All rule variants.
#[enum_dispatch(Rule)]
#[derive(Debug, Clone)]
pub enum AnyRule {
    NamingPattern(NamingPatternRule),
    LineLength(LineLengthRule),
    BraceStyle(BraceStyleRule),
    ParameterCount(ParameterCountRule),
    MagicNumber(MagicNumberRule),
    TaskTag(TaskTagRule),
    ReturnSpacing(ReturnSpacingRule),
    External(ExternalRule),
}

/// Identifiers of the built-in rules, in registration order.
pub const BUILTIN_RULE_IDS: &[&str] = &[
    naming::CONSTANT_RULE_ID,
    naming::CLASS_VAR_RULE_ID,
    naming::INSTANCE_VAR_RULE_ID,
    naming::PARAMETER_RULE_ID,
    naming::METHOD_RULE_ID,
    naming::TYPE_RULE_ID,
    line_length::RULE_ID,
    brace_style::RULE_ID,
    parameter_count::RULE_ID,
    magic_number::RULE_ID,
    task_tag::RULE_ID,
    return_spacing::RULE_ID,
];

/// Build every built-in rule, applying per-rule severity and params from `configs`.
///
/// Entries in `configs` for ids that are not built in are left to the
/// registry, which reports them as unknown.
pub fn builtin_rules(configs: &RulesConfig) -> Result<Vec<AnyRule>, RegistryError> {
    let mut rules: Vec<AnyRule> = Vec::with_capacity(BUILTIN_RULE_IDS.len());

    for scope in NamingScope::all() {
        rules.push(NamingPatternRule::from_config(scope, configs.get(scope.rule_id()))?.into());
    }
    rules.push(LineLengthRule::from_config(configs.get(line_length::RULE_ID))?.into());
    rules.push(BraceStyleRule::from_config(configs.get(brace_style::RULE_ID))?.into());
    rules.push(ParameterCountRule::from_config(configs.get(parameter_count::RULE_ID))?.into());
    rules.push(MagicNumberRule::from_config(configs.get(magic_number::RULE_ID))?.into());
    rules.push(TaskTagRule::from_config(configs.get(task_tag::RULE_ID))?.into());
    rules.push(ReturnSpacingRule::from_config(configs.get(return_spacing::RULE_ID))?.into());

    Ok(rules)
}

/// Params of rules that take none. Any key given is an error.
#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct NoParams {}

/// Deserialize a rule's `params` object into its typed parameters.
pub(crate) fn rule_params<P: DeserializeOwned>(
    rule_id: &str,
    config: Option<&RuleConfig>,
) -> Result<P, RegistryError> {
    let params = config.map(|c| c.params.clone()).unwrap_or_default();
    serde_json::from_value(Value::Object(params)).map_err(|e| RegistryError::InvalidParams {
        rule_id: rule_id.to_string(),
        message: e.to_string(),
    })
}

pub(crate) fn rule_severity(config: Option<&RuleConfig>, default: Severity) -> Severity {
    config.and_then(|c| c.severity).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn rule_config(value: serde_json::Value) -> RuleConfig {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_builtin_rules_match_ids() {
        let rules = builtin_rules(&RulesConfig::new()).unwrap();
        let ids: Vec<_> = rules.iter().map(|r| r.id().to_string()).collect();
        assert_eq!(ids, BUILTIN_RULE_IDS.to_vec());

        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_builtin_rules_apply_severity_override() {
        let mut configs = RulesConfig::new();
        configs.insert(
            line_length::RULE_ID.to_string(),
            rule_config(json!({ "severity": "info" })),
        );
        let rules = builtin_rules(&configs).unwrap();
        let line_length = rules
            .iter()
            .find(|r| r.id() == line_length::RULE_ID)
            .unwrap();
        assert_eq!(line_length.severity(), Severity::Info);
    }

    #[test]
    fn test_unknown_param_is_rejected() {
        let mut configs = RulesConfig::new();
        configs.insert(
            parameter_count::RULE_ID.to_string(),
            rule_config(json!({ "params": { "maxParameters": 3 } })),
        );
        let err = builtin_rules(&configs).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::InvalidParams { ref rule_id, .. } if rule_id == parameter_count::RULE_ID
        ));
    }

    #[test]
    fn test_every_rule_has_description() {
        for rule in builtin_rules(&RulesConfig::new()).unwrap() {
            assert!(!rule.description().is_empty(), "{} has no description", rule.id());
        }
    }
}
