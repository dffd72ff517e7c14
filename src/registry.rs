//! Rule registry: which rules exist and which are switched on.
//!
//! A registry is built and configured through `&mut self`, then handed to the
//! engine as `&RuleRegistry`. Nothing mutates it during a check.

use thiserror::Error;

use crate::{
    config::RulesConfig,
    rules::{AnyRule, Rule, builtin_rules},
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("rule `{0}` is already registered")]
    DuplicateRuleId(String),
    #[error("unknown rule `{0}`")]
    UnknownRuleId(String),
    #[error("invalid params for rule `{rule_id}`: {message}")]
    InvalidParams { rule_id: String, message: String },
}

#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub rule: AnyRule,
    pub enabled: bool,
}

/// Ordered map of rule id to rule and enabled flag.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    entries: Vec<RegistryEntry>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every built-in rule with default settings, all enabled.
    pub fn with_defaults() -> Result<Self, RegistryError> {
        Self::from_config(&RulesConfig::new())
    }

    /// Built-in rules with severity, params and enabled flags from `configs`.
    pub fn from_config(configs: &RulesConfig) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for rule in builtin_rules(configs)? {
            registry.register(rule)?;
        }
        for (id, config) in configs {
            registry.set_enabled(id, config.enabled)?;
        }
        Ok(registry)
    }

    /// Add a rule, enabled. Ids must be unique.
    pub fn register(&mut self, rule: impl Into<AnyRule>) -> Result<(), RegistryError> {
        let rule = rule.into();
        if self.get(rule.id()).is_some() {
            return Err(RegistryError::DuplicateRuleId(rule.id().to_string()));
        }
        self.entries.push(RegistryEntry {
            rule,
            enabled: true,
        });
        Ok(())
    }

    pub fn set_enabled(&mut self, rule_id: &str, enabled: bool) -> Result<(), RegistryError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.rule.id() == rule_id)
            .ok_or_else(|| RegistryError::UnknownRuleId(rule_id.to_string()))?;
        entry.enabled = enabled;
        Ok(())
    }

    pub fn get(&self, rule_id: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.rule.id() == rule_id)
    }

    /// Enabled rules in registration order.
    pub fn active_rules(&self) -> Vec<&AnyRule> {
        self.entries
            .iter()
            .filter(|e| e.enabled)
            .map(|e| &e.rule)
            .collect()
    }

    /// All entries, enabled or not, in registration order.
    pub fn rules(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
