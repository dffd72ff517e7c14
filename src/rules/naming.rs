//! Identifier naming conventions.
//!
//! One rule instance checks one scope:
//!
//! | scope | default pattern | example |
//! |-------|-----------------|---------|
//! | constant | `UPPER_CASE` | `MAX_SIZE` |
//! | class variable | `s` + UpperCamelCase | `sClassVariable` |
//! | instance variable | `m` + UpperCamelCase | `mSomeString` |
//! | parameter | `in` + UpperCamelCase | `inParameter` |
//! | method | `lowerCamelCase` | `parseMessage` |
//! | type | `UpperCamelCase` | `HtmlParser` |
//!
//! A `static final` field is only a constant when its type is immutable, so the
//! constant rule also flags fields that are *named* like constants without
//! being one.

use regex::Regex;
use serde::Deserialize;

use super::{Rule, RuleFault, rule_params, rule_severity};
use crate::{
    config::RuleConfig,
    findings::{Finding, Severity},
    registry::RegistryError,
    source::{FieldScope, SourceUnit},
};

pub const CONSTANT_RULE_ID: &str = "naming-constant";
pub const CLASS_VAR_RULE_ID: &str = "naming-class-var";
pub const INSTANCE_VAR_RULE_ID: &str = "naming-instance-var";
pub const PARAMETER_RULE_ID: &str = "naming-parameter";
pub const METHOD_RULE_ID: &str = "naming-method";
pub const TYPE_RULE_ID: &str = "naming-type";

/// Which declarations a naming rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamingScope {
    Constant,
    ClassVar,
    InstanceVar,
    Parameter,
    Method,
    Type,
}

impl NamingScope {
    pub fn all() -> [NamingScope; 6] {
        [
            NamingScope::Constant,
            NamingScope::ClassVar,
            NamingScope::InstanceVar,
            NamingScope::Parameter,
            NamingScope::Method,
            NamingScope::Type,
        ]
    }

    pub fn rule_id(self) -> &'static str {
        match self {
            NamingScope::Constant => CONSTANT_RULE_ID,
            NamingScope::ClassVar => CLASS_VAR_RULE_ID,
            NamingScope::InstanceVar => INSTANCE_VAR_RULE_ID,
            NamingScope::Parameter => PARAMETER_RULE_ID,
            NamingScope::Method => METHOD_RULE_ID,
            NamingScope::Type => TYPE_RULE_ID,
        }
    }

    pub fn default_pattern(self) -> &'static str {
        match self {
            NamingScope::Constant => "UPPER_CASE",
            NamingScope::ClassVar => "^s[A-Z][a-zA-Z0-9]*$",
            NamingScope::InstanceVar => "^m[A-Z][a-zA-Z0-9]*$",
            NamingScope::Parameter => "^in[A-Z][a-zA-Z0-9]*$",
            NamingScope::Method => "lowerCamelCase",
            NamingScope::Type => "UpperCamelCase",
        }
    }

    fn default_severity(self) -> Severity {
        match self {
            NamingScope::Constant => Severity::Error,
            _ => Severity::Warning,
        }
    }

    fn noun(self) -> &'static str {
        match self {
            NamingScope::Constant => "constant",
            NamingScope::ClassVar => "class variable",
            NamingScope::InstanceVar => "instance variable",
            NamingScope::Parameter => "parameter",
            NamingScope::Method => "method",
            NamingScope::Type => "type",
        }
    }

    fn description(self) -> &'static str {
        match self {
            NamingScope::Constant => {
                "constants (static final, immutable) use UPPER_CASE; nothing else does"
            }
            NamingScope::ClassVar => "static fields use an `s` prefix: sUpperLowerCase",
            NamingScope::InstanceVar => "instance fields use an `m` prefix: mUpperLowerCase",
            NamingScope::Parameter => "parameters use an `in` prefix: inUpperLowerCase",
            NamingScope::Method => "method names use lowerUpperLowerCase",
            NamingScope::Type => "class and interface names use UpperLowerCase",
        }
    }
}

/// A naming pattern: a named preset or a regular expression.
#[derive(Debug, Clone)]
pub struct NamePattern {
    source: String,
    regex: Regex,
}

impl NamePattern {
    pub fn parse(pattern: &str) -> Result<Self, regex::Error> {
        let expr = match pattern {
            "UPPER_CASE" => "^[A-Z][A-Z0-9]*(_[A-Z0-9]+)*$",
            "lowerCamelCase" => "^[a-z][a-zA-Z0-9]*$",
            "UpperCamelCase" => "^[A-Z][a-zA-Z0-9]*$",
            other => other,
        };
        Ok(Self {
            source: pattern.to_string(),
            regex: Regex::new(expr)?,
        })
    }

    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
struct NamingParams {
    pattern: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NamingPatternRule {
    scope: NamingScope,
    pattern: NamePattern,
    severity: Severity,
}

impl NamingPatternRule {
    pub fn new(scope: NamingScope, pattern: NamePattern, severity: Severity) -> Self {
        Self {
            scope,
            pattern,
            severity,
        }
    }

    pub fn from_config(
        scope: NamingScope,
        config: Option<&RuleConfig>,
    ) -> Result<Self, RegistryError> {
        let params: NamingParams = rule_params(scope.rule_id(), config)?;
        let source = params
            .pattern
            .unwrap_or_else(|| scope.default_pattern().to_string());
        let pattern = NamePattern::parse(&source).map_err(|e| RegistryError::InvalidParams {
            rule_id: scope.rule_id().to_string(),
            message: format!("invalid pattern \"{}\": {}", source, e),
        })?;
        Ok(Self::new(
            scope,
            pattern,
            rule_severity(config, scope.default_severity()),
        ))
    }

    pub fn scope(&self) -> NamingScope {
        self.scope
    }

    fn mismatch(&self, name: &str, line: usize, column: usize) -> Finding {
        Finding::new(
            self.id(),
            line,
            column,
            self.severity,
            format!(
                "{} `{}` does not match {}",
                self.scope.noun(),
                name,
                self.pattern.as_str()
            ),
        )
    }
}

impl Rule for NamingPatternRule {
    fn id(&self) -> &str {
        self.scope.rule_id()
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn description(&self) -> &str {
        self.scope.description()
    }

    fn evaluate(&self, unit: &SourceUnit) -> Result<Vec<Finding>, RuleFault> {
        let outline = unit.outline();
        let mut findings = Vec::new();

        match self.scope {
            NamingScope::Constant => {
                for field in &outline.fields {
                    let matches = self.pattern.matches(&field.name);
                    if field.scope == FieldScope::Constant && !matches {
                        findings.push(self.mismatch(&field.name, field.line, field.column));
                    } else if field.scope != FieldScope::Constant && matches {
                        findings.push(Finding::new(
                            self.id(),
                            field.line,
                            field.column,
                            self.severity,
                            format!(
                                "`{}` is named like a constant but is not static final with an immutable type",
                                field.name
                            ),
                        ));
                    }
                }
            }
            NamingScope::ClassVar | NamingScope::InstanceVar => {
                let wanted = if self.scope == NamingScope::ClassVar {
                    FieldScope::ClassVar
                } else {
                    FieldScope::InstanceVar
                };
                findings.extend(
                    outline
                        .fields
                        .iter()
                        .filter(|f| f.scope == wanted && !self.pattern.matches(&f.name))
                        .map(|f| self.mismatch(&f.name, f.line, f.column)),
                );
            }
            NamingScope::Parameter => {
                findings.extend(
                    outline
                        .methods
                        .iter()
                        .flat_map(|m| &m.params)
                        .filter(|p| !self.pattern.matches(&p.name))
                        .map(|p| self.mismatch(&p.name, p.line, p.column)),
                );
            }
            NamingScope::Method => {
                findings.extend(
                    outline
                        .methods
                        .iter()
                        .filter(|m| !m.is_constructor && !self.pattern.matches(&m.name))
                        .map(|m| self.mismatch(&m.name, m.line, m.column)),
                );
            }
            NamingScope::Type => {
                findings.extend(
                    outline
                        .types
                        .iter()
                        .filter(|t| !self.pattern.matches(&t.name))
                        .map(|t| self.mismatch(&t.name, t.line, t.column)),
                );
            }
        }

        Ok(findings)
    }
}
