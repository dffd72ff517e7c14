use serde::Deserialize;

use super::{Rule, RuleFault, rule_params, rule_severity};
use crate::{
    config::RuleConfig,
    findings::{Finding, Severity},
    registry::RegistryError,
    source::{SourceUnit, Token, TokenKind},
};

pub const RULE_ID: &str = "magic-number";

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
struct MagicNumberParams {
    allowed: Vec<f64>,
}

impl Default for MagicNumberParams {
    fn default() -> Self {
        Self {
            allowed: vec![0.0, 1.0, -1.0],
        }
    }
}

/// Flags numeric literals outside the allowed set.
///
/// A `-` directly before a literal, where a binary minus could not appear,
/// is part of its value. Literals inside a constant's initializer are the
/// named constants themselves and are skipped.
#[derive(Debug, Clone)]
pub struct MagicNumberRule {
    allowed: Vec<f64>,
    severity: Severity,
}

impl MagicNumberRule {
    pub fn new(allowed: Vec<f64>, severity: Severity) -> Self {
        Self { allowed, severity }
    }

    pub fn from_config(config: Option<&RuleConfig>) -> Result<Self, RegistryError> {
        let params: MagicNumberParams = rule_params(RULE_ID, config)?;
        Ok(Self::new(
            params.allowed,
            rule_severity(config, Severity::Warning),
        ))
    }

    fn is_allowed(&self, value: f64) -> bool {
        self.allowed.contains(&value)
    }
}

/// Value of a Java numeric literal, or `None` if it is malformed.
fn parse_literal(text: &str) -> Option<f64> {
    let text = text.replace('_', "");
    let lower = text.to_ascii_lowercase();

    if let Some(hex) = lower.strip_prefix("0x") {
        let hex = hex.strip_suffix('l').unwrap_or(hex);
        return u64::from_str_radix(hex, 16).ok().map(|v| v as f64);
    }
    if let Some(bin) = lower.strip_prefix("0b") {
        let bin = bin.strip_suffix('l').unwrap_or(bin);
        return u64::from_str_radix(bin, 2).ok().map(|v| v as f64);
    }

    let body = lower
        .strip_suffix(['l', 'f', 'd'])
        .unwrap_or(&lower);
    let is_octal = body.len() > 1
        && body.starts_with('0')
        && body.chars().all(|c| c.is_ascii_digit())
        && !lower.ends_with(['f', 'd']);
    if is_octal {
        return u64::from_str_radix(&body[1..], 8).ok().map(|v| v as f64);
    }
    body.parse::<f64>().ok()
}

/// Whether a `-` after `prev` is a sign rather than a subtraction.
fn is_unary_position(prev: Option<&Token>) -> bool {
    match prev {
        None => true,
        Some(t) => match t.kind {
            TokenKind::Number
            | TokenKind::String
            | TokenKind::Char
            | TokenKind::CloseParen
            | TokenKind::CloseBracket => false,
            TokenKind::Identifier => matches!(t.text.as_str(), "return" | "case" | "throw"),
            _ => !matches!(t.text.as_str(), "++" | "--"),
        },
    }
}

impl Rule for MagicNumberRule {
    fn id(&self) -> &str {
        RULE_ID
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn description(&self) -> &str {
        "numeric literals other than 0, 1 and -1 belong in named constants"
    }

    fn evaluate(&self, unit: &SourceUnit) -> Result<Vec<Finding>, RuleFault> {
        let tokens: Vec<&Token> = unit.code_tokens().collect();
        let outline = unit.outline();
        let mut findings = Vec::new();

        for (idx, tok) in tokens.iter().enumerate() {
            if tok.kind != TokenKind::Number || outline.in_constant_initializer(tok.position()) {
                continue;
            }

            let sign = idx
                .checked_sub(1)
                .map(|i| tokens[i])
                .filter(|t| t.is_punct("-"))
                .filter(|_| is_unary_position(idx.checked_sub(2).map(|i| tokens[i])));

            let value = parse_literal(&tok.text).map(|v| if sign.is_some() { -v } else { v });
            if value.is_some_and(|v| self.is_allowed(v)) {
                continue;
            }

            let at = sign.unwrap_or(tok);
            let literal = match sign {
                Some(_) => format!("-{}", tok.text),
                None => tok.text.clone(),
            };
            findings.push(Finding::new(
                RULE_ID,
                at.line,
                at.column,
                self.severity,
                format!("magic number {}; declare it as a named constant", literal),
            ));
        }

        Ok(findings)
    }
}
