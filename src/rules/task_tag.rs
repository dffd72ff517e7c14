use regex::Regex;
use serde::Deserialize;

use super::{Rule, RuleFault, rule_params, rule_severity};
use crate::{
    config::RuleConfig,
    findings::{Finding, Severity},
    registry::RegistryError,
    source::SourceUnit,
};

pub const RULE_ID: &str = "task-tag";

const DEFAULT_TICKET_PATTERN: &str = "^([A-Z][A-Z0-9]+-[0-9]+|SCN[0-9]+)";

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
struct TaskTagParams {
    ticket_pattern: String,
    tags: Vec<String>,
}

impl Default for TaskTagParams {
    fn default() -> Self {
        Self {
            ticket_pattern: DEFAULT_TICKET_PATTERN.to_string(),
            tags: vec!["TODO".to_string()],
        }
    }
}

/// Task tags in comments must name a ticket: `TODO AGWEB-100 ...`, not `TODO ...`.
#[derive(Debug, Clone)]
pub struct TaskTagRule {
    tags: Vec<String>,
    ticket: Regex,
    severity: Severity,
}

impl TaskTagRule {
    pub fn new(tags: Vec<String>, ticket: Regex, severity: Severity) -> Self {
        Self {
            tags,
            ticket,
            severity,
        }
    }

    pub fn from_config(config: Option<&RuleConfig>) -> Result<Self, RegistryError> {
        let params: TaskTagParams = rule_params(RULE_ID, config)?;
        let ticket =
            Regex::new(&params.ticket_pattern).map_err(|e| RegistryError::InvalidParams {
                rule_id: RULE_ID.to_string(),
                message: format!("invalid ticketPattern \"{}\": {}", params.ticket_pattern, e),
            })?;
        Ok(Self::new(
            params.tags,
            ticket,
            rule_severity(config, Severity::Warning),
        ))
    }

    /// Char offsets of whole-word occurrences of `tag` in `text`.
    fn tag_offsets<'a>(text: &'a str, tag: &'a str) -> impl Iterator<Item = usize> + 'a {
        text.match_indices(tag).filter_map(move |(byte, _)| {
            let before = text[..byte].chars().next_back();
            let after = text[byte + tag.len()..].chars().next();
            let is_word = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');
            (!is_word(before) && !is_word(after)).then(|| text[..byte].chars().count())
        })
    }
}

/// Position of the char at `offset` inside a token that starts at `start`.
fn position_in(text: &str, start: (usize, usize), offset: usize) -> (usize, usize) {
    let (mut line, mut column) = start;
    for c in text.chars().take(offset) {
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

impl Rule for TaskTagRule {
    fn id(&self) -> &str {
        RULE_ID
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn description(&self) -> &str {
        "TODO comments reference a ticket, e.g. `TODO AGWEB-100 ...`"
    }

    fn evaluate(&self, unit: &SourceUnit) -> Result<Vec<Finding>, RuleFault> {
        let mut findings = Vec::new();

        for comment in unit.comments() {
            for tag in &self.tags {
                for offset in Self::tag_offsets(&comment.text, tag) {
                    let rest: String = comment
                        .text
                        .chars()
                        .skip(offset + tag.chars().count())
                        .collect();
                    let rest = rest.trim_start_matches(|c: char| c == ':' || c.is_whitespace());
                    if self.ticket.is_match(rest) {
                        continue;
                    }
                    let (line, column) = position_in(&comment.text, comment.position(), offset);
                    findings.push(Finding::new(
                        RULE_ID,
                        line,
                        column,
                        self.severity,
                        format!("{} without a ticket reference", tag),
                    ));
                }
            }
        }

        Ok(findings)
    }
}
