//! Inline suppression directives.
//!
//! Supports comments that switch rules off for part of a file:
//! - `stylecheck-disable-next-line` - disable all rules for the next line
//! - `stylecheck-disable-next-line line-length` - disable only `line-length`
//! - `stylecheck-disable-next-line line-length magic-number` - disable both
//! - `stylecheck-disable` / `stylecheck-enable` - range-based disabling
//!
//! Directives work in line and block comments alike.

use std::collections::{HashMap, HashSet};

use crate::source::SourceUnit;

const DISABLE_NEXT_LINE: &str = "stylecheck-disable-next-line";
const DISABLE: &str = "stylecheck-disable";
const ENABLE: &str = "stylecheck-enable";

/// Rules a directive applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSelector {
    All,
    Only(HashSet<String>),
}

impl RuleSelector {
    /// Rule ids following a directive keyword. `None` when the keyword is
    /// only the start of a longer word, as in `stylecheck-disabled`.
    fn after_prefix(rest: &str) -> Option<Self> {
        if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let ids: HashSet<String> = rest.split_whitespace().map(str::to_string).collect();
        if ids.is_empty() {
            Some(Self::All)
        } else {
            Some(Self::Only(ids))
        }
    }
}

/// Parsed directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Disable(RuleSelector),
    Enable(RuleSelector),
    DisableNextLine(RuleSelector),
}

impl Directive {
    /// Parse directive from comment text, delimiters included.
    /// Each line of a block comment is tried, so ` * ` continuation lines
    /// work. Returns None if not a directive.
    pub fn parse(comment: &str) -> Option<Self> {
        body_lines(comment).find_map(Self::parse_line)
    }

    fn parse_line(text: &str) -> Option<Self> {
        // Longer prefix first
        if let Some(rest) = text.strip_prefix(DISABLE_NEXT_LINE) {
            return RuleSelector::after_prefix(rest).map(Self::DisableNextLine);
        }
        if let Some(rest) = text.strip_prefix(DISABLE) {
            return RuleSelector::after_prefix(rest).map(Self::Disable);
        }
        if let Some(rest) = text.strip_prefix(ENABLE) {
            return RuleSelector::after_prefix(rest).map(Self::Enable);
        }

        None
    }
}

/// Comment body lines with delimiters and leading `*` removed.
fn body_lines(comment: &str) -> impl Iterator<Item = &str> {
    let text = comment.trim();
    let body = if let Some(line) = text.strip_prefix("//") {
        line
    } else {
        let text = text.strip_prefix("/*").unwrap_or(text);
        text.strip_suffix("*/").unwrap_or(text)
    };
    body.lines()
        .map(|line| line.trim().trim_start_matches('*').trim())
}

/// Lines `[start, end]` inclusive; `end` is `usize::MAX` when open-ended.
#[derive(Debug, Clone, Copy)]
struct DisabledRange {
    start: usize,
    end: usize,
}

impl DisabledRange {
    fn contains(&self, line: usize) -> bool {
        line >= self.start && line <= self.end
    }
}

/// Disabled lines and ranges for a single file.
///
/// Rule-specific entries live under their rule id; entries for every rule
/// live under `None`.
#[derive(Debug, Default)]
pub struct DisableContext {
    disabled_lines: HashMap<Option<String>, HashSet<usize>>,
    disabled_ranges: HashMap<Option<String>, Vec<DisabledRange>>,
}

impl DisableContext {
    /// Check if findings of `rule_id` on `line` should be suppressed.
    pub fn should_ignore(&self, line: usize, rule_id: &str) -> bool {
        [None, Some(rule_id.to_string())].iter().any(|key| {
            self.disabled_lines
                .get(key)
                .is_some_and(|lines| lines.contains(&line))
                || self
                    .disabled_ranges
                    .get(key)
                    .is_some_and(|ranges| ranges.iter().any(|r| r.contains(line)))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.disabled_lines.is_empty() && self.disabled_ranges.is_empty()
    }

    /// Build the context from the unit's comments, in source order.
    pub fn from_unit(unit: &SourceUnit) -> Self {
        let mut ctx = Self::default();
        let mut open_ranges: HashMap<Option<String>, usize> = HashMap::new();

        for comment in unit.comments() {
            let Some(directive) = Directive::parse(&comment.text) else {
                continue;
            };
            match directive {
                Directive::Disable(selector) => {
                    for key in keys(selector) {
                        // Only start a new range if not already open
                        open_ranges.entry(key).or_insert(comment.line);
                    }
                }
                Directive::Enable(selector) => {
                    let closing = match selector {
                        // Closing "all" closes every open range.
                        RuleSelector::All => open_ranges.keys().cloned().collect(),
                        only => keys(only),
                    };
                    for key in closing {
                        if let Some(start) = open_ranges.remove(&key) {
                            ctx.disabled_ranges.entry(key).or_default().push(DisabledRange {
                                start,
                                end: comment.line.saturating_sub(1),
                            });
                        }
                    }
                }
                Directive::DisableNextLine(selector) => {
                    // For block comments, the line after the comment ends.
                    let next_line = comment.line + comment.text.matches('\n').count() + 1;
                    for key in keys(selector) {
                        ctx.disabled_lines.entry(key).or_default().insert(next_line);
                    }
                }
            }
        }

        // Close any open ranges (extend to end of file)
        for (key, start) in open_ranges {
            ctx.disabled_ranges.entry(key).or_default().push(DisabledRange {
                start,
                end: usize::MAX,
            });
        }

        ctx
    }
}

fn keys(selector: RuleSelector) -> Vec<Option<String>> {
    match selector {
        RuleSelector::All => vec![None],
        RuleSelector::Only(ids) => ids.into_iter().map(Some).collect(),
    }
}
