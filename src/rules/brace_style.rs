//! Brace placement.
//!
//! Four shapes are reported:
//!
//! 1. an empty statement block (`catch (E e) { }`, `if (x) { }`); only method,
//!    constructor, type and initializer bodies may be empty, and a comment
//!    inside the braces counts as content
//! 2. an empty block whose `{` and `}` sit on different lines (write `{ }`)
//! 3. a multi-line block whose `}` is not the first thing on its line, or is
//!    indented differently from the line holding its `{`
//! 4. a `}` with no matching `{`

use super::{NoParams, Rule, RuleFault, rule_params, rule_severity};
use crate::{
    config::RuleConfig,
    findings::{Finding, Severity},
    registry::RegistryError,
    source::{SourceUnit, Token, TokenKind},
};

pub const RULE_ID: &str = "brace-style";

const TAB_WIDTH: usize = 8;

/// Keywords that open a statement block directly.
const BARE_BLOCK_KEYWORDS: &[&str] = &["else", "try", "finally", "do"];
/// Keywords whose parenthesized header precedes a statement block.
const HEADER_BLOCK_KEYWORDS: &[&str] = &[
    "if",
    "while",
    "for",
    "catch",
    "switch",
    "synchronized",
    "try",
];

#[derive(Debug, Clone)]
pub struct BraceStyleRule {
    severity: Severity,
}

impl BraceStyleRule {
    pub fn new(severity: Severity) -> Self {
        Self { severity }
    }

    pub fn from_config(config: Option<&RuleConfig>) -> Result<Self, RegistryError> {
        let NoParams {} = rule_params(RULE_ID, config)?;
        Ok(Self::new(rule_severity(config, Severity::Warning)))
    }

    fn finding(&self, tok: &Token, message: impl Into<String>) -> Finding {
        Finding::new(RULE_ID, tok.line, tok.column, self.severity, message)
    }
}

/// Visual width of the leading whitespace of `line`.
fn indent_width(line: &str) -> usize {
    let mut width = 0;
    for c in line.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width += TAB_WIDTH - width % TAB_WIDTH,
            _ => break,
        }
    }
    width
}

/// Index of the nearest non-comment token before `idx`.
fn prev_code(tokens: &[Token], idx: usize) -> Option<usize> {
    (0..idx)
        .rev()
        .find(|&i| tokens[i].kind != TokenKind::Comment)
}

/// Whether the `{` at `open_idx` opens a statement block rather than a
/// method, type or initializer body.
fn is_statement_block(tokens: &[Token], open_idx: usize) -> bool {
    let Some(prev) = prev_code(tokens, open_idx) else {
        return false;
    };
    let tok = &tokens[prev];
    match tok.kind {
        TokenKind::Identifier => BARE_BLOCK_KEYWORDS.contains(&tok.text.as_str()),
        TokenKind::CloseParen => {
            let mut depth = 0usize;
            let mut i = prev;
            loop {
                match tokens[i].kind {
                    TokenKind::CloseParen => depth += 1,
                    TokenKind::OpenParen => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    _ => {}
                }
                if i == 0 {
                    return false;
                }
                i -= 1;
            }
            prev_code(tokens, i).is_some_and(|k| {
                tokens[k].kind == TokenKind::Identifier
                    && HEADER_BLOCK_KEYWORDS.contains(&tokens[k].text.as_str())
            })
        }
        _ => false,
    }
}

/// Whether only whitespace precedes 1-based `column` on `line`.
fn starts_line(line: &str, column: usize) -> bool {
    line.chars()
        .take(column.saturating_sub(1))
        .all(char::is_whitespace)
}

impl Rule for BraceStyleRule {
    fn id(&self) -> &str {
        RULE_ID
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn description(&self) -> &str {
        "no empty statement blocks; empty bodies stay on one line; closing braces align with the opener"
    }

    fn evaluate(&self, unit: &SourceUnit) -> Result<Vec<Finding>, RuleFault> {
        let tokens = unit.tokens();
        let mut findings = Vec::new();
        // Indices of open braces.
        let mut open: Vec<usize> = Vec::new();

        for (idx, tok) in tokens.iter().enumerate() {
            match tok.kind {
                TokenKind::OpenBrace => open.push(idx),
                TokenKind::CloseBrace => {
                    let Some(open_idx) = open.pop() else {
                        findings.push(self.finding(tok, "unmatched closing brace"));
                        continue;
                    };
                    let opener = &tokens[open_idx];
                    if open_idx + 1 == idx && is_statement_block(tokens, open_idx) {
                        findings.push(self.finding(
                            opener,
                            "empty statement block; add a statement or a comment",
                        ));
                        continue;
                    }
                    if opener.line == tok.line {
                        continue;
                    }

                    if open_idx + 1 == idx {
                        findings.push(self.finding(
                            opener,
                            "empty block spans several lines; write `{ }` on one line",
                        ));
                        continue;
                    }

                    let (Some(open_line), Some(close_line)) =
                        (unit.line(opener.line), unit.line(tok.line))
                    else {
                        return Err(RuleFault::new(format!(
                            "brace at {}:{} is outside the source",
                            tok.line, tok.column
                        )));
                    };

                    if !starts_line(close_line, tok.column) {
                        findings.push(
                            self.finding(tok, "closing brace should be the first thing on its line"),
                        );
                    } else {
                        let expected = indent_width(open_line);
                        let actual = indent_width(close_line);
                        if expected != actual {
                            findings.push(self.finding(
                                tok,
                                format!(
                                    "closing brace is indented {} columns, its opening line {}",
                                    actual, expected
                                ),
                            ));
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn check(src: &str) -> Vec<(usize, usize, String)> {
        let unit = SourceUnit::from_text("A.java", src);
        BraceStyleRule::new(Severity::Warning)
            .evaluate(&unit)
            .unwrap()
            .into_iter()
            .map(|f| (f.line, f.column, f.message))
            .collect()
    }

    #[test]
    fn test_braces_inside_text_block_are_ignored() {
        let src = "class A\n{\n    private String mJson = \"\"\"\n        }\n        \"\"\";\n    private int bad;\n}";
        assert!(check(src).is_empty());
    }

    #[test]
    fn test_well_formed_blocks() {
        let src = r#"
public class A
{
    public void run()
    {
        if (x) { y(); }
        while (z) {
            w();
        }
    }

    public void noop() { }
}
"#;
        assert!(check(src).is_empty());
    }

    #[test]
    fn test_empty_statement_blocks() {
        let src = r#"class A
{
    void f()
    {
        try { g(); } catch (IOException e) { }
        if (ready) {}
        else { }
        while (busy()) { }
    }
}"#;
        let message = "empty statement block; add a statement or a comment".to_string();
        assert_eq!(
            check(src),
            vec![
                (5, 44, message.clone()),
                (6, 20, message.clone()),
                (7, 14, message.clone()),
                (8, 24, message),
            ]
        );
    }

    #[test]
    fn test_empty_statement_block_across_lines_reported_once() {
        let src = "class A\n{\n    void f()\n    {\n        if (x) {\n        }\n    }\n}";
        assert_eq!(
            check(src),
            vec![(
                5,
                16,
                "empty statement block; add a statement or a comment".to_string()
            )]
        );
    }

    #[test]
    fn test_empty_bodies_allowed() {
        let src = r#"class A
{
    A(int inA) { }
    public void noop() throws Exception { }
    void run() { catch_all(); }
    void g() { if (x) { /* ignored */ } }
    static { }
    class Inner {}
    Runnable mTask = () -> { };
}"#;
        assert!(check(src).is_empty());
    }

    #[test]
    fn test_empty_block_across_lines() {
        let src = "class A\n{\n    void f()\n    {\n    }\n}";
        assert_eq!(
            check(src),
            vec![(
                4,
                5,
                "empty block spans several lines; write `{ }` on one line".to_string()
            )]
        );
    }

    #[test]
    fn test_comment_makes_block_non_empty() {
        let src = "class A\n{\n    void f()\n    {\n        // nothing\n    }\n}";
        assert!(check(src).is_empty());
    }

    #[test]
    fn test_misaligned_closing_brace() {
        let src = "class A\n{\n    void f()\n    {\n        g();\n      }\n}";
        assert_eq!(
            check(src),
            vec![(
                6,
                7,
                "closing brace is indented 6 columns, its opening line 4".to_string()
            )]
        );
    }

    #[test]
    fn test_closing_brace_after_code() {
        let src = "class A\n{\n    void f()\n    {\n        g(); }\n}";
        let findings = check(src);
        assert_eq!(findings.len(), 1);
        assert_eq!((findings[0].0, findings[0].1), (5, 14));
    }

    #[test]
    fn test_tabs_expand_to_eight() {
        let src = "class A\n{\n\tvoid f()\n        {\n\t\tg();\n\t}\n}";
        assert!(check(src).is_empty());
    }

    #[test]
    fn test_unmatched_closing_brace() {
        let findings = check("}\nclass A { }");
        assert_eq!(findings, vec![(1, 1, "unmatched closing brace".to_string())]);
    }

    #[test]
    fn test_braces_in_strings_are_ignored() {
        assert!(check("String s = \"}\";\nchar c = '{';").is_empty());
    }

    #[test]
    fn test_unknown_params_are_rejected() {
        let config: RuleConfig =
            serde_json::from_value(serde_json::json!({ "params": { "style": "knr" } })).unwrap();
        assert!(BraceStyleRule::from_config(Some(&config)).is_err());
    }
}
