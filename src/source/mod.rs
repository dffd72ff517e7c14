//! Source loading: turns raw bytes into an immutable [`SourceUnit`].
//!
//! ## Module Structure
//!
//! - `tokenizer`: forgiving lexer producing [`Token`]s with 1-based positions
//! - `outline`: declaration scan classifying fields, methods and parameters

pub mod outline;
pub mod tokenizer;

use std::sync::OnceLock;

use thiserror::Error;

pub use outline::{FieldScope, MethodDecl, Outline, Param, Position, TypeDecl, VarDecl};
pub use tokenizer::{Token, TokenKind};

/// Error raised when source bytes cannot be turned into text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("{path}: input is not valid UTF-8 (first invalid byte at offset {valid_up_to})")]
    MalformedInput { path: String, valid_up_to: usize },
}

/// One file's text and tokens for a single check pass.
#[derive(Debug)]
pub struct SourceUnit {
    path: String,
    lines: Vec<String>,
    tokens: Vec<Token>,
    outline: OnceLock<Outline>,
}

impl SourceUnit {
    /// Decode `bytes` as UTF-8 and tokenize them.
    ///
    /// This only fails on undecodable input; everything else, however odd,
    /// produces a unit.
    pub fn load(path: &str, bytes: &[u8]) -> Result<Self, SourceError> {
        let text = std::str::from_utf8(bytes).map_err(|e| SourceError::MalformedInput {
            path: path.to_string(),
            valid_up_to: e.valid_up_to(),
        })?;
        Ok(Self::from_text(path, text))
    }

    pub fn from_text(path: &str, text: &str) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();

        Self {
            path: path.to_string(),
            lines,
            tokens: tokenizer::tokenize(text),
            outline: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Lines without their terminators. Never empty: empty input has one empty line.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Text of a 1-based line.
    pub fn line(&self, line: usize) -> Option<&str> {
        line.checked_sub(1)
            .and_then(|idx| self.lines.get(idx))
            .map(String::as_str)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Tokens excluding comments.
    pub fn code_tokens(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|t| t.kind != TokenKind::Comment)
    }

    pub fn comments(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|t| t.kind == TokenKind::Comment)
    }

    /// Declarations in this unit, computed on first use.
    pub fn outline(&self) -> &Outline {
        self.outline.get_or_init(|| Outline::scan(self))
    }

    /// Whether `(line, column)` addresses a character of this unit, or the
    /// position just past the end of its line.
    pub fn is_valid_position(&self, line: usize, column: usize) -> bool {
        match self.line(line) {
            Some(text) => column >= 1 && column <= text.chars().count() + 1,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_load_splits_lines() {
        let unit = SourceUnit::load("A.java", b"int x=1;\r\nint MAX=100;").unwrap();
        assert_eq!(unit.lines(), &["int x=1;", "int MAX=100;"]);
        assert_eq!(unit.line(2), Some("int MAX=100;"));
        assert_eq!(unit.line(0), None);
        assert_eq!(unit.line(3), None);
    }

    #[test]
    fn test_load_rejects_invalid_utf8() {
        let err = SourceUnit::load("Bad.java", &[b'a', 0xff, b'b']).unwrap_err();
        assert_eq!(
            err,
            SourceError::MalformedInput {
                path: "Bad.java".to_string(),
                valid_up_to: 1
            }
        );
        assert!(err.to_string().contains("Bad.java"));
    }

    #[test]
    fn test_empty_input_has_one_line() {
        let unit = SourceUnit::from_text("Empty.java", "");
        assert_eq!(unit.lines().len(), 1);
        assert!(unit.tokens().is_empty());
        assert!(unit.is_valid_position(1, 1));
        assert!(!unit.is_valid_position(1, 2));
    }

    #[test]
    fn test_bom_is_stripped() {
        let unit = SourceUnit::load("Bom.java", "\u{feff}class A {}".as_bytes()).unwrap();
        assert_eq!(unit.line(1), Some("class A {}"));
        assert_eq!(unit.tokens()[0].column, 1);
    }

    #[test]
    fn test_valid_positions() {
        let unit = SourceUnit::from_text("A.java", "abc\n");
        assert!(unit.is_valid_position(1, 1));
        assert!(unit.is_valid_position(1, 4));
        assert!(!unit.is_valid_position(1, 5));
        assert!(unit.is_valid_position(2, 1));
        assert!(!unit.is_valid_position(3, 1));
        assert!(!unit.is_valid_position(1, 0));
    }

    #[test]
    fn test_code_tokens_skip_comments() {
        let unit = SourceUnit::from_text("A.java", "a // note\nb");
        let code: Vec<_> = unit.code_tokens().map(|t| t.text.as_str()).collect();
        assert_eq!(code, vec!["a", "b"]);
        assert_eq!(unit.comments().count(), 1);
    }
}
