//! Lexer for Java-like source text.
//!
//! The tokenizer is deliberately forgiving: it never fails. Unterminated string
//! literals end at the end of their line, unterminated block comments run to the
//! end of the file, and any character it does not recognise becomes a one-char
//! `Punct` token. Rules decide what to make of odd input.

/// Kind of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Identifiers and keywords (`class`, `int`, `mSomeString`).
    Identifier,
    /// Numeric literal (`42`, `0x1F`, `3.14f`).
    Number,
    /// String literal including its quotes.
    String,
    /// Character literal including its quotes.
    Char,
    /// Line or block comment including its delimiters.
    Comment,
    OpenBrace,
    CloseBrace,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    /// Operators and separators (`=`, `;`, `,`, `.`, `@`, `->`).
    Punct,
}

/// A token with its 1-based position in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    /// Column in characters, 1-based.
    pub column: usize,
}

impl Token {
    pub fn is_punct(&self, text: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == text
    }

    pub fn is_ident(&self, text: &str) -> bool {
        self.kind == TokenKind::Identifier && self.text == text
    }

    pub fn position(&self) -> (usize, usize) {
        (self.line, self.column)
    }
}

/// Multi-char operators, longest first.
///
/// `>` never combines with a following `>` so nested generics such as
/// `List<List<String>>` close one level per token.
const OPERATORS: &[&str] = &[
    "<<=", "...", "->", "::", "++", "--", "&&", "||", "==", "!=", "<=", ">=", "+=", "-=", "*=",
    "/=", "%=", "&=", "|=", "^=", "<<",
];

/// Opens and closes a Java text block.
const TEXT_BLOCK_QUOTE: &str = "\"\"\"";

struct Cursor {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Cursor {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn starts_with(&self, s: &str) -> bool {
        s.chars().enumerate().all(|(i, c)| self.peek(i) == Some(c))
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek(0)?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn bump_while(&mut self, text: &mut String, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek(0) {
            if !pred(c) {
                break;
            }
            text.push(c);
            self.bump();
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Split source text into tokens. Whitespace is dropped; comments are kept.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut cursor = Cursor::new(text);
    let mut tokens = Vec::new();

    while let Some(c) = cursor.peek(0) {
        if c.is_whitespace() {
            cursor.bump();
            continue;
        }

        let (line, column) = (cursor.line, cursor.column);
        let mut text = String::new();

        let kind = if cursor.starts_with("//") {
            cursor.bump_while(&mut text, |c| c != '\n');
            TokenKind::Comment
        } else if cursor.starts_with("/*") {
            text.push_str("/*");
            cursor.bump();
            cursor.bump();
            while cursor.peek(0).is_some() && !cursor.starts_with("*/") {
                if let Some(c) = cursor.bump() {
                    text.push(c);
                }
            }
            if cursor.starts_with("*/") {
                text.push_str("*/");
                cursor.bump();
                cursor.bump();
            }
            TokenKind::Comment
        } else if cursor.starts_with(TEXT_BLOCK_QUOTE) {
            lex_text_block(&mut cursor, &mut text);
            TokenKind::String
        } else if c == '"' || c == '\'' {
            lex_quoted(&mut cursor, &mut text, c);
            if c == '"' {
                TokenKind::String
            } else {
                TokenKind::Char
            }
        } else if c.is_ascii_digit()
            || (c == '.' && cursor.peek(1).is_some_and(|n| n.is_ascii_digit()))
        {
            lex_number(&mut cursor, &mut text);
            TokenKind::Number
        } else if is_ident_start(c) {
            cursor.bump_while(&mut text, is_ident_continue);
            TokenKind::Identifier
        } else {
            let kind = match c {
                '{' => TokenKind::OpenBrace,
                '}' => TokenKind::CloseBrace,
                '(' => TokenKind::OpenParen,
                ')' => TokenKind::CloseParen,
                '[' => TokenKind::OpenBracket,
                ']' => TokenKind::CloseBracket,
                _ => TokenKind::Punct,
            };
            match OPERATORS.iter().find(|op| cursor.starts_with(op)) {
                Some(op) if kind == TokenKind::Punct => {
                    for _ in 0..op.chars().count() {
                        cursor.bump();
                    }
                    text.push_str(op);
                }
                _ => {
                    text.push(c);
                    cursor.bump();
                }
            }
            kind
        };

        tokens.push(Token {
            kind,
            text,
            line,
            column,
        });
    }

    tokens
}

fn lex_quoted(cursor: &mut Cursor, text: &mut String, quote: char) {
    if let Some(open) = cursor.bump() {
        text.push(open);
    }
    while let Some(c) = cursor.peek(0) {
        if c == '\n' {
            // Unterminated literal: stop at end of line.
            return;
        }
        text.push(c);
        cursor.bump();
        if c == '\\' {
            if let Some(escaped) = cursor.peek(0).filter(|&e| e != '\n') {
                text.push(escaped);
                cursor.bump();
            }
        } else if c == quote {
            return;
        }
    }
}

/// A text block spans lines up to the closing `"""`, or to end of file.
fn lex_text_block(cursor: &mut Cursor, text: &mut String) {
    for _ in 0..3 {
        cursor.bump();
    }
    text.push_str(TEXT_BLOCK_QUOTE);
    while let Some(c) = cursor.peek(0) {
        if cursor.starts_with(TEXT_BLOCK_QUOTE) {
            for _ in 0..3 {
                cursor.bump();
            }
            text.push_str(TEXT_BLOCK_QUOTE);
            return;
        }
        text.push(c);
        cursor.bump();
        if c == '\\'
            && let Some(escaped) = cursor.bump()
        {
            text.push(escaped);
        }
    }
}

fn lex_number(cursor: &mut Cursor, text: &mut String) {
    let is_hex = cursor.starts_with("0x") || cursor.starts_with("0X");
    while let Some(c) = cursor.peek(0) {
        if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
            text.push(c);
            cursor.bump();
            // Signed exponent: 1e-5, 0x1p+3
            let exponent = if is_hex {
                matches!(c, 'p' | 'P')
            } else {
                matches!(c, 'e' | 'E')
            };
            if exponent && let Some(sign @ ('+' | '-')) = cursor.peek(0) {
                text.push(sign);
                cursor.bump();
            }
        } else {
            break;
        }
    }
}
