//! Declaration outline of a [`SourceUnit`].
//!
//! This is not a Java parser. It walks the code tokens once, tracking a stack of
//! open blocks, and recognises the handful of shapes the naming, parameter and
//! literal rules care about:
//!
//! - type declarations (`class`, `interface`, `enum`, `record`)
//! - fields: declarations whose innermost block is a type body, or that sit at
//!   top level outside any block
//! - methods and constructors with their parameter lists
//!
//! Statements inside method bodies are skipped; locals are not classified.

use std::ops::Range;

use super::{SourceUnit, Token, TokenKind};

/// 1-based `(line, column)` position.
pub type Position = (usize, usize);

const MODIFIERS: &[&str] = &[
    "public",
    "protected",
    "private",
    "static",
    "final",
    "abstract",
    "synchronized",
    "native",
    "transient",
    "volatile",
    "strictfp",
    "default",
    "sealed",
];

/// Identifiers that can never start a type in a declaration.
const NON_TYPE_KEYWORDS: &[&str] = &[
    "return",
    "new",
    "throw",
    "if",
    "else",
    "for",
    "while",
    "do",
    "switch",
    "case",
    "try",
    "catch",
    "finally",
    "break",
    "continue",
    "this",
    "super",
    "import",
    "package",
    "assert",
    "instanceof",
    "true",
    "false",
    "null",
    "class",
    "interface",
    "enum",
    "record",
    "throws",
    "extends",
    "implements",
];

const TYPE_KEYWORDS: &[&str] = &["class", "interface", "enum", "record"];

/// Types whose `static final` fields count as true constants.
const IMMUTABLE_TYPES: &[&str] = &[
    "byte",
    "short",
    "int",
    "long",
    "float",
    "double",
    "boolean",
    "char",
    "String",
    "Byte",
    "Short",
    "Integer",
    "Long",
    "Float",
    "Double",
    "Boolean",
    "Character",
    "BigDecimal",
    "BigInteger",
    "Pattern",
];

/// Naming scope of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldScope {
    /// `static final` with an immutable type.
    Constant,
    /// Any other `static` field.
    ClassVar,
    /// Non-static field.
    InstanceVar,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDecl {
    pub name: String,
    pub line: usize,
    pub column: usize,
    pub type_name: String,
    pub modifiers: Vec<String>,
    pub scope: FieldScope,
    /// Positions covered by the initializer expression, if any.
    pub initializer: Option<Range<Position>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: String,
    pub line: usize,
    pub column: usize,
    pub is_constructor: bool,
    pub params: Vec<Param>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub name: String,
    pub line: usize,
    pub column: usize,
}

/// Declarations found in a unit, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outline {
    pub types: Vec<TypeDecl>,
    pub fields: Vec<VarDecl>,
    pub methods: Vec<MethodDecl>,
}

impl Outline {
    pub fn scan(unit: &SourceUnit) -> Self {
        let tokens: Vec<&Token> = unit.code_tokens().collect();
        let mut scanner = Scanner {
            tokens,
            pos: 0,
            blocks: Vec::new(),
            pending: None,
            outline: Outline::default(),
        };
        scanner.run();
        scanner.outline
    }

    /// Whether `pos` lies inside the initializer of a constant field.
    pub fn in_constant_initializer(&self, pos: Position) -> bool {
        self.fields.iter().any(|f| {
            f.scope == FieldScope::Constant
                && f.initializer.as_ref().is_some_and(|r| r.contains(&pos))
        })
    }
}

#[derive(Debug, Clone)]
enum Block {
    Type { name: String, interface: bool },
    Method,
    Other,
}

struct Scanner<'a> {
    tokens: Vec<&'a Token>,
    pos: usize,
    blocks: Vec<Block>,
    /// Kind of the block the next `{` opens.
    pending: Option<Block>,
    outline: Outline,
}

impl<'a> Scanner<'a> {
    fn tok(&self, idx: usize) -> Option<&'a Token> {
        self.tokens.get(idx).copied()
    }

    fn is_punct(&self, idx: usize, text: &str) -> bool {
        self.tok(idx).is_some_and(|t| t.is_punct(text))
    }

    fn is_kind(&self, idx: usize, kind: TokenKind) -> bool {
        self.tok(idx).is_some_and(|t| t.kind == kind)
    }

    fn ident(&self, idx: usize) -> Option<&'a Token> {
        self.tok(idx).filter(|t| t.kind == TokenKind::Identifier)
    }

    /// `Some(is_interface)` when declarations here are fields.
    fn field_context(&self) -> Option<bool> {
        match self.blocks.last() {
            None => Some(false),
            Some(Block::Type { interface, .. }) => Some(*interface),
            Some(_) => None,
        }
    }

    fn enclosing_type_name(&self) -> Option<&str> {
        match self.blocks.last() {
            Some(Block::Type { name, .. }) => Some(name.as_str()),
            _ => None,
        }
    }

    fn run(&mut self) {
        while let Some(tok) = self.tok(self.pos) {
            match tok.kind {
                TokenKind::OpenBrace => {
                    let block = self.pending.take().unwrap_or(Block::Other);
                    self.blocks.push(block);
                    self.pos += 1;
                }
                TokenKind::CloseBrace => {
                    self.blocks.pop();
                    self.pending = None;
                    self.pos += 1;
                }
                TokenKind::Punct if tok.text == ";" => self.pos += 1,
                _ => {
                    if !self.type_declaration() {
                        let handled = match self.field_context() {
                            Some(interface) => self.member(interface),
                            None => false,
                        };
                        if !handled {
                            self.skip_statement();
                        }
                    }
                }
            }
        }
    }

    /// Index after any annotations starting at `i`.
    fn skip_annotations(&self, mut i: usize) -> usize {
        while self.is_punct(i, "@")
            && self
                .ident(i + 1)
                .is_some_and(|t| t.text != "interface")
        {
            i += 2;
            while self.is_punct(i, ".") && self.ident(i + 1).is_some() {
                i += 2;
            }
            if self.is_kind(i, TokenKind::OpenParen) {
                i = self.skip_parens(i);
            }
        }
        i
    }

    /// Index after the `)` matching the `(` at `open`, or the end of input.
    fn skip_parens(&self, open: usize) -> usize {
        let mut depth = 0usize;
        let mut i = open;
        while let Some(t) = self.tok(i) {
            match t.kind {
                TokenKind::OpenParen => depth += 1,
                TokenKind::CloseParen => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return i + 1;
                    }
                }
                _ => {}
            }
            i += 1;
        }
        i
    }

    /// Index after the `>` closing the `<` at `open`, if it looks like a type argument list.
    fn skip_angles(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut i = open;
        while let Some(t) = self.tok(i) {
            match t.kind {
                TokenKind::Punct if t.text == "<" => depth += 1,
                TokenKind::Punct if t.text == ">" => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i + 1);
                    }
                }
                TokenKind::Punct if matches!(t.text.as_str(), ";" | "=" | "<<" | "&&" | "||") => {
                    return None;
                }
                TokenKind::OpenBrace | TokenKind::CloseBrace | TokenKind::OpenParen => return None,
                _ => {}
            }
            i += 1;
        }
        None
    }

    /// Index after `modifiers`, collecting them.
    fn collect_modifiers(&self, mut i: usize, modifiers: &mut Vec<String>) -> usize {
        while let Some(t) = self.ident(i) {
            if !MODIFIERS.contains(&t.text.as_str()) {
                break;
            }
            modifiers.push(t.text.clone());
            i += 1;
        }
        i
    }

    /// Index after a type such as `java.util.Map<String, List<Integer>>[]`.
    fn parse_type(&self, mut i: usize) -> Option<usize> {
        let first = self.ident(i)?;
        if NON_TYPE_KEYWORDS.contains(&first.text.as_str()) {
            return None;
        }
        i += 1;
        while self.is_punct(i, ".") && self.ident(i + 1).is_some() {
            i += 2;
        }
        if self.is_punct(i, "<") {
            i = self.skip_angles(i)?;
        }
        while self.is_kind(i, TokenKind::OpenBracket) && self.is_kind(i + 1, TokenKind::CloseBracket)
        {
            i += 2;
        }
        if self.is_punct(i, "...") {
            i += 1;
        }
        Some(i)
    }

    fn text_between(&self, start: usize, end: usize) -> String {
        (start..end)
            .filter_map(|i| self.tok(i))
            .map(|t| t.text.as_str())
            .collect()
    }

    fn type_declaration(&mut self) -> bool {
        let mut modifiers = Vec::new();
        let mut i = self.skip_annotations(self.pos);
        i = self.collect_modifiers(i, &mut modifiers);
        let interface = if self.is_punct(i, "@") && self.ident(i + 1).is_some_and(|t| t.text == "interface") {
            i += 1;
            true
        } else {
            match self.ident(i) {
                Some(t) if TYPE_KEYWORDS.contains(&t.text.as_str()) => t.text == "interface",
                _ => return false,
            }
        };
        let Some(name) = self.ident(i + 1) else {
            return false;
        };

        self.outline.types.push(TypeDecl {
            name: name.text.clone(),
            line: name.line,
            column: name.column,
        });

        // Advance to the body, stepping over type parameters, record components
        // and extends/implements clauses.
        let mut j = i + 2;
        while let Some(t) = self.tok(j) {
            match t.kind {
                TokenKind::OpenBrace => {
                    self.pending = Some(Block::Type {
                        name: name.text.clone(),
                        interface,
                    });
                    break;
                }
                TokenKind::OpenParen => {
                    j = self.skip_parens(j);
                    continue;
                }
                TokenKind::Punct if t.text == ";" => break,
                TokenKind::CloseBrace => break,
                _ => {}
            }
            j += 1;
        }
        self.pos = j;
        true
    }

    fn member(&mut self, interface: bool) -> bool {
        let mut modifiers = Vec::new();
        let mut i = self.skip_annotations(self.pos);
        i = self.collect_modifiers(i, &mut modifiers);

        // Generic method type parameters: <T> void copy(...)
        if self.is_punct(i, "<") {
            match self.skip_angles(i) {
                Some(next) => i = next,
                None => return false,
            }
        }

        let type_start = i;
        let Some(type_end) = self.parse_type(i) else {
            return false;
        };

        // Constructor: the "type" is the enclosing class name, directly followed by `(`.
        if type_end == type_start + 1
            && self.is_kind(type_end, TokenKind::OpenParen)
            && self
                .enclosing_type_name()
                .is_some_and(|n| self.tokens[type_start].text == n)
        {
            return self.method(type_start, true);
        }

        let Some(name) = self.ident(type_end) else {
            return false;
        };

        if self.is_kind(type_end + 1, TokenKind::OpenParen) {
            return self.method(type_end, false);
        }

        let declarator_follows = self.is_punct(type_end + 1, "=")
            || self.is_punct(type_end + 1, ";")
            || self.is_punct(type_end + 1, ",")
            || self.is_kind(type_end + 1, TokenKind::OpenBracket);
        if !declarator_follows {
            return false;
        }

        let type_name = self.text_between(type_start, type_end);
        let scope = classify_field(&modifiers, &type_name, interface);

        let mut i = type_end;
        let mut name = name;
        loop {
            i += 1;
            while self.is_kind(i, TokenKind::OpenBracket) && self.is_kind(i + 1, TokenKind::CloseBracket)
            {
                i += 2;
            }
            let initializer = if self.is_punct(i, "=") {
                let start = i + 1;
                let end = self.skip_initializer(start);
                i = end;
                let start_pos = self.tok(start).map(Token::position);
                let end_pos = self
                    .tok(end)
                    .map(Token::position)
                    .unwrap_or((usize::MAX, usize::MAX));
                start_pos.map(|s| s..end_pos)
            } else {
                None
            };

            self.outline.fields.push(VarDecl {
                name: name.text.clone(),
                line: name.line,
                column: name.column,
                type_name: type_name.clone(),
                modifiers: modifiers.clone(),
                scope,
                initializer,
            });

            match (self.is_punct(i, ","), self.ident(i + 1)) {
                (true, Some(next)) => {
                    name = next;
                    i += 1;
                }
                _ => break,
            }
        }

        self.pos = i;
        true
    }

    /// Index of the `,` or `;` ending an initializer that starts at `start`.
    fn skip_initializer(&self, start: usize) -> usize {
        let mut depth = 0usize;
        let mut i = start;
        while let Some(t) = self.tok(i) {
            match t.kind {
                TokenKind::OpenParen | TokenKind::OpenBracket | TokenKind::OpenBrace => depth += 1,
                TokenKind::CloseParen | TokenKind::CloseBracket | TokenKind::CloseBrace => {
                    if depth == 0 {
                        return i;
                    }
                    depth -= 1;
                }
                TokenKind::Punct if depth == 0 && (t.text == "," || t.text == ";") => return i,
                _ => {}
            }
            i += 1;
        }
        i
    }

    /// Record a method whose name token is at `name_idx` and whose parameter
    /// list opens right after it.
    fn method(&mut self, name_idx: usize, is_constructor: bool) -> bool {
        let open = name_idx + 1;
        let Some(params) = self.parse_params(open) else {
            return false;
        };
        let mut i = self.skip_parens(open);
        while self.is_kind(i, TokenKind::OpenBracket) && self.is_kind(i + 1, TokenKind::CloseBracket) {
            i += 2;
        }
        if self.tok(i).is_some_and(|t| t.is_ident("throws")) {
            i += 1;
            while let Some(next) = self.parse_type(i) {
                i = next;
                if !self.is_punct(i, ",") {
                    break;
                }
                i += 1;
            }
        }

        let has_body = self.is_kind(i, TokenKind::OpenBrace);
        let is_abstract = self.is_punct(i, ";");
        let has_default = self.tok(i).is_some_and(|t| t.is_ident("default"));
        if !(has_body || is_abstract || has_default) {
            return false;
        }

        let name = self.tokens[name_idx];
        self.outline.methods.push(MethodDecl {
            name: name.text.clone(),
            line: name.line,
            column: name.column,
            is_constructor,
            params,
        });

        if has_body {
            self.pending = Some(Block::Method);
            self.pos = i;
        } else {
            self.pos = i + 1;
            if has_default {
                self.skip_statement();
            }
        }
        true
    }

    fn parse_params(&self, open: usize) -> Option<Vec<Param>> {
        let mut params = Vec::new();
        let mut parens = 0usize;
        let mut angles = 0usize;
        let mut last_ident: Option<&Token> = None;
        let mut i = open + 1;

        loop {
            let t = self.tok(i)?;
            match t.kind {
                TokenKind::OpenParen => parens += 1,
                TokenKind::CloseParen if parens == 0 => {
                    params.extend(last_ident.take().map(to_param));
                    return Some(params);
                }
                TokenKind::CloseParen => parens -= 1,
                TokenKind::OpenBrace | TokenKind::CloseBrace => return None,
                TokenKind::Punct if t.text == ";" => return None,
                TokenKind::Punct if t.text == "<" => angles += 1,
                TokenKind::Punct if t.text == ">" => angles = angles.saturating_sub(1),
                TokenKind::Punct if t.text == "," && parens == 0 && angles == 0 => {
                    params.extend(last_ident.take().map(to_param));
                }
                TokenKind::Identifier if parens == 0 => last_ident = Some(t),
                _ => {}
            }
            i += 1;
        }
    }

    /// Advance past a statement we do not classify. Stops before `{` and `}`
    /// so the main loop keeps the block stack balanced.
    fn skip_statement(&mut self) {
        let start = self.pos;
        while let Some(t) = self.tok(self.pos) {
            match t.kind {
                TokenKind::OpenParen => self.pos = self.skip_parens(self.pos),
                TokenKind::OpenBrace | TokenKind::CloseBrace => break,
                TokenKind::Punct if t.text == ";" => {
                    self.pos += 1;
                    break;
                }
                _ => self.pos += 1,
            }
        }
        if self.pos == start {
            // Never stall on a token we cannot consume.
            self.pos += 1;
        }
    }
}

fn to_param(t: &Token) -> Param {
    Param {
        name: t.text.clone(),
        line: t.line,
        column: t.column,
    }
}

fn classify_field(modifiers: &[String], type_name: &str, interface: bool) -> FieldScope {
    let has = |m: &str| modifiers.iter().any(|x| x == m);
    let is_static = interface || has("static");
    let is_final = interface || has("final");

    let base = type_name
        .split('<')
        .next()
        .unwrap_or(type_name)
        .rsplit('.')
        .next()
        .unwrap_or(type_name);
    let immutable = !type_name.contains('[') && IMMUTABLE_TYPES.contains(&base);

    match (is_static, is_final && immutable) {
        (true, true) => FieldScope::Constant,
        (true, false) => FieldScope::ClassVar,
        (false, _) => FieldScope::InstanceVar,
    }
}
