//! Token types shared by scanners and the matcher graph.

use crate::base::Span;
use smol_str::SmolStr;
use std::fmt;

/// Lexical category of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    Word,
    Keyword,
    String,
    Integer,
    Float,
    /// Never produced by the default scanner
    Boolean,
    Symbol,
    Eof,
    /// Never produced by the default scanner
    Special,
    /// Never produced by the default scanner
    Other,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Word => "Word",
            Self::Keyword => "Keyword",
            Self::String => "String",
            Self::Integer => "Integer",
            Self::Float => "Float",
            Self::Boolean => "Boolean",
            Self::Symbol => "Symbol",
            Self::Eof => "EOF",
            Self::Special => "Special",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub text: SmolStr,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<SmolStr>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    /// The end-of-stream sentinel
    pub fn eof(span: Span) -> Self {
        Self::new(TokenKind::Eof, "", span)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_exactly(&self, kind: TokenKind, text: &str) -> bool {
        self.kind == kind && self.text == text
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_eof() {
            return f.write_str("<EOF>");
        }
        let escaped = self
            .text
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n");
        write!(f, "{} \"{}\"", self.kind, escaped)
    }
}

/// The shape a token must have: a kind and optionally its exact text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenMatch {
    pub kind: TokenKind,
    pub value: Option<SmolStr>,
}

impl TokenMatch {
    pub fn kind(kind: TokenKind) -> Self {
        Self { kind, value: None }
    }

    pub fn exact(kind: TokenKind, value: impl Into<SmolStr>) -> Self {
        Self {
            kind,
            value: Some(value.into()),
        }
    }

    pub fn matches(&self, token: &Token) -> bool {
        match &self.value {
            None => token.is(self.kind),
            Some(value) => token.is_exactly(self.kind, value),
        }
    }
}

impl fmt::Display for TokenMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            None => write!(f, "{}", self.kind),
            Some(value) => write!(f, "{} \"{}\"", self.kind, value),
        }
    }
}
