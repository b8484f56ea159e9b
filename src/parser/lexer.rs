//! Logos-based lexer
//!
//! Fast tokenization using the logos crate. The parser never calls the
//! lexer directly: it pulls tokens through the [`TokenSource`] trait, so
//! callers with their own scanner can feed it just as well.

use super::errors::{Diagnostic, ErrorCode};
use super::token::{Token, TokenKind};
use crate::base::{LineIndex, Position, Span, TextRange, TextSize};
use logos::Logos;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use std::collections::VecDeque;
use thiserror::Error;

/// A pull-based producer of tokens.
///
/// After the last real token, `next_token` returns an [`TokenKind::Eof`]
/// token (repeatedly, if asked again). A lexical error stops the stream.
pub trait TokenSource {
    fn next_token(&mut self) -> Result<Token, LexError>;

    /// Position of the very first character of the input
    fn start(&self) -> Position {
        Position::default()
    }
}

/// Lexical error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Error)]
pub enum LexErrorKind {
    #[default]
    #[error("unexpected character")]
    UnexpectedCharacter,
    #[error("expected closing quote to close string")]
    UnterminatedString,
    #[error("unexpected newline in string")]
    NewlineInString,
    #[error("expected closing */ to close comment")]
    UnterminatedComment,
    #[error("expected digit after '.'")]
    MissingFractionDigit,
    #[error("expected digit in exponent")]
    MissingExponentDigit,
}

impl LexErrorKind {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnexpectedCharacter => ErrorCode::E0101,
            Self::UnterminatedString => ErrorCode::E0102,
            Self::NewlineInString => ErrorCode::E0103,
            Self::UnterminatedComment => ErrorCode::E0104,
            Self::MissingFractionDigit | Self::MissingExponentDigit => ErrorCode::E0105,
        }
    }
}

/// A lexical error with its location
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at {}", span.start)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// The error as a diagnostic, for rendering alongside syntax errors
    pub fn to_diagnostic(&self) -> Diagnostic {
        let message = self.kind.to_string();
        Diagnostic::new(message, self.span, self.kind.code())
    }
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    index: LineIndex,
    keywords: Option<&'a FxHashSet<SmolStr>>,
    failed: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            index: LineIndex::new(input),
            keywords: None,
            failed: false,
        }
    }

    /// Words found in `keywords` are produced as [`TokenKind::Keyword`]
    pub fn with_keywords(mut self, keywords: &'a FxHashSet<SmolStr>) -> Self {
        self.keywords = Some(keywords);
        self
    }

    fn current_span(&self) -> Span {
        let range = self.inner.span();
        self.index.span(TextRange::new(
            TextSize::new(range.start as u32),
            TextSize::new(range.end as u32),
        ))
    }

    fn classify(&self, token: LogosToken) -> TokenKind {
        match token {
            LogosToken::Word => {
                let is_keyword = self
                    .keywords
                    .is_some_and(|keywords| keywords.contains(self.inner.slice()));
                if is_keyword {
                    TokenKind::Keyword
                } else {
                    TokenKind::Word
                }
            }
            LogosToken::String => TokenKind::String,
            LogosToken::Integer => TokenKind::Integer,
            LogosToken::Float => TokenKind::Float,
            // Comments and malformed literals never reach here
            LogosToken::BlockComment
            | LogosToken::UnterminatedString
            | LogosToken::MalformedFloat
            | LogosToken::MalformedExponent
            | LogosToken::Symbol => TokenKind::Symbol,
        }
    }
}

impl TokenSource for Lexer<'_> {
    fn next_token(&mut self) -> Result<Token, LexError> {
        loop {
            if self.failed {
                return Ok(Token::eof(Span::empty(self.index.end())));
            }
            match self.inner.next() {
                None => return Ok(Token::eof(Span::empty(self.index.end()))),
                Some(Ok(LogosToken::BlockComment)) => continue,
                Some(Ok(token)) => {
                    let kind = self.classify(token);
                    return Ok(Token::new(kind, self.inner.slice(), self.current_span()));
                }
                Some(Err(kind)) => {
                    self.failed = true;
                    let error = LexError::new(kind, self.current_span());
                    tracing::debug!("[LEXER] {}", error);
                    return Err(error);
                }
            }
        }
    }
}

/// Tokenize an entire string into a Vec, excluding the final EOF token
pub fn tokenize(input: &str, keywords: &FxHashSet<SmolStr>) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(input).with_keywords(keywords);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        if token.is_eof() {
            return Ok(tokens);
        }
        tokens.push(token);
    }
}

/// A token source over tokens that were produced up front
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: VecDeque<Token>,
    end: Span,
}

impl TokenStream {
    pub fn new(tokens: impl IntoIterator<Item = Token>) -> Self {
        let tokens: VecDeque<Token> = tokens.into_iter().collect();
        let end = tokens.back().map_or(Span::default(), |t| Span::empty(t.span.end));
        Self { tokens, end }
    }
}

impl TokenSource for TokenStream {
    fn next_token(&mut self) -> Result<Token, LexError> {
        Ok(self.tokens.pop_front().unwrap_or_else(|| Token::eof(self.end)))
    }
}

impl From<Vec<Token>> for TokenStream {
    fn from(tokens: Vec<Token>) -> Self {
        Self::new(tokens)
    }
}

fn block_comment(lex: &mut logos::Lexer<LogosToken>) -> Result<(), LexErrorKind> {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            Ok(())
        }
        None => {
            lex.bump(lex.remainder().len());
            Err(LexErrorKind::UnterminatedComment)
        }
    }
}

fn unterminated_string(lex: &mut logos::Lexer<LogosToken>) -> Result<(), LexErrorKind> {
    if lex.remainder().starts_with('\n') {
        Err(LexErrorKind::NewlineInString)
    } else {
        Err(LexErrorKind::UnterminatedString)
    }
}

fn malformed_float(_: &mut logos::Lexer<LogosToken>) -> Result<(), LexErrorKind> {
    Err(LexErrorKind::MissingFractionDigit)
}

fn malformed_exponent(_: &mut logos::Lexer<LogosToken>) -> Result<(), LexErrorKind> {
    Err(LexErrorKind::MissingExponentDigit)
}

/// Logos token enum - maps to TokenKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[token("/*", block_comment)]
    BlockComment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r#""([^"\\\n]|\\(.|\n))*""#)]
    #[regex(r#"'([^'\\\n]|\\(.|\n))*'"#)]
    String,

    #[regex(r#""([^"\\\n]|\\(.|\n))*"#, unterminated_string)]
    #[regex(r#"'([^'\\\n]|\\(.|\n))*"#, unterminated_string)]
    UnterminatedString,

    #[regex(r"[0-9]+", priority = 3)]
    Integer,

    #[regex(r"[0-9]+\.[0-9]+(e[+-]?[0-9]+)?")]
    Float,

    #[regex(r"[0-9]+\.", malformed_float)]
    MalformedFloat,

    #[regex(r"[0-9]+\.[0-9]+e[+-]?", malformed_exponent)]
    MalformedExponent,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", priority = 3)]
    Word,

    // =========================================================================
    // EVERYTHING ELSE IS A SINGLE-CHARACTER SYMBOL
    // =========================================================================
    #[regex(r".", priority = 1)]
    Symbol,
}
