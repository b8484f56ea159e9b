//! Syntax-level parsing interface.
//!
//! This module runs a grammar over a complete [`Source`] (or any
//! [`TokenSource`]) and applies the caller's [`AmbiguityPolicy`] to the
//! results.

use super::options::{AmbiguityPolicy, ParseOptions};
use crate::base::{Source, Span};
use crate::parser::{Capture, Diagnostic, ErrorCode, Grammar, LexError, Parser, TokenSource};
use smol_str::SmolStr;
use thiserror::Error;

/// Why a source did not produce an acceptable result
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("lexical error: {0}")]
    Lex(#[from] LexError),
    #[error("no rule named '{name}' in the grammar")]
    UnknownRule { name: SmolStr },
    #[error("{}", summarize(.0))]
    Syntax(Vec<Diagnostic>),
    #[error("input is ambiguous: {count} results")]
    Ambiguous { count: usize },
    #[error("unexpected end of input")]
    Incomplete,
}

fn summarize(diagnostics: &[Diagnostic]) -> String {
    match Diagnostic::combine(diagnostics) {
        Some(combined) => combined.to_string(),
        None => "syntax error".to_string(),
    }
}

impl ParseError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Lex(error) => error.kind.code(),
            Self::UnknownRule { .. } => ErrorCode::E0505,
            Self::Syntax(diagnostics) => diagnostics.first().map_or(ErrorCode::E0201, |d| d.code),
            Self::Ambiguous { .. } => ErrorCode::E0401,
            Self::Incomplete => ErrorCode::E0402,
        }
    }

    /// The error as diagnostics; errors without a location are anchored
    /// at `end`
    pub fn diagnostics(&self, end: Span) -> Vec<Diagnostic> {
        match self {
            Self::Lex(error) => vec![error.to_diagnostic()],
            Self::Syntax(diagnostics) => diagnostics.clone(),
            other => vec![Diagnostic::new(other.to_string(), end, other.code())],
        }
    }

    /// Render every diagnostic of this error against `source`, expanding
    /// tabs to `options.tab_width` columns
    pub fn render(&self, source: &Source, options: &ParseOptions) -> String {
        let end = Span::empty(crate::base::LineIndex::new(source.content()).end());
        self.diagnostics(end)
            .iter()
            .map(|d| d.render(source, options.tab_width))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Parse a whole source with the grammar's scanner.
///
/// # Errors
///
/// Returns an error if:
/// - The entry rule does not exist
/// - The scanner rejects the input
/// - No result matched (with the diagnostics of the failing token)
/// - The results violate `options.ambiguity`
pub fn parse<N: Clone>(
    grammar: &Grammar<N>,
    source: &Source,
    options: &ParseOptions,
) -> Result<Vec<Capture<N>>, ParseError> {
    let mut lexer = grammar.lexer(source.content());
    tracing::debug!("[PARSER] parsing {} from rule '{}'", source.name(), options.entry_rule());
    parse_tokens(grammar, &mut lexer, options)
}

/// Parse tokens from a caller-supplied scanner
pub fn parse_tokens<N: Clone>(
    grammar: &Grammar<N>,
    tokens: &mut impl TokenSource,
    options: &ParseOptions,
) -> Result<Vec<Capture<N>>, ParseError> {
    let name = options.entry_rule();
    let entry = grammar
        .rule(name)
        .ok_or_else(|| ParseError::UnknownRule { name: name.into() })?;

    let mut parser = Parser::new(grammar, entry, tokens.start());
    parser.parse(tokens)?;

    let mut results = match parser.into_result() {
        Ok(results) => results,
        Err(diagnostics) if diagnostics.is_empty() => return Err(ParseError::Incomplete),
        Err(diagnostics) => return Err(ParseError::Syntax(diagnostics)),
    };

    match options.ambiguity {
        AmbiguityPolicy::Allow => {}
        AmbiguityPolicy::Reject if results.len() > 1 => {
            return Err(ParseError::Ambiguous { count: results.len() });
        }
        AmbiguityPolicy::Reject => {}
        AmbiguityPolicy::First => results.truncate(1),
    }
    Ok(results)
}

/// Parse a source that must have exactly one reading
pub fn parse_single<N: Clone>(
    grammar: &Grammar<N>,
    source: &Source,
    options: &ParseOptions,
) -> Result<Capture<N>, ParseError> {
    let options = ParseOptions {
        ambiguity: AmbiguityPolicy::Reject,
        ..options.clone()
    };
    let mut results = parse(grammar, source, &options)?;
    results.pop().ok_or(ParseError::Incomplete)
}
