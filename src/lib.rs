//! # lockstep
//!
//! Grammar-driven parsing that advances every viable alternative in lock
//! step, one token at a time, and keeps all of them until the input
//! decides between them.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project   → Multi-source workspaces, import resolution
//!   ↓
//! syntax    → One-shot parse helpers, ParseOptions, ParseError
//!   ↓
//! parser    → Logos lexer, grammar builder, matcher graph, parallel parser
//!   ↓
//! base      → Primitives (Position, Span, LineIndex, Source)
//! ```
//!
//! ## Example
//!
//! ```
//! use lockstep::base::Source;
//! use lockstep::parser::{GrammarBuilder, Pattern, TokenKind};
//! use lockstep::syntax::{ParseOptions, parse_single};
//!
//! let mut g = GrammarBuilder::<()>::new();
//! g.define(
//!     "main",
//!     Pattern::sequence(vec![
//!         Pattern::token(TokenKind::Word),
//!         Pattern::symbol("="),
//!         Pattern::token(TokenKind::Integer),
//!         Pattern::eof(),
//!     ]),
//! );
//! let grammar = g.build().unwrap();
//!
//! let source = Source::virtual_source("input", "answer = 42");
//! let result = parse_single(&grammar, &source, &ParseOptions::default()).unwrap();
//! assert_eq!(result.as_list().map(|items| items.len()), Some(4));
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → syntax → project)
// ============================================================================

/// Foundation types: Position, Span, LineIndex, Source
pub mod base;

/// Parser: Logos lexer, grammar compilation, breadth-parallel evaluation
pub mod parser;

/// Syntax: one-shot parsing of whole sources
pub mod syntax;

/// Project management: multi-source workspaces
pub mod project;

// Re-export foundation types
pub use base::{LineCol, LineIndex, Position, Source, Span, TextRange, TextSize};

// Re-export the most commonly used parser types
pub use parser::{Capture, Diagnostic, Grammar, GrammarBuilder, Parser, Pattern, Predicate, Token, TokenKind};
pub use syntax::{ParseError, ParseOptions};
