//! Grammar-driven, breadth-parallel parser
//!
//! Grammars are written as [`Pattern`]s, compiled once into a
//! [`MatcherGraph`], and then evaluated over a token stream by a [`Parser`]
//! that keeps every viable alternative alive at once:
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens with TokenKind
//!     ↓
//! Parser → active branches, advanced in lock-step per token
//!     ↓
//! CaptureChain → per-branch captures, shared until a branch diverges
//!     ↓
//! Reducers → one Capture per completed sequence
//!     ↓
//! Results (all of them, if the grammar is ambiguous) or Diagnostics
//! ```
//!
//! ## Failures
//!
//! Nothing is reported while at least one branch survives. When the last
//! branch dies, the failures of that round are simplified and grouped into
//! the smallest useful set of [`Diagnostic`]s.

#[allow(clippy::module_inception)]
mod parser;

mod capture;
mod chain;
pub mod errors;
mod grammar;
mod lexer;
mod matcher;
mod predicate;
mod token;

pub use capture::{Capture, Reducer};
pub use chain::{CaptureChain, Completed};
pub use errors::{Diagnostic, DiagnosticBuilder, ErrorCode, FailureKind, FailureSet, RulePath, Severity};
pub use grammar::{Grammar, GrammarBuilder, GrammarError, MAIN_RULE, Pattern};
pub use lexer::{LexError, LexErrorKind, Lexer, TokenSource, TokenStream, tokenize};
pub use matcher::{MatcherGraph, MatcherId, MatcherKind, MatcherNode, RuleId};
pub use parser::{BranchId, Parser};
pub use predicate::{Predicate, PredicateState};
pub use token::{Token, TokenKind, TokenMatch};
