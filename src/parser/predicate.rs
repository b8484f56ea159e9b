//! Deferred lookahead constraints.
//!
//! A predicate attached to a matcher node is collected when a branch walks
//! through that node and is checked against the next token the branch
//! consumes. Predicates are pure: they only see that token and the span of
//! the token consumed before it.

use super::errors::{ErrorCode, FailureKind};
use super::token::{Token, TokenKind, TokenMatch};
use crate::base::Span;
use smol_str::SmolStr;
use std::fmt;
use std::sync::Arc;

/// What a predicate is tested against
#[derive(Debug, Clone, Copy)]
pub struct PredicateState<'a> {
    /// The token about to be consumed
    pub next: &'a Token,
    /// Span of the previously consumed token (or the start of input)
    pub last: Span,
}

type PredicateFn = Arc<dyn Fn(&PredicateState<'_>) -> bool + Send + Sync>;

#[derive(Clone)]
pub enum Predicate {
    /// The next token starts exactly where the previous one ended
    NoSpace,
    /// The next token starts on the line the previous one ended on
    SameLine,
    /// The next token starts on a later line, or input has ended
    NextLine,
    /// The next token has the given shape; nothing is consumed
    Lookahead(TokenMatch),
    /// A caller-defined test with a fixed failure message
    Custom { message: SmolStr, test: PredicateFn },
}

impl Predicate {
    pub fn lookahead(kind: TokenKind) -> Self {
        Self::Lookahead(TokenMatch::kind(kind))
    }

    pub fn lookahead_exact(kind: TokenKind, value: impl Into<SmolStr>) -> Self {
        Self::Lookahead(TokenMatch::exact(kind, value))
    }

    pub fn custom(
        message: impl Into<SmolStr>,
        test: impl Fn(&PredicateState<'_>) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::Custom {
            message: message.into(),
            test: Arc::new(test),
        }
    }

    pub fn test(&self, state: &PredicateState<'_>) -> bool {
        let next = state.next.span;
        match self {
            Self::NoSpace => next.is_adjacent_to(&state.last),
            Self::SameLine => next.start.line == state.last.end.line,
            Self::NextLine => state.next.is_eof() || next.start.line > state.last.end.line,
            Self::Lookahead(expected) => expected.matches(state.next),
            Self::Custom { test, .. } => test(state),
        }
    }

    /// The failure recorded when [`Predicate::test`] returns false
    pub fn failure(&self, state: &PredicateState<'_>) -> FailureKind {
        let next = state.next;
        match self {
            Self::NoSpace => FailureKind::predicate(format!("Unexpected space before {}", next), ErrorCode::E0301),
            Self::SameLine => {
                FailureKind::predicate(format!("Unexpected newline before {}", next), ErrorCode::E0302)
            }
            Self::NextLine => FailureKind::predicate(format!("Expected newline before {}", next), ErrorCode::E0303),
            Self::Lookahead(expected) => FailureKind::mismatch(expected, next),
            Self::Custom { message, .. } => FailureKind::predicate(message.to_string(), ErrorCode::E0304),
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSpace => f.write_str("NoSpace"),
            Self::SameLine => f.write_str("SameLine"),
            Self::NextLine => f.write_str("NextLine"),
            Self::Lookahead(expected) => f.debug_tuple("Lookahead").field(expected).finish(),
            Self::Custom { message, .. } => f.debug_struct("Custom").field("message", message).finish_non_exhaustive(),
        }
    }
}
