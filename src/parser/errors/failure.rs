//! Branch failures and their aggregation into diagnostics
//!
//! Every branch that dies records one [`FailureKind`] together with its
//! rule path. When the last branch dies the round's [`FailureSet`] is
//! turned into the minimal set of diagnostics: breadcrumbs are simplified
//! together, failures are grouped by breadcrumb, and each group yields one
//! "expected" message plus one message per failed predicate.

use super::codes::ErrorCode;
use super::diagnostic::Diagnostic;
use super::rule_path::{self, RulePath};
use crate::parser::token::{Token, TokenKind, TokenMatch};
use indexmap::{IndexMap, IndexSet};
use smol_str::SmolStr;

/// Why a branch died
///
/// Equality and hashing cover the reason only, never the breadcrumb, so
/// the same failure reached through different branches is reported once.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The token had the wrong kind
    UnexpectedType {
        expected: TokenKind,
        value: Option<SmolStr>,
    },
    /// The token had the right kind but the wrong text
    UnexpectedValue { expected: SmolStr },
    /// A predicate did not hold for the token
    Predicate { message: String, code: ErrorCode },
}

impl FailureKind {
    /// The failure for `expected` rejecting `got`
    pub fn mismatch(expected: &TokenMatch, got: &Token) -> Self {
        match &expected.value {
            Some(value) if expected.kind == got.kind => Self::UnexpectedValue {
                expected: value.clone(),
            },
            _ => Self::UnexpectedType {
                expected: expected.kind,
                value: expected.value.clone(),
            },
        }
    }

    pub fn predicate(message: impl Into<String>, code: ErrorCode) -> Self {
        Self::Predicate {
            message: message.into(),
            code,
        }
    }

    /// How the expected token is written in a message, if this is a
    /// token mismatch
    pub fn expected(&self) -> Option<String> {
        match self {
            Self::UnexpectedType {
                expected,
                value: None,
            } => Some(expected.to_string()),
            Self::UnexpectedType {
                expected,
                value: Some(value),
            } => Some(format!("{} \"{}\"", expected, value)),
            Self::UnexpectedValue { expected } => Some(format!("'{}'", expected)),
            Self::Predicate { .. } => None,
        }
    }

    /// The message for this failure on its own
    pub fn message(&self) -> String {
        match self {
            Self::Predicate { message, .. } => message.clone(),
            other => format!("Expected {}", other.expected().unwrap_or_default()),
        }
    }
}

/// The failures recorded in one round, first breadcrumb kept per reason
#[derive(Debug, Clone, Default)]
pub struct FailureSet {
    entries: IndexMap<FailureKind, RulePath>,
}

impl FailureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure; a reason already present keeps its first breadcrumb
    pub fn insert(&mut self, kind: FailureKind, path: RulePath) {
        self.entries.entry(kind).or_insert(path);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FailureKind, &RulePath)> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Build the diagnostics for a parse that died on `token`.
    ///
    /// Every diagnostic is anchored to `token`'s span. An empty set yields
    /// no diagnostics; a rule-path suffix is only added when failures fall
    /// into more than one breadcrumb group.
    pub fn into_diagnostics(self, token: &Token) -> Vec<Diagnostic> {
        let (kinds, mut paths): (Vec<FailureKind>, Vec<RulePath>) = self.entries.into_iter().unzip();
        rule_path::simplify(&mut paths);

        let mut groups: IndexMap<RulePath, Vec<FailureKind>> = IndexMap::new();
        for (kind, path) in kinds.into_iter().zip(paths) {
            groups.entry(path).or_default().push(kind);
        }
        let include_path = groups.len() > 1;

        let mut diagnostics = Vec::new();
        for (path, kinds) in groups {
            let suffix = if include_path {
                format!(" (in parse as {})", path)
            } else {
                String::new()
            };

            let expected: IndexSet<String> = kinds.iter().filter_map(FailureKind::expected).collect();
            if !expected.is_empty() {
                let mut iter = expected.iter();
                let message = match (iter.next(), iter.next()) {
                    (Some(only), None) => format!("Expected {}", only),
                    _ => format!(
                        "Expected one of {{{}}}",
                        expected.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
                    ),
                };
                let code = if token.is_eof() {
                    ErrorCode::E0203
                } else if expected.len() == 1 {
                    ErrorCode::E0201
                } else {
                    ErrorCode::E0202
                };
                diagnostics.push(Diagnostic::new(
                    format!("{}, got {}{}", message, token, suffix),
                    token.span,
                    code,
                ));
            }

            for kind in &kinds {
                if let FailureKind::Predicate { message, code } = kind {
                    diagnostics.push(Diagnostic::new(format!("{}{}", message, suffix), token.span, *code));
                }
            }
        }

        tracing::debug!(
            "[FAILURE] {} diagnostic(s) at {}: {}",
            diagnostics.len(),
            token.span.start,
            diagnostics.iter().map(|d| d.message.as_str()).collect::<Vec<_>>().join(" | ")
        );
        diagnostics
    }
}
