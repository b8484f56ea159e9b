//! Parsing options

use crate::parser::MAIN_RULE;
use smol_str::SmolStr;

/// What to do when a source parses in more than one way
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AmbiguityPolicy {
    /// Return every result
    #[default]
    Allow,
    /// Fail with [`ParseError::Ambiguous`](super::ParseError::Ambiguous)
    Reject,
    /// Keep the first result in branch order
    First,
}

/// Options for [`parse`](super::parse) and friends
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Rule to start from; the grammar's `main` rule when unset
    pub entry: Option<SmolStr>,
    pub ambiguity: AmbiguityPolicy,
    /// Columns per tab when rendering excerpts
    pub tab_width: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            entry: None,
            ambiguity: AmbiguityPolicy::Allow,
            tab_width: 4,
        }
    }
}

impl ParseOptions {
    /// Options starting from `rule`
    pub fn entry(rule: impl Into<SmolStr>) -> Self {
        Self {
            entry: Some(rule.into()),
            ..Self::default()
        }
    }

    pub fn with_ambiguity(mut self, ambiguity: AmbiguityPolicy) -> Self {
        self.ambiguity = ambiguity;
        self
    }

    /// Name of the rule parsing starts from
    pub fn entry_rule(&self) -> &str {
        self.entry.as_deref().unwrap_or(MAIN_RULE)
    }
}
