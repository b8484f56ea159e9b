//! Diagnostic records
//!
//! Provides rich error information including:
//! - Error codes for categorization
//! - Severity levels
//! - Hints/suggestions for fixes
//! - Caret-annotated rendering against the source text

use super::codes::ErrorCode;
use crate::base::{Source, Span};
use std::fmt;

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    /// A hard error that prevents a result
    #[default]
    Error,
    /// A warning that doesn't prevent a result
    Warning,
    /// An informational hint
    Hint,
}

impl Severity {
    /// Check if this is an error
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Hint => "hint",
        }
    }
}

/// A positioned, rendered message ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Human-readable message
    pub message: String,
    /// Source location
    pub span: Span,
    /// Categorized error code
    pub code: ErrorCode,
    pub severity: Severity,
    /// Optional suggestion for fixing the error
    pub hint: Option<String>,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>, span: Span, code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            span,
            code,
            severity: Severity::Error,
            hint: None,
        }
    }

    /// Create a builder for more complex diagnostic construction
    pub fn builder(code: ErrorCode) -> DiagnosticBuilder {
        DiagnosticBuilder::new(code)
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn has_hint(&self) -> bool {
        self.hint.is_some()
    }

    /// Format the diagnostic without source context
    pub fn format(&self) -> String {
        let mut result = format!("{}: {}", self.code, self.message);
        if let Some(hint) = &self.hint {
            result.push_str(&format!("\n  hint: {}", hint));
        }
        result
    }

    /// Format the diagnostic with its location and a caret excerpt of `source`
    ///
    /// ```text
    /// calc.txt:1:8: error[E0203]: Expected Integer, got <EOF>
    /// 1 | 1 + 2 +
    ///            ^
    /// ```
    pub fn render(&self, source: &Source, tab_width: usize) -> String {
        let mut result = format!(
            "{}:{}: {}[{}]: {}\n{}",
            source.name(),
            self.span.start,
            self.severity.as_str(),
            self.code,
            self.message,
            source.excerpt(self.span, tab_width),
        );
        if let Some(hint) = &self.hint {
            result.push_str(&format!("\n  hint: {}", hint));
        }
        result
    }

    /// Merge diagnostics into one, joining the messages with newline-tab.
    ///
    /// The result takes its position and code from the first diagnostic.
    /// Returns `None` for an empty slice.
    pub fn combine(diagnostics: &[Diagnostic]) -> Option<Diagnostic> {
        let (first, rest) = diagnostics.split_first()?;
        if rest.is_empty() {
            return Some(first.clone());
        }
        let messages: Vec<&str> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        Some(Diagnostic {
            message: messages.join("\n\t"),
            ..first.clone()
        })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.span.start, self.message)
    }
}

/// Builder for creating complex diagnostics
pub struct DiagnosticBuilder {
    code: ErrorCode,
    message: Option<String>,
    span: Option<Span>,
    severity: Severity,
    hint: Option<String>,
}

impl DiagnosticBuilder {
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            message: None,
            span: None,
            severity: Severity::Error,
            hint: None,
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Missing message and span fall back to the code's default message
    /// and an empty span at the start of the source.
    pub fn build(self) -> Diagnostic {
        Diagnostic {
            message: self
                .message
                .unwrap_or_else(|| self.code.default_message().to_string()),
            span: self.span.unwrap_or_default(),
            code: self.code,
            severity: self.severity,
            hint: self.hint,
        }
    }
}
