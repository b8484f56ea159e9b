//! Error code definitions for parser diagnostics
//!
//! Error codes follow a naming convention: E{category}{number}
//! - E01xx: Lexical errors (raised by the scanner)
//! - E02xx: Structural mismatches (a token did not fit any live branch)
//! - E03xx: Predicate violations (adjacency, newline, lookahead)
//! - E04xx: Result-set errors (ambiguity, incomplete input)
//! - E05xx: Grammar definition errors
//! - E06xx: Source loading errors

use std::fmt;

/// Error codes for parser diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // E01xx: Lexical errors
    // =========================================================================
    /// Character the scanner has no rule for
    E0101,
    /// Unterminated string literal
    E0102,
    /// Newline inside a string literal
    E0103,
    /// Unterminated block comment
    E0104,
    /// Malformed numeric literal
    E0105,

    // =========================================================================
    // E02xx: Structural mismatches
    // =========================================================================
    /// A single expected token was not found
    E0201,
    /// None of several expected tokens was found
    E0202,
    /// Input ended while tokens were still expected
    E0203,

    // =========================================================================
    // E03xx: Predicate violations
    // =========================================================================
    /// Whitespace where tokens must touch
    E0301,
    /// Newline where tokens must share a line
    E0302,
    /// Missing newline where one is required
    E0303,
    /// Caller-defined predicate failed
    E0304,

    // =========================================================================
    // E04xx: Result-set errors
    // =========================================================================
    /// More than one complete result
    E0401,
    /// Input ended with no result and nothing to report
    E0402,

    // =========================================================================
    // E05xx: Grammar definition errors
    // =========================================================================
    /// Reference to a rule that was never defined
    E0501,
    /// Rule defined twice
    E0502,
    /// Sequence without parts
    E0503,
    /// Alternative without options
    E0504,
    /// Entry rule not found
    E0505,

    // =========================================================================
    // E06xx: Source loading errors
    // =========================================================================
    /// Source not found on any base path
    E0601,
    /// Source could not be read
    E0602,
}

impl ErrorCode {
    /// Get the string representation of the error code (e.g., "E0201")
    pub fn as_str(&self) -> &'static str {
        match self {
            // Lexical
            Self::E0101 => "E0101",
            Self::E0102 => "E0102",
            Self::E0103 => "E0103",
            Self::E0104 => "E0104",
            Self::E0105 => "E0105",
            // Structural
            Self::E0201 => "E0201",
            Self::E0202 => "E0202",
            Self::E0203 => "E0203",
            // Predicate
            Self::E0301 => "E0301",
            Self::E0302 => "E0302",
            Self::E0303 => "E0303",
            Self::E0304 => "E0304",
            // Result set
            Self::E0401 => "E0401",
            Self::E0402 => "E0402",
            // Grammar
            Self::E0501 => "E0501",
            Self::E0502 => "E0502",
            Self::E0503 => "E0503",
            Self::E0504 => "E0504",
            Self::E0505 => "E0505",
            // Loading
            Self::E0601 => "E0601",
            Self::E0602 => "E0602",
        }
    }

    /// Get a short description of the error category
    pub fn category_description(&self) -> &'static str {
        match self {
            Self::E0101 | Self::E0102 | Self::E0103 | Self::E0104 | Self::E0105 => "lexical error",
            Self::E0201 | Self::E0202 | Self::E0203 => "syntax error",
            Self::E0301 | Self::E0302 | Self::E0303 | Self::E0304 => "predicate violation",
            Self::E0401 | Self::E0402 => "result error",
            Self::E0501 | Self::E0502 | Self::E0503 | Self::E0504 | Self::E0505 => "grammar error",
            Self::E0601 | Self::E0602 => "load error",
        }
    }

    /// Get the default message template for this error code
    pub fn default_message(&self) -> &'static str {
        match self {
            // Lexical
            Self::E0101 => "unexpected character",
            Self::E0102 => "unterminated string literal",
            Self::E0103 => "newline in string literal",
            Self::E0104 => "unterminated block comment",
            Self::E0105 => "malformed numeric literal",
            // Structural
            Self::E0201 => "unexpected token",
            Self::E0202 => "expected one of several tokens",
            Self::E0203 => "unexpected end of input",
            // Predicate
            Self::E0301 => "unexpected space",
            Self::E0302 => "unexpected newline",
            Self::E0303 => "expected newline",
            Self::E0304 => "failed predicate",
            // Result set
            Self::E0401 => "ambiguous syntax",
            Self::E0402 => "incomplete input",
            // Grammar
            Self::E0501 => "undefined rule",
            Self::E0502 => "rule redefinition",
            Self::E0503 => "empty sequence",
            Self::E0504 => "empty alternative",
            Self::E0505 => "unknown entry rule",
            // Loading
            Self::E0601 => "source not found",
            Self::E0602 => "source could not be read",
        }
    }

    /// Check if this code comes from a failed predicate
    pub fn is_predicate(&self) -> bool {
        matches!(self, Self::E0301 | Self::E0302 | Self::E0303 | Self::E0304)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
