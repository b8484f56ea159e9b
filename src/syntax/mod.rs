//! One-shot parsing of whole sources
//!
//! The [`Parser`](crate::parser::Parser) is driven token by token; the
//! helpers here wire a grammar, a scanner and a result policy together for
//! the common case of parsing one complete source.

pub mod options;
pub mod parser;

pub use options::{AmbiguityPolicy, ParseOptions};
pub use parser::{ParseError, parse, parse_single, parse_tokens};

// Re-export Position and Span from base for convenience
pub use crate::base::{Position, Span};
