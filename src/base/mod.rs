//! Foundation types for lockstep.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`Position`], [`Span`] - Line/column positions for tokens and captures
//! - [`LineCol`], [`LineIndex`] - Byte offset to line/column conversion
//! - [`Source`] - Named source text with caret-annotated excerpts
//!
//! This module has NO dependencies on other lockstep modules.

mod position;
mod source;
mod span;

pub use position::{Position, Span};
pub use source::Source;
pub use span::{LineCol, LineIndex};

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
