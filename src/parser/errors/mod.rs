//! Parse failures and diagnostics
//!
//! This module turns the failures of dead branches into user-facing
//! diagnostics:
//! - Categorized error codes for filtering and documentation
//! - Rule-path breadcrumbs, simplified so they stay short
//! - Grouping of failures that happened in the same rule context
//! - Rendering with a source excerpt and an optional hint

mod codes;
mod diagnostic;
mod failure;
mod rule_path;

pub use codes::ErrorCode;
pub use diagnostic::{Diagnostic, DiagnosticBuilder, Severity};
pub use failure::{FailureKind, FailureSet};
pub use rule_path::{RulePath, simplify};
