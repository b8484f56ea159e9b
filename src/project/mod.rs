//! Multi-source orchestration
//!
//! A [`Workspace`] parses a growing set of sources, each exactly once and
//! in the order they were requested. A parse callback can request more
//! sources (imports) while it runs; they are parsed in the same run.

pub mod file_loader;
mod workspace;

pub use file_loader::{LoadError, load_source, resolve_file};
pub use workspace::{ImportContext, Workspace, WorkspaceOptions};
