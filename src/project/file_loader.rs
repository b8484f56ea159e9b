//! Locating and reading sources on disk

use crate::base::Source;
use crate::parser::ErrorCode;
use crate::syntax::ParseError;
use smol_str::SmolStr;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a source could not be loaded or parsed
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file '{name}' not found\nLooked in:\n\t{}", render_paths(searched))]
    NotFound { name: SmolStr, searched: Vec<PathBuf> },
    #[error("failed to read {}: {error}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },
    #[error("{name}: {error}")]
    Parse {
        name: SmolStr,
        #[source]
        error: ParseError,
    },
}

fn render_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join("\n\t")
}

impl LoadError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::E0601,
            Self::Io { .. } => ErrorCode::E0602,
            Self::Parse { error, .. } => error.code(),
        }
    }
}

/// Find `filename` under the first base path that contains it.
///
/// With no base paths, `filename` is tried as given.
pub fn resolve_file(filename: &str, base_paths: &[PathBuf]) -> Result<PathBuf, LoadError> {
    let candidates: Vec<PathBuf> = if base_paths.is_empty() {
        vec![PathBuf::from(filename)]
    } else {
        base_paths.iter().map(|base| base.join(filename)).collect()
    };

    candidates
        .iter()
        .find(|candidate| candidate.is_file())
        .cloned()
        .ok_or_else(|| LoadError::NotFound {
            name: filename.into(),
            searched: if base_paths.is_empty() {
                candidates
            } else {
                base_paths.to_vec()
            },
        })
}

/// Read the file at `path` as a source called `name`
pub fn load_source(path: &Path, name: &str) -> Result<Source, LoadError> {
    Source::from_file_named(path, name).map_err(|error| LoadError::Io {
        path: path.to_path_buf(),
        error,
    })
}
