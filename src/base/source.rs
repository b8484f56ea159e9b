//! Named source text and caret-annotated excerpts.

use super::position::Span;
use smol_str::SmolStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A named piece of source text.
///
/// Cheap to clone: the name and content are shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Source {
    name: SmolStr,
    path: Option<Arc<Path>>,
    content: Arc<str>,
}

impl Source {
    /// A source that does not live on disk
    pub fn virtual_source(name: impl Into<SmolStr>, content: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            path: None,
            content: content.into(),
        }
    }

    /// Read a source from disk, naming it after the file name
    pub fn from_file(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_file_named(path, name)
    }

    /// Read a source from disk under an explicit name
    pub fn from_file_named(path: impl Into<PathBuf>, name: impl Into<SmolStr>) -> std::io::Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)?;
        Ok(Self {
            name: name.into(),
            path: Some(Arc::from(path.as_path())),
            content: content.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// The text of line `line` (0-indexed) without its newline.
    ///
    /// Lines past the end of the text are empty.
    pub fn line(&self, line: usize) -> &str {
        self.content
            .split('\n')
            .nth(line)
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .unwrap_or("")
    }

    /// Render the lines covered by `span` with carets under the spanned text.
    ///
    /// ```text
    /// 3 | let x = 1 +
    ///               ^
    /// ```
    pub fn excerpt(&self, span: Span, tab_width: usize) -> String {
        let first = span.start.line + 1;
        let last = span.end.line + 1;
        let width = first.to_string().len().max(last.to_string().len());
        let tab = " ".repeat(tab_width);

        if !span.is_multiline() {
            let line = self.line(span.start.line);
            let lead = display_width(line, span.start.column, tab_width);
            let carets = display_width(line, span.end.column, tab_width).saturating_sub(lead).max(1);
            format!(
                "{:>width$} | {}\n{}{}",
                first,
                line.replace('\t', &tab),
                " ".repeat(width + 3 + lead),
                "^".repeat(carets),
            )
        } else {
            let l1 = self.line(span.start.line);
            let l2 = self.line(span.end.line);
            let lead = display_width(l1, span.start.column, tab_width);
            let l1_width = display_width(l1, usize::MAX, tab_width);
            format!(
                "{:>width$} | {}\n{}{} ...\n{:>width$} | {}\n{}... {}",
                first,
                l1.replace('\t', &tab),
                " ".repeat(width + 3 + lead),
                "^".repeat(l1_width.saturating_sub(lead).max(1)),
                last,
                l2.replace('\t', &tab),
                " ".repeat(width.saturating_sub(1)),
                "^".repeat(display_width(l2, span.end.column, tab_width).max(1)),
            )
        }
    }
}

/// Display width of the first `chars` characters of `line`, expanding tabs
fn display_width(line: &str, chars: usize, tab_width: usize) -> usize {
    line.chars()
        .take(chars)
        .map(|c| if c == '\t' { tab_width } else { 1 })
        .sum()
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<source {}>", self.name)
    }
}
