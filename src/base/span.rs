//! Byte offset to line/column conversion.

use super::position::{Position, Span};
use text_size::{TextRange, TextSize};

/// Line and column as stored by [`LineIndex`] (0-indexed, column in characters)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// Maps byte offsets of a text to line/column positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset at which each line starts
    line_starts: Vec<TextSize>,
    text: Box<str>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::new(0)];
        for (offset, c) in text.char_indices() {
            if c == '\n' {
                line_starts.push(TextSize::new(offset as u32 + 1));
            }
        }
        Self {
            line_starts,
            text: text.into(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let start = usize::from(self.line_starts[line]);
        let end = usize::from(offset).min(self.text.len());
        let col = self.text.get(start..end).map_or(0, |s| s.chars().count());
        LineCol {
            line: line as u32,
            col: col as u32,
        }
    }

    pub fn position(&self, offset: TextSize) -> Position {
        let lc = self.line_col(offset);
        Position::new(lc.line as usize, lc.col as usize)
    }

    pub fn span(&self, range: TextRange) -> Span {
        Span::new(self.position(range.start()), self.position(range.end()))
    }

    /// Position just after the last character of the text
    pub fn end(&self) -> Position {
        self.position(TextSize::new(self.text.len() as u32))
    }
}
