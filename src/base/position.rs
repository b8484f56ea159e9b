/// Position tracking for tokens and captures
///
/// Stores the source location (line/column) of tokens, captures and
/// diagnostics. Positions are only used for diagnostics and adjacency
/// predicates, never for equality of parse results.
use std::fmt;

/// A span representing a range in source code (0-indexed, end exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// A position in source code (0-indexed, column counted in characters)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Create a span from line/column coordinates
    pub fn from_coords(
        start_line: usize,
        start_col: usize,
        end_line: usize,
        end_col: usize,
    ) -> Self {
        Self {
            start: Position::new(start_line, start_col),
            end: Position::new(end_line, end_col),
        }
    }

    /// A zero-width span at `position`
    pub fn empty(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    /// The span from the start of `self` to the end of `other`
    pub fn to(self, other: Span) -> Self {
        Self {
            start: self.start,
            end: other.end,
        }
    }

    /// A zero-width span `columns` characters after the end of this one
    pub fn after(self, columns: usize) -> Self {
        Self::empty(Position::new(self.end.line, self.end.column + columns))
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn is_multiline(&self) -> bool {
        self.start.line != self.end.line
    }

    /// True when this span begins exactly where `previous` ended
    pub fn is_adjacent_to(&self, previous: &Span) -> bool {
        self.start == previous.end
    }

    /// Check if a position falls within this span
    pub fn contains(&self, position: Position) -> bool {
        if position.line < self.start.line || position.line > self.end.line {
            return false;
        }
        if position.line == self.start.line && position.column < self.start.column {
            return false;
        }
        if position.line == self.end.line && position.column > self.end.column {
            return false;
        }
        true
    }
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_multiline() {
            write!(f, "{}..{}", self.start, self.end)
        } else {
            write!(
                f,
                "{}:{}..{}",
                self.start.line + 1,
                self.start.column + 1,
                self.end.column + 1
            )
        }
    }
}
