use std::cmp::Reverse;

/// Position tracking for declarations and references
///
/// Stores the source location (line/column) of declarations and use sites for
/// position queries ("symbol at line/column") and reference reporting.
/// A span representing a range in source code (0-indexed)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// A position in source code (0-indexed)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
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

    /// Check if another span lies entirely within this one
    pub fn encloses(&self, other: &Span) -> bool {
        self.contains(other.start) && self.contains(other.end)
    }

    /// A span whose end precedes its start cannot come from a real parse.
    pub fn is_inverted(&self) -> bool {
        self.end < self.start
    }

    /// Sort key ranking nested spans innermost first: latest start, then
    /// earliest end.
    pub(crate) fn nesting_key(&self) -> (Reverse<Position>, Position) {
        (Reverse(self.start), self.end)
    }
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}
