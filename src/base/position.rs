/// Position tracking for AST nodes
///
/// Stores the source location (line/column) of AST nodes for LSP features
/// like hover, go-to-definition, and error reporting.
/// A span representing a range in source code (0-indexed for LSP compatibility)
///
/// A span whose coordinates are all zero is the "unknown" span: it is what a
/// node gets when the parser produced no position for it, and it never
/// contains any position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// A position in source code (0-indexed)
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

    /// The all-zero span used when no position is available.
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn is_unknown(&self) -> bool {
        *self == Self::default()
    }

    /// Check if a position falls within this span
    pub fn contains(&self, position: Position) -> bool {
        if self.is_unknown() {
            return false;
        }
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

    /// Check if `other` lies entirely inside this span.
    pub fn encloses(&self, other: &Span) -> bool {
        !self.is_unknown()
            && !other.is_unknown()
            && self.start <= other.start
            && other.end <= self.end
    }

    /// Size key used to pick the innermost of several containing spans.
    ///
    /// Compares line extent first, then the column extent.
    pub fn extent(&self) -> (usize, usize) {
        let lines = self.end.line - self.start.line;
        let columns = if lines == 0 {
            self.end.column.saturating_sub(self.start.column)
        } else {
            self.end.column
        };
        (lines, columns)
    }

    /// Check if this span is strictly smaller than `other`.
    pub fn is_smaller_than(&self, other: &Span) -> bool {
        self.extent() < other.extent()
    }
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl From<(usize, usize)> for Position {
    fn from((line, column): (usize, usize)) -> Self {
        Self::new(line, column)
    }
}
