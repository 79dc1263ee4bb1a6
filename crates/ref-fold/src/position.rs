//! Line/column coordinates, spans and selections.
//!
//! All coordinates are zero-based and counted in characters (Unicode scalar
//! values), matching what the host editor reports. Spans are half-open
//! (`start <= position < end`); zero-width spans are valid and are used as
//! render anchors.

use std::cmp::Ordering;

/// Position coordinates (line and column numbers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Zero-based logical line index.
    pub line: usize,
    /// Zero-based column in characters within the logical line.
    pub column: usize,
}

impl Position {
    /// Create a new logical position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A half-open range of document text between two positions.
///
/// Spans are immutable once produced by a recomputation pass; every pass
/// rebuilds them from scratch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// Inclusive start position.
    pub start: Position,
    /// Exclusive end position.
    pub end: Position,
}

impl Span {
    /// Create a new span. `start` must not be after `end`.
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(start <= end, "span start must not be after end");
        Self { start, end }
    }

    /// Create a span from line/column coordinates.
    pub fn from_coords(
        start_line: usize,
        start_col: usize,
        end_line: usize,
        end_col: usize,
    ) -> Self {
        Self::new(
            Position::new(start_line, start_col),
            Position::new(end_line, end_col),
        )
    }

    /// Create a zero-width span at `position` (a render anchor).
    pub fn anchor(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    /// Returns `true` if the span is zero-width.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if `position` falls inside the half-open range.
    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position < self.end
    }

    /// Returns `true` if the half-open ranges `self` and `other` overlap.
    ///
    /// Zero-width ranges never overlap anything under this definition; the
    /// caret rules in [`crate::gate`] handle collapsed selections separately.
    pub fn intersects(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A selection reported by the host.
///
/// `start`/`end` are in document order as supplied by the host; a reversed
/// selection is normalized through [`Selection::min_max`]. A selection with
/// `start == end` is a collapsed caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Selection anchor position.
    pub start: Position,
    /// Selection active position.
    pub end: Position,
}

impl Selection {
    /// Create a new selection.
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Create a collapsed caret at `position`.
    pub fn caret(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    /// Returns `true` if this selection is a collapsed caret.
    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }

    /// Returns the selection endpoints in document order.
    pub fn min_max(&self) -> (Position, Position) {
        if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        }
    }
}
