//! Rope-backed document index.
//!
//! Provides line access over the document text using a Rope, supporting
//! O(log N) line lookup. The engine never mutates the document; the host
//! pushes a fresh snapshot of the full text on every change and the scanner
//! reads lines from here.

use crate::position::Position;
use ropey::Rope;

/// Read-only line index over one document snapshot.
pub struct DocumentIndex {
    rope: Rope,
}

impl DocumentIndex {
    /// Build an index from the full document text.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Get total line count.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get total character count.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Get text of the specified line, excluding the trailing newline.
    pub fn line_text(&self, line_number: usize) -> Option<String> {
        if line_number >= self.rope.len_lines() {
            return None;
        }

        let mut text = self.rope.line(line_number).to_string();
        if text.ends_with('\n') {
            text.pop();
        }
        if text.ends_with('\r') {
            text.pop();
        }

        Some(text)
    }

    /// Character length of the specified line, excluding the trailing newline.
    pub fn line_len(&self, line_number: usize) -> usize {
        self.line_text(line_number)
            .map(|t| t.chars().count())
            .unwrap_or(0)
    }

    /// Clamp a position to the document's bounds.
    pub fn clamp(&self, position: Position) -> Position {
        let line = position.line.min(self.line_count().saturating_sub(1));
        let column = position.column.min(self.line_len(line));
        Position::new(line, column)
    }

    /// Get the complete text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }
}
