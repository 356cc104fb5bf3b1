//! Positions inside a text stream.
//!
//! A text position carries a character index, which orders positions and
//! measures distances, plus the line and column it corresponds to so that
//! diagnostics can point at the source.

use std::fmt;

/// A position in a character stream.
///
/// All three fields are 0-indexed. `index` counts characters (not bytes) from
/// the start of the stream; `line` and `column` are derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TextPos {
    pub index: usize,
    pub line: usize,
    pub column: usize,
}

impl TextPos {
    pub fn new(index: usize, line: usize, column: usize) -> Self {
        Self {
            index,
            line,
            column,
        }
    }

    /// The position at the start of the stream.
    pub fn zero() -> Self {
        Self::default()
    }

    /// The position immediately after `ch`, read at this position.
    pub fn after_char(&self, ch: char) -> TextPos {
        if ch == '\n' {
            TextPos::new(self.index + 1, self.line + 1, 0)
        } else {
            TextPos::new(self.index + 1, self.line, self.column + 1)
        }
    }
}

/// Displays as 1-based `line:column`, the way editors report locations.
impl fmt::Display for TextPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn after_char_advances_column() {
        assert_eq!(TextPos::new(4, 1, 2).after_char('x'), TextPos::new(5, 1, 3));
    }

    #[test]
    fn after_newline_starts_next_line() {
        let pos = "ab\ncd\ne".chars().fold(TextPos::zero(), |p, c| p.after_char(c));
        assert_eq!(pos, TextPos::new(7, 2, 1));
    }

    #[test]
    fn ordering_follows_index() {
        assert!(TextPos::new(3, 0, 3) < TextPos::new(4, 1, 0));
    }

    #[test]
    fn display_is_one_based() {
        assert_eq!(TextPos::new(7, 2, 1).to_string(), "3:2");
    }
}
