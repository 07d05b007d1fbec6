//! Source positions for DSL diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 1-based line/column position in DSL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number, starting at 1
    pub line: u32,
    /// Column number in characters, starting at 1
    pub column: u32,
}

impl Position {
    /// Create a new position.
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Character cursor that tracks line and column while scanning text.
///
/// Shared by the zz and yy lexers.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    position: Position,
}

impl<'a> Cursor<'a> {
    /// Start scanning `text` at line 1, column 1.
    pub fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
            position: Position::default(),
        }
    }

    /// Position of the next character.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Look at the next character without consuming it.
    pub fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    /// Look at the character after the next one.
    pub fn peek_second(&self) -> Option<char> {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next()
    }

    /// Consume the next character.
    pub fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.position.line += 1;
            self.position.column = 1;
        } else {
            self.position.column += 1;
        }
        Some(c)
    }

    /// Consume characters while `pred` holds, returning them.
    pub fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            out.push(c);
            self.bump();
        }
        out
    }

    /// Skip to the end of the current line, leaving the newline unconsumed.
    pub fn skip_line(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_tracks_lines_and_columns() {
        let mut cursor = Cursor::new("ab\ncd");
        assert_eq!(cursor.position(), Position::new(1, 1));
        cursor.bump();
        cursor.bump();
        assert_eq!(cursor.position(), Position::new(1, 3));
        cursor.bump();
        assert_eq!(cursor.position(), Position::new(2, 1));
        assert_eq!(cursor.peek(), Some('c'));
        assert_eq!(cursor.peek_second(), Some('d'));
    }

    #[test]
    fn test_take_while_and_skip_line() {
        let mut cursor = Cursor::new("abc123 rest\nnext");
        assert_eq!(cursor.take_while(|c| c.is_ascii_alphabetic()), "abc");
        cursor.skip_line();
        assert_eq!(cursor.peek(), Some('\n'));
        cursor.bump();
        assert_eq!(cursor.position(), Position::new(2, 1));
    }

    #[test]
    fn test_display() {
        assert_eq!(Position::new(3, 7).to_string(), "line 3, column 7");
    }
}
