//! yy tokenizer.
//!
//! Produces raw tokens annotated with the layout facts the parser needs:
//! whether whitespace preceded the token and whether it starts its line.

use crate::error::ParseError;
use randgen_core::{Cursor, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawKind {
    Ident,
    Number,
    Quoted,
    Punct,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawToken {
    pub kind: RawKind,
    pub text: String,
    pub position: Position,
    /// Whitespace or a comment separates this token from the previous one
    pub space_before: bool,
    /// First token on its line
    pub line_start: bool,
}

impl RawToken {
    pub fn is_punct(&self, text: &str) -> bool {
        self.kind == RawKind::Punct && self.text == text
    }
}

pub(crate) fn tokenize(text: &str) -> Result<Vec<RawToken>, ParseError> {
    let mut cursor = Cursor::new(text);
    let mut tokens = Vec::new();
    let mut space_before = false;
    let mut line_start = true;

    while let Some(c) = cursor.peek() {
        if c == '\n' {
            cursor.bump();
            space_before = true;
            line_start = true;
            continue;
        }
        if c.is_whitespace() {
            cursor.bump();
            space_before = true;
            continue;
        }
        if c == '#' {
            cursor.skip_line();
            space_before = true;
            continue;
        }
        if c == '/' && cursor.peek_second() == Some('*') {
            if skip_block_comment(&mut cursor)? {
                line_start = true;
            }
            space_before = true;
            continue;
        }

        let position = cursor.position();
        let (kind, text) = if c.is_alphabetic() || c == '_' {
            (
                RawKind::Ident,
                cursor.take_while(|c| c.is_alphanumeric() || c == '_'),
            )
        } else if c.is_ascii_digit() {
            (
                RawKind::Number,
                cursor.take_while(|c| c.is_ascii_alphanumeric() || c == '.'),
            )
        } else if matches!(c, '\'' | '"' | '`') {
            (RawKind::Quoted, quoted(&mut cursor, position)?)
        } else if c == '|' {
            // `||` is an operator, a lone `|` separates alternatives
            (RawKind::Punct, cursor.take_while(|c| c == '|'))
        } else {
            cursor.bump();
            (RawKind::Punct, c.to_string())
        };

        tokens.push(RawToken {
            kind,
            text,
            position,
            space_before,
            line_start,
        });
        space_before = false;
        line_start = false;
    }

    Ok(tokens)
}

/// Skip a `/* ... */` comment. Returns whether it spanned a newline.
fn skip_block_comment(cursor: &mut Cursor<'_>) -> Result<bool, ParseError> {
    let start = cursor.position();
    cursor.bump();
    cursor.bump();

    let mut newline = false;
    loop {
        match cursor.bump() {
            Some('*') if cursor.peek() == Some('/') => {
                cursor.bump();
                return Ok(newline);
            }
            Some('\n') => newline = true,
            Some(_) => {}
            None => return Err(ParseError::syntax(start, "unterminated comment")),
        }
    }
}

/// Read a quoted string, keeping the quotes and escapes verbatim.
fn quoted(cursor: &mut Cursor<'_>, start: Position) -> Result<String, ParseError> {
    let unterminated = || ParseError::syntax(start, "unterminated string");

    let quote = cursor.bump().ok_or_else(unterminated)?;
    let mut text = String::from(quote);
    loop {
        let c = cursor.bump().ok_or_else(unterminated)?;
        text.push(c);
        if c == '\\' {
            text.push(cursor.bump().ok_or_else(unterminated)?);
        } else if c == quote {
            return Ok(text);
        }
    }
}
