//! Tokenizer for zz text.

use crate::error::ZzError;
use randgen_core::{Cursor, Position};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    /// Contents of a quoted string, quotes removed and escapes applied
    Str(String),
    /// Raw text of an integer or decimal number, sign included
    Number(String),
    Assign,
    LBrace,
    RBrace,
    Comma,
}

impl TokenKind {
    pub fn describe(&self) -> String {
        match self {
            Self::Ident(name) => format!("identifier '{name}'"),
            Self::Str(s) => format!("string '{s}'"),
            Self::Number(n) => format!("number {n}"),
            Self::Assign => "'='".to_string(),
            Self::LBrace => "'{'".to_string(),
            Self::RBrace => "'}'".to_string(),
            Self::Comma => "','".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: Position,
}

/// Split zz text into tokens. `--` and `#` start comments running to end of line.
pub fn tokenize(text: &str) -> Result<Vec<Token>, ZzError> {
    let mut cursor = Cursor::new(text);
    let mut tokens = Vec::new();

    while let Some(c) = cursor.peek() {
        let position = cursor.position();

        let kind = match c {
            c if c.is_whitespace() => {
                cursor.bump();
                continue;
            }
            '#' => {
                cursor.skip_line();
                continue;
            }
            '-' if cursor.peek_second() == Some('-') => {
                cursor.skip_line();
                continue;
            }
            '=' => {
                cursor.bump();
                TokenKind::Assign
            }
            '{' => {
                cursor.bump();
                TokenKind::LBrace
            }
            '}' => {
                cursor.bump();
                TokenKind::RBrace
            }
            ',' | ';' => {
                cursor.bump();
                TokenKind::Comma
            }
            '\'' | '"' => TokenKind::Str(read_string(&mut cursor, position)?),
            c if c.is_ascii_digit() || c == '-' || c == '+' => {
                TokenKind::Number(read_number(&mut cursor, position)?)
            }
            c if c.is_alphabetic() || c == '_' => {
                TokenKind::Ident(cursor.take_while(|c| c.is_alphanumeric() || c == '_'))
            }
            other => {
                return Err(ZzError::syntax(
                    position,
                    format!("unexpected character '{other}'"),
                ))
            }
        };

        tokens.push(Token { kind, position });
    }

    Ok(tokens)
}

fn read_string(cursor: &mut Cursor<'_>, start: Position) -> Result<String, ZzError> {
    let quote = cursor.bump().unwrap_or('\'');
    let mut value = String::new();

    loop {
        match cursor.bump() {
            None | Some('\n') => {
                return Err(ZzError::syntax(start, "unterminated string literal"));
            }
            Some('\\') => match cursor.bump() {
                Some('n') => value.push('\n'),
                Some('t') => value.push('\t'),
                Some(escaped) => value.push(escaped),
                None => return Err(ZzError::syntax(start, "unterminated string literal")),
            },
            Some(c) if c == quote => return Ok(value),
            Some(c) => value.push(c),
        }
    }
}

fn read_number(cursor: &mut Cursor<'_>, start: Position) -> Result<String, ZzError> {
    let mut raw = String::new();
    if let Some(sign @ ('-' | '+')) = cursor.peek() {
        raw.push(sign);
        cursor.bump();
    }

    let integral = cursor.take_while(|c| c.is_ascii_digit());
    if integral.is_empty() {
        return Err(ZzError::syntax(start, "expected digits in number"));
    }
    raw.push_str(&integral);

    if cursor.peek() == Some('.') {
        cursor.bump();
        let fraction = cursor.take_while(|c| c.is_ascii_digit());
        if fraction.is_empty() {
            return Err(ZzError::syntax(start, "expected digits after decimal point"));
        }
        raw.push('.');
        raw.push_str(&fraction);
    }

    Ok(raw)
}
