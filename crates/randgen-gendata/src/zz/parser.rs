//! Parser from zz tokens to a document tree.
//!
//! ```text
//! document := section*
//! section  := IDENT '=' table
//! table    := '{' [ entry { ',' entry } [ ',' ] ] '}'
//! entry    := IDENT '=' value | value
//! value    := STRING | NUMBER | IDENT | table
//! ```

use super::lexer::{tokenize, Token, TokenKind};
use crate::error::ZzError;
use randgen_core::Position;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Number(String),
    Ident(String),
    Table(Vec<Entry>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub value: Value,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub key: Option<(String, Position)>,
    pub node: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub name: String,
    pub position: Position,
    pub entries: Vec<Entry>,
}

/// Parse zz text into its sections.
pub fn parse_document(text: &str) -> Result<Vec<Section>, ZzError> {
    let tokens = tokenize(text)?;
    let mut parser = Parser {
        end: tokens.last().map(|t| t.position).unwrap_or_default(),
        tokens,
        pos: 0,
    };

    let mut sections = Vec::new();
    while parser.peek().is_some() {
        sections.push(parser.section()?);
    }
    Ok(sections)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    end: Position,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| &t.kind)
    }

    fn next(&mut self, expected: &str) -> Result<Token, ZzError> {
        match self.tokens.get(self.pos) {
            Some(token) => {
                self.pos += 1;
                Ok(token.clone())
            }
            None => Err(ZzError::syntax(
                self.end,
                format!("unexpected end of input, expected {expected}"),
            )),
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Position, ZzError> {
        let expected = kind.describe();
        let token = self.next(&expected)?;
        if token.kind == kind {
            Ok(token.position)
        } else {
            Err(ZzError::syntax(
                token.position,
                format!("expected {expected}, found {}", token.kind.describe()),
            ))
        }
    }

    fn section(&mut self) -> Result<Section, ZzError> {
        let token = self.next("section name")?;
        let TokenKind::Ident(name) = token.kind else {
            return Err(ZzError::syntax(
                token.position,
                format!("expected section name, found {}", token.kind.describe()),
            ));
        };

        self.expect(TokenKind::Assign)?;
        let open = self.expect(TokenKind::LBrace)?;
        let entries = self.table_body(open)?;

        Ok(Section {
            name,
            position: token.position,
            entries,
        })
    }

    /// Parse entries after an opening brace, through the closing brace.
    fn table_body(&mut self, open: Position) -> Result<Vec<Entry>, ZzError> {
        let mut entries = Vec::new();

        loop {
            match self.peek_kind(0) {
                None => {
                    return Err(ZzError::syntax(open, "unclosed '{'"));
                }
                Some(TokenKind::RBrace) => {
                    self.pos += 1;
                    return Ok(entries);
                }
                _ => {}
            }

            entries.push(self.entry()?);

            match self.peek_kind(0) {
                Some(TokenKind::Comma) => self.pos += 1,
                Some(TokenKind::RBrace) => {}
                None => return Err(ZzError::syntax(open, "unclosed '{'")),
                Some(other) => {
                    let position = self.tokens[self.pos].position;
                    return Err(ZzError::syntax(
                        position,
                        format!("expected ',' or '}}', found {}", other.describe()),
                    ));
                }
            }
        }
    }

    fn entry(&mut self) -> Result<Entry, ZzError> {
        let keyed = matches!(
            (self.peek_kind(0), self.peek_kind(1)),
            (Some(TokenKind::Ident(_)), Some(TokenKind::Assign))
        );

        let key = if keyed {
            let token = self.next("key")?;
            self.pos += 1;
            match token.kind {
                TokenKind::Ident(name) => Some((name, token.position)),
                _ => None,
            }
        } else {
            None
        };

        let node = self.value()?;
        Ok(Entry { key, node })
    }

    fn value(&mut self) -> Result<Node, ZzError> {
        let token = self.next("value")?;
        let value = match token.kind {
            TokenKind::Str(s) => Value::Str(s),
            TokenKind::Number(n) => Value::Number(n),
            TokenKind::Ident(i) => Value::Ident(i),
            TokenKind::LBrace => Value::Table(self.table_body(token.position)?),
            other => {
                return Err(ZzError::syntax(
                    token.position,
                    format!("expected value, found {}", other.describe()),
                ))
            }
        };
        Ok(Node {
            value,
            position: token.position,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sections() {
        let doc = parse_document(
            "tables = { rows = {10, 20}, }\nfields = { types = {'int'} }",
        )
        .unwrap();

        assert_eq!(doc.len(), 2);
        assert_eq!(doc[0].name, "tables");
        assert_eq!(doc[1].name, "fields");

        let rows = &doc[0].entries[0];
        assert_eq!(rows.key.as_ref().map(|(k, _)| k.as_str()), Some("rows"));
        let Value::Table(items) = &rows.node.value else {
            panic!("expected table, got {:?}", rows.node.value);
        };
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|e| e.key.is_none()));
        assert_eq!(items[1].node.value, Value::Number("20".into()));
    }

    #[test]
    fn test_parse_empty_document() {
        assert!(parse_document("").unwrap().is_empty());
        assert!(parse_document("-- only a comment").unwrap().is_empty());
    }

    #[test]
    fn test_missing_assign() {
        let err = parse_document("tables { }").unwrap_err();
        assert_eq!(err.position(), Position::new(1, 8));
        assert!(err.to_string().contains("expected '='"));
    }

    #[test]
    fn test_unclosed_brace() {
        let err = parse_document("tables = {\n rows = {1, 2}\n").unwrap_err();
        assert!(matches!(err, ZzError::Syntax { .. }));
        assert!(err.to_string().contains("unclosed"));
    }

    #[test]
    fn test_missing_separator() {
        let err = parse_document("tables = { rows = {1 2} }").unwrap_err();
        assert_eq!(err.position(), Position::new(1, 22));
    }
}
