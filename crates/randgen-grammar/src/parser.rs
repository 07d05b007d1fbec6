//! yy grammar parser.
//!
//! A yy file is a sequence of rules:
//!
//! ```text
//! query: SELECT fields FROM _table where ;
//! fields: _field | fields , _field
//! where: | WHERE _field_int = _int
//! ```
//!
//! A rule header is an identifier followed by `:` that starts the file,
//! starts a line, or directly follows a `;`. The body runs to the next header
//! and a single trailing `;` is dropped. Whitespace between two tokens of an
//! alternative becomes a [`Token::Space`]; tokens written without whitespace
//! stay glued.

use crate::analysis::build_grammar;
use crate::error::ParseError;
use crate::lexer::{tokenize, RawKind, RawToken};
use crate::model::{Alternative, Grammar, Rule, RuleId, Token};
use randgen_core::KeyFunRegistry;
use std::collections::HashMap;
use tracing::debug;

/// Parse yy text with strict reference checking.
pub fn parse(text: &str, registry: &KeyFunRegistry) -> Result<Grammar, ParseError> {
    YyParser::new(registry).parse(text)
}

/// Configurable yy parser.
#[derive(Debug, Clone, Copy)]
pub struct YyParser<'r> {
    registry: &'r KeyFunRegistry,
    strict: bool,
}

impl<'r> YyParser<'r> {
    /// Create a parser resolving `_name` tokens against `registry`.
    pub fn new(registry: &'r KeyFunRegistry) -> Self {
        Self {
            registry,
            strict: true,
        }
    }

    /// When strict (the default) a snake_case identifier such as `where_clause`
    /// that names no rule is an [`ParseError::UndefinedRule`]. Otherwise it is
    /// emitted as a literal. Plain lowercase words (`count`, `now`) are always
    /// literals.
    pub fn strict_references(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn parse(&self, text: &str) -> Result<Grammar, ParseError> {
        let tokens = tokenize(text)?;
        let headers: Vec<usize> = (0..tokens.len())
            .filter(|&i| is_header(&tokens, i))
            .collect();

        match (tokens.first(), headers.first()) {
            (None, _) => return Err(ParseError::Empty),
            (Some(first), None) => {
                return Err(ParseError::syntax(
                    first.position,
                    "expected a rule definition 'name:'",
                ))
            }
            (Some(first), Some(&h)) if h != 0 => {
                return Err(ParseError::syntax(
                    first.position,
                    format!("unexpected '{}' before the first rule", first.text),
                ))
            }
            _ => {}
        }

        let mut index: HashMap<String, RuleId> = HashMap::new();
        for (n, &h) in headers.iter().enumerate() {
            let header = &tokens[h];
            if index.contains_key(&header.text) {
                return Err(ParseError::DuplicateRule {
                    rule: header.text.clone(),
                    position: header.position,
                });
            }
            index.insert(header.text.clone(), RuleId(n as u32));
        }

        let mut rules = Vec::with_capacity(headers.len());
        for (n, &h) in headers.iter().enumerate() {
            let end = headers.get(n + 1).copied().unwrap_or(tokens.len());
            let header = &tokens[h];
            let mut body = &tokens[h + 2..end];
            if body.last().is_some_and(|t| t.is_punct(";")) {
                body = &body[..body.len() - 1];
            }

            let alternatives = body
                .split(|t| t.is_punct("|"))
                .map(|segment| self.alternative(&header.text, segment, &index))
                .collect::<Result<Vec<_>, _>>()?;
            rules.push(Rule::new(header.text.clone(), header.position, alternatives));
        }

        debug!("Parsed yy grammar with {} rules", rules.len());
        Ok(build_grammar(rules, index))
    }

    fn alternative(
        &self,
        rule: &str,
        segment: &[RawToken],
        index: &HashMap<String, RuleId>,
    ) -> Result<Alternative, ParseError> {
        let mut tokens = Vec::with_capacity(segment.len() * 2);
        for (i, raw) in segment.iter().enumerate() {
            if i > 0 && raw.space_before {
                tokens.push(Token::Space);
            }
            tokens.push(self.resolve(rule, raw, index)?);
        }
        Ok(Alternative::new(tokens))
    }

    fn resolve(
        &self,
        rule: &str,
        raw: &RawToken,
        index: &HashMap<String, RuleId>,
    ) -> Result<Token, ParseError> {
        if raw.kind != RawKind::Ident {
            return Ok(Token::Literal(raw.text.clone()));
        }

        let name = raw.text.as_str();
        if name.len() > 1 && name.starts_with('_') {
            return self
                .registry
                .resolve(name)
                .map(Token::KeyFun)
                .ok_or_else(|| ParseError::UndefinedKeyFun {
                    rule: rule.to_string(),
                    name: name.to_string(),
                    position: raw.position,
                });
        }
        if let Some(&id) = index.get(name) {
            return Ok(Token::Rule(id));
        }
        if self.strict && looks_like_rule_name(name) {
            return Err(ParseError::UndefinedRule {
                rule: rule.to_string(),
                reference: name.to_string(),
                position: raw.position,
            });
        }
        Ok(Token::Literal(raw.text.clone()))
    }
}

fn is_header(tokens: &[RawToken], i: usize) -> bool {
    let name = &tokens[i];
    if name.kind != RawKind::Ident {
        return false;
    }
    let Some(colon) = tokens.get(i + 1) else {
        return false;
    };
    if !colon.is_punct(":") {
        return false;
    }
    // `x::type` is a cast, not a header
    if tokens
        .get(i + 2)
        .is_some_and(|t| t.is_punct(":") && !t.space_before)
    {
        return false;
    }
    i == 0 || name.line_start || tokens[i - 1].is_punct(";")
}

/// Rule names are snake_case by convention. A lowercase word without `_` may
/// be an SQL function or keyword and stays a literal.
fn looks_like_rule_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_lowercase())
        && name.contains('_')
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
