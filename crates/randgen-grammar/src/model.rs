//! Grammar model: an arena of rules addressed by [`RuleId`].
//!
//! Rule references are stored as indices, so cyclic grammars need no shared
//! ownership. The analysis fields are filled once by [`crate::analysis`] and
//! never change afterwards.

use randgen_core::{KeyFunId, Position};
use std::collections::HashMap;

/// Index of a rule inside its [`Grammar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(pub(crate) u32);

impl RuleId {
    /// Position of the rule in declaration order.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One element of an alternative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Text emitted verbatim
    Literal(String),
    /// Expand another rule
    Rule(RuleId),
    /// Invoke a key function
    KeyFun(KeyFunId),
    /// The source had whitespace here; emit one space before the next piece
    Space,
}

/// One production of a rule.
#[derive(Debug, Clone)]
pub struct Alternative {
    pub(crate) tokens: Vec<Token>,
    pub(crate) rule_refs: usize,
    pub(crate) bottoms_out: bool,
    pub(crate) height: Option<u32>,
}

impl Alternative {
    pub(crate) fn new(tokens: Vec<Token>) -> Self {
        let rule_refs = tokens
            .iter()
            .filter(|t| matches!(t, Token::Rule(_)))
            .count();
        Self {
            tokens,
            rule_refs,
            bottoms_out: false,
            height: None,
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of rule reference tokens.
    pub fn rule_refs(&self) -> usize {
        self.rule_refs
    }

    /// Rules referenced by this alternative, in token order.
    pub fn references(&self) -> impl Iterator<Item = RuleId> + '_ {
        self.tokens.iter().filter_map(|t| match t {
            Token::Rule(id) => Some(*id),
            _ => None,
        })
    }

    /// Whether the alternative does not reference its owning rule.
    pub fn bottoms_out(&self) -> bool {
        self.bottoms_out
    }

    /// Height of the smallest derivation tree through this alternative.
    /// `None` if no derivation terminates.
    pub fn height(&self) -> Option<u32> {
        self.height
    }

    /// Whether the alternative is the empty production.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// A named rule with its alternatives and termination data.
#[derive(Debug, Clone)]
pub struct Rule {
    pub(crate) name: String,
    pub(crate) position: Position,
    pub(crate) alternatives: Vec<Alternative>,
    pub(crate) height: Option<u32>,
    pub(crate) bottom_out: Vec<usize>,
    pub(crate) escape: Vec<usize>,
    pub(crate) fallback: usize,
    pub(crate) shortest: Option<usize>,
}

impl Rule {
    pub(crate) fn new(name: String, position: Position, alternatives: Vec<Alternative>) -> Self {
        Self {
            name,
            position,
            alternatives,
            height: None,
            bottom_out: Vec::new(),
            escape: Vec::new(),
            fallback: 0,
            shortest: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position of the rule header.
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }

    /// Minimal termination height, `None` for an unproductive rule.
    pub fn height(&self) -> Option<u32> {
        self.height
    }

    pub fn is_productive(&self) -> bool {
        self.height.is_some()
    }

    /// Indices of the alternatives that bottom out.
    pub fn bottom_out_alternatives(&self) -> &[usize] {
        &self.bottom_out
    }

    /// Bottom-out alternatives whose references cannot lead back to this
    /// rule. Expansion at the recursion bound picks among these.
    pub fn escape_alternatives(&self) -> &[usize] {
        &self.escape
    }

    /// Alternative with the fewest rule references, earliest on ties.
    pub fn fallback_alternative(&self) -> usize {
        self.fallback
    }

    /// Alternative with the minimal termination height, earliest on ties.
    pub fn shortest_alternative(&self) -> Option<usize> {
        self.shortest
    }
}

/// Immutable, analyzed yy grammar.
#[derive(Debug, Clone)]
pub struct Grammar {
    pub(crate) rules: Vec<Rule>,
    pub(crate) index: HashMap<String, RuleId>,
    /// `reachable[a][b]`: `b` can be reached from `a` in one or more steps
    pub(crate) reachable: Vec<Vec<bool>>,
}

impl Grammar {
    /// Look up a rule id by name.
    pub fn rule_id(&self, name: &str) -> Option<RuleId> {
        self.index.get(name).copied()
    }

    /// Rule for an id produced by this grammar.
    ///
    /// Panics if `id` belongs to another grammar.
    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id.index()]
    }

    /// Rule by name.
    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rule_id(name).map(|id| self.rule(id))
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> impl Iterator<Item = (RuleId, &Rule)> {
        self.rules
            .iter()
            .enumerate()
            .map(|(i, rule)| (RuleId(i as u32), rule))
    }

    /// Rule names in declaration order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether `to` can be reached from `from` through one or more references.
    pub fn reaches(&self, from: RuleId, to: RuleId) -> bool {
        self.reachable[from.index()][to.index()]
    }

    /// `root` followed by every rule reachable from it, in declaration order.
    pub fn reachable_from(&self, root: RuleId) -> Vec<RuleId> {
        let mut out = vec![root];
        out.extend(
            self.rules()
                .map(|(id, _)| id)
                .filter(|&id| id != root && self.reaches(root, id)),
        );
        out
    }
}
