//! Depth-bounded random expansion.
//!
//! Each rule entry on the current path is counted. Once a rule has been
//! entered `max_recursion` times on the path, only its escape alternatives
//! are eligible: bottom-out alternatives none of whose references can lead
//! back to the rule. A rule without any falls back according to
//! [`FallbackPolicy`] and expands the fallback in closing mode, where every
//! nested rule takes its shortest alternative. Every path is therefore
//! finite for a positive bound, whatever the rng returns.
//!
//! The rng is consumed depth-first, left to right, so a fixed seed always
//! produces the same statement.

use crate::error::GenerationError;
use crate::model::{Grammar, RuleId, Token};
use rand::{Rng, RngCore};
use randgen_core::KeyFunRegistry;

/// Recursion bound used when none is configured.
pub const DEFAULT_MAX_RECURSION: i64 = 5;

/// What to do when the recursion bound is hit and no alternative bottoms out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Take the alternative with the fewest rule references, earliest on ties
    #[default]
    FewestReferences,
    /// Take the first declared alternative
    FirstDeclared,
    /// Fail with [`GenerationError::NoTermination`]
    Fail,
}

/// Expansion settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandOptions {
    /// Entries per rule allowed on one path; `<= 0` means unbounded
    pub max_recursion: i64,
    /// Record the chosen alternatives
    pub trace: bool,
    pub fallback: FallbackPolicy,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            max_recursion: DEFAULT_MAX_RECURSION,
            trace: false,
            fallback: FallbackPolicy::default(),
        }
    }
}

/// One choice made during expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceStep {
    pub rule: String,
    pub alternative: usize,
}

/// A generated statement and, when requested, its pre-order trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub sql: String,
    pub trace: Option<Vec<TraceStep>>,
}

/// Expand `root` into one statement.
///
/// `registry` must be the registry `grammar` was parsed against.
pub fn expand(
    grammar: &Grammar,
    registry: &KeyFunRegistry,
    root: RuleId,
    options: &ExpandOptions,
    rng: &mut dyn RngCore,
) -> Result<Expansion, GenerationError> {
    let mut state = GenerationState {
        grammar,
        registry,
        options,
        rng,
        depth: vec![0; grammar.len()],
        trace: options.trace.then(Vec::new),
        writer: SqlWriter::default(),
    };
    state.expand_rule(root, false)?;

    Ok(Expansion {
        sql: state.writer.finish(),
        trace: state.trace,
    })
}

/// Joins emitted pieces, inserting one space wherever the source had
/// whitespace between two non-empty pieces.
#[derive(Debug, Default)]
pub(crate) struct SqlWriter {
    out: String,
    pending_space: bool,
}

impl SqlWriter {
    pub(crate) fn space(&mut self) {
        self.pending_space = true;
    }

    pub(crate) fn write(&mut self, piece: &str) {
        if piece.is_empty() {
            return;
        }
        if self.pending_space && !self.out.is_empty() {
            self.out.push(' ');
        }
        self.pending_space = false;
        self.out.push_str(piece);
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }
}

/// Per-statement mutable state.
struct GenerationState<'a> {
    grammar: &'a Grammar,
    registry: &'a KeyFunRegistry,
    options: &'a ExpandOptions,
    rng: &'a mut dyn RngCore,
    /// Entries of each rule on the current path
    depth: Vec<u32>,
    trace: Option<Vec<TraceStep>>,
    writer: SqlWriter,
}

impl GenerationState<'_> {
    fn expand_rule(&mut self, id: RuleId, closing: bool) -> Result<(), GenerationError> {
        let (alternative, closing) = self.choose(id, closing)?;

        let grammar = self.grammar;
        let rule = grammar.rule(id);
        if let Some(trace) = &mut self.trace {
            trace.push(TraceStep {
                rule: rule.name().to_string(),
                alternative,
            });
        }

        self.depth[id.index()] += 1;
        let result = self.expand_tokens(rule.alternatives()[alternative].tokens(), closing);
        self.depth[id.index()] -= 1;
        result
    }

    /// Pick the alternative to expand and whether its subtree is closing.
    fn choose(&mut self, id: RuleId, closing: bool) -> Result<(usize, bool), GenerationError> {
        let grammar = self.grammar;
        let rule = grammar.rule(id);
        let no_termination = || GenerationError::NoTermination {
            rule: rule.name().to_string(),
        };

        if closing {
            return rule
                .shortest_alternative()
                .map(|a| (a, true))
                .ok_or_else(no_termination);
        }

        let bound = self.options.max_recursion;
        if bound > 0 && i64::from(self.depth[id.index()]) >= bound {
            let escape = rule.escape_alternatives();
            if !escape.is_empty() {
                let pick = escape[self.rng.random_range(0..escape.len())];
                return Ok((pick, false));
            }
            return match self.options.fallback {
                FallbackPolicy::FewestReferences => Ok((rule.fallback_alternative(), true)),
                FallbackPolicy::FirstDeclared => Ok((0, true)),
                FallbackPolicy::Fail => Err(no_termination()),
            };
        }

        Ok((self.rng.random_range(0..rule.alternatives().len()), false))
    }

    fn expand_tokens(&mut self, tokens: &[Token], closing: bool) -> Result<(), GenerationError> {
        for token in tokens {
            match token {
                Token::Literal(text) => self.writer.write(text),
                Token::Space => self.writer.space(),
                Token::Rule(id) => self.expand_rule(*id, closing)?,
                Token::KeyFun(id) => {
                    let registry = self.registry;
                    let value = registry.call(*id, &mut *self.rng).map_err(|source| {
                        GenerationError::KeyFun {
                            name: registry.name(*id).to_string(),
                            source,
                        }
                    })?;
                    self.writer.write(&value);
                }
            }
        }
        Ok(())
    }
}
