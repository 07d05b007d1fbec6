//! Generation sessions: batch and streaming statement generation.
//!
//! A [`Session`] owns the rng and advances it across statements. Batch and
//! stream generation both go through [`Session::next_statement`], so they
//! produce identical sequences for identical construction parameters.

use crate::error::{ConstructionError, GenerationError};
use crate::expand::{expand, ExpandOptions, Expansion, FallbackPolicy};
use crate::model::{Grammar, RuleId, Token};
use rand::rngs::StdRng;
use rand::SeedableRng;
use randgen_core::KeyFunRegistry;
use std::sync::Arc;
use tracing::debug;

/// Root rule used when none is configured.
pub const DEFAULT_ROOT: &str = "query";

/// Builder for [`Session`].
pub struct SessionBuilder {
    grammar: Arc<Grammar>,
    registry: Arc<KeyFunRegistry>,
    root: String,
    options: ExpandOptions,
    rng: Option<StdRng>,
}

impl SessionBuilder {
    /// Root rule to expand (default `query`).
    pub fn root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    /// Entries per rule allowed on one expansion path; `<= 0` disables the bound.
    pub fn max_recursion(mut self, max_recursion: i64) -> Self {
        self.options.max_recursion = max_recursion;
        self
    }

    /// Seed a fresh rng.
    pub fn seed(mut self, seed: u64) -> Self {
        self.rng = Some(StdRng::seed_from_u64(seed));
        self
    }

    /// Continue from an existing rng, e.g. one already used for zz data.
    pub fn rng(mut self, rng: StdRng) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn trace(mut self, trace: bool) -> Self {
        self.options.trace = trace;
        self
    }

    pub fn fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.options.fallback = fallback;
        self
    }

    /// Validate the root and every rule reachable from it.
    ///
    /// Without a seed or rng the session is seeded with 0.
    pub fn build(self) -> Result<Session, ConstructionError> {
        let root = self
            .grammar
            .rule_id(&self.root)
            .ok_or_else(|| ConstructionError::MissingRoot {
                root: self.root.clone(),
            })?;

        // Report a rule on the offending cycle rather than one that merely
        // depends on it.
        let unproductive: Vec<RuleId> = self
            .grammar
            .reachable_from(root)
            .into_iter()
            .filter(|&id| !self.grammar.rule(id).is_productive())
            .collect();
        if let Some(&first) = unproductive.first() {
            let culprit = unproductive
                .iter()
                .copied()
                .find(|&id| self.grammar.reaches(id, id))
                .unwrap_or(first);
            return Err(ConstructionError::Unproductive {
                rule: self.grammar.rule(culprit).name().to_string(),
            });
        }

        let foreign = self.grammar.rules().find(|(_, rule)| {
            rule.alternatives()
                .iter()
                .flat_map(|alt| alt.tokens())
                .any(|token| matches!(token, Token::KeyFun(id) if id.index() >= self.registry.len()))
        });
        if let Some((_, rule)) = foreign {
            return Err(ConstructionError::RegistryMismatch {
                rule: rule.name().to_string(),
            });
        }

        debug!(
            "Session rooted at '{}' with max_recursion={}",
            self.root, self.options.max_recursion
        );

        Ok(Session {
            grammar: self.grammar,
            registry: self.registry,
            root,
            options: self.options,
            rng: self.rng.unwrap_or_else(|| StdRng::seed_from_u64(0)),
            generated: 0,
        })
    }
}

/// Statement generator bound to one grammar, registry, root and rng.
pub struct Session {
    grammar: Arc<Grammar>,
    registry: Arc<KeyFunRegistry>,
    root: RuleId,
    options: ExpandOptions,
    rng: StdRng,
    generated: u64,
}

impl Session {
    /// Start building a session. `registry` must be the one `grammar` was
    /// parsed against.
    pub fn builder(grammar: Arc<Grammar>, registry: Arc<KeyFunRegistry>) -> SessionBuilder {
        SessionBuilder {
            grammar,
            registry,
            root: DEFAULT_ROOT.to_string(),
            options: ExpandOptions::default(),
            rng: None,
        }
    }

    /// Generate one statement.
    pub fn next_statement(&mut self) -> Result<Expansion, GenerationError> {
        let expansion = expand(
            &self.grammar,
            &self.registry,
            self.root,
            &self.options,
            &mut self.rng,
        )?;
        self.generated += 1;
        debug!("Statement {}: {}", self.generated, expansion.sql);
        Ok(expansion)
    }

    /// Generate `count` statements, or none at all if any of them fails.
    pub fn generate_batch(&mut self, count: usize) -> Result<Vec<String>, GenerationError> {
        Ok(self
            .generate_batch_traced(count)?
            .into_iter()
            .map(|e| e.sql)
            .collect())
    }

    /// Like [`generate_batch`](Self::generate_batch), keeping traces.
    pub fn generate_batch_traced(
        &mut self,
        count: usize,
    ) -> Result<Vec<Expansion>, GenerationError> {
        (0..count).map(|_| self.next_statement()).collect()
    }

    /// Open a pull-based stream of at most `limit` statements.
    pub fn open_stream(&mut self, limit: impl Into<StatementLimit>) -> SqlStream<'_> {
        SqlStream {
            session: self,
            limit: limit.into(),
            delivered: 0,
            failed: None,
            error_yielded: false,
        }
    }

    /// Number of statements generated so far.
    pub fn statements_generated(&self) -> u64 {
        self.generated
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn options(&self) -> &ExpandOptions {
        &self.options
    }

    /// Give the rng back, e.g. to continue the same random stream elsewhere.
    pub fn into_rng(self) -> StdRng {
        self.rng
    }
}

/// How many statements a stream yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementLimit {
    Bounded(usize),
    Unbounded,
}

impl From<usize> for StatementLimit {
    fn from(count: usize) -> Self {
        Self::Bounded(count)
    }
}

/// Negative counts mean unbounded.
impl From<i64> for StatementLimit {
    fn from(count: i64) -> Self {
        usize::try_from(count).map_or(Self::Unbounded, Self::Bounded)
    }
}

/// Pull handle over a [`Session`].
///
/// Holds no per-statement state between pulls. After an error the stream is
/// dead: [`next_statement`](Self::next_statement) keeps returning that error.
pub struct SqlStream<'s> {
    session: &'s mut Session,
    limit: StatementLimit,
    delivered: usize,
    failed: Option<GenerationError>,
    error_yielded: bool,
}

impl SqlStream<'_> {
    /// Next statement, `Ok(None)` once the limit is reached.
    pub fn next_statement(&mut self) -> Result<Option<Expansion>, GenerationError> {
        if let Some(err) = &self.failed {
            return Err(err.clone());
        }
        if let StatementLimit::Bounded(limit) = self.limit {
            if self.delivered >= limit {
                return Ok(None);
            }
        }

        match self.session.next_statement() {
            Ok(expansion) => {
                self.delivered += 1;
                Ok(Some(expansion))
            }
            Err(err) => {
                self.failed = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Statements delivered so far.
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    pub fn limit(&self) -> StatementLimit {
        self.limit
    }

    /// Whether the stream has failed.
    pub fn is_failed(&self) -> bool {
        self.failed.is_some()
    }
}

/// Yields the error once, then ends, so `for` loops terminate.
impl Iterator for SqlStream<'_> {
    type Item = Result<String, GenerationError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.error_yielded {
            return None;
        }
        match self.next_statement() {
            Ok(Some(expansion)) => Some(Ok(expansion.sql)),
            Ok(None) => None,
            Err(err) => {
                self.error_yielded = true;
                Some(Err(err))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.limit {
            StatementLimit::Bounded(limit) if self.failed.is_none() => {
                let remaining = limit - self.delivered;
                (0, Some(remaining))
            }
            StatementLimit::Bounded(_) => (0, Some(1)),
            StatementLimit::Unbounded => (0, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use rand::{Rng, RngCore};
    use randgen_core::KeyFunError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn registry() -> KeyFunRegistry {
        let mut registry = KeyFunRegistry::new();
        registry.register_constant("_table", "t1");
        registry.register_fn("_int", |rng: &mut dyn RngCore| {
            Ok(rng.random_range(0..1000u32).to_string())
        });
        registry
    }

    fn session(text: &str, seed: u64) -> Session {
        let registry = Arc::new(registry());
        let grammar = Arc::new(parse(text, &registry).unwrap());
        Session::builder(grammar, registry).seed(seed).build().unwrap()
    }

    const EXPR: &str = "query: SELECT expr\nexpr: expr + expr | _int | ( expr )\n";

    #[test]
    fn test_batch_count_and_determinism() {
        let a = session(EXPR, 42).generate_batch(20).unwrap();
        let b = session(EXPR, 42).generate_batch(20).unwrap();

        assert_eq!(a.len(), 20);
        assert_eq!(a, b);
        assert!(a.iter().all(|s| s.starts_with("SELECT ")));
        assert!(session(EXPR, 42).generate_batch(0).unwrap().is_empty());
    }

    #[test]
    fn test_rng_advances_across_statements() {
        let statements = session(EXPR, 7).generate_batch(20).unwrap();
        let first = &statements[0];
        assert!(statements.iter().any(|s| s != first));
    }

    #[test]
    fn test_stream_matches_batch() {
        let batch = session(EXPR, 9).generate_batch(25).unwrap();

        let mut streaming = session(EXPR, 9);
        let mut stream = streaming.open_stream(25usize);
        let mut streamed = Vec::new();
        while let Some(expansion) = stream.next_statement().unwrap() {
            streamed.push(expansion.sql);
        }

        assert_eq!(streamed, batch);
        assert_eq!(stream.delivered(), 25);
        assert_eq!(stream.next_statement().unwrap(), None);
    }

    #[test]
    fn test_stream_iterator() {
        let mut s = session(EXPR, 3);
        let collected: Result<Vec<String>, _> = s.open_stream(5i64).collect();
        assert_eq!(collected.unwrap().len(), 5);
        assert_eq!(s.statements_generated(), 5);
    }

    #[test]
    fn test_unbounded_stream() {
        let mut s = session(EXPR, 11);
        let mut stream = s.open_stream(-1i64);
        assert_eq!(stream.limit(), StatementLimit::Unbounded);

        for _ in 0..500 {
            assert!(stream.next_statement().unwrap().is_some());
        }
        assert_eq!(stream.delivered(), 500);
    }

    fn failing_session() -> Session {
        let counter = AtomicUsize::new(0);
        let mut registry = registry();
        registry.register_fn("_flaky", move |_: &mut dyn RngCore| {
            if counter.fetch_add(1, Ordering::SeqCst) >= 2 {
                Err(KeyFunError::no_candidates("table"))
            } else {
                Ok("t1".to_string())
            }
        });
        let registry = Arc::new(registry);
        let grammar = Arc::new(parse("query: SELECT * FROM _flaky", &registry).unwrap());
        Session::builder(grammar, registry).build().unwrap()
    }

    #[test]
    fn test_batch_is_all_or_nothing() {
        let mut s = failing_session();
        let err = s.generate_batch(5).unwrap_err();

        assert_eq!(
            err,
            GenerationError::KeyFun {
                name: "_flaky".to_string(),
                source: KeyFunError::no_candidates("table"),
            }
        );
    }

    #[test]
    fn test_stream_error_is_sticky() {
        let mut s = failing_session();
        let mut stream = s.open_stream(-1i64);

        assert!(stream.next_statement().unwrap().is_some());
        assert!(stream.next_statement().unwrap().is_some());
        let first = stream.next_statement().unwrap_err();
        assert!(stream.is_failed());
        assert_eq!(stream.next_statement().unwrap_err(), first);
        assert_eq!(stream.next_statement().unwrap_err(), first);
        assert_eq!(stream.delivered(), 2);

        // the iterator reports the error once and then ends
        assert!(matches!(stream.next(), Some(Err(_))));
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_iterator_yields_error_once() {
        let mut s = failing_session();
        let items: Vec<_> = s.open_stream(10usize).collect();

        assert_eq!(items.len(), 3);
        assert!(items[2].is_err());
    }

    #[test]
    fn test_missing_root() {
        let registry = Arc::new(registry());
        let grammar = Arc::new(parse("stmt: SELECT 1", &registry).unwrap());

        let err = Session::builder(Arc::clone(&grammar), Arc::clone(&registry))
            .build()
            .err()
            .unwrap();
        assert_eq!(err, ConstructionError::MissingRoot { root: "query".to_string() });

        assert!(Session::builder(grammar, registry).root("stmt").build().is_ok());
    }

    #[test]
    fn test_registry_must_match_grammar() {
        let grammar = Arc::new(parse("query: SELECT _int", &registry()).unwrap());

        let mut smaller = KeyFunRegistry::new();
        smaller.register_constant("_table", "t1");
        let err = Session::builder(Arc::clone(&grammar), Arc::new(smaller))
            .build()
            .err()
            .unwrap();
        assert_eq!(err, ConstructionError::RegistryMismatch { rule: "query".to_string() });

        assert!(Session::builder(grammar, Arc::new(registry())).build().is_ok());
    }

    #[test]
    fn test_unproductive_reachable_rule() {
        let registry = Arc::new(registry());
        let grammar = Arc::new(
            parse("query: SELECT loop\nloop: loop + 1\nok: SELECT 1\n", &registry).unwrap(),
        );

        let err = Session::builder(Arc::clone(&grammar), Arc::clone(&registry))
            .build()
            .err()
            .unwrap();
        assert_eq!(err, ConstructionError::Unproductive { rule: "loop".to_string() });

        // unreachable unproductive rules do not matter
        assert!(Session::builder(grammar, registry).root("ok").build().is_ok());
    }

    #[test]
    fn test_trace_enabled() {
        let registry = Arc::new(registry());
        let grammar = Arc::new(parse(EXPR, &registry).unwrap());
        let mut s = Session::builder(grammar, registry)
            .seed(5)
            .trace(true)
            .build()
            .unwrap();

        let expansions = s.generate_batch_traced(3).unwrap();
        for expansion in expansions {
            let trace = expansion.trace.unwrap();
            assert_eq!(trace[0].rule, "query");
            assert_eq!(trace[1].rule, "expr");
        }
    }

    #[test]
    fn test_statement_limit_from_i64() {
        assert_eq!(StatementLimit::from(-1i64), StatementLimit::Unbounded);
        assert_eq!(StatementLimit::from(0i64), StatementLimit::Bounded(0));
        assert_eq!(StatementLimit::from(7i64), StatementLimit::Bounded(7));
    }
}
