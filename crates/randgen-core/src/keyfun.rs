//! Key function registry.
//!
//! A key function is a named value generator invoked from a yy grammar with an
//! underscore-prefixed token (`_table`, `_int`, ...). Each call draws from the
//! random source it is handed and returns a literal SQL fragment.
//!
//! Names are resolved to [`KeyFunId`]s once, when a grammar is built, so the
//! expansion loop never performs string lookups.

use rand::RngCore;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Error raised by a key function invocation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyFunError {
    /// The schema has nothing eligible for this generator
    #[error("no {what} available")]
    NoCandidates { what: String },

    /// Any other generator failure
    #[error("{0}")]
    Failed(String),
}

impl KeyFunError {
    /// Shorthand for [`KeyFunError::NoCandidates`].
    pub fn no_candidates(what: impl Into<String>) -> Self {
        Self::NoCandidates { what: what.into() }
    }
}

/// A value generator callable from a grammar.
pub trait KeyFunction: Send + Sync {
    /// Produce the next literal using the given random source.
    fn generate(&self, rng: &mut dyn RngCore) -> Result<String, KeyFunError>;
}

impl<F> KeyFunction for F
where
    F: Fn(&mut dyn RngCore) -> Result<String, KeyFunError> + Send + Sync,
{
    fn generate(&self, rng: &mut dyn RngCore) -> Result<String, KeyFunError> {
        self(rng)
    }
}

/// Stable handle of a registered key function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyFunId(u32);

impl KeyFunId {
    /// Position of the key function in registration order.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

struct Entry {
    name: String,
    function: Arc<dyn KeyFunction>,
}

/// Immutable-after-build mapping from key function name to generator.
#[derive(Default)]
pub struct KeyFunRegistry {
    entries: Vec<Entry>,
    index: HashMap<String, KeyFunId>,
}

impl KeyFunRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a key function under `name`, replacing any previous entry
    /// with the same name. The id of a replaced entry is kept.
    pub fn register<K>(&mut self, name: impl Into<String>, function: K) -> KeyFunId
    where
        K: KeyFunction + 'static,
    {
        let name = name.into();
        let function: Arc<dyn KeyFunction> = Arc::new(function);

        if let Some(&id) = self.index.get(&name) {
            self.entries[id.index()].function = function;
            return id;
        }

        let id = KeyFunId(self.entries.len() as u32);
        self.index.insert(name.clone(), id);
        self.entries.push(Entry { name, function });
        id
    }

    /// Register a closure as a key function.
    ///
    /// Equivalent to [`register`](Self::register), but the closure signature is
    /// inferred from the bound so callers need no annotations.
    pub fn register_fn<F>(&mut self, name: impl Into<String>, function: F) -> KeyFunId
    where
        F: Fn(&mut dyn RngCore) -> Result<String, KeyFunError> + Send + Sync + 'static,
    {
        self.register(name, function)
    }

    /// Register a key function that always returns `value`.
    pub fn register_constant(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> KeyFunId {
        let value = value.into();
        self.register_fn(name, move |_| Ok(value.clone()))
    }

    /// Resolve a name to its id.
    pub fn resolve(&self, name: &str) -> Option<KeyFunId> {
        self.index.get(name).copied()
    }

    /// Whether a key function named `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Name of a registered key function.
    ///
    /// Panics if `id` was not produced by this registry.
    pub fn name(&self, id: KeyFunId) -> &str {
        &self.entries[id.index()].name
    }

    /// Invoke a key function by id.
    pub fn call(&self, id: KeyFunId, rng: &mut dyn RngCore) -> Result<String, KeyFunError> {
        self.entries[id.index()].function.generate(rng)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Number of registered key functions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for KeyFunRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyFunRegistry")
            .field("names", &self.names().collect::<Vec<_>>())
            .finish()
    }
}
