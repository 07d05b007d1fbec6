//! yy statement grammars and random SQL expansion.
//!
//! # Architecture
//!
//! ```text
//!   yy text ──▶ YyParser ──▶ Grammar (arena of rules, analyzed)
//!                  │                       │
//!          KeyFunRegistry ─────────────────┤
//!                                          ▼
//!                          Session { root, max_recursion, rng }
//!                           │                       │
//!                 generate_batch(n)          open_stream(limit)
//!                           │                       │
//!                           └──── next_statement ───┘
//!                                       │
//!                                    expand()
//! ```
//!
//! # Example
//!
//! ```rust
//! use randgen_core::KeyFunRegistry;
//! use randgen_grammar::{parse, Session};
//! use std::sync::Arc;
//!
//! let mut registry = KeyFunRegistry::new();
//! registry.register_constant("_table", "t1");
//! let registry = Arc::new(registry);
//!
//! let grammar = Arc::new(parse("query: SELECT * FROM _table ;", &registry).unwrap());
//! let mut session = Session::builder(grammar, registry).seed(42).build().unwrap();
//!
//! assert_eq!(session.generate_batch(2).unwrap(), vec!["SELECT * FROM t1"; 2]);
//! ```

mod analysis;
pub mod error;
pub mod expand;
mod lexer;
pub mod model;
pub mod parser;
pub mod session;

pub use error::{ConstructionError, GenerationError, ParseError};
pub use expand::{
    expand, ExpandOptions, Expansion, FallbackPolicy, TraceStep, DEFAULT_MAX_RECURSION,
};
pub use model::{Alternative, Grammar, Rule, RuleId, Token};
pub use parser::{parse, YyParser};
pub use session::{Session, SessionBuilder, SqlStream, StatementLimit, DEFAULT_ROOT};
