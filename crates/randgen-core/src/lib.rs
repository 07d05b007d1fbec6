//! Core types shared by the sql-randgen crates.
//!
//! This crate provides:
//!
//! - [`ColumnType`] - the column type classes a zz file may declare
//! - [`DatabaseSchema`] - the schema snapshot materialized from a zz file
//! - [`KeyFunRegistry`] - named value generators callable from yy grammars
//! - [`Position`] / [`Cursor`] - source positions shared by the DSL lexers
//!
//! # Architecture
//!
//! ```text
//! randgen-core (this crate)
//!    │
//!    ├─── randgen-gendata   (interprets zz, fills the registry)
//!    │
//!    └─── randgen-grammar   (resolves `_name` tokens against the registry)
//! ```
//!
//! # Example
//!
//! ```rust
//! use randgen_core::KeyFunRegistry;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut registry = KeyFunRegistry::new();
//! let id = registry.register_constant("_table", "t1");
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! assert_eq!(registry.call(id, &mut rng).unwrap(), "t1");
//! ```

pub mod keyfun;
pub mod position;
pub mod schema;
pub mod types;

// Re-exports for convenience
pub use keyfun::{KeyFunError, KeyFunId, KeyFunRegistry, KeyFunction};
pub use position::{Cursor, Position};
pub use schema::{ColumnDefinition, DatabaseSchema, KeyKind, TableDefinition};
pub use types::{ColumnType, TypeCategory, UnknownTypeError, TYPE_CLASSES};
