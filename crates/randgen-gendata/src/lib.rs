//! zz schema interpreter for sql-randgen.
//!
//! A zz document describes table variants, column variants and the value
//! domains used to fill them. [`interpret`] expands it into a concrete
//! [`DatabaseSchema`](randgen_core::DatabaseSchema), the DDL and `INSERT`
//! statements that create it, and a [`KeyFunRegistry`](randgen_core::KeyFunRegistry)
//! whose pickers draw names from that schema.
//!
//! # Architecture
//!
//! ```text
//!   zz text
//!      │
//!      ▼
//! ┌───────────┐   ┌────────────┐   ┌──────────────────────────────┐
//! │ ZzConfig  │──▶│ interpret  │──▶│ ZzOutput { ddls, registry,   │
//! │ (default  │   │ (rng)      │   │            schema }          │
//! │  overlay) │   └────────────┘   └──────────────────────────────┘
//! └───────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use randgen_gendata::interpret;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let output = interpret("tables = { rows = {3} }", &mut rng).unwrap();
//!
//! assert!(output.ddls[0].starts_with("CREATE TABLE"));
//! assert!(output.registry.contains("_table"));
//! ```
//!
//! # Value domains
//!
//! The names accepted in zz `data` lists double as value key functions in yy
//! grammars (`'int'` in zz, `_int` in yy). See [`ValueKind`].

pub mod error;
pub mod generators;
pub mod interpreter;
pub mod keyfuns;
pub mod zz;

pub use error::ZzError;
pub use generators::ValueKind;
pub use interpreter::{interpret, interpret_config, ZzOutput, DEFAULT_BATCH_SIZE};
pub use keyfuns::{register_value_generators, registry_for_schema};
pub use zz::{DataConfig, DataItem, FieldsConfig, TablesConfig, ZzConfig, DEFAULT_ZZ};
