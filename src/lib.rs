//! sql-randgen library
//!
//! A grammar-driven random SQL generator for database fuzz testing.
//!
//! Two small DSLs drive it:
//!
//! - a **zz** file describes table and column variants plus the value domains
//!   used to fill them; it is interpreted once into DDL, `INSERT` data and a
//!   registry of key functions (`_table`, `_field_int`, `_int` ...)
//! - a **yy** file describes statement shapes as BNF-like rules; it is
//!   expanded at random from a root rule under a recursion bound
//!
//! # Crates
//!
//! - `randgen_core` - schema snapshot and key function registry
//! - `randgen_gendata` - zz interpreter and value generators
//! - `randgen_grammar` - yy parser, expansion engine and sessions
//!
//! # CLI Usage
//!
//! ```bash
//! # Tables and data from the default zz
//! sql-randgen gendata --seed 42 -O out
//!
//! # 1000 statements against the tables of a custom zz
//! sql-randgen gensql -Z my.zz -Y my.yy -Q 1000
//!
//! # Both, sharing one random stream
//! sql-randgen gentest -Y my.yy
//! ```

pub mod commands;
pub mod opts;

pub use opts::GlobalOpts;

pub use randgen_core;
pub use randgen_gendata;
pub use randgen_grammar;
