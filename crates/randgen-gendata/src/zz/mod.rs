//! The zz schema DSL: lexer, document parser and typed configuration.

mod lexer;
mod parser;

pub mod config;

pub use config::{DataConfig, DataItem, FieldsConfig, TablesConfig, ZzConfig, DEFAULT_ZZ};
