//! Schema snapshot produced by interpreting a zz file.
//!
//! The snapshot is materialized once and never mutated afterwards. Key
//! functions hold it behind an `Arc` and only read from it.
//!
//! ## Type Hierarchy
//!
//! - `ColumnDefinition` - single column with its type and index attributes
//! - `TableDefinition` - one table variant with its columns and options
//! - `DatabaseSchema` - the collection of table variants

use crate::types::{ColumnType, TypeCategory};
use serde::{Deserialize, Serialize};

// ============================================================================
// Columns
// ============================================================================

/// Index attribute of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyKind {
    /// No index
    #[default]
    None,
    /// Secondary index (`KEY (col)`)
    Key,
    /// Unique index (`UNIQUE KEY (col)`)
    Unique,
}

impl KeyKind {
    /// Name used in generated column names (`undef`, `key`, `unique`).
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "undef",
            Self::Key => "key",
            Self::Unique => "unique",
        }
    }
}

/// Column definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnDefinition {
    /// Column name
    pub name: String,

    /// Column type
    #[serde(rename = "type")]
    pub column_type: ColumnType,

    /// Index attribute
    #[serde(default)]
    pub key: KeyKind,

    /// Whether the numeric column is declared `UNSIGNED`
    #[serde(default)]
    pub unsigned: bool,

    /// Whether this column is the primary key
    #[serde(default)]
    pub primary_key: bool,
}

impl ColumnDefinition {
    /// Create a new plain column definition.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            key: KeyKind::None,
            unsigned: false,
            primary_key: false,
        }
    }

    /// Create the integer primary key column.
    pub fn primary_key(name: impl Into<String>) -> Self {
        Self {
            primary_key: true,
            ..Self::new(name, ColumnType::Int)
        }
    }

    /// Set the index attribute.
    pub fn with_key(mut self, key: KeyKind) -> Self {
        self.key = key;
        self
    }

    /// Mark the column `UNSIGNED`.
    pub fn with_unsigned(mut self, unsigned: bool) -> Self {
        self.unsigned = unsigned;
        self
    }

    /// Render the column clause used inside `CREATE TABLE`.
    pub fn to_ddl(&self) -> String {
        let mut ddl = format!("`{}` {}", self.name, self.column_type.to_ddl());
        if self.unsigned {
            ddl.push_str(" UNSIGNED");
        }
        if self.primary_key {
            ddl.push_str(" NOT NULL PRIMARY KEY");
        }
        ddl
    }
}

// ============================================================================
// Tables
// ============================================================================

/// One table variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableDefinition {
    /// Table name
    pub name: String,

    /// Number of data rows to insert
    pub rows: usize,

    /// Default character set, if specified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charset: Option<String>,

    /// Storage engine, if specified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,

    /// Number of hash partitions on the primary key, if specified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partitions: Option<u32>,

    /// Column definitions, primary key first
    pub columns: Vec<ColumnDefinition>,
}

impl TableDefinition {
    /// Get the primary key column, if the table has one.
    pub fn primary_key(&self) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.primary_key)
    }

    /// Get all column names.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Render the `CREATE TABLE` statement for this table.
    pub fn to_create_table(&self) -> String {
        let mut clauses: Vec<String> = self.columns.iter().map(|c| c.to_ddl()).collect();
        for column in &self.columns {
            match column.key {
                KeyKind::None => {}
                KeyKind::Key => clauses.push(format!("KEY (`{}`)", column.name)),
                KeyKind::Unique => clauses.push(format!("UNIQUE KEY (`{}`)", column.name)),
            }
        }

        let mut ddl = format!(
            "CREATE TABLE `{}` (\n{}\n)",
            self.name,
            clauses.join(",\n")
        );
        if let Some(engine) = &self.engine {
            ddl.push_str(&format!(" ENGINE={engine}"));
        }
        if let Some(charset) = &self.charset {
            ddl.push_str(&format!(" DEFAULT CHARSET={charset}"));
        }
        if let (Some(partitions), Some(pk)) = (self.partitions, self.primary_key()) {
            ddl.push_str(&format!(
                " PARTITION BY HASH(`{}`) PARTITIONS {partitions}",
                pk.name
            ));
        }
        ddl
    }
}

// ============================================================================
// Database
// ============================================================================

/// Collection of materialized tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSchema {
    pub tables: Vec<TableDefinition>,
}

impl DatabaseSchema {
    pub fn new(tables: Vec<TableDefinition>) -> Self {
        Self { tables }
    }

    /// Parse a schema dump produced by `to_json`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the schema as pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Get all table names in the schema.
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    /// Distinct column definitions across all tables, in first-seen order.
    ///
    /// Generated tables share one column layout, so this is usually the
    /// column list of the first table.
    pub fn columns(&self) -> Vec<&ColumnDefinition> {
        let mut seen = std::collections::HashSet::new();
        self.tables
            .iter()
            .flat_map(|t| t.columns.iter())
            .filter(|c| seen.insert(c.name.as_str()))
            .collect()
    }

    /// Distinct column names across all tables.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns().into_iter().map(|c| c.name.as_str()).collect()
    }

    /// Distinct column names whose type belongs to the given type class.
    pub fn columns_of_class(&self, class: &str) -> Vec<&str> {
        self.columns()
            .into_iter()
            .filter(|c| c.column_type.class() == class)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Distinct column names whose type belongs to the given category.
    pub fn columns_of_category(&self, category: TypeCategory) -> Vec<&str> {
        self.columns()
            .into_iter()
            .filter(|c| c.column_type.category() == category)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Distinct indexed column names (primary key included).
    pub fn key_columns(&self) -> Vec<&str> {
        self.columns()
            .into_iter()
            .filter(|c| c.primary_key || c.key != KeyKind::None)
            .map(|c| c.name.as_str())
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table(name: &str) -> TableDefinition {
        TableDefinition {
            name: name.to_string(),
            rows: 10,
            charset: Some("utf8mb4".to_string()),
            engine: None,
            partitions: Some(4),
            columns: vec![
                ColumnDefinition::primary_key("pk"),
                ColumnDefinition::new("col_int_key_signed", ColumnType::Int)
                    .with_key(KeyKind::Key),
                ColumnDefinition::new("col_varchar_20_undef", ColumnType::VarChar { length: 20 }),
                ColumnDefinition::new("col_date_unique", ColumnType::Date)
                    .with_key(KeyKind::Unique),
            ],
        }
    }

    #[test]
    fn test_create_table_ddl() {
        let ddl = sample_table("table_10_utf8mb4_undef_4").to_create_table();

        assert!(ddl.starts_with("CREATE TABLE `table_10_utf8mb4_undef_4` (\n"));
        assert!(ddl.contains("`pk` INT NOT NULL PRIMARY KEY"));
        assert!(ddl.contains("`col_varchar_20_undef` VARCHAR(20)"));
        assert!(ddl.contains("KEY (`col_int_key_signed`)"));
        assert!(ddl.contains("UNIQUE KEY (`col_date_unique`)"));
        assert!(ddl.ends_with(") DEFAULT CHARSET=utf8mb4 PARTITION BY HASH(`pk`) PARTITIONS 4"));
    }

    #[test]
    fn test_unsigned_column_ddl() {
        let col = ColumnDefinition::new("c", ColumnType::BigInt).with_unsigned(true);
        assert_eq!(col.to_ddl(), "`c` BIGINT UNSIGNED");
    }

    #[test]
    fn test_database_schema_lookups() {
        let schema = DatabaseSchema::new(vec![sample_table("t1"), sample_table("t2")]);

        assert_eq!(schema.table_names(), vec!["t1", "t2"]);

        // Shared layout is reported once
        assert_eq!(schema.column_names().len(), 4);
        assert_eq!(schema.columns_of_class("int"), vec!["pk", "col_int_key_signed"]);
        assert_eq!(
            schema.columns_of_category(TypeCategory::Temporal),
            vec!["col_date_unique"]
        );
        assert_eq!(
            schema.key_columns(),
            vec!["pk", "col_int_key_signed", "col_date_unique"]
        );
    }

    #[test]
    fn test_json_dump() {
        let schema = DatabaseSchema::new(vec![sample_table("t1")]);
        let json = schema.to_json().unwrap();

        assert!(json.contains("\"col_date_unique\""));
        assert_eq!(DatabaseSchema::from_json(&json).unwrap(), schema);
    }
}
