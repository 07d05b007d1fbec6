//! zz execution: materialize tables, render DDL and data, build the registry.

use crate::error::ZzError;
use crate::keyfuns::registry_for_schema;
use crate::zz::{DataConfig, DataItem, FieldsConfig, TablesConfig, ZzConfig};
use rand::Rng;
use randgen_core::{
    ColumnDefinition, DatabaseSchema, KeyFunRegistry, TableDefinition,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Number of rows per generated `INSERT` statement.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Everything a zz run produces.
#[derive(Debug)]
pub struct ZzOutput {
    /// `CREATE TABLE` statements followed by `INSERT` statements, without terminators
    pub ddls: Vec<String>,
    /// Key functions bound to `schema`, plus the value generators
    pub registry: KeyFunRegistry,
    /// Materialized tables
    pub schema: Arc<DatabaseSchema>,
}

/// Interpret zz text. Empty text uses the built-in default zz.
///
/// All row data is drawn from `rng`, so a seeded rng reproduces the output.
pub fn interpret<R: Rng + ?Sized>(zz_text: &str, rng: &mut R) -> Result<ZzOutput, ZzError> {
    let config = ZzConfig::parse(zz_text)?;
    Ok(interpret_config(&config, rng))
}

/// Execute an already parsed zz configuration.
pub fn interpret_config<R: Rng + ?Sized>(config: &ZzConfig, rng: &mut R) -> ZzOutput {
    let columns = build_columns(&config.fields);
    let tables = build_tables(&config.tables, &columns);
    info!(
        "Materializing {} tables with {} columns each",
        tables.len(),
        columns.len()
    );

    let mut ddls: Vec<String> = tables.iter().map(TableDefinition::to_create_table).collect();
    for table in &tables {
        let inserts = generate_inserts(table, &config.data, rng);
        debug!(
            "Generated {} rows in {} INSERT statements for {}",
            table.rows,
            inserts.len(),
            table.name
        );
        ddls.extend(inserts);
    }

    let schema = Arc::new(DatabaseSchema::new(tables));
    let registry = registry_for_schema(Arc::clone(&schema));

    ZzOutput {
        ddls,
        registry,
        schema,
    }
}

/// Column layout shared by every table: `pk` then `types × keys × sign`.
fn build_columns(fields: &FieldsConfig) -> Vec<ColumnDefinition> {
    let mut columns = vec![ColumnDefinition::primary_key("pk")];

    for column_type in &fields.types {
        for key in &fields.keys {
            let base = format!("col_{}_{}", column_type.name_fragment(), key.name());
            if !column_type.accepts_sign() {
                columns.push(ColumnDefinition::new(base, column_type.clone()).with_key(*key));
                continue;
            }
            for &unsigned in &fields.signs {
                let sign = if unsigned { "unsigned" } else { "signed" };
                columns.push(
                    ColumnDefinition::new(format!("{base}_{sign}"), column_type.clone())
                        .with_key(*key)
                        .with_unsigned(unsigned),
                );
            }
        }
    }

    columns
}

fn build_tables(tables: &TablesConfig, columns: &[ColumnDefinition]) -> Vec<TableDefinition> {
    let mut out = Vec::new();

    for &rows in &tables.rows {
        for charset in &tables.charsets {
            for engine in &tables.engines {
                for partitions in &tables.partitions {
                    let name = format!(
                        "table_{rows}_{}_{}_{}",
                        name_part(charset.as_deref()),
                        name_part(engine.as_deref()),
                        partitions.map_or_else(|| "undef".to_string(), |p| p.to_string()),
                    );
                    out.push(TableDefinition {
                        name,
                        rows,
                        charset: charset.clone(),
                        engine: engine.clone(),
                        partitions: *partitions,
                        columns: columns.to_vec(),
                    });
                }
            }
        }
    }

    out
}

/// Identifier-safe spelling of an optional table option.
fn name_part(value: Option<&str>) -> String {
    match value {
        None => "undef".to_string(),
        Some(v) => v
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect(),
    }
}

/// Render `INSERT` statements for every row of `table`, in batches.
fn generate_inserts<R: Rng + ?Sized>(
    table: &TableDefinition,
    data: &DataConfig,
    rng: &mut R,
) -> Vec<String> {
    let column_list = table
        .columns
        .iter()
        .map(|c| format!("`{}`", c.name))
        .collect::<Vec<_>>()
        .join(", ");

    let mut statements = Vec::new();
    let mut start = 1;
    while start <= table.rows {
        let end = (start + DEFAULT_BATCH_SIZE - 1).min(table.rows);
        let rows: Vec<String> = (start..=end)
            .map(|pk| format!("({})", row_values(table, data, pk, rng).join(", ")))
            .collect();
        statements.push(format!(
            "INSERT INTO `{}` ({column_list}) VALUES {}",
            table.name,
            rows.join(", ")
        ));
        start = end + 1;
    }

    statements
}

fn row_values<R: Rng + ?Sized>(
    table: &TableDefinition,
    data: &DataConfig,
    pk: usize,
    rng: &mut R,
) -> Vec<String> {
    table
        .columns
        .iter()
        .map(|column| {
            if column.primary_key {
                return pk.to_string();
            }
            let items = data.for_category(column.column_type.category());
            if items.is_empty() {
                return "NULL".to_string();
            }
            match &items[rng.random_range(0..items.len())] {
                DataItem::Domain(kind) => kind.generate(rng, column.unsigned),
                DataItem::Literal(literal) => literal.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use randgen_core::{ColumnType, KeyKind};

    const SMALL_ZZ: &str = r#"
        tables = {
            rows = {5},
            charsets = {'undef'},
            partitions = {'undef'},
        }
        fields = {
            types = {'int', 'varchar(10)'},
            keys = {'undef'},
            sign = {'signed'},
        }
        data = {
            numbers = {'int'},
            strings = {'letter'},
        }
    "#;

    #[test]
    fn test_small_zz() {
        let mut rng = StdRng::seed_from_u64(42);
        let output = interpret(SMALL_ZZ, &mut rng).unwrap();

        assert_eq!(output.schema.table_names(), vec!["table_5_undef_undef_undef"]);
        assert_eq!(
            output.schema.column_names(),
            vec!["pk", "col_int_undef_signed", "col_varchar_10_undef"]
        );
        // one CREATE TABLE and one INSERT
        assert_eq!(output.ddls.len(), 2);
        assert!(output.ddls[0].starts_with("CREATE TABLE `table_5_undef_undef_undef`"));
        assert!(output.ddls[1].starts_with(
            "INSERT INTO `table_5_undef_undef_undef` (`pk`, `col_int_undef_signed`, `col_varchar_10_undef`) VALUES (1, "
        ));
        assert!(output.ddls[1].contains("(5, "));
    }

    #[test]
    fn test_default_zz_table_product() {
        let mut rng = StdRng::seed_from_u64(42);
        let output = interpret("", &mut rng).unwrap();

        let config = ZzConfig::builtin().unwrap();
        let expected = config.tables.rows.len()
            * config.tables.charsets.len()
            * config.tables.engines.len()
            * config.tables.partitions.len();
        assert_eq!(output.schema.tables.len(), expected);

        let creates = output
            .ddls
            .iter()
            .filter(|d| d.starts_with("CREATE TABLE"))
            .count();
        assert_eq!(creates, expected);
        assert!(output.registry.contains("_table"));
        assert!(output.registry.contains("_field_int"));
    }

    #[test]
    fn test_insert_batching() {
        let zz = r#"
            tables = { rows = {250} }
            fields = { types = {'int'}, keys = {'undef'}, sign = {'signed'} }
        "#;
        let mut rng = StdRng::seed_from_u64(1);
        let output = interpret(zz, &mut rng).unwrap();

        let tables = output.schema.tables.len();
        let inserts: Vec<&String> = output
            .ddls
            .iter()
            .filter(|d| d.starts_with("INSERT"))
            .collect();
        assert_eq!(inserts.len(), tables * 3);
        assert!(inserts[2].contains("(201, "));
        assert!(inserts[2].contains("(250, "));
        assert!(!inserts[2].contains("(200, "));
    }

    #[test]
    fn test_sign_only_for_numeric_columns() {
        let fields = FieldsConfig {
            types: vec![ColumnType::Int, ColumnType::Date],
            keys: vec![KeyKind::None, KeyKind::Unique],
            signs: vec![false, true],
        };
        let columns = build_columns(&fields);
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();

        assert_eq!(
            names,
            vec![
                "pk",
                "col_int_undef_signed",
                "col_int_undef_unsigned",
                "col_int_unique_signed",
                "col_int_unique_unsigned",
                "col_date_undef",
                "col_date_unique",
            ]
        );
        assert!(columns[2].unsigned);
        assert_eq!(columns[3].key, KeyKind::Unique);
    }

    #[test]
    fn test_table_name_sanitized() {
        assert_eq!(name_part(Some("utf8mb4")), "utf8mb4");
        assert_eq!(name_part(Some("My-ISAM")), "my_isam");
        assert_eq!(name_part(None), "undef");
    }

    #[test]
    fn test_deterministic_output() {
        let mut rng1 = StdRng::seed_from_u64(7);
        let mut rng2 = StdRng::seed_from_u64(7);

        let a = interpret("", &mut rng1).unwrap();
        let b = interpret("", &mut rng2).unwrap();
        assert_eq!(a.ddls, b.ddls);
    }

    #[test]
    fn test_zz_error_propagates() {
        let mut rng = StdRng::seed_from_u64(7);
        let err = interpret("tables = { rows = {'x'} }", &mut rng).unwrap_err();
        assert!(matches!(err, ZzError::Semantic { .. }));
    }
}
