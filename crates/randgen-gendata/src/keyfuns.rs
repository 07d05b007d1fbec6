//! Key function registration.
//!
//! Schema pickers (`_table`, `_field`, `_field_<class>` ...) choose a name
//! uniformly from the materialized schema. Value generators (`_int`,
//! `_english` ...) wrap [`ValueKind`].

use crate::generators::ValueKind;
use rand::{Rng, RngCore};
use randgen_core::{DatabaseSchema, KeyFunError, KeyFunRegistry, TypeCategory, TYPE_CLASSES};
use std::sync::Arc;

/// Build the registry for `schema`.
///
/// Every picker is registered even when it has no candidates; calling such a
/// picker fails with [`KeyFunError::NoCandidates`].
pub fn registry_for_schema(schema: Arc<DatabaseSchema>) -> KeyFunRegistry {
    let mut registry = KeyFunRegistry::new();

    register_picker(&mut registry, "_table", "table", owned(schema.table_names()));
    register_picker(&mut registry, "_field", "field", owned(schema.column_names()));
    for class in TYPE_CLASSES {
        register_picker(
            &mut registry,
            format!("_field_{class}"),
            format!("{class} field"),
            owned(schema.columns_of_class(class)),
        );
    }
    for category in TypeCategory::ALL {
        register_picker(
            &mut registry,
            format!("_field_{}", category.name()),
            format!("{} field", category.name()),
            owned(schema.columns_of_category(category)),
        );
    }
    register_picker(&mut registry, "_field_key", "indexed field", owned(schema.key_columns()));

    register_value_generators(&mut registry);
    registry
}

/// Register `_<domain>` for every [`ValueKind`].
pub fn register_value_generators(registry: &mut KeyFunRegistry) {
    for kind in ValueKind::ALL {
        registry.register_fn(format!("_{}", kind.name()), move |rng: &mut dyn RngCore| {
            Ok(kind.generate(rng, false))
        });
    }
}

fn owned(names: Vec<&str>) -> Vec<String> {
    names.into_iter().map(str::to_string).collect()
}

fn register_picker(
    registry: &mut KeyFunRegistry,
    name: impl Into<String>,
    what: impl Into<String>,
    candidates: Vec<String>,
) {
    let what = what.into();
    registry.register_fn(name, move |rng: &mut dyn RngCore| {
        if candidates.is_empty() {
            return Err(KeyFunError::no_candidates(what.clone()));
        }
        Ok(candidates[rng.random_range(0..candidates.len())].clone())
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use randgen_core::{ColumnDefinition, ColumnType, KeyKind, TableDefinition};

    fn sample_schema() -> Arc<DatabaseSchema> {
        let columns = vec![
            ColumnDefinition::primary_key("pk"),
            ColumnDefinition::new("col_int_key", ColumnType::Int).with_key(KeyKind::Key),
            ColumnDefinition::new("col_varchar_20", ColumnType::VarChar { length: 20 }),
        ];
        Arc::new(DatabaseSchema::new(vec![
            TableDefinition {
                name: "t1".to_string(),
                rows: 1,
                charset: None,
                engine: None,
                partitions: None,
                columns: columns.clone(),
            },
            TableDefinition {
                name: "t2".to_string(),
                rows: 1,
                charset: None,
                engine: None,
                partitions: None,
                columns,
            },
        ]))
    }

    fn call(registry: &KeyFunRegistry, name: &str, rng: &mut StdRng) -> Result<String, KeyFunError> {
        let id = registry.resolve(name).unwrap();
        registry.call(id, rng)
    }

    #[test]
    fn test_registration_contract() {
        let registry = registry_for_schema(Arc::new(DatabaseSchema::default()));

        for name in ["_table", "_field", "_field_number", "_field_string", "_field_temporal", "_field_key"] {
            assert!(registry.contains(name), "missing {name}");
        }
        for class in TYPE_CLASSES {
            assert!(registry.contains(&format!("_field_{class}")));
        }
        for kind in ValueKind::ALL {
            assert!(registry.contains(&format!("_{}", kind.name())));
        }
    }

    #[test]
    fn test_pickers_choose_from_schema() {
        let registry = registry_for_schema(sample_schema());
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..20 {
            let table = call(&registry, "_table", &mut rng).unwrap();
            assert!(table == "t1" || table == "t2");
        }
        let int_field = call(&registry, "_field_int", &mut rng).unwrap();
        assert!(int_field == "pk" || int_field == "col_int_key");
        assert_eq!(call(&registry, "_field_varchar", &mut rng).unwrap(), "col_varchar_20");
        assert_eq!(call(&registry, "_field_string", &mut rng).unwrap(), "col_varchar_20");

        let key = call(&registry, "_field_key", &mut rng).unwrap();
        assert!(key == "pk" || key == "col_int_key");
    }

    #[test]
    fn test_empty_schema_has_no_candidates() {
        let registry = registry_for_schema(Arc::new(DatabaseSchema::default()));
        let mut rng = StdRng::seed_from_u64(42);

        let err = call(&registry, "_table", &mut rng).unwrap_err();
        assert_eq!(err, KeyFunError::no_candidates("table"));
        assert_eq!(err.to_string(), "no table available");

        let err = call(&registry, "_field_temporal", &mut rng).unwrap_err();
        assert!(matches!(err, KeyFunError::NoCandidates { .. }));

        // value generators need no schema
        assert!(call(&registry, "_digit", &mut rng).is_ok());
    }
}
