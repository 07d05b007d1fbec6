//! Typed zz configuration.
//!
//! A [`ZzConfig`] is built by overlaying the keys present in a zz document on
//! top of the built-in default zz. Every key replaces the default list as a
//! whole; absent keys keep the default.

use super::parser::{parse_document, Entry, Node, Section, Value};
use crate::error::ZzError;
use crate::generators::string::quote;
use crate::generators::ValueKind;
use randgen_core::{ColumnType, KeyKind, TypeCategory};

/// The zz used when no zz text is supplied.
pub const DEFAULT_ZZ: &str = include_str!("default.zz");

/// Table variant options. Tables are the cartesian product of all lists.
#[derive(Debug, Clone, PartialEq)]
pub struct TablesConfig {
    pub rows: Vec<usize>,
    /// `None` is `'undef'`: the option is left out of the DDL
    pub charsets: Vec<Option<String>>,
    pub engines: Vec<Option<String>>,
    pub partitions: Vec<Option<u32>>,
}

/// Column variant options. Columns are the cartesian product of all lists.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldsConfig {
    pub types: Vec<ColumnType>,
    pub keys: Vec<KeyKind>,
    /// `true` is `'unsigned'`; only numeric types take a sign
    pub signs: Vec<bool>,
}

/// One entry of a `data` list.
#[derive(Debug, Clone, PartialEq)]
pub enum DataItem {
    /// Generate a value from a named domain (`'int'`, `'english'`, `'null'` ...)
    Domain(ValueKind),
    /// Use a fixed SQL literal
    Literal(String),
}

/// Value lists per column category.
#[derive(Debug, Clone, PartialEq)]
pub struct DataConfig {
    pub numbers: Vec<DataItem>,
    pub strings: Vec<DataItem>,
    pub temporals: Vec<DataItem>,
}

impl DataConfig {
    /// Value list for a column category.
    pub fn for_category(&self, category: TypeCategory) -> &[DataItem] {
        match category {
            TypeCategory::Numeric => &self.numbers,
            TypeCategory::String => &self.strings,
            TypeCategory::Temporal => &self.temporals,
        }
    }
}

/// Fully resolved zz configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ZzConfig {
    pub tables: TablesConfig,
    pub fields: FieldsConfig,
    pub data: DataConfig,
}

impl ZzConfig {
    /// Parse zz text, filling unspecified keys from [`DEFAULT_ZZ`].
    pub fn parse(text: &str) -> Result<Self, ZzError> {
        let mut config = Self::builtin()?;
        config.overlay(&parse_document(text)?)?;
        Ok(config)
    }

    /// The configuration described by [`DEFAULT_ZZ`].
    pub fn builtin() -> Result<Self, ZzError> {
        let mut config = Self {
            tables: TablesConfig {
                rows: Vec::new(),
                charsets: Vec::new(),
                engines: Vec::new(),
                partitions: Vec::new(),
            },
            fields: FieldsConfig {
                types: Vec::new(),
                keys: Vec::new(),
                signs: Vec::new(),
            },
            data: DataConfig {
                numbers: Vec::new(),
                strings: Vec::new(),
                temporals: Vec::new(),
            },
        };
        config.overlay(&parse_document(DEFAULT_ZZ)?)?;
        Ok(config)
    }

    fn overlay(&mut self, sections: &[Section]) -> Result<(), ZzError> {
        for section in sections {
            if !matches!(section.name.as_str(), "tables" | "fields" | "data") {
                return Err(ZzError::semantic(
                    section.position,
                    format!("unknown section '{}'", section.name),
                ));
            }

            for entry in &section.entries {
                let Some((key, key_position)) = &entry.key else {
                    return Err(ZzError::semantic(
                        entry.node.position,
                        format!("section '{}' only takes 'key = {{...}}' entries", section.name),
                    ));
                };
                let items = list_items(key, &entry.node)?;

                match (section.name.as_str(), key.as_str()) {
                    ("tables", "rows") => self.tables.rows = map_items(items, row_count)?,
                    ("tables", "charsets") => {
                        self.tables.charsets = map_items(items, |n| optional_name(n, "charset"))?
                    }
                    ("tables", "engines") => {
                        self.tables.engines = map_items(items, |n| optional_name(n, "engine"))?
                    }
                    ("tables", "partitions") => {
                        self.tables.partitions = map_items(items, partition_count)?
                    }
                    ("fields", "types") => self.fields.types = map_items(items, column_type)?,
                    ("fields", "keys") => self.fields.keys = map_items(items, key_kind)?,
                    ("fields", "sign") => self.fields.signs = map_items(items, sign)?,
                    ("data", "numbers") => {
                        self.data.numbers =
                            map_items(items, |n| data_item(n, TypeCategory::Numeric))?
                    }
                    ("data", "strings") => {
                        self.data.strings =
                            map_items(items, |n| data_item(n, TypeCategory::String))?
                    }
                    ("data", "temporals") => {
                        self.data.temporals =
                            map_items(items, |n| data_item(n, TypeCategory::Temporal))?
                    }
                    _ => {
                        return Err(ZzError::semantic(
                            *key_position,
                            format!("unknown key '{key}' in section '{}'", section.name),
                        ))
                    }
                }
            }
        }
        Ok(())
    }
}

/// Unkeyed scalar items of a `key = {...}` list.
fn list_items<'a>(key: &str, node: &'a Node) -> Result<Vec<&'a Node>, ZzError> {
    let Value::Table(entries) = &node.value else {
        return Err(ZzError::semantic(
            node.position,
            format!("'{key}' must be a list"),
        ));
    };
    if entries.is_empty() {
        return Err(ZzError::semantic(
            node.position,
            format!("'{key}' must not be empty"),
        ));
    }

    entries
        .iter()
        .map(|Entry { key: item_key, node }| match (item_key, &node.value) {
            (Some((_, position)), _) => Err(ZzError::semantic(
                *position,
                format!("'{key}' takes plain values, not 'name = value' pairs"),
            )),
            (None, Value::Table(_)) => Err(ZzError::semantic(
                node.position,
                format!("'{key}' does not take nested lists"),
            )),
            (None, _) => Ok(node),
        })
        .collect()
}

/// Convert items, rejecting duplicates.
fn map_items<T, F>(items: Vec<&Node>, convert: F) -> Result<Vec<T>, ZzError>
where
    T: PartialEq,
    F: Fn(&Node) -> Result<T, ZzError>,
{
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for node in items {
        let value = convert(node)?;
        if out.contains(&value) {
            return Err(ZzError::semantic(node.position, "duplicate list entry"));
        }
        out.push(value);
    }
    Ok(out)
}

fn text_of(node: &Node) -> &str {
    match &node.value {
        Value::Str(s) | Value::Number(s) | Value::Ident(s) => s,
        Value::Table(_) => "",
    }
}

fn is_undef(node: &Node) -> bool {
    matches!(&node.value, Value::Str(s) | Value::Ident(s) if s.eq_ignore_ascii_case("undef"))
}

fn row_count(node: &Node) -> Result<usize, ZzError> {
    match &node.value {
        Value::Number(n) => n.parse().map_err(|_| {
            ZzError::semantic(node.position, format!("invalid row count {n}"))
        }),
        _ => Err(ZzError::semantic(
            node.position,
            format!("row count must be a non-negative integer, found '{}'", text_of(node)),
        )),
    }
}

fn partition_count(node: &Node) -> Result<Option<u32>, ZzError> {
    if is_undef(node) {
        return Ok(None);
    }
    let parsed = match &node.value {
        Value::Number(n) | Value::Str(n) => n.parse::<u32>().ok().filter(|&p| p > 0),
        _ => None,
    };
    parsed.map(Some).ok_or_else(|| {
        ZzError::semantic(
            node.position,
            format!("partitions must be 'undef' or a positive integer, found '{}'", text_of(node)),
        )
    })
}

fn optional_name(node: &Node, what: &str) -> Result<Option<String>, ZzError> {
    if is_undef(node) {
        return Ok(None);
    }
    match &node.value {
        Value::Str(s) | Value::Ident(s)
            if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') =>
        {
            Ok(Some(s.clone()))
        }
        _ => Err(ZzError::semantic(
            node.position,
            format!("invalid {what} name '{}'", text_of(node)),
        )),
    }
}

fn column_type(node: &Node) -> Result<ColumnType, ZzError> {
    text_of(node)
        .parse()
        .map_err(|e: randgen_core::UnknownTypeError| ZzError::semantic(node.position, e.to_string()))
}

fn key_kind(node: &Node) -> Result<KeyKind, ZzError> {
    match text_of(node).to_ascii_lowercase().as_str() {
        "undef" => Ok(KeyKind::None),
        "key" => Ok(KeyKind::Key),
        "unique" => Ok(KeyKind::Unique),
        other => Err(ZzError::semantic(
            node.position,
            format!("unknown key kind '{other}', expected 'undef', 'key' or 'unique'"),
        )),
    }
}

fn sign(node: &Node) -> Result<bool, ZzError> {
    match text_of(node).to_ascii_lowercase().as_str() {
        "signed" => Ok(false),
        "unsigned" => Ok(true),
        other => Err(ZzError::semantic(
            node.position,
            format!("unknown sign '{other}', expected 'signed' or 'unsigned'"),
        )),
    }
}

fn data_item(node: &Node, category: TypeCategory) -> Result<DataItem, ZzError> {
    if let Value::Number(n) = &node.value {
        return Ok(DataItem::Literal(n.clone()));
    }

    let name = text_of(node);
    match ValueKind::from_name(name) {
        Some(kind) if kind.fits(category) => Ok(DataItem::Domain(kind)),
        Some(_) => Err(ZzError::semantic(
            node.position,
            format!("value domain '{name}' cannot fill {} columns", category.name()),
        )),
        // a quoted string that names no domain is a literal value
        None if matches!(node.value, Value::Str(_)) => Ok(DataItem::Literal(quote(name))),
        None => Err(ZzError::semantic(
            node.position,
            format!("unknown value domain '{name}'"),
        )),
    }
}
