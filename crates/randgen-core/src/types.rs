//! Column types understood by the schema DSL.
//!
//! `ColumnType` is the closed set of type classes a zz `fields.types` entry may
//! name. Every type knows three spellings:
//!
//! - its zz spelling (`varchar(20)`), used for parsing and serialization
//! - its type class (`varchar`), used for `_field_<class>` key functions
//! - its DDL spelling (`VARCHAR(20)`), used for `CREATE TABLE`

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Broad value category of a column type.
///
/// The zz `data` section provides one value list per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeCategory {
    /// Integer, floating point and exact numeric types
    Numeric,
    /// Character and text types
    String,
    /// Date and time types
    Temporal,
}

impl TypeCategory {
    /// All categories in declaration order.
    pub const ALL: [TypeCategory; 3] = [Self::Numeric, Self::String, Self::Temporal];

    /// Name of the category as used by `_field_<category>` key functions.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Numeric => "number",
            Self::String => "string",
            Self::Temporal => "temporal",
        }
    }
}

/// Column type of a generated table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnType {
    // Integer types
    TinyInt,
    SmallInt,
    MediumInt,
    Int,
    BigInt,

    // Approximate numeric
    Float,
    Double,

    /// Exact decimal with specified precision and scale
    Decimal {
        /// Total number of digits
        precision: u8,
        /// Number of digits after the decimal point
        scale: u8,
    },

    /// Boolean, rendered as `BOOL` (an alias of `TINYINT(1)`)
    Bool,

    // String types
    /// Fixed-length character string
    Char {
        /// Maximum length
        length: u16,
    },

    /// Variable-length character string with max length
    VarChar {
        /// Maximum length
        length: u16,
    },

    /// Unlimited text
    Text,

    // Temporal types
    Date,
    Time,
    DateTime,
    Timestamp,
    Year,
}

/// Every type class name, in the order `_field_<class>` key functions are registered.
pub const TYPE_CLASSES: [&str; 17] = [
    "tinyint",
    "smallint",
    "mediumint",
    "int",
    "bigint",
    "float",
    "double",
    "decimal",
    "bool",
    "char",
    "varchar",
    "text",
    "date",
    "time",
    "datetime",
    "timestamp",
    "year",
];

/// Error returned when a type spelling names no known type class.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown column type '{0}'")]
pub struct UnknownTypeError(pub String);

impl ColumnType {
    /// Type class name, without any size arguments.
    pub fn class(&self) -> &'static str {
        match self {
            Self::TinyInt => "tinyint",
            Self::SmallInt => "smallint",
            Self::MediumInt => "mediumint",
            Self::Int => "int",
            Self::BigInt => "bigint",
            Self::Float => "float",
            Self::Double => "double",
            Self::Decimal { .. } => "decimal",
            Self::Bool => "bool",
            Self::Char { .. } => "char",
            Self::VarChar { .. } => "varchar",
            Self::Text => "text",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "datetime",
            Self::Timestamp => "timestamp",
            Self::Year => "year",
        }
    }

    /// Value category of this type.
    pub fn category(&self) -> TypeCategory {
        match self {
            Self::TinyInt
            | Self::SmallInt
            | Self::MediumInt
            | Self::Int
            | Self::BigInt
            | Self::Float
            | Self::Double
            | Self::Decimal { .. }
            | Self::Bool => TypeCategory::Numeric,
            Self::Char { .. } | Self::VarChar { .. } | Self::Text => TypeCategory::String,
            Self::Date | Self::Time | Self::DateTime | Self::Timestamp | Self::Year => {
                TypeCategory::Temporal
            }
        }
    }

    /// Whether a `signed`/`unsigned` attribute applies to this type.
    pub fn accepts_sign(&self) -> bool {
        self.category() == TypeCategory::Numeric && *self != Self::Bool
    }

    /// DDL spelling of the type.
    pub fn to_ddl(&self) -> String {
        match self {
            Self::Decimal { precision, scale } => format!("DECIMAL({precision},{scale})"),
            Self::Char { length } => format!("CHAR({length})"),
            Self::VarChar { length } => format!("VARCHAR({length})"),
            other => other.class().to_uppercase(),
        }
    }

    /// Identifier-safe spelling used inside generated column names.
    ///
    /// `decimal(10,2)` becomes `decimal_10_2` and `varchar(20)` becomes `varchar_20`.
    pub fn name_fragment(&self) -> String {
        match self {
            Self::Decimal { precision, scale } => format!("decimal_{precision}_{scale}"),
            Self::Char { length } => format!("char_{length}"),
            Self::VarChar { length } => format!("varchar_{length}"),
            other => other.class().to_string(),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decimal { precision, scale } => write!(f, "decimal({precision},{scale})"),
            Self::Char { length } => write!(f, "char({length})"),
            Self::VarChar { length } => write!(f, "varchar({length})"),
            other => f.write_str(other.class()),
        }
    }
}

impl FromStr for ColumnType {
    type Err = UnknownTypeError;

    /// Parse the zz spelling of a type.
    ///
    /// Size arguments are optional: `char` is `char(1)`, `varchar` is
    /// `varchar(255)` and `decimal` is `decimal(10,0)`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownTypeError(s.to_string());
        let spelled = s.trim().to_ascii_lowercase();

        let (class, args) = match spelled.find('(') {
            Some(open) => {
                let close = spelled.rfind(')').filter(|&c| c > open).ok_or_else(unknown)?;
                if !spelled[close + 1..].trim().is_empty() {
                    return Err(unknown());
                }
                let args = spelled[open + 1..close]
                    .split(',')
                    .map(|a| a.trim().parse::<u16>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|_| unknown())?;
                (spelled[..open].trim().to_string(), Some(args))
            }
            None => (spelled, None),
        };

        let ty = match (class.as_str(), args.as_deref()) {
            ("tinyint", None) => Self::TinyInt,
            ("smallint", None) => Self::SmallInt,
            ("mediumint", None) => Self::MediumInt,
            ("int" | "integer", None) => Self::Int,
            ("bigint", None) => Self::BigInt,
            ("float", None) => Self::Float,
            ("double", None) => Self::Double,
            ("decimal", None) => Self::Decimal {
                precision: 10,
                scale: 0,
            },
            ("decimal", Some([p])) => Self::Decimal {
                precision: narrow(*p).ok_or_else(unknown)?,
                scale: 0,
            },
            ("decimal", Some([p, s])) if s <= p => Self::Decimal {
                precision: narrow(*p).ok_or_else(unknown)?,
                scale: narrow(*s).ok_or_else(unknown)?,
            },
            ("bool" | "boolean", None) => Self::Bool,
            ("char", None) => Self::Char { length: 1 },
            ("char", Some([n])) => Self::Char { length: *n },
            ("varchar", None) => Self::VarChar { length: 255 },
            ("varchar", Some([n])) => Self::VarChar { length: *n },
            ("text", None) => Self::Text,
            ("date", None) => Self::Date,
            ("time", None) => Self::Time,
            ("datetime", None) => Self::DateTime,
            ("timestamp", None) => Self::Timestamp,
            ("year", None) => Self::Year,
            _ => return Err(unknown()),
        };
        Ok(ty)
    }
}

fn narrow(v: u16) -> Option<u8> {
    u8::try_from(v).ok()
}

// Serialized as the zz spelling so schema dumps read like the DSL that produced them.

impl Serialize for ColumnType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ColumnType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_types() {
        assert_eq!("int".parse::<ColumnType>().unwrap(), ColumnType::Int);
        assert_eq!("BIGINT".parse::<ColumnType>().unwrap(), ColumnType::BigInt);
        assert_eq!(" date ".parse::<ColumnType>().unwrap(), ColumnType::Date);
        assert_eq!("integer".parse::<ColumnType>().unwrap(), ColumnType::Int);
    }

    #[test]
    fn test_parse_sized_types() {
        assert_eq!(
            "varchar(20)".parse::<ColumnType>().unwrap(),
            ColumnType::VarChar { length: 20 }
        );
        assert_eq!(
            "decimal(10, 2)".parse::<ColumnType>().unwrap(),
            ColumnType::Decimal {
                precision: 10,
                scale: 2
            }
        );
        assert_eq!(
            "char".parse::<ColumnType>().unwrap(),
            ColumnType::Char { length: 1 }
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("blob".parse::<ColumnType>().is_err());
        assert!("int(3)".parse::<ColumnType>().is_err());
        assert!("varchar(x)".parse::<ColumnType>().is_err());
        assert!("decimal(2,5)".parse::<ColumnType>().is_err());
        assert!("varchar(10) x".parse::<ColumnType>().is_err());
    }

    #[test]
    fn test_ddl_and_fragments() {
        let ty = ColumnType::Decimal {
            precision: 10,
            scale: 2,
        };
        assert_eq!(ty.to_ddl(), "DECIMAL(10,2)");
        assert_eq!(ty.name_fragment(), "decimal_10_2");
        assert_eq!(ty.class(), "decimal");
        assert_eq!(ColumnType::DateTime.to_ddl(), "DATETIME");
    }

    #[test]
    fn test_categories() {
        assert_eq!(ColumnType::Int.category(), TypeCategory::Numeric);
        assert_eq!(ColumnType::Text.category(), TypeCategory::String);
        assert_eq!(ColumnType::Year.category(), TypeCategory::Temporal);
        assert!(ColumnType::Double.accepts_sign());
        assert!(!ColumnType::Bool.accepts_sign());
        assert!(!ColumnType::Date.accepts_sign());
    }

    #[test]
    fn test_every_class_is_listed() {
        for class in TYPE_CLASSES {
            let ty: ColumnType = class.parse().unwrap();
            assert_eq!(ty.class(), class);
        }
    }

    #[test]
    fn test_serde_uses_zz_spelling() {
        let ty = ColumnType::VarChar { length: 64 };
        let json = serde_json::to_string(&ty).unwrap();
        assert_eq!(json, "\"varchar(64)\"");
        let parsed: ColumnType = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ty);
    }
}
