//! Value generators for data rows and value key functions.
//!
//! Every generator returns a ready-to-emit SQL literal: numbers bare, strings
//! and temporals single-quoted, `NULL` for the null domain.

pub mod numeric;
pub mod string;
pub mod temporal;
pub mod uuid;

use rand::Rng;
use randgen_core::TypeCategory;

/// Named value domain.
///
/// The same names are used in zz `data` lists (`'int'`) and as value key
/// functions in yy grammars (`_int`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Digit,
    Bool,
    TinyInt,
    SmallInt,
    MediumInt,
    Int,
    BigInt,
    Float,
    Double,
    Decimal,
    Letter,
    English,
    Char,
    VarChar,
    Text,
    Uuid,
    Date,
    Time,
    DateTime,
    Timestamp,
    Year,
}

impl ValueKind {
    /// Every value domain, in key function registration order.
    pub const ALL: [ValueKind; 22] = [
        Self::Null,
        Self::Digit,
        Self::Bool,
        Self::TinyInt,
        Self::SmallInt,
        Self::MediumInt,
        Self::Int,
        Self::BigInt,
        Self::Float,
        Self::Double,
        Self::Decimal,
        Self::Letter,
        Self::English,
        Self::Char,
        Self::VarChar,
        Self::Text,
        Self::Uuid,
        Self::Date,
        Self::Time,
        Self::DateTime,
        Self::Timestamp,
        Self::Year,
    ];

    /// Domain name, without the key function underscore.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Digit => "digit",
            Self::Bool => "bool",
            Self::TinyInt => "tinyint",
            Self::SmallInt => "smallint",
            Self::MediumInt => "mediumint",
            Self::Int => "int",
            Self::BigInt => "bigint",
            Self::Float => "float",
            Self::Double => "double",
            Self::Decimal => "decimal",
            Self::Letter => "letter",
            Self::English => "english",
            Self::Char => "char",
            Self::VarChar => "varchar",
            Self::Text => "text",
            Self::Uuid => "uuid",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "datetime",
            Self::Timestamp => "timestamp",
            Self::Year => "year",
        }
    }

    /// Look up a domain by name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    /// Whether values of this domain may fill columns of `category`.
    pub fn fits(&self, category: TypeCategory) -> bool {
        match self {
            Self::Null => true,
            Self::Digit => matches!(category, TypeCategory::Numeric | TypeCategory::String),
            Self::Bool
            | Self::TinyInt
            | Self::SmallInt
            | Self::MediumInt
            | Self::Int
            | Self::BigInt
            | Self::Float
            | Self::Double
            | Self::Decimal => category == TypeCategory::Numeric,
            Self::Letter
            | Self::English
            | Self::Char
            | Self::VarChar
            | Self::Text
            | Self::Uuid => category == TypeCategory::String,
            Self::Date | Self::Time | Self::DateTime | Self::Timestamp | Self::Year => {
                category == TypeCategory::Temporal
            }
        }
    }

    /// Generate one SQL literal. `unsigned` restricts numeric domains to
    /// non-negative values.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R, unsigned: bool) -> String {
        match self {
            Self::Null => "NULL".to_string(),
            Self::Digit => rng.random_range(0..10u8).to_string(),
            Self::Bool => u8::from(rng.random_bool(0.5)).to_string(),
            Self::TinyInt => numeric::generate_int(rng, numeric::IntWidth::Tiny, unsigned),
            Self::SmallInt => numeric::generate_int(rng, numeric::IntWidth::Small, unsigned),
            Self::MediumInt => numeric::generate_int(rng, numeric::IntWidth::Medium, unsigned),
            Self::Int => numeric::generate_int(rng, numeric::IntWidth::Regular, unsigned),
            Self::BigInt => numeric::generate_int(rng, numeric::IntWidth::Big, unsigned),
            Self::Float => numeric::generate_float(rng, 4, unsigned),
            Self::Double => numeric::generate_float(rng, 8, unsigned),
            Self::Decimal => numeric::generate_decimal(rng, 10, 2, unsigned),
            Self::Letter => string::generate_letter(rng),
            Self::English => string::generate_english(rng),
            Self::Char => string::generate_chars(rng, 1, 10),
            Self::VarChar => string::generate_chars(rng, 0, 20),
            Self::Text => string::generate_chars(rng, 0, 64),
            Self::Uuid => uuid::generate_uuid_v4(rng),
            Self::Date => temporal::generate_date(rng),
            Self::Time => temporal::generate_time(rng),
            Self::DateTime => temporal::generate_datetime(rng),
            Self::Timestamp => temporal::generate_timestamp(rng),
            Self::Year => temporal::generate_year(rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_names_round_trip() {
        for kind in ValueKind::ALL {
            assert_eq!(ValueKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ValueKind::from_name("INT"), Some(ValueKind::Int));
        assert_eq!(ValueKind::from_name("blob"), None);
    }

    #[test]
    fn test_every_domain_fills_some_category() {
        for kind in ValueKind::ALL {
            assert!(
                TypeCategory::ALL.iter().any(|c| kind.fits(*c)),
                "{kind:?} fits no category"
            );
        }
        assert!(ValueKind::Digit.fits(TypeCategory::String));
        assert!(!ValueKind::English.fits(TypeCategory::Numeric));
    }

    #[test]
    fn test_deterministic_generation() {
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);

        for kind in ValueKind::ALL {
            assert_eq!(kind.generate(&mut rng1, false), kind.generate(&mut rng2, false));
        }
    }

    #[test]
    fn test_literal_shapes() {
        let mut rng = StdRng::seed_from_u64(7);

        assert_eq!(ValueKind::Null.generate(&mut rng, false), "NULL");
        let digit = ValueKind::Digit.generate(&mut rng, false);
        assert!(digit.len() == 1 && digit.chars().all(|c| c.is_ascii_digit()));
        let english = ValueKind::English.generate(&mut rng, false);
        assert!(english.starts_with('\'') && english.ends_with('\''));
        let date = ValueKind::Date.generate(&mut rng, false);
        assert_eq!(date.len(), "'2000-01-01'".len());
    }

    #[test]
    fn test_unsigned_numbers_are_non_negative() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            for kind in [ValueKind::Int, ValueKind::BigInt, ValueKind::Double, ValueKind::Decimal] {
                let value = kind.generate(&mut rng, true);
                assert!(!value.starts_with('-'), "{kind:?} produced {value}");
            }
        }
    }
}
