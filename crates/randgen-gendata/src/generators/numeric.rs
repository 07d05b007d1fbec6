//! Numeric value generators.

use rand::Rng;

/// Probability of emitting a boundary value instead of a uniform draw.
const BOUNDARY_PROBABILITY: f64 = 0.1;

/// Storage width of an integer column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntWidth {
    Tiny,
    Small,
    Medium,
    Regular,
    Big,
}

impl IntWidth {
    /// Inclusive value range for the width.
    pub fn range(self, unsigned: bool) -> (i128, i128) {
        let bits = match self {
            Self::Tiny => 8,
            Self::Small => 16,
            Self::Medium => 24,
            Self::Regular => 32,
            Self::Big => 64,
        };
        if unsigned {
            (0, (1i128 << bits) - 1)
        } else {
            (-(1i128 << (bits - 1)), (1i128 << (bits - 1)) - 1)
        }
    }
}

/// Generate a random integer for the given width.
///
/// Boundary values (min, max, zero) are favoured so that overflow and
/// sign handling get exercised.
pub fn generate_int<R: Rng + ?Sized>(rng: &mut R, width: IntWidth, unsigned: bool) -> String {
    let (min, max) = width.range(unsigned);

    if rng.random_bool(BOUNDARY_PROBABILITY) {
        let boundaries = [min, max, 0];
        return boundaries[rng.random_range(0..boundaries.len())].to_string();
    }

    rng.random_range(min..=max).to_string()
}

/// Generate a random floating point literal with `digits` fractional digits.
pub fn generate_float<R: Rng + ?Sized>(rng: &mut R, digits: usize, unsigned: bool) -> String {
    let min = if unsigned { 0.0 } else { -1.0e6 };
    let value: f64 = rng.random_range(min..=1.0e6);
    format!("{value:.digits$}")
}

/// Generate a random decimal literal fitting `DECIMAL(precision, scale)`.
pub fn generate_decimal<R: Rng + ?Sized>(
    rng: &mut R,
    precision: u32,
    scale: u32,
    unsigned: bool,
) -> String {
    let integral_digits = precision.saturating_sub(scale).min(18);
    let bound = 10i64.pow(integral_digits) - 1;
    let integral = if unsigned {
        rng.random_range(0..=bound)
    } else {
        rng.random_range(-bound..=bound)
    };

    if scale == 0 {
        return integral.to_string();
    }

    let fraction = rng.random_range(0..10u64.pow(scale.min(18)));
    let sign = if integral == 0 && !unsigned && rng.random_bool(0.5) {
        "-"
    } else {
        ""
    };
    format!("{sign}{integral}.{fraction:0width$}", width = scale as usize)
}
