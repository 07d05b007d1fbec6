//! Temporal value generators.

use super::string::quote;
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime};
use rand::Rng;

/// First second accepted by a `TIMESTAMP` column (1970-01-01 00:00:01 UTC).
const TIMESTAMP_MIN: i64 = 1;

/// Last second accepted by a `TIMESTAMP` column (2038-01-19 03:14:07 UTC).
const TIMESTAMP_MAX: i64 = 2_147_483_647;

/// Last second of 9999-12-31, the upper bound of `DATETIME`.
const DATETIME_MAX: i64 = 253_402_300_799;

/// Seconds of 1000-01-01 00:00:00, the lower bound of `DATETIME`.
const DATETIME_MIN: i64 = -30_610_224_000;

fn datetime_between<R: Rng + ?Sized>(rng: &mut R, start: i64, end: i64) -> String {
    let secs = rng.random_range(start..=end);
    match DateTime::from_timestamp(secs, 0) {
        Some(dt) => quote(&dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        None => quote("1970-01-01 00:00:01"),
    }
}

/// A quoted `DATETIME` literal between years 1000 and 9999.
pub fn generate_datetime<R: Rng + ?Sized>(rng: &mut R) -> String {
    datetime_between(rng, DATETIME_MIN, DATETIME_MAX)
}

/// A quoted `TIMESTAMP` literal inside the 32-bit epoch range.
pub fn generate_timestamp<R: Rng + ?Sized>(rng: &mut R) -> String {
    datetime_between(rng, TIMESTAMP_MIN, TIMESTAMP_MAX)
}

/// A quoted `DATE` literal between years 1000 and 9999.
pub fn generate_date<R: Rng + ?Sized>(rng: &mut R) -> String {
    let min = NaiveDate::from_ymd_opt(1000, 1, 1).map_or(0, |d| d.num_days_from_ce());
    let max = NaiveDate::from_ymd_opt(9999, 12, 31).map_or(0, |d| d.num_days_from_ce());
    let days = rng.random_range(min..=max);

    match NaiveDate::from_num_days_from_ce_opt(days) {
        Some(date) => quote(&date.format("%Y-%m-%d").to_string()),
        None => quote("2000-01-01"),
    }
}

/// A quoted `TIME` literal within one day.
pub fn generate_time<R: Rng + ?Sized>(rng: &mut R) -> String {
    let secs = rng.random_range(0..86_400u32);
    match NaiveTime::from_num_seconds_from_midnight_opt(secs, 0) {
        Some(time) => quote(&time.format("%H:%M:%S").to_string()),
        None => quote("00:00:00"),
    }
}

/// A `YEAR` value in the range the column type accepts.
pub fn generate_year<R: Rng + ?Sized>(rng: &mut R) -> String {
    rng.random_range(1901..=2155u32).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn unquote(s: &str) -> &str {
        s.trim_matches('\'')
    }

    #[test]
    fn test_generate_timestamp_range() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let value = generate_timestamp(&mut rng);
            let dt = NaiveDateTime::parse_from_str(unquote(&value), "%Y-%m-%d %H:%M:%S").unwrap();
            assert!(dt.year() >= 1970 && dt.year() <= 2038);
        }
    }

    #[test]
    fn test_generate_date_and_datetime() {
        let mut rng = StdRng::seed_from_u64(42);

        let date = generate_date(&mut rng);
        let parsed = NaiveDate::parse_from_str(unquote(&date), "%Y-%m-%d").unwrap();
        assert!((1000..=9999).contains(&parsed.year()));

        let datetime = generate_datetime(&mut rng);
        let parsed =
            NaiveDateTime::parse_from_str(unquote(&datetime), "%Y-%m-%d %H:%M:%S").unwrap();
        assert!((1000..=9999).contains(&parsed.year()));
    }

    #[test]
    fn test_generate_time_and_year() {
        let mut rng = StdRng::seed_from_u64(42);

        let time = generate_time(&mut rng);
        assert!(NaiveTime::parse_from_str(unquote(&time), "%H:%M:%S").is_ok());

        let year: u32 = generate_year(&mut rng).parse().unwrap();
        assert!((1901..=2155).contains(&year));
    }

    #[test]
    fn test_deterministic_generation() {
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);

        assert_eq!(generate_datetime(&mut rng1), generate_datetime(&mut rng2));
        assert_eq!(generate_date(&mut rng1), generate_date(&mut rng2));
    }
}
