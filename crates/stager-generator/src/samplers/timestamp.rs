//! Timestamp samplers.

use super::int_range;
use chrono::{DateTime, NaiveDate, Utc};
use rand::RngCore;

/// A sampled instant, second precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn from_unix(secs: i64) -> Self {
        Self(secs)
    }

    pub fn unix(&self) -> i64 {
        self.0
    }

    fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.0, 0)
    }

    /// ISO 8601 / RFC 3339, e.g. `2013-07-15T10:22:31+00:00`.
    pub fn to_rfc3339(&self) -> String {
        self.to_datetime()
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_else(|| self.0.to_string())
    }

    /// `YYYY-MM-DD`
    pub fn date(&self) -> String {
        self.format("%Y-%m-%d")
    }

    /// `YYYY-MM-DD HH:MM:SS`
    pub fn datetime(&self) -> String {
        self.format("%Y-%m-%d %H:%M:%S")
    }

    pub fn year(&self) -> i32 {
        use chrono::Datelike;
        self.to_datetime().map(|dt| dt.year()).unwrap_or(1970)
    }

    fn format(&self, fmt: &str) -> String {
        self.to_datetime()
            .map(|dt| dt.format(fmt).to_string())
            .unwrap_or_else(|| self.0.to_string())
    }
}

/// Unix seconds of `year-01-01T00:00:00Z`.
pub fn year_start(year: i32) -> i64 {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or(0)
}

/// Uniform instant in `[start, end)` Unix seconds. One draw.
pub fn timestamp_between<R: RngCore + ?Sized>(start: i64, end: i64, rng: &mut R) -> Timestamp {
    if end <= start {
        return Timestamp(start);
    }
    Timestamp(int_range(start, end - 1, rng))
}

/// Uniform instant from Jan 1 of `start_year` to the last second of `end_year`.
///
/// A year past `i32::MAX` collapses the range to its start.
pub fn timestamp_range<R: RngCore + ?Sized>(
    start_year: i32,
    end_year: i32,
    rng: &mut R,
) -> Timestamp {
    let start = year_start(start_year);
    let end = end_year.checked_add(1).map_or(start, year_start);
    timestamp_between(start, end, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Mulberry32;

    #[test]
    fn test_year_start() {
        assert_eq!(year_start(1970), 0);
        assert_eq!(year_start(2013), 1_356_998_400);
    }

    #[test]
    fn test_timestamp_range_years() {
        let mut rng = Mulberry32::new(42);
        for _ in 0..1_000 {
            let ts = timestamp_range(2020, 2024, &mut rng);
            assert!((2020..=2024).contains(&ts.year()), "{}", ts.to_rfc3339());
        }
    }

    #[test]
    fn test_single_year() {
        let mut rng = Mulberry32::new(7);
        for _ in 0..100 {
            assert_eq!(timestamp_range(2013, 2013, &mut rng).year(), 2013);
        }
    }

    #[test]
    fn test_last_year_does_not_overflow() {
        let mut rng = Mulberry32::new(3);
        let ts = timestamp_range(2020, i32::MAX, &mut rng);
        assert_eq!(ts.unix(), year_start(2020));
    }

    #[test]
    fn test_formats() {
        let ts = Timestamp::from_unix(1_373_883_751);
        assert_eq!(ts.date(), "2013-07-15");
        assert_eq!(ts.datetime(), "2013-07-15 10:22:31");
        assert_eq!(ts.to_rfc3339(), "2013-07-15T10:22:31+00:00");
    }

    #[test]
    fn test_deterministic_generation() {
        let mut rng1 = Mulberry32::new(42);
        let mut rng2 = Mulberry32::new(42);
        assert_eq!(
            timestamp_range(2000, 2020, &mut rng1),
            timestamp_range(2000, 2020, &mut rng2)
        );
    }
}
