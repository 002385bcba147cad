// =============================================================================
// Shared types used across both pipelines
// =============================================================================

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// Half-open calendar range `[start, end)` of trading days to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting `start >= end` before any network I/O.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, FetchError> {
        if start >= end {
            return Err(FetchError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` falls inside the half-open range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    /// UTC midnight of `start` as UNIX seconds.
    pub fn start_unix(&self) -> i64 {
        self.start.and_time(NaiveTime::MIN).and_utc().timestamp()
    }

    /// UTC midnight of `end` as UNIX seconds (exclusive bound).
    pub fn end_unix(&self) -> i64 {
        self.end.and_time(NaiveTime::MIN).and_utc().timestamp()
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rejects_inverted_and_empty_ranges() {
        assert!(DateRange::new(date(2022, 1, 2), date(2022, 1, 1)).is_err());
        assert!(DateRange::new(date(2022, 1, 1), date(2022, 1, 1)).is_err());
    }

    #[test]
    fn end_is_exclusive() {
        let range = DateRange::new(date(2022, 1, 1), date(2022, 1, 10)).unwrap();
        assert!(range.contains(date(2022, 1, 1)));
        assert!(range.contains(date(2022, 1, 9)));
        assert!(!range.contains(date(2022, 1, 10)));
        assert!(!range.contains(date(2021, 12, 31)));
    }

    #[test]
    fn unix_bounds_are_utc_midnight() {
        let range = DateRange::new(date(2022, 1, 1), date(2023, 1, 1)).unwrap();
        assert_eq!(range.start_unix(), 1_640_995_200);
        assert_eq!(range.end_unix(), 1_672_531_200);
    }
}
