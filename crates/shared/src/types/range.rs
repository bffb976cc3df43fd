//! Inclusive date ranges used by ledger and report queries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An inclusive `[start, end]` calendar range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day included.
    pub start: NaiveDate,
    /// Last day included.
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range, returning `None` when `start` is after `end`.
    #[must_use]
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Range covering every representable date.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            start: NaiveDate::MIN,
            end: NaiveDate::MAX,
        }
    }

    /// Returns true if the date falls inside the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Returns true if the two ranges share at least one day.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_new_rejects_inverted_range() {
        assert!(DateRange::new(d(2026, 2, 1), d(2026, 1, 1)).is_none());
        assert!(DateRange::new(d(2026, 1, 1), d(2026, 1, 1)).is_some());
    }

    #[test]
    fn test_contains_is_inclusive() {
        let range = DateRange::new(d(2026, 1, 1), d(2026, 12, 31)).unwrap();
        assert!(range.contains(d(2026, 1, 1)));
        assert!(range.contains(d(2026, 12, 31)));
        assert!(!range.contains(d(2027, 1, 1)));
    }

    #[rstest]
    #[case(d(2026, 1, 1), d(2026, 6, 30), true)]
    #[case(d(2026, 12, 31), d(2027, 3, 1), true)]
    #[case(d(2027, 1, 1), d(2027, 12, 31), false)]
    #[case(d(2025, 1, 1), d(2025, 12, 31), false)]
    fn test_overlaps(#[case] start: NaiveDate, #[case] end: NaiveDate, #[case] expected: bool) {
        let year = DateRange::new(d(2026, 1, 1), d(2026, 12, 31)).unwrap();
        let other = DateRange::new(start, end).unwrap();
        assert_eq!(year.overlaps(&other), expected);
        assert_eq!(other.overlaps(&year), expected);
    }
}
