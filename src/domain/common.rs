//! Shared traits, positional indices, and calendar bucketing helpers.

use std::fmt;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Exposes a stable identifier for entities stored in the ledger.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// One-based position in the currently displayed expense list.
///
/// Zero is representable on purpose: callers hand over whatever the user
/// typed and the command rejects it during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Index {
    one_based: usize,
}

impl Index {
    pub fn from_one_based(one_based: usize) -> Self {
        Self { one_based }
    }

    pub fn from_zero_based(zero_based: usize) -> Self {
        Self {
            one_based: zero_based + 1,
        }
    }

    pub fn one_based(self) -> usize {
        self.one_based
    }

    /// Returns `None` for the (invalid) index zero.
    pub fn zero_based(self) -> Option<usize> {
        self.one_based.checked_sub(1)
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.one_based)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
/// Calendar units used to bucket expenses into periods.
pub enum TimeUnit {
    Day,
    Week,
    Month,
    Year,
}

impl TimeUnit {
    /// First day of the bucket that contains `date`.
    ///
    /// Weeks start on Monday.
    pub fn bucket_start(self, date: NaiveDate) -> NaiveDate {
        match self {
            TimeUnit::Day => date,
            TimeUnit::Week => {
                let delta = u64::from(date.weekday().num_days_from_monday());
                date.checked_sub_days(Days::new(delta)).unwrap_or(date)
            }
            TimeUnit::Month => date.with_day(1).unwrap_or(date),
            TimeUnit::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
        }
    }

    /// First day of the bucket following the one that starts at `start`.
    ///
    /// `None` once the next bucket would fall past the last representable date.
    pub fn next_bucket(self, start: NaiveDate) -> Option<NaiveDate> {
        self.add_to(start, 1)
    }

    /// Adds `steps` whole units to `from`, clamping the day of month.
    ///
    /// `None` when the result is outside the representable date range.
    pub fn add_to(self, from: NaiveDate, steps: u32) -> Option<NaiveDate> {
        match self {
            TimeUnit::Day => from.checked_add_days(Days::new(u64::from(steps))),
            TimeUnit::Week => from.checked_add_days(Days::new(u64::from(steps) * 7)),
            TimeUnit::Month => from.checked_add_months(Months::new(steps)),
            TimeUnit::Year => from.checked_add_months(Months::new(steps.checked_mul(12)?)),
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TimeUnit::Day => "Day",
            TimeUnit::Week => "Week",
            TimeUnit::Month => "Month",
            TimeUnit::Year => "Year",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn index_zero_has_no_zero_based_position() {
        assert_eq!(Index::from_one_based(0).zero_based(), None);
        assert_eq!(Index::from_one_based(3).zero_based(), Some(2));
        assert_eq!(Index::from_zero_based(0), Index::from_one_based(1));
    }

    #[test]
    fn week_buckets_start_on_monday() {
        // 2024-03-14 is a Thursday.
        assert_eq!(TimeUnit::Week.bucket_start(date(2024, 3, 14)), date(2024, 3, 11));
        assert_eq!(TimeUnit::Week.next_bucket(date(2024, 3, 11)), Some(date(2024, 3, 18)));
    }

    #[test]
    fn month_shift_clamps_to_month_end() {
        assert_eq!(TimeUnit::Month.add_to(date(2024, 1, 31), 1), Some(date(2024, 2, 29)));
        assert_eq!(TimeUnit::Year.add_to(date(2024, 2, 29), 1), Some(date(2025, 2, 28)));
        assert_eq!(TimeUnit::Month.next_bucket(date(2024, 12, 1)), Some(date(2025, 1, 1)));
    }

    #[test]
    fn stepping_past_the_calendar_end_yields_none() {
        let start = date(2024, 1, 1);
        for unit in [TimeUnit::Day, TimeUnit::Week, TimeUnit::Month, TimeUnit::Year] {
            assert_eq!(unit.add_to(start, u32::MAX), None, "{unit} by u32::MAX");
            assert_eq!(unit.next_bucket(NaiveDate::MAX), None, "{unit} after MAX");
        }
        let last_month = TimeUnit::Month.bucket_start(NaiveDate::MAX);
        assert_eq!(TimeUnit::Month.next_bucket(last_month), None);
    }
}
