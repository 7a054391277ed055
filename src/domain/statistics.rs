//! Read-only aggregate views produced by the statistics engine.

use std::fmt;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::errors::{MooLahError, Result};
use crate::domain::category::Category;
use crate::domain::common::TimeUnit;
use crate::domain::expense::{Price, Timestamp};

pub const MESSAGE_CONSTRAINTS_END_DATE: &str = "Start date must be before or on the end date";
pub const MESSAGE_PERIOD_OUT_OF_RANGE: &str = "The requested period extends past the supported date range";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Inclusive `[start, end]` range of timestamps.
pub struct StatsWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl StatsWindow {
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self> {
        if end.is_before(start) {
            return Err(MooLahError::Validation(
                MESSAGE_CONSTRAINTS_END_DATE.to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    /// Window starting at `start` and lasting `count` whole `unit`s.
    ///
    /// The end is one second before the next window would start.
    pub fn spanning(start: Timestamp, unit: TimeUnit, count: u32) -> Result<Self> {
        if count == 0 {
            return Err(MooLahError::Validation(
                "A comparison period must span at least one unit".to_string(),
            ));
        }
        let out_of_range = || MooLahError::Validation(MESSAGE_PERIOD_OUT_OF_RANGE.to_string());
        let next_start = unit
            .add_to(start.date(), count)
            .ok_or_else(out_of_range)?
            .and_time(start.value().time());
        let end = next_start
            .checked_sub_signed(Duration::seconds(1))
            .ok_or_else(out_of_range)?;
        Self::new(start, Timestamp::new(end))
    }

    pub fn contains(&self, timestamp: Timestamp) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }
}

impl fmt::Display for StatsWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Grouping dimension for statistics.
pub enum Mode {
    Category,
    Period(TimeUnit),
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Category => f.write_str("category"),
            Mode::Period(unit) => write!(f, "{}", unit.to_string().to_lowercase()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
/// Key a group of expenses is aggregated under.
pub enum GroupKey {
    Category(Category),
    Uncategorized,
    Period(NaiveDate),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Category(category) => write!(f, "{category}"),
            GroupKey::Uncategorized => f.write_str("Uncategorized"),
            GroupKey::Period(start) => write!(f, "{start}"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupTotal {
    pub key: GroupKey,
    pub total: Price,
    pub count: usize,
    /// Share of the report total, `0.0` when the report total is zero.
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Aggregated totals for one query.
pub struct StatisticsReport {
    pub mode: Mode,
    /// `None` when the query had open ends and the ledger was empty.
    pub window: Option<StatsWindow>,
    pub groups: Vec<GroupTotal>,
    pub total: Price,
    pub expense_count: usize,
}

impl StatisticsReport {
    pub fn empty(mode: Mode, window: Option<StatsWindow>) -> Self {
        Self {
            mode,
            window,
            groups: Vec::new(),
            total: Price::ZERO,
            expense_count: 0,
        }
    }

    pub fn group(&self, key: &GroupKey) -> Option<&GroupTotal> {
        self.groups.iter().find(|group| &group.key == key)
    }

    pub fn is_empty(&self) -> bool {
        self.expense_count == 0
    }

    pub fn title(&self) -> String {
        match self.window {
            Some(window) => format!("Expenses by {} from {}", self.mode, window),
            None => format!("Expenses by {}", self.mode),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupDifference {
    pub key: GroupKey,
    pub first: Price,
    pub second: Price,
}

impl GroupDifference {
    /// Signed change from the first window to the second, in cents.
    pub fn delta_cents(&self) -> i128 {
        self.second.cents() as i128 - self.first.cents() as i128
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Category totals of two equally long windows side by side.
pub struct ComparisonReport {
    pub first: StatisticsReport,
    pub second: StatisticsReport,
    pub differences: Vec<GroupDifference>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Last statistics computed on the model, kept for the display layer.
pub enum Statistics {
    Summary(StatisticsReport),
    Comparison(ComparisonReport),
}
