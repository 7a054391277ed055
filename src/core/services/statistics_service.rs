//! Aggregate views computed from the ledger. Nothing here mutates state.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::core::errors::{MooLahError, Result};
use crate::domain::{
    ComparisonReport, Expense, GroupDifference, GroupKey, GroupTotal, Mode, Price,
    StatisticsReport, StatsWindow, TimeUnit, Timestamp,
};

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    total: Price,
    count: usize,
}

impl Tally {
    fn record(&mut self, price: Price) {
        self.total = self.total.saturating_add(price);
        self.count += 1;
    }
}

/// Upper bound on the number of periods a single trend report may hold.
pub const MAX_TREND_BUCKETS: usize = 10_000;

pub struct StatisticsService;

impl StatisticsService {
    /// Validates explicit bounds and fills open ends from the ledger.
    ///
    /// An open start defaults to the earliest expense timestamp and an open end
    /// to the latest. Returns `None` when an end is open and there is nothing
    /// to default it from.
    pub fn resolve_window<'a, I>(
        expenses: I,
        start: Option<Timestamp>,
        end: Option<Timestamp>,
    ) -> Result<Option<StatsWindow>>
    where
        I: IntoIterator<Item = &'a Expense>,
    {
        if let (Some(start), Some(end)) = (start, end) {
            return StatsWindow::new(start, end).map(Some);
        }
        let mut earliest: Option<Timestamp> = None;
        let mut latest: Option<Timestamp> = None;
        for expense in expenses {
            let stamp = expense.timestamp();
            earliest = Some(earliest.map_or(stamp, |current| current.min(stamp)));
            latest = Some(latest.map_or(stamp, |current| current.max(stamp)));
        }
        let (Some(earliest), Some(latest)) = (earliest, latest) else {
            return Ok(None);
        };
        let window = match (start, end) {
            (Some(start), None) => StatsWindow {
                start,
                end: latest.max(start),
            },
            (None, Some(end)) => StatsWindow {
                start: earliest.min(end),
                end,
            },
            _ => StatsWindow {
                start: earliest,
                end: latest,
            },
        };
        Ok(Some(window))
    }

    /// Totals per category inside `window`, ordered by category name.
    ///
    /// Untagged expenses are grouped under [`GroupKey::Uncategorized`]; an
    /// expense with several categories counts fully towards each of them.
    pub fn by_category<'a, I>(expenses: I, window: Option<StatsWindow>) -> StatisticsReport
    where
        I: IntoIterator<Item = &'a Expense>,
    {
        let Some(window) = window else {
            return StatisticsReport::empty(Mode::Category, None);
        };
        let mut groups: BTreeMap<GroupKey, Tally> = BTreeMap::new();
        let mut overall = Tally::default();
        for expense in expenses
            .into_iter()
            .filter(|expense| window.contains(expense.timestamp()))
        {
            overall.record(expense.price());
            if expense.categories().is_empty() {
                groups
                    .entry(GroupKey::Uncategorized)
                    .or_default()
                    .record(expense.price());
            }
            for category in expense.categories() {
                groups
                    .entry(GroupKey::Category(category.clone()))
                    .or_default()
                    .record(expense.price());
            }
        }
        Self::report(Mode::Category, window, groups, overall)
    }

    /// Totals per calendar bucket covering `window`, oldest first.
    ///
    /// Buckets without expenses are included with a zero total so the series
    /// has no gaps. Fails when the window spans more than [`MAX_TREND_BUCKETS`].
    pub fn trend<'a, I>(
        expenses: I,
        window: Option<StatsWindow>,
        unit: TimeUnit,
    ) -> Result<StatisticsReport>
    where
        I: IntoIterator<Item = &'a Expense>,
    {
        let mode = Mode::Period(unit);
        let Some(window) = window else {
            return Ok(StatisticsReport::empty(mode, None));
        };
        let mut per_bucket: BTreeMap<NaiveDate, Tally> = BTreeMap::new();
        let mut overall = Tally::default();
        for expense in expenses
            .into_iter()
            .filter(|expense| window.contains(expense.timestamp()))
        {
            overall.record(expense.price());
            per_bucket
                .entry(unit.bucket_start(expense.timestamp().date()))
                .or_default()
                .record(expense.price());
        }

        let mut groups = BTreeMap::new();
        let last = window.end.date();
        let mut next = Some(unit.bucket_start(window.start.date()));
        while let Some(bucket) = next.filter(|bucket| *bucket <= last) {
            if groups.len() == MAX_TREND_BUCKETS {
                return Err(MooLahError::Validation(format!(
                    "A trend can cover at most {MAX_TREND_BUCKETS} periods, \
                     use a larger unit or a shorter range"
                )));
            }
            let tally = per_bucket.get(&bucket).copied().unwrap_or_default();
            groups.insert(GroupKey::Period(bucket), tally);
            next = unit.next_bucket(bucket);
        }
        Ok(Self::report(mode, window, groups, overall))
    }

    /// Category totals of two windows with the per-category change between them.
    pub fn compare<'a, I>(expenses: I, first: StatsWindow, second: StatsWindow) -> ComparisonReport
    where
        I: IntoIterator<Item = &'a Expense>,
        I::IntoIter: Clone,
    {
        let iter = expenses.into_iter();
        let first = Self::by_category(iter.clone(), Some(first));
        let second = Self::by_category(iter, Some(second));

        let keys: BTreeSet<&GroupKey> = first
            .groups
            .iter()
            .chain(second.groups.iter())
            .map(|group| &group.key)
            .collect();
        let total_of = |report: &StatisticsReport, key: &GroupKey| {
            report.group(key).map_or(Price::ZERO, |group| group.total)
        };
        let differences = keys
            .into_iter()
            .map(|key| GroupDifference {
                key: key.clone(),
                first: total_of(&first, key),
                second: total_of(&second, key),
            })
            .collect();

        ComparisonReport {
            first,
            second,
            differences,
        }
    }

    fn report(
        mode: Mode,
        window: StatsWindow,
        groups: BTreeMap<GroupKey, Tally>,
        overall: Tally,
    ) -> StatisticsReport {
        let groups = groups
            .into_iter()
            .map(|(key, tally)| GroupTotal {
                key,
                total: tally.total,
                count: tally.count,
                percentage: percentage(tally.total, overall.total),
            })
            .collect();
        StatisticsReport {
            mode,
            window: Some(window),
            groups,
            total: overall.total,
            expense_count: overall.count,
        }
    }
}

fn percentage(part: Price, whole: Price) -> f64 {
    if whole.cents() == 0 {
        0.0
    } else {
        part.cents() as f64 / whole.cents() as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::MooLahError;
    use crate::domain::{Category, Description, UniqueIdentifier};

    fn expense(description: &str, price: &str, categories: &[&str], at: &str) -> Expense {
        Expense::new(
            Description::new(description).unwrap(),
            price.parse().unwrap(),
            categories.iter().map(|name| Category::new(name).unwrap()),
            at.parse().unwrap(),
            UniqueIdentifier::generate(),
        )
    }

    fn sample() -> Vec<Expense> {
        vec![
            expense("Chicken Rice", "3.50", &["Food"], "2024-01-05 12:00"),
            expense("Bus", "1.70", &["Transport"], "2024-01-20 08:00"),
            expense("Dinner", "12.00", &["Food"], "2024-02-03 19:00"),
            expense("Gift", "20.00", &[], "2024-03-15 10:00"),
        ]
    }

    fn ts(raw: &str) -> Timestamp {
        raw.parse().unwrap()
    }

    #[test]
    fn open_window_spans_earliest_to_latest() {
        let expenses = sample();
        let window = StatisticsService::resolve_window(&expenses, None, None)
            .unwrap()
            .unwrap();
        assert_eq!(window.start, ts("2024-01-05 12:00"));
        assert_eq!(window.end, ts("2024-03-15 10:00"));
    }

    #[test]
    fn inverted_explicit_window_is_rejected() {
        let err = StatisticsService::resolve_window(
            &sample(),
            Some(ts("2024-02-01")),
            Some(ts("2024-01-01")),
        )
        .expect_err("start after end");
        assert!(matches!(err, MooLahError::Validation(_)));
    }

    #[test]
    fn empty_ledger_with_open_ends_has_no_window() {
        let none: Vec<Expense> = Vec::new();
        let window = StatisticsService::resolve_window(&none, None, None).unwrap();
        assert_eq!(window, None);
        let report = StatisticsService::by_category(&none, window);
        assert!(report.is_empty());
        assert_eq!(report.total, Price::ZERO);
    }

    #[test]
    fn groups_totals_by_category() {
        let expenses = sample();
        let window = StatisticsService::resolve_window(&expenses, None, None).unwrap();
        let report = StatisticsService::by_category(&expenses, window);

        let food = GroupKey::Category(Category::new("Food").unwrap());
        assert_eq!(report.group(&food).unwrap().total, Price::from_cents(1550));
        assert_eq!(report.group(&food).unwrap().count, 2);
        assert_eq!(
            report.group(&GroupKey::Uncategorized).unwrap().total,
            Price::from_cents(2000)
        );
        assert_eq!(report.total, Price::from_cents(3720));
        assert_eq!(report.expense_count, 4);
    }

    #[test]
    fn trend_includes_empty_buckets_in_order() {
        let expenses = sample();
        let window = StatsWindow::new(ts("2024-01-01"), ts("2024-04-30")).unwrap();
        let report = StatisticsService::trend(&expenses, Some(window), TimeUnit::Month).unwrap();

        let labels: Vec<String> = report.groups.iter().map(|g| g.key.to_string()).collect();
        assert_eq!(
            labels,
            ["2024-01-01", "2024-02-01", "2024-03-01", "2024-04-01"]
        );
        let totals: Vec<u64> = report.groups.iter().map(|g| g.total.cents()).collect();
        assert_eq!(totals, [520, 1200, 2000, 0]);
    }

    #[test]
    fn trend_stops_at_the_last_representable_month() {
        let last_day = NaiveDate::MAX;
        let last_month = TimeUnit::Month.bucket_start(last_day);
        let start = Timestamp::start_of_day(last_month - chrono::Days::new(30));
        let window = StatsWindow::new(start, Timestamp::start_of_day(last_day)).unwrap();

        for unit in [TimeUnit::Day, TimeUnit::Week, TimeUnit::Month, TimeUnit::Year] {
            let report = StatisticsService::trend(&sample(), Some(window), unit).unwrap();
            assert!(!report.groups.is_empty(), "{unit}");
            assert_eq!(report.total, Price::ZERO);
        }
        let monthly = StatisticsService::trend(&sample(), Some(window), TimeUnit::Month).unwrap();
        assert_eq!(monthly.groups.len(), 2);
    }

    #[test]
    fn trend_rejects_windows_with_too_many_periods() {
        let window = StatsWindow::new(ts("1900-01-01"), ts("2100-01-01")).unwrap();
        let err = StatisticsService::trend(&sample(), Some(window), TimeUnit::Day)
            .expect_err("tens of thousands of days");
        assert!(matches!(err, MooLahError::Validation(_)));

        let yearly = StatisticsService::trend(&sample(), Some(window), TimeUnit::Year).unwrap();
        assert_eq!(yearly.groups.len(), 201);
    }

    #[test]
    fn same_query_yields_identical_output() {
        let expenses = sample();
        let window = StatisticsService::resolve_window(&expenses, None, None).unwrap();
        let first = StatisticsService::by_category(&expenses, window);
        let second = StatisticsService::by_category(&expenses, window);
        assert_eq!(first, second);
    }

    #[test]
    fn compare_reports_per_category_change() {
        let expenses = sample();
        let january = StatsWindow::new(ts("2024-01-01"), ts("2024-01-31 23:59")).unwrap();
        let february = StatsWindow::new(ts("2024-02-01"), ts("2024-02-29 23:59")).unwrap();
        let report = StatisticsService::compare(&expenses, january, february);

        let food = report
            .differences
            .iter()
            .find(|diff| diff.key == GroupKey::Category(Category::new("Food").unwrap()))
            .unwrap();
        assert_eq!(food.delta_cents(), 850);
        let transport = report
            .differences
            .iter()
            .find(|diff| diff.key == GroupKey::Category(Category::new("Transport").unwrap()))
            .unwrap();
        assert_eq!(transport.second, Price::ZERO);
    }
}
