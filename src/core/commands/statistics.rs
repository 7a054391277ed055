//! Read-only statistics queries. None of these touch the ledger or history.

use crate::core::errors::{MooLahError, Result};
use crate::core::model::Model;
use crate::core::services::StatisticsService;
use crate::domain::statistics::MESSAGE_CONSTRAINTS_END_DATE;
use crate::domain::{Mode, Statistics, StatisticsReport, StatsWindow, TimeUnit, Timestamp};

use super::{Command, CommandResult, Panel};

fn check_range(start: Option<Timestamp>, end: Option<Timestamp>) -> Result<()> {
    match (start, end) {
        (Some(start), Some(end)) if end.is_before(start) => Err(MooLahError::Validation(
            MESSAGE_CONSTRAINTS_END_DATE.to_string(),
        )),
        _ => Ok(()),
    }
}

fn summarize(
    model: &Model,
    start: Option<Timestamp>,
    end: Option<Timestamp>,
    mode: Mode,
) -> Result<StatisticsReport> {
    let expenses = model.moolah().expenses();
    let window = StatisticsService::resolve_window(expenses.clone(), start, end)?;
    let report = match mode {
        Mode::Category => StatisticsService::by_category(expenses, window),
        Mode::Period(unit) => StatisticsService::trend(expenses, window, unit)?,
    };
    Ok(report)
}

fn publish(model: &mut Model, report: StatisticsReport) -> CommandResult {
    let message = if report.is_empty() {
        format!("{}: no expenses found", report.title())
    } else {
        format!(
            "{}: {} expenses totalling {}",
            report.title(),
            report.expense_count,
            report.total
        )
    };
    model.set_statistics(Statistics::Summary(report));
    CommandResult::with_panel(message, Panel::Statistics)
}

/// Totals per category over an optional date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsCommand {
    start: Option<Timestamp>,
    end: Option<Timestamp>,
}

impl StatsCommand {
    pub const COMMAND_WORD: &'static str = "stats";

    /// Open ends default to the earliest and latest expense.
    pub fn new(start: Option<Timestamp>, end: Option<Timestamp>) -> Self {
        Self { start, end }
    }
}

impl Command for StatsCommand {
    fn description(&self) -> String {
        "Statistics by category".to_string()
    }

    fn validate(&self, _model: &Model) -> Result<()> {
        check_range(self.start, self.end)
    }

    fn execute(&self, model: &mut Model) -> Result<CommandResult> {
        let report = summarize(model, self.start, self.end, Mode::Category)?;
        Ok(publish(model, report))
    }
}

/// Totals over an optional date range, grouped by the requested [`Mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsTrendCommand {
    start: Option<Timestamp>,
    end: Option<Timestamp>,
    mode: Mode,
}

impl StatsTrendCommand {
    pub const COMMAND_WORD: &'static str = "statstrend";

    pub fn new(start: Option<Timestamp>, end: Option<Timestamp>, mode: Mode) -> Self {
        Self { start, end, mode }
    }
}

impl Command for StatsTrendCommand {
    fn description(&self) -> String {
        format!("Statistics trend by {}", self.mode)
    }

    fn validate(&self, model: &Model) -> Result<()> {
        check_range(self.start, self.end)?;
        // Period reports can be rejected for size, which is only known once built.
        match self.mode {
            Mode::Category => Ok(()),
            Mode::Period(_) => summarize(model, self.start, self.end, self.mode).map(|_| ()),
        }
    }

    fn execute(&self, model: &mut Model) -> Result<CommandResult> {
        let report = summarize(model, self.start, self.end, self.mode)?;
        Ok(publish(model, report))
    }
}

/// Compares category totals of two windows of equal length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsCompareCommand {
    first_start: Timestamp,
    second_start: Timestamp,
    unit: TimeUnit,
    count: u32,
}

impl StatsCompareCommand {
    pub const COMMAND_WORD: &'static str = "statscompare";

    /// Each window starts at its given timestamp and lasts `count` `unit`s.
    pub fn new(first_start: Timestamp, second_start: Timestamp, unit: TimeUnit, count: u32) -> Self {
        Self {
            first_start,
            second_start,
            unit,
            count,
        }
    }

    fn windows(&self) -> Result<(StatsWindow, StatsWindow)> {
        Ok((
            StatsWindow::spanning(self.first_start, self.unit, self.count)?,
            StatsWindow::spanning(self.second_start, self.unit, self.count)?,
        ))
    }
}

impl Command for StatsCompareCommand {
    fn description(&self) -> String {
        format!(
            "Compare {} {}(s) from {} and {}",
            self.count, self.unit, self.first_start, self.second_start
        )
    }

    fn validate(&self, _model: &Model) -> Result<()> {
        self.windows().map(|_| ())
    }

    fn execute(&self, model: &mut Model) -> Result<CommandResult> {
        let (first, second) = self.windows()?;
        let report = StatisticsService::compare(model.moolah().expenses(), first, second);
        let message = format!(
            "Compared {} ({}) with {} ({})",
            first, report.first.total, second, report.second.total
        );
        model.set_statistics(Statistics::Comparison(report));
        Ok(CommandResult::with_panel(message, Panel::Statistics))
    }
}
