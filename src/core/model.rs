//! The aggregate that commands run against.

use crate::config::Config;
use crate::core::errors::Result;
use crate::core::history::HistoryManager;
use crate::domain::{Category, Expense, Index, Statistics};
use crate::ledger::MooLah;

/// Selects which expenses are shown, and therefore what an [`Index`] refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExpenseFilter {
    #[default]
    All,
    /// Description contains any keyword as a whole word, ignoring case.
    Keywords(Vec<String>),
    Category(Category),
}

impl ExpenseFilter {
    pub fn matches(&self, expense: &Expense) -> bool {
        match self {
            ExpenseFilter::All => true,
            ExpenseFilter::Keywords(keywords) => expense
                .description()
                .as_str()
                .split_whitespace()
                .any(|word| keywords.iter().any(|kw| kw.eq_ignore_ascii_case(word))),
            ExpenseFilter::Category(category) => expense.has_category(category),
        }
    }
}

#[derive(Debug)]
pub struct Model {
    moolah: MooLah,
    history: HistoryManager,
    filter: ExpenseFilter,
    statistics: Option<Statistics>,
    config: Config,
}

impl Default for Model {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Model {
    /// Empty ledger, seeded with the configured category vocabulary.
    pub fn new(config: Config) -> Self {
        Self::with_moolah(MooLah::new(), config)
    }

    /// Wraps an existing ledger, adding any configured categories it lacks.
    pub fn with_moolah(mut moolah: MooLah, config: Config) -> Self {
        seed_categories(&mut moolah, &config);
        Self {
            moolah,
            history: HistoryManager::new(config.history_depth),
            filter: ExpenseFilter::All,
            statistics: None,
            config,
        }
    }

    pub fn moolah(&self) -> &MooLah {
        &self.moolah
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn has_expense(&self, expense: &Expense) -> bool {
        self.moolah.has_expense(expense)
    }

    /// Appends the expense and resets the view so it is visible.
    pub fn add_expense(&mut self, expense: Expense) {
        self.moolah.add_expense(expense);
        self.filter = ExpenseFilter::All;
    }

    pub fn delete_expense(&mut self, target: &Expense) -> Result<Expense> {
        self.moolah.delete_expense(target)
    }

    pub fn set_expense(&mut self, target: &Expense, edited: Expense) -> Result<()> {
        self.moolah.set_expense(target, edited)
    }

    /// Replaces the ledger wholesale, e.g. after a load.
    pub fn set_moolah(&mut self, mut moolah: MooLah) {
        seed_categories(&mut moolah, &self.config);
        self.moolah = moolah;
        self.filter = ExpenseFilter::All;
    }

    /// Empties the ledger, keeping or resetting categories per configuration.
    pub fn clear_moolah(&mut self) {
        let retention = self.config.category_retention();
        self.moolah.clear(retention);
        seed_categories(&mut self.moolah, &self.config);
        self.filter = ExpenseFilter::All;
    }

    pub fn filter(&self) -> &ExpenseFilter {
        &self.filter
    }

    pub fn update_filter(&mut self, filter: ExpenseFilter) {
        self.filter = filter;
    }

    /// The displayed list: the ledger narrowed by the current filter.
    pub fn filtered_expenses(&self) -> impl Iterator<Item = &Expense> + Clone + '_ {
        let filter = &self.filter;
        self.moolah.filtered(move |expense| filter.matches(expense))
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered_expenses().count()
    }

    pub fn filtered_expense(&self, index: Index) -> Option<&Expense> {
        let position = index.zero_based()?;
        self.filtered_expenses().nth(position)
    }

    /// Snapshots the current ledger before an undoable mutation.
    ///
    /// Returns the snapshot so a failed mutation can be rolled back with
    /// [`Model::abandon_commit`] even when history does not retain it.
    pub fn commit(&mut self, description: impl Into<String>) -> MooLah {
        let snapshot = self.moolah.clone();
        self.history.commit(snapshot.clone(), description);
        snapshot
    }

    /// Reverts the most recent commit and reinstates `snapshot`.
    pub fn abandon_commit(&mut self, snapshot: MooLah) {
        self.history.abandon_commit();
        self.moolah = snapshot;
    }

    /// Restores the previous state, returning the undone command's description.
    pub fn undo(&mut self) -> Result<String> {
        let entry = self.history.undo(self.moolah.clone())?;
        self.moolah = entry.snapshot;
        self.filter = ExpenseFilter::All;
        tracing::info!(description = %entry.description, "undo");
        Ok(entry.description)
    }

    /// Re-applies the most recently undone change.
    pub fn redo(&mut self) -> Result<String> {
        let entry = self.history.redo(self.moolah.clone())?;
        self.moolah = entry.snapshot;
        self.filter = ExpenseFilter::All;
        tracing::info!(description = %entry.description, "redo");
        Ok(entry.description)
    }

    pub fn statistics(&self) -> Option<&Statistics> {
        self.statistics.as_ref()
    }

    pub fn set_statistics(&mut self, statistics: Statistics) {
        self.statistics = Some(statistics);
    }
}

fn seed_categories(moolah: &mut MooLah, config: &Config) {
    for category in config.category_policy.seed_categories() {
        moolah.add_category(category);
    }
}
