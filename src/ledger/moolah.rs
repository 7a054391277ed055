use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::errors::{MooLahError, Result};
use crate::domain::{Category, Displayable, Expense, Identifiable, UniqueIdentifier};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Whether [`MooLah::clear`] keeps the known category set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryRetention {
    Keep,
    Reset,
}

/// The expense ledger.
///
/// Expenses are immutable and held behind `Arc`, so cloning a ledger for a
/// history snapshot shares the records instead of copying them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MooLah {
    expenses: Vec<Arc<Expense>>,
    categories: BTreeSet<Category>,
}

/// Serializable export of a [`MooLah`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MooLahData {
    #[serde(default = "MooLahData::schema_version_default")]
    pub schema_version: u8,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub categories: BTreeSet<Category>,
}

impl MooLahData {
    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}

impl MooLah {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_categories(categories: impl IntoIterator<Item = Category>) -> Self {
        Self {
            expenses: Vec::new(),
            categories: categories.into_iter().collect(),
        }
    }

    /// True iff a strongly-equal expense is stored.
    pub fn has_expense(&self, expense: &Expense) -> bool {
        self.expenses.iter().any(|stored| stored.as_ref() == expense)
    }

    /// True iff an expense with this identifier is stored (weak equality).
    pub fn contains_identifier(&self, id: UniqueIdentifier) -> bool {
        self.expenses
            .iter()
            .any(|stored| stored.unique_identifier() == id)
    }

    /// Appends `expense` and registers its categories.
    ///
    /// Duplicate checks belong to the caller.
    pub fn add_expense(&mut self, expense: Expense) {
        tracing::debug!(id = %expense.id(), expense = %expense.display_label(), "adding expense");
        self.categories.extend(expense.categories().iter().cloned());
        self.expenses.push(Arc::new(expense));
    }

    /// Removes the stored expense with the same identifier as `target`.
    pub fn delete_expense(&mut self, target: &Expense) -> Result<Expense> {
        let position = self.position_of(target)?;
        let removed = self.expenses.remove(position);
        tracing::debug!(id = %removed.id(), expense = %removed.display_label(), "removed expense");
        Ok(Arc::try_unwrap(removed).unwrap_or_else(|shared| (*shared).clone()))
    }

    /// Replaces the expense identified by `target`, keeping its position.
    pub fn set_expense(&mut self, target: &Expense, edited: Expense) -> Result<()> {
        let position = self.position_of(target)?;
        tracing::debug!(id = %edited.id(), expense = %edited.display_label(), "replacing expense");
        self.categories.extend(edited.categories().iter().cloned());
        self.expenses[position] = Arc::new(edited);
        Ok(())
    }

    /// Lazily filtered view in insertion order. Clone the iterator to restart it.
    pub fn filtered<'a, P>(
        &'a self,
        predicate: P,
    ) -> impl Iterator<Item = &'a Expense> + Clone + 'a
    where
        P: Fn(&Expense) -> bool + Clone + 'a,
    {
        self.expenses
            .iter()
            .map(Arc::as_ref)
            .filter(move |expense| predicate(*expense))
    }

    pub fn expenses(&self) -> impl Iterator<Item = &Expense> + Clone + '_ {
        self.expenses.iter().map(Arc::as_ref)
    }

    pub fn get(&self, position: usize) -> Option<&Expense> {
        self.expenses.get(position).map(Arc::as_ref)
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    pub fn categories(&self) -> &BTreeSet<Category> {
        &self.categories
    }

    pub fn has_category(&self, category: &Category) -> bool {
        self.categories.contains(category)
    }

    pub fn add_category(&mut self, category: Category) -> bool {
        self.categories.insert(category)
    }

    pub fn clear(&mut self, retention: CategoryRetention) {
        self.expenses.clear();
        if retention == CategoryRetention::Reset {
            self.categories.clear();
        }
    }

    pub fn export(&self) -> MooLahData {
        MooLahData {
            schema_version: CURRENT_SCHEMA_VERSION,
            expenses: self.expenses().cloned().collect(),
            categories: self.categories.clone(),
        }
    }

    pub fn import(data: MooLahData) -> Result<Self> {
        if data.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(MooLahError::StorageError(format!(
                "ledger schema v{} is newer than supported v{}",
                data.schema_version, CURRENT_SCHEMA_VERSION
            )));
        }
        let mut moolah = MooLah::with_categories(data.categories);
        for expense in data.expenses {
            if moolah.has_expense(&expense) {
                return Err(MooLahError::StorageError(format!(
                    "duplicate expense in stored data: {expense}"
                )));
            }
            if moolah.contains_identifier(expense.unique_identifier()) {
                return Err(MooLahError::StorageError(format!(
                    "duplicate identifier in stored data: {}",
                    expense.unique_identifier()
                )));
            }
            moolah.add_expense(expense);
        }
        Ok(moolah)
    }

    fn position_of(&self, target: &Expense) -> Result<usize> {
        self.expenses
            .iter()
            .position(|stored| stored.is_same_expense(target))
            .ok_or_else(|| MooLahError::ExpenseNotFound(target.to_string()))
    }
}
