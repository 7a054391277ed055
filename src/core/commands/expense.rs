//! Commands that add, change, remove, and narrow down expenses.

use std::collections::BTreeSet;

use crate::core::errors::{MooLahError, Result};
use crate::core::model::{ExpenseFilter, Model};
use crate::domain::{Category, Description, Expense, Index, Price, Timestamp};

use super::{Command, CommandResult, Panel, MESSAGE_INVALID_EXPENSE_DISPLAYED_INDEX};

pub const MESSAGE_DUPLICATE_EXPENSE: &str = "This expense already exists in MooLah";

fn check_categories(model: &Model, categories: &BTreeSet<Category>) -> Result<()> {
    let policy = &model.config().category_policy;
    match categories.iter().find(|category| !policy.allows(category)) {
        Some(category) => Err(MooLahError::Validation(format!(
            "Category `{category}` is not one of the allowed categories"
        ))),
        None => Ok(()),
    }
}

fn displayed_expense(model: &Model, index: Index) -> Result<&Expense> {
    model.filtered_expense(index).ok_or_else(|| {
        MooLahError::Validation(MESSAGE_INVALID_EXPENSE_DISPLAYED_INDEX.to_string())
    })
}

/// Records a new expense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddExpenseCommand {
    to_add: Expense,
}

impl AddExpenseCommand {
    pub const COMMAND_WORD: &'static str = "addexpense";

    pub fn new(expense: Expense) -> Self {
        Self { to_add: expense }
    }
}

impl Command for AddExpenseCommand {
    fn description(&self) -> String {
        format!("Add expense {}", self.to_add.description())
    }

    fn validate(&self, model: &Model) -> Result<()> {
        let id = self.to_add.unique_identifier();
        if model.has_expense(&self.to_add) || model.moolah().contains_identifier(id) {
            return Err(MooLahError::Validation(
                MESSAGE_DUPLICATE_EXPENSE.to_string(),
            ));
        }
        check_categories(model, self.to_add.categories())
    }

    fn execute(&self, model: &mut Model) -> Result<CommandResult> {
        model.add_expense(self.to_add.clone());
        Ok(CommandResult::with_panel(
            format!("New expense added: {}", self.to_add),
            Panel::ExpenseList,
        ))
    }

    fn is_undoable(&self) -> bool {
        true
    }
}

/// Removes the expense at a displayed position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteExpenseCommand {
    target_index: Index,
}

impl DeleteExpenseCommand {
    pub const COMMAND_WORD: &'static str = "deleteexpense";

    pub fn new(target_index: Index) -> Self {
        Self { target_index }
    }
}

impl Command for DeleteExpenseCommand {
    fn description(&self) -> String {
        format!("Delete expense with index {}", self.target_index)
    }

    fn validate(&self, model: &Model) -> Result<()> {
        displayed_expense(model, self.target_index).map(|_| ())
    }

    fn execute(&self, model: &mut Model) -> Result<CommandResult> {
        let target = displayed_expense(model, self.target_index)?.clone();
        model.delete_expense(&target)?;
        Ok(CommandResult::with_panel(
            format!("Deleted Expense: {target}"),
            Panel::ExpenseList,
        ))
    }

    fn is_undoable(&self) -> bool {
        true
    }
}

/// Fields to change on an existing expense. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditExpenseDescriptor {
    pub description: Option<Description>,
    pub price: Option<Price>,
    pub categories: Option<BTreeSet<Category>>,
    pub timestamp: Option<Timestamp>,
}

impl EditExpenseDescriptor {
    pub fn is_any_field_edited(&self) -> bool {
        self.description.is_some()
            || self.price.is_some()
            || self.categories.is_some()
            || self.timestamp.is_some()
    }

    fn apply(&self, expense: &Expense) -> Expense {
        expense.edited(
            self.description.clone(),
            self.price,
            self.categories.clone(),
            self.timestamp,
        )
    }
}

/// Replaces the expense at a displayed position with an edited copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditExpenseCommand {
    target_index: Index,
    descriptor: EditExpenseDescriptor,
}

impl EditExpenseCommand {
    pub const COMMAND_WORD: &'static str = "editexpense";
    pub const MESSAGE_NOT_EDITED: &'static str = "At least one field to edit must be provided";

    pub fn new(target_index: Index, descriptor: EditExpenseDescriptor) -> Self {
        Self {
            target_index,
            descriptor,
        }
    }
}

impl Command for EditExpenseCommand {
    fn description(&self) -> String {
        format!("Edit expense with index {}", self.target_index)
    }

    fn validate(&self, model: &Model) -> Result<()> {
        if !self.descriptor.is_any_field_edited() {
            return Err(MooLahError::Validation(Self::MESSAGE_NOT_EDITED.to_string()));
        }
        let target = displayed_expense(model, self.target_index)?;
        let edited = self.descriptor.apply(target);
        if model.has_expense(&edited) {
            return Err(MooLahError::Validation(
                MESSAGE_DUPLICATE_EXPENSE.to_string(),
            ));
        }
        check_categories(model, edited.categories())
    }

    fn execute(&self, model: &mut Model) -> Result<CommandResult> {
        let target = displayed_expense(model, self.target_index)?.clone();
        let edited = self.descriptor.apply(&target);
        let message = format!("Edited Expense: {edited}");
        model.set_expense(&target, edited)?;
        Ok(CommandResult::with_panel(message, Panel::ExpenseList))
    }

    fn is_undoable(&self) -> bool {
        true
    }
}

/// Replaces the ledger with an empty one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearExpenseCommand;

impl ClearExpenseCommand {
    pub const COMMAND_WORD: &'static str = "clear";
    pub const MESSAGE_SUCCESS: &'static str = "MooLah has been cleared!";
}

impl Command for ClearExpenseCommand {
    fn description(&self) -> String {
        "Clear".to_string()
    }

    fn validate(&self, _model: &Model) -> Result<()> {
        Ok(())
    }

    fn execute(&self, model: &mut Model) -> Result<CommandResult> {
        model.clear_moolah();
        Ok(CommandResult::with_panel(
            Self::MESSAGE_SUCCESS,
            Panel::ExpenseList,
        ))
    }

    fn is_undoable(&self) -> bool {
        true
    }
}

/// Narrows the displayed list to descriptions containing any keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindExpenseCommand {
    keywords: Vec<String>,
}

impl FindExpenseCommand {
    pub const COMMAND_WORD: &'static str = "findexpense";

    pub fn new(keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }
}

impl Command for FindExpenseCommand {
    fn description(&self) -> String {
        format!("Find expenses matching {}", self.keywords.join(" "))
    }

    fn validate(&self, _model: &Model) -> Result<()> {
        if self.keywords.iter().all(|kw| kw.trim().is_empty()) {
            return Err(MooLahError::Validation(
                "At least one keyword must be provided".to_string(),
            ));
        }
        Ok(())
    }

    fn execute(&self, model: &mut Model) -> Result<CommandResult> {
        model.update_filter(ExpenseFilter::Keywords(self.keywords.clone()));
        Ok(CommandResult::with_panel(
            format!("{} expenses listed!", model.filtered_len()),
            Panel::ExpenseList,
        ))
    }
}

/// Shows every expense again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListExpenseCommand;

impl ListExpenseCommand {
    pub const COMMAND_WORD: &'static str = "listexpense";
    pub const MESSAGE_SUCCESS: &'static str = "Listed all expenses";
}

impl Command for ListExpenseCommand {
    fn description(&self) -> String {
        "List expenses".to_string()
    }

    fn validate(&self, _model: &Model) -> Result<()> {
        Ok(())
    }

    fn execute(&self, model: &mut Model) -> Result<CommandResult> {
        model.update_filter(ExpenseFilter::All);
        Ok(CommandResult::with_panel(
            Self::MESSAGE_SUCCESS,
            Panel::ExpenseList,
        ))
    }
}
