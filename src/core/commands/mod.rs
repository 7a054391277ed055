//! Units of user intent that validate against, then mutate, a [`Model`].
//!
//! Every command implements [`Command`]. Commands that change the ledger opt in
//! to history by returning `true` from [`Command::is_undoable`]; [`Command::run`]
//! then snapshots the ledger right before [`Command::execute`] is called. Undo
//! and redo restore snapshots rather than re-running commands.

pub mod expense;
pub mod history;
pub mod statistics;

use std::fmt;

use crate::core::errors::Result;
use crate::core::model::Model;

pub use expense::{
    AddExpenseCommand, ClearExpenseCommand, DeleteExpenseCommand, EditExpenseCommand,
    EditExpenseDescriptor, FindExpenseCommand, ListExpenseCommand,
};
pub use history::{RedoCommand, UndoCommand};
pub use statistics::{StatsCommand, StatsCompareCommand, StatsTrendCommand};

pub const MESSAGE_INVALID_EXPENSE_DISPLAYED_INDEX: &str = "The expense index provided is invalid";

/// View the display layer should refresh after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    ExpenseList,
    Statistics,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub feedback: String,
    pub panel: Option<Panel>,
}

impl CommandResult {
    pub fn new(feedback: impl Into<String>) -> Self {
        Self {
            feedback: feedback.into(),
            panel: None,
        }
    }

    pub fn with_panel(feedback: impl Into<String>, panel: Panel) -> Self {
        Self {
            feedback: feedback.into(),
            panel: Some(panel),
        }
    }
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.feedback)
    }
}

pub trait Command: fmt::Debug {
    /// Human-readable label, recorded alongside history snapshots.
    fn description(&self) -> String;

    /// Checks preconditions against the current state. Must not mutate.
    fn validate(&self, model: &Model) -> Result<()>;

    /// Applies the change. Only called after [`Command::validate`] succeeded.
    fn execute(&self, model: &mut Model) -> Result<CommandResult>;

    fn is_undoable(&self) -> bool {
        false
    }

    /// Validates, commits a snapshot for undoable commands, then executes.
    ///
    /// If execution fails after the snapshot was taken, the snapshot is
    /// reinstated and history is left as it was before the commit.
    fn run(&self, model: &mut Model) -> Result<CommandResult> {
        tracing::debug!(command = ?self, "validating");
        self.validate(model)?;

        let rollback = if self.is_undoable() {
            Some(model.commit(self.description()))
        } else {
            None
        };
        match self.execute(model) {
            Ok(result) => Ok(result),
            Err(err) => {
                if let Some(snapshot) = rollback {
                    model.abandon_commit(snapshot);
                }
                tracing::error!(command = ?self, error = %err, "execution failed after validation");
                Err(err)
            }
        }
    }
}
