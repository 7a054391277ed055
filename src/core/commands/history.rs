use crate::core::errors::{MooLahError, Result};
use crate::core::history::{MESSAGE_NO_REDO, MESSAGE_NO_UNDO};
use crate::core::model::Model;

use super::{Command, CommandResult, Panel};

/// Restores the ledger as it was before the last undoable command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UndoCommand;

impl UndoCommand {
    pub const COMMAND_WORD: &'static str = "undo";
}

impl Command for UndoCommand {
    fn description(&self) -> String {
        "Undo".to_string()
    }

    fn validate(&self, model: &Model) -> Result<()> {
        if !model.history().can_undo() {
            return Err(MooLahError::NoHistory(MESSAGE_NO_UNDO.to_string()));
        }
        Ok(())
    }

    fn execute(&self, model: &mut Model) -> Result<CommandResult> {
        let description = model.undo()?;
        Ok(CommandResult::with_panel(
            format!("Undid: {description}"),
            Panel::ExpenseList,
        ))
    }
}

/// Re-applies the most recently undone command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RedoCommand;

impl RedoCommand {
    pub const COMMAND_WORD: &'static str = "redo";
}

impl Command for RedoCommand {
    fn description(&self) -> String {
        "Redo".to_string()
    }

    fn validate(&self, model: &Model) -> Result<()> {
        if !model.history().can_redo() {
            return Err(MooLahError::NoHistory(MESSAGE_NO_REDO.to_string()));
        }
        Ok(())
    }

    fn execute(&self, model: &mut Model) -> Result<CommandResult> {
        let description = model.redo()?;
        Ok(CommandResult::with_panel(
            format!("Redid: {description}"),
            Panel::ExpenseList,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commands::{AddExpenseCommand, ClearExpenseCommand};
    use crate::domain::{Category, Description, Expense, Price};

    fn coffee() -> Expense {
        Expense::create(
            Description::new("Coffee").unwrap(),
            Price::from_cents(450),
            [Category::new("Drinks").unwrap()],
        )
    }

    #[test]
    fn undo_and_redo_report_the_command_description() {
        let mut model = Model::default();
        AddExpenseCommand::new(coffee()).run(&mut model).unwrap();

        let undone = UndoCommand.run(&mut model).unwrap();
        assert_eq!(undone.feedback, "Undid: Add expense Coffee");
        let redone = RedoCommand.run(&mut model).unwrap();
        assert_eq!(redone.feedback, "Redid: Add expense Coffee");
    }

    #[test]
    fn undo_and_redo_are_not_themselves_recorded() {
        let mut model = Model::default();
        ClearExpenseCommand.run(&mut model).unwrap();
        UndoCommand.run(&mut model).unwrap();
        assert!(!model.history().can_undo());
        assert!(model.history().can_redo());
    }

    #[test]
    fn empty_history_yields_no_history_errors() {
        let mut model = Model::default();
        assert_eq!(
            UndoCommand.run(&mut model).unwrap_err(),
            MooLahError::NoHistory(MESSAGE_NO_UNDO.to_string())
        );
        assert_eq!(
            RedoCommand.run(&mut model).unwrap_err(),
            MooLahError::NoHistory(MESSAGE_NO_REDO.to_string())
        );
    }
}
