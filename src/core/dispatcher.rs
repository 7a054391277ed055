//! Entry point for running commands against a [`Model`].

use std::fmt;

use crate::config::Config;
use crate::core::commands::{Command, CommandResult};
use crate::core::errors::{ErrorKind, MooLahError, Result};
use crate::core::model::Model;
use crate::utils::persistence;

/// Outcome of a submitted command, ready for the display layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    Success(CommandResult),
    Failure { message: String, kind: ErrorKind },
}

impl Feedback {
    pub fn is_success(&self) -> bool {
        matches!(self, Feedback::Success(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Feedback::Success(result) => &result.feedback,
            Feedback::Failure { message, .. } => message,
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl From<MooLahError> for Feedback {
    fn from(err: MooLahError) -> Self {
        Feedback::Failure {
            message: err.to_string(),
            kind: err.kind(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Dispatcher {
    model: Model,
}

impl Dispatcher {
    pub fn new(model: Model) -> Self {
        Self { model }
    }

    /// Builds a model from `config`, loading the ledger from `data_file` when set.
    /// The configured category vocabulary is seeded either way.
    pub fn open(config: Config) -> Result<Self> {
        let model = match config.data_file.clone() {
            Some(path) => Model::with_moolah(persistence::load_or_default(&path)?, config),
            None => Model::new(config),
        };
        Ok(Self::new(model))
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn into_model(self) -> Model {
        self.model
    }

    /// Runs `command` to completion. Errors never escape; they become
    /// [`Feedback::Failure`].
    pub fn submit(&mut self, command: &dyn Command) -> Feedback {
        match command.run(&mut self.model) {
            Ok(result) => {
                tracing::info!(command = ?command, feedback = %result.feedback, "command completed");
                Feedback::Success(result)
            }
            Err(err) => {
                match err.kind() {
                    ErrorKind::Validation | ErrorKind::NoHistory => {
                        tracing::warn!(command = ?command, error = %err, "command rejected")
                    }
                    ErrorKind::NotFound | ErrorKind::Storage => {
                        tracing::error!(command = ?command, error = %err, "command failed")
                    }
                }
                Feedback::from(err)
            }
        }
    }

    /// Writes the ledger to the configured `data_file`. A no-op without one.
    pub fn save(&self) -> Result<()> {
        match &self.model.config().data_file {
            Some(path) => persistence::save_moolah_to_file(self.model.moolah(), path),
            None => Ok(()),
        }
    }
}
