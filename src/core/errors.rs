use std::result::Result as StdResult;

use thiserror::Error;

/// Unified error type for the domain, ledger, command, and storage layers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MooLahError {
    /// A command precondition failed. The message is shown to the user verbatim.
    #[error("{0}")]
    Validation(String),
    #[error("Expense not found: {0}")]
    ExpenseNotFound(String),
    /// Undo or redo was requested with nothing to restore.
    #[error("{0}")]
    NoHistory(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = StdResult<T, MooLahError>;

impl MooLahError {
    /// Short machine-friendly label for the error family.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MooLahError::Validation(_) | MooLahError::InvalidInput(_) => ErrorKind::Validation,
            MooLahError::ExpenseNotFound(_) => ErrorKind::NotFound,
            MooLahError::NoHistory(_) => ErrorKind::NoHistory,
            MooLahError::StorageError(_) | MooLahError::ConfigError(_) => ErrorKind::Storage,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    NoHistory,
    Storage,
}

impl From<std::io::Error> for MooLahError {
    fn from(err: std::io::Error) -> Self {
        MooLahError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for MooLahError {
    fn from(err: serde_json::Error) -> Self {
        MooLahError::StorageError(err.to_string())
    }
}
