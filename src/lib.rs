#![doc(test(attr(deny(warnings))))]

//! MooLah core: an expense ledger with undoable commands and read-only
//! spending statistics.

pub mod config;
pub mod core;
pub mod domain;
pub mod ledger;
pub mod utils;

pub use crate::core::commands::{Command, CommandResult, Panel};
pub use crate::core::dispatcher::{Dispatcher, Feedback};
pub use crate::core::errors::{ErrorKind, MooLahError, Result};
pub use crate::core::model::{ExpenseFilter, Model};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("MooLah core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
