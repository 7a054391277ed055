//! The in-memory expense ledger and its persistence-friendly export.

pub mod moolah;

pub use moolah::{CategoryRetention, MooLah, MooLahData, CURRENT_SCHEMA_VERSION};
