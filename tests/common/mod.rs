#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use moolah_core::config::{Config, ConfigManager};
use moolah_core::domain::{Category, Description, Expense, Timestamp, UniqueIdentifier};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated base directory with a config manager rooted in it.
pub fn setup_test_env() -> (PathBuf, ConfigManager) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");

    (base, config_manager)
}

/// Default configuration that persists the ledger under `base`.
pub fn config_with_data_file(base: &Path) -> Config {
    Config {
        data_file: Some(base.join("moolah.json")),
        ..Config::default()
    }
}

pub fn expense(description: &str, price: &str, categories: &[&str], at: &str) -> Expense {
    Expense::new(
        Description::new(description).expect("valid description"),
        price.parse().expect("valid price"),
        categories
            .iter()
            .map(|name| Category::new(*name).expect("valid category")),
        at.parse::<Timestamp>().expect("valid timestamp"),
        UniqueIdentifier::generate(),
    )
}
