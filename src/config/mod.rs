use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::core::errors::{MooLahError, Result};
use crate::domain::Category;
use crate::ledger::CategoryRetention;
use crate::utils::{app_data_dir, ensure_dir};

const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_HISTORY_DEPTH: usize = 50;

/// Which category names expenses may carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "names", rename_all = "snake_case")]
pub enum CategoryPolicy {
    #[default]
    FreeForm,
    Restricted(Vec<String>),
}

impl CategoryPolicy {
    pub fn allows(&self, category: &Category) -> bool {
        match self {
            CategoryPolicy::FreeForm => true,
            CategoryPolicy::Restricted(names) => {
                names.iter().any(|name| category.matches_name(name))
            }
        }
    }

    /// Categories seeded into a fresh ledger.
    pub fn seed_categories(&self) -> Vec<Category> {
        match self {
            CategoryPolicy::FreeForm => Vec::new(),
            CategoryPolicy::Restricted(names) => names
                .iter()
                .filter_map(|name| Category::new(name).ok())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Maximum number of undo (and redo) steps kept. Zero disables history.
    #[serde(default = "Config::default_history_depth")]
    pub history_depth: usize,
    #[serde(default)]
    pub category_policy: CategoryPolicy,
    #[serde(default = "Config::default_retain_categories")]
    pub retain_categories_on_clear: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_depth: DEFAULT_HISTORY_DEPTH,
            category_policy: CategoryPolicy::default(),
            retain_categories_on_clear: true,
            data_file: None,
        }
    }
}

impl Config {
    fn default_history_depth() -> usize {
        DEFAULT_HISTORY_DEPTH
    }

    fn default_retain_categories() -> bool {
        true
    }

    pub fn category_retention(&self) -> CategoryRetention {
        if self.retain_categories_on_clear {
            CategoryRetention::Keep
        } else {
            CategoryRetention::Reset
        }
    }
}

/// Loads and saves [`Config`] as JSON under the application data directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    pub fn load(&self) -> Result<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            let config = serde_json::from_str(&data)
                .map_err(|err| MooLahError::ConfigError(err.to_string()))?;
            tracing::debug!(path = %self.path.display(), "loaded configuration");
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::info!(path = %self.path.display(), "saved configuration");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
