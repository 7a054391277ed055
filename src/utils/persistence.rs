use std::{fs, path::Path};

use crate::core::errors::Result;
use crate::ledger::{MooLah, MooLahData};

/// Writes the ledger export to disk atomically by staging to a temporary file.
pub fn save_moolah_to_file(moolah: &MooLah, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        super::ensure_dir(parent)?;
    }
    let tmp = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(&moolah.export())?;
    fs::write(&tmp, json)?;
    fs::rename(tmp, path)?;
    tracing::info!(path = %path.display(), expenses = moolah.len(), "saved ledger");
    Ok(())
}

/// Loads a ledger from disk, returning structured errors on failure.
pub fn load_moolah_from_file(path: &Path) -> Result<MooLah> {
    let data = fs::read_to_string(path)?;
    let export: MooLahData = serde_json::from_str(&data)?;
    let moolah = MooLah::import(export)?;
    tracing::info!(path = %path.display(), expenses = moolah.len(), "loaded ledger");
    Ok(moolah)
}

/// Like [`load_moolah_from_file`], but a missing file yields an empty ledger.
pub fn load_or_default(path: &Path) -> Result<MooLah> {
    if path.exists() {
        load_moolah_from_file(path)
    } else {
        tracing::debug!(path = %path.display(), "no stored ledger, starting empty");
        Ok(MooLah::new())
    }
}
