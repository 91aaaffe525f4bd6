//! Persistence implementations
//!
//! This module provides file-based implementations of the repository traits.

mod file_inventory_repo;
mod file_settings_repo;

pub use file_inventory_repo::FileInventoryRepository;
pub use file_settings_repo::FileSettingsRepository;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use dealerdesk_types::Result;
use serde::Serialize;

/// Write JSON to a sibling temp file, then rename it over `path`.
///
/// Readers see either the old document or the new one, never a partial write.
pub(crate) fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let tmp_path = path.with_extension("json.tmp");
    {
        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}
