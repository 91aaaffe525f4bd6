//! Repository adapters for persistence layer

use std::path::PathBuf;

use dealerdesk_infra::persistence::{FileInventoryRepository, FileSettingsRepository};
use dealerdesk_types::Result;

use crate::config::Config;

/// Open file-based settings repository
pub fn open_settings_repo(config: &Config) -> Result<FileSettingsRepository> {
    open_settings_repo_at(config.store_dir()?)
}

/// Open file-based inventory repository
pub fn open_inventory_repo(config: &Config) -> Result<FileInventoryRepository> {
    open_inventory_repo_at(config.store_dir()?)
}

/// Open settings repository at a custom directory
pub fn open_settings_repo_at(store_dir: PathBuf) -> Result<FileSettingsRepository> {
    FileSettingsRepository::open(store_dir)
}

/// Open inventory repository at a custom directory
pub fn open_inventory_repo_at(store_dir: PathBuf) -> Result<FileInventoryRepository> {
    FileInventoryRepository::open(store_dir)
}
