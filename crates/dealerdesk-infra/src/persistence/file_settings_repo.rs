//! File-based dealer settings repository

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use dealerdesk_domain::model::{DealerSettings, StockNumberConfig};
use dealerdesk_domain::SettingsRepository;
use dealerdesk_types::{ConfigError, Error, Result, VehicleClass};
use tracing::{debug, info};

use super::write_json_atomic;

/// Stores dealer settings in `settings.json`.
///
/// Every call re-reads the file, so commits made by another process are
/// visible immediately. Concurrent commits are last-write-wins.
pub struct FileSettingsRepository {
    store_path: PathBuf,
}

impl FileSettingsRepository {
    /// Open the repository, creating the directory if needed
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        let store_path = store_dir.join("settings.json");
        Ok(Self { store_path })
    }

    pub fn path(&self) -> &Path {
        &self.store_path
    }

    fn read(&self) -> Result<Option<DealerSettings>> {
        if !self.store_path.exists() {
            return Ok(None);
        }
        let file = File::open(&self.store_path)?;
        let reader = BufReader::new(file);
        let settings = serde_json::from_reader(reader).map_err(|e| {
            ConfigError::ParseError(format!("{}: {}", self.store_path.display(), e))
        })?;
        Ok(Some(settings))
    }

    fn persist(&self, settings: &DealerSettings) -> Result<()> {
        write_json_atomic(&self.store_path, settings)
    }
}

impl SettingsRepository for FileSettingsRepository {
    /// Load settings. The first read writes the defaults to disk.
    fn load(&self) -> std::result::Result<DealerSettings, Error> {
        match self.read()? {
            Some(settings) => Ok(settings),
            None => {
                debug!(path = %self.store_path.display(), "creating default settings");
                let settings = DealerSettings::default();
                self.persist(&settings)?;
                Ok(settings)
            }
        }
    }

    fn commit_stock_number(
        &self,
        class: VehicleClass,
        config: &StockNumberConfig,
    ) -> std::result::Result<(), Error> {
        let mut settings = self.load()?;
        settings.stock_numbers.replace(class, config.clone());
        self.persist(&settings)?;
        info!(%class, counter = config.counter, "stock number settings committed");
        Ok(())
    }

    fn save_sources(&self, sources: &[String]) -> std::result::Result<(), Error> {
        let mut settings = self.load()?;
        settings.sources = sources.to_vec();
        self.persist(&settings)?;
        info!(count = sources.len(), "acquisition sources saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealerdesk_domain::model::StockNumberRule;
    use tempfile::tempdir;

    #[test]
    fn test_first_load_writes_defaults() {
        let dir = tempdir().unwrap();
        let repo = FileSettingsRepository::open(dir.path().to_path_buf()).unwrap();
        assert!(!repo.path().exists());

        let settings = repo.load().unwrap();
        assert_eq!(settings, DealerSettings::default());
        assert!(repo.path().exists());
    }

    #[test]
    fn test_commit_replaces_one_class() {
        let dir = tempdir().unwrap();
        let repo = FileSettingsRepository::open(dir.path().to_path_buf()).unwrap();

        let config = StockNumberConfig {
            prefix_rule: StockNumberRule::Source,
            suffix_rule: StockNumberRule::Buyer,
            counter: 42,
        };
        repo.commit_stock_number(VehicleClass::Used, &config).unwrap();

        let reopened = FileSettingsRepository::open(dir.path().to_path_buf()).unwrap();
        let settings = reopened.load().unwrap();
        assert_eq!(settings.stock_numbers.used, config);
        assert_eq!(
            settings.stock_numbers.new,
            StockNumberConfig::default_for(VehicleClass::New)
        );
        assert!(!dir.path().join("settings.json.tmp").exists());
    }

    #[test]
    fn test_save_sources() {
        let dir = tempdir().unwrap();
        let repo = FileSettingsRepository::open(dir.path().to_path_buf()).unwrap();
        repo.save_sources(&["Auction".to_string(), "Trade-In".to_string()])
            .unwrap();
        assert_eq!(repo.load().unwrap().sources, vec!["Auction", "Trade-In"]);
    }

    #[test]
    fn test_corrupt_file_is_config_error() {
        let dir = tempdir().unwrap();
        let repo = FileSettingsRepository::open(dir.path().to_path_buf()).unwrap();
        fs::write(repo.path(), "{ not json").unwrap();
        assert!(matches!(repo.load(), Err(Error::Config(ConfigError::ParseError(_)))));
    }
}
