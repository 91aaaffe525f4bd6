//! Stock number settings use cases
//!
//! Editing happens on a [`StockNumberDraft`]: a private copy of one class's
//! rule triple. Previewing a draft never writes anything; dropping it cancels
//! the edit; committing replaces the persisted triple in one write.

use dealerdesk_domain::model::{DealerSettings, StockNumberConfig, StockNumberRule};
use dealerdesk_domain::SettingsRepository;
use dealerdesk_types::{Result, VehicleClass};
use tracing::debug;

/// Uncommitted edit of one vehicle class's stock number triple
#[derive(Debug, Clone, PartialEq)]
pub struct StockNumberDraft {
    class: VehicleClass,
    config: StockNumberConfig,
    sources: Vec<String>,
}

impl StockNumberDraft {
    pub fn class(&self) -> VehicleClass {
        self.class
    }

    pub fn config(&self) -> &StockNumberConfig {
        &self.config
    }

    pub fn set_prefix_rule(&mut self, rule: StockNumberRule) -> &mut Self {
        self.config.prefix_rule = rule;
        self
    }

    pub fn set_suffix_rule(&mut self, rule: StockNumberRule) -> &mut Self {
        self.config.suffix_rule = rule;
        self
    }

    pub fn set_counter(&mut self, counter: u64) -> &mut Self {
        self.config.counter = counter;
        self
    }

    /// Stock number the draft would produce, using the sources captured when
    /// the draft was opened
    pub fn preview(&self) -> String {
        self.config.preview(&self.sources)
    }
}

/// Settings use cases over any settings repository
pub struct SettingsService<R> {
    repo: R,
}

impl<R: SettingsRepository> SettingsService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Current persisted settings (defaults are created on first read)
    pub fn settings(&self) -> Result<DealerSettings> {
        self.repo.load()
    }

    /// Preview of the next stock number for a class, from persisted settings
    pub fn preview(&self, class: VehicleClass) -> Result<String> {
        let settings = self.repo.load()?;
        Ok(settings.stock_numbers.get(class).preview(&settings.sources))
    }

    /// Open a draft seeded from the persisted triple
    pub fn draft(&self, class: VehicleClass) -> Result<StockNumberDraft> {
        let settings = self.repo.load()?;
        Ok(StockNumberDraft {
            class,
            config: settings.stock_numbers.get(class).clone(),
            sources: settings.sources,
        })
    }

    /// Persist a draft, replacing the class's triple. Returns the committed config.
    pub fn commit(&self, draft: StockNumberDraft) -> Result<StockNumberConfig> {
        debug!(class = %draft.class, preview = %draft.preview(), "committing stock number draft");
        self.commit_rules(
            draft.class,
            draft.config.prefix_rule,
            draft.config.suffix_rule,
            draft.config.counter,
        )
    }

    /// Replace the triple for one class.
    ///
    /// The counter is stored exactly as given; nothing is incremented here.
    pub fn commit_rules(
        &self,
        class: VehicleClass,
        prefix_rule: StockNumberRule,
        suffix_rule: StockNumberRule,
        counter: u64,
    ) -> Result<StockNumberConfig> {
        let config = StockNumberConfig {
            prefix_rule,
            suffix_rule,
            counter,
        };
        self.repo.commit_stock_number(class, &config)?;
        Ok(config)
    }

    /// Restore defaults for one class, or both when `None`
    pub fn reset(&self, class: Option<VehicleClass>) -> Result<DealerSettings> {
        let classes = match class {
            Some(class) => vec![class],
            None => VehicleClass::ALL.to_vec(),
        };
        for class in classes {
            self.repo
                .commit_stock_number(class, &StockNumberConfig::default_for(class))?;
        }
        self.repo.load()
    }

    /// Replace the acquisition source list. Blank entries are dropped.
    pub fn set_sources(&self, sources: Vec<String>) -> Result<Vec<String>> {
        let sources: Vec<String> = sources
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        self.repo.save_sources(&sources)?;
        Ok(sources)
    }
}
