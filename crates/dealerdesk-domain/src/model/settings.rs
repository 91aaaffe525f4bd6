//! Dealer settings snapshot

use serde::{Deserialize, Serialize};

use super::stock_number::StockNumberSettings;

/// Persisted dealer settings: stock number rules plus acquisition sources
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealerSettings {
    #[serde(default)]
    pub stock_numbers: StockNumberSettings,

    /// Acquisition sources (e.g. "Auction", "Trade-In"). Only the first
    /// entry feeds the `source` rule.
    #[serde(default)]
    pub sources: Vec<String>,
}
