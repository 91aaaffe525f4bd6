//! Repository trait definitions for data persistence

use dealerdesk_types::{Error, VehicleClass};

use crate::model::{DealerSettings, InventoryVehicle, StockNumberConfig};

/// Repository for dealer settings
pub trait SettingsRepository {
    /// Load settings, applying defaults for anything not yet stored
    fn load(&self) -> Result<DealerSettings, Error>;

    /// Replace the stock number triple of one class.
    ///
    /// Concurrent commits to the same class are last-write-wins.
    fn commit_stock_number(&self, class: VehicleClass, config: &StockNumberConfig) -> Result<(), Error>;

    /// Replace the acquisition source list
    fn save_sources(&self, sources: &[String]) -> Result<(), Error>;
}

/// Repository for inventory vehicles
pub trait InventoryRepository {
    /// Save a vehicle (insert or replace by id)
    fn save(&self, vehicle: &InventoryVehicle) -> Result<(), Error>;

    /// Find a vehicle by stock number
    fn find_by_stock_number(&self, stock_number: &str) -> Result<Option<InventoryVehicle>, Error>;

    /// Find all vehicles, ordered by stock number
    fn find_all(&self) -> Result<Vec<InventoryVehicle>, Error>;
}
