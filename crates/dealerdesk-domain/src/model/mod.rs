//! Domain model types

pub mod settings;
pub mod stock_number;
pub mod vehicle;

pub use settings::DealerSettings;
pub use stock_number::{StockNumberConfig, StockNumberRule, StockNumberSettings};
pub use vehicle::{InventoryVehicle, NewVehicle};
