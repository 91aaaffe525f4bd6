//! Domain layer - stock number rules, inventory vehicles, and repository traits

pub mod model;
pub mod repository;
pub mod service;

pub use model::*;
pub use repository::{InventoryRepository, SettingsRepository};
