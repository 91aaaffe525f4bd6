//! Application service layer - config, settings drafts, inventory, import/export

pub mod config;
pub mod interchange;
pub mod inventory_service;
pub mod repository;
pub mod settings_service;
