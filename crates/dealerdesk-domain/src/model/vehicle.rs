//! Inventory vehicle type definitions

use chrono::{DateTime, NaiveDate, Utc};
use dealerdesk_types::VehicleClass;
use serde::{Deserialize, Serialize};

/// A vehicle held in inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryVehicle {
    /// Unique identifier
    pub id: String,
    /// Display identifier stamped at creation
    pub stock_number: String,
    pub class: VehicleClass,
    pub year: Option<u16>,
    pub make: String,
    pub model: String,
    #[serde(default)]
    pub vin: Option<String>,
    /// Acquisition source (e.g. "Auction")
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub acquired_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Vehicle data before a stock number is assigned
#[derive(Debug, Clone, PartialEq)]
pub struct NewVehicle {
    pub class: VehicleClass,
    pub year: Option<u16>,
    pub make: String,
    pub model: String,
    pub vin: Option<String>,
    pub source: Option<String>,
    pub price: Option<f64>,
    pub acquired_on: Option<NaiveDate>,
    /// Stock number carried over from an import. `None` draws from the counter.
    pub stock_number: Option<String>,
}

impl NewVehicle {
    pub fn new(class: VehicleClass, make: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            class,
            year: None,
            make: make.into(),
            model: model.into(),
            vin: None,
            source: None,
            price: None,
            acquired_on: None,
            stock_number: None,
        }
    }

    /// Finalize into an inventory vehicle with the given stock number
    pub fn into_vehicle(self, stock_number: String) -> InventoryVehicle {
        InventoryVehicle {
            id: uuid::Uuid::new_v4().to_string(),
            stock_number,
            class: self.class,
            year: self.year,
            make: self.make,
            model: self.model,
            vin: self.vin,
            source: self.source,
            price: self.price,
            acquired_on: self.acquired_on,
            created_at: Utc::now(),
        }
    }
}

impl InventoryVehicle {
    /// "2019 Toyota Camry" style label
    pub fn display_name(&self) -> String {
        match self.year {
            Some(year) => format!("{} {} {}", year, self.make, self.model),
            None => format!("{} {}", self.make, self.model),
        }
    }
}
