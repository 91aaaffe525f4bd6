//! File-based inventory repository implementation

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;

use dealerdesk_domain::model::InventoryVehicle;
use dealerdesk_domain::InventoryRepository;
use dealerdesk_types::{ConfigError, Error, Result};

use super::write_json_atomic;

/// File-based implementation of InventoryRepository
///
/// Stores vehicles in `inventory.json`, keyed by id.
pub struct FileInventoryRepository {
    store_path: PathBuf,
    vehicles: RefCell<HashMap<String, InventoryVehicle>>,
}

impl FileInventoryRepository {
    /// Create or load an inventory repository
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        let store_path = store_dir.join("inventory.json");

        let vehicles = if store_path.exists() {
            let file = File::open(&store_path)?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader).map_err(|e| {
                ConfigError::ParseError(format!("{}: {}", store_path.display(), e))
            })?
        } else {
            HashMap::new()
        };

        Ok(Self {
            store_path,
            vehicles: RefCell::new(vehicles),
        })
    }

    fn persist(&self) -> Result<()> {
        write_json_atomic(&self.store_path, &*self.vehicles.borrow())
    }

    /// Get total vehicle count
    pub fn count(&self) -> usize {
        self.vehicles.borrow().len()
    }
}

impl InventoryRepository for FileInventoryRepository {
    fn save(&self, vehicle: &InventoryVehicle) -> std::result::Result<(), Error> {
        self.vehicles
            .borrow_mut()
            .insert(vehicle.id.clone(), vehicle.clone());
        self.persist()
    }

    fn find_by_stock_number(
        &self,
        stock_number: &str,
    ) -> std::result::Result<Option<InventoryVehicle>, Error> {
        let result = self
            .vehicles
            .borrow()
            .values()
            .find(|v| v.stock_number.eq_ignore_ascii_case(stock_number))
            .cloned();
        Ok(result)
    }

    fn find_all(&self) -> std::result::Result<Vec<InventoryVehicle>, Error> {
        let mut vehicles: Vec<_> = self.vehicles.borrow().values().cloned().collect();
        vehicles.sort_by(|a, b| a.stock_number.cmp(&b.stock_number));
        Ok(vehicles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealerdesk_domain::model::NewVehicle;
    use dealerdesk_types::VehicleClass;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let repo = FileInventoryRepository::open(dir.path().to_path_buf()).unwrap();

        let vehicle = NewVehicle::new(VehicleClass::Used, "Toyota", "Camry")
            .into_vehicle("U1004".to_string());
        repo.save(&vehicle).unwrap();
        assert_eq!(repo.count(), 1);

        let reopened = FileInventoryRepository::open(dir.path().to_path_buf()).unwrap();
        let found = reopened.find_by_stock_number("u1004").unwrap().unwrap();
        assert_eq!(found, vehicle);
    }

    #[test]
    fn test_find_all_sorted_by_stock_number() {
        let dir = tempdir().unwrap();
        let repo = FileInventoryRepository::open(dir.path().to_path_buf()).unwrap();
        for stock in ["U1006", "N2000", "U1004"] {
            let vehicle =
                NewVehicle::new(VehicleClass::Used, "Ford", "F-150").into_vehicle(stock.to_string());
            repo.save(&vehicle).unwrap();
        }

        let stocks: Vec<_> = repo
            .find_all()
            .unwrap()
            .into_iter()
            .map(|v| v.stock_number)
            .collect();
        assert_eq!(stocks, vec!["N2000", "U1004", "U1006"]);
    }
}
