//! Inventory use cases: vehicle creation, bulk import, export
//!
//! Creating a vehicle is the only place a counter advances. The current
//! counter stamps the new vehicle's stock number, then `counter + 1` is
//! committed for the class.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use dealerdesk_domain::model::{InventoryVehicle, NewVehicle};
use dealerdesk_domain::service::issue;
use dealerdesk_domain::{InventoryRepository, SettingsRepository};
use dealerdesk_infra::tabular::{encode_file, export_file_name, RecordSet};
use dealerdesk_types::{Error, ExportFormat, Result, VehicleClass};
use serde::Serialize;
use tracing::{info, warn};

use crate::interchange::{plan_import, vehicle_rows, ImportIssue, INVENTORY_HEADERS, INVENTORY_SHEET};

/// Outcome of a bulk import
#[derive(Debug, Default, Serialize)]
pub struct ImportReport {
    pub imported: Vec<InventoryVehicle>,
    pub skipped: Vec<ImportIssue>,
}

/// Inventory use cases over a settings store and an inventory store
pub struct InventoryService<S, I> {
    settings: S,
    inventory: I,
}

impl<S: SettingsRepository, I: InventoryRepository> InventoryService<S, I> {
    pub fn new(settings: S, inventory: I) -> Self {
        Self {
            settings,
            inventory,
        }
    }

    pub fn inventory(&self) -> &I {
        &self.inventory
    }

    /// Create a vehicle, stamping a stock number from its class counter
    /// unless one was supplied.
    ///
    /// A supplied stock number must not already be in inventory. A generated
    /// one that collides with an existing vehicle is skipped, and the counter
    /// keeps advancing until a free number is found. The advanced counter is
    /// committed before the vehicle is saved, so an error means no vehicle
    /// was stored.
    pub fn create_vehicle(&self, new_vehicle: NewVehicle) -> Result<InventoryVehicle> {
        let supplied = new_vehicle
            .stock_number
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        if let Some(stock_number) = supplied {
            if self.inventory.find_by_stock_number(&stock_number)?.is_some() {
                return Err(Error::InvalidInput(format!(
                    "stock number {} already exists",
                    stock_number
                )));
            }
            let vehicle = new_vehicle.into_vehicle(stock_number);
            self.inventory.save(&vehicle)?;
            info!(stock_number = %vehicle.stock_number, "vehicle added with supplied stock number");
            return Ok(vehicle);
        }

        let class = new_vehicle.class;
        let settings = self.settings.load()?;
        let mut config = settings.stock_numbers.get(class).clone();

        let stock_number = loop {
            let (candidate, next) = issue(&config, &settings.sources);
            let taken = self.inventory.find_by_stock_number(&candidate)?.is_some();
            let exhausted = next.counter == config.counter;
            config = next;
            if !taken {
                break candidate;
            }
            if exhausted {
                return Err(Error::InvalidInput(format!(
                    "no free stock number left for {} vehicles",
                    class
                )));
            }
            warn!(%candidate, %class, "stock number already in use, advancing counter");
        };

        // Counter first: a failed save burns a number, it never stores a
        // vehicle whose counter was not advanced.
        self.settings.commit_stock_number(class, &config)?;
        let vehicle = new_vehicle.into_vehicle(stock_number);
        self.inventory.save(&vehicle)?;
        info!(
            stock_number = %vehicle.stock_number,
            %class,
            next_counter = config.counter,
            "vehicle added"
        );
        Ok(vehicle)
    }

    /// All vehicles, ordered by stock number
    pub fn list(&self) -> Result<Vec<InventoryVehicle>> {
        self.inventory.find_all()
    }

    /// Create a vehicle for every valid record.
    ///
    /// Invalid rows and rows whose creation fails are reported, not fatal.
    /// `on_row` is called once per record.
    pub fn import_records<F>(
        &self,
        records: &RecordSet,
        default_class: VehicleClass,
        mut on_row: F,
    ) -> Result<ImportReport>
    where
        F: FnMut(),
    {
        let plan = plan_import(records, default_class);
        let mut report = ImportReport {
            imported: Vec::with_capacity(plan.vehicles.len()),
            skipped: plan.issues,
        };
        for _ in &report.skipped {
            on_row();
        }

        for (row, new_vehicle) in plan.vehicles {
            match self.create_vehicle(new_vehicle) {
                Ok(vehicle) => report.imported.push(vehicle),
                Err(Error::InvalidInput(reason)) => {
                    report.skipped.push(ImportIssue { row, reason });
                }
                Err(e) => return Err(e),
            }
            on_row();
        }
        report.skipped.sort_by_key(|issue| issue.row);

        info!(
            imported = report.imported.len(),
            skipped = report.skipped.len(),
            "import finished"
        );
        Ok(report)
    }

    /// Write the whole inventory to `<dir>/<prefix>_export_<date>.<ext>`
    pub fn export(
        &self,
        format: ExportFormat,
        prefix: &str,
        dir: &Path,
        date: NaiveDate,
    ) -> Result<PathBuf> {
        let vehicles = self.inventory.find_all()?;
        let bytes = encode_file(format, INVENTORY_SHEET, &INVENTORY_HEADERS, &vehicle_rows(&vehicles))?;

        std::fs::create_dir_all(dir)?;
        let path = dir.join(export_file_name(prefix, format, date));
        std::fs::write(&path, bytes)?;

        info!(path = %path.display(), vehicles = vehicles.len(), "inventory exported");
        Ok(path)
    }
}
