//! Mapping between inventory vehicles and tabular records
//!
//! Column lookup on import is lenient: headers are compared case-insensitively
//! with spaces, dashes and underscores ignored, so "Stock Number",
//! "stock_number" and "stockNumber" all match.

use std::path::Path;

use dealerdesk_domain::model::{InventoryVehicle, NewVehicle};
use dealerdesk_infra::tabular::{self, parse_date, Cell, RecordSet, TabularRecord};
use dealerdesk_types::{Error, Result, VehicleClass};
use serde::Serialize;
use tracing::debug;

/// Export column order
pub const INVENTORY_HEADERS: [&str; 9] = [
    "Stock Number",
    "Class",
    "Year",
    "Make",
    "Model",
    "VIN",
    "Source",
    "Price",
    "Acquired",
];

/// Worksheet name used for spreadsheet exports
pub const INVENTORY_SHEET: &str = "Inventory";

/// A row that could not be turned into a vehicle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportIssue {
    /// 1-based data row number (the header row is not counted)
    pub row: usize,
    pub reason: String,
}

/// Rows parsed from a record set, ready to be created
#[derive(Debug, Clone, Default)]
pub struct ImportPlan {
    pub vehicles: Vec<(usize, NewVehicle)>,
    pub issues: Vec<ImportIssue>,
}

/// Read an import file. A file without data rows is rejected.
pub fn read_import(path: &Path) -> Result<RecordSet> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.display().to_string()));
    }
    let records = tabular::decode_file(path)?;
    if records.is_empty() {
        return Err(Error::EmptyInput(path.display().to_string()));
    }
    Ok(records)
}

/// Parse every record; rows with problems become issues instead of errors
pub fn plan_import(records: &RecordSet, default_class: VehicleClass) -> ImportPlan {
    let mut plan = ImportPlan::default();
    for (index, record) in records.records().iter().enumerate() {
        let row = index + 1;
        match parse_vehicle_record(record, default_class) {
            Ok(vehicle) => plan.vehicles.push((row, vehicle)),
            Err(reason) => {
                debug!(row, %reason, "skipping import row");
                plan.issues.push(ImportIssue { row, reason });
            }
        }
    }
    plan
}

fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// First non-blank value among the headers matching any of `names`
fn field<'a>(record: &'a TabularRecord, names: &[&str]) -> Option<&'a str> {
    record
        .iter()
        .filter(|(header, _)| names.contains(&normalize_header(header).as_str()))
        .map(|(_, value)| value.trim())
        .find(|value| !value.is_empty())
}

fn parse_vehicle_record(
    record: &TabularRecord,
    default_class: VehicleClass,
) -> std::result::Result<NewVehicle, String> {
    let make = field(record, &["make"]).ok_or("missing make")?;
    let model = field(record, &["model"]).ok_or("missing model")?;

    let class = match field(record, &["class", "condition", "type"]) {
        Some(value) => value.parse::<VehicleClass>().map_err(|e| e.to_string())?,
        None => default_class,
    };

    let year = field(record, &["year"])
        .map(|value| {
            value
                .parse::<u16>()
                .map_err(|_| format!("invalid year '{}'", value))
        })
        .transpose()?;

    let price = field(record, &["price", "askingprice"])
        .map(|value| {
            let cleaned: String = value.chars().filter(|c| !matches!(c, '$' | ',')).collect();
            cleaned
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("invalid price '{}'", value))
        })
        .transpose()?;

    let acquired_on = field(record, &["acquired", "acquiredon", "acquireddate"])
        .map(|value| parse_date(value).ok_or_else(|| format!("invalid date '{}'", value)))
        .transpose()?;

    Ok(NewVehicle {
        class,
        year,
        make: make.to_string(),
        model: model.to_string(),
        vin: field(record, &["vin"]).map(str::to_string),
        source: field(record, &["source", "acquisitionsource"]).map(str::to_string),
        price,
        acquired_on,
        stock_number: field(record, &["stocknumber", "stock", "stockno"]).map(str::to_string),
    })
}

/// Export cells for each vehicle, in [`INVENTORY_HEADERS`] order
pub fn vehicle_rows(vehicles: &[InventoryVehicle]) -> Vec<Vec<Cell>> {
    vehicles
        .iter()
        .map(|v| {
            vec![
                Cell::from(&v.stock_number),
                Cell::from(v.class.label()),
                Cell::from(v.year),
                Cell::from(&v.make),
                Cell::from(&v.model),
                Cell::from(v.vin.as_ref()),
                Cell::from(v.source.as_ref()),
                Cell::from(v.price),
                Cell::from(v.acquired_on),
            ]
        })
        .collect()
}
