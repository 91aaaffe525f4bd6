//! End-to-end workflows over the file-backed stores

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use dealerdesk_app::interchange::read_import;
use dealerdesk_app::inventory_service::InventoryService;
use dealerdesk_app::repository::{open_inventory_repo_at, open_settings_repo_at};
use dealerdesk_app::settings_service::SettingsService;
use dealerdesk_domain::model::{NewVehicle, StockNumberRule};
use dealerdesk_domain::SettingsRepository;
use dealerdesk_infra::persistence::{FileInventoryRepository, FileSettingsRepository};
use dealerdesk_infra::tabular::decode_file;
use dealerdesk_types::{CodecError, Error, ExportFormat, VehicleClass};
use tempfile::tempdir;

fn inventory_service(dir: &Path) -> InventoryService<FileSettingsRepository, FileInventoryRepository> {
    InventoryService::new(
        open_settings_repo_at(dir.to_path_buf()).unwrap(),
        open_inventory_repo_at(dir.to_path_buf()).unwrap(),
    )
}

#[test]
fn committed_rules_stamp_vehicles_and_advance_counter() {
    let dir = tempdir().unwrap();
    let settings = SettingsService::new(open_settings_repo_at(dir.path().to_path_buf()).unwrap());
    settings.set_sources(vec!["Auction".to_string()]).unwrap();

    let mut draft = settings.draft(VehicleClass::Used).unwrap();
    draft
        .set_prefix_rule(StockNumberRule::Source)
        .set_suffix_rule(StockNumberRule::Buyer)
        .set_counter(42);
    assert_eq!(draft.preview(), "A0042BUY");
    settings.commit(draft).unwrap();

    let service = inventory_service(dir.path());
    let first = service
        .create_vehicle(NewVehicle::new(VehicleClass::Used, "Toyota", "Camry"))
        .unwrap();
    let second = service
        .create_vehicle(NewVehicle::new(VehicleClass::Used, "Honda", "Civic"))
        .unwrap();
    let fresh = service
        .create_vehicle(NewVehicle::new(VehicleClass::New, "Ford", "Bronco"))
        .unwrap();

    assert_eq!(first.stock_number, "A0042BUY");
    assert_eq!(second.stock_number, "A0043BUY");
    assert_eq!(fresh.stock_number, "2000");

    let persisted = settings.settings().unwrap();
    assert_eq!(persisted.stock_numbers.used.counter, 44);
    assert_eq!(persisted.stock_numbers.new.counter, 2001);
    assert_eq!(settings.preview(VehicleClass::Used).unwrap(), "A0044BUY");
}

#[test]
fn generated_number_skips_existing_stock() {
    let dir = tempdir().unwrap();
    let service = inventory_service(dir.path());

    let mut imported = NewVehicle::new(VehicleClass::Used, "Mazda", "CX-5");
    imported.stock_number = Some("1004".to_string());
    service.create_vehicle(imported).unwrap();

    let created = service
        .create_vehicle(NewVehicle::new(VehicleClass::Used, "Kia", "Soul"))
        .unwrap();
    assert_eq!(created.stock_number, "1005");

    let settings = open_settings_repo_at(dir.path().to_path_buf()).unwrap();
    assert_eq!(settings.load().unwrap().stock_numbers.used.counter, 1006);
}

#[test]
fn duplicate_supplied_stock_number_is_rejected() {
    let dir = tempdir().unwrap();
    let service = inventory_service(dir.path());

    let mut vehicle = NewVehicle::new(VehicleClass::New, "Subaru", "Outback");
    vehicle.stock_number = Some("N77".to_string());
    service.create_vehicle(vehicle.clone()).unwrap();

    let err = service.create_vehicle(vehicle).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[test]
fn csv_import_then_export_round_trip() {
    let dir = tempdir().unwrap();
    let service = inventory_service(dir.path());

    let import_path = dir.path().join("incoming.csv");
    fs::write(
        &import_path,
        "\u{feff}Stock Number,Make,Model,Year,Price,Acquired\r\n\
         ,Toyota,Camry,2019,18250,2024-02-01\r\n\
         U9000,Honda,\"Civic, EX\",2020,,\r\n\
         ,Ford,,2018,,\r\n",
    )
    .unwrap();

    let records = read_import(&import_path).unwrap();
    let mut rows_seen = 0;
    let report = service
        .import_records(&records, VehicleClass::Used, || rows_seen += 1)
        .unwrap();

    assert_eq!(rows_seen, 3);
    assert_eq!(report.imported.len(), 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].row, 3);
    assert_eq!(report.imported[0].stock_number, "1004");
    assert_eq!(report.imported[1].stock_number, "U9000");

    let date = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
    let export_dir = dir.path().join("exports");
    let path = service
        .export(ExportFormat::Csv, "inventory", &export_dir, date)
        .unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "inventory_export_2024-06-30.csv"
    );

    let bytes = fs::read(&path).unwrap();
    assert!(bytes.starts_with(&[0xEF, 0xBB, 0xBF]));

    let exported = decode_file(&path).unwrap();
    assert_eq!(exported.len(), 2);
    let civic = &exported.records()[1];
    assert_eq!(civic.get("Stock Number"), Some("U9000"));
    assert_eq!(civic.get("Model"), Some("Civic, EX"));
    assert_eq!(civic.get("Class"), Some("used"));
    let camry = &exported.records()[0];
    assert_eq!(camry.get("Acquired"), Some("2024-02-01"));
    assert_eq!(camry.get("Price"), Some("18250"));
}

#[test]
fn xlsx_export_reimports() {
    let dir = tempdir().unwrap();
    let service = inventory_service(dir.path());
    let mut vehicle = NewVehicle::new(VehicleClass::New, "Tesla", "Model 3");
    vehicle.year = Some(2024);
    service.create_vehicle(vehicle).unwrap();

    let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let path = service
        .export(ExportFormat::Xlsx, "inventory", dir.path(), date)
        .unwrap();
    assert!(path.ends_with("inventory_export_2024-01-02.xlsx"));

    let records = read_import(&path).unwrap();
    assert_eq!(records.records()[0].get("Stock Number"), Some("2000"));
    assert_eq!(records.records()[0].get("Year"), Some("2024"));
    assert_eq!(records.records()[0].get("VIN"), Some(""));
}

#[test]
fn empty_import_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    fs::write(&path, "Make,Model\n").unwrap();

    let err = read_import(&path).unwrap_err();
    assert!(matches!(err, Error::EmptyInput(_)));
}

#[test]
fn unsupported_import_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("vehicles.json");
    fs::write(&path, "[]").unwrap();

    let err = read_import(&path).unwrap_err();
    assert!(matches!(err, Error::Codec(CodecError::UnsupportedFormat(_))));
}

#[test]
fn reset_restores_default_counters() {
    let dir = tempdir().unwrap();
    let settings = SettingsService::new(open_settings_repo_at(dir.path().to_path_buf()).unwrap());
    settings
        .commit_rules(VehicleClass::New, StockNumberRule::custom("n"), StockNumberRule::None, 3)
        .unwrap();

    let restored = settings.reset(Some(VehicleClass::New)).unwrap();
    assert_eq!(restored.stock_numbers.new.counter, 2000);
    assert_eq!(restored.stock_numbers.new.prefix_rule, StockNumberRule::None);
}
