//! Output formatting module

use dealerdesk_app::interchange::ImportPlan;
use dealerdesk_app::inventory_service::ImportReport;
use dealerdesk_domain::model::{DealerSettings, InventoryVehicle, StockNumberConfig};
use dealerdesk_types::{OutputFormat, Result, VehicleClass};
use serde::Serialize;

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StockNumberView<'a> {
    class: VehicleClass,
    #[serde(flatten)]
    config: &'a StockNumberConfig,
    next_stock_number: String,
}

fn print_config_table(class: VehicleClass, config: &StockNumberConfig, next: &str) {
    println!("[{}]", class);
    println!("  Prefix rule:  {}", config.prefix_rule);
    println!("  Suffix rule:  {}", config.suffix_rule);
    println!("  Counter:      {}", config.counter);
    println!("  Next number:  {}", next);
}

/// Print both classes' stock number settings with their next numbers
pub fn output_stock_settings(output_format: OutputFormat, settings: &DealerSettings) -> Result<()> {
    let views: Vec<_> = VehicleClass::ALL
        .iter()
        .map(|&class| {
            let config = settings.stock_numbers.get(class);
            StockNumberView {
                class,
                config,
                next_stock_number: config.preview(&settings.sources),
            }
        })
        .collect();

    if output_format == OutputFormat::Json {
        return print_json(&views);
    }

    println!("\nStock Numbers");
    println!("=============");
    for view in &views {
        print_config_table(view.class, view.config, &view.next_stock_number);
    }
    println!(
        "\nSources: {}",
        if settings.sources.is_empty() {
            "(none)".to_string()
        } else {
            settings.sources.join(", ")
        }
    );
    Ok(())
}

/// Print a single class's config with a preview
pub fn output_stock_config(
    output_format: OutputFormat,
    class: VehicleClass,
    config: &StockNumberConfig,
    preview: &str,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(&StockNumberView {
            class,
            config,
            next_stock_number: preview.to_string(),
        });
    }
    print_config_table(class, config, preview);
    Ok(())
}

pub fn output_sources(output_format: OutputFormat, sources: &[String]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(sources);
    }
    if sources.is_empty() {
        println!("No acquisition sources configured");
    }
    for (i, source) in sources.iter().enumerate() {
        let marker = if i == 0 { " (used by source rule)" } else { "" };
        println!("{}. {}{}", i + 1, source, marker);
    }
    Ok(())
}

pub fn output_vehicles(output_format: OutputFormat, vehicles: &[InventoryVehicle]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(vehicles);
    }

    if vehicles.is_empty() {
        println!("No vehicles in inventory");
        return Ok(());
    }

    println!(
        "{:<14} {:<5} {:<32} {:<18} {:>10}",
        "Stock", "Class", "Vehicle", "VIN", "Price"
    );
    println!("{}", "-".repeat(83));
    for v in vehicles {
        println!(
            "{:<14} {:<5} {:<32} {:<18} {:>10}",
            v.stock_number,
            v.class.label(),
            truncate(&v.display_name(), 32),
            v.vin.as_deref().unwrap_or("-"),
            v.price.map(|p| format!("{:.2}", p)).unwrap_or_else(|| "-".to_string()),
        );
    }
    println!("\n{} vehicle(s)", vehicles.len());
    Ok(())
}

pub fn output_import_plan(output_format: OutputFormat, plan: &ImportPlan) -> Result<()> {
    if output_format == OutputFormat::Json {
        #[derive(Serialize)]
        struct PlanView<'a> {
            ready: usize,
            issues: &'a [dealerdesk_app::interchange::ImportIssue],
        }
        return print_json(&PlanView {
            ready: plan.vehicles.len(),
            issues: &plan.issues,
        });
    }

    println!("Dry run: {} row(s) ready to import", plan.vehicles.len());
    for (row, vehicle) in &plan.vehicles {
        println!(
            "  row {:>4}: {} {} {} [{}]",
            row,
            vehicle.year.map(|y| y.to_string()).unwrap_or_default(),
            vehicle.make,
            vehicle.model,
            vehicle.stock_number.as_deref().unwrap_or("auto")
        );
    }
    print_issues(&plan.issues);
    Ok(())
}

pub fn output_import_report(output_format: OutputFormat, report: &ImportReport) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(report);
    }

    println!("Imported: {}", report.imported.len());
    for v in &report.imported {
        println!("  {} {}", v.stock_number, v.display_name());
    }
    print_issues(&report.skipped);
    Ok(())
}

fn print_issues(issues: &[dealerdesk_app::interchange::ImportIssue]) {
    if issues.is_empty() {
        return;
    }
    println!("Skipped: {}", issues.len());
    for issue in issues {
        println!("  row {:>4}: {}", issue.row, issue.reason);
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Camry", 10), "Camry");
        assert_eq!(truncate("2019 Toyota Land Cruiser Heritage", 12), "2019 Toyo...");
    }

    #[test]
    fn test_stock_view_json_shape() {
        let config = StockNumberConfig::default_for(VehicleClass::Used);
        let view = StockNumberView {
            class: VehicleClass::Used,
            config: &config,
            next_stock_number: "1004".to_string(),
        };
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["class"], "used");
        assert_eq!(value["counter"], 1004);
        assert_eq!(value["prefixRule"]["type"], "none");
        assert_eq!(value["nextStockNumber"], "1004");
    }
}
