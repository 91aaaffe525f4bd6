//! Command handlers

use crate::cli::{Cli, Commands, RuleEdits, StockAction, VehicleAction};
use crate::output::{
    output_import_plan, output_import_report, output_sources, output_stock_config,
    output_stock_settings, output_vehicles,
};
use chrono::{Local, NaiveDate};
use dealerdesk_app::config::Config;
use dealerdesk_app::interchange::{plan_import, read_import};
use dealerdesk_app::inventory_service::InventoryService;
use dealerdesk_app::repository::{open_inventory_repo, open_settings_repo};
use dealerdesk_app::settings_service::{SettingsService, StockNumberDraft};
use dealerdesk_domain::model::NewVehicle;
use dealerdesk_infra::persistence::{FileInventoryRepository, FileSettingsRepository};
use dealerdesk_types::{ExportFormat, OutputFormat, Result, VehicleClass};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let output_format = cli.format.unwrap_or(config.output_format);
    debug!(store_dir = ?config.store_dir, %output_format, "loaded configuration");

    match cli.command {
        Commands::Stock { action } => cmd_stock(&config, action, output_format),

        Commands::Sources { set } => cmd_sources(&config, set, output_format),

        Commands::Vehicle { action } => cmd_vehicle(&config, action, output_format),

        Commands::Import {
            file,
            class,
            dry_run,
        } => cmd_import(&config, &file, class, dry_run, output_format),

        Commands::Export { to, output } => {
            let format = to.unwrap_or(config.export_format);
            let dir = output.unwrap_or_else(|| config.export_dir());
            cmd_export(&config, format, &dir, Local::now().date_naive())
        }

        Commands::Config {
            show,
            set_store_dir,
            set_output,
            set_export_format,
            set_export_dir,
            set_export_prefix,
            reset,
        } => cmd_config(
            show,
            ConfigEdits {
                store_dir: set_store_dir,
                output_format: set_output,
                export_format: set_export_format,
                export_dir: set_export_dir,
                export_prefix: set_export_prefix,
            },
            reset,
        ),
    }
}

fn settings_service(config: &Config) -> Result<SettingsService<FileSettingsRepository>> {
    Ok(SettingsService::new(open_settings_repo(config)?))
}

fn inventory_service(
    config: &Config,
) -> Result<InventoryService<FileSettingsRepository, FileInventoryRepository>> {
    Ok(InventoryService::new(
        open_settings_repo(config)?,
        open_inventory_repo(config)?,
    ))
}

fn apply_edits(draft: &mut StockNumberDraft, edits: RuleEdits) {
    if let Some(rule) = edits.prefix {
        draft.set_prefix_rule(rule);
    }
    if let Some(rule) = edits.suffix {
        draft.set_suffix_rule(rule);
    }
    if let Some(counter) = edits.counter {
        draft.set_counter(counter);
    }
}

fn cmd_stock(config: &Config, action: StockAction, output_format: OutputFormat) -> Result<()> {
    let service = settings_service(config)?;

    match action {
        StockAction::Show => output_stock_settings(output_format, &service.settings()?),

        StockAction::Preview(edits) => {
            let mut draft = service.draft(edits.class)?;
            apply_edits(&mut draft, edits);
            output_stock_config(output_format, draft.class(), draft.config(), &draft.preview())
        }

        StockAction::Set(edits) => {
            let mut draft = service.draft(edits.class)?;
            apply_edits(&mut draft, edits);
            let class = draft.class();
            let preview = draft.preview();
            let committed = service.commit(draft)?;
            if output_format == OutputFormat::Table {
                println!("Stock number settings saved");
            }
            output_stock_config(output_format, class, &committed, &preview)
        }

        StockAction::Reset { class } => {
            let settings = service.reset(class)?;
            if output_format == OutputFormat::Table {
                match class {
                    Some(class) => println!("Stock number settings reset for {} vehicles", class),
                    None => println!("Stock number settings reset"),
                }
            }
            output_stock_settings(output_format, &settings)
        }
    }
}

fn cmd_sources(config: &Config, set: Option<Vec<String>>, output_format: OutputFormat) -> Result<()> {
    let service = settings_service(config)?;
    let sources = match set {
        Some(sources) => service.set_sources(sources)?,
        None => service.settings()?.sources,
    };
    output_sources(output_format, &sources)
}

fn cmd_vehicle(config: &Config, action: VehicleAction, output_format: OutputFormat) -> Result<()> {
    let service = inventory_service(config)?;

    match action {
        VehicleAction::Add {
            class,
            make,
            model,
            year,
            vin,
            source,
            price,
            acquired,
            stock_number,
        } => {
            let mut new_vehicle = NewVehicle::new(class, make, model);
            new_vehicle.year = year;
            new_vehicle.vin = vin;
            new_vehicle.source = source;
            new_vehicle.price = price;
            new_vehicle.acquired_on = acquired;
            new_vehicle.stock_number = stock_number;

            let vehicle = service.create_vehicle(new_vehicle)?;
            if output_format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&vehicle)?);
            } else {
                println!("Added {} as stock number {}", vehicle.display_name(), vehicle.stock_number);
            }
            Ok(())
        }

        VehicleAction::List => output_vehicles(output_format, &service.list()?),
    }
}

fn cmd_import(
    config: &Config,
    file: &Path,
    class: VehicleClass,
    dry_run: bool,
    output_format: OutputFormat,
) -> Result<()> {
    let records = read_import(file)?;
    eprintln!("Read {} row(s) from {}", records.len(), file.display());

    if dry_run {
        return output_import_plan(output_format, &plan_import(&records, class));
    }

    let service = inventory_service(config)?;

    let pb = if output_format == OutputFormat::Table {
        ProgressBar::new(records.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let report = service.import_records(&records, class, || pb.inc(1))?;
    pb.finish_with_message("done");

    output_import_report(output_format, &report)
}

fn cmd_export(config: &Config, format: ExportFormat, dir: &Path, date: NaiveDate) -> Result<()> {
    let service = inventory_service(config)?;
    let path = service.export(format, &config.export_prefix, dir, date)?;
    println!("Exported to: {}", path.display());
    Ok(())
}

/// Config fields that `config --set-*` can change
struct ConfigEdits {
    store_dir: Option<PathBuf>,
    output_format: Option<OutputFormat>,
    export_format: Option<ExportFormat>,
    export_dir: Option<PathBuf>,
    export_prefix: Option<String>,
}

impl ConfigEdits {
    /// Apply the edits; returns whether anything changed
    fn apply(self, config: &mut Config) -> bool {
        let mut modified = false;

        if let Some(dir) = self.store_dir {
            config.store_dir = Some(dir);
            modified = true;
        }

        if let Some(output_format) = self.output_format {
            config.output_format = output_format;
            modified = true;
        }

        if let Some(export_format) = self.export_format {
            config.export_format = export_format;
            modified = true;
        }

        if let Some(dir) = self.export_dir {
            config.export_dir = Some(dir);
            modified = true;
        }

        if let Some(prefix) = self.export_prefix {
            config.export_prefix = prefix;
            modified = true;
        }

        modified
    }
}

fn cmd_config(show: bool, edits: ConfigEdits, reset: bool) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let modified = edits.apply(&mut config);

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}
