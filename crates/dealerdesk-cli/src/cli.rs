//! CLI definition using clap

use clap::{ArgAction, Parser, Subcommand};
use dealerdesk_domain::model::StockNumberRule;
use dealerdesk_types::{ExportFormat, OutputFormat, VehicleClass};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dealerdesk")]
#[command(version)]
#[command(about = "Dealership inventory: stock numbers and CSV/XLSX import-export")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Stock number rules and counters
    Stock {
        #[command(subcommand)]
        action: StockAction,
    },

    /// Show or replace acquisition sources
    Sources {
        /// Replace the list (comma-separated, first entry feeds the source rule)
        #[arg(long, value_delimiter = ',')]
        set: Option<Vec<String>>,
    },

    /// Inventory vehicles
    Vehicle {
        #[command(subcommand)]
        action: VehicleAction,
    },

    /// Import vehicles from a CSV or XLS/XLSX file
    Import {
        /// Path to .csv, .xls or .xlsx file
        file: PathBuf,

        /// Class for rows without a Class column
        #[arg(long, short = 'c', default_value = "used")]
        class: VehicleClass,

        /// Dry run - show what would be imported without creating vehicles
        #[arg(long)]
        dry_run: bool,
    },

    /// Export the inventory to CSV or XLSX
    Export {
        /// File format. Uses config value if not specified.
        #[arg(long)]
        to: Option<ExportFormat>,

        /// Output directory. Uses config value if not specified.
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set data directory
        #[arg(long)]
        set_store_dir: Option<PathBuf>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Set default export format
        #[arg(long)]
        set_export_format: Option<ExportFormat>,

        /// Set export directory
        #[arg(long)]
        set_export_dir: Option<PathBuf>,

        /// Set export file name prefix
        #[arg(long)]
        set_export_prefix: Option<String>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}

/// Rule edits shared by `stock preview` and `stock set`
#[derive(clap::Args)]
pub struct RuleEdits {
    /// Vehicle class
    #[arg(long, short = 'c')]
    pub class: VehicleClass,

    /// Prefix rule: none, source, buyer or custom:<value>
    #[arg(long)]
    pub prefix: Option<StockNumberRule>,

    /// Suffix rule: none, source, buyer or custom:<value>
    #[arg(long)]
    pub suffix: Option<StockNumberRule>,

    /// Counter value for the next vehicle
    #[arg(long)]
    pub counter: Option<u64>,
}

#[derive(Subcommand)]
pub enum StockAction {
    /// Show persisted rules, counters and next stock numbers
    Show,

    /// Preview a stock number with edits applied, without saving
    Preview(RuleEdits),

    /// Apply edits and save them
    Set(RuleEdits),

    /// Restore default rules and counters
    Reset {
        /// Only reset this class
        #[arg(long, short = 'c')]
        class: Option<VehicleClass>,
    },
}

#[derive(Subcommand)]
pub enum VehicleAction {
    /// Add a vehicle; its stock number comes from the class counter
    Add {
        #[arg(long, short = 'c')]
        class: VehicleClass,

        #[arg(long)]
        make: String,

        #[arg(long)]
        model: String,

        #[arg(long)]
        year: Option<u16>,

        #[arg(long)]
        vin: Option<String>,

        /// Acquisition source (e.g., "Auction")
        #[arg(long)]
        source: Option<String>,

        #[arg(long)]
        price: Option<f64>,

        /// Acquisition date (YYYY-MM-DD)
        #[arg(long)]
        acquired: Option<chrono::NaiveDate>,

        /// Use this stock number instead of drawing from the counter
        #[arg(long)]
        stock_number: Option<String>,
    },

    /// List inventory vehicles
    List,
}
