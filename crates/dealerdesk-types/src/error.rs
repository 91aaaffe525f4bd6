//! Error types for dealerdesk

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),
}

/// Tabular interchange (CSV / spreadsheet) errors
#[derive(Debug, Error)]
pub enum CodecError {
    /// The spreadsheet payload could not be read. No partial result is returned.
    #[error("Failed to parse spreadsheet: {0}")]
    ParseError(String),

    /// The file extension is neither delimited text nor a spreadsheet.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Codec(#[from] CodecError),

    #[error("Excel export error: {0}")]
    Excel(String),

    #[error("No records found in {0}")]
    EmptyInput(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
