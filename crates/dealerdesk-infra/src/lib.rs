//! Infrastructure layer
//!
//! Concrete implementations behind the domain: the CSV/spreadsheet codec and
//! the JSON file repositories.

pub mod persistence;
pub mod tabular;
