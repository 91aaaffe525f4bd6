//! Domain services
//!
//! Pure business logic with no I/O.

pub mod stock_number;

pub use stock_number::{issue, pad_counter, preview, resolve_rule};
