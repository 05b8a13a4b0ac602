//! Analytics core.
//!
//! Derivation of financial columns, grouping/ranking, and summaries. All
//! functions take an explicitly owned [`crate::table::Table`]; nothing here
//! prints or reads input.

pub mod aggregator;
pub mod describe;
pub mod metrics;

pub use aggregator::*;
pub use describe::{describe, info, ColumnInfo, ColumnStats, TableInfo};
pub use metrics::{ensure_totals, verify_totals};
