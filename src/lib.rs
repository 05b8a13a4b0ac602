//! Bakery Sales - analytics over a weekly bakery sales table.
//!
//! The core ([`table`], [`analysis`]) loads rows, derives Total Sales,
//! Total Cost and Profit, and ranks products by quantity or profit. The
//! [`report`] and [`session`] modules are front ends over that core.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod session;
pub mod table;

pub use error::{SchemaError, SourceError};
pub use table::Table;
