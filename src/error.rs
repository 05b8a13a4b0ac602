//! Error types for the analytics core.
//!
//! Loading failures and schema failures are kept apart so a front end can
//! treat the first as fatal and the second as a per-action report.

use std::path::PathBuf;
use thiserror::Error;

/// The tabular source could not be located or parsed.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The CSV file does not exist.
    #[error("CSV not found: {}\nTip: run from the repo root or pass --csv path/to/your.csv", path.display())]
    NotFound { path: PathBuf },

    /// The file exists but could not be opened or read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV content is malformed.
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// A column needed by an operation is absent, mistyped or incomplete.
#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    /// The column does not exist in the table.
    #[error("column '{0}' is missing")]
    MissingColumn(String),

    /// The column exists but does not hold numbers.
    #[error("column '{column}' is not numeric (found {found})")]
    NotNumeric { column: String, found: String },

    /// A cell needed for arithmetic is empty.
    #[error("column '{column}' has no value at row {row}")]
    NullValue { column: String, row: usize },

    /// A pre-existing derived column disagrees with its formula.
    #[error("column '{column}' at row {row} holds {found}, expected {expected}")]
    DerivedMismatch {
        column: String,
        row: usize,
        expected: f64,
        found: f64,
    },
}
