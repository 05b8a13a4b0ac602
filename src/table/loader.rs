//! CSV loading with per-column type inference.

use super::{Column, ColumnData, Table};
use crate::error::SourceError;
use chrono::NaiveDate;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Cell contents read as "no value", alongside the empty cell.
const NA_TOKENS: &[&str] = &[
    "NaN", "nan", "-NaN", "-nan", "NA", "N/A", "n/a", "<NA>", "#N/A", "NULL", "null", "None",
];

fn is_missing(cell: &str) -> bool {
    let cell = cell.trim();
    cell.is_empty() || NA_TOKENS.contains(&cell)
}

/// Parse a float, treating infinities as missing.
fn parse_finite(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Load a CSV file into a [`Table`].
pub fn load_csv(path: &Path) -> Result<Table, SourceError> {
    if !path.exists() {
        return Err(SourceError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let table = load_from_reader(file)?;
    info!(
        "Loaded {} rows x {} columns from {}",
        table.row_count(),
        table.column_count(),
        path.display()
    );
    Ok(table)
}

/// Load CSV content with a header row from any reader.
pub fn load_from_reader<R: Read>(reader: R) -> Result<Table, SourceError> {
    let mut reader = csv::Reader::from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];

    for record in reader.records() {
        let record = record?;
        for (column, value) in cells.iter_mut().zip(record.iter()) {
            column.push(value.to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, values)| {
            let data = infer_column(values);
            debug!("Column '{}' inferred as {}", name, data.data_type());
            Column::source(name, data)
        })
        .collect();

    Ok(Table::from_columns(columns))
}

/// Pick the narrowest type every present cell parses as.
fn infer_column(cells: Vec<String>) -> ColumnData {
    let present = || cells.iter().filter(|c| !is_missing(c)).map(|c| c.trim());

    if present().all(|c| c.parse::<i64>().is_ok()) && present().next().is_some() {
        return ColumnData::Integer(parse_all(&cells, |c| c.parse().ok()));
    }
    if present().all(|c| c.parse::<f64>().is_ok()) && present().next().is_some() {
        return ColumnData::Float(parse_all(&cells, parse_finite));
    }
    if present().all(|c| NaiveDate::parse_from_str(c, DATE_FORMAT).is_ok())
        && present().next().is_some()
    {
        return ColumnData::Date(parse_all(&cells, |c| {
            NaiveDate::parse_from_str(c, DATE_FORMAT).ok()
        }));
    }

    ColumnData::Text(
        cells
            .into_iter()
            .map(|c| if is_missing(&c) { None } else { Some(c) })
            .collect(),
    )
}

fn parse_all<T>(cells: &[String], parse: impl Fn(&str) -> Option<T>) -> Vec<Option<T>> {
    cells
        .iter()
        .map(|c| {
            if is_missing(c) {
                None
            } else {
                parse(c.trim())
            }
        })
        .collect()
}
