//! In-memory sales table.
//!
//! A [`Table`] is an ordered set of equally long, typed columns. Rows are
//! never added or removed after loading; the metric deriver may only append
//! whole columns.

pub mod loader;

use crate::error::SchemaError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

pub use loader::{load_csv, load_from_reader};

/// Column name for the sale date.
pub const DATE: &str = "Date";
/// Column name for the product identifier.
pub const PRODUCT: &str = "Product";
/// Column name for the per-unit selling price.
pub const PRICE: &str = "Price";
/// Column name for the per-unit cost.
pub const COST: &str = "Cost";
/// Column name for the units sold.
pub const QUANTITY: &str = "Quantity";
/// Derived: Price × Quantity.
pub const TOTAL_SALES: &str = "Total Sales";
/// Derived: Cost × Quantity.
pub const TOTAL_COST: &str = "Total Cost";
/// Derived: Total Sales − Total Cost.
pub const PROFIT: &str = "Profit";

/// Storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Integer,
    Float,
    Date,
    Text,
}

impl DataType {
    /// Whether values of this type can take part in arithmetic.
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Integer | DataType::Float)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Integer => write!(f, "int64"),
            DataType::Float => write!(f, "float64"),
            DataType::Date => write!(f, "date"),
            DataType::Text => write!(f, "object"),
        }
    }
}

/// Where a column's values came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnOrigin {
    /// Read from the tabular source.
    Source,
    /// Appended by the metric deriver.
    Derived,
}

/// Typed cell storage. `None` marks an empty cell.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Integer(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
    Date(Vec<Option<NaiveDate>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Integer(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Date(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn data_type(&self) -> DataType {
        match self {
            ColumnData::Integer(_) => DataType::Integer,
            ColumnData::Float(_) => DataType::Float,
            ColumnData::Date(_) => DataType::Date,
            ColumnData::Text(_) => DataType::Text,
        }
    }

    /// Number of cells holding a value.
    pub fn non_null_count(&self) -> usize {
        match self {
            ColumnData::Integer(v) => v.iter().flatten().count(),
            ColumnData::Float(v) => v.iter().flatten().count(),
            ColumnData::Date(v) => v.iter().flatten().count(),
            ColumnData::Text(v) => v.iter().flatten().count(),
        }
    }

    /// Numeric value at `row`, or `None` for a null cell or a non-numeric column.
    pub fn as_f64(&self, row: usize) -> Option<f64> {
        match self {
            ColumnData::Integer(v) => v.get(row).copied().flatten().map(|x| x as f64),
            ColumnData::Float(v) => v.get(row).copied().flatten(),
            _ => None,
        }
    }

    /// Display form of the cell at `row`; `None` for a null cell.
    pub fn display(&self, row: usize) -> Option<String> {
        match self {
            ColumnData::Integer(v) => v.get(row).copied().flatten().map(|x| x.to_string()),
            ColumnData::Float(v) => v.get(row).copied().flatten().map(format_float),
            ColumnData::Date(v) => v
                .get(row)
                .copied()
                .flatten()
                .map(|d| d.format("%Y-%m-%d").to_string()),
            ColumnData::Text(v) => v.get(row).cloned().flatten(),
        }
    }
}

/// Render a float the way a dataframe preview does: integral values keep one
/// decimal, others print in shortest form.
fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
    pub origin: ColumnOrigin,
}

impl Column {
    /// A column read from the source.
    pub fn source(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
            origin: ColumnOrigin::Source,
        }
    }

    /// A column computed from other columns.
    pub fn derived(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Float(values.into_iter().map(Some).collect()),
            origin: ColumnOrigin::Derived,
        }
    }

    pub fn data_type(&self) -> DataType {
        self.data.data_type()
    }
}

/// An ordered sequence of rows stored column-wise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Build a table from columns of equal length.
    ///
    /// # Panics
    ///
    /// Panics if the columns differ in length.
    pub fn from_columns(columns: Vec<Column>) -> Self {
        let row_count = columns.first().map(|c| c.data.len()).unwrap_or(0);
        assert!(
            columns.iter().all(|c| c.data.len() == row_count),
            "all columns must have the same number of rows"
        );
        Self { columns, row_count }
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Look up a column, failing with a schema error when absent.
    pub fn require(&self, name: &str) -> Result<&Column, SchemaError> {
        self.column(name)
            .ok_or_else(|| SchemaError::MissingColumn(name.to_string()))
    }

    /// All values of a numeric column, rejecting nulls.
    ///
    /// A column with no values at all (e.g. from a header-only source) is not
    /// treated as mistyped.
    pub fn numeric_values(&self, name: &str) -> Result<Vec<f64>, SchemaError> {
        let column = self.require(name)?;
        if !column.data_type().is_numeric() && column.data.non_null_count() > 0 {
            return Err(SchemaError::NotNumeric {
                column: name.to_string(),
                found: column.data_type().to_string(),
            });
        }

        (0..self.row_count)
            .map(|row| {
                column.data.as_f64(row).ok_or_else(|| SchemaError::NullValue {
                    column: name.to_string(),
                    row,
                })
            })
            .collect()
    }

    /// Append a column at the end. Only whole columns may be added.
    pub(crate) fn append_column(&mut self, column: Column) {
        debug_assert_eq!(column.data.len(), self.row_count);
        self.columns.push(column);
    }

    /// Row indices of the first `n` rows.
    pub fn head(&self, n: usize) -> Range<usize> {
        0..n.min(self.row_count)
    }

    /// Row indices of the last `n` rows.
    pub fn tail(&self, n: usize) -> Range<usize> {
        self.row_count.saturating_sub(n)..self.row_count
    }
}
