//! Derived financial columns.
//!
//! `Total Sales`, `Total Cost` and `Profit` are appended once. A column that is
//! already present is trusted and never recomputed, so calling
//! [`ensure_totals`] repeatedly is a no-op after the first success.

use crate::error::SchemaError;
use crate::table::{Column, Table, COST, PRICE, PROFIT, QUANTITY, TOTAL_COST, TOTAL_SALES};
use tracing::{debug, warn};

/// Relative tolerance used when checking pre-existing derived columns.
const TOLERANCE: f64 = 1e-9;

/// Append any missing derived columns and return the same table.
///
/// All missing columns are computed before any is appended, so a schema
/// error leaves the table untouched.
pub fn ensure_totals(table: &mut Table) -> Result<&mut Table, SchemaError> {
    let mut pending: Vec<Column> = Vec::new();

    let total_sales = if table.has_column(TOTAL_SALES) {
        None
    } else {
        let values = multiply(table, PRICE, QUANTITY)?;
        pending.push(Column::derived(TOTAL_SALES, values.clone()));
        Some(values)
    };

    let total_cost = if table.has_column(TOTAL_COST) {
        None
    } else {
        let values = multiply(table, COST, QUANTITY)?;
        pending.push(Column::derived(TOTAL_COST, values.clone()));
        Some(values)
    };

    if !table.has_column(PROFIT) {
        let sales = match total_sales {
            Some(values) => values,
            None => table.numeric_values(TOTAL_SALES)?,
        };
        let cost = match total_cost {
            Some(values) => values,
            None => table.numeric_values(TOTAL_COST)?,
        };
        let profit = sales.iter().zip(&cost).map(|(s, c)| s - c).collect();
        pending.push(Column::derived(PROFIT, profit));
    }

    for column in pending {
        debug!("Deriving column '{}'", column.name);
        table.append_column(column);
    }

    Ok(table)
}

/// Check that every present derived column matches its formula.
pub fn verify_totals(table: &Table) -> Result<(), SchemaError> {
    if table.has_column(TOTAL_SALES) {
        let expected = multiply(table, PRICE, QUANTITY)?;
        compare(table, TOTAL_SALES, &expected)?;
    }
    if table.has_column(TOTAL_COST) {
        let expected = multiply(table, COST, QUANTITY)?;
        compare(table, TOTAL_COST, &expected)?;
    }
    if table.has_column(PROFIT) {
        let sales = if table.has_column(TOTAL_SALES) {
            table.numeric_values(TOTAL_SALES)?
        } else {
            multiply(table, PRICE, QUANTITY)?
        };
        let cost = if table.has_column(TOTAL_COST) {
            table.numeric_values(TOTAL_COST)?
        } else {
            multiply(table, COST, QUANTITY)?
        };
        let expected: Vec<f64> = sales.iter().zip(&cost).map(|(s, c)| s - c).collect();
        compare(table, PROFIT, &expected)?;
    }
    Ok(())
}

fn multiply(table: &Table, left: &str, right: &str) -> Result<Vec<f64>, SchemaError> {
    let left = table.numeric_values(left)?;
    let right = table.numeric_values(right)?;
    Ok(left.iter().zip(&right).map(|(a, b)| a * b).collect())
}

fn compare(table: &Table, name: &str, expected: &[f64]) -> Result<(), SchemaError> {
    let found = table.numeric_values(name)?;
    for (row, (&want, &got)) in expected.iter().zip(&found).enumerate() {
        let scale = want.abs().max(got.abs()).max(1.0);
        if (want - got).abs() > TOLERANCE * scale {
            warn!("Column '{}' disagrees with its formula at row {}", name, row);
            return Err(SchemaError::DerivedMismatch {
                column: name.to_string(),
                row,
                expected: want,
                found: got,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{ColumnData, ColumnOrigin, PRODUCT};

    fn bakery() -> Table {
        Table::from_columns(vec![
            Column::source(
                PRODUCT,
                ColumnData::Text(vec![
                    Some("Pandesal".to_string()),
                    Some("Ensaymada".to_string()),
                    Some("Pandesal".to_string()),
                ]),
            ),
            Column::source(PRICE, ColumnData::Integer(vec![Some(5), Some(15), Some(5)])),
            Column::source(COST, ColumnData::Float(vec![Some(2.0), Some(6.0), Some(2.0)])),
            Column::source(QUANTITY, ColumnData::Integer(vec![Some(100), Some(40), Some(20)])),
        ])
    }

    #[test]
    fn test_formulas() {
        let mut table = bakery();
        ensure_totals(&mut table).unwrap();

        assert_eq!(
            table.numeric_values(TOTAL_SALES).unwrap(),
            vec![500.0, 600.0, 100.0]
        );
        assert_eq!(
            table.numeric_values(TOTAL_COST).unwrap(),
            vec![200.0, 240.0, 40.0]
        );
        assert_eq!(
            table.numeric_values(PROFIT).unwrap(),
            vec![300.0, 360.0, 60.0]
        );
        assert_eq!(table.row_count(), 3);
    }

    #[test]
    fn test_appends_in_order_and_marks_derived() {
        let mut table = bakery();
        ensure_totals(&mut table).unwrap();

        let names: Vec<_> = table.column_names().collect();
        assert_eq!(
            names,
            vec![PRODUCT, PRICE, COST, QUANTITY, TOTAL_SALES, TOTAL_COST, PROFIT]
        );
        assert_eq!(table.column(PROFIT).unwrap().origin, ColumnOrigin::Derived);
    }

    #[test]
    fn test_idempotent() {
        let mut table = bakery();
        ensure_totals(&mut table).unwrap();
        let first = table.clone();

        ensure_totals(&mut table).unwrap();
        ensure_totals(&mut table).unwrap();

        assert_eq!(table, first);
    }

    #[test]
    fn test_existing_column_is_trusted() {
        let mut table = bakery();
        table.append_column(Column::source(
            PROFIT,
            ColumnData::Integer(vec![Some(1), Some(1), Some(1)]),
        ));

        ensure_totals(&mut table).unwrap();

        assert_eq!(table.numeric_values(PROFIT).unwrap(), vec![1.0, 1.0, 1.0]);
        assert_eq!(table.column_count(), 7);
        assert!(matches!(
            verify_totals(&table),
            Err(SchemaError::DerivedMismatch { row: 0, .. })
        ));
    }

    #[test]
    fn test_missing_base_column_leaves_table_untouched() {
        let mut table = Table::from_columns(vec![
            Column::source(PRICE, ColumnData::Integer(vec![Some(5)])),
            Column::source(QUANTITY, ColumnData::Integer(vec![Some(2)])),
        ]);
        let before = table.clone();

        let err = ensure_totals(&mut table).unwrap_err();

        assert_eq!(err, SchemaError::MissingColumn(COST.to_string()));
        assert_eq!(table, before);
    }

    #[test]
    fn test_null_quantity_is_an_error() {
        let mut table = Table::from_columns(vec![
            Column::source(PRICE, ColumnData::Integer(vec![Some(5), Some(5)])),
            Column::source(COST, ColumnData::Integer(vec![Some(2), Some(2)])),
            Column::source(QUANTITY, ColumnData::Integer(vec![Some(2), None])),
        ]);

        let err = ensure_totals(&mut table).unwrap_err();

        assert_eq!(
            err,
            SchemaError::NullValue {
                column: QUANTITY.to_string(),
                row: 1
            }
        );
    }

    #[test]
    fn test_nan_quantity_is_an_error() {
        let csv = "\
Date,Product,Price,Cost,Quantity
2025-10-06,Pandesal,5,2,100
2025-10-06,Ensaymada,15,6,NaN
";
        let mut table = crate::table::load_from_reader(csv.as_bytes()).unwrap();
        let before = table.clone();

        let err = ensure_totals(&mut table).unwrap_err();

        assert_eq!(
            err,
            SchemaError::NullValue {
                column: QUANTITY.to_string(),
                row: 1
            }
        );
        assert_eq!(table, before);
    }

    #[test]
    fn test_verify_accepts_derived() {
        let mut table = bakery();
        ensure_totals(&mut table).unwrap();
        assert!(verify_totals(&table).is_ok());
    }

    #[test]
    fn test_empty_table() {
        let mut table = Table::from_columns(vec![
            Column::source(PRICE, ColumnData::Integer(vec![])),
            Column::source(COST, ColumnData::Integer(vec![])),
            Column::source(QUANTITY, ColumnData::Integer(vec![])),
        ]);
        ensure_totals(&mut table).unwrap();
        assert!(table.has_column(PROFIT));
        assert_eq!(table.numeric_values(PROFIT).unwrap(), Vec::<f64>::new());
    }
}
