//! Statistical and schema summaries of a table.

use crate::table::{DataType, Table};
use serde::{Deserialize, Serialize};

/// Descriptive statistics for one numeric column. Statistics are `None`
/// when the column has no values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub name: String,
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1); `None` below two values.
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Per-column schema line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub non_null: usize,
    pub data_type: DataType,
}

/// Schema summary of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableInfo {
    pub rows: usize,
    pub columns: Vec<ColumnInfo>,
}

/// Compute statistics for every numeric column, nulls skipped.
pub fn describe(table: &Table) -> Vec<ColumnStats> {
    table
        .columns()
        .iter()
        .filter(|c| c.data_type().is_numeric())
        .map(|column| {
            let mut values: Vec<f64> = (0..table.row_count())
                .filter_map(|row| column.data.as_f64(row))
                .collect();
            values.sort_by(|a, b| a.total_cmp(b));
            stats_for(&column.name, &values)
        })
        .collect()
}

fn stats_for(name: &str, sorted: &[f64]) -> ColumnStats {
    let count = sorted.len();
    let mean = (count > 0).then(|| sorted.iter().sum::<f64>() / count as f64);
    let std = mean.filter(|_| count > 1).map(|m| {
        let var = sorted.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (count - 1) as f64;
        var.sqrt()
    });

    ColumnStats {
        name: name.to_string(),
        count,
        mean,
        std,
        min: sorted.first().copied(),
        q25: quantile(sorted, 0.25),
        median: quantile(sorted, 0.5),
        q75: quantile(sorted, 0.75),
        max: sorted.last().copied(),
    }
}

/// Linear-interpolated quantile of sorted values.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let weight = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Row count plus each column's non-null count and type.
pub fn info(table: &Table) -> TableInfo {
    TableInfo {
        rows: table.row_count(),
        columns: table
            .columns()
            .iter()
            .map(|c| ColumnInfo {
                name: c.name.clone(),
                non_null: c.data.non_null_count(),
                data_type: c.data_type(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, ColumnData, PRODUCT, QUANTITY};

    fn table() -> Table {
        Table::from_columns(vec![
            Column::source(
                PRODUCT,
                ColumnData::Text(vec![
                    Some("A".to_string()),
                    Some("B".to_string()),
                    Some("C".to_string()),
                    Some("D".to_string()),
                    None,
                ]),
            ),
            Column::source(
                QUANTITY,
                ColumnData::Integer(vec![Some(4), Some(1), None, Some(3), Some(2)]),
            ),
        ])
    }

    #[test]
    fn test_describe_numeric_only() {
        let stats = describe(&table());
        assert_eq!(stats.len(), 1);

        let q = &stats[0];
        assert_eq!(q.name, QUANTITY);
        assert_eq!(q.count, 4);
        assert_eq!(q.mean, Some(2.5));
        assert_eq!(q.min, Some(1.0));
        assert_eq!(q.q25, Some(1.75));
        assert_eq!(q.median, Some(2.5));
        assert_eq!(q.q75, Some(3.25));
        assert_eq!(q.max, Some(4.0));

        let std = q.std.unwrap();
        assert!((std - 1.2909944487358056).abs() < 1e-12);
    }

    #[test]
    fn test_describe_single_and_empty() {
        let single = stats_for("x", &[7.0]);
        assert_eq!(single.mean, Some(7.0));
        assert_eq!(single.std, None);
        assert_eq!(single.median, Some(7.0));

        let empty = stats_for("x", &[]);
        assert_eq!(empty.count, 0);
        assert_eq!(empty.mean, None);
        assert_eq!(empty.max, None);
    }

    #[test]
    fn test_info() {
        let info = info(&table());
        assert_eq!(info.rows, 5);
        assert_eq!(info.columns.len(), 2);
        assert_eq!(info.columns[0].non_null, 4);
        assert_eq!(info.columns[0].data_type, DataType::Text);
        assert_eq!(info.columns[1].non_null, 4);
        assert_eq!(info.columns[1].data_type, DataType::Integer);
    }
}
