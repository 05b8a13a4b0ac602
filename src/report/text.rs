//! Plain-text views for the terminal.

use crate::analysis::{ColumnStats, Ranking, TableInfo};
use crate::models::{format_amount, RankingKind, TotalKind};
use crate::table::Table;
use std::ops::Range;

/// Shown in place of an empty cell.
const NULL_CELL: &str = "NaN";

/// `=== TITLE ===` banner line.
pub fn banner(title: &str) -> String {
    format!("=== {} ===", title)
}

/// Render rows `range` of the table as an aligned grid with a row index.
pub fn render_preview(table: &Table, range: Range<usize>) -> String {
    let mut header: Vec<String> = vec![String::new()];
    header.extend(table.column_names().map(String::from));

    let mut rows: Vec<Vec<String>> = vec![header];
    for row in range {
        let mut line = vec![row.to_string()];
        line.extend(table.columns().iter().map(|c| {
            c.data
                .display(row)
                .unwrap_or_else(|| NULL_CELL.to_string())
        }));
        rows.push(line);
    }

    if rows.len() == 1 {
        let mut out = format!("Empty table\nColumns: [{}]", rows[0][1..].join(", "));
        out.push('\n');
        return out;
    }

    align(&rows)
}

/// Render per-column statistics, one column of output per table column.
pub fn render_describe(stats: &[ColumnStats]) -> String {
    if stats.is_empty() {
        return "No numeric columns to describe.\n".to_string();
    }

    let mut header = vec![String::new()];
    header.extend(stats.iter().map(|s| s.name.clone()));

    let fields: [(&str, fn(&ColumnStats) -> Option<f64>); 8] = [
        ("count", |s: &ColumnStats| Some(s.count as f64)),
        ("mean", |s: &ColumnStats| s.mean),
        ("std", |s: &ColumnStats| s.std),
        ("min", |s: &ColumnStats| s.min),
        ("25%", |s: &ColumnStats| s.q25),
        ("50%", |s: &ColumnStats| s.median),
        ("75%", |s: &ColumnStats| s.q75),
        ("max", |s: &ColumnStats| s.max),
    ];

    let mut rows = vec![header];
    for (label, get) in fields {
        let mut line = vec![label.to_string()];
        line.extend(stats.iter().map(|s| match get(s) {
            Some(v) => format!("{:.6}", v),
            None => NULL_CELL.to_string(),
        }));
        rows.push(line);
    }

    align(&rows)
}

/// Render the schema summary.
pub fn render_info(info: &TableInfo) -> String {
    let mut out = String::new();
    out.push_str(&format!("RangeIndex: {} entries\n", info.rows));
    out.push_str(&format!("Data columns (total {} columns):\n", info.columns.len()));

    let mut rows = vec![vec![
        " #".to_string(),
        "Column".to_string(),
        "Non-Null Count".to_string(),
        "Dtype".to_string(),
    ]];
    for (i, column) in info.columns.iter().enumerate() {
        rows.push(vec![
            format!(" {}", i),
            column.name.clone(),
            format!("{} non-null", column.non_null),
            column.data_type.to_string(),
        ]);
    }
    out.push_str(&align_left(&rows));
    out
}

/// Render a grand total under its banner.
pub fn render_total(kind: TotalKind, value: f64, currency: &str) -> String {
    format!("{}\n{}\n", banner(&kind.heading(currency)), format_amount(value))
}

/// Render a ranking as `product  value` lines in ranking order.
pub fn render_ranking(kind: RankingKind, ranking: &Ranking, currency: &str) -> String {
    let mut out = banner(&kind.heading(currency));
    out.push('\n');

    if ranking.is_empty() {
        out.push_str("No sales recorded.\n");
        return out;
    }

    let metric = kind.metric();
    let mut rows = vec![vec![ranking.group_key.clone(), String::new()]];
    for entry in &ranking.entries {
        rows.push(vec![entry.label().to_string(), metric.format_value(entry.value)]);
    }
    out.push_str(&align_key_value(&rows));
    out
}

/// Right-align every column except the first, which is left-aligned.
fn align(rows: &[Vec<String>]) -> String {
    let widths = column_widths(rows);
    let mut out = String::new();
    for row in rows {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                if i == 0 {
                    format!("{:<w$}", cell, w = widths[i])
                } else {
                    format!("{:>w$}", cell, w = widths[i])
                }
            })
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}

fn align_left(rows: &[Vec<String>]) -> String {
    let widths = column_widths(rows);
    let mut out = String::new();
    for row in rows {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<w$}", cell, w = widths[i]))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}

fn align_key_value(rows: &[Vec<String>]) -> String {
    let widths = column_widths(rows);
    let mut out = String::new();
    for row in rows {
        let line = format!(
            "{:<kw$}    {:>vw$}",
            row[0],
            row[1],
            kw = widths[0],
            vw = widths[1]
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn column_widths(rows: &[Vec<String>]) -> Vec<usize> {
    let columns = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    (0..columns)
        .map(|i| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect()
}
