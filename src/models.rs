//! Report-level data models.
//!
//! This module names the fixed reports the tool offers (grand totals and the
//! four product rankings) and the exportable [`SalesReport`] built from them.

use crate::analysis::{ensure_totals, rank_by, sum_column, Ranking, SortOrder};
use crate::error::SchemaError;
use crate::table::{Table, PRODUCT, PROFIT, QUANTITY, TOTAL_COST, TOTAL_SALES};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Metric a product ranking is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Quantity,
    Profit,
}

impl Metric {
    /// Table column holding the metric.
    pub fn column(&self) -> &'static str {
        match self {
            Metric::Quantity => QUANTITY,
            Metric::Profit => PROFIT,
        }
    }

    /// Whether the metric needs the derived columns first.
    pub fn needs_totals(&self) -> bool {
        matches!(self, Metric::Profit)
    }

    /// Format a value of this metric for display.
    pub fn format_value(&self, value: f64) -> String {
        match self {
            Metric::Quantity => format!("{:.0}", value),
            Metric::Profit => format_amount(value),
        }
    }
}

/// The four product rankings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingKind {
    MostSold,
    MostProfitable,
    LeastSold,
    LeastProfitable,
}

impl RankingKind {
    pub const ALL: [RankingKind; 4] = [
        RankingKind::MostSold,
        RankingKind::MostProfitable,
        RankingKind::LeastSold,
        RankingKind::LeastProfitable,
    ];

    pub fn metric(&self) -> Metric {
        match self {
            RankingKind::MostSold | RankingKind::LeastSold => Metric::Quantity,
            RankingKind::MostProfitable | RankingKind::LeastProfitable => Metric::Profit,
        }
    }

    pub fn order(&self) -> SortOrder {
        SortOrder::from_ascending(matches!(
            self,
            RankingKind::LeastSold | RankingKind::LeastProfitable
        ))
    }

    /// Text heading, e.g. `MOST SOLD BREAD (by Quantity)`.
    pub fn heading(&self, currency: &str) -> String {
        match self {
            RankingKind::MostSold => "MOST SOLD BREAD (by Quantity)".to_string(),
            RankingKind::MostProfitable => format!("MOST PROFITABLE BREAD ({})", currency),
            RankingKind::LeastSold => "LEAST SOLD BREAD (by Quantity)".to_string(),
            RankingKind::LeastProfitable => format!("LEAST PROFITABLE BREAD ({})", currency),
        }
    }

    /// Chart title.
    pub fn title(&self) -> &'static str {
        match self {
            RankingKind::MostSold => "Most Sold Breads by Quantity",
            RankingKind::MostProfitable => "Most Profitable Breads",
            RankingKind::LeastSold => "Least Sold Breads by Quantity",
            RankingKind::LeastProfitable => "Least Profitable Breads",
        }
    }

    /// Chart value-axis label.
    pub fn y_label(&self, currency: &str) -> String {
        match self.metric() {
            Metric::Quantity => "Pieces".to_string(),
            Metric::Profit => format!("Profit ({})", currency),
        }
    }

    /// Chart category-axis label.
    pub fn x_label(&self) -> &'static str {
        "Bread"
    }

    /// File name (without extension) for a saved chart.
    pub fn file_stem(&self) -> &'static str {
        match self {
            RankingKind::MostSold => "most_sold_by_quantity",
            RankingKind::MostProfitable => "most_profitable_by_profit",
            RankingKind::LeastSold => "least_sold_by_quantity",
            RankingKind::LeastProfitable => "least_profitable_by_profit",
        }
    }

    /// Compute this ranking over products, deriving totals when needed.
    pub fn compute(&self, table: &mut Table) -> Result<Ranking, SchemaError> {
        if self.metric().needs_totals() {
            ensure_totals(table)?;
        }
        rank_by(table, PRODUCT, self.metric().column(), self.order())
    }
}

impl fmt::Display for RankingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// The three grand totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalKind {
    Sales,
    Cost,
    Profit,
}

impl TotalKind {
    pub fn column(&self) -> &'static str {
        match self {
            TotalKind::Sales => TOTAL_SALES,
            TotalKind::Cost => TOTAL_COST,
            TotalKind::Profit => PROFIT,
        }
    }

    /// Text heading, e.g. `TOTAL SALES (₱)`.
    pub fn heading(&self, currency: &str) -> String {
        let label = match self {
            TotalKind::Sales => "TOTAL SALES",
            TotalKind::Cost => "TOTAL COST",
            TotalKind::Profit => "TOTAL PROFIT",
        };
        format!("{} ({})", label, currency)
    }

    /// Grand total of this column, deriving totals first.
    pub fn compute(&self, table: &mut Table) -> Result<f64, SchemaError> {
        ensure_totals(table)?;
        sum_column(table, self.column())
    }
}

/// Grand totals over every row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GrandTotals {
    pub total_sales: f64,
    pub total_cost: f64,
    pub profit: f64,
}

impl GrandTotals {
    pub fn compute(table: &mut Table) -> Result<Self, SchemaError> {
        Ok(Self {
            total_sales: TotalKind::Sales.compute(table)?,
            total_cost: TotalKind::Cost.compute(table)?,
            profit: TotalKind::Profit.compute(table)?,
        })
    }
}

/// Metadata about an exported report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Path of the CSV the report was built from.
    pub source: String,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Number of sales rows.
    pub rows: usize,
    /// Number of distinct products.
    pub products: usize,
    /// Currency symbol used for money values.
    pub currency: String,
}

/// One ranking inside an exported report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingSection {
    pub kind: RankingKind,
    pub title: String,
    pub ranking: Ranking,
}

/// A complete report: totals plus every ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesReport {
    pub metadata: ReportMetadata,
    pub totals: GrandTotals,
    pub rankings: Vec<RankingSection>,
}

impl SalesReport {
    /// Build the full report, deriving totals on the table.
    pub fn build(table: &mut Table, source: &str, currency: &str) -> Result<Self, SchemaError> {
        let totals = GrandTotals::compute(table)?;
        let rankings = RankingKind::ALL
            .iter()
            .map(|kind| {
                Ok(RankingSection {
                    kind: *kind,
                    title: kind.title().to_string(),
                    ranking: kind.compute(table)?,
                })
            })
            .collect::<Result<Vec<_>, SchemaError>>()?;

        let products = rankings.first().map(|s| s.ranking.len()).unwrap_or(0);

        Ok(Self {
            metadata: ReportMetadata {
                source: source.to_string(),
                generated_at: Utc::now(),
                rows: table.row_count(),
                products,
                currency: currency.to_string(),
            },
            totals,
            rankings,
        })
    }
}

/// Format money with thousands separators and two decimals: `-1,234.50`.
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}
