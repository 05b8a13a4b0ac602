//! Full report export.
//!
//! This module renders a [`SalesReport`] as Markdown or JSON for sharing
//! outside the interactive session.

use crate::models::{format_amount, GrandTotals, RankingSection, ReportMetadata, SalesReport};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &SalesReport) -> String {
    let mut output = String::new();

    output.push_str("# Bakery Sales Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_totals_section(
        &report.totals,
        &report.metadata.currency,
    ));

    output.push_str("## Rankings\n\n");
    for section in &report.rankings {
        output.push_str(&generate_ranking_section(section, &report.metadata.currency));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** `{}`\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Rows:** {}\n", metadata.rows));
    section.push_str(&format!("- **Products:** {}\n", metadata.products));
    section.push('\n');

    section
}

/// Generate the grand totals table.
fn generate_totals_section(totals: &GrandTotals, currency: &str) -> String {
    let mut section = String::new();

    section.push_str("## Totals\n\n");
    section.push_str(&format!(
        "| Total Sales ({c}) | Total Cost ({c}) | Profit ({c}) |\n",
        c = currency
    ));
    section.push_str("|---:|---:|---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} |\n\n",
        format_amount(totals.total_sales),
        format_amount(totals.total_cost),
        format_amount(totals.profit)
    ));

    section
}

/// Generate one ranking table.
fn generate_ranking_section(section: &RankingSection, currency: &str) -> String {
    let mut block = String::new();
    let metric = section.kind.metric();

    block.push_str(&format!("### {}\n\n", section.title));

    if section.ranking.is_empty() {
        block.push_str("No sales recorded.\n\n");
        return block;
    }

    block.push_str(&format!(
        "| # | {} | {} |\n",
        section.kind.x_label(),
        section.kind.y_label(currency)
    ));
    block.push_str("|---:|:---|---:|\n");
    for (i, entry) in section.ranking.entries.iter().enumerate() {
        block.push_str(&format!(
            "| {} | {} | {} |\n",
            i + 1,
            entry.label().replace('|', "\\|"),
            metric.format_value(entry.value)
        ));
    }
    block.push('\n');

    block
}

/// Generate the report footer.
fn generate_footer() -> String {
    format!(
        "---\n\n*Report generated by bakery-sales v{}*\n",
        env!("CARGO_PKG_VERSION")
    )
}

/// Generate a JSON report.
pub fn generate_json_report(report: &SalesReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{RankEntry, Ranking};
    use crate::models::RankingKind;
    use chrono::Utc;

    fn create_test_report() -> SalesReport {
        SalesReport {
            metadata: ReportMetadata {
                source: "data/bread_sales_week.csv".to_string(),
                generated_at: Utc::now(),
                rows: 3,
                products: 2,
                currency: "₱".to_string(),
            },
            totals: GrandTotals {
                total_sales: 1200.0,
                total_cost: 480.0,
                profit: 720.0,
            },
            rankings: vec![RankingSection {
                kind: RankingKind::MostSold,
                title: RankingKind::MostSold.title().to_string(),
                ranking: Ranking {
                    group_key: "Product".to_string(),
                    metric: "Quantity".to_string(),
                    order: RankingKind::MostSold.order(),
                    entries: vec![
                        RankEntry {
                            key: Some("Pandesal".to_string()),
                            value: 120.0,
                        },
                        RankEntry {
                            key: Some("Ensaymada".to_string()),
                            value: 40.0,
                        },
                    ],
                },
            }],
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let markdown = generate_markdown_report(&create_test_report());

        assert!(markdown.contains("# Bakery Sales Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("## Totals"));
        assert!(markdown.contains("| 1,200.00 | 480.00 | 720.00 |"));
        assert!(markdown.contains("### Most Sold Breads by Quantity"));
        assert!(markdown.contains("| 1 | Pandesal | 120 |"));
        assert!(markdown.contains("| 2 | Ensaymada | 40 |"));
    }

    #[test]
    fn test_empty_ranking_section() {
        let mut report = create_test_report();
        report.rankings[0].ranking.entries.clear();

        let block = generate_ranking_section(&report.rankings[0], "₱");
        assert!(block.contains("No sales recorded."));
    }

    #[test]
    fn test_generate_json_report() {
        let json = generate_json_report(&create_test_report()).unwrap();

        assert!(json.contains("\"source\""));
        assert!(json.contains("\"most_sold\""));
        assert!(json.contains("\"descending\""));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["totals"]["profit"], 720.0);
    }
}
