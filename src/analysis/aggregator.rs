//! Grouping and ranking of sales metrics.
//!
//! This module groups rows by a key column, sums a numeric column per group,
//! and orders the groups into a [`Ranking`]. It never mutates the table.

use crate::error::SchemaError;
use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Display label for the group of rows whose key is empty.
pub const NULL_KEY: &str = "<null>";

/// Direction of a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// `true` ranks smallest first.
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            SortOrder::Ascending
        } else {
            SortOrder::Descending
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Ascending => write!(f, "ascending"),
            SortOrder::Descending => write!(f, "descending"),
        }
    }
}

/// One group in a ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankEntry {
    /// Group key value, exactly as it appears in the table. `None` groups
    /// the rows with an empty key.
    pub key: Option<String>,
    /// Sum of the metric over the group's rows.
    pub value: f64,
}

impl RankEntry {
    /// Key for display; empty keys show as [`NULL_KEY`].
    pub fn label(&self) -> &str {
        self.key.as_deref().unwrap_or(NULL_KEY)
    }
}

/// Groups ordered by their summed metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    /// Column the rows were grouped by.
    pub group_key: String,
    /// Column that was summed.
    pub metric: String,
    /// Direction the entries are sorted in.
    pub order: SortOrder,
    /// One entry per distinct key.
    pub entries: Vec<RankEntry>,
}

impl Ranking {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all group values; equals the metric's grand total.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.value).sum()
    }

    /// The first `n` entries in ranking order.
    pub fn top(&self, n: usize) -> &[RankEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Value for a given key, if the key formed a group.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.key.as_deref() == Some(key))
            .map(|e| e.value)
    }

    /// Value of the empty-key group, if any row had an empty key.
    pub fn null_group(&self) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.key.is_none())
            .map(|e| e.value)
    }
}

/// Group rows by `group_key`, sum `metric_column`, and sort by the sums.
///
/// Keys match exactly (case and whitespace sensitive). The sort is stable:
/// groups with equal sums keep the order in which their key first appears.
pub fn rank_by(
    table: &Table,
    group_key: &str,
    metric_column: &str,
    order: SortOrder,
) -> Result<Ranking, SchemaError> {
    let keys = table.require(group_key)?;
    let values = table.numeric_values(metric_column)?;

    let mut index: HashMap<Option<String>, usize> = HashMap::new();
    let mut entries: Vec<RankEntry> = Vec::new();

    for (row, value) in values.into_iter().enumerate() {
        let key = keys.data.display(row);

        match index.get(&key) {
            Some(&slot) => entries[slot].value += value,
            None => {
                index.insert(key.clone(), entries.len());
                entries.push(RankEntry { key, value });
            }
        }
    }

    match order {
        SortOrder::Ascending => entries.sort_by(|a, b| a.value.total_cmp(&b.value)),
        SortOrder::Descending => entries.sort_by(|a, b| b.value.total_cmp(&a.value)),
    }

    debug!(
        "Ranked {} groups of '{}' by '{}' ({})",
        entries.len(),
        group_key,
        metric_column,
        order
    );

    Ok(Ranking {
        group_key: group_key.to_string(),
        metric: metric_column.to_string(),
        order,
        entries,
    })
}

/// Sum every value of a numeric column. An empty table sums to zero.
pub fn sum_column(table: &Table, column: &str) -> Result<f64, SchemaError> {
    Ok(table.numeric_values(column)?.into_iter().sum())
}
