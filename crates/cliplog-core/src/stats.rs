//! Grouped summary statistics over clip durations.
//!
//! Variance is the population variance computed in two passes (mean first,
//! then the mean of squared deviations from that group's own mean).

use crate::error::{ClipLogError, Result};
use serde::Serialize;
use std::collections::BTreeMap;

/// Display key of the synthetic row spanning every category.
pub const TOTAL_CATEGORY: &str = "Total";

/// Summary statistics for one category, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStats {
    pub category: String,
    pub count: usize,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub variance: f64,
    pub stddev: f64,
}

impl CategoryStats {
    /// Summarize a non-empty slice of durations. Returns `None` when empty.
    pub fn from_durations(category: impl Into<String>, durations: &[f64]) -> Option<Self> {
        if durations.is_empty() {
            return None;
        }

        let count = durations.len();
        let sum: f64 = durations.iter().sum();
        let min = durations.iter().copied().fold(f64::INFINITY, f64::min);
        let max = durations.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = sum / count as f64;

        let squared_deviations: f64 = durations.iter().map(|d| (d - mean) * (d - mean)).sum();
        let variance = squared_deviations / count as f64;

        Some(Self {
            category: category.into(),
            count,
            sum,
            min,
            max,
            mean,
            variance,
            stddev: variance.sqrt(),
        })
    }
}

/// Per-category rows in ascending code order, plus the total row.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatsReport {
    pub categories: Vec<CategoryStats>,
    pub total: Option<CategoryStats>,
}

impl StatsReport {
    /// All rows in print order: categories, then the total.
    pub fn rows(&self) -> impl Iterator<Item = &CategoryStats> {
        self.categories.iter().chain(self.total.iter())
    }

    /// Look up a category row by code.
    pub fn category(&self, code: &str) -> Option<&CategoryStats> {
        self.categories.iter().find(|row| row.category == code)
    }

    pub fn is_empty(&self) -> bool {
        self.total.is_none()
    }

    /// Serialize the report as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ClipLogError::Serialization(format!("Failed to serialize report: {e}")))
    }
}

/// Aggregate `(category, seconds)` rows.
///
/// Categories without rows never appear. The total is computed over the
/// rows in input order.
pub fn aggregate<I, S>(rows: I) -> StatsReport
where
    I: IntoIterator<Item = (S, f64)>,
    S: Into<String>,
{
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    let mut all = Vec::new();

    for (category, seconds) in rows {
        groups.entry(category.into()).or_default().push(seconds);
        all.push(seconds);
    }

    let categories = groups
        .iter()
        .filter_map(|(code, durations)| CategoryStats::from_durations(code.clone(), durations))
        .collect();

    StatsReport {
        categories,
        total: CategoryStats::from_durations(TOTAL_CATEGORY, &all),
    }
}
