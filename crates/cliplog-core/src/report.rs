//! Fixed-width rendering of a [`StatsReport`].

use crate::error::{ClipLogError, Result};
use crate::stats::{CategoryStats, StatsReport};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Width of the display-name column.
pub const NAME_WIDTH: usize = 17;
const DURATION_WIDTH: usize = 12;
const NUMBER_WIDTH: usize = 8;
const VARIANCE_WIDTH: usize = 10;

/// Built-in activity code labels. Other codes (the legacy `L`, `S` and `T`
/// among them) get names only through `CLIPLOG_LABELS`.
pub const DEFAULT_LABELS: &[(&str, &str)] = &[("O", "Open"), ("U", "Up")];

/// Maps activity codes to display names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTable {
    labels: BTreeMap<String, String>,
}

impl Default for LabelTable {
    fn default() -> Self {
        Self {
            labels: DEFAULT_LABELS
                .iter()
                .map(|(code, label)| (code.to_string(), label.to_string()))
                .collect(),
        }
    }
}

impl LabelTable {
    /// Add or replace a label.
    pub fn insert(&mut self, code: impl Into<String>, label: impl Into<String>) {
        self.labels.insert(code.into(), label.into());
    }

    /// Merge `code=Label` pairs separated by commas, e.g. `L=Lead,T=Turn`.
    pub fn merge_spec(&mut self, spec: &str) -> Result<()> {
        for pair in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (code, label) = pair.split_once('=').ok_or_else(|| {
                ClipLogError::InvalidParameter(format!("Label entry {pair:?} is not code=Label"))
            })?;
            let (code, label) = (code.trim(), label.trim());
            if code.is_empty() || label.is_empty() {
                return Err(ClipLogError::InvalidParameter(format!(
                    "Label entry {pair:?} has an empty side"
                )));
            }
            self.insert(code, label);
        }
        Ok(())
    }

    /// Display name for a code, falling back to the code itself.
    pub fn display<'a>(&'a self, code: &'a str) -> &'a str {
        self.labels.get(code).map(String::as_str).unwrap_or(code)
    }
}

/// Format seconds as `H:MM:SS.cc`, or `MM:SS.cc` when under an hour.
pub fn format_duration(total_seconds: f64) -> String {
    let hundredths = (total_seconds.max(0.0) * 100.0).round() as u64;
    let fraction = hundredths % 100;
    let whole = hundredths / 100;
    let hours = whole / 3600;
    let minutes = (whole / 60) % 60;
    let seconds = whole % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}.{fraction:02}")
    } else {
        format!("{minutes:02}:{seconds:02}.{fraction:02}")
    }
}

fn header() -> String {
    format!(
        "{:<NAME_WIDTH$}{:>DURATION_WIDTH$}{:>NUMBER_WIDTH$}{:>NUMBER_WIDTH$}{:>NUMBER_WIDTH$}{:>NUMBER_WIDTH$}{:>NUMBER_WIDTH$}{:>VARIANCE_WIDTH$}",
        "Activity", "Duration", "Count", "Min", "Max", "Avg", "StdDev", "Variance"
    )
}

/// Render one report row.
pub fn format_row(row: &CategoryStats, labels: &LabelTable) -> String {
    format!(
        "{:<NAME_WIDTH$}{:>DURATION_WIDTH$}{:>NUMBER_WIDTH$.1}{:>NUMBER_WIDTH$.1}{:>NUMBER_WIDTH$.1}{:>NUMBER_WIDTH$.1}{:>NUMBER_WIDTH$.1}{:>VARIANCE_WIDTH$.1}",
        labels.display(&row.category),
        format_duration(row.sum),
        row.count as f64,
        row.min,
        row.max,
        row.mean,
        row.stddev,
        row.variance,
    )
}

/// Render the header plus every row, newline-terminated.
pub fn render(report: &StatsReport, labels: &LabelTable) -> String {
    let mut out = header();
    out.push('\n');
    for row in report.rows() {
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{}", format_row(row, labels));
    }
    out
}
