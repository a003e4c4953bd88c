//! Output formatting and persistence for the comparison pipeline.

use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use tracing::info;

use crate::records::{ComparisonRow, GroupMedian};
use crate::summary::MarketSummary;

fn write_table<T: Serialize>(path: &str, rows: &[T]) -> Result<()> {
    let mut writer = WriterBuilder::new().from_writer(File::create(path)?);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the assembled comparison table as CSV, replacing any existing file.
///
/// Absent values serialize as empty fields, so downstream tools see them as
/// nulls rather than zeros.
pub fn write_comparison(path: &str, rows: &[ComparisonRow]) -> Result<()> {
    write_table(path, rows)?;
    info!(path, rows = rows.len(), "Comparison table written");
    Ok(())
}

/// Writes a grouped-median table as CSV, replacing any existing file.
pub fn write_medians(path: &str, medians: &[GroupMedian]) -> Result<()> {
    write_table(path, medians)?;
    info!(path, rows = medians.len(), "Median table written");
    Ok(())
}

/// Logs the market summary as pretty-printed JSON.
pub fn print_summary_json(summary: &MarketSummary) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}
