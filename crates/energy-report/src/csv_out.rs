//! CSV artifact writers.

use std::collections::BTreeMap;
use std::path::Path;

use energy_core::error::Result;
use energy_core::models::{Dataset, KwhStats};
use energy_core::time_utils::format_timestamp;

/// Write the merged dataset as the cleaned combined table.
///
/// The timestamp is the leading column; rows are already in ascending
/// timestamp order because [`Dataset`] guarantees it. An empty dataset
/// produces a header-only file.
pub fn write_cleaned_dataset(path: &Path, dataset: &Dataset) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["timestamp", "kwh", "building"])?;
    for reading in dataset.readings() {
        writer.write_record([
            format_timestamp(reading.timestamp),
            reading.kwh.to_string(),
            reading.building.clone(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the per-building statistics table, alphabetically ordered.
pub fn write_building_summary(path: &Path, summary: &BTreeMap<String, KwhStats>) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["building", "mean", "min", "max", "sum"])?;
    for (building, stats) in summary {
        writer.write_record([
            building.clone(),
            stats.mean().to_string(),
            stats.min.to_string(),
            stats.max.to_string(),
            stats.sum.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
