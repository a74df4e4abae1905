//! Executive summary rendering.

use std::path::Path;

use chrono::NaiveDateTime;
use energy_core::error::Result;
use energy_core::formatting::format_kwh;
use energy_core::time_utils::format_timestamp;
use energy_data::pipeline::PipelineResult;

/// The headline numbers of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutiveSummary {
    /// Sum of consumption across every building.
    pub total_campus_kwh: f64,
    /// Building with the largest total consumption; `None` when the
    /// dataset is empty.
    pub highest_building: Option<String>,
    /// Timestamp of the single globally maximum reading; `None` when
    /// the dataset is empty.
    pub peak_time: Option<NaiveDateTime>,
}

impl ExecutiveSummary {
    /// Derive the summary from a pipeline result.
    ///
    /// On a total-consumption tie the alphabetically first building
    /// wins, matching the order of the summary table.
    pub fn from_result(result: &PipelineResult) -> Self {
        let total_campus_kwh = result.building_summary.values().map(|s| s.sum).sum();

        let mut highest: Option<(&str, f64)> = None;
        for (name, stats) in &result.building_summary {
            let replace = match highest {
                Some((_, best)) => stats.sum > best,
                None => true,
            };
            if replace {
                highest = Some((name, stats.sum));
            }
        }

        Self {
            total_campus_kwh,
            highest_building: highest.map(|(name, _)| name.to_string()),
            peak_time: result.dataset.peak_reading().map(|r| r.timestamp),
        }
    }
}

/// Render the plain-text executive summary block.
///
/// The trailer sentence is fixed; the building and peak lines read
/// `n/a` when no readings were ingested.
pub fn render_summary(summary: &ExecutiveSummary) -> String {
    let highest = summary.highest_building.as_deref().unwrap_or("n/a");
    let peak = summary
        .peak_time
        .map(format_timestamp)
        .unwrap_or_else(|| "n/a".to_string());

    format!(
        "\nEXECUTIVE SUMMARY\n\
         =================\n\
         Total Campus Consumption: {}\n\
         Highest Consuming Building: {}\n\
         Peak Load Time: {}\n\
         Weekly Trend and Daily Consumption visuals saved as dashboard.png\n",
        format_kwh(summary.total_campus_kwh),
        highest,
        peak,
    )
}

/// Write the summary text to disk.
pub fn write_summary(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text)?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
