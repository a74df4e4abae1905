//! Dashboard rendering.
//!
//! Draws the three-panel consumption chart from the merged dataset and
//! the per-building summary: a daily trend line per building, mean
//! consumption per building, and a scatter of every reading over time.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use energy_core::models::{Dataset, KwhStats};
use energy_core::time_utils::day_of;
use plotters::coord::Shift;
use plotters::prelude::*;

/// Render the dashboard PNG at `path`.
///
/// An empty dataset produces a blank placeholder image instead of an
/// error so the batch run still completes with a full artifact set.
pub fn render_dashboard(
    path: &Path,
    dataset: &Dataset,
    summary: &BTreeMap<String, KwhStats>,
) -> anyhow::Result<()> {
    let root = BitMapBackend::new(path, (1200, 1400)).into_drawing_area();
    root.fill(&WHITE)?;

    if dataset.is_empty() {
        tracing::info!("No readings to chart; writing an empty dashboard");
        root.present()?;
        return Ok(());
    }

    let panels = root.split_evenly((3, 1));
    draw_daily_trend(&panels[0], dataset)?;
    draw_mean_bars(&panels[1], summary)?;
    draw_scatter(&panels[2], dataset)?;

    root.present()?;
    Ok(())
}

// ── Panels ────────────────────────────────────────────────────────────────────

fn draw_daily_trend(
    area: &DrawingArea<BitMapBackend, Shift>,
    dataset: &Dataset,
) -> anyhow::Result<()> {
    let series = per_building_daily(dataset);
    let Some((first, last)) = dataset.date_span() else {
        return Ok(());
    };

    let mut y_min = 0.0f64;
    let mut y_max = f64::MIN;
    for points in series.values() {
        for &(_, kwh) in points {
            y_min = y_min.min(kwh);
            y_max = y_max.max(kwh);
        }
    }
    let pad = ((y_max - y_min) * 0.1).max(1.0);

    let mut chart = ChartBuilder::on(area)
        .caption("Daily Electricity Consumption Trend", ("sans-serif", 26))
        .margin(12)
        .x_label_area_size(42)
        .y_label_area_size(64)
        .build_cartesian_2d(first..(last + Duration::days(1)), y_min..(y_max + pad))?;

    chart.configure_mesh().y_desc("kWh").draw()?;

    for (idx, (building, points)) in series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        chart
            .draw_series(LineSeries::new(
                points.iter().copied(),
                color.stroke_width(2),
            ))?
            .label(building.clone())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 18, y)], color.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK.mix(0.4))
        .draw()?;

    Ok(())
}

fn draw_mean_bars(
    area: &DrawingArea<BitMapBackend, Shift>,
    summary: &BTreeMap<String, KwhStats>,
) -> anyhow::Result<()> {
    let names: Vec<String> = summary.keys().cloned().collect();
    let means: Vec<f64> = summary.values().map(KwhStats::mean).collect();

    let top = means.iter().cloned().fold(f64::MIN, f64::max);
    let y_top = if top <= 0.0 { 1.0 } else { top * 1.2 };

    let mut chart = ChartBuilder::on(area)
        .caption("Average Weekly Consumption by Building", ("sans-serif", 26))
        .margin(12)
        .x_label_area_size(42)
        .y_label_area_size(64)
        .build_cartesian_2d((0..names.len()).into_segmented(), 0f64..y_top)?;

    let labels = names.clone();
    chart
        .configure_mesh()
        .y_desc("Avg kWh")
        .x_label_formatter(&move |segment: &SegmentValue<usize>| match segment {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                labels.get(*i).cloned().unwrap_or_default()
            }
            SegmentValue::Last => String::new(),
        })
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BLUE.mix(0.6).filled())
            .margin(18)
            .data(means.iter().enumerate().map(|(i, &mean)| (i, mean))),
    )?;

    Ok(())
}

fn draw_scatter(
    area: &DrawingArea<BitMapBackend, Shift>,
    dataset: &Dataset,
) -> anyhow::Result<()> {
    let Some((start, end)) = dataset.span() else {
        return Ok(());
    };

    let mut kwh_min = f64::MAX;
    let mut kwh_max = f64::MIN;
    for reading in dataset.readings() {
        kwh_min = kwh_min.min(reading.kwh);
        kwh_max = kwh_max.max(reading.kwh);
    }
    let pad = ((kwh_max - kwh_min) * 0.1).max(1.0);

    let mut chart = ChartBuilder::on(area)
        .caption("Peak Hour Consumption", ("sans-serif", 26))
        .margin(12)
        .x_label_area_size(42)
        .y_label_area_size(64)
        .build_cartesian_2d(
            start..(end + Duration::hours(1)),
            (kwh_min - pad)..(kwh_max + pad),
        )?;

    chart.configure_mesh().y_desc("kWh").draw()?;

    chart.draw_series(dataset.readings().iter().map(|reading| {
        Circle::new(
            (reading.timestamp, reading.kwh),
            3,
            BLUE.mix(0.5).filled(),
        )
    }))?;

    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Daily consumption bins per building, in the same order the summary
/// table lists them.
fn per_building_daily(dataset: &Dataset) -> BTreeMap<String, Vec<(NaiveDate, f64)>> {
    let mut grouped: BTreeMap<String, BTreeMap<NaiveDate, f64>> = BTreeMap::new();
    for reading in dataset.readings() {
        *grouped
            .entry(reading.building.clone())
            .or_default()
            .entry(day_of(reading.timestamp))
            .or_insert(0.0) += reading.kwh;
    }
    grouped
        .into_iter()
        .map(|(building, bins)| (building, bins.into_iter().collect()))
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
