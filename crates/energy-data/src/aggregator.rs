//! Calendar aggregation over the merged dataset.
//!
//! All functions recompute from scratch on every call; nothing is cached
//! and nothing mutates the dataset.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use energy_core::models::{Dataset, KwhStats};
use energy_core::time_utils::{day_of, week_ending_sunday};

// ── Aggregator ────────────────────────────────────────────────────────────────

/// Stateless helper computing the derived views of a [`Dataset`].
pub struct Aggregator;

impl Aggregator {
    /// Total consumption per calendar day across all buildings combined.
    ///
    /// Bins are anchored at midnight and cover the full span of the
    /// data: days inside the span with no readings appear as zero bins.
    /// Returns an empty vector for an empty dataset.
    pub fn daily_totals(dataset: &Dataset) -> Vec<(NaiveDate, f64)> {
        Self::totals_by_period(dataset, day_of, 1)
    }

    /// Total consumption per calendar week across all buildings combined.
    ///
    /// Weeks end on Sunday (each reading is binned under the Sunday on
    /// or after its date) and gap weeks inside the span appear as zero
    /// bins, mirroring the daily view.
    pub fn weekly_totals(dataset: &Dataset) -> Vec<(NaiveDate, f64)> {
        Self::totals_by_period(dataset, |ts| week_ending_sunday(day_of(ts)), 7)
    }

    /// Per-building kWh statistics for the whole dataset.
    ///
    /// Keys are building identifiers in alphabetical order; the ordering
    /// is guaranteed and callers may rely on it.
    pub fn building_summary(dataset: &Dataset) -> BTreeMap<String, KwhStats> {
        let mut summary: BTreeMap<String, KwhStats> = BTreeMap::new();
        for reading in dataset.readings() {
            summary
                .entry(reading.building.clone())
                .or_default()
                .add_sample(reading.kwh);
        }
        summary
    }

    // ── Private ───────────────────────────────────────────────────────────────

    /// Generic binning driver.
    ///
    /// `key_fn` maps a reading's timestamp to its bin key; keys must be
    /// `step_days` apart for readings in adjacent bins so the gap fill
    /// lands exactly on every bin boundary inside the span.
    fn totals_by_period(
        dataset: &Dataset,
        key_fn: impl Fn(chrono::NaiveDateTime) -> NaiveDate,
        step_days: i64,
    ) -> Vec<(NaiveDate, f64)> {
        let mut bins: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for reading in dataset.readings() {
            *bins.entry(key_fn(reading.timestamp)).or_insert(0.0) += reading.kwh;
        }

        let (Some(&first), Some(&last)) = (bins.keys().next(), bins.keys().next_back()) else {
            return Vec::new();
        };

        let mut totals = Vec::new();
        let mut key = first;
        while key <= last {
            totals.push((key, bins.get(&key).copied().unwrap_or(0.0)));
            key = key + Duration::days(step_days);
        }
        totals
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use energy_core::models::Reading;

    fn reading(s: &str, kwh: f64, building: &str) -> Reading {
        Reading {
            timestamp: chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap(),
            kwh,
            building: building.to_string(),
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn dataset(readings: Vec<Reading>) -> Dataset {
        Dataset::from_readings(readings)
    }

    // ── daily_totals ──────────────────────────────────────────────────────────

    #[test]
    fn test_daily_totals_groups_by_day() {
        let ds = dataset(vec![
            reading("2024-01-01T08:00:00", 10.0, "A"),
            reading("2024-01-01T20:00:00", 5.0, "B"),
            reading("2024-01-02T10:00:00", 20.0, "A"),
        ]);

        let daily = Aggregator::daily_totals(&ds);
        assert_eq!(
            daily,
            vec![(date("2024-01-01"), 15.0), (date("2024-01-02"), 20.0)]
        );
    }

    #[test]
    fn test_daily_totals_fills_gap_days_with_zero() {
        let ds = dataset(vec![
            reading("2024-01-01T00:00:00", 10.0, "A"),
            reading("2024-01-04T00:00:00", 20.0, "A"),
        ]);

        let daily = Aggregator::daily_totals(&ds);
        assert_eq!(
            daily,
            vec![
                (date("2024-01-01"), 10.0),
                (date("2024-01-02"), 0.0),
                (date("2024-01-03"), 0.0),
                (date("2024-01-04"), 20.0),
            ]
        );
    }

    #[test]
    fn test_daily_totals_empty_dataset() {
        assert!(Aggregator::daily_totals(&Dataset::default()).is_empty());
    }

    // ── weekly_totals ─────────────────────────────────────────────────────────

    #[test]
    fn test_weekly_totals_bin_under_week_ending_sunday() {
        // 2024-01-01 (Mon) and 2024-01-06 (Sat) share the week ending
        // 2024-01-07; 2024-01-08 (Mon) starts the next week.
        let ds = dataset(vec![
            reading("2024-01-01T00:00:00", 10.0, "A"),
            reading("2024-01-06T00:00:00", 20.0, "A"),
            reading("2024-01-08T00:00:00", 5.0, "B"),
        ]);

        let weekly = Aggregator::weekly_totals(&ds);
        assert_eq!(
            weekly,
            vec![(date("2024-01-07"), 30.0), (date("2024-01-14"), 5.0)]
        );
    }

    #[test]
    fn test_weekly_totals_fills_gap_weeks_with_zero() {
        let ds = dataset(vec![
            reading("2024-01-01T00:00:00", 10.0, "A"),
            reading("2024-01-21T00:00:00", 20.0, "A"),
        ]);

        let weekly = Aggregator::weekly_totals(&ds);
        assert_eq!(
            weekly,
            vec![
                (date("2024-01-07"), 10.0),
                (date("2024-01-14"), 0.0),
                (date("2024-01-21"), 20.0),
            ]
        );
    }

    #[test]
    fn test_weekly_totals_empty_dataset() {
        assert!(Aggregator::weekly_totals(&Dataset::default()).is_empty());
    }

    // ── building_summary ──────────────────────────────────────────────────────

    #[test]
    fn test_building_summary_stats_per_group() {
        let ds = dataset(vec![
            reading("2024-01-01T00:00:00", 10.0, "A"),
            reading("2024-01-02T00:00:00", 20.0, "A"),
            reading("2024-01-01T00:00:00", 5.0, "B"),
        ]);

        let summary = Aggregator::building_summary(&ds);
        let a = &summary["A"];
        assert_eq!(a.sum, 30.0);
        assert!((a.mean() - 15.0).abs() < 1e-9);
        assert_eq!(a.min, 10.0);
        assert_eq!(a.max, 20.0);

        let b = &summary["B"];
        assert_eq!(b.sum, 5.0);
        assert!((b.mean() - 5.0).abs() < 1e-9);
        assert_eq!(b.min, 5.0);
        assert_eq!(b.max, 5.0);
    }

    #[test]
    fn test_building_summary_keys_alphabetical() {
        let ds = dataset(vec![
            reading("2024-01-01T00:00:00", 1.0, "gym"),
            reading("2024-01-01T01:00:00", 1.0, "annex"),
            reading("2024-01-01T02:00:00", 1.0, "library"),
        ]);

        let keys: Vec<&str> = Aggregator::building_summary(&ds)
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["annex", "gym", "library"]);
    }

    #[test]
    fn test_building_summary_empty_dataset() {
        assert!(Aggregator::building_summary(&Dataset::default()).is_empty());
    }

    // ── Conservation across granularities ─────────────────────────────────────

    #[test]
    fn test_total_energy_is_conserved_across_views() {
        let ds = dataset(vec![
            reading("2024-01-01T08:00:00", 10.0, "A"),
            reading("2024-01-05T08:00:00", 20.0, "A"),
            reading("2024-01-12T08:00:00", 7.5, "B"),
            reading("2024-02-01T08:00:00", 2.5, "C"),
        ]);

        let daily_sum: f64 = Aggregator::daily_totals(&ds).iter().map(|(_, v)| v).sum();
        let weekly_sum: f64 = Aggregator::weekly_totals(&ds).iter().map(|(_, v)| v).sum();
        let building_sum: f64 = Aggregator::building_summary(&ds)
            .values()
            .map(|s| s.sum)
            .sum();

        assert!((daily_sum - 40.0).abs() < 1e-9);
        assert!((daily_sum - weekly_sum).abs() < 1e-9);
        assert!((daily_sum - building_sum).abs() < 1e-9);
    }
}
