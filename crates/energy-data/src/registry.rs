//! Building entities grouped from the merged dataset.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use energy_core::models::Dataset;
use serde::Serialize;

// ── Building ──────────────────────────────────────────────────────────────────

/// Aggregate of all readings sharing one building identifier.
#[derive(Debug, Clone)]
pub struct Building {
    name: String,
    readings: Vec<(NaiveDateTime, f64)>,
}

impl Building {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            readings: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append one measurement. Readings are never removed.
    pub fn add_reading(&mut self, timestamp: NaiveDateTime, kwh: f64) {
        self.readings.push((timestamp, kwh));
    }

    pub fn readings(&self) -> &[(NaiveDateTime, f64)] {
        &self.readings
    }

    /// Sum of every appended kWh value.
    ///
    /// Recomputed on each call; the dataset is batch-sized, so the O(n)
    /// walk is acceptable.
    pub fn total_consumption(&self) -> f64 {
        self.readings.iter().map(|(_, kwh)| kwh).sum()
    }

    /// Snapshot report for this building. Pure; no side effects.
    pub fn generate_report(&self) -> BuildingReport {
        BuildingReport {
            building: self.name.clone(),
            total_consumption: self.total_consumption(),
        }
    }
}

/// One line of the per-building consumption report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildingReport {
    pub building: String,
    pub total_consumption: f64,
}

// ── BuildingRegistry ──────────────────────────────────────────────────────────

/// Owned mapping from building name to [`Building`], built once per run.
///
/// The registry owns every entity outright; readings never need to
/// locate their owning building, so there are no back-references.
#[derive(Debug, Clone, Default)]
pub struct BuildingRegistry {
    buildings: BTreeMap<String, Building>,
}

impl BuildingRegistry {
    /// Build the registry in one pass over the merged dataset: create a
    /// building on the first encounter of a name, append the reading on
    /// every encounter.
    ///
    /// Never fails: every merged reading carries a building identifier
    /// by construction.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut buildings: BTreeMap<String, Building> = BTreeMap::new();
        for reading in dataset.readings() {
            buildings
                .entry(reading.building.clone())
                .or_insert_with(|| Building::new(reading.building.clone()))
                .add_reading(reading.timestamp, reading.kwh);
        }
        Self { buildings }
    }

    pub fn get(&self, name: &str) -> Option<&Building> {
        self.buildings.get(name)
    }

    pub fn len(&self) -> usize {
        self.buildings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }

    /// Buildings in alphabetical name order.
    pub fn buildings(&self) -> impl Iterator<Item = &Building> {
        self.buildings.values()
    }

    /// Reports for every building, alphabetical by name.
    pub fn generate_reports(&self) -> Vec<BuildingReport> {
        self.buildings.values().map(Building::generate_report).collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
