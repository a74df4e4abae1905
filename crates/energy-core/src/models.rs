use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One timestamped kWh measurement for a single building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Naive campus-local wall-clock time of the measurement.
    pub timestamp: NaiveDateTime,
    /// Metered consumption in kilowatt-hours. Any parseable numeric
    /// value is accepted; negative values (e.g. export meters) are not
    /// rejected.
    pub kwh: f64,
    /// Identifier of the building the meter belongs to.
    pub building: String,
}

/// The full merged, time-sorted collection of readings across all
/// ingested files.
///
/// The only constructor runs a stable sort on timestamp, so the
/// ascending-order invariant holds for the lifetime of the value and
/// readings with equal timestamps keep their input order. Duplicate
/// timestamps across buildings are permitted.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    readings: Vec<Reading>,
}

impl Dataset {
    /// Build a dataset from readings in any order.
    pub fn from_readings(mut readings: Vec<Reading>) -> Self {
        readings.sort_by_key(|r| r.timestamp);
        Self { readings }
    }

    /// The readings in ascending timestamp order.
    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// First and last timestamps, or `None` when the dataset is empty.
    pub fn span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        match (self.readings.first(), self.readings.last()) {
            (Some(first), Some(last)) => Some((first.timestamp, last.timestamp)),
            _ => None,
        }
    }

    /// Calendar days covered by the dataset, or `None` when empty.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.span().map(|(a, b)| (a.date(), b.date()))
    }

    /// The single globally maximum reading by kWh value.
    ///
    /// Ties resolve to the earliest occurrence in timestamp order.
    pub fn peak_reading(&self) -> Option<&Reading> {
        let mut peak: Option<&Reading> = None;
        for reading in &self.readings {
            let higher = match peak {
                Some(best) => reading.kwh > best.kwh,
                None => true,
            };
            if higher {
                peak = Some(reading);
            }
        }
        peak
    }
}

/// Running kWh statistics for one group of readings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct KwhStats {
    /// Total kWh across the group.
    pub sum: f64,
    /// Smallest single reading.
    pub min: f64,
    /// Largest single reading.
    pub max: f64,
    /// Number of readings accumulated.
    pub count: u32,
}

impl KwhStats {
    /// Fold one reading's kWh value into the running statistics.
    pub fn add_sample(&mut self, kwh: f64) {
        if self.count == 0 {
            self.min = kwh;
            self.max = kwh;
        } else {
            if kwh < self.min {
                self.min = kwh;
            }
            if kwh > self.max {
                self.max = kwh;
            }
        }
        self.sum += kwh;
        self.count += 1;
    }

    /// Arithmetic mean of the group; `0.0` for an empty group.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / f64::from(self.count)
        }
    }
}
