//! CSV file discovery and ingestion for the campus energy pipeline.
//!
//! Reads per-building meter exports from a data directory and converts
//! them into [`Reading`] batches for downstream merging. Every file is
//! processed independently; a failure in one file never aborts the run.

use std::fs::File;
use std::path::{Path, PathBuf};

use energy_core::error::{EnergyError, Result};
use energy_core::models::Reading;
use energy_core::time_utils;
use tracing::{debug, error, info, warn};

// ── Public API ────────────────────────────────────────────────────────────────

/// Find all `.csv` files recursively under `data_dir`, sorted by path.
///
/// The sorted order is the pipeline's discovery order, keeping merge
/// results deterministic across runs.
pub fn find_csv_files(data_dir: &Path) -> Vec<PathBuf> {
    if !data_dir.exists() {
        warn!("Data directory does not exist: {}", data_dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(data_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Derive the fallback building identifier for a file: the portion of
/// the base name before the first underscore, or the whole base name
/// when it contains none.
pub fn default_building_id(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");
    stem.split('_').next().unwrap_or(stem).to_string()
}

/// Validate and parse one meter CSV file into readings.
///
/// The header must contain `timestamp` and `kwh` columns; a `building`
/// column is optional and is consulted per row, falling back to the
/// file-derived default identifier. Schema violations and unparseable
/// timestamp/kWh values fail the whole file so no partial rows leak
/// downstream. Rows whose field count disagrees with the header are
/// skipped at the raw-parse stage.
pub fn ingest_file(path: &Path) -> Result<Vec<Reading>> {
    let file = File::open(path).map_err(|source| EnergyError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers = reader.headers()?.clone();
    let expected_fields = headers.len();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
    };

    let Some(timestamp_idx) = column("timestamp") else {
        return Err(EnergyError::MissingTimestampColumn(path.to_path_buf()));
    };
    let Some(kwh_idx) = column("kwh") else {
        return Err(EnergyError::MissingKwhColumn(path.to_path_buf()));
    };
    let building_idx = column("building");
    let default_building = default_building_id(path);

    let mut readings = Vec::new();
    let mut rows_skipped = 0u64;

    for record in reader.records() {
        let record = record?;
        if record.len() != expected_fields {
            rows_skipped += 1;
            continue;
        }

        let raw_timestamp = record.get(timestamp_idx).unwrap_or("");
        let timestamp = time_utils::parse_timestamp(raw_timestamp).ok_or_else(|| {
            EnergyError::TimestampParse {
                path: path.to_path_buf(),
                value: raw_timestamp.to_string(),
            }
        })?;

        let raw_kwh = record.get(kwh_idx).unwrap_or("");
        let kwh: f64 = raw_kwh
            .trim()
            .parse()
            .map_err(|_| EnergyError::KwhParse {
                path: path.to_path_buf(),
                value: raw_kwh.to_string(),
            })?;

        let building = resolve_building(building_idx.and_then(|i| record.get(i)), &default_building);

        readings.push(Reading {
            timestamp,
            kwh,
            building,
        });
    }

    if rows_skipped > 0 {
        debug!(
            "File {}: skipped {} rows with unexpected field counts",
            path.display(),
            rows_skipped
        );
    }

    Ok(readings)
}

/// Counters describing one ingestion sweep over a data directory.
#[derive(Debug, Clone, Default)]
pub struct IngestStats {
    pub files_discovered: usize,
    pub files_loaded: usize,
    pub files_failed: usize,
    pub readings: usize,
}

/// Ingest every CSV file under `data_dir`, isolating failures per file.
///
/// Successful files contribute one batch each (in discovery order) and
/// log one INFO line; failed files log one ERROR line with the cause and
/// contribute nothing. The sweep itself never fails.
pub fn ingest_directory(data_dir: &Path) -> (Vec<Vec<Reading>>, IngestStats) {
    let files = find_csv_files(data_dir);
    let mut stats = IngestStats {
        files_discovered: files.len(),
        ..Default::default()
    };

    let mut batches: Vec<Vec<Reading>> = Vec::with_capacity(files.len());
    for path in &files {
        match ingest_file(path) {
            Ok(readings) => {
                info!("Loaded: {}", path.display());
                stats.files_loaded += 1;
                stats.readings += readings.len();
                batches.push(readings);
            }
            Err(EnergyError::FileAccess { .. }) => {
                error!("Missing file: {}", path.display());
                stats.files_failed += 1;
            }
            Err(err) => {
                error!("Corrupt or invalid file {}: {}", path.display(), err);
                stats.files_failed += 1;
            }
        }
    }

    (batches, stats)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Total resolution of the building identifier for one row: the row's
/// own `building` cell when present and non-empty, the file-level
/// default otherwise.
fn resolve_building(cell: Option<&str>, default: &str) -> String {
    match cell.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => default.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
