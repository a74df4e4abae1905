use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the campus energy pipeline.
#[derive(Error, Debug)]
pub enum EnergyError {
    /// A file could not be opened or read from disk (e.g. it vanished
    /// between discovery and ingestion).
    #[error("Failed to read file {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The required "timestamp" column is absent from a file's header.
    #[error("Timestamp column missing in {0}")]
    MissingTimestampColumn(PathBuf),

    /// The required "kwh" column is absent from a file's header.
    #[error("Kwh column missing in {0}")]
    MissingKwhColumn(PathBuf),

    /// A timestamp value did not match any recognised format.
    #[error("Invalid timestamp value \"{value}\" in {path}")]
    TimestampParse { path: PathBuf, value: String },

    /// A kWh value could not be parsed as a number.
    #[error("Invalid kWh value \"{value}\" in {path}")]
    KwhParse { path: PathBuf, value: String },

    /// A CSV document could not be parsed.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the energy crates.
pub type Result<T> = std::result::Result<T, EnergyError>;
