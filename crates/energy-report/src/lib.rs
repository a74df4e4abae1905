//! Report layer for the campus energy pipeline.
//!
//! Consumes the merged dataset and its aggregates to produce the flat
//! output artifacts: the cleaned dataset CSV, the per-building summary
//! CSV, the dashboard chart, and the executive summary text.

pub mod csv_out;
pub mod dashboard;
pub mod summary;
