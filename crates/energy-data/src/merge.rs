//! Merging of per-file reading batches into one dataset.

use energy_core::models::{Dataset, Reading};

/// Combine per-file batches (in discovery order) into one merged,
/// timestamp-sorted [`Dataset`].
///
/// One concatenation followed by a single stable sort: readings with
/// equal timestamps keep their concatenation order, so merging an
/// already-sorted dataset reproduces the same sequence. Zero batches
/// yield an empty dataset; downstream aggregation treats that as a
/// valid input.
pub fn merge_readings(batches: Vec<Vec<Reading>>) -> Dataset {
    let total: usize = batches.iter().map(Vec::len).sum();
    let mut all = Vec::with_capacity(total);
    for batch in batches {
        all.extend(batch);
    }
    Dataset::from_readings(all)
}
