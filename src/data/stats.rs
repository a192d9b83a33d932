// ============================================================
// Layer 4 - Dataset Statistics
// ============================================================
// rows      → logged sets
// workouts  → distinct workout_id values
// average   → rows / workouts

use crate::data::workouts::WORKOUT_ID_COLUMN;
use crate::domain::stats::DatasetStats;
use crate::domain::table::Table;

/// Summary numbers for a processed workout table.
/// A table without `workout_id` reports zero workouts.
pub fn dataset_stats(table: &Table) -> DatasetStats {
    DatasetStats::new(table.n_rows(), table.distinct_count(WORKOUT_ID_COLUMN))
}
