// ============================================================
// Layer 4 - Data Pipeline
// ============================================================
// Raw workout exports to processed tables and summary stats.
//
//   data/raw/<source>.csv
//       │
//       ▼
//   CsvLoader            → reads the file, cleans every cell
//       │
//       ▼
//   normalize_workouts   → snake_case headers, numeric coercion,
//       │                  source + workout_id columns
//       ▼
//   Table::concat        → combined dataset
//       │
//       ▼
//   dataset_stats        → rows, workouts, avg sets per workout
//
// Reference: Rust Book §13 (Iterators and Closures)

/// Reads and writes CSV files as Tables
pub mod loader;

/// Cleans cells and normalises header names
pub mod preprocessor;

/// Baseline workout export normalisation
pub mod workouts;

/// Row / workout counts
pub mod stats;
