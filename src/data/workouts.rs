// ============================================================
// Layer 4 - Baseline Workout Normalisation
// ============================================================
// Turns a raw workout-log export (one row per logged set) into
// the processed shape every later step relies on.
//
// Raw export columns look like:
//   Date, Workout Name, Exercise Name, Set Order, Weight, Reps,
//   Distance, Seconds, Notes, Workout Notes, ...
//
// Normalisation:
//   1. Header names → snake_case ("Exercise Name" → "exercise_name")
//   2. Known numeric columns coerced to numbers (bad cells → NaN),
//      every other column kept as text so exports always concatenate
//   3. Rows without an exercise name dropped
//   4. `source` column appended ("4k" / "721")
//   5. `workout_id` column appended ("<date>|<workout_name>")
//
// Reference: Rust Book §13 (Iterators and Closures)

use anyhow::{bail, Context, Result};

use crate::data::preprocessor::Preprocessor;
use crate::domain::table::{Column, Table};

pub const EXERCISE_COLUMN:   &str = "exercise_name";
pub const DATE_COLUMN:       &str = "date";
pub const WORKOUT_COLUMN:    &str = "workout_name";
pub const SOURCE_COLUMN:     &str = "source";
pub const WORKOUT_ID_COLUMN: &str = "workout_id";

/// Columns that must be numeric in the processed data
pub const NUMERIC_COLUMNS: [&str; 5] = ["set_order", "weight", "reps", "distance", "seconds"];

/// Normalise one raw export. `source` labels every resulting row.
pub fn normalize_workouts(raw: &Table, source: &str) -> Result<Table> {
    let pre = Preprocessor::new();

    // ── Step 1 + 2: rename headers, coerce numeric columns ───────────────────
    let mut renamed = Table::new();
    for name in raw.column_names() {
        let Some(column) = raw.column(name) else { continue };
        let new_name = pre.normalize_header(name);
        let column   = if NUMERIC_COLUMNS.contains(&new_name.as_str()) {
            coerce_numeric(column, &new_name, source)
        } else {
            column.to_text()
        };
        renamed
            .push_column(new_name, column)
            .with_context(|| format!("Column '{name}' in the {source} dataset"))?;
    }

    // ── Step 3: drop rows without an exercise name ────────────────────────────
    let Some(exercise) = renamed.column(EXERCISE_COLUMN) else {
        bail!("The {source} dataset has no '{EXERCISE_COLUMN}' column");
    };
    let mask: Vec<bool> = (0..renamed.n_rows())
        .map(|i| !exercise.cell_string(i).is_empty())
        .collect();
    let dropped = mask.iter().filter(|keep| !**keep).count();
    if dropped > 0 {
        tracing::warn!("{}: dropped {} rows without an exercise name", source, dropped);
    }
    let mut table = renamed.filter_rows(&mask);

    // ── Step 4 + 5: provenance and workout identity ───────────────────────────
    let n = table.n_rows();
    let workout_ids: Vec<String> = (0..n)
        .map(|i| {
            let date    = cell_or_empty(&table, DATE_COLUMN, i);
            let workout = cell_or_empty(&table, WORKOUT_COLUMN, i);
            format!("{date}|{workout}")
        })
        .collect();

    table.push_column(SOURCE_COLUMN, Column::Text(vec![source.to_string(); n]))?;
    table.push_column(WORKOUT_ID_COLUMN, Column::Text(workout_ids))?;

    tracing::info!("{}: {} rows after preprocessing", source, n);
    Ok(table)
}

fn cell_or_empty(table: &Table, column: &str, row: usize) -> String {
    table
        .column(column)
        .map(|c| c.cell_string(row))
        .unwrap_or_default()
}

/// Numbers stay as they are; text cells are parsed, failures become NaN.
fn coerce_numeric(column: &Column, name: &str, source: &str) -> Column {
    match column {
        Column::Numeric(_) => column.clone(),
        Column::Text(cells) => {
            let values: Vec<f64> = cells
                .iter()
                .map(|c| c.parse::<f64>().unwrap_or(f64::NAN))
                .collect();
            let bad = cells
                .iter()
                .zip(&values)
                .filter(|(c, v)| !c.is_empty() && v.is_nan())
                .count();
            if bad > 0 {
                tracing::warn!("{}: {} non-numeric '{}' cells set to NaN", source, bad, name);
            }
            Column::Numeric(values)
        }
    }
}
