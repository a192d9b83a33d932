// ============================================================
// Layer 3 - Dataset Summary Statistics
// ============================================================

use std::fmt;

/// Summary of one workout dataset, as printed by `pwp stats`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetStats {
    /// Number of logged sets (one row per set)
    pub rows: usize,

    /// Number of distinct workouts
    pub workouts: usize,

    /// rows / workouts, 0.0 when there are no workouts
    pub avg_sets_per_workout: f64,
}

impl DatasetStats {
    pub fn new(rows: usize, workouts: usize) -> Self {
        let avg_sets_per_workout = if workouts == 0 {
            0.0
        } else {
            rows as f64 / workouts as f64
        };
        Self { rows, workouts, avg_sets_per_workout }
    }
}

impl fmt::Display for DatasetStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{rows: {}, workouts: {}, avg_sets_per_workout: {:.2}}}",
            self.rows, self.workouts, self.avg_sets_per_workout
        )
    }
}
