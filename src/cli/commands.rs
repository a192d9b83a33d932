// ============================================================
// Layer 1 - CLI Commands
// ============================================================
// The two subcommands. Neither takes flags: locations come from
// AppConfig (defaults, $PWP_CONFIG, $PWP_DATA_DIR).
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::Subcommand;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Preprocess baseline datasets and write processed CSVs
    Preprocess,

    /// Show basic stats for baseline datasets (rows, workouts, avg sets)
    Stats,
}
