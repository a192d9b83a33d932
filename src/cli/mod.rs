// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// clap and hands off to Layer 2; the only thing done here is
// printing results.
//
//   pwp preprocess   → writes processed CSVs, prints row counts
//   pwp stats        → prints summary stats for each dataset
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::Commands;

use crate::application::{preprocess_use_case::PreprocessUseCase, stats_use_case::StatsUseCase};
use crate::infra::config::AppConfig;

#[derive(Parser, Debug)]
#[command(
    name = "pwp",
    version,
    about = "Personalized Workout Progression System"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Resolve configuration and dispatch to the matching use case.
    pub fn run(self) -> Result<()> {
        let config = AppConfig::load()?;
        match self.command {
            Commands::Preprocess => run_preprocess(config),
            Commands::Stats      => run_stats(config),
        }
    }
}

fn run_preprocess(config: AppConfig) -> Result<()> {
    let data = PreprocessUseCase::new(config).execute(true)?;
    println!("Processed 4k rows: {}", data.df_4k.n_rows());
    println!("Processed 721 rows: {}", data.df_721.n_rows());
    println!("Combined processed rows: {}", data.all.n_rows());
    Ok(())
}

fn run_stats(config: AppConfig) -> Result<()> {
    let stats = StatsUseCase::new(config).execute()?;
    println!("4k: {}", stats.df_4k);
    println!("721: {}", stats.df_721);
    println!("ALL: {}", stats.all);
    Ok(())
}
