// ============================================================
// Layer 2 - PreprocessUseCase
// ============================================================
// Runs the baseline preprocessing pipeline in order:
//
//   Step 1: Load each raw export       (Layer 4 - data)
//   Step 2: Normalise it               (Layer 4 - data)
//   Step 3: Concatenate into "ALL"     (Layer 3 - domain)
//   Step 4: Optionally write CSVs      (Layer 4 - data)
//
// Inputs:   <data_dir>/raw/4k.csv, <data_dir>/raw/721.csv
// Outputs:  <data_dir>/processed/{4k,721,all}_processed.csv
//
// Reference: Rust Book §13 (Iterators and Closures)

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::data::{loader::{write_csv, CsvLoader}, workouts::normalize_workouts};
use crate::domain::table::Table;
use crate::domain::traits::DatasetSource;
use crate::infra::config::AppConfig;

pub const SOURCE_4K:  &str = "4k";
pub const SOURCE_721: &str = "721";

/// The three processed datasets
#[derive(Debug, Clone)]
pub struct BaselineDatasets {
    pub df_4k:  Table,
    pub df_721: Table,
    pub all:    Table,
}

pub struct PreprocessUseCase {
    config: AppConfig,
}

impl PreprocessUseCase {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn raw_path(&self, source: &str) -> PathBuf {
        self.config.raw_dir().join(format!("{source}.csv"))
    }

    pub fn processed_path(&self, name: &str) -> PathBuf {
        self.config.processed_dir().join(format!("{name}_processed.csv"))
    }

    /// Load, normalise and combine both baseline exports.
    /// With `write_outputs` the three tables are also written to disk.
    pub fn execute(&self, write_outputs: bool) -> Result<BaselineDatasets> {
        // ── Step 1 + 2: load and normalise each source ────────────────────────
        let df_4k  = self.load_source(SOURCE_4K)?;
        let df_721 = self.load_source(SOURCE_721)?;

        // ── Step 3: combined dataset ──────────────────────────────────────────
        let all = Table::concat(&[&df_4k, &df_721]).context("Cannot combine baseline datasets")?;
        tracing::info!("Combined dataset: {} rows", all.n_rows());

        // ── Step 4: persist ───────────────────────────────────────────────────
        if write_outputs {
            for (name, table) in [(SOURCE_4K, &df_4k), (SOURCE_721, &df_721), ("all", &all)] {
                let path = self.processed_path(name);
                write_csv(table, &path)?;
                tracing::info!("Wrote '{}'", path.display());
            }
        }

        Ok(BaselineDatasets { df_4k, df_721, all })
    }

    fn load_source(&self, source: &str) -> Result<Table> {
        let path = self.raw_path(source);
        tracing::info!("Loading {} dataset from '{}'", source, path.display());
        let raw = CsvLoader::new(&path).load()?;
        normalize_workouts(&raw, source)
    }
}

/// `preprocess(write_outputs)` → (4k, 721, combined)
pub fn preprocess_baseline_data(config: &AppConfig, write_outputs: bool) -> Result<(Table, Table, Table)> {
    let d = PreprocessUseCase::new(config.clone()).execute(write_outputs)?;
    Ok((d.df_4k, d.df_721, d.all))
}
