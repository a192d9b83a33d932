// ============================================================
// Layer 2 - StatsUseCase
// ============================================================
// Preprocesses the baseline datasets in memory (nothing is
// written) and summarises each of them.

use anyhow::Result;

use crate::application::preprocess_use_case::PreprocessUseCase;
use crate::data::stats::dataset_stats;
use crate::domain::stats::DatasetStats;
use crate::infra::config::AppConfig;

/// Stats for the 4k, 721 and combined datasets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineStats {
    pub df_4k:  DatasetStats,
    pub df_721: DatasetStats,
    pub all:    DatasetStats,
}

pub struct StatsUseCase {
    config: AppConfig,
}

impl StatsUseCase {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<BaselineStats> {
        let data = PreprocessUseCase::new(self.config.clone()).execute(false)?;
        Ok(BaselineStats {
            df_4k:  dataset_stats(&data.df_4k),
            df_721: dataset_stats(&data.df_721),
            all:    dataset_stats(&data.all),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_stats_for_each_dataset() {
        let dir = TempDir::new().unwrap();
        let raw = dir.path().join("raw");
        fs::create_dir_all(&raw).unwrap();
        fs::write(
            raw.join("4k.csv"),
            "Date,Workout Name,Exercise Name\nd1,Push,Bench\nd1,Push,Dip\nd2,Pull,Row\nd2,Pull,Curl\n",
        )
        .unwrap();
        fs::write(raw.join("721.csv"), "Date,Workout Name,Exercise Name\nd9,Legs,Squat\n").unwrap();

        let cfg   = AppConfig { data_dir: dir.path().to_path_buf(), ..AppConfig::default() };
        let stats = StatsUseCase::new(cfg).execute().unwrap();

        assert_eq!(stats.df_4k, DatasetStats::new(4, 2));
        assert_eq!(stats.df_721, DatasetStats::new(1, 1));
        assert_eq!(stats.all, DatasetStats::new(5, 3));
        assert!(!dir.path().join("processed").exists());
    }
}
