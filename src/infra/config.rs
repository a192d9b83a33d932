// ============================================================
// Layer 6 - Application Configuration
// ============================================================
// Where the baseline data lives and where user models are kept.
//
// Resolution order (later wins):
//   1. Defaults              data_dir = "data", models_root = "users"
//   2. JSON file at $PWP_CONFIG, if set
//   3. $PWP_DATA_DIR / $PWP_MODELS_ROOT
//
// The CLI has no flags beyond its two subcommands, so the
// environment is the only way to point it somewhere else.
//
// Example pwp.json:
//   { "data_dir": "/srv/pwp/data", "models_root": "/srv/pwp/users" }

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::infra::model_store::ModelStore;

pub const ENV_CONFIG:      &str = "PWP_CONFIG";
pub const ENV_DATA_DIR:    &str = "PWP_DATA_DIR";
pub const ENV_MODELS_ROOT: &str = "PWP_MODELS_ROOT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Holds raw/ (inputs) and processed/ (outputs)
    pub data_dir: PathBuf,

    /// Root of the per-user model directories
    pub models_root: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir:    PathBuf::from("data"),
            models_root: PathBuf::from("users"),
        }
    }
}

impl AppConfig {
    /// Defaults, then $PWP_CONFIG, then the directory overrides.
    pub fn load() -> Result<Self> {
        Self::resolve(|key| std::env::var(key).ok())
    }

    /// Same as `load` with an injectable variable lookup.
    pub fn resolve(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = match var(ENV_CONFIG) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None       => Self::default(),
        };
        if let Some(dir) = var(ENV_DATA_DIR) {
            cfg.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = var(ENV_MODELS_ROOT) {
            cfg.models_root = PathBuf::from(dir);
        }
        tracing::debug!("Resolved config: {:?}", cfg);
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Invalid config in '{}'", path.display()))
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.data_dir.join("raw")
    }

    pub fn processed_dir(&self) -> PathBuf {
        self.data_dir.join("processed")
    }

    pub fn model_store(&self) -> ModelStore {
        ModelStore::new(&self.models_root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup(pairs: &[(&str, String)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::resolve(lookup(&[])).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.raw_dir(), PathBuf::from("data/raw"));
    }

    #[test]
    fn test_file_then_env_override() {
        let dir  = TempDir::new().unwrap();
        let file = dir.path().join("pwp.json");
        fs::write(&file, r#"{"data_dir": "/from/file"}"#).unwrap();

        let cfg = AppConfig::resolve(lookup(&[(ENV_CONFIG, file.display().to_string())])).unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("/from/file"));
        assert_eq!(cfg.models_root, PathBuf::from("users"));

        let cfg = AppConfig::resolve(lookup(&[
            (ENV_CONFIG, file.display().to_string()),
            (ENV_DATA_DIR, "/from/env".to_string()),
        ]))
        .unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("/from/env"));
    }

    #[test]
    fn test_missing_config_file_errors() {
        let err = AppConfig::resolve(lookup(&[(ENV_CONFIG, "/no/such/pwp.json".to_string())])).unwrap_err();
        assert!(err.to_string().contains("/no/such/pwp.json"));
    }
}
