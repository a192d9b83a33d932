// ============================================================
// Layer 6 - Per-User Model Store
// ============================================================
// Saves and restores model bundles on the filesystem, one
// directory per user:
//
//   <root>/
//     alice/
//       models/
//         progression.json   ← bundle for model "progression"
//         fatigue.json
//     bob/
//       models/
//         ...
//
// A bundle is a JSON object with exactly three fields:
//   estimator  → the estimator's own serde representation
//   metadata   → ModelMetadata flattened to a plain object
//   fitted     → bool
//
// The root is passed in explicitly (see AppConfig::models_root),
// never derived from where the binary lives.
//
// Writes go to a hidden sibling file first and are renamed into
// place, so a reader never sees a half-written bundle. There is
// no locking: one writer per (user, model) is assumed.
//
// Reference: Rust Book §9 (Error Handling)
//            serde_json documentation

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::{ModelError, ModelResult};

const BUNDLE_EXT: &str = "json";

/// On-disk shape of a saved model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelBundle<E> {
    pub estimator: E,

    #[serde(default)]
    pub metadata: Map<String, Value>,

    #[serde(default)]
    pub fitted: bool,
}

/// Directory-keyed store mapping (username, model_name) to a bundle.
#[derive(Debug, Clone)]
pub struct ModelStore {
    root: PathBuf,
}

impl ModelStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<username>/models`
    pub fn user_dir(&self, username: &str) -> PathBuf {
        self.root.join(username).join("models")
    }

    /// `<root>/<username>/models/<model_name>.json`
    pub fn model_path(&self, username: &str, model_name: &str) -> PathBuf {
        self.user_dir(username)
            .join(format!("{model_name}.{BUNDLE_EXT}"))
    }

    pub fn exists(&self, username: &str, model_name: &str) -> bool {
        self.model_path(username, model_name).is_file()
    }

    /// Names of every saved model for `username`, sorted.
    /// A user who never saved anything has no models.
    pub fn list_models(&self, username: &str) -> ModelResult<Vec<String>> {
        let dir = self.user_dir(username);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|e| ModelError::io(&dir, e))? {
            let path = entry.map_err(|e| ModelError::io(&dir, e))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(BUNDLE_EXT) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Write a bundle. With `overwrite` false an existing file is an
    /// error and is left exactly as it was.
    pub fn save<T: Serialize>(
        &self,
        username:   &str,
        model_name: &str,
        bundle:     &ModelBundle<T>,
        overwrite:  bool,
    ) -> ModelResult<PathBuf> {
        let dir = self.user_dir(username);
        // create_dir_all is a no-op when the directory already exists
        fs::create_dir_all(&dir).map_err(|e| ModelError::io(&dir, e))?;

        let path = self.model_path(username, model_name);
        if path.exists() && !overwrite {
            return Err(ModelError::AlreadyExists(path));
        }

        let json = serde_json::to_vec_pretty(bundle)
            .map_err(|e| ModelError::serialization(&path, e))?;

        let tmp = dir.join(format!(".{model_name}.{BUNDLE_EXT}.tmp"));
        fs::write(&tmp, json).map_err(|e| ModelError::io(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| ModelError::io(&path, e))?;

        tracing::debug!("Saved model '{}' for '{}' to '{}'", model_name, username, path.display());
        Ok(path)
    }

    /// Read a bundle back. A missing file is `ModelError::NotFound`.
    pub fn load<E: DeserializeOwned>(&self, username: &str, model_name: &str) -> ModelResult<ModelBundle<E>> {
        let path = self.model_path(username, model_name);
        if !path.is_file() {
            return Err(ModelError::NotFound {
                username: username.to_string(),
                path,
            });
        }

        let bytes  = fs::read(&path).map_err(|e| ModelError::io(&path, e))?;
        let bundle = serde_json::from_slice(&bytes)
            .map_err(|e| ModelError::serialization(&path, e))?;

        tracing::debug!("Loaded model '{}' for '{}' from '{}'", model_name, username, path.display());
        Ok(bundle)
    }
}
