// ============================================================
// Layer 5 - Model Metadata
// ============================================================
// Identity and shape of a wrapped model. Set once at
// construction; only the feature and target columns have
// explicit setters on the wrapper.
//
// `info()` flattens the record to a plain JSON object. That
// object is also what gets written into the persisted bundle,
// so `from_info()` is its inverse, with defaults for any field
// an older bundle did not carry.

use chrono::Utc;
use serde_json::{Map, Value};

pub const DEFAULT_VERSION: &str = "0.1.0";

/// Current UTC time as an ISO-8601 string without offset,
/// microsecond precision.
pub fn utc_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelMetadata {
    /// Persistence key
    pub model_name: String,

    pub version: String,

    pub created_at: String,

    /// When set, the exact ordered columns the estimator consumes
    pub feature_columns: Option<Vec<String>>,

    /// Informational only, never enforced
    pub target_column: Option<String>,

    pub random_state: Option<u64>,

    pub extra: Map<String, Value>,
}

impl ModelMetadata {
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            model_name:      model_name.into(),
            version:         DEFAULT_VERSION.to_string(),
            created_at:      utc_timestamp(),
            feature_columns: None,
            target_column:   None,
            random_state:    None,
            extra:           Map::new(),
        }
    }

    /// Flatten to a plain mapping with every field present.
    pub fn info(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("model_name".into(), Value::from(self.model_name.as_str()));
        map.insert("version".into(), Value::from(self.version.as_str()));
        map.insert("created_at".into(), Value::from(self.created_at.as_str()));
        map.insert("feature_columns".into(), Value::from(self.feature_columns.clone()));
        map.insert("target_column".into(), Value::from(self.target_column.clone()));
        map.insert("random_state".into(), Value::from(self.random_state));
        map.insert("extra".into(), Value::Object(self.extra.clone()));
        map
    }

    /// Rebuild from a flattened mapping.
    ///
    /// Absent or null fields fall back to: `fallback_name`, version
    /// "0.1.0", a fresh `created_at`, no columns, no seed, no extras.
    pub fn from_info(info: &Map<String, Value>, fallback_name: &str) -> Self {
        let string = |key: &str| info.get(key).and_then(Value::as_str).map(str::to_string);

        let mut md = ModelMetadata::new(string("model_name").unwrap_or_else(|| fallback_name.to_string()));
        if let Some(version) = string("version") {
            md.version = version;
        }
        if let Some(created_at) = string("created_at") {
            md.created_at = created_at;
        }
        md.feature_columns = info
            .get("feature_columns")
            .and_then(Value::as_array)
            .map(|cols| cols.iter().filter_map(Value::as_str).map(str::to_string).collect::<Vec<_>>())
            .filter(|cols| !cols.is_empty());
        md.target_column = string("target_column");
        md.random_state  = info.get("random_state").and_then(Value::as_u64);
        md.extra = info
            .get("extra")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        md
    }
}
