// ============================================================
// Layer 5 - BaseModel (generic estimator wrapper)
// ============================================================
// Wraps one estimator with its metadata and a fitted flag and
// gives every model in the system the same surface:
//
//   BaseModel::new(estimator, name)     → Unfitted
//     .fit(x, y)                        → Fitted (never left again)
//     .predict(x) / .evaluate_regression(x, y_true)
//     .save(&store, user, overwrite)    → <root>/<user>/models/<name>.json
//   BaseModel::load(&store, user, name) → wrapper with fitted + metadata restored
//
// Feature columns, once configured, are authoritative: every
// labeled input is cut down to exactly those columns, in that
// order, before the estimator sees it. Raw matrices pass through.
//
// Seeding is best effort. If the estimator rejects a seed the
// failure is logged at debug level and construction carries on.
//
// Reference: Rust Book §10 (Generic Types, Traits)
//            Rust Book §9 (Recoverable Errors with Result)

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::{borrow::Cow, fmt, path::PathBuf};

use crate::domain::table::Features;
use crate::domain::traits::{Estimator, Params};
use crate::error::{ModelError, ModelResult, TableError};
use crate::infra::model_store::{ModelBundle, ModelStore};
use crate::ml::metadata::ModelMetadata;
use crate::ml::metrics::RegressionMetrics;

pub struct BaseModel<E> {
    estimator: E,
    metadata:  ModelMetadata,
    fitted:    bool,
}

impl<E: Estimator> BaseModel<E> {
    /// Wrap `estimator` under `model_name`, unfitted, with default
    /// metadata. Use the `with_*` methods for the optional fields.
    pub fn new(estimator: E, model_name: impl Into<String>) -> Self {
        Self {
            estimator,
            metadata: ModelMetadata::new(model_name),
            fitted:   false,
        }
    }

    /// Build from a complete metadata record, applying its seed.
    pub fn from_metadata(estimator: E, metadata: ModelMetadata) -> Self {
        let seed  = metadata.random_state;
        let model = Self { estimator, metadata, fitted: false };
        match seed {
            Some(seed) => model.with_random_state(seed),
            None       => model,
        }
    }

    pub fn with_feature_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_feature_columns(columns);
        self
    }

    pub fn with_target_column(mut self, column: impl Into<String>) -> Self {
        self.set_target_column(column);
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.metadata.version = version.into();
        self
    }

    pub fn with_extra(mut self, extra: Map<String, Value>) -> Self {
        self.metadata.extra = extra;
        self
    }

    /// Record the seed and try to hand it to the estimator.
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.metadata.random_state = Some(seed);
        if let Err(e) = self.estimator.set_random_state(seed) {
            tracing::debug!(
                "Model '{}': random_state {} not applied: {}",
                self.metadata.model_name,
                seed,
                e
            );
        }
        self
    }

    // ─── Accessors ───────────────────────────────────────────────────────────

    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    /// Metadata flattened to a plain mapping
    pub fn info(&self) -> Map<String, Value> {
        self.metadata.info()
    }

    /// Replace the configured feature columns. An empty list clears them.
    /// A repeated name is kept once, at its first position.
    pub fn set_feature_columns<I, S>(&mut self, columns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for column in columns.into_iter().map(Into::into) {
            if !unique.contains(&column) {
                unique.push(column);
            }
        }
        self.metadata.feature_columns = (!unique.is_empty()).then_some(unique);
    }

    pub fn set_target_column(&mut self, column: impl Into<String>) {
        self.metadata.target_column = Some(column.into());
    }

    // ─── Feature selection ───────────────────────────────────────────────────

    /// Restrict a labeled input to the configured feature columns.
    fn select_features<'a>(&self, x: &'a Features) -> ModelResult<Cow<'a, Features>> {
        match (&self.metadata.feature_columns, x) {
            (Some(columns), Features::Labeled(table)) => {
                let sub = table.select(columns.as_slice()).map_err(|e| match e {
                    TableError::MissingColumns(missing) => ModelError::MissingFeatures(missing),
                    other => ModelError::Table(other),
                })?;
                Ok(Cow::Owned(Features::Labeled(sub)))
            }
            _ => Ok(Cow::Borrowed(x)),
        }
    }

    // ─── Core API ────────────────────────────────────────────────────────────

    pub fn fit(&mut self, x: &Features, y: Option<&[f64]>) -> ModelResult<&mut Self> {
        self.fit_with(x, y, &Params::new())
    }

    /// Fit, forwarding `params` to the estimator untouched.
    /// Returns `self` so calls can be chained.
    pub fn fit_with(&mut self, x: &Features, y: Option<&[f64]>, params: &Params) -> ModelResult<&mut Self> {
        let selected = self.select_features(x)?;
        self.estimator
            .fit(&selected, y, params)
            .map_err(ModelError::Estimator)?;
        self.fitted = true;

        tracing::debug!(
            "Model '{}' fitted on {} rows",
            self.metadata.model_name,
            selected.n_rows()
        );
        Ok(self)
    }

    pub fn predict(&self, x: &Features) -> ModelResult<Vec<f64>> {
        self.predict_with(x, &Params::new())
    }

    pub fn predict_with(&self, x: &Features, params: &Params) -> ModelResult<Vec<f64>> {
        if !self.fitted && !self.estimator.predicts_without_fit() {
            return Err(ModelError::NotFitted);
        }
        let selected = self.select_features(x)?;
        self.estimator
            .predict(&selected, params)
            .map_err(ModelError::Estimator)
    }

    pub fn evaluate_regression(&self, x: &Features, y_true: &[f64]) -> ModelResult<RegressionMetrics> {
        self.evaluate_regression_with(x, y_true, &Params::new())
    }

    /// Predict on `x` and score against `y_true` (mae, mse, rmse, r2).
    pub fn evaluate_regression_with(
        &self,
        x:      &Features,
        y_true: &[f64],
        params: &Params,
    ) -> ModelResult<RegressionMetrics> {
        let y_pred = self.predict_with(x, params)?;
        RegressionMetrics::compute(y_true, &y_pred)
    }
}

// ─── Persistence ──────────────────────────────────────────────────────────────
impl<E> BaseModel<E>
where
    E: Estimator + Serialize + DeserializeOwned,
{
    /// Persist {estimator, metadata, fitted} under `username`.
    /// Returns the path written.
    ///
    /// An estimator that would not load back (JSON writes NaN as null)
    /// is refused before anything touches the disk.
    pub fn save(&self, store: &ModelStore, username: &str, overwrite: bool) -> ModelResult<PathBuf> {
        let path = store.model_path(username, &self.metadata.model_name);
        serde_json::to_value(&self.estimator)
            .and_then(serde_json::from_value::<E>)
            .map_err(|e| ModelError::serialization(&path, e))?;

        let bundle = ModelBundle {
            estimator: &self.estimator,
            metadata:  self.info(),
            fitted:    self.fitted,
        };
        store.save(username, &self.metadata.model_name, &bundle, overwrite)
    }

    /// Rebuild a wrapper from a previous `save`.
    ///
    /// `created_at` is taken from the bundle when present, so it
    /// survives any number of save/load cycles.
    pub fn load(store: &ModelStore, username: &str, model_name: &str) -> ModelResult<Self> {
        let bundle: ModelBundle<E> = store.load(username, model_name)?;
        let metadata = ModelMetadata::from_info(&bundle.metadata, model_name);

        let mut model = Self::from_metadata(bundle.estimator, metadata);
        model.fitted  = bundle.fitted;
        Ok(model)
    }
}

impl<E> fmt::Display for BaseModel<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BaseModel(name={:?}, version={:?}, fitted={})",
            self.metadata.model_name, self.metadata.version, self.fitted
        )
    }
}

impl<E: fmt::Debug> fmt::Debug for BaseModel<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseModel")
            .field("estimator", &self.estimator)
            .field("metadata", &self.metadata)
            .field("fitted", &self.fitted)
            .finish()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::{Column, Table};
    use crate::ml::linear_regression::LinearRegression;
    use anyhow::{anyhow, Result};
    use ndarray::array;
    use serde_json::json;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Records what it was given and predicts the row index.
    #[derive(Debug, Default)]
    struct Recorder {
        seen_columns: Vec<Vec<String>>,
        seen_y:       Vec<Option<Vec<f64>>>,
        seen_params:  Vec<Params>,
        seed:         Option<u64>,
        pretrained:   bool,
        predict_cols: RefCell<Vec<Vec<String>>>,
    }

    impl Estimator for Recorder {
        fn fit(&mut self, x: &Features, y: Option<&[f64]>, params: &Params) -> Result<()> {
            self.seen_columns.push(x.as_table().map(|t| t.column_names().to_vec()).unwrap_or_default());
            self.seen_y.push(y.map(<[f64]>::to_vec));
            self.seen_params.push(params.clone());
            Ok(())
        }

        fn predict(&self, x: &Features, _params: &Params) -> Result<Vec<f64>> {
            self.predict_cols
                .borrow_mut()
                .push(x.as_table().map(|t| t.column_names().to_vec()).unwrap_or_default());
            Ok((0..x.n_rows()).map(|i| i as f64).collect())
        }

        fn predicts_without_fit(&self) -> bool {
            self.pretrained
        }

        fn set_random_state(&mut self, seed: u64) -> Result<()> {
            self.seed = Some(seed);
            Ok(())
        }
    }

    /// Fails every call with a recognisable message.
    #[derive(Debug)]
    struct Broken;

    impl Estimator for Broken {
        fn fit(&mut self, _: &Features, _: Option<&[f64]>, _: &Params) -> Result<()> {
            Err(anyhow!("estimator exploded"))
        }
        fn predict(&self, _: &Features, _: &Params) -> Result<Vec<f64>> {
            Err(anyhow!("estimator exploded"))
        }
    }

    fn abc() -> Features {
        Table::new()
            .with_column("a", Column::Numeric(vec![1.0, 2.0])).unwrap()
            .with_column("b", Column::Numeric(vec![3.0, 4.0])).unwrap()
            .with_column("c", Column::Numeric(vec![9.0, 9.0])).unwrap()
            .into()
    }

    #[test]
    fn test_fitted_state_transitions() {
        let mut m = BaseModel::new(Recorder::default(), "m");
        assert!(!m.is_fitted());
        m.fit(&abc(), Some(&[1.0, 2.0])).unwrap();
        assert!(m.is_fitted());
        m.fit(&abc(), None).unwrap();
        assert!(m.is_fitted());
    }

    #[test]
    fn test_selects_configured_columns_in_order() {
        let mut m = BaseModel::new(Recorder::default(), "m").with_feature_columns(["b", "a"]);
        m.fit(&abc(), Some(&[1.0, 2.0])).unwrap();
        m.predict(&abc()).unwrap();

        assert_eq!(m.estimator().seen_columns, vec![vec!["b".to_string(), "a".to_string()]]);
        assert_eq!(
            *m.estimator().predict_cols.borrow(),
            vec![vec!["b".to_string(), "a".to_string()]]
        );
    }

    #[test]
    fn test_no_feature_columns_passes_through() {
        let mut m = BaseModel::new(Recorder::default(), "m");
        m.fit(&abc(), None).unwrap();
        assert_eq!(m.estimator().seen_columns[0], ["a", "b", "c"].map(String::from).to_vec());
        assert_eq!(m.estimator().seen_y, vec![None]);
    }

    #[test]
    fn test_raw_input_ignores_feature_columns() {
        let mut m = BaseModel::new(Recorder::default(), "m").with_feature_columns(["zzz"]);
        let raw   = Features::Raw(array![[1.0, 2.0]]);
        m.fit(&raw, Some(&[0.0])).unwrap();
        assert_eq!(m.predict(&raw).unwrap(), vec![0.0]);
    }

    #[test]
    fn test_missing_feature_columns_named() {
        let mut m = BaseModel::new(Recorder::default(), "m").with_feature_columns(["a", "x", "b", "y"]);
        let err   = m.fit(&abc(), None).unwrap_err();
        match err {
            ModelError::MissingFeatures(missing) => assert_eq!(missing, vec!["x".to_string(), "y".to_string()]),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!m.is_fitted());
        assert!(m.estimator().seen_columns.is_empty());
    }

    #[test]
    fn test_predict_reports_missing_columns() {
        let mut m = BaseModel::new(Recorder::default(), "m").with_feature_columns(["a", "b"]);
        m.fit(&abc(), None).unwrap();

        let partial: Features = Table::new()
            .with_column("b", Column::Numeric(vec![1.0])).unwrap()
            .with_column("c", Column::Numeric(vec![2.0])).unwrap()
            .into();
        match m.predict(&partial).unwrap_err() {
            ModelError::MissingFeatures(missing) => assert_eq!(missing, vec!["a".to_string()]),
            other => panic!("unexpected error: {other}"),
        }
        assert!(m.estimator().predict_cols.borrow().is_empty());
    }

    #[test]
    fn test_repeated_feature_columns_kept_once() {
        let mut m = BaseModel::new(Recorder::default(), "m").with_feature_columns(["b", "a", "b"]);
        assert_eq!(m.metadata().feature_columns, Some(vec!["b".to_string(), "a".to_string()]));
        m.fit(&abc(), None).unwrap();
        assert_eq!(m.estimator().seen_columns[0], vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_predict_unfitted() {
        let m = BaseModel::new(Recorder::default(), "m");
        assert!(matches!(m.predict(&abc()), Err(ModelError::NotFitted)));

        let pretrained = BaseModel::new(Recorder { pretrained: true, ..Default::default() }, "m");
        assert_eq!(pretrained.predict(&abc()).unwrap(), vec![0.0, 1.0]);
    }

    #[test]
    fn test_params_forwarded_verbatim() {
        let mut params = Params::new();
        params.insert("sample_weight".into(), json!([1, 2]));
        let mut m = BaseModel::new(Recorder::default(), "m");
        m.fit_with(&abc(), None, &params).unwrap();
        assert_eq!(m.estimator().seen_params, vec![params]);
    }

    #[test]
    fn test_estimator_errors_pass_through_unchanged() {
        let mut m = BaseModel::new(Broken, "broken");
        let err   = m.fit(&abc(), None).unwrap_err();
        assert!(matches!(err, ModelError::Estimator(_)));
        assert_eq!(err.to_string(), "estimator exploded");
        assert!(!m.is_fitted());
    }

    #[test]
    fn test_seed_applied_or_swallowed() {
        let m = BaseModel::new(Recorder::default(), "m").with_random_state(11);
        assert_eq!(m.estimator().seed, Some(11));

        // LinearRegression has no seed; construction still succeeds
        let m = BaseModel::new(LinearRegression::new(), "lr").with_random_state(11);
        assert_eq!(m.metadata().random_state, Some(11));
    }

    #[test]
    fn test_setters_take_effect_next_call() {
        let mut m = BaseModel::new(Recorder::default(), "m").with_feature_columns(["a"]);
        m.fit(&abc(), None).unwrap();
        m.set_feature_columns(["c"]);
        m.set_target_column("y");
        m.fit(&abc(), None).unwrap();
        assert_eq!(m.estimator().seen_columns[1], vec!["c".to_string()]);
        assert_eq!(m.metadata().target_column.as_deref(), Some("y"));

        m.set_feature_columns(Vec::<String>::new());
        assert_eq!(m.metadata().feature_columns, None);
    }

    #[test]
    fn test_evaluate_regression_end_to_end() {
        let mut m = BaseModel::new(LinearRegression::new(), "progression")
            .with_feature_columns(["a"])
            .with_target_column("y");
        m.fit(&abc(), Some(&[1.0, 2.0])).unwrap();

        let pred = m.predict(&abc()).unwrap();
        assert_eq!(pred.len(), 2);

        let metrics = m.evaluate_regression(&abc(), &[1.0, 2.0]).unwrap();
        assert!(metrics.mae.is_finite() && metrics.mse.is_finite() && metrics.rmse.is_finite());
        assert!(metrics.r2 <= 1.0 + 1e-9);

        let constant = m.evaluate_regression(&abc(), &[5.0, 5.0]).unwrap();
        assert!(constant.r2.is_nan());
    }

    #[test]
    fn test_display() {
        let m = BaseModel::new(LinearRegression::new(), "progression").with_version("1.2.0");
        assert_eq!(m.to_string(), "BaseModel(name=\"progression\", version=\"1.2.0\", fitted=false)");
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir   = TempDir::new().unwrap();
        let store = ModelStore::new(dir.path());

        let mut extra = Map::new();
        extra.insert("goal".into(), json!("strength"));
        let mut m = BaseModel::new(LinearRegression::new(), "progression")
            .with_feature_columns(["a", "b"])
            .with_target_column("y")
            .with_version("0.2.0")
            .with_random_state(3)
            .with_extra(extra);
        m.fit(&abc(), Some(&[1.0, 2.0])).unwrap();

        let path = m.save(&store, "alice", true).unwrap();
        assert!(path.ends_with("alice/models/progression.json"));

        let loaded = BaseModel::<LinearRegression>::load(&store, "alice", "progression").unwrap();
        assert_eq!(loaded.info(), m.info());
        assert_eq!(loaded.metadata().created_at, m.metadata().created_at);
        assert!(loaded.is_fitted());
        assert_eq!(loaded.estimator(), m.estimator());
        assert_eq!(loaded.predict(&abc()).unwrap(), m.predict(&abc()).unwrap());
    }

    #[test]
    fn test_unfitted_roundtrip() {
        let dir   = TempDir::new().unwrap();
        let store = ModelStore::new(dir.path());
        let m     = BaseModel::new(LinearRegression::new(), "fresh");
        m.save(&store, "bob", true).unwrap();

        let loaded = BaseModel::<LinearRegression>::load(&store, "bob", "fresh").unwrap();
        assert!(!loaded.is_fitted());
        assert_eq!(loaded.info(), m.info());
    }

    #[test]
    fn test_save_without_overwrite_keeps_original() {
        let dir   = TempDir::new().unwrap();
        let store = ModelStore::new(dir.path());

        let mut m = BaseModel::new(LinearRegression::new(), "progression");
        let path  = m.save(&store, "alice", true).unwrap();
        let before = std::fs::read(&path).unwrap();

        m.fit(&abc(), Some(&[1.0, 2.0])).unwrap();
        let err = m.save(&store, "alice", false).unwrap_err();
        assert!(matches!(err, ModelError::AlreadyExists(ref p) if p == &path));
        assert_eq!(std::fs::read(&path).unwrap(), before);

        // overwrite=true replaces it
        m.save(&store, "alice", true).unwrap();
        assert_ne!(std::fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_missing_cells_fail_fit_and_nothing_is_saved() {
        let dir   = TempDir::new().unwrap();
        let store = ModelStore::new(dir.path());

        let workouts: Features = Table::new()
            .with_column("weight", Column::Numeric(vec![60.0, f64::NAN, 100.0])).unwrap()
            .with_column("reps", Column::Numeric(vec![5.0, 5.0, 3.0])).unwrap()
            .into();
        let mut m = BaseModel::new(LinearRegression::new(), "progression");
        let err   = m.fit(&workouts, Some(&[1.0, 2.0, 3.0])).unwrap_err();
        assert!(matches!(err, ModelError::Estimator(_)));
        assert!(!m.is_fitted());

        // An estimator holding NaN would be written as null and never load
        let broken = BaseModel::new(
            LinearRegression { intercept: f64::NAN, coefficients: Some(vec![1.0]) },
            "progression",
        );
        let err = broken.save(&store, "alice", true).unwrap_err();
        assert!(matches!(err, ModelError::Serialization { .. }));
        assert!(!store.exists("alice", "progression"));
    }

    #[test]
    fn test_load_missing() {
        let dir   = TempDir::new().unwrap();
        let store = ModelStore::new(dir.path());
        let err   = BaseModel::<LinearRegression>::load(&store, "nobody", "nothing").unwrap_err();
        assert!(matches!(err, ModelError::NotFound { ref username, .. } if username == "nobody"));
    }
}
