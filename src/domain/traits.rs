// ============================================================
// Layer 3 - Core Traits (Abstractions)
// ============================================================
// The model wrapper is generic over anything implementing
// `Estimator`; the use cases are generic over anything
// implementing `DatasetSource`. Concrete types live in other
// layers:
//   - LinearRegression, SgdRegressor  → implement Estimator (Layer 5)
//   - CsvLoader                       → implements DatasetSource (Layer 4)
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use std::collections::BTreeMap;

use crate::domain::table::{Features, Table};

/// Open set of keyword arguments forwarded verbatim to an estimator.
pub type Params = BTreeMap<String, serde_json::Value>;

// ─── Estimator ────────────────────────────────────────────────────────────────
/// A statistical model with fit and predict capabilities.
///
/// Errors returned from `fit` / `predict` reach the caller of the
/// wrapper unchanged.
pub trait Estimator {
    /// Train on `x`. `y` is `None` for unsupervised estimators.
    fn fit(&mut self, x: &Features, y: Option<&[f64]>, params: &Params) -> Result<()>;

    /// One numeric prediction per row of `x`.
    fn predict(&self, x: &Features, params: &Params) -> Result<Vec<f64>>;

    /// True when the estimator can predict before `fit` has been
    /// called on the wrapper (e.g. weights loaded from elsewhere).
    fn predicts_without_fit(&self) -> bool {
        false
    }

    /// Configure the random seed. Estimators without randomness keep
    /// the default, which reports the capability as unsupported.
    fn set_random_state(&mut self, _seed: u64) -> Result<()> {
        anyhow::bail!("estimator does not support random_state")
    }
}

// ─── DatasetSource ────────────────────────────────────────────────────────────
/// Any component that can produce a labeled table.
///
/// Implementations:
///   - CsvLoader → reads one CSV file
pub trait DatasetSource {
    fn load(&self) -> Result<Table>;
}
