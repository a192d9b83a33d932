// ============================================================
// Layer 5 - Stochastic Gradient Descent Estimator
// ============================================================
// Linear model trained one sample at a time on squared loss:
//
//   for each epoch:
//     shuffle row order        (seeded when random_state is set)
//     for each row i:
//       err = (w·xᵢ + b) - yᵢ
//       w  -= lr * err * xᵢ
//       b  -= lr * err
//
// The shuffle is the only source of randomness, so two fits with
// the same random_state on the same data give identical weights.
//
// Fit-time params (forwarded keyword arguments):
//   "epochs"        → overrides `epochs` for this call
//   "learning_rate" → overrides `learning_rate` for this call
// Any other key is rejected.
//
// Reference: rand crate documentation (SeedableRng, SliceRandom)

use anyhow::{bail, Context, Result};
use ndarray::{Array1, Axis};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::domain::table::Features;
use crate::domain::traits::{Estimator, Params};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SgdRegressor {
    pub epochs:        usize,
    pub learning_rate: f64,
    pub random_state:  Option<u64>,
    pub weights:       Option<Vec<f64>>,
    pub bias:          f64,
}

impl Default for SgdRegressor {
    fn default() -> Self {
        Self {
            epochs:        200,
            learning_rate: 0.01,
            random_state:  None,
            weights:       None,
            bias:          0.0,
        }
    }
}

impl SgdRegressor {
    pub fn new(epochs: usize, learning_rate: f64) -> Self {
        Self { epochs, learning_rate, ..Self::default() }
    }

    /// Per-call hyper-parameters after applying `params` overrides.
    fn resolve(&self, params: &Params) -> Result<(usize, f64)> {
        let mut epochs = self.epochs;
        let mut lr     = self.learning_rate;

        for (key, value) in params {
            match key.as_str() {
                "epochs" => {
                    epochs = value
                        .as_u64()
                        .with_context(|| format!("'epochs' must be a non-negative integer, got {value}"))?
                        as usize;
                }
                "learning_rate" => {
                    lr = value
                        .as_f64()
                        .with_context(|| format!("'learning_rate' must be a number, got {value}"))?;
                }
                other => bail!("SgdRegressor.fit() got an unexpected keyword argument '{other}'"),
            }
        }
        Ok((epochs, lr))
    }
}

impl Estimator for SgdRegressor {
    fn fit(&mut self, x: &Features, y: Option<&[f64]>, params: &Params) -> Result<()> {
        let Some(y) = y else {
            bail!("SgdRegressor is supervised and requires y");
        };
        let (epochs, lr) = self.resolve(params)?;
        let x = x.to_matrix().context("SgdRegressor needs numeric features")?;
        if x.nrows() != y.len() {
            bail!("X has {} rows but y has {} values", x.nrows(), y.len());
        }

        let mut rng = match self.random_state {
            Some(seed) => StdRng::seed_from_u64(seed),
            None       => StdRng::from_entropy(),
        };

        let mut w     = Array1::<f64>::zeros(x.ncols());
        let mut b     = 0.0;
        let mut order: Vec<usize> = (0..x.nrows()).collect();

        for _ in 0..epochs {
            order.shuffle(&mut rng);
            for &i in &order {
                let row = x.index_axis(Axis(0), i);
                let err = row.dot(&w) + b - y[i];
                w.scaled_add(-lr * err, &row);
                b -= lr * err;
            }
        }

        if !b.is_finite() || w.iter().any(|v| !v.is_finite()) {
            bail!("SgdRegressor diverged; lower learning_rate or scale the features");
        }

        tracing::debug!("SgdRegressor fitted: {} epochs, lr={}", epochs, lr);
        self.weights = Some(w.to_vec());
        self.bias    = b;
        Ok(())
    }

    fn predict(&self, x: &Features, _params: &Params) -> Result<Vec<f64>> {
        let Some(weights) = &self.weights else {
            bail!("SgdRegressor has no weights; call fit first");
        };
        let x = x.to_matrix().context("SgdRegressor needs numeric features")?;
        if x.ncols() != weights.len() {
            bail!(
                "X has {} features but the model was fitted on {}",
                x.ncols(),
                weights.len()
            );
        }
        let w = Array1::from(weights.clone());
        Ok(x.dot(&w).mapv(|v| v + self.bias).to_vec())
    }

    fn set_random_state(&mut self, seed: u64) -> Result<()> {
        self.random_state = Some(seed);
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use serde_json::json;

    fn line() -> (Features, Vec<f64>) {
        // y = 0.5 + 1.5x
        let x = array![[0.0], [0.5], [1.0], [1.5], [2.0]];
        let y = x.column(0).iter().map(|v| 0.5 + 1.5 * v).collect();
        (Features::Raw(x), y)
    }

    #[test]
    fn test_converges_on_line() {
        let (x, y) = line();
        let mut sgd = SgdRegressor::new(2000, 0.05);
        sgd.set_random_state(1).unwrap();
        sgd.fit(&x, Some(&y), &Params::new()).unwrap();

        assert_relative_eq!(sgd.bias, 0.5, epsilon = 1e-3);
        assert_relative_eq!(sgd.weights.as_ref().unwrap()[0], 1.5, epsilon = 1e-3);
    }

    #[test]
    fn test_same_seed_same_weights() {
        let (x, y) = line();
        let fit = |seed| {
            let mut sgd = SgdRegressor::new(5, 0.05);
            sgd.set_random_state(seed).unwrap();
            sgd.fit(&x, Some(&y), &Params::new()).unwrap();
            (sgd.weights.unwrap(), sgd.bias)
        };
        assert_eq!(fit(42), fit(42));
    }

    #[test]
    fn test_params_override_and_reject_unknown() {
        let (x, y) = line();
        let mut sgd = SgdRegressor::default();

        let mut params = Params::new();
        params.insert("epochs".into(), json!(0));
        sgd.fit(&x, Some(&y), &params).unwrap();
        // zero epochs leaves the zero initialisation untouched
        assert_eq!(sgd.weights, Some(vec![0.0]));

        params.insert("momentum".into(), json!(0.9));
        let err = sgd.fit(&x, Some(&y), &params).unwrap_err();
        assert!(err.to_string().contains("momentum"));
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let (x, _) = line();
        assert!(SgdRegressor::default().predict(&x, &Params::new()).is_err());
    }
}
