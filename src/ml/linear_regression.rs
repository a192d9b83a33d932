// ============================================================
// Layer 5 - Ordinary Least Squares Estimator
// ============================================================
// Closed-form linear regression with an intercept:
//
//   X̃ = [1 | X]            (prepend a column of ones)
//   β = (X̃ᵀX̃)⁻¹ X̃ᵀy       (normal equations)
//
// The (p+1)×(p+1) system is solved with Gauss-Jordan elimination
// and partial pivoting. Collinear columns get a zero weight
// instead of failing the fit.
//
// Deterministic: there is no seed to apply, so the default
// `set_random_state` (unsupported) is kept.

use anyhow::{bail, Context, Result};
use ndarray::{s, Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::domain::table::Features;
use crate::domain::traits::{Estimator, Params};

/// Pivots smaller than this (relative to the largest entry) count as zero
const PIVOT_EPS: f64 = 1e-10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    pub intercept:    f64,
    /// One weight per feature column; `None` until fitted
    pub coefficients: Option<Vec<f64>>,
}

impl LinearRegression {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Prepend a column of ones to `x`.
pub(crate) fn with_intercept(x: &Array2<f64>) -> Array2<f64> {
    let mut design = Array2::<f64>::ones((x.nrows(), x.ncols() + 1));
    design.slice_mut(s![.., 1..]).assign(x);
    design
}

/// Solve the normal equations `a · β = b` for square `a`.
///
/// Columns without a usable pivot (collinear with earlier ones) are
/// free variables and get a weight of zero, so rank-deficient inputs
/// still yield a least-squares solution.
fn solve(mut a: Array2<f64>, mut b: Array1<f64>) -> Array1<f64> {
    let n     = a.nrows();
    let scale = a.iter().fold(1.0_f64, |m, v| m.max(v.abs()));
    let mut pivots: Vec<(usize, usize)> = Vec::with_capacity(n);
    let mut row = 0;

    for col in 0..n {
        if row == n {
            break;
        }
        // Partial pivoting: bring the largest remaining entry up
        let pivot = (row..n)
            .max_by(|&i, &j| a[[i, col]].abs().total_cmp(&a[[j, col]].abs()))
            .unwrap_or(row);
        if a[[pivot, col]].abs() < PIVOT_EPS * scale {
            continue;
        }
        if pivot != row {
            for k in 0..n {
                a.swap([row, k], [pivot, k]);
            }
            b.swap(row, pivot);
        }

        let diag = a[[row, col]];
        for k in 0..n {
            a[[row, k]] /= diag;
        }
        b[row] /= diag;

        for other in 0..n {
            if other == row {
                continue;
            }
            let factor = a[[other, col]];
            if factor == 0.0 {
                continue;
            }
            for k in 0..n {
                a[[other, k]] -= factor * a[[row, k]];
            }
            b[other] -= factor * b[row];
        }

        pivots.push((row, col));
        row += 1;
    }

    let mut beta = Array1::<f64>::zeros(n);
    for (r, c) in pivots {
        beta[c] = b[r];
    }
    beta
}

impl Estimator for LinearRegression {
    fn fit(&mut self, x: &Features, y: Option<&[f64]>, _params: &Params) -> Result<()> {
        let Some(y) = y else {
            bail!("LinearRegression is supervised and requires y");
        };
        let x = x.to_matrix().context("LinearRegression needs numeric features")?;
        if x.nrows() != y.len() {
            bail!("X has {} rows but y has {} values", x.nrows(), y.len());
        }
        if x.iter().chain(y).any(|v| !v.is_finite()) {
            bail!("LinearRegression cannot fit on NaN or infinite values; drop or impute missing cells first");
        }

        let design = with_intercept(&x);
        let xtx    = design.t().dot(&design);
        let xty    = design.t().dot(&Array1::from(y.to_vec()));
        let beta   = solve(xtx, xty);
        if beta.iter().any(|v| !v.is_finite()) {
            bail!("LinearRegression produced non-finite coefficients");
        }

        self.intercept    = beta[0];
        self.coefficients = Some(beta.slice(s![1..]).to_vec());
        tracing::debug!(
            "LinearRegression fitted on {} rows, {} features",
            x.nrows(),
            x.ncols()
        );
        Ok(())
    }

    fn predict(&self, x: &Features, _params: &Params) -> Result<Vec<f64>> {
        let Some(coefficients) = &self.coefficients else {
            bail!("LinearRegression has no coefficients; call fit first");
        };
        let x = x.to_matrix().context("LinearRegression needs numeric features")?;
        if x.ncols() != coefficients.len() {
            bail!(
                "X has {} features but the model was fitted on {}",
                x.ncols(),
                coefficients.len()
            );
        }

        let w = Array1::from(coefficients.clone());
        Ok(x.dot(&w).mapv(|v| v + self.intercept).to_vec())
    }

    /// A model built with known coefficients can predict right away
    fn predicts_without_fit(&self) -> bool {
        self.coefficients.is_some()
    }
}
