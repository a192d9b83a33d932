// ============================================================
// Layer 5 - Regression Metrics
// ============================================================
// Scores a vector of predictions against the true values.
//
// Metrics:
//   - mae:  mean(|y - ŷ|)
//   - mse:  mean((y - ŷ)²)
//   - rmse: √mse
//   - r2:   1 - mse / var(y), population variance
//
// If the true values are constant, var(y) = 0 and r2 is NaN
// instead of a division by zero. An empty input gives NaN for
// every metric.
//
// Reference: Rust Book §13 (Iterators)


use crate::error::{ModelError, ModelResult};

/// Result of `BaseModel::evaluate_regression`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionMetrics {
    pub mae:  f64,
    pub mse:  f64,
    pub rmse: f64,
    pub r2:   f64,
}

impl RegressionMetrics {
    /// Compute all four metrics.
    /// Fails if the two slices have different lengths.
    pub fn compute(y_true: &[f64], y_pred: &[f64]) -> ModelResult<Self> {
        if y_true.len() != y_pred.len() {
            return Err(ModelError::LengthMismatch {
                expected: y_true.len(),
                found:    y_pred.len(),
            });
        }

        let n   = y_true.len() as f64;
        let mae = y_true.iter().zip(y_pred).map(|(t, p)| (t - p).abs()).sum::<f64>() / n;
        let mse = y_true.iter().zip(y_pred).map(|(t, p)| (t - p).powi(2)).sum::<f64>() / n;

        let mean = y_true.iter().sum::<f64>() / n;
        let var  = y_true.iter().map(|t| (t - mean).powi(2)).sum::<f64>() / n;
        let r2   = if var > 0.0 { 1.0 - mse / var } else { f64::NAN };

        Ok(Self { mae, mse, rmse: mse.sqrt(), r2 })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_perfect_predictions() {
        let m = RegressionMetrics::compute(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(m.mae, 0.0);
        assert_eq!(m.mse, 0.0);
        assert_eq!(m.rmse, 0.0);
        assert_eq!(m.r2, 1.0);
    }

    #[test]
    fn test_constant_truth_gives_nan_r2() {
        let m = RegressionMetrics::compute(&[5.0, 5.0, 5.0], &[4.0, 5.0, 7.0]).unwrap();
        assert!(m.r2.is_nan());
        assert_relative_eq!(m.mae, 1.0);
        assert_relative_eq!(m.mse, 5.0 / 3.0);
    }

    #[test]
    fn test_known_values() {
        // errors: 0.5, -0.5, 1.0 → mae 2/3, mse 0.5; var([1,2,3]) = 2/3
        let m = RegressionMetrics::compute(&[1.0, 2.0, 3.0], &[0.5, 2.5, 2.0]).unwrap();
        assert_relative_eq!(m.mae, 2.0 / 3.0);
        assert_relative_eq!(m.mse, 0.5);
        assert_relative_eq!(m.rmse, 0.5_f64.sqrt());
        assert_relative_eq!(m.r2, 1.0 - 0.5 / (2.0 / 3.0));
    }

    #[test]
    fn test_length_mismatch() {
        let err = RegressionMetrics::compute(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert!(matches!(err, ModelError::LengthMismatch { expected: 2, found: 1 }));
    }

    #[test]
    fn test_empty_is_nan() {
        let m = RegressionMetrics::compute(&[], &[]).unwrap();
        assert!(m.mae.is_nan() && m.mse.is_nan() && m.rmse.is_nan() && m.r2.is_nan());
    }
}
