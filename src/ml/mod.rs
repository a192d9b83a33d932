// ============================================================
// Layer 5 - ML / Model Layer
// ============================================================
// Everything about models: the generic wrapper every model in
// the system goes through, its metadata, how it is scored, and
// the estimators that ship with the crate.
//
//   base_model.rs        - BaseModel<E: Estimator>
//                          feature-column enforcement, fitted
//                          state, regression evaluation, per-user
//                          save/load
//
//   metadata.rs          - ModelMetadata and its flat mapping
//
//   metrics.rs           - mae / mse / rmse / r2
//
//   linear_regression.rs - closed-form least squares
//
//   sgd_regressor.rs     - seeded stochastic gradient descent
//
// Reference: Rust Book §10 (Generics and Traits)

/// Generic estimator wrapper
pub mod base_model;

/// Model identity and shape
pub mod metadata;

/// Regression scoring
pub mod metrics;

/// Ordinary least squares estimator
pub mod linear_regression;

/// Stochastic gradient descent estimator
pub mod sgd_regressor;
