//! Personalized workout progression toolkit.
//!
//! Baseline workout datasets are preprocessed and summarised by the
//! `data` and `application` layers; models go through
//! [`ml::base_model::BaseModel`], which wraps any [`domain::traits::Estimator`]
//! with feature-column enforcement, regression evaluation, and per-user
//! persistence via [`infra::model_store::ModelStore`].

pub mod application;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod infra;
pub mod ml;

pub use domain::table::{Column, Features, Table};
pub use domain::traits::{Estimator, Params};
pub use error::{ModelError, ModelResult, TableError};
pub use infra::model_store::ModelStore;
pub use ml::{base_model::BaseModel, metadata::ModelMetadata, metrics::RegressionMetrics};
