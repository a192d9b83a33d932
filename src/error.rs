// ============================================================
// Error Types
// ============================================================
// Typed errors for the library layers. The CLI and use-case
// layers wrap these with anyhow::Context like the rest of the
// application code does.
//
// Estimator failures are carried through `ModelError::Estimator`
// transparently: the message and source chain are exactly what
// the estimator produced.

use std::path::PathBuf;
use thiserror::Error;

/// Shape problems when building or slicing a `Table`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("Missing required feature columns: {0:?}")]
    MissingColumns(Vec<String>),

    #[error("Column '{0}' already exists")]
    DuplicateColumn(String),

    #[error("Column '{column}' has {found} rows, table has {expected}")]
    RowCountMismatch {
        column:   String,
        expected: usize,
        found:    usize,
    },

    #[error("Column '{0}' is not numeric")]
    NotNumeric(String),

    #[error("Column '{0}' has conflicting kinds across tables")]
    KindMismatch(String),
}

/// Everything the model wrapper and its persistence can fail with.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Configured feature columns absent from a labeled input
    #[error("Missing required feature columns: {0:?}")]
    MissingFeatures(Vec<String>),

    /// Predict on an unfitted estimator that cannot predict on its own
    #[error("Estimator is not fitted and does not support predict()")]
    NotFitted,

    #[error("Model already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("No saved model for user '{username}': {}", .path.display())]
    NotFound { username: String, path: PathBuf },

    #[error("Length mismatch: {expected} true values but {found} predictions")]
    LengthMismatch { expected: usize, found: usize },

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Bundle serialization failed for '{}': {source}", .path.display())]
    Serialization {
        path:   PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Raised by the wrapped estimator itself, passed through unchanged
    #[error(transparent)]
    Estimator(anyhow::Error),
}

impl ModelError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ModelError::Io { path: path.into(), source }
    }

    pub(crate) fn serialization(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        ModelError::Serialization { path: path.into(), source }
    }
}

pub type ModelResult<T> = Result<T, ModelError>;
