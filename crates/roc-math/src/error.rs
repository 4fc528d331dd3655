//! Error type for the ROC engine.

use thiserror::Error;

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, RocError>;

/// Precondition failures raised by the engine.
///
/// Every variant is raised before any curve point is produced; the engine
/// never returns a partial result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RocError {
    /// Score and label counts disagree (vector length or matrix row count).
    #[error("dimension mismatch: {scores} scores but {labels} labels")]
    DimensionMismatch { scores: usize, labels: usize },

    /// All labels belong to one class, so TPR or FPR has a zero denominator.
    #[error("degenerate label set: {positives} positives and {negatives} negatives (need at least one of each)")]
    DegenerateLabelSet { positives: usize, negatives: usize },

    /// A score cannot be ordered.
    #[error("score at index {index} is NaN")]
    InvalidScore { index: usize },

    /// The partial-AUC cutoff cannot be compared.
    #[error("x_threshold is NaN")]
    InvalidThreshold,

    /// A column of a batch computation failed.
    #[error("column {column}: {source}")]
    ColumnFailed {
        column: usize,
        #[source]
        source: Box<RocError>,
    },
}

impl RocError {
    /// Strip `ColumnFailed` wrappers and return the underlying failure.
    pub fn root(&self) -> &RocError {
        match self {
            RocError::ColumnFailed { source, .. } => source.root(),
            other => other,
        }
    }
}
