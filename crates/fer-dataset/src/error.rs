//! Error types for fer-dataset crate.

use thiserror::Error;

/// Errors that can occur in fer-dataset operations.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Fold count unusable for the label distribution.
    #[error("invalid fold count {folds}: {reason}")]
    InvalidFoldCount {
        /// Requested number of folds.
        folds: usize,
        /// Why it cannot be used.
        reason: String,
    },

    /// Features and labels disagree on the sample count.
    #[error("misaligned dataset: {features} feature samples vs {labels} label samples")]
    Misaligned {
        /// Feature sample count.
        features: usize,
        /// Label sample count.
        labels: usize,
    },

    /// Dataset has no samples.
    #[error("dataset is empty")]
    EmptyDataset,

    /// Fold index outside the partition.
    #[error("fold index {index} out of range for {folds} folds")]
    FoldOutOfRange {
        /// Requested fold.
        index: usize,
        /// Number of folds in the partition.
        folds: usize,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl DatasetError {
    /// Creates an invalid fold count error.
    #[must_use]
    pub fn invalid_fold_count(folds: usize, reason: impl Into<String>) -> Self {
        Self::InvalidFoldCount {
            folds,
            reason: reason.into(),
        }
    }

    /// Creates a misaligned dataset error.
    #[must_use]
    pub const fn misaligned(features: usize, labels: usize) -> Self {
        Self::Misaligned { features, labels }
    }

    /// Creates a fold out of range error.
    #[must_use]
    pub const fn fold_out_of_range(index: usize, folds: usize) -> Self {
        Self::FoldOutOfRange { index, folds }
    }

    /// Creates an IO error.
    #[must_use]
    pub fn io(reason: impl Into<String>) -> Self {
        Self::Io(reason.into())
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(reason: impl Into<String>) -> Self {
        Self::Serialization(reason.into())
    }
}

impl From<std::io::Error> for DatasetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DatasetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for fer-dataset operations.
pub type Result<T> = std::result::Result<T, DatasetError>;
