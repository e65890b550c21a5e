//! Error types for fer-training crate.

use thiserror::Error;

/// Errors that can occur in fer-training operations.
#[derive(Debug, Error)]
pub enum TrainError {
    /// Invalid training configuration.
    #[error("invalid training configuration: {0}")]
    InvalidConfig(String),

    /// Loss became non-finite during a fold's fit.
    #[error("training diverged on fold {fold} at epoch {epoch}: loss is not finite")]
    FitDivergence {
        /// Fold index whose fit diverged.
        fold: usize,
        /// Epoch at which the loss became non-finite.
        epoch: usize,
    },

    /// Dataset or partitioning error.
    #[error(transparent)]
    Dataset(#[from] fer_dataset::DatasetError),

    /// Model or checkpoint error.
    #[error(transparent)]
    Model(#[from] fer_models::ModelError),

    /// Tensor shape or validation error.
    #[error(transparent)]
    Types(#[from] fer_types::TypesError),

    /// Failed to move tensor data back to the host.
    #[error("tensor readback failed: {0}")]
    Tensor(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl TrainError {
    /// Creates an invalid config error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }

    /// Creates a fit divergence error.
    #[must_use]
    pub const fn fit_divergence(fold: usize, epoch: usize) -> Self {
        Self::FitDivergence { fold, epoch }
    }

    /// Creates a tensor readback error.
    #[must_use]
    pub fn tensor(reason: impl Into<String>) -> Self {
        Self::Tensor(reason.into())
    }

    /// Creates an IO error.
    #[must_use]
    pub fn io(reason: impl Into<String>) -> Self {
        Self::Io(reason.into())
    }
}

impl From<std::io::Error> for TrainError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TrainError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for fer-training operations.
pub type Result<T> = std::result::Result<T, TrainError>;
