//! Error types for fer-models crate.

use thiserror::Error;

/// Errors that can occur in fer-models operations.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Failed to save checkpoint.
    #[error("failed to save checkpoint to {path}: {reason}")]
    SaveCheckpoint {
        /// Path to the checkpoint file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Checkpoint file not found.
    #[error("checkpoint not found: {0}")]
    CheckpointNotFound(String),

    /// Saved weights do not fit the configured classifier.
    #[error("checkpoint {path} does not match the classifier configuration: {reason}")]
    LoadMismatch {
        /// Path to the checkpoint file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Invalid model configuration.
    #[error("invalid model configuration: {0}")]
    InvalidConfig(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(String),
}

impl ModelError {
    /// Creates a save checkpoint error.
    #[must_use]
    pub fn save_checkpoint(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SaveCheckpoint {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a checkpoint not found error.
    #[must_use]
    pub fn checkpoint_not_found(path: impl Into<String>) -> Self {
        Self::CheckpointNotFound(path.into())
    }

    /// Creates a load mismatch error.
    #[must_use]
    pub fn load_mismatch(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LoadMismatch {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid config error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }

    /// Creates an IO error.
    #[must_use]
    pub fn io(reason: impl Into<String>) -> Self {
        Self::Io(reason.into())
    }
}

impl From<std::io::Error> for ModelError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type for fer-models operations.
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_save_checkpoint() {
        let err = ModelError::save_checkpoint("models/best.bin", "disk full");
        assert!(err.to_string().contains("models/best.bin"));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn error_checkpoint_not_found() {
        let err = ModelError::checkpoint_not_found("/missing/best.bin");
        assert!(err.to_string().contains("/missing/best.bin"));
    }

    #[test]
    fn error_load_mismatch() {
        let err = ModelError::load_mismatch("best.bin", "lstm weight shape differs");
        assert!(err.to_string().contains("best.bin"));
        assert!(err.to_string().contains("lstm weight shape differs"));
    }

    #[test]
    fn error_invalid_config() {
        let err = ModelError::invalid_config("input_dim must be > 0");
        assert!(err.to_string().contains("input_dim must be > 0"));
    }

    #[test]
    fn error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
        let err: ModelError = io_err.into();
        assert!(matches!(err, ModelError::Io(_)));
    }
}
