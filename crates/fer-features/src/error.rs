//! Error types for fer-features crate.

use thiserror::Error;

/// Errors that can occur at the feature boundary.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// Tensors to fuse are misaligned in samples or frames.
    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Expected shape.
        expected: String,
        /// Actual shape.
        actual: String,
    },

    /// Extraction failed inside a concrete extractor.
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// Expected cached artifact is absent.
    #[error("missing artifact: {0}")]
    MissingArtifact(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl FeatureError {
    /// Creates a shape mismatch error.
    #[must_use]
    pub fn shape_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Creates an extraction error.
    #[must_use]
    pub fn extraction(reason: impl Into<String>) -> Self {
        Self::Extraction(reason.into())
    }

    /// Creates a missing artifact error.
    #[must_use]
    pub fn missing_artifact(path: impl Into<String>) -> Self {
        Self::MissingArtifact(path.into())
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

impl From<std::io::Error> for FeatureError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<fer_types::TypesError> for FeatureError {
    fn from(err: fer_types::TypesError) -> Self {
        Self::ShapeMismatch {
            expected: "aligned tensors".to_string(),
            actual: err.to_string(),
        }
    }
}

/// Result type for fer-features operations.
pub type Result<T> = std::result::Result<T, FeatureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_shape_mismatch() {
        let err = FeatureError::shape_mismatch("(3, 10, _)", "(2, 10, _)");
        assert!(err.to_string().contains("(3, 10, _)"));
    }

    #[test]
    fn error_extraction() {
        let err = FeatureError::extraction("descriptor window out of bounds");
        assert!(err.to_string().contains("extraction failed"));
    }

    #[test]
    fn error_missing_artifact() {
        let err = FeatureError::missing_artifact("data/fused-features.bin");
        assert!(err.to_string().contains("missing artifact"));
        assert!(err.to_string().contains("fused-features.bin"));
    }

    #[test]
    fn error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: FeatureError = io_err.into();
        assert!(matches!(err, FeatureError::Io(_)));
    }
}
