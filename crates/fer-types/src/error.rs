//! Error types for fer-types crate.

use thiserror::Error;

/// Errors that can occur when constructing or combining tensors.
#[derive(Debug, Error)]
pub enum TypesError {
    /// Tensor shapes are misaligned.
    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Expected shape.
        expected: String,
        /// Actual shape.
        actual: String,
    },

    /// Tensor dimensions are invalid (zero-sized axis).
    #[error("invalid dimensions: {samples} samples x {frames} frames x {dim} features")]
    InvalidDimensions {
        /// Number of samples.
        samples: usize,
        /// Frames per sample.
        frames: usize,
        /// Features per frame.
        dim: usize,
    },

    /// Class index outside the label set.
    #[error("class index {index} out of range for {classes} classes")]
    InvalidClassIndex {
        /// Offending index.
        index: usize,
        /// Number of classes.
        classes: usize,
    },

    /// Flat buffer length does not match the declared shape.
    #[error("data length mismatch: expected {expected} values, got {actual}")]
    LengthMismatch {
        /// Expected number of values.
        expected: usize,
        /// Actual number of values.
        actual: usize,
    },
}

impl TypesError {
    /// Creates a shape mismatch error.
    #[must_use]
    pub fn shape_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Creates an invalid dimensions error.
    #[must_use]
    pub const fn invalid_dimensions(samples: usize, frames: usize, dim: usize) -> Self {
        Self::InvalidDimensions {
            samples,
            frames,
            dim,
        }
    }

    /// Creates an invalid class index error.
    #[must_use]
    pub const fn invalid_class_index(index: usize, classes: usize) -> Self {
        Self::InvalidClassIndex { index, classes }
    }

    /// Creates a length mismatch error.
    #[must_use]
    pub const fn length_mismatch(expected: usize, actual: usize) -> Self {
        Self::LengthMismatch { expected, actual }
    }
}

/// Result type for fer-types operations.
pub type Result<T> = std::result::Result<T, TypesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_shape_mismatch() {
        let err = TypesError::shape_mismatch("(3, 10, 4096)", "(2, 10, 4096)");
        assert!(err.to_string().contains("(3, 10, 4096)"));
        assert!(err.to_string().contains("(2, 10, 4096)"));
    }

    #[test]
    fn error_invalid_dimensions() {
        let err = TypesError::invalid_dimensions(0, 10, 128);
        assert!(err.to_string().contains("0 samples"));
    }

    #[test]
    fn error_invalid_class_index() {
        let err = TypesError::invalid_class_index(7, 6);
        assert!(err.to_string().contains('7'));
        assert!(err.to_string().contains('6'));
    }

    #[test]
    fn error_length_mismatch() {
        let err = TypesError::length_mismatch(120, 60);
        assert!(err.to_string().contains("120"));
        assert!(err.to_string().contains("60"));
    }
}
