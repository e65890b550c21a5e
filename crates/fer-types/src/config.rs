//! Pipeline configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::emotion::Emotion;

/// Configuration shared across the pipeline.
///
/// Passed explicitly into each component at construction; nothing in
/// the pipeline reads ambient process-wide state, which keeps small
/// synthetic configurations usable in tests.
///
/// # Example
///
/// ```
/// use fer_types::PipelineConfig;
///
/// let config = PipelineConfig::default();
/// assert_eq!(config.frames_per_clip, 10);
/// assert_eq!(config.num_classes, 6);
/// assert!(config.is_valid());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Fixed number of frames per clip.
    pub frames_per_clip: usize,

    /// Number of emotion classes.
    pub num_classes: usize,

    /// Path of the cached fused-feature tensor.
    pub features_path: PathBuf,

    /// Path of the cached label tensor.
    pub labels_path: PathBuf,

    /// Path stem of the persisted classifier weights.
    pub weights_path: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            frames_per_clip: 10,
            num_classes: Emotion::COUNT,
            features_path: PathBuf::from("data/fused-features.bin"),
            labels_path: PathBuf::from("data/labels.bin"),
            weights_path: PathBuf::from("models/emotion-lstm"),
        }
    }
}

impl PipelineConfig {
    /// Creates a config with custom frame and class counts.
    #[must_use]
    pub fn new(frames_per_clip: usize, num_classes: usize) -> Self {
        Self {
            frames_per_clip,
            num_classes,
            ..Self::default()
        }
    }

    /// Sets the cached-features path.
    #[must_use]
    pub fn with_features_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.features_path = path.into();
        self
    }

    /// Sets the cached-labels path.
    #[must_use]
    pub fn with_labels_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.labels_path = path.into();
        self
    }

    /// Sets the weights path stem.
    #[must_use]
    pub fn with_weights_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.weights_path = path.into();
        self
    }

    /// Validates the configuration.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.frames_per_clip > 0 && self.num_classes > 1
    }
}
