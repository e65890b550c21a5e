//! Core types for facial emotion recognition pipelines.
//!
//! This crate provides the shared vocabulary of the pipeline:
//!
//! # Label Types
//!
//! - [`Emotion`] - The closed set of emotion classes
//! - [`LabelTensor`] - One-hot encoded labels, index-aligned with features
//!
//! # Feature Types
//!
//! - [`FeatureTensor`] - Per-frame feature vectors, shape `(N, F, D)`
//!
//! # Boundary Types
//!
//! - [`Clip`] / [`Frame`] - Raw video clips at the extraction boundary
//!
//! # Configuration
//!
//! - [`PipelineConfig`] - Explicit configuration passed into components
//!   at construction (no ambient process-wide state)
//!
//! # Example
//!
//! ```
//! use fer_types::{Emotion, FeatureTensor, LabelTensor};
//!
//! // 3 samples, 10 frames per clip, 8 features per frame
//! let features = FeatureTensor::zeros(3, 10, 8);
//! let labels = LabelTensor::from_classes(&[0, 2, 1], Emotion::COUNT).unwrap();
//!
//! assert_eq!(features.dims(), (3, 10, 8));
//! assert_eq!(labels.class_indices(), vec![0, 2, 1]);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod clip;
mod config;
mod emotion;
mod error;
mod tensor;

// Re-export label types
pub use emotion::Emotion;
pub use tensor::{FeatureTensor, LabelTensor};

// Re-export boundary types
pub use clip::{Clip, Frame};

// Re-export configuration
pub use config::PipelineConfig;

// Re-export error types
pub use error::{Result, TypesError};

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        Clip, Emotion, FeatureTensor, Frame, LabelTensor, PipelineConfig, TypesError,
    };
}
