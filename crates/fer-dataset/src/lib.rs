//! Dataset pairing and fold partitioning for emotion recognition.
//!
//! # Dataset
//!
//! - [`Dataset`] - Fused features and one-hot labels, index-aligned and
//!   never reordered independently after creation
//!
//! # Partitioning
//!
//! - [`FoldPartition`] - Deterministic stratified K-fold assignment,
//!   reproducible bit-for-bit between the training run and a later
//!   evaluation run
//!
//! # Example
//!
//! ```
//! use fer_dataset::{Dataset, FoldPartition};
//! use fer_types::{FeatureTensor, LabelTensor};
//!
//! let features = FeatureTensor::zeros(6, 10, 8);
//! let labels = LabelTensor::from_classes(&[0, 0, 0, 1, 1, 1], 2).unwrap();
//! let dataset = Dataset::new(features, labels).unwrap();
//!
//! let partition = FoldPartition::stratified(&dataset.class_indices(), 3).unwrap();
//! assert_eq!(partition.num_folds(), 3);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod dataset;
mod error;
mod folds;

// Re-export dataset types
pub use dataset::Dataset;

// Re-export partitioning
pub use folds::{Fold, FoldPartition};

// Re-export error types
pub use error::{DatasetError, Result};

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{Dataset, DatasetError, Fold, FoldPartition};
}
