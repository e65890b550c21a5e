//! Feature extraction boundary, fusion, and cached feature store.
//!
//! The convolutional and keypoint extractors themselves are external
//! collaborators; this crate owns everything at their boundary:
//!
//! # Extraction Boundary
//!
//! - [`FeatureExtractor`] - Capability trait: `clips -> (N, F, D)` tensor.
//!   Downstream components depend only on this trait, never on which
//!   concrete extractor produced a tensor.
//!
//! # Fusion
//!
//! - [`fuse`] - Concatenates two per-frame feature tensors along the
//!   feature axis.
//!
//! # Caching
//!
//! - [`FeatureStore`] - Disk memoization of extracted tensors; presence
//!   of the file signals "skip extraction", and a missing artifact
//!   falls back to recomputation via [`FeatureStore::load_or_extract`].
//!
//! # Example
//!
//! ```
//! use fer_features::fuse;
//! use fer_types::FeatureTensor;
//!
//! let appearance = FeatureTensor::zeros(3, 10, 6);
//! let keypoint = FeatureTensor::zeros(3, 10, 4);
//!
//! let fused = fuse(&appearance, &keypoint).unwrap();
//! assert_eq!(fused.dims(), (3, 10, 10));
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod extractor;
mod fusion;
mod store;

// Re-export the extraction boundary
pub use extractor::FeatureExtractor;

// Re-export fusion
pub use fusion::fuse;

// Re-export the cached stores
pub use store::{FeatureStore, LabelStore};

// Re-export error types
pub use error::{FeatureError, Result};

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{FeatureError, FeatureExtractor, FeatureStore, LabelStore, fuse};
}
