//! Burn model architecture and checkpoint persistence for emotion
//! recognition.
//!
//! # Model
//!
//! - [`EmotionClassifier`] - LSTM over per-frame fused features, last
//!   hidden state through two dense layers to class logits
//!
//! # Checkpoint Persistence
//!
//! Weights are saved with Burn's binary recorder behind an atomic
//! rename, so the single best-model checkpoint is either the previous
//! complete file or the new complete file, never a torn write:
//! - [`save_checkpoint`] / [`load_checkpoint`]
//!
//! # Backend Support
//!
//! The model is generic over Burn backends; [`CpuBackend`] and
//! [`TrainBackend`] are the ndarray-based defaults used by the
//! training pipeline and tests.

// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod backend;
mod checkpoint;
mod classifier;
mod error;

// Re-export model types
pub use classifier::{EmotionClassifier, EmotionClassifierConfig};

// Re-export checkpoint utilities
pub use checkpoint::{checkpoint_path, load_checkpoint, save_checkpoint};

// Re-export backend aliases
pub use backend::{default_device, seed_backend, CpuBackend, TrainBackend};

// Re-export error types
pub use error::{ModelError, Result};

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        checkpoint_path, load_checkpoint, save_checkpoint, CpuBackend, EmotionClassifier,
        EmotionClassifierConfig, ModelError, TrainBackend,
    };
}
