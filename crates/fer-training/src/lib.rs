//! Cross-validated training and evaluation for the emotion classifier.
//!
//! # Training
//!
//! - [`CrossValTrainer`] - One fresh model per stratified fold,
//!   mini-batch SGD, early stopping on validation accuracy, and a
//!   single best-across-folds checkpoint
//! - [`CrossValConfig`] - Every knob explicit; no ambient state
//! - [`TrainHook`] / [`ProgressHook`] - Ordered synchronous lifecycle
//!   observers
//!
//! # Evaluation
//!
//! - [`evaluate`] - Held-out accuracy and [`ConfusionMatrix`] for one
//!   fold of a recorded partition
//!
//! # History
//!
//! - [`CrossValReport`] - Per-fold, per-epoch records plus the best
//!   checkpoint reference, serializable as JSON

// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod batch;
mod config;
mod error;
mod eval;
mod history;
mod hooks;
mod trainer;

// Re-export batching helpers
pub use batch::{batch_ranges, class_batch, sequence_batch};

// Re-export configuration
pub use config::CrossValConfig;

// Re-export evaluation
pub use eval::{evaluate, predict_classes, ConfusionMatrix, EvalReport};

// Re-export history types
pub use history::{BestModel, CrossValReport, EpochRecord, FoldHistory};

// Re-export hooks
pub use hooks::{ProgressHook, TrainHook};

// Re-export the trainer
pub use trainer::{CrossValOutcome, CrossValTrainer};

// Re-export error types
pub use error::{Result, TrainError};

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        evaluate, ConfusionMatrix, CrossValConfig, CrossValOutcome, CrossValReport,
        CrossValTrainer, EvalReport, ProgressHook, TrainError, TrainHook,
    };
}
