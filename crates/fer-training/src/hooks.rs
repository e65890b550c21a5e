//! Training lifecycle hooks.
//!
//! Hooks observe the run; they cannot mutate it. The trainer invokes
//! them synchronously, in registration order, at fold and epoch
//! boundaries.

use tracing::{debug, info, warn};

use crate::history::{EpochRecord, FoldHistory};

/// Observer of a cross-validated training run.
///
/// All methods have empty defaults; implement only the boundaries you
/// care about.
pub trait TrainHook {
    /// Called before a fold's model is initialized.
    fn on_fold_start(&mut self, _fold: usize, _num_folds: usize) {}

    /// Called after each epoch's validation pass.
    fn on_epoch_end(&mut self, _fold: usize, _record: &EpochRecord) {}

    /// Called once a fold finishes, early-stopped, diverged, or ran
    /// to the epoch cap.
    fn on_fold_end(&mut self, _fold: usize, _history: &FoldHistory) {}
}

/// Hook that reports progress through `tracing`.
///
/// Epoch records go to `debug`, except every `log_every`-th epoch
/// which goes to `info`. Fold boundaries always log at `info`.
#[derive(Debug, Clone)]
pub struct ProgressHook {
    log_every: usize,
}

impl Default for ProgressHook {
    fn default() -> Self {
        Self::new(10)
    }
}

impl ProgressHook {
    /// Creates a progress hook that promotes every `log_every`-th
    /// epoch to `info` level. Zero promotes none.
    #[must_use]
    pub const fn new(log_every: usize) -> Self {
        Self { log_every }
    }
}

impl TrainHook for ProgressHook {
    fn on_fold_start(&mut self, fold: usize, num_folds: usize) {
        info!(fold, num_folds, "starting fold");
    }

    fn on_epoch_end(&mut self, fold: usize, record: &EpochRecord) {
        if self.log_every > 0 && (record.epoch + 1) % self.log_every == 0 {
            info!(
                fold,
                epoch = record.epoch,
                train_loss = record.train_loss,
                val_loss = record.val_loss,
                val_accuracy = record.val_accuracy,
                "epoch complete"
            );
        } else {
            debug!(
                fold,
                epoch = record.epoch,
                train_loss = record.train_loss,
                val_loss = record.val_loss,
                val_accuracy = record.val_accuracy,
                "epoch complete"
            );
        }
    }

    fn on_fold_end(&mut self, fold: usize, history: &FoldHistory) {
        if history.diverged {
            warn!(
                fold,
                epochs = history.epochs_completed(),
                "fold diverged"
            );
        } else {
            info!(
                fold,
                epochs = history.epochs_completed(),
                best_val_accuracy = history.best_val_accuracy.unwrap_or(0.0),
                "fold complete"
            );
        }
    }
}
