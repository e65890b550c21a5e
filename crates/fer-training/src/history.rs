//! Per-fold training history and the cross-validation report.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use fer_dataset::FoldPartition;

use crate::error::Result;

/// Metrics for one epoch of one fold.
///
/// # Example
///
/// ```
/// use fer_training::EpochRecord;
///
/// let record = EpochRecord::new(0, 1.79, 0.21, 1.81, 0.18);
/// assert_eq!(record.epoch, 0);
/// assert!((record.val_accuracy - 0.18).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochRecord {
    /// Epoch number (0-indexed).
    pub epoch: usize,

    /// Mean training loss over the epoch's batches.
    pub train_loss: f32,

    /// Training accuracy over the epoch.
    pub train_accuracy: f32,

    /// Validation loss on the fold's held-out split.
    pub val_loss: f32,

    /// Validation accuracy on the fold's held-out split. This is the
    /// quantity early stopping and best-model selection monitor.
    pub val_accuracy: f32,
}

impl EpochRecord {
    /// Creates a new epoch record.
    #[must_use]
    pub const fn new(
        epoch: usize,
        train_loss: f32,
        train_accuracy: f32,
        val_loss: f32,
        val_accuracy: f32,
    ) -> Self {
        Self {
            epoch,
            train_loss,
            train_accuracy,
            val_loss,
            val_accuracy,
        }
    }
}

/// History of one fold's fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldHistory {
    /// Fold index within the partition.
    pub fold: usize,

    /// Per-epoch records, in order.
    pub epochs: Vec<EpochRecord>,

    /// Best validation accuracy seen in this fold.
    pub best_val_accuracy: Option<f32>,

    /// Epoch that produced the best validation accuracy.
    pub best_epoch: Option<usize>,

    /// Whether the fit diverged (non-finite loss).
    pub diverged: bool,

    /// Why the fold stopped before the epoch cap, if it did.
    pub stop_reason: Option<String>,
}

impl FoldHistory {
    /// Creates an empty history for a fold.
    #[must_use]
    pub const fn new(fold: usize) -> Self {
        Self {
            fold,
            epochs: Vec::new(),
            best_val_accuracy: None,
            best_epoch: None,
            diverged: false,
            stop_reason: None,
        }
    }

    /// Appends an epoch record, tracking the best validation accuracy.
    ///
    /// Returns `true` if the record improved on the fold's best.
    pub fn add_epoch(&mut self, record: EpochRecord) -> bool {
        let improved = self
            .best_val_accuracy
            .is_none_or(|best| record.val_accuracy > best);
        if improved {
            self.best_val_accuracy = Some(record.val_accuracy);
            self.best_epoch = Some(record.epoch);
        }
        self.epochs.push(record);
        improved
    }

    /// Returns the number of completed epochs.
    #[must_use]
    pub fn epochs_completed(&self) -> usize {
        self.epochs.len()
    }

    /// Returns the last epoch record, if any.
    #[must_use]
    pub fn final_record(&self) -> Option<&EpochRecord> {
        self.epochs.last()
    }

    /// Marks the fold as diverged.
    pub fn mark_diverged(&mut self, reason: impl Into<String>) {
        self.diverged = true;
        self.stop_reason = Some(reason.into());
    }

    /// Marks the fold as early stopped.
    pub fn mark_early_stopped(&mut self, reason: impl Into<String>) {
        self.stop_reason = Some(reason.into());
    }
}

/// The checkpoint the trainer kept as best across all folds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestModel {
    /// Fold that produced the checkpoint.
    pub fold: usize,

    /// Epoch within that fold.
    pub epoch: usize,

    /// Validation accuracy at the checkpoint.
    pub val_accuracy: f32,

    /// Path of the saved weights.
    pub checkpoint: PathBuf,
}

/// Outcome of a full cross-validated training run.
///
/// Serializable as JSON so a run's history can be inspected offline
/// and the evaluation path can reuse the exact fold assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossValReport {
    /// The fold assignment the run trained against.
    pub partition: FoldPartition,

    /// One history per fold, in fold order. Diverged folds are present
    /// with `diverged` set rather than omitted.
    pub folds: Vec<FoldHistory>,

    /// Best checkpoint across all folds, when `save_best` was on and
    /// at least one fold completed an epoch.
    pub best: Option<BestModel>,
}

impl CrossValReport {
    /// Returns the number of folds that diverged.
    #[must_use]
    pub fn diverged_folds(&self) -> usize {
        self.folds.iter().filter(|f| f.diverged).count()
    }

    /// Mean of the per-fold best validation accuracies, ignoring
    /// diverged folds. `None` if every fold diverged.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_val_accuracy(&self) -> Option<f32> {
        let best: Vec<f32> = self
            .folds
            .iter()
            .filter(|f| !f.diverged)
            .filter_map(|f| f.best_val_accuracy)
            .collect();
        if best.is_empty() {
            None
        } else {
            Some(best.iter().sum::<f32>() / best.len() as f32)
        }
    }

    /// Persists the report as JSON.
    ///
    /// # Errors
    ///
    /// Returns `TrainError::Io` if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Loads a previously saved report.
    ///
    /// # Errors
    ///
    /// Returns `TrainError::Io` or `TrainError::Serialization`.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Returns a human-readable summary.
    #[must_use]
    #[allow(clippy::let_underscore_must_use)] // String::write_fmt is infallible
    pub fn summary(&self) -> String {
        use std::fmt::Write;

        let mut s = String::new();
        let _ = writeln!(s, "Cross-Validation Summary");
        let _ = writeln!(s, "========================");
        for fold in &self.folds {
            if fold.diverged {
                let _ = writeln!(
                    s,
                    "fold {}: diverged after {} epochs",
                    fold.fold,
                    fold.epochs_completed()
                );
            } else {
                let _ = writeln!(
                    s,
                    "fold {}: best val accuracy {:.4} at epoch {} ({} epochs)",
                    fold.fold,
                    fold.best_val_accuracy.unwrap_or(0.0),
                    fold.best_epoch.unwrap_or(0),
                    fold.epochs_completed()
                );
            }
        }
        if let Some(mean) = self.mean_val_accuracy() {
            let _ = writeln!(s, "mean best val accuracy: {mean:.4}");
        }
        if let Some(best) = &self.best {
            let _ = writeln!(
                s,
                "best checkpoint: fold {} epoch {} ({:.4}) -> {}",
                best.fold,
                best.epoch,
                best.val_accuracy,
                best.checkpoint.display()
            );
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_partition() -> FoldPartition {
        FoldPartition::stratified(&[0, 0, 1, 1], 2).unwrap()
    }

    #[test]
    fn fold_history_tracks_best_accuracy() {
        let mut history = FoldHistory::new(0);

        assert!(history.add_epoch(EpochRecord::new(0, 1.0, 0.3, 1.1, 0.25)));
        assert!(history.add_epoch(EpochRecord::new(1, 0.8, 0.5, 0.9, 0.40)));
        // Lower val accuracy is not an improvement even with lower loss.
        assert!(!history.add_epoch(EpochRecord::new(2, 0.5, 0.7, 0.6, 0.35)));

        assert_eq!(history.best_epoch, Some(1));
        assert!((history.best_val_accuracy.unwrap() - 0.40).abs() < 1e-6);
        assert_eq!(history.epochs_completed(), 3);
        assert_eq!(history.final_record().unwrap().epoch, 2);
    }

    #[test]
    fn fold_history_mark_diverged() {
        let mut history = FoldHistory::new(3);
        history.mark_diverged("loss is not finite");

        assert!(history.diverged);
        assert!(history.stop_reason.as_deref().unwrap().contains("finite"));
    }

    #[test]
    fn report_mean_skips_diverged_folds() {
        let mut good = FoldHistory::new(0);
        good.add_epoch(EpochRecord::new(0, 1.0, 0.5, 1.0, 0.6));
        let mut bad = FoldHistory::new(1);
        bad.mark_diverged("loss is not finite");

        let report = CrossValReport {
            partition: sample_partition(),
            folds: vec![good, bad],
            best: None,
        };

        assert_eq!(report.diverged_folds(), 1);
        assert!((report.mean_val_accuracy().unwrap() - 0.6).abs() < 1e-6);
    }

    #[test]
    fn report_mean_none_when_all_diverged() {
        let mut bad = FoldHistory::new(0);
        bad.mark_diverged("loss is not finite");

        let report = CrossValReport {
            partition: sample_partition(),
            folds: vec![bad],
            best: None,
        };

        assert!(report.mean_val_accuracy().is_none());
    }

    #[test]
    fn report_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");

        let mut history = FoldHistory::new(0);
        history.add_epoch(EpochRecord::new(0, 1.0, 0.5, 1.0, 0.6));
        let report = CrossValReport {
            partition: sample_partition(),
            folds: vec![history],
            best: Some(BestModel {
                fold: 0,
                epoch: 0,
                val_accuracy: 0.6,
                checkpoint: PathBuf::from("models/best.bin"),
            }),
        };

        report.save(&path).unwrap();
        let loaded = CrossValReport::load(&path).unwrap();
        assert_eq!(loaded, report);
    }

    #[test]
    fn report_summary_mentions_folds() {
        let mut history = FoldHistory::new(0);
        history.add_epoch(EpochRecord::new(0, 1.0, 0.5, 1.0, 0.6));

        let report = CrossValReport {
            partition: sample_partition(),
            folds: vec![history],
            best: None,
        };

        let summary = report.summary();
        assert!(summary.contains("fold 0"));
        assert!(summary.contains("mean best val accuracy"));
    }
}
