//! Cross-validation training configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for a cross-validated training run.
///
/// All knobs are explicit; the trainer holds no ambient state beyond
/// what this struct carries. Defaults match the usual recipe for small
/// clip datasets: 5 folds, batches of 32, up to 300 epochs with a
/// 50-epoch patience window, plain SGD at 0.01.
///
/// # Example
///
/// ```
/// use fer_training::CrossValConfig;
///
/// let config = CrossValConfig::new(5).with_max_epochs(100).with_patience(10);
/// assert_eq!(config.folds, 5);
/// assert!(config.is_valid());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossValConfig {
    /// Number of stratified folds.
    pub folds: usize,

    /// Mini-batch size.
    pub batch_size: usize,

    /// Upper bound on epochs per fold.
    pub max_epochs: usize,

    /// Epochs without validation accuracy improvement before a fold
    /// stops early. Zero disables early stopping.
    pub patience: usize,

    /// SGD learning rate.
    pub learning_rate: f64,

    /// Whether to checkpoint the best model seen across all folds.
    pub save_best: bool,

    /// Checkpoint stem, extension-free; the recorder appends `.bin`
    /// and the fold partition is written beside it as JSON.
    pub weights_path: PathBuf,

    /// Backend RNG seed; each fold is re-seeded from this value.
    pub seed: u64,
}

impl Default for CrossValConfig {
    fn default() -> Self {
        Self::new(5)
    }
}

impl CrossValConfig {
    /// Creates a configuration with the given fold count.
    #[must_use]
    pub fn new(folds: usize) -> Self {
        Self {
            folds,
            batch_size: 32,
            max_epochs: 300,
            patience: 50,
            learning_rate: 0.01,
            save_best: true,
            weights_path: PathBuf::from("models/emotion-lstm"),
            seed: 42,
        }
    }

    /// Sets the mini-batch size.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Sets the epoch cap per fold.
    #[must_use]
    pub fn with_max_epochs(mut self, max_epochs: usize) -> Self {
        self.max_epochs = max_epochs;
        self
    }

    /// Sets the early-stopping patience.
    #[must_use]
    pub fn with_patience(mut self, patience: usize) -> Self {
        self.patience = patience;
        self
    }

    /// Sets the learning rate.
    #[must_use]
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Enables or disables best-model checkpointing.
    #[must_use]
    pub fn with_save_best(mut self, save_best: bool) -> Self {
        self.save_best = save_best;
        self
    }

    /// Sets the checkpoint stem.
    #[must_use]
    pub fn with_weights_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.weights_path = path.into();
        self
    }

    /// Sets the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validates the configuration.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.folds >= 2
            && self.batch_size > 0
            && self.max_epochs > 0
            && self.learning_rate > 0.0
            && self.learning_rate.is_finite()
    }

    /// Returns the path of the partition file written beside the
    /// checkpoint.
    #[must_use]
    pub fn partition_path(&self) -> PathBuf {
        self.weights_path.with_extension("folds.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default() {
        let config = CrossValConfig::default();
        assert_eq!(config.folds, 5);
        assert_eq!(config.batch_size, 32);
        assert_eq!(config.max_epochs, 300);
        assert_eq!(config.patience, 50);
        assert!((config.learning_rate - 0.01).abs() < f64::EPSILON);
        assert!(config.save_best);
        assert!(config.is_valid());
    }

    #[test]
    fn config_builder() {
        let config = CrossValConfig::new(3)
            .with_batch_size(16)
            .with_max_epochs(20)
            .with_patience(5)
            .with_learning_rate(0.05)
            .with_save_best(false)
            .with_weights_path("out/model")
            .with_seed(7);

        assert_eq!(config.folds, 3);
        assert_eq!(config.batch_size, 16);
        assert_eq!(config.max_epochs, 20);
        assert_eq!(config.patience, 5);
        assert!(!config.save_best);
        assert_eq!(config.weights_path, PathBuf::from("out/model"));
        assert_eq!(config.seed, 7);
    }

    #[test]
    fn config_invalid() {
        assert!(!CrossValConfig::new(1).is_valid());
        assert!(!CrossValConfig::new(5).with_batch_size(0).is_valid());
        assert!(!CrossValConfig::new(5).with_max_epochs(0).is_valid());
        assert!(!CrossValConfig::new(5).with_learning_rate(0.0).is_valid());
    }

    #[test]
    fn config_partition_path() {
        let config = CrossValConfig::new(5).with_weights_path("models/best");
        assert_eq!(config.partition_path(), PathBuf::from("models/best.folds.json"));
    }

    #[test]
    fn config_serialization() {
        let config = CrossValConfig::new(5).with_seed(9);
        let json = serde_json::to_string(&config);
        assert!(json.is_ok());

        let parsed: std::result::Result<CrossValConfig, _> =
            serde_json::from_str(&json.unwrap_or_default());
        assert!(parsed.is_ok());
        assert_eq!(parsed.unwrap_or_default(), config);
    }
}
