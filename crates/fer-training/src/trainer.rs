//! The cross-validated training loop.

use burn::module::AutodiffModule;
use burn::nn::loss::{CrossEntropyLoss, CrossEntropyLossConfig};
use burn::optim::{GradientsParams, Optimizer, SgdConfig};
use burn::prelude::Backend;
use burn::tensor::backend::AutodiffBackend;
use burn::tensor::ElementConversion;
use tracing::{info, warn};

use fer_dataset::{Dataset, Fold, FoldPartition};
use fer_models::{save_checkpoint, seed_backend, EmotionClassifier, EmotionClassifierConfig};
use fer_types::FeatureTensor;

use crate::batch::{batch_ranges, class_batch, sequence_batch};
use crate::config::CrossValConfig;
use crate::error::{Result, TrainError};
use crate::eval::argmax_rows;
use crate::history::{BestModel, CrossValReport, EpochRecord, FoldHistory};
use crate::hooks::TrainHook;

/// Trainer that fits one fresh model per stratified fold.
///
/// Each fold trains with mini-batch SGD, validates on its held-out
/// split after every epoch, and stops early once validation accuracy
/// has not improved for `patience` epochs. A single checkpoint is kept
/// across the whole run: whenever any fold's validation accuracy beats
/// the best seen so far, the current weights replace it. A fold whose
/// loss turns non-finite is marked diverged and the run moves on to
/// the next fold.
///
/// # Example
///
/// ```no_run
/// use fer_models::{EmotionClassifierConfig, TrainBackend};
/// use fer_training::{CrossValConfig, CrossValTrainer, ProgressHook};
/// # fn run(dataset: &fer_dataset::Dataset) -> fer_training::Result<()> {
///
/// let config = CrossValConfig::new(5);
/// let model_config = EmotionClassifierConfig::new(6528, 6);
/// let mut trainer =
///     CrossValTrainer::new(config, model_config)?.with_hook(ProgressHook::default());
///
/// let device = Default::default();
/// let outcome = trainer.run::<TrainBackend>(dataset, &device)?;
/// println!("{}", outcome.report.summary());
/// # Ok(())
/// # }
/// ```
pub struct CrossValTrainer {
    config: CrossValConfig,
    model_config: EmotionClassifierConfig,
    hooks: Vec<Box<dyn TrainHook>>,
}

/// Everything a cross-validation run hands back to the caller.
#[derive(Debug)]
pub struct CrossValOutcome<B: Backend> {
    /// Serializable per-fold histories, the partition used, and the
    /// best-checkpoint reference (when checkpointing was enabled).
    pub report: CrossValReport,
    /// The classifier as it stood at the end of the final fold, with
    /// autodiff stripped. This is the model to use when checkpointing
    /// was disabled.
    pub last_model: EmotionClassifier<B>,
}

impl CrossValTrainer {
    /// Creates a trainer from validated configurations.
    ///
    /// # Errors
    ///
    /// Returns `TrainError::InvalidConfig` if either configuration is
    /// rejected by its own `is_valid`.
    pub fn new(config: CrossValConfig, model_config: EmotionClassifierConfig) -> Result<Self> {
        if !config.is_valid() {
            return Err(TrainError::invalid_config(format!(
                "rejected cross-validation settings: {config:?}"
            )));
        }
        if !model_config.is_valid() {
            return Err(TrainError::invalid_config(format!(
                "rejected classifier settings: {model_config:?}"
            )));
        }
        Ok(Self {
            config,
            model_config,
            hooks: Vec::new(),
        })
    }

    /// Registers a lifecycle hook. Hooks fire in registration order.
    #[must_use]
    pub fn with_hook(mut self, hook: impl TrainHook + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    /// Returns the training configuration.
    #[must_use]
    pub const fn config(&self) -> &CrossValConfig {
        &self.config
    }

    /// Runs the full cross-validated fit.
    ///
    /// Partitions the dataset, trains every fold, and returns the
    /// report together with the final fold's classifier. When
    /// `save_best` is on, the partition is written beside the
    /// checkpoint stem before training starts so an evaluation run can
    /// always recover the exact fold assignment.
    ///
    /// # Errors
    ///
    /// Returns `TrainError::InvalidConfig` if the model configuration
    /// does not match the dataset's dimensions, or propagates dataset,
    /// checkpoint, and readback errors. A diverged fold is not an
    /// error; it is recorded in the report.
    pub fn run<B: AutodiffBackend>(
        &mut self,
        dataset: &Dataset,
        device: &B::Device,
    ) -> Result<CrossValOutcome<B::InnerBackend>> {
        if self.model_config.input_dim != dataset.features().feature_dim() {
            return Err(TrainError::invalid_config(format!(
                "classifier expects {} features per frame, dataset has {}",
                self.model_config.input_dim,
                dataset.features().feature_dim()
            )));
        }
        if self.model_config.num_classes != dataset.num_classes() {
            return Err(TrainError::invalid_config(format!(
                "classifier expects {} classes, dataset has {}",
                self.model_config.num_classes,
                dataset.num_classes()
            )));
        }

        let partition = FoldPartition::stratified(&dataset.class_indices(), self.config.folds)?;
        if self.config.save_best {
            partition.save(&self.config.partition_path())?;
        }

        info!(
            folds = partition.num_folds(),
            samples = dataset.num_samples(),
            "starting cross-validation"
        );

        let mut folds = Vec::with_capacity(partition.num_folds());
        let mut best: Option<BestModel> = None;
        // The partitioner rejects k < 2, so fold 0 always exists.
        let mut last_model =
            self.run_fold::<B>(dataset, &partition, 0, &mut best, &mut folds, device)?;
        for fold_idx in 1..partition.num_folds() {
            last_model =
                self.run_fold::<B>(dataset, &partition, fold_idx, &mut best, &mut folds, device)?;
        }

        Ok(CrossValOutcome {
            report: CrossValReport {
                partition,
                folds,
                best,
            },
            last_model,
        })
    }

    /// Fires the fold lifecycle hooks around one fold's fit and records
    /// its history.
    fn run_fold<B: AutodiffBackend>(
        &mut self,
        dataset: &Dataset,
        partition: &FoldPartition,
        fold_idx: usize,
        best: &mut Option<BestModel>,
        folds: &mut Vec<FoldHistory>,
        device: &B::Device,
    ) -> Result<EmotionClassifier<B::InnerBackend>> {
        for hook in &mut self.hooks {
            hook.on_fold_start(fold_idx, partition.num_folds());
        }
        let fold = partition.fold(fold_idx)?.clone();
        let (history, model) = self.train_fold::<B>(dataset, &fold, fold_idx, best, device)?;
        for hook in &mut self.hooks {
            hook.on_fold_end(fold_idx, &history);
        }
        folds.push(history);
        Ok(model)
    }

    #[allow(clippy::too_many_lines, clippy::cast_precision_loss)]
    fn train_fold<B: AutodiffBackend>(
        &mut self,
        dataset: &Dataset,
        fold: &Fold,
        fold_idx: usize,
        best: &mut Option<BestModel>,
        device: &B::Device,
    ) -> Result<(FoldHistory, EmotionClassifier<B::InnerBackend>)> {
        let class_indices = dataset.class_indices();
        let train_features = dataset.features().select(&fold.train)?;
        let train_classes: Vec<usize> = fold.train.iter().map(|&i| class_indices[i]).collect();
        let val_features = dataset.features().select(&fold.test)?;
        let val_classes: Vec<usize> = fold.test.iter().map(|&i| class_indices[i]).collect();

        // Fresh weights per fold, re-seeded so the run is a pure
        // function of the config seed.
        seed_backend::<B>(self.config.seed.wrapping_add(fold_idx as u64));
        let mut model = EmotionClassifier::<B>::new(self.model_config, device);
        let mut optim = SgdConfig::new().init();
        let loss_fn = CrossEntropyLossConfig::new().init(device);
        let val_loss_fn: CrossEntropyLoss<B::InnerBackend> =
            CrossEntropyLossConfig::new().init(device);

        let num_classes = self.model_config.num_classes;
        let num_train = train_features.num_samples();
        let mut history = FoldHistory::new(fold_idx);
        let mut stale = 0_usize;

        'epochs: for epoch in 0..self.config.max_epochs {
            let mut loss_sum = 0.0_f64;
            let mut correct = 0_usize;

            for (start, end) in batch_ranges(num_train, self.config.batch_size) {
                let input = sequence_batch::<B>(&train_features, start, end, device);
                let targets = class_batch::<B>(&train_classes[start..end], device);

                let logits = model.forward(input);
                let loss = loss_fn.forward(logits.clone(), targets);
                let loss_value: f32 = loss.clone().into_scalar().elem();
                if !loss_value.is_finite() {
                    let err = TrainError::fit_divergence(fold_idx, epoch);
                    warn!(fold = fold_idx, epoch, "abandoning fold: {err}");
                    history.mark_diverged(err.to_string());
                    break 'epochs;
                }
                loss_sum += f64::from(loss_value) * (end - start) as f64;

                let scores = logits
                    .into_data()
                    .to_vec::<f32>()
                    .map_err(|e| TrainError::tensor(format!("{e:?}")))?;
                correct += argmax_rows(&scores, num_classes)
                    .iter()
                    .zip(&train_classes[start..end])
                    .filter(|(predicted, actual)| predicted == actual)
                    .count();

                let grads = GradientsParams::from_grads(loss.backward(), &model);
                model = optim.step(self.config.learning_rate, model, grads);
            }

            let train_loss = (loss_sum / num_train as f64) as f32;
            let train_accuracy = correct as f32 / num_train as f32;

            let valid_model = model.valid();
            let (val_loss, val_accuracy) = validation_pass(
                &valid_model,
                &val_loss_fn,
                &val_features,
                &val_classes,
                self.config.batch_size,
                device,
            )?;

            let record =
                EpochRecord::new(epoch, train_loss, train_accuracy, val_loss, val_accuracy);
            let improved = history.add_epoch(record);
            if improved {
                stale = 0;
            } else {
                stale += 1;
            }

            if self.config.save_best
                && best
                    .as_ref()
                    .is_none_or(|b| val_accuracy > b.val_accuracy)
            {
                let checkpoint =
                    save_checkpoint::<B::InnerBackend, _>(&valid_model, &self.config.weights_path)?;
                info!(
                    fold = fold_idx,
                    epoch, val_accuracy, "new best model checkpointed"
                );
                *best = Some(BestModel {
                    fold: fold_idx,
                    epoch,
                    val_accuracy,
                    checkpoint,
                });
            }

            for hook in &mut self.hooks {
                hook.on_epoch_end(fold_idx, &record);
            }

            if self.config.patience > 0 && stale >= self.config.patience {
                history.mark_early_stopped(format!(
                    "no validation accuracy improvement for {} epochs",
                    self.config.patience
                ));
                break;
            }
        }

        Ok((history, model.valid()))
    }
}

/// Loss and accuracy of a model over a feature tensor, in mini-batches.
#[allow(clippy::cast_precision_loss)]
fn validation_pass<B: Backend>(
    model: &EmotionClassifier<B>,
    loss_fn: &CrossEntropyLoss<B>,
    features: &FeatureTensor,
    classes: &[usize],
    batch_size: usize,
    device: &B::Device,
) -> Result<(f32, f32)> {
    let total = features.num_samples();
    let mut loss_sum = 0.0_f64;
    let mut correct = 0_usize;

    for (start, end) in batch_ranges(total, batch_size) {
        let input = sequence_batch::<B>(features, start, end, device);
        let targets = class_batch::<B>(&classes[start..end], device);

        let logits = model.forward(input);
        let loss = loss_fn.forward(logits.clone(), targets);
        let loss_value: f32 = loss.into_scalar().elem();
        loss_sum += f64::from(loss_value) * (end - start) as f64;

        let num_classes = logits.dims()[1];
        let scores = logits
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| TrainError::tensor(format!("{e:?}")))?;
        correct += argmax_rows(&scores, num_classes)
            .iter()
            .zip(&classes[start..end])
            .filter(|(predicted, actual)| predicted == actual)
            .count();
    }

    Ok((
        (loss_sum / total as f64) as f32,
        correct as f32 / total as f32,
    ))
}
