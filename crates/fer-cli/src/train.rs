//! The `fer train` command.

use anyhow::{Context, Result};
use tracing::info;

use fer_dataset::Dataset;
use fer_features::{FeatureStore, LabelStore};
use fer_models::{EmotionClassifierConfig, TrainBackend};
use fer_training::{CrossValConfig, CrossValTrainer, ProgressHook};
use fer_types::PipelineConfig;

use crate::DataArgs;

pub(crate) struct TrainArgs {
    pub data: DataArgs,
    pub folds: usize,
    pub max_epochs: usize,
    pub patience: usize,
    pub learning_rate: f64,
    pub seed: u64,
    pub save_best: bool,
}

pub(crate) fn run(args: &TrainArgs) -> Result<()> {
    let pipeline = args.data.pipeline_config();
    let dataset = load_dataset(&pipeline)?;
    info!(
        samples = dataset.num_samples(),
        frames = dataset.features().num_frames(),
        feature_dim = dataset.features().feature_dim(),
        classes = dataset.num_classes(),
        "dataset loaded"
    );

    let config = CrossValConfig::new(args.folds)
        .with_batch_size(args.data.batch_size)
        .with_max_epochs(args.max_epochs)
        .with_patience(args.patience)
        .with_learning_rate(args.learning_rate)
        .with_save_best(args.save_best)
        .with_weights_path(&pipeline.weights_path)
        .with_seed(args.seed);
    let model_config =
        EmotionClassifierConfig::new(dataset.features().feature_dim(), dataset.num_classes())
            .with_lstm_units(args.data.lstm_units)
            .with_hidden(args.data.hidden);

    let history_path = pipeline.weights_path.with_extension("history.json");
    let mut trainer =
        CrossValTrainer::new(config, model_config)?.with_hook(ProgressHook::default());

    let device = Default::default();
    let report = trainer.run::<TrainBackend>(&dataset, &device)?.report;

    report
        .save(&history_path)
        .with_context(|| format!("writing training history to {}", history_path.display()))?;

    print!("{}", report.summary());
    info!(history = %history_path.display(), "training history written");
    Ok(())
}

/// Loads the cached tensors and pairs them into a dataset.
///
/// Missing caches are fatal here; feature extraction is an offline
/// step, not something the trainer reruns implicitly.
pub(crate) fn load_dataset(pipeline: &PipelineConfig) -> Result<Dataset> {
    let features = FeatureStore::new(&pipeline.features_path)
        .load()
        .with_context(|| {
            format!(
                "loading cached features from {} (run feature extraction first)",
                pipeline.features_path.display()
            )
        })?;
    let labels = LabelStore::new(&pipeline.labels_path)
        .load()
        .with_context(|| {
            format!(
                "loading cached labels from {}",
                pipeline.labels_path.display()
            )
        })?;
    Ok(Dataset::new(features, labels)?)
}
