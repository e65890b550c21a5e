//! The `fer eval` command.

use anyhow::{Context, Result};
use tracing::{info, warn};

use fer_dataset::FoldPartition;
use fer_models::{load_checkpoint, CpuBackend, EmotionClassifier, EmotionClassifierConfig};
use fer_training::evaluate;
use fer_types::Emotion;

use crate::DataArgs;

pub(crate) struct EvalArgs {
    pub data: DataArgs,
    pub fold: usize,
    pub folds: usize,
}

pub(crate) fn run(args: &EvalArgs) -> Result<()> {
    let pipeline = args.data.pipeline_config();
    let dataset = crate::train::load_dataset(&pipeline)?;

    // Prefer the partition recorded at training time; regenerating is
    // only sound because the assignment is deterministic.
    let partition_path = pipeline.weights_path.with_extension("folds.json");
    let partition = if partition_path.exists() {
        FoldPartition::load(&partition_path)
            .with_context(|| format!("loading fold partition from {}", partition_path.display()))?
    } else {
        warn!(
            path = %partition_path.display(),
            "no recorded partition found, regenerating from labels"
        );
        FoldPartition::stratified(&dataset.class_indices(), args.folds)?
    };

    let model_config =
        EmotionClassifierConfig::new(dataset.features().feature_dim(), dataset.num_classes())
            .with_lstm_units(args.data.lstm_units)
            .with_hidden(args.data.hidden);

    let device = Default::default();
    let model = EmotionClassifier::<CpuBackend>::new(model_config, &device);
    let model = load_checkpoint(model, &pipeline.weights_path, &device)
        .with_context(|| format!("loading checkpoint {}", pipeline.weights_path.display()))?;

    let report = evaluate(
        &model,
        &dataset,
        &partition,
        args.fold,
        args.data.batch_size,
        &device,
    )?;

    info!(
        fold = report.fold,
        samples = report.num_samples,
        "evaluation complete"
    );
    println!(
        "fold {} accuracy: {:.4} ({} samples)",
        report.fold, report.accuracy, report.num_samples
    );
    println!();
    println!("confusion matrix (rows: actual, normalized):");
    print!("{}", report.confusion.to_table(&Emotion::names()));
    Ok(())
}
