//! Command-line entry point for the emotion recognition pipeline.
//!
//! # Commands
//!
//! - `fer train` - Cross-validated training from cached feature and
//!   label tensors, checkpointing the best model across folds
//! - `fer eval` - Score a saved checkpoint on one fold's held-out
//!   split of the recorded partition
//!
//! Both commands consume the cached fused-feature and label files;
//! producing those caches is a separate, offline step.

mod eval;
mod train;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Facial emotion recognition from video clips.
#[derive(Parser)]
#[command(name = "fer")]
#[command(about = "Cross-validated emotion recognition training and evaluation", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Arguments shared by both commands.
#[derive(clap::Args)]
pub(crate) struct DataArgs {
    /// Path to the cached fused feature tensor
    /// [default: data/fused-features.bin]
    #[arg(long)]
    pub(crate) features: Option<PathBuf>,

    /// Path to the cached one-hot label tensor
    /// [default: data/labels.bin]
    #[arg(long)]
    pub(crate) labels: Option<PathBuf>,

    /// Checkpoint stem, extension-free; `.bin` is appended
    /// [default: models/emotion-lstm]
    #[arg(long)]
    pub(crate) weights: Option<PathBuf>,

    /// Mini-batch size
    #[arg(long, default_value_t = 32)]
    pub(crate) batch_size: usize,

    /// LSTM hidden state size
    #[arg(long, default_value_t = 32)]
    pub(crate) lstm_units: usize,

    /// Dense layer width between LSTM and output
    #[arg(long, default_value_t = 16)]
    pub(crate) hidden: usize,
}

impl DataArgs {
    /// Resolves the path arguments against the pipeline defaults.
    pub(crate) fn pipeline_config(&self) -> fer_types::PipelineConfig {
        let mut config = fer_types::PipelineConfig::default();
        if let Some(path) = &self.features {
            config = config.with_features_path(path);
        }
        if let Some(path) = &self.labels {
            config = config.with_labels_path(path);
        }
        if let Some(path) = &self.weights {
            config = config.with_weights_path(path);
        }
        config
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Train the classifier with stratified K-fold cross-validation
    Train {
        #[command(flatten)]
        data: DataArgs,

        /// Number of stratified folds
        #[arg(long, default_value_t = 5)]
        folds: usize,

        /// Epoch cap per fold
        #[arg(long, default_value_t = 300)]
        max_epochs: usize,

        /// Epochs without validation accuracy improvement before a
        /// fold stops early (0 disables)
        #[arg(long, default_value_t = 50)]
        patience: usize,

        /// SGD learning rate
        #[arg(long, default_value_t = 0.01)]
        learning_rate: f64,

        /// Backend RNG seed
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Skip checkpointing the best model
        #[arg(long)]
        no_save_best: bool,
    },

    /// Evaluate a saved checkpoint on one fold's held-out split
    Eval {
        #[command(flatten)]
        data: DataArgs,

        /// Fold whose test split to score
        #[arg(long, default_value_t = 1)]
        fold: usize,

        /// Fold count used to regenerate the partition when no
        /// recorded partition file exists beside the checkpoint
        #[arg(long, default_value_t = 5)]
        folds: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Train {
            data,
            folds,
            max_epochs,
            patience,
            learning_rate,
            seed,
            no_save_best,
        } => train::run(&train::TrainArgs {
            data,
            folds,
            max_epochs,
            patience,
            learning_rate,
            seed,
            save_best: !no_save_best,
        }),
        Commands::Eval { data, fold, folds } => eval::run(&eval::EvalArgs { data, fold, folds }),
    }
}
