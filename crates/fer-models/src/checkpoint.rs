//! Checkpoint persistence for classifier weights.
//!
//! Checkpoints are written with Burn's binary recorder. Paths are
//! handled as extension-free stems; the recorder appends `.bin`
//! itself. Saving goes through a `-partial` sibling followed by a
//! rename, so a crash mid-write never leaves a truncated file at the
//! final path.

use std::fs;
use std::path::{Path, PathBuf};

use burn::module::Module;
use burn::prelude::Backend;
use burn::record::{BinFileRecorder, FullPrecisionSettings, Recorder};

use crate::error::{ModelError, Result};

/// Returns the on-disk path for a checkpoint stem.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use fer_models::checkpoint_path;
///
/// let path = checkpoint_path(Path::new("models/emotion-lstm"));
/// assert_eq!(path, Path::new("models/emotion-lstm.bin"));
/// ```
#[must_use]
pub fn checkpoint_path(stem: &Path) -> PathBuf {
    stem.with_extension("bin")
}

/// Saves classifier weights to `{stem}.bin`.
///
/// The previous checkpoint at the same stem, if any, is replaced
/// atomically. This is how the trainer keeps exactly one best model
/// across all folds.
///
/// # Errors
///
/// Returns `ModelError::SaveCheckpoint` if recording fails,
/// `ModelError::Io` if the parent directory cannot be created or the
/// rename fails.
pub fn save_checkpoint<B, M>(model: &M, stem: &Path) -> Result<PathBuf>
where
    B: Backend,
    M: Module<B>,
{
    if let Some(parent) = stem.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    // The recorder appends ".bin" to whatever stem it is handed, so the
    // scratch stem carries a "-partial" suffix rather than an extension.
    let mut partial = stem.as_os_str().to_owned();
    partial.push("-partial");
    let partial = PathBuf::from(partial);

    let record = model.clone().into_record();
    let recorder = BinFileRecorder::<FullPrecisionSettings>::new();
    recorder
        .record(record, partial.clone())
        .map_err(|e| ModelError::save_checkpoint(stem.display().to_string(), e.to_string()))?;

    let final_path = checkpoint_path(stem);
    fs::rename(checkpoint_path(&partial), &final_path)?;
    Ok(final_path)
}

/// Loads classifier weights from `{stem}.bin` into `model`.
///
/// The model must be built from the same configuration that produced
/// the checkpoint; a record whose shapes disagree with the model is
/// reported as a mismatch rather than silently truncated.
///
/// # Errors
///
/// Returns `ModelError::CheckpointNotFound` if no file exists at the
/// stem, `ModelError::LoadMismatch` if the recorded weights do not fit
/// the model.
pub fn load_checkpoint<B, M>(model: M, stem: &Path, device: &B::Device) -> Result<M>
where
    B: Backend,
    M: Module<B>,
{
    let path = checkpoint_path(stem);
    if !path.exists() {
        return Err(ModelError::checkpoint_not_found(path.display().to_string()));
    }

    let recorder = BinFileRecorder::<FullPrecisionSettings>::new();
    model
        .load_file(stem, &recorder, device)
        .map_err(|e| ModelError::load_mismatch(path.display().to_string(), e.to_string()))
}
