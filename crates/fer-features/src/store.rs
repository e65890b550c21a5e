//! Disk memoization of extracted feature tensors.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use fer_types::{Clip, FeatureTensor, LabelTensor};

use crate::error::{FeatureError, Result};
use crate::extractor::FeatureExtractor;

/// A cached feature tensor keyed by a fixed on-disk path.
///
/// Presence of the file signals "skip extraction". Writes go to a
/// sibling temp file and are renamed into place, so a crash mid-write
/// never leaves a partially written tensor readable by a later run.
///
/// # Example
///
/// ```no_run
/// use fer_features::FeatureStore;
/// use fer_types::FeatureTensor;
///
/// let store = FeatureStore::new("data/fused-features.bin");
/// store.save(&FeatureTensor::zeros(3, 10, 8)).unwrap();
///
/// let cached = store.load().unwrap();
/// assert_eq!(cached.dims(), (3, 10, 8));
/// ```
#[derive(Debug, Clone)]
pub struct FeatureStore {
    path: PathBuf,
}

impl FeatureStore {
    /// Creates a store for the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the store's path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if a cached tensor exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Loads the cached tensor.
    ///
    /// # Errors
    ///
    /// Returns `FeatureError::MissingArtifact` if the file is absent,
    /// `FeatureError::Serialization` if it cannot be decoded.
    pub fn load(&self) -> Result<FeatureTensor> {
        if !self.exists() {
            return Err(FeatureError::missing_artifact(self.path.display().to_string()));
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let tensor: FeatureTensor = bincode::deserialize_from(reader)
            .map_err(|e| FeatureError::serialization(e.to_string()))?;

        debug!(path = %self.path.display(), dims = ?tensor.dims(), "loaded cached features");
        Ok(tensor)
    }

    /// Saves a tensor, replacing any previous cache.
    ///
    /// # Errors
    ///
    /// Returns `FeatureError::Io` if the file cannot be written.
    pub fn save(&self, tensor: &FeatureTensor) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Write-to-temp-then-rename keeps the cache readable under crashes.
        let tmp = self.path.with_extension("partial");
        {
            let file = File::create(&tmp)?;
            let writer = BufWriter::new(file);
            bincode::serialize_into(writer, tensor)
                .map_err(|e| FeatureError::serialization(e.to_string()))?;
        }
        fs::rename(&tmp, &self.path)?;

        debug!(path = %self.path.display(), dims = ?tensor.dims(), "cached features");
        Ok(())
    }

    /// Loads the cached tensor, or extracts and caches it when absent.
    ///
    /// This is the missing-artifact recovery path: a missing cache is
    /// not fatal, the tensor is recomputed from the raw clips.
    ///
    /// # Errors
    ///
    /// Propagates extraction and IO failures.
    pub fn load_or_extract<E: FeatureExtractor + ?Sized>(
        &self,
        extractor: &E,
        clips: &[Clip],
    ) -> Result<FeatureTensor> {
        match self.load() {
            Ok(tensor) => Ok(tensor),
            Err(FeatureError::MissingArtifact(_)) => {
                info!(
                    path = %self.path.display(),
                    "feature cache absent, extracting from {} clips",
                    clips.len()
                );
                let tensor = extractor.extract(clips)?;
                self.save(&tensor)?;
                Ok(tensor)
            }
            Err(e) => Err(e),
        }
    }
}

/// A cached label tensor keyed by a fixed on-disk path.
///
/// Same discipline as [`FeatureStore`]: presence signals "skip
/// extraction", writes are temp-then-rename.
#[derive(Debug, Clone)]
pub struct LabelStore {
    path: PathBuf,
}

impl LabelStore {
    /// Creates a store for the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns true if a cached label tensor exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Loads the cached labels.
    ///
    /// # Errors
    ///
    /// Returns `FeatureError::MissingArtifact` if the file is absent,
    /// `FeatureError::Serialization` if it cannot be decoded.
    pub fn load(&self) -> Result<LabelTensor> {
        if !self.exists() {
            return Err(FeatureError::missing_artifact(self.path.display().to_string()));
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        bincode::deserialize_from(reader).map_err(|e| FeatureError::serialization(e.to_string()))
    }

    /// Saves labels, replacing any previous cache.
    ///
    /// # Errors
    ///
    /// Returns `FeatureError::Io` if the file cannot be written.
    pub fn save(&self, labels: &LabelTensor) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("partial");
        {
            let file = File::create(&tmp)?;
            let writer = BufWriter::new(file);
            bincode::serialize_into(writer, labels)
                .map_err(|e| FeatureError::serialization(e.to_string()))?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Loads the cached labels, or derives and caches them from clips.
    ///
    /// # Errors
    ///
    /// Propagates IO and encoding failures.
    pub fn load_or_derive(&self, clips: &[Clip], num_classes: usize) -> Result<LabelTensor> {
        match self.load() {
            Ok(labels) => Ok(labels),
            Err(FeatureError::MissingArtifact(_)) => {
                let classes: Vec<usize> = clips.iter().map(|c| c.emotion.index()).collect();
                let labels = LabelTensor::from_classes(&classes, num_classes)
                    .map_err(|e| FeatureError::extraction(e.to_string()))?;
                self.save(&labels)?;
                Ok(labels)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fer_types::{Emotion, Frame};

    struct Zeros(usize);

    impl FeatureExtractor for Zeros {
        fn feature_dim(&self) -> usize {
            self.0
        }

        fn extract(&self, clips: &[Clip]) -> Result<FeatureTensor> {
            let frames = clips.first().map_or(0, Clip::num_frames);
            Ok(FeatureTensor::zeros(clips.len(), frames, self.0))
        }
    }

    fn test_clips(n: usize) -> Vec<Clip> {
        (0..n)
            .map(|i| {
                Clip::new(
                    i as u64,
                    Emotion::Happiness,
                    vec![Frame::new(vec![0; 4], 2, 2); 5],
                )
            })
            .collect()
    }

    #[test]
    fn store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FeatureStore::new(dir.path().join("features.bin"));

        assert!(!store.exists());

        let tensor = FeatureTensor::new((0..24).map(|v| v as f32).collect(), 2, 3, 4).unwrap();
        store.save(&tensor).unwrap();

        assert!(store.exists());
        assert_eq!(store.load().unwrap(), tensor);
    }

    #[test]
    fn store_load_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FeatureStore::new(dir.path().join("absent.bin"));

        let err = store.load().unwrap_err();
        assert!(matches!(err, FeatureError::MissingArtifact(_)));
    }

    #[test]
    fn store_load_or_extract_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = FeatureStore::new(dir.path().join("features.bin"));
        let clips = test_clips(3);

        let tensor = store.load_or_extract(&Zeros(7), &clips).unwrap();
        assert_eq!(tensor.dims(), (3, 5, 7));

        // Second call must hit the cache, not the extractor.
        assert!(store.exists());
        let cached = store.load_or_extract(&Zeros(7), &[]).unwrap();
        assert_eq!(cached, tensor);
    }

    #[test]
    fn store_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = FeatureStore::new(dir.path().join("nested/deep/features.bin"));

        store.save(&FeatureTensor::zeros(1, 2, 3)).unwrap();
        assert!(store.exists());
    }

    #[test]
    fn store_leaves_no_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FeatureStore::new(dir.path().join("features.bin"));

        store.save(&FeatureTensor::zeros(1, 2, 3)).unwrap();
        assert!(!dir.path().join("features.partial").exists());
    }

    #[test]
    fn label_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LabelStore::new(dir.path().join("labels.bin"));

        let labels = LabelTensor::from_classes(&[0, 1, 2, 1], 3).unwrap();
        store.save(&labels).unwrap();
        assert_eq!(store.load().unwrap(), labels);
    }

    #[test]
    fn label_store_derives_from_clips() {
        let dir = tempfile::tempdir().unwrap();
        let store = LabelStore::new(dir.path().join("labels.bin"));
        let clips = test_clips(4);

        let labels = store.load_or_derive(&clips, Emotion::COUNT).unwrap();
        assert_eq!(labels.num_samples(), 4);
        assert_eq!(
            labels.class_indices(),
            vec![Emotion::Happiness.index(); 4]
        );
        assert!(store.exists());
    }

    #[test]
    fn store_corrupt_file_is_not_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("features.bin");
        fs::write(&path, b"not a tensor").unwrap();

        let store = FeatureStore::new(&path);
        let err = store.load().unwrap_err();
        assert!(matches!(err, FeatureError::Serialization(_)));
    }
}
