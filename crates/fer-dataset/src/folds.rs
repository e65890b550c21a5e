//! Deterministic stratified K-fold partitioning.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DatasetError, Result};

/// One train/test split over the dataset's index space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fold {
    /// Training sample indices, ascending.
    pub train: Vec<usize>,

    /// Held-out test sample indices, ascending.
    pub test: Vec<usize>,
}

impl Fold {
    /// Returns true if train and test are disjoint.
    #[must_use]
    pub fn is_disjoint(&self) -> bool {
        // Both sides are sorted; a merge-walk finds any overlap.
        let mut t = self.test.iter().peekable();
        for &i in &self.train {
            while t.next_if(|&&j| j < i).is_some() {}
            if t.peek() == Some(&&i) {
                return false;
            }
        }
        true
    }
}

/// An ordered list of K stratified train/test splits.
///
/// The assignment is a pure function of the label vector and K: no
/// shuffling, no RNG. Per class, indices are taken in dataset order
/// and cut into K contiguous chunks whose sizes differ by at most one
/// (larger chunks first); fold `j`'s test set is the sorted union of
/// chunk `j` of every class. Re-invoking with identical labels and K
/// reproduces bit-identical assignments, which is what lets a later
/// evaluation run select the exact test samples held out in training.
///
/// # Example
///
/// ```
/// use fer_dataset::FoldPartition;
///
/// let labels = vec![0, 0, 0, 0, 1, 1, 1, 1];
/// let partition = FoldPartition::stratified(&labels, 2).unwrap();
///
/// assert_eq!(partition.num_folds(), 2);
/// assert_eq!(partition.fold(0).unwrap().test, vec![0, 1, 4, 5]);
/// assert_eq!(partition.fold(1).unwrap().test, vec![2, 3, 6, 7]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoldPartition {
    folds: Vec<Fold>,
    num_samples: usize,
}

impl FoldPartition {
    /// Builds a stratified K-fold partition over a class-index vector.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::InvalidFoldCount` if `k < 2`, if the
    /// label vector is empty, or if `k` exceeds the smallest class
    /// count (a fold would otherwise see none of that class).
    pub fn stratified(labels: &[usize], k: usize) -> Result<Self> {
        if k < 2 {
            return Err(DatasetError::invalid_fold_count(k, "need at least 2 folds"));
        }
        if labels.is_empty() {
            return Err(DatasetError::invalid_fold_count(k, "no samples to split"));
        }

        // Group sample indices per class, preserving dataset order.
        let num_classes = labels.iter().max().map_or(0, |&c| c + 1);
        let mut by_class: Vec<Vec<usize>> = vec![Vec::new(); num_classes];
        for (i, &class) in labels.iter().enumerate() {
            by_class[class].push(i);
        }

        let min_count = by_class
            .iter()
            .filter(|v| !v.is_empty())
            .map(Vec::len)
            .min()
            .unwrap_or(0);
        if min_count < k {
            return Err(DatasetError::invalid_fold_count(
                k,
                format!("smallest class has only {min_count} samples"),
            ));
        }

        // Per class, cut the in-order indices into k contiguous chunks
        // with sizes differing by at most one, larger chunks first.
        let mut test_sets: Vec<Vec<usize>> = vec![Vec::new(); k];
        for indices in by_class.iter().filter(|v| !v.is_empty()) {
            let base = indices.len() / k;
            let remainder = indices.len() % k;
            let mut start = 0;
            for (j, test) in test_sets.iter_mut().enumerate() {
                let size = base + usize::from(j < remainder);
                test.extend_from_slice(&indices[start..start + size]);
                start += size;
            }
        }

        let folds = test_sets
            .into_iter()
            .map(|mut test| {
                test.sort_unstable();
                let mut in_test = vec![false; labels.len()];
                for &i in &test {
                    in_test[i] = true;
                }
                let train = (0..labels.len()).filter(|&i| !in_test[i]).collect();
                Fold { train, test }
            })
            .collect();

        Ok(Self {
            folds,
            num_samples: labels.len(),
        })
    }

    /// Returns the number of folds.
    #[must_use]
    pub fn num_folds(&self) -> usize {
        self.folds.len()
    }

    /// Returns the number of samples the partition covers.
    #[must_use]
    pub const fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Returns one fold.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::FoldOutOfRange` if `index` is invalid.
    pub fn fold(&self, index: usize) -> Result<&Fold> {
        self.folds
            .get(index)
            .ok_or_else(|| DatasetError::fold_out_of_range(index, self.folds.len()))
    }

    /// Iterates over the folds in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Fold> {
        self.folds.iter()
    }

    /// Persists the partition as JSON.
    ///
    /// The training run writes this next to the checkpoint so the
    /// evaluation run can reuse the recorded assignment instead of
    /// regenerating it.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::Io` if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = path.with_extension("partial");
        {
            let file = File::create(&tmp)?;
            serde_json::to_writer(BufWriter::new(file), self)?;
        }
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Loads a previously persisted partition.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::Io` or `DatasetError::Serialization`.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

impl<'a> IntoIterator for &'a FoldPartition {
    type Item = &'a Fold;
    type IntoIter = std::slice::Iter<'a, Fold>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Label vector with `per_class` samples of each class, interleaved
    /// in a seeded but fixed order.
    fn synthetic_labels(classes: usize, per_class: usize, seed: u64) -> Vec<usize> {
        let mut labels: Vec<usize> = (0..classes)
            .flat_map(|c| std::iter::repeat(c).take(per_class))
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        labels.shuffle(&mut rng);
        labels
    }

    #[test]
    fn partition_rejects_small_k() {
        let labels = vec![0, 0, 1, 1];
        let err = FoldPartition::stratified(&labels, 1).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidFoldCount { .. }));
    }

    #[test]
    fn partition_rejects_k_above_min_class() {
        // Class 1 has only 2 samples; k=3 is unusable.
        let labels = vec![0, 0, 0, 1, 1];
        let err = FoldPartition::stratified(&labels, 3).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidFoldCount { .. }));
    }

    #[test]
    fn partition_rejects_empty_labels() {
        let err = FoldPartition::stratified(&[], 2).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidFoldCount { .. }));
    }

    #[test]
    fn partition_exact_coverage() {
        for k in 2..=5 {
            let labels = synthetic_labels(4, 7, 11);
            let partition = FoldPartition::stratified(&labels, k).unwrap();

            // Union of test sets covers each index exactly once.
            let mut seen = vec![0_usize; labels.len()];
            for fold in &partition {
                assert!(fold.is_disjoint());
                assert_eq!(fold.train.len() + fold.test.len(), labels.len());
                for &i in &fold.test {
                    seen[i] += 1;
                }
            }
            assert!(seen.iter().all(|&c| c == 1), "k={k}: coverage broken");
        }
    }

    #[test]
    fn partition_deterministic() {
        let labels = synthetic_labels(6, 9, 3);
        let a = FoldPartition::stratified(&labels, 5).unwrap();
        let b = FoldPartition::stratified(&labels, 5).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn partition_stratified_within_one_sample() {
        let k = 5;
        let labels = synthetic_labels(6, 9, 42);
        let partition = FoldPartition::stratified(&labels, k).unwrap();

        for fold in &partition {
            for class in 0..6 {
                let total = labels.iter().filter(|&&c| c == class).count();
                let in_test = fold.test.iter().filter(|&&i| labels[i] == class).count();
                let ideal = total as f64 / k as f64;
                assert!(
                    (in_test as f64 - ideal).abs() <= 1.0,
                    "class {class}: {in_test} in test, ideal {ideal}"
                );
            }
        }
    }

    #[test]
    fn partition_indices_sorted() {
        let labels = synthetic_labels(3, 8, 7);
        let partition = FoldPartition::stratified(&labels, 4).unwrap();

        for fold in &partition {
            assert!(fold.test.windows(2).all(|w| w[0] < w[1]));
            assert!(fold.train.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn partition_contiguous_per_class_chunks() {
        // 8 of class 0 then 4 of class 1: fold 0 must take the first
        // in-order chunk of each class.
        let labels = vec![0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1];
        let partition = FoldPartition::stratified(&labels, 2).unwrap();

        assert_eq!(partition.fold(0).unwrap().test, vec![0, 1, 2, 3, 8, 9]);
        assert_eq!(partition.fold(1).unwrap().test, vec![4, 5, 6, 7, 10, 11]);
    }

    #[test]
    fn partition_remainder_goes_to_early_folds() {
        // 7 samples of one class into 3 folds: sizes 3, 2, 2.
        let labels = vec![0; 7];
        // Single class is fine for the chunking itself; add a second
        // class so the partition is valid.
        let labels: Vec<usize> = labels.into_iter().chain(vec![1; 7]).collect();
        let partition = FoldPartition::stratified(&labels, 3).unwrap();

        let sizes: Vec<usize> = partition.iter().map(|f| f.test.len()).collect();
        assert_eq!(sizes, vec![6, 4, 4]);
    }

    #[test]
    fn partition_fold_out_of_range() {
        let labels = vec![0, 0, 1, 1];
        let partition = FoldPartition::stratified(&labels, 2).unwrap();
        let err = partition.fold(2).unwrap_err();
        assert!(matches!(err, DatasetError::FoldOutOfRange { .. }));
    }

    #[test]
    fn partition_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partition.json");

        let labels = synthetic_labels(4, 6, 5);
        let partition = FoldPartition::stratified(&labels, 3).unwrap();
        partition.save(&path).unwrap();

        let loaded = FoldPartition::load(&path).unwrap();
        assert_eq!(loaded, partition);
    }

    #[test]
    fn fold_is_disjoint_detects_overlap() {
        let fold = Fold {
            train: vec![0, 1, 2],
            test: vec![2, 3],
        };
        assert!(!fold.is_disjoint());
    }
}
