//! The index-aligned dataset.

use serde::{Deserialize, Serialize};

use fer_types::{FeatureTensor, LabelTensor};

use crate::error::{DatasetError, Result};

/// Fused features paired with one-hot labels.
///
/// The two tensors are index-aligned by sample and are never reordered
/// independently after creation; components receive the dataset by
/// reference and slice it through fold indices instead of mutating it.
///
/// # Example
///
/// ```
/// use fer_dataset::Dataset;
/// use fer_types::{FeatureTensor, LabelTensor};
///
/// let features = FeatureTensor::zeros(4, 10, 16);
/// let labels = LabelTensor::from_classes(&[0, 1, 0, 1], 2).unwrap();
///
/// let dataset = Dataset::new(features, labels).unwrap();
/// assert_eq!(dataset.num_samples(), 4);
/// assert_eq!(dataset.class_indices(), vec![0, 1, 0, 1]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    features: FeatureTensor,
    labels: LabelTensor,
}

impl Dataset {
    /// Pairs features with labels.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::Misaligned` if the sample counts differ,
    /// `DatasetError::EmptyDataset` if there are no samples.
    pub fn new(features: FeatureTensor, labels: LabelTensor) -> Result<Self> {
        if features.num_samples() != labels.num_samples() {
            return Err(DatasetError::misaligned(
                features.num_samples(),
                labels.num_samples(),
            ));
        }
        if features.num_samples() == 0 {
            return Err(DatasetError::EmptyDataset);
        }
        Ok(Self { features, labels })
    }

    /// Returns the number of samples.
    #[must_use]
    pub const fn num_samples(&self) -> usize {
        self.features.num_samples()
    }

    /// Returns the number of emotion classes.
    #[must_use]
    pub const fn num_classes(&self) -> usize {
        self.labels.num_classes()
    }

    /// Returns the feature tensor.
    #[must_use]
    pub const fn features(&self) -> &FeatureTensor {
        &self.features
    }

    /// Returns the label tensor.
    #[must_use]
    pub const fn labels(&self) -> &LabelTensor {
        &self.labels
    }

    /// Returns every sample's class index, in dataset order.
    ///
    /// This is the label vector the fold partitioner stratifies on.
    #[must_use]
    pub fn class_indices(&self) -> Vec<usize> {
        self.labels.class_indices()
    }
}
