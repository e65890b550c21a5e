//! Host-side feature and label tensors.
//!
//! Both tensors store their values as flat `Vec<f32>` buffers with
//! explicit dimensions, the standard host format before handing data
//! to a backend. Features and labels are index-aligned by sample and
//! are never reordered independently after creation.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TypesError};

/// Per-frame feature vectors for a set of clips, shape `(N, F, D)`.
///
/// Layout is row-major: sample-major, then frame, then feature.
///
/// # Example
///
/// ```
/// use fer_types::FeatureTensor;
///
/// let features = FeatureTensor::zeros(3, 10, 8);
/// assert_eq!(features.dims(), (3, 10, 8));
/// assert_eq!(features.sample(0).len(), 10 * 8);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureTensor {
    /// Flat feature values, length `samples * frames * dim`.
    data: Vec<f32>,

    /// Number of samples (clips).
    samples: usize,

    /// Frames per sample.
    frames: usize,

    /// Features per frame.
    dim: usize,
}

impl FeatureTensor {
    /// Creates a feature tensor from a flat buffer.
    ///
    /// # Errors
    ///
    /// Returns `TypesError::InvalidDimensions` if any axis is zero, or
    /// `TypesError::LengthMismatch` if the buffer length does not equal
    /// `samples * frames * dim`.
    pub fn new(data: Vec<f32>, samples: usize, frames: usize, dim: usize) -> Result<Self> {
        if samples == 0 || frames == 0 || dim == 0 {
            return Err(TypesError::invalid_dimensions(samples, frames, dim));
        }
        let expected = samples * frames * dim;
        if data.len() != expected {
            return Err(TypesError::length_mismatch(expected, data.len()));
        }
        Ok(Self {
            data,
            samples,
            frames,
            dim,
        })
    }

    /// Creates a zero-filled feature tensor.
    #[must_use]
    pub fn zeros(samples: usize, frames: usize, dim: usize) -> Self {
        Self {
            data: vec![0.0; samples * frames * dim],
            samples,
            frames,
            dim,
        }
    }

    /// Returns the dimensions as `(samples, frames, dim)`.
    #[must_use]
    pub const fn dims(&self) -> (usize, usize, usize) {
        (self.samples, self.frames, self.dim)
    }

    /// Returns the number of samples.
    #[must_use]
    pub const fn num_samples(&self) -> usize {
        self.samples
    }

    /// Returns the number of frames per sample.
    #[must_use]
    pub const fn num_frames(&self) -> usize {
        self.frames
    }

    /// Returns the number of features per frame.
    #[must_use]
    pub const fn feature_dim(&self) -> usize {
        self.dim
    }

    /// Returns the flat underlying buffer.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Returns one sample's `frames * dim` values.
    ///
    /// # Panics
    ///
    /// Panics if `sample >= num_samples()`.
    #[must_use]
    pub fn sample(&self, sample: usize) -> &[f32] {
        let stride = self.frames * self.dim;
        &self.data[sample * stride..(sample + 1) * stride]
    }

    /// Returns one frame's `dim` values.
    ///
    /// # Panics
    ///
    /// Panics if `sample` or `frame` is out of range.
    #[must_use]
    pub fn frame(&self, sample: usize, frame: usize) -> &[f32] {
        let start = (sample * self.frames + frame) * self.dim;
        &self.data[start..start + self.dim]
    }

    /// Gathers the given samples into a new tensor, in index order.
    ///
    /// This is how fold partitions slice the dataset: the returned
    /// tensor holds copies of the selected rows, the source is not
    /// mutated.
    ///
    /// # Errors
    ///
    /// Returns `TypesError::ShapeMismatch` for an out-of-range index.
    pub fn select(&self, indices: &[usize]) -> Result<Self> {
        let stride = self.frames * self.dim;
        let mut data = Vec::with_capacity(indices.len() * stride);
        for &i in indices {
            if i >= self.samples {
                return Err(TypesError::shape_mismatch(
                    format!("sample index < {}", self.samples),
                    format!("index {i}"),
                ));
            }
            data.extend_from_slice(self.sample(i));
        }
        Self::new(data, indices.len(), self.frames, self.dim)
    }

    /// Returns true if every value is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }
}

/// One-hot encoded emotion labels, shape `(N, C)`.
///
/// Index-aligned with a [`FeatureTensor`] of the same sample count.
///
/// # Example
///
/// ```
/// use fer_types::LabelTensor;
///
/// let labels = LabelTensor::from_classes(&[0, 2, 1], 3).unwrap();
/// assert_eq!(labels.num_samples(), 3);
/// assert_eq!(labels.class_indices(), vec![0, 2, 1]);
/// assert_eq!(labels.one_hot(1), &[0.0, 0.0, 1.0]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelTensor {
    /// Flat one-hot values, length `samples * classes`.
    data: Vec<f32>,

    /// Number of samples.
    samples: usize,

    /// Number of classes.
    classes: usize,
}

impl LabelTensor {
    /// Builds one-hot labels from class indices.
    ///
    /// # Errors
    ///
    /// Returns `TypesError::InvalidClassIndex` if any index is out of
    /// range, or `TypesError::InvalidDimensions` for an empty label set.
    pub fn from_classes(classes: &[usize], num_classes: usize) -> Result<Self> {
        if classes.is_empty() || num_classes == 0 {
            return Err(TypesError::invalid_dimensions(
                classes.len(),
                1,
                num_classes,
            ));
        }
        let mut data = vec![0.0; classes.len() * num_classes];
        for (row, &class) in classes.iter().enumerate() {
            if class >= num_classes {
                return Err(TypesError::invalid_class_index(class, num_classes));
            }
            data[row * num_classes + class] = 1.0;
        }
        Ok(Self {
            data,
            samples: classes.len(),
            classes: num_classes,
        })
    }

    /// Returns the number of samples.
    #[must_use]
    pub const fn num_samples(&self) -> usize {
        self.samples
    }

    /// Returns the number of classes.
    #[must_use]
    pub const fn num_classes(&self) -> usize {
        self.classes
    }

    /// Returns one sample's one-hot row.
    ///
    /// # Panics
    ///
    /// Panics if `sample >= num_samples()`.
    #[must_use]
    pub fn one_hot(&self, sample: usize) -> &[f32] {
        &self.data[sample * self.classes..(sample + 1) * self.classes]
    }

    /// Returns the class index of one sample (argmax of its row).
    ///
    /// # Panics
    ///
    /// Panics if `sample >= num_samples()`.
    #[must_use]
    pub fn class_of(&self, sample: usize) -> usize {
        let row = self.one_hot(sample);
        let mut best = 0;
        for (i, &v) in row.iter().enumerate() {
            if v > row[best] {
                best = i;
            }
        }
        best
    }

    /// Returns all class indices in sample order.
    #[must_use]
    pub fn class_indices(&self) -> Vec<usize> {
        (0..self.samples).map(|i| self.class_of(i)).collect()
    }

    /// Gathers the given samples into a new label tensor, in index order.
    ///
    /// # Errors
    ///
    /// Returns `TypesError::ShapeMismatch` for an out-of-range index.
    pub fn select(&self, indices: &[usize]) -> Result<Self> {
        let mut data = Vec::with_capacity(indices.len() * self.classes);
        for &i in indices {
            if i >= self.samples {
                return Err(TypesError::shape_mismatch(
                    format!("sample index < {}", self.samples),
                    format!("index {i}"),
                ));
            }
            data.extend_from_slice(self.one_hot(i));
        }
        Ok(Self {
            data,
            samples: indices.len(),
            classes: self.classes,
        })
    }

    /// Counts samples per class.
    #[must_use]
    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.classes];
        for i in 0..self.samples {
            counts[self.class_of(i)] += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_tensor_new() {
        let tensor = FeatureTensor::new(vec![0.5; 3 * 10 * 4], 3, 10, 4).unwrap();
        assert_eq!(tensor.dims(), (3, 10, 4));
        assert_eq!(tensor.num_samples(), 3);
        assert_eq!(tensor.num_frames(), 10);
        assert_eq!(tensor.feature_dim(), 4);
    }

    #[test]
    fn feature_tensor_bad_length() {
        let err = FeatureTensor::new(vec![0.5; 10], 3, 10, 4).unwrap_err();
        assert!(matches!(err, TypesError::LengthMismatch { .. }));
    }

    #[test]
    fn feature_tensor_zero_axis() {
        let err = FeatureTensor::new(vec![], 0, 10, 4).unwrap_err();
        assert!(matches!(err, TypesError::InvalidDimensions { .. }));
    }

    #[test]
    fn feature_tensor_sample_and_frame() {
        let data: Vec<f32> = (0..2 * 3 * 2).map(|v| v as f32).collect();
        let tensor = FeatureTensor::new(data, 2, 3, 2).unwrap();

        assert_eq!(tensor.sample(0), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(tensor.frame(1, 0), &[6.0, 7.0]);
        assert_eq!(tensor.frame(1, 2), &[10.0, 11.0]);
    }

    #[test]
    fn feature_tensor_select() {
        let data: Vec<f32> = (0..4 * 2 * 2).map(|v| v as f32).collect();
        let tensor = FeatureTensor::new(data, 4, 2, 2).unwrap();

        let picked = tensor.select(&[3, 1]).unwrap();
        assert_eq!(picked.dims(), (2, 2, 2));
        assert_eq!(picked.sample(0), tensor.sample(3));
        assert_eq!(picked.sample(1), tensor.sample(1));
    }

    #[test]
    fn feature_tensor_select_out_of_range() {
        let tensor = FeatureTensor::zeros(2, 2, 2);
        assert!(tensor.select(&[0, 2]).is_err());
    }

    #[test]
    fn feature_tensor_is_finite() {
        let mut data = vec![0.5; 8];
        let tensor = FeatureTensor::new(data.clone(), 2, 2, 2).unwrap();
        assert!(tensor.is_finite());

        data[3] = f32::NAN;
        let tensor = FeatureTensor::new(data, 2, 2, 2).unwrap();
        assert!(!tensor.is_finite());
    }

    #[test]
    fn label_tensor_from_classes() {
        let labels = LabelTensor::from_classes(&[0, 2, 1], 3).unwrap();
        assert_eq!(labels.num_samples(), 3);
        assert_eq!(labels.num_classes(), 3);
        assert_eq!(labels.one_hot(0), &[1.0, 0.0, 0.0]);
        assert_eq!(labels.one_hot(1), &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn label_tensor_out_of_range_class() {
        let err = LabelTensor::from_classes(&[0, 3], 3).unwrap_err();
        assert!(matches!(err, TypesError::InvalidClassIndex { .. }));
    }

    #[test]
    fn label_tensor_class_indices() {
        let classes = vec![5, 0, 3, 3, 1];
        let labels = LabelTensor::from_classes(&classes, 6).unwrap();
        assert_eq!(labels.class_indices(), classes);
    }

    #[test]
    fn label_tensor_class_counts() {
        let labels = LabelTensor::from_classes(&[0, 1, 1, 2, 2, 2], 3).unwrap();
        assert_eq!(labels.class_counts(), vec![1, 2, 3]);
    }

    #[test]
    fn label_tensor_select() {
        let labels = LabelTensor::from_classes(&[0, 1, 2], 3).unwrap();
        let picked = labels.select(&[2, 0]).unwrap();
        assert_eq!(picked.class_indices(), vec![2, 0]);
    }

    #[test]
    fn tensor_serialization() {
        let tensor = FeatureTensor::zeros(2, 3, 4);
        let json = serde_json::to_string(&tensor);
        assert!(json.is_ok());

        let parsed: std::result::Result<FeatureTensor, _> =
            serde_json::from_str(&json.unwrap_or_default());
        assert!(parsed.is_ok());
        assert_eq!(parsed.unwrap(), tensor);
    }
}
