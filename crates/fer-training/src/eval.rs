//! Held-out evaluation and the confusion matrix.

use std::fmt;

use burn::prelude::Backend;
use serde::{Deserialize, Serialize};

use fer_dataset::{Dataset, FoldPartition};
use fer_models::EmotionClassifier;
use fer_types::FeatureTensor;

use crate::batch::{batch_ranges, sequence_batch};
use crate::error::{Result, TrainError};

/// Square matrix of actual class (rows) against predicted class
/// (columns).
///
/// # Example
///
/// ```
/// use fer_training::ConfusionMatrix;
///
/// let mut matrix = ConfusionMatrix::new(2);
/// matrix.record(0, 0);
/// matrix.record(0, 1);
/// matrix.record(1, 1);
///
/// assert_eq!(matrix.count(0, 1), 1);
/// assert!((matrix.accuracy() - 2.0 / 3.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    classes: usize,
    counts: Vec<usize>,
}

impl ConfusionMatrix {
    /// Creates an empty matrix for the given class count.
    #[must_use]
    pub fn new(classes: usize) -> Self {
        Self {
            classes,
            counts: vec![0; classes * classes],
        }
    }

    /// Builds a matrix from aligned actual/predicted class pairs.
    ///
    /// # Errors
    ///
    /// Returns `TrainError::Tensor` if the slices differ in length or
    /// any class index is out of range.
    pub fn from_pairs(actual: &[usize], predicted: &[usize], classes: usize) -> Result<Self> {
        if actual.len() != predicted.len() {
            return Err(TrainError::tensor(format!(
                "{} actual labels vs {} predictions",
                actual.len(),
                predicted.len()
            )));
        }
        let mut matrix = Self::new(classes);
        for (&a, &p) in actual.iter().zip(predicted) {
            if a >= classes || p >= classes {
                return Err(TrainError::tensor(format!(
                    "class index out of range: actual {a}, predicted {p}, classes {classes}"
                )));
            }
            matrix.record(a, p);
        }
        Ok(matrix)
    }

    /// Records one observation.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn record(&mut self, actual: usize, predicted: usize) {
        self.counts[actual * self.classes + predicted] += 1;
    }

    /// Returns the count for one cell.
    #[must_use]
    pub fn count(&self, actual: usize, predicted: usize) -> usize {
        self.counts[actual * self.classes + predicted]
    }

    /// Returns the number of classes.
    #[must_use]
    pub const fn num_classes(&self) -> usize {
        self.classes
    }

    /// Returns the total number of observations.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Returns the fraction of observations on the diagonal.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn accuracy(&self) -> f32 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let correct: usize = (0..self.classes).map(|c| self.count(c, c)).sum();
        correct as f32 / total as f32
    }

    /// Returns the matrix with each row normalized to sum to one.
    ///
    /// Rows with no observations stay all-zero.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn row_normalized(&self) -> Vec<f32> {
        let mut out = vec![0.0; self.counts.len()];
        for row in 0..self.classes {
            let row_total: usize = (0..self.classes).map(|col| self.count(row, col)).sum();
            if row_total == 0 {
                continue;
            }
            for col in 0..self.classes {
                out[row * self.classes + col] =
                    self.count(row, col) as f32 / row_total as f32;
            }
        }
        out
    }

    /// Formats the row-normalized matrix with class names on the rows.
    ///
    /// # Panics
    ///
    /// Panics if `names` is shorter than the class count.
    #[must_use]
    #[allow(clippy::let_underscore_must_use)] // String::write_fmt is infallible
    pub fn to_table(&self, names: &[&str]) -> String {
        use std::fmt::Write;

        let width = names.iter().map(|n| n.len()).max().unwrap_or(0).max(9);
        let normalized = self.row_normalized();
        let mut s = String::new();
        let _ = write!(s, "{:width$}", "");
        for name in &names[..self.classes] {
            let _ = write!(s, " {name:>width$}");
        }
        let _ = writeln!(s);
        for row in 0..self.classes {
            let _ = write!(s, "{:width$}", names[row]);
            for col in 0..self.classes {
                let _ = write!(s, " {:>width$.3}", normalized[row * self.classes + col]);
            }
            let _ = writeln!(s);
        }
        s
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let normalized = self.row_normalized();
        for row in 0..self.classes {
            for col in 0..self.classes {
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{:.3}", normalized[row * self.classes + col])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Outcome of evaluating a model on one fold's held-out split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalReport {
    /// Fold whose test split was evaluated.
    pub fold: usize,

    /// Number of held-out samples.
    pub num_samples: usize,

    /// Overall accuracy on the split.
    pub accuracy: f32,

    /// Full actual-vs-predicted breakdown.
    pub confusion: ConfusionMatrix,
}

/// Runs the model over a feature tensor and returns predicted classes.
///
/// Inference happens in mini-batches so large datasets never
/// materialize one giant activation tensor.
///
/// # Errors
///
/// Returns `TrainError::Tensor` if logits cannot be read back to the
/// host.
pub fn predict_classes<B: Backend>(
    model: &EmotionClassifier<B>,
    features: &FeatureTensor,
    batch_size: usize,
    device: &B::Device,
) -> Result<Vec<usize>> {
    if features.num_samples() == 0 {
        return Ok(Vec::new());
    }
    let num_classes = {
        // One forward pass fixes the logit width.
        let probe = sequence_batch::<B>(features, 0, 1, device);
        model.forward(probe).dims()[1]
    };

    let mut predictions = Vec::with_capacity(features.num_samples());
    for (start, end) in batch_ranges(features.num_samples(), batch_size) {
        let batch = sequence_batch::<B>(features, start, end, device);
        let logits = model.forward(batch);
        let data = logits
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| TrainError::tensor(format!("{e:?}")))?;
        predictions.extend(argmax_rows(&data, num_classes));
    }
    Ok(predictions)
}

/// Evaluates a model on one fold's held-out split.
///
/// The partition must be the one the model was trained against; that
/// is what makes the reported accuracy a true held-out number.
///
/// # Errors
///
/// Returns `DatasetError::FoldOutOfRange` via `TrainError::Dataset`
/// for a bad fold index, or `TrainError::Tensor` on readback failure.
pub fn evaluate<B: Backend>(
    model: &EmotionClassifier<B>,
    dataset: &Dataset,
    partition: &FoldPartition,
    fold_index: usize,
    batch_size: usize,
    device: &B::Device,
) -> Result<EvalReport> {
    let fold = partition.fold(fold_index)?;
    let features = dataset.features().select(&fold.test)?;
    let class_indices = dataset.class_indices();
    let actual: Vec<usize> = fold.test.iter().map(|&i| class_indices[i]).collect();

    let predicted = predict_classes(model, &features, batch_size, device)?;
    let confusion = ConfusionMatrix::from_pairs(&actual, &predicted, dataset.num_classes())?;

    Ok(EvalReport {
        fold: fold_index,
        num_samples: fold.test.len(),
        accuracy: confusion.accuracy(),
        confusion,
    })
}

/// Argmax of each `classes`-wide row in a flat logit buffer.
pub(crate) fn argmax_rows(data: &[f32], classes: usize) -> Vec<usize> {
    data.chunks_exact(classes)
        .map(|row| {
            let mut best = 0;
            for (i, &v) in row.iter().enumerate() {
                if v > row[best] {
                    best = i;
                }
            }
            best
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fer_models::{CpuBackend, EmotionClassifierConfig};
    use fer_types::LabelTensor;

    #[test]
    fn confusion_matrix_counts() {
        let matrix =
            ConfusionMatrix::from_pairs(&[0, 0, 1, 1, 2], &[0, 1, 1, 1, 0], 3).unwrap();

        assert_eq!(matrix.count(0, 0), 1);
        assert_eq!(matrix.count(0, 1), 1);
        assert_eq!(matrix.count(1, 1), 2);
        assert_eq!(matrix.count(2, 0), 1);
        assert_eq!(matrix.total(), 5);
        assert!((matrix.accuracy() - 0.6).abs() < 1e-6);
    }

    #[test]
    fn confusion_matrix_rejects_misaligned_pairs() {
        let err = ConfusionMatrix::from_pairs(&[0, 1], &[0], 2).unwrap_err();
        assert!(matches!(err, TrainError::Tensor(_)));
    }

    #[test]
    fn confusion_matrix_rejects_out_of_range_class() {
        let err = ConfusionMatrix::from_pairs(&[0, 2], &[0, 0], 2).unwrap_err();
        assert!(matches!(err, TrainError::Tensor(_)));
    }

    #[test]
    fn confusion_matrix_row_normalized() {
        let mut matrix = ConfusionMatrix::new(2);
        matrix.record(0, 0);
        matrix.record(0, 0);
        matrix.record(0, 1);
        // Row 1 has no observations.

        let normalized = matrix.row_normalized();
        assert!((normalized[0] - 2.0 / 3.0).abs() < 1e-6);
        assert!((normalized[1] - 1.0 / 3.0).abs() < 1e-6);
        assert!(normalized[2].abs() < 1e-6);
        assert!(normalized[3].abs() < 1e-6);
    }

    #[test]
    fn confusion_matrix_empty_accuracy() {
        let matrix = ConfusionMatrix::new(3);
        assert!(matrix.accuracy().abs() < 1e-6);
    }

    #[test]
    fn confusion_matrix_table_has_names() {
        let mut matrix = ConfusionMatrix::new(2);
        matrix.record(0, 0);
        matrix.record(1, 0);

        let table = matrix.to_table(&["anger", "fear"]);
        assert!(table.contains("anger"));
        assert!(table.contains("fear"));
        assert!(table.contains("1.000"));
    }

    #[test]
    fn argmax_rows_picks_largest() {
        let data = [0.1, 0.9, 0.0, 0.5, 0.2, 0.3];
        assert_eq!(argmax_rows(&data, 3), vec![1, 0]);
    }

    #[test]
    fn argmax_rows_ties_break_low() {
        let data = [0.5, 0.5];
        assert_eq!(argmax_rows(&data, 2), vec![0]);
    }

    #[test]
    fn predict_classes_returns_one_per_sample() {
        let config = EmotionClassifierConfig::new(4, 3)
            .with_lstm_units(2)
            .with_hidden(2);
        let device = Default::default();
        let model = EmotionClassifier::<CpuBackend>::new(config, &device);
        let features = FeatureTensor::zeros(5, 3, 4);

        let predictions = predict_classes(&model, &features, 2, &device).unwrap();
        assert_eq!(predictions.len(), 5);
        assert!(predictions.iter().all(|&p| p < 3));
    }

    #[test]
    fn evaluate_reports_fold_test_split() {
        let config = EmotionClassifierConfig::new(4, 2)
            .with_lstm_units(2)
            .with_hidden(2);
        let device = Default::default();
        let model = EmotionClassifier::<CpuBackend>::new(config, &device);

        let features = FeatureTensor::zeros(8, 3, 4);
        let labels = LabelTensor::from_classes(&[0, 0, 0, 0, 1, 1, 1, 1], 2).unwrap();
        let dataset = Dataset::new(features, labels).unwrap();
        let partition = FoldPartition::stratified(&dataset.class_indices(), 2).unwrap();

        let report = evaluate(&model, &dataset, &partition, 1, 4, &device).unwrap();
        assert_eq!(report.fold, 1);
        assert_eq!(report.num_samples, 4);
        assert_eq!(report.confusion.total(), 4);
        assert!((0.0..=1.0).contains(&report.accuracy));
    }

    #[test]
    fn evaluate_rejects_bad_fold_index() {
        let config = EmotionClassifierConfig::new(4, 2)
            .with_lstm_units(2)
            .with_hidden(2);
        let device = Default::default();
        let model = EmotionClassifier::<CpuBackend>::new(config, &device);

        let features = FeatureTensor::zeros(8, 3, 4);
        let labels = LabelTensor::from_classes(&[0, 0, 0, 0, 1, 1, 1, 1], 2).unwrap();
        let dataset = Dataset::new(features, labels).unwrap();
        let partition = FoldPartition::stratified(&dataset.class_indices(), 2).unwrap();

        let err = evaluate(&model, &dataset, &partition, 2, 4, &device).unwrap_err();
        assert!(matches!(err, TrainError::Dataset(_)));
    }
}
