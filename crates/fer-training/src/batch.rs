//! Host-to-backend batch conversion.
//!
//! Features and labels live host-side as flat buffers; these helpers
//! lift contiguous sample ranges into backend tensors at the model
//! boundary.

use burn::prelude::Backend;
use burn::tensor::{Int, Tensor, TensorData};

use fer_types::FeatureTensor;

/// Splits `len` samples into `(start, end)` mini-batch ranges.
///
/// The last range may be partial; batches keep dataset order.
#[must_use]
pub fn batch_ranges(len: usize, batch_size: usize) -> Vec<(usize, usize)> {
    if batch_size == 0 {
        return Vec::new();
    }
    (0..len.div_ceil(batch_size))
        .map(|b| (b * batch_size, ((b + 1) * batch_size).min(len)))
        .collect()
}

/// Lifts samples `start..end` of a feature tensor into a
/// `[end - start, frames, dim]` backend tensor.
///
/// # Panics
///
/// Panics if the range exceeds the tensor's sample count.
#[must_use]
pub fn sequence_batch<B: Backend>(
    features: &FeatureTensor,
    start: usize,
    end: usize,
    device: &B::Device,
) -> Tensor<B, 3> {
    let (_, frames, dim) = features.dims();
    let stride = frames * dim;
    let data = features.as_slice()[start * stride..end * stride].to_vec();
    Tensor::from_data(TensorData::new(data, [end - start, frames, dim]), device)
}

/// Lifts class indices into an integer target tensor.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn class_batch<B: Backend>(classes: &[usize], device: &B::Device) -> Tensor<B, 1, Int> {
    let data: Vec<i64> = classes.iter().map(|&c| c as i64).collect();
    Tensor::from_data(TensorData::new(data, [classes.len()]), device)
}
