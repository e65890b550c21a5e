//! Per-frame feature fusion.

use fer_types::FeatureTensor;

use crate::error::{FeatureError, Result};

/// Concatenates two per-frame feature tensors along the feature axis.
///
/// Given tensors of shape `(N, F, D1)` and `(N, F, D2)` aligned by
/// sample and frame index, produces one tensor of shape
/// `(N, F, D1 + D2)`. Neither input is mutated.
///
/// # Errors
///
/// Returns `FeatureError::ShapeMismatch` if the sample or frame counts
/// differ.
///
/// # Example
///
/// ```
/// use fer_features::fuse;
/// use fer_types::FeatureTensor;
///
/// let a = FeatureTensor::zeros(3, 10, 6);
/// let b = FeatureTensor::zeros(3, 10, 4);
///
/// let fused = fuse(&a, &b).unwrap();
/// assert_eq!(fused.dims(), (3, 10, 10));
/// ```
pub fn fuse(a: &FeatureTensor, b: &FeatureTensor) -> Result<FeatureTensor> {
    let (n_a, f_a, d_a) = a.dims();
    let (n_b, f_b, d_b) = b.dims();

    if n_a != n_b || f_a != f_b {
        return Err(FeatureError::shape_mismatch(
            format!("({n_a}, {f_a}, _)"),
            format!("({n_b}, {f_b}, _)"),
        ));
    }

    let mut data = Vec::with_capacity(n_a * f_a * (d_a + d_b));
    for sample in 0..n_a {
        for frame in 0..f_a {
            data.extend_from_slice(a.frame(sample, frame));
            data.extend_from_slice(b.frame(sample, frame));
        }
    }

    Ok(FeatureTensor::new(data, n_a, f_a, d_a + d_b)?)
}
