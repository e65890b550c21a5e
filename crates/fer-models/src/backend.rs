//! Backend aliases and device helpers.
//!
//! Everything runs on the ndarray CPU backend; training wraps it in
//! autodiff. Code elsewhere stays generic over `Backend`, these aliases
//! are the concrete choice binaries and tests plug in.

use burn::prelude::Backend;

/// CPU inference backend.
pub type CpuBackend = burn_ndarray::NdArray<f32>;

/// CPU training backend with autodiff.
pub type TrainBackend = burn_autodiff::Autodiff<CpuBackend>;

/// Returns the default device for a backend.
#[must_use]
pub fn default_device<B: Backend>() -> B::Device {
    B::Device::default()
}

/// Seeds a backend's RNG so weight init and dropout are reproducible.
pub fn seed_backend<B: Backend>(seed: u64) {
    B::seed(seed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::tensor::Tensor;

    #[test]
    fn cpu_device_is_default_constructible() {
        let device = default_device::<CpuBackend>();
        let t = Tensor::<CpuBackend, 1>::zeros([4], &device);
        assert_eq!(t.dims(), [4]);
    }

    #[test]
    fn train_backend_device_matches_cpu() {
        let device = default_device::<TrainBackend>();
        let t = Tensor::<TrainBackend, 2>::zeros([2, 3], &device);
        assert_eq!(t.dims(), [2, 3]);
    }
}
