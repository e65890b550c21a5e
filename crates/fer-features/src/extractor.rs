//! The feature-extraction capability trait.

use fer_types::{Clip, FeatureTensor};

use crate::error::Result;

/// A per-frame feature producer.
///
/// Both the deep appearance extractor and the local keypoint extractor
/// implement this trait; the pipeline never depends on which concrete
/// extractor produced a tensor. Implementations must return one
/// `feature_dim()`-sized vector per frame per clip.
///
/// # Example
///
/// ```
/// use fer_features::FeatureExtractor;
/// use fer_types::{Clip, FeatureTensor};
///
/// /// Extractor producing a constant vector per frame, for tests.
/// struct Constant(usize);
///
/// impl FeatureExtractor for Constant {
///     fn feature_dim(&self) -> usize {
///         self.0
///     }
///
///     fn extract(&self, clips: &[Clip]) -> fer_features::Result<FeatureTensor> {
///         let frames = clips.first().map_or(0, Clip::num_frames);
///         Ok(FeatureTensor::zeros(clips.len(), frames, self.0))
///     }
/// }
///
/// let ex = Constant(16);
/// assert_eq!(ex.feature_dim(), 16);
/// ```
pub trait FeatureExtractor {
    /// Dimensionality of the per-frame feature vector.
    fn feature_dim(&self) -> usize;

    /// Extracts per-frame features for every clip.
    ///
    /// # Errors
    ///
    /// Returns `FeatureError::Extraction` when the underlying extractor
    /// cannot process a clip.
    fn extract(&self, clips: &[Clip]) -> Result<FeatureTensor>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use fer_types::{Emotion, Frame};

    struct FrameMean;

    impl FeatureExtractor for FrameMean {
        fn feature_dim(&self) -> usize {
            1
        }

        fn extract(&self, clips: &[Clip]) -> Result<FeatureTensor> {
            let frames = clips.first().map_or(0, Clip::num_frames);
            let mut data = Vec::with_capacity(clips.len() * frames);
            for clip in clips {
                for frame in &clip.frames {
                    let sum: u32 = frame.data.iter().map(|&p| u32::from(p)).sum();
                    data.push(sum as f32 / frame.data.len() as f32);
                }
            }
            Ok(FeatureTensor::new(data, clips.len(), frames, 1)?)
        }
    }

    #[test]
    fn extractor_trait_object() {
        let clips = vec![
            Clip::new(0, Emotion::Anger, vec![Frame::new(vec![10; 4], 2, 2); 3]),
            Clip::new(1, Emotion::Fear, vec![Frame::new(vec![20; 4], 2, 2); 3]),
        ];

        let extractor: Box<dyn FeatureExtractor> = Box::new(FrameMean);
        let features = extractor.extract(&clips).unwrap();

        assert_eq!(features.dims(), (2, 3, 1));
        assert!((features.frame(0, 0)[0] - 10.0).abs() < 1e-6);
        assert!((features.frame(1, 2)[0] - 20.0).abs() < 1e-6);
    }
}
