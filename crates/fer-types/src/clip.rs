//! Raw video clip types at the extraction boundary.
//!
//! Frame extraction and decoding are external concerns; these types
//! only carry the decoded pixels into the feature extractors.

use serde::{Deserialize, Serialize};

use crate::emotion::Emotion;

/// A single decoded grayscale video frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Grayscale pixel intensities, row-major, length `width * height`.
    pub data: Vec<u8>,

    /// Frame width in pixels.
    pub width: u32,

    /// Frame height in pixels.
    pub height: u32,
}

impl Frame {
    /// Creates a new frame.
    #[must_use]
    pub const fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }

    /// Returns true if the pixel buffer matches the declared size.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.data.len() == (self.width as usize) * (self.height as usize)
    }
}

/// One video instance: a fixed-length frame sequence and its label.
///
/// # Example
///
/// ```
/// use fer_types::{Clip, Emotion, Frame};
///
/// let frames = vec![Frame::new(vec![0; 4], 2, 2); 10];
/// let clip = Clip::new(7, Emotion::Surprise, frames);
///
/// assert_eq!(clip.num_frames(), 10);
/// assert!(clip.has_frame_count(10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clip {
    /// Clip identifier within the dataset.
    pub id: u64,

    /// Ground-truth emotion label.
    pub emotion: Emotion,

    /// Decoded frames, in temporal order.
    pub frames: Vec<Frame>,
}

impl Clip {
    /// Creates a new clip.
    #[must_use]
    pub const fn new(id: u64, emotion: Emotion, frames: Vec<Frame>) -> Self {
        Self {
            id,
            emotion,
            frames,
        }
    }

    /// Returns the number of frames.
    #[must_use]
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Returns true if the clip has exactly `expected` valid frames.
    #[must_use]
    pub fn has_frame_count(&self, expected: usize) -> bool {
        self.frames.len() == expected && self.frames.iter().all(Frame::is_valid)
    }
}
