//! Emotion label set.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TypesError};

/// The closed set of facial emotion classes.
///
/// The discriminant order is the class-index order used throughout the
/// pipeline (one-hot columns, confusion matrix rows/columns).
///
/// # Example
///
/// ```
/// use fer_types::Emotion;
///
/// assert_eq!(Emotion::COUNT, 6);
/// assert_eq!(Emotion::Happiness.index(), 3);
/// assert_eq!(Emotion::from_index(3).unwrap(), Emotion::Happiness);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Emotion {
    /// Anger.
    Anger,
    /// Disgust.
    Disgust,
    /// Fear.
    Fear,
    /// Happiness.
    Happiness,
    /// Sadness.
    Sadness,
    /// Surprise.
    Surprise,
}

impl Emotion {
    /// Number of emotion classes.
    pub const COUNT: usize = 6;

    /// All emotions in class-index order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Anger,
        Self::Disgust,
        Self::Fear,
        Self::Happiness,
        Self::Sadness,
        Self::Surprise,
    ];

    /// Returns the class index of this emotion.
    #[must_use]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Returns the emotion for a class index.
    ///
    /// # Errors
    ///
    /// Returns `TypesError::InvalidClassIndex` if `index >= COUNT`.
    pub fn from_index(index: usize) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(TypesError::invalid_class_index(index, Self::COUNT))
    }

    /// Returns the emotion name as a lowercase string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Anger => "anger",
            Self::Disgust => "disgust",
            Self::Fear => "fear",
            Self::Happiness => "happiness",
            Self::Sadness => "sadness",
            Self::Surprise => "surprise",
        }
    }

    /// Returns all class names in class-index order.
    #[must_use]
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(Self::name).collect()
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
