//! LSTM sequence classifier over per-frame feature vectors.

use burn::module::Module;
use burn::nn;
use burn::prelude::Backend;
use burn::tensor::activation::relu;
use burn::tensor::Tensor;
use serde::{Deserialize, Serialize};

/// Configuration for the emotion classifier.
///
/// The defaults beyond the two mandatory dimensions follow the usual
/// recipe for short clip sequences: a 32-unit LSTM, a 16-unit dense
/// layer, and 0.5 dropout around it.
///
/// # Example
///
/// ```
/// use fer_models::EmotionClassifierConfig;
///
/// let config = EmotionClassifierConfig::new(6528, 6);
/// assert_eq!(config.lstm_units, 32);
/// assert!(config.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionClassifierConfig {
    /// Fused feature dimension per frame.
    pub input_dim: usize,

    /// Number of emotion classes.
    pub num_classes: usize,

    /// LSTM hidden state size.
    pub lstm_units: usize,

    /// Dense layer width between LSTM and output.
    pub hidden: usize,

    /// Dropout probability applied before each dense layer.
    pub dropout: f64,
}

impl EmotionClassifierConfig {
    /// Creates a configuration for the given input and class dimensions.
    #[must_use]
    pub const fn new(input_dim: usize, num_classes: usize) -> Self {
        Self {
            input_dim,
            num_classes,
            lstm_units: 32,
            hidden: 16,
            dropout: 0.5,
        }
    }

    /// Sets the LSTM hidden size.
    #[must_use]
    pub const fn with_lstm_units(mut self, lstm_units: usize) -> Self {
        self.lstm_units = lstm_units;
        self
    }

    /// Sets the dense layer width.
    #[must_use]
    pub const fn with_hidden(mut self, hidden: usize) -> Self {
        self.hidden = hidden;
        self
    }

    /// Sets the dropout probability.
    #[must_use]
    pub const fn with_dropout(mut self, dropout: f64) -> Self {
        self.dropout = dropout;
        self
    }

    /// Validates the configuration.
    ///
    /// Returns `true` if all dimensions are positive and the dropout
    /// probability lies in `[0, 1)`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.input_dim > 0
            && self.num_classes > 0
            && self.lstm_units > 0
            && self.hidden > 0
            && (0.0..1.0).contains(&self.dropout)
    }
}

/// Sequence classifier for per-frame emotion features.
///
/// Architecture: LSTM -> last hidden state -> Dropout -> Linear ->
/// `ReLU` -> Dropout -> Linear -> logits.
///
/// The forward pass consumes a whole clip's frame sequence and emits
/// one logit vector per clip; softmax is folded into the loss during
/// training, so callers take the argmax of the logits directly.
///
/// # Type Parameters
///
/// - `B`: The Burn backend (e.g., `NdArray`, `Autodiff<NdArray>`)
#[derive(Debug, Module)]
pub struct EmotionClassifier<B: Backend> {
    lstm: nn::Lstm<B>,
    dropout1: nn::Dropout,
    fc1: nn::Linear<B>,
    dropout2: nn::Dropout,
    fc2: nn::Linear<B>,
}

impl<B: Backend> EmotionClassifier<B> {
    /// Creates a new classifier with freshly initialized weights.
    ///
    /// Every cross-validation fold calls this to start from scratch;
    /// weights never leak between folds.
    #[must_use]
    pub fn new(config: EmotionClassifierConfig, device: &B::Device) -> Self {
        let lstm = nn::LstmConfig::new(config.input_dim, config.lstm_units, true).init(device);
        let dropout1 = nn::DropoutConfig::new(config.dropout).init();
        let fc1 = nn::LinearConfig::new(config.lstm_units, config.hidden).init(device);
        let dropout2 = nn::DropoutConfig::new(config.dropout).init();
        let fc2 = nn::LinearConfig::new(config.hidden, config.num_classes).init(device);
        Self {
            lstm,
            dropout1,
            fc1,
            dropout2,
            fc2,
        }
    }

    /// Runs the forward pass.
    ///
    /// # Arguments
    ///
    /// - `input`: Tensor of shape `[batch, frames, input_dim]`
    ///
    /// # Returns
    ///
    /// Logits of shape `[batch, num_classes]`.
    pub fn forward(&self, input: Tensor<B, 3>) -> Tensor<B, 2> {
        let (hidden, _state) = self.lstm.forward(input, None);
        let [batch, frames, units] = hidden.dims();
        // Only the final hidden state summarizes the clip.
        let last = hidden.narrow(1, frames - 1, 1).reshape([batch, units]);
        let x = self.dropout1.forward(last);
        let x = relu(self.fc1.forward(x));
        let x = self.dropout2.forward(x);
        self.fc2.forward(x)
    }
}
