//! Errors in the library.
use thiserror::Error;

/// Invalid shapes of network parameters or inputs.
#[derive(Error, Debug, PartialEq)]
pub enum MlpError {
    /// A network needs at least one layer.
    #[error("MLP has no layer")]
    NoLayer,

    /// Weights and biases have different numbers of layers.
    #[error("MLP has {weights} weight matrices and {biases} bias vectors")]
    LayerCountMismatch {
        /// Number of weight matrices.
        weights: usize,
        /// Number of bias vectors.
        biases: usize,
    },

    /// The bias length differs from the output width of its layer.
    #[error("Bias of layer {layer} has length {actual}, expected {expected}")]
    BiasMismatch {
        /// Index of the layer.
        layer: usize,
        /// Output width of the layer.
        expected: usize,
        /// Length of the bias.
        actual: usize,
    },

    /// The input width of a layer differs from the output width of the previous one.
    #[error("Layer {layer} takes inputs of width {actual}, previous layer outputs {expected}")]
    LayerMismatch {
        /// Index of the layer.
        layer: usize,
        /// Output width of the previous layer.
        expected: usize,
        /// Input width of the layer.
        actual: usize,
    },

    /// The input width differs from the one of the first layer.
    #[error("Input has width {actual}, expected {expected}")]
    InputMismatch {
        /// Input width of the network.
        expected: usize,
        /// Width of the given input.
        actual: usize,
    },

    /// Normalization statistics have a width different from the network input.
    #[error("Observation normalizer has width {actual}, expected {expected}")]
    NormalizerMismatch {
        /// Input width of the network.
        expected: usize,
        /// Width of the statistics.
        actual: usize,
    },
}
