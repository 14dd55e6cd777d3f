use crate::MlpError;
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

/// Activation function of hidden layers.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// `max(x, 0)`.
    Relu,

    /// Hyperbolic tangent.
    Tanh,

    /// `x` if positive, `0.01 * x` otherwise.
    LeakyRelu,
}

impl Activation {
    fn apply(&self, x: Array1<f32>) -> Array1<f32> {
        match self {
            Self::Relu => x.mapv_into(|v| v.max(0.0)),
            Self::Tanh => x.mapv_into(f32::tanh),
            Self::LeakyRelu => x.mapv_into(|v| if v > 0.0 { v } else { 0.01 * v }),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(try_from = "MlpParams", into = "MlpParams")]
/// Multilayer perceptron.
///
/// Layer `i` computes `ws[i] x + bs[i]`, where `ws[i]` has shape `[out, in]`.
/// The activation is applied after every layer except the last one, so the
/// output is linear.
pub struct Mlp {
    /// Weights of layers.
    ws: Vec<Array2<f32>>,

    /// Biases of layers.
    bs: Vec<Array1<f32>>,

    activation: Activation,
}

#[derive(Clone, Deserialize, Serialize)]
struct MlpParams {
    ws: Vec<Array2<f32>>,
    bs: Vec<Array1<f32>>,
    activation: Activation,
}

impl TryFrom<MlpParams> for Mlp {
    type Error = MlpError;

    fn try_from(p: MlpParams) -> Result<Self, Self::Error> {
        Mlp::new(p.ws, p.bs, p.activation)
    }
}

impl From<Mlp> for MlpParams {
    fn from(m: Mlp) -> Self {
        Self {
            ws: m.ws,
            bs: m.bs,
            activation: m.activation,
        }
    }
}

impl Mlp {
    /// Constructs a network after checking the shapes of its parameters.
    pub fn new(
        ws: Vec<Array2<f32>>,
        bs: Vec<Array1<f32>>,
        activation: Activation,
    ) -> Result<Self, MlpError> {
        if ws.is_empty() {
            return Err(MlpError::NoLayer);
        }
        if ws.len() != bs.len() {
            return Err(MlpError::LayerCountMismatch {
                weights: ws.len(),
                biases: bs.len(),
            });
        }
        for (layer, (w, b)) in ws.iter().zip(bs.iter()).enumerate() {
            if w.nrows() != b.len() {
                return Err(MlpError::BiasMismatch {
                    layer,
                    expected: w.nrows(),
                    actual: b.len(),
                });
            }
            if layer > 0 && ws[layer - 1].nrows() != w.ncols() {
                return Err(MlpError::LayerMismatch {
                    layer,
                    expected: ws[layer - 1].nrows(),
                    actual: w.ncols(),
                });
            }
        }

        Ok(Self { ws, bs, activation })
    }

    /// Input width.
    pub fn in_dim(&self) -> usize {
        self.ws[0].ncols()
    }

    /// Output width.
    pub fn out_dim(&self) -> usize {
        self.ws[self.ws.len() - 1].nrows()
    }

    /// Number of layers.
    pub fn n_layers(&self) -> usize {
        self.ws.len()
    }

    /// Computes the output of the network.
    pub fn forward(&self, x: ArrayView1<f32>) -> Result<Array1<f32>, MlpError> {
        if x.len() != self.in_dim() {
            return Err(MlpError::InputMismatch {
                expected: self.in_dim(),
                actual: x.len(),
            });
        }

        let n_layers = self.ws.len();
        let mut x = x.to_owned();
        for i in 0..n_layers {
            x = self.ws[i].dot(&x) + &self.bs[i];
            if i != n_layers - 1 {
                x = self.activation.apply(x);
            }
        }
        Ok(x)
    }
}
