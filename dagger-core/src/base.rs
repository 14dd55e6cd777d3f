//! Core functionalities.
mod agent;
mod env;
mod policy;
mod replay_buffer;
mod step;
pub use agent::Agent;
pub use env::Env;
pub use policy::Policy;
pub use replay_buffer::ReplayBufferBase;
pub use step::Step;
use ndarray::{Array1, Array3};

/// Observation of an environment, a fixed-width vector.
pub type Obs = Array1<f32>;

/// Action applied to an environment, a fixed-width vector.
///
/// Discrete actions are encoded as a vector with a single element holding the index.
pub type Act = Array1<f32>;

/// Rendered frame with shape `[height, width, channels]`.
pub type Frame = Array3<u8>;
