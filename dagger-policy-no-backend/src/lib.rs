//! Expert policy without deep learning backend.
//!
//! [`MlpPolicy`] evaluates a feed-forward network with [`ndarray`]. It is meant to be
//! used as the oracle relabeling rollouts in DAgger, with weights trained elsewhere
//! and exported as JSON or bincode.
mod config;
mod error;
mod mlp;
mod policy;
pub use config::MlpPolicyConfig;
pub use error::MlpError;
pub use mlp::{Activation, Mlp};
pub use policy::{MlpPolicy, ObsNormalizer};
