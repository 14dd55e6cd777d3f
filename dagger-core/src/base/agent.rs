//! Agent.
use super::Policy;
use crate::{record::Record, replay_buffer::TransitionBatch};
use anyhow::Result;
use std::path::Path;

/// Represents a trainable policy on an environment.
///
/// The agent owns the learning part (models, losses and optimizers). Transitions are
/// stored in the replay buffer owned by the [`Trainer`](crate::Trainer), which samples
/// minibatches and hands them to [`Agent::train`].
pub trait Agent: Policy {
    /// Performs an optimization step on a minibatch and returns some information.
    fn train(&mut self, batch: TransitionBatch) -> Result<Record>;

    /// Save the parameters of the agent in the given directory.
    fn save_params(&self, path: &Path) -> Result<()>;

    /// Load the parameters of the agent from the given directory.
    fn load_params(&mut self, path: &Path) -> Result<()>;
}
