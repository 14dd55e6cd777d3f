//! Environment.
use super::{Act, Frame, Obs, Step};
use anyhow::Result;

/// Represents an environment, typically an MDP.
///
/// Errors returned by [`Env::reset`], [`Env::step`] or [`Env::render`] are not
/// retried; they abort the rollout in progress and propagate to the caller.
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Resets the environment to a fresh initial state and returns the first observation.
    fn reset(&mut self) -> Result<Obs>;

    /// Performes an environment step.
    fn step(&mut self, a: &Act) -> Result<Step>;

    /// Renders the current state of the environment.
    ///
    /// Environments without rendering support return `Ok(None)`. The sampler keeps
    /// the frames of a rollout only if every step of it was rendered.
    fn render(&mut self) -> Result<Option<Frame>> {
        Ok(None)
    }
}
