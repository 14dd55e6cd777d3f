//! Environment step.
use super::Obs;
use crate::record::Record;

/// Outcome of applying an action to an environment: `(o_t+1, r_t, done_t, info)`.
///
/// The sampler pairs it with the observation and action of the same step
/// to create a transition `(o_t, a_t, r_t, o_t+1, terminal_t)`.
pub struct Step {
    /// Observation after the action.
    pub obs: Obs,

    /// Reward.
    pub reward: f32,

    /// Flag denoting if episode is terminated.
    pub is_terminated: bool,

    /// Flag denoting if episode is truncated by the environment.
    pub is_truncated: bool,

    /// Information defined by the environment.
    pub info: Record,
}

impl Step {
    /// Constructs a [`Step`] object with an empty info record.
    pub fn new(obs: Obs, reward: f32, is_terminated: bool, is_truncated: bool) -> Self {
        Step {
            obs,
            reward,
            is_terminated,
            is_truncated,
            info: Record::empty(),
        }
    }

    #[inline]
    /// Terminated or truncated.
    pub fn is_done(&self) -> bool {
        self.is_terminated || self.is_truncated
    }
}
