//! Minibatch of transitions.
use ndarray::{Array1, Array2};

/// A batch of transitions `(o_t, a_t, r_t, o_t+1, terminal_t)`.
///
/// Row `i` of every field belongs to the same transition.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionBatch {
    /// Observations.
    pub obs: Array2<f32>,

    /// Actions.
    pub act: Array2<f32>,

    /// Rewards.
    pub reward: Array1<f32>,

    /// Next observations.
    pub next_obs: Array2<f32>,

    /// Terminal flags.
    pub terminal: Array1<f32>,
}

impl TransitionBatch {
    /// Unpack the data `(o_t, a_t, r_t, o_t+1, terminal_t)`.
    pub fn unpack(self) -> (Array2<f32>, Array2<f32>, Array1<f32>, Array2<f32>, Array1<f32>) {
        (self.obs, self.act, self.reward, self.next_obs, self.terminal)
    }

    /// Returns the number of transitions.
    pub fn len(&self) -> usize {
        self.reward.len()
    }

    /// Returns `true` if the batch has no transition.
    pub fn is_empty(&self) -> bool {
        self.reward.is_empty()
    }
}
