//! Greedy policy over the Q-values of a critic.
use crate::{Act, Obs, Policy};
use anyhow::{bail, Result};
use ndarray::{Array1, ArrayView1};

/// Critic producing one Q-value per discrete action.
pub trait QFunction {
    /// Returns the Q-values of all actions at `obs`.
    fn qa_values(&mut self, obs: &Obs) -> Result<Array1<f32>>;
}

/// Policy taking the action with the largest Q-value.
///
/// The action is encoded as a vector with a single element holding the index.
/// Ties go to the smallest index.
pub struct ArgmaxPolicy<C: QFunction> {
    critic: C,
}

impl<C: QFunction> ArgmaxPolicy<C> {
    /// Constructs the policy.
    pub fn new(critic: C) -> Self {
        Self { critic }
    }

    /// The critic.
    pub fn critic(&self) -> &C {
        &self.critic
    }
}

fn argmax(q: ArrayView1<f32>) -> Option<usize> {
    q.iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

impl<C: QFunction> Policy for ArgmaxPolicy<C> {
    fn get_action(&mut self, obs: &Obs) -> Result<Act> {
        let q = self.critic.qa_values(obs)?;
        match argmax(q.view()) {
            Some(i) => Ok(Array1::from(vec![i as f32])),
            None => bail!("Critic returned no Q-value"),
        }
    }
}
