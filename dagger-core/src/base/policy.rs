//! Policy.
use super::{Act, Obs};
use anyhow::Result;

/// A policy on an environment.
///
/// Policy is a mapping from an observation to an action.
/// The mapping can be either of deterministic or stochastic.
///
/// Behaving, evaluation and oracle policies are all instances of this trait;
/// they differ only in the role the [`Trainer`](crate::Trainer) gives them.
pub trait Policy {
    /// Returns an action given an observation.
    fn get_action(&mut self, obs: &Obs) -> Result<Act>;
}

impl<P: Policy + ?Sized> Policy for &mut P {
    fn get_action(&mut self, obs: &Obs) -> Result<Act> {
        (**self).get_action(obs)
    }
}

impl<P: Policy + ?Sized> Policy for Box<P> {
    fn get_action(&mut self, obs: &Obs) -> Result<Act> {
        (**self).get_action(obs)
    }
}
