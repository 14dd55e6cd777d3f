//! Evaluate [`Policy`].
use crate::{PathStats, Policy, Trajectory};
use anyhow::Result;
mod default_evaluator;
pub use default_evaluator::DefaultEvaluator;

/// Result of an evaluation.
#[derive(Clone, Debug)]
pub struct EvalOutcome {
    /// Rollouts collected with the evaluated policy.
    pub paths: Vec<Trajectory>,

    /// Number of environment steps taken.
    pub envsteps: usize,

    /// Statistics of `paths`.
    pub stats: PathStats,
}

/// Evaluate [`Policy`].
///
/// Implementations own the environment used for evaluation, so evaluation
/// rollouts never interfere with the episodes of the training environment.
pub trait Evaluator {
    /// Collects evaluation rollouts with `policy`.
    fn evaluate<P: Policy + ?Sized>(&mut self, policy: &mut P) -> Result<EvalOutcome>;

    /// Collects `n` rendered rollouts of at most `max_length` steps.
    fn sample_videos<P: Policy + ?Sized>(
        &mut self,
        policy: &mut P,
        n: usize,
        max_length: usize,
    ) -> Result<Vec<Trajectory>>;
}
