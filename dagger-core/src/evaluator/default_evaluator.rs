//! Default implementation of the [`Evaluator`] trait.
use super::{EvalOutcome, Evaluator};
use crate::{
    sampler::{sample_batch, sample_fixed_count},
    Env, PathStats, Policy, Trajectory,
};
use anyhow::Result;
use log::debug;

/// Evaluator collecting rollouts in its own environment.
///
/// Each call to [`Evaluator::evaluate`] samples rollouts until at least
/// `eval_batch_size` environment steps were taken, each rollout being at most
/// `max_length` steps long.
///
/// # Examples
///
/// ```rust
/// use dagger_core::dummy::{ConstantPolicy, DummyEnv, DummyEnvConfig};
/// use dagger_core::{DefaultEvaluator, Evaluator};
///
/// let config = DummyEnvConfig::default().episode_lens(vec![5]);
/// let mut evaluator = DefaultEvaluator::<DummyEnv>::new(&config, 42, 10, 100).unwrap();
/// let outcome = evaluator.evaluate(&mut ConstantPolicy::new(vec![1.0])).unwrap();
/// assert_eq!(outcome.stats.average_return, 5.0);
/// ```
pub struct DefaultEvaluator<E: Env> {
    eval_batch_size: usize,
    max_length: usize,
    env: E,
}

impl<E: Env> DefaultEvaluator<E> {
    /// Constructs a new [`DefaultEvaluator`], building its environment.
    pub fn new(
        config: &E::Config,
        seed: i64,
        eval_batch_size: usize,
        max_length: usize,
    ) -> Result<Self> {
        Ok(Self {
            eval_batch_size,
            max_length,
            env: E::build(config, seed)?,
        })
    }
}

impl<E: Env> Evaluator for DefaultEvaluator<E> {
    fn evaluate<P: Policy + ?Sized>(&mut self, policy: &mut P) -> Result<EvalOutcome> {
        let (paths, envsteps) = sample_batch(
            &mut self.env,
            policy,
            self.eval_batch_size,
            self.max_length,
            false,
        )?;
        let stats = PathStats::from_paths(&paths)?;
        debug!(
            "Evaluated {} rollouts ({} steps), average return = {}",
            paths.len(),
            envsteps,
            stats.average_return
        );

        Ok(EvalOutcome {
            paths,
            envsteps,
            stats,
        })
    }

    fn sample_videos<P: Policy + ?Sized>(
        &mut self,
        policy: &mut P,
        n: usize,
        max_length: usize,
    ) -> Result<Vec<Trajectory>> {
        sample_fixed_count(&mut self.env, policy, n, max_length, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dummy::{ConstantPolicy, DummyEnv, DummyEnvConfig},
        error::StatsError,
    };

    #[test]
    fn test_evaluate_covers_batch_size() {
        let config = DummyEnvConfig::default().episode_lens(vec![3, 5]);
        let mut evaluator = DefaultEvaluator::<DummyEnv>::new(&config, 0, 7, 100).unwrap();
        let outcome = evaluator
            .evaluate(&mut ConstantPolicy::new(vec![2.0]))
            .unwrap();

        assert_eq!(outcome.paths.len(), 2);
        assert_eq!(outcome.envsteps, 8);
        assert_eq!(outcome.stats.max_return, 10.0);
        assert_eq!(outcome.stats.min_return, 6.0);
        assert_eq!(config.counter().builds(), 1);
    }

    #[test]
    fn test_zero_eval_batch_size_has_no_statistics() {
        let config = DummyEnvConfig::default().episode_lens(vec![3]);
        let mut evaluator = DefaultEvaluator::<DummyEnv>::new(&config, 0, 0, 100).unwrap();
        let err = evaluator
            .evaluate(&mut ConstantPolicy::new(vec![1.0]))
            .unwrap_err();
        assert_eq!(err.downcast_ref::<StatsError>(), Some(&StatsError::Empty));
    }

    #[test]
    fn test_sample_videos_renders_frames() {
        let config = DummyEnvConfig::default().episode_lens(vec![10]).render(true);
        let mut evaluator = DefaultEvaluator::<DummyEnv>::new(&config, 0, 1, 100).unwrap();
        let paths = evaluator
            .sample_videos(&mut ConstantPolicy::new(vec![1.0]), 2, 4)
            .unwrap();
        assert_eq!(paths.len(), 2);
        for path in paths.iter() {
            assert_eq!(path.len(), 4);
            assert_eq!(path.image_obs().unwrap().shape()[0], 4);
        }
    }
}
