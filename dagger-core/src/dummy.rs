//! Deterministic environment, policies and agent used in tests and doc examples.
use crate::{
    record::{Record, RecordValue},
    replay_buffer::TransitionBatch,
    Act, Agent, Env, Frame, Obs, Policy, Step,
};
use anyhow::{anyhow, Result};
use ndarray::Array1;
use std::{cell::Cell, fs, path::Path, rc::Rc};

/// Counts the calls made to [`DummyEnv`] objects sharing a configuration.
#[derive(Debug, Default)]
pub struct EnvCounter {
    builds: Cell<usize>,
    resets: Cell<usize>,
    steps: Cell<usize>,
}

impl EnvCounter {
    /// Number of built environments.
    pub fn builds(&self) -> usize {
        self.builds.get()
    }

    /// Number of resets.
    pub fn resets(&self) -> usize {
        self.resets.get()
    }

    /// Number of steps.
    pub fn steps(&self) -> usize {
        self.steps.get()
    }

    /// Total number of calls of any kind.
    pub fn interactions(&self) -> usize {
        self.builds() + self.resets() + self.steps()
    }
}

/// Configuration of [`DummyEnv`].
#[derive(Clone, Debug, Default)]
pub struct DummyEnvConfig {
    episode_lens: Vec<usize>,
    render: bool,
    fail_on_step: Option<usize>,
    counter: Rc<EnvCounter>,
}

impl DummyEnvConfig {
    /// Lengths of successive episodes, cycled. Empty means episodes never end.
    pub fn episode_lens(mut self, v: Vec<usize>) -> Self {
        self.episode_lens = v;
        self
    }

    /// Enables rendering.
    pub fn render(mut self, v: bool) -> Self {
        self.render = v;
        self
    }

    /// Makes the `n`-th step (counted over all episodes, from 1) fail.
    pub fn fail_on_step(mut self, n: Option<usize>) -> Self {
        self.fail_on_step = n;
        self
    }

    /// Call counter shared by all environments built from this configuration.
    pub fn counter(&self) -> &EnvCounter {
        &self.counter
    }
}

/// Environment whose observation is `[t, episode]`.
///
/// The reward of a step is the first element of the action, so the return of
/// an episode is the sum of the first action elements.
pub struct DummyEnv {
    config: DummyEnvConfig,
    episode: usize,
    t: usize,
}

impl DummyEnv {
    fn obs(&self) -> Obs {
        Array1::from(vec![self.t as f32, self.episode as f32])
    }

    fn episode_len(&self) -> Option<usize> {
        match self.config.episode_lens.is_empty() {
            true => None,
            false => {
                let ix = (self.episode - 1) % self.config.episode_lens.len();
                Some(self.config.episode_lens[ix])
            }
        }
    }
}

impl Env for DummyEnv {
    type Config = DummyEnvConfig;

    fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
        let counter = &config.counter;
        counter.builds.set(counter.builds.get() + 1);
        Ok(Self {
            config: config.clone(),
            episode: 0,
            t: 0,
        })
    }

    fn reset(&mut self) -> Result<Obs> {
        let counter = &self.config.counter;
        counter.resets.set(counter.resets.get() + 1);
        self.episode += 1;
        self.t = 0;
        Ok(self.obs())
    }

    fn step(&mut self, a: &Act) -> Result<Step> {
        let counter = &self.config.counter;
        counter.steps.set(counter.steps.get() + 1);
        if self.config.fail_on_step == Some(counter.steps.get()) {
            return Err(anyhow!("Dummy env failed at step {}", counter.steps.get()));
        }

        self.t += 1;
        let is_terminated = self.episode_len().map_or(false, |len| self.t >= len);
        let mut step = Step::new(self.obs(), a[0], is_terminated, false);
        step.info
            .insert("episode", RecordValue::Scalar(self.episode as f32));
        Ok(step)
    }

    fn render(&mut self) -> Result<Option<Frame>> {
        match self.config.render {
            true => Ok(Some(Frame::from_elem((2, 2, 3), self.t as u8))),
            false => Ok(None),
        }
    }
}

/// Policy returning the same action for any observation.
pub struct ConstantPolicy {
    action: Act,
}

impl ConstantPolicy {
    /// Constructs the policy.
    pub fn new(action: Vec<f32>) -> Self {
        Self {
            action: Array1::from(action),
        }
    }
}

impl Policy for ConstantPolicy {
    fn get_action(&mut self, _obs: &Obs) -> Result<Act> {
        Ok(self.action.clone())
    }
}

/// Policy returning `scale * obs`, used as an oracle in tests.
pub struct ScalePolicy {
    scale: f32,
    n_calls: usize,
}

impl ScalePolicy {
    /// Constructs the policy.
    pub fn new(scale: f32) -> Self {
        Self { scale, n_calls: 0 }
    }

    /// Number of queried observations.
    pub fn n_calls(&self) -> usize {
        self.n_calls
    }
}

impl Policy for ScalePolicy {
    fn get_action(&mut self, obs: &Obs) -> Result<Act> {
        self.n_calls += 1;
        Ok(obs * self.scale)
    }
}

/// Agent acting with a constant action and recording the batches it is trained on.
pub struct DummyAgent {
    action: Act,
    batch_sizes: Vec<usize>,
}

impl DummyAgent {
    /// Constructs the agent.
    pub fn new(action: Vec<f32>) -> Self {
        Self {
            action: Array1::from(action),
            batch_sizes: vec![],
        }
    }

    /// Sizes of the batches given to [`Agent::train`], in order.
    pub fn batch_sizes(&self) -> &[usize] {
        &self.batch_sizes
    }
}

impl Policy for DummyAgent {
    fn get_action(&mut self, _obs: &Obs) -> Result<Act> {
        Ok(self.action.clone())
    }
}

impl Agent for DummyAgent {
    fn train(&mut self, batch: TransitionBatch) -> Result<Record> {
        self.batch_sizes.push(batch.len());
        let loss = batch.reward.mean().unwrap_or(0.0);
        Ok(Record::from_scalar("Training_Loss", loss))
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        fs::write(
            path.join("agent.json"),
            serde_json::to_string(&self.action.to_vec())?,
        )?;
        Ok(())
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        let s = fs::read_to_string(path.join("agent.json"))?;
        self.action = Array1::from(serde_json::from_str::<Vec<f32>>(&s)?);
        Ok(())
    }
}
