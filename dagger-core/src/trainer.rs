//! Train [`Agent`] with behavior cloning and DAgger.
mod config;
use crate::{
    error::TrainerError,
    load_expert_data,
    record::{Record, RecordValue::Scalar, Recorder},
    replay_buffer::{ReplayBuffer, ReplayBufferConfig, RewardLayout},
    sampler::{sample_batch, sample_fixed_count},
    Agent, Env, Evaluator, PathStats, Policy, ReplayBufferBase, Trajectory,
};
use anyhow::{Context, Result};
pub use config::TrainerConfig;
use log::info;
use ndarray::{Array2, Axis};
use std::{path::Path, time::SystemTime};

/// Counters of a training run, returned by [`Trainer::train`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrainerState {
    /// Environment steps taken to collect training data.
    pub total_envsteps: usize,

    /// Average return of the first logged training data, usually the expert data.
    pub initial_return: Option<f32>,

    /// Number of completed iterations.
    pub iterations: usize,
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Manages the iterations of imitation learning.
///
/// # Training loop
///
/// For each iteration `itr` in `0..n_iter`:
///
/// 1. Collect trajectories:
///    * `itr == 0`: load the expert dataset given by [`TrainerConfig::expert_data`],
///      without any environment step.
///    * `itr > 0`: roll out the agent until at least `batch_size` environment steps
///      were taken, each rollout being at most `ep_len` steps long. On video
///      iterations, `n_videos` rendered rollouts are also collected.
/// 2. If `relabel_with_expert` is set and `itr >= start_relabel_with_expert`,
///    replace the actions of the collected trajectories with the actions of the
///    oracle on the same observations. This is the DAgger step; without it the
///    loop is plain behavior cloning.
/// 3. Add the trajectories to the replay buffer.
/// 4. Call [`Agent::train`] `num_agent_train_steps_per_iter` times, each time on a
///    minibatch of `train_batch_size` transitions sampled from the replay buffer.
/// 5. If `itr % scalar_log_freq == 0`, evaluate the evaluation policy (the agent
///    unless another one is given) with the [`Evaluator`] and write return
///    statistics to the [`Recorder`]. If `itr % video_log_freq == 0`, write
///    rendered train and eval rollouts.
/// 6. On logging iterations, if `save_params` is set, save the agent parameters in
///    `(model_dir)/itr_(itr)`.
///
/// # Interaction of objects
///
/// ```mermaid
/// graph LR
///     A[Agent]-->|Act|B[Env]
///     B -->|Obs|A
///     B -->|Trajectory|O[Oracle]
///     O -->|relabeled Trajectory|D[ReplayBuffer]
///     D -->|TransitionBatch|A
/// ```
///
/// The configuration is validated before any environment is built, so a missing
/// expert dataset is reported without interacting with the environment.
pub struct Trainer {
    config: TrainerConfig,
    replay_buffer_config: ReplayBufferConfig,
    buffer: ReplayBuffer,
}

impl Trainer {
    /// Constructs a trainer and its replay buffer.
    pub fn build(config: TrainerConfig, replay_buffer_config: ReplayBufferConfig) -> Result<Self> {
        Ok(Self {
            buffer: ReplayBuffer::build(&replay_buffer_config)?,
            config,
            replay_buffer_config,
        })
    }

    /// The replay buffer filled by the last call of [`Trainer::train`].
    pub fn buffer(&self) -> &ReplayBuffer {
        &self.buffer
    }

    /// The configuration of the trainer.
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Runs the training loop.
    ///
    /// The training environment is built from `env_config`. Evaluation and eval
    /// videos use `eval_policy`, or `agent` if it is `None`. `oracle` is only
    /// required when relabeling is enabled.
    ///
    /// Every call is an independent run starting from an empty replay buffer.
    pub fn train<E, A, V, R>(
        &mut self,
        env_config: &E::Config,
        agent: &mut A,
        mut eval_policy: Option<&mut dyn Policy>,
        mut oracle: Option<&mut dyn Policy>,
        evaluator: &mut V,
        recorder: &mut R,
    ) -> Result<TrainerState>
    where
        E: Env,
        A: Agent,
        V: Evaluator,
        R: Recorder,
    {
        self.config.validate()?;
        if self.config.relabel_with_expert && oracle.is_none() {
            return Err(TrainerError::MissingOracle.into());
        }
        self.buffer = ReplayBuffer::build(&self.replay_buffer_config)?;

        let start_time = SystemTime::now();
        let mut state = TrainerState::default();
        let mut env = None;

        for itr in 0..self.config.n_iter {
            info!("********** Iteration {} ************", itr);
            let log_video = self.config.video_log_freq.map_or(false, |f| itr % f == 0);
            let log_metrics = itr % self.config.scalar_log_freq == 0;

            // Collect trajectories
            let (mut paths, envsteps, train_video_paths) = match itr {
                0 => (self.load_expert_data()?, 0, None),
                _ => {
                    if env.is_none() {
                        env = Some(E::build(env_config, self.config.seed)?);
                    }
                    let env = env.as_mut().context("Training environment is not built")?;
                    self.collect_training_trajectories(env, agent, log_video)?
                }
            };
            state.total_envsteps += envsteps;

            // Relabel with the oracle
            if self.config.relabel_with_expert && itr >= self.config.start_relabel_with_expert {
                if let Some(oracle) = oracle.as_mut() {
                    info!("Relabelling collected observations with the oracle");
                    relabel_with_expert(&mut **oracle, &mut paths)?;
                }
            }

            self.buffer
                .add_rollouts(&paths, RewardLayout::Concatenated)?;
            let training_logs = self.train_agent(agent)?;

            if log_video || log_metrics {
                info!("Beginning logging procedure");
                self.perform_logging(
                    itr,
                    &paths,
                    train_video_paths,
                    training_logs.last(),
                    log_video,
                    log_metrics,
                    agent,
                    &mut eval_policy,
                    evaluator,
                    recorder,
                    &mut state,
                    &start_time,
                )?;

                if self.config.save_params {
                    self.save_params(agent, itr)?;
                }
            }

            state.iterations += 1;
        }

        Ok(state)
    }

    fn load_expert_data(&self) -> Result<Vec<Trajectory>> {
        let path = self
            .config
            .expert_data
            .as_ref()
            .ok_or(TrainerError::MissingExpertData)?;
        info!("Loading expert data from {:?}", path);
        load_expert_data(path)
    }

    fn collect_training_trajectories<E: Env, A: Agent>(
        &self,
        env: &mut E,
        agent: &mut A,
        log_video: bool,
    ) -> Result<(Vec<Trajectory>, usize, Option<Vec<Trajectory>>)> {
        info!("Collecting data to be used for training");
        let (paths, envsteps) =
            sample_batch(env, agent, self.config.batch_size, self.config.ep_len, false)?;

        let train_video_paths = match log_video {
            true => {
                info!("Collecting train rollouts to be used for saving videos");
                Some(sample_fixed_count(
                    env,
                    agent,
                    self.config.n_videos,
                    self.config.max_video_len,
                    true,
                )?)
            }
            false => None,
        };

        Ok((paths, envsteps, train_video_paths))
    }

    fn train_agent<A: Agent>(&mut self, agent: &mut A) -> Result<Vec<Record>> {
        info!("Training agent using sampled data from replay buffer");
        (0..self.config.num_agent_train_steps_per_iter)
            .map(|_| {
                let batch = self.buffer.batch(self.config.train_batch_size)?;
                agent.train(batch)
            })
            .collect()
    }

    #[allow(clippy::too_many_arguments)]
    fn perform_logging<A: Agent, V: Evaluator, R: Recorder>(
        &self,
        itr: usize,
        paths: &[Trajectory],
        train_video_paths: Option<Vec<Trajectory>>,
        training_log: Option<&Record>,
        log_video: bool,
        log_metrics: bool,
        agent: &mut A,
        eval_policy: &mut Option<&mut dyn Policy>,
        evaluator: &mut V,
        recorder: &mut R,
        state: &mut TrainerState,
        start_time: &SystemTime,
    ) -> Result<()> {
        let (n_videos, fps) = (self.config.n_videos, self.config.fps);

        if let (true, Some(train_video_paths)) = (log_video, train_video_paths) {
            info!("Collecting video rollouts for eval");
            let max_len = self.config.max_video_len;
            let eval_video_paths = match eval_policy.as_mut() {
                Some(policy) => evaluator.sample_videos(&mut **policy, n_videos, max_len)?,
                None => evaluator.sample_videos(agent, n_videos, max_len)?,
            };

            info!("Saving train and eval rollouts as videos");
            recorder.log_paths_as_videos("train_rollouts", &train_video_paths, itr, fps, n_videos)?;
            recorder.log_paths_as_videos("eval_rollouts", &eval_video_paths, itr, fps, n_videos)?;
        }

        if log_metrics {
            info!("Collecting data for eval");
            let eval = match eval_policy.as_mut() {
                Some(policy) => evaluator.evaluate(&mut **policy)?,
                None => evaluator.evaluate(agent)?,
            };
            let train_stats = PathStats::from_paths(paths)?;

            let mut record = eval.stats.to_record("Eval_");
            record.merge_inplace(train_stats.to_record("Train_"));
            record.insert(
                "Train_EnvstepsSoFar",
                Scalar(state.total_envsteps as f32),
            );
            record.insert("TimeSinceStart", Scalar(start_time.elapsed()?.as_secs_f32()));
            if let Some(training_log) = training_log {
                record.merge_inplace(training_log.clone());
            }

            let initial_return = *state
                .initial_return
                .get_or_insert(train_stats.average_return);
            record.insert("Initial_DataCollection_AverageReturn", Scalar(initial_return));

            for (k, v) in record.scalars() {
                info!("{} : {}", k, v);
            }
            recorder.write(&record, itr);
            recorder.flush(itr);
            info!("Done logging");
        }

        Ok(())
    }

    fn save_params<A: Agent>(&self, agent: &A, itr: usize) -> Result<()> {
        let model_dir = self
            .config
            .model_dir
            .as_ref()
            .ok_or(TrainerError::MissingModelDir)?;
        let path = Path::new(model_dir).join(format!("itr_{}", itr));
        agent
            .save_params(&path)
            .with_context(|| format!("Failed to save agent parameters in {:?}", path))?;
        info!("Saved the agent parameters in {:?}", path);
        Ok(())
    }
}

/// Replaces the actions of `paths` with the actions of `oracle`.
///
/// The oracle is queried on every observation of every trajectory, in order.
/// Other fields of the trajectories are left untouched.
pub fn relabel_with_expert<P: Policy + ?Sized>(
    oracle: &mut P,
    paths: &mut [Trajectory],
) -> Result<()> {
    for path in paths.iter_mut() {
        let acts = path
            .observation()
            .outer_iter()
            .map(|ob| oracle.get_action(&ob.to_owned()))
            .collect::<Result<Vec<_>>>()?;
        let views = acts.iter().map(|a| a.view()).collect::<Vec<_>>();
        let action: Array2<f32> = ndarray::stack(Axis(0), &views)
            .context("Oracle actions have different widths")?;
        path.relabel_actions(action)?;
    }
    Ok(())
}
