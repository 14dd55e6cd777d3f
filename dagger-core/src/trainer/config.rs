//! Configuration of [`Trainer`](super::Trainer).
use crate::error::TrainerError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::{Path, PathBuf},
};

/// Configuration of [`Trainer`](super::Trainer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(default)]
pub struct TrainerConfig {
    /// The number of iterations.
    pub n_iter: usize,

    /// Minimum number of environment steps collected per iteration.
    pub batch_size: usize,

    /// Minimum number of environment steps collected for evaluation.
    pub eval_batch_size: usize,

    /// Number of transitions per training minibatch.
    pub train_batch_size: usize,

    /// Number of calls of [`Agent::train`](crate::Agent::train) per iteration.
    pub num_agent_train_steps_per_iter: usize,

    /// Maximum length of rollouts.
    pub ep_len: usize,

    /// Interval of logging metrics in iterations.
    pub scalar_log_freq: usize,

    /// Interval of logging videos in iterations, disabled if `None`.
    pub video_log_freq: Option<usize>,

    /// Number of rollouts rendered on video iterations.
    pub n_videos: usize,

    /// Maximum length of rendered rollouts.
    pub max_video_len: usize,

    /// Frame rate passed to the recorder.
    pub fps: f32,

    /// Expert dataset loaded at the first iteration.
    pub expert_data: Option<PathBuf>,

    /// Whether to replace collected actions with those of the oracle.
    pub relabel_with_expert: bool,

    /// First iteration where relabeling applies.
    pub start_relabel_with_expert: usize,

    /// Whether to save agent parameters on logging iterations.
    pub save_params: bool,

    /// Where to save the agent parameters.
    pub model_dir: Option<String>,

    /// Seed of the training environment.
    pub seed: i64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            n_iter: 1,
            batch_size: 1000,
            eval_batch_size: 1000,
            train_batch_size: 100,
            num_agent_train_steps_per_iter: 1000,
            ep_len: 1000,
            scalar_log_freq: 1,
            video_log_freq: None,
            n_videos: 2,
            max_video_len: 40,
            fps: 20.0,
            expert_data: None,
            relabel_with_expert: false,
            start_relabel_with_expert: 1,
            save_params: false,
            model_dir: None,
            seed: 1,
        }
    }
}

impl TrainerConfig {
    /// Sets the number of iterations.
    pub fn n_iter(mut self, v: usize) -> Self {
        self.n_iter = v;
        self
    }

    /// Sets the number of environment steps collected per iteration.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Sets the number of environment steps collected for evaluation.
    pub fn eval_batch_size(mut self, v: usize) -> Self {
        self.eval_batch_size = v;
        self
    }

    /// Sets the minibatch size.
    pub fn train_batch_size(mut self, v: usize) -> Self {
        self.train_batch_size = v;
        self
    }

    /// Sets the number of training steps per iteration.
    pub fn num_agent_train_steps_per_iter(mut self, v: usize) -> Self {
        self.num_agent_train_steps_per_iter = v;
        self
    }

    /// Sets the maximum length of rollouts.
    pub fn ep_len(mut self, v: usize) -> Self {
        self.ep_len = v;
        self
    }

    /// Sets the interval of logging metrics.
    pub fn scalar_log_freq(mut self, v: usize) -> Self {
        self.scalar_log_freq = v;
        self
    }

    /// Sets the interval of logging videos.
    pub fn video_log_freq(mut self, v: Option<usize>) -> Self {
        self.video_log_freq = v;
        self
    }

    /// Sets the number of rendered rollouts.
    pub fn n_videos(mut self, v: usize) -> Self {
        self.n_videos = v;
        self
    }

    /// Sets the maximum length of rendered rollouts.
    pub fn max_video_len(mut self, v: usize) -> Self {
        self.max_video_len = v;
        self
    }

    /// Sets the frame rate of videos.
    pub fn fps(mut self, v: f32) -> Self {
        self.fps = v;
        self
    }

    /// Sets the path of the expert dataset.
    pub fn expert_data(mut self, v: impl AsRef<Path>) -> Self {
        self.expert_data = Some(v.as_ref().to_path_buf());
        self
    }

    /// Enables relabeling with the oracle.
    pub fn relabel_with_expert(mut self, v: bool) -> Self {
        self.relabel_with_expert = v;
        self
    }

    /// Sets the first iteration where relabeling applies.
    pub fn start_relabel_with_expert(mut self, v: usize) -> Self {
        self.start_relabel_with_expert = v;
        self
    }

    /// Enables saving agent parameters.
    pub fn save_params(mut self, v: bool) -> Self {
        self.save_params = v;
        self
    }

    /// Sets the directory of saved parameters.
    pub fn model_dir(mut self, v: impl Into<String>) -> Self {
        self.model_dir = Some(v.into());
        self
    }

    /// Sets the seed of the training environment.
    pub fn seed(mut self, v: i64) -> Self {
        self.seed = v;
        self
    }

    /// Checks values that would make the training loop meaningless.
    ///
    /// The presence of an oracle is checked by the trainer, which receives it.
    pub fn validate(&self) -> Result<(), TrainerError> {
        let positive = [
            ("n_iter", self.n_iter),
            ("batch_size", self.batch_size),
            ("eval_batch_size", self.eval_batch_size),
            ("ep_len", self.ep_len),
            ("train_batch_size", self.train_batch_size),
            (
                "num_agent_train_steps_per_iter",
                self.num_agent_train_steps_per_iter,
            ),
            ("scalar_log_freq", self.scalar_log_freq),
        ];
        for (name, v) in positive.iter() {
            if *v == 0 {
                return Err(TrainerError::InvalidConfig(format!(
                    "{} must be >= 1",
                    name
                )));
            }
        }
        if self.video_log_freq == Some(0) {
            return Err(TrainerError::InvalidConfig(
                "video_log_freq must be >= 1".to_string(),
            ));
        }
        if self.expert_data.is_none() {
            return Err(TrainerError::MissingExpertData);
        }
        if self.save_params && self.model_dir.is_none() {
            return Err(TrainerError::MissingModelDir);
        }
        Ok(())
    }

    /// Constructs [`TrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TrainerConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
