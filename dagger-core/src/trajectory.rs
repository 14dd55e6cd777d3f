//! Rollouts recorded by the [`sampler`](crate::sampler).
mod dataset;
use crate::{error::TrajectoryError, Act, Frame, Obs};
use ndarray::{Array1, Array2, Array4, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
pub use dataset::{load_expert_data, save_expert_data};

/// A single rollout, from reset to the end of the episode.
///
/// All per-timestep fields have the same number of steps `T >= 1` and the last
/// step is always terminal. The schema is validated on construction and on
/// deserialization. Only the actions can be replaced afterwards, see
/// [`Trajectory::relabel_actions`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTrajectory", into = "RawTrajectory")]
pub struct Trajectory {
    observation: Array2<f32>,
    action: Array2<f32>,
    reward: Array1<f32>,
    next_observation: Array2<f32>,
    terminal: Array1<f32>,
    image_obs: Option<Array4<u8>>,
}

/// Unvalidated representation used for serialization.
#[derive(Clone, Serialize, Deserialize)]
struct RawTrajectory {
    observation: Array2<f32>,
    action: Array2<f32>,
    reward: Array1<f32>,
    next_observation: Array2<f32>,
    terminal: Array1<f32>,
    #[serde(default)]
    image_obs: Option<Array4<u8>>,
}

impl TryFrom<RawTrajectory> for Trajectory {
    type Error = TrajectoryError;

    fn try_from(raw: RawTrajectory) -> Result<Self, Self::Error> {
        Trajectory::new(
            raw.observation,
            raw.action,
            raw.reward,
            raw.next_observation,
            raw.terminal,
            raw.image_obs,
        )
    }
}

impl From<Trajectory> for RawTrajectory {
    fn from(t: Trajectory) -> Self {
        Self {
            observation: t.observation,
            action: t.action,
            reward: t.reward,
            next_observation: t.next_observation,
            terminal: t.terminal,
            image_obs: t.image_obs,
        }
    }
}

fn check_len(field: &'static str, expected: usize, actual: usize) -> Result<(), TrajectoryError> {
    if expected != actual {
        return Err(TrajectoryError::LengthMismatch {
            field,
            expected,
            actual,
        });
    }
    Ok(())
}

impl Trajectory {
    /// Constructs a trajectory after validating its schema.
    pub fn new(
        observation: Array2<f32>,
        action: Array2<f32>,
        reward: Array1<f32>,
        next_observation: Array2<f32>,
        terminal: Array1<f32>,
        image_obs: Option<Array4<u8>>,
    ) -> Result<Self, TrajectoryError> {
        let len = reward.len();
        if len == 0 {
            return Err(TrajectoryError::Empty);
        }
        check_len("observation", len, observation.nrows())?;
        check_len("action", len, action.nrows())?;
        check_len("next_observation", len, next_observation.nrows())?;
        check_len("terminal", len, terminal.len())?;
        if let Some(frames) = &image_obs {
            check_len("image_obs", len, frames.shape()[0])?;
        }
        if observation.ncols() != next_observation.ncols() {
            return Err(TrajectoryError::WidthMismatch {
                obs: observation.ncols(),
                next_obs: next_observation.ncols(),
            });
        }
        if let Some((step, value)) = terminal
            .iter()
            .enumerate()
            .find(|(_, v)| **v != 0.0 && **v != 1.0)
        {
            return Err(TrajectoryError::InvalidTerminal {
                step,
                value: *value,
            });
        }
        if terminal[len - 1] != 1.0 {
            return Err(TrajectoryError::NotTerminated(terminal[len - 1]));
        }

        Ok(Self {
            observation,
            action,
            reward,
            next_observation,
            terminal,
            image_obs,
        })
    }

    /// Constructs a trajectory from per-step rows.
    ///
    /// `frames` may be empty; otherwise it must hold one frame per step.
    pub fn from_steps(
        observation: &[Obs],
        action: &[Act],
        reward: Vec<f32>,
        next_observation: &[Obs],
        terminal: Vec<f32>,
        frames: &[Frame],
    ) -> anyhow::Result<Self> {
        let image_obs = match frames.is_empty() {
            true => None,
            false => {
                let views = frames.iter().map(|f| f.view()).collect::<Vec<_>>();
                Some(ndarray::stack(ndarray::Axis(0), &views)?)
            }
        };

        Ok(Self::new(
            stack_rows("observation", observation)?,
            stack_rows("action", action)?,
            Array1::from(reward),
            stack_rows("next_observation", next_observation)?,
            Array1::from(terminal),
            image_obs,
        )?)
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.reward.len()
    }

    /// Always `false`, a trajectory has at least one step.
    pub fn is_empty(&self) -> bool {
        self.reward.is_empty()
    }

    /// Observations `o_t`, shape `[T, obs_dim]`.
    pub fn observation(&self) -> ArrayView2<f32> {
        self.observation.view()
    }

    /// Actions `a_t`, shape `[T, act_dim]`.
    pub fn action(&self) -> ArrayView2<f32> {
        self.action.view()
    }

    /// Rewards `r_t`.
    pub fn reward(&self) -> ArrayView1<f32> {
        self.reward.view()
    }

    /// Next observations `o_t+1`, shape `[T, obs_dim]`.
    pub fn next_observation(&self) -> ArrayView2<f32> {
        self.next_observation.view()
    }

    /// Terminal flags, `1.0` only at the last step.
    pub fn terminal(&self) -> ArrayView1<f32> {
        self.terminal.view()
    }

    /// Rendered frames, shape `[T, height, width, channels]`.
    pub fn image_obs(&self) -> Option<&Array4<u8>> {
        self.image_obs.as_ref()
    }

    /// Width of observations.
    pub fn obs_dim(&self) -> usize {
        self.observation.ncols()
    }

    /// Width of actions.
    pub fn act_dim(&self) -> usize {
        self.action.ncols()
    }

    /// Sum of rewards.
    pub fn total_return(&self) -> f32 {
        self.reward.sum()
    }

    /// Replaces the actions, keeping every other field untouched.
    ///
    /// Used to relabel self-collected rollouts with the actions of an oracle.
    pub fn relabel_actions(&mut self, action: Array2<f32>) -> Result<(), TrajectoryError> {
        check_len("action", self.len(), action.nrows())?;
        self.action = action;
        Ok(())
    }
}

/// Stacks equal-width rows into a `[rows, width]` matrix.
fn stack_rows(field: &'static str, rows: &[Obs]) -> Result<Array2<f32>, TrajectoryError> {
    let width = rows.first().map(|r| r.len()).unwrap_or(0);
    if rows.iter().any(|r| r.len() != width) {
        return Err(TrajectoryError::RaggedRows(field));
    }
    let data = rows.iter().flat_map(|r| r.iter().copied()).collect();
    Array2::from_shape_vec((rows.len(), width), data).map_err(|_| TrajectoryError::RaggedRows(field))
}
