//! Replay buffer windowed to the most recent transitions.
use super::{ReplayBufferConfig, TransitionBatch};
use crate::{error::BufferError, ReplayBufferBase, Trajectory};
use anyhow::Result;
use log::debug;
use ndarray::{s, Array1, Array2, Axis};
use rand::{rngs::StdRng, seq::index, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// How rewards are kept in addition to the flattened reward store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum RewardLayout {
    /// Rewards are only kept concatenated across trajectories.
    Concatenated,

    /// Rewards are also kept as one sequence per trajectory, see
    /// [`ReplayBuffer::reward_sequences`].
    PerTrajectory,
}

/// Replay buffer keeping the most recent `capacity` transitions.
///
/// Trajectories are flattened into five stores (observations, actions, rewards,
/// next observations and terminal flags) sharing the same index for the same
/// transition. The stores are ring buffers: when more than `capacity` transitions
/// were inserted, the oldest ones are overwritten, so the buffer always holds the
/// last `min(capacity, inserted)` transitions in insertion order.
///
/// Every inserted trajectory is also kept as is in an unbounded list, see
/// [`ReplayBuffer::paths`].
///
/// # Examples
///
/// ```rust
/// use dagger_core::replay_buffer::{ReplayBuffer, ReplayBufferConfig, RewardLayout};
/// use dagger_core::ReplayBufferBase;
///
/// let config = ReplayBufferConfig::default().capacity(5);
/// let mut buffer = ReplayBuffer::build(&config).unwrap();
/// assert!(buffer.sample_random(1).is_err());
/// ```
pub struct ReplayBuffer {
    capacity: usize,

    /// Next position to write.
    i: usize,

    size: usize,
    obs: Array2<f32>,
    act: Array2<f32>,
    next_obs: Array2<f32>,
    reward: Array1<f32>,
    terminal: Array1<f32>,

    /// Fixed by the first non-empty insertion, together with the store widths.
    layout: Option<RewardLayout>,

    reward_sequences: VecDeque<Array1<f32>>,
    reward_sequences_len: usize,
    paths: Vec<Trajectory>,
    rng: StdRng,
}

impl ReplayBuffer {
    /// Constructs an empty buffer.
    pub fn new(capacity: usize, seed: u64) -> Result<Self, BufferError> {
        if capacity == 0 {
            return Err(BufferError::InvalidCapacity);
        }

        Ok(Self {
            capacity,
            i: 0,
            size: 0,
            obs: Array2::zeros((0, 0)),
            act: Array2::zeros((0, 0)),
            next_obs: Array2::zeros((0, 0)),
            reward: Array1::zeros(0),
            terminal: Array1::zeros(0),
            layout: None,
            reward_sequences: VecDeque::new(),
            reward_sequences_len: 0,
            paths: vec![],
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Appends the transitions of `paths`, in order, evicting the oldest ones
    /// beyond the capacity.
    ///
    /// The reward layout is fixed by the first non-empty call; a different layout
    /// in a later call is rejected. Trajectories whose observation or action
    /// width differs from the stored transitions are rejected as well. On error
    /// the buffer is left unchanged.
    pub fn add_rollouts(
        &mut self,
        paths: &[Trajectory],
        layout: RewardLayout,
    ) -> Result<(), BufferError> {
        if let Some(fixed) = self.layout {
            if fixed != layout {
                return Err(BufferError::RewardLayoutMismatch {
                    fixed,
                    requested: layout,
                });
            }
        }
        let first = match paths.first() {
            Some(path) => path,
            None => return Ok(()),
        };

        let (obs_dim, act_dim) = match self.layout {
            Some(_) => (self.obs.ncols(), self.act.ncols()),
            None => (first.obs_dim(), first.act_dim()),
        };
        for path in paths.iter() {
            check_width("observation", obs_dim, path.obs_dim())?;
            check_width("action", act_dim, path.act_dim())?;
        }

        if self.layout.is_none() {
            self.obs = Array2::zeros((self.capacity, obs_dim));
            self.act = Array2::zeros((self.capacity, act_dim));
            self.next_obs = Array2::zeros((self.capacity, obs_dim));
            self.reward = Array1::zeros(self.capacity);
            self.terminal = Array1::zeros(self.capacity);
            self.layout = Some(layout);
        }

        // Transitions that would be overwritten within this call are not written
        let n_new: usize = paths.iter().map(|p| p.len()).sum();
        let mut skip = n_new.saturating_sub(self.capacity);
        for path in paths.iter() {
            if skip >= path.len() {
                skip -= path.len();
                continue;
            }
            for t in skip..path.len() {
                self.write(path, t);
            }
            skip = 0;
        }
        self.size = (self.size + n_new).min(self.capacity);

        if layout == RewardLayout::PerTrajectory {
            for path in paths.iter() {
                self.reward_sequences.push_back(path.reward().to_owned());
                self.reward_sequences_len += path.len();
            }
            self.trim_reward_sequences();
        }

        self.paths.extend(paths.iter().cloned());
        debug!(
            "Added {} trajectories ({} transitions), buffer size = {}/{}",
            paths.len(),
            n_new,
            self.size,
            self.capacity
        );

        Ok(())
    }

    /// Samples `min(batch_size, len())` distinct transitions uniformly at random.
    pub fn sample_random(&mut self, batch_size: usize) -> Result<TransitionBatch, BufferError> {
        if self.size == 0 {
            return Err(BufferError::Empty);
        }
        let n = batch_size.min(self.size);
        let ixs = index::sample(&mut self.rng, self.size, n)
            .into_iter()
            .map(|k| self.physical_index(k))
            .collect::<Vec<_>>();
        Ok(self.select(&ixs))
    }

    /// Returns the last `min(batch_size, len())` transitions in insertion order.
    pub fn sample_most_recent(&self, batch_size: usize) -> Result<TransitionBatch, BufferError> {
        if self.size == 0 {
            return Err(BufferError::Empty);
        }
        let n = batch_size.min(self.size);
        let ixs = (self.size - n..self.size)
            .map(|k| self.physical_index(k))
            .collect::<Vec<_>>();
        Ok(self.select(&ixs))
    }

    /// Number of stored transitions.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Number of stored transitions, same as [`ReplayBuffer::len`].
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if no transition was inserted yet.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Maximum number of stored transitions.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// All trajectories ever added, including those whose transitions were evicted.
    pub fn paths(&self) -> &[Trajectory] {
        &self.paths
    }

    /// The reward layout, `None` before the first insertion.
    pub fn reward_layout(&self) -> Option<RewardLayout> {
        self.layout
    }

    /// Per-trajectory reward sequences covering exactly the stored transitions.
    ///
    /// The window is counted in transitions, like the other stores: sequences
    /// whose transitions were all evicted are dropped and the oldest remaining
    /// sequence is cut at the front. The concatenation of the sequences is thus
    /// equal to the stored rewards in insertion order.
    pub fn reward_sequences(&self) -> Result<&VecDeque<Array1<f32>>, BufferError> {
        match self.layout {
            Some(RewardLayout::PerTrajectory) => Ok(&self.reward_sequences),
            _ => Err(BufferError::NotPerTrajectory),
        }
    }

    fn write(&mut self, path: &Trajectory, t: usize) {
        let i = self.i;
        self.obs.row_mut(i).assign(&path.observation().row(t));
        self.act.row_mut(i).assign(&path.action().row(t));
        self.next_obs.row_mut(i).assign(&path.next_observation().row(t));
        self.reward[i] = path.reward()[t];
        self.terminal[i] = path.terminal()[t];
        self.i = (i + 1) % self.capacity;
    }

    /// Maps the `k`-th oldest stored transition to its position in the stores.
    #[inline]
    fn physical_index(&self, k: usize) -> usize {
        (self.i + self.capacity - self.size + k) % self.capacity
    }

    fn select(&self, ixs: &[usize]) -> TransitionBatch {
        TransitionBatch {
            obs: self.obs.select(Axis(0), ixs),
            act: self.act.select(Axis(0), ixs),
            reward: self.reward.select(Axis(0), ixs),
            next_obs: self.next_obs.select(Axis(0), ixs),
            terminal: self.terminal.select(Axis(0), ixs),
        }
    }

    fn trim_reward_sequences(&mut self) {
        let mut excess = self.reward_sequences_len - self.size;
        while excess > 0 {
            let front = match self.reward_sequences.front_mut() {
                Some(front) => front,
                None => break,
            };
            if front.len() <= excess {
                excess -= front.len();
                self.reward_sequences_len -= front.len();
                self.reward_sequences.pop_front();
            } else {
                let trimmed = front.slice(s![excess..]).to_owned();
                *front = trimmed;
                self.reward_sequences_len -= excess;
                excess = 0;
            }
        }
    }
}

fn check_width(field: &'static str, expected: usize, actual: usize) -> Result<(), BufferError> {
    if expected != actual {
        return Err(BufferError::ShapeMismatch {
            field,
            expected,
            actual,
        });
    }
    Ok(())
}

impl ReplayBufferBase for ReplayBuffer {
    type Config = ReplayBufferConfig;
    type Batch = TransitionBatch;

    fn build(config: &Self::Config) -> Result<Self> {
        Ok(Self::new(config.capacity, config.seed)?)
    }

    fn batch(&mut self, size: usize) -> Result<Self::Batch> {
        Ok(self.sample_random(size)?)
    }
}
