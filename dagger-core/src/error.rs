//! Errors in the library.
use thiserror::Error;

/// Errors on [`Record`](crate::record::Record) access.
#[derive(Error, Debug)]
pub enum RecordError {
    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),
}

/// Violations of the [`Trajectory`](crate::Trajectory) schema.
#[derive(Error, Debug, PartialEq)]
pub enum TrajectoryError {
    /// A rollout must contain at least one step.
    #[error("Trajectory has no steps")]
    Empty,

    /// A per-timestep field has a length different from `reward`.
    #[error("Field `{field}` has {actual} steps, expected {expected}")]
    LengthMismatch {
        /// Name of the field.
        field: &'static str,
        /// Expected number of steps.
        expected: usize,
        /// Actual number of steps.
        actual: usize,
    },

    /// The last step is not flagged as terminal.
    #[error("The last terminal flag is {0}, expected 1")]
    NotTerminated(f32),

    /// A terminal flag is neither 0 nor 1.
    #[error("Terminal flag at step {step} is {value}, expected 0 or 1")]
    InvalidTerminal {
        /// Index of the step.
        step: usize,
        /// Offending value.
        value: f32,
    },

    /// Observations and next observations have different widths.
    #[error("Observation width {obs} differs from next observation width {next_obs}")]
    WidthMismatch {
        /// Width of `observation`.
        obs: usize,
        /// Width of `next_observation`.
        next_obs: usize,
    },

    /// Rows of a field have different widths.
    #[error("Rows of `{0}` have different widths")]
    RaggedRows(&'static str),
}

/// Errors of the trajectory sampler.
#[derive(Error, Debug, PartialEq)]
pub enum SamplerError {
    /// `max_length` must be positive, otherwise a rollout never ends.
    #[error("max_length must be >= 1, got {0}")]
    InvalidMaxLength(usize),
}

/// Errors of the [`ReplayBuffer`](crate::replay_buffer::ReplayBuffer).
#[derive(Error, Debug, PartialEq)]
pub enum BufferError {
    /// Sampling was requested before any transition was inserted.
    #[error("Cannot sample from an empty replay buffer")]
    Empty,

    /// The reward layout differs from the one fixed by the first insertion.
    #[error("Reward layout {requested:?} differs from the layout {fixed:?} of this buffer")]
    RewardLayoutMismatch {
        /// Layout fixed by the first insertion.
        fixed: crate::replay_buffer::RewardLayout,
        /// Layout of the rejected call.
        requested: crate::replay_buffer::RewardLayout,
    },

    /// Observation or action width differs from the stored transitions.
    #[error("Field `{field}` has width {actual}, the buffer stores width {expected}")]
    ShapeMismatch {
        /// Name of the field.
        field: &'static str,
        /// Width stored in the buffer.
        expected: usize,
        /// Width of the rejected trajectory.
        actual: usize,
    },

    /// Capacity must be positive.
    #[error("Replay buffer capacity must be >= 1")]
    InvalidCapacity,

    /// Per-trajectory rewards are only kept in [`RewardLayout::PerTrajectory`].
    ///
    /// [`RewardLayout::PerTrajectory`]: crate::replay_buffer::RewardLayout::PerTrajectory
    #[error("The buffer does not keep per-trajectory rewards")]
    NotPerTrajectory,
}

/// Configuration errors detected by the [`Trainer`](crate::Trainer) before training.
#[derive(Error, Debug, PartialEq)]
pub enum TrainerError {
    /// The first iteration needs a bootstrap expert dataset.
    #[error("No initial expert data provided for the first iteration")]
    MissingExpertData,

    /// Relabeling was requested without an oracle policy.
    #[error("Relabeling with expert is enabled but no oracle policy is given")]
    MissingOracle,

    /// Saving parameters was requested without a model directory.
    #[error("save_params is enabled but model_dir is not set")]
    MissingModelDir,

    /// A configuration value is out of range.
    #[error("Invalid trainer configuration: {0}")]
    InvalidConfig(String),
}

/// Errors when computing rollout statistics.
#[derive(Error, Debug, PartialEq)]
pub enum StatsError {
    /// Statistics over zero trajectories are undefined.
    #[error("Cannot compute statistics of an empty set of trajectories")]
    Empty,
}
