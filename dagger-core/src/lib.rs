#![warn(missing_docs)]
//! Core components of imitation learning with behavior cloning and DAgger.
//!
//! * [`sampler`] collects [`Trajectory`] objects by rolling out a [`Policy`] in an [`Env`].
//! * [`replay_buffer`] keeps the most recent transitions and samples minibatches.
//! * [`Trainer`] runs the iterations: data collection, relabeling with an oracle,
//!   training of an [`Agent`], evaluation and logging to a [`Recorder`](record::Recorder).
pub mod error;
pub mod record;
pub mod replay_buffer;
pub mod sampler;
pub mod dummy;

mod base;
pub use base::{Act, Agent, Env, Frame, Obs, Policy, ReplayBufferBase, Step};

mod trajectory;
pub use trajectory::{load_expert_data, save_expert_data, Trajectory};

mod stats;
pub use stats::PathStats;

mod evaluator;
pub use evaluator::{DefaultEvaluator, EvalOutcome, Evaluator};

mod trainer;
pub use trainer::{relabel_with_expert, Trainer, TrainerConfig, TrainerState};

mod argmax_policy;
pub use argmax_policy::{ArgmaxPolicy, QFunction};
