//! Bounded replay buffer of transitions.
mod base;
mod batch;
mod config;
pub use base::{ReplayBuffer, RewardLayout};
pub use batch::TransitionBatch;
pub use config::ReplayBufferConfig;
