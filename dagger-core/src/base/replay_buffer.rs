//! Replay buffer interface.
//!
//! The [`Trainer`](crate::Trainer) builds its buffer and draws training batches
//! through [`ReplayBufferBase`].
use anyhow::Result;

/// Interface for replay buffers that generate batches for training.
pub trait ReplayBufferBase {
    /// Configuration parameters for the replay buffer.
    type Config: Clone;

    /// The type of batch generated for training.
    type Batch;

    /// Builds a new replay buffer from the given configuration.
    fn build(config: &Self::Config) -> Result<Self>
    where
        Self: Sized;

    /// Samples a batch of at most `size` transitions for training.
    ///
    /// Fails if the buffer holds no transition.
    fn batch(&mut self, size: usize) -> Result<Self::Batch>;
}
