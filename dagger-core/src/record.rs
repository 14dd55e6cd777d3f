//! Types and traits for recording training metrics.
//!
//! * [`Record`] - A container of named values logged at an iteration
//! * [`RecordValue`] - The values that can be stored
//! * [`Recorder`] - The logger interface used by the [`Trainer`](crate::Trainer)
//! * [`BufferedRecorder`] - A recorder that keeps everything in memory
//! * [`NullRecorder`] - A recorder that discards all records
//!
//! # Basic Usage
//!
//! ```rust
//! use dagger_core::record::{Record, RecordValue};
//!
//! // following values are obtained with some process in reality
//! let step = 1;
//! let reward = -1f32;
//!
//! let mut record = Record::empty();
//! record.insert("Step", RecordValue::Scalar(step as f32));
//! record.insert("Reward", RecordValue::Scalar(reward));
//!
//! assert_eq!(record.scalars(), vec![("Reward", -1.0), ("Step", 1.0)]);
//! ```
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::{BufferedRecorder, VideoEntry};
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
