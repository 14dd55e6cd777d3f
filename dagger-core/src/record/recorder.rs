use super::Record;
use crate::Trajectory;
use anyhow::Result;

/// Logger interface used by the [`Trainer`](crate::Trainer).
pub trait Recorder {
    /// Writes a scalar value under `key` at the given iteration.
    fn log_scalar(&mut self, key: &str, value: f32, step: usize);

    /// Writes rendered rollouts.
    ///
    /// At most `max_videos` trajectories carrying frames are written under `title`.
    /// Trajectories without frames are skipped.
    fn log_paths_as_videos(
        &mut self,
        title: &str,
        paths: &[Trajectory],
        step: usize,
        fps: f32,
        max_videos: usize,
    ) -> Result<()>;

    /// Flushes pending values to the output destination.
    fn flush(&mut self, step: usize);

    /// Writes every scalar of a record with [`Recorder::log_scalar`], in key order.
    fn write(&mut self, record: &Record, step: usize) {
        for (k, v) in record.scalars() {
            self.log_scalar(k, v, step);
        }
    }
}
