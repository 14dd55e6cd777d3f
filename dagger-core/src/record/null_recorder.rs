use super::Recorder;
use crate::Trajectory;
use anyhow::Result;

/// A recorder that ignores any record. This struct is used just for debugging.
#[derive(Default)]
pub struct NullRecorder {}

impl Recorder for NullRecorder {
    fn log_scalar(&mut self, _key: &str, _value: f32, _step: usize) {}

    fn log_paths_as_videos(
        &mut self,
        _title: &str,
        _paths: &[Trajectory],
        _step: usize,
        _fps: f32,
        _max_videos: usize,
    ) -> Result<()> {
        Ok(())
    }

    fn flush(&mut self, _step: usize) {}
}
