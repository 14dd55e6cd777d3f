use super::Recorder;
use crate::Trajectory;
use anyhow::Result;

/// Summary of a call to [`Recorder::log_paths_as_videos`] kept by [`BufferedRecorder`].
#[derive(Debug, Clone, PartialEq)]
pub struct VideoEntry {
    /// Title of the videos.
    pub title: String,

    /// Iteration.
    pub step: usize,

    /// Number of stored videos.
    pub n_videos: usize,

    /// Frames per second requested by the caller.
    pub fps: f32,
}

/// Buffered recorder.
///
/// Keeps every logged value in memory, which is handy for tests and for
/// post-processing a run without a logging backend.
#[derive(Default)]
pub struct BufferedRecorder {
    scalars: Vec<(String, f32, usize)>,
    videos: Vec<VideoEntry>,
    flushed_steps: Vec<usize>,
}

impl BufferedRecorder {
    /// Construct the recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all scalars in the order they were logged as `(key, value, step)`.
    pub fn scalars(&self) -> &[(String, f32, usize)] {
        &self.scalars
    }

    /// Returns the values logged under `key` as `(step, value)`.
    pub fn scalar_series(&self, key: &str) -> Vec<(usize, f32)> {
        self.scalars
            .iter()
            .filter(|(k, _, _)| k == key)
            .map(|(_, v, s)| (*s, *v))
            .collect()
    }

    /// Returns the video entries.
    pub fn videos(&self) -> &[VideoEntry] {
        &self.videos
    }

    /// Returns the steps at which [`Recorder::flush`] was called.
    pub fn flushed_steps(&self) -> &[usize] {
        &self.flushed_steps
    }
}

impl Recorder for BufferedRecorder {
    fn log_scalar(&mut self, key: &str, value: f32, step: usize) {
        self.scalars.push((key.to_string(), value, step));
    }

    fn log_paths_as_videos(
        &mut self,
        title: &str,
        paths: &[Trajectory],
        step: usize,
        fps: f32,
        max_videos: usize,
    ) -> Result<()> {
        let n_videos = paths
            .iter()
            .filter(|p| p.image_obs().is_some())
            .take(max_videos)
            .count();
        self.videos.push(VideoEntry {
            title: title.to_string(),
            step,
            n_videos,
            fps,
        });
        Ok(())
    }

    fn flush(&mut self, step: usize) {
        self.flushed_steps.push(step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Record, RecordValue};

    #[test]
    fn test_write_logs_scalars_in_key_order() {
        let mut record = Record::from_scalar("Train_AverageReturn", 2.0);
        record.insert("Eval_AverageReturn", RecordValue::Scalar(15.0));

        let mut recorder = BufferedRecorder::new();
        recorder.write(&record, 3);
        assert_eq!(
            recorder.scalars(),
            &[
                ("Eval_AverageReturn".to_string(), 15.0, 3),
                ("Train_AverageReturn".to_string(), 2.0, 3)
            ]
        );
    }
}
