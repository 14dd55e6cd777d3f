//! Tensorboard recorder for `dagger-core`.
use anyhow::{bail, Result};
use dagger_core::{record::Recorder, Trajectory};
use log::debug;
use ndarray::{Array3, ArrayView4};
use std::path::Path;
use tensorboard_rs::summary_writer::SummaryWriter;

/// Write records to TFRecord.
///
/// Tensorboard event files have no video type. Rollouts are written as
/// filmstrip images instead: the frames of a rollout are laid side by side in
/// a single RGB image.
pub struct TensorboardRecorder {
    writer: SummaryWriter,
}

impl TensorboardRecorder {
    /// Construct a [`TensorboardRecorder`].
    ///
    /// TFRecord will be stored in `logdir`.
    pub fn new<P: AsRef<Path>>(logdir: P) -> Self {
        Self {
            writer: SummaryWriter::new(logdir),
        }
    }
}

/// Lays frames `[T, H, W, C]` side by side into an image `[3, H, T * W]`.
///
/// Grayscale frames are replicated on the three channels and alpha channels are dropped.
pub fn filmstrip(frames: ArrayView4<u8>) -> Result<Array3<u8>> {
    let (t, h, w, c) = frames.dim();
    if t == 0 || h == 0 || w == 0 {
        bail!("Cannot make a filmstrip of empty frames {:?}", frames.dim());
    }
    if c != 1 && c != 3 && c != 4 {
        bail!("Frames with {} channels are not supported", c);
    }

    Ok(Array3::from_shape_fn((3, h, t * w), |(ch, y, x)| {
        let ch = if c == 1 { 0 } else { ch };
        frames[[x / w, y, x % w, ch]]
    }))
}

impl Recorder for TensorboardRecorder {
    fn log_scalar(&mut self, key: &str, value: f32, step: usize) {
        self.writer.add_scalar(key, value, step);
    }

    fn log_paths_as_videos(
        &mut self,
        title: &str,
        paths: &[Trajectory],
        step: usize,
        fps: f32,
        max_videos: usize,
    ) -> Result<()> {
        let frames = paths
            .iter()
            .filter_map(|p| p.image_obs())
            .take(max_videos);
        for (i, frames) in frames.enumerate() {
            let img = filmstrip(frames.view())?;
            let dim = img.shape().to_vec();
            let tag = format!("{}/{}", title, i);
            self.writer.add_image(&tag, &img.into_raw_vec(), &dim, step);
            debug!(
                "Wrote {} ({} frames, {} fps requested)",
                tag,
                frames.shape()[0],
                fps
            );
        }
        Ok(())
    }

    fn flush(&mut self, _step: usize) {
        self.writer.flush();
    }
}
