use std::path::{Path, PathBuf};

use crate::{foundation::error::ClockResult, render::Frame};

/// Something that turns an ordered frame list into a video file.
///
/// Implementations receive frames that were already checked to be non-empty and uniformly
/// sized. Any failure should be reported as [`ClockError::Encoding`](crate::ClockError) so the
/// caller can retry with another codec.
pub trait VideoBackend {
    fn write_video(
        &mut self,
        frames: &[Frame],
        out_path: &Path,
        fps: u32,
        codec: &str,
    ) -> ClockResult<()>;
}

/// One call captured by [`InMemoryBackend`].
#[derive(Clone, Debug)]
pub struct WrittenVideo {
    pub out_path: PathBuf,
    pub fps: u32,
    pub codec: String,
    pub frames: Vec<Frame>,
}

/// Backend that keeps everything in memory. Useful for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    pub(crate) videos: Vec<WrittenVideo>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Videos in the order they were written.
    pub fn videos(&self) -> &[WrittenVideo] {
        &self.videos
    }
}

impl VideoBackend for InMemoryBackend {
    fn write_video(
        &mut self,
        frames: &[Frame],
        out_path: &Path,
        fps: u32,
        codec: &str,
    ) -> ClockResult<()> {
        self.videos.push(WrittenVideo {
            out_path: out_path.to_path_buf(),
            fps,
            codec: codec.to_string(),
            frames: frames.to_vec(),
        });
        Ok(())
    }
}
