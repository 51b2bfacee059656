pub mod backend;
pub mod ffmpeg;

use std::path::Path;

use crate::{
    foundation::error::{ClockError, ClockResult},
    render::Frame,
};

pub use backend::{InMemoryBackend, VideoBackend, WrittenVideo};
pub use ffmpeg::{FfmpegBackend, FfmpegOpts, is_ffmpeg_on_path};

pub const DEFAULT_FPS: u32 = 1;
pub const DEFAULT_PRIMARY_CODEC: &str = "libx264";
pub const DEFAULT_FALLBACK_CODEC: &str = "mpeg4";

#[derive(Clone, Debug)]
pub struct EncodeConfig {
    pub fps: u32,
    pub primary_codec: String,
    pub fallback_codec: String,
    /// Replace `out_path` if it exists before encoding starts.
    pub overwrite: bool,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            primary_codec: DEFAULT_PRIMARY_CODEC.to_string(),
            fallback_codec: DEFAULT_FALLBACK_CODEC.to_string(),
            overwrite: true,
        }
    }
}

impl EncodeConfig {
    pub fn validate(&self) -> ClockResult<()> {
        if self.fps == 0 {
            return Err(ClockError::validation("encode fps must be non-zero"));
        }
        if self.primary_codec.trim().is_empty() || self.fallback_codec.trim().is_empty() {
            return Err(ClockError::validation("codec names must be non-empty"));
        }
        Ok(())
    }
}

/// How a successful [`encode_video`] call got there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeOutcome {
    pub codec: String,
    pub used_fallback: bool,
}

/// Check that `frames` is non-empty and uniformly sized; returns the shared size.
pub fn check_frames(frames: &[Frame]) -> ClockResult<(u32, u32)> {
    let first = frames.first().ok_or(ClockError::EmptySequence)?;
    let expected = first.size();
    if let Some((index, frame)) = frames
        .iter()
        .enumerate()
        .find(|(_, f)| f.size() != expected)
    {
        return Err(ClockError::InconsistentFrameSize {
            index,
            expected,
            got: frame.size(),
        });
    }
    Ok(expected)
}

/// Encode `frames` to `out_path`, retrying once with the fallback codec.
///
/// The overwrite check happens once, up front; the fallback may replace whatever a failed
/// primary attempt left at `out_path`. Returns [`ClockError::FatalEncoding`] when both codecs
/// fail.
#[tracing::instrument(skip(backend, frames, cfg), fields(frames = frames.len()))]
pub fn encode_video(
    backend: &mut dyn VideoBackend,
    frames: &[Frame],
    out_path: &Path,
    cfg: &EncodeConfig,
) -> ClockResult<EncodeOutcome> {
    cfg.validate()?;
    let (width, height) = check_frames(frames)?;
    if !cfg.overwrite && out_path.exists() {
        return Err(ClockError::validation(format!(
            "output file '{}' already exists",
            out_path.display()
        )));
    }
    tracing::info!(
        width,
        height,
        fps = cfg.fps,
        codec = %cfg.primary_codec,
        "encoding video"
    );

    let primary = match backend.write_video(frames, out_path, cfg.fps, &cfg.primary_codec) {
        Ok(()) => {
            return Ok(EncodeOutcome {
                codec: cfg.primary_codec.clone(),
                used_fallback: false,
            });
        }
        Err(e) => e,
    };

    tracing::warn!(
        codec = %cfg.primary_codec,
        fallback = %cfg.fallback_codec,
        error = %primary,
        "primary codec failed, retrying with fallback codec"
    );

    match backend.write_video(frames, out_path, cfg.fps, &cfg.fallback_codec) {
        Ok(()) => Ok(EncodeOutcome {
            codec: cfg.fallback_codec.clone(),
            used_fallback: true,
        }),
        Err(fallback) => {
            tracing::error!(
                codec = %cfg.fallback_codec,
                error = %fallback,
                "fallback codec failed"
            );
            Err(ClockError::FatalEncoding {
                primary: Box::new(primary),
                fallback: Box::new(fallback),
            })
        }
    }
}
