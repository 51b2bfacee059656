use std::path::PathBuf;

use crate::{
    assets::GlyphSet,
    encode::{EncodeConfig, VideoBackend, encode_video},
    foundation::error::ClockResult,
    sequence::{Mode, RenderThreading, render_sequence},
};

/// Everything needed to turn one [`Mode`] into a video file.
#[derive(Clone, Debug)]
pub struct RenderRequest {
    pub mode: Mode,
    /// Directory the mode's fixed file name is written into.
    pub out_dir: PathBuf,
    pub threading: RenderThreading,
    pub encode: EncodeConfig,
}

impl RenderRequest {
    pub fn new(mode: Mode, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            mode,
            out_dir: out_dir.into(),
            threading: RenderThreading::default(),
            encode: EncodeConfig::default(),
        }
    }

    pub fn out_path(&self) -> PathBuf {
        self.out_dir.join(self.mode.default_file_name())
    }
}

/// Summary of a finished render.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct RenderReport {
    pub mode: Mode,
    pub frames: usize,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub out_path: PathBuf,
    pub codec: String,
    pub used_fallback: bool,
}

/// Render every frame of `req.mode`, then encode them into `req.out_path()`.
#[tracing::instrument(skip(glyphs, backend), fields(mode = req.mode.name()))]
pub fn render_to_video(
    req: &RenderRequest,
    glyphs: &GlyphSet,
    backend: &mut dyn VideoBackend,
) -> ClockResult<RenderReport> {
    req.encode.validate()?;
    let frames = render_sequence(req.mode, glyphs, &req.threading)?;
    let out_path = req.out_path();
    let outcome = encode_video(backend, &frames, &out_path, &req.encode)?;
    let (width, height) = glyphs.max_size();

    tracing::info!(
        out = %out_path.display(),
        frames = frames.len(),
        codec = %outcome.codec,
        "video written"
    );

    Ok(RenderReport {
        mode: req.mode,
        frames: frames.len(),
        width,
        height,
        fps: req.encode.fps,
        out_path,
        codec: outcome.codec,
        used_fallback: outcome.used_fallback,
    })
}
