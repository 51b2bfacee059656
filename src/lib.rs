//! Clockreel renders countdown timers and stopwatches into video.
//!
//! A [`GlyphSet`] of eleven digit/separator images is loaded once. Each second of the requested
//! [`Mode`] becomes one [`Frame`] via [`compose`], and the ordered frames are handed to a
//! [`VideoBackend`] (the system `ffmpeg` by default) with a fallback codec if the first one fails.
#![forbid(unsafe_code)]

pub mod assets;
pub mod encode;
pub mod foundation;
pub mod interactive;
pub mod pipeline;
pub mod render;
pub mod sequence;

pub use assets::{GlyphKey, GlyphSet};
pub use encode::{
    EncodeConfig, EncodeOutcome, FfmpegBackend, FfmpegOpts, InMemoryBackend, VideoBackend,
    check_frames, encode_video,
};
pub use foundation::error::{ClockError, ClockResult};
pub use foundation::time::TimeValue;
pub use interactive::Session;
pub use pipeline::{RenderReport, RenderRequest, render_to_video};
pub use render::{Frame, compose};
pub use sequence::{Mode, RenderThreading, render_sequence};
