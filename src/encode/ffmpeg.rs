use std::{
    io::{Read, Write as _},
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use crate::{
    encode::backend::VideoBackend,
    foundation::error::{ClockError, ClockResult},
    render::Frame,
};

/// Options for [`FfmpegBackend`].
#[derive(Clone, Debug)]
pub struct FfmpegOpts {
    /// Executable to run; `ffmpeg` resolved through `PATH` by default.
    pub program: PathBuf,
}

impl Default for FfmpegOpts {
    fn default() -> Self {
        Self {
            program: PathBuf::from("ffmpeg"),
        }
    }
}

/// Backend that spawns the system `ffmpeg` and streams raw RGB frames to its stdin.
///
/// Always replaces `out_path`: a failed earlier attempt may have left a partial file there.
/// Refusing to overwrite a pre-existing output is [`encode_video`](crate::encode_video)'s job.
#[derive(Clone, Debug, Default)]
pub struct FfmpegBackend {
    opts: FfmpegOpts,
}

impl FfmpegBackend {
    pub fn new(opts: FfmpegOpts) -> Self {
        Self { opts }
    }
}

impl VideoBackend for FfmpegBackend {
    fn write_video(
        &mut self,
        frames: &[Frame],
        out_path: &Path,
        fps: u32,
        codec: &str,
    ) -> ClockResult<()> {
        let fail = |message: String| ClockError::encoding(codec, message);

        let Some(first) = frames.first() else {
            return Err(ClockError::EmptySequence);
        };
        let (width, height) = first.size();
        let frame_len = (width as usize) * (height as usize) * 3;

        ensure_parent_dir(out_path)?;
        if !is_program_available(&self.opts.program) {
            return Err(fail(format!(
                "'{}' is required for video encoding, but was not found",
                self.opts.program.display()
            )));
        }

        let mut cmd = Command::new(&self.opts.program);
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.arg("-y");

        // yuv420p needs even dimensions; pad odd glyph boxes by one black row/column.
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgb24",
            "-s",
            &format!("{width}x{height}"),
            "-r",
            &fps.to_string(),
            "-i",
            "pipe:0",
            "-an",
            "-vf",
            "pad=ceil(iw/2)*2:ceil(ih/2)*2",
            "-c:v",
            codec,
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ])
        .arg(out_path);

        tracing::debug!(?cmd, "spawning ffmpeg");
        let mut child = cmd
            .spawn()
            .map_err(|e| fail(format!("failed to spawn ffmpeg: {e}")))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| fail("failed to open ffmpeg stdin (unexpected)".to_string()))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| fail("failed to open ffmpeg stderr (unexpected)".to_string()))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok::<_, std::io::Error>(stderr_bytes)
        });

        // A write failure usually means ffmpeg already exited; its stderr says why.
        let mut write_err = None;
        for (i, frame) in frames.iter().enumerate() {
            if frame.data.len() != frame_len {
                write_err = Some(format!(
                    "frame {i} data is {} bytes, expected {frame_len}",
                    frame.data.len()
                ));
                break;
            }
            if let Err(e) = stdin.write_all(&frame.data) {
                write_err = Some(format!("failed to write frame {i} to ffmpeg stdin: {e}"));
                break;
            }
        }
        drop(stdin);

        let status = child
            .wait()
            .map_err(|e| fail(format!("failed to wait for ffmpeg to finish: {e}")))?;
        let stderr_bytes = stderr_drain
            .join()
            .map_err(|_| fail("ffmpeg stderr drain thread panicked".to_string()))?
            .map_err(|e| fail(format!("ffmpeg stderr read failed: {e}")))?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(fail(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        if let Some(msg) = write_err {
            return Err(fail(msg));
        }
        Ok(())
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> ClockResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    is_program_available(Path::new("ffmpeg"))
}

fn is_program_available(program: &Path) -> bool {
    Command::new(program)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
