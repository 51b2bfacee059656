#![allow(dead_code)]

use std::path::{Path, PathBuf};

use clockreel::{GlyphKey, GlyphSet};
use image::RgbImage;

/// Fresh scratch directory under `target/`.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("clockreel_tests").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// A distinct solid color per glyph so different readings render differently.
pub fn glyph_image(key: GlyphKey, size: (u32, u32)) -> RgbImage {
    let i = GlyphKey::ALL.iter().position(|k| *k == key).unwrap() as u8;
    RgbImage::from_pixel(size.0, size.1, image::Rgb([i * 23, 255 - i * 20, 40 + i * 5]))
}

pub fn glyph_set(digit: (u32, u32), colon: (u32, u32)) -> GlyphSet {
    GlyphSet::from_images(GlyphKey::ALL.iter().map(|&k| {
        let size = if k == GlyphKey::Separator { colon } else { digit };
        (k, glyph_image(k, size))
    }))
    .unwrap()
}

/// Write every glyph except `skip` into `dir` as `<stem>.<ext>`.
pub fn write_assets(dir: &Path, ext: &str, skip: &[GlyphKey]) {
    for &key in GlyphKey::ALL.iter().filter(|k| !skip.contains(k)) {
        let size = if key == GlyphKey::Separator { (4, 12) } else { (8, 12) };
        glyph_image(key, size)
            .save(dir.join(format!("{}.{ext}", key.file_stem())))
            .unwrap();
    }
}

pub fn tool_available(name: &str) -> bool {
    std::process::Command::new(name)
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn ffmpeg_tools_available() -> bool {
    tool_available("ffmpeg") && tool_available("ffprobe")
}

/// Decoded frame count of the first video stream.
pub fn video_frame_count(path: &Path) -> u64 {
    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-count_frames",
            "-show_entries",
            "stream=nb_read_frames",
            "-of",
            "csv=p=0",
        ])
        .arg(path)
        .output()
        .unwrap();
    assert!(out.status.success(), "ffprobe failed on {}", path.display());
    String::from_utf8_lossy(&out.stdout)
        .trim()
        .trim_end_matches(',')
        .parse()
        .unwrap()
}
