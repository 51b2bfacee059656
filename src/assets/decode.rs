use anyhow::Context;
use image::RgbImage;

use crate::ClockResult;

/// Decode any raster format `image` understands and flatten it to RGB8.
///
/// Alpha is dropped, not composited: transparent pixels keep whatever color they carry.
pub fn decode_glyph(bytes: &[u8]) -> ClockResult<RgbImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(dyn_img.to_rgb8())
}
