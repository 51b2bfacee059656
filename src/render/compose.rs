use image::{RgbImage, imageops::FilterType};

use crate::{
    assets::{GlyphKey, GlyphSet},
    foundation::time::TimeValue,
    render::Frame,
};

/// Render `time` as a row of glyphs and stretch the row to exactly `max_size`.
///
/// Two resize stages run on purpose: each glyph is first fitted into `max_size` keeping its
/// aspect ratio, then the concatenated row is stretched (aspect not kept) to `max_size`. Frames
/// therefore share one size no matter how many characters the reading has.
pub fn compose(time: TimeValue, glyphs: &GlyphSet, max_size: (u32, u32)) -> Frame {
    let (max_w, max_h) = max_size;
    if max_w == 0 || max_h == 0 {
        return Frame {
            width: max_w,
            height: max_h,
            data: Vec::new(),
        };
    }

    let text = time.to_string();
    let parts: Vec<RgbImage> = text
        .chars()
        .map(|c| fit_within(glyphs.get(GlyphKey::for_char(c)), max_size))
        .collect();

    let row = concat_horizontal(&parts);
    let frame = if row.dimensions() == max_size {
        row
    } else {
        image::imageops::resize(&row, max_w, max_h, FilterType::Lanczos3)
    };
    Frame::from_image(frame)
}

/// Copy of `img` scaled down to fit inside `max`, aspect ratio kept. Never upscales.
pub fn fit_within(img: &RgbImage, max: (u32, u32)) -> RgbImage {
    let (w, h) = fit_size(img.dimensions(), max);
    if (w, h) == img.dimensions() {
        return img.clone();
    }
    image::imageops::resize(img, w, h, FilterType::Lanczos3)
}

/// Target size for [`fit_within`].
///
/// The bounded side takes the limit exactly; the other side is rounded to whichever of floor or
/// ceil keeps the aspect ratio closer (floor on ties), and is at least 1 px.
pub fn fit_size(size: (u32, u32), max: (u32, u32)) -> (u32, u32) {
    let (w, h) = size;
    let (max_w, max_h) = max;
    if (max_w >= w && max_h >= h) || w == 0 || h == 0 || max_w == 0 || max_h == 0 {
        return size;
    }

    let aspect = f64::from(w) / f64::from(h);
    let (mw, mh) = (f64::from(max_w), f64::from(max_h));
    if mw / mh >= aspect {
        let x = round_aspect(mh * aspect, |n| (aspect - n / mh).abs());
        (x, max_h)
    } else {
        let y = round_aspect(mw / aspect, |n| {
            if n == 0.0 { 0.0 } else { (aspect - mw / n).abs() }
        });
        (max_w, y)
    }
}

fn round_aspect(value: f64, err: impl Fn(f64) -> f64) -> u32 {
    let lo = value.floor();
    let hi = value.ceil();
    let pick = if err(hi) < err(lo) { hi } else { lo };
    (pick as u32).max(1)
}

/// Left-to-right, top-aligned. Uncovered pixels stay black.
fn concat_horizontal(parts: &[RgbImage]) -> RgbImage {
    let total_w: u32 = parts.iter().map(RgbImage::width).sum();
    let max_h = parts.iter().map(RgbImage::height).max().unwrap_or(0);

    let mut out = RgbImage::new(total_w, max_h);
    let mut x = 0i64;
    for part in parts {
        image::imageops::replace(&mut out, part, x, 0);
        x += i64::from(part.width());
    }
    out
}
