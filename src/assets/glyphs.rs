use std::path::{Path, PathBuf};

use anyhow::Context as _;
use image::RgbImage;

use crate::{
    assets::decode::decode_glyph,
    foundation::error::{ClockError, ClockResult},
};

/// Extensions tried for each glyph file, in priority order.
pub const GLYPH_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tif", "tiff", "webp"];

/// One of the eleven glyphs a clock face is drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GlyphKey {
    Digit0,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
    Digit8,
    Digit9,
    Separator,
}

impl GlyphKey {
    /// All keys, digits first. Missing-asset reports follow this order.
    pub const ALL: [GlyphKey; 11] = [
        GlyphKey::Digit0,
        GlyphKey::Digit1,
        GlyphKey::Digit2,
        GlyphKey::Digit3,
        GlyphKey::Digit4,
        GlyphKey::Digit5,
        GlyphKey::Digit6,
        GlyphKey::Digit7,
        GlyphKey::Digit8,
        GlyphKey::Digit9,
        GlyphKey::Separator,
    ];

    pub fn digit(d: u32) -> Option<Self> {
        Self::ALL.get(d as usize).copied().filter(|k| *k != Self::Separator)
    }

    /// Digits map to their glyph; every other character is drawn with the separator.
    pub fn for_char(c: char) -> Self {
        c.to_digit(10)
            .and_then(Self::digit)
            .unwrap_or(Self::Separator)
    }

    pub fn file_stem(self) -> &'static str {
        match self {
            GlyphKey::Digit0 => "0",
            GlyphKey::Digit1 => "1",
            GlyphKey::Digit2 => "2",
            GlyphKey::Digit3 => "3",
            GlyphKey::Digit4 => "4",
            GlyphKey::Digit5 => "5",
            GlyphKey::Digit6 => "6",
            GlyphKey::Digit7 => "7",
            GlyphKey::Digit8 => "8",
            GlyphKey::Digit9 => "9",
            GlyphKey::Separator => "colon",
        }
    }

    /// Name used when reporting the glyph as missing.
    pub fn file_name(self) -> String {
        format!("{}.{}", self.file_stem(), GLYPH_EXTENSIONS[0])
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// The complete, immutable set of clock glyphs plus the bounding box every frame is rendered at.
#[derive(Clone, Debug)]
pub struct GlyphSet {
    glyphs: [RgbImage; 11],
    max_size: (u32, u32),
}

impl GlyphSet {
    /// Load all eleven glyphs from `dir`.
    ///
    /// Every absent glyph is reported in a single [`ClockError::MissingAssets`].
    #[tracing::instrument]
    pub fn load(dir: &Path) -> ClockResult<Self> {
        let mut found = Vec::with_capacity(GlyphKey::ALL.len());
        let mut missing = Vec::new();
        for key in GlyphKey::ALL {
            match resolve_glyph_path(dir, key) {
                Some(path) => found.push((key, path)),
                None => missing.push(key.file_name()),
            }
        }
        if !missing.is_empty() {
            return Err(ClockError::MissingAssets { names: missing });
        }

        let mut images = Vec::with_capacity(found.len());
        for (key, path) in found {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("read glyph '{}'", path.display()))?;
            let img = decode_glyph(&bytes).map_err(|e| ClockError::AssetDecode {
                name: path.display().to_string(),
                message: e.to_string(),
            })?;
            tracing::debug!(
                glyph = key.file_stem(),
                path = %path.display(),
                width = img.width(),
                height = img.height(),
                "loaded glyph"
            );
            images.push((key, img));
        }

        let set = Self::from_images(images)?;
        tracing::info!(
            width = set.max_size.0,
            height = set.max_size.1,
            "glyph set ready"
        );
        Ok(set)
    }

    /// Build a set from already-decoded images. Later entries for the same key win.
    pub fn from_images(images: impl IntoIterator<Item = (GlyphKey, RgbImage)>) -> ClockResult<Self> {
        let mut slots: [Option<RgbImage>; 11] = std::array::from_fn(|_| None);
        for (key, img) in images {
            slots[key.index()] = Some(img);
        }

        let missing: Vec<String> = GlyphKey::ALL
            .iter()
            .filter(|k| slots[k.index()].is_none())
            .map(|k| k.file_name())
            .collect();
        if !missing.is_empty() {
            return Err(ClockError::MissingAssets { names: missing });
        }

        let glyphs = slots.map(Option::unwrap_or_default);
        for key in GlyphKey::ALL {
            let (w, h) = glyphs[key.index()].dimensions();
            if w == 0 || h == 0 {
                return Err(ClockError::validation(format!(
                    "glyph '{}' has zero size ({w}x{h})",
                    key.file_stem()
                )));
            }
        }

        let max_size = glyphs.iter().fold((0, 0), |(mw, mh), g| {
            (mw.max(g.width()), mh.max(g.height()))
        });

        Ok(Self { glyphs, max_size })
    }

    pub fn get(&self, key: GlyphKey) -> &RgbImage {
        &self.glyphs[key.index()]
    }

    /// Largest glyph width and largest glyph height; the size of every rendered frame.
    pub fn max_size(&self) -> (u32, u32) {
        self.max_size
    }
}

fn resolve_glyph_path(dir: &Path, key: GlyphKey) -> Option<PathBuf> {
    GLYPH_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}.{ext}", key.file_stem())))
        .find(|p| p.is_file())
}
