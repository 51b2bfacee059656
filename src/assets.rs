pub mod decode;
pub mod glyphs;

pub use glyphs::{GLYPH_EXTENSIONS, GlyphKey, GlyphSet};
