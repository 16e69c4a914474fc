use std::fmt;
use std::path::Path;

use super::GlyphAtlas;

/// Error returned by [`FontSystem::load_font`].
#[derive(Debug, Clone)]
pub struct FontLoadError(pub String);

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font load error: {}", self.0)
    }
}

impl std::error::Error for FontLoadError {}

/// Opaque handle to a font loaded into a [`FontSystem`].
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

/// Atlas key: one rasterization of one character.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct GlyphKey {
    pub font: FontId,
    pub glyph: char,
    /// `f32::to_bits` of the pixel size.
    pub px: u32,
}

/// Owns the loaded fonts and the glyph atlas their glyphs are rasterized into.
///
/// Fonts are immutable after loading. Shaping goes through the
/// [`TextShaper`](super::TextShaper) impl, which rasterizes new glyphs on
/// demand.
pub struct FontSystem {
    pub(crate) fonts: Vec<fontdue::Font>,
    pub(crate) atlas: GlyphAtlas<GlyphKey>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self {
            fonts: Vec::new(),
            atlas: GlyphAtlas::new(),
        }
    }

    /// Parses and stores a TrueType or OpenType font from raw bytes.
    pub fn load_font(&mut self, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        let id = FontId(self.fonts.len());
        self.fonts.push(font);
        Ok(id)
    }

    /// Reads and loads a font file.
    pub fn load_font_file(&mut self, path: impl AsRef<Path>) -> Result<FontId, FontLoadError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| FontLoadError(format!("{}: {e}", path.display())))?;
        self.load_font(&bytes)
    }

    /// The font loaded first, if any.
    #[inline]
    pub fn first_font(&self) -> Option<FontId> {
        (!self.fonts.is_empty()).then_some(FontId(0))
    }

    #[inline]
    pub fn contains(&self, id: FontId) -> bool {
        id.0 < self.fonts.len()
    }

    #[inline]
    pub fn atlas(&self) -> &GlyphAtlas<GlyphKey> {
        &self.atlas
    }
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::new()
    }
}
