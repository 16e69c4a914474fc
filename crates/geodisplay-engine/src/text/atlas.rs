use std::collections::HashMap;

/// Edge length of the square R8 atlas, in texels.
pub const ATLAS_SIZE: u32 = 1024;
const GLYPH_PADDING: u32 = 1;

/// Normalized texture coordinates of a glyph inside the atlas.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AtlasRegion {
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
}

/// Borrowed atlas pixels handed to the graphics backend.
#[derive(Debug, Copy, Clone)]
pub struct AtlasImage<'a> {
    /// Row-major `ATLAS_SIZE * ATLAS_SIZE` coverage bytes.
    pub pixels: &'a [u8],
    pub generation: u64,
}

/// CPU-side coverage atlas with shelf packing.
///
/// Glyph bitmaps are copied in on first use and never evicted. Every insert
/// bumps [`generation`](Self::generation) so the GPU side knows to re-upload.
pub struct GlyphAtlas<K> {
    pixels: Vec<u8>,
    regions: HashMap<K, AtlasRegion>,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
    generation: u64,
    full: bool,
}

impl<K: std::hash::Hash + Eq> GlyphAtlas<K> {
    pub fn new() -> Self {
        Self {
            pixels: vec![0; (ATLAS_SIZE * ATLAS_SIZE) as usize],
            regions: HashMap::new(),
            cursor_x: GLYPH_PADDING,
            cursor_y: GLYPH_PADDING,
            row_height: 0,
            generation: 0,
            full: false,
        }
    }

    /// Row-major `ATLAS_SIZE * ATLAS_SIZE` coverage bytes.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    pub fn image(&self) -> AtlasImage<'_> {
        AtlasImage { pixels: &self.pixels, generation: self.generation }
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn get(&self, key: &K) -> Option<AtlasRegion> {
        self.regions.get(key).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Whether a `w` x `h` bitmap fits an empty atlas.
    #[inline]
    pub fn can_hold(w: u32, h: u32) -> bool {
        w + 2 * GLYPH_PADDING <= ATLAS_SIZE && h + 2 * GLYPH_PADDING <= ATLAS_SIZE
    }

    /// Places a `w` x `h` coverage bitmap. Returns `None` once the atlas is full,
    /// for a bitmap larger than the atlas, or when the bitmap does not match
    /// its dimensions.
    pub fn insert(&mut self, key: K, bitmap: &[u8], w: u32, h: u32) -> Option<AtlasRegion> {
        if let Some(region) = self.regions.get(&key) {
            return Some(*region);
        }
        if self.full || w == 0 || h == 0 || bitmap.len() != (w * h) as usize {
            return None;
        }
        if !Self::can_hold(w, h) {
            log::debug!("glyph of {w}x{h} exceeds the {ATLAS_SIZE}x{ATLAS_SIZE} atlas, skipped");
            return None;
        }

        if self.cursor_x + w + GLYPH_PADDING > ATLAS_SIZE {
            self.cursor_y += self.row_height + GLYPH_PADDING;
            self.cursor_x = GLYPH_PADDING;
            self.row_height = 0;
        }
        if self.cursor_y + h + GLYPH_PADDING > ATLAS_SIZE {
            log::warn!("glyph atlas is full ({ATLAS_SIZE}x{ATLAS_SIZE}); further glyphs are dropped");
            self.full = true;
            return None;
        }

        let (gx, gy) = (self.cursor_x, self.cursor_y);
        for row in 0..h {
            let src = (row * w) as usize;
            let dst = ((gy + row) * ATLAS_SIZE + gx) as usize;
            self.pixels[dst..dst + w as usize].copy_from_slice(&bitmap[src..src + w as usize]);
        }

        self.cursor_x += w + GLYPH_PADDING;
        self.row_height = self.row_height.max(h);
        self.generation += 1;

        let size = ATLAS_SIZE as f32;
        let region = AtlasRegion {
            uv_min: [gx as f32 / size, gy as f32 / size],
            uv_max: [(gx + w) as f32 / size, (gy + h) as f32 / size],
        };
        self.regions.insert(key, region);
        Some(region)
    }
}

impl<K: std::hash::Hash + Eq> Default for GlyphAtlas<K> {
    fn default() -> Self {
        Self::new()
    }
}
