use crate::coords::{Rect, Vec2};
use crate::geometry::Mesh;

use super::font_system::GlyphKey;
use super::{AtlasRegion, FontSystem, GlyphAtlas, TextStyle};

/// Horizontal shear applied to italic glyphs (about 12 degrees).
const ITALIC_SHEAR: f32 = 0.208;
/// Faux-bold offset as a fraction of the character size.
const BOLD_OFFSET_RATIO: f32 = 0.04;
const TAB_WIDTH_IN_SPACES: f32 = 4.0;

/// Shaped text in local coordinates: origin at the top-left of the first
/// line, Y pointing down.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextGeometry {
    pub fill: Mesh,
    /// Drawn before `fill`. Empty when the style has no outline.
    pub outline: Mesh,
    pub bounds: Rect,
}

impl TextGeometry {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fill.is_empty() && self.outline.is_empty()
    }

    /// Appends outline then fill, translated by `offset`.
    pub fn append_to(&self, mesh: &mut Mesh, offset: Vec2) {
        mesh.append_translated(&self.outline, offset);
        mesh.append_translated(&self.fill, offset);
    }
}

/// Turns a string plus a style into glyph meshes and a bounding box.
pub trait TextShaper {
    fn shape(&mut self, text: &str, style: &TextStyle) -> TextGeometry;
}

impl TextShaper for FontSystem {
    fn shape(&mut self, text: &str, style: &TextStyle) -> TextGeometry {
        let size = style.character_size;
        if text.is_empty() || !size.is_finite() || size <= 0.0 {
            return TextGeometry::default();
        }
        let Self { fonts, atlas } = self;
        let Some(font) = fonts.get(style.font.0) else {
            log::trace!("shape: unknown {:?}", style.font);
            return TextGeometry::default();
        };

        let (ascent, line_height) = font
            .horizontal_line_metrics(size)
            .map(|m| (m.ascent, m.new_line_size))
            .unwrap_or((size * 0.8, size * 1.2));
        let space = font.metrics(' ', size).advance_width;
        let shear = if style.flags.italic { ITALIC_SHEAR } else { 0.0 };
        let bold_offset = if style.flags.bold { (size * BOLD_OFFSET_RATIO).max(1.0) } else { 0.0 };
        let outline = style.has_outline().then_some(style.outline_thickness);

        let mut out = TextGeometry::default();
        let mut bounds = BoundsAccumulator::default();
        let mut pen_x = 0.0f32;
        let mut baseline = ascent;
        let mut prev: Option<char> = None;

        for c in text.chars() {
            match c {
                '\r' => continue,
                ' ' => {
                    pen_x += space;
                    prev = None;
                    continue;
                }
                '\t' => {
                    pen_x += space * TAB_WIDTH_IN_SPACES;
                    prev = None;
                    continue;
                }
                '\n' => {
                    push_decorations(&mut out, &mut bounds, style, pen_x, baseline);
                    baseline += line_height;
                    pen_x = 0.0;
                    prev = None;
                    continue;
                }
                _ => {}
            }

            if let Some(p) = prev {
                pen_x += font.horizontal_kern(p, c, size).unwrap_or(0.0);
            }

            let metrics = font.metrics(c, size);
            let fits = GlyphAtlas::<GlyphKey>::can_hold(metrics.width as u32, metrics.height as u32);
            if metrics.width > 0 && metrics.height > 0 && fits {
                let key = GlyphKey { font: style.font, glyph: c, px: size.to_bits() };
                let region = atlas.get(&key).or_else(|| {
                    let (m, bitmap) = font.rasterize(c, size);
                    atlas.insert(key, &bitmap, m.width as u32, m.height as u32)
                });

                if let Some(region) = region {
                    let glyph = Rect::new(
                        pen_x + metrics.xmin as f32,
                        baseline - (metrics.ymin as f32 + metrics.height as f32),
                        metrics.width as f32,
                        metrics.height as f32,
                    );
                    let uv = region_uv(region);
                    let offsets: &[f32] = if bold_offset > 0.0 { &[0.0, bold_offset] } else { &[0.0] };
                    for &dx in offsets {
                        let rect = Rect::from_origin_size(glyph.origin + Vec2::new(dx, 0.0), glyph.size);
                        if let Some(t) = outline {
                            let grown = rect.inset(-t);
                            let corners = sheared_corners(grown, baseline, shear);
                            out.outline.push_quad(corners, uv, style.outline_color);
                            bounds.extend(&corners);
                        }
                        let corners = sheared_corners(rect, baseline, shear);
                        out.fill.push_quad(corners, uv, style.fill);
                        bounds.extend(&corners);
                    }
                }
            }

            pen_x += metrics.advance_width + bold_offset;
            prev = Some(c);
        }
        push_decorations(&mut out, &mut bounds, style, pen_x, baseline);

        out.bounds = bounds.finish();
        out
    }
}

/// Quad corners (TL, TR, BR, BL) of `rect`, sheared horizontally about
/// `baseline`: points above it move right by `shear` per unit of height.
pub(crate) fn sheared_corners(rect: Rect, baseline: f32, shear: f32) -> [Vec2; 4] {
    rect.corners().map(|p| Vec2::new(p.x + shear * (baseline - p.y), p.y))
}

/// Underline and strike-through bars for one line of `width` pixels.
pub(crate) fn decoration_rects(style: &TextStyle, width: f32, baseline: f32) -> Vec<Rect> {
    let size = style.character_size;
    let thickness = (size / 14.0).max(1.0);
    let mut rects = Vec::new();
    if width <= 0.0 {
        return rects;
    }
    if style.flags.underlined {
        rects.push(Rect::new(0.0, baseline + size * 0.1, width, thickness));
    }
    if style.flags.strike_through {
        rects.push(Rect::new(0.0, baseline - size * 0.3 - thickness * 0.5, width, thickness));
    }
    rects
}

fn push_decorations(out: &mut TextGeometry, bounds: &mut BoundsAccumulator, style: &TextStyle, width: f32, baseline: f32) {
    for rect in decoration_rects(style, width, baseline) {
        if style.has_outline() {
            let grown = rect.inset(-style.outline_thickness);
            out.outline.push_rect(grown, style.outline_color);
            bounds.extend(&grown.corners());
        }
        out.fill.push_rect(rect, style.fill);
        bounds.extend(&rect.corners());
    }
}

fn region_uv(region: AtlasRegion) -> [[f32; 2]; 4] {
    let [u0, v0] = region.uv_min;
    let [u1, v1] = region.uv_max;
    [[u0, v0], [u1, v0], [u1, v1], [u0, v1]]
}

#[derive(Default)]
struct BoundsAccumulator {
    min: Option<Vec2>,
    max: Option<Vec2>,
}

impl BoundsAccumulator {
    fn extend(&mut self, points: &[Vec2]) {
        for p in points {
            self.min = Some(self.min.map_or(*p, |m| m.min(*p)));
            self.max = Some(self.max.map_or(*p, |m| m.max(*p)));
        }
    }

    fn finish(self) -> Rect {
        match (self.min, self.max) {
            (Some(min), Some(max)) => Rect::from_corners(min, max),
            _ => Rect::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{FontId, StyleFlags};

    fn style(flags: StyleFlags) -> TextStyle {
        TextStyle { flags, ..TextStyle::new(FontId(0), 14.0) }
    }

    // ── italic shear ──────────────────────────────────────────────────────

    #[test]
    fn upright_corners_are_unchanged() {
        let r = Rect::new(2.0, 3.0, 4.0, 5.0);
        assert_eq!(sheared_corners(r, 8.0, 0.0), r.corners());
    }

    #[test]
    fn shear_moves_top_right_and_keeps_baseline() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        let [tl, tr, br, bl] = sheared_corners(r, 10.0, ITALIC_SHEAR);
        assert!((tl.x - 2.08).abs() < 1e-5);
        assert!((tr.x - 12.08).abs() < 1e-5);
        assert_eq!(br, Vec2::new(10.0, 10.0));
        assert_eq!(bl, Vec2::new(0.0, 10.0));
    }

    // ── decorations ───────────────────────────────────────────────────────

    #[test]
    fn regular_text_has_no_decorations() {
        assert!(decoration_rects(&style(StyleFlags::REGULAR), 50.0, 10.0).is_empty());
    }

    #[test]
    fn underline_sits_below_baseline_and_strike_above() {
        let rects = decoration_rects(&style(StyleFlags::REGULAR.underlined().strike_through()), 50.0, 10.0);
        assert_eq!(rects.len(), 2);
        assert!(rects[0].origin.y > 10.0);
        assert!(rects[1].origin.y < 10.0);
        assert!(rects.iter().all(|r| r.size.x == 50.0 && r.size.y >= 1.0));
    }

    #[test]
    fn empty_line_has_no_decorations() {
        assert!(decoration_rects(&style(StyleFlags::REGULAR.underlined()), 0.0, 10.0).is_empty());
    }

    // ── shaping without fonts ─────────────────────────────────────────────

    #[test]
    fn unknown_font_shapes_to_nothing() {
        let mut fonts = FontSystem::new();
        let geo = fonts.shape("hello", &style(StyleFlags::REGULAR));
        assert!(geo.is_empty());
        assert_eq!(geo.bounds, Rect::default());
    }

    fn system_font() -> Option<Vec<u8>> {
        [
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/noto/NotoSans-Regular.ttf",
            "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
        ]
        .iter()
        .find_map(|p| std::fs::read(p).ok())
    }

    #[test]
    fn oversized_glyph_does_not_block_later_text() {
        let Some(bytes) = system_font() else {
            return;
        };
        let mut fonts = FontSystem::new();
        let font = fonts.load_font(&bytes).unwrap();

        let huge = fonts.shape("A", &TextStyle::new(font, 2000.0));
        assert_eq!(huge.fill.triangle_count(), 0);
        assert!(fonts.atlas().is_empty());

        let label = fonts.shape("-200", &TextStyle::new(font, 12.0));
        assert!(label.fill.triangle_count() > 0);
    }

    #[test]
    fn append_translates_outline_then_fill() {
        let mut geo = TextGeometry::default();
        geo.fill.push_rect(Rect::new(0.0, 0.0, 1.0, 1.0), crate::paint::Color::WHITE);
        geo.outline.push_rect(Rect::new(0.0, 0.0, 2.0, 2.0), crate::paint::Color::BLACK);
        let mut mesh = Mesh::new();
        geo.append_to(&mut mesh, Vec2::new(10.0, 0.0));
        assert_eq!(mesh.triangle_count(), 4);
        assert_eq!(mesh.vertices()[0].color, crate::paint::Color::BLACK);
        assert_eq!(mesh.vertices()[0].position, Vec2::new(10.0, 0.0));
    }
}
