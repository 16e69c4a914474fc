use crate::coords::{Rect, Vec2};
use crate::geometry::Mesh;
use crate::paint::Color;

use super::{FontId, StyleFlags, TextGeometry, TextShaper, TextStyle};

/// A string drawn at a world position.
///
/// Shaped geometry is cached. Setters that change the layout (string, font,
/// size, flags, outline thickness) drop the cache; color setters recolor the
/// cached meshes in place. [`geometry`](Self::geometry) reshapes only when
/// the cache is stale.
#[derive(Debug, Clone, PartialEq)]
pub struct TextShape {
    text: String,
    style: TextStyle,
    position: Vec2,
    cache: Option<TextGeometry>,
}

impl TextShape {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
            position: Vec2::zero(),
            cache: None,
        }
    }

    #[inline]
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn is_stale(&self) -> bool {
        self.cache.is_none()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.text {
            self.text = text;
            self.cache = None;
        }
    }

    pub fn set_font(&mut self, font: FontId) {
        if font != self.style.font {
            self.style.font = font;
            self.cache = None;
        }
    }

    pub fn set_character_size(&mut self, size: f32) {
        if size != self.style.character_size {
            self.style.character_size = size;
            self.cache = None;
        }
    }

    pub fn set_flags(&mut self, flags: StyleFlags) {
        if flags != self.style.flags {
            self.style.flags = flags;
            self.cache = None;
        }
    }

    pub fn set_outline_thickness(&mut self, thickness: f32) {
        if thickness != self.style.outline_thickness {
            self.style.outline_thickness = thickness;
            self.cache = None;
        }
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.style.fill = color;
        if let Some(cache) = &mut self.cache {
            cache.fill.set_color(color);
        }
    }

    pub fn set_outline_color(&mut self, color: Color) {
        self.style.outline_color = color;
        if let Some(cache) = &mut self.cache {
            cache.outline.set_color(color);
        }
    }

    #[inline]
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Local-space geometry, reshaped first if stale.
    pub fn geometry(&mut self, shaper: &mut dyn TextShaper) -> &TextGeometry {
        self.cache.get_or_insert_with(|| shaper.shape(&self.text, &self.style))
    }

    /// Bounding box at the current position.
    pub fn bounds(&mut self, shaper: &mut dyn TextShaper) -> Rect {
        let position = self.position;
        let local = self.geometry(shaper).bounds;
        Rect::from_origin_size(local.origin + position, local.size)
    }

    /// Appends outline and fill at the current position.
    pub fn append_to(&mut self, mesh: &mut Mesh, shaper: &mut dyn TextShaper) {
        let position = self.position;
        self.geometry(shaper).append_to(mesh, position);
    }
}
