use crate::paint::Color;

use super::FontId;

/// Style flags applied on top of the font's regular face.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct StyleFlags {
    pub bold: bool,
    pub italic: bool,
    pub underlined: bool,
    pub strike_through: bool,
}

impl StyleFlags {
    pub const REGULAR: StyleFlags = StyleFlags {
        bold: false,
        italic: false,
        underlined: false,
        strike_through: false,
    };

    #[inline]
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    #[inline]
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    #[inline]
    pub fn underlined(mut self) -> Self {
        self.underlined = true;
        self
    }

    #[inline]
    pub fn strike_through(mut self) -> Self {
        self.strike_through = true;
        self
    }
}

/// Everything the shaper needs besides the string itself.
///
/// `outline_thickness <= 0` disables the outline.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextStyle {
    pub font: FontId,
    /// Pixel height the glyphs are rasterized at.
    pub character_size: f32,
    pub flags: StyleFlags,
    pub fill: Color,
    pub outline_color: Color,
    pub outline_thickness: f32,
}

impl TextStyle {
    pub fn new(font: FontId, character_size: f32) -> Self {
        Self {
            font,
            character_size,
            flags: StyleFlags::REGULAR,
            fill: Color::WHITE,
            outline_color: Color::BLACK,
            outline_thickness: 0.0,
        }
    }

    #[inline]
    pub fn has_outline(&self) -> bool {
        self.outline_thickness.is_finite() && self.outline_thickness > 0.0
    }
}
