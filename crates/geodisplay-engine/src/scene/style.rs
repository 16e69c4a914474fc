use crate::paint::Color;

/// Outline drawn along a shape's edges.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Outline {
    /// World units.
    pub thickness: f32,
    pub color: Color,
}

impl Outline {
    #[inline]
    pub const fn new(thickness: f32, color: Color) -> Self {
        Self { thickness, color }
    }
}

/// Name, fill and optional outline shared by polygon and line shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeStyle {
    pub name: String,
    pub fill: Color,
    /// `None` draws no outline.
    pub outline: Option<Outline>,
}

impl ShapeStyle {
    pub fn new(fill: Color) -> Self {
        Self { name: String::new(), fill, outline: None }
    }

    #[inline]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[inline]
    pub fn with_outline(mut self, outline: Outline) -> Self {
        self.outline = Some(outline);
        self
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self::new(Color::WHITE)
    }
}
