use crate::coords::{Rect, Vec2};
use crate::geometry::Mesh;
use crate::paint::Color;
use crate::text::AtlasImage;
use crate::view::ViewState;

/// Draw pass a layer belongs to, in submission order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Pass {
    /// UI border, screen space.
    Chrome,
    /// Registry shapes, world space.
    Shapes,
    /// Grid lines, world space.
    Grid,
    /// Grid labels, screen space.
    Labels,
}

/// One mesh drawn under one view.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub pass: Pass,
    /// View the mesh's coordinates are expressed in.
    pub view: ViewState,
    /// Scissor rectangle in logical pixels; `None` draws everywhere.
    pub clip: Option<Rect>,
    pub mesh: Mesh,
}

/// A complete frame: clear color plus layers painted in order.
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub clear: Color,
    /// Logical window size the views are projected onto.
    pub window: Vec2,
    pub layers: Vec<Layer>,
    /// Glyph coverage for textured vertices.
    pub atlas: Option<AtlasImage<'a>>,
}

impl Frame<'_> {
    pub fn layers_in(&self, pass: Pass) -> impl Iterator<Item = &Layer> + '_ {
        self.layers.iter().filter(move |l| l.pass == pass)
    }

    pub fn triangle_count(&self, pass: Pass) -> usize {
        self.layers_in(pass).map(|l| l.mesh.triangle_count()).sum()
    }
}
