use crate::coords::{Rect, Vec2};
use crate::paint::Color;

/// Texture coordinate for vertices that are not sampled from the glyph atlas.
///
/// The renderer treats a negative `u` as full coverage.
pub const NO_TEXCOORD: [f32; 2] = [-1.0, -1.0];

/// A single mesh vertex.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vertex {
    pub position: Vec2,
    pub color: Color,
    /// Normalized glyph-atlas coordinate, or [`NO_TEXCOORD`].
    pub texcoord: [f32; 2],
}

impl Vertex {
    #[inline]
    pub const fn solid(position: Vec2, color: Color) -> Self {
        Self { position, color, texcoord: NO_TEXCOORD }
    }
}

/// Triangle in any coordinate space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Triangle(pub [Vec2; 3]);

impl Triangle {
    #[inline]
    pub const fn new(a: Vec2, b: Vec2, c: Vec2) -> Self {
        Self([a, b, c])
    }

    /// Shoelace area. Positive for counter-clockwise winding in a y-up frame.
    #[inline]
    pub fn signed_area(&self) -> f32 {
        let [a, b, c] = self.0;
        0.5 * (b - a).cross(c - a)
    }
}

/// Triangle list: vertices grouped in consecutive triples.
///
/// Meshes are rebuilt every frame; nothing mutates a mesh across frames.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
}

impl Mesh {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    /// Appends one solid-colored triangle.
    #[inline]
    pub fn push_triangle(&mut self, tri: &Triangle, color: Color) {
        self.vertices.extend(tri.0.iter().map(|p| Vertex::solid(*p, color)));
    }

    /// Appends solid-colored triangles.
    pub fn extend_triangles<'t>(&mut self, tris: impl IntoIterator<Item = &'t Triangle>, color: Color) {
        for tri in tris {
            self.push_triangle(tri, color);
        }
    }

    /// Appends a textured quad (two triangles) from its four corners in
    /// clockwise screen order, with matching atlas coordinates.
    pub fn push_quad(&mut self, corners: [Vec2; 4], uv: [[f32; 2]; 4], color: Color) {
        for i in [0usize, 1, 3, 3, 1, 2] {
            self.vertices.push(Vertex { position: corners[i], color, texcoord: uv[i] });
        }
    }

    /// Appends a solid axis-aligned rectangle. Empty rectangles are skipped.
    pub fn push_rect(&mut self, rect: Rect, color: Color) {
        if rect.is_empty() {
            return;
        }
        self.push_quad(rect.corners(), [NO_TEXCOORD; 4], color);
    }

    /// Appends another mesh, translated by `offset`.
    pub fn append_translated(&mut self, other: &Mesh, offset: Vec2) {
        self.vertices.extend(other.vertices.iter().map(|v| Vertex {
            position: v.position + offset,
            ..*v
        }));
    }

    /// Recolors every vertex, keeping positions and texture coordinates.
    pub fn set_color(&mut self, color: Color) {
        for v in &mut self.vertices {
            v.color = color;
        }
    }

    /// Iterates the triangles' positions.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.vertices
            .chunks_exact(3)
            .map(|c| Triangle::new(c[0].position, c[1].position, c[2].position))
    }

    /// Sum of absolute triangle areas.
    pub fn area(&self) -> f32 {
        self.triangles().map(|t| t.signed_area().abs()).sum()
    }
}
