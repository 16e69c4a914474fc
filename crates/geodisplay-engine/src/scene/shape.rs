use crate::coords::{Segment, Vec2};
use crate::geometry::{line_corners, line_to_quad, triangulate_polygon, GeometryError, Mesh};
use crate::paint::Color;
use crate::text::{TextShape, TextShaper};

use super::{Outline, ShapeStyle};

/// Simple polygon in world coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonShape {
    pub vertices: Vec<Vec2>,
    pub style: ShapeStyle,
}

impl PolygonShape {
    pub fn new(vertices: impl Into<Vec<Vec2>>, fill: Color) -> Self {
        Self { vertices: vertices.into(), style: ShapeStyle::new(fill) }
    }

    #[inline]
    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    fn append_to(&self, mesh: &mut Mesh) -> Result<(), GeometryError> {
        let tris = triangulate_polygon(&self.vertices)?;
        mesh.extend_triangles(&tris, self.style.fill);
        if let Some(outline) = self.style.outline {
            append_ring_outline(mesh, &self.vertices, outline);
        }
        Ok(())
    }
}

/// Thick line segment in world coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct LineShape {
    pub segment: Segment,
    /// World units.
    pub thickness: f32,
    pub style: ShapeStyle,
}

impl LineShape {
    pub fn new(p0: Vec2, p1: Vec2, thickness: f32, fill: Color) -> Self {
        Self {
            segment: Segment::new(p0, p1),
            thickness,
            style: ShapeStyle::new(fill),
        }
    }

    #[inline]
    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    fn append_to(&self, mesh: &mut Mesh) -> Result<(), GeometryError> {
        let Segment { a, b } = self.segment;
        if !(a.is_finite() && b.is_finite()) {
            return Err(GeometryError::NonFinite);
        }
        // Zero-length or zero-thickness lines draw nothing.
        mesh.extend_triangles(&line_to_quad(a, b, self.thickness), self.style.fill);
        if let (Some(outline), Some(corners)) = (self.style.outline, line_corners(a, b, self.thickness)) {
            append_ring_outline(mesh, &corners, outline);
        }
        Ok(())
    }
}

/// A drawable owned by the [`ShapeRegistry`](super::ShapeRegistry).
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Polygon(PolygonShape),
    Line(LineShape),
    Text(TextShape),
}

impl Shape {
    pub fn polygon(vertices: impl Into<Vec<Vec2>>, fill: Color) -> Self {
        Shape::Polygon(PolygonShape::new(vertices, fill))
    }

    pub fn line(p0: Vec2, p1: Vec2, thickness: f32, fill: Color) -> Self {
        Shape::Line(LineShape::new(p0, p1, thickness, fill))
    }

    /// Style of polygon and line shapes. Text carries its own text style.
    pub fn style(&self) -> Option<&ShapeStyle> {
        match self {
            Shape::Polygon(p) => Some(&p.style),
            Shape::Line(l) => Some(&l.style),
            Shape::Text(_) => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.style().map(|s| s.name.as_str())
    }

    /// Appends this shape's world-space triangles.
    ///
    /// Text needs a shaper; without one (no font loaded) it draws nothing.
    /// On error nothing has been appended for polygon shapes.
    pub fn append_to(&mut self, mesh: &mut Mesh, shaper: Option<&mut dyn TextShaper>) -> Result<(), GeometryError> {
        match self {
            Shape::Polygon(p) => p.append_to(mesh),
            Shape::Line(l) => l.append_to(mesh),
            Shape::Text(t) => {
                if let Some(shaper) = shaper {
                    t.append_to(mesh, shaper);
                }
                Ok(())
            }
        }
    }
}

impl From<PolygonShape> for Shape {
    fn from(p: PolygonShape) -> Self {
        Shape::Polygon(p)
    }
}

impl From<LineShape> for Shape {
    fn from(l: LineShape) -> Self {
        Shape::Line(l)
    }
}

impl From<TextShape> for Shape {
    fn from(t: TextShape) -> Self {
        Shape::Text(t)
    }
}

fn append_ring_outline(mesh: &mut Mesh, ring: &[Vec2], outline: Outline) {
    let n = ring.len();
    for i in 0..n {
        let tris = line_to_quad(ring[i], ring[(i + 1) % n], outline.thickness);
        mesh.extend_triangles(&tris, outline.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Rect;
    use crate::text::{FontId, TextGeometry, TextStyle};

    fn square() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ]
    }

    struct BoxShaper;

    impl TextShaper for BoxShaper {
        fn shape(&mut self, _text: &str, style: &TextStyle) -> TextGeometry {
            let mut geo = TextGeometry::default();
            geo.fill.push_rect(Rect::new(0.0, 0.0, 2.0, 1.0), style.fill);
            geo.bounds = Rect::new(0.0, 0.0, 2.0, 1.0);
            geo
        }
    }

    // ── polygons ──────────────────────────────────────────────────────────

    #[test]
    fn polygon_fills_its_area() {
        let mut mesh = Mesh::new();
        Shape::polygon(square(), Color::RED).append_to(&mut mesh, None).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert!((mesh.area() - 100.0).abs() < 1e-3);
    }

    #[test]
    fn polygon_outline_adds_edge_quads() {
        let style = ShapeStyle::new(Color::RED).with_outline(Outline::new(1.0, Color::WHITE));
        let mut shape = Shape::from(PolygonShape::new(square(), Color::RED).with_style(style));
        let mut mesh = Mesh::new();
        shape.append_to(&mut mesh, None).unwrap();
        assert_eq!(mesh.triangle_count(), 2 + 4 * 2);
        assert_eq!(mesh.vertices().last().unwrap().color, Color::WHITE);
    }

    #[test]
    fn degenerate_polygon_errors_without_output() {
        let mut mesh = Mesh::new();
        let err = Shape::polygon(vec![Vec2::zero(), Vec2::new(1.0, 1.0)], Color::RED)
            .append_to(&mut mesh, None)
            .unwrap_err();
        assert_eq!(err, GeometryError::TooFewVertices(2));
        assert!(mesh.is_empty());
    }

    // ── lines ─────────────────────────────────────────────────────────────

    #[test]
    fn line_area_is_length_times_thickness() {
        let mut mesh = Mesh::new();
        Shape::line(Vec2::zero(), Vec2::new(0.0, 8.0), 0.5, Color::GREEN)
            .append_to(&mut mesh, None)
            .unwrap();
        assert!((mesh.area() - 4.0).abs() < 1e-4);
    }

    #[test]
    fn zero_length_line_is_empty_not_an_error() {
        let mut mesh = Mesh::new();
        let p = Vec2::new(3.0, 3.0);
        Shape::line(p, p, 2.0, Color::GREEN).append_to(&mut mesh, None).unwrap();
        assert!(mesh.is_empty());
    }

    #[test]
    fn non_finite_line_errors() {
        let mut mesh = Mesh::new();
        let err = Shape::line(Vec2::new(f32::NAN, 0.0), Vec2::zero(), 1.0, Color::GREEN)
            .append_to(&mut mesh, None)
            .unwrap_err();
        assert_eq!(err, GeometryError::NonFinite);
    }

    // ── text ──────────────────────────────────────────────────────────────

    #[test]
    fn text_without_shaper_draws_nothing() {
        let mut shape = Shape::from(TextShape::new("x", TextStyle::new(FontId(0), 10.0)));
        let mut mesh = Mesh::new();
        shape.append_to(&mut mesh, None).unwrap();
        assert!(mesh.is_empty());
        assert_eq!(shape.name(), None);
    }

    #[test]
    fn text_is_placed_at_its_position() {
        let text = TextShape::new("x", TextStyle::new(FontId(0), 10.0)).with_position(Vec2::new(4.0, 5.0));
        let mut shape = Shape::from(text);
        let mut mesh = Mesh::new();
        shape.append_to(&mut mesh, Some(&mut BoxShaper)).unwrap();
        assert_eq!(mesh.vertices()[0].position, Vec2::new(4.0, 5.0));
    }

    #[test]
    fn names_come_from_style() {
        let line = LineShape::new(Vec2::zero(), Vec2::new(1.0, 0.0), 1.0, Color::BLUE)
            .with_style(ShapeStyle::new(Color::BLUE).with_name("axis"));
        assert_eq!(Shape::from(line).name(), Some("axis"));
    }
}
