use crate::geometry::{line_to_quad, Mesh};
use crate::paint::Color;

use super::GridLine;

/// Appends every grid line as a `thickness`-wide quad (world units).
pub fn append_grid_mesh(mesh: &mut Mesh, lines: &[GridLine], thickness: f32, color: Color) {
    for line in lines {
        let tris = line_to_quad(line.segment.a, line.segment.b, thickness);
        mesh.extend_triangles(&tris, color);
    }
}

/// Label text for a grid coordinate.
///
/// Up to six significant digits, trailing zeros dropped, `-0` printed as `0`.
pub fn format_label(value: f32) -> String {
    if !value.is_finite() {
        return String::new();
    }
    let value = if value == 0.0 { 0.0 } else { value };

    let magnitude = value.abs();
    let int_digits = if magnitude >= 1.0 { magnitude.log10().floor() as i32 + 1 } else { 1 };
    let decimals = (6 - int_digits).clamp(0, 6) as usize;

    let text = format!("{value:.decimals$}");
    let text = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_owned()
    } else {
        text
    };
    if text == "-0" { "0".to_owned() } else { text }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{Segment, Vec2};
    use crate::grid::Orientation;

    #[test]
    fn each_line_adds_two_triangles() {
        let line = GridLine {
            orientation: Orientation::Vertical,
            world_coordinate: 0.0,
            segment: Segment::new(Vec2::new(0.0, -10.0), Vec2::new(0.0, 10.0)),
            label_value: 0.0,
        };
        let mut mesh = Mesh::new();
        append_grid_mesh(&mut mesh, &[line, line], 1.0, Color::BLUE);
        assert_eq!(mesh.triangle_count(), 4);
        assert!((mesh.area() - 40.0).abs() < 1e-3);
    }

    #[test]
    fn degenerate_line_adds_nothing() {
        let line = GridLine {
            orientation: Orientation::Horizontal,
            world_coordinate: 5.0,
            segment: Segment::new(Vec2::new(3.0, 5.0), Vec2::new(3.0, 5.0)),
            label_value: 5.0,
        };
        let mut mesh = Mesh::new();
        append_grid_mesh(&mut mesh, &[line], 1.0, Color::BLUE);
        assert!(mesh.is_empty());
    }

    #[test]
    fn labels() {
        assert_eq!(format_label(-200.0), "-200");
        assert_eq!(format_label(0.0), "0");
        assert_eq!(format_label(-0.0), "0");
        assert_eq!(format_label(2.5), "2.5");
        assert_eq!(format_label(0.1), "0.1");
        assert_eq!(format_label(f32::NAN), "");
    }
}
