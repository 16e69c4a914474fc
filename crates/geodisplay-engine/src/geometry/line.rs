use crate::coords::Vec2;

use super::{triangulate_polygon, Triangle};

/// Corners of the rectangle of `thickness` centered on `p0`-`p1`, in ring
/// order, or `None` when there is nothing to thicken.
///
/// A zero-length segment has no direction to thicken along and is treated as
/// a point. The same holds for non-positive or non-finite thickness.
pub fn line_corners(p0: Vec2, p1: Vec2, thickness: f32) -> Option<[Vec2; 4]> {
    if !(p0.is_finite() && p1.is_finite() && thickness.is_finite()) || thickness <= 0.0 {
        return None;
    }

    let dir = p1 - p0;
    let len = dir.length();
    if len <= f32::EPSILON {
        return None;
    }

    let n = dir.perp() * (thickness * 0.5 / len);
    Some([p0 + n, p0 - n, p1 - n, p1 + n])
}

/// Builds the rectangle of [`line_corners`] as two triangles. Degenerate
/// input produces no triangles.
pub fn line_to_quad(p0: Vec2, p1: Vec2, thickness: f32) -> Vec<Triangle> {
    line_corners(p0, p1, thickness)
        .and_then(|corners| triangulate_polygon(&corners).ok())
        .unwrap_or_default()
}
