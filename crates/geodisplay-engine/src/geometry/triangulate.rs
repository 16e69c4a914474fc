use crate::coords::Vec2;

use super::{GeometryError, Triangle};

/// Shoelace area of a closed polygon. Positive for counter-clockwise winding
/// in a y-up frame.
pub fn polygon_signed_area(points: &[Vec2]) -> f32 {
    if points.len() < 3 {
        return 0.0;
    }
    let n = points.len();
    let twice: f32 = (0..n).map(|i| points[i].cross(points[(i + 1) % n])).sum();
    twice * 0.5
}

/// Decomposes a simple polygon into `N - 2` triangles by ear clipping.
///
/// Output triangles all wind the same way (positive [`Triangle::signed_area`])
/// regardless of the input orientation. Self-intersecting input still yields
/// `N - 2` triangles, some of which may be degenerate or overlapping.
pub fn triangulate_polygon(vertices: &[Vec2]) -> Result<Vec<Triangle>, GeometryError> {
    if vertices.len() < 3 {
        return Err(GeometryError::TooFewVertices(vertices.len()));
    }
    if !vertices.iter().all(|v| v.is_finite()) {
        return Err(GeometryError::NonFinite);
    }

    let mut ring: Vec<usize> = (0..vertices.len()).collect();
    if polygon_signed_area(vertices) < 0.0 {
        ring.reverse();
    }

    let mut out = Vec::with_capacity(vertices.len() - 2);

    while ring.len() > 3 {
        let m = ring.len();
        let ear = (0..m)
            .find(|&i| is_ear(vertices, &ring, i))
            .or_else(|| (0..m).find(|&i| is_convex(vertices, &ring, i)))
            .unwrap_or(0);

        let (a, b, c) = corner(vertices, &ring, ear);
        out.push(Triangle::new(a, b, c));
        ring.remove(ear);
    }

    out.push(Triangle::new(vertices[ring[0]], vertices[ring[1]], vertices[ring[2]]));
    Ok(out)
}

#[inline]
fn corner(vertices: &[Vec2], ring: &[usize], i: usize) -> (Vec2, Vec2, Vec2) {
    let m = ring.len();
    (
        vertices[ring[(i + m - 1) % m]],
        vertices[ring[i]],
        vertices[ring[(i + 1) % m]],
    )
}

#[inline]
fn is_convex(vertices: &[Vec2], ring: &[usize], i: usize) -> bool {
    let (a, b, c) = corner(vertices, ring, i);
    (b - a).cross(c - b) > 0.0
}

fn is_ear(vertices: &[Vec2], ring: &[usize], i: usize) -> bool {
    if !is_convex(vertices, ring, i) {
        return false;
    }
    let (a, b, c) = corner(vertices, ring, i);
    let m = ring.len();
    let skip = [ring[(i + m - 1) % m], ring[i], ring[(i + 1) % m]];

    ring.iter()
        .filter(|j| !skip.contains(j))
        .map(|&j| vertices[j])
        .filter(|p| *p != a && *p != b && *p != c)
        .all(|p| !point_in_triangle(p, a, b, c))
}

/// Inclusive test for a counter-clockwise triangle: points on an edge count
/// as inside, so a reflex vertex touching the clipped diagonal blocks the ear.
#[inline]
fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    (b - a).cross(p - a) >= 0.0 && (c - b).cross(p - b) >= 0.0 && (a - c).cross(p - c) >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(f32, f32)]) -> Vec<Vec2> {
        raw.iter().map(|&(x, y)| Vec2::new(x, y)).collect()
    }

    fn assert_covers(poly: &[Vec2]) {
        let tris = triangulate_polygon(poly).unwrap();
        assert_eq!(tris.len(), poly.len() - 2);
        for t in &tris {
            assert!(t.signed_area() > 0.0, "non-positive triangle {t:?}");
        }
        let sum: f32 = tris.iter().map(Triangle::signed_area).sum();
        let expected = polygon_signed_area(poly).abs();
        assert!((sum - expected).abs() < 1e-3 * expected.max(1.0), "{sum} != {expected}");
    }

    // ── simple polygons ───────────────────────────────────────────────────

    #[test]
    fn triangle_is_returned_as_is() {
        let poly = pts(&[(0.0, 0.0), (4.0, 0.0), (0.0, 3.0)]);
        let tris = triangulate_polygon(&poly).unwrap();
        assert_eq!(tris.len(), 1);
        assert!((tris[0].signed_area() - 6.0).abs() < 1e-6);
    }

    #[test]
    fn square_either_winding() {
        let ccw = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        assert_covers(&ccw);
        let cw: Vec<Vec2> = ccw.iter().rev().copied().collect();
        assert_covers(&cw);
    }

    #[test]
    fn concave_arrow() {
        assert_covers(&pts(&[
            (0.0, 0.0),
            (6.0, 3.0),
            (0.0, 6.0),
            (2.0, 3.0),
        ]));
    }

    #[test]
    fn concave_comb() {
        assert_covers(&pts(&[
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 6.0),
            (8.0, 6.0),
            (8.0, 2.0),
            (6.0, 2.0),
            (6.0, 6.0),
            (4.0, 6.0),
            (4.0, 2.0),
            (2.0, 2.0),
            (2.0, 6.0),
            (0.0, 6.0),
        ]));
    }

    #[test]
    fn notch_vertex_on_the_diagonal() {
        // (2, 2) lies exactly on the diagonals of the first two corners.
        let poly = pts(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (2.0, 2.0), (0.0, 4.0)]);
        assert_covers(&poly);
        let cw: Vec<Vec2> = poly.iter().rev().copied().collect();
        assert_covers(&cw);
    }

    #[test]
    fn regular_polygon() {
        let poly: Vec<Vec2> = (0..24)
            .map(|i| Vec2::new(50.0, 0.0).rotated(i as f32 * 15.0) + Vec2::new(3.0, -7.0))
            .collect();
        assert_covers(&poly);
    }

    // ── random star-shaped polygons ───────────────────────────────────────

    /// Deterministic xorshift generator, values in `[0, 1)`.
    struct Rng(u64);

    impl Rng {
        fn next(&mut self) -> f32 {
            self.0 ^= self.0 << 13;
            self.0 ^= self.0 >> 7;
            self.0 ^= self.0 << 17;
            (self.0 >> 40) as f32 / (1u64 << 24) as f32
        }
    }

    /// Vertices at increasing angles around a center with random radii. Any
    /// such ring is simple.
    fn random_star(rng: &mut Rng, n: usize) -> Vec<Vec2> {
        let step = 360.0 / n as f32;
        (0..n)
            .map(|i| {
                let angle = (i as f32 + 0.1 + 0.8 * rng.next()) * step;
                let radius = 1.0 + 9.0 * rng.next();
                Vec2::new(radius, 0.0).rotated(angle)
            })
            .collect()
    }

    /// Even-odd crossing test.
    fn polygon_contains(poly: &[Vec2], p: Vec2) -> bool {
        let n = poly.len();
        let mut inside = false;
        for i in 0..n {
            let (a, b) = (poly[i], poly[(i + 1) % n]);
            if (a.y > p.y) != (b.y > p.y) {
                let x = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if p.x < x {
                    inside = !inside;
                }
            }
        }
        inside
    }

    #[test]
    fn random_simple_polygons_are_covered_exactly() {
        let mut rng = Rng(0x9e37_79b9_7f4a_7c15);
        for round in 0..300 {
            let n = 3 + round % 18;
            let poly = random_star(&mut rng, n);
            assert_covers(&poly);
            let cw: Vec<Vec2> = poly.iter().rev().copied().collect();
            assert_covers(&cw);

            for t in triangulate_polygon(&poly).unwrap() {
                let Triangle([a, b, c]) = t;
                let centroid = (a + b + c) * (1.0 / 3.0);
                assert!(polygon_contains(&poly, centroid), "round {round}: {t:?} leaves the polygon");
            }
        }
    }

    // ── degenerate input ──────────────────────────────────────────────────

    #[test]
    fn too_few_vertices() {
        let poly = pts(&[(0.0, 0.0), (1.0, 1.0)]);
        assert_eq!(triangulate_polygon(&poly), Err(GeometryError::TooFewVertices(2)));
    }

    #[test]
    fn non_finite_vertex() {
        let poly = pts(&[(0.0, 0.0), (f32::NAN, 1.0), (1.0, 0.0)]);
        assert_eq!(triangulate_polygon(&poly), Err(GeometryError::NonFinite));
    }

    #[test]
    fn self_intersecting_bowtie_does_not_panic() {
        let poly = pts(&[(0.0, 0.0), (10.0, 10.0), (10.0, 0.0), (0.0, 10.0)]);
        let tris = triangulate_polygon(&poly).unwrap();
        assert_eq!(tris.len(), 2);
    }

    #[test]
    fn collinear_points_do_not_panic() {
        let poly = pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
        let tris = triangulate_polygon(&poly).unwrap();
        assert_eq!(tris.len(), 2);
        assert!(tris.iter().all(|t| t.signed_area().abs() < 1e-6));
    }
}
