use super::Vec2;

/// Tolerance for the inclusive segment/segment test. Grid lines are built to
/// end exactly on the visible quad's edges, so touches must count.
const INTERSECT_EPSILON: f32 = 1e-4;

/// Line segment between two points.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Segment {
    pub a: Vec2,
    pub b: Vec2,
}

impl Segment {
    #[inline]
    pub const fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }

    #[inline]
    pub fn direction(self) -> Vec2 {
        self.b - self.a
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.direction().length()
    }

    /// Intersection point of two segments, endpoints included.
    ///
    /// Parallel (and collinear) segments report no intersection.
    pub fn intersection(self, other: Segment) -> Option<Vec2> {
        let r = self.direction();
        let s = other.direction();
        let denom = r.cross(s);
        if denom.abs() <= f32::EPSILON * r.length().max(1.0) * s.length().max(1.0) {
            return None;
        }

        let qp = other.a - self.a;
        let t = qp.cross(s) / denom;
        let u = qp.cross(r) / denom;

        let range = -INTERSECT_EPSILON..=1.0 + INTERSECT_EPSILON;
        if range.contains(&t) && range.contains(&u) {
            Some(self.a + r * t.clamp(0.0, 1.0))
        } else {
            None
        }
    }
}
