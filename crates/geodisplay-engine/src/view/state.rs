use crate::coords::Vec2;

/// Center, size and rotation of a view onto a coordinate space.
///
/// Invariant: `size` components are finite and strictly positive. Mutators
/// that would break it are rejected and report `false`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewState {
    pub center: Vec2,
    pub size: Vec2,
    /// Degrees in `[0, 360)`. Positive turns the view clockwise on screen.
    pub rotation: f32,
}

impl ViewState {
    #[inline]
    pub const fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size, rotation: 0.0 }
    }

    /// Pixel-space view of a `width` x `height` surface: identity mapping.
    #[inline]
    pub fn screen(width: f32, height: f32) -> Self {
        Self::new(Vec2::new(width * 0.5, height * 0.5), Vec2::new(width, height))
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        valid_size(self.size) && self.center.is_finite() && self.rotation.is_finite()
    }

    /// Moves the center by a delta in this view's own coordinates.
    #[inline]
    pub fn pan(&mut self, delta: Vec2) -> bool {
        if !delta.is_finite() {
            return false;
        }
        self.center += delta;
        true
    }

    /// Scales the visible span. `factor > 1` shows more (zooms out).
    pub fn zoom(&mut self, factor: f32) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        self.set_size(self.size * factor)
    }

    pub fn set_size(&mut self, size: Vec2) -> bool {
        if !valid_size(size) {
            return false;
        }
        self.size = size;
        true
    }

    #[inline]
    pub fn rotate(&mut self, degrees: f32) -> bool {
        self.set_rotation(self.rotation + degrees)
    }

    pub fn set_rotation(&mut self, degrees: f32) -> bool {
        if !degrees.is_finite() {
            return false;
        }
        self.rotation = degrees.rem_euclid(360.0);
        true
    }

    /// Affine map from this view's coordinates to normalized device
    /// coordinates (`[-1, 1]`, +Y up), as two rows `[a, b, tx]`.
    pub fn ndc_affine(&self) -> [[f32; 3]; 2] {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let sx = 2.0 / self.size.x;
        let sy = 2.0 / self.size.y;
        let (a, b) = (cos * sx, sin * sx);
        let (c, d) = (sin * sy, -cos * sy);
        let cx = self.center.x;
        let cy = self.center.y;
        [
            [a, b, -(a * cx + b * cy)],
            [c, d, -(c * cx + d * cy)],
        ]
    }
}

#[inline]
fn valid_size(size: Vec2) -> bool {
    size.is_finite() && size.x > 0.0 && size.y > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ndc(view: &ViewState, p: Vec2) -> Vec2 {
        let [r0, r1] = view.ndc_affine();
        Vec2::new(
            r0[0] * p.x + r0[1] * p.y + r0[2],
            r1[0] * p.x + r1[1] * p.y + r1[2],
        )
    }

    #[test]
    fn screen_view_maps_corners_to_clip_space() {
        let v = ViewState::screen(800.0, 600.0);
        assert!((ndc(&v, Vec2::new(0.0, 0.0)) - Vec2::new(-1.0, 1.0)).length() < 1e-5);
        assert!((ndc(&v, Vec2::new(800.0, 600.0)) - Vec2::new(1.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn center_maps_to_origin_under_rotation() {
        let mut v = ViewState::new(Vec2::new(12.0, -4.0), Vec2::new(100.0, 50.0));
        v.rotate(37.0);
        assert!(ndc(&v, v.center).length() < 1e-5);
    }

    #[test]
    fn zoom_rejects_non_positive_factor() {
        let mut v = ViewState::screen(100.0, 100.0);
        assert!(!v.zoom(0.0));
        assert!(!v.zoom(-2.0));
        assert!(!v.zoom(f32::NAN));
        assert_eq!(v.size, Vec2::new(100.0, 100.0));
        assert!(v.zoom(2.0));
        assert_eq!(v.size, Vec2::new(200.0, 200.0));
    }

    #[test]
    fn set_size_rejects_degenerate() {
        let mut v = ViewState::screen(100.0, 100.0);
        assert!(!v.set_size(Vec2::new(0.0, 10.0)));
        assert!(!v.set_size(Vec2::new(10.0, -1.0)));
        assert!(v.is_valid());
    }

    #[test]
    fn rotation_wraps() {
        let mut v = ViewState::screen(1.0, 1.0);
        v.rotate(350.0);
        v.rotate(20.0);
        assert!((v.rotation - 10.0).abs() < 1e-4);
        v.set_rotation(-90.0);
        assert!((v.rotation - 270.0).abs() < 1e-4);
    }
}
