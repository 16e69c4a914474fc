use crate::coords::{Rect, Vec2};

use super::ViewState;

/// Pan/zoom/rotate mapping between pixel coordinates and a view's coordinates.
///
/// `viewport` is the pixel rectangle the view is projected onto (the whole
/// window for both the screen and the world view).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewTransform {
    view: ViewState,
    viewport: Rect,
}

impl ViewTransform {
    #[inline]
    pub const fn new(view: ViewState, viewport: Rect) -> Self {
        Self { view, viewport }
    }

    #[inline]
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    #[inline]
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Pixel -> view coordinates.
    ///
    /// Relative to the viewport center, scaled by view size over viewport
    /// size, rotated by the view rotation, offset by the view center.
    pub fn screen_to_world(&self, pixel: Vec2) -> Vec2 {
        if self.viewport.is_empty() {
            return self.view.center;
        }
        let local = (pixel - self.viewport.center()).scale(Vec2::new(
            self.view.size.x / self.viewport.size.x,
            self.view.size.y / self.viewport.size.y,
        ));
        self.view.center + local.rotated(self.view.rotation)
    }

    /// View coordinates -> pixel. Inverse of [`screen_to_world`](Self::screen_to_world).
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        let local = (world - self.view.center).rotated(-self.view.rotation);
        self.viewport.center()
            + local.scale(Vec2::new(
                self.viewport.size.x / self.view.size.x,
                self.viewport.size.y / self.view.size.y,
            ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2, tol: f32) -> bool {
        (a - b).length() <= tol
    }

    fn window() -> Rect {
        Rect::new(0.0, 0.0, 500.0, 500.0)
    }

    #[test]
    fn unrotated_unzoomed_origin_centered() {
        let t = ViewTransform::new(ViewState::new(Vec2::zero(), Vec2::new(500.0, 500.0)), window());
        assert_eq!(t.screen_to_world(Vec2::new(50.0, 50.0)), Vec2::new(-200.0, -200.0));
        assert_eq!(t.screen_to_world(Vec2::new(450.0, 450.0)), Vec2::new(200.0, 200.0));
        assert_eq!(t.world_to_screen(Vec2::zero()), Vec2::new(250.0, 250.0));
    }

    #[test]
    fn zoomed_view_scales_distances() {
        let t = ViewTransform::new(ViewState::new(Vec2::zero(), Vec2::new(1000.0, 250.0)), window());
        assert_eq!(t.screen_to_world(Vec2::new(500.0, 500.0)), Vec2::new(500.0, 125.0));
    }

    #[test]
    fn rotated_view_matches_ndc_projection() {
        let mut view = ViewState::new(Vec2::new(30.0, -20.0), Vec2::new(640.0, 480.0));
        view.rotate(25.0);
        let vp = Rect::new(0.0, 0.0, 800.0, 600.0);
        let t = ViewTransform::new(view, vp);

        let w = Vec2::new(100.0, 40.0);
        let px = t.world_to_screen(w);
        let [r0, r1] = view.ndc_affine();
        let ndc = Vec2::new(r0[0] * w.x + r0[1] * w.y + r0[2], r1[0] * w.x + r1[1] * w.y + r1[2]);
        let from_ndc = Vec2::new((ndc.x + 1.0) * 0.5 * vp.size.x, (1.0 - ndc.y) * 0.5 * vp.size.y);
        assert!(close(px, from_ndc, 1e-3), "{px:?} vs {from_ndc:?}");
    }

    #[test]
    fn round_trip_is_idempotent() {
        let vp = Rect::new(0.0, 0.0, 1024.0, 768.0);
        for (rot, zoom, center) in [
            (0.0, 1.0, Vec2::zero()),
            (45.0, 0.5, Vec2::new(100.0, 100.0)),
            (123.0, 3.0, Vec2::new(-5000.0, 42.0)),
            (359.0, 0.01, Vec2::new(1.5, -2.5)),
        ] {
            let mut view = ViewState::new(center, Vec2::new(1024.0 * zoom, 768.0 * zoom));
            view.set_rotation(rot);
            let t = ViewTransform::new(view, vp);
            for p in [Vec2::new(0.0, 0.0), Vec2::new(512.0, 384.0), Vec2::new(1000.0, 17.0)] {
                let w = t.screen_to_world(p);
                let again = t.screen_to_world(t.world_to_screen(w));
                let tol = 1e-3 * (1.0 + w.length());
                assert!(close(w, again, tol), "rot {rot} zoom {zoom}: {w:?} vs {again:?}");
            }
        }
    }

    #[test]
    fn empty_viewport_collapses_to_center() {
        let view = ViewState::new(Vec2::new(7.0, 8.0), Vec2::new(10.0, 10.0));
        let t = ViewTransform::new(view, Rect::new(0.0, 0.0, 0.0, 0.0));
        assert_eq!(t.screen_to_world(Vec2::new(3.0, 3.0)), Vec2::new(7.0, 8.0));
    }
}
