use crate::coords::{Rect, Vec2};

use super::{ViewState, ViewTransform};

/// Screen view + world view, with a dirty flag raised by every mutation.
///
/// The render loop consumes the flag with [`take_dirty`](Self::take_dirty).
#[derive(Debug, Clone, PartialEq)]
pub struct TransformModel {
    screen: ViewState,
    world: ViewState,
    dirty: bool,
}

impl TransformModel {
    /// World view centered on the origin at a 1:1 scale with the window.
    pub fn new(window: Vec2) -> Self {
        let window = if window.is_finite() && window.x > 0.0 && window.y > 0.0 {
            window
        } else {
            Vec2::new(1.0, 1.0)
        };
        Self {
            screen: ViewState::screen(window.x, window.y),
            world: ViewState::new(Vec2::zero(), window),
            dirty: true,
        }
    }

    #[inline]
    pub fn screen_view(&self) -> &ViewState {
        &self.screen
    }

    #[inline]
    pub fn world_view(&self) -> &ViewState {
        &self.world
    }

    #[inline]
    pub fn window_size(&self) -> Vec2 {
        self.screen.size
    }

    /// Pixel rectangle both views are projected onto.
    #[inline]
    pub fn viewport(&self) -> Rect {
        Rect::from_origin_size(Vec2::zero(), self.screen.size)
    }

    #[inline]
    pub fn world_transform(&self) -> ViewTransform {
        ViewTransform::new(self.world, self.viewport())
    }

    #[inline]
    pub fn screen_to_world(&self, pixel: Vec2) -> Vec2 {
        self.world_transform().screen_to_world(pixel)
    }

    #[inline]
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        self.world_transform().world_to_screen(world)
    }

    /// World units per pixel along X.
    #[inline]
    pub fn zoom_level(&self) -> f32 {
        self.world.size.x / self.screen.size.x
    }

    /// Applies a new window size. The world view keeps its center and its
    /// world-units-per-pixel ratio.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        let new_size = Vec2::new(width, height);
        if !(new_size.is_finite() && width > 0.0 && height > 0.0) {
            return false;
        }
        let ratio = Vec2::new(
            self.world.size.x / self.screen.size.x,
            self.world.size.y / self.screen.size.y,
        );
        self.screen = ViewState::screen(width, height);
        self.world.set_size(new_size.scale(ratio));
        self.dirty = true;
        true
    }

    /// Translates the world view by a world-space delta.
    pub fn pan(&mut self, delta: Vec2) -> bool {
        let changed = self.world.pan(delta);
        self.dirty |= changed;
        changed
    }

    pub fn zoom(&mut self, factor: f32) -> bool {
        let changed = self.world.zoom(factor);
        self.dirty |= changed;
        changed
    }

    /// Zooms while keeping the world point under `pixel` fixed.
    pub fn zoom_at(&mut self, factor: f32, pixel: Vec2) -> bool {
        let before = self.screen_to_world(pixel);
        if !self.world.zoom(factor) {
            return false;
        }
        let after = self.screen_to_world(pixel);
        self.world.pan(before - after);
        self.dirty = true;
        true
    }

    pub fn rotate(&mut self, degrees: f32) -> bool {
        let changed = self.world.rotate(degrees);
        self.dirty |= changed;
        changed
    }

    pub fn set_rotation(&mut self, degrees: f32) -> bool {
        let changed = self.world.set_rotation(degrees);
        self.dirty |= changed;
        changed
    }

    /// Pans so that `world` projects onto `pixel`.
    pub fn anchor(&mut self, world: Vec2, pixel: Vec2) -> bool {
        if !(world.is_finite() && pixel.is_finite()) {
            return false;
        }
        let current = self.screen_to_world(pixel);
        self.pan(world - current)
    }

    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-3
    }

    fn model() -> TransformModel {
        let mut m = TransformModel::new(Vec2::new(500.0, 500.0));
        m.take_dirty();
        m
    }

    // ── mutations raise the dirty flag ───────────────────────────────────

    #[test]
    fn new_model_starts_dirty() {
        assert!(TransformModel::new(Vec2::new(10.0, 10.0)).is_dirty());
    }

    #[test]
    fn pan_moves_center_and_marks_dirty() {
        let mut m = model();
        assert!(m.pan(Vec2::new(-100.0, 0.0)));
        assert!(m.take_dirty());
        assert_eq!(m.world_view().center, Vec2::new(-100.0, 0.0));
    }

    #[test]
    fn rejected_zoom_leaves_state_clean() {
        let mut m = model();
        assert!(!m.zoom(0.0));
        assert!(!m.is_dirty());
        assert_eq!(m.world_view().size, Vec2::new(500.0, 500.0));
    }

    #[test]
    fn rejected_resize_is_noop() {
        let mut m = model();
        assert!(!m.resize(0.0, 300.0));
        assert!(!m.is_dirty());
        assert_eq!(m.window_size(), Vec2::new(500.0, 500.0));
    }

    // ── resize ────────────────────────────────────────────────────────────

    #[test]
    fn resize_keeps_zoom_ratio_and_center() {
        let mut m = model();
        m.zoom(2.0);
        m.pan(Vec2::new(5.0, 5.0));
        assert!(m.resize(800.0, 600.0));
        assert_eq!(m.world_view().size, Vec2::new(1600.0, 1200.0));
        assert_eq!(m.world_view().center, Vec2::new(5.0, 5.0));
        assert_eq!(m.screen_view().center, Vec2::new(400.0, 300.0));
    }

    // ── anchoring ─────────────────────────────────────────────────────────

    #[test]
    fn anchor_places_world_point_at_pixel() {
        let mut m = model();
        m.rotate(30.0);
        m.zoom(0.5);
        let pixel = Vec2::new(50.0, 450.0);
        assert!(m.anchor(Vec2::new(10.0, 20.0), pixel));
        assert!(close(m.screen_to_world(pixel), Vec2::new(10.0, 20.0)));
    }

    #[test]
    fn zoom_at_keeps_point_under_cursor() {
        let mut m = model();
        let pixel = Vec2::new(120.0, 340.0);
        let before = m.screen_to_world(pixel);
        assert!(m.zoom_at(0.8, pixel));
        assert!(close(m.screen_to_world(pixel), before));
        assert!((m.zoom_level() - 0.8).abs() < 1e-5);
    }
}
