use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::coords::{Rect, Vec2};
use crate::grid::GridResolution;
use crate::scene::ShapeRegistry;
use crate::view::{diagram_area, OriginCorner, TransformModel};

use super::DisplayConfig;

/// Window metadata and views, guarded by one lock.
///
/// API setters mutate it briefly; the render loop holds it for one frame.
#[derive(Debug)]
pub(crate) struct WindowState {
    pub title: String,
    pub title_pending: bool,
    /// Last size requested through the API, logical pixels.
    pub requested_size: (u32, u32),
    pub size_pending: bool,
    pub interval: Duration,
    pub model: TransformModel,
    pub border: f32,
    pub resolution: GridResolution,
    pub origin_corner: OriginCorner,
    /// World point pinned to the origin corner by `set_diagram_position`.
    pub pinned_position: Option<Vec2>,
    pub mouse_pan: bool,
}

impl WindowState {
    fn new(config: &DisplayConfig) -> Self {
        let (w, h) = config.size;
        Self {
            title: config.title.clone(),
            title_pending: false,
            requested_size: config.size,
            size_pending: false,
            interval: config.update_interval,
            model: TransformModel::new(Vec2::new(w as f32, h as f32)),
            border: config.border_thickness,
            resolution: config.grid_resolution,
            origin_corner: OriginCorner::default(),
            pinned_position: None,
            mouse_pan: config.mouse_pan,
        }
    }

    #[inline]
    pub fn diagram_area(&self) -> Rect {
        diagram_area(self.model.window_size(), self.border)
    }

    /// Pixel position of the origin corner.
    #[inline]
    pub fn origin_pixel(&self) -> Vec2 {
        self.origin_corner.of(self.diagram_area())
    }

    /// World point currently shown at the origin corner.
    #[inline]
    pub fn diagram_position(&self) -> Vec2 {
        self.model.screen_to_world(self.origin_pixel())
    }

    /// Moves the view so the pinned world point sits on the origin corner.
    pub fn apply_pinned_position(&mut self) {
        if let Some(world) = self.pinned_position {
            let pixel = self.origin_pixel();
            self.model.anchor(world, pixel);
        }
    }
}

/// State shared between the `Display` handle and the render loop thread.
#[derive(Debug)]
pub(crate) struct Shared {
    state: Mutex<WindowState>,
    pub shapes: ShapeRegistry,
    running: AtomicBool,
}

impl Shared {
    pub fn new(config: &DisplayConfig) -> Self {
        Self {
            state: Mutex::new(WindowState::new(config)),
            shapes: ShapeRegistry::new(),
            running: AtomicBool::new(true),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, WindowState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    #[inline]
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }
}
