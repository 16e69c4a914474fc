use std::sync::mpsc;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::backend::{Backend, WinitBackend, WinitConfig};
use crate::coords::Vec2;
use crate::grid::GridResolution;
use crate::scene::{LineShape, PolygonShape, Shape};
use crate::text::{FontId, FontSystem};
use crate::view::{OriginCorner, ViewState};

use super::config::FontSource;
use super::runtime::RenderLoop;
use super::shared::Shared;
use super::DisplayConfig;

/// Handle to a display window running its own render loop thread.
///
/// Setters are fire-and-forget: they update shared state under a short lock
/// and the change shows up on the next rendered frame. Dropping the handle
/// closes the window.
pub struct Display {
    shared: Arc<Shared>,
    thread: Option<JoinHandle<()>>,
    font: Option<FontId>,
}

impl Display {
    /// Opens a native window.
    ///
    /// Blocks until the window and GPU are ready; their failure is returned
    /// here and no render loop is left running.
    pub fn create(config: DisplayConfig) -> Result<Self> {
        let winit_config = WinitConfig {
            title: config.title.clone(),
            size: config.size,
            gpu: config.gpu.clone(),
        };
        Self::create_with(config, move || WinitBackend::new(winit_config))
    }

    /// Starts the render loop on a backend built by `factory`.
    ///
    /// `factory` runs on the render thread, so the backend itself need not
    /// be `Send`.
    pub fn create_with<B, F>(config: DisplayConfig, factory: F) -> Result<Self>
    where
        B: Backend + 'static,
        F: FnOnce() -> Result<B> + Send + 'static,
    {
        let fonts = load_fonts(&config.font);
        let font = fonts.as_ref().and_then(FontSystem::first_font);

        let shared = Arc::new(Shared::new(&config));
        let (ready_tx, ready_rx) = mpsc::channel::<Result<()>>();

        let thread_shared = Arc::clone(&shared);
        let thread = std::thread::Builder::new()
            .name("geodisplay-render".to_string())
            .spawn(move || {
                let backend = match factory() {
                    Ok(b) => b,
                    Err(e) => {
                        thread_shared.stop();
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));
                RenderLoop::new(backend, thread_shared, fonts, &config).run();
            })
            .context("failed to spawn render thread")?;

        let started = ready_rx
            .recv()
            .context("render thread exited during startup")
            .and_then(|r| r);

        if let Err(e) = started {
            log::error!("failed to create display window: {e:#}");
            let _ = thread.join();
            return Err(e);
        }

        log::info!("display started");
        Ok(Self { shared, thread: Some(thread), font })
    }

    /// Stops the render loop and waits for its thread to exit.
    pub fn close(&mut self) {
        self.shared.stop();
        self.join();
    }

    /// Waits until the window has been closed.
    pub fn join(&mut self) {
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("render thread panicked");
            }
        }
    }

    /// `false` once the window was closed by the user or by [`close`](Self::close).
    pub fn is_running(&self) -> bool {
        self.shared.is_running()
    }

    /// Font loaded at creation, for text shapes. `None` disables text.
    pub fn font(&self) -> Option<FontId> {
        self.font
    }

    // ── shapes ──────────────────────────────────────────────────────────────

    /// Stores `shape` for drawing. Pass a clone to keep using the original.
    pub fn add_shape(&self, shape: impl Into<Shape>) {
        self.shared.shapes.add(shape.into());
    }

    pub fn add_polygon(&self, polygon: &PolygonShape) {
        self.add_shape(polygon.clone());
    }

    pub fn add_line(&self, line: &LineShape) {
        self.add_shape(line.clone());
    }

    pub fn clear_shapes(&self) {
        self.shared.shapes.clear();
    }

    pub fn shape_count(&self) -> usize {
        self.shared.shapes.len()
    }

    // ── window ──────────────────────────────────────────────────────────────

    pub fn set_title(&self, title: impl Into<String>) {
        let mut state = self.shared.lock();
        state.title = title.into();
        state.title_pending = true;
        state.model.mark_dirty();
    }

    /// Requests a new window size in logical pixels.
    pub fn set_size(&self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::warn!("ignoring window size {width}x{height}");
            return;
        }
        let mut state = self.shared.lock();
        state.requested_size = (width, height);
        state.size_pending = true;
        state.model.mark_dirty();
    }

    /// Current window size in logical pixels.
    pub fn window_size(&self) -> Vec2 {
        self.shared.lock().model.window_size()
    }

    /// Sleep between render loop iterations.
    pub fn set_update_interval(&self, millis: u64) {
        let mut state = self.shared.lock();
        state.interval = Duration::from_millis(millis);
        state.model.mark_dirty();
    }

    pub fn set_mouse_pan(&self, enabled: bool) {
        let mut state = self.shared.lock();
        state.mouse_pan = enabled;
        state.model.mark_dirty();
    }

    // ── diagram view ────────────────────────────────────────────────────────

    /// Shows world point `(x, y)` at the diagram's origin corner.
    pub fn set_diagram_position(&self, x: f32, y: f32) {
        let world = Vec2::new(x, y);
        if !world.is_finite() {
            log::warn!("ignoring diagram position ({x}, {y})");
            return;
        }
        let mut state = self.shared.lock();
        state.pinned_position = Some(world);
        state.apply_pinned_position();
    }

    /// World point currently shown at the diagram's origin corner.
    pub fn diagram_position(&self) -> Vec2 {
        self.shared.lock().diagram_position()
    }

    /// `0` top-left, `1` top-right, `2` bottom-right, `3` bottom-left.
    pub fn set_diagram_origin_corner(&self, index: usize) {
        let Some(corner) = OriginCorner::from_index(index) else {
            log::warn!("ignoring diagram origin corner {index}");
            return;
        };
        let mut state = self.shared.lock();
        state.origin_corner = corner;
        state.apply_pinned_position();
        state.model.mark_dirty();
    }

    /// Rotates the diagram by `degrees` relative to its current rotation.
    pub fn rotate_diagram(&self, degrees: f32) {
        if !self.shared.lock().model.rotate(degrees) {
            log::warn!("ignoring diagram rotation by {degrees}");
        }
    }

    pub fn set_diagram_rotation(&self, degrees: f32) {
        if !self.shared.lock().model.set_rotation(degrees) {
            log::warn!("ignoring diagram rotation {degrees}");
        }
    }

    /// Scales the visible world span; `factor > 1` zooms out.
    pub fn zoom_diagram(&self, factor: f32) {
        if !self.shared.lock().model.zoom(factor) {
            log::warn!("ignoring diagram zoom {factor}");
        }
    }

    /// Grid spacing in world units. A value `<= 0` hides that axis.
    pub fn set_diagram_line_resolution(&self, x: f32, y: f32) {
        if !(x.is_finite() && y.is_finite()) {
            log::warn!("ignoring grid resolution ({x}, {y})");
            return;
        }
        let mut state = self.shared.lock();
        state.resolution = GridResolution::new(x, y);
        state.model.mark_dirty();
    }

    pub fn world_view(&self) -> ViewState {
        *self.shared.lock().model.world_view()
    }
}

impl Drop for Display {
    fn drop(&mut self) {
        self.close();
    }
}

fn load_fonts(source: &FontSource) -> Option<FontSystem> {
    let mut fonts = FontSystem::new();
    let loaded = match source {
        FontSource::Path(path) => fonts.load_font_file(path),
        FontSource::Bytes(bytes) => fonts.load_font(bytes),
        FontSource::None => return None,
    };
    match loaded {
        Ok(_) => Some(fonts),
        Err(e) => {
            log::warn!("text rendering disabled, font failed to load: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendEvent, HeadlessBackend, HeadlessHandle, Pass};
    use crate::paint::Color;
    use std::time::Instant;

    fn headless_display() -> (Display, HeadlessHandle) {
        let (backend, handle) = HeadlessBackend::new();
        let config = DisplayConfig::default()
            .without_font()
            .with_update_interval(Duration::from_millis(1));
        let display = Display::create_with(config, move || Ok(backend)).expect("display");
        (display, handle)
    }

    fn wait_for(mut cond: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if cond() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        false
    }

    // ── lifecycle ───────────────────────────────────────────────────────────

    #[test]
    fn close_stops_the_loop() {
        let (mut display, handle) = headless_display();
        assert!(wait_for(|| handle.frame_count() > 0));
        display.close();
        assert!(!display.is_running());
    }

    #[test]
    fn join_returns_after_window_close_event() {
        let (mut display, handle) = headless_display();
        handle.push_event(BackendEvent::Closed);
        display.join();
        assert!(!display.is_running());
    }

    #[test]
    fn backend_failure_is_reported_by_create() {
        let result = Display::create_with(DisplayConfig::default().without_font(), || {
            Err::<HeadlessBackend, _>(anyhow::anyhow!("no display server"))
        });
        let err = result.err().expect("create must fail");
        assert!(err.to_string().contains("no display server"));
    }

    #[test]
    fn missing_font_disables_text() {
        let (backend, _handle) = HeadlessBackend::new();
        let config = DisplayConfig::default().with_font_path("/nonexistent/font.ttf");
        let display = Display::create_with(config, move || Ok(backend)).expect("display");
        assert!(display.font().is_none());
    }

    // ── setters ─────────────────────────────────────────────────────────────

    #[test]
    fn shapes_reach_the_frame() {
        let (display, handle) = headless_display();
        display.add_polygon(&PolygonShape::new(
            vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0), Vec2::new(0.0, 10.0)],
            Color::GREEN,
        ));
        display.add_line(&LineShape::new(Vec2::new(-50.0, 0.0), Vec2::new(50.0, 0.0), 2.0, Color::RED));
        assert_eq!(display.shape_count(), 2);
        assert!(wait_for(|| handle
            .last_frame()
            .is_some_and(|f| f.triangle_count(Pass::Shapes) == 4)));

        display.clear_shapes();
        assert!(wait_for(|| handle
            .last_frame()
            .is_some_and(|f| f.triangle_count(Pass::Shapes) == 0)));
    }

    #[test]
    fn title_and_size_are_forwarded() {
        let (display, handle) = headless_display();
        display.set_title("Polygons");
        display.set_size(300, 200);
        assert!(wait_for(|| handle.title() == "Polygons"));
        assert!(wait_for(|| display.window_size() == Vec2::new(300.0, 200.0)));
    }

    #[test]
    fn zero_size_is_ignored() {
        let (display, _handle) = headless_display();
        display.set_size(0, 100);
        assert!(!display.shared.lock().size_pending);
    }

    #[test]
    fn diagram_position_readback() {
        let (display, _handle) = headless_display();
        display.set_diagram_position(10.0, 20.0);
        assert!((display.diagram_position() - Vec2::new(10.0, 20.0)).length() < 1e-3);

        display.set_diagram_origin_corner(2);
        assert!((display.diagram_position() - Vec2::new(10.0, 20.0)).length() < 1e-3);

        display.set_diagram_origin_corner(7);
        assert_eq!(display.shared.lock().origin_corner, OriginCorner::BottomRight);
    }

    #[test]
    fn view_setters() {
        let (display, _handle) = headless_display();
        display.rotate_diagram(30.0);
        display.rotate_diagram(15.0);
        assert!((display.world_view().rotation - 45.0).abs() < 1e-4);

        display.set_diagram_rotation(0.0);
        display.zoom_diagram(2.0);
        assert_eq!(display.world_view().size, Vec2::new(1000.0, 1000.0));

        display.zoom_diagram(-1.0);
        assert_eq!(display.world_view().size, Vec2::new(1000.0, 1000.0));
    }

    #[test]
    fn disabled_grid_axis_draws_half_the_lines() {
        let (display, handle) = headless_display();
        display.set_diagram_line_resolution(10.0, 0.0);
        assert!(wait_for(|| handle
            .last_frame()
            .is_some_and(|f| f.triangle_count(Pass::Grid) == 80)));
    }

    #[test]
    fn window_setters_trigger_a_redraw() {
        let (display, handle) = headless_display();
        let setters: [&dyn Fn(&Display); 4] = [
            &|d| d.set_title("Redraw"),
            &|d| d.set_size(320, 240),
            &|d| d.set_update_interval(1),
            &|d| d.set_mouse_pan(false),
        ];
        for set in setters {
            assert!(wait_for(|| handle.frame_count() > 0 && !display.shared.lock().model.is_dirty()));
            let before = handle.frame_count();
            set(&display);
            assert!(wait_for(|| handle.frame_count() > before));
        }
    }

    #[test]
    fn update_interval_is_stored() {
        let (display, _handle) = headless_display();
        display.set_update_interval(20);
        assert_eq!(display.shared.lock().interval, Duration::from_millis(20));
    }
}
