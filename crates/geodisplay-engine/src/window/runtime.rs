use std::sync::Arc;

use crate::backend::{Backend, BackendEvent, Frame, Layer, Pass, PresentOutcome};
use crate::coords::{Rect, Vec2};
use crate::geometry::Mesh;
use crate::grid::{append_grid_mesh, format_label, generate_grid};
use crate::input::{InputEvent, InputState, Key, KeyState, MouseButton, MouseButtonState};
use crate::paint::Color;
use crate::text::{FontSystem, LabelCache, TextShaper, TextStyle};
use crate::time::FramePacer;

use super::shared::{Shared, WindowState};
use super::DisplayConfig;

/// Zoom factor per wheel line or PageUp/PageDown press.
const ZOOM_STEP: f32 = 1.1;
/// Arrow keys pan by this fraction of the visible world span.
const KEY_PAN_FRACTION: f32 = 0.1;

/// Where the loop is in its per-iteration state machine.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopPhase {
    Polling,
    Rendering,
    Sleeping,
    Closed,
}

/// Colors and sizes the loop draws with. Fixed at creation.
#[derive(Debug, Clone)]
struct Look {
    background: Color,
    border_color: Color,
    grid_thickness: f32,
    grid_color: Color,
}

/// Render loop driving one backend.
///
/// Each [`step`](Self::step) polls events, renders if anything changed and
/// leaves the loop in [`LoopPhase::Sleeping`]; [`run`](Self::run) repeats
/// that with the configured sleep until the window closes.
pub struct RenderLoop<B: Backend> {
    backend: B,
    shared: Arc<Shared>,
    fonts: Option<FontSystem>,
    labels: Option<LabelCache>,
    input: InputState,
    pacer: FramePacer,
    look: Look,
    phase: LoopPhase,
    /// Set when the previous frame could not be presented.
    redraw: bool,
    events: Vec<BackendEvent>,
}

impl<B: Backend> RenderLoop<B> {
    pub(crate) fn new(backend: B, shared: Arc<Shared>, fonts: Option<FontSystem>, config: &DisplayConfig) -> Self {
        let labels = fonts.as_ref().and_then(|fs| {
            // Labels use the first loaded font.
            let font = fs.first_font()?;
            let mut style = TextStyle::new(font, config.label_size);
            style.fill = config.label_color;
            Some(LabelCache::new(style))
        });

        Self {
            backend,
            shared,
            fonts,
            labels,
            input: InputState::default(),
            pacer: FramePacer::new(config.update_interval),
            look: Look {
                background: config.background,
                border_color: config.border_color,
                grid_thickness: config.grid_line_thickness,
                grid_color: config.grid_color,
            },
            phase: LoopPhase::Polling,
            redraw: true,
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    /// Runs iterations until the window closes or the display is stopped.
    pub fn run(mut self) {
        log::debug!("render loop started");
        while self.step() != LoopPhase::Closed {
            self.pacer.sleep();
        }
        log::debug!("render loop finished after {} iterations", self.pacer.frame_index());
    }

    /// One loop iteration: poll, render when dirty, then report `Sleeping`
    /// (or `Closed`).
    pub fn step(&mut self) -> LoopPhase {
        if self.phase == LoopPhase::Closed {
            return LoopPhase::Closed;
        }
        if !self.shared.is_running() {
            return self.close();
        }

        self.phase = LoopPhase::Polling;
        let time = self.pacer.tick();

        let shared = Arc::clone(&self.shared);
        let mut state = shared.lock();
        self.pacer.set_interval(state.interval);
        self.apply_window_requests(&mut state);

        let mut events = std::mem::take(&mut self.events);
        self.backend.poll_events(&mut events);
        let mut closing = false;
        for event in events.drain(..) {
            match event {
                BackendEvent::Closed => closing = true,
                BackendEvent::Resized { width, height } => {
                    if state.model.resize(width, height) {
                        log::debug!("window resized to {width}x{height}");
                    }
                }
                BackendEvent::Input(ev) => self.handle_input(&mut state, &ev),
            }
        }
        self.events = events;

        let dirty = state.model.take_dirty() | self.shared.shapes.take_dirty() | std::mem::take(&mut self.redraw);
        if dirty {
            self.phase = LoopPhase::Rendering;
            log::trace!("rendering frame {}", time.frame_index);
            if let Err(e) = self.render(&state) {
                log::error!("failed to present frame: {e:#}");
                closing = true;
            }
        }
        drop(state);

        if closing {
            return self.close();
        }
        self.phase = LoopPhase::Sleeping;
        self.phase
    }

    fn close(&mut self) -> LoopPhase {
        if self.phase != LoopPhase::Closed {
            log::info!("display window closed");
        }
        self.shared.stop();
        self.phase = LoopPhase::Closed;
        self.phase
    }

    fn apply_window_requests(&mut self, state: &mut WindowState) {
        if std::mem::take(&mut state.title_pending) {
            self.backend.set_title(&state.title);
        }
        if std::mem::take(&mut state.size_pending) {
            let (w, h) = state.requested_size;
            self.backend.set_size(w, h);
        }
    }

    // ── input ───────────────────────────────────────────────────────────────

    fn handle_input(&mut self, state: &mut WindowState, ev: &InputEvent) {
        self.input.apply_event(ev);

        match ev {
            InputEvent::PointerMoved(_) => {
                state.model.mark_dirty();
                let (Some(anchor), Some(pointer)) = (self.input.drag_anchor(), self.input.pointer) else {
                    return;
                };
                if state.mouse_pan && self.input.primary_down() {
                    let current = state.model.screen_to_world(pointer);
                    state.model.pan(anchor - current);
                }
            }

            InputEvent::PointerButton(b) if b.button == MouseButton::Left => {
                if b.state == MouseButtonState::Pressed {
                    let pixel = Vec2::new(b.x, b.y);
                    if state.mouse_pan && state.diagram_area().contains(pixel) {
                        self.input.latch_drag(state.model.screen_to_world(pixel));
                    }
                }
            }

            InputEvent::MouseWheel { delta, .. } => {
                let Some(pointer) = self.input.pointer else { return };
                let lines = delta.lines_y();
                if lines != 0.0 && state.diagram_area().contains(pointer) {
                    // Wheel away from the user zooms in.
                    state.model.zoom_at(ZOOM_STEP.powf(-lines), pointer);
                }
            }

            InputEvent::Key { key, state: KeyState::Pressed, .. } => self.handle_key(state, *key),

            _ => {}
        }
    }

    fn handle_key(&mut self, state: &mut WindowState, key: Key) {
        let view = *state.model.world_view();
        let step = view.size * KEY_PAN_FRACTION;
        let delta = match key {
            Key::ArrowLeft => Vec2::new(-step.x, 0.0),
            Key::ArrowRight => Vec2::new(step.x, 0.0),
            Key::ArrowUp => Vec2::new(0.0, -step.y),
            Key::ArrowDown => Vec2::new(0.0, step.y),
            Key::PageUp => {
                state.model.zoom(1.0 / ZOOM_STEP);
                return;
            }
            Key::PageDown => {
                state.model.zoom(ZOOM_STEP);
                return;
            }
            _ => return,
        };
        // Pan along the screen axes of a rotated view.
        state.model.pan(delta.rotated(view.rotation));
    }

    // ── frame assembly ──────────────────────────────────────────────────────

    fn render(&mut self, state: &WindowState) -> anyhow::Result<()> {
        let model = &state.model;
        let window = model.window_size();
        let area = state.diagram_area();
        let screen = *model.screen_view();
        let world = *model.world_view();

        let mut layers = Vec::with_capacity(4);

        let mut chrome = Mesh::new();
        for rect in border_rects(window, area) {
            chrome.push_rect(rect, self.look.border_color);
        }
        layers.push(Layer { pass: Pass::Chrome, view: screen, clip: None, mesh: chrome });

        if !area.is_empty() {
            let mut shapes = Mesh::new();
            let fonts = &mut self.fonts;
            self.shared.shapes.for_each_for_render(|shape| {
                let shaper = fonts.as_mut().map(|f| f as &mut dyn TextShaper);
                if let Err(e) = shape.append_to(&mut shapes, shaper) {
                    log::trace!("shape {:?} skipped: {e}", shape.name().unwrap_or(""));
                }
            });
            layers.push(Layer { pass: Pass::Shapes, view: world, clip: Some(area), mesh: shapes });

            let transform = model.world_transform();
            let lines = generate_grid(&transform, area, state.resolution);
            let mut grid = Mesh::new();
            append_grid_mesh(&mut grid, &lines, self.look.grid_thickness, self.look.grid_color);
            layers.push(Layer { pass: Pass::Grid, view: world, clip: Some(area), mesh: grid });

            if let (Some(labels), Some(fonts)) = (self.labels.as_mut(), self.fonts.as_mut()) {
                let mut text = Mesh::new();
                labels.begin_frame();
                for line in &lines {
                    let label = format_label(line.label_value);
                    labels.get(&label, fonts).append_to(&mut text, line.label_anchor(&transform));
                }
                labels.end_frame();
                layers.push(Layer { pass: Pass::Labels, view: screen, clip: None, mesh: text });
            }
        }

        let frame = Frame {
            clear: self.look.background,
            window,
            layers,
            atlas: self.fonts.as_ref().map(|f| f.atlas().image()),
        };
        log::trace!(
            "frame: {} shape, {} grid, {} label triangles",
            frame.triangle_count(Pass::Shapes),
            frame.triangle_count(Pass::Grid),
            frame.triangle_count(Pass::Labels),
        );

        match self.backend.present(&frame)? {
            PresentOutcome::Presented => {}
            PresentOutcome::Skipped => self.redraw = true,
        }
        Ok(())
    }
}

/// The frame around `area`; the whole window when the area is empty.
fn border_rects(window: Vec2, area: Rect) -> Vec<Rect> {
    if area.is_empty() {
        return vec![Rect::from_origin_size(Vec2::zero(), window)];
    }
    let min = area.min();
    let max = area.max();
    [
        Rect::new(0.0, 0.0, window.x, min.y),
        Rect::new(0.0, max.y, window.x, window.y - max.y),
        Rect::new(0.0, min.y, min.x, area.size.y),
        Rect::new(max.x, min.y, window.x - max.x, area.size.y),
    ]
    .into_iter()
    .filter(|r| !r.is_empty())
    .collect()
}
