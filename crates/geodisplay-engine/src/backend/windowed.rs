use std::time::Duration;

use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::device::{Gpu, GpuInit, SurfaceErrorAction};
use crate::input::{
    InputEvent, InputState, Key, KeyState, Modifiers, MouseButton, MouseButtonState,
    MouseWheelDelta, PointerButtonEvent, PointerMoveEvent,
};
use crate::render::{MeshRenderer, RenderCtx, RenderTarget};

use super::{Backend, BackendEvent, Frame, PresentOutcome};

/// Upper bound on event-loop pumps spent waiting for the window to appear.
const STARTUP_PUMPS: usize = 200;
const STARTUP_PUMP_TIMEOUT: Duration = Duration::from_millis(10);

/// Window creation parameters.
#[derive(Debug, Clone)]
pub struct WinitConfig {
    pub title: String,
    /// Logical pixels.
    pub size: (u32, u32),
    pub gpu: GpuInit,
}

#[self_referencing]
struct SurfaceEntry {
    renderer: MeshRenderer,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct WinitApp {
    config: WinitConfig,
    entry: Option<SurfaceEntry>,
    input: InputState,
    events: Vec<BackendEvent>,
    init_error: Option<anyhow::Error>,
}

/// Native window drawn with wgpu, driven from the render thread.
///
/// The winit event loop is created on the calling thread and pumped without
/// blocking on every [`poll_events`](Backend::poll_events).
pub struct WinitBackend {
    event_loop: EventLoop<()>,
    app: WinitApp,
    closed: bool,
}

impl WinitBackend {
    /// Creates the event loop and the window, and initializes the GPU.
    ///
    /// Errors when any of those steps fails.
    pub fn new(config: WinitConfig) -> Result<Self> {
        #[cfg(target_os = "macos")]
        {
            let _ = config;
            anyhow::bail!("macOS only allows windows on the main thread; the display render loop runs on its own thread");
        }

        #[cfg(not(target_os = "macos"))]
        {
            let event_loop = build_event_loop()?;
            let mut backend = Self {
                event_loop,
                app: WinitApp {
                    config,
                    entry: None,
                    input: InputState::default(),
                    events: Vec::new(),
                    init_error: None,
                },
                closed: false,
            };
            backend.wait_for_window()?;
            Ok(backend)
        }
    }

    #[cfg(not(target_os = "macos"))]
    fn wait_for_window(&mut self) -> Result<()> {
        for _ in 0..STARTUP_PUMPS {
            self.pump(Some(STARTUP_PUMP_TIMEOUT));
            if let Some(err) = self.app.init_error.take() {
                return Err(err);
            }
            if self.app.entry.is_some() {
                return Ok(());
            }
            if self.closed {
                break;
            }
        }
        anyhow::bail!("window was not created by the event loop")
    }

    #[cfg(not(target_os = "macos"))]
    fn pump(&mut self, timeout: Option<Duration>) {
        use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};

        if let PumpStatus::Exit(code) = self.event_loop.pump_app_events(timeout, &mut self.app) {
            log::debug!("winit event loop exited with code {code}");
            if !self.closed {
                self.app.events.push(BackendEvent::Closed);
            }
            self.closed = true;
        }
    }

    #[cfg(target_os = "macos")]
    fn pump(&mut self, _timeout: Option<Duration>) {}
}

#[cfg(any(
    target_os = "linux",
    target_os = "dragonfly",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
))]
fn build_event_loop() -> Result<EventLoop<()>> {
    let mut builder = EventLoop::builder();
    winit::platform::x11::EventLoopBuilderExtX11::with_any_thread(&mut builder, true);
    winit::platform::wayland::EventLoopBuilderExtWayland::with_any_thread(&mut builder, true);
    builder.build().context("failed to create winit EventLoop")
}

#[cfg(target_os = "windows")]
fn build_event_loop() -> Result<EventLoop<()>> {
    use winit::platform::windows::EventLoopBuilderExtWindows;

    EventLoop::builder()
        .with_any_thread(true)
        .build()
        .context("failed to create winit EventLoop")
}

#[cfg(not(any(
    target_os = "linux",
    target_os = "dragonfly",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd",
    target_os = "windows",
    target_os = "macos"
)))]
fn build_event_loop() -> Result<EventLoop<()>> {
    EventLoop::new().context("failed to create winit EventLoop")
}

impl WinitApp {
    fn create_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let (w, h) = self.config.size;
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(f64::from(w), f64::from(h)));
        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.config.gpu.clone();
        let entry = SurfaceEntryTryBuilder {
            renderer: MeshRenderer::new(),
            window,
            gpu_builder: |w: &Window| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        let size = entry.with_window(|w| logical_size(w));
        log::info!("display window created ({}x{} logical)", size.0, size.1);
        self.events.push(BackendEvent::Resized { width: size.0, height: size.1 });
        self.entry = Some(entry);
        Ok(())
    }
}

impl ApplicationHandler for WinitApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }
        if let Err(e) = self.create_entry(event_loop) {
            self.init_error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(entry) = self.entry.as_mut() else { return };

        match &event {
            WindowEvent::CloseRequested => {
                self.events.push(BackendEvent::Closed);
                return;
            }
            WindowEvent::Resized(new_size) => {
                entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                let (width, height) = entry.with_window(|w| logical_size(w));
                self.events.push(BackendEvent::Resized { width, height });
                return;
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = entry.with_window(|w| w.inner_size());
                entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                let (width, height) = entry.with_window(|w| logical_size(w));
                self.events.push(BackendEvent::Resized { width, height });
                return;
            }
            _ => {}
        }

        let translated = entry.with_window(|w| translate_input_event(w, &self.input, &event));
        if let Some(ev) = translated {
            self.input.apply_event(&ev);
            self.events.push(BackendEvent::Input(ev));
        }
    }
}

impl Backend for WinitBackend {
    fn poll_events(&mut self, out: &mut Vec<BackendEvent>) {
        if !self.closed {
            self.pump(Some(Duration::ZERO));
        }
        out.append(&mut self.app.events);
    }

    fn set_title(&mut self, title: &str) {
        if let Some(entry) = &self.app.entry {
            entry.with_window(|w| w.set_title(title));
        }
    }

    fn set_size(&mut self, width: u32, height: u32) {
        if let Some(entry) = &self.app.entry {
            // A synchronous resize is reported again through `Resized`.
            let _ = entry.with_window(|w| w.request_inner_size(LogicalSize::new(f64::from(width), f64::from(height))));
        }
    }

    fn present(&mut self, frame: &Frame<'_>) -> Result<PresentOutcome> {
        let Some(entry) = self.app.entry.as_mut() else {
            anyhow::bail!("present called without a window");
        };

        entry.with_mut(|fields| {
            if !fields.gpu.has_area() {
                return Ok(PresentOutcome::Skipped);
            }

            let mut gpu_frame = match fields.gpu.begin_frame() {
                Ok(f) => f,
                Err(err) => {
                    let message = err.to_string();
                    return match fields.gpu.handle_surface_error(err) {
                        SurfaceErrorAction::Fatal => Err(anyhow::anyhow!("surface error: {message}")),
                        action => {
                            log::debug!("frame skipped after surface error ({action:?})");
                            Ok(PresentOutcome::Skipped)
                        }
                    };
                }
            };

            let size = fields.gpu.size();
            let ctx = RenderCtx::new(
                fields.gpu.device(),
                fields.gpu.queue(),
                fields.gpu.surface_format(),
                (size.width, size.height),
                fields.window.scale_factor() as f32,
            );
            {
                let mut target = RenderTarget::new(&mut gpu_frame.encoder, &gpu_frame.view);
                fields.renderer.render(&ctx, &mut target, frame);
            }
            fields.gpu.submit(gpu_frame);
            Ok(PresentOutcome::Presented)
        })
    }
}

fn logical_size(window: &Window) -> (f32, f32) {
    let logical: LogicalSize<f64> = window.inner_size().to_logical(window.scale_factor());
    (logical.width as f32, logical.height as f32)
}

fn translate_input_event(window: &Window, state: &InputState, event: &WindowEvent) -> Option<InputEvent> {
    match event {
        // winit 0.30: ModifiersChanged carries a wrapper with `.state()`.
        WindowEvent::ModifiersChanged(m) => Some(InputEvent::ModifiersChanged(map_modifiers(m.state()))),

        WindowEvent::Focused(f) => Some(InputEvent::Focused(*f)),

        WindowEvent::CursorLeft { .. } => Some(InputEvent::PointerLeft),

        WindowEvent::CursorMoved { position, .. } => {
            let (x, y) = to_logical_f32(window, *position);
            Some(InputEvent::PointerMoved(PointerMoveEvent { x, y }))
        }

        WindowEvent::MouseInput { state: st, button, .. } => {
            let st = match st {
                ElementState::Pressed => MouseButtonState::Pressed,
                ElementState::Released => MouseButtonState::Released,
            };
            // winit 0.30 has no cursor query; use the tracked pointer position.
            let pointer = state.pointer.unwrap_or_default();
            Some(InputEvent::PointerButton(PointerButtonEvent {
                button: map_mouse_button(*button),
                state: st,
                x: pointer.x,
                y: pointer.y,
                modifiers: state.modifiers,
            }))
        }

        WindowEvent::MouseWheel { delta, .. } => {
            let delta = match delta {
                MouseScrollDelta::LineDelta(x, y) => MouseWheelDelta::Line { x: *x, y: *y },
                MouseScrollDelta::PixelDelta(p) => {
                    let (x, y) = to_logical_f32(window, *p);
                    MouseWheelDelta::Pixel { x, y }
                }
            };
            Some(InputEvent::MouseWheel { delta, modifiers: state.modifiers })
        }

        WindowEvent::KeyboardInput { event, .. } => {
            let st = match event.state {
                ElementState::Pressed => KeyState::Pressed,
                ElementState::Released => KeyState::Released,
            };
            Some(InputEvent::Key {
                key: map_key(event.physical_key),
                state: st,
                modifiers: state.modifiers,
                repeat: event.repeat,
            })
        }

        _ => None,
    }
}

fn to_logical_f32(window: &Window, pos: PhysicalPosition<f64>) -> (f32, f32) {
    let logical = pos.to_logical::<f64>(window.scale_factor());
    (logical.x as f32, logical.y as f32)
}

fn map_modifiers(m: ModifiersState) -> Modifiers {
    Modifiers {
        shift: m.shift_key(),
        ctrl: m.control_key(),
        alt: m.alt_key(),
        meta: m.super_key(),
    }
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Other(3),
        WinitMouseButton::Forward => MouseButton::Other(4),
        WinitMouseButton::Other(v) => MouseButton::Other(v),
    }
}

fn map_key(pk: PhysicalKey) -> Key {
    match pk {
        PhysicalKey::Code(code) => match code {
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::ArrowUp => Key::ArrowUp,
            KeyCode::ArrowDown => Key::ArrowDown,
            KeyCode::ArrowLeft => Key::ArrowLeft,
            KeyCode::ArrowRight => Key::ArrowRight,
            other => Key::Unknown(other as u32),
        },
        // NativeKeyCode is not a u32 in winit 0.30.
        PhysicalKey::Unidentified(_) => Key::Unknown(0),
    }
}
