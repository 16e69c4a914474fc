//! Graphics backend contract.
//!
//! The render loop only sees [`Backend`]: it drains [`BackendEvent`]s and
//! submits one [`Frame`] of layered meshes per dirty iteration. Two
//! implementations exist: [`WinitBackend`] (window + wgpu) and
//! [`HeadlessBackend`], which records frames for tests.

mod frame;
mod headless;
mod windowed;

pub use frame::{Frame, Layer, Pass};
pub use headless::{HeadlessBackend, HeadlessHandle, RecordedFrame};
pub use windowed::{WinitBackend, WinitConfig};

use anyhow::Result;

use crate::input::InputEvent;

/// Events a backend reports to the render loop.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    /// The user asked to close the window.
    Closed,
    /// New drawable size in logical pixels.
    Resized { width: f32, height: f32 },
    Input(InputEvent),
}

/// Result of a present call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PresentOutcome {
    Presented,
    /// Transient surface problem; the frame should be drawn again.
    Skipped,
}

/// Window + drawing surface driven by the render loop.
///
/// Every method is called from the render thread only.
pub trait Backend {
    /// Appends all pending events to `out` without blocking.
    fn poll_events(&mut self, out: &mut Vec<BackendEvent>);

    fn set_title(&mut self, title: &str);

    /// Requests a new size in logical pixels. The backend reports the
    /// resulting size through a [`BackendEvent::Resized`].
    fn set_size(&mut self, width: u32, height: u32);

    /// Draws and presents `frame`. An error is fatal to the window.
    fn present(&mut self, frame: &Frame<'_>) -> Result<PresentOutcome>;
}
