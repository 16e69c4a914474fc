use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Result;

use crate::coords::Vec2;
use crate::paint::Color;

use super::{Backend, BackendEvent, Frame, Layer, Pass, PresentOutcome};

/// Copy of a presented frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedFrame {
    pub clear: Color,
    pub window: Vec2,
    pub layers: Vec<Layer>,
    pub atlas_generation: Option<u64>,
}

impl RecordedFrame {
    pub fn layers_in(&self, pass: Pass) -> impl Iterator<Item = &Layer> + '_ {
        self.layers.iter().filter(move |l| l.pass == pass)
    }

    pub fn triangle_count(&self, pass: Pass) -> usize {
        self.layers_in(pass).map(|l| l.mesh.triangle_count()).sum()
    }
}

#[derive(Debug, Default)]
struct HeadlessState {
    pending: VecDeque<BackendEvent>,
    frames: Vec<RecordedFrame>,
    title: String,
    size: Option<(u32, u32)>,
    fail_present: bool,
}

/// Scripting and inspection side of a [`HeadlessBackend`].
///
/// Cloneable and usable from any thread while the backend runs in a render
/// loop.
#[derive(Debug, Clone, Default)]
pub struct HeadlessHandle {
    state: Arc<Mutex<HeadlessState>>,
}

impl HeadlessHandle {
    /// Queues an event for the next poll.
    pub fn push_event(&self, event: BackendEvent) {
        self.lock().pending.push_back(event);
    }

    pub fn frames(&self) -> Vec<RecordedFrame> {
        self.lock().frames.clone()
    }

    pub fn frame_count(&self) -> usize {
        self.lock().frames.len()
    }

    pub fn last_frame(&self) -> Option<RecordedFrame> {
        self.lock().frames.last().cloned()
    }

    pub fn title(&self) -> String {
        self.lock().title.clone()
    }

    /// Last size requested through [`Backend::set_size`].
    pub fn requested_size(&self) -> Option<(u32, u32)> {
        self.lock().size
    }

    /// Makes every following present fail.
    pub fn fail_presents(&self) {
        self.lock().fail_present = true;
    }

    fn lock(&self) -> MutexGuard<'_, HeadlessState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Backend without a window. Events are scripted through a
/// [`HeadlessHandle`]; presented frames are recorded.
#[derive(Debug)]
pub struct HeadlessBackend {
    handle: HeadlessHandle,
}

impl HeadlessBackend {
    pub fn new() -> (Self, HeadlessHandle) {
        let handle = HeadlessHandle::default();
        (Self { handle: handle.clone() }, handle)
    }
}

impl Backend for HeadlessBackend {
    fn poll_events(&mut self, out: &mut Vec<BackendEvent>) {
        out.extend(self.handle.lock().pending.drain(..));
    }

    fn set_title(&mut self, title: &str) {
        self.handle.lock().title = title.to_owned();
    }

    fn set_size(&mut self, width: u32, height: u32) {
        let mut state = self.handle.lock();
        state.size = Some((width, height));
        state.pending.push_back(BackendEvent::Resized {
            width: width as f32,
            height: height as f32,
        });
    }

    fn present(&mut self, frame: &Frame<'_>) -> Result<PresentOutcome> {
        let mut state = self.handle.lock();
        anyhow::ensure!(!state.fail_present, "headless present failure requested");
        state.frames.push(RecordedFrame {
            clear: frame.clear,
            window: frame.window,
            layers: frame.layers.clone(),
            atlas_generation: frame.atlas.map(|a| a.generation),
        });
        Ok(PresentOutcome::Presented)
    }
}
