//! Time subsystem.
//!
//! Frame pacing for the render loop: one [`FramePacer`] per display, ticked
//! once per loop iteration and asked to sleep between iterations.

mod frame_pacer;

pub use frame_pacer::{FramePacer, FrameTime};
