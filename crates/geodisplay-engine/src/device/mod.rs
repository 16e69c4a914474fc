//! GPU device + surface management.
//!
//! Creates the wgpu adapter/device/queue for the display window, keeps the
//! surface configured across resizes and hands out one [`GpuFrame`] per
//! presented frame.

mod gpu;

pub use gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
