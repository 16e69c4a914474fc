//! Display window: public handle and render loop.
//!
//! [`Display`] owns a render thread running a [`RenderLoop`] over a
//! [`Backend`](crate::backend::Backend). API calls and the loop share one
//! locked window state plus the shape registry.

mod config;
mod display;
mod runtime;
mod shared;

pub use config::{DisplayConfig, FontSource};
pub use display::Display;
pub use runtime::{LoopPhase, RenderLoop};
