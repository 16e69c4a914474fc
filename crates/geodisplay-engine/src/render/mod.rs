//! GPU rendering subsystem.
//!
//! A single renderer draws every [`Frame`](crate::backend::Frame) layer as a
//! triangle list. Vertex positions are in the layer's view coordinates; a
//! per-layer affine uniform maps them to NDC, and textured vertices sample the
//! glyph atlas for coverage.

mod ctx;
mod mesh_renderer;

pub use ctx::{RenderCtx, RenderTarget};
pub use mesh_renderer::MeshRenderer;
