//! Coordinate and geometry primitives shared by the transform model, the mesh
//! builder and the grid generator.
//!
//! Screen space:
//! - Logical pixels (DPI-aware)
//! - Origin top-left
//! - +X right, +Y down
//!
//! World space uses the same handedness; the world view decides how much of it
//! is visible and under which rotation.

mod rect;
mod segment;
mod vec2;

pub use rect::Rect;
pub use segment::Segment;
pub use vec2::Vec2;
