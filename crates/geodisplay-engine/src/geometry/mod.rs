//! Mesh builder.
//!
//! Stateless conversions from polygons and thick line segments into triangle
//! lists. Every drawable (shapes, grid lines, chrome, glyph quads) ends up as a
//! [`Mesh`] built from these primitives.

mod error;
mod line;
mod mesh;
mod triangulate;

pub use error::GeometryError;
pub use line::{line_corners, line_to_quad};
pub use mesh::{Mesh, Triangle, Vertex, NO_TEXCOORD};
pub use triangulate::{polygon_signed_area, triangulate_polygon};
