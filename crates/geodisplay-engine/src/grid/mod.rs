//! Grid generator.
//!
//! Derives the rectilinear grid visible through the diagram area for the
//! current world view: one [`GridLine`] per resolution step, clipped to the
//! (possibly rotated) visible world quad.

mod lines;
mod mesh;

pub use lines::{generate_grid, GridLine, GridResolution, Orientation, MAX_LINES_PER_AXIS};
pub use mesh::{append_grid_mesh, format_label};
