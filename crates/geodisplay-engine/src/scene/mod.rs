//! Shape registry.
//!
//! [`Shape`] is the closed set of drawables; [`ShapeRegistry`] is the
//! mutex-guarded, insertion-ordered collection the render loop draws from.

mod registry;
mod shape;
mod style;

pub use registry::ShapeRegistry;
pub use shape::{LineShape, PolygonShape, Shape};
pub use style::{Outline, ShapeStyle};
