//! Transform model.
//!
//! Two [`ViewState`]s describe what is visible: the *screen view* (pixel
//! space, never rotated, changed only by window resizes) and the *world view*
//! (diagram space, changed by pan/zoom/rotate). Together with the pixel
//! viewport they define the two-way mapping in [`ViewTransform`].

mod area;
mod model;
mod state;
mod transform;

pub use area::{diagram_area, OriginCorner};
pub use model::TransformModel;
pub use state::ViewState;
pub use transform::ViewTransform;
