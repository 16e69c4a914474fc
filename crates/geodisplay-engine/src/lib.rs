//! Geodisplay engine crate.
//!
//! An interactive 2D diagram window: a pannable, zoomable and rotatable
//! world view with a labelled coordinate grid and user shapes, drawn by a
//! render loop on its own thread.
//!
//! ```ignore
//! let display = Display::create(DisplayConfig::default())?;
//! display.add_shape(Shape::polygon(vec![...], Color::RED));
//! display.rotate_diagram(15.0);
//! ```

pub mod backend;
pub mod coords;
pub mod device;
pub mod geometry;
pub mod grid;
pub mod input;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;
pub mod text;
pub mod time;
pub mod view;
pub mod window;

pub use coords::{Rect, Segment, Vec2};
pub use paint::Color;
pub use scene::{LineShape, Outline, PolygonShape, Shape, ShapeStyle};
pub use text::{FontId, StyleFlags, TextShape, TextStyle};
pub use window::{Display, DisplayConfig};
