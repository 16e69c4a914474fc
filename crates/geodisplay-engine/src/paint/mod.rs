//! Paint model shared between shapes, the grid and the renderer.
//!
//! Colors are linear, premultiplied alpha. Geometry types remain in `coords`.

pub mod color;

pub use color::Color;
