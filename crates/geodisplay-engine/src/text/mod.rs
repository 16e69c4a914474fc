//! Text shaping.
//!
//! [`FontSystem`] owns the loaded fonts and the CPU-side [`GlyphAtlas`]; it
//! implements [`TextShaper`], which turns a string plus a [`TextStyle`] into
//! fill/outline meshes textured from the atlas. [`TextShape`] caches that
//! geometry and only reshapes after a setter made it stale.

mod atlas;
mod font_system;
mod labels;
mod shape;
mod shaper;
mod style;

pub use atlas::{AtlasImage, AtlasRegion, GlyphAtlas, ATLAS_SIZE};
pub use font_system::{FontId, FontLoadError, FontSystem, GlyphKey};
pub use labels::LabelCache;
pub use shape::TextShape;
pub use shaper::{TextGeometry, TextShaper};
pub use style::{StyleFlags, TextStyle};
