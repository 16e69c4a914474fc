use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::device::GpuInit;
use crate::grid::GridResolution;
use crate::paint::Color;

/// Where the label/text font comes from.
#[derive(Debug, Clone)]
pub enum FontSource {
    Path(PathBuf),
    Bytes(Arc<[u8]>),
    /// Text rendering disabled.
    None,
}

/// Display configuration.
///
/// Plain data with chained setters:
///
/// ```ignore
/// let config = DisplayConfig::default()
///     .with_title("Triangles")
///     .with_size(800, 600)
///     .with_grid_resolution(GridResolution::new(25.0, 25.0));
/// ```
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    pub title: String,
    /// Initial window size in logical pixels.
    pub size: (u32, u32),
    /// Sleep between two render loop iterations.
    pub update_interval: Duration,
    /// Width of the frame drawn around the diagram area, in pixels.
    pub border_thickness: f32,
    pub border_color: Color,
    pub background: Color,
    pub grid_resolution: GridResolution,
    /// Grid line thickness in world units.
    pub grid_line_thickness: f32,
    pub grid_color: Color,
    /// Label character size in pixels.
    pub label_size: f32,
    pub label_color: Color,
    pub font: FontSource,
    /// Drag with the primary button pans the diagram.
    pub mouse_pan: bool,
    pub gpu: GpuInit,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: "Geometry Display".to_string(),
            size: (500, 500),
            update_interval: Duration::from_millis(50),
            border_thickness: 50.0,
            border_color: Color::from_srgb_u8(129, 129, 129, 255),
            background: Color::BLACK,
            grid_resolution: GridResolution::default(),
            grid_line_thickness: 1.0,
            grid_color: Color::BLUE,
            label_size: 12.0,
            label_color: Color::WHITE,
            font: FontSource::Path(PathBuf::from("fonts/arial.ttf")),
            mouse_pan: true,
            gpu: GpuInit::default(),
        }
    }
}

impl DisplayConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn with_update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval;
        self
    }

    pub fn with_border(mut self, thickness: f32, color: Color) -> Self {
        self.border_thickness = thickness;
        self.border_color = color;
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn with_grid_resolution(mut self, resolution: GridResolution) -> Self {
        self.grid_resolution = resolution;
        self
    }

    pub fn with_grid_style(mut self, thickness: f32, color: Color) -> Self {
        self.grid_line_thickness = thickness;
        self.grid_color = color;
        self
    }

    pub fn with_labels(mut self, size: f32, color: Color) -> Self {
        self.label_size = size;
        self.label_color = color;
        self
    }

    pub fn with_font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.font = FontSource::Path(path.into());
        self
    }

    pub fn with_font_bytes(mut self, bytes: impl Into<Arc<[u8]>>) -> Self {
        self.font = FontSource::Bytes(bytes.into());
        self
    }

    pub fn without_font(mut self) -> Self {
        self.font = FontSource::None;
        self
    }

    pub fn with_mouse_pan(mut self, enabled: bool) -> Self {
        self.mouse_pan = enabled;
        self
    }

    pub fn with_gpu(mut self, gpu: GpuInit) -> Self {
        self.gpu = gpu;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_window() {
        let c = DisplayConfig::default();
        assert_eq!(c.title, "Geometry Display");
        assert_eq!(c.size, (500, 500));
        assert_eq!(c.update_interval, Duration::from_millis(50));
        assert_eq!(c.border_thickness, 50.0);
        assert_eq!(c.grid_resolution, GridResolution::new(10.0, 10.0));
        assert!(c.mouse_pan);
        assert!(matches!(c.font, FontSource::Path(_)));
    }

    #[test]
    fn builders_chain() {
        let c = DisplayConfig::default()
            .with_title("t")
            .with_size(800, 600)
            .with_mouse_pan(false)
            .without_font();
        assert_eq!(c.title, "t");
        assert_eq!(c.size, (800, 600));
        assert!(!c.mouse_pan);
        assert!(matches!(c.font, FontSource::None));
    }
}
