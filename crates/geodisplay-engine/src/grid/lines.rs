use crate::coords::{Rect, Segment, Vec2};
use crate::view::ViewTransform;

/// Upper bound on lines generated along one axis in a single frame.
pub const MAX_LINES_PER_AXIS: usize = 10_000;

/// World-space spacing between grid lines along each axis.
///
/// `x` spaces the vertical lines, `y` the horizontal ones. A value `<= 0`
/// disables that axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GridResolution {
    pub x: f32,
    pub y: f32,
}

impl GridResolution {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Default for GridResolution {
    fn default() -> Self {
        Self::new(10.0, 10.0)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Orientation {
    /// Constant world X.
    Vertical,
    /// Constant world Y.
    Horizontal,
}

/// A grid line clipped to the visible world quad.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GridLine {
    pub orientation: Orientation,
    /// World X for vertical lines, world Y for horizontal ones.
    pub world_coordinate: f32,
    /// World-space segment, `a` is the first clipped endpoint.
    pub segment: Segment,
    pub label_value: f32,
}

impl GridLine {
    /// Screen position of the line's label: its first clipped endpoint.
    #[inline]
    pub fn label_anchor(&self, transform: &ViewTransform) -> Vec2 {
        transform.world_to_screen(self.segment.a)
    }
}

/// Generates the visible grid for `area` (pixels) under the world `transform`.
///
/// Vertical lines come first, in ascending X, then horizontal lines in
/// ascending Y. An empty area yields no lines.
pub fn generate_grid(transform: &ViewTransform, area: Rect, resolution: GridResolution) -> Vec<GridLine> {
    if area.is_empty() || !area.is_finite() {
        return Vec::new();
    }

    let quad = area.corners().map(|p| transform.screen_to_world(p));
    let Some(bounds) = Rect::bounding(&quad) else {
        return Vec::new();
    };

    let mut lines = Vec::new();
    axis_lines(&quad, bounds, resolution.x, Orientation::Vertical, &mut lines);
    axis_lines(&quad, bounds, resolution.y, Orientation::Horizontal, &mut lines);
    lines
}

fn axis_lines(quad: &[Vec2; 4], bounds: Rect, step: f32, orientation: Orientation, out: &mut Vec<GridLine>) {
    if !step.is_finite() || step <= 0.0 {
        return;
    }

    let (min, max) = match orientation {
        Orientation::Vertical => (bounds.min().x, bounds.max().x),
        Orientation::Horizontal => (bounds.min().y, bounds.max().y),
    };

    let start = (min / step).floor() * step;
    let count = ((max - start) / step).ceil();
    if !count.is_finite() || count < 0.0 {
        return;
    }
    if count > MAX_LINES_PER_AXIS as f32 {
        log::debug!("grid: skipping {orientation:?} lines, {count} exceeds the per-frame limit");
        return;
    }

    for i in 0..count as usize {
        let coord = start + i as f32 * step;
        if coord >= max {
            break;
        }

        let scan_line = match orientation {
            Orientation::Vertical => Segment::new(
                Vec2::new(coord, bounds.min().y),
                Vec2::new(coord, bounds.max().y),
            ),
            Orientation::Horizontal => Segment::new(
                Vec2::new(bounds.min().x, coord),
                Vec2::new(bounds.max().x, coord),
            ),
        };

        if let Some(segment) = clip_to_quad(scan_line, quad) {
            out.push(GridLine {
                orientation,
                world_coordinate: coord,
                segment,
                label_value: coord,
            });
        }
    }
}

/// Clips `scan_line` to the first two quad-edge intersections, scanning edges in
/// corner order.
fn clip_to_quad(scan_line: Segment, quad: &[Vec2; 4]) -> Option<Segment> {
    let mut hits = (0..4).filter_map(|i| {
        let edge = Segment::new(quad[i], quad[(i + 1) % 4]);
        scan_line.intersection(edge)
    });
    let a = hits.next()?;
    let b = hits.next()?;
    Some(Segment::new(a, b))
}
