use crate::coords::{Rect, Vec2};

/// Pixel rectangle the diagram is drawn in: the window inset by the UI border.
///
/// Width and height never go negative; a window smaller than twice the border
/// yields an empty area.
#[inline]
pub fn diagram_area(window: Vec2, border: f32) -> Rect {
    Rect::from_origin_size(Vec2::zero(), window.max(Vec2::zero())).inset(border.max(0.0))
}

/// Corner of the diagram area that the diagram position is anchored to.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum OriginCorner {
    #[default]
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl OriginCorner {
    /// `0` top-left, `1` top-right, `2` bottom-right, `3` bottom-left.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::TopLeft),
            1 => Some(Self::TopRight),
            2 => Some(Self::BottomRight),
            3 => Some(Self::BottomLeft),
            _ => None,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The matching corner of `rect`.
    #[inline]
    pub fn of(self, rect: Rect) -> Vec2 {
        rect.corners()[self.index()]
    }
}
