//! Canvas geometry primitives
//!
//! Everything on the canvas speaks f64 units. Estimated dimensions are
//! snapped up to the grid so boxes line up regardless of content size.

use serde::{Deserialize, Serialize};

/// A point on the infinite canvas
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A content box size
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when both dimensions carry a real measurement
    pub fn is_measured(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// An axis-aligned rectangle (top-left anchored)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// True when the vertical spans of two rects intersect
    pub fn overlaps_vertically(&self, other: &Rect) -> bool {
        self.y < other.bottom() && other.y < self.bottom()
    }
}

/// Round a dimension up to the nearest multiple of `grid`
pub fn snap_up(value: f64, grid: f64) -> f64 {
    if grid <= 0.0 {
        return value;
    }
    (value / grid).ceil() * grid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_up_rounds_to_next_grid_line() {
        assert_eq!(snap_up(41.0, 10.0), 50.0);
        assert_eq!(snap_up(40.0, 10.0), 40.0);
        assert_eq!(snap_up(0.1, 10.0), 10.0);
    }

    #[test]
    fn test_snap_up_ignores_degenerate_grid() {
        assert_eq!(snap_up(37.0, 0.0), 37.0);
    }

    #[test]
    fn test_rect_vertical_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 40.0);
        let b = Rect::new(100.0, 30.0, 10.0, 40.0);
        let c = Rect::new(100.0, 40.0, 10.0, 40.0);

        assert!(a.overlaps_vertically(&b));
        assert!(!a.overlaps_vertically(&c));
    }
}
