use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in image pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
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

    /// Square window of `2 * half_extent` on each side around `center`.
    pub fn around(center: (f64, f64), half_extent: f64) -> Self {
        Self::new(
            center.0 - half_extent,
            center.1 - half_extent,
            half_extent * 2.0,
            half_extent * 2.0,
        )
    }

    pub fn mid_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn mid_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn center(&self) -> (f64, f64) {
        (self.mid_x(), self.mid_y())
    }

    /// Half-open containment: the minimum edges are inside, the maximum
    /// edges are not.
    pub fn contains(&self, point: (f64, f64)) -> bool {
        let (px, py) = point;
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }
}
