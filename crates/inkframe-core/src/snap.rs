//! Grid snapping.

use kurbo::Point;

/// Default grid cell size in world units.
pub const GRID_SIZE: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSnap {
    pub enabled: bool,
    pub size: f64,
}

impl Default for GridSnap {
    fn default() -> Self {
        Self {
            enabled: true,
            size: GRID_SIZE,
        }
    }
}

impl GridSnap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    /// Snap a scalar to the nearest grid multiple. Pass-through when
    /// disabled.
    pub fn value(&self, v: f64) -> f64 {
        if self.enabled && self.size > 0.0 {
            (v / self.size).round() * self.size
        } else {
            v
        }
    }

    pub fn point(&self, p: Point) -> Point {
        Point::new(self.value(p.x), self.value(p.y))
    }
}
