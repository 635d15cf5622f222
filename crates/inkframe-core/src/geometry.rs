//! Rotation and resize math.
//!
//! All angles are in degrees, clockwise, in screen coordinates (y grows
//! downward). Rotation pivots are bounding-box centers.

use kurbo::{Point, Rect, Vec2};

use crate::shapes::Shape;

/// Smallest width/height a resize gesture can produce.
pub const MIN_SHAPE_SIZE: f64 = 2.0;

/// Rotate `point` around `pivot` by `angle_deg` degrees clockwise.
pub fn rotate_point(point: Point, pivot: Point, angle_deg: f64) -> Point {
    let rad = angle_deg.to_radians();
    let (sin, cos) = rad.sin_cos();
    let dx = point.x - pivot.x;
    let dy = point.y - pivot.y;
    Point::new(
        pivot.x + dx * cos - dy * sin,
        pivot.y + dx * sin + dy * cos,
    )
}

/// Resize handles. The eight compass handles apply to box shapes; `Start` and
/// `End` move line endpoints directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
    Start,
    End,
}

impl ResizeHandle {
    pub fn affects_west(&self) -> bool {
        matches!(self, Self::West | Self::NorthWest | Self::SouthWest)
    }

    pub fn affects_east(&self) -> bool {
        matches!(self, Self::East | Self::NorthEast | Self::SouthEast)
    }

    pub fn affects_north(&self) -> bool {
        matches!(self, Self::North | Self::NorthWest | Self::NorthEast)
    }

    pub fn affects_south(&self) -> bool {
        matches!(self, Self::South | Self::SouthWest | Self::SouthEast)
    }

    /// Normalized position of the fixed anchor inside the box. Dragging the
    /// west edge anchors the east edge (ax = 1) and so on; edge handles leave
    /// the perpendicular axis centered.
    pub fn anchor(&self) -> (f64, f64) {
        let ax = if self.affects_west() {
            1.0
        } else if self.affects_east() {
            0.0
        } else {
            0.5
        };
        let ay = if self.affects_north() {
            1.0
        } else if self.affects_south() {
            0.0
        } else {
            0.5
        };
        (ax, ay)
    }

    pub fn is_line_handle(&self) -> bool {
        matches!(self, Self::Start | Self::End)
    }
}

/// Resize `initial` by `delta` (the pointer movement in world units) from the
/// given handle, keeping the anchor point opposite the handle fixed in world
/// space even when the box is rotated by `rotation_deg`.
///
/// The pointer delta is first un-rotated into the box's own frame, the
/// tentative box is computed there, then the whole box is shifted so the
/// anchor's world position before and after coincide. With a locked aspect
/// ratio the dominant axis drives and the other follows; pure north/south
/// handles are height-driven, everything else width-driven.
pub fn anchored_resize(
    initial: Rect,
    handle: ResizeHandle,
    rotation_deg: f64,
    delta: Vec2,
    aspect_locked: bool,
) -> Rect {
    if handle.is_line_handle() {
        return initial;
    }

    // Express the pointer movement in the unrotated frame of the box.
    let local = rotate_vec(delta, -rotation_deg);

    let mut x = initial.x0;
    let mut y = initial.y0;
    let mut w = initial.width();
    let mut h = initial.height();

    if handle.affects_west() {
        x += local.x;
        w -= local.x;
    } else if handle.affects_east() {
        w += local.x;
    }
    if handle.affects_north() {
        y += local.y;
        h -= local.y;
    } else if handle.affects_south() {
        h += local.y;
    }

    if aspect_locked && initial.width() > 0.0 && initial.height() > 0.0 {
        let ratio = initial.width() / initial.height();
        match handle {
            ResizeHandle::North | ResizeHandle::South => {
                h = h.max(MIN_SHAPE_SIZE);
                w = h * ratio;
            }
            _ => {
                w = w.max(MIN_SHAPE_SIZE);
                h = w / ratio;
            }
        }
    }

    w = w.max(MIN_SHAPE_SIZE);
    h = h.max(MIN_SHAPE_SIZE);

    // Pin the anchor: wherever the fixed corner sat in world space before the
    // resize, it must sit after. The correction below fully determines the
    // box position, so the x/y accumulated above only matter as a seed.
    let (ax, ay) = handle.anchor();
    let old_center = initial.center();
    let anchor_world = rotate_point(
        Point::new(initial.x0 + ax * initial.width(), initial.y0 + ay * initial.height()),
        old_center,
        rotation_deg,
    );

    let new_center = Point::new(x + w / 2.0, y + h / 2.0);
    let anchor_after = rotate_point(
        Point::new(x + ax * w, y + ay * h),
        new_center,
        rotation_deg,
    );

    let shift = anchor_world - anchor_after;
    Rect::new(x + shift.x, y + shift.y, x + w + shift.x, y + h + shift.y)
}

fn rotate_vec(v: Vec2, angle_deg: f64) -> Vec2 {
    let rad = angle_deg.to_radians();
    let (sin, cos) = rad.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Union bounding box of a shape list, `None` when empty.
pub fn compute_bounds(shapes: &[Shape]) -> Option<Rect> {
    let mut iter = shapes.iter();
    let first = iter.next()?.bounds();
    Some(iter.fold(first, |acc, shape| acc.union(shape.bounds())))
}
