//! Alignment and distribution over a selection.
//!
//! Both operate on the union bounding box of the selected shapes. Lines are
//! translated rigidly so their geometry survives; box shapes have the
//! relevant coordinate set directly.

use kurbo::Vec2;

use crate::geometry::compute_bounds;
use crate::shapes::{Shape, ShapeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Distribution {
    Horizontal,
    Vertical,
}

/// Align the selected root shapes against their union bounds. Needs at least
/// two members; returns whether anything moved.
pub fn align(shapes: &mut [Shape], selected: &[ShapeId], alignment: Alignment) -> bool {
    let member_bounds: Vec<_> = shapes
        .iter()
        .filter(|s| selected.contains(&s.id))
        .map(|s| s.bounds())
        .collect();
    if member_bounds.len() < 2 {
        return false;
    }
    let union = member_bounds
        .iter()
        .skip(1)
        .fold(member_bounds[0], |acc, b| acc.union(*b));

    for shape in shapes.iter_mut().filter(|s| selected.contains(&s.id)) {
        let b = shape.bounds();
        let target = match alignment {
            Alignment::Left => Vec2::new(union.x0 - b.x0, 0.0),
            Alignment::Center => Vec2::new(union.center().x - b.center().x, 0.0),
            Alignment::Right => Vec2::new(union.x1 - b.x1, 0.0),
            Alignment::Top => Vec2::new(0.0, union.y0 - b.y0),
            Alignment::Middle => Vec2::new(0.0, union.center().y - b.center().y),
            Alignment::Bottom => Vec2::new(0.0, union.y1 - b.y1),
        };
        shape.translate(target);
    }
    true
}

/// Space the selected shapes so their centers are evenly distributed along the
/// axis, keeping the outermost two in place. Needs at least three members.
pub fn distribute(shapes: &mut [Shape], selected: &[ShapeId], axis: Distribution) -> bool {
    let mut order: Vec<usize> = shapes
        .iter()
        .enumerate()
        .filter(|(_, s)| selected.contains(&s.id))
        .map(|(i, _)| i)
        .collect();
    if order.len() < 3 {
        return false;
    }

    let center_of = |s: &Shape| match axis {
        Distribution::Horizontal => s.bounds().center().x,
        Distribution::Vertical => s.bounds().center().y,
    };
    order.sort_by(|&a, &b| {
        center_of(&shapes[a])
            .partial_cmp(&center_of(&shapes[b]))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let first = center_of(&shapes[order[0]]);
    let last = center_of(&shapes[order[order.len() - 1]]);
    let step = (last - first) / (order.len() - 1) as f64;

    for (slot, &idx) in order.iter().enumerate() {
        let target = first + step * slot as f64;
        let delta = target - center_of(&shapes[idx]);
        let v = match axis {
            Distribution::Horizontal => Vec2::new(delta, 0.0),
            Distribution::Vertical => Vec2::new(0.0, delta),
        };
        shapes[idx].translate(v);
    }
    true
}

/// Union bounds of the selected shapes, for handle placement.
pub fn selection_bounds(shapes: &[Shape], selected: &[ShapeId]) -> Option<kurbo::Rect> {
    let members: Vec<Shape> = shapes
        .iter()
        .filter(|s| selected.contains(&s.id))
        .cloned()
        .collect();
    compute_bounds(&members)
}
