//! Selection set and marquee hit-testing.

use kurbo::{Point, Rect};

use crate::shapes::{Shape, ShapeId};

/// Ordered set of selected shape ids. Order is insertion order; membership is
/// unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    ids: Vec<ShapeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[ShapeId] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.ids.contains(&id)
    }

    /// Single selected id, if exactly one shape is selected.
    pub fn single(&self) -> Option<ShapeId> {
        match self.ids.as_slice() {
            [id] => Some(*id),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn set(&mut self, ids: Vec<ShapeId>) {
        self.ids.clear();
        for id in ids {
            self.insert(id);
        }
    }

    pub fn insert(&mut self, id: ShapeId) {
        if !self.contains(id) {
            self.ids.push(id);
        }
    }

    pub fn remove(&mut self, id: ShapeId) {
        self.ids.retain(|&other| other != id);
    }

    pub fn toggle(&mut self, id: ShapeId) {
        if self.contains(id) {
            self.remove(id);
        } else {
            self.ids.push(id);
        }
    }

    /// Click semantics. Additive clicks toggle membership; plain clicks
    /// replace the selection, except that clicking a shape already in a
    /// multi-selection keeps the whole selection so it can be dragged
    /// together.
    pub fn click(&mut self, id: ShapeId, additive: bool) {
        if additive {
            self.toggle(id);
        } else if !self.contains(id) {
            self.ids.clear();
            self.ids.push(id);
        }
    }

    /// Add ids, skipping any already present.
    pub fn extend_unique(&mut self, ids: impl IntoIterator<Item = ShapeId>) {
        for id in ids {
            self.insert(id);
        }
    }
}

/// An in-progress marquee drag in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marquee {
    pub start: Point,
    pub current: Point,
}

impl Marquee {
    pub fn new(start: Point) -> Self {
        Self { start, current: start }
    }

    /// Normalized rectangle regardless of drag direction.
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.start.x.min(self.current.x),
            self.start.y.min(self.current.y),
            self.start.x.max(self.current.x),
            self.start.y.max(self.current.y),
        )
    }
}

/// Ids of visible root shapes whose bounding box overlaps `rect`. Children of
/// containers are not hit individually; the marquee selects whole top-level
/// nodes.
pub fn marquee_hits(shapes: &[Shape], rect: Rect) -> Vec<ShapeId> {
    shapes
        .iter()
        .filter(|s| s.style.visible && s.intersects_rect(rect))
        .map(|s| s.id)
        .collect()
}
