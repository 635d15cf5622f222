//! The scene tree and its mutation operations.
//!
//! Every operation locates its target by id anywhere in the nesting and
//! returns `bool`/`Option` instead of failing: a stale id is a silent no-op.

use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::compute_bounds;
use crate::shapes::{SerializableColor, Shape, ShapeId, ShapeKind};

/// Padding added around the union of member bounds when grouping.
pub const GROUP_PADDING: f64 = 10.0;

/// Z-order moves within a sibling list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderAction {
    BringToFront,
    SendToBack,
    BringForward,
    SendBackward,
}

/// Drop position for [`SceneTree::move_relative`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativePosition {
    Before,
    After,
    /// Append as the last child; only valid when the target is a container.
    Inside,
}

/// Partial update applied to a shape in place. `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapePatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub x2: Option<f64>,
    pub y2: Option<f64>,
    pub fill: Option<SerializableColor>,
    pub stroke: Option<Option<SerializableColor>>,
    pub stroke_width: Option<f64>,
    pub opacity: Option<f64>,
    pub visible: Option<bool>,
    pub corner_radius: Option<f64>,
    pub text: Option<String>,
    pub font_size: Option<f64>,
    pub aspect_ratio_locked: Option<bool>,
}

impl ShapePatch {
    fn apply(&self, shape: &mut Shape) {
        if let Some(x) = self.x {
            shape.x = x;
        }
        if let Some(y) = self.y {
            shape.y = y;
        }
        if let Some(width) = self.width {
            shape.width = width.max(0.0);
        }
        if let Some(height) = self.height {
            shape.height = height.max(0.0);
        }
        if let Some(rotation) = self.rotation {
            shape.rotation = rotation;
        }
        if let Some(fill) = self.fill {
            shape.style.fill = fill;
        }
        if let Some(stroke) = self.stroke {
            shape.style.stroke = stroke;
        }
        if let Some(stroke_width) = self.stroke_width {
            shape.style.stroke_width = stroke_width;
        }
        if let Some(opacity) = self.opacity {
            shape.style.opacity = opacity;
        }
        if let Some(visible) = self.visible {
            shape.style.visible = visible;
        }
        if let Some(locked) = self.aspect_ratio_locked {
            shape.aspect_ratio_locked = locked;
        }
        match &mut shape.kind {
            ShapeKind::Line { x2, y2 } => {
                if let Some(v) = self.x2 {
                    *x2 = v;
                }
                if let Some(v) = self.y2 {
                    *y2 = v;
                }
            }
            ShapeKind::Rectangle { corner_radius } => {
                if let Some(v) = self.corner_radius {
                    *corner_radius = v.max(0.0);
                }
            }
            ShapeKind::Text(text) => {
                if let Some(content) = &self.text {
                    text.content = content.clone();
                }
                if let Some(size) = self.font_size {
                    text.font_size = size;
                }
            }
            _ => {}
        }
    }
}

/// Errors from decoding a serialized document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to decode document: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Root of the scene. Holds the top-level shapes in z-order (later = on top).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneTree {
    pub shapes: Vec<Shape>,
}

impl SceneTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a shape at the top of the root z-order and return its id.
    pub fn add(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id;
        self.shapes.push(shape);
        id
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Find a shape anywhere in the tree.
    pub fn find(&self, id: ShapeId) -> Option<&Shape> {
        find_in(&self.shapes, id)
    }

    pub fn find_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        find_in_mut(&mut self.shapes, id)
    }

    /// Apply a patch to the shape with `id`. Returns whether a shape changed.
    pub fn update(&mut self, id: ShapeId, patch: &ShapePatch) -> bool {
        match self.find_mut(id) {
            Some(shape) => {
                patch.apply(shape);
                true
            }
            None => false,
        }
    }

    /// Run a closure against the shape with `id`.
    pub fn update_with(&mut self, id: ShapeId, f: impl FnOnce(&mut Shape)) -> bool {
        match self.find_mut(id) {
            Some(shape) => {
                f(shape);
                true
            }
            None => false,
        }
    }

    /// Detach and return the shape with `id` from wherever it lives.
    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        remove_in(&mut self.shapes, id)
    }

    /// Move a shape within its current sibling list. Front/back moves clamp at
    /// the list boundaries.
    pub fn reorder(&mut self, id: ShapeId, action: ReorderAction) -> bool {
        reorder_in(&mut self.shapes, id, action)
    }

    /// Move a root-level shape into an artboard, converting its position to
    /// the artboard's local frame. `None` target or a non-root shape is a
    /// no-op; nesting is a single level deep by construction.
    pub fn reparent_to_artboard(&mut self, id: ShapeId, target: Option<ShapeId>) -> bool {
        let Some(target_id) = target else {
            return false;
        };
        let at_root = self.shapes.iter().any(|s| s.id == id);
        if !at_root || id == target_id {
            return false;
        }
        let Some(target_shape) = self.find(target_id) else {
            return false;
        };
        if !matches!(target_shape.kind, ShapeKind::Artboard { .. }) {
            return false;
        }
        let origin = Vec2::new(target_shape.x, target_shape.y);

        let Some(pos) = self.shapes.iter().position(|s| s.id == id) else {
            return false;
        };
        let mut shape = self.shapes.remove(pos);
        shape.translate(-origin);

        match self.find_mut(target_id).and_then(|t| t.children_mut()) {
            Some(children) => {
                children.push(shape);
                true
            }
            None => {
                // Unreachable given the artboard check above; restore rather
                // than lose the shape.
                shape.translate(origin);
                self.shapes.insert(pos, shape);
                false
            }
        }
    }

    /// Detach `drag_id` and re-insert it relative to `target_id`, possibly
    /// under a different parent. No coordinate conversion is performed.
    /// No-ops: same id, target inside the dragged subtree, unknown ids, or
    /// `Inside` on a non-container.
    pub fn move_relative(
        &mut self,
        drag_id: ShapeId,
        target_id: ShapeId,
        position: RelativePosition,
    ) -> bool {
        if drag_id == target_id {
            return false;
        }
        match self.find(drag_id) {
            Some(dragged) if dragged.contains_id(target_id) => return false,
            Some(_) => {}
            None => return false,
        }
        match self.find(target_id) {
            Some(target) => {
                if position == RelativePosition::Inside && !target.is_container() {
                    return false;
                }
            }
            None => return false,
        }

        let Some(shape) = remove_in(&mut self.shapes, drag_id) else {
            return false;
        };
        match insert_relative(&mut self.shapes, target_id, position, shape) {
            Ok(()) => true,
            Err(shape) => {
                // Target vanished between the check and the splice; keep the
                // shape in the document.
                debug_assert!(false, "move_relative target disappeared");
                self.shapes.push(shape);
                false
            }
        }
    }

    /// Group root-level shapes into a new group node. Members keep their
    /// world positions; their stored coordinates become relative to the group
    /// origin and the group box pads the union bounds by [`GROUP_PADDING`].
    /// Needs at least two root-level members.
    pub fn group(&mut self, ids: &[ShapeId]) -> Option<ShapeId> {
        let indices: Vec<usize> = self
            .shapes
            .iter()
            .enumerate()
            .filter(|(_, s)| ids.contains(&s.id))
            .map(|(i, _)| i)
            .collect();
        if indices.len() < 2 {
            return None;
        }

        // Extract in z-order, back to front so indices stay valid.
        let mut members = Vec::with_capacity(indices.len());
        for i in indices.into_iter().rev() {
            members.push(self.shapes.remove(i));
        }
        members.reverse();

        let bounds = compute_bounds(&members)?;
        let gx = bounds.x0 - GROUP_PADDING;
        let gy = bounds.y0 - GROUP_PADDING;
        for member in &mut members {
            member.translate(Vec2::new(-gx, -gy));
        }

        let group = Shape::group(
            members,
            gx,
            gy,
            bounds.width() + GROUP_PADDING * 2.0,
            bounds.height() + GROUP_PADDING * 2.0,
        );
        log::debug!("grouped {} shapes into {}", ids.len(), group.id);
        Some(self.add(group))
    }

    /// Dissolve a group, splicing its children back at the group's z-position
    /// with their coordinates converted to the parent frame. Returns the
    /// freed child ids.
    pub fn ungroup(&mut self, group_id: ShapeId) -> Option<Vec<ShapeId>> {
        ungroup_in(&mut self.shapes, group_id)
    }

    /// All ids in the tree, depth-first.
    pub fn ids(&self) -> Vec<ShapeId> {
        let mut out = Vec::new();
        for shape in &self.shapes {
            shape.collect_ids(&mut out);
        }
        out
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }
}

fn find_in(shapes: &[Shape], id: ShapeId) -> Option<&Shape> {
    for shape in shapes {
        if shape.id == id {
            return Some(shape);
        }
        if let Some(children) = shape.children() {
            if let Some(found) = find_in(children, id) {
                return Some(found);
            }
        }
    }
    None
}

fn find_in_mut(shapes: &mut [Shape], id: ShapeId) -> Option<&mut Shape> {
    for shape in shapes {
        if shape.id == id {
            return Some(shape);
        }
        if let Some(children) = shape.children_mut() {
            if let Some(found) = find_in_mut(children, id) {
                return Some(found);
            }
        }
    }
    None
}

fn remove_in(shapes: &mut Vec<Shape>, id: ShapeId) -> Option<Shape> {
    if let Some(pos) = shapes.iter().position(|s| s.id == id) {
        return Some(shapes.remove(pos));
    }
    for shape in shapes {
        if let Some(children) = shape.children_mut() {
            if let Some(removed) = remove_in(children, id) {
                return Some(removed);
            }
        }
    }
    None
}

fn reorder_in(shapes: &mut Vec<Shape>, id: ShapeId, action: ReorderAction) -> bool {
    if let Some(pos) = shapes.iter().position(|s| s.id == id) {
        let last = shapes.len() - 1;
        let dest = match action {
            ReorderAction::BringToFront => last,
            ReorderAction::SendToBack => 0,
            ReorderAction::BringForward => (pos + 1).min(last),
            ReorderAction::SendBackward => pos.saturating_sub(1),
        };
        if dest != pos {
            let shape = shapes.remove(pos);
            shapes.insert(dest, shape);
        }
        return true;
    }
    for shape in shapes {
        if let Some(children) = shape.children_mut() {
            if reorder_in(children, id, action) {
                return true;
            }
        }
    }
    false
}

// Returns the shape back on failure so the caller never loses it.
fn insert_relative(
    shapes: &mut Vec<Shape>,
    target_id: ShapeId,
    position: RelativePosition,
    inserted: Shape,
) -> Result<(), Shape> {
    if let Some(pos) = shapes.iter().position(|s| s.id == target_id) {
        match position {
            RelativePosition::Before => shapes.insert(pos, inserted),
            RelativePosition::After => shapes.insert(pos + 1, inserted),
            RelativePosition::Inside => match shapes[pos].children_mut() {
                Some(children) => children.push(inserted),
                None => return Err(inserted),
            },
        }
        return Ok(());
    }
    let mut carried = inserted;
    for shape in shapes {
        if let Some(children) = shape.children_mut() {
            match insert_relative(children, target_id, position, carried) {
                Ok(()) => return Ok(()),
                Err(back) => carried = back,
            }
        }
    }
    Err(carried)
}

fn ungroup_in(shapes: &mut Vec<Shape>, group_id: ShapeId) -> Option<Vec<ShapeId>> {
    if let Some(pos) = shapes.iter().position(|s| s.id == group_id) {
        if !matches!(shapes[pos].kind, ShapeKind::Group { .. }) {
            return None;
        }
        let group = shapes.remove(pos);
        let origin = Vec2::new(group.x, group.y);
        let children = match group.kind {
            ShapeKind::Group { children } => children,
            _ => return None,
        };
        let mut freed = Vec::with_capacity(children.len());
        for (offset, mut child) in children.into_iter().enumerate() {
            child.translate(origin);
            freed.push(child.id);
            shapes.insert(pos + offset, child);
        }
        log::debug!("ungrouped {} into {} shapes", group_id, freed.len());
        return Some(freed);
    }
    for shape in shapes {
        if let Some(children) = shape.children_mut() {
            if let Some(freed) = ungroup_in(children, group_id) {
                return Some(freed);
            }
        }
    }
    None
}
