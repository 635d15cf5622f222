//! The editor facade: owns the document, selection, history, camera, and the
//! in-flight gesture, and exposes the mutation API the host drives with
//! pointer and keyboard events.
//!
//! Pointer positions are world coordinates; the host converts from screen
//! space through [`Camera`] first. One history snapshot is taken per gesture,
//! at the point the mutation becomes certain.

use std::collections::HashMap;

use kurbo::{Point, Vec2};

use crate::align::{self, Alignment, Distribution};
use crate::camera::Camera;
use crate::geometry::{anchored_resize, ResizeHandle};
use crate::history::History;
use crate::interaction::{
    HandleKind, InteractionState, Modifiers, Shortcut, Tool, ROTATION_HANDLE_BIAS,
    ROTATION_SNAP_DEG,
};
use crate::selection::{marquee_hits, Marquee, Selection};
use crate::shapes::{Shape, ShapeId, ShapeKind};
use crate::snap::GridSnap;
use crate::template::{Template, TemplateError};
use crate::tree::{RelativePosition, ReorderAction, SceneTree, ShapePatch};

/// Offset applied to pasted and duplicated shapes.
pub const PASTE_OFFSET: f64 = 20.0;

/// Shapes drawn smaller than this in both extents are discarded at commit.
pub const MIN_COMMIT_SIZE: f64 = 2.0;

/// Default box for click-placed text shapes.
const TEXT_DEFAULT_WIDTH: f64 = 100.0;
const TEXT_DEFAULT_HEIGHT: f64 = 30.0;

#[derive(Debug, Default)]
pub struct Editor {
    pub tree: SceneTree,
    pub selection: Selection,
    pub history: History,
    pub camera: Camera,
    pub grid: GridSnap,
    pub tool: Tool,
    pub state: InteractionState,
    pub templates: Vec<Template>,
    clipboard: Vec<Shape>,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- low-level mutations ----

    /// Record the current tree for undo. High-level operations call this
    /// themselves; hosts use it when batching raw updates.
    pub fn snapshot(&mut self) {
        self.history.snapshot(&self.tree.shapes);
    }

    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        self.tree.add(shape)
    }

    pub fn update_shape(&mut self, id: ShapeId, patch: &ShapePatch) -> bool {
        self.tree.update(id, patch)
    }

    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        self.selection.remove(id);
        self.tree.remove(id)
    }

    pub fn reorder_shape(&mut self, id: ShapeId, action: ReorderAction) -> bool {
        self.snapshot();
        let changed = self.tree.reorder(id, action);
        if !changed {
            self.history.discard_snapshot();
        }
        changed
    }

    // ---- history ----

    pub fn undo(&mut self) -> bool {
        let done = self.history.undo(&mut self.tree.shapes);
        if done {
            self.prune_selection();
        }
        done
    }

    pub fn redo(&mut self) -> bool {
        let done = self.history.redo(&mut self.tree.shapes);
        if done {
            self.prune_selection();
        }
        done
    }

    /// Drop selected ids that no longer exist after a history jump.
    fn prune_selection(&mut self) {
        let live = self.tree.ids();
        let kept: Vec<ShapeId> = self
            .selection
            .ids()
            .iter()
            .copied()
            .filter(|id| live.contains(id))
            .collect();
        self.selection.set(kept);
    }

    // ---- clipboard ----

    pub fn copy_selection(&mut self) {
        self.clipboard = self
            .selection
            .ids()
            .iter()
            .filter_map(|&id| self.tree.find(id).cloned())
            .collect();
    }

    pub fn cut_selected(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.copy_selection();
        self.delete_selected();
    }

    /// Insert clipboard contents offset by (+20, +20) from the stored
    /// coordinates with fresh ids, and select the pasted shapes. The
    /// clipboard is left untouched, so repeated pastes land at the same
    /// offset from the source.
    pub fn paste(&mut self) {
        if self.clipboard.is_empty() {
            return;
        }
        self.snapshot();
        let mut pasted_ids = Vec::with_capacity(self.clipboard.len());
        for source in &self.clipboard {
            let mut clone = source.clone();
            clone.translate(Vec2::new(PASTE_OFFSET, PASTE_OFFSET));
            clone.regenerate_ids();
            pasted_ids.push(clone.id);
            self.tree.add(clone);
        }
        self.selection.set(pasted_ids);
        log::debug!("pasted {} shapes", self.selection.len());
    }

    pub fn duplicate_selected(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.copy_selection();
        self.paste();
    }

    // ---- selection-scoped operations ----

    pub fn delete_selected(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.snapshot();
        let ids: Vec<ShapeId> = self.selection.ids().to_vec();
        for id in ids {
            self.tree.remove(id);
        }
        self.selection.clear();
    }

    pub fn group_selected(&mut self) -> Option<ShapeId> {
        if self.selection.len() < 2 {
            return None;
        }
        self.snapshot();
        let ids: Vec<ShapeId> = self.selection.ids().to_vec();
        match self.tree.group(&ids) {
            Some(group_id) => {
                self.selection.set(vec![group_id]);
                Some(group_id)
            }
            None => {
                self.history.discard_snapshot();
                None
            }
        }
    }

    /// Dissolve every group in the selection. Non-group members stay
    /// selected; freed children join the selection in their place.
    pub fn ungroup_selected(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.snapshot();
        let ids: Vec<ShapeId> = self.selection.ids().to_vec();
        let mut next = Vec::with_capacity(ids.len());
        let mut dissolved = false;
        for id in ids {
            match self.tree.ungroup(id) {
                Some(freed) => {
                    dissolved = true;
                    next.extend(freed);
                }
                None => next.push(id),
            }
        }
        if dissolved {
            self.selection.set(next);
        } else {
            self.history.discard_snapshot();
        }
    }

    pub fn align_selected(&mut self, alignment: Alignment) -> bool {
        self.snapshot();
        let moved = align::align(&mut self.tree.shapes, self.selection.ids(), alignment);
        if !moved {
            self.history.discard_snapshot();
        }
        moved
    }

    pub fn distribute_selected(&mut self, axis: Distribution) -> bool {
        self.snapshot();
        let moved = align::distribute(&mut self.tree.shapes, self.selection.ids(), axis);
        if !moved {
            self.history.discard_snapshot();
        }
        moved
    }

    pub fn toggle_visibility(&mut self, id: ShapeId) -> bool {
        self.snapshot();
        let changed = self
            .tree
            .update_with(id, |shape| shape.style.visible = !shape.style.visible);
        if !changed {
            self.history.discard_snapshot();
        }
        changed
    }

    pub fn move_to_artboard(&mut self, id: ShapeId, artboard: Option<ShapeId>) -> bool {
        self.snapshot();
        let moved = self.tree.reparent_to_artboard(id, artboard);
        if !moved {
            self.history.discard_snapshot();
        }
        moved
    }

    /// Layer-panel drag: reposition a shape relative to another node.
    pub fn move_layer(
        &mut self,
        drag_id: ShapeId,
        target_id: ShapeId,
        position: RelativePosition,
    ) -> bool {
        self.snapshot();
        let moved = self.tree.move_relative(drag_id, target_id, position);
        if !moved {
            self.history.discard_snapshot();
        }
        moved
    }

    // ---- templates ----

    /// Capture an artboard as a template and return the new template id.
    pub fn save_template(
        &mut self,
        name: impl Into<String>,
        artboard_id: ShapeId,
    ) -> Result<uuid::Uuid, TemplateError> {
        let artboard = self
            .tree
            .find(artboard_id)
            .ok_or(TemplateError::NotFound(artboard_id))?;
        let template = Template::from_artboard(name, artboard)?;
        let template_id = template.id;
        self.templates.push(template);
        Ok(template_id)
    }

    /// Instantiate a stored template into the document and select the new
    /// roots.
    pub fn apply_template(&mut self, template_id: uuid::Uuid) -> bool {
        let Some(template) = self.templates.iter().find(|t| t.id == template_id) else {
            return false;
        };
        let shapes = template.instantiate();
        self.snapshot();
        let ids: Vec<ShapeId> = shapes.iter().map(|s| s.id).collect();
        for shape in shapes {
            self.tree.add(shape);
        }
        self.selection.set(ids);
        true
    }

    // ---- pointer lifecycle ----

    /// Pointer-down on empty canvas.
    pub fn pointer_down(&mut self, pos: Point, modifiers: Modifiers) {
        match self.tool {
            Tool::Select => {
                self.state = InteractionState::MarqueeSelecting {
                    start: pos,
                    current: pos,
                    additive: modifiers.shift,
                };
            }
            Tool::Text => {
                // Text places on click instead of dragging out a box.
                self.snapshot();
                let p = self.grid.point(pos);
                let text = Shape::text("Text", p.x, p.y, TEXT_DEFAULT_WIDTH, TEXT_DEFAULT_HEIGHT);
                let id = self.tree.add(text);
                self.selection.set(vec![id]);
                self.tool = Tool::Select;
                self.state = InteractionState::EditingTextInline { id };
            }
            tool => {
                let p = self.grid.point(pos);
                let provisional = match tool {
                    Tool::Rectangle => Shape::rectangle(p.x, p.y, 0.0, 0.0),
                    Tool::Ellipse => Shape::ellipse(p.x, p.y, 0.0, 0.0),
                    Tool::Line => Shape::line(p, p),
                    Tool::Artboard => Shape::artboard(p.x, p.y, 0.0, 0.0),
                    Tool::Select | Tool::Text => return,
                };
                self.state = InteractionState::DrawingNewShape {
                    start: p,
                    provisional,
                };
            }
        }
    }

    /// Pointer-down on a shape body (select tool). A shift-click that
    /// toggles the shape out still drags whatever remains selected.
    pub fn pointer_down_on_shape(&mut self, id: ShapeId, pos: Point, modifiers: Modifiers) {
        self.selection.click(id, modifiers.shift);
        if self.selection.is_empty() {
            self.state = InteractionState::Idle;
            return;
        }
        self.snapshot();
        let initial: HashMap<ShapeId, Shape> = self
            .selection
            .ids()
            .iter()
            .filter_map(|&sel| self.tree.find(sel).map(|s| (sel, s.clone())))
            .collect();
        self.state = InteractionState::DraggingSelection { start: pos, initial };
    }

    /// Pointer-down on a selection handle.
    pub fn pointer_down_on_handle(&mut self, id: ShapeId, handle: HandleKind, pos: Point) {
        let Some(shape) = self.tree.find(id).cloned() else {
            return;
        };
        self.snapshot();
        self.state = match handle {
            HandleKind::Resize(handle) => InteractionState::ResizingHandle {
                id,
                handle,
                start: pos,
                initial: shape,
            },
            HandleKind::Rotate => InteractionState::RotatingHandle { id, initial: shape },
        };
    }

    pub fn pointer_move(&mut self, pos: Point, modifiers: Modifiers) {
        match &mut self.state {
            InteractionState::Idle | InteractionState::EditingTextInline { .. } => {}
            InteractionState::MarqueeSelecting { current, .. } => {
                *current = pos;
            }
            InteractionState::DraggingSelection { start, initial } => {
                let delta = pos - *start;
                let moves: Vec<(ShapeId, Shape)> =
                    initial.iter().map(|(id, s)| (*id, s.clone())).collect();
                let grid = self.grid;
                for (id, origin) in moves {
                    self.tree.update_with(id, |shape| {
                        // Snap the leading point and translate rigidly so
                        // line geometry is preserved.
                        let raw = Point::new(origin.x + delta.x, origin.y + delta.y);
                        let snapped = grid.point(raw);
                        *shape = origin.clone();
                        shape.translate(
                            Vec2::new(snapped.x - origin.x, snapped.y - origin.y),
                        );
                    });
                }
            }
            InteractionState::ResizingHandle {
                id,
                handle,
                start,
                initial,
            } => {
                let (id, handle, start, initial) = (*id, *handle, *start, initial.clone());
                let delta = pos - start;
                if handle.is_line_handle() {
                    self.move_line_endpoint(id, handle, &initial, delta);
                } else {
                    let locked = initial.aspect_ratio_locked || modifiers.shift;
                    let out = anchored_resize(
                        initial.bounds(),
                        handle,
                        initial.rotation,
                        delta,
                        locked,
                    );
                    self.tree.update_with(id, |shape| {
                        shape.x = out.x0;
                        shape.y = out.y0;
                        shape.width = out.width();
                        shape.height = out.height();
                    });
                }
            }
            InteractionState::RotatingHandle { id, initial } => {
                let (id, center) = (*id, initial.center());
                let mut angle = (pos.y - center.y).atan2(pos.x - center.x).to_degrees()
                    + ROTATION_HANDLE_BIAS;
                if modifiers.shift {
                    angle = (angle / ROTATION_SNAP_DEG).round() * ROTATION_SNAP_DEG;
                }
                self.tree.update_with(id, |shape| shape.rotation = angle);
            }
            InteractionState::DrawingNewShape { start, provisional } => {
                let p = self.grid.point(pos);
                match &mut provisional.kind {
                    ShapeKind::Line { x2, y2 } => {
                        *x2 = p.x;
                        *y2 = p.y;
                        provisional.width = (p.x - start.x).abs();
                        provisional.height = (p.y - start.y).abs();
                    }
                    _ => {
                        // Keep the origin at the gesture start; negative
                        // extents are normalized at commit.
                        provisional.width = p.x - start.x;
                        provisional.height = p.y - start.y;
                    }
                }
            }
        }
    }

    /// Ends the current gesture. Draw gestures commit here; drags settle
    /// artboard membership here.
    pub fn pointer_up(&mut self, _pos: Point) {
        let state = std::mem::take(&mut self.state);
        match state {
            InteractionState::Idle => {}
            InteractionState::EditingTextInline { id } => {
                // Text editing survives pointer-up; only an explicit commit
                // or escape ends it.
                self.state = InteractionState::EditingTextInline { id };
            }
            InteractionState::MarqueeSelecting {
                start,
                current,
                additive,
            } => {
                let marquee = Marquee { start, current };
                let hits = marquee_hits(&self.tree.shapes, marquee.rect());
                if additive {
                    self.selection.extend_unique(hits);
                } else {
                    self.selection.set(hits);
                }
            }
            InteractionState::DraggingSelection { initial, .. } => {
                let ids: Vec<ShapeId> = initial.keys().copied().collect();
                self.settle_artboard_membership(&ids);
            }
            InteractionState::ResizingHandle { .. } | InteractionState::RotatingHandle { .. } => {}
            InteractionState::DrawingNewShape { provisional, .. } => {
                self.commit_drawn_shape(provisional);
            }
        }
    }

    /// A single root shape dropped fully inside an artboard becomes its
    /// child. Multi-selections and artboards themselves stay at root.
    fn settle_artboard_membership(&mut self, ids: &[ShapeId]) {
        let [id] = ids else {
            return;
        };
        let id = *id;
        let Some(shape) = self.tree.shapes.iter().find(|s| s.id == id) else {
            return;
        };
        if matches!(shape.kind, ShapeKind::Artboard { .. }) {
            return;
        }
        let b = shape.bounds();
        let target = self
            .tree
            .shapes
            .iter()
            .filter(|s| s.id != id && matches!(s.kind, ShapeKind::Artboard { .. }))
            .find(|s| {
                let ab = s.bounds();
                b.x0 >= ab.x0 && b.x1 <= ab.x1 && b.y0 >= ab.y0 && b.y1 <= ab.y1
            })
            .map(|s| s.id);
        if target.is_some() {
            self.tree.reparent_to_artboard(id, target);
        }
    }

    fn commit_drawn_shape(&mut self, mut shape: Shape) {
        match shape.kind {
            ShapeKind::Line { x2, y2 } => {
                let len = ((x2 - shape.x).powi(2) + (y2 - shape.y).powi(2)).sqrt();
                if len <= MIN_COMMIT_SIZE {
                    return;
                }
            }
            _ => {
                // Normalize a drag toward the upper-left into a positive box.
                if shape.width < 0.0 {
                    shape.x += shape.width;
                    shape.width = -shape.width;
                }
                if shape.height < 0.0 {
                    shape.y += shape.height;
                    shape.height = -shape.height;
                }
                // Both extents must clear the minimum; a flat drag would
                // otherwise commit a degenerate box.
                if shape.width <= MIN_COMMIT_SIZE || shape.height <= MIN_COMMIT_SIZE {
                    return;
                }
            }
        }
        self.snapshot();
        let id = self.tree.add(shape);
        self.selection.set(vec![id]);
        self.tool = Tool::Select;
        log::debug!("committed drawn shape {id}");
    }

    fn move_line_endpoint(
        &mut self,
        id: ShapeId,
        handle: ResizeHandle,
        initial: &Shape,
        delta: Vec2,
    ) {
        let ShapeKind::Line { x2: ix2, y2: iy2 } = initial.kind else {
            return;
        };
        let (start, end) = match handle {
            ResizeHandle::Start => (
                self.grid
                    .point(Point::new(initial.x + delta.x, initial.y + delta.y)),
                Point::new(ix2, iy2),
            ),
            ResizeHandle::End => (
                Point::new(initial.x, initial.y),
                self.grid.point(Point::new(ix2 + delta.x, iy2 + delta.y)),
            ),
            _ => return,
        };
        self.tree.update_with(id, |shape| {
            shape.x = start.x;
            shape.y = start.y;
            shape.width = (end.x - start.x).abs();
            shape.height = (end.y - start.y).abs();
            if let ShapeKind::Line { x2, y2 } = &mut shape.kind {
                *x2 = end.x;
                *y2 = end.y;
            }
        });
    }

    // ---- text editing ----

    /// Double-click on a text shape starts inline editing.
    pub fn begin_text_edit(&mut self, id: ShapeId) -> bool {
        match self.tree.find(id) {
            Some(shape) if matches!(shape.kind, ShapeKind::Text(_)) => {
                self.state = InteractionState::EditingTextInline { id };
                true
            }
            _ => false,
        }
    }

    pub fn commit_text_edit(&mut self, content: &str) {
        let InteractionState::EditingTextInline { id } = &self.state else {
            return;
        };
        let id = *id;
        self.snapshot();
        self.tree.update_with(id, |shape| {
            if let ShapeKind::Text(text) = &mut shape.kind {
                text.content = content.to_string();
            }
        });
        self.state = InteractionState::Idle;
    }

    pub fn cancel_text_edit(&mut self) {
        if matches!(self.state, InteractionState::EditingTextInline { .. }) {
            self.state = InteractionState::Idle;
        }
    }

    // ---- keyboard ----

    /// Dispatch an editing shortcut. Suppressed while editing text so typing
    /// never deletes shapes.
    pub fn apply_shortcut(&mut self, shortcut: Shortcut) {
        if matches!(self.state, InteractionState::EditingTextInline { .. }) {
            return;
        }
        match shortcut {
            Shortcut::Delete => self.delete_selected(),
            Shortcut::Undo => {
                self.undo();
            }
            Shortcut::Redo => {
                self.redo();
            }
            Shortcut::Copy => self.copy_selection(),
            Shortcut::Cut => self.cut_selected(),
            Shortcut::Paste => self.paste(),
            Shortcut::Duplicate => self.duplicate_selected(),
            Shortcut::Group => {
                self.group_selected();
            }
            Shortcut::Ungroup => self.ungroup_selected(),
            Shortcut::ToggleGridSnap => self.grid.toggle(),
        }
    }

    // ---- export ----

    /// The shape list for export, only when no gesture is in flight so the
    /// output never captures a half-applied transform.
    pub fn export_input(&self) -> Option<&[Shape]> {
        if self.state.is_idle() {
            Some(&self.tree.shapes)
        } else {
            None
        }
    }

    pub fn export_svg(&self) -> Option<String> {
        self.export_input().map(crate::export::to_svg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn editor_with(shapes: Vec<Shape>) -> Editor {
        let mut editor = Editor::new();
        for shape in shapes {
            editor.add_shape(shape);
        }
        editor
    }

    #[test]
    fn test_draw_then_resize_scenario() {
        let mut editor = Editor::new();
        editor.tool = Tool::Rectangle;

        editor.pointer_down(Point::new(40.0, 40.0), Modifiers::default());
        editor.pointer_move(Point::new(140.0, 100.0), Modifiers::default());
        assert!(editor.export_input().is_none());
        editor.pointer_up(Point::new(140.0, 100.0));

        assert_eq!(editor.tool, Tool::Select);
        let id = editor.selection.single().unwrap();
        let shape = editor.tree.find(id).unwrap();
        assert!((shape.x - 40.0).abs() < EPS);
        assert!((shape.width - 100.0).abs() < EPS);
        assert!((shape.height - 60.0).abs() < EPS);

        // Grab the east handle and widen by 20.
        editor.pointer_down_on_handle(
            id,
            HandleKind::Resize(ResizeHandle::East),
            Point::new(140.0, 70.0),
        );
        editor.pointer_move(Point::new(160.0, 70.0), Modifiers::default());
        editor.pointer_up(Point::new(160.0, 70.0));

        let shape = editor.tree.find(id).unwrap();
        assert!((shape.width - 120.0).abs() < EPS);
        assert!((shape.x - 40.0).abs() < EPS);

        // One undo step per gesture.
        assert!(editor.undo());
        assert!((editor.tree.find(id).unwrap().width - 100.0).abs() < EPS);
        assert!(editor.undo());
        assert!(editor.tree.find(id).is_none());
    }

    #[test]
    fn test_tiny_draw_discarded() {
        let mut editor = Editor::new();
        editor.grid.enabled = false;
        editor.tool = Tool::Ellipse;
        editor.pointer_down(Point::new(10.0, 10.0), Modifiers::default());
        editor.pointer_move(Point::new(11.0, 11.0), Modifiers::default());
        editor.pointer_up(Point::new(11.0, 11.0));
        assert!(editor.tree.is_empty());
        assert!(!editor.history.can_undo());
    }

    #[test]
    fn test_flat_draw_discarded() {
        let mut editor = Editor::new();
        editor.grid.enabled = false;
        editor.tool = Tool::Rectangle;
        editor.pointer_down(Point::new(0.0, 0.0), Modifiers::default());
        editor.pointer_move(Point::new(100.0, 0.0), Modifiers::default());
        editor.pointer_up(Point::new(100.0, 0.0));
        assert!(editor.tree.is_empty());
        assert!(!editor.history.can_undo());
    }

    #[test]
    fn test_draw_upward_drag_normalized() {
        let mut editor = Editor::new();
        editor.grid.enabled = false;
        editor.tool = Tool::Rectangle;
        editor.pointer_down(Point::new(100.0, 100.0), Modifiers::default());
        editor.pointer_move(Point::new(40.0, 60.0), Modifiers::default());
        editor.pointer_up(Point::new(40.0, 60.0));

        let id = editor.selection.single().unwrap();
        let shape = editor.tree.find(id).unwrap();
        assert!((shape.x - 40.0).abs() < EPS);
        assert!((shape.y - 60.0).abs() < EPS);
        assert!((shape.width - 60.0).abs() < EPS);
        assert!((shape.height - 40.0).abs() < EPS);
    }

    #[test]
    fn test_marquee_selects_overlapping() {
        let a = Shape::rectangle(10.0, 10.0, 20.0, 20.0);
        let b = Shape::rectangle(200.0, 200.0, 20.0, 20.0);
        let (a_id, b_id) = (a.id, b.id);
        let mut editor = editor_with(vec![a, b]);

        editor.pointer_down(Point::new(0.0, 0.0), Modifiers::default());
        editor.pointer_move(Point::new(50.0, 50.0), Modifiers::default());
        editor.pointer_up(Point::new(50.0, 50.0));

        assert!(editor.selection.contains(a_id));
        assert!(!editor.selection.contains(b_id));
    }

    #[test]
    fn test_additive_marquee_extends() {
        let a = Shape::rectangle(10.0, 10.0, 20.0, 20.0);
        let b = Shape::rectangle(200.0, 200.0, 20.0, 20.0);
        let (a_id, b_id) = (a.id, b.id);
        let mut editor = editor_with(vec![a, b]);
        editor.selection.set(vec![b_id]);

        let shift = Modifiers { shift: true, ..Modifiers::default() };
        editor.pointer_down(Point::new(0.0, 0.0), shift);
        editor.pointer_move(Point::new(50.0, 50.0), shift);
        editor.pointer_up(Point::new(50.0, 50.0));

        assert!(editor.selection.contains(a_id));
        assert!(editor.selection.contains(b_id));
    }

    #[test]
    fn test_drag_moves_selection_from_gesture_origin() {
        let rect = Shape::rectangle(0.0, 0.0, 40.0, 40.0);
        let id = rect.id;
        let mut editor = editor_with(vec![rect]);
        editor.grid.enabled = false;

        editor.pointer_down_on_shape(id, Point::new(20.0, 20.0), Modifiers::default());
        editor.pointer_move(Point::new(50.0, 30.0), Modifiers::default());
        // Movement is measured from the gesture start, not accumulated.
        editor.pointer_move(Point::new(25.0, 25.0), Modifiers::default());
        editor.pointer_up(Point::new(25.0, 25.0));

        let shape = editor.tree.find(id).unwrap();
        assert!((shape.x - 5.0).abs() < EPS);
        assert!((shape.y - 5.0).abs() < EPS);
    }

    #[test]
    fn test_drag_snaps_to_grid() {
        let rect = Shape::rectangle(0.0, 0.0, 40.0, 40.0);
        let id = rect.id;
        let mut editor = editor_with(vec![rect]);

        editor.pointer_down_on_shape(id, Point::new(20.0, 20.0), Modifiers::default());
        editor.pointer_move(Point::new(51.0, 32.0), Modifiers::default());
        editor.pointer_up(Point::new(51.0, 32.0));

        let shape = editor.tree.find(id).unwrap();
        assert!((shape.x - 40.0).abs() < EPS);
        assert!((shape.y - 20.0).abs() < EPS);
    }

    #[test]
    fn test_drag_into_artboard_reparents() {
        let artboard = Shape::artboard(100.0, 100.0, 200.0, 200.0);
        let rect = Shape::rectangle(0.0, 0.0, 20.0, 20.0);
        let (ab_id, rect_id) = (artboard.id, rect.id);
        let mut editor = editor_with(vec![artboard, rect]);
        editor.grid.enabled = false;

        editor.pointer_down_on_shape(rect_id, Point::new(10.0, 10.0), Modifiers::default());
        editor.pointer_move(Point::new(190.0, 190.0), Modifiers::default());
        editor.pointer_up(Point::new(190.0, 190.0));

        // Now a child of the artboard, in artboard-local coordinates.
        assert_eq!(editor.tree.shapes.len(), 1);
        let child = editor.tree.find(rect_id).unwrap();
        assert!((child.x - 80.0).abs() < EPS);
        assert!((child.y - 80.0).abs() < EPS);
        assert!(editor.tree.find(ab_id).unwrap().children().unwrap().len() == 1);
    }

    #[test]
    fn test_rotation_gesture_with_snap() {
        let rect = Shape::rectangle(0.0, 0.0, 100.0, 100.0);
        let id = rect.id;
        let mut editor = editor_with(vec![rect]);

        editor.pointer_down_on_handle(id, HandleKind::Rotate, Point::new(50.0, -20.0));
        // Pointer directly right of center: raw angle 0, biased to 90.
        editor.pointer_move(Point::new(150.0, 50.0), Modifiers::default());
        assert!((editor.tree.find(id).unwrap().rotation - 90.0).abs() < 1e-6);

        // Shift snaps to 15-degree steps.
        let shift = Modifiers { shift: true, ..Modifiers::default() };
        editor.pointer_move(Point::new(150.0, 57.0), shift);
        let rotation = editor.tree.find(id).unwrap().rotation;
        assert!((rotation / 15.0 - (rotation / 15.0).round()).abs() < 1e-9);
        editor.pointer_up(Point::new(150.0, 57.0));
    }

    #[test]
    fn test_line_endpoint_handle() {
        let line = Shape::line(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let id = line.id;
        let mut editor = editor_with(vec![line]);
        editor.grid.enabled = false;

        editor.pointer_down_on_handle(
            id,
            HandleKind::Resize(ResizeHandle::End),
            Point::new(100.0, 0.0),
        );
        editor.pointer_move(Point::new(130.0, 40.0), Modifiers::default());
        editor.pointer_up(Point::new(130.0, 40.0));

        let shape = editor.tree.find(id).unwrap();
        assert!((shape.x - 0.0).abs() < EPS);
        match shape.kind {
            ShapeKind::Line { x2, y2 } => {
                assert!((x2 - 130.0).abs() < EPS);
                assert!((y2 - 40.0).abs() < EPS);
            }
            _ => panic!("expected line"),
        }
        assert!((shape.width - 130.0).abs() < EPS);
        assert!((shape.height - 40.0).abs() < EPS);
    }

    #[test]
    fn test_copy_paste_offsets_and_reids() {
        let rect = Shape::rectangle(10.0, 10.0, 30.0, 30.0);
        let id = rect.id;
        let mut editor = editor_with(vec![rect]);
        editor.selection.set(vec![id]);

        editor.copy_selection();
        editor.paste();

        assert_eq!(editor.tree.shapes.len(), 2);
        let pasted_id = editor.selection.single().unwrap();
        assert_ne!(pasted_id, id);
        let pasted = editor.tree.find(pasted_id).unwrap();
        assert!((pasted.x - 30.0).abs() < EPS);
        assert!((pasted.y - 30.0).abs() < EPS);

        // Repeated paste lands at the same offset from the source.
        editor.paste();
        let second = editor.tree.find(editor.selection.single().unwrap()).unwrap();
        assert!((second.x - 30.0).abs() < EPS);
        assert!((second.y - 30.0).abs() < EPS);
    }

    #[test]
    fn test_duplicate_and_cut() {
        let rect = Shape::rectangle(0.0, 0.0, 10.0, 10.0);
        let id = rect.id;
        let mut editor = editor_with(vec![rect]);
        editor.selection.set(vec![id]);

        editor.apply_shortcut(Shortcut::Duplicate);
        assert_eq!(editor.tree.shapes.len(), 2);

        editor.apply_shortcut(Shortcut::Cut);
        assert_eq!(editor.tree.shapes.len(), 1);
        editor.apply_shortcut(Shortcut::Paste);
        assert_eq!(editor.tree.shapes.len(), 2);
    }

    #[test]
    fn test_delete_undo_redo_roundtrip() {
        let rect = Shape::rectangle(0.0, 0.0, 10.0, 10.0);
        let id = rect.id;
        let mut editor = editor_with(vec![rect]);
        editor.selection.set(vec![id]);

        editor.delete_selected();
        assert!(editor.tree.is_empty());
        assert!(editor.undo());
        assert!(editor.tree.find(id).is_some());
        assert!(editor.redo());
        assert!(editor.tree.is_empty());
        // Selection never holds dead ids after a history jump.
        assert!(editor.selection.is_empty());
    }

    #[test]
    fn test_group_ungroup_via_shortcut() {
        let a = Shape::rectangle(0.0, 0.0, 10.0, 10.0);
        let b = Shape::rectangle(30.0, 0.0, 10.0, 10.0);
        let (a_id, b_id) = (a.id, b.id);
        let mut editor = editor_with(vec![a, b]);
        editor.selection.set(vec![a_id, b_id]);

        editor.apply_shortcut(Shortcut::Group);
        let group_id = editor.selection.single().unwrap();
        assert!(editor.tree.find(group_id).unwrap().is_container());

        editor.apply_shortcut(Shortcut::Ungroup);
        assert_eq!(editor.selection.len(), 2);
        assert!(editor.tree.find(a_id).is_some());
    }

    #[test]
    fn test_ungroup_dissolves_every_selected_group() {
        let a = Shape::rectangle(0.0, 0.0, 10.0, 10.0);
        let b = Shape::rectangle(30.0, 0.0, 10.0, 10.0);
        let c = Shape::rectangle(100.0, 0.0, 10.0, 10.0);
        let d = Shape::rectangle(130.0, 0.0, 10.0, 10.0);
        let (a_id, b_id, c_id, d_id) = (a.id, b.id, c.id, d.id);
        let mut editor = editor_with(vec![a, b, c, d]);

        editor.selection.set(vec![a_id, b_id]);
        let g1 = editor.group_selected().unwrap();
        editor.selection.set(vec![c_id, d_id]);
        let g2 = editor.group_selected().unwrap();

        editor.selection.set(vec![g1, g2]);
        editor.ungroup_selected();

        assert!(editor.tree.find(g1).is_none());
        assert!(editor.tree.find(g2).is_none());
        assert_eq!(editor.selection.len(), 4);
        for id in [a_id, b_id, c_id, d_id] {
            assert!(editor.selection.contains(id));
            assert!(editor.tree.find(id).is_some());
        }
    }

    #[test]
    fn test_shift_toggle_off_drags_remaining_selection() {
        let a = Shape::rectangle(0.0, 0.0, 10.0, 10.0);
        let b = Shape::rectangle(100.0, 0.0, 10.0, 10.0);
        let (a_id, b_id) = (a.id, b.id);
        let mut editor = editor_with(vec![a, b]);
        editor.grid.enabled = false;
        editor.selection.set(vec![a_id, b_id]);

        let shift = Modifiers { shift: true, ..Modifiers::default() };
        editor.pointer_down_on_shape(b_id, Point::new(105.0, 5.0), shift);
        assert!(!editor.selection.contains(b_id));

        editor.pointer_move(Point::new(115.0, 15.0), Modifiers::default());
        editor.pointer_up(Point::new(115.0, 15.0));

        // The remaining selection moved; the toggled-off shape did not.
        let a_shape = editor.tree.find(a_id).unwrap();
        assert!((a_shape.x - 10.0).abs() < EPS);
        assert!((a_shape.y - 10.0).abs() < EPS);
        let b_shape = editor.tree.find(b_id).unwrap();
        assert!((b_shape.x - 100.0).abs() < EPS);
    }

    #[test]
    fn test_text_tool_places_and_edits() {
        let mut editor = Editor::new();
        editor.tool = Tool::Text;
        editor.pointer_down(Point::new(40.0, 60.0), Modifiers::default());

        let id = editor.selection.single().unwrap();
        let shape = editor.tree.find(id).unwrap();
        assert!((shape.width - 100.0).abs() < EPS);
        assert!((shape.height - 30.0).abs() < EPS);
        assert_eq!(editor.tool, Tool::Select);
        assert!(matches!(editor.state, InteractionState::EditingTextInline { .. }));

        // Shortcuts are suspended while typing.
        editor.apply_shortcut(Shortcut::Delete);
        assert!(editor.tree.find(id).is_some());

        editor.commit_text_edit("Hello");
        match &editor.tree.find(id).unwrap().kind {
            ShapeKind::Text(text) => assert_eq!(text.content, "Hello"),
            _ => panic!("expected text"),
        }
        assert!(editor.state.is_idle());
    }

    #[test]
    fn test_failed_operations_leave_no_undo_entry() {
        let rect = Shape::rectangle(0.0, 0.0, 10.0, 10.0);
        let id = rect.id;
        let mut editor = editor_with(vec![rect]);

        editor.selection.set(vec![id]);
        editor.ungroup_selected();
        editor.align_selected(Alignment::Left);
        editor.toggle_visibility(uuid::Uuid::new_v4());
        assert!(!editor.history.can_undo());
    }

    #[test]
    fn test_template_roundtrip() {
        let mut artboard = Shape::artboard(0.0, 0.0, 400.0, 300.0);
        if let Some(children) = artboard.children_mut() {
            children.push(Shape::rectangle(10.0, 10.0, 50.0, 50.0));
        }
        let ab_id = artboard.id;
        let mut editor = editor_with(vec![artboard]);

        let template_id = editor.save_template("Post", ab_id).unwrap();
        assert!(editor.apply_template(template_id));
        assert_eq!(editor.tree.shapes.len(), 2);
        let ids = editor.tree.ids();
        let unique: std::collections::HashSet<_> = ids.iter().collect();
        assert_eq!(ids.len(), unique.len());
    }

    #[test]
    fn test_export_blocked_mid_gesture() {
        let rect = Shape::rectangle(0.0, 0.0, 10.0, 10.0);
        let id = rect.id;
        let mut editor = editor_with(vec![rect]);

        assert!(editor.export_svg().is_some());
        editor.pointer_down_on_shape(id, Point::new(5.0, 5.0), Modifiers::default());
        assert!(editor.export_svg().is_none());
        editor.pointer_up(Point::new(5.0, 5.0));
        assert!(editor.export_svg().is_some());
    }
}
