//! Tools, gesture state, and keyboard shortcuts.

use std::collections::HashMap;

use kurbo::Point;

use crate::geometry::ResizeHandle;
use crate::shapes::{Shape, ShapeId};

/// Rotation handle visual bias: the handle sits above the shape, so the raw
/// pointer angle is offset by 90 degrees to read as "up = unrotated".
pub const ROTATION_HANDLE_BIAS: f64 = 90.0;

/// Shift-rotation snaps to multiples of this angle.
pub const ROTATION_SNAP_DEG: f64 = 15.0;

/// The active drawing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Select,
    Rectangle,
    Ellipse,
    Line,
    Text,
    Artboard,
}

impl Tool {
    /// Whether a pointer-down with this tool starts drawing a new shape.
    pub fn draws(&self) -> bool {
        !matches!(self, Tool::Select)
    }
}

/// A grabbable handle on the selection box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    Resize(ResizeHandle),
    Rotate,
}

/// Keyboard modifier state carried alongside pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Platform-neutral command modifier.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Editing shortcuts, decoded by the host from raw key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Delete,
    Undo,
    Redo,
    Copy,
    Cut,
    Paste,
    Duplicate,
    Group,
    Ungroup,
    ToggleGridSnap,
}

/// What the pointer is currently doing. One gesture at a time; `Idle` between
/// gestures.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Rubber-band selection from `start`.
    MarqueeSelecting {
        start: Point,
        current: Point,
        additive: bool,
    },
    /// Moving the whole selection. `initial` captures each member as it was
    /// at pointer-down so movement is computed from the gesture origin, not
    /// accumulated.
    DraggingSelection {
        start: Point,
        initial: HashMap<ShapeId, Shape>,
    },
    /// Resizing one shape from a handle.
    ResizingHandle {
        id: ShapeId,
        handle: ResizeHandle,
        start: Point,
        initial: Shape,
    },
    /// Rotating one shape around its center.
    RotatingHandle { id: ShapeId, initial: Shape },
    /// Dragging out a new shape with a drawing tool. The provisional shape is
    /// not yet in the tree; commit happens at pointer-up.
    DrawingNewShape { start: Point, provisional: Shape },
    /// Inline text editing; shortcuts are suspended so typing works.
    EditingTextInline { id: ShapeId },
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }

    /// Whether the current gesture mutates the tree (and therefore already
    /// took its history snapshot at pointer-down).
    pub fn is_mutating_gesture(&self) -> bool {
        matches!(
            self,
            InteractionState::DraggingSelection { .. }
                | InteractionState::ResizingHandle { .. }
                | InteractionState::RotatingHandle { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_draws() {
        assert!(!Tool::Select.draws());
        assert!(Tool::Rectangle.draws());
        assert!(Tool::Text.draws());
    }

    #[test]
    fn test_command_modifier() {
        let mut mods = Modifiers::default();
        assert!(!mods.command());
        mods.meta = true;
        assert!(mods.command());
        mods.meta = false;
        mods.ctrl = true;
        assert!(mods.command());
    }

    #[test]
    fn test_mutating_gestures() {
        assert!(!InteractionState::Idle.is_mutating_gesture());
        let drag = InteractionState::DraggingSelection {
            start: Point::ZERO,
            initial: HashMap::new(),
        };
        assert!(drag.is_mutating_gesture());
        let marquee = InteractionState::MarqueeSelecting {
            start: Point::ZERO,
            current: Point::ZERO,
            additive: false,
        };
        assert!(!marquee.is_mutating_gesture());
    }
}
