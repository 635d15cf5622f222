//! Snapshot-based undo/redo over the root shape list.
//!
//! The stacks hold deep copies of the whole tree. Callers snapshot before
//! mutating; undo/redo swap the live tree against the stacks.

use crate::shapes::Shape;

#[derive(Debug, Clone, Default)]
pub struct History {
    undo: Vec<Vec<Shape>>,
    redo: Vec<Vec<Shape>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current state before a mutation. Clears the redo stack:
    /// diverging from an undone state drops the forward timeline.
    pub fn snapshot(&mut self, shapes: &[Shape]) {
        self.undo.push(shapes.to_vec());
        self.redo.clear();
    }

    /// Step back one snapshot. The live state moves onto the redo stack.
    /// Returns false when there is nothing to undo.
    pub fn undo(&mut self, live: &mut Vec<Shape>) -> bool {
        match self.undo.pop() {
            Some(previous) => {
                self.redo.push(std::mem::replace(live, previous));
                true
            }
            None => false,
        }
    }

    /// Step forward one snapshot. The live state moves onto the undo stack.
    pub fn redo(&mut self, live: &mut Vec<Shape>) -> bool {
        match self.redo.pop() {
            Some(next) => {
                self.undo.push(std::mem::replace(live, next));
                true
            }
            None => false,
        }
    }

    /// Drop the most recent snapshot. Used when the mutation it was taken
    /// for turned out to be a no-op.
    pub fn discard_snapshot(&mut self) {
        self.undo.pop();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
