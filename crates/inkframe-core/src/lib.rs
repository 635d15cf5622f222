//! Core engine for the Inkframe vector design editor.
//!
//! Holds the scene graph, the geometric transform kernel, selection and
//! hit-testing, snapshot undo/redo, and the gesture state machine. The crate
//! is UI-agnostic: a host feeds it pointer and keyboard events in world
//! coordinates and renders the tree however it likes.

pub mod align;
pub mod camera;
pub mod editor;
pub mod export;
pub mod geometry;
pub mod history;
pub mod interaction;
pub mod selection;
pub mod shapes;
pub mod snap;
pub mod template;
pub mod tree;

pub use align::{Alignment, Distribution};
pub use camera::Camera;
pub use editor::Editor;
pub use export::to_svg;
pub use geometry::{anchored_resize, rotate_point, ResizeHandle, MIN_SHAPE_SIZE};
pub use history::History;
pub use interaction::{HandleKind, InteractionState, Modifiers, Shortcut, Tool};
pub use selection::{Marquee, Selection};
pub use shapes::{
    SerializableColor, Shape, ShapeId, ShapeKind, ShapeStyle, TextAlign, TextContent,
};
pub use snap::GridSnap;
pub use template::{Template, TemplateError};
pub use tree::{RelativePosition, ReorderAction, SceneTree, ShapePatch};
