//! Scene nodes. A single [`Shape`] struct carries the geometry and style every
//! node shares; the [`ShapeKind`] payload holds what varies per kind.

pub mod style;

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use style::{FontStyle, FontWeight, SerializableColor, ShapeStyle, TextAlign, TextContent};

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Kind-specific payload of a shape node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeKind {
    Rectangle {
        #[serde(default)]
        corner_radius: f64,
    },
    Ellipse,
    /// Line segment. `x` / `y` on the node is the start point; the end point
    /// lives here. Width and height track the endpoint bounding box.
    Line { x2: f64, y2: f64 },
    Text(TextContent),
    /// Container with children in coordinates relative to the group origin.
    Group { children: Vec<Shape> },
    /// Top-level frame. Children are relative to the artboard origin and are
    /// clipped to its extent on export.
    Artboard {
        children: Vec<Shape>,
        #[serde(default)]
        platform: String,
        #[serde(default)]
        business: String,
    },
    Image { src: String },
    Video { src: String },
}

/// A node in the scene tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees, clockwise, about the center of the bounding box.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub aspect_ratio_locked: bool,
    #[serde(default)]
    pub style: ShapeStyle,
    pub kind: ShapeKind,
}

impl Shape {
    /// Create a shape with a fresh id and default style.
    pub fn new(kind: ShapeKind, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            x,
            y,
            width,
            height,
            rotation: 0.0,
            aspect_ratio_locked: false,
            style: ShapeStyle::default(),
            kind,
        }
    }

    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(ShapeKind::Rectangle { corner_radius: 0.0 }, x, y, width, height)
    }

    pub fn ellipse(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(ShapeKind::Ellipse, x, y, width, height)
    }

    /// Create a line from start to end. The node position is the start point
    /// and width/height track the endpoint bounding box.
    pub fn line(start: Point, end: Point) -> Self {
        Self::new(
            ShapeKind::Line { x2: end.x, y2: end.y },
            start.x,
            start.y,
            (end.x - start.x).abs(),
            (end.y - start.y).abs(),
        )
    }

    pub fn text(content: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(ShapeKind::Text(TextContent::new(content)), x, y, width, height)
    }

    pub fn group(children: Vec<Shape>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(ShapeKind::Group { children }, x, y, width, height)
    }

    pub fn artboard(x: f64, y: f64, width: f64, height: f64) -> Self {
        let mut shape = Self::new(
            ShapeKind::Artboard {
                children: Vec::new(),
                platform: String::new(),
                business: String::new(),
            },
            x,
            y,
            width,
            height,
        );
        shape.style.fill = SerializableColor::white();
        shape
    }

    /// Axis-aligned bounding box, ignoring rotation. Lines use the endpoint
    /// bounding box.
    pub fn bounds(&self) -> Rect {
        match &self.kind {
            ShapeKind::Line { x2, y2 } => Rect::new(
                self.x.min(*x2),
                self.y.min(*y2),
                self.x.max(*x2),
                self.y.max(*y2),
            ),
            _ => Rect::new(self.x, self.y, self.x + self.width, self.y + self.height),
        }
    }

    /// Center of the bounding box; the rotation pivot.
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Translate the shape, carrying line endpoints along.
    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
        if let ShapeKind::Line { x2, y2 } = &mut self.kind {
            *x2 += delta.x;
            *y2 += delta.y;
        }
    }

    /// Whether this shape can hold children.
    pub fn is_container(&self) -> bool {
        matches!(self.kind, ShapeKind::Group { .. } | ShapeKind::Artboard { .. })
    }

    pub fn children(&self) -> Option<&Vec<Shape>> {
        match &self.kind {
            ShapeKind::Group { children } | ShapeKind::Artboard { children, .. } => Some(children),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Shape>> {
        match &mut self.kind {
            ShapeKind::Group { children } | ShapeKind::Artboard { children, .. } => Some(children),
            _ => None,
        }
    }

    /// Marquee overlap test against the unrotated bounding box. Inclusive on
    /// edges so a marquee that just touches a shape selects it. Degenerate
    /// line boxes are padded to at least one unit per axis so horizontal and
    /// vertical lines stay selectable.
    pub fn intersects_rect(&self, rect: Rect) -> bool {
        let mut b = self.bounds();
        if matches!(self.kind, ShapeKind::Line { .. }) {
            if b.width() < 1.0 {
                b.x1 = b.x0 + 1.0;
            }
            if b.height() < 1.0 {
                b.y1 = b.y0 + 1.0;
            }
        }
        !(b.x0 > rect.x1 || b.x1 < rect.x0 || b.y0 > rect.y1 || b.y1 < rect.y0)
    }

    /// Assign fresh ids to this shape and its whole subtree. Used by paste,
    /// duplicate and template instantiation so clones never collide with the
    /// originals.
    pub fn regenerate_ids(&mut self) {
        self.id = Uuid::new_v4();
        if let Some(children) = self.children_mut() {
            for child in children {
                child.regenerate_ids();
            }
        }
    }

    /// Collect the ids of this shape and its subtree.
    pub fn collect_ids(&self, out: &mut Vec<ShapeId>) {
        out.push(self.id);
        if let Some(children) = self.children() {
            for child in children {
                child.collect_ids(out);
            }
        }
    }

    /// Whether `id` names this shape or any descendant.
    pub fn contains_id(&self, id: ShapeId) -> bool {
        if self.id == id {
            return true;
        }
        self.children()
            .is_some_and(|children| children.iter().any(|c| c.contains_id(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_line_bounds_normalized() {
        let line = Shape::line(Point::new(100.0, 50.0), Point::new(20.0, 80.0));
        let b = line.bounds();
        assert!((b.x0 - 20.0).abs() < EPS);
        assert!((b.y0 - 50.0).abs() < EPS);
        assert!((b.x1 - 100.0).abs() < EPS);
        assert!((b.y1 - 80.0).abs() < EPS);
    }

    #[test]
    fn test_translate_carries_line_endpoint() {
        let mut line = Shape::line(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        line.translate(Vec2::new(5.0, -3.0));
        assert!((line.x - 5.0).abs() < EPS);
        assert!((line.y + 3.0).abs() < EPS);
        match line.kind {
            ShapeKind::Line { x2, y2 } => {
                assert!((x2 - 15.0).abs() < EPS);
                assert!((y2 - 7.0).abs() < EPS);
            }
            _ => panic!("expected line"),
        }
    }

    #[test]
    fn test_intersects_rect_inclusive_edges() {
        let rect = Shape::rectangle(10.0, 10.0, 20.0, 20.0);
        // Touching at the right edge still counts.
        assert!(rect.intersects_rect(Rect::new(30.0, 10.0, 40.0, 20.0)));
        assert!(!rect.intersects_rect(Rect::new(31.0, 10.0, 40.0, 20.0)));
    }

    #[test]
    fn test_horizontal_line_selectable() {
        let line = Shape::line(Point::new(0.0, 50.0), Point::new(100.0, 50.0));
        // A zero-height box would never overlap a marquee below the segment;
        // the one-unit pad keeps it hit-testable.
        assert!(line.intersects_rect(Rect::new(40.0, 50.2, 60.0, 60.0)));
    }

    #[test]
    fn test_regenerate_ids_recursive() {
        let child = Shape::rectangle(0.0, 0.0, 10.0, 10.0);
        let child_id = child.id;
        let mut group = Shape::group(vec![child], 0.0, 0.0, 10.0, 10.0);
        let group_id = group.id;

        group.regenerate_ids();
        assert_ne!(group.id, group_id);
        assert_ne!(group.children().map(|c| c[0].id), Some(child_id));
    }

    #[test]
    fn test_contains_id_descends() {
        let child = Shape::rectangle(0.0, 0.0, 10.0, 10.0);
        let child_id = child.id;
        let inner = Shape::group(vec![child], 0.0, 0.0, 10.0, 10.0);
        let outer = Shape::group(vec![inner], 0.0, 0.0, 10.0, 10.0);
        assert!(outer.contains_id(child_id));
        assert!(!outer.contains_id(Uuid::new_v4()));
    }
}
