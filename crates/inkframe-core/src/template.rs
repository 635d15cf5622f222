//! Reusable design templates captured from artboards.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::shapes::{Shape, ShapeId, ShapeKind};

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("shape {0} not found")]
    NotFound(ShapeId),
    #[error("shape {0} is not an artboard")]
    NotAnArtboard(ShapeId),
}

/// A stored design: an artboard-sized shape list plus gallery metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: Uuid,
    pub name: String,
    /// Gallery preview, as a data URI or asset path supplied by the host.
    #[serde(default)]
    pub thumbnail: String,
    pub shapes: Vec<Shape>,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub business: String,
    pub width: f64,
    pub height: f64,
}

impl Template {
    /// Capture an artboard as a template. The artboard itself becomes the
    /// single root of the template's shape list.
    pub fn from_artboard(name: impl Into<String>, artboard: &Shape) -> Result<Self, TemplateError> {
        let ShapeKind::Artboard { platform, business, .. } = &artboard.kind else {
            return Err(TemplateError::NotAnArtboard(artboard.id));
        };
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.into(),
            thumbnail: String::new(),
            shapes: vec![artboard.clone()],
            platform: platform.clone(),
            business: business.clone(),
            width: artboard.width,
            height: artboard.height,
        })
    }

    /// Produce shapes ready to insert into a document: a deep clone of the
    /// stored subtrees with every id regenerated, so instantiating the same
    /// template twice never collides.
    pub fn instantiate(&self) -> Vec<Shape> {
        let mut shapes = self.shapes.clone();
        for shape in &mut shapes {
            shape.regenerate_ids();
        }
        shapes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artboard_with_child() -> Shape {
        let mut artboard = Shape::artboard(0.0, 0.0, 400.0, 300.0);
        if let Some(children) = artboard.children_mut() {
            children.push(Shape::rectangle(10.0, 10.0, 50.0, 50.0));
        }
        artboard
    }

    #[test]
    fn test_from_artboard_captures_metadata() {
        let artboard = artboard_with_child();
        let template = Template::from_artboard("Post", &artboard).unwrap();
        assert_eq!(template.name, "Post");
        assert!((template.width - 400.0).abs() < 1e-9);
        assert_eq!(template.shapes.len(), 1);
    }

    #[test]
    fn test_from_non_artboard_fails() {
        let rect = Shape::rectangle(0.0, 0.0, 10.0, 10.0);
        assert!(matches!(
            Template::from_artboard("x", &rect),
            Err(TemplateError::NotAnArtboard(_))
        ));
    }

    #[test]
    fn test_instantiate_regenerates_all_ids() {
        let artboard = artboard_with_child();
        let template = Template::from_artboard("Post", &artboard).unwrap();

        let first = template.instantiate();
        let second = template.instantiate();

        let mut ids = Vec::new();
        for shape in first.iter().chain(second.iter()) {
            shape.collect_ids(&mut ids);
        }
        let unique: std::collections::HashSet<_> = ids.iter().collect();
        assert_eq!(ids.len(), unique.len());
        // Stored shapes untouched.
        assert_eq!(template.shapes[0].id, artboard.id);
    }
}
