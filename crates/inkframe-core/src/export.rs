//! SVG document generation.
//!
//! Walks a fully-resolved shape list and emits standalone SVG. Rotation
//! becomes a `rotate(deg, cx, cy)` transform, groups become translated
//! `<g>` elements, and artboards clip their children to the frame.

use std::fmt::Write;

use kurbo::Rect;

use crate::geometry::compute_bounds;
use crate::shapes::{SerializableColor, Shape, ShapeKind, TextAlign};

/// Padding around the content bounds in the exported viewBox.
const EXPORT_PADDING: f64 = 20.0;

/// ViewBox used when the document is empty.
const EMPTY_BOUNDS: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);

/// Render a shape list to a standalone SVG document.
pub fn to_svg(shapes: &[Shape]) -> String {
    let bounds = compute_bounds(shapes).unwrap_or(EMPTY_BOUNDS);
    let x = bounds.x0 - EXPORT_PADDING;
    let y = bounds.y0 - EXPORT_PADDING;
    let w = bounds.width() + EXPORT_PADDING * 2.0;
    let h = bounds.height() + EXPORT_PADDING * 2.0;

    let mut svg = String::new();
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"{x} {y} {w} {h}\">",
    );
    for shape in shapes {
        write_shape(&mut svg, shape);
    }
    svg.push_str("</svg>");
    svg
}

fn write_shape(svg: &mut String, shape: &Shape) {
    if !shape.style.visible {
        return;
    }
    match &shape.kind {
        ShapeKind::Rectangle { corner_radius } => {
            let _ = write!(
                svg,
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"",
                shape.x, shape.y, shape.width, shape.height
            );
            if *corner_radius > 0.0 {
                let _ = write!(svg, " rx=\"{corner_radius}\"");
            }
            write_paint(svg, shape);
            write_rotation(svg, shape);
            svg.push_str("/>");
        }
        ShapeKind::Ellipse => {
            let c = shape.center();
            let _ = write!(
                svg,
                "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\"",
                c.x,
                c.y,
                shape.width / 2.0,
                shape.height / 2.0
            );
            write_paint(svg, shape);
            write_rotation(svg, shape);
            svg.push_str("/>");
        }
        ShapeKind::Line { x2, y2 } => {
            let stroke = shape.style.stroke.unwrap_or(SerializableColor::black());
            let _ = write!(
                svg,
                "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\"",
                shape.x,
                shape.y,
                x2,
                y2,
                color_attr(stroke),
                shape.style.stroke_width
            );
            write_opacity(svg, shape);
            write_rotation(svg, shape);
            svg.push_str("/>");
        }
        ShapeKind::Text(text) => {
            // Baseline approximation: position plus font size.
            let anchor = match text.align {
                TextAlign::Left => "start",
                TextAlign::Center => "middle",
                TextAlign::Right => "end",
            };
            let tx = match text.align {
                TextAlign::Left => shape.x,
                TextAlign::Center => shape.x + shape.width / 2.0,
                TextAlign::Right => shape.x + shape.width,
            };
            let _ = write!(
                svg,
                "<text x=\"{}\" y=\"{}\" font-family=\"{}\" font-size=\"{}\" font-weight=\"{}\" font-style=\"{}\" text-anchor=\"{}\" fill=\"{}\"",
                tx,
                shape.y + text.font_size,
                escape_xml(&text.font_family),
                text.font_size,
                text.font_weight.css_value(),
                text.font_style.css_value(),
                anchor,
                color_attr(shape.style.fill)
            );
            write_opacity(svg, shape);
            write_rotation(svg, shape);
            svg.push('>');
            svg.push_str(&escape_xml(&text.content));
            svg.push_str("</text>");
        }
        ShapeKind::Group { children } => {
            let _ = write!(svg, "<g transform=\"translate({}, {})", shape.x, shape.y);
            if shape.rotation != 0.0 {
                let _ = write!(
                    svg,
                    " rotate({}, {}, {})",
                    shape.rotation,
                    shape.width / 2.0,
                    shape.height / 2.0
                );
            }
            svg.push_str("\">");
            for child in children {
                write_shape(svg, child);
            }
            svg.push_str("</g>");
        }
        ShapeKind::Artboard { children, .. } => {
            let clip_id = format!("clip-{}", shape.id.simple());
            let _ = write!(
                svg,
                "<clipPath id=\"{}\"><rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"/></clipPath>",
                clip_id, shape.x, shape.y, shape.width, shape.height
            );
            let _ = write!(
                svg,
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>",
                shape.x,
                shape.y,
                shape.width,
                shape.height,
                color_attr(shape.style.fill)
            );
            let _ = write!(
                svg,
                "<g clip-path=\"url(#{})\" transform=\"translate({}, {})\">",
                clip_id, shape.x, shape.y
            );
            for child in children {
                write_shape(svg, child);
            }
            svg.push_str("</g>");
        }
        // Raster and embedded media carry host-side sources; the vector
        // export leaves them out.
        ShapeKind::Image { .. } | ShapeKind::Video { .. } => {}
    }
}

fn write_paint(svg: &mut String, shape: &Shape) {
    let _ = write!(svg, " fill=\"{}\"", color_attr(shape.style.fill));
    if let Some(stroke) = shape.style.stroke {
        let _ = write!(
            svg,
            " stroke=\"{}\" stroke-width=\"{}\"",
            color_attr(stroke),
            shape.style.stroke_width
        );
    }
    write_opacity(svg, shape);
}

fn write_opacity(svg: &mut String, shape: &Shape) {
    if shape.style.opacity < 1.0 {
        let _ = write!(svg, " opacity=\"{}\"", shape.style.opacity);
    }
}

fn write_rotation(svg: &mut String, shape: &Shape) {
    if shape.rotation != 0.0 {
        let c = shape.center();
        let _ = write!(
            svg,
            " transform=\"rotate({}, {}, {})\"",
            shape.rotation, c.x, c.y
        );
    }
}

fn color_attr(color: SerializableColor) -> String {
    if color.is_transparent() {
        "none".to_string()
    } else if color.a == 255 {
        format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
    } else {
        format!(
            "rgba({},{},{},{})",
            color.r,
            color.g,
            color.b,
            color.a as f64 / 255.0
        )
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
