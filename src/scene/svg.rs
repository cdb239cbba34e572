//! SVG generation
//!
//! Converts a [`Scene`] into the typed `facet_svg` DOM and serializes it with
//! `facet_xml`. Transforms only ever appear on `<g>` elements: a shape that
//! carries transforms is wrapped in its own group.

use facet_svg::{
    Ellipse as SvgEllipse, Group, Image as SvgImage, Line as SvgLine, Path as SvgPath,
    Polygon as SvgPolygon, Polyline as SvgPolyline, Rect as SvgRect, Svg, SvgNode,
    Text as SvgText, facet_xml,
};
use glam::DVec2;

use super::{FlipAxis, Node, NodeId, Paint, Primitive, Scene, Stroke, Transform};
use crate::errors::RenderError;

/// Build the SVG document for `scene` on a `width` x `height` canvas
pub fn to_svg(scene: &Scene, width: f64, height: f64) -> Svg {
    let children = scene
        .get(Scene::ROOT)
        .map(|root| {
            root.children()
                .iter()
                .filter_map(|id| node_to_svg(scene, *id))
                .collect()
        })
        .unwrap_or_default();

    Svg {
        xmlns: None,
        width: Some(fmt_num(width)),
        height: Some(fmt_num(height)),
        view_box: Some(format!("0 0 {} {}", fmt_num(width), fmt_num(height))),
        style: None,
        children,
    }
}

/// Serialize an SVG document to XML text
pub fn to_svg_string(svg: &Svg) -> Result<String, RenderError> {
    facet_xml::to_string(svg).map_err(|e| RenderError::Serialize {
        message: e.to_string(),
    })
}

fn node_to_svg(scene: &Scene, id: NodeId) -> Option<SvgNode> {
    let node = scene.get(id)?;
    let transform = transform_attr(&node.transforms);

    if let Primitive::Group = node.primitive {
        return Some(SvgNode::G(Group {
            id: node.id.clone(),
            class: None,
            transform,
            children: node
                .children()
                .iter()
                .filter_map(|c| node_to_svg(scene, *c))
                .collect(),
        }));
    }

    let element = shape_to_svg(node);
    if transform.is_none() && node.id.is_none() {
        return Some(element);
    }
    Some(SvgNode::G(Group {
        id: node.id.clone(),
        class: None,
        transform,
        children: vec![element],
    }))
}

fn shape_to_svg(node: &Node) -> SvgNode {
    let fill = node.fill.map(paint_attr);
    let (stroke, stroke_width, stroke_dasharray) = stroke_attrs(node.stroke.as_ref());

    match &node.primitive {
        Primitive::Group => SvgNode::G(Group::default()),
        Primitive::Rect {
            origin,
            size,
            radius,
        } => {
            // SVG forbids negative sizes
            let min = origin.min(*origin + *size);
            let size = size.abs();
            SvgNode::Rect(SvgRect {
                x: Some(round(min.x)),
                y: Some(round(min.y)),
                width: Some(round(size.x)),
                height: Some(round(size.y)),
                rx: (radius.x != 0.0).then(|| round(radius.x)),
                ry: (radius.y != 0.0).then(|| round(radius.y)),
                fill,
                stroke,
                stroke_width,
                stroke_dasharray,
            })
        }
        Primitive::Line { from, to } => SvgNode::Line(SvgLine {
            x1: Some(round(from.x)),
            y1: Some(round(from.y)),
            x2: Some(round(to.x)),
            y2: Some(round(to.y)),
            fill,
            stroke,
            stroke_width,
            stroke_dasharray,
        }),
        Primitive::Polyline { points } => SvgNode::Polyline(SvgPolyline {
            points: Some(points_attr(points)),
            fill,
            stroke,
            stroke_width,
            stroke_dasharray,
        }),
        Primitive::Polygon { points } => SvgNode::Polygon(SvgPolygon {
            points: Some(points_attr(points)),
            fill,
            stroke,
            stroke_width,
            stroke_dasharray,
        }),
        Primitive::Ellipse { center, radius } => SvgNode::Ellipse(SvgEllipse {
            cx: Some(round(center.x)),
            cy: Some(round(center.y)),
            rx: Some(round(radius.x.abs())),
            ry: Some(round(radius.y.abs())),
            fill,
            stroke,
            stroke_width,
            stroke_dasharray,
        }),
        Primitive::Path { d } => SvgNode::Path(SvgPath {
            d: Some(d.clone()),
            fill,
            stroke,
            stroke_width,
            stroke_dasharray,
        }),
        Primitive::Text { position, content } => {
            let font = node.font.as_ref();
            SvgNode::Text(SvgText {
                x: Some(round(position.x)),
                y: Some(round(position.y)),
                fill,
                stroke,
                stroke_width,
                font_family: font.map(|f| f.family.clone()),
                font_size: font.map(|f| fmt_num(f.size)),
                font_style: font.map(|f| if f.italic { "italic" } else { "normal" }.to_string()),
                font_weight: font.map(|f| if f.bold { "bold" } else { "normal" }.to_string()),
                text_anchor: font.map(|f| f.anchor.as_str().to_string()),
                dominant_baseline: font.and_then(|f| f.baseline).map(str::to_string),
                content: content.clone(),
            })
        }
        Primitive::Image {
            origin,
            size,
            href,
            keep_aspect,
        } => SvgNode::Image(SvgImage {
            x: Some(round(origin.x)),
            y: Some(round(origin.y)),
            width: Some(round(size.x)),
            height: Some(round(size.y)),
            href: Some(href.clone()),
            preserve_aspect_ratio: Some(
                if *keep_aspect { "xMidYMid meet" } else { "none" }.to_string(),
            ),
        }),
    }
}

fn paint_attr(paint: Paint) -> String {
    match paint {
        Paint::None => "none".to_string(),
        Paint::Color(c) => c.to_hex(),
    }
}

fn stroke_attrs(stroke: Option<&Stroke>) -> (Option<String>, Option<String>, Option<String>) {
    match stroke {
        None => (None, None, None),
        Some(s) => (
            Some(s.color.to_hex()),
            Some(fmt_num(s.width)),
            s.dash.as_ref().map(|d| {
                d.iter()
                    .map(|v| fmt_num(*v))
                    .collect::<Vec<_>>()
                    .join(" ")
            }),
        ),
    }
}

fn points_attr(points: &[DVec2]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", fmt_num(p.x), fmt_num(p.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// SVG `transform` attribute for a transform list, `None` when empty
pub fn transform_attr(transforms: &[Transform]) -> Option<String> {
    if transforms.is_empty() {
        return None;
    }
    let parts: Vec<String> = transforms
        .iter()
        .map(|t| match t {
            Transform::Translate(d) => format!("translate({} {})", fmt_num(d.x), fmt_num(d.y)),
            Transform::Scale(s) => format!("scale({} {})", fmt_num(s.x), fmt_num(s.y)),
            Transform::Rotate { angle, origin } => format!(
                "rotate({} {} {})",
                fmt_num(*angle),
                fmt_num(origin.x),
                fmt_num(origin.y)
            ),
            Transform::Flip { axis, origin } => {
                let scale = match axis {
                    FlipAxis::X => "scale(-1 1)",
                    FlipAxis::Y => "scale(1 -1)",
                };
                format!(
                    "translate({} {}) {} translate({} {})",
                    fmt_num(origin.x),
                    fmt_num(origin.y),
                    scale,
                    fmt_num(-origin.x),
                    fmt_num(-origin.y)
                )
            }
        })
        .collect();
    Some(parts.join(" "))
}

/// Round away float noise before a value lands in a numeric attribute
fn round(value: f64) -> f64 {
    let r = (value * 1e6).round() / 1e6;
    if r == 0.0 { 0.0 } else { r }
}

/// Format a number with 6 significant figures, trailing zeros trimmed
pub(crate) fn fmt_num(value: f64) -> String {
    fmt_num_precision(value, 6)
}

/// Format a number with 10 significant figures. Arc endpoints need this so
/// that nearly coincident points stay distinct.
pub(crate) fn fmt_num_hi(value: f64) -> String {
    fmt_num_precision(value, 10)
}

fn fmt_num_precision(value: f64, sig_figs: i32) -> String {
    if value == 0.0 || !value.is_finite() {
        return "0".to_string();
    }

    let abs_val = value.abs();
    let magnitude = abs_val.log10().floor() as i32;
    let scale = 10_f64.powi(sig_figs - 1 - magnitude);
    let rounded = (value * scale).round() / scale;

    let decimals = (sig_figs - 1 - magnitude).max(0) as usize;
    let s = format!("{:.prec$}", rounded, prec = decimals);
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        &s
    };
    if s == "-0" { "0".to_string() } else { s.to_string() }
}
