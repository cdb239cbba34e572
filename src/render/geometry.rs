//! Geometry for shapes without a direct primitive
//!
//! Everything here is a pure function of numbers; the caller positions and
//! styles the result.

use glam::{DVec2, dvec2};

use crate::model::{PortIoType, PowerPortStyle};
use crate::types::Orientation;
use crate::scene::svg::fmt_num_hi;

/// Depth of the pointed end of a port outline
pub const PORT_NUB: f64 = 5.0;

/// Depth of the tongue on a harness connector
pub const HARNESS_NUB: f64 = 5.0;

/// Arc end angles are pulled back by this many degrees so that a full circle
/// (start == end) still has distinct endpoints.
pub const ARC_EPSILON_DEG: f64 = 1e-4;

/// Outline of a port whose bounding box starts at (`x`, `y`).
///
/// Directional outlines end where they start; the undirected outline is a
/// plain five-point rectangle.
pub fn make_port(io_type: PortIoType, x: f64, y: f64, width: f64, height: f64) -> Vec<DVec2> {
    let nub = PORT_NUB;
    let mid = y + height / 2.0;
    match io_type {
        PortIoType::Unspecified => vec![
            dvec2(x, y),
            dvec2(x, y + height),
            dvec2(x + width, y + height),
            dvec2(x + width, y),
            dvec2(x, y),
        ],
        PortIoType::Output => vec![
            dvec2(x, mid),
            dvec2(x + nub, y),
            dvec2(x + width, y),
            dvec2(x + width, y + height),
            dvec2(x + nub, y + height),
            dvec2(x, mid),
        ],
        PortIoType::Input => vec![
            dvec2(x, y),
            dvec2(x + width - nub, y),
            dvec2(x + width, mid),
            dvec2(x + width - nub, y + height),
            dvec2(x, y + height),
            dvec2(x, y),
        ],
        PortIoType::Bidirectional => vec![
            dvec2(x, mid),
            dvec2(x + nub, y),
            dvec2(x + width - nub, y),
            dvec2(x + width, mid),
            dvec2(x + width - nub, y + height),
            dvec2(x + nub, y + height),
            dvec2(x, mid),
        ],
    }
}

/// Arrowhead at `tip` for a segment arriving from `from`.
///
/// Returns `[wing_a, tip, wing_b]`. The wings sit 30 degrees either side of
/// the segment, `3 + shape_size + 1` back from the tip; the drawn tip is
/// pushed half a unit past the segment end so the stroke joins cleanly.
pub fn arrowhead(from: DVec2, tip: DVec2, shape_size: u8) -> [DVec2; 3] {
    let d = tip - from;
    let angle = d.y.atan2(d.x);
    let base = 3.0 + f64::from(shape_size) + 1.0;
    let wing = 30f64.to_radians();
    let wing_a = tip - DVec2::from_angle(angle - wing) * base;
    let wing_b = tip - DVec2::from_angle(angle + wing) * base;
    [wing_a, tip + DVec2::from_angle(angle) * 0.5, wing_b]
}

/// Whether an arrowhead shape code is drawn filled
pub fn arrowhead_is_filled(shape: u8) -> bool {
    matches!(shape, 2 | 4)
}

/// Point on an ellipse at `deg` degrees. Stored arc angles are measured
/// from the opposite side of the centre, so 0 degrees lands on -X.
fn arc_point(center: DVec2, rx: f64, ry: f64, deg: f64) -> DVec2 {
    let a = (deg - 180.0).to_radians();
    center + dvec2(snap(rx * a.cos()), snap(ry * a.sin()))
}

/// Drop float noise below the precision `fmt_num_hi` prints
fn snap(v: f64) -> f64 {
    (v * 1e10).round() / 1e10
}

/// SVG path for an arc from `start_deg` to `end_deg`, both shifted half a
/// turn before use. A missing `secondary_radius` gives a circular arc.
pub fn arc_path(
    center: DVec2,
    radius: f64,
    secondary_radius: Option<f64>,
    start_deg: f64,
    end_deg: f64,
) -> String {
    let rx = radius;
    let ry = secondary_radius.unwrap_or(radius);
    let end_deg = end_deg - ARC_EPSILON_DEG;
    let span = (end_deg - start_deg).rem_euclid(360.0);
    let large_arc = if span > 180.0 { 1 } else { 0 };
    let start = arc_point(center, rx, ry, start_deg);
    let end = arc_point(center, rx, ry, end_deg);
    format!(
        "M {} {} A {} {} 0 {} 1 {} {}",
        fmt_num_hi(start.x),
        fmt_num_hi(start.y),
        fmt_num_hi(rx),
        fmt_num_hi(ry),
        large_arc,
        fmt_num_hi(end.x),
        fmt_num_hi(end.y)
    )
}

/// One stroke of a power port glyph, relative to the connection point
#[derive(Debug, Clone, PartialEq)]
pub enum GlyphPart {
    Line(DVec2, DVec2),
    Circle { center: DVec2, radius: f64 },
    Polyline(Vec<DVec2>),
    /// Filled rectangle between two corners
    Bar(DVec2, DVec2),
}

/// Strokes for a power port style. Styles without a dedicated symbol get a
/// solid 20-unit bar on the side the port faces.
pub fn power_port_glyph(style: PowerPortStyle, orientation: Orientation) -> Vec<GlyphPart> {
    use GlyphPart::*;
    match style {
        PowerPortStyle::Circle => vec![
            Line(dvec2(0.0, 0.0), dvec2(0.0, 5.0)),
            Circle {
                center: dvec2(0.0, 8.0),
                radius: 3.0,
            },
        ],
        PowerPortStyle::Bar => vec![
            Line(dvec2(0.0, 0.0), dvec2(0.0, 10.0)),
            Line(dvec2(-5.0, 10.0), dvec2(5.0, 10.0)),
        ],
        PowerPortStyle::PowerGround => [(10.0, 0.0), (7.5, -2.0), (5.0, -4.0), (2.5, -6.0)]
            .into_iter()
            .map(|(half, y)| Line(dvec2(-half, y), dvec2(half, y)))
            .collect(),
        PowerPortStyle::SignalGround => vec![Polyline(vec![
            dvec2(0.0, 0.0),
            dvec2(0.0, -5.0),
            dvec2(-10.0, -5.0),
            dvec2(0.0, -15.0),
            dvec2(10.0, -5.0),
            dvec2(0.0, -5.0),
        ])],
        PowerPortStyle::Earth => {
            let mut parts = vec![
                Line(dvec2(0.0, 0.0), dvec2(0.0, -5.0)),
                Line(dvec2(-5.0, -5.0), dvec2(5.0, -5.0)),
            ];
            for g in -1..=1 {
                let x = f64::from(g) * 5.0;
                parts.push(Line(dvec2(x, -5.0), dvec2(x - 3.0, -10.0)));
            }
            parts
        }
        PowerPortStyle::Arrow | PowerPortStyle::Wave | PowerPortStyle::Other(_) => {
            let depth = if orientation == Orientation::UP { 10.0 } else { -10.0 };
            vec![Bar(dvec2(-10.0, 0.0), dvec2(10.0, depth))]
        }
    }
}

/// Outline of a harness connector's tongue.
///
/// `location` is the body's top-left corner; the notch sits
/// `notch_from_top` below it. Side 0 puts the tongue on the right edge,
/// side 1 mirrors it onto the left.
pub fn harness_outline(
    location: DVec2,
    width: f64,
    height: f64,
    side: u8,
    notch_from_top: f64,
) -> Vec<DVec2> {
    let nub = HARNESS_NUB;
    let right = location.x + width;
    let top = location.y;
    let bottom = location.y - height;
    let notch = location.y - notch_from_top;
    let points = vec![
        dvec2(right - nub, top),
        dvec2(right, top),
        dvec2(right, notch + nub),
        dvec2(right + nub, notch),
        dvec2(right, notch - nub),
        dvec2(right, bottom),
        dvec2(right - nub, bottom),
    ];
    if side == 1 {
        let cx = location.x + width / 2.0;
        points
            .into_iter()
            .map(|p| dvec2(2.0 * cx - p.x, p.y))
            .collect()
    } else {
        points
    }
}
