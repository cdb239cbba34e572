//! Per-kind drawing rules
//!
//! Each object kind knows how to put itself into the scene through a
//! [`DrawContext`]. Kinds that cannot be drawn (or sub-styles without a rule)
//! report [`Unsupported`]; the renderer turns that into a warning and moves on.

use glam::{DVec2, dvec2};

use super::geometry::{
    GlyphPart, arc_path, arrowhead, arrowhead_is_filled, harness_outline, make_port,
    power_port_glyph,
};
use super::text::{TextLayout, TextPlacement, font_spec, layout, wrap_text};
use super::RenderOptions;
use crate::errors::Warning;
use crate::log::{debug, warn};
use crate::model::*;
use crate::scene::{FlipAxis, NodeId, NodeMut, Scene, Stroke, TextAnchor, Transform};
use crate::types::{Color, Orientation};

/// Why an object produced no (or partial) output
#[derive(Debug, Clone, PartialEq)]
pub struct Unsupported(pub String);

pub type DrawResult = Result<(), Unsupported>;

fn unsupported(what: impl Into<String>) -> DrawResult {
    Err(Unsupported(what.into()))
}

/// Everything a drawing rule needs for one object
pub struct DrawContext<'a> {
    pub doc: &'a SchematicDocument,
    pub scene: &'a mut Scene,
    /// Group that receives the object's primitives
    pub parent: NodeId,
    pub options: &'a RenderOptions,
    pub warnings: &'a mut Vec<Warning>,
    /// The object being drawn
    pub object: ObjectId,
}

impl<'a> DrawContext<'a> {
    /// Font from the sheet's table, falling back to the default font
    pub fn font(&mut self, font_id: u32) -> Font {
        if let Some(font) = self.doc.sheet.font(font_id) {
            return font.clone();
        }
        warn!(object = %self.object, font_id, "font not in font table");
        self.warnings.push(Warning::MissingFont {
            object: self.object,
            font_id,
        });
        self.doc
            .sheet
            .font(Sheet::DEFAULT_FONT_ID)
            .cloned()
            .unwrap_or_default()
    }

    /// Emit laid-out text under `parent`
    pub fn emit_text(&mut self, parent: NodeId, content: &str, l: &TextLayout) -> NodeId {
        self.scene
            .text(parent, content)
            .move_to(l.position.x, l.position.y)
            .font(l.font.clone())
            .fill(l.colour)
            .transform(Transform::Rotate {
                angle: l.rotation,
                origin: l.origin,
            })
            .transform(Transform::Flip {
                axis: l.flip,
                origin: l.origin,
            })
            .id()
    }

    /// Lay out and emit `content` at `placement`
    pub fn text(&mut self, placement: &TextPlacement, content: &str) -> NodeId {
        let font = self.font(placement.font_id);
        let l = layout(placement, &font);
        self.emit_text(self.parent, content, &l)
    }

    /// Follow a `=name` reference. A miss leaves the literal text in place.
    fn resolve<'p>(
        &mut self,
        text: &str,
        lookup: impl FnOnce(&str) -> Option<&'p Parameter>,
    ) -> String {
        let Some(name) = text.strip_prefix('=').filter(|n| !n.is_empty()) else {
            return text.to_string();
        };
        match lookup(name) {
            Some(p) => p.text.text.clone(),
            None => {
                warn!(object = %self.object, name, "parameter reference not found");
                self.warnings.push(Warning::LookupMiss {
                    object: self.object,
                    name: name.to_string(),
                });
                text.to_string()
            }
        }
    }

    fn rect_between(&mut self, a: DVec2, b: DVec2) -> NodeMut<'_> {
        let min = a.min(b);
        let size = (a - b).abs();
        self.scene
            .rect(self.parent, size.x, size.y)
            .move_to(min.x, min.y)
    }

    fn parent_object(&self) -> Option<&'a ObjectKind> {
        let parent = self.doc.get(self.object)?.parent()?;
        self.doc.get(parent).map(|o| &o.kind)
    }
}

fn area_fill(node: NodeMut<'_>, transparent: bool, colour: Color) -> NodeMut<'_> {
    if transparent {
        node.no_fill()
    } else {
        node.fill(colour)
    }
}

/// A drawing rule
pub trait Draw {
    fn draw(&self, cx: &mut DrawContext<'_>) -> DrawResult;
}

impl Draw for ObjectKind {
    fn draw(&self, cx: &mut DrawContext<'_>) -> DrawResult {
        match self {
            ObjectKind::Wire(o) => o.draw(cx),
            ObjectKind::Bus(o) => o.draw(cx),
            ObjectKind::BusEntry(o) => o.draw(cx),
            ObjectKind::Rectangle(o) => o.draw(cx),
            ObjectKind::RoundedRectangle(o) => o.draw(cx),
            ObjectKind::Ellipse(o) => o.draw(cx),
            ObjectKind::EllipticalArc(o) => o.draw(cx),
            ObjectKind::Arc(o) => o.draw(cx),
            ObjectKind::Polyline(o) => o.draw(cx),
            ObjectKind::Polygon(o) => o.draw(cx),
            ObjectKind::Port(o) => o.draw(cx),
            ObjectKind::Pin(o) => o.draw(cx),
            ObjectKind::Junction(o) => o.draw(cx),
            ObjectKind::NoErc(o) => o.draw(cx),
            ObjectKind::Line(o) => o.draw(cx),
            ObjectKind::Label(o) => o.draw(cx),
            ObjectKind::NetLabel(o) => o.draw(cx),
            ObjectKind::Designator(o) => o.draw(cx),
            ObjectKind::Parameter(o) => o.draw(cx),
            ObjectKind::SheetFilename(o) => o.draw(cx),
            ObjectKind::SheetName(o) => o.draw(cx),
            ObjectKind::PowerPort(o) => o.draw(cx),
            ObjectKind::SheetSymbol(o) => o.draw(cx),
            ObjectKind::SheetEntry(o) => o.draw(cx),
            ObjectKind::Image(o) => o.draw(cx),
            ObjectKind::TextFrame(o) => o.draw(cx),
            ObjectKind::Harness(o) => o.draw(cx),
            ObjectKind::HarnessPin(o) => o.draw(cx),
            ObjectKind::HarnessWire(o) => o.draw(cx),
            ObjectKind::HarnessLabel(o) => o.draw(cx),
            // Containers and records with nothing to show
            ObjectKind::Component(_)
            | ObjectKind::Sheet
            | ObjectKind::Implementation(_)
            | ObjectKind::TemplateFile(_) => Ok(()),
            ObjectKind::Unknown { record } => unsupported(format!("record type {record}")),
        }
    }
}

// ============================================================================
// Wiring
// ============================================================================

impl Draw for Wire {
    fn draw(&self, cx: &mut DrawContext<'_>) -> DrawResult {
        cx.scene
            .polyline(cx.parent, self.points.clone())
            .no_fill()
            .stroke(Stroke::new(self.colour, self.line_width));
        Ok(())
    }
}

impl Draw for Bus {
    fn draw(&self, cx: &mut DrawContext<'_>) -> DrawResult {
        cx.scene
            .polyline(cx.parent, self.points.clone())
            .no_fill()
            .stroke(Stroke::new(self.colour, 3.0 * self.line_width));
        Ok(())
    }
}

impl Draw for BusEntry {
    fn draw(&self, cx: &mut DrawContext<'_>) -> DrawResult {
        cx.scene
            .line(cx.parent, self.location, self.corner)
            .stroke(Stroke::new(self.colour, self.line_width));
        Ok(())
    }
}

impl Draw for Junction {
    fn draw(&self, cx: &mut DrawContext<'_>) -> DrawResult {
        cx.scene
            .ellipse(cx.parent, self.location, DVec2::splat(1.5))
            .fill(self.colour);
        Ok(())
    }
}

impl Draw for NoErc {
    fn draw(&self, cx: &mut DrawContext<'_>) -> DrawResult {
        let p = self.location;
        let stroke = Stroke::new(self.colour, 0.5);
        cx.scene
            .line(cx.parent, p + dvec2(5.0, 5.0), p - dvec2(5.0, 5.0))
            .stroke(stroke.clone());
        cx.scene
            .line(cx.parent, p + dvec2(-5.0, 5.0), p + dvec2(5.0, -5.0))
            .stroke(stroke);
        Ok(())
    }
}

impl Draw for Port {
    fn draw(&self, cx: &mut DrawContext<'_>) -> DrawResult {
        let x = self.location.x;
        let y = self.location.y - self.height / 2.0;
        let outline = make_port(self.io_type, x, y, self.width, self.height);
        cx.scene
            .polyline(cx.parent, outline)
            .fill(self.fill_colour)
            .stroke(Stroke::new(self.border_colour, 1.0));

        let placement = TextPlacement {
            location: dvec2(x + 5.0, y),
            orientation: Orientation::RIGHT,
            justification: 0,
            font_id: self.font_id,
            colour: self.text_colour,
        };
        cx.text(&placement, &self.name);
        Ok(())
    }
}

impl Draw for PowerPort {
    fn draw(&self, cx: &mut DrawContext<'_>) -> DrawResult {
        let glyph = if self.is_off_sheet_connector {
            unsupported("off-sheet connector")
        } else {
            let parts = power_port_glyph(self.style, self.orientation);
            draw_glyph(cx, self.location, self.colour, &parts);
            Ok(())
        };

        if self.show_text {
            let o = self.orientation.index();
            let anchor = [
                TextAnchor::Start,
                TextAnchor::Middle,
                TextAnchor::End,
                TextAnchor::Middle,
            ][o];
            let offset_y = [0.0, 10.0, 0.0, -10.0][o];
            let font = cx.font(Sheet::DEFAULT_FONT_ID);
            let position = self.location + dvec2(0.0, offset_y);
            let l = TextLayout {
                position,
                colour: self.colour,
                rotation: 180.0,
                flip: FlipAxis::X,
                origin: position + dvec2(0.0, font.size / 2.0),
                font: font_spec(&font, anchor),
            };
            cx.emit_text(cx.parent, &self.text, &l);
        }
        glyph
    }
}

fn draw_glyph(cx: &mut DrawContext<'_>, at: DVec2, colour: Color, parts: &[GlyphPart]) {
    let stroke = Stroke::new(colour, 1.0);
    for part in parts {
        match part {
            GlyphPart::Line(a, b) => {
                cx.scene
                    .line(cx.parent, at + *a, at + *b)
                    .stroke(stroke.clone());
            }
            GlyphPart::Circle { center, radius } => {
                cx.scene
                    .ellipse(cx.parent, at + *center, DVec2::splat(*radius))
                    .no_fill()
                    .stroke(stroke.clone());
            }
            GlyphPart::Polyline(points) => {
                cx.scene
                    .polyline(cx.parent, points.iter().map(|p| at + *p).collect())
                    .no_fill()
                    .stroke(stroke.clone());
            }
            GlyphPart::Bar(a, b) => {
                let (a, b) = (at + *a, at + *b);
                cx.scene
                    .rect(cx.parent, (a.x - b.x).abs(), (a.y - b.y).abs())
                    .move_to(a.x.min(b.x), a.y.min(b.y))
                    .fill(colour)
                    .stroke(stroke.clone());
            }
        }
    }
}

// ============================================================================
// Graphics
// ============================================================================

impl Draw for Rectangle {
    fn draw(&self, cx: &mut DrawContext<'_>) -> DrawResult {
        let node = cx.rect_between(
            dvec2(self.left, self.bottom),
            dvec2(self.right, self.top),
        );
        area_fill(node, self.transparent, self.fill_colour)
            .stroke(Stroke::new(self.line_colour, 1.0));
        Ok(())
    }
}

impl Draw for RoundedRectangle {
    fn draw(&self, cx: &mut DrawContext<'_>) -> DrawResult {
        let r = &self.rect;
        let node = cx
            .rect_between(dvec2(r.left, r.bottom), dvec2(r.right, r.top))
            .radius(self.corner_x_radius, self.corner_y_radius);
        area_fill(node, r.transparent, r.fill_colour)
            .stroke(Stroke::new(r.line_colour, 1.0));
        Ok(())
    }
}

impl Draw for Ellipse {
    fn draw(&self, cx: &mut DrawContext<'_>) -> DrawResult {
        let node = cx.scene.ellipse(
            cx.parent,
            self.center,
            dvec2(self.radius_x, self.radius_y),
        );
        area_fill(node, self.transparent, self.fill_colour)
            .stroke(Stroke::new(self.line_colour, 1.0));
        Ok(())
    }
}

impl Draw for EllipticalArc {
    fn draw(&self, cx: &mut DrawContext<'_>) -> DrawResult {
        let d = arc_path(
            self.center,
            self.radius,
            self.secondary_radius,
            self.start_angle,
            self.end_angle,
        );
        cx.scene
            .path(cx.parent, d)
            .no_fill()
            .stroke(Stroke::new(self.colour, self.line_width));
        Ok(())
    }
}

impl Draw for Arc {
    fn draw(&self, cx: &mut DrawContext<'_>) -> DrawResult {
        let d = arc_path(
            self.center,
            self.radius,
            None,
            self.start_angle,
            self.end_angle,
        );
        cx.scene
            .path(cx.parent, d)
            .no_fill()
            .stroke(Stroke::new(self.colour, self.line_width));
        Ok(())
    }
}

impl Draw for Polyline {
    fn draw(&self, cx: &mut DrawContext<'_>) -> DrawResult {
        let stroke =
            Stroke::new(self.colour, self.line_width).with_dash(self.line_style.dash_array());
        cx.scene
            .polyline(cx.parent, self.points.clone())
            .no_fill()
            .stroke(stroke);

        let n = self.points.len();
        if n < 2 {
            return Ok(());
        }
        // Caps are always solid even on dashed lines
        let cap_stroke = Stroke::new(self.colour, self.line_width);
        let caps = [
            (self.start_shape, self.points[1], self.points[0]),
            (self.end_shape, self.points[n - 2], self.points[n - 1]),
        ];
        for (shape, from, tip) in caps {
            if shape == 0 {
                continue;
            }
            let head = arrowhead(from, tip, self.shape_size);
            let node = cx
                .scene
                .polyline(cx.parent, head.to_vec())
                .stroke(cap_stroke.clone());
            if arrowhead_is_filled(shape) {
                node.fill(self.colour);
            } else {
                node.no_fill();
            }
        }
        Ok(())
    }
}

impl Draw for Polygon {
    fn draw(&self, cx: &mut DrawContext<'_>) -> DrawResult {
        let node = cx.scene.polygon(cx.parent, self.points.clone());
        area_fill(node, self.transparent, self.fill_colour)
            .stroke(Stroke::new(self.line_colour, self.line_width));
        Ok(())
    }
}

impl Draw for Line {
    fn draw(&self, cx: &mut DrawContext<'_>) -> DrawResult {
        cx.scene
            .line(cx.parent, self.start, self.end)
            .stroke(Stroke::new(self.colour, 1.0));
        Ok(())
    }
}

impl Draw for Image {
    fn draw(&self, cx: &mut DrawContext<'_>) -> DrawResult {
        let origin = self.corner1.min(self.corner2);
        let size = (self.corner1 - self.corner2).abs();
        let embedded = (self.embedded && cx.options.embed_images)
            .then(|| cx.doc.icons.get(&self.filename))
            .flatten();
        let href = match embedded {
            Some(bitmap) => bitmap.to_data_uri(),
            None => {
                if self.embedded && cx.options.embed_images {
                    debug!(file = %self.filename, "embedded image not in icon storage");
                }
                self.filename.clone()
            }
        };
        // Undo the page flip so the picture is upright
        cx.scene
            .image(cx.parent, origin, size, href)
            .keep_aspect(self.keep_aspect)
            .transform(Transform::Flip {
                axis: FlipAxis::Y,
                origin: origin + size / 2.0,
            });
        Ok(())
    }
}

impl Draw for TextFrame {
    fn draw(&self, cx: &mut DrawContext<'_>) -> DrawResult {
        let min = dvec2(self.left.min(self.right), self.bottom.min(self.top));
        let max = dvec2(self.left.max(self.right), self.bottom.max(self.top));
        let width = max.x - min.x;

        if !self.transparent || self.show_border {
            let node = area_fill(cx.rect_between(min, max), self.transparent, self.fill_colour);
            if self.show_border {
                node.stroke(Stroke::new(self.border_colour, 1.0));
            }
        }

        let font = cx.font(self.font_id);
        let (justification, offset_x) = match self.alignment {
            1 => (0, self.text_margin),
            2 => (2, width - self.text_margin),
            _ => (1, width / 2.0),
        };
        let text = self.text.replace("~1", "\n");
        let lines = if self.word_wrap {
            let max_width = width - 2.0 * self.text_margin;
            wrap_text(&text, max_width, &font, cx.options.metrics.as_ref())
        } else {
            text.split('\n').map(str::to_string).collect()
        };

        let line_height = cx.options.metrics.line_height(&font);
        let top = dvec2(min.x + offset_x, (min.y + max.y) / 2.0);
        let group = if lines.len() > 1 {
            cx.scene.group(cx.parent).id()
        } else {
            cx.parent
        };
        for (i, line) in lines.iter().enumerate() {
            let placement = TextPlacement {
                location: top - dvec2(0.0, i as f64 * line_height),
                orientation: Orientation::RIGHT,
                justification,
                font_id: self.font_id,
                colour: self.text_colour,
            };
            let l = layout(&placement, &font);
            cx.emit_text(group, line, &l);
        }
        Ok(())
    }
}

// ============================================================================
// Symbols and text
// ============================================================================

impl Draw for Pin {
    fn draw(&self, cx: &mut DrawContext<'_>) -> DrawResult {
        let end = self.location + self.orientation.unit() * self.length;
        cx.scene
            .line(cx.parent, self.location, end)
            .stroke(Stroke::new(self.colour, 1.0));

        if !self.show_name || self.name.is_empty() {
            return Ok(());
        }
        let font = cx.font(Sheet::DEFAULT_FONT_ID);
        let o = self.orientation.quarter_turns();
        let justification = if o == 1 || o == 2 { 0 } else { 2 };
        // Keep the name clear of the pin end
        let pad = (f64::from(o) - 1.0) * 3.0;
        let pad = if o % 2 == 0 { dvec2(pad, 0.0) } else { dvec2(0.0, pad) };
        let placement = TextPlacement {
            location: self.location - dvec2(0.0, font.size / 2.0 - 1.0) + pad,
            orientation: self.orientation,
            justification,
            font_id: Sheet::DEFAULT_FONT_ID,
            colour: self.colour,
        };
        cx.text(&placement, &self.name);
        Ok(())
    }
}

impl Draw for Label {
    fn draw(&self, cx: &mut DrawContext<'_>) -> DrawResult {
        let doc = cx.doc;
        let text = cx.resolve(&self.text.text, |name| doc.sheet_parameter(name));
        cx.text(&TextPlacement::from(&self.text), &text);
        Ok(())
    }
}

impl Draw for NetLabel {
    fn draw(&self, cx: &mut DrawContext<'_>) -> DrawResult {
        let doc = cx.doc;
        let text = cx.resolve(&self.text.text, |name| doc.sheet_parameter(name));
        cx.text(&TextPlacement::from(&self.text), &text);
        Ok(())
    }
}

impl Draw for Designator {
    fn draw(&self, cx: &mut DrawContext<'_>) -> DrawResult {
        let text = cx
            .doc
            .full_designator(cx.object)
            .unwrap_or_else(|| self.text.text.clone());
        cx.text(&TextPlacement::from(&self.text), &text);
        Ok(())
    }
}

impl Draw for Parameter {
    fn draw(&self, cx: &mut DrawContext<'_>) -> DrawResult {
        if self.is_implementation_parameter {
            return Ok(());
        }
        let doc = cx.doc;
        let id = cx.object;
        let text = if doc.owning_component(id).is_some() {
            cx.resolve(&self.text.text, |name| doc.sibling_parameter(id, name))
        } else {
            cx.resolve(&self.text.text, |name| doc.sheet_parameter(name))
        };

        let placement = TextPlacement::from(&self.text);
        let font = cx.font(placement.font_id);
        let mut l = layout(&placement, &font);
        l.font.baseline = Some(match placement.orientation.quarter_turns() {
            0 | 1 => "hanging",
            _ => "text-top",
        });
        cx.emit_text(cx.parent, &text, &l);
        Ok(())
    }
}

impl Draw for SheetFilename {
    fn draw(&self, cx: &mut DrawContext<'_>) -> DrawResult {
        cx.text(&TextPlacement::from(&self.text), &self.text.text);
        Ok(())
    }
}

impl Draw for SheetName {
    fn draw(&self, cx: &mut DrawContext<'_>) -> DrawResult {
        cx.text(&TextPlacement::from(&self.text), &self.text.text);
        Ok(())
    }
}

// ============================================================================
// Hierarchy
// ============================================================================

impl Draw for SheetSymbol {
    fn draw(&self, cx: &mut DrawContext<'_>) -> DrawResult {
        let top_left = self.location;
        let bottom_right = top_left + dvec2(self.width, -self.height);
        cx.rect_between(top_left, bottom_right)
            .fill(self.fill_colour)
            .stroke(Stroke::new(self.line_colour, 1.0));
        Ok(())
    }
}

/// Size of a sheet entry's outline
const ENTRY_WIDTH: f64 = 15.0;
const ENTRY_HEIGHT: f64 = 7.5;

impl Draw for SheetEntry {
    fn draw(&self, cx: &mut DrawContext<'_>) -> DrawResult {
        if let SheetEntryStyle::Other(style) = &self.style {
            return unsupported(format!("sheet entry style {style:?}"));
        }
        let Some(ObjectKind::SheetSymbol(symbol)) = cx.parent_object() else {
            return unsupported("sheet entry outside a sheet symbol");
        };
        let Some(angle) = [0.0, 180.0, 90.0, 270.0].get(usize::from(self.side)).copied() else {
            return unsupported(format!("sheet entry side {}", self.side));
        };

        let x = symbol.location.x;
        let y = symbol.location.y - self.distance_from_top - ENTRY_HEIGHT / 2.0;
        let outline = make_port(self.io_type, x, y, ENTRY_WIDTH, ENTRY_HEIGHT);
        cx.scene
            .polyline(cx.parent, outline)
            .fill(self.fill_colour)
            .stroke(Stroke::new(self.colour, 1.0))
            .transform(Transform::Rotate {
                angle,
                origin: dvec2(x + symbol.width / 2.0, y + ENTRY_HEIGHT / 2.0),
            });

        let inset = ENTRY_WIDTH + 5.0;
        let mut text_x = x + inset;
        if self.side == 1 {
            text_x += symbol.width - 2.0 * inset;
        }
        let placement = TextPlacement {
            location: dvec2(text_x, y),
            orientation: Orientation::from_raw((angle / 90.0) as i32),
            justification: [0, 2, 2, 0][usize::from(self.side)],
            font_id: self.font_id,
            colour: self.text_colour,
        };
        cx.text(&placement, &self.name);
        Ok(())
    }
}

// ============================================================================
// Harnesses
// ============================================================================

impl Draw for Harness {
    fn draw(&self, cx: &mut DrawContext<'_>) -> DrawResult {
        let top_left = self.location;
        let bottom_right = top_left + dvec2(self.width, -self.height);
        cx.rect_between(top_left, bottom_right)
            .fill(self.area_colour)
            .stroke(Stroke::new(self.colour, 1.0));
        let outline = harness_outline(
            self.location,
            self.width,
            self.height,
            self.side,
            self.primary_connection_position,
        );
        cx.scene
            .polyline(cx.parent, outline)
            .no_fill()
            .stroke(Stroke::new(self.colour, 1.0));
        Ok(())
    }
}

impl Draw for HarnessPin {
    fn draw(&self, cx: &mut DrawContext<'_>) -> DrawResult {
        let Some(ObjectKind::Harness(harness)) = cx.parent_object() else {
            return unsupported("harness entry outside a harness connector");
        };
        let (x, justification) = match self.side {
            1 => (harness.location.x + harness.width - 3.0, 2),
            _ => (harness.location.x + 3.0, 0),
        };
        let placement = TextPlacement {
            location: dvec2(x, harness.location.y - self.distance_from_top),
            orientation: Orientation::RIGHT,
            justification,
            font_id: self.font_id,
            colour: self.text_colour,
        };
        cx.text(&placement, &self.name);
        Ok(())
    }
}

impl Draw for HarnessWire {
    fn draw(&self, cx: &mut DrawContext<'_>) -> DrawResult {
        cx.scene
            .polyline(cx.parent, self.points.clone())
            .no_fill()
            .stroke(Stroke::new(self.colour, self.line_width));
        Ok(())
    }
}

impl Draw for HarnessLabel {
    fn draw(&self, cx: &mut DrawContext<'_>) -> DrawResult {
        cx.text(&TextPlacement::from(&self.text), &self.text.text);
        Ok(())
    }
}
