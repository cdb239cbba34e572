//! Schematic rendering
//!
//! This module is organized into submodules:
//! - `visibility`: part and display-mode filtering
//! - `geometry`: outlines, arrowheads, arcs and power port glyphs
//! - `text`: text anchoring, rotation and wrapping
//! - `draw`: per-kind drawing rules
//! - `crossout`: post-render cross-out of a component
//!
//! A render is a single pass over the document in layer order. Each visible
//! object is drawn into the schematic group, whose transform maps document
//! space (Y up, origin bottom-left) onto the page.

pub mod crossout;
pub mod draw;
pub mod geometry;
pub mod text;
pub mod visibility;

pub use crossout::CrossOutStyle;
pub use text::{FontMetrics, ProportionalMetrics};
pub use visibility::is_visible;

use std::collections::HashMap;

use glam::DVec2;

use crate::errors::{RenderError, Warning};
use crate::log::{debug, warn};
use crate::model::{ObjectId, SchematicDocument, Sheet};
use crate::scene::{NodeId, Scene, Transform, svg};
use crate::types::Viewport;
use draw::{Draw, DrawContext};

/// Render settings
pub struct RenderOptions {
    pub viewport: Viewport,
    /// Text measurement for word wrapping
    pub metrics: Box<dyn FontMetrics>,
    /// Inline images found in the icon storage as `data:` URIs
    pub embed_images: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            viewport: Viewport::default(),
            metrics: Box::new(ProportionalMetrics),
            embed_images: true,
        }
    }
}

impl std::fmt::Debug for RenderOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderOptions")
            .field("viewport", &self.viewport)
            .field("embed_images", &self.embed_images)
            .finish_non_exhaustive()
    }
}

impl RenderOptions {
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Set the viewport from raw sizes, rejecting non-positive or non-finite ones
    pub fn with_viewport_size(self, width: f64, height: f64) -> Result<Self, RenderError> {
        let viewport = Viewport::try_new(width, height)
            .map_err(|_| RenderError::InvalidViewport { width, height })?;
        Ok(self.with_viewport(viewport))
    }

    pub fn with_metrics(mut self, metrics: impl FontMetrics + 'static) -> Self {
        self.metrics = Box::new(metrics);
        self
    }

    pub fn with_embed_images(mut self, embed: bool) -> Self {
        self.embed_images = embed;
        self
    }
}

/// Fit of the sheet inside the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageTransform {
    pub scale: f64,
    /// Centering offset, in viewport units
    pub translate: DVec2,
    pub sheet_height: f64,
}

impl PageTransform {
    /// Largest uniform scale that fits the sheet, centred on both axes
    pub fn fit(viewport: &Viewport, sheet: &Sheet) -> Result<Self, RenderError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(sheet.width) || !valid(sheet.height) {
            return Err(RenderError::InvalidSheet {
                width: sheet.width,
                height: sheet.height,
            });
        }
        let (vw, vh) = (viewport.width(), viewport.height());
        let scale = (vh / sheet.height).min(vw / sheet.width);
        Ok(PageTransform {
            scale,
            translate: DVec2::new(
                (vw - sheet.width * scale) / 2.0,
                (vh - sheet.height * scale) / 2.0,
            ),
            sheet_height: sheet.height,
        })
    }

    /// Map a document point to viewport coordinates
    pub fn apply(&self, p: DVec2) -> DVec2 {
        let page = DVec2::new(p.x, self.sheet_height - p.y);
        page * self.scale + self.translate
    }
}

/// Output of a render pass
#[derive(Debug, Clone)]
pub struct RenderedSchematic {
    pub scene: Scene,
    /// Scaled and centred page group
    pub frame: NodeId,
    /// Y-flipped group holding the drawn objects
    pub schematic: NodeId,
    pub transform: PageTransform,
    pub viewport: Viewport,
    /// Problems that did not stop the render
    pub warnings: Vec<Warning>,
    handles: HashMap<ObjectId, Vec<NodeId>>,
}

impl RenderedSchematic {
    /// Scene nodes emitted for a document object
    pub fn handles(&self, id: ObjectId) -> &[NodeId] {
        self.handles.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn to_svg(&self) -> facet_svg::Svg {
        svg::to_svg(&self.scene, self.viewport.width(), self.viewport.height())
    }

    pub fn to_svg_string(&self) -> Result<String, RenderError> {
        svg::to_svg_string(&self.to_svg())
    }
}

/// Objects in draw order: layer 0 first, document order within a layer
pub fn render_order(doc: &SchematicDocument) -> Vec<ObjectId> {
    let mut order: Vec<_> = doc.iter().map(|(id, o)| (o.kind.layer(), id)).collect();
    order.sort_by_key(|(layer, _)| *layer);
    order.into_iter().map(|(_, id)| id).collect()
}

/// Render `doc` into a scene sized for `options.viewport`.
///
/// Fails only when the sheet itself is unusable; objects that cannot be drawn
/// are skipped and reported in [`RenderedSchematic::warnings`].
pub fn render(
    doc: &SchematicDocument,
    options: &RenderOptions,
) -> Result<RenderedSchematic, RenderError> {
    let transform = PageTransform::fit(&options.viewport, &doc.sheet)?;
    debug!(
        scale = transform.scale,
        tx = transform.translate.x,
        ty = transform.translate.y,
        objects = doc.len(),
        "render"
    );

    let mut scene = Scene::new();
    let frame = scene
        .group(Scene::ROOT)
        .element_id("frame")
        .transform(Transform::Translate(transform.translate))
        .transform(Transform::Scale(DVec2::splat(transform.scale)))
        .id();
    scene
        .rect(frame, doc.sheet.width, doc.sheet.height)
        .fill(doc.sheet.area_colour);
    let schematic = scene
        .group(frame)
        .element_id("schematic")
        .transform(Transform::Translate(DVec2::new(0.0, doc.sheet.height)))
        .transform(Transform::Scale(DVec2::new(1.0, -1.0)))
        .id();

    let mut warnings = Vec::new();
    let mut handles = HashMap::new();
    for id in render_order(doc) {
        if !is_visible(doc, id) {
            continue;
        }
        let Some(object) = doc.get(id) else {
            continue;
        };

        let first = scene.len();
        let mut cx = DrawContext {
            doc,
            scene: &mut scene,
            parent: schematic,
            options,
            warnings: &mut warnings,
            object: id,
        };
        if let Err(draw::Unsupported(what)) = object.kind.draw(&mut cx) {
            warn!(object = %id, what, "skipped unsupported object");
            warnings.push(Warning::UnsupportedObject { object: id, what });
        }
        let emitted: Vec<NodeId> = (first..scene.len()).map(NodeId).collect();
        if !emitted.is_empty() {
            handles.insert(id, emitted);
        }
    }

    Ok(RenderedSchematic {
        scene,
        frame,
        schematic,
        transform,
        viewport: options.viewport,
        warnings,
        handles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::*;
    use crate::scene::{Paint, Primitive, TextAnchor};
    use crate::types::{Color, Orientation};
    use glam::dvec2;

    fn sheet(width: f64, height: f64) -> Sheet {
        Sheet::new(width, height)
    }

    #[test]
    fn page_transform_is_width_limited_and_centred() {
        let vp = Viewport::try_new(500.0, 500.0).unwrap();
        let t = PageTransform::fit(&vp, &sheet(1000.0, 800.0)).unwrap();
        assert_eq!(t.scale, 0.5);
        assert_eq!(t.translate, dvec2(0.0, 50.0));
        assert_eq!(t.apply(dvec2(0.0, 800.0)), dvec2(0.0, 50.0));
        assert_eq!(t.apply(dvec2(1000.0, 0.0)), dvec2(500.0, 450.0));
    }

    #[test]
    fn zero_sized_sheet_is_rejected() {
        let err = PageTransform::fit(&Viewport::default(), &sheet(0.0, 10.0)).unwrap_err();
        assert!(matches!(err, RenderError::InvalidSheet { .. }));
    }

    #[test]
    fn bad_viewport_size_is_rejected() {
        let err = RenderOptions::default()
            .with_viewport_size(-1.0, 10.0)
            .unwrap_err();
        assert!(matches!(err, RenderError::InvalidViewport { .. }));
    }

    #[test]
    fn render_order_is_stable_by_layer() {
        let mut doc = SchematicDocument::default();
        let wire = doc.push(SchObject::new(Wire::default()));
        let rect = doc.push(SchObject::new(Rectangle::default()));
        let label = doc.push(SchObject::new(Label::default()));
        let symbol = doc.push(SchObject::new(SheetSymbol::default()));
        assert_eq!(render_order(&doc), vec![rect, symbol, wire, label]);
    }

    #[test]
    fn frame_background_and_flip() {
        let doc = SchematicDocument::new(sheet(1000.0, 800.0));
        let r = render(&doc, &RenderOptions::default()).unwrap();
        let frame = r.scene.get(r.frame).unwrap();
        assert_eq!(frame.children().len(), 2);
        let bg = r.scene.get(frame.children()[0]).unwrap();
        assert_eq!(bg.fill, Some(Paint::Color(doc.sheet.area_colour)));
        let schematic = r.scene.get(r.schematic).unwrap();
        assert_eq!(
            schematic.transforms,
            vec![
                Transform::Translate(dvec2(0.0, 800.0)),
                Transform::Scale(dvec2(1.0, -1.0))
            ]
        );
    }

    #[test]
    fn handles_cover_every_emitted_node() {
        let mut doc = SchematicDocument::default();
        let noerc = doc.push(SchObject::new(NoErc {
            location: dvec2(10.0, 10.0),
            colour: Color::BLACK,
        }));
        let r = render(&doc, &RenderOptions::default()).unwrap();
        assert_eq!(r.handles(noerc).len(), 2);
        for id in r.handles(noerc) {
            assert!(matches!(
                r.scene.get(*id).unwrap().primitive,
                Primitive::Line { .. }
            ));
        }
    }

    #[test]
    fn invisible_objects_emit_nothing() {
        let mut doc = SchematicDocument::default();
        let c = doc.push(SchObject::new(Component {
            current_part_id: Some(1),
            display_mode: 0,
            part_count: 2,
            ..Default::default()
        }));
        let other_part = doc.push_child(
            c,
            SchObject::new(Line::default()).with_owner(Some(2), Some(0)),
        );
        let hidden = doc.push(SchObject::new(Line::default()).with_hidden(true));
        let r = render(&doc, &RenderOptions::default()).unwrap();
        assert!(r.handles(other_part).is_empty());
        assert!(r.handles(hidden).is_empty());
        assert!(r.handles(c).is_empty());
    }

    #[test]
    fn unsupported_objects_warn_and_continue() {
        let mut doc = SchematicDocument::default();
        let unknown = doc.push(SchObject::new(ObjectKind::Unknown { record: 99 }));
        let port = doc.push(SchObject::new(PowerPort {
            is_off_sheet_connector: true,
            ..Default::default()
        }));
        let wire = doc.push(SchObject::new(Wire {
            points: vec![dvec2(0.0, 0.0), dvec2(10.0, 0.0)],
            ..Default::default()
        }));
        let r = render(&doc, &RenderOptions::default()).unwrap();
        assert_eq!(r.warnings.len(), 2);
        assert!(matches!(
            &r.warnings[0],
            Warning::UnsupportedObject { object, .. } if *object == unknown
        ));
        assert!(matches!(
            &r.warnings[1],
            Warning::UnsupportedObject { object, .. } if *object == port
        ));
        assert_eq!(r.handles(wire).len(), 1);
    }

    #[test]
    fn missing_font_falls_back_with_warning() {
        let mut doc = SchematicDocument::default();
        let mut text = TextProps::new(dvec2(5.0, 5.0), "hello");
        text.font_id = 42;
        let label = doc.push(SchObject::new(Label { text }));
        let r = render(&doc, &RenderOptions::default()).unwrap();
        assert_eq!(
            r.warnings,
            vec![Warning::MissingFont {
                object: label,
                font_id: 42
            }]
        );
        assert_eq!(r.handles(label).len(), 1);
    }

    #[test]
    fn parameter_references_resolve_or_stay_literal() {
        let mut doc = SchematicDocument::default();
        doc.push(SchObject::new(Parameter::new("Revision", "B")));
        let hit = doc.push(SchObject::new(Label {
            text: TextProps::new(DVec2::ZERO, "=revision"),
        }));
        let miss = doc.push(SchObject::new(NetLabel {
            text: TextProps::new(DVec2::ZERO, "=Nope"),
        }));
        let r = render(&doc, &RenderOptions::default()).unwrap();

        let content = |id: ObjectId| match &r.scene.get(r.handles(id)[0]).unwrap().primitive {
            Primitive::Text { content, .. } => content.clone(),
            other => panic!("expected text, got {other:?}"),
        };
        assert_eq!(content(hit), "B");
        assert_eq!(content(miss), "=Nope");
        assert_eq!(
            r.warnings,
            vec![Warning::LookupMiss {
                object: miss,
                name: "Nope".into()
            }]
        );
    }

    #[test]
    fn component_parameters_resolve_against_siblings() {
        let mut doc = SchematicDocument::default();
        let c = doc.push(SchObject::new(Component::default()));
        doc.push_child(c, SchObject::new(Parameter::new("Value", "4k7")));
        let comment = doc.push_child(c, SchObject::new(Parameter::new("Comment", "=Value")));
        let mut implementation = Parameter::new("Model", "R0603");
        implementation.is_implementation_parameter = true;
        let model = doc.push_child(c, SchObject::new(implementation));

        let r = render(&doc, &RenderOptions::default()).unwrap();
        let node = r.scene.get(r.handles(comment)[0]).unwrap();
        let Primitive::Text { content, .. } = &node.primitive else {
            panic!("expected text");
        };
        assert_eq!(content, "4k7");
        assert!(r.handles(model).is_empty());
        assert!(r.warnings.is_empty());
    }

    #[test]
    fn polyline_caps_fill_by_their_own_shape() {
        let mut doc = SchematicDocument::default();
        let id = doc.push(SchObject::new(Polyline {
            points: vec![dvec2(0.0, 0.0), dvec2(10.0, 0.0), dvec2(10.0, 10.0)],
            start_shape: 1,
            end_shape: 2,
            line_style: LineStyle::Dashed,
            ..Default::default()
        }));
        let r = render(&doc, &RenderOptions::default()).unwrap();
        let nodes: Vec<_> = r
            .handles(id)
            .iter()
            .map(|n| r.scene.get(*n).unwrap())
            .collect();
        assert_eq!(nodes.len(), 3);
        assert_eq!(
            nodes[0].stroke.as_ref().unwrap().dash,
            Some(vec![4.0, 4.0])
        );
        assert_eq!(nodes[1].fill, Some(Paint::None));
        assert_eq!(nodes[2].fill, Some(Paint::Color(Color::BLACK)));
    }

    #[test]
    fn embedded_image_becomes_data_uri() {
        use crate::storage::{Bitmap, IconStorage};

        let mut doc = SchematicDocument::default();
        let mut icons = IconStorage::default();
        icons.insert(Bitmap {
            filename: "logo.bmp".into(),
            data: b"BM".to_vec(),
            offset: 0,
        });
        doc.icons = icons;
        let image = Image {
            corner1: dvec2(0.0, 0.0),
            corner2: dvec2(20.0, 10.0),
            filename: "logo.bmp".into(),
            embedded: true,
            keep_aspect: true,
        };
        let id = doc.push(SchObject::new(image));

        let href = |opts: &RenderOptions| {
            let r = render(&doc, opts).unwrap();
            match &r.scene.get(r.handles(id)[0]).unwrap().primitive {
                Primitive::Image { href, .. } => href.clone(),
                other => panic!("expected image, got {other:?}"),
            }
        };
        assert_eq!(href(&RenderOptions::default()), "data:image/bmp;base64,Qk0=");
        assert_eq!(
            href(&RenderOptions::default().with_embed_images(false)),
            "logo.bmp"
        );
    }

    #[test]
    fn linked_image_keeps_its_filename() {
        use crate::storage::{Bitmap, IconStorage};

        let mut doc = SchematicDocument::default();
        let mut icons = IconStorage::default();
        icons.insert(Bitmap {
            filename: "logo.bmp".into(),
            data: b"BM".to_vec(),
            offset: 0,
        });
        doc.icons = icons;
        let id = doc.push(SchObject::new(Image {
            corner1: dvec2(0.0, 0.0),
            corner2: dvec2(20.0, 10.0),
            filename: "logo.bmp".into(),
            embedded: false,
            keep_aspect: false,
        }));

        let r = render(&doc, &RenderOptions::default()).unwrap();
        match &r.scene.get(r.handles(id)[0]).unwrap().primitive {
            Primitive::Image { href, .. } => assert_eq!(href, "logo.bmp"),
            other => panic!("expected image, got {other:?}"),
        }
    }

    /// Emitted text nodes of an object as (content, position, anchor)
    fn texts(r: &RenderedSchematic, id: ObjectId) -> Vec<(String, DVec2, TextAnchor)> {
        r.handles(id)
            .iter()
            .filter_map(|n| {
                let node = r.scene.get(*n)?;
                match &node.primitive {
                    Primitive::Text { content, position } => Some((
                        content.clone(),
                        *position,
                        node.font.as_ref()?.anchor,
                    )),
                    _ => None,
                }
            })
            .collect()
    }

    #[test]
    fn port_draws_outline_and_name() {
        let mut doc = SchematicDocument::default();
        let id = doc.push(SchObject::new(Port {
            location: dvec2(10.0, 50.0),
            width: 40.0,
            height: 10.0,
            name: "CLK".into(),
            font_id: 1,
            fill_colour: Color(0x80FFFF),
            ..Default::default()
        }));
        let r = render(&doc, &RenderOptions::default()).unwrap();
        assert!(r.warnings.is_empty(), "{:?}", r.warnings);

        let handles = r.handles(id);
        assert_eq!(handles.len(), 2);
        let outline = r.scene.get(handles[0]).unwrap();
        assert_eq!(
            outline.primitive,
            Primitive::Polyline {
                points: vec![
                    dvec2(10.0, 45.0),
                    dvec2(10.0, 55.0),
                    dvec2(50.0, 55.0),
                    dvec2(50.0, 45.0),
                    dvec2(10.0, 45.0),
                ]
            }
        );
        assert_eq!(outline.fill, Some(Paint::Color(Color(0x80FFFF))));
        assert_eq!(
            texts(&r, id),
            vec![("CLK".to_string(), dvec2(15.0, 45.0), TextAnchor::Start)]
        );
    }

    /// One unit per character
    struct Mono;

    impl FontMetrics for Mono {
        fn text_width(&self, text: &str, _font: &Font) -> f64 {
            text.chars().count() as f64
        }
    }

    #[test]
    fn wrapped_text_frame_groups_its_lines() {
        let mut doc = SchematicDocument::default();
        let id = doc.push(SchObject::new(TextFrame {
            left: 0.0,
            bottom: 0.0,
            right: 14.0,
            top: 40.0,
            text: "alpha beta gamma~1delta".into(),
            font_id: 1,
            word_wrap: true,
            alignment: 1,
            text_margin: 2.0,
            ..Default::default()
        }));
        let r = render(&doc, &RenderOptions::default().with_metrics(Mono)).unwrap();

        let handles = r.handles(id);
        assert_eq!(handles.len(), 5);
        assert!(matches!(
            r.scene.get(handles[0]).unwrap().primitive,
            Primitive::Rect { .. }
        ));
        let group = r.scene.get(handles[1]).unwrap();
        assert_eq!(group.primitive, Primitive::Group);
        assert_eq!(group.children(), &handles[2..]);
        assert_eq!(
            texts(&r, id),
            vec![
                ("alpha beta".to_string(), dvec2(2.0, 20.0), TextAnchor::Start),
                ("gamma".to_string(), dvec2(2.0, 10.0), TextAnchor::Start),
                ("delta".to_string(), dvec2(2.0, 0.0), TextAnchor::Start),
            ]
        );
    }

    #[test]
    fn single_line_text_frame_has_no_group() {
        let mut doc = SchematicDocument::default();
        let id = doc.push(SchObject::new(TextFrame {
            right: 100.0,
            top: 20.0,
            text: "short".into(),
            font_id: 1,
            transparent: true,
            word_wrap: true,
            ..Default::default()
        }));
        let r = render(&doc, &RenderOptions::default().with_metrics(Mono)).unwrap();
        assert_eq!(r.handles(id).len(), 1);
        assert_eq!(
            texts(&r, id),
            vec![("short".to_string(), dvec2(50.0, 10.0), TextAnchor::Middle)]
        );
    }

    #[test]
    fn pin_name_is_padded_away_from_the_pin_end() {
        let mut doc = SchematicDocument::default();
        let pins: Vec<_> = (0..4)
            .map(|o| {
                doc.push(SchObject::new(Pin {
                    location: dvec2(100.0, 100.0),
                    length: 10.0,
                    orientation: Orientation::from_raw(o),
                    name: "A".into(),
                    show_name: true,
                    colour: Color::BLACK,
                }))
            })
            .collect();
        let r = render(&doc, &RenderOptions::default()).unwrap();

        let expected = [
            (dvec2(97.0, 96.0), TextAnchor::End),
            (dvec2(100.0, 96.0), TextAnchor::Start),
            (dvec2(103.0, 96.0), TextAnchor::Start),
            (dvec2(100.0, 102.0), TextAnchor::End),
        ];
        for (pin, (position, anchor)) in pins.iter().zip(expected) {
            assert_eq!(r.handles(*pin).len(), 2);
            assert_eq!(texts(&r, *pin), vec![("A".to_string(), position, anchor)]);
        }
    }

    fn sheet_symbol() -> SheetSymbol {
        SheetSymbol {
            location: dvec2(0.0, 100.0),
            width: 80.0,
            height: 60.0,
            ..Default::default()
        }
    }

    #[test]
    fn sheet_entry_on_the_right_is_rotated_about_the_symbol() {
        let mut doc = SchematicDocument::default();
        let symbol = doc.push(SchObject::new(sheet_symbol()));
        let entry = doc.push_child(
            symbol,
            SchObject::new(SheetEntry {
                name: "IN".into(),
                side: 1,
                distance_from_top: 20.0,
                font_id: 1,
                ..Default::default()
            }),
        );
        let r = render(&doc, &RenderOptions::default()).unwrap();
        assert!(r.warnings.is_empty(), "{:?}", r.warnings);

        let outline = r.scene.get(r.handles(entry)[0]).unwrap();
        assert_eq!(
            outline.transforms,
            vec![Transform::Rotate {
                angle: 180.0,
                origin: dvec2(40.0, 80.0)
            }]
        );
        assert_eq!(
            texts(&r, entry),
            vec![("IN".to_string(), dvec2(60.0, 76.25), TextAnchor::End)]
        );
    }

    #[test]
    fn sheet_entry_with_other_style_is_skipped() {
        let mut doc = SchematicDocument::default();
        let symbol = doc.push(SchObject::new(sheet_symbol()));
        let entry = doc.push_child(
            symbol,
            SchObject::new(SheetEntry {
                name: "IN".into(),
                style: SheetEntryStyle::Other("Arrow".into()),
                font_id: 1,
                ..Default::default()
            }),
        );
        let r = render(&doc, &RenderOptions::default()).unwrap();
        assert!(r.handles(entry).is_empty());
        assert!(matches!(
            r.warnings.as_slice(),
            [Warning::UnsupportedObject { object, .. }] if *object == entry
        ));
    }

    #[test]
    fn harness_pin_needs_a_harness_parent() {
        let mut doc = SchematicDocument::default();
        let symbol = doc.push(SchObject::new(sheet_symbol()));
        let stray = doc.push_child(
            symbol,
            SchObject::new(HarnessPin {
                name: "D0".into(),
                font_id: 1,
                ..Default::default()
            }),
        );
        let harness = doc.push(SchObject::new(Harness {
            location: dvec2(0.0, 100.0),
            width: 50.0,
            height: 40.0,
            ..Default::default()
        }));
        let pin = doc.push_child(
            harness,
            SchObject::new(HarnessPin {
                name: "D1".into(),
                side: 1,
                distance_from_top: 10.0,
                font_id: 1,
                ..Default::default()
            }),
        );
        let r = render(&doc, &RenderOptions::default()).unwrap();

        assert!(r.handles(stray).is_empty());
        assert!(matches!(
            r.warnings.as_slice(),
            [Warning::UnsupportedObject { object, .. }] if *object == stray
        ));
        assert_eq!(
            texts(&r, pin),
            vec![("D1".to_string(), dvec2(47.0, 90.0), TextAnchor::End)]
        );
    }

    #[test]
    fn uncatalogued_power_port_draws_a_bar() {
        let mut doc = SchematicDocument::default();
        let colour = Color(0x0000FF);
        let id = doc.push(SchObject::new(PowerPort {
            location: dvec2(50.0, 50.0),
            style: PowerPortStyle::Arrow,
            orientation: Orientation::UP,
            colour,
            ..Default::default()
        }));
        let r = render(&doc, &RenderOptions::default()).unwrap();
        assert!(r.warnings.is_empty(), "{:?}", r.warnings);

        let handles = r.handles(id);
        assert_eq!(handles.len(), 1);
        let bar = r.scene.get(handles[0]).unwrap();
        assert_eq!(
            bar.primitive,
            Primitive::Rect {
                origin: dvec2(40.0, 50.0),
                size: dvec2(20.0, 10.0),
                radius: DVec2::ZERO,
            }
        );
        assert_eq!(bar.fill, Some(Paint::Color(colour)));
    }
}
