//! Cross-out of an already rendered component
//!
//! Marks a component as not fitted: its body rectangles and lines are
//! re-coloured in a muted palette and an X is drawn over their extent. The
//! scene is edited in place through the node handles recorded at render time.

use glam::dvec2;

use super::RenderedSchematic;
use crate::log::debug;
use crate::model::{ObjectId, ObjectKind, SchematicDocument};
use crate::scene::{Paint, Primitive, Stroke};
use crate::types::Color;

/// Colours used for a crossed-out component
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossOutStyle {
    /// Outline colour for the component's rectangles and lines
    pub stroke: Color,
    /// Fill for rectangles that had one
    pub fill: Color,
    /// Colour of the X
    pub mark: Color,
    pub mark_width: f64,
}

impl Default for CrossOutStyle {
    fn default() -> Self {
        CrossOutStyle {
            stroke: Color::from_rgb(0x99, 0x99, 0x99),
            fill: Color::from_rgb(0xe6, 0xe6, 0xe6),
            mark: Color::from_rgb(0xcc, 0x33, 0x33),
            mark_width: 2.0,
        }
    }
}

impl RenderedSchematic {
    /// Cross out the component whose designator reads `reference` (with the
    /// part letter for multi-part components). Returns `false`, leaving the
    /// scene untouched, when no drawn designator matches.
    pub fn cross_out(&mut self, doc: &SchematicDocument, reference: &str) -> bool {
        self.cross_out_with(doc, reference, &CrossOutStyle::default())
    }

    pub fn cross_out_with(
        &mut self,
        doc: &SchematicDocument,
        reference: &str,
        style: &CrossOutStyle,
    ) -> bool {
        let Some(designator) = self.find_designator(doc, reference) else {
            debug!(reference, "no drawn designator matches");
            return false;
        };
        let Some((component, _)) = doc.owning_component(designator) else {
            return false;
        };

        let targets: Vec<_> = doc
            .descendants(component)
            .into_iter()
            .flat_map(|id| self.handles(id).to_vec())
            .filter(|node| {
                self.scene.get(*node).is_some_and(|n| {
                    matches!(n.primitive, Primitive::Rect { .. } | Primitive::Line { .. })
                })
            })
            .collect();

        let bbox = self.scene.bbox_of(targets.iter().copied());
        if bbox.is_empty() {
            return false;
        }

        for id in &targets {
            let Some(node) = self.scene.get_mut(*id) else {
                continue;
            };
            if let Some(stroke) = node.stroke.as_mut() {
                stroke.color = style.stroke;
            } else {
                node.stroke = Some(Stroke::new(style.stroke, 1.0));
            }
            if matches!(node.primitive, Primitive::Rect { .. })
                && matches!(node.fill, Some(Paint::Color(_)))
            {
                node.fill = Some(Paint::Color(style.fill));
            }
        }

        let mark = Stroke::new(style.mark, style.mark_width);
        let (min, max) = (bbox.min, bbox.max);
        let a = self
            .scene
            .line(self.schematic, min, max)
            .stroke(mark.clone())
            .id();
        let b = self
            .scene
            .line(self.schematic, dvec2(min.x, max.y), dvec2(max.x, min.y))
            .stroke(mark)
            .id();
        self.handles.entry(component).or_default().extend([a, b]);
        debug!(reference, nodes = targets.len(), "crossed out");
        true
    }

    fn find_designator(&self, doc: &SchematicDocument, reference: &str) -> Option<ObjectId> {
        doc.iter()
            .filter(|(_, o)| matches!(o.kind, ObjectKind::Designator(_)))
            .map(|(id, _)| id)
            .find(|id| {
                !self.handles(*id).is_empty()
                    && doc.full_designator(*id).as_deref() == Some(reference)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Component, Designator, SchObject, TextProps};
    use crate::render::{RenderOptions, render};

    #[test]
    fn component_without_body_is_left_alone() {
        let mut doc = SchematicDocument::default();
        let c = doc.push(SchObject::new(Component::default()));
        doc.push_child(
            c,
            SchObject::new(Designator {
                text: TextProps::new(dvec2(0.0, 0.0), "U1"),
            }),
        );
        let mut r = render(&doc, &RenderOptions::default()).unwrap();
        let before = r.scene.clone();

        assert!(!r.cross_out(&doc, "U1"));
        assert_eq!(r.scene.len(), before.len());
        for ((_, a), (_, b)) in r.scene.iter().zip(before.iter()) {
            assert_eq!(a, b);
        }
        assert!(r.handles(c).is_empty());
    }
}
