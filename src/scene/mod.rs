//! Scene graph
//!
//! A retained tree of drawing primitives. The renderer emits nodes through a
//! small fluent builder ([`NodeMut`]) and keeps the returned [`NodeId`]s so
//! that later passes (cross-out) can restyle what was drawn.
//!
//! Coordinates are whatever the enclosing groups' transforms make of them;
//! the scene does not interpret units.

pub mod svg;

use glam::DVec2;

use crate::types::{BBox, Color};

/// Index of a node in its scene
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Fill of a closed shape or text
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Paint {
    None,
    Color(Color),
}

/// Outline of a shape
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    /// Dash lengths, `None` for a solid line
    pub dash: Option<Vec<f64>>,
}

impl Stroke {
    pub fn new(color: Color, width: f64) -> Self {
        Stroke {
            color,
            width,
            dash: None,
        }
    }

    pub fn with_dash(mut self, dash: Option<Vec<f64>>) -> Self {
        self.dash = dash;
        self
    }
}

/// Horizontal text alignment relative to the text position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

impl TextAnchor {
    /// Anchor for an Altium justification code (0..=8, column = code % 3)
    pub fn from_justification(justification: u8) -> Self {
        match justification % 3 {
            0 => TextAnchor::Start,
            1 => TextAnchor::Middle,
            _ => TextAnchor::End,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// Mirror axis of a flip transform
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlipAxis {
    /// Mirror horizontally (x → -x)
    X,
    /// Mirror vertically (y → -y)
    Y,
}

/// One step of a node's transform list, applied in order
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Transform {
    Translate(DVec2),
    Scale(DVec2),
    /// Degrees, about `origin`
    Rotate { angle: f64, origin: DVec2 },
    Flip { axis: FlipAxis, origin: DVec2 },
}

/// Font selection for a text node
#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size: f64,
    pub italic: bool,
    pub bold: bool,
    pub anchor: TextAnchor,
    /// SVG `dominant-baseline`
    pub baseline: Option<&'static str>,
}

/// What a node draws
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Group,
    Rect {
        origin: DVec2,
        size: DVec2,
        radius: DVec2,
    },
    Line {
        from: DVec2,
        to: DVec2,
    },
    Polyline {
        points: Vec<DVec2>,
    },
    Polygon {
        points: Vec<DVec2>,
    },
    Ellipse {
        center: DVec2,
        radius: DVec2,
    },
    Path {
        d: String,
    },
    Text {
        position: DVec2,
        content: String,
    },
    Image {
        origin: DVec2,
        size: DVec2,
        href: String,
        keep_aspect: bool,
    },
}

impl Primitive {
    /// Untransformed extent; empty for groups and text
    pub fn bbox(&self) -> BBox {
        let mut bbox = BBox::new();
        match self {
            Primitive::Group | Primitive::Path { .. } | Primitive::Text { .. } => {}
            Primitive::Rect { origin, size, .. } | Primitive::Image { origin, size, .. } => {
                bbox.expand_point(*origin);
                bbox.expand_point(*origin + *size);
            }
            Primitive::Line { from, to } => {
                bbox.expand_point(*from);
                bbox.expand_point(*to);
            }
            Primitive::Polyline { points } | Primitive::Polygon { points } => {
                for p in points {
                    bbox.expand_point(*p);
                }
            }
            Primitive::Ellipse { center, radius } => {
                bbox.expand_point(*center - *radius);
                bbox.expand_point(*center + *radius);
            }
        }
        bbox
    }

    /// Shift the primitive so its top-left (lowest x, lowest y) corner lands on `to`
    fn move_to(&mut self, to: DVec2) {
        if let Primitive::Text { position, .. } = self {
            *position = to;
            return;
        }
        let bbox = self.bbox();
        if bbox.is_empty() {
            return;
        }
        let delta = to - bbox.min;
        match self {
            Primitive::Group | Primitive::Path { .. } | Primitive::Text { .. } => {}
            Primitive::Rect { origin, .. } | Primitive::Image { origin, .. } => *origin += delta,
            Primitive::Line { from, to } => {
                *from += delta;
                *to += delta;
            }
            Primitive::Polyline { points } | Primitive::Polygon { points } => {
                for p in points {
                    *p += delta;
                }
            }
            Primitive::Ellipse { center, .. } => *center += delta,
        }
    }
}

/// A node in the scene
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub primitive: Primitive,
    pub id: Option<String>,
    pub fill: Option<Paint>,
    pub stroke: Option<Stroke>,
    pub transforms: Vec<Transform>,
    pub font: Option<FontSpec>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(primitive: Primitive, parent: Option<NodeId>) -> Self {
        Node {
            primitive,
            id: None,
            fill: None,
            stroke: None,
            transforms: Vec::new(),
            font: None,
            parent,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// A tree of drawing primitives rooted at a single group
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    nodes: Vec<Node>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub const ROOT: NodeId = NodeId(0);

    pub fn new() -> Self {
        Scene {
            nodes: vec![Node::new(Primitive::Group, None)],
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Number of nodes, including the root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Every node in creation order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Append a primitive under `parent`. An unknown parent falls back to the root.
    pub fn add(&mut self, parent: NodeId, primitive: Primitive) -> NodeMut<'_> {
        let parent = if parent.0 < self.nodes.len() {
            parent
        } else {
            Self::ROOT
        };
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(primitive, Some(parent)));
        self.nodes[parent.0].children.push(id);
        NodeMut { scene: self, id }
    }

    pub fn group(&mut self, parent: NodeId) -> NodeMut<'_> {
        self.add(parent, Primitive::Group)
    }

    /// Rectangle with its lower corner at the origin; place it with [`NodeMut::move_to`]
    pub fn rect(&mut self, parent: NodeId, width: f64, height: f64) -> NodeMut<'_> {
        self.add(
            parent,
            Primitive::Rect {
                origin: DVec2::ZERO,
                size: DVec2::new(width, height),
                radius: DVec2::ZERO,
            },
        )
    }

    pub fn line(&mut self, parent: NodeId, from: DVec2, to: DVec2) -> NodeMut<'_> {
        self.add(parent, Primitive::Line { from, to })
    }

    pub fn polyline(&mut self, parent: NodeId, points: Vec<DVec2>) -> NodeMut<'_> {
        self.add(parent, Primitive::Polyline { points })
    }

    pub fn polygon(&mut self, parent: NodeId, points: Vec<DVec2>) -> NodeMut<'_> {
        self.add(parent, Primitive::Polygon { points })
    }

    pub fn ellipse(&mut self, parent: NodeId, center: DVec2, radius: DVec2) -> NodeMut<'_> {
        self.add(parent, Primitive::Ellipse { center, radius })
    }

    pub fn path(&mut self, parent: NodeId, d: impl Into<String>) -> NodeMut<'_> {
        self.add(parent, Primitive::Path { d: d.into() })
    }

    pub fn text(&mut self, parent: NodeId, content: impl Into<String>) -> NodeMut<'_> {
        self.add(
            parent,
            Primitive::Text {
                position: DVec2::ZERO,
                content: content.into(),
            },
        )
    }

    pub fn image(
        &mut self,
        parent: NodeId,
        origin: DVec2,
        size: DVec2,
        href: impl Into<String>,
    ) -> NodeMut<'_> {
        self.add(
            parent,
            Primitive::Image {
                origin,
                size,
                href: href.into(),
                keep_aspect: true,
            },
        )
    }

    /// Combined untransformed extent of the given nodes
    pub fn bbox_of(&self, ids: impl IntoIterator<Item = NodeId>) -> BBox {
        let mut bbox = BBox::new();
        for id in ids {
            if let Some(node) = self.get(id) {
                bbox.expand_box(&node.primitive.bbox());
            }
        }
        bbox
    }
}

/// Fluent handle to a freshly added (or looked up) node
pub struct NodeMut<'a> {
    scene: &'a mut Scene,
    id: NodeId,
}

impl NodeMut<'_> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    fn node(&mut self) -> &mut Node {
        &mut self.scene.nodes[self.id.0]
    }

    pub fn fill(mut self, color: Color) -> Self {
        self.node().fill = Some(Paint::Color(color));
        self
    }

    pub fn no_fill(mut self) -> Self {
        self.node().fill = Some(Paint::None);
        self
    }

    pub fn stroke(mut self, stroke: Stroke) -> Self {
        self.node().stroke = Some(stroke);
        self
    }

    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        self.node().primitive.move_to(DVec2::new(x, y));
        self
    }

    pub fn transform(mut self, transform: Transform) -> Self {
        self.node().transforms.push(transform);
        self
    }

    pub fn font(mut self, font: FontSpec) -> Self {
        self.node().font = Some(font);
        self
    }

    pub fn radius(mut self, rx: f64, ry: f64) -> Self {
        if let Primitive::Rect { radius, .. } = &mut self.node().primitive {
            *radius = DVec2::new(rx, ry);
        }
        self
    }

    pub fn keep_aspect(mut self, keep: bool) -> Self {
        if let Primitive::Image { keep_aspect, .. } = &mut self.node().primitive {
            *keep_aspect = keep;
        }
        self
    }

    pub fn element_id(mut self, id: impl Into<String>) -> Self {
        self.node().id = Some(id.into());
        self
    }
}
