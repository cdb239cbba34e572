//! Parsed schematic document
//!
//! The document owns every object in a flat arena. Ownership between objects
//! (component → pins, sheet symbol → entries, …) is expressed with indices:
//! each object stores its parent's [`ObjectId`] and its children's ids.

mod objects;

pub use objects::*;

use std::collections::BTreeMap;
use std::fmt;

use crate::storage::IconStorage;
use crate::types::Color;

/// Ancestor walks give up after this many hops; a malformed document could
/// otherwise loop forever.
pub const MAX_ANCESTOR_DEPTH: usize = 64;

/// Index of an object in its document
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub usize);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A font from the sheet's font table
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub name: String,
    pub size: f64,
    pub italic: bool,
    pub bold: bool,
}

impl Default for Font {
    fn default() -> Self {
        Font {
            name: "Times New Roman".to_string(),
            size: 10.0,
            italic: false,
            bold: false,
        }
    }
}

/// Sheet-wide settings
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub width: f64,
    pub height: f64,
    pub area_colour: Color,
    /// Font table; id 1 is the default font
    pub fonts: BTreeMap<u32, Font>,
}

impl Sheet {
    pub const DEFAULT_FONT_ID: u32 = 1;

    pub fn new(width: f64, height: f64) -> Self {
        let mut fonts = BTreeMap::new();
        fonts.insert(Self::DEFAULT_FONT_ID, Font::default());
        Sheet {
            width,
            height,
            area_colour: Color(0xDBFFFF),
            fonts,
        }
    }

    pub fn font(&self, id: u32) -> Option<&Font> {
        self.fonts.get(&id)
    }
}

impl Default for Sheet {
    /// A4 landscape
    fn default() -> Self {
        Sheet::new(1150.0, 760.0)
    }
}

/// Which part/display-mode combination an object belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerScope {
    /// Owning part (sub-unit); `None` or < 1 means "every part"
    pub part_id: Option<i32>,
    /// Owning display mode; `None` means undeclared, -1 means "every mode"
    pub display_mode: Option<i32>,
}

impl Default for OwnerScope {
    fn default() -> Self {
        OwnerScope {
            part_id: None,
            display_mode: Some(-1),
        }
    }
}

/// One object in the document arena
#[derive(Debug, Clone, PartialEq)]
pub struct SchObject {
    pub kind: ObjectKind,
    pub owner: OwnerScope,
    pub hidden: bool,
    parent: Option<ObjectId>,
    children: Vec<ObjectId>,
}

impl SchObject {
    pub fn new(kind: impl Into<ObjectKind>) -> Self {
        SchObject {
            kind: kind.into(),
            owner: OwnerScope::default(),
            hidden: false,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_owner(mut self, part_id: Option<i32>, display_mode: Option<i32>) -> Self {
        self.owner = OwnerScope {
            part_id,
            display_mode,
        };
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }
}

/// A schematic document: the object arena, sheet settings and embedded images
#[derive(Debug, Clone, Default)]
pub struct SchematicDocument {
    objects: Vec<SchObject>,
    pub sheet: Sheet,
    /// Bitmaps decoded from the document's icon storage stream
    pub icons: IconStorage,
}

impl SchematicDocument {
    pub fn new(sheet: Sheet) -> Self {
        SchematicDocument {
            objects: Vec::new(),
            sheet,
            icons: IconStorage::default(),
        }
    }

    /// Append a top-level object
    pub fn push(&mut self, object: SchObject) -> ObjectId {
        let id = ObjectId(self.objects.len());
        self.objects.push(object);
        id
    }

    /// Append an object owned by `parent`
    pub fn push_child(&mut self, parent: ObjectId, object: SchObject) -> ObjectId {
        let id = self.push(object);
        self.set_parent(id, Some(parent));
        id
    }

    /// Re-link `child` under `parent`, detaching it from any previous parent.
    /// Unknown ids are ignored.
    pub fn set_parent(&mut self, child: ObjectId, parent: Option<ObjectId>) {
        if child.0 >= self.objects.len() || parent.is_some_and(|p| p.0 >= self.objects.len()) {
            return;
        }
        if let Some(old) = self.objects[child.0].parent {
            self.objects[old.0].children.retain(|c| *c != child);
        }
        self.objects[child.0].parent = parent;
        if let Some(p) = parent {
            self.objects[p.0].children.push(child);
        }
    }

    pub fn get(&self, id: ObjectId) -> Option<&SchObject> {
        self.objects.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// All objects in document order
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &SchObject)> {
        self.objects.iter().enumerate().map(|(i, o)| (ObjectId(i), o))
    }

    /// Walk `parent` links from `id` (exclusive), nearest first
    pub fn ancestors(&self, id: ObjectId) -> impl Iterator<Item = (ObjectId, &SchObject)> {
        let mut next = self.get(id).and_then(|o| o.parent);
        std::iter::from_fn(move || {
            let current = next?;
            let object = self.get(current)?;
            next = object.parent;
            Some((current, object))
        })
        .take(MAX_ANCESTOR_DEPTH)
    }

    /// Nearest ancestor that is a component
    pub fn owning_component(&self, id: ObjectId) -> Option<(ObjectId, &Component)> {
        self.ancestors(id).find_map(|(aid, o)| match &o.kind {
            ObjectKind::Component(c) => Some((aid, c)),
            _ => None,
        })
    }

    /// Every object below `id`, depth first, each visited once
    pub fn descendants(&self, id: ObjectId) -> Vec<ObjectId> {
        let mut out = Vec::new();
        let mut seen = vec![false; self.objects.len()];
        if let Some(s) = seen.get_mut(id.0) {
            *s = true;
        }
        let mut stack: Vec<ObjectId> = self
            .get(id)
            .map(|o| o.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(next) = stack.pop() {
            if std::mem::replace(&mut seen[next.0], true) {
                continue;
            }
            out.push(next);
            if let Some(o) = self.get(next) {
                stack.extend(o.children.iter().rev().copied());
            }
        }
        out
    }

    /// Designator text as displayed, with the part letter appended for
    /// multi-part components (`U1` → `U1B`)
    pub fn full_designator(&self, id: ObjectId) -> Option<String> {
        let ObjectKind::Designator(designator) = &self.get(id)?.kind else {
            return None;
        };
        let text = designator.text.text.clone();
        match self.owning_component(id) {
            Some((_, c)) if c.part_count > 1 => match c.current_part_id {
                Some(part @ 1..=26) => {
                    let letter = char::from(b'A' + (part - 1) as u8);
                    Some(format!("{text}{letter}"))
                }
                _ => Some(text),
            },
            _ => Some(text),
        }
    }

    /// Sheet-level parameter: a parameter not owned by any component
    pub fn sheet_parameter(&self, name: &str) -> Option<&Parameter> {
        self.iter().find_map(|(id, o)| match &o.kind {
            ObjectKind::Parameter(p)
                if p.name.eq_ignore_ascii_case(name) && self.owning_component(id).is_none() =>
            {
                Some(p)
            }
            _ => None,
        })
    }

    /// Parameter with the same owner as `id`, matched by lowercase name
    pub fn sibling_parameter(&self, id: ObjectId, name: &str) -> Option<&Parameter> {
        let owner = self.get(id)?.parent?;
        let wanted = name.to_lowercase();
        self.get(owner)?
            .children
            .iter()
            .filter(|c| **c != id)
            .find_map(|c| match &self.get(*c)?.kind {
                ObjectKind::Parameter(p) if p.name.to_lowercase() == wanted => Some(p),
                _ => None,
            })
    }
}
