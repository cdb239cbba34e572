//! Altium schematic rendering.
//!
//! Two independent pieces live here:
//!
//! - [`storage`] decodes the icon storage stream of a schematic document into
//!   named bitmaps.
//! - [`render`] turns an already parsed [`SchematicDocument`] into a
//!   [`Scene`](scene::Scene) of vector primitives, which [`scene::svg`]
//!   serializes as SVG.
//!
//! ```no_run
//! use schdoc::model::{SchObject, SchematicDocument, Wire};
//! use schdoc::render::RenderOptions;
//!
//! let mut doc = SchematicDocument::default();
//! doc.push(SchObject::new(Wire::default()));
//! let svg = schdoc::render_svg(&doc, &RenderOptions::default())?;
//! println!("{svg}");
//! # Ok::<(), schdoc::RenderError>(())
//! ```

pub mod errors;
pub mod log;
pub mod model;
pub mod render;
pub mod scene;
pub mod storage;
pub mod stream;
pub mod types;

pub use errors::{RenderError, StorageError, Warning};
pub use model::{ObjectId, ObjectKind, SchObject, SchematicDocument};
pub use render::{RenderOptions, RenderedSchematic, render};
pub use storage::{DecodeOptions, IconStorage, IconStorageDecoder, Strictness, decode_icon_storage};
pub use stream::RecordStream;
pub use types::{Color, Viewport};

/// Render a document straight to SVG text
pub fn render_svg(
    doc: &SchematicDocument,
    options: &RenderOptions,
) -> Result<String, RenderError> {
    render(doc, options)?.to_svg_string()
}
