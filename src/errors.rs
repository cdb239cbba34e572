//! Error and warning types with rich diagnostics using miette
//!
//! Fatal problems are `StorageError` (icon storage decoding) or `RenderError`
//! (a whole render pass). Everything recoverable is a [`Warning`], collected
//! next to the result so callers and tests can inspect it.

use miette::Diagnostic;
use thiserror::Error;

use crate::model::ObjectId;

// ============================================================================
// Storage Errors
// ============================================================================

/// Errors that abort decoding of an icon storage stream
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum StorageError {
    #[error("invalid icon storage header: {header:?}")]
    #[diagnostic(
        code(schdoc::storage::bad_header),
        help("the header record must contain `|HEADER=Icon storage`")
    )]
    BadHeader { header: String },

    #[error("stream truncated at offset {offset}: needed {needed} bytes, {available} available")]
    #[diagnostic(code(schdoc::storage::truncated))]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("unexpected {field} at offset {offset}: expected {expected}, found {found}")]
    #[diagnostic(
        code(schdoc::storage::field_mismatch),
        help("decode with `Strictness::Permissive` to accept the value as read")
    )]
    FieldMismatch {
        field: RecordField,
        offset: usize,
        expected: u8,
        found: u8,
    },
}

/// Fixed single-byte fields of a storage record that are validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Padding,
    RecordType,
    Magic,
}

impl std::fmt::Display for RecordField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordField::Padding => write!(f, "padding byte"),
            RecordField::RecordType => write!(f, "record type"),
            RecordField::Magic => write!(f, "magic byte"),
        }
    }
}

// ============================================================================
// Render Errors
// ============================================================================

/// Errors that occur during rendering
#[derive(Error, Diagnostic, Debug)]
pub enum RenderError {
    #[error("invalid viewport: {width}x{height}")]
    #[diagnostic(code(schdoc::render::invalid_viewport))]
    InvalidViewport { width: f64, height: f64 },

    #[error("invalid sheet size: {width}x{height}")]
    #[diagnostic(
        code(schdoc::render::invalid_sheet),
        help("the sheet must have a positive, finite width and height")
    )]
    InvalidSheet { width: f64, height: f64 },

    #[error("XML serialization error: {message}")]
    #[diagnostic(code(schdoc::render::serialize))]
    Serialize { message: String },
}

// ============================================================================
// Warnings
// ============================================================================

/// A recoverable problem found while decoding or rendering
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// A fixed record byte held an unexpected value; decoding continued with it
    FieldMismatch {
        field: RecordField,
        offset: usize,
        expected: u8,
        found: u8,
    },
    /// An object (or one of its sub-styles) has no drawing rule and was skipped
    UnsupportedObject { object: ObjectId, what: String },
    /// A `=name` parameter reference matched nothing; the literal text was drawn
    LookupMiss { object: ObjectId, name: String },
    /// A font id was missing from the sheet's font table; the default was used
    MissingFont { object: ObjectId, font_id: u32 },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::FieldMismatch {
                field,
                offset,
                expected,
                found,
            } => write!(
                f,
                "unexpected {field} at offset {offset}: expected {expected}, found {found}"
            ),
            Warning::UnsupportedObject { object, what } => {
                write!(f, "object {object}: {what} is not supported")
            }
            Warning::LookupMiss { object, name } => {
                write!(f, "object {object}: parameter `{name}` not found")
            }
            Warning::MissingFont { object, font_id } => {
                write!(f, "object {object}: font {font_id} not in font table")
            }
        }
    }
}
