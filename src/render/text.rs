//! Text placement
//!
//! Schematic text is drawn inside the page's vertical flip, so every label is
//! rotated and mirrored back to read upright. [`layout`] works out the anchor,
//! rotation and mirror axis from an object's orientation and justification.

use glam::DVec2;

use crate::model::{Font, TextProps};
use crate::scene::{FlipAxis, FontSpec, TextAnchor};
use crate::types::{Color, Orientation};

/// Proportional character widths, in hundredths of the character width, for
/// the printable ASCII range starting at space.
#[rustfmt::skip]
pub const AW_CHAR: [u8; 95] = [
    45,  55,  62, 115,  90, 132, 125,  40,
    55,  55,  71, 115,  45,  48,  45,  50,
    91,  91,  91,  91,  91,  91,  91,  91,
    91,  91,  50,  50, 120, 120, 120,  78,
   142, 102, 105, 110, 115, 105,  98, 105,
   125,  58,  58, 107,  95, 145, 125, 115,
    95, 115, 107,  95,  97, 118, 102, 150,
   100,  93, 100,  58,  50,  58, 119,  72,
    72,  86,  92,  80,  92,  85,  52,  92,
    92,  47,  47,  88,  48, 135,  92,  86,
    92,  92,  69,  75,  58,  92,  80, 121,
    81,  80,  76,  91,  49,  91, 118,
];

/// Width of an average character relative to the font size
const CHAR_WIDTH_RATIO: f64 = 0.08 / 0.14;

/// Measures text for wrapping
pub trait FontMetrics {
    /// Advance width of `text` set in `font`, in document units
    fn text_width(&self, text: &str, font: &Font) -> f64;

    /// Distance between consecutive baselines
    fn line_height(&self, font: &Font) -> f64 {
        font.size
    }
}

/// Width estimate from a fixed per-character advance table
#[derive(Debug, Clone, Copy, Default)]
pub struct ProportionalMetrics;

impl ProportionalMetrics {
    /// Sum of advances in hundredths; characters outside ASCII count as 100
    pub fn advance(text: &str) -> u32 {
        text.chars()
            .map(|c| match c {
                ' '..='~' => u32::from(AW_CHAR[c as usize - 0x20]),
                _ => 100,
            })
            .sum()
    }
}

impl FontMetrics for ProportionalMetrics {
    fn text_width(&self, text: &str, font: &Font) -> f64 {
        f64::from(Self::advance(text)) * 0.01 * font.size * CHAR_WIDTH_RATIO
    }
}

/// Where and how to place a piece of text.
///
/// Draw rules build one of these from an object (adjusting it locally where a
/// kind needs padding or offsets) instead of touching the stored object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPlacement {
    pub location: DVec2,
    pub orientation: Orientation,
    pub justification: u8,
    pub font_id: u32,
    pub colour: Color,
}

impl From<&TextProps> for TextPlacement {
    fn from(t: &TextProps) -> Self {
        TextPlacement {
            location: t.location,
            orientation: t.orientation,
            justification: t.justification,
            font_id: t.font_id,
            colour: t.colour,
        }
    }
}

impl TextPlacement {
    pub fn offset(mut self, by: DVec2) -> Self {
        self.location += by;
        self
    }
}

/// Fully resolved text ready to emit
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub position: DVec2,
    pub colour: Color,
    pub rotation: f64,
    pub flip: FlipAxis,
    /// Pivot for both rotation and flip
    pub origin: DVec2,
    pub font: FontSpec,
}

/// Rotation that undoes the page flip for a given orientation
pub fn rotation_for(orientation: Orientation) -> f64 {
    -f64::from(orientation.quarter_turns()) * 90.0 - 180.0
}

/// Mirror axis paired with a rotation
pub fn flip_for(rotation: f64) -> FlipAxis {
    if rotation > -270.0 {
        FlipAxis::X
    } else {
        FlipAxis::Y
    }
}

/// Drawing font for a table font: one unit smaller than declared
pub fn font_spec(font: &Font, anchor: TextAnchor) -> FontSpec {
    FontSpec {
        family: font.name.clone(),
        size: font.size - 1.0,
        italic: font.italic,
        bold: font.bold,
        anchor,
        baseline: Some("hanging"),
    }
}

/// Lay out text at `placement` using `font`
pub fn layout(placement: &TextPlacement, font: &Font) -> TextLayout {
    let rotation = rotation_for(placement.orientation);
    let p = placement.location;
    TextLayout {
        position: p,
        colour: placement.colour,
        rotation,
        flip: flip_for(rotation),
        origin: DVec2::new(p.x, p.y + font.size / 2.0),
        font: font_spec(font, TextAnchor::from_justification(placement.justification)),
    }
}

/// Split `text` into lines no wider than `max_width`.
///
/// Explicit newlines always break. Within a line, words are packed greedily
/// and the line breaks before the first word that would overflow; a single
/// word wider than `max_width` gets a line of its own.
pub fn wrap_text(text: &str, max_width: f64, font: &Font, metrics: &dyn FontMetrics) -> Vec<String> {
    let mut out = Vec::new();
    for line in text.split('\n') {
        if metrics.text_width(line, font) <= max_width {
            out.push(line.to_string());
            continue;
        }
        let mut current = String::new();
        for word in line.split(' ') {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{current} {word}");
            if metrics.text_width(&candidate, font) > max_width {
                out.push(std::mem::replace(&mut current, word.to_string()));
            } else {
                current = candidate;
            }
        }
        out.push(current);
    }
    out
}
