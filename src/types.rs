//! Strongly-typed primitives shared by the decoder and the renderer.
//!
//! Schematic coordinates are plain `DVec2`s in document units (1/100 inch,
//! Y-up). Everything else that carries meaning beyond a number gets a newtype.

use std::fmt;

use glam::DVec2;

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is zero when non-zero required
    Zero,
    /// Value is negative when positive required
    Negative,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Zero => write!(f, "value is zero"),
            NumericError::Negative => write!(f, "value is negative"),
        }
    }
}

impl std::error::Error for NumericError {}

fn check_positive(val: f64) -> Result<f64, NumericError> {
    if val.is_nan() {
        Err(NumericError::NaN)
    } else if val.is_infinite() {
        Err(NumericError::Infinite)
    } else if val == 0.0 {
        Err(NumericError::Zero)
    } else if val < 0.0 {
        Err(NumericError::Negative)
    } else {
        Ok(val)
    }
}

/// An Altium colour: a packed integer with red in the low byte (`0x00BBGGRR`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0x000000);
    pub const WHITE: Color = Color(0xFFFFFF);

    /// Build a colour from its red, green and blue components
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Color {
        Color((r as u32) | ((g as u32) << 8) | ((b as u32) << 16))
    }

    pub fn r(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    pub fn g(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    pub fn b(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    /// CSS hex notation, `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r(), self.g(), self.b())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Output drawing area, in output units
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    width: f64,
    height: f64,
}

impl Viewport {
    /// Create a viewport with validation (both sides positive and finite)
    pub fn try_new(width: f64, height: f64) -> Result<Viewport, NumericError> {
        Ok(Viewport {
            width: check_positive(width)?,
            height: check_positive(height)?,
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}

impl Default for Viewport {
    /// A4 landscape at 100 units per inch
    fn default() -> Self {
        Viewport {
            width: 1169.0,
            height: 826.0,
        }
    }
}

/// Rotation of a text or symbol in quarter turns (0, 90, 180, 270 degrees)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Orientation(u8);

impl Orientation {
    pub const RIGHT: Orientation = Orientation(0);
    pub const UP: Orientation = Orientation(1);
    pub const LEFT: Orientation = Orientation(2);
    pub const DOWN: Orientation = Orientation(3);

    /// Any integer is folded into the four quarter turns
    pub fn from_raw(raw: i32) -> Orientation {
        Orientation(raw.rem_euclid(4) as u8)
    }

    pub fn quarter_turns(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Unit direction in document space (Y-up)
    pub fn unit(self) -> DVec2 {
        match self.0 {
            0 => DVec2::X,
            1 => DVec2::Y,
            2 => DVec2::NEG_X,
            _ => DVec2::NEG_Y,
        }
    }
}

/// Axis-aligned bounding box in document units
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox {
    pub min: DVec2,
    pub max: DVec2,
}

impl Default for BBox {
    fn default() -> Self {
        Self::new()
    }
}

impl BBox {
    /// An empty box; the first expanded point becomes both corners
    pub fn new() -> Self {
        BBox {
            min: DVec2::splat(f64::INFINITY),
            max: DVec2::splat(f64::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn expand_point(&mut self, p: DVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn expand_box(&mut self, other: &BBox) {
        if !other.is_empty() {
            self.expand_point(other.min);
            self.expand_point(other.max);
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Color tests ====================

    #[test]
    fn color_is_bgr_packed() {
        let c = Color(0x0000FF);
        assert_eq!(c.r(), 255);
        assert_eq!(c.g(), 0);
        assert_eq!(c.b(), 0);
        assert_eq!(c.to_hex(), "#ff0000");
    }

    #[test]
    fn color_from_rgb_round_trips_components() {
        let c = Color::from_rgb(0x12, 0x34, 0x56);
        assert_eq!(c.0, 0x563412);
        assert_eq!(c.to_hex(), "#123456");
    }

    #[test]
    fn color_display_matches_hex() {
        assert_eq!(Color::WHITE.to_string(), "#ffffff");
        assert_eq!(Color::BLACK.to_string(), "#000000");
    }

    // ==================== Viewport tests ====================

    #[test]
    fn viewport_try_new_valid() {
        let vp = Viewport::try_new(500.0, 400.0).unwrap();
        assert_eq!(vp.width(), 500.0);
        assert_eq!(vp.height(), 400.0);
    }

    #[test]
    fn viewport_rejects_bad_sizes() {
        assert_eq!(Viewport::try_new(0.0, 1.0), Err(NumericError::Zero));
        assert_eq!(Viewport::try_new(1.0, -1.0), Err(NumericError::Negative));
        assert_eq!(Viewport::try_new(f64::NAN, 1.0), Err(NumericError::NaN));
        assert_eq!(
            Viewport::try_new(1.0, f64::INFINITY),
            Err(NumericError::Infinite)
        );
    }

    // ==================== Orientation tests ====================

    #[test]
    fn orientation_folds_out_of_range_values() {
        assert_eq!(Orientation::from_raw(5), Orientation::UP);
        assert_eq!(Orientation::from_raw(-1), Orientation::DOWN);
        assert_eq!(Orientation::from_raw(2).index(), 2);
    }

    #[test]
    fn orientation_unit_vectors_are_y_up() {
        assert_eq!(Orientation::RIGHT.unit(), DVec2::new(1.0, 0.0));
        assert_eq!(Orientation::UP.unit(), DVec2::new(0.0, 1.0));
        assert_eq!(Orientation::LEFT.unit(), DVec2::new(-1.0, 0.0));
        assert_eq!(Orientation::DOWN.unit(), DVec2::new(0.0, -1.0));
    }

    // ==================== BBox tests ====================

    #[test]
    fn bbox_starts_empty() {
        let b = BBox::new();
        assert!(b.is_empty());
    }

    #[test]
    fn bbox_expand_point() {
        let mut b = BBox::new();
        b.expand_point(DVec2::new(1.0, 2.0));
        b.expand_point(DVec2::new(-3.0, 5.0));
        assert!(!b.is_empty());
        assert_eq!(b.min, DVec2::new(-3.0, 2.0));
        assert_eq!(b.max, DVec2::new(1.0, 5.0));
        assert_eq!(b.width(), 4.0);
        assert_eq!(b.height(), 3.0);
        assert_eq!(b.center(), DVec2::new(-1.0, 3.5));
    }

    #[test]
    fn bbox_expand_box_ignores_empty() {
        let mut b = BBox::new();
        b.expand_point(DVec2::ZERO);
        b.expand_box(&BBox::new());
        assert_eq!(b.min, DVec2::ZERO);
        assert_eq!(b.max, DVec2::ZERO);
    }
}
