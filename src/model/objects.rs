//! Object kinds
//!
//! Coordinates are in document units with Y pointing up. Each kind carries
//! only the fields its drawing rule needs.

use glam::DVec2;

use crate::types::{Color, Orientation};

/// Every kind of schematic object
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    Wire(Wire),
    Bus(Bus),
    BusEntry(BusEntry),
    Rectangle(Rectangle),
    RoundedRectangle(RoundedRectangle),
    Ellipse(Ellipse),
    EllipticalArc(EllipticalArc),
    Arc(Arc),
    Polyline(Polyline),
    Polygon(Polygon),
    Port(Port),
    Pin(Pin),
    Junction(Junction),
    NoErc(NoErc),
    Line(Line),
    Label(Label),
    NetLabel(NetLabel),
    Designator(Designator),
    Parameter(Parameter),
    SheetFilename(SheetFilename),
    SheetName(SheetName),
    PowerPort(PowerPort),
    SheetSymbol(SheetSymbol),
    SheetEntry(SheetEntry),
    Image(Image),
    TextFrame(TextFrame),
    Harness(Harness),
    HarnessPin(HarnessPin),
    HarnessWire(HarnessWire),
    HarnessLabel(HarnessLabel),
    Component(Component),
    Sheet,
    Implementation(ImplementationKind),
    TemplateFile(TemplateFile),
    /// A record the upstream parser could not type
    Unknown { record: i32 },
}

impl ObjectKind {
    /// Draw order: layer 0 is painted before layer 1
    pub const fn layer(&self) -> u8 {
        match self {
            ObjectKind::SheetSymbol(_)
            | ObjectKind::Harness(_)
            | ObjectKind::Rectangle(_)
            | ObjectKind::RoundedRectangle(_) => 0,
            _ => 1,
        }
    }

    /// Short kind name for diagnostics
    pub const fn name(&self) -> &'static str {
        match self {
            ObjectKind::Wire(_) => "wire",
            ObjectKind::Bus(_) => "bus",
            ObjectKind::BusEntry(_) => "bus entry",
            ObjectKind::Rectangle(_) => "rectangle",
            ObjectKind::RoundedRectangle(_) => "rounded rectangle",
            ObjectKind::Ellipse(_) => "ellipse",
            ObjectKind::EllipticalArc(_) => "elliptical arc",
            ObjectKind::Arc(_) => "arc",
            ObjectKind::Polyline(_) => "polyline",
            ObjectKind::Polygon(_) => "polygon",
            ObjectKind::Port(_) => "port",
            ObjectKind::Pin(_) => "pin",
            ObjectKind::Junction(_) => "junction",
            ObjectKind::NoErc(_) => "no-ERC marker",
            ObjectKind::Line(_) => "line",
            ObjectKind::Label(_) => "label",
            ObjectKind::NetLabel(_) => "net label",
            ObjectKind::Designator(_) => "designator",
            ObjectKind::Parameter(_) => "parameter",
            ObjectKind::SheetFilename(_) => "sheet file name",
            ObjectKind::SheetName(_) => "sheet name",
            ObjectKind::PowerPort(_) => "power port",
            ObjectKind::SheetSymbol(_) => "sheet symbol",
            ObjectKind::SheetEntry(_) => "sheet entry",
            ObjectKind::Image(_) => "image",
            ObjectKind::TextFrame(_) => "text frame",
            ObjectKind::Harness(_) => "harness connector",
            ObjectKind::HarnessPin(_) => "harness entry",
            ObjectKind::HarnessWire(_) => "signal harness",
            ObjectKind::HarnessLabel(_) => "harness type",
            ObjectKind::Component(_) => "component",
            ObjectKind::Sheet => "sheet",
            ObjectKind::Implementation(_) => "implementation",
            ObjectKind::TemplateFile(_) => "template",
            ObjectKind::Unknown { .. } => "unknown record",
        }
    }
}

macro_rules! impl_into_kind {
    ($($ty:ident),* $(,)?) => {
        $(
            impl From<$ty> for ObjectKind {
                fn from(v: $ty) -> Self { ObjectKind::$ty(v) }
            }
        )*
    };
}

impl_into_kind!(
    Wire, Bus, BusEntry, Rectangle, RoundedRectangle, Ellipse, EllipticalArc, Arc, Polyline,
    Polygon, Port, Pin, Junction, NoErc, Line, Label, NetLabel, Designator, Parameter,
    SheetFilename, SheetName, PowerPort, SheetSymbol, SheetEntry, Image, TextFrame, Harness,
    HarnessPin, HarnessWire, HarnessLabel, Component, TemplateFile,
);

// ============================================================================
// Shared pieces
// ============================================================================

/// Position and styling shared by every free-standing text object
#[derive(Debug, Clone, PartialEq)]
pub struct TextProps {
    pub location: DVec2,
    pub text: String,
    pub orientation: Orientation,
    /// 0..=8; the horizontal part is `justification % 3`
    pub justification: u8,
    pub font_id: u32,
    pub colour: Color,
}

impl TextProps {
    pub fn new(location: DVec2, text: impl Into<String>) -> Self {
        TextProps {
            location,
            text: text.into(),
            orientation: Orientation::RIGHT,
            justification: 0,
            font_id: 1,
            colour: Color::BLACK,
        }
    }
}

impl Default for TextProps {
    fn default() -> Self {
        TextProps::new(DVec2::ZERO, "")
    }
}

/// Dash pattern of a graphical line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    DashDotted,
}

impl LineStyle {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            1 => LineStyle::Dashed,
            2 => LineStyle::Dotted,
            3 => LineStyle::DashDotted,
            _ => LineStyle::Solid,
        }
    }

    /// SVG dash array, `None` for solid lines
    pub fn dash_array(self) -> Option<Vec<f64>> {
        match self {
            LineStyle::Solid => None,
            LineStyle::Dashed => Some(vec![4.0, 4.0]),
            LineStyle::Dotted => Some(vec![2.0, 2.0]),
            LineStyle::DashDotted => Some(vec![4.0, 2.0, 2.0, 4.0]),
        }
    }
}

/// Signal direction of a port or sheet entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PortIoType {
    #[default]
    Unspecified,
    Output,
    Input,
    Bidirectional,
}

impl PortIoType {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            1 => PortIoType::Output,
            2 => PortIoType::Input,
            3 => PortIoType::Bidirectional,
            _ => PortIoType::Unspecified,
        }
    }
}

// ============================================================================
// Wiring
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Wire {
    pub points: Vec<DVec2>,
    pub colour: Color,
    pub line_width: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bus {
    pub points: Vec<DVec2>,
    pub colour: Color,
    pub line_width: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BusEntry {
    pub location: DVec2,
    pub corner: DVec2,
    pub colour: Color,
    pub line_width: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Junction {
    pub location: DVec2,
    pub colour: Color,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NoErc {
    pub location: DVec2,
    pub colour: Color,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Port {
    /// Left end, vertically centred
    pub location: DVec2,
    pub width: f64,
    pub height: f64,
    pub io_type: PortIoType,
    pub name: String,
    pub font_id: u32,
    pub fill_colour: Color,
    pub border_colour: Color,
    pub text_colour: Color,
}

/// Glyph style of a power port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PowerPortStyle {
    #[default]
    Circle,
    Arrow,
    Bar,
    Wave,
    PowerGround,
    SignalGround,
    Earth,
    Other(i32),
}

impl PowerPortStyle {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => PowerPortStyle::Circle,
            1 => PowerPortStyle::Arrow,
            2 => PowerPortStyle::Bar,
            3 => PowerPortStyle::Wave,
            4 => PowerPortStyle::PowerGround,
            5 => PowerPortStyle::SignalGround,
            6 => PowerPortStyle::Earth,
            n => PowerPortStyle::Other(n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PowerPort {
    /// Connection point
    pub location: DVec2,
    pub style: PowerPortStyle,
    pub orientation: Orientation,
    pub text: String,
    pub show_text: bool,
    pub colour: Color,
    pub is_off_sheet_connector: bool,
}

// ============================================================================
// Graphics
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Rectangle {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
    pub line_width: f64,
    pub line_colour: Color,
    pub fill_colour: Color,
    pub transparent: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoundedRectangle {
    pub rect: Rectangle,
    pub corner_x_radius: f64,
    pub corner_y_radius: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ellipse {
    pub center: DVec2,
    pub radius_x: f64,
    pub radius_y: f64,
    pub line_width: f64,
    pub line_colour: Color,
    pub fill_colour: Color,
    pub transparent: bool,
}

/// Angles are in degrees, counter-clockwise, with 0 on the negative X axis
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EllipticalArc {
    pub center: DVec2,
    pub radius: f64,
    pub secondary_radius: Option<f64>,
    pub start_angle: f64,
    pub end_angle: f64,
    pub line_width: f64,
    pub colour: Color,
}

/// Circular arc, same angle convention as [`EllipticalArc`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Arc {
    pub center: DVec2,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub line_width: f64,
    pub colour: Color,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polyline {
    pub points: Vec<DVec2>,
    pub colour: Color,
    pub line_width: f64,
    pub line_style: LineStyle,
    /// 0 none, 1 arrow, 2 solid arrow, 3 tail, 4 solid tail
    pub start_shape: u8,
    pub end_shape: u8,
    pub shape_size: u8,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    pub points: Vec<DVec2>,
    pub line_width: f64,
    pub line_colour: Color,
    pub fill_colour: Color,
    pub transparent: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Line {
    pub start: DVec2,
    pub end: DVec2,
    pub line_width: f64,
    pub colour: Color,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Image {
    pub corner1: DVec2,
    pub corner2: DVec2,
    pub filename: String,
    /// Image data lives in the document's icon storage
    pub embedded: bool,
    pub keep_aspect: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextFrame {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
    /// `~1` marks a line break
    pub text: String,
    pub font_id: u32,
    pub text_colour: Color,
    pub fill_colour: Color,
    pub border_colour: Color,
    pub transparent: bool,
    pub show_border: bool,
    pub word_wrap: bool,
    /// 0 centre, 1 left, 2 right
    pub alignment: u8,
    pub text_margin: f64,
}

// ============================================================================
// Symbols
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pin {
    /// Electrical end of the pin
    pub location: DVec2,
    pub length: f64,
    pub orientation: Orientation,
    pub name: String,
    pub show_name: bool,
    pub colour: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub location: DVec2,
    pub library_reference: String,
    /// Selected part, `None` or < 1 when the component is not multi-part
    pub current_part_id: Option<i32>,
    /// Selected display mode, < 1 for the primary mode
    pub display_mode: i32,
    pub part_count: i32,
}

impl Default for Component {
    fn default() -> Self {
        Component {
            location: DVec2::ZERO,
            library_reference: String::new(),
            current_part_id: None,
            display_mode: 0,
            part_count: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Label {
    pub text: TextProps,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NetLabel {
    pub text: TextProps,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Designator {
    pub text: TextProps,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Parameter {
    pub name: String,
    /// Value; a leading `=` refers to another parameter by name
    pub text: TextProps,
    pub is_implementation_parameter: bool,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Parameter {
            name: name.into(),
            text: TextProps::new(DVec2::ZERO, value),
            is_implementation_parameter: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SheetFilename {
    pub text: TextProps,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SheetName {
    pub text: TextProps,
}

// ============================================================================
// Hierarchy
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SheetSymbol {
    /// Top-left corner
    pub location: DVec2,
    pub width: f64,
    pub height: f64,
    pub line_colour: Color,
    pub fill_colour: Color,
}

/// Outline style of a sheet entry
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SheetEntryStyle {
    #[default]
    BlockAndTriangle,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SheetEntry {
    pub name: String,
    /// 0 left, 1 right, 2 top, 3 bottom
    pub side: u8,
    pub distance_from_top: f64,
    pub io_type: PortIoType,
    pub style: SheetEntryStyle,
    pub font_id: u32,
    pub colour: Color,
    pub fill_colour: Color,
    pub text_colour: Color,
}

// ============================================================================
// Harnesses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Harness {
    /// Top-left corner
    pub location: DVec2,
    pub width: f64,
    pub height: f64,
    /// 0 tongue on the right, 1 tongue on the left
    pub side: u8,
    /// Distance of the tongue's tip from the top edge
    pub primary_connection_position: f64,
    pub colour: Color,
    pub area_colour: Color,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HarnessPin {
    pub name: String,
    /// 0 left, 1 right
    pub side: u8,
    pub distance_from_top: f64,
    pub font_id: u32,
    pub text_colour: Color,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HarnessWire {
    pub points: Vec<DVec2>,
    pub colour: Color,
    pub line_width: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HarnessLabel {
    pub text: TextProps,
}

// ============================================================================
// Non-graphical records
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImplementationKind {
    List,
    Model,
    PinMap,
    MapDefinerList,
    MapDefiner,
    Parameters,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TemplateFile {
    pub filename: String,
}
