//! Builds a small schematic by hand and prints it as SVG.
//!
//! ```text
//! cargo run --example render_demo -- [REFERENCE-TO-CROSS-OUT] > demo.svg
//! RUST_LOG=debug cargo run --example render_demo --features tracing
//! ```

use glam::dvec2;
use schdoc::model::*;
use schdoc::render::{self, RenderOptions};
use schdoc::types::{Color, Orientation};

fn build_document() -> SchematicDocument {
    let mut doc = SchematicDocument::new(Sheet::new(500.0, 300.0));
    doc.push(SchObject::new(Parameter::new("Title", "Demo board")));

    let u1 = doc.push(SchObject::new(Component {
        location: dvec2(200.0, 150.0),
        library_reference: "LM358".into(),
        current_part_id: Some(1),
        display_mode: 0,
        part_count: 2,
    }));
    doc.push_child(
        u1,
        SchObject::new(Rectangle {
            left: 200.0,
            bottom: 120.0,
            right: 260.0,
            top: 180.0,
            line_colour: Color(0x000080),
            fill_colour: Color(0xB0FFFF),
            ..Default::default()
        })
        .with_owner(Some(1), Some(0)),
    );
    for (i, name) in ["IN+", "IN-"].into_iter().enumerate() {
        doc.push_child(
            u1,
            SchObject::new(Pin {
                location: dvec2(200.0, 160.0 - 20.0 * i as f64),
                length: 20.0,
                orientation: Orientation::LEFT,
                name: name.into(),
                show_name: true,
                colour: Color::BLACK,
            })
            .with_owner(Some(1), Some(0)),
        );
    }
    doc.push_child(
        u1,
        SchObject::new(Designator {
            text: TextProps::new(dvec2(200.0, 185.0), "U1"),
        }),
    );
    doc.push_child(u1, SchObject::new(Parameter::new("Comment", "=Value")));
    doc.push_child(u1, SchObject::new(Parameter::new("Value", "LM358")));

    doc.push(SchObject::new(Wire {
        points: vec![dvec2(100.0, 160.0), dvec2(180.0, 160.0)],
        colour: Color(0x800000),
        line_width: 1.0,
    }));
    doc.push(SchObject::new(NetLabel {
        text: TextProps::new(dvec2(110.0, 162.0), "SENSE"),
    }));
    doc.push(SchObject::new(PowerPort {
        location: dvec2(100.0, 100.0),
        style: PowerPortStyle::PowerGround,
        orientation: Orientation::DOWN,
        text: "GND".into(),
        show_text: true,
        ..Default::default()
    }));
    doc.push(SchObject::new(Port {
        location: dvec2(300.0, 150.0),
        width: 50.0,
        height: 10.0,
        io_type: PortIoType::Output,
        name: "OUT".into(),
        font_id: 1,
        fill_colour: Color(0x80FFFF),
        border_colour: Color(0x000080),
        text_colour: Color::BLACK,
    }));
    doc.push(SchObject::new(Label {
        text: TextProps::new(dvec2(20.0, 280.0), "=Title"),
    }));
    doc
}

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let doc = build_document();
    let options = RenderOptions::default().with_viewport_size(1000.0, 600.0)?;
    let mut rendered = render::render(&doc, &options)?;

    if let Some(reference) = std::env::args().nth(1) {
        if !rendered.cross_out(&doc, &reference) {
            tracing::warn!(%reference, "no component to cross out");
        }
    }
    for warning in &rendered.warnings {
        tracing::warn!(%warning, "render warning");
    }

    println!("{}", rendered.to_svg_string()?);
    Ok(())
}
