use anyhow::Result;

use geodisplay_engine::grid::GridResolution;
use geodisplay_engine::logging::{init_logging, LoggingConfig};
use geodisplay_engine::{
    Color, Display, DisplayConfig, LineShape, Outline, PolygonShape, ShapeStyle, StyleFlags, TextShape, TextStyle,
    Vec2,
};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let mut config = DisplayConfig::default()
        .with_title("Geometry Display")
        .with_size(800, 600)
        .with_grid_resolution(GridResolution::new(25.0, 25.0));
    if let Some(bytes) = load_font() {
        config = config.with_font_bytes(bytes);
    }

    let mut display = Display::create(config)?;

    let square = PolygonShape::new(
        vec![
            Vec2::new(-50.0, -50.0),
            Vec2::new(50.0, -50.0),
            Vec2::new(50.0, 50.0),
            Vec2::new(-50.0, 50.0),
        ],
        Color::from_srgb_u8(40, 160, 90, 255),
    )
    .with_style(
        ShapeStyle::new(Color::from_srgb_u8(40, 160, 90, 255))
            .with_name("square")
            .with_outline(Outline::new(2.0, Color::WHITE)),
    );
    display.add_polygon(&square);

    // L-shaped, concave.
    display.add_shape(PolygonShape::new(
        vec![
            Vec2::new(100.0, 0.0),
            Vec2::new(200.0, 0.0),
            Vec2::new(200.0, 40.0),
            Vec2::new(140.0, 40.0),
            Vec2::new(140.0, 120.0),
            Vec2::new(100.0, 120.0),
        ],
        Color::from_srgb_u8(220, 120, 30, 255),
    ));

    display.add_line(&LineShape::new(
        Vec2::new(-200.0, 150.0),
        Vec2::new(150.0, -180.0),
        4.0,
        Color::RED,
    ));

    if let Some(font) = display.font() {
        let mut style = TextStyle::new(font, 24.0);
        style.flags = StyleFlags::REGULAR.bold().underlined();
        style.fill = Color::WHITE;
        display.add_shape(TextShape::new("origin", style).with_position(Vec2::new(5.0, 5.0)));
    } else {
        log::warn!("no system font found, running without text");
    }

    display.set_diagram_origin_corner(3);
    display.set_diagram_position(-100.0, 100.0);
    display.rotate_diagram(10.0);

    display.join();
    Ok(())
}

fn load_font() -> Option<Vec<u8>> {
    [
        "fonts/arial.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    ]
    .iter()
    .find_map(|p| std::fs::read(p).ok())
}
