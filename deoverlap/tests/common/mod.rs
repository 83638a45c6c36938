//! Outlines shared by the integration tests

#![allow(dead_code)]

use deoverlap::{
    kurbo::{Affine, BezPath},
    Component, CompositeGlyph, Contour, GlyphSet, HorizontalMetric, HorizontalMetricTable, Path,
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A clockwise rectangle starting at its lower left corner.
pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Contour {
    let mut path = BezPath::new();
    path.move_to((x, y));
    path.line_to((x, y + height));
    path.line_to((x + width, y + height));
    path.line_to((x + width, y));
    path.close_path();
    Contour::new(path).unwrap()
}

pub fn square(x: f64, y: f64, size: f64) -> Contour {
    rect(x, y, size, size)
}

/// A clockwise lens of two quadratic arcs.
pub fn lens(x: f64, y: f64, width: f64, bulge: f64) -> Contour {
    let mut path = BezPath::new();
    path.move_to((x, y));
    path.quad_to((x + width / 2.0, y + bulge), (x + width, y));
    path.quad_to((x + width / 2.0, y - bulge), (x, y));
    path.close_path();
    Contour::new(path).unwrap()
}

pub fn outline(contours: impl IntoIterator<Item = Contour>) -> Path {
    contours.into_iter().collect()
}

pub fn composite(components: &[(&str, f64, f64)]) -> CompositeGlyph {
    CompositeGlyph::new(
        components
            .iter()
            .map(|(base, dx, dy)| Component::offset(*base, *dx, *dy))
            .collect(),
    )
}

/// A small font: a few simple glyphs, composites at two depths, one
/// composite whose components overlap.
pub fn sample_font() -> (GlyphSet, HorizontalMetricTable) {
    let mut glyphs = GlyphSet::new();
    let mut metrics = HorizontalMetricTable::new();
    let mut add = |name: &str, glyph: deoverlap::Glyph, advance: u16, lsb: i16| {
        glyphs.insert(name, glyph);
        metrics.insert(name, HorizontalMetric::new(advance, lsb));
    };
    add(".notdef", deoverlap::Glyph::empty(), 500, 0);
    add(
        "ring",
        outline([square(0.0, 0.0, 20.0), square(10.0, 0.0, 20.0)]).into(),
        600,
        0,
    );
    add("dot", outline([square(0.0, 0.0, 50.0)]).into(), 300, 0);
    add(
        "dot_below_i",
        composite(&[("dot", 0.0, 0.0), ("dot", 0.0, 500.0)]).into(),
        300,
        0,
    );
    add("A", outline([square(50.0, 0.0, 400.0)]).into(), 500, 50);
    add("acutecomb", outline([square(0.0, 0.0, 100.0)]).into(), 0, 0);
    add(
        "Aacute",
        composite(&[("A", 0.0, 0.0), ("acutecomb", 380.0, 350.0)]).into(),
        500,
        50,
    );
    add(
        "Aacute.ss01",
        composite(&[("Aacute", 0.0, 0.0), ("dot", 30.0, 0.0)]).into(),
        500,
        50,
    );
    add(
        "o",
        outline([lens(0.0, 100.0, 200.0, 120.0), lens(100.0, 100.0, 200.0, 120.0)]).into(),
        400,
        0,
    );
    add(
        "mirrored",
        CompositeGlyph::new(vec![
            Component::offset("dot", 0.0, 0.0),
            Component::new("dot", Affine::new([-1.0, 0.0, 0.0, 1.0, 80.0, 0.0])),
        ])
        .into(),
        300,
        0,
    );
    (glyphs, metrics)
}
