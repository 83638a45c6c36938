//! End-to-end overlap removal on small glyph sets

mod common;

use common::*;
use deoverlap::{
    kurbo::BezPath, simplify_glyph_set, Contour, Diagnostic, Error, Glyph, GlyphSet,
    HorizontalMetric, HorizontalMetricTable, Options, Path,
};
use pretty_assertions::assert_eq;

fn simple_path<'a>(glyphs: &'a GlyphSet, name: &str) -> &'a Path {
    match glyphs.get(name) {
        Some(Glyph::Simple(simple)) => &simple.path,
        other => panic!("expected simple glyph '{name}', found {other:?}"),
    }
}

/// A square whose top right corner is doubled by a point a hair's breadth away.
fn near_coincident_square() -> Path {
    let mut path = BezPath::new();
    path.move_to((0.0, 0.0));
    path.line_to((0.0, 100.0));
    path.line_to((100.0, 100.0));
    path.line_to((100.0 + 1e-11, 100.0));
    path.line_to((100.0, 0.0));
    path.close_path();
    outline([Contour::new(path).unwrap()])
}

#[test]
fn overlapping_squares_merge() {
    init_logging();
    let (mut glyphs, mut metrics) = sample_font();
    let report = simplify_glyph_set(&mut glyphs, &mut metrics, &Options::default()).unwrap();

    assert!(report.is_modified("ring"));
    let ring = simple_path(&glyphs, "ring");
    assert_eq!(ring, &outline([rect(0.0, 0.0, 30.0, 20.0)]));
    assert_eq!(ring.area(), 600.0);
    assert_eq!(metrics.get("ring"), Some(HorizontalMetric::new(600, 0)));
}

#[test]
fn separate_components_stay_composite() {
    init_logging();
    let (mut glyphs, mut metrics) = sample_font();
    let before = glyphs.get("dot_below_i").cloned();
    let report = simplify_glyph_set(&mut glyphs, &mut metrics, &Options::default()).unwrap();

    assert!(!report.is_modified("dot_below_i"));
    assert!(report.unchanged.contains("dot_below_i"));
    assert_eq!(glyphs.get("dot_below_i").cloned(), before);
    assert_eq!(metrics.get("dot_below_i"), Some(HorizontalMetric::new(300, 0)));
}

#[test]
fn overlapping_components_are_decomposed() {
    init_logging();
    let (mut glyphs, mut metrics) = sample_font();
    let report = simplify_glyph_set(&mut glyphs, &mut metrics, &Options::default()).unwrap();

    assert!(report.is_modified("Aacute"));
    assert!(report
        .diagnostics_for("Aacute")
        .any(|diagnostic| matches!(diagnostic, Diagnostic::Decomposed { .. })));
    let aacute = simple_path(&glyphs, "Aacute");
    assert_eq!(aacute.len(), 1);
    assert_eq!(aacute.area(), 160_000.0 + 10_000.0 - 3_500.0);
    assert_eq!(metrics.get("Aacute"), Some(HorizontalMetric::new(500, 50)));

    // the second level composite sees the decomposed Aacute
    assert!(report.is_modified("Aacute.ss01"));
    let ss01 = simple_path(&glyphs, "Aacute.ss01");
    assert_eq!(ss01.len(), 1);
    assert_eq!(ss01.area(), 166_500.0 + 2_500.0 - 1_500.0);
    assert_eq!(metrics.get("Aacute.ss01"), Some(HorizontalMetric::new(500, 30)));
}

#[test]
fn mirrored_component_merges() {
    init_logging();
    let (mut glyphs, mut metrics) = sample_font();
    simplify_glyph_set(&mut glyphs, &mut metrics, &Options::default()).unwrap();
    assert_eq!(simple_path(&glyphs, "mirrored"), &outline([rect(0.0, 0.0, 80.0, 50.0)]));
}

#[test]
fn curves_merge() {
    init_logging();
    let (mut glyphs, mut metrics) = sample_font();
    let report = simplify_glyph_set(&mut glyphs, &mut metrics, &Options::default()).unwrap();

    assert!(report.is_modified("o"));
    let o = simple_path(&glyphs, "o");
    assert_eq!(o.len(), 1);
    assert!(o.contours()[0].is_clockwise());
    // each lens covers 16000 units and they share 5000; the arcs cross at
    // x = 150, where both the crossings and the split control points fall
    // on the integer grid
    assert!((o.area() - 27_000.0).abs() < 1e-6, "{}", o.area());
    let quads = o.contours()[0]
        .segments()
        .filter(|seg| matches!(seg, deoverlap::kurbo::PathSeg::Quad(_)))
        .count();
    assert_eq!(quads, 4);
    assert_eq!(metrics.get("o"), Some(HorizontalMetric::new(400, 0)));
}

#[test]
fn tiny_contours_are_pruned() {
    init_logging();
    let mut glyphs = GlyphSet::new();
    glyphs.insert("noise", outline([square(0.0, 0.0, 100.0), square(200.0, 0.0, 2.0)]));
    let mut metrics = HorizontalMetricTable::new();
    metrics.insert("noise", HorizontalMetric::new(400, 0));

    let report = simplify_glyph_set(&mut glyphs, &mut metrics, &Options::default()).unwrap();
    assert!(report.is_modified("noise"));
    assert_eq!(simple_path(&glyphs, "noise"), &outline([square(0.0, 0.0, 100.0)]));
    assert_eq!(
        report.diagnostics,
        vec![Diagnostic::ContourPruned {
            glyph: "noise".into(),
            index: 1,
            area: 4.0,
        }]
    );
}

#[test]
fn specks_left_by_rounding_are_pruned() {
    init_logging();
    let mut glyphs = GlyphSet::new();
    // 4.99 x 6.27 is above the threshold, but rounds to 4 x 6
    glyphs.insert(
        "g",
        outline([
            square(0.0, 0.0, 20.0),
            square(10.0, 0.0, 20.0),
            rect(200.5, 0.0, 4.99, 6.27),
        ]),
    );
    let mut metrics = HorizontalMetricTable::new();
    let options = Options::default();

    let first = simplify_glyph_set(&mut glyphs, &mut metrics, &options).unwrap();
    assert!(first.is_modified("g"));
    assert_eq!(simple_path(&glyphs, "g"), &outline([rect(0.0, 0.0, 30.0, 20.0)]));
    assert!(first.diagnostics_for("g").any(|diagnostic| matches!(
        diagnostic,
        Diagnostic::ContourPruned { area, .. } if *area == 24.0
    )));

    let second = simplify_glyph_set(&mut glyphs, &mut metrics, &options).unwrap();
    assert!(second.modified.is_empty());
}

#[test]
fn smaller_threshold_keeps_specks() {
    init_logging();
    let mut glyphs = GlyphSet::new();
    glyphs.insert("noise", outline([square(0.0, 0.0, 100.0), square(200.0, 0.0, 2.0)]));
    let mut metrics = HorizontalMetricTable::new();
    let options = Options::default().with_min_contour_area(1.0);
    let report = simplify_glyph_set(&mut glyphs, &mut metrics, &options).unwrap();
    assert!(report.modified.is_empty());
    assert_eq!(simple_path(&glyphs, "noise").len(), 2);
}

#[test]
fn rounding_recovers_near_coincident_points() {
    init_logging();
    let mut glyphs = GlyphSet::new();
    glyphs.insert("sliver", near_coincident_square());
    let mut metrics = HorizontalMetricTable::new();
    metrics.insert("sliver", HorizontalMetric::new(200, 0));

    let report = simplify_glyph_set(&mut glyphs, &mut metrics, &Options::default()).unwrap();
    assert!(report.is_modified("sliver"));
    assert!(report.skipped.is_empty());
    assert_eq!(simple_path(&glyphs, "sliver"), &outline([square(0.0, 0.0, 100.0)]));
    assert_eq!(
        report.diagnostics,
        vec![Diagnostic::RoundedRetry {
            glyph: "sliver".into()
        }]
    );
}

fn font_with_broken_glyph() -> (GlyphSet, HorizontalMetricTable) {
    let mut glyphs = GlyphSet::new();
    let mut metrics = HorizontalMetricTable::new();
    glyphs.insert("a", outline([square(0.0, 0.0, 20.0), square(10.0, 0.0, 20.0)]));
    metrics.insert("a", HorizontalMetric::new(300, 0));
    glyphs.insert("b", outline([square(5.0, 0.0, f64::INFINITY)]));
    metrics.insert("b", HorizontalMetric::new(300, 5));
    glyphs.insert("c", outline([square(5.0, 0.0, 20.0), square(15.0, 0.0, 20.0)]));
    metrics.insert("c", HorizontalMetric::new(300, 5));
    (glyphs, metrics)
}

#[test]
fn failure_aborts_the_run() {
    init_logging();
    let (mut glyphs, mut metrics) = font_with_broken_glyph();
    let before = glyphs.clone();
    let err = simplify_glyph_set(&mut glyphs, &mut metrics, &Options::default()).unwrap_err();
    match err {
        Error::SimplificationFailed { glyph, completed, .. } => {
            assert_eq!(glyph, "b");
            assert_eq!(completed.modified.iter().collect::<Vec<_>>(), ["a"]);
        }
        other => panic!("unexpected error {other}"),
    }

    // completed glyphs stay written, later ones are untouched
    assert_eq!(simple_path(&glyphs, "a"), &outline([rect(0.0, 0.0, 30.0, 20.0)]));
    assert_eq!(glyphs.get("c"), before.get("c"));
}

#[test]
fn ignore_errors_continues() {
    init_logging();
    let (mut glyphs, mut metrics) = font_with_broken_glyph();
    let before = glyphs.clone();
    let options = Options::default().with_ignore_errors(true);
    let report = simplify_glyph_set(&mut glyphs, &mut metrics, &options).unwrap();

    assert_eq!(report.modified.iter().collect::<Vec<_>>(), ["a", "c"]);
    assert_eq!(report.skipped.keys().collect::<Vec<_>>(), ["b"]);
    assert_eq!(glyphs.get("b"), before.get("b"));
    assert_eq!(metrics.get("b"), Some(HorizontalMetric::new(300, 5)));
    assert_eq!(metrics.get("c"), Some(HorizontalMetric::new(300, 5)));
}

#[test]
fn component_cycle_is_fatal() {
    init_logging();
    let (mut glyphs, mut metrics) = sample_font();
    glyphs.insert("loop1", composite(&[("loop2", 0.0, 0.0)]));
    glyphs.insert("loop2", composite(&[("loop1", 0.0, 0.0)]));
    let before = glyphs.clone();
    let err = simplify_glyph_set(&mut glyphs, &mut metrics, &Options::default()).unwrap_err();
    assert!(matches!(err, Error::MalformedGlyphGraph { .. }));
    // nothing was processed
    assert_eq!(glyphs, before);
}
