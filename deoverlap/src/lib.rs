//! Removing overlaps from TrueType glyph outlines.
//!
//! Given a set of glyphs and their horizontal metrics, [`simplify_glyph_set`]
//! rewrites every glyph whose contours overlap into an equivalent outline
//! without overlaps:
//!
//! - simple glyphs are merged with a boolean union, retrying on the integer
//!   grid if the floating point attempt fails;
//! - composite glyphs are only decomposed if their components overlap each
//!   other, judged against the already simplified components;
//! - contours left smaller than a minimum area are dropped;
//! - the left side bearing of every rewritten glyph is set to its new
//!   horizontal minimum;
//! - hinting instructions of rewritten glyphs are cleared.
//!
//! Reading and writing the font itself is left to a codec; this crate works
//! on in-memory [`GlyphSet`]s, or on anything implementing [`GlyphStore`].
//!
//! ```
//! use deoverlap::{GlyphSet, HorizontalMetric, HorizontalMetricTable, Options, Path};
//! # use deoverlap::kurbo::BezPath;
//! # fn square(x: f64, size: f64) -> BezPath {
//! #     let mut path = BezPath::new();
//! #     path.move_to((x, 0.0));
//! #     path.line_to((x, size));
//! #     path.line_to((x + size, size));
//! #     path.line_to((x + size, 0.0));
//! #     path.close_path();
//! #     path
//! # }
//! let mut outline = square(0.0, 20.0);
//! for el in square(10.0, 20.0).elements() {
//!     outline.push(*el);
//! }
//!
//! let mut glyphs = GlyphSet::new();
//! glyphs.insert("ring", Path::from_bezpath(&outline).unwrap());
//! let mut metrics = HorizontalMetricTable::new();
//! metrics.insert("ring", HorizontalMetric::new(600, 0));
//!
//! let report =
//!     deoverlap::simplify_glyph_set(&mut glyphs, &mut metrics, &Options::default()).unwrap();
//! assert!(report.is_modified("ring"));
//! ```

#![forbid(unsafe_code)]

pub mod pathops;

mod draw;
mod error;
mod glyph;
mod hinting;
mod metrics;
mod options;
mod overlap;
mod path;
mod pipeline;
mod prune;
mod report;
mod round;
mod schedule;
mod simplify;
mod store;

pub use draw::{draw_glyph, COMPOSITE_RECURSION_LIMIT};
pub use error::Error;
pub use glyph::{Component, CompositeGlyph, Glyph, GlyphName, SimpleGlyph};
pub use hinting::strip_hinting;
pub use metrics::reconcile_metric;
pub use options::Options;
pub use overlap::{components_overlap, ComponentOverlap};
pub use path::{Contour, MalformedPath, Path};
pub use pipeline::{simplify_glyph_set, simplify_glyphs};
#[cfg(feature = "rayon")]
pub use pipeline::{simplify_glyph_set_parallel, simplify_glyphs_parallel};
pub use prune::{prune_tiny_contours, PrunedContour, DEFAULT_MIN_CONTOUR_AREA};
pub use report::{Diagnostic, Report};
pub use round::OtRound;
pub use schedule::{Schedule, ScheduledGlyph};
pub use simplify::{simplify_with_fallback, Simplified};
pub use store::{GlyphSet, GlyphStore, GlyphTables, HorizontalMetric, HorizontalMetricTable};

/// Re-exported so callers can build transforms and outlines.
pub use kurbo;
