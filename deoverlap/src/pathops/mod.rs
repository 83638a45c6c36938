//! The path boolean engine
//!
//! Overlap removal needs two geometric capabilities: merging a path into an
//! equivalent one without self-overlaps, and deciding whether two paths
//! share any area. They are expressed by the [`PathOps`] trait so that the
//! pipeline does not depend on a particular implementation; [`Engine`] is
//! the default one.

mod overlay;

use kurbo::Point;

use crate::path::Path;

pub use overlay::DEFAULT_TOLERANCE;

/// The boolean operations the overlap remover relies on.
pub trait PathOps {
    /// Merge all contours of `path` into non-overlapping, clockwise contours
    /// covering the same area under the nonzero fill rule.
    fn simplify(&self, path: &Path) -> Result<Path, PrecisionError>;

    /// `true` if the filled regions of `a` and `b` share a non-empty area.
    fn intersects(&self, a: &Path, b: &Path) -> Result<bool, PrecisionError>;
}

/// The engine could not produce a reliable result for this input.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum PrecisionError {
    #[error("path contains a non-finite coordinate")]
    NonFinite,
    #[error("distinct points are too close together near {0:?}")]
    NearCoincident(Point),
}

/// The default [`PathOps`] implementation.
///
/// Boolean operations are delegated to `i_overlay` on flattened outlines;
/// segments that survive a merge are re-emitted as lines or quadratic
/// subsegments of the original curves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Engine {
    tolerance: f64,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum distance between a curve and the chords it is
    /// flattened into, in design units.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl PathOps for Engine {
    fn simplify(&self, path: &Path) -> Result<Path, PrecisionError> {
        overlay::boolean(path, &Path::default(), overlay::FillOp::Union, self.tolerance)
    }

    fn intersects(&self, a: &Path, b: &Path) -> Result<bool, PrecisionError> {
        let (Some(a_box), Some(b_box)) = (a.bounding_box(), b.bounding_box()) else {
            return Ok(false);
        };
        if a_box.intersect(b_box).area() <= 0.0 {
            return Ok(false);
        }
        let common = overlay::boolean(a, b, overlay::FillOp::Intersection, self.tolerance)?;
        Ok(common
            .contours()
            .iter()
            .any(|contour| contour.area().abs() > overlay::AREA_EPSILON))
    }
}
