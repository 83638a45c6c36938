//! Deciding whether the components of a composite glyph overlap

use crate::{
    path::Path,
    pathops::{PathOps, PrecisionError},
};

/// The result of testing a composite's components against each other.
#[derive(Clone, Debug, PartialEq)]
pub enum ComponentOverlap {
    /// No two components share any area.
    None,
    /// Components `first` and `second` overlap.
    Found { first: usize, second: usize },
    /// Testing `first` against `second` failed, so they are treated as overlapping.
    Assumed {
        first: usize,
        second: usize,
        error: PrecisionError,
    },
}

impl ComponentOverlap {
    pub fn needs_decomposition(&self) -> bool {
        !matches!(self, ComponentOverlap::None)
    }
}

/// Test every pair of component outlines for a shared area.
///
/// `components` are the already transformed outlines, in component order.
/// Stops at the first overlapping pair.
pub fn components_overlap<E: PathOps + ?Sized>(
    engine: &E,
    components: &[Path],
) -> ComponentOverlap {
    if components.len() < 2 {
        return ComponentOverlap::None;
    }
    for (first, a) in components.iter().enumerate() {
        for (second, b) in components.iter().enumerate().skip(first + 1) {
            match engine.intersects(a, b) {
                Ok(false) => (),
                Ok(true) => return ComponentOverlap::Found { first, second },
                Err(error) => return ComponentOverlap::Assumed { first, second, error },
            }
        }
    }
    ComponentOverlap::None
}
