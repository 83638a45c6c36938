//! Removing contours too small to matter

use crate::path::Path;

/// The default minimum contour area, in square design units.
pub const DEFAULT_MIN_CONTOUR_AREA: f64 = 25.0;

/// A contour dropped by [`prune_tiny_contours`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrunedContour {
    /// Index of the contour in the input path
    pub index: usize,
    /// Signed area of the contour
    pub area: f64,
}

/// Drop every contour whose absolute area is below `min_area`.
pub fn prune_tiny_contours(path: Path, min_area: f64) -> (Path, Vec<PrunedContour>) {
    let mut pruned = Vec::new();
    let kept = path
        .into_contours()
        .into_iter()
        .enumerate()
        .filter_map(|(index, contour)| {
            let area = contour.area();
            if area.abs() < min_area {
                pruned.push(PrunedContour { index, area });
                None
            } else {
                Some(contour)
            }
        })
        .collect();
    (kept, pruned)
}
