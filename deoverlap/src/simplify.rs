//! Simplifying an outline, retrying on the integer grid if needed

use crate::{
    path::Path,
    pathops::{PathOps, PrecisionError},
};

/// A simplified outline.
#[derive(Clone, Debug, PartialEq)]
pub struct Simplified {
    pub path: Path,
    /// `true` if only the integer-rounded outline could be simplified
    pub rounded: bool,
}

/// Remove overlaps from `path`.
///
/// Inputs with nearly coincident points can defeat the boolean engine;
/// those are rounded to integer coordinates, which is what the font stores
/// anyway, and simplified again. The error of the second attempt is
/// returned if both fail.
pub fn simplify_with_fallback<E: PathOps + ?Sized>(
    engine: &E,
    path: &Path,
) -> Result<Simplified, PrecisionError> {
    match engine.simplify(path) {
        Ok(path) => Ok(Simplified { path, rounded: false }),
        Err(error) => {
            log::debug!("Simplifying failed ({error}), retrying with rounded coordinates");
            let path = engine.simplify(&path.ot_round())?;
            Ok(Simplified { path, rounded: true })
        }
    }
}
