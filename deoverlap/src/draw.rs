//! Materializing glyph outlines

use kurbo::Affine;

use crate::{
    error::Error,
    glyph::{Glyph, GlyphName},
    path::Path,
    store::GlyphStore,
};

/// Maximum number of nested composite glyphs followed while drawing.
pub const COMPOSITE_RECURSION_LIMIT: usize = 32;

/// Draw the glyph named `name` with `transform` applied.
///
/// Composite glyphs are flattened: every component's base is drawn (through
/// any number of nested composites) with the combined transform. Contours
/// drawn through a mirroring transform are reversed so they keep their
/// original winding direction.
pub fn draw_glyph<S: GlyphStore + ?Sized>(
    store: &S,
    name: &str,
    transform: Affine,
) -> Result<Path, Error> {
    let glyph = store.read_glyph(name).ok_or_else(|| Error::UnknownGlyph {
        glyph: name.into(),
    })?;
    let mut path = Path::default();
    draw_recurse(store, name, glyph, transform, 0, &mut path)?;
    Ok(path)
}

fn draw_recurse<S: GlyphStore + ?Sized>(
    store: &S,
    name: &str,
    glyph: &Glyph,
    transform: Affine,
    recurse_depth: usize,
    path: &mut Path,
) -> Result<(), Error> {
    if recurse_depth > COMPOSITE_RECURSION_LIMIT {
        return Err(Error::CompositeTooDeep { glyph: name.into() });
    }
    match glyph {
        Glyph::Simple(simple) => {
            let mirrored = transform.determinant() < 0.0;
            for contour in simple.path.contours() {
                let contour = contour.transform(transform);
                path.push(if mirrored { contour.reversed() } else { contour });
            }
        }
        Glyph::Composite(composite) => {
            for component in &composite.components {
                let base = store
                    .read_glyph(component.base.as_str())
                    .ok_or_else(|| Error::MissingComponent {
                        glyph: GlyphName::new(name),
                        component: component.base.clone(),
                    })?;
                draw_recurse(
                    store,
                    component.base.as_str(),
                    base,
                    transform * component.transform,
                    recurse_depth + 1,
                    path,
                )?;
            }
        }
    }
    Ok(())
}
