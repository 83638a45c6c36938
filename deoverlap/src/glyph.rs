//! Simple and composite glyphs

use std::{borrow::Borrow, fmt};

use kurbo::Affine;

use crate::path::Path;

/// The name of a glyph, unique within a font's glyph order.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct GlyphName(String);

/// A glyph outline plus its hinting program.
#[derive(Clone, Debug, PartialEq)]
pub enum Glyph {
    Simple(SimpleGlyph),
    Composite(CompositeGlyph),
}

/// A glyph drawn with its own contours.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimpleGlyph {
    pub path: Path,
    pub instructions: Vec<u8>,
    /// The OVERLAP_SIMPLE flag: the contours of this glyph may overlap.
    pub overlap: bool,
}

/// A glyph made of transformed references to other glyphs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompositeGlyph {
    pub components: Vec<Component>,
    pub instructions: Vec<u8>,
}

/// A single component glyph (part of a [`CompositeGlyph`]).
#[derive(Clone, Debug, PartialEq)]
pub struct Component {
    pub base: GlyphName,
    pub transform: Affine,
    /// The OVERLAP_COMPOUND flag: the components of the composite may overlap.
    pub overlap_compound: bool,
}

impl GlyphName {
    pub fn new(name: impl Into<String>) -> Self {
        GlyphName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Glyph {
    /// A glyph with no contours, components or instructions.
    pub fn empty() -> Self {
        Glyph::Simple(SimpleGlyph::default())
    }

    /// `true` if the glyph contains no contours or components.
    pub fn is_empty(&self) -> bool {
        match self {
            Glyph::Simple(glyph) => glyph.path.is_empty(),
            Glyph::Composite(glyph) => glyph.components.is_empty(),
        }
    }

    pub fn instructions(&self) -> &[u8] {
        match self {
            Glyph::Simple(glyph) => &glyph.instructions,
            Glyph::Composite(glyph) => &glyph.instructions,
        }
    }

    pub fn instructions_mut(&mut self) -> &mut Vec<u8> {
        match self {
            Glyph::Simple(glyph) => &mut glyph.instructions,
            Glyph::Composite(glyph) => &mut glyph.instructions,
        }
    }

    /// Clear OVERLAP_SIMPLE, or OVERLAP_COMPOUND on every component.
    ///
    /// Returns `true` if any flag was set.
    pub fn clear_overlap_flags(&mut self) -> bool {
        match self {
            Glyph::Simple(glyph) => std::mem::take(&mut glyph.overlap),
            Glyph::Composite(glyph) => glyph
                .components
                .iter_mut()
                .fold(false, |cleared, component| {
                    std::mem::take(&mut component.overlap_compound) || cleared
                }),
        }
    }

    /// The components of a composite glyph; empty for simple glyphs.
    pub fn components(&self) -> &[Component] {
        match self {
            Glyph::Simple(_) => &[],
            Glyph::Composite(glyph) => &glyph.components,
        }
    }
}

impl SimpleGlyph {
    pub fn new(path: Path) -> Self {
        SimpleGlyph {
            path,
            ..Default::default()
        }
    }
}

impl CompositeGlyph {
    pub fn new(components: Vec<Component>) -> Self {
        CompositeGlyph {
            components,
            instructions: Vec::new(),
        }
    }
}

impl Component {
    /// Create a new component placing `base` with `transform`.
    pub fn new(base: impl Into<GlyphName>, transform: Affine) -> Self {
        Component {
            base: base.into(),
            transform,
            overlap_compound: false,
        }
    }

    /// A component only offset from its base's origin.
    pub fn offset(base: impl Into<GlyphName>, dx: f64, dy: f64) -> Self {
        Component::new(base, Affine::translate((dx, dy)))
    }
}

impl From<SimpleGlyph> for Glyph {
    fn from(src: SimpleGlyph) -> Glyph {
        Glyph::Simple(src)
    }
}

impl From<CompositeGlyph> for Glyph {
    fn from(src: CompositeGlyph) -> Glyph {
        Glyph::Composite(src)
    }
}

impl From<Path> for Glyph {
    fn from(src: Path) -> Glyph {
        Glyph::Simple(SimpleGlyph::new(src))
    }
}

impl From<&str> for GlyphName {
    fn from(src: &str) -> GlyphName {
        GlyphName(src.to_owned())
    }
}

impl From<String> for GlyphName {
    fn from(src: String) -> GlyphName {
        GlyphName(src)
    }
}

impl From<&GlyphName> for GlyphName {
    fn from(src: &GlyphName) -> GlyphName {
        src.clone()
    }
}

impl Borrow<str> for GlyphName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for GlyphName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for GlyphName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for GlyphName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for GlyphName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::test_shapes::*;

    #[test]
    fn empty_glyphs() {
        assert!(Glyph::empty().is_empty());
        assert!(Glyph::from(CompositeGlyph::default()).is_empty());
        assert!(!Glyph::from(path([square(0.0, 0.0, 10.0)])).is_empty());
    }

    #[test]
    fn instructions_are_shared_between_kinds() {
        let mut glyph = Glyph::from(CompositeGlyph::new(vec![Component::offset("a", 0.0, 0.0)]));
        glyph.instructions_mut().extend([0xb0, 0x01]);
        assert_eq!(glyph.instructions(), &[0xb0, 0x01]);
        assert_eq!(glyph.components().len(), 1);
        assert_eq!(glyph.components()[0].base, "a");
    }

    #[test]
    fn clear_overlap_flags() {
        let mut simple = SimpleGlyph::new(path([square(0.0, 0.0, 10.0)]));
        simple.overlap = true;
        let mut glyph = Glyph::from(simple);
        assert!(glyph.clear_overlap_flags());
        assert!(!glyph.clear_overlap_flags());

        let mut flagged = Component::offset("b", 10.0, 0.0);
        flagged.overlap_compound = true;
        let mut glyph = Glyph::from(CompositeGlyph::new(vec![
            Component::offset("a", 0.0, 0.0),
            flagged,
        ]));
        assert!(glyph.clear_overlap_flags());
        assert!(glyph.components().iter().all(|component| !component.overlap_compound));
        assert!(!glyph.clear_overlap_flags());
    }
}
