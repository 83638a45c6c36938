//! The outcome of an overlap removal run

use std::fmt;

use indexmap::{IndexMap, IndexSet};

use crate::{glyph::GlyphName, pathops::PrecisionError};

/// What happened to each scheduled glyph, in processing order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Report {
    /// Glyphs whose outline was rewritten
    pub modified: IndexSet<GlyphName>,
    /// Glyphs whose outline was left alone
    pub unchanged: IndexSet<GlyphName>,
    /// Glyphs left untouched because they could not be simplified
    pub skipped: IndexMap<GlyphName, PrecisionError>,
    pub diagnostics: Vec<Diagnostic>,
}

/// An informational event; never an error.
#[derive(Clone, Debug, PartialEq)]
pub enum Diagnostic {
    /// A contour smaller than the minimum area was removed.
    ContourPruned {
        glyph: GlyphName,
        /// Index of the contour in the simplified outline
        index: usize,
        area: f64,
    },
    /// A non-empty hinting program was cleared.
    HintingStripped { glyph: GlyphName },
    /// The glyph was shown not to overlap, so its overlap flags were cleared.
    OverlapFlagCleared { glyph: GlyphName },
    /// A composite with overlapping components became a simple glyph.
    Decomposed { glyph: GlyphName },
    /// The outline only simplified after rounding to integers.
    RoundedRetry { glyph: GlyphName },
    /// Testing two components for overlap failed; they were assumed to overlap.
    IntersectionAssumed {
        glyph: GlyphName,
        first: usize,
        second: usize,
        error: PrecisionError,
    },
}

impl Report {
    pub fn is_modified(&self, glyph: &str) -> bool {
        self.modified.contains(glyph)
    }

    /// Diagnostics about `glyph`.
    pub fn diagnostics_for<'a>(
        &'a self,
        glyph: &'a str,
    ) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.diagnostics
            .iter()
            .filter(move |diagnostic| diagnostic.glyph() == glyph)
    }
}

impl Diagnostic {
    pub fn glyph(&self) -> &GlyphName {
        match self {
            Diagnostic::ContourPruned { glyph, .. }
            | Diagnostic::HintingStripped { glyph }
            | Diagnostic::OverlapFlagCleared { glyph }
            | Diagnostic::Decomposed { glyph }
            | Diagnostic::RoundedRetry { glyph }
            | Diagnostic::IntersectionAssumed { glyph, .. } => glyph,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::ContourPruned { glyph, index, area } => {
                write!(f, "{glyph}: removed contour {index} with area {area}")
            }
            Diagnostic::HintingStripped { glyph } => {
                write!(f, "{glyph}: dropped hinting instructions")
            }
            Diagnostic::OverlapFlagCleared { glyph } => write!(f, "{glyph}: cleared overlap flags"),
            Diagnostic::Decomposed { glyph } => {
                write!(f, "{glyph}: decomposed overlapping components")
            }
            Diagnostic::RoundedRetry { glyph } => {
                write!(f, "{glyph}: simplified after rounding to integer coordinates")
            }
            Diagnostic::IntersectionAssumed {
                glyph,
                first,
                second,
                error,
            } => write!(
                f,
                "{glyph}: assuming components {first} and {second} overlap ({error})"
            ),
        }
    }
}
