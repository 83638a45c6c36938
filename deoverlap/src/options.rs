//! Configuring an overlap removal run

use indexmap::IndexSet;

use crate::{glyph::GlyphName, prune::DEFAULT_MIN_CONTOUR_AREA};

/// Options for [`simplify_glyph_set`](crate::simplify_glyph_set).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Options {
    /// Contours with a smaller absolute area (in square design units) are
    /// removed from rewritten outlines.
    pub min_contour_area: f64,
    /// Clear the hinting instructions of unmodified glyphs as well.
    ///
    /// Rewritten glyphs always lose their instructions.
    pub strip_hinting: bool,
    /// Skip glyphs that cannot be simplified instead of aborting.
    pub ignore_errors: bool,
    /// Only process these glyphs; `None` processes all of them.
    pub glyph_filter: Option<IndexSet<GlyphName>>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            min_contour_area: DEFAULT_MIN_CONTOUR_AREA,
            strip_hinting: true,
            ignore_errors: false,
            glyph_filter: None,
        }
    }
}

impl Options {
    pub fn with_min_contour_area(mut self, min_contour_area: f64) -> Self {
        self.min_contour_area = min_contour_area;
        self
    }

    pub fn with_strip_hinting(mut self, strip_hinting: bool) -> Self {
        self.strip_hinting = strip_hinting;
        self
    }

    pub fn with_ignore_errors(mut self, ignore_errors: bool) -> Self {
        self.ignore_errors = ignore_errors;
        self
    }

    pub fn with_glyph_filter<I, N>(mut self, glyphs: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<GlyphName>,
    {
        self.glyph_filter = Some(glyphs.into_iter().map(Into::into).collect());
        self
    }
}
