//! Errors that stop an overlap removal run

use crate::{glyph::GlyphName, pathops::PrecisionError, report::Report};

/// An error that aborts [`simplify_glyph_set`](crate::simplify_glyph_set).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Component reference cycle through glyph '{glyph}'")]
    MalformedGlyphGraph { glyph: GlyphName },

    #[error("Glyph '{glyph}' references missing component '{component}'")]
    MissingComponent {
        glyph: GlyphName,
        component: GlyphName,
    },

    #[error("No glyph named '{glyph}'")]
    UnknownGlyph { glyph: GlyphName },

    #[error("Composite glyph '{glyph}' is nested too deeply")]
    CompositeTooDeep { glyph: GlyphName },

    /// Both the original and the integer-rounded outline failed to simplify.
    ///
    /// Glyphs processed before the failure stay written; `completed` lists them.
    #[error("Removing overlaps from glyph '{glyph}' failed: {source}")]
    SimplificationFailed {
        glyph: GlyphName,
        source: PrecisionError,
        completed: Box<Report>,
    },
}
