//! Access to the glyph outlines and horizontal metrics of a font
//!
//! Decoding and encoding the font container is the business of a codec such
//! as write-fonts; the overlap remover only sees the [`GlyphStore`] trait.

use indexmap::IndexMap;

use crate::glyph::{Glyph, GlyphName};

/// The advance width and left side bearing of a glyph (an hmtx `LongMetric`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HorizontalMetric {
    pub advance: u16,
    pub side_bearing: i16,
}

/// Glyphs keyed by name, in the font's glyph order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlyphSet {
    glyphs: IndexMap<GlyphName, Glyph>,
}

/// Horizontal metrics keyed by glyph name.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HorizontalMetricTable {
    metrics: IndexMap<GlyphName, HorizontalMetric>,
}

/// The font-table collaborator: reads and writes glyphs and their metrics.
///
/// Implementations own the decoded tables; the overlap remover mutates them
/// glyph by glyph and hands them back for serialization.
pub trait GlyphStore {
    /// The names of all glyphs, in glyph order.
    fn glyph_order(&self) -> Vec<GlyphName>;

    fn read_glyph(&self, name: &str) -> Option<&Glyph>;

    fn write_glyph(&mut self, name: &GlyphName, glyph: Glyph);

    fn read_metric(&self, name: &str) -> Option<HorizontalMetric>;

    fn write_metric(&mut self, name: &GlyphName, metric: HorizontalMetric);
}

/// A [`GlyphStore`] over a glyph set and its metrics table.
#[derive(Debug)]
pub struct GlyphTables<'a> {
    pub glyphs: &'a mut GlyphSet,
    pub metrics: &'a mut HorizontalMetricTable,
}

impl HorizontalMetric {
    pub fn new(advance: u16, side_bearing: i16) -> Self {
        HorizontalMetric {
            advance,
            side_bearing,
        }
    }
}

impl GlyphSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a glyph at the end of the glyph order, or replace an existing one
    /// in place.
    pub fn insert(&mut self, name: impl Into<GlyphName>, glyph: impl Into<Glyph>) {
        self.glyphs.insert(name.into(), glyph.into());
    }

    pub fn get(&self, name: &str) -> Option<&Glyph> {
        self.glyphs.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Glyph> {
        self.glyphs.get_mut(name)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &GlyphName> {
        self.glyphs.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GlyphName, &Glyph)> {
        self.glyphs.iter()
    }
}

impl HorizontalMetricTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<GlyphName>, metric: HorizontalMetric) {
        self.metrics.insert(name.into(), metric);
    }

    pub fn get(&self, name: &str) -> Option<HorizontalMetric> {
        self.metrics.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

impl<'a> GlyphTables<'a> {
    pub fn new(glyphs: &'a mut GlyphSet, metrics: &'a mut HorizontalMetricTable) -> Self {
        GlyphTables { glyphs, metrics }
    }
}

impl GlyphStore for GlyphTables<'_> {
    fn glyph_order(&self) -> Vec<GlyphName> {
        self.glyphs.names().cloned().collect()
    }

    fn read_glyph(&self, name: &str) -> Option<&Glyph> {
        self.glyphs.get(name)
    }

    fn write_glyph(&mut self, name: &GlyphName, glyph: Glyph) {
        // replacing keeps the glyph's position in the glyph order
        self.glyphs.insert(name.clone(), glyph);
    }

    fn read_metric(&self, name: &str) -> Option<HorizontalMetric> {
        self.metrics.get(name)
    }

    fn write_metric(&mut self, name: &GlyphName, metric: HorizontalMetric) {
        self.metrics.insert(name.clone(), metric);
    }
}

impl<G: Into<Glyph>> FromIterator<(GlyphName, G)> for GlyphSet {
    fn from_iter<T: IntoIterator<Item = (GlyphName, G)>>(iter: T) -> Self {
        GlyphSet {
            glyphs: iter
                .into_iter()
                .map(|(name, glyph)| (name, glyph.into()))
                .collect(),
        }
    }
}

impl FromIterator<(GlyphName, HorizontalMetric)> for HorizontalMetricTable {
    fn from_iter<T: IntoIterator<Item = (GlyphName, HorizontalMetric)>>(iter: T) -> Self {
        HorizontalMetricTable {
            metrics: iter.into_iter().collect(),
        }
    }
}
