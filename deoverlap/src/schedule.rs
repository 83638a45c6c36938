//! Ordering glyphs so that components are processed before their composites

use std::collections::HashMap;

use indexmap::IndexSet;

use crate::{
    error::Error,
    glyph::{Glyph, GlyphName},
    store::GlyphStore,
};

/// Glyphs to process, sorted by `(depth, name)`.
///
/// Every base glyph referenced by a composite has a lower depth than the
/// composite, so processing in this order finalizes bases first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schedule {
    entries: Vec<ScheduledGlyph>,
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScheduledGlyph {
    /// 0 for simple glyphs, otherwise one more than the deepest component
    pub depth: usize,
    pub name: GlyphName,
}

#[derive(Clone, Copy, Debug)]
enum Visit {
    New,
    Open,
    Done(usize),
}

impl Schedule {
    /// Schedule every glyph in `store`, or only those in `filter`.
    ///
    /// Names in `filter` that are not in the glyph order are ignored.
    pub fn new<S: GlyphStore + ?Sized>(
        store: &S,
        filter: Option<&IndexSet<GlyphName>>,
    ) -> Result<Self, Error> {
        let order = store.glyph_order();
        let depths = composite_depths(store, &order)?;
        if let Some(filter) = filter {
            for name in filter.iter().filter(|name| store.read_glyph(name.as_str()).is_none()) {
                log::warn!("Ignoring unknown glyph '{name}' in glyph filter");
            }
        }
        let mut entries = order
            .into_iter()
            .zip(depths)
            .filter(|(name, _)| filter.is_none_or(|filter| filter.contains(name)))
            .map(|(name, depth)| ScheduledGlyph { depth, name })
            .collect::<Vec<_>>();
        entries.sort();
        Ok(Schedule { entries })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduledGlyph> {
        self.entries.iter()
    }

    /// Consecutive runs of glyphs with the same depth.
    pub fn tiers(&self) -> impl Iterator<Item = &[ScheduledGlyph]> {
        self.entries.chunk_by(|a, b| a.depth == b.depth)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The composite depth of each glyph in `order`.
///
/// Walks the component graph depth first with an explicit stack, so deep
/// chains cannot overflow and cycles are reported instead of followed.
fn composite_depths<S: GlyphStore + ?Sized>(
    store: &S,
    order: &[GlyphName],
) -> Result<Vec<usize>, Error> {
    let ids = order
        .iter()
        .enumerate()
        .map(|(id, name)| (name.as_str(), id))
        .collect::<HashMap<_, _>>();
    let components = move |id: usize| {
        store
            .read_glyph(order[id].as_str())
            .map(Glyph::components)
            .unwrap_or_default()
    };

    let mut visits = vec![Visit::New; order.len()];
    // glyph id and the index of the next component to visit
    let mut stack: Vec<(usize, usize)> = Vec::new();
    for root in 0..order.len() {
        if !matches!(visits[root], Visit::New) {
            continue;
        }
        visits[root] = Visit::Open;
        stack.push((root, 0));
        while let Some(top) = stack.last_mut() {
            let (id, next) = *top;
            let Some(component) = components(id).get(next) else {
                let depth = components(id)
                    .iter()
                    .filter_map(|component| match visits[ids[component.base.as_str()]] {
                        Visit::Done(depth) => Some(depth + 1),
                        _ => None,
                    })
                    .max()
                    .unwrap_or(0);
                visits[id] = Visit::Done(depth);
                stack.pop();
                continue;
            };
            top.1 += 1;
            let child = *ids
                .get(component.base.as_str())
                .ok_or_else(|| Error::MissingComponent {
                    glyph: order[id].clone(),
                    component: component.base.clone(),
                })?;
            match visits[child] {
                Visit::New => {
                    visits[child] = Visit::Open;
                    stack.push((child, 0));
                }
                Visit::Open => {
                    return Err(Error::MalformedGlyphGraph {
                        glyph: order[child].clone(),
                    })
                }
                Visit::Done(_) => (),
            }
        }
    }
    Ok(visits
        .into_iter()
        .map(|visit| match visit {
            Visit::Done(depth) => depth,
            _ => 0,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        glyph::{Component, CompositeGlyph},
        path::test_shapes::*,
        store::{GlyphSet, GlyphTables, HorizontalMetricTable},
    };

    fn composite(bases: &[&str]) -> CompositeGlyph {
        CompositeGlyph::new(bases.iter().map(|base| Component::offset(*base, 0.0, 0.0)).collect())
    }

    fn schedule(
        glyphs: &mut GlyphSet,
        filter: Option<&IndexSet<GlyphName>>,
    ) -> Result<Schedule, Error> {
        let mut metrics = HorizontalMetricTable::new();
        Schedule::new(&GlyphTables::new(glyphs, &mut metrics), filter)
    }

    fn names(schedule: &Schedule) -> Vec<&str> {
        schedule.iter().map(|entry| entry.name.as_str()).collect()
    }

    fn sample_glyphs() -> GlyphSet {
        let mut glyphs = GlyphSet::new();
        glyphs.insert("Aacute", composite(&["A", "acutecomb"]));
        glyphs.insert(".notdef", Glyph::empty());
        glyphs.insert("uni01FA", composite(&["Aring", "acutecomb"]));
        glyphs.insert("acutecomb", path([square(0.0, 0.0, 10.0)]));
        glyphs.insert("Aring", composite(&["A", "ringcomb"]));
        glyphs.insert("A", path([square(0.0, 0.0, 100.0)]));
        glyphs.insert("ringcomb", path([square(0.0, 0.0, 20.0)]));
        glyphs
    }

    #[test]
    fn sorted_by_depth_then_name() {
        let mut glyphs = sample_glyphs();
        let schedule = schedule(&mut glyphs, None).unwrap();
        assert_eq!(
            names(&schedule),
            [".notdef", "A", "acutecomb", "ringcomb", "Aacute", "Aring", "uni01FA"]
        );
        let depths = schedule.iter().map(|entry| entry.depth).collect::<Vec<_>>();
        assert_eq!(depths, [0, 0, 0, 0, 1, 1, 2]);
    }

    #[test]
    fn deterministic() {
        let mut glyphs = sample_glyphs();
        let first = schedule(&mut glyphs, None).unwrap();
        let second = schedule(&mut glyphs, None).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn tiers_split_on_depth() {
        let mut glyphs = sample_glyphs();
        let schedule = schedule(&mut glyphs, None).unwrap();
        let sizes = schedule.tiers().map(<[_]>::len).collect::<Vec<_>>();
        assert_eq!(sizes, [4, 2, 1]);
    }

    #[test]
    fn filter_keeps_depths() {
        let mut glyphs = sample_glyphs();
        let filter = ["uni01FA", "A", "nonexistent"]
            .into_iter()
            .map(GlyphName::from)
            .collect::<IndexSet<_>>();
        let schedule = schedule(&mut glyphs, Some(&filter)).unwrap();
        assert_eq!(names(&schedule), ["A", "uni01FA"]);
        assert_eq!(schedule.iter().last().unwrap().depth, 2);
    }

    #[test]
    fn cycle_is_malformed() {
        let mut glyphs = sample_glyphs();
        glyphs.insert("x", composite(&["y"]));
        glyphs.insert("y", composite(&["z", "A"]));
        glyphs.insert("z", composite(&["x"]));
        assert!(matches!(
            schedule(&mut glyphs, None),
            Err(Error::MalformedGlyphGraph { .. })
        ));
    }

    #[test]
    fn self_reference_is_malformed() {
        let mut glyphs = GlyphSet::new();
        glyphs.insert("x", composite(&["x"]));
        assert!(matches!(
            schedule(&mut glyphs, None),
            Err(Error::MalformedGlyphGraph { glyph }) if glyph == "x"
        ));
    }

    #[test]
    fn missing_component() {
        let mut glyphs = GlyphSet::new();
        glyphs.insert("x", composite(&["nope"]));
        assert!(matches!(
            schedule(&mut glyphs, None),
            Err(Error::MissingComponent { glyph, component }) if glyph == "x" && component == "nope"
        ));
    }

    #[test]
    fn deep_chains_do_not_overflow() {
        let mut glyphs = GlyphSet::new();
        glyphs.insert("g0", path([square(0.0, 0.0, 10.0)]));
        for i in 1..5000 {
            let base = format!("g{}", i - 1);
            glyphs.insert(format!("g{i}"), composite(&[base.as_str()]));
        }
        let schedule = schedule(&mut glyphs, None).unwrap();
        assert_eq!(schedule.iter().last().unwrap().depth, 4999);
    }
}
