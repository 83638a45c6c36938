//! Driving overlap removal over a whole glyph set
//!
//! Each glyph is first evaluated against the current state of the store,
//! which only reads, and then committed, which writes the outline, metric
//! and instructions together. Evaluating a whole depth tier before
//! committing any of it is what allows the tier to be evaluated in parallel.

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::{
    draw::draw_glyph,
    error::Error,
    glyph::{Glyph, GlyphName, SimpleGlyph},
    hinting::strip_hinting,
    metrics::reconcile_metric,
    options::Options,
    overlap::{components_overlap, ComponentOverlap},
    path::Path,
    pathops::{Engine, PathOps, PrecisionError},
    prune::prune_tiny_contours,
    report::{Diagnostic, Report},
    schedule::Schedule,
    simplify::simplify_with_fallback,
    store::{GlyphSet, GlyphStore, GlyphTables, HorizontalMetricTable},
};

/// Remove overlaps from every glyph in `glyphs`, updating `metrics` to match.
///
/// Glyphs are processed in order of composite depth, so that composites are
/// judged against their already simplified components. A composite is only
/// decomposed if its components overlap each other.
///
/// On error, glyphs committed before the failing one stay rewritten.
pub fn simplify_glyph_set(
    glyphs: &mut GlyphSet,
    metrics: &mut HorizontalMetricTable,
    options: &Options,
) -> Result<Report, Error> {
    simplify_glyphs(&mut GlyphTables::new(glyphs, metrics), &Engine::default(), options)
}

/// Like [`simplify_glyph_set`], evaluating each depth tier in parallel.
///
/// The result is identical to the sequential version.
#[cfg(feature = "rayon")]
pub fn simplify_glyph_set_parallel(
    glyphs: &mut GlyphSet,
    metrics: &mut HorizontalMetricTable,
    options: &Options,
) -> Result<Report, Error> {
    simplify_glyphs_parallel(&mut GlyphTables::new(glyphs, metrics), &Engine::default(), options)
}

/// Remove overlaps from the glyphs of any [`GlyphStore`] with any [`PathOps`] engine.
pub fn simplify_glyphs<S, E>(
    store: &mut S,
    engine: &E,
    options: &Options,
) -> Result<Report, Error>
where
    S: GlyphStore + ?Sized,
    E: PathOps + ?Sized,
{
    let schedule = Schedule::new(&*store, options.glyph_filter.as_ref())?;
    log::debug!("Scheduled {} glyphs", schedule.len());
    let mut report = Report::default();
    for entry in schedule.iter() {
        let evaluated = evaluate(&*store, engine, &entry.name, options)?;
        commit(store, evaluated, options, &mut report)?;
    }
    log_summary(&report);
    Ok(report)
}

/// Parallel version of [`simplify_glyphs`].
///
/// Glyphs of one depth tier are evaluated concurrently; commits happen in
/// schedule order once the whole tier is done. If evaluating a glyph fails,
/// the glyphs before it in the tier are still committed.
#[cfg(feature = "rayon")]
pub fn simplify_glyphs_parallel<S, E>(
    store: &mut S,
    engine: &E,
    options: &Options,
) -> Result<Report, Error>
where
    S: GlyphStore + Sync + ?Sized,
    E: PathOps + Sync + ?Sized,
{
    let schedule = Schedule::new(&*store, options.glyph_filter.as_ref())?;
    log::debug!("Scheduled {} glyphs", schedule.len());
    let mut report = Report::default();
    for tier in schedule.tiers() {
        let shared = &*store;
        let evaluated = tier
            .par_iter()
            .map(|entry| evaluate(shared, engine, &entry.name, options))
            .collect::<Vec<_>>();
        for glyph in evaluated {
            commit(store, glyph?, options, &mut report)?;
        }
    }
    log_summary(&report);
    Ok(report)
}

/// What should happen to one glyph
#[derive(Debug)]
struct Evaluated {
    name: GlyphName,
    outcome: Result<Outcome, PrecisionError>,
    diagnostics: Vec<Diagnostic>,
}

#[derive(Debug)]
enum Outcome {
    /// Leave the outline alone; `overlap_free` if it was shown not to overlap
    Unchanged { overlap_free: bool },
    /// Replace the glyph with a simple glyph drawing this outline
    Rewrite(Path),
}

fn evaluate<S, E>(
    store: &S,
    engine: &E,
    name: &GlyphName,
    options: &Options,
) -> Result<Evaluated, Error>
where
    S: GlyphStore + ?Sized,
    E: PathOps + ?Sized,
{
    let mut evaluated = Evaluated {
        name: name.clone(),
        outcome: Ok(Outcome::Unchanged {
            overlap_free: false,
        }),
        diagnostics: Vec::new(),
    };
    let Some(glyph) = store.read_glyph(name.as_str()) else {
        return Ok(evaluated);
    };

    let (input, decomposed) = match glyph {
        Glyph::Simple(simple) if simple.path.is_empty() => return Ok(evaluated),
        Glyph::Simple(simple) => (simple.path.clone(), false),
        Glyph::Composite(composite) if composite.components.len() < 2 => return Ok(evaluated),
        Glyph::Composite(composite) => {
            let components = composite
                .components
                .iter()
                .map(|component| draw_glyph(store, component.base.as_str(), component.transform))
                .collect::<Result<Vec<_>, _>>()?;
            match components_overlap(engine, &components) {
                ComponentOverlap::None => {
                    log::debug!("Components of '{name}' do not overlap");
                    evaluated.outcome = Ok(Outcome::Unchanged { overlap_free: true });
                    return Ok(evaluated);
                }
                ComponentOverlap::Found { first, second } => {
                    log::debug!("Components {first} and {second} of '{name}' overlap");
                }
                ComponentOverlap::Assumed { first, second, error } => {
                    log::warn!(
                        "Assuming components {first} and {second} of '{name}' overlap: {error}"
                    );
                    evaluated.diagnostics.push(Diagnostic::IntersectionAssumed {
                        glyph: name.clone(),
                        first,
                        second,
                        error,
                    });
                }
            }
            evaluated.diagnostics.push(Diagnostic::Decomposed { glyph: name.clone() });
            let path = components.into_iter().flat_map(Path::into_contours).collect::<Path>();
            (path, true)
        }
    };

    let simplified = match simplify_with_fallback(engine, &input) {
        Ok(simplified) => simplified,
        Err(error) => {
            evaluated.outcome = Err(error);
            return Ok(evaluated);
        }
    };
    if simplified.rounded {
        log::debug!("'{name}' only simplified after rounding");
        evaluated
            .diagnostics
            .push(Diagnostic::RoundedRetry { glyph: name.clone() });
    }
    // prune after rounding, which can shrink a contour below the threshold
    let returned_input = !decomposed && simplified.path.same_contours(&input);
    let (path, pruned) = prune_tiny_contours(simplified.path.ot_round(), options.min_contour_area);
    if (returned_input && pruned.is_empty()) || (!decomposed && path.same_contours(&input)) {
        evaluated.diagnostics.clear();
        evaluated.outcome = Ok(Outcome::Unchanged { overlap_free: true });
        return Ok(evaluated);
    }
    evaluated
        .diagnostics
        .extend(pruned.into_iter().map(|pruned| Diagnostic::ContourPruned {
            glyph: name.clone(),
            index: pruned.index,
            area: pruned.area,
        }));
    evaluated.outcome = Ok(Outcome::Rewrite(path));
    Ok(evaluated)
}

fn commit<S: GlyphStore + ?Sized>(
    store: &mut S,
    evaluated: Evaluated,
    options: &Options,
    report: &mut Report,
) -> Result<(), Error> {
    let Evaluated {
        name,
        outcome,
        mut diagnostics,
    } = evaluated;
    match outcome {
        Err(error) if options.ignore_errors => {
            log::warn!("Skipping '{name}': {error}");
            report.skipped.insert(name, error);
            return Ok(());
        }
        Err(error) => {
            return Err(Error::SimplificationFailed {
                glyph: name,
                source: error,
                completed: Box::new(std::mem::take(report)),
            });
        }
        Ok(Outcome::Unchanged { overlap_free }) => {
            log::debug!("'{name}' unchanged");
            if let Some(mut glyph) = store.read_glyph(name.as_str()).cloned() {
                let mut touched = false;
                if overlap_free && glyph.clear_overlap_flags() {
                    diagnostics.push(Diagnostic::OverlapFlagCleared { glyph: name.clone() });
                    touched = true;
                }
                if options.strip_hinting && strip_hinting(&mut glyph) {
                    diagnostics.push(Diagnostic::HintingStripped { glyph: name.clone() });
                    touched = true;
                }
                if touched {
                    store.write_glyph(&name, glyph);
                }
            }
            report.unchanged.insert(name);
        }
        Ok(Outcome::Rewrite(path)) => {
            log::debug!("Rewriting '{name}' with {} contours", path.len());
            let instructions = store
                .read_glyph(name.as_str())
                .map(|glyph| glyph.instructions().to_vec())
                .unwrap_or_default();
            match store.read_metric(name.as_str()) {
                Some(metric) => store.write_metric(&name, reconcile_metric(&path, metric)),
                None => log::warn!("No horizontal metric for '{name}', side bearing not updated"),
            }
            let mut glyph = Glyph::Simple(SimpleGlyph {
                path,
                instructions,
                overlap: false,
            });
            if strip_hinting(&mut glyph) {
                diagnostics.push(Diagnostic::HintingStripped { glyph: name.clone() });
            }
            store.write_glyph(&name, glyph);
            report.modified.insert(name);
        }
    }
    report.diagnostics.extend(diagnostics);
    Ok(())
}

fn log_summary(report: &Report) {
    log::info!(
        "Removed overlaps: {} glyphs modified, {} unchanged, {} skipped",
        report.modified.len(),
        report.unchanged.len(),
        report.skipped.len()
    );
}
