//! Boolean operations backed by `i_overlay`
//!
//! The overlay works on polygons, so curves are split into chords first.
//! Every chord end point is remembered along with the curve parameter it
//! came from; output vertices are traced back to those points, and spans of
//! a single input curve are re-emitted as quadratic subsegments of it.
//!
//! Output loops that reproduce an input contour are replaced by that
//! contour, so paths without overlaps come back unchanged.

use std::collections::HashMap;

use i_overlay::{
    core::{fill_rule::FillRule, overlay_rule::OverlayRule},
    float::single::SingleFloatOverlay,
};
use kurbo::{Line, ParamCurve, PathSeg, Point};

use super::PrecisionError;
use crate::path::{Contour, Path};

/// Default maximum distance between a curve and its chords, in design units
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Results smaller than this are considered empty
pub(crate) const AREA_EPSILON: f64 = 1e-6;

/// Distinct input points closer than this cannot be told apart reliably
const NEAR_COINCIDENT: f64 = 1e-9;

/// Output vertices this close to an input point are moved onto it
const SNAP_DISTANCE: f64 = 1e-4;

/// Side length of the cells used to look up input points
const SNAP_CELL: f64 = 1e-3;

const MAX_CHORDS_PER_CURVE: usize = 64;

/// How the filled regions of the two operands are combined
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FillOp {
    /// Filled if inside either operand
    Union,
    /// Filled if inside both operands
    Intersection,
}

impl FillOp {
    fn overlay_rule(self) -> OverlayRule {
        match self {
            FillOp::Union => OverlayRule::Union,
            FillOp::Intersection => OverlayRule::Intersect,
        }
    }
}

/// Run `op` over the filled regions of `subject` and `clip`, nonzero rule.
pub(crate) fn boolean(
    subject: &Path,
    clip: &Path,
    op: FillOp,
    tolerance: f64,
) -> Result<Path, PrecisionError> {
    let mut input = Flattened::new(tolerance);
    let subject_polygons = input.add_path(subject)?;
    let clip_polygons = input.add_path(clip)?;
    let shapes = subject_polygons.overlay(&clip_polygons, op.overlay_rule(), FillRule::NonZero);
    log::trace!(
        "overlay: {} curves, {} input points, {} shapes",
        input.curves.len(),
        input.samples.len(),
        shapes.len()
    );

    let mut output = Vec::new();
    for shape in shapes {
        // the first ring of a shape is its outline, the others are holes
        for (idx, ring) in shape.into_iter().enumerate() {
            if let Some(found) = input.rebuild(ring, idx == 0) {
                output.push(found);
            }
        }
    }
    output.sort_by(|(a_src, a), (b_src, b)| match (a_src, b_src) {
        (Some(a_src), Some(b_src)) => a_src.cmp(b_src),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => compare_points(a.start(), b.start()),
    });
    Ok(output.into_iter().map(|(_, contour)| contour).collect())
}

/// A curve from the input and the number of chords it was split into
struct Curve {
    seg: PathSeg,
    steps: usize,
}

impl Curve {
    fn step(&self) -> f64 {
        1.0 / self.steps as f64
    }

    fn point_at(&self, t: f64) -> Point {
        if t <= 0.0 {
            self.seg.start()
        } else if t >= 1.0 {
            self.seg.end()
        } else {
            self.seg.eval(t)
        }
    }
}

/// A polygon vertex handed to the overlay
#[derive(Clone, Copy, Debug)]
struct Sample {
    point: Point,
    /// Curve index and parameter, if the point lies on a curve
    curve: Option<(usize, f64)>,
}

/// An output vertex, with the curves it was traced back to
#[derive(Clone, Debug)]
struct Vertex {
    point: Point,
    curves: Vec<(usize, f64)>,
}

/// A maximal piece of an output contour: a straight run or a curve span
#[derive(Clone, Copy, Debug)]
struct Run {
    start: Point,
    end: Point,
    /// Curve index and curve parameters at `start` and `end`
    curve: Option<(usize, f64, f64)>,
}

struct Flattened {
    tolerance: f64,
    contours: Vec<Contour>,
    curves: Vec<Curve>,
    samples: Vec<Sample>,
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl Flattened {
    fn new(tolerance: f64) -> Self {
        Flattened {
            tolerance,
            contours: Vec::new(),
            curves: Vec::new(),
            samples: Vec::new(),
            cells: HashMap::new(),
        }
    }

    /// Flatten `path` into polygons, recording where every vertex came from.
    fn add_path(&mut self, path: &Path) -> Result<Vec<Vec<[f64; 2]>>, PrecisionError> {
        let mut polygons = Vec::with_capacity(path.len());
        for contour in path.contours() {
            let mut points = Vec::new();
            for seg in contour.segments() {
                check_segment(&seg)?;
                if let PathSeg::Line(line) = seg {
                    self.record(line.p0, None);
                    points.push(line.p0);
                    continue;
                }
                let curve = self.curves.len();
                let steps = chord_count(&seg, self.tolerance);
                self.curves.push(Curve { seg, steps });
                for i in 0..=steps {
                    let t = i as f64 / steps as f64;
                    let point = self.curves[curve].point_at(t);
                    self.record(point, Some((curve, t)));
                    // the end point is pushed by the next segment
                    if i < steps {
                        points.push(point);
                    }
                }
            }
            points.dedup();
            polygons.push(points.into_iter().map(|pt| [pt.x, pt.y]).collect());
            self.contours.push(contour.clone());
        }
        Ok(polygons)
    }

    fn record(&mut self, point: Point, curve: Option<(usize, f64)>) {
        let idx = self.samples.len();
        self.samples.push(Sample { point, curve });
        self.cells.entry(cell(point)).or_default().push(idx);
    }

    /// Snap `point` onto the nearest input point and collect its curves.
    fn vertex(&self, point: Point) -> Vertex {
        let (cx, cy) = cell(point);
        let mut nearest: Option<(f64, Point)> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(candidates) = self.cells.get(&(cx + dx, cy + dy)) else {
                    continue;
                };
                for sample in candidates.iter().map(|idx| &self.samples[*idx]) {
                    let dist = sample.point.distance(point);
                    if dist <= SNAP_DISTANCE && nearest.is_none_or(|(best, _)| dist < best) {
                        nearest = Some((dist, sample.point));
                    }
                }
            }
        }
        let Some((_, snapped)) = nearest else {
            return Vertex {
                point,
                curves: Vec::new(),
            };
        };
        let curves = self.cells[&cell(snapped)]
            .iter()
            .map(|idx| &self.samples[*idx])
            .filter(|sample| sample.point == snapped)
            .filter_map(|sample| sample.curve)
            .collect();
        Vertex {
            point: snapped,
            curves,
        }
    }

    /// Turn one ring of the overlay result back into a contour.
    ///
    /// Returns the index of the input contour it reproduces, if any.
    fn rebuild(&self, ring: Vec<[f64; 2]>, outer: bool) -> Option<(Option<usize>, Contour)> {
        let mut vertices = ring
            .into_iter()
            .map(|[x, y]| self.vertex(Point::new(x, y)))
            .collect::<Vec<_>>();
        vertices.dedup_by(|a, b| a.point == b.point);
        if vertices.len() > 1 && vertices[0].point == vertices[vertices.len() - 1].point {
            vertices.pop();
        }
        if vertices.len() < 3 {
            return None;
        }
        // outlines wind clockwise, holes counter-clockwise (y up)
        if (clockwise_area(&vertices) > 0.0) != outer {
            vertices.reverse();
        }
        let n = vertices.len();
        let runs = (0..n)
            .map(|i| {
                let (a, b) = (&vertices[i], &vertices[(i + 1) % n]);
                Run {
                    start: a.point,
                    end: b.point,
                    curve: self.trace(a, b),
                }
            })
            .collect::<Vec<_>>();
        let contour = self.loop_to_contour(runs)?;
        if contour.area().abs() <= AREA_EPSILON {
            return None;
        }
        for (idx, original) in self.contours.iter().enumerate() {
            if same_loop(original, &contour) {
                return Some((Some(idx), original.clone()));
            }
            let reversed = original.reversed();
            if same_loop(&reversed, &contour) {
                return Some((Some(idx), reversed));
            }
        }
        Some((None, contour))
    }

    /// Find the curve span an output edge follows, if it follows one.
    fn trace(&self, a: &Vertex, b: &Vertex) -> Option<(usize, f64, f64)> {
        for &(curve, t_a) in &a.curves {
            for &(other, t_b) in &b.curves {
                if other == curve
                    && t_a != t_b
                    && self.follows_curve(curve, t_a, t_b, a.point, b.point)
                {
                    return Some((curve, t_a, t_b));
                }
            }
        }
        // one end is a crossing in the middle of a chord; when both are,
        // the edge stays a line within tolerance of the curve
        self.partial_chord(a, b.point)
            .or_else(|| {
                self.partial_chord(b, a.point)
                    .map(|(curve, t_b, t_a)| (curve, t_a, t_b))
            })
    }

    /// `true` if the straight edge `p..q` stands for the span `t_a..t_b`.
    fn follows_curve(&self, curve: usize, t_a: f64, t_b: f64, p: Point, q: Point) -> bool {
        let curve = &self.curves[curve];
        if ((t_a - t_b).abs() - curve.step()).abs() < 1e-9 {
            return true;
        }
        // consecutive chords the overlay merged for being collinear
        let mid = curve.point_at((t_a + t_b) / 2.0);
        distance_to_line(mid, Line::new(p, q)) <= self.tolerance
    }

    /// Locate `other` on one of the chords leaving `from` along its curves.
    ///
    /// Returns the curve and the parameters at `from` and at `other`.
    fn partial_chord(&self, from: &Vertex, other: Point) -> Option<(usize, f64, f64)> {
        for &(curve_idx, t) in &from.curves {
            let curve = &self.curves[curve_idx];
            for t_end in [t + curve.step(), t - curve.step()] {
                if !(-1e-9..=1.0 + 1e-9).contains(&t_end) {
                    continue;
                }
                let t_end = t_end.clamp(0.0, 1.0);
                let chord = curve.point_at(t_end) - from.point;
                let len2 = chord.hypot2();
                if len2 == 0.0 {
                    continue;
                }
                let offset = other - from.point;
                let s = offset.dot(chord) / len2;
                let distance = offset.cross(chord).abs() / len2.sqrt();
                if s > 0.0 && s <= 1.0 + 1e-9 && distance <= SNAP_DISTANCE {
                    return Some((curve_idx, t, t + (t_end - t) * s.min(1.0)));
                }
            }
        }
        None
    }

    /// Merge a loop's pieces into maximal runs and rebuild segments.
    fn loop_to_contour(&self, runs: Vec<Run>) -> Option<Contour> {
        let n = runs.len();
        // start at a break between two runs that cannot be merged
        let first = (0..n)
            .find(|i| !can_merge(&runs[(i + n - 1) % n], &runs[*i]))
            .unwrap_or(0);
        let mut merged: Vec<Run> = Vec::with_capacity(n);
        for run in runs[first..].iter().chain(&runs[..first]) {
            match merged.last_mut() {
                Some(last) if can_merge(last, run) => {
                    last.end = run.end;
                    if let (Some((_, _, t_end)), Some((_, _, next_end))) =
                        (last.curve.as_mut(), run.curve)
                    {
                        *t_end = next_end;
                    }
                }
                _ => merged.push(*run),
            }
        }
        let lowest = merged
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| compare_points(a.start, b.start))
            .map(|(i, _)| i)
            .unwrap_or(0);
        merged.rotate_left(lowest);
        let segments = merged
            .iter()
            .map(|run| self.run_to_segment(run))
            .collect::<Vec<_>>();
        Contour::from_segments(&segments)
    }

    fn run_to_segment(&self, run: &Run) -> PathSeg {
        let Some((curve, t_start, t_end)) = run.curve else {
            return PathSeg::Line(Line::new(run.start, run.end));
        };
        let source = self.curves[curve].seg;
        let span = if t_start == 0.0 && t_end == 1.0 {
            source
        } else if t_start == 1.0 && t_end == 0.0 {
            source.reverse()
        } else if t_start < t_end {
            source.subsegment(t_start..t_end)
        } else {
            source.subsegment(t_end..t_start).reverse()
        };
        // end points snap to the vertices shared with neighbouring runs
        match span {
            PathSeg::Line(_) => PathSeg::Line(Line::new(run.start, run.end)),
            PathSeg::Quad(mut quad) => {
                quad.p0 = run.start;
                quad.p2 = run.end;
                PathSeg::Quad(quad)
            }
            PathSeg::Cubic(mut cubic) => {
                cubic.p0 = run.start;
                cubic.p3 = run.end;
                PathSeg::Cubic(cubic)
            }
        }
    }
}

fn cell(point: Point) -> (i64, i64) {
    (
        (point.x / SNAP_CELL).floor() as i64,
        (point.y / SNAP_CELL).floor() as i64,
    )
}

fn control_points(seg: &PathSeg) -> Vec<Point> {
    match seg {
        PathSeg::Line(line) => vec![line.p0, line.p1],
        PathSeg::Quad(quad) => vec![quad.p0, quad.p1, quad.p2],
        PathSeg::Cubic(cubic) => vec![cubic.p0, cubic.p1, cubic.p2, cubic.p3],
    }
}

fn check_segment(seg: &PathSeg) -> Result<(), PrecisionError> {
    let points = control_points(seg);
    if points.iter().any(|pt| !pt.is_finite()) {
        return Err(PrecisionError::NonFinite);
    }
    for pair in points.windows(2) {
        let dist = pair[0].distance(pair[1]);
        if dist > 0.0 && dist < NEAR_COINCIDENT {
            return Err(PrecisionError::NearCoincident(pair[0]));
        }
    }
    Ok(())
}

/// Number of equal parameter steps keeping chords within `tolerance` of the curve.
fn chord_count(curve: &PathSeg, tolerance: f64) -> usize {
    let second_difference = match curve {
        PathSeg::Line(_) => return 1,
        PathSeg::Quad(quad) => {
            (quad.p0.to_vec2() - quad.p1.to_vec2() * 2.0 + quad.p2.to_vec2()).hypot()
        }
        PathSeg::Cubic(cubic) => {
            let d0 = cubic.p0.to_vec2() - cubic.p1.to_vec2() * 2.0 + cubic.p2.to_vec2();
            let d1 = cubic.p1.to_vec2() - cubic.p2.to_vec2() * 2.0 + cubic.p3.to_vec2();
            d0.hypot().max(d1.hypot()) * 1.5
        }
    };
    let n = (second_difference / (4.0 * tolerance.max(f64::EPSILON)))
        .sqrt()
        .ceil();
    (n as usize).clamp(1, MAX_CHORDS_PER_CURVE)
}

/// Shoelace area of a polygon; positive when clockwise with y up.
fn clockwise_area(vertices: &[Vertex]) -> f64 {
    let n = vertices.len();
    let twice = (0..n)
        .map(|i| {
            let (a, b) = (vertices[i].point, vertices[(i + 1) % n].point);
            b.x * a.y - a.x * b.y
        })
        .sum::<f64>();
    twice / 2.0
}

fn distance_to_line(point: Point, line: Line) -> f64 {
    let d = line.p1 - line.p0;
    let len2 = d.hypot2();
    if len2 == 0.0 {
        return point.distance(line.p0);
    }
    let s = ((point - line.p0).dot(d) / len2).clamp(0.0, 1.0);
    point.distance(line.p0 + d * s)
}

fn can_merge(a: &Run, b: &Run) -> bool {
    match (a.curve, b.curve) {
        (Some((curve_a, _, t_end)), Some((curve_b, t_start, _))) => {
            curve_a == curve_b && t_end == t_start
        }
        (None, None) => {
            let (da, db) = (a.end - a.start, b.end - b.start);
            da.cross(db).abs() <= 1e-9 * da.hypot() * db.hypot() && da.dot(db) > 0.0
        }
        _ => false,
    }
}

/// `true` if both contours trace the same segments, from any start point.
fn same_loop(a: &Contour, b: &Contour) -> bool {
    let a = a.segments().collect::<Vec<_>>();
    let b = b.segments().collect::<Vec<_>>();
    if a.len() != b.len() {
        return false;
    }
    let n = a.len();
    (0..n).any(|shift| (0..n).all(|i| a[(i + shift) % n] == b[i]))
}

fn compare_points(a: Point, b: Point) -> std::cmp::Ordering {
    a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y))
}
