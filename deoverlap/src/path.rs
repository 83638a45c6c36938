//! Glyph outlines made of closed line and quadratic contours

use kurbo::{Affine, BezPath, ParamCurve, PathEl, PathSeg, Point, Rect, Shape};

use crate::round::OtRound;

/// A single closed contour, comprising only line and quadratic bezier segments.
///
/// The contour is stored as a kurbo [`BezPath`] that starts with a single
/// `MoveTo` and ends with a `ClosePath`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Contour(BezPath);

/// An ordered sequence of contours; the drawable outline of one glyph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    contours: Vec<Contour>,
}

/// An error if an input curve cannot be represented as TrueType contours
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum MalformedPath {
    #[error("contours may only contain line and quadratic segments")]
    HasCubic,
    #[error("contour does not begin with a move")]
    MissingMove,
    #[error("contour has no segments")]
    TooSmall,
    #[error("a single contour may not contain more than one subpath")]
    MultipleSubpaths,
}

impl Contour {
    /// Create a contour from a path holding exactly one subpath.
    ///
    /// An unclosed subpath is closed implicitly, as TrueType contours always are.
    pub fn new(path: BezPath) -> Result<Self, MalformedPath> {
        let mut elements = path.elements().iter();
        if !matches!(elements.next(), Some(PathEl::MoveTo(_))) {
            return Err(MalformedPath::MissingMove);
        }
        let mut drawing = 0;
        let mut closed = false;
        for el in elements {
            if closed {
                return Err(MalformedPath::MultipleSubpaths);
            }
            match el {
                PathEl::MoveTo(_) => return Err(MalformedPath::MultipleSubpaths),
                PathEl::CurveTo(..) => return Err(MalformedPath::HasCubic),
                PathEl::LineTo(_) | PathEl::QuadTo(..) => drawing += 1,
                PathEl::ClosePath => closed = true,
            }
        }
        if drawing == 0 {
            return Err(MalformedPath::TooSmall);
        }
        let mut path = path;
        if !closed {
            path.close_path();
        }
        Ok(Contour(path))
    }

    /// Build a contour from a chain of connected segments.
    ///
    /// A trailing line that returns to the start point is folded into the
    /// closing element. Returns `None` if there are no segments.
    pub(crate) fn from_segments(segments: &[PathSeg]) -> Option<Self> {
        let (first, _) = segments.split_first()?;
        let start = first.start();
        let mut path = BezPath::new();
        path.move_to(start);
        let last_idx = segments.len() - 1;
        for (i, seg) in segments.iter().enumerate() {
            match seg {
                PathSeg::Line(line) if i == last_idx && line.p1 == start => (),
                PathSeg::Line(line) => path.line_to(line.p1),
                PathSeg::Quad(quad) => path.quad_to(quad.p1, quad.p2),
                PathSeg::Cubic(cubic) => path.curve_to(cubic.p1, cubic.p2, cubic.p3),
            }
        }
        path.close_path();
        Some(Contour(path))
    }

    /// The underlying kurbo path.
    pub fn as_bezpath(&self) -> &BezPath {
        &self.0
    }

    /// The first on-curve point of the contour.
    pub fn start(&self) -> Point {
        match self.0.elements().first() {
            Some(PathEl::MoveTo(pt)) => *pt,
            _ => Point::ZERO,
        }
    }

    /// Iterate over the segments of this contour, including the implicit
    /// closing line if the last point is not the start point.
    pub fn segments(&self) -> impl Iterator<Item = PathSeg> + '_ {
        self.0.segments()
    }

    /// Signed enclosed area; positive when the contour winds clockwise
    /// (with the y axis pointing up, as in font design space).
    pub fn area(&self) -> f64 {
        // kurbo reports counter-clockwise areas as positive
        -self.0.area()
    }

    pub fn is_clockwise(&self) -> bool {
        self.area() > 0.0
    }

    /// The exact bounding box, taking curve extrema into account.
    pub fn bounding_box(&self) -> Rect {
        self.0.bounding_box()
    }

    /// The same contour traversed in the opposite direction.
    ///
    /// The reversed contour starts at the same point.
    pub fn reversed(&self) -> Contour {
        let mut segments = self.segments().map(|seg| seg.reverse()).collect::<Vec<_>>();
        segments.reverse();
        Contour::from_segments(&segments).unwrap_or_else(|| self.clone())
    }

    pub fn transform(&self, transform: Affine) -> Contour {
        let mut path = self.0.clone();
        path.apply_affine(transform);
        Contour(path)
    }

    /// Round every coordinate to the integer grid.
    ///
    /// Segments that collapse to a single point are removed; if nothing is
    /// left the contour disappears.
    pub fn ot_round(&self) -> Option<Contour> {
        let segments = self
            .segments()
            .filter_map(|seg| match seg {
                PathSeg::Line(mut line) => {
                    line.p0 = line.p0.ot_round();
                    line.p1 = line.p1.ot_round();
                    (line.p0 != line.p1).then_some(PathSeg::Line(line))
                }
                PathSeg::Quad(mut quad) => {
                    quad.p0 = quad.p0.ot_round();
                    quad.p1 = quad.p1.ot_round();
                    quad.p2 = quad.p2.ot_round();
                    (quad.p0 != quad.p2).then_some(PathSeg::Quad(quad))
                }
                PathSeg::Cubic(mut cubic) => {
                    cubic.p0 = cubic.p0.ot_round();
                    cubic.p1 = cubic.p1.ot_round();
                    cubic.p2 = cubic.p2.ot_round();
                    cubic.p3 = cubic.p3.ot_round();
                    (cubic.p0 != cubic.p3).then_some(PathSeg::Cubic(cubic))
                }
            })
            .collect::<Vec<_>>();
        Contour::from_segments(&segments)
    }
}

impl Path {
    pub fn new(contours: Vec<Contour>) -> Self {
        Path { contours }
    }

    /// Split a kurbo path into contours, one per subpath.
    pub fn from_bezpath(path: &BezPath) -> Result<Self, MalformedPath> {
        let mut contours = Vec::new();
        let mut current: Option<BezPath> = None;
        for el in path.elements() {
            match el {
                PathEl::MoveTo(pt) => {
                    if let Some(done) = current.take() {
                        contours.push(Contour::new(done)?);
                    }
                    let mut next = BezPath::new();
                    next.move_to(*pt);
                    current = Some(next);
                }
                other => match current.as_mut() {
                    Some(subpath) => {
                        subpath.push(*other);
                        if *other == PathEl::ClosePath {
                            if let Some(done) = current.take() {
                                contours.push(Contour::new(done)?);
                            }
                        }
                    }
                    None => return Err(MalformedPath::MissingMove),
                },
            }
        }
        if let Some(done) = current {
            contours.push(Contour::new(done)?);
        }
        Ok(Path { contours })
    }

    pub fn to_bezpath(&self) -> BezPath {
        let mut path = BezPath::new();
        for contour in &self.contours {
            for el in contour.0.elements() {
                path.push(*el);
            }
        }
        path
    }

    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    pub fn into_contours(self) -> Vec<Contour> {
        self.contours
    }

    pub fn push(&mut self, contour: Contour) {
        self.contours.push(contour)
    }

    pub fn len(&self) -> usize {
        self.contours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    /// Sum of the signed areas of all contours.
    pub fn area(&self) -> f64 {
        self.contours.iter().map(Contour::area).sum()
    }

    /// The exact bounding box of the outline, or `None` if it is empty.
    pub fn bounding_box(&self) -> Option<Rect> {
        self.contours
            .iter()
            .map(Contour::bounding_box)
            .reduce(|acc, bbox| acc.union(bbox))
    }

    /// The horizontal minimum of the outline; zero for an empty outline.
    pub fn x_min(&self) -> f64 {
        self.bounding_box().map(|bbox| bbox.min_x()).unwrap_or(0.0)
    }

    pub fn transform(&self, transform: Affine) -> Path {
        self.contours
            .iter()
            .map(|contour| contour.transform(transform))
            .collect()
    }

    /// Round all coordinates to integers, dropping contours that collapse.
    pub fn ot_round(&self) -> Path {
        self.contours.iter().filter_map(Contour::ot_round).collect()
    }

    /// `true` if both paths contain the same contours, in any order.
    pub fn same_contours(&self, other: &Path) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let mut unmatched = other.contours.iter().collect::<Vec<_>>();
        self.contours.iter().all(|contour| {
            match unmatched.iter().position(|candidate| *candidate == contour) {
                Some(pos) => {
                    unmatched.swap_remove(pos);
                    true
                }
                None => false,
            }
        })
    }
}

impl FromIterator<Contour> for Path {
    fn from_iter<T: IntoIterator<Item = Contour>>(iter: T) -> Self {
        Path {
            contours: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Contour>> for Path {
    fn from(contours: Vec<Contour>) -> Self {
        Path { contours }
    }
}
