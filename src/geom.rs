//! Geometric primitives: intervals, rectangles, and axis-aligned segments.
//!
//! All constructors normalize reversed bounds and reject non-finite
//! coordinates, so downstream code can use the coordinates as tree keys
//! without worrying about NaN.

use crate::Error;

fn check_finite(coords: &[f64]) -> Result<(), Error> {
    if coords.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(Error::InvalidArgument("non-finite coordinate"))
    }
}

/// A closed one-dimensional interval.
#[derive(Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Interval {
    start: f64,
    end: f64,
}

impl std::fmt::Debug for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}, {:?}]", self.start, self.end)
    }
}

impl Interval {
    /// Create an interval from two endpoints, swapping them if given reversed.
    ///
    /// Fails with [`Error::InvalidArgument`] if either endpoint is infinite or NaN.
    pub fn new(a: f64, b: f64) -> Result<Self, Error> {
        check_finite(&[a, b])?;
        Ok(Interval {
            start: a.min(b),
            end: a.max(b),
        })
    }

    /// The smaller endpoint.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// The larger endpoint.
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Do the two closed intervals have a point in common?
    pub fn overlaps(&self, other: &Interval) -> bool {
        !(self.end < other.start || self.start > other.end)
    }
}

/// An axis-aligned rectangle with `xmin <= xmax` and `ymin <= ymax`.
#[derive(Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    xmin: f64,
    ymin: f64,
    xmax: f64,
    ymax: f64,
}

impl std::fmt::Debug for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({:?}, {:?})--({:?}, {:?})",
            self.xmin, self.ymin, self.xmax, self.ymax
        )
    }
}

impl Rect {
    /// Create a rectangle from two corner coordinates.
    ///
    /// Each axis is normalized independently, so the corners may be given in
    /// any order. Fails with [`Error::InvalidArgument`] if any coordinate is
    /// infinite or NaN.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Result<Self, Error> {
        check_finite(&[x0, y0, x1, y1])?;
        Ok(Rect {
            xmin: x0.min(x1),
            ymin: y0.min(y1),
            xmax: x0.max(x1),
            ymax: y0.max(y1),
        })
    }

    /// The minimum x-coordinate.
    pub fn xmin(&self) -> f64 {
        self.xmin
    }

    /// The minimum y-coordinate.
    pub fn ymin(&self) -> f64 {
        self.ymin
    }

    /// The maximum x-coordinate.
    pub fn xmax(&self) -> f64 {
        self.xmax
    }

    /// The maximum y-coordinate.
    pub fn ymax(&self) -> f64 {
        self.ymax
    }

    /// Do the two closed rectangles have a point in common?
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.xmax >= other.xmin
            && self.xmin <= other.xmax
            && self.ymax >= other.ymin
            && self.ymin <= other.ymax
    }

    /// The common region of two rectangles, or `None` if they don't overlap.
    ///
    /// The box may be degenerate (zero width or height) when the rectangles
    /// only touch at an edge or corner.
    pub fn overlap_box(&self, other: &Rect) -> Option<Rect> {
        if !self.overlaps(other) {
            return None;
        }
        // Both rectangles are finite and overlap, so the intersection is a
        // finite, already-normalized box.
        let r = self.to_kurbo().intersect(other.to_kurbo());
        Some(Rect {
            xmin: r.x0,
            ymin: r.y0,
            xmax: r.x1,
            ymax: r.y1,
        })
    }

    /// Is `point` inside this rectangle (boundary included)?
    pub fn contains(&self, point: kurbo::Point) -> bool {
        self.xmin <= point.x && point.x <= self.xmax && self.ymin <= point.y && point.y <= self.ymax
    }

    /// The squared Euclidean distance from `point` to this rectangle.
    ///
    /// Zero when the point is inside.
    pub fn distance_squared_to(&self, point: kurbo::Point) -> f64 {
        let dx = (self.xmin - point.x).max(point.x - self.xmax).max(0.0);
        let dy = (self.ymin - point.y).max(point.y - self.ymax).max(0.0);
        dx * dx + dy * dy
    }

    /// This rectangle as a [`kurbo::Rect`].
    pub fn to_kurbo(self) -> kurbo::Rect {
        kurbo::Rect::new(self.xmin, self.ymin, self.xmax, self.ymax)
    }
}

impl TryFrom<kurbo::Rect> for Rect {
    type Error = Error;

    /// Goes through [`Rect::new`], so the corners are normalized and a
    /// non-finite coordinate is rejected rather than becoming a tree key.
    fn try_from(r: kurbo::Rect) -> Result<Self, Error> {
        Rect::new(r.x0, r.y0, r.x1, r.y1)
    }
}

/// The axis a [`Segment`] is parallel to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Orientation {
    /// Constant y.
    Horizontal,
    /// Constant x. A degenerate point segment classifies as vertical.
    Vertical,
}

/// An axis-aligned line segment, stored with `x0 <= x1` and `y0 <= y1`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Segment {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
}

impl Segment {
    /// Create a segment from two endpoints, normalizing their order.
    ///
    /// Fails with [`Error::InvalidArgument`] if a coordinate is non-finite,
    /// or if the endpoints don't share an x- or y-coordinate (this crate only
    /// handles orthogonal segments).
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Result<Self, Error> {
        check_finite(&[x0, y0, x1, y1])?;
        if x0 != x1 && y0 != y1 {
            return Err(Error::InvalidArgument("segment is not axis-aligned"));
        }
        Ok(Segment {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        })
    }

    /// The smaller x-coordinate.
    pub fn x0(&self) -> f64 {
        self.x0
    }

    /// The smaller y-coordinate.
    pub fn y0(&self) -> f64 {
        self.y0
    }

    /// The larger x-coordinate.
    pub fn x1(&self) -> f64 {
        self.x1
    }

    /// The larger y-coordinate.
    pub fn y1(&self) -> f64 {
        self.y1
    }

    /// Which axis this segment is parallel to.
    pub fn orientation(&self) -> Orientation {
        if self.x0 == self.x1 {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        }
    }

    /// This segment as a [`kurbo::Line`].
    pub fn to_kurbo(self) -> kurbo::Line {
        kurbo::Line::new((self.x0, self.y0), (self.x1, self.y1))
    }
}
