//! Crossings between orthogonal line segments.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::geom::{Orientation, Segment};
use crate::map::OrderedMap;
use crate::num::OrderedCoord;
use crate::Error;

// Starts sort before probes so a vertical segment sees horizontals beginning
// at its own x; ends sort after for the symmetric reason.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
enum EventKind {
    Start,
    Probe,
    End,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
struct Event {
    x: OrderedCoord,
    kind: EventKind,
    seg: usize,
}

/// A point where a vertical segment crosses a horizontal one.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Crossing {
    /// The crossing point.
    pub point: kurbo::Point,
    /// The vertical segment.
    pub vertical: Segment,
    /// The horizontal segment.
    pub horizontal: Segment,
}

/// Finds all points where a vertical segment crosses a horizontal one, by
/// sweeping left to right and probing the active horizontals at each vertical.
///
/// Endpoint touches count as crossings. Runs in `O(n log n + k)` for `k`
/// crossings. The active set is keyed by each horizontal's y-coordinate, so
/// horizontals that coexist along x must have distinct ys; a violation either
/// goes undetected (one segment shadows the other) or surfaces as
/// [`Error::NotFound`] when the shadowed segment ends.
pub fn segment_crossings(segments: &[Segment]) -> Result<Vec<Crossing>, Error> {
    let mut events = BinaryHeap::with_capacity(segments.len() * 2);
    for (i, seg) in segments.iter().enumerate() {
        match seg.orientation() {
            Orientation::Vertical => events.push(Reverse(Event {
                x: seg.x0().into(),
                kind: EventKind::Probe,
                seg: i,
            })),
            Orientation::Horizontal => {
                events.push(Reverse(Event {
                    x: seg.x0().into(),
                    kind: EventKind::Start,
                    seg: i,
                }));
                events.push(Reverse(Event {
                    x: seg.x1().into(),
                    kind: EventKind::End,
                    seg: i,
                }));
            }
        }
    }

    let mut active: OrderedMap<OrderedCoord, Segment> = OrderedMap::new();
    let mut crossings = Vec::new();

    while let Some(Reverse(event)) = events.pop() {
        let seg = segments[event.seg];
        match event.kind {
            EventKind::Start => active.insert(seg.y0().into(), seg),
            EventKind::End => {
                active.remove(&seg.y0().into())?;
            }
            EventKind::Probe => {
                for (y, horizontal) in active.range(seg.y0().into(), seg.y1().into()) {
                    crossings.push(Crossing {
                        point: kurbo::Point::new(seg.x0(), y.into_inner()),
                        vertical: seg,
                        horizontal: *horizontal,
                    });
                }
            }
        }
    }

    Ok(crossings)
}
