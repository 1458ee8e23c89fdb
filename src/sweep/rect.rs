//! Pairwise overlaps between axis-aligned rectangles.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::geom::Rect;
use crate::num::OrderedCoord;
use crate::rect_index::RectIndex;
use crate::Error;

// Starts sort before ends so rectangles that touch at a shared x boundary
// are still tested against each other.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
enum EventKind {
    Start,
    End,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
struct Event {
    x: OrderedCoord,
    kind: EventKind,
    rect: usize,
}

/// A pair of overlapping rectangles and their common region.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Overlap {
    /// The rectangle that was already active when the overlap was found.
    pub first: Rect,
    /// The rectangle whose sweep entry triggered the report.
    pub second: Rect,
    /// The common region, possibly degenerate when the rectangles only touch.
    pub region: Rect,
}

/// Finds all overlapping pairs among `rects`, each reported once together
/// with the overlap box.
///
/// Sweeps left to right; when a rectangle's left edge is reached, the
/// rectangles currently spanning that x are queried for y-overlap before the
/// new one joins them. Runs in `O(n log n + k)` for `k` overlaps. The active
/// index is keyed by min-y, so rectangles that coexist along x must have
/// distinct min-y coordinates; a violation either goes undetected (one
/// rectangle shadows the other) or surfaces as [`Error::NotFound`] when the
/// shadowed rectangle's right edge is reached.
pub fn rect_overlaps(rects: &[Rect]) -> Result<Vec<Overlap>, Error> {
    let mut events = BinaryHeap::with_capacity(rects.len() * 2);
    for (i, rect) in rects.iter().enumerate() {
        events.push(Reverse(Event {
            x: rect.xmin().into(),
            kind: EventKind::Start,
            rect: i,
        }));
        events.push(Reverse(Event {
            x: rect.xmax().into(),
            kind: EventKind::End,
            rect: i,
        }));
    }

    let mut active = RectIndex::new();
    let mut overlaps = Vec::new();

    while let Some(Reverse(event)) = events.pop() {
        let rect = rects[event.rect];
        match event.kind {
            EventKind::Start => {
                for hit in active.overlapping(rect) {
                    overlaps.push(Overlap {
                        first: hit.rect,
                        second: rect,
                        region: hit.overlap,
                    });
                }
                active.insert(rect);
            }
            EventKind::End => {
                active.remove(rect.ymin())?;
            }
        }
    }

    Ok(overlaps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Rect {
        Rect::new(x0, y0, x1, y1).unwrap()
    }

    #[test]
    fn overlap_reported_at_second_entry() {
        let rects = [rect(0.0, 0.0, 4.0, 4.0), rect(1.0, 1.0, 5.0, 3.0)];
        let overlaps = rect_overlaps(&rects).unwrap();
        assert_eq!(
            overlaps,
            vec![Overlap {
                first: rects[0],
                second: rects[1],
                region: rect(1.0, 1.0, 4.0, 3.0),
            }]
        );
    }

    #[test]
    fn disjoint_rectangles_report_nothing() {
        let rects = [rect(0.0, 0.0, 1.0, 1.0), rect(2.0, 2.0, 3.0, 3.0)];
        assert_eq!(rect_overlaps(&rects).unwrap(), vec![]);
    }

    #[test]
    fn x_boundary_touch_is_reported() {
        // The second rectangle starts exactly where the first ends; with
        // starts ordered before ends the first is still active.
        let rects = [rect(0.0, 0.0, 2.0, 2.0), rect(2.0, 1.0, 4.0, 3.0)];
        let overlaps = rect_overlaps(&rects).unwrap();
        assert_eq!(overlaps.len(), 1);
        assert_eq!(overlaps[0].region, rect(2.0, 1.0, 2.0, 2.0));
    }

    #[test]
    fn jittered_grid_scene_sweeps_cleanly() {
        // A dense grid where cells in a row coexist along x. Without the
        // per-cell min-y jitter the row would share one active key and the
        // sweep would fail on the row's last end event.
        let mut rects = Vec::new();
        for i in 0..40 {
            for j in 0..40 {
                let x = i as f64 * 2.0;
                let y = j as f64 * 2.0 + (i * 40 + j) as f64 * 1e-4;
                rects.push(rect(x, y, x + 3.0, y + 3.0));
            }
        }

        let overlaps = rect_overlaps(&rects).unwrap();
        let mut expected = 0;
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                expected += a.overlaps(b) as usize;
            }
        }
        assert_eq!(overlaps.len(), expected);
    }

    #[test]
    fn duplicate_active_ymin_is_reported_as_an_error() {
        // Same min-y while both are active: the second insert shadows the
        // first, whose end event then finds nothing to remove.
        let rects = [rect(0.0, 0.0, 3.0, 1.0), rect(2.0, 0.0, 5.0, 4.0)];
        assert_eq!(rect_overlaps(&rects), Err(Error::NotFound));
    }

    proptest! {
        #[test]
        fn matches_brute_force(
            ymins in prop::collection::btree_set(-50i32..50, 0..14),
            shapes in prop::collection::vec((-50i32..50, -50i32..50, 1u8..30), 14),
        ) {
            // Distinct min-y per rectangle keeps the active index degeneracy-free.
            let rects: Vec<Rect> = ymins
                .iter()
                .zip(&shapes)
                .map(|(&ymin, &(x0, x1, h))| {
                    rect(x0.into(), ymin.into(), x1.into(), f64::from(ymin) + f64::from(h))
                })
                .collect();

            let overlaps = rect_overlaps(&rects).unwrap();
            let mut got: Vec<(u64, u64)> = overlaps
                .iter()
                .map(|o| {
                    let (a, b) = (o.first.ymin().to_bits(), o.second.ymin().to_bits());
                    (a.min(b), a.max(b))
                })
                .collect();
            got.sort();
            prop_assert_eq!(got.windows(2).filter(|w| w[0] == w[1]).count(), 0,
                "each pair reported at most once");

            let mut want = Vec::new();
            for (i, a) in rects.iter().enumerate() {
                for b in &rects[i + 1..] {
                    if a.overlaps(b) {
                        let (x, y) = (a.ymin().to_bits(), b.ymin().to_bits());
                        want.push((x.min(y), x.max(y)));
                    }
                }
            }
            want.sort();
            prop_assert_eq!(got, want);
        }
    }
}
