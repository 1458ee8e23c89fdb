//! A rectangle-overlap index: which stored rectangles overlap a query rectangle?

use crate::geom::Rect;
use crate::map::{Augment, OrderedMap};
use crate::num::OrderedCoord;
use crate::Error;

/// Subtree maximum of rectangle max-y coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct MaxYMax(pub(crate) OrderedCoord);

impl Augment<OrderedCoord, Rect> for MaxYMax {
    fn recompute(_key: &OrderedCoord, value: &Rect, left: Option<&Self>, right: Option<&Self>) -> Self {
        let mut max = OrderedCoord::from(value.ymax());
        if let Some(left) = left {
            max = max.max(left.0);
        }
        if let Some(right) = right {
            max = max.max(right.0);
        }
        MaxYMax(max)
    }
}

/// A stored rectangle that overlaps a query, together with the overlap box.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RectHit {
    /// The stored rectangle.
    pub rect: Rect,
    /// The common region of the stored rectangle and the query.
    pub overlap: Rect,
}

/// An index of axis-aligned rectangles keyed by their min-y coordinate,
/// answering overlap queries in `O(log n + k)` for `k` reported rectangles.
///
/// The index assumes no two stored rectangles share a min-y coordinate;
/// inserting a rectangle whose min-y collides with a stored one replaces it.
#[derive(Clone, Debug, Default)]
pub struct RectIndex {
    map: OrderedMap<OrderedCoord, Rect, MaxYMax>,
}

impl RectIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of stored rectangles.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Is the index empty?
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Stores a rectangle, keyed by its min-y coordinate.
    pub fn insert(&mut self, rect: Rect) {
        self.map.insert(rect.ymin().into(), rect);
    }

    /// Removes and returns the rectangle whose min-y coordinate is `ymin`.
    ///
    /// Fails with [`Error::NotFound`] if no stored rectangle has that min-y.
    pub fn remove(&mut self, ymin: f64) -> Result<Rect, Error> {
        self.map.remove(&ymin.into())
    }

    /// All stored rectangles overlapping `query`, with their overlap boxes,
    /// in no particular order.
    ///
    /// A subtree is searched only while its maximum max-y coordinate reaches
    /// `query.ymin()`; anything entirely below the query cannot overlap.
    pub fn overlapping(&self, query: Rect) -> impl Iterator<Item = RectHit> + '_ {
        let lo = OrderedCoord::from(query.ymin());
        self.map
            .search_pruned(move |max_ymax: &MaxYMax| max_ymax.0 >= lo)
            .filter_map(move |(_, rect)| {
                rect.overlap_box(&query).map(|overlap| RectHit {
                    rect: *rect,
                    overlap,
                })
            })
    }

    /// Ascending iteration over the stored rectangles, by min-y coordinate.
    pub fn iter(&self) -> impl Iterator<Item = &Rect> {
        self.map.iter().map(|(_, rect)| rect)
    }

    #[cfg(test)]
    fn check_invariants(&self) {
        self.map.check_invariants();
        let all: Vec<Rect> = self.iter().copied().collect();
        for rect in &all {
            assert!(
                self.overlapping(*rect).any(|hit| hit.rect == *rect),
                "stored rectangle unreachable by its own overlap query"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Rect {
        Rect::new(x0, y0, x1, y1).unwrap()
    }

    #[test]
    fn overlap_query_reports_the_overlap_box() {
        let mut index = RectIndex::new();
        index.insert(rect(0.0, 0.0, 4.0, 4.0));

        let query = rect(1.0, 1.0, 5.0, 3.0);
        let hits: Vec<RectHit> = index.overlapping(query).collect();
        assert_eq!(
            hits,
            vec![RectHit {
                rect: rect(0.0, 0.0, 4.0, 4.0),
                overlap: rect(1.0, 1.0, 4.0, 3.0),
            }]
        );

        index.insert(query);
        index.check_invariants();
    }

    #[test]
    fn disjoint_rectangles_do_not_report() {
        let mut index = RectIndex::new();
        index.insert(rect(0.0, 0.0, 1.0, 1.0));
        index.insert(rect(5.0, 5.0, 6.0, 6.0));
        assert_eq!(index.overlapping(rect(2.0, 2.0, 3.0, 3.0)).count(), 0);
    }

    #[test]
    fn remove_by_ymin() {
        let mut index = RectIndex::new();
        index.insert(rect(0.0, 0.0, 4.0, 4.0));
        index.insert(rect(1.0, 2.0, 5.0, 3.0));
        assert_eq!(index.remove(2.0), Ok(rect(1.0, 2.0, 5.0, 3.0)));
        assert_eq!(index.remove(2.0), Err(Error::NotFound));
        assert_eq!(index.len(), 1);
        index.check_invariants();
    }

    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (-1e3..1e3, -1e3..1e3, -1e3..1e3, -1e3..1e3)
            .prop_map(|(x0, y0, x1, y1)| Rect::new(x0, y0, x1, y1).unwrap())
    }

    proptest! {
        #[test]
        fn overlapping_matches_brute_force(
            rects in prop::collection::vec(rect_strategy(), 0..60),
            query in rect_strategy(),
        ) {
            let mut index = RectIndex::new();
            let mut model: std::collections::BTreeMap<u64, Rect> = Default::default();
            for rect in rects {
                index.insert(rect);
                // +0.0 collapses -0.0 and 0.0 to the same key, matching the
                // index's comparison-based keying.
                model.insert((rect.ymin() + 0.0).to_bits(), rect);
            }
            index.check_invariants();

            let mut got = Vec::new();
            for hit in index.overlapping(query) {
                prop_assert_eq!(Some(hit.overlap), hit.rect.overlap_box(&query));
                got.push((hit.rect.ymin().to_bits(), hit.rect.xmin().to_bits()));
            }
            got.sort();
            let mut want: Vec<(u64, u64)> = model
                .values()
                .filter(|r| r.overlaps(&query))
                .map(|r| (r.ymin().to_bits(), r.xmin().to_bits()))
                .collect();
            want.sort();
            prop_assert_eq!(got, want);
        }
    }
}
