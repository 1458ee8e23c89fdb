//! An interval-stabbing index: which stored intervals overlap a query interval?

use crate::geom::Interval;
use crate::map::{Augment, OrderedMap};
use crate::num::OrderedCoord;
use crate::Error;

/// Subtree maximum of interval end coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct MaxEnd(pub(crate) OrderedCoord);

impl Augment<OrderedCoord, Interval> for MaxEnd {
    fn recompute(
        _key: &OrderedCoord,
        value: &Interval,
        left: Option<&Self>,
        right: Option<&Self>,
    ) -> Self {
        let mut max = OrderedCoord::from(value.end());
        if let Some(left) = left {
            max = max.max(left.0);
        }
        if let Some(right) = right {
            max = max.max(right.0);
        }
        MaxEnd(max)
    }
}

/// An index of intervals keyed by their start coordinate, answering stabbing
/// queries in `O(log n + k)` for `k` reported intervals.
///
/// The index assumes no two stored intervals share a start coordinate;
/// inserting an interval whose start collides with a stored one replaces it.
#[derive(Clone, Debug, Default)]
pub struct IntervalIndex {
    map: OrderedMap<OrderedCoord, Interval, MaxEnd>,
}

impl IntervalIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of stored intervals.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Is the index empty?
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Stores an interval, keyed by its start coordinate.
    pub fn insert(&mut self, interval: Interval) {
        self.map.insert(interval.start().into(), interval);
    }

    /// Removes and returns the interval whose start coordinate is `start`.
    ///
    /// Fails with [`Error::NotFound`] if no stored interval starts there.
    pub fn remove(&mut self, start: f64) -> Result<Interval, Error> {
        self.map.remove(&start.into())
    }

    /// All stored intervals overlapping `query`, in no particular order.
    ///
    /// A subtree is searched only while its maximum end coordinate reaches
    /// `query.start()`; anything further left cannot overlap.
    pub fn stab(&self, query: Interval) -> impl Iterator<Item = &Interval> {
        let lo = OrderedCoord::from(query.start());
        self.map
            .search_pruned(move |max_end: &MaxEnd| max_end.0 >= lo)
            .map(|(_, interval)| interval)
            .filter(move |interval| interval.overlaps(&query))
    }

    /// Ascending iteration over the stored intervals, by start coordinate.
    pub fn iter(&self) -> impl Iterator<Item = &Interval> {
        self.map.iter().map(|(_, interval)| interval)
    }

    #[cfg(test)]
    fn check_invariants(&self) {
        self.map.check_invariants();
        // If an augmentation value were stale, some stored interval would
        // become unreachable; stabbing each interval with itself catches that.
        let all: Vec<Interval> = self.iter().copied().collect();
        for interval in &all {
            assert!(
                self.stab(*interval).any(|hit| hit == interval),
                "stored interval unreachable by its own stab query"
            );
        }
    }
}
