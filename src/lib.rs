#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

pub mod geom;
pub mod map;
mod num;
pub mod sweep;

mod interval_index;
mod rect_index;

pub use geom::{Interval, Orientation, Rect, Segment};
pub use interval_index::IntervalIndex;
pub use map::{Augment, OrderedMap};
pub use num::OrderedCoord;
pub use rect_index::{RectHit, RectIndex};
pub use sweep::{rect_overlaps, segment_crossings, Crossing, Overlap};

/// The recoverable failures of this crate.
///
/// Broken tree invariants are not represented here: they indicate a bug in
/// the balancing code itself, and the offending operation panics rather than
/// leaving a corrupted tree behind.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// A lookup or removal named a key that isn't stored.
    NotFound,
    /// An extremum query was made against an empty collection.
    EmptyCollection,
    /// A geometric input could not be normalized.
    InvalidArgument(&'static str),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NotFound => write!(f, "key not found"),
            Error::EmptyCollection => write!(f, "the collection is empty"),
            Error::InvalidArgument(reason) => write!(f, "invalid argument: {reason}"),
        }
    }
}

impl std::error::Error for Error {}
