//! The sweep-line consumers.
//!
//! Both sweeps process geometric events left to right along the x-axis,
//! maintaining an index of the objects currently "active" at the sweep
//! position: an [`OrderedMap`](crate::OrderedMap) of horizontal segments for
//! [`segment_crossings`], a [`RectIndex`](crate::RectIndex) of open
//! rectangles for [`rect_overlaps`].

mod rect;
mod segment;

pub use rect::{rect_overlaps, Overlap};
pub use segment::{segment_crossings, Crossing};
