//! Ordered coordinate values, usable as tree keys.

use std::hash::Hash;

/// A wrapper for `f64` that implements `Ord`.
///
/// Unlike the more principled wrappers in the `ordered_float` crate, this one
/// doesn't order NaNs, nor does it guard against them on construction. The
/// geometry constructors in this crate reject non-finite coordinates, so a
/// NaN can never become a tree key in the first place.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct OrderedCoord(f64);

impl OrderedCoord {
    /// Retrieve the inner `f64`.
    pub fn into_inner(self) -> f64 {
        self.0
    }
}

impl From<f64> for OrderedCoord {
    fn from(value: f64) -> Self {
        OrderedCoord(value)
    }
}

impl Hash for OrderedCoord {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state)
    }
}

// These impls are only honest because NaN never gets in.
impl Eq for OrderedCoord {}

impl PartialOrd for OrderedCoord {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedCoord {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        if self.0 < other.0 {
            std::cmp::Ordering::Less
        } else if self.0 > other.0 {
            std::cmp::Ordering::Greater
        } else {
            std::cmp::Ordering::Equal
        }
    }
}
