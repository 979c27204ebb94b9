//! The retained sample of a summary.
use std::cmp;

/// A retained observation with its rank bookkeeping.
///
/// For an entry at position `i` the true rank of `v` lies within
/// `[r_min, r_min + delta]` where `r_min` is the sum of `g` over entries
/// `0..=i`.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub struct Entry<T>
where
    T: PartialEq,
{
    /// Minimal increase in rank over the preceding entry
    pub g: usize,
    /// Width of the rank uncertainty beyond the minimal rank
    pub delta: usize,
    /// The observed value
    pub v: T,
}

impl<T> Entry<T>
where
    T: PartialEq,
{
    /// Create a new entry
    pub fn new(v: T, g: usize, delta: usize) -> Entry<T> {
        Entry { g, delta, v }
    }
}

// Entries compare by value alone, g and delta are bookkeeping.
impl<T> PartialEq for Entry<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Entry<T>) -> bool {
        self.v == other.v
    }
}

impl<T> PartialOrd for Entry<T>
where
    T: PartialOrd,
{
    fn partial_cmp(&self, other: &Entry<T>) -> Option<cmp::Ordering> {
        self.v.partial_cmp(&other.v)
    }
}
