//! Greenwald Khanna calculates epsilon-approximate quantiles.
//! If the desired quantile is phi, the epsilon-approximate
//! quantile is any element in the range of elements that rank
//! between `lbound((phi-epsilon) x N)` and `lbound((phi+epsilon) x N)`
//!
//! This summary tracks a single target and is unbuffered: every insertion
//! lands in the summary directly. It shares the sample bookkeeping of
//! [`ckms`](crate::ckms) but none of its code paths, and exists as an
//! independent check on the multi-target summary.
//!
//! terminology from the paper:
//!
//!   * S: set of observations
//!   * n: number of observations in S
//!   * v[i]: observation i in S
//!   * r: rank of observation in S from 1 to n.
//!   * `r_min(v[i])`: lower bound on rank r of v[i]
//!   * `r_max(v[i])`: upper bound on rank r of v[i]
//!   * `g[i] = r_min(v[i]) - r_min(v[i - 1])`
//!   * `delta[i] = r_max(v[i]) - r_min(v[i])`
//!   * `t[i] = tuple(v[i], g[i], delta[i])`
//!
//! identities:
//!
//! * `r_min(v[i]) = forall j<=i sum of g[j]`
//! * `r_max(v[i]) = ( forall j<=i sum of g[j] ) + delta[i]`
//! * sum of g[i] = n
//!
//! results:
//!
//! * `max_i(g[i] + delta[i]) <= 2 * epsilon * n`
//!
//! # Examples
//!
//! ```
//! use biased_quantiles::greenwald_khanna::Stream;
//!
//! let epsilon = 0.01;
//! let mut stream = Stream::new(0.5, epsilon).unwrap();
//!
//! let n = 1000;
//! for i in 1..(n + 1) {
//!     stream.insert(i);
//! }
//! let median = stream.query(0.5).unwrap();
//! let lower = ((0.5 - epsilon) * (n as f64)) as u32;
//! let upper = ((0.5 + epsilon) * (n as f64)) as u32;
//! assert!(lower <= median && median <= upper);
//! ```
use crate::ckms::{Entry, Quantile};
use crate::error::{Error, Result};

/// Locates the proper position of v in a slice of entries such that when v
/// is inserted at position i, it is less than the entry at i if any, and
/// greater than or equal to the entry at i-1 if any. Works by scanning the
/// slice from start to end.
pub fn find_insert_pos<T>(vs: &[Entry<T>], v: &T) -> usize
where
    T: PartialOrd,
{
    for (i, vi) in vs.iter().enumerate() {
        if *v < vi.v {
            return i;
        }
    }

    vs.len()
}

/// The summary S of the observations seen so far.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub struct Stream<T>
where
    T: PartialEq,
{
    /// An ordered sequence of the selected observations
    summary: Vec<Entry<T>>,

    /// The quantile tracked and its error factor
    target: Quantile,

    /// The number of observations
    n: usize,
}

impl<T> Stream<T>
where
    T: Copy + PartialOrd,
{
    /// Creates a new instance of a Stream tracking quantile `q` to within
    /// `epsilon`
    pub fn new(q: f64, epsilon: f64) -> Result<Stream<T>> {
        Ok(Stream {
            summary: vec![],
            target: Quantile::new(q, epsilon)?,
            n: 0,
        })
    }

    /// Locates the correct position in the summary data set
    /// for the observation v, and inserts a new tuple (v,1,floor(2en))
    /// If v is the new minimum or maximum, then instead insert
    /// tuple (v,1,0).
    pub fn insert(&mut self, v: T) {
        let pos = find_insert_pos(&self.summary, &v);
        let delta = if pos == 0 || pos == self.summary.len() {
            0
        } else {
            self.p()
        };
        self.summary.insert(pos, Entry::new(v, 1, delta));

        self.n += 1;

        if self.summary.len() > self.compaction_threshold() {
            self.compress();
        }
    }

    /// Compute the epsilon-approximate quantile from the summary data
    /// structure.
    ///
    /// Only the quantile this stream was built for may be asked for. The
    /// answer's rank is within epsilon * n of `q * n`: the walk tolerates
    /// half of `floor(2en)` on either side of the desired rank.
    pub fn query(&self, q: f64) -> Result<T> {
        if q != self.target.quantile() {
            return Err(Error::InvalidQuantile(q));
        }
        let first = match self.summary.first() {
            Some(first) => first,
            None => return Err(Error::EmptyStream),
        };

        let desired = q * (self.n as f64);
        let band = (self.p() as f64) / 2.0;

        let mut prev = first;
        let mut rank_min = 0;
        for t in self.summary.iter().skip(1) {
            rank_min += prev.g;
            if ((rank_min + t.g + t.delta) as f64) > desired + band {
                return Ok(prev.v);
            }
            prev = t;
        }

        Ok(prev.v)
    }

    /// Merge adjacent tuples in a single sweep wherever
    /// `g[i-1] + g[i] + delta[i] <= floor(2en)`. The first and last tuples
    /// are never removed so the extremes stay exact.
    fn compress(&mut self) {
        let p = self.p();
        let mut i = 2;
        while i < self.summary.len() {
            let t = &self.summary[i - 1];
            let tnext = &self.summary[i];
            if t.g + tnext.g + tnext.delta <= p {
                let t = self.summary.remove(i - 1);
                self.summary[i - 1].g += t.g;
            } else {
                i += 1;
            }
        }
    }

    // Summary sizes above (1/2e) * log2(2en) trigger compaction.
    fn compaction_threshold(&self) -> usize {
        let period = (1f64 / (2f64 * self.target.error())).floor();
        let log = (2f64 * self.target.error() * (self.n as f64)).max(2f64).log2();
        (period * log).ceil() as usize
    }

    /// Calculate p = 2epsilon * n
    pub fn p(&self) -> usize {
        (2f64 * self.target.error() * (self.n as f64)).floor() as usize
    }

    /// The number of observations inserted into the stream.
    pub fn count(&self) -> usize {
        self.n
    }

    /// The number of tuples in the summary data structure.
    pub fn len(&self) -> usize {
        self.summary.len()
    }

    /// Whether nothing has been inserted
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty()
    }

    /// The quantile tracked by this stream
    pub fn target(&self) -> &Quantile {
        &self.target
    }
}
