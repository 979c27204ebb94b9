//! This is an implementation of the algorithm presented in Cormode, Korn,
//! Muthukrishnan, Srivastava's paper "Effective Computation of Biased Quantiles
//! over Data Streams". The ambition here is to approximate quantiles on a
//! stream of data without having a boatload of information kept in memory.
//!
//! The caller names a set of target quantiles, each with its own error
//! fraction, and the summary keeps just enough retained samples to answer all
//! of them at once. See [`Targets`] for the error-bound function.
//!
//! We follow the 'batch' method of the paper. Incoming values are buffered
//! and, once the buffer fills, sorted and merged into the summary in a single
//! forward sweep. Every merge is followed by compaction, which collapses
//! adjacent samples whose combined uncertainty still fits the bound. Queries
//! force the buffer out first so that every inserted value is reflected.
//!
//! Compaction runs to a fixed point: passes repeat until one completes
//! without merging anything. Long chains of mergeable samples therefore
//! collapse fully on every flush.
use std::cmp;
use std::fmt::Debug;
use std::mem;

mod entry;
mod store;
mod target;

pub use self::entry::Entry;
pub use self::store::{Cursor, Store, StoreIter};
pub use self::target::{Quantile, Targets};

use crate::error::{Error, Result};

/// Values buffered before a batch merge, unless configured otherwise.
pub const DEFAULT_BUFFER_CAPACITY: usize = 1024;

/// A structure to provide approximate quantile queries in bounded memory and
/// with bounded error, for several target quantiles at once.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub struct CKMS<T>
where
    T: Copy + PartialEq,
{
    // observations merged into 'samples'; buffered values are not counted
    n: usize,

    targets: Targets,

    buffer: Vec<T>,
    buffer_capacity: usize,

    // This is the S(n) of the above paper.
    samples: Store<T>,
}

impl<T> CKMS<T>
where
    T: Copy + PartialOrd + Debug,
{
    /// Create a new CKMS with the default buffer capacity
    ///
    /// # Examples
    /// ```
    /// use biased_quantiles::ckms::{CKMS, Targets};
    ///
    /// let targets = Targets::new(vec![(0.5, 0.05), (0.9, 0.01)]).unwrap();
    /// let ckms = CKMS::<f64>::new(targets);
    /// assert_eq!(0, ckms.count());
    /// ```
    pub fn new(targets: Targets) -> CKMS<T> {
        CKMS::with_buffer_capacity(targets, DEFAULT_BUFFER_CAPACITY)
    }

    /// Create a new CKMS which merges every `buffer_capacity` insertions
    ///
    /// A capacity of zero is treated as one, merging on every insertion.
    pub fn with_buffer_capacity(targets: Targets, buffer_capacity: usize) -> CKMS<T> {
        let buffer_capacity = cmp::max(1, buffer_capacity);
        CKMS {
            n: 0,
            targets,
            buffer: Vec::with_capacity(buffer_capacity),
            buffer_capacity,
            samples: Store::new(),
        }
    }

    /// Insert a T into the CKMS
    ///
    /// The value is buffered. Once the buffer is full it is merged into the
    /// summary and the summary compacted, so the occasional insertion pays
    /// for the whole batch.
    pub fn insert(&mut self, v: T) {
        self.buffer.push(v);
        if self.buffer.len() >= self.buffer_capacity {
            self.flush();
            self.compact();
        }
    }

    /// Query CKMS for an approximate quantile
    ///
    /// `q` must lie strictly between 0 and 1. The buffer is merged and the
    /// summary compacted before answering, so the answer reflects every
    /// insertion so far. For each configured target the rank of the returned
    /// value is within that target's error fraction of `q * count`.
    ///
    /// # Examples
    /// ```
    /// use biased_quantiles::ckms::{CKMS, Targets};
    /// use biased_quantiles::Error;
    ///
    /// let targets = Targets::new(vec![(0.5, 0.01)]).unwrap();
    /// let mut ckms = CKMS::<u32>::new(targets);
    /// assert_eq!(Err(Error::EmptyStream), ckms.query(0.5));
    ///
    /// for i in 1..11 {
    ///     ckms.insert(i);
    /// }
    /// assert_eq!(Ok(1), ckms.query(0.1));
    /// assert_eq!(Ok(5), ckms.query(0.5));
    /// assert_eq!(Ok(9), ckms.query(0.9));
    /// assert_eq!(Err(Error::InvalidQuantile(1.0)), ckms.query(1.0));
    /// ```
    pub fn query(&mut self, q: f64) -> Result<T> {
        if !(q > 0.0 && q < 1.0) {
            return Err(Error::InvalidQuantile(q));
        }
        self.flush();
        self.compact();

        let mut cursor = Cursor::new();
        let mut prev = match self.samples.next(&mut cursor) {
            Some(entry) => entry,
            None => return Err(Error::EmptyStream),
        };

        let desired = q * (self.n as f64);
        let band = self.targets.allowable_error(desired, self.samples.len()) / 2.0;
        let mut rank_min = 0;
        while let Some(cur) = self.samples.next(&mut cursor) {
            rank_min += prev.g;
            if ((rank_min + cur.g + cur.delta) as f64) > desired + band {
                return Ok(prev.v);
            }
            prev = cur;
        }
        // Walked off the end: the maximum was asked for.
        Ok(prev.v)
    }

    /// Total number of observations inserted, buffered ones included
    ///
    /// # Examples
    /// ```
    /// use biased_quantiles::ckms::{CKMS, Targets};
    ///
    /// let targets = Targets::new(vec![(0.99, 0.001)]).unwrap();
    /// let mut ckms = CKMS::<u32>::new(targets);
    /// for i in 0..5000 {
    ///     ckms.insert(i);
    /// }
    /// assert_eq!(5000, ckms.count());
    /// ```
    pub fn count(&self) -> usize {
        self.n + self.buffer.len()
    }

    /// Number of samples retained by the summary
    ///
    /// Buffered values are not included. This fluctuates as compaction
    /// happens.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the summary retains no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The configured quantile targets
    pub fn targets(&self) -> &Targets {
        &self.targets
    }

    /// The retained samples, in value order
    pub fn samples(&self) -> StoreIter<T> {
        self.samples.iter()
    }

    fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let mut batch = mem::replace(&mut self.buffer, Vec::new());
        batch.sort_by(|a, b| a.partial_cmp(b).unwrap_or(cmp::Ordering::Equal));

        let mut cursor = Cursor::new();
        for &v in &batch {
            // Walk forward over everything smaller than v. On overshooting
            // step back, so v lands directly in front of the larger entry.
            while let Some(entry) = self.samples.next(&mut cursor) {
                if !(entry.v < v) {
                    self.samples.prev(&mut cursor);
                    break;
                }
            }

            let position = cursor.position();
            let size = self.samples.len();
            let delta = if position == 0 || position == size {
                0
            } else {
                self.targets.allowable_error(position as f64, size).floor() as usize
            };
            self.samples.insert_before(&mut cursor, Entry::new(v, 1, delta));
            self.n += 1;
        }
        trace!(
            "merged batch of {} into summary, now {} samples",
            batch.len(),
            self.samples.len()
        );

        batch.clear();
        self.buffer = batch;
        assert_eq!(
            self.n,
            self.samples.g_sum(),
            "sum of g diverged from observation count"
        );
    }

    fn compact(&mut self) {
        let before = self.samples.len();
        let mut passes = 0;
        loop {
            passes += 1;
            if self.compact_pass() == 0 {
                break;
            }
        }
        debug!(
            "compacted {} samples to {} in {} passes",
            before,
            self.samples.len(),
            passes
        );
    }

    // A single sweep over adjacent pairs. A merged entry stays current and is
    // checked against its new successor before the sweep moves on.
    fn compact_pass(&mut self) -> usize {
        let mut merged = 0;
        let mut cursor = Cursor::new();
        if self.samples.next(&mut cursor).is_none() {
            return 0;
        }
        while self.samples.has_next(&cursor) {
            let size = self.samples.len();
            let prev_position = cursor.position() - 1;
            let prev_g = self.samples[prev_position].g;
            let (g, delta) = match self.samples.next(&mut cursor) {
                Some(cur) => (cur.g, cur.delta),
                None => break,
            };
            let allowed = self.targets.allowable_error(prev_position as f64, size);
            if ((prev_g + g + delta) as f64) <= allowed {
                self.samples.merge_into_next(&mut cursor);
                merged += 1;
            }
        }
        merged
    }
}
