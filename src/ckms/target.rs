//! Quantile targets and the error-bound function derived from them.
//!
//! Each target carries a quantile `q` and an error fraction `ε`. From these
//! the coefficients `u = 2ε/(1-q)` and `v = 2ε/q` are precomputed, giving the
//! per-target allowable error
//!
//! ```text
//! f(r, n) = u * (n - r)   if r <= q * n
//!         = v * r         otherwise
//! ```
//!
//! A set of targets answers with the minimum of `f` over every member, so a
//! summary which respects the set respects each target simultaneously.
use std::fmt;
use std::slice;

use crate::error::{Error, Result};

/// A single (quantile, error fraction) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub struct Quantile {
    q: f64,
    error: f64,
    u: f64,
    v: f64,
}

impl Quantile {
    /// Create a new target
    ///
    /// Both `q` and `error` must lie strictly between 0 and 1.
    ///
    /// # Examples
    /// ```
    /// use biased_quantiles::ckms::Quantile;
    /// use biased_quantiles::Error;
    ///
    /// let p99 = Quantile::new(0.99, 0.001).unwrap();
    /// assert_eq!(0.99, p99.quantile());
    /// assert_eq!(Err(Error::InvalidQuantile(1.0)), Quantile::new(1.0, 0.001));
    /// ```
    pub fn new(q: f64, error: f64) -> Result<Quantile> {
        if !(q > 0.0 && q < 1.0) {
            return Err(Error::InvalidQuantile(q));
        }
        if !(error > 0.0 && error < 1.0) {
            return Err(Error::InvalidErrorFraction(error));
        }
        Ok(Quantile {
            q,
            error,
            u: 2.0 * error / (1.0 - q),
            v: 2.0 * error / q,
        })
    }

    /// The targeted quantile
    pub fn quantile(&self) -> f64 {
        self.q
    }

    /// The error fraction allowed for this quantile
    pub fn error(&self) -> f64 {
        self.error
    }

    /// Allowable error at `rank` in a population of `n`, for this target
    /// alone.
    pub fn allowable_error(&self, rank: f64, n: f64) -> f64 {
        if rank <= self.q * n {
            self.u * (n - rank)
        } else {
            self.v * rank
        }
    }
}

impl fmt::Display for Quantile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Q{{q={:.3}, eps={:.3}}}", self.q, self.error)
    }
}

/// The immutable set of targets an estimator honours.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub struct Targets {
    quantiles: Vec<Quantile>,
}

impl Targets {
    /// Build a target set from `(quantile, error)` pairs
    ///
    /// Construction fails if no pairs are given, if any pair is out of range
    /// or if a quantile is repeated. Targets are kept in ascending order of
    /// quantile.
    ///
    /// # Examples
    /// ```
    /// use biased_quantiles::ckms::Targets;
    /// use biased_quantiles::Error;
    ///
    /// let targets = Targets::new(vec![(0.99, 0.001), (0.5, 0.05)]).unwrap();
    /// assert_eq!(2, targets.len());
    ///
    /// let dup = Targets::new(vec![(0.5, 0.05), (0.5, 0.01)]);
    /// assert_eq!(Err(Error::DuplicateQuantile(0.5)), dup);
    /// ```
    pub fn new<I>(pairs: I) -> Result<Targets>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut quantiles = Vec::new();
        for (q, error) in pairs {
            let target = Quantile::new(q, error)?;
            if quantiles.iter().any(|t: &Quantile| t.q == q) {
                return Err(Error::DuplicateQuantile(q));
            }
            quantiles.push(target);
        }
        if quantiles.is_empty() {
            return Err(Error::NoTargets);
        }
        quantiles.sort_by(|a, b| a.q.partial_cmp(&b.q).unwrap_or(std::cmp::Ordering::Equal));
        Ok(Targets { quantiles })
    }

    /// The minimal allowable error at `rank` over all targets, for a summary
    /// of `size` tuples.
    ///
    /// `size` is the number of tuples presently held in the summary rather
    /// than the number of observations seen. This keeps the error bound on
    /// the same scale as the tuple positions it is evaluated at, at the cost
    /// of retaining more tuples than the observation-count formulation.
    pub fn allowable_error(&self, rank: f64, size: usize) -> f64 {
        let n = size as f64;
        self.quantiles
            .iter()
            .map(|t| t.allowable_error(rank, n))
            .fold(n + 1.0, f64::min)
    }

    /// Whether `q` is one of the configured quantiles
    pub fn contains(&self, q: f64) -> bool {
        self.quantiles.iter().any(|t| t.q == q)
    }

    /// Number of targets
    pub fn len(&self) -> usize {
        self.quantiles.len()
    }

    /// Always false, a target set is never empty
    pub fn is_empty(&self) -> bool {
        self.quantiles.is_empty()
    }

    /// Iterate the targets in ascending quantile order
    pub fn iter(&self) -> slice::Iter<Quantile> {
        self.quantiles.iter()
    }
}

impl<'a> IntoIterator for &'a Targets {
    type Item = &'a Quantile;
    type IntoIter = slice::Iter<'a, Quantile>;

    fn into_iter(self) -> Self::IntoIter {
        self.quantiles.iter()
    }
}
