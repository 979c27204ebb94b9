//! This crate provides approximate quantiles over data streams in a moderate
//! amount of memory.
//!
//! The primary structure is [`ckms::CKMS`], a buffered implementation of the
//! 'biased quantiles' summary which tracks several quantile targets at once,
//! each with its own error fraction. A simpler, unbuffered single-target
//! summary lives in [`greenwald_khanna`] and serves as an independent cross
//! check of the former.
//!
//! ```
//! use biased_quantiles::ckms::{CKMS, Targets};
//!
//! let targets = Targets::new(vec![(0.5, 0.05), (0.99, 0.001)]).unwrap();
//! let mut ckms = CKMS::<u32>::new(targets);
//! for i in 1..=10 {
//!     ckms.insert(i);
//! }
//! assert_eq!(ckms.query(0.5), Ok(5));
//! ```
//!
//! Neither structure is synchronized. Callers that share one across threads
//! must serialize access themselves.
#![deny(missing_docs, missing_debug_implementations, unstable_features,
        unused_import_braces)]

#[cfg(test)]
#[macro_use]
extern crate quickcheck;

#[cfg(feature = "serde_support")]
#[macro_use]
extern crate serde_derive;

#[macro_use]
extern crate log;

pub mod ckms;
pub mod error;
pub mod greenwald_khanna;
pub mod util;

pub use crate::error::{Error, Result};
