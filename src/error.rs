//! Failures surfaced by the quantile summaries.
//!
//! Only caller mistakes are represented here. Structural corruption of a
//! summary is a defect and panics instead.
use thiserror::Error;

/// Errors returned by construction and querying.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum Error {
    /// A query was made before any observation was inserted.
    #[error("no observations have been inserted")]
    EmptyStream,
    /// The quantile is outside (0, 1) or is not the one this summary
    /// tracks.
    #[error("quantile {0} is not valid for this summary")]
    InvalidQuantile(f64),
    /// The error fraction is outside (0, 1).
    #[error("error fraction {0} must lie strictly between 0 and 1")]
    InvalidErrorFraction(f64),
    /// The same quantile was configured twice.
    #[error("quantile {0} is configured more than once")]
    DuplicateQuantile(f64),
    /// No quantile targets were configured.
    #[error("at least one quantile target is required")]
    NoTargets,
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
