//! Error type shared by every stage of correlated trace generation.

use std::fmt;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a single generation or aggregation call.
///
/// Errors are local to one sweep point. The sweep decides whether to skip
/// the point or halt (see [`crate::InvalidPointPolicy`]).
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Correlation coefficient outside `[min, max]`.
    ///
    /// For a uniform pairwise correlation over `N >= 3` traces the valid
    /// interval is narrower than `[-1, 1]`.
    InvalidCorrelationRange {
        /// Requested coefficient.
        coefficient: f64,
        /// Smallest admissible coefficient.
        min: f64,
        /// Largest admissible coefficient.
        max: f64,
    },

    /// Factorization hit a negative (or inconsistent zero) pivot.
    NonPositiveDefiniteMatrix {
        /// Diagonal index at which factorization failed.
        pivot: usize,
        /// Residual value of the pivot.
        value: f64,
    },

    /// Shapes of matrices or sequences disagree.
    DimensionMismatch {
        /// What was being compared.
        context: &'static str,
        /// Expected size.
        expected: usize,
        /// Size actually found.
        found: usize,
    },

    /// A configuration value is unusable (zero phases, negative noise, ...).
    InvalidConfig(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidCorrelationRange { coefficient, min, max } => write!(
                f,
                "correlation coefficient {} outside valid range [{}, {}]",
                coefficient, min, max
            ),
            Error::NonPositiveDefiniteMatrix { pivot, value } => write!(
                f,
                "covariance matrix is not positive semi-definite (pivot {} = {:e})",
                pivot, value
            ),
            Error::DimensionMismatch {
                context,
                expected,
                found,
            } => write!(
                f,
                "dimension mismatch in {}: expected {}, found {}",
                context, expected, found
            ),
            Error::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
