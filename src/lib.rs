//! # trace-correlation
//!
//! Generate statistically correlated link-utilization traces and measure how
//! correlation between hosts changes the behavior of their summed load.
//!
//! For each correlation coefficient this crate:
//! - Builds an N×N covariance matrix (uniform pairwise or arbitrary)
//! - Factors it into a lower-triangular transform `C` (Cholesky)
//! - Projects independent per-trace phase means through `C`
//! - Expands every phase mean into Gaussian samples, floored at zero
//! - Reports the summed average, the fraction of time the sum exceeds a
//!   capacity threshold, and per-trace averages
//!
//! ## Quick Start
//!
//! ```ignore
//! use trace_correlation::{Config, CorrelationSweep, PhaseMeans, rng::seeded_rng};
//!
//! let config = Config::new().seed(42);
//! let means = PhaseMeans::random(2, config.phase_count, 50.0, 35.0, &mut seeded_rng(Some(1)))?;
//!
//! let series = CorrelationSweep::new(config)?.run(&means)?;
//! for point in &series.points {
//!     println!(
//!         "{:+.2}: {:.1}% over capacity",
//!         point.correlation_coefficient,
//!         point.exceed_fraction * 100.0
//!     );
//! }
//! ```
//!
//! ## Reproducibility
//!
//! There is no global RNG. Single evaluations take `&mut impl Rng`; sweeps
//! derive one seed per point from [`Config::seed`], so any sweep point can be
//! recomputed on its own and the `parallel` feature does not change results.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod config;
mod error;
mod result;
mod types;

// Functional modules
pub mod covariance;
pub mod generator;
pub mod output;
pub mod rng;
pub mod statistics;
pub mod sweep;

// Re-exports for public API
pub use config::{Config, InvalidPointPolicy};
pub use covariance::{uniform_correlation_range, CovarianceMatrix};
pub use error::{Error, Result};
pub use generator::{CorrelatedGenerator, GeneratedTraces};
pub use result::{AggregateStats, LoadSeries, SkippedPoint, SweepSeries};
pub use sweep::{
    coefficient_grid, run_point, sweep_default_load_levels, sweep_load_levels, CorrelationSweep,
};
pub use types::{MeanMatrix, PhaseMeans, TransformMatrix};

/// Evaluate a single correlation coefficient with the given configuration.
///
/// Builds a generator from `config`, seeds an RNG from `config.seed` (or OS
/// entropy) and returns the aggregate statistics of the generated traces.
///
/// # Errors
///
/// Any configuration, range, factorization or dimension error for this point.
pub fn evaluate(config: Config, coefficient: f64, means: &PhaseMeans) -> Result<AggregateStats> {
    let mut rng = rng::seeded_rng(config.seed);
    let generator = CorrelatedGenerator::new(config)?;
    run_point(&generator, coefficient, means, &mut rng)
}
