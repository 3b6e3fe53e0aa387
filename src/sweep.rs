//! Correlation sweeps.
//!
//! A sweep evaluates the generator at every coefficient of a grid and
//! collects the aggregate statistics in grid order. Points share nothing:
//! each one gets its own RNG seeded from `(base_seed, point_index)`, so a
//! sweep gives the same series whether it runs serially or with the
//! `parallel` feature.

use log::{debug, warn};
use rand::{Rng, SeedableRng};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::{Config, InvalidPointPolicy};
use crate::error::{Error, Result};
use crate::generator::CorrelatedGenerator;
use crate::result::{AggregateStats, LoadSeries, SkippedPoint, SweepSeries};
use crate::rng::{counter_rng_seed, resolve_seed, TraceRng};
use crate::statistics::aggregate;
use crate::types::PhaseMeans;

/// Nominal per-host loads (Gbps) swept by [`sweep_default_load_levels`].
pub const DEFAULT_LOAD_LEVELS: [f64; 5] = [25.0, 33.0, 50.0, 75.0, 100.0];

/// Spread of base phase means around each level in [`sweep_default_load_levels`].
pub const DEFAULT_LOAD_SPREAD: f64 = 35.0;

/// `points` evenly spaced coefficients from `start` to `end`, both inclusive.
///
/// Each value is computed directly from its index, so there is no
/// accumulated floating-point drift along the grid.
pub fn coefficient_grid(start: f64, end: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (points - 1) as f64;
            (0..points)
                .map(|i| if i == points - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Evaluate one coefficient: generate correlated traces and aggregate them.
pub fn run_point<R: Rng + ?Sized>(
    generator: &CorrelatedGenerator,
    coefficient: f64,
    means: &PhaseMeans,
    rng: &mut R,
) -> Result<AggregateStats> {
    let traces = generator.generate(coefficient, means, rng)?;
    aggregate(coefficient, &traces.samples, generator.config().threshold)
}

/// Sweep of a uniform pairwise correlation coefficient.
///
/// # Example
///
/// ```ignore
/// use trace_correlation::{Config, CorrelationSweep, PhaseMeans};
///
/// let means = PhaseMeans::from_rows(&[vec![60.0; 20], vec![55.0; 20]])?;
/// let series = CorrelationSweep::new(Config::new().seed(7))?.run(&means)?;
/// for point in &series.points {
///     println!("{:+.2} {:.3}", point.correlation_coefficient, point.exceed_fraction);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CorrelationSweep {
    generator: CorrelatedGenerator,
    coefficients: Vec<f64>,
}

impl CorrelationSweep {
    /// Create a sweep over [`default_grid`](Self::default_grid).
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            generator: CorrelatedGenerator::new(config)?,
            coefficients: Self::default_grid(),
        })
    }

    /// The 199 coefficients -0.99, -0.98, ..., 0.99.
    pub fn default_grid() -> Vec<f64> {
        (-99..=99).map(|k| k as f64 / 100.0).collect()
    }

    /// Replace the coefficient grid.
    pub fn coefficients(mut self, coefficients: Vec<f64>) -> Self {
        self.coefficients = coefficients;
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &Config {
        self.generator.config()
    }

    /// Get the coefficient grid.
    pub fn grid(&self) -> &[f64] {
        &self.coefficients
    }

    /// Run the sweep against fixed independent phase means.
    ///
    /// # Errors
    ///
    /// Only under [`InvalidPointPolicy::Halt`]: the first failing point in
    /// grid order. Under `Skip`, failures are listed in
    /// [`SweepSeries::skipped`] instead.
    pub fn run(&self, means: &PhaseMeans) -> Result<SweepSeries> {
        let config = self.config();
        let base_seed = resolve_seed(config.seed);
        debug!(
            "sweeping {} coefficients over {} traces (seed {})",
            self.coefficients.len(),
            config.trace_count,
            base_seed
        );

        let outcomes = self.evaluate_all(means, base_seed);

        let mut series = SweepSeries {
            points: Vec::with_capacity(outcomes.len()),
            skipped: Vec::new(),
            threshold: config.threshold,
            seed: base_seed,
        };

        for (&coefficient, outcome) in self.coefficients.iter().zip(outcomes) {
            match outcome {
                Ok(stats) => series.points.push(stats),
                Err(err) => match config.invalid_point_policy {
                    InvalidPointPolicy::Halt => return Err(err),
                    InvalidPointPolicy::Skip => {
                        warn!("skipping correlation {}: {}", coefficient, err);
                        series.skipped.push(SkippedPoint {
                            correlation_coefficient: coefficient,
                            reason: err.to_string(),
                        });
                    }
                },
            }
        }

        Ok(series)
    }

    fn point_seed(&self, base_seed: u64, index: usize) -> u64 {
        if self.config().common_random_numbers {
            base_seed
        } else {
            counter_rng_seed(base_seed, index as u64)
        }
    }

    fn evaluate(&self, means: &PhaseMeans, base_seed: u64, index: usize) -> Result<AggregateStats> {
        let mut rng = TraceRng::seed_from_u64(self.point_seed(base_seed, index));
        run_point(&self.generator, self.coefficients[index], means, &mut rng)
    }

    #[cfg(not(feature = "parallel"))]
    fn evaluate_all(&self, means: &PhaseMeans, base_seed: u64) -> Vec<Result<AggregateStats>> {
        (0..self.coefficients.len())
            .map(|i| self.evaluate(means, base_seed, i))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn evaluate_all(&self, means: &PhaseMeans, base_seed: u64) -> Vec<Result<AggregateStats>> {
        (0..self.coefficients.len())
            .into_par_iter()
            .map(|i| self.evaluate(means, base_seed, i))
            .collect()
    }
}

/// Run one sweep per nominal load level.
///
/// For each level, independent base means are drawn from
/// `Normal(load_level, spread)` (floored at zero) with a seed derived from the
/// configured base seed, then swept over `coefficients`.
pub fn sweep_load_levels(
    config: &Config,
    load_levels: &[f64],
    spread: f64,
    coefficients: &[f64],
) -> Result<Vec<LoadSeries>> {
    config.validate()?;
    if load_levels.iter().any(|l| !l.is_finite()) {
        return Err(Error::InvalidConfig("load levels must be finite".into()));
    }
    let base_seed = resolve_seed(config.seed);

    let mut all = Vec::with_capacity(load_levels.len());
    for (i, &load_level) in load_levels.iter().enumerate() {
        let mut means_rng = TraceRng::seed_from_u64(counter_rng_seed(base_seed, i as u64));
        let means = PhaseMeans::random(
            config.trace_count,
            config.phase_count,
            load_level,
            spread,
            &mut means_rng,
        )?;

        let level_config = config.clone().seed(means_rng.random());
        let series = CorrelationSweep::new(level_config)?
            .coefficients(coefficients.to_vec())
            .run(&means)?;

        all.push(LoadSeries {
            load_level,
            spread,
            series,
        });
    }
    Ok(all)
}

/// [`sweep_load_levels`] over [`DEFAULT_LOAD_LEVELS`] with [`DEFAULT_LOAD_SPREAD`].
pub fn sweep_default_load_levels(config: &Config, coefficients: &[f64]) -> Result<Vec<LoadSeries>> {
    sweep_load_levels(config, &DEFAULT_LOAD_LEVELS, DEFAULT_LOAD_SPREAD, coefficients)
}
