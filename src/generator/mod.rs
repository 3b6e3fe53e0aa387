//! Correlated sample generation.
//!
//! The pipeline for one correlation coefficient:
//!
//! 1. **Factorize** the covariance matrix into a lower-triangular `C`
//!    ([`factorize`]).
//! 2. **Project** independent phase means: `correlated = C × means`
//!    ([`project_means`]). Traces sharing more of the same linear
//!    combination of inputs move together.
//! 3. **Expand** each correlated phase mean into noisy samples
//!    ([`expand_samples`]).

mod cholesky;
mod samples;

pub use cholesky::{factorize, semidefinite_cholesky};
pub use samples::{expand_samples, SamplingParams};

use rand::Rng;

use crate::config::Config;
use crate::covariance::CovarianceMatrix;
use crate::error::{Error, Result};
use crate::types::{MeanMatrix, PhaseMeans, TransformMatrix};

/// Apply the transform to independent phase means: `C × means`.
///
/// # Errors
///
/// `DimensionMismatch` if `means` does not have one row per trace of `transform`.
pub fn project_means(transform: &TransformMatrix, means: &PhaseMeans) -> Result<MeanMatrix> {
    if means.trace_count() != transform.ncols() {
        return Err(Error::DimensionMismatch {
            context: "phase means rows",
            expected: transform.ncols(),
            found: means.trace_count(),
        });
    }
    Ok(transform * means.matrix())
}

/// Everything produced for one coefficient, kept for inspection.
#[derive(Debug, Clone)]
pub struct GeneratedTraces {
    /// Covariance matrix the traces were generated from.
    pub covariance: CovarianceMatrix,
    /// Its lower-triangular factor.
    pub transform: TransformMatrix,
    /// Correlated N×P phase means.
    pub correlated_means: MeanMatrix,
    /// One sample sequence of length `P × S` per trace.
    pub samples: Vec<Vec<f64>>,
}

/// Generator bound to a configuration.
///
/// Holds no RNG and no state between calls; each call is a pure function of
/// its inputs and the RNG passed in.
#[derive(Debug, Clone)]
pub struct CorrelatedGenerator {
    config: Config,
}

impl CorrelatedGenerator {
    /// Create a generator, validating the configuration.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Covariance matrix for a uniform pairwise `coefficient`.
    pub fn covariance(&self, coefficient: f64) -> Result<CovarianceMatrix> {
        CovarianceMatrix::uniform(coefficient, &self.config.resolved_std_devs())
    }

    /// Generate correlated traces for a uniform pairwise `coefficient`.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        coefficient: f64,
        means: &PhaseMeans,
        rng: &mut R,
    ) -> Result<GeneratedTraces> {
        let covariance = self.covariance(coefficient)?;
        self.generate_with_covariance(covariance, means, rng)
    }

    /// Generate correlated traces for an arbitrary covariance matrix.
    pub fn generate_with_covariance<R: Rng + ?Sized>(
        &self,
        covariance: CovarianceMatrix,
        means: &PhaseMeans,
        rng: &mut R,
    ) -> Result<GeneratedTraces> {
        if covariance.trace_count() != self.config.trace_count {
            return Err(Error::DimensionMismatch {
                context: "covariance size",
                expected: self.config.trace_count,
                found: covariance.trace_count(),
            });
        }
        if means.phase_count() != self.config.phase_count {
            return Err(Error::DimensionMismatch {
                context: "phase means columns",
                expected: self.config.phase_count,
                found: means.phase_count(),
            });
        }

        let transform = factorize(&covariance)?;
        let correlated_means = project_means(&transform, means)?;
        let samples = expand_samples(&correlated_means, &SamplingParams::from(&self.config), rng)?;

        Ok(GeneratedTraces {
            covariance,
            transform,
            correlated_means,
            samples,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn scenario() -> (CorrelatedGenerator, PhaseMeans) {
        let config = Config::new()
            .phase_count(1)
            .samples_per_phase(1000)
            .noise_scale(5.0)
            .seed(42);
        let means = PhaseMeans::from_rows(&[vec![50.0], vec![50.0]]).unwrap();
        (CorrelatedGenerator::new(config).unwrap(), means)
    }

    #[test]
    fn test_full_correlation_collapses_means() {
        let (generator, means) = scenario();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let out = generator.generate(1.0, &means, &mut rng).unwrap();

        assert!((out.correlated_means[(0, 0)] - out.correlated_means[(1, 0)]).abs() < 1e-9);
        assert_eq!(out.samples[0].len(), 1000);

        let avg = |s: &[f64]| s.iter().sum::<f64>() / s.len() as f64;
        assert!((avg(&out.samples[0]) - avg(&out.samples[1])).abs() < 1.5);
    }

    #[test]
    fn test_anti_correlation_diverges() {
        let (generator, means) = scenario();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let out = generator.generate(-1.0, &means, &mut rng).unwrap();

        assert!(out.transform[(1, 0)] < 0.0);
        assert!((out.correlated_means[(1, 0)] + 50.0).abs() < 1e-9);

        let avg = |s: &[f64]| s.iter().sum::<f64>() / s.len() as f64;
        // Trace 2 is centred at -50 and clamped to zero.
        assert!(avg(&out.samples[0]) > 45.0);
        assert!(avg(&out.samples[1]) < 1.0);
    }

    #[test]
    fn test_zero_correlation_keeps_means() {
        let (generator, _) = scenario();
        let means = PhaseMeans::from_rows(&[vec![20.0], vec![70.0]]).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let out = generator.generate(0.0, &means, &mut rng).unwrap();
        assert!((out.correlated_means[(0, 0)] - 20.0).abs() < 1e-12);
        assert!((out.correlated_means[(1, 0)] - 70.0).abs() < 1e-12);
    }

    #[test]
    fn test_projection_dimension_mismatch() {
        let transform = TransformMatrix::identity(2, 2);
        let means = PhaseMeans::from_rows(&[vec![1.0], vec![2.0], vec![3.0]]).unwrap();
        assert_eq!(
            project_means(&transform, &means).unwrap_err(),
            Error::DimensionMismatch {
                context: "phase means rows",
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn test_three_trace_out_of_range() {
        let config = Config::new().trace_count(3).phase_count(1);
        let generator = CorrelatedGenerator::new(config).unwrap();
        let means = PhaseMeans::from_rows(&[vec![1.0], vec![1.0], vec![1.0]]).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        assert!(matches!(
            generator.generate(-0.75, &means, &mut rng),
            Err(Error::InvalidCorrelationRange { .. })
        ));
    }

    #[test]
    fn test_general_covariance_must_match_trace_count() {
        let (generator, means) = scenario();
        let cov = CovarianceMatrix::unit_uniform(0.2, 3).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        assert!(matches!(
            generator.generate_with_covariance(cov, &means, &mut rng),
            Err(Error::DimensionMismatch { context: "covariance size", .. })
        ));
    }
}
