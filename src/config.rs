//! Configuration for correlated trace experiments.

use std::env;

use crate::error::{Error, Result};

/// What a sweep does when a single coefficient cannot be evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvalidPointPolicy {
    /// Record the failure, log it, and continue with the next coefficient.
    #[default]
    Skip,
    /// Abort the sweep and return the first error.
    Halt,
}

/// Configuration options for [`crate::CorrelatedGenerator`] and sweeps.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of traces (hosts) whose signals are summed (default: 2).
    pub trace_count: usize,

    /// Number of phases per trace (default: 20).
    pub phase_count: usize,

    /// Samples drawn for each phase (default: 50).
    pub samples_per_phase: usize,

    /// Standard deviation of the per-sample Gaussian noise (default: 5.0).
    pub noise_scale: f64,

    /// Capacity threshold for the summed signal (default: 100.0).
    ///
    /// A sample counts as exceeding only when strictly greater.
    pub threshold: f64,

    /// Per-trace standard deviations used on the covariance diagonal.
    ///
    /// Empty means uniform 1.0 for every trace.
    pub std_devs: Vec<f64>,

    /// Floor generated samples at zero (default: true).
    ///
    /// Link utilization is a bandwidth; negative values are not physical.
    pub clamp_negative: bool,

    /// Optional deterministic seed. `None` seeds from the OS.
    pub seed: Option<u64>,

    /// Handling of coefficients that fail during a sweep (default: Skip).
    pub invalid_point_policy: InvalidPointPolicy,

    /// Reuse the same noise stream for every sweep point (default: false).
    ///
    /// With common random numbers, differences between sweep points come
    /// only from the correlation structure, not from fresh noise.
    pub common_random_numbers: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trace_count: 2,
            phase_count: 20,
            samples_per_phase: 50,
            noise_scale: 5.0,
            threshold: 100.0,
            std_devs: Vec::new(),
            clamp_negative: true,
            seed: None,
            invalid_point_policy: InvalidPointPolicy::Skip,
            common_random_numbers: false,
        }
    }
}

impl Config {
    /// Create with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of traces.
    pub fn trace_count(mut self, n: usize) -> Self {
        self.trace_count = n;
        self
    }

    /// Set the number of phases per trace.
    pub fn phase_count(mut self, n: usize) -> Self {
        self.phase_count = n;
        self
    }

    /// Set samples drawn per phase.
    pub fn samples_per_phase(mut self, n: usize) -> Self {
        self.samples_per_phase = n;
        self
    }

    /// Set the per-sample noise standard deviation.
    pub fn noise_scale(mut self, scale: f64) -> Self {
        self.noise_scale = scale;
        self
    }

    /// Set the capacity threshold for the summed signal.
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set per-trace standard deviations.
    pub fn std_devs(mut self, std_devs: Vec<f64>) -> Self {
        self.std_devs = std_devs;
        self
    }

    /// Enable or disable flooring samples at zero.
    pub fn clamp_negative(mut self, clamp: bool) -> Self {
        self.clamp_negative = clamp;
        self
    }

    /// Set deterministic seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the sweep policy for failing coefficients.
    pub fn invalid_point_policy(mut self, policy: InvalidPointPolicy) -> Self {
        self.invalid_point_policy = policy;
        self
    }

    /// Draw every sweep point from the same noise stream.
    pub fn common_random_numbers(mut self, enabled: bool) -> Self {
        self.common_random_numbers = enabled;
        self
    }

    /// Merge configuration from environment variables.
    ///
    /// Recognized: `TC_SEED`, `TC_THRESHOLD`, `TC_NOISE_SCALE`,
    /// `TC_PHASES`, `TC_SAMPLES_PER_PHASE`, `TC_TRACES`. Unparseable
    /// values are ignored.
    pub fn from_env(mut self) -> Self {
        if let Some(seed) = parse_env::<u64>("TC_SEED") {
            self = self.seed(seed);
        }
        if let Some(threshold) = parse_env::<f64>("TC_THRESHOLD") {
            self = self.threshold(threshold);
        }
        if let Some(scale) = parse_env::<f64>("TC_NOISE_SCALE") {
            self = self.noise_scale(scale);
        }
        if let Some(phases) = parse_env::<usize>("TC_PHASES") {
            self = self.phase_count(phases);
        }
        if let Some(samples) = parse_env::<usize>("TC_SAMPLES_PER_PHASE") {
            self = self.samples_per_phase(samples);
        }
        if let Some(traces) = parse_env::<usize>("TC_TRACES") {
            self = self.trace_count(traces);
        }
        self
    }

    /// Standard deviations for each trace, expanding the uniform default.
    pub fn resolved_std_devs(&self) -> Vec<f64> {
        if self.std_devs.is_empty() {
            vec![1.0; self.trace_count]
        } else {
            self.std_devs.clone()
        }
    }

    /// Length of every generated sample sequence (P × S).
    pub fn sequence_len(&self) -> usize {
        self.phase_count * self.samples_per_phase
    }

    /// Check that the configuration can drive a generation.
    pub fn validate(&self) -> Result<()> {
        if self.trace_count == 0 {
            return Err(Error::InvalidConfig("trace_count must be > 0".into()));
        }
        if self.phase_count == 0 {
            return Err(Error::InvalidConfig("phase_count must be > 0".into()));
        }
        if self.samples_per_phase == 0 {
            return Err(Error::InvalidConfig("samples_per_phase must be > 0".into()));
        }
        if !self.noise_scale.is_finite() || self.noise_scale <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "noise_scale must be finite and > 0, got {}",
                self.noise_scale
            )));
        }
        if !self.threshold.is_finite() {
            return Err(Error::InvalidConfig("threshold must be finite".into()));
        }
        if !self.std_devs.is_empty() && self.std_devs.len() != self.trace_count {
            return Err(Error::DimensionMismatch {
                context: "std_devs length",
                expected: self.trace_count,
                found: self.std_devs.len(),
            });
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_bandwidth_scenario() {
        let config = Config::default();
        assert_eq!(config.trace_count, 2);
        assert_eq!(config.sequence_len(), 1000);
        assert_eq!(config.threshold, 100.0);
        assert_eq!(config.noise_scale, 5.0);
        assert!(config.clamp_negative);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resolved_std_devs() {
        let config = Config::new().trace_count(3);
        assert_eq!(config.resolved_std_devs(), vec![1.0, 1.0, 1.0]);

        let config = Config::new().std_devs(vec![2.0, 0.5]);
        assert_eq!(config.resolved_std_devs(), vec![2.0, 0.5]);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(matches!(
            Config::new().phase_count(0).validate(),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::new().samples_per_phase(0).validate(),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::new().noise_scale(-1.0).validate(),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::new().std_devs(vec![1.0; 3]).validate(),
            Err(Error::DimensionMismatch { expected: 2, found: 3, .. })
        ));
    }

    #[test]
    fn test_from_env_overrides() {
        // Only this test touches TC_* variables.
        env::set_var("TC_SEED", "1234");
        env::set_var("TC_THRESHOLD", "80.5");
        env::set_var("TC_PHASES", "not-a-number");
        let config = Config::new().from_env();
        env::remove_var("TC_SEED");
        env::remove_var("TC_THRESHOLD");
        env::remove_var("TC_PHASES");

        assert_eq!(config.seed, Some(1234));
        assert!((config.threshold - 80.5).abs() < 1e-12);
        assert_eq!(config.phase_count, 20);
    }
}
