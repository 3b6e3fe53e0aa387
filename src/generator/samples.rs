//! Expansion of phase means into noisy sample sequences.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::MeanMatrix;

/// Parameters controlling sample expansion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    /// Samples drawn per phase (S).
    pub samples_per_phase: usize,
    /// Standard deviation of the Gaussian noise around each phase mean.
    pub noise_scale: f64,
    /// Floor every sample at zero.
    pub clamp_negative: bool,
}

impl From<&Config> for SamplingParams {
    fn from(config: &Config) -> Self {
        Self {
            samples_per_phase: config.samples_per_phase,
            noise_scale: config.noise_scale,
            clamp_negative: config.clamp_negative,
        }
    }
}

/// Expand each trace's phase means into a sequence of `P × S` samples.
///
/// For trace `i` and phase `p`, samples `p*S .. (p+1)*S` are independent
/// draws from `Normal(means[(i, p)], noise_scale)`, floored at zero when
/// `clamp_negative` is set. Traces are drawn in row order, phases in column
/// order, so a fixed RNG state gives a fixed output.
pub fn expand_samples<R: Rng + ?Sized>(
    means: &MeanMatrix,
    params: &SamplingParams,
    rng: &mut R,
) -> Result<Vec<Vec<f64>>> {
    if params.samples_per_phase == 0 {
        return Err(Error::InvalidConfig("samples_per_phase must be > 0".into()));
    }
    if !params.noise_scale.is_finite() || params.noise_scale <= 0.0 {
        return Err(Error::InvalidConfig(format!(
            "noise_scale must be finite and > 0, got {}",
            params.noise_scale
        )));
    }

    let s = params.samples_per_phase;
    let mut traces = Vec::with_capacity(means.nrows());

    for row in means.row_iter() {
        let mut samples = Vec::with_capacity(row.len() * s);
        for &phase_mean in row.iter() {
            let normal = Normal::new(phase_mean, params.noise_scale).map_err(|e| {
                Error::InvalidConfig(format!("phase mean {}: {}", phase_mean, e))
            })?;
            for _ in 0..s {
                let x = normal.sample(rng);
                samples.push(if params.clamp_negative { x.max(0.0) } else { x });
            }
        }
        traces.push(samples);
    }

    Ok(traces)
}
