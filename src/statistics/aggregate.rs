//! Aggregate statistics of the summed signal.
//!
//! All traces of one sweep point are summed sample by sample, modelling
//! several hosts sharing one link. The summed sequence is then reduced to its
//! average and to the fraction of time it exceeds the link capacity.

use crate::error::{Error, Result};
use crate::result::AggregateStats;

/// Arithmetic mean, or 0.0 for an empty slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Element-wise sum of equally long sequences.
///
/// # Errors
///
/// - `InvalidConfig` if there are no sequences or they are empty.
/// - `DimensionMismatch` if the lengths differ.
pub fn summed_sequence(traces: &[Vec<f64>]) -> Result<Vec<f64>> {
    let first = traces
        .first()
        .ok_or_else(|| Error::InvalidConfig("no traces to aggregate".into()))?;
    let len = first.len();
    if len == 0 {
        return Err(Error::InvalidConfig("traces must not be empty".into()));
    }

    let mut summed = vec![0.0; len];
    for trace in traces {
        if trace.len() != len {
            return Err(Error::DimensionMismatch {
                context: "sample sequence length",
                expected: len,
                found: trace.len(),
            });
        }
        for (acc, &x) in summed.iter_mut().zip(trace) {
            *acc += x;
        }
    }
    Ok(summed)
}

/// Fraction of samples strictly greater than `threshold` (0.0 for empty input).
pub fn exceed_fraction(data: &[f64], threshold: f64) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    count_above(data, threshold) as f64 / data.len() as f64
}

fn count_above(data: &[f64], threshold: f64) -> usize {
    data.iter().filter(|&&x| x > threshold).count()
}

/// Reduce one sweep point's traces to [`AggregateStats`].
pub fn aggregate(coefficient: f64, traces: &[Vec<f64>], threshold: f64) -> Result<AggregateStats> {
    let summed = summed_sequence(traces)?;
    let exceed_count = count_above(&summed, threshold);

    Ok(AggregateStats {
        correlation_coefficient: coefficient,
        summed_average: mean(&summed),
        exceed_fraction: exceed_count as f64 / summed.len() as f64,
        exceed_count,
        peak: summed.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        per_trace_averages: traces.iter().map(|t| mean(t)).collect(),
    })
}
