//! Result types handed to the plotting/reporting layer.

use serde::{Deserialize, Serialize};

/// Aggregate statistics for one correlation coefficient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Coefficient the traces were generated with.
    pub correlation_coefficient: f64,

    /// Mean of the summed signal across all samples.
    pub summed_average: f64,

    /// Fraction of summed samples strictly above the threshold (0.0 to 1.0).
    pub exceed_fraction: f64,

    /// Number of summed samples strictly above the threshold.
    pub exceed_count: usize,

    /// Largest summed sample.
    pub peak: f64,

    /// Mean of each trace's own sequence, in trace order.
    pub per_trace_averages: Vec<f64>,
}

/// A coefficient the sweep could not evaluate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedPoint {
    /// The coefficient that failed.
    pub correlation_coefficient: f64,
    /// Rendered error message.
    pub reason: String,
}

/// Statistics over a sweep of coefficients, in grid order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepSeries {
    /// Successfully evaluated points.
    pub points: Vec<AggregateStats>,
    /// Points skipped under [`crate::InvalidPointPolicy::Skip`].
    pub skipped: Vec<SkippedPoint>,
    /// Capacity threshold used for `exceed_fraction`.
    pub threshold: f64,
    /// Base seed the per-point seeds were derived from.
    pub seed: u64,
}

impl SweepSeries {
    /// Coefficients of the evaluated points.
    pub fn coefficients(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.correlation_coefficient).collect()
    }

    /// Summed averages, parallel to [`coefficients`](Self::coefficients).
    pub fn summed_averages(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.summed_average).collect()
    }

    /// Exceed fractions, parallel to [`coefficients`](Self::coefficients).
    pub fn exceed_fractions(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.exceed_fraction).collect()
    }

    /// Per-trace averages of trace `trace` across the sweep.
    pub fn trace_averages(&self, trace: usize) -> Vec<f64> {
        self.points
            .iter()
            .filter_map(|p| p.per_trace_averages.get(trace).copied())
            .collect()
    }
}

/// One sweep per nominal base load level (e.g. 50 Gbps per host).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadSeries {
    /// Nominal per-host load the base means were drawn around.
    pub load_level: f64,
    /// Spread of the base means around `load_level`.
    pub spread: f64,
    /// Sweep results for this load level.
    pub series: SweepSeries,
}

impl LoadSeries {
    /// Legend label such as `"50Gbps"`.
    pub fn label(&self) -> String {
        format!("{}Gbps", self.load_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(rho: f64, avg: f64, frac: f64) -> AggregateStats {
        AggregateStats {
            correlation_coefficient: rho,
            summed_average: avg,
            exceed_fraction: frac,
            exceed_count: 0,
            peak: avg,
            per_trace_averages: vec![avg / 2.0, avg / 2.0],
        }
    }

    #[test]
    fn test_series_columns() {
        let series = SweepSeries {
            points: vec![point(-0.5, 90.0, 0.1), point(0.5, 110.0, 0.4)],
            skipped: Vec::new(),
            threshold: 100.0,
            seed: 1,
        };
        assert_eq!(series.coefficients(), vec![-0.5, 0.5]);
        assert_eq!(series.summed_averages(), vec![90.0, 110.0]);
        assert_eq!(series.exceed_fractions(), vec![0.1, 0.4]);
        assert_eq!(series.trace_averages(1), vec![45.0, 55.0]);
        assert!(series.trace_averages(5).is_empty());
    }

    #[test]
    fn test_load_label() {
        let load = LoadSeries {
            load_level: 33.0,
            spread: 35.0,
            series: SweepSeries::default(),
        };
        assert_eq!(load.label(), "33Gbps");
    }
}
