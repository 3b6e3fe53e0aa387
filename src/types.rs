//! Type aliases and common types.

use nalgebra::DMatrix;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{Error, Result};

/// Lower-triangular factor `C` with `C * Cᵗ = Σ`.
pub type TransformMatrix = DMatrix<f64>;

/// N×P matrix of phase means, one row per trace.
pub type MeanMatrix = DMatrix<f64>;

/// Independent per-trace phase means (one row per trace, one column per phase).
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseMeans {
    matrix: MeanMatrix,
}

impl PhaseMeans {
    /// Build from one row of phase means per trace.
    ///
    /// Every row must have the same, non-zero length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let trace_count = rows.len();
        if trace_count == 0 {
            return Err(Error::InvalidConfig("phase means need at least one trace".into()));
        }
        let phase_count = rows[0].len();
        if phase_count == 0 {
            return Err(Error::InvalidConfig("phase means need at least one phase".into()));
        }
        for row in rows {
            if row.len() != phase_count {
                return Err(Error::DimensionMismatch {
                    context: "phase means columns",
                    expected: phase_count,
                    found: row.len(),
                });
            }
        }
        if rows.iter().flatten().any(|m| !m.is_finite()) {
            return Err(Error::InvalidConfig("phase means must be finite".into()));
        }

        let matrix = DMatrix::from_fn(trace_count, phase_count, |i, j| rows[i][j]);
        Ok(Self { matrix })
    }

    /// Draw independent base means from `Normal(load_level, spread)`, floored at zero.
    ///
    /// Models hosts whose per-phase link load fluctuates around a common
    /// nominal level (e.g. 50 Gbps with a spread of 35).
    pub fn random<R: Rng + ?Sized>(
        trace_count: usize,
        phase_count: usize,
        load_level: f64,
        spread: f64,
        rng: &mut R,
    ) -> Result<Self> {
        if trace_count == 0 || phase_count == 0 {
            return Err(Error::InvalidConfig(
                "trace_count and phase_count must be > 0".into(),
            ));
        }
        let normal = Normal::new(load_level, spread).map_err(|e| {
            Error::InvalidConfig(format!("load level {} / spread {}: {}", load_level, spread, e))
        })?;

        // Row-major draw order so the same seed yields the same rows for any N.
        let mut values = Vec::with_capacity(trace_count * phase_count);
        for _ in 0..trace_count * phase_count {
            values.push(normal.sample(rng).max(0.0));
        }
        Ok(Self {
            matrix: DMatrix::from_row_slice(trace_count, phase_count, &values),
        })
    }

    /// Number of traces (rows).
    pub fn trace_count(&self) -> usize {
        self.matrix.nrows()
    }

    /// Number of phases (columns).
    pub fn phase_count(&self) -> usize {
        self.matrix.ncols()
    }

    /// Underlying N×P matrix.
    pub fn matrix(&self) -> &MeanMatrix {
        &self.matrix
    }
}
