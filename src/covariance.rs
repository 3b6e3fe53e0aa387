//! Covariance matrix construction for N correlated traces.
//!
//! Two constructors are provided:
//! - [`CovarianceMatrix::uniform`]: one coefficient shared by every pair of
//!   traces, with range checking for the PSD region.
//! - [`CovarianceMatrix::from_matrix`]: an arbitrary symmetric matrix, for
//!   structures a single coefficient cannot express.
//!
//! Positive (semi-)definiteness of a general matrix is not checked here; the
//! factorization in [`crate::generator::factorize`] is the numerical authority.

use nalgebra::DMatrix;

use crate::error::{Error, Result};

/// Relative tolerance for the symmetry check on user-supplied matrices.
const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Closed interval of shared coefficients keeping a uniform correlation matrix PSD.
///
/// The eigenvalues of an N×N matrix with unit diagonal and ρ elsewhere are
/// `1 + (N-1)ρ` (once) and `1 - ρ` (N-1 times), hence `ρ ∈ [-1/(N-1), 1]`.
/// For a single trace any coefficient in `[-1, 1]` is accepted (it is unused).
pub fn uniform_correlation_range(trace_count: usize) -> (f64, f64) {
    if trace_count <= 2 {
        (-1.0, 1.0)
    } else {
        (-1.0 / (trace_count - 1) as f64, 1.0)
    }
}

/// Symmetric N×N covariance matrix of the trace means.
#[derive(Debug, Clone, PartialEq)]
pub struct CovarianceMatrix {
    matrix: DMatrix<f64>,
}

impl CovarianceMatrix {
    /// Uniform pairwise correlation: `Σ_ii = σ_i²`, `Σ_ij = ρ σ_i σ_j`.
    ///
    /// # Errors
    ///
    /// - `InvalidCorrelationRange` if `coefficient` is non-finite or outside
    ///   [`uniform_correlation_range`] for `std_devs.len()` traces.
    /// - `InvalidConfig` if `std_devs` is empty or holds a non-positive value.
    pub fn uniform(coefficient: f64, std_devs: &[f64]) -> Result<Self> {
        let n = std_devs.len();
        if n == 0 {
            return Err(Error::InvalidConfig("at least one trace is required".into()));
        }
        if let Some(bad) = std_devs.iter().find(|s| !s.is_finite() || **s <= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "standard deviations must be finite and > 0, got {}",
                bad
            )));
        }

        let (min, max) = uniform_correlation_range(n);
        if !coefficient.is_finite() || coefficient < min || coefficient > max {
            return Err(Error::InvalidCorrelationRange { coefficient, min, max });
        }

        let matrix = DMatrix::from_fn(n, n, |i, j| {
            if i == j {
                std_devs[i] * std_devs[i]
            } else {
                coefficient * std_devs[i] * std_devs[j]
            }
        });
        Ok(Self { matrix })
    }

    /// Uniform correlation over `trace_count` unit-variance traces.
    pub fn unit_uniform(coefficient: f64, trace_count: usize) -> Result<Self> {
        Self::uniform(coefficient, &vec![1.0; trace_count])
    }

    /// Accept an arbitrary covariance matrix.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if the matrix is not square.
    /// - `InvalidConfig` if it is empty, has non-finite entries, a non-positive
    ///   diagonal, or is not symmetric.
    pub fn from_matrix(matrix: DMatrix<f64>) -> Result<Self> {
        let n = matrix.nrows();
        if n == 0 {
            return Err(Error::InvalidConfig("covariance matrix is empty".into()));
        }
        if matrix.ncols() != n {
            return Err(Error::DimensionMismatch {
                context: "covariance matrix columns",
                expected: n,
                found: matrix.ncols(),
            });
        }
        if matrix.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidConfig("covariance entries must be finite".into()));
        }
        if (0..n).any(|i| matrix[(i, i)] <= 0.0) {
            return Err(Error::InvalidConfig("covariance diagonal must be > 0".into()));
        }

        let scale = matrix.amax();
        for i in 0..n {
            for j in (i + 1)..n {
                if (matrix[(i, j)] - matrix[(j, i)]).abs() > SYMMETRY_TOLERANCE * scale {
                    return Err(Error::InvalidConfig(format!(
                        "covariance matrix not symmetric at ({}, {})",
                        i, j
                    )));
                }
            }
        }
        Ok(Self { matrix })
    }

    /// Number of traces.
    pub fn trace_count(&self) -> usize {
        self.matrix.nrows()
    }

    /// The covariance matrix itself.
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Per-trace standard deviations (square roots of the diagonal).
    pub fn std_devs(&self) -> Vec<f64> {
        (0..self.trace_count())
            .map(|i| self.matrix[(i, i)].sqrt())
            .collect()
    }

    /// Correlation coefficient between traces `i` and `j`.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is not below [`trace_count`](Self::trace_count).
    pub fn correlation(&self, i: usize, j: usize) -> f64 {
        self.matrix[(i, j)] / (self.matrix[(i, i)] * self.matrix[(j, j)]).sqrt()
    }
}
