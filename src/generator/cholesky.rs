//! Cholesky factorization of covariance matrices.
//!
//! Strictly positive-definite matrices go through nalgebra's [`Cholesky`].
//! Rank-deficient PSD matrices (e.g. two traces at correlation exactly ±1)
//! make that fail on a zero pivot, so they are handled by a semidefinite
//! variant that emits a zero column for each vanishing pivot. Both produce an
//! exact factor `C` with `C * Cᵗ = Σ`; nothing is jittered or clipped.

use log::debug;
use nalgebra::{Cholesky, DMatrix};

use crate::covariance::CovarianceMatrix;
use crate::error::{Error, Result};
use crate::types::TransformMatrix;

/// Pivots with `|p| <= PIVOT_TOLERANCE * max(diag)` are treated as exact zeros.
const PIVOT_TOLERANCE: f64 = 1e-10;

/// Compute the lower-triangular factor `C` of a covariance matrix.
///
/// # Errors
///
/// `NonPositiveDefiniteMatrix` when the matrix is not positive
/// semi-definite within floating-point tolerance.
pub fn factorize(covariance: &CovarianceMatrix) -> Result<TransformMatrix> {
    // nalgebra accepts a zero pivot and divides by it, so only a factor with
    // a strictly positive, finite diagonal is taken as is.
    if let Some(chol) = Cholesky::new(covariance.matrix().clone()) {
        let l = chol.l();
        let strict = l.iter().all(|v| v.is_finite()) && l.diagonal().iter().all(|&d| d > 0.0);
        if strict {
            return Ok(l);
        }
    }

    debug!(
        "strict Cholesky failed for {}x{} covariance, trying semidefinite factorization",
        covariance.trace_count(),
        covariance.trace_count()
    );
    semidefinite_cholesky(covariance.matrix())
}

/// Lower Cholesky factor of a symmetric PSD matrix, tolerating zero pivots.
///
/// Column-by-column Cholesky–Banachiewicz. A pivot inside the tolerance band
/// yields a zero diagonal entry; the entries below it must then vanish too,
/// otherwise the matrix is indefinite.
pub fn semidefinite_cholesky(a: &DMatrix<f64>) -> Result<TransformMatrix> {
    let n = a.nrows();
    let max_diag = (0..n).map(|i| a[(i, i)].abs()).fold(0.0_f64, f64::max);
    let tol = PIVOT_TOLERANCE * max_diag.max(f64::MIN_POSITIVE);
    // Bound on an off-diagonal residual that can accompany a zero pivot
    // (Cauchy-Schwarz: |r| <= sqrt(pivot_j * pivot_i)).
    let residual_tol = (tol * max_diag).sqrt();

    let mut l = DMatrix::<f64>::zeros(n, n);

    for j in 0..n {
        let mut pivot = a[(j, j)];
        for k in 0..j {
            pivot -= l[(j, k)] * l[(j, k)];
        }

        if pivot < -tol {
            return Err(Error::NonPositiveDefiniteMatrix { pivot: j, value: pivot });
        }

        if pivot <= tol {
            for i in (j + 1)..n {
                let mut residual = a[(i, j)];
                for k in 0..j {
                    residual -= l[(i, k)] * l[(j, k)];
                }
                if residual.abs() > residual_tol {
                    return Err(Error::NonPositiveDefiniteMatrix { pivot: j, value: pivot });
                }
            }
            continue;
        }

        let diag = pivot.sqrt();
        l[(j, j)] = diag;
        for i in (j + 1)..n {
            let mut sum = a[(i, j)];
            for k in 0..j {
                sum -= l[(i, k)] * l[(j, k)];
            }
            l[(i, j)] = sum / diag;
        }
    }

    Ok(l)
}
