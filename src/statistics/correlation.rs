//! Empirical correlation between generated traces.
//!
//! Used to check how much of the requested coupling survives phase-mean
//! projection, per-sample noise and clamping.

/// Pearson correlation coefficient of two equally long series.
///
/// # Returns
///
/// The coefficient in [-1, 1], or 0.0 if the lengths differ, fewer than 2
/// observations are available, or either series has zero variance.
///
/// # Formula
///
/// ```text
/// r = sum((a_t - mean_a) * (b_t - mean_b)) / sqrt(sum((a_t - mean_a)^2) * sum((b_t - mean_b)^2))
/// ```
pub fn pearson_correlation(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len();
    if n != b.len() || n < 2 {
        return 0.0;
    }

    let mean_a = a.iter().sum::<f64>() / n as f64;
    let mean_b = b.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (&x, &y) in a.iter().zip(b) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    if var_a == 0.0 || var_b == 0.0 {
        return 0.0;
    }
    (cov / (var_a * var_b).sqrt()).clamp(-1.0, 1.0)
}
