//! Statistics over generated traces.
//!
//! - Aggregate statistics of the summed signal (average, threshold exceedance)
//! - Empirical Pearson correlation between two traces

mod aggregate;
mod correlation;

pub use aggregate::{aggregate, exceed_fraction, mean, summed_sequence};
pub use correlation::pearson_correlation;
