//! Terminal summary of correlation sweeps.

use colored::Colorize;

use crate::result::{LoadSeries, SweepSeries};

/// Format a sweep as a table of every `stride`-th point.
///
/// Exceed fractions above one half are highlighted in red, above zero in
/// yellow. A stride of 0 is treated as 1.
pub fn format_series(series: &SweepSeries, stride: usize) -> String {
    let mut output = String::new();
    let sep = "\u{2500}".repeat(62);

    output.push_str(&format!(
        "  Threshold: {}   Seed: {}   Points: {} ({} skipped)\n",
        series.threshold,
        series.seed,
        series.points.len(),
        series.skipped.len()
    ));
    output.push_str(&sep);
    output.push('\n');
    output.push_str("      corr   summed avg   over threshold   per-trace avg\n");

    for point in series.points.iter().step_by(stride.max(1)) {
        let pct = point.exceed_fraction * 100.0;
        let pct_text = format!("{:>13.1}%", pct);
        let pct_text = if point.exceed_fraction > 0.5 {
            pct_text.red().to_string()
        } else if point.exceed_fraction > 0.0 {
            pct_text.yellow().to_string()
        } else {
            pct_text.green().to_string()
        };
        let per_trace: Vec<String> = point
            .per_trace_averages
            .iter()
            .map(|a| format!("{:.1}", a))
            .collect();

        output.push_str(&format!(
            "  {:>+8.2}   {:>10.2}   {}   {}\n",
            point.correlation_coefficient,
            point.summed_average,
            pct_text,
            per_trace.join(" / ")
        ));
    }

    for skipped in &series.skipped {
        output.push_str(&format!(
            "  {:>+8.2}   {}\n",
            skipped.correlation_coefficient,
            format!("skipped: {}", skipped.reason).yellow()
        ));
    }

    output
}

/// Format one table per load level, headed by its label.
pub fn format_load_levels(levels: &[LoadSeries], stride: usize) -> String {
    let mut output = String::new();
    for level in levels {
        output.push_str(&format!(
            "{} (spread {})\n",
            level.label().bold(),
            level.spread
        ));
        output.push_str(&format_series(&level.series, stride));
        output.push('\n');
    }
    output
}
