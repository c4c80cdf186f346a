//! Percentile Computation
//!
//! Percentiles over bootstrap output sequences, with linear interpolation
//! between nearest ranks. Callers summarizing bootstrap distributions drop
//! undefined (`NaN`) entries before calling in here.

/// Compute a single percentile from samples.
///
/// Uses linear interpolation between nearest ranks. Empty input yields 0.0.
pub fn compute_percentile(samples: &[f64], percentile: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    if samples.len() == 1 {
        return samples[0];
    }

    let mut sorted = samples.to_vec();
    sorted.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = (percentile / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = (lower + 1).min(sorted.len() - 1);
    let fraction = rank - lower as f64;

    sorted[lower] + fraction * (sorted[upper] - sorted[lower])
}

/// Symmetric percentile confidence interval.
///
/// For confidence level `c`, returns the `(1-c)/2` and `1-(1-c)/2`
/// percentiles of the samples.
pub fn percentile_interval(samples: &[f64], confidence_level: f64) -> (f64, f64) {
    let alpha = (1.0 - confidence_level) / 2.0;
    (
        compute_percentile(samples, alpha * 100.0),
        compute_percentile(samples, (1.0 - alpha) * 100.0),
    )
}
