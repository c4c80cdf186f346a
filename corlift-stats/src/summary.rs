//! Distribution Summaries
//!
//! Reduces one bootstrap output sequence to a point estimate and a percentile
//! confidence interval. Undefined entries (`NaN`) are dropped from every
//! statistic and surfaced as an explicit count, never folded in as zero.

use crate::percentiles::percentile_interval;
use thiserror::Error;

/// Summary of one bootstrap output sequence.
#[derive(Debug, Clone)]
pub struct DistributionSummary {
    /// Mean over defined entries
    pub mean: f64,
    /// Standard deviation of the bootstrap distribution (standard error)
    pub std_error: f64,
    /// Lower percentile confidence bound
    pub ci_lower: f64,
    /// Upper percentile confidence bound
    pub ci_upper: f64,
    /// Confidence level the bounds were computed at
    pub confidence_level: f64,
    /// Number of defined entries
    pub defined: usize,
    /// Number of undefined (`NaN`) entries dropped
    pub undefined: usize,
}

impl DistributionSummary {
    /// True when at least one iteration produced a defined value.
    pub fn has_defined_values(&self) -> bool {
        self.defined > 0
    }
}

/// Errors from summarization
#[derive(Debug, Clone, Copy, Error)]
pub enum SummaryError {
    /// Confidence level outside the open interval (0, 1)
    #[error("invalid confidence level: {0} (must be strictly between 0 and 1)")]
    InvalidConfidenceLevel(f64),
}

/// Summarize a bootstrap output sequence at the given confidence level.
///
/// An all-undefined sequence summarizes to `NaN` statistics with
/// `defined == 0` rather than erroring: rare-variant degeneracy is expected
/// statistical behavior, and the caller decides how to present it.
pub fn summarize_distribution(
    samples: &[f64],
    confidence_level: f64,
) -> Result<DistributionSummary, SummaryError> {
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return Err(SummaryError::InvalidConfidenceLevel(confidence_level));
    }

    let defined: Vec<f64> = samples.iter().copied().filter(|v| !v.is_nan()).collect();
    let undefined = samples.len() - defined.len();

    if defined.is_empty() {
        return Ok(DistributionSummary {
            mean: f64::NAN,
            std_error: f64::NAN,
            ci_lower: f64::NAN,
            ci_upper: f64::NAN,
            confidence_level,
            defined: 0,
            undefined,
        });
    }

    let mean = defined.iter().sum::<f64>() / defined.len() as f64;
    let std_error = (defined.iter().map(|x| (x - mean).powi(2)).sum::<f64>()
        / defined.len() as f64)
        .sqrt();
    let (ci_lower, ci_upper) = percentile_interval(&defined, confidence_level);

    Ok(DistributionSummary {
        mean,
        std_error,
        ci_lower,
        ci_upper,
        confidence_level,
        defined: defined.len(),
        undefined,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_summary() {
        let samples: Vec<f64> = (1..=100).map(|x| x as f64).collect();
        let summary = summarize_distribution(&samples, 0.95).unwrap();

        assert!((summary.mean - 50.5).abs() < 0.01);
        assert!(summary.ci_lower < summary.mean);
        assert!(summary.ci_upper > summary.mean);
        assert_eq!(summary.defined, 100);
        assert_eq!(summary.undefined, 0);
    }

    #[test]
    fn test_undefined_entries_dropped_not_zeroed() {
        let samples = vec![10.0, f64::NAN, 20.0, f64::NAN, 30.0];
        let summary = summarize_distribution(&samples, 0.95).unwrap();

        // Mean over the three defined entries; a zero-fill would give 12.0.
        assert!((summary.mean - 20.0).abs() < f64::EPSILON);
        assert_eq!(summary.defined, 3);
        assert_eq!(summary.undefined, 2);
    }

    #[test]
    fn test_all_undefined_sequence() {
        let samples = vec![f64::NAN; 50];
        let summary = summarize_distribution(&samples, 0.95).unwrap();

        assert!(summary.mean.is_nan());
        assert!(summary.ci_lower.is_nan());
        assert!(summary.ci_upper.is_nan());
        assert!(!summary.has_defined_values());
        assert_eq!(summary.undefined, 50);
    }

    #[test]
    fn test_invalid_confidence_level() {
        for level in [0.0, 1.0, -0.5, 1.5] {
            let result = summarize_distribution(&[1.0, 2.0], level);
            assert!(matches!(
                result,
                Err(SummaryError::InvalidConfidenceLevel(_))
            ));
        }
    }

    #[test]
    fn test_zero_variance_sequence() {
        let samples = vec![7.0; 100];
        let summary = summarize_distribution(&samples, 0.95).unwrap();

        assert!((summary.mean - 7.0).abs() < f64::EPSILON);
        assert!((summary.std_error - 0.0).abs() < f64::EPSILON);
        assert!((summary.ci_lower - 7.0).abs() < f64::EPSILON);
        assert!((summary.ci_upper - 7.0).abs() < f64::EPSILON);
    }
}
