#![warn(missing_docs)]
//! Corlift Statistical Engine
//!
//! Provides the statistical core for experiment financial-outcome analysis:
//! - Bootstrap resampling of the difference in mean outcome between two variants
//! - Skip-missing group means (a missing metric value is absent, never zero)
//! - Percentile computation and percentile confidence intervals
//! - Distribution summaries that keep undefined resamples distinguishable

mod bootstrap;
mod dataset;
mod percentiles;
mod summary;

pub use bootstrap::{
    BootstrapConfig, BootstrapError, ResampleDistributions, bootstrap_mean_difference,
    bootstrap_mean_difference_with_rng,
};
pub use dataset::{MetricKind, Observation, group_mean};
pub use percentiles::{compute_percentile, percentile_interval};
pub use summary::{DistributionSummary, SummaryError, summarize_distribution};

/// Default number of bootstrap iterations
pub const DEFAULT_BOOTSTRAP_ITERATIONS: usize = 10_000;

/// Default confidence level (95%)
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;
