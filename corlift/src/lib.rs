#![warn(missing_docs)]
//! # Corlift
//!
//! A/B experiment financial-outcome analysis for chargebacks and recoupments.
//!
//! Corlift covers the path from warehouse to confidence interval:
//! - **Query Templates**: parameterized SQL for experiment metadata,
//!   per-variant aggregates, and per-receipt financial detail
//! - **Injected Client**: warehouse access is a `QueryClient` capability the
//!   caller provides, never ambient state
//! - **Bootstrap Inference**: resampling with replacement over the full
//!   receipt set, skip-missing group means, explicit undefined markers for
//!   degenerate draws
//! - **Reproducibility**: seeded runs produce bitwise-identical distributions
//! - **Reporting**: JSON, CSV, and terminal output with percentile
//!   confidence intervals
//!
//! ## Quick Start
//!
//! ```ignore
//! use corlift::prelude::*;
//!
//! let observations = corlift::observations(&records);
//! let distributions = bootstrap_mean_difference(
//!     &observations,
//!     MetricKind::TotalCor,
//!     "off",
//!     "on",
//!     &BootstrapConfig::default(),
//! )?;
//! let summary = summarize_distribution(&distributions.mean_differences, 0.95)?;
//! ```

// Re-export the statistical core
pub use corlift_stats::{
    BootstrapConfig, BootstrapError, DEFAULT_BOOTSTRAP_ITERATIONS, DEFAULT_CONFIDENCE_LEVEL,
    DistributionSummary, MetricKind, Observation, ResampleDistributions, SummaryError,
    bootstrap_mean_difference, bootstrap_mean_difference_with_rng, compute_percentile,
    group_mean, percentile_interval, summarize_distribution,
};

// Re-export warehouse access
pub use corlift_warehouse::{
    Cell, ExperimentSummary, QueryClient, ReceiptRecord, Row, VariantStats, WarehouseError,
    experiment_receipts_sql, experiment_summary_sql, fetch_experiment_receipts,
    fetch_experiment_summary, fetch_variant_stats, observations, variant_stats_sql,
};

// Re-export reporting
pub use corlift_report::{
    AnalysisReport, BootstrapSection, DistributionReport, OutputFormat, format_human_output,
    generate_csv_report, generate_json_report,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BootstrapConfig, MetricKind, Observation, QueryClient, ReceiptRecord,
        bootstrap_mean_difference, summarize_distribution,
    };
}

/// Run the corlift CLI harness.
///
/// Call this from the binary's `main()`:
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     corlift::run()
/// }
/// ```
pub use corlift_cli::run;
