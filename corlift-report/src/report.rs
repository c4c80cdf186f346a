//! Report Data Structures

use chrono::{DateTime, NaiveDate, Utc};
use corlift_stats::DistributionSummary;
use serde::{Deserialize, Serialize};

/// Current report schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Complete analysis report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Report provenance
    pub meta: ReportMeta,
    /// Experiment identity, when known
    pub experiment: Option<ExperimentInfo>,
    /// Per-variant table over the analyzed receipts
    pub variants: Vec<VariantRow>,
    /// Bootstrap results
    pub bootstrap: BootstrapSection,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Schema version of this document
    pub schema_version: u32,
    /// Producing crate version
    pub version: String,
    /// Generation time (UTC)
    pub timestamp: DateTime<Utc>,
}

impl ReportMeta {
    /// Metadata stamped with the current time.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            version: version.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Experiment identity carried into the report header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentInfo {
    /// Experiment identifier
    pub experiment_id: String,
    /// Launch name, when fetched
    pub name: Option<String>,
    /// Analysis window start
    pub start_date: Option<NaiveDate>,
    /// Analysis window end
    pub end_date: Option<NaiveDate>,
}

/// One row of the per-variant table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantRow {
    /// Variant label
    pub variant: String,
    /// Receipts attributed to this variant
    pub receipts: usize,
    /// Gross merchandise sales over those receipts
    pub gms_gross: f64,
    /// Observed (non-resampled) mean of the analyzed metric; `None` when the
    /// variant has no non-missing value
    pub observed_mean: Option<f64>,
}

/// Bootstrap configuration and the three summarized distributions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapSection {
    /// Metric analyzed
    pub metric: String,
    /// Control variant label
    pub control: String,
    /// Treatment variant label
    pub treatment: String,
    /// Observations resampled per iteration
    pub observations: usize,
    /// Number of bootstrap iterations
    pub iterations: usize,
    /// RNG seed, when the run was seeded
    pub seed: Option<u64>,
    /// Confidence level of the intervals
    pub confidence_level: f64,
    /// Summary of the treatment-minus-control differences
    pub mean_difference: DistributionReport,
    /// Summary of the control means
    pub control_mean: DistributionReport,
    /// Summary of the treatment means
    pub treatment_mean: DistributionReport,
}

/// Summarized bootstrap output sequence.
///
/// Non-finite statistics (an all-undefined sequence) serialize as JSON null,
/// so the undefined marker survives the wire instead of collapsing to zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionReport {
    /// Mean over defined iterations
    pub mean: f64,
    /// Standard error of the bootstrap distribution
    pub std_error: f64,
    /// Lower confidence bound
    pub ci_lower: f64,
    /// Upper confidence bound
    pub ci_upper: f64,
    /// Iterations with a defined value
    pub defined_iterations: usize,
    /// Iterations dropped as undefined
    pub undefined_iterations: usize,
}

impl From<&DistributionSummary> for DistributionReport {
    fn from(summary: &DistributionSummary) -> Self {
        Self {
            mean: summary.mean,
            std_error: summary.std_error,
            ci_lower: summary.ci_lower,
            ci_upper: summary.ci_upper,
            defined_iterations: summary.defined,
            undefined_iterations: summary.undefined,
        }
    }
}
