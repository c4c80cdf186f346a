//! Experiment Observations
//!
//! One `Observation` per outcome unit (a purchase receipt), labeled with the
//! variant that produced it. Metric values are `Option<f64>`: `None` is the
//! explicit missing marker and is excluded from both the numerator and the
//! denominator of any mean — it is never treated as zero.

use crate::bootstrap::BootstrapError;
use std::fmt;
use std::str::FromStr;

/// A single outcome unit attributed to an experiment variant.
///
/// Observations are immutable inputs: the estimator reads them and never
/// mutates the caller's collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Variant label that produced this unit
    pub variant: String,
    /// Combined chargebacks-and-recoupments amount, `None` when unknown
    pub total_cor: Option<f64>,
    /// Bad-recoupment amount, `None` when unknown
    pub bad_recoupments: Option<f64>,
    /// Chargeback amount (including fees), `None` when unknown
    pub chargebacks: Option<f64>,
}

/// The closed set of outcome metrics an analysis can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// Sum of bad recoupments and chargebacks, precomputed per observation
    TotalCor,
    /// Bad recoupments only
    BadRecoupments,
    /// Chargebacks (and chargeback fees) only
    Chargebacks,
}

impl MetricKind {
    /// Every recognized metric, in display order.
    pub const ALL: [MetricKind; 3] = [
        MetricKind::TotalCor,
        MetricKind::BadRecoupments,
        MetricKind::Chargebacks,
    ];

    /// Pick this metric's value off an observation.
    pub fn select(&self, observation: &Observation) -> Option<f64> {
        match self {
            MetricKind::TotalCor => observation.total_cor,
            MetricKind::BadRecoupments => observation.bad_recoupments,
            MetricKind::Chargebacks => observation.chargebacks,
        }
    }
}

impl FromStr for MetricKind {
    type Err = BootstrapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "total" => Ok(MetricKind::TotalCor),
            "bad_recoupments" => Ok(MetricKind::BadRecoupments),
            "chargebacks" => Ok(MetricKind::Chargebacks),
            other => Err(BootstrapError::UnknownMetric(other.to_string())),
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricKind::TotalCor => write!(f, "total"),
            MetricKind::BadRecoupments => write!(f, "bad_recoupments"),
            MetricKind::Chargebacks => write!(f, "chargebacks"),
        }
    }
}

/// Mean of a metric over the observations carrying the given variant label.
///
/// Missing values are skipped entirely. Returns `None` when the label has no
/// non-missing entries, so callers can distinguish "no data" from a zero mean.
pub fn group_mean(data: &[Observation], metric: MetricKind, label: &str) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for observation in data.iter().filter(|o| o.variant == label) {
        if let Some(value) = metric.select(observation) {
            sum += value;
            count += 1;
        }
    }
    (count > 0).then(|| sum / count as f64)
}
