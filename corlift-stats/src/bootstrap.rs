//! Bootstrap Resampling
//!
//! Estimates the sampling distribution of the difference in mean outcome
//! between two experiment variants. Each iteration draws a full-size resample
//! of the dataset with replacement, takes the skip-missing mean of the chosen
//! metric within each of the two variants, and records both means and their
//! difference.
//!
//! Resamples are drawn from the whole dataset, not per variant: group sizes
//! fluctuate from draw to draw, and a rare variant can vanish from a draw
//! entirely. A vanished (or all-missing) group produces `NaN` for that
//! iteration rather than an error, so downstream consumers can count or drop
//! undefined draws explicitly.

use crate::DEFAULT_BOOTSTRAP_ITERATIONS;
use crate::dataset::{MetricKind, Observation};
use rand::prelude::*;
use rayon::prelude::*;
use thiserror::Error;

/// Bootstrap configuration
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Number of bootstrap iterations (default: 10,000)
    pub iterations: usize,
    /// Fixed RNG seed; seeded runs are serial and fully reproducible
    pub seed: Option<u64>,
    /// Run unseeded iterations in parallel
    pub parallel: bool,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_BOOTSTRAP_ITERATIONS,
            seed: None,
            parallel: true,
        }
    }
}

/// The three empirical distributions produced by a bootstrap run.
///
/// Sequences are aligned by index: entry *i* of each sequence comes from the
/// same resample draw, and `mean_differences[i]` is exactly
/// `treatment_means[i] - control_means[i]`. Undefined entries are `NaN`.
#[derive(Debug, Clone, Default)]
pub struct ResampleDistributions {
    /// Per-iteration `treatment - control` mean difference
    pub mean_differences: Vec<f64>,
    /// Per-iteration control-group mean
    pub control_means: Vec<f64>,
    /// Per-iteration treatment-group mean
    pub treatment_means: Vec<f64>,
}

impl ResampleDistributions {
    fn with_capacity(iterations: usize) -> Self {
        Self {
            mean_differences: Vec::with_capacity(iterations),
            control_means: Vec::with_capacity(iterations),
            treatment_means: Vec::with_capacity(iterations),
        }
    }

    /// Record one draw. The difference is derived here so the alignment
    /// invariant holds by construction.
    fn push(&mut self, control: f64, treatment: f64) {
        self.control_means.push(control);
        self.treatment_means.push(treatment);
        self.mean_differences.push(treatment - control);
    }

    /// Number of recorded iterations.
    pub fn len(&self) -> usize {
        self.mean_differences.len()
    }

    /// True when no iterations were recorded.
    pub fn is_empty(&self) -> bool {
        self.mean_differences.is_empty()
    }

    /// Number of iterations whose difference is undefined (`NaN`), i.e. at
    /// least one of the two groups had no non-missing value in the draw.
    pub fn undefined_count(&self) -> usize {
        self.mean_differences.iter().filter(|d| d.is_nan()).count()
    }
}

/// Errors rejected at the call boundary, before any entropy is consumed.
#[derive(Debug, Clone, Error)]
pub enum BootstrapError {
    /// Metric selector outside the recognized set
    #[error(
        "unknown metric selector {0:?} (expected \"total\", \"bad_recoupments\", or \"chargebacks\")"
    )]
    UnknownMetric(String),

    /// Iteration count below 1
    #[error("iteration count must be at least 1")]
    ZeroIterations,

    /// No observations to resample
    #[error("dataset contains no observations")]
    EmptyDataset,
}

/// Bootstrap the difference in mean outcome between two variants.
///
/// Labels other than `control` and `treatment` still occupy slots in every
/// resample (the draw size is always `data.len()`) but contribute to neither
/// group mean.
///
/// With `config.seed` set the run is serial and deterministic: identical
/// inputs and seed produce bitwise-identical output sequences. Unseeded runs
/// may execute iterations in parallel, each worker with its own thread-local
/// RNG; output order is still iteration order.
pub fn bootstrap_mean_difference(
    data: &[Observation],
    metric: MetricKind,
    control: &str,
    treatment: &str,
    config: &BootstrapConfig,
) -> Result<ResampleDistributions, BootstrapError> {
    validate(data, config.iterations)?;

    if let Some(seed) = config.seed {
        let mut rng = StdRng::seed_from_u64(seed);
        Ok(resample_serial(
            data,
            metric,
            control,
            treatment,
            config.iterations,
            &mut rng,
        ))
    } else if config.parallel {
        Ok(resample_parallel(
            data,
            metric,
            control,
            treatment,
            config.iterations,
        ))
    } else {
        let mut rng = thread_rng();
        Ok(resample_serial(
            data,
            metric,
            control,
            treatment,
            config.iterations,
            &mut rng,
        ))
    }
}

/// Same algorithm against a caller-owned random source.
///
/// Validation happens before the source is touched, so a source that panics
/// on first use can prove invalid inputs never reach the resampling loop.
pub fn bootstrap_mean_difference_with_rng<R: Rng + ?Sized>(
    data: &[Observation],
    metric: MetricKind,
    control: &str,
    treatment: &str,
    iterations: usize,
    rng: &mut R,
) -> Result<ResampleDistributions, BootstrapError> {
    validate(data, iterations)?;
    Ok(resample_serial(
        data, metric, control, treatment, iterations, rng,
    ))
}

fn validate(data: &[Observation], iterations: usize) -> Result<(), BootstrapError> {
    if iterations == 0 {
        return Err(BootstrapError::ZeroIterations);
    }
    if data.is_empty() {
        return Err(BootstrapError::EmptyDataset);
    }
    Ok(())
}

fn resample_serial<R: Rng + ?Sized>(
    data: &[Observation],
    metric: MetricKind,
    control: &str,
    treatment: &str,
    iterations: usize,
    rng: &mut R,
) -> ResampleDistributions {
    let mut distributions = ResampleDistributions::with_capacity(iterations);
    for _ in 0..iterations {
        let (control_mean, treatment_mean) =
            resample_group_means(data, metric, control, treatment, rng);
        distributions.push(control_mean, treatment_mean);
    }
    distributions
}

fn resample_parallel(
    data: &[Observation],
    metric: MetricKind,
    control: &str,
    treatment: &str,
    iterations: usize,
) -> ResampleDistributions {
    let draws: Vec<(f64, f64)> = (0..iterations)
        .into_par_iter()
        .map_init(thread_rng, |rng, _| {
            resample_group_means(data, metric, control, treatment, rng)
        })
        .collect();

    let mut distributions = ResampleDistributions::with_capacity(iterations);
    for (control_mean, treatment_mean) in draws {
        distributions.push(control_mean, treatment_mean);
    }
    distributions
}

/// One resample: `data.len()` rows drawn uniformly with replacement, then the
/// skip-missing mean of `metric` within each label. A label with zero
/// non-missing entries in the draw yields `NaN`.
fn resample_group_means<R: Rng + ?Sized>(
    data: &[Observation],
    metric: MetricKind,
    control: &str,
    treatment: &str,
    rng: &mut R,
) -> (f64, f64) {
    let n = data.len();
    let mut control_acc = MeanAccumulator::default();
    let mut treatment_acc = MeanAccumulator::default();

    for _ in 0..n {
        let observation = &data[rng.gen_range(0..n)];
        if observation.variant == control {
            control_acc.add(metric.select(observation));
        } else if observation.variant == treatment {
            treatment_acc.add(metric.select(observation));
        }
    }

    (control_acc.mean(), treatment_acc.mean())
}

/// Running mean over non-missing values only.
#[derive(Default)]
struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    fn add(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.sum / self.count as f64
        }
    }
}
