//! Analysis Execution
//!
//! Turns a receipt export into an analysis report: bridge records to
//! observations, bootstrap the mean difference, summarize each output
//! sequence, and assemble the per-variant table.

use crate::AnalyzeArgs;
use crate::config::CorliftConfig;
use crate::input;
use anyhow::Context;
use corlift_report::{
    AnalysisReport, BootstrapSection, DistributionReport, ExperimentInfo, OutputFormat,
    ReportMeta, VariantRow, format_human_output, generate_csv_report, generate_json_report,
};
use corlift_stats::{
    BootstrapConfig, MetricKind, bootstrap_mean_difference, group_mean, summarize_distribution,
};
use corlift_warehouse::{ReceiptRecord, observations};
use std::collections::BTreeMap;
use std::io::Write;

/// Run the analyze subcommand end to end.
pub fn run_analysis(args: &AnalyzeArgs, config: &CorliftConfig) -> anyhow::Result<()> {
    let metric: MetricKind = args.metric.parse()?;
    let records = input::load_receipts(&args.input)?;
    tracing::info!(receipts = records.len(), metric = %metric, "loaded receipt export");

    let bootstrap_config = BootstrapConfig {
        iterations: args.iterations.unwrap_or(config.bootstrap.iterations),
        seed: args.seed.or(config.bootstrap.seed),
        parallel: config.bootstrap.parallel,
    };
    let confidence_level = args.confidence.unwrap_or(config.bootstrap.confidence_level);

    let report = build_report(
        args.experiment_id.as_deref(),
        &records,
        metric,
        &args.control,
        &args.treatment,
        &bootstrap_config,
        confidence_level,
    )?;

    let format: OutputFormat = args
        .format
        .as_deref()
        .unwrap_or(&config.output.format)
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let output = match format {
        OutputFormat::Json => generate_json_report(&report)?,
        OutputFormat::Csv => generate_csv_report(&report),
        OutputFormat::Human => format_human_output(&report),
    };

    match &args.output {
        Some(path) => {
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            file.write_all(output.as_bytes())?;
            println!("Report written to: {}", path.display());
        }
        None => print!("{}", output),
    }

    Ok(())
}

/// Build a complete analysis report from receipt records.
pub fn build_report(
    experiment_id: Option<&str>,
    records: &[ReceiptRecord],
    metric: MetricKind,
    control: &str,
    treatment: &str,
    config: &BootstrapConfig,
    confidence_level: f64,
) -> anyhow::Result<AnalysisReport> {
    let data = observations(records);

    let distributions = bootstrap_mean_difference(&data, metric, control, treatment, config)?;
    let mean_difference = summarize_distribution(&distributions.mean_differences, confidence_level)?;
    let control_mean = summarize_distribution(&distributions.control_means, confidence_level)?;
    let treatment_mean = summarize_distribution(&distributions.treatment_means, confidence_level)?;

    tracing::debug!(
        iterations = distributions.len(),
        undefined = distributions.undefined_count(),
        "bootstrap complete"
    );

    let variants = variant_table(records, &data, metric);

    Ok(AnalysisReport {
        meta: ReportMeta::new(env!("CARGO_PKG_VERSION")),
        experiment: experiment_id.map(|id| ExperimentInfo {
            experiment_id: id.to_string(),
            name: None,
            start_date: None,
            end_date: None,
        }),
        variants,
        bootstrap: BootstrapSection {
            metric: metric.to_string(),
            control: control.to_string(),
            treatment: treatment.to_string(),
            observations: data.len(),
            iterations: config.iterations,
            seed: config.seed,
            confidence_level,
            mean_difference: DistributionReport::from(&mean_difference),
            control_mean: DistributionReport::from(&control_mean),
            treatment_mean: DistributionReport::from(&treatment_mean),
        },
    })
}

/// Per-variant receipt counts, GMS totals, and observed metric means.
fn variant_table(
    records: &[ReceiptRecord],
    data: &[corlift_stats::Observation],
    metric: MetricKind,
) -> Vec<VariantRow> {
    let mut grouped: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
    for record in records {
        let entry = grouped.entry(record.variant.as_str()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += record.gms_gross;
    }

    grouped
        .into_iter()
        .map(|(variant, (receipts, gms_gross))| VariantRow {
            variant: variant.to_string(),
            receipts,
            gms_gross,
            observed_mean: group_mean(data, metric, variant),
        })
        .collect()
}
