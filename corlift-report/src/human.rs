//! Output Formatting
//!
//! Human-readable terminal output for analysis reports:
//! - Experiment header with analysis window and run parameters
//! - Per-variant table (receipts, GMS, observed metric mean)
//! - Bootstrap table with confidence intervals and undefined-draw counts

use crate::report::{AnalysisReport, DistributionReport};

/// Format a report for human-readable terminal display
pub fn format_human_output(report: &AnalysisReport) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("Corlift Analysis\n");
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    if let Some(experiment) = &report.experiment {
        match &experiment.name {
            Some(name) => output.push_str(&format!(
                "Experiment: {} ({})\n",
                experiment.experiment_id, name
            )),
            None => output.push_str(&format!("Experiment: {}\n", experiment.experiment_id)),
        }
        if let (Some(start), Some(end)) = (experiment.start_date, experiment.end_date) {
            output.push_str(&format!("Window: {} to {}\n", start, end));
        }
    }

    let bootstrap = &report.bootstrap;
    output.push_str(&format!(
        "Metric: {}  control: {}  treatment: {}\n",
        bootstrap.metric, bootstrap.control, bootstrap.treatment
    ));
    let seed_str = match bootstrap.seed {
        Some(seed) => format!("  seed: {}", seed),
        None => String::new(),
    };
    output.push_str(&format!(
        "Receipts: {}  Iterations: {}{}\n\n",
        bootstrap.observations, bootstrap.iterations, seed_str
    ));

    if !report.variants.is_empty() {
        output.push_str("Variants\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');

        let width = report
            .variants
            .iter()
            .map(|v| v.variant.len())
            .max()
            .unwrap_or(8)
            .max(8);

        output.push_str(&format!(
            "  {:<width$}  {:>10}  {:>14}  {:>14}\n",
            "Variant",
            "Receipts",
            "GMS (gross)",
            "Mean metric",
            width = width
        ));
        for row in &report.variants {
            let observed = match row.observed_mean {
                Some(mean) => format!("{:>14.4}", mean),
                None => format!("{:>14}", "n/a"),
            };
            output.push_str(&format!(
                "  {:<width$}  {:>10}  {:>14.2}  {}\n",
                row.variant,
                row.receipts,
                row.gms_gross,
                observed,
                width = width
            ));
        }
        output.push('\n');
    }

    output.push_str(&format!(
        "Bootstrap ({:.0}% CI)\n",
        bootstrap.confidence_level * 100.0
    ));
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "  {:<18}  {:>12}  {:>10}  {:>24}  {:>9}\n",
        "sequence", "mean", "std err", "interval", "undefined"
    ));

    let rows = [
        ("treatment-control", &bootstrap.mean_difference),
        ("control mean", &bootstrap.control_mean),
        ("treatment mean", &bootstrap.treatment_mean),
    ];
    for (name, distribution) in rows {
        output.push_str(&format_distribution_row(name, distribution));
    }

    output
}

fn format_distribution_row(name: &str, distribution: &DistributionReport) -> String {
    let interval = if distribution.ci_lower.is_finite() && distribution.ci_upper.is_finite() {
        format!("[{:.4}, {:.4}]", distribution.ci_lower, distribution.ci_upper)
    } else {
        "n/a".to_string()
    };
    format!(
        "  {:<18}  {:>12}  {:>10}  {:>24}  {:>9}\n",
        name,
        format_value(distribution.mean),
        format_value(distribution.std_error),
        interval,
        distribution.undefined_iterations,
    )
}

fn format_value(value: f64) -> String {
    if value.is_finite() {
        format!("{:.4}", value)
    } else {
        "n/a".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{BootstrapSection, ExperimentInfo, ReportMeta, VariantRow};

    fn distribution(mean: f64) -> DistributionReport {
        DistributionReport {
            mean,
            std_error: 0.2,
            ci_lower: mean - 0.5,
            ci_upper: mean + 0.5,
            defined_iterations: 100,
            undefined_iterations: 0,
        }
    }

    fn report() -> AnalysisReport {
        AnalysisReport {
            meta: ReportMeta::new("0.1.0"),
            experiment: Some(ExperimentInfo {
                experiment_id: "checkout_trust_badge".to_string(),
                name: Some("Checkout Trust Badge".to_string()),
                start_date: chrono::NaiveDate::from_ymd_opt(2024, 2, 1),
                end_date: chrono::NaiveDate::from_ymd_opt(2024, 3, 1),
            }),
            variants: vec![
                VariantRow {
                    variant: "off".to_string(),
                    receipts: 120,
                    gms_gross: 4800.0,
                    observed_mean: Some(1.25),
                },
                VariantRow {
                    variant: "on".to_string(),
                    receipts: 118,
                    gms_gross: 4650.5,
                    observed_mean: None,
                },
            ],
            bootstrap: BootstrapSection {
                metric: "total".to_string(),
                control: "off".to_string(),
                treatment: "on".to_string(),
                observations: 238,
                iterations: 1000,
                seed: Some(7),
                confidence_level: 0.95,
                mean_difference: distribution(0.5),
                control_mean: distribution(1.2),
                treatment_mean: distribution(1.7),
            },
        }
    }

    #[test]
    fn test_header_and_sections_present() {
        let text = format_human_output(&report());
        assert!(text.contains("Corlift Analysis"));
        assert!(text.contains("Experiment: checkout_trust_badge (Checkout Trust Badge)"));
        assert!(text.contains("Window: 2024-02-01 to 2024-03-01"));
        assert!(text.contains("Variants"));
        assert!(text.contains("Bootstrap (95% CI)"));
        assert!(text.contains("treatment-control"));
    }

    #[test]
    fn test_missing_observed_mean_renders_na() {
        let text = format_human_output(&report());
        assert!(text.contains("n/a"));
    }

    #[test]
    fn test_undefined_distribution_renders_na_not_nan() {
        let mut r = report();
        r.bootstrap.treatment_mean = DistributionReport {
            mean: f64::NAN,
            std_error: f64::NAN,
            ci_lower: f64::NAN,
            ci_upper: f64::NAN,
            defined_iterations: 0,
            undefined_iterations: 1000,
        };
        let text = format_human_output(&r);
        assert!(!text.contains("NaN"));
        assert!(text.contains("1000"));
    }

    #[test]
    fn test_report_without_experiment_header() {
        let mut r = report();
        r.experiment = None;
        let text = format_human_output(&r);
        assert!(!text.contains("Experiment:"));
        assert!(text.contains("Metric: total"));
    }
}
