//! CSV Output
//!
//! One row per summarized bootstrap sequence. Undefined statistics render as
//! empty fields, not zeros.

use crate::report::{AnalysisReport, DistributionReport};

/// Generate a CSV summary of the three bootstrap sequences.
pub fn generate_csv_report(report: &AnalysisReport) -> String {
    let mut output = String::new();
    output.push_str("sequence,metric,mean,std_error,ci_lower,ci_upper,defined,undefined\n");

    let rows = [
        ("mean_difference", &report.bootstrap.mean_difference),
        ("control_mean", &report.bootstrap.control_mean),
        ("treatment_mean", &report.bootstrap.treatment_mean),
    ];
    for (name, distribution) in rows {
        output.push_str(&csv_row(name, &report.bootstrap.metric, distribution));
    }

    output
}

fn csv_row(name: &str, metric: &str, distribution: &DistributionReport) -> String {
    format!(
        "{},{},{},{},{},{},{},{}\n",
        name,
        metric,
        csv_value(distribution.mean),
        csv_value(distribution.std_error),
        csv_value(distribution.ci_lower),
        csv_value(distribution.ci_upper),
        distribution.defined_iterations,
        distribution.undefined_iterations,
    )
}

fn csv_value(value: f64) -> String {
    if value.is_finite() {
        format!("{:.6}", value)
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{BootstrapSection, ReportMeta};

    fn distribution(mean: f64) -> DistributionReport {
        DistributionReport {
            mean,
            std_error: 0.5,
            ci_lower: mean - 1.0,
            ci_upper: mean + 1.0,
            defined_iterations: 90,
            undefined_iterations: 10,
        }
    }

    fn report() -> AnalysisReport {
        AnalysisReport {
            meta: ReportMeta::new("0.1.0"),
            experiment: None,
            variants: vec![],
            bootstrap: BootstrapSection {
                metric: "chargebacks".to_string(),
                control: "off".to_string(),
                treatment: "on".to_string(),
                observations: 100,
                iterations: 100,
                seed: None,
                confidence_level: 0.95,
                mean_difference: distribution(2.0),
                control_mean: distribution(10.0),
                treatment_mean: distribution(12.0),
            },
        }
    }

    #[test]
    fn test_csv_has_header_and_three_rows() {
        let csv = generate_csv_report(&report());
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("sequence,metric,"));
        assert!(lines[1].starts_with("mean_difference,chargebacks,"));
        assert!(lines[2].starts_with("control_mean,"));
        assert!(lines[3].starts_with("treatment_mean,"));
    }

    #[test]
    fn test_undefined_values_render_empty() {
        let mut r = report();
        r.bootstrap.mean_difference.mean = f64::NAN;
        r.bootstrap.mean_difference.std_error = f64::NAN;
        let csv = generate_csv_report(&r);
        let difference_line = csv.lines().nth(1).unwrap();

        assert!(difference_line.starts_with("mean_difference,chargebacks,,,"));
        assert!(!difference_line.contains("NaN"));
    }
}
