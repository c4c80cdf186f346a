//! JSON Output

use crate::report::AnalysisReport;

/// Generate a prettified JSON report.
///
/// Serializes the analysis report into machine-readable JSON. Non-finite
/// statistics become JSON null.
pub fn generate_json_report(report: &AnalysisReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
