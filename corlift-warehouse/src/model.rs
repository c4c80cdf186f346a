//! Typed Warehouse Records
//!
//! Records for each query template's result shape, row mapping from the
//! `QueryClient` surface, and the bridge into `corlift_stats` observations.

use crate::client::{QueryClient, Row, WarehouseError};
use crate::query;
use chrono::NaiveDate;
use corlift_stats::Observation;
use serde::{Deserialize, Serialize};

/// Top-line experiment metadata from the boundary lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentSummary {
    /// Experiment identifier (config flag)
    pub experiment_id: String,
    /// Launch name
    pub name: String,
    /// First day of the latest bucketing boundary
    pub start_date: NaiveDate,
    /// Last day observed for the experiment
    pub end_date: NaiveDate,
    /// Whether bucketing was filtered
    pub is_filtered: bool,
}

impl ExperimentSummary {
    fn from_row(row: &Row) -> Result<Self, WarehouseError> {
        Ok(Self {
            experiment_id: row.text("experiment_id")?.to_string(),
            name: row.text("name")?.to_string(),
            start_date: row.date("start_date")?,
            end_date: row.date("end_date")?,
            is_filtered: row.bool("is_filtered")?,
        })
    }
}

/// Per-variant aggregate: bucketed population size and gross GMS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantStats {
    /// Experiment identifier
    pub experiment_id: String,
    /// Variant label
    pub variant: String,
    /// Distinct bucketed units observed for this variant
    pub bucketed_users: u64,
    /// Gross merchandise sales attributed to this variant
    pub gms: f64,
}

impl VariantStats {
    fn from_row(row: &Row) -> Result<Self, WarehouseError> {
        Ok(Self {
            experiment_id: row.text("experiment_id")?.to_string(),
            variant: row.text("variant")?.to_string(),
            bucketed_users: row.int("bucketed_users")?.max(0) as u64,
            gms: row.float("gms")?,
        })
    }
}

/// One receipt attributed to a variant, with its financial outcomes.
///
/// The three cost-of-revenue metrics are optional: a NULL from the backend
/// stays `None` and is excluded from any downstream mean rather than counted
/// as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptRecord {
    /// Variant label that produced this receipt
    pub variant: String,
    /// Receipt identifier
    pub receipt_id: i64,
    /// Gross merchandise sales on the receipt
    pub gms_gross: f64,
    /// Net merchandise sales on the receipt
    pub gms_net: f64,
    /// Bad-recoupment amount, if known
    pub bad_recoupments: Option<f64>,
    /// Chargeback amount (including fees), if known
    pub chargebacks: Option<f64>,
    /// Combined chargebacks-and-recoupments amount, if known
    pub total_cor: Option<f64>,
}

impl ReceiptRecord {
    fn from_row(row: &Row) -> Result<Self, WarehouseError> {
        Ok(Self {
            variant: row.text("variant")?.to_string(),
            receipt_id: row.int("receipt_id")?,
            gms_gross: row.float("gms_gross")?,
            gms_net: row.float("gms_net")?,
            bad_recoupments: row.float_opt("bad_recoupments")?,
            chargebacks: row.float_opt("chargebacks")?,
            total_cor: row.float_opt("total_cor")?,
        })
    }

    /// Reduce this record to the observation the estimator consumes.
    pub fn into_observation(self) -> Observation {
        Observation {
            variant: self.variant,
            total_cor: self.total_cor,
            bad_recoupments: self.bad_recoupments,
            chargebacks: self.chargebacks,
        }
    }
}

/// Convert a receipt export into estimator observations.
pub fn observations(records: &[ReceiptRecord]) -> Vec<Observation> {
    records
        .iter()
        .map(|record| record.clone().into_observation())
        .collect()
}

/// Fetch top-line experiment metadata. Errors when the experiment has no
/// boundary row.
pub fn fetch_experiment_summary(
    client: &dyn QueryClient,
    experiment_id: &str,
) -> Result<ExperimentSummary, WarehouseError> {
    let rows = client.run_query(&query::experiment_summary_sql(experiment_id))?;
    let row = rows
        .first()
        .ok_or_else(|| WarehouseError::EmptyResult(experiment_id.to_string()))?;
    ExperimentSummary::from_row(row)
}

/// Fetch the per-variant aggregate summary.
pub fn fetch_variant_stats(
    client: &dyn QueryClient,
    experiment_id: &str,
) -> Result<Vec<VariantStats>, WarehouseError> {
    let rows = client.run_query(&query::variant_stats_sql(experiment_id))?;
    rows.iter().map(VariantStats::from_row).collect()
}

/// Fetch per-receipt detail for the two variants under comparison.
pub fn fetch_experiment_receipts(
    client: &dyn QueryClient,
    experiment_id: &str,
    control: &str,
    treatment: &str,
) -> Result<Vec<ReceiptRecord>, WarehouseError> {
    let rows = client.run_query(&query::experiment_receipts_sql(
        experiment_id,
        control,
        treatment,
    ))?;
    rows.iter().map(ReceiptRecord::from_row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Cell;
    use std::cell::RefCell;

    /// Canned-response client that records the SQL it was asked to run.
    struct StaticClient {
        rows: Vec<Row>,
        last_sql: RefCell<Option<String>>,
    }

    impl StaticClient {
        fn new(rows: Vec<Row>) -> Self {
            Self {
                rows,
                last_sql: RefCell::new(None),
            }
        }
    }

    impl QueryClient for StaticClient {
        fn run_query(&self, sql: &str) -> Result<Vec<Row>, WarehouseError> {
            *self.last_sql.borrow_mut() = Some(sql.to_string());
            Ok(self.rows.clone())
        }
    }

    fn summary_row() -> Row {
        Row::new()
            .set("experiment_id", "checkout_trust_badge")
            .set("name", "Checkout Trust Badge")
            .set("start_date", "2024-02-01")
            .set("end_date", "2024-03-01")
            .set("is_filtered", false)
    }

    fn receipt_row(variant: &str, receipt_id: i64, total: Option<f64>) -> Row {
        Row::new()
            .set("variant", variant)
            .set("receipt_id", receipt_id)
            .set("gms_gross", 120.5)
            .set("gms_net", 110.0)
            .set("bad_recoupments", total.map(|v| v / 2.0))
            .set("chargebacks", total.map(|v| v / 2.0))
            .set("total_cor", total)
    }

    #[test]
    fn test_fetch_experiment_summary() {
        let client = StaticClient::new(vec![summary_row()]);
        let summary = fetch_experiment_summary(&client, "checkout_trust_badge").unwrap();

        assert_eq!(summary.experiment_id, "checkout_trust_badge");
        assert_eq!(summary.name, "Checkout Trust Badge");
        assert_eq!(
            summary.start_date,
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
        assert!(!summary.is_filtered);

        let sql = client.last_sql.borrow().clone().unwrap();
        assert!(sql.contains("SET experiment_name = 'checkout_trust_badge';"));
    }

    #[test]
    fn test_fetch_summary_empty_result() {
        let client = StaticClient::new(vec![]);
        let err = fetch_experiment_summary(&client, "missing_experiment").unwrap_err();
        assert!(matches!(
            err,
            WarehouseError::EmptyResult(ref id) if id == "missing_experiment"
        ));
    }

    #[test]
    fn test_fetch_variant_stats() {
        let rows = vec![
            Row::new()
                .set("experiment_id", "exp")
                .set("variant", "off")
                .set("bucketed_users", 1042_i64)
                .set("gms", 50_000.0),
            Row::new()
                .set("experiment_id", "exp")
                .set("variant", "on")
                .set("bucketed_users", 1038_i64)
                .set("gms", 51_250.5),
        ];
        let client = StaticClient::new(rows);
        let stats = fetch_variant_stats(&client, "exp").unwrap();

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].variant, "off");
        assert_eq!(stats[0].bucketed_users, 1042);
        assert!((stats[1].gms - 51_250.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fetch_receipts_preserves_null_metrics() {
        let rows = vec![
            receipt_row("off", 1, Some(4.0)),
            receipt_row("on", 2, None),
        ];
        let client = StaticClient::new(rows);
        let records = fetch_experiment_receipts(&client, "exp", "off", "on").unwrap();

        assert_eq!(records[0].total_cor, Some(4.0));
        assert_eq!(records[1].total_cor, None);
        assert_eq!(records[1].chargebacks, None);

        let sql = client.last_sql.borrow().clone().unwrap();
        assert!(sql.contains("IN ('off', 'on')"));
    }

    #[test]
    fn test_receipt_mapping_rejects_malformed_row() {
        let bad = Row::new().set("variant", "on").set("receipt_id", "not-an-int");
        let client = StaticClient::new(vec![bad]);
        let err = fetch_experiment_receipts(&client, "exp", "off", "on").unwrap_err();
        assert!(matches!(err, WarehouseError::TypeMismatch { .. }));
    }

    #[test]
    fn test_into_observation_carries_missing_through() {
        let record = ReceiptRecord {
            variant: "on".to_string(),
            receipt_id: 7,
            gms_gross: 10.0,
            gms_net: 9.0,
            bad_recoupments: None,
            chargebacks: Some(1.25),
            total_cor: None,
        };
        let observation = record.into_observation();

        assert_eq!(observation.variant, "on");
        assert_eq!(observation.total_cor, None);
        assert_eq!(observation.chargebacks, Some(1.25));
    }

    #[test]
    fn test_observations_keeps_order() {
        let records = vec![
            ReceiptRecord {
                variant: "off".to_string(),
                receipt_id: 1,
                gms_gross: 0.0,
                gms_net: 0.0,
                bad_recoupments: None,
                chargebacks: None,
                total_cor: Some(1.0),
            },
            ReceiptRecord {
                variant: "on".to_string(),
                receipt_id: 2,
                gms_gross: 0.0,
                gms_net: 0.0,
                bad_recoupments: None,
                chargebacks: None,
                total_cor: Some(2.0),
            },
        ];
        let observations = observations(&records);
        assert_eq!(observations[0].variant, "off");
        assert_eq!(observations[1].variant, "on");
    }

    #[test]
    fn test_receipt_record_json_round_trip() {
        let record = ReceiptRecord {
            variant: "on".to_string(),
            receipt_id: 42,
            gms_gross: 99.5,
            gms_net: 90.0,
            bad_recoupments: Some(1.0),
            chargebacks: None,
            total_cor: Some(1.0),
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: ReceiptRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_null_cell_round_trips_via_builder() {
        let row = Row::new().set("total_cor", Cell::Null);
        assert_eq!(row.float_opt("total_cor").unwrap(), None);
    }
}
