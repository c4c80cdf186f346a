#![warn(missing_docs)]
//! Corlift Warehouse Access
//!
//! Everything between the data warehouse and the statistical core:
//! - Parameterized query templates for experiment metadata, per-variant
//!   aggregates, and per-receipt financial detail
//! - A `QueryClient` capability trait: the execution backend is injected by
//!   the caller, never constructed at import time
//! - Typed records mapping result rows into `corlift_stats` observations,
//!   with SQL NULL preserved as an explicit missing value

mod client;
mod model;
mod query;

pub use client::{Cell, QueryClient, Row, WarehouseError};
pub use model::{
    ExperimentSummary, ReceiptRecord, VariantStats, fetch_experiment_receipts,
    fetch_experiment_summary, fetch_variant_stats, observations,
};
pub use query::{experiment_receipts_sql, experiment_summary_sql, variant_stats_sql};
